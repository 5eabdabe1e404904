use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use icmig::{Error, JobStatus, PollConfig, poll::poll_until_terminal};
use tokio_util::sync::CancellationToken;

fn observed(state: Option<&str>, status: Option<&str>) -> JobStatus {
    JobStatus {
        state: state.map(str::to_string),
        status: status.map(str::to_string),
    }
}

fn fast() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(1),
        max_elapsed: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn succeeds_after_any_number_of_pending_cycles() {
    let responses = Mutex::new(vec![
        observed(Some("PENDING"), Some("In Progress")),
        observed(Some("pending"), None),
        observed(Some("Queued"), Some("waiting on worker")),
        observed(Some("Successful"), None),
    ]);
    let calls = AtomicUsize::new(0);
    let (responses, calls) = (&responses, &calls);
    let check = move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(responses.lock().unwrap().remove(0))
    };

    poll_until_terminal(check, fast(), &CancellationToken::new(), "export")
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn stops_on_failed_state_case_insensitively() {
    let responses = Mutex::new(vec![observed(Some("failed"), Some("asset not found"))]);
    let calls = AtomicUsize::new(0);
    let (responses, calls) = (&responses, &calls);
    let check = move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(responses.lock().unwrap().remove(0))
    };

    let err = poll_until_terminal(check, fast(), &CancellationToken::new(), "import")
        .await
        .unwrap_err();
    match err {
        Error::JobFailed { label, status } => {
            assert_eq!(label, "import");
            assert_eq!(status, "asset not found");
        }
        other => panic!("expected JobFailed, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn check_errors_are_fatal_not_pending() {
    let check = || async { Err::<JobStatus, _>(Error::Export { status: 503 }) };
    let err = poll_until_terminal(check, fast(), &CancellationToken::new(), "export")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Export { status: 503 }));
}

#[tokio::test]
async fn missing_state_field_is_fatal() {
    let check = || async { Ok(observed(None, Some("In Progress"))) };
    let err = poll_until_terminal(check, fast(), &CancellationToken::new(), "export")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingField { field: "state", .. }
    ));
}

#[tokio::test]
async fn cancelled_before_first_poll() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;
    let check = move || async move {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        Ok(observed(Some("PENDING"), None))
    };

    let err = poll_until_terminal(check, fast(), &cancel, "export")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn deadline_exceeded_surfaces_timeout() {
    let config = PollConfig {
        interval: Duration::from_millis(1),
        max_elapsed: Duration::from_millis(10),
    };
    let check = || async { Ok(observed(Some("PENDING"), Some("queued"))) };

    let err = poll_until_terminal(check, config, &CancellationToken::new(), "import")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { label: "import", .. }));
}
