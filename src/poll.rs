use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// One observation of a server-side job. `status` is the free-form
/// human-readable progress text; `state` is the machine-readable field
/// compared against the terminal values.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    pub status: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Wait between status checks.
    pub interval: Duration,
    /// Overall deadline; exceeding it surfaces a `Timeout` error.
    pub max_elapsed: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_elapsed: Duration::from_secs(30 * 60),
        }
    }
}

/// Polls `check` until the job reaches SUCCESSFUL or FAILED (compared
/// case-insensitively). Only a 200 response with a non-terminal state counts
/// as pending; a failing status check is surfaced immediately, never
/// retried. A 200 body without a `state` field is fatal as well.
/// Cancellation is honored before every check and during every sleep.
pub async fn poll_until_terminal<F, Fut>(
    check: F,
    config: PollConfig,
    cancel: &CancellationToken,
    label: &'static str,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobStatus>>,
{
    let pb = progress_spinner(label);
    let outcome = drive(check, config, cancel, label, &pb).await;
    pb.finish_and_clear();
    outcome
}

async fn drive<F, Fut>(
    mut check: F,
    config: PollConfig,
    cancel: &CancellationToken,
    label: &'static str,
    pb: &ProgressBar,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobStatus>>,
{
    let started = Instant::now();
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if started.elapsed() > config.max_elapsed {
            return Err(Error::Timeout {
                label,
                elapsed: started.elapsed(),
            });
        }

        let observed = check().await?;
        let state = observed.state.as_deref().ok_or(Error::MissingField {
            context: label,
            field: "state",
        })?;
        if state.eq_ignore_ascii_case("SUCCESSFUL") {
            return Ok(());
        }
        if state.eq_ignore_ascii_case("FAILED") {
            let status = observed.status.unwrap_or_else(|| state.to_string());
            return Err(Error::JobFailed { label, status });
        }

        pb.set_message(format!(
            "{label} in progress: {}",
            observed.status.as_deref().unwrap_or(state)
        ));
        tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            _ = sleep(config.interval) => {}
        }
    }
}

fn progress_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(format!("Waiting for {label} job..."));
    pb
}
