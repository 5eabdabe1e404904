use icmig::{Error, ExportRequest, JobStatus};
use serde_json::json;

#[test]
fn export_request_wire_shape() {
    let req = ExportRequest::new("abc-123", true);
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(
        v,
        json!({
            "name": "UtilityExport",
            "objects": [{"id": "abc-123", "includeDependencies": true}]
        })
    );
}

#[test]
fn job_status_decodes_with_optional_fields() {
    let full: JobStatus =
        serde_json::from_value(json!({"status": "In Progress", "state": "PENDING"})).unwrap();
    assert_eq!(full.status.as_deref(), Some("In Progress"));
    assert_eq!(full.state.as_deref(), Some("PENDING"));

    let sparse: JobStatus = serde_json::from_value(json!({"state": "SUCCESSFUL"})).unwrap();
    assert!(sparse.status.is_none());
    assert_eq!(sparse.state.as_deref(), Some("SUCCESSFUL"));

    let empty: JobStatus = serde_json::from_value(json!({})).unwrap();
    assert!(empty.state.is_none());
}

#[test]
fn error_messages_carry_status_and_body() {
    let upload = Error::Upload {
        status: 500,
        body: "{\"error\":\"bad zip\"}".into(),
    };
    let text = upload.to_string();
    assert!(text.contains("500"));
    assert!(text.contains("bad zip"));

    let auth = Error::Auth { status: 401 };
    assert!(auth.to_string().contains("401"));

    let missing = Error::MissingField {
        context: "login",
        field: "icSessionId",
    };
    assert!(missing.to_string().contains("icSessionId"));
}
