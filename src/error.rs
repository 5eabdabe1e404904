use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the migration pipeline. Every stage maps its own
/// non-200 responses onto a dedicated variant so the final report can name
/// the stage, the HTTP status, and (where captured) the response body.
#[derive(Error, Debug)]
pub enum Error {
    #[error("authentication failed (HTTP {status})")]
    Auth { status: u16 },

    #[error("export request rejected (HTTP {status})")]
    Export { status: u16 },

    #[error("import control call failed (HTTP {status}): {body}")]
    Import { status: u16, body: String },

    #[error("package upload failed (HTTP {status}): {body}")]
    Upload { status: u16, body: String },

    #[error("package download failed (HTTP {status})")]
    Download { status: u16 },

    #[error("{label} job failed: {status}")]
    JobFailed { label: &'static str, status: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed {context} response body: {source}")]
    MalformedBody {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} response missing field `{field}`")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },

    #[error("{label} job did not reach a terminal state within {elapsed:?}")]
    Timeout {
        label: &'static str,
        elapsed: Duration,
    },

    #[error("migration cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
