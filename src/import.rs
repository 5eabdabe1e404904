use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::client::{IicsClient, V3_SESSION_HEADER, decode_json};
use crate::error::{Error, Result};
use crate::export::PackageArtifact;
use crate::poll::{JobStatus, PollConfig, poll_until_terminal};
use crate::session::Session;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    job_id: Option<String>,
}

/// Uploads the package as a single multipart part named `package` with
/// content type `application/zip`; reqwest generates a fresh boundary per
/// call. The error body is captured on failure, the one path where the API
/// returns actionable diagnostics.
pub async fn upload(
    client: &IicsClient,
    session: &Session,
    artifact: PackageArtifact,
) -> Result<String> {
    let url = format!("{}/public/core/v3/import/package", session.base_url);
    let part = Part::bytes(artifact.bytes)
        .file_name(artifact.file_name)
        .mime_str("application/zip")?;
    let form = Form::new().part("package", part);
    let reply = client
        .post_multipart(&url, (V3_SESSION_HEADER, &session.token), form)
        .await?;
    if reply.status != 200 {
        return Err(Error::Upload {
            status: reply.status,
            body: reply.body,
        });
    }
    let decoded: UploadResponse = decode_json(&reply.body, "import upload")?;
    decoded.job_id.ok_or(Error::MissingField {
        context: "import upload",
        field: "jobId",
    })
}

/// Kicks off the import job for an uploaded package; the body is empty.
pub async fn start(client: &IicsClient, session: &Session, job_id: &str) -> Result<()> {
    let url = format!("{}/public/core/v3/import/{job_id}", session.base_url);
    let reply = client
        .post_empty(&url, (V3_SESSION_HEADER, &session.token))
        .await?;
    if reply.status != 200 {
        return Err(Error::Import {
            status: reply.status,
            body: reply.body,
        });
    }
    Ok(())
}

pub async fn await_completion(
    client: &IicsClient,
    session: &Session,
    job_id: &str,
    config: PollConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    let url = format!("{}/public/core/v3/import/{job_id}", session.base_url);
    let url = url.as_str();
    let token = session.token.as_str();
    poll_until_terminal(
        move || async move {
            let reply = client.get(url, (V3_SESSION_HEADER, token)).await?;
            if reply.status != 200 {
                return Err(Error::Import {
                    status: reply.status,
                    body: reply.body,
                });
            }
            decode_json::<JobStatus>(&reply.body, "import status")
        },
        config,
        cancel,
        "import",
    )
    .await
}
