use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{IicsClient, V3_SESSION_HEADER, decode_json};
use crate::error::{Error, Result};
use crate::poll::{JobStatus, PollConfig, poll_until_terminal};
use crate::session::Session;

/// Label the export bundle is created under in the source org.
pub const EXPORT_NAME: &str = "UtilityExport";

#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    name: String,
    objects: Vec<ExportObject>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportObject {
    id: String,
    include_dependencies: bool,
}

impl ExportRequest {
    pub fn new(asset_id: impl Into<String>, include_dependencies: bool) -> Self {
        Self {
            name: EXPORT_NAME.to_string(),
            objects: vec![ExportObject {
                id: asset_id.into(),
                include_dependencies,
            }],
        }
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: Option<String>,
}

/// The downloaded export bundle, handed from the source org to the
/// destination org. One export job yields at most one artifact, and one
/// artifact feeds at most one import job.
#[derive(Debug, Clone)]
pub struct PackageArtifact {
    pub bytes: Vec<u8>,
    pub export_id: String,
    pub file_name: String,
}

pub async fn submit(
    client: &IicsClient,
    session: &Session,
    request: &ExportRequest,
) -> Result<String> {
    let url = format!("{}/public/core/v3/export", session.base_url);
    let reply = client
        .post_json(&url, Some((V3_SESSION_HEADER, &session.token)), request)
        .await?;
    if reply.status != 200 {
        return Err(Error::Export {
            status: reply.status,
        });
    }
    let decoded: SubmitResponse = decode_json(&reply.body, "export submit")?;
    decoded.id.ok_or(Error::MissingField {
        context: "export submit",
        field: "id",
    })
}

pub async fn await_completion(
    client: &IicsClient,
    session: &Session,
    export_id: &str,
    config: PollConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    let url = format!("{}/public/core/v3/export/{export_id}", session.base_url);
    let url = url.as_str();
    let token = session.token.as_str();
    poll_until_terminal(
        move || async move {
            let reply = client.get(url, (V3_SESSION_HEADER, token)).await?;
            if reply.status != 200 {
                return Err(Error::Export {
                    status: reply.status,
                });
            }
            decode_json::<JobStatus>(&reply.body, "export status")
        },
        config,
        cancel,
        "export",
    )
    .await
}

/// Fetches the finished export package and persists it to `dest` before
/// returning the bytes, so a later run can re-use the file on disk.
pub async fn download(
    client: &IicsClient,
    session: &Session,
    export_id: &str,
    dest: &Path,
) -> Result<PackageArtifact> {
    let url = format!(
        "{}/public/core/v3/export/{export_id}/package",
        session.base_url
    );
    let (status, bytes) = client
        .get_bytes(&url, (V3_SESSION_HEADER, &session.token))
        .await?;
    if status != 200 {
        return Err(Error::Download { status });
    }
    tokio::fs::write(dest, &bytes).await?;
    let file_name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("export_package.zip")
        .to_string();
    Ok(PackageArtifact {
        bytes,
        export_id: export_id.to_string(),
        file_name,
    })
}
