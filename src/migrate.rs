use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::client::IicsClient;
use crate::error::{Error, Result};
use crate::export::{self, ExportRequest};
use crate::import;
use crate::poll::PollConfig;
use crate::session::{self, Credentials, Session};

#[derive(Debug, Clone)]
pub struct OrgConnection {
    pub region_url: String,
    pub credentials: Credentials,
}

/// Everything one migration run needs, collected up front so the pipeline
/// itself never touches ambient state.
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    pub source: OrgConnection,
    pub dest: OrgConnection,
    pub asset_id: String,
    pub include_dependencies: bool,
    /// Where the downloaded package lands between the two orgs.
    pub package_path: PathBuf,
}

/// Runs the whole migration: source login, export, download, destination
/// login, upload, import, then logout of both orgs. Strictly linear; the
/// first failure aborts forward progress. Every session that was
/// successfully established gets exactly one best-effort logout attempt
/// before that failure is returned, whichever stage broke.
pub async fn run(
    client: &IicsClient,
    plan: MigrationPlan,
    poll: PollConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    println!("Logging in to the source organization...");
    let source = session::login(client, &plan.source.region_url, plan.source.credentials.clone())
        .await?;

    let mut dest: Option<Session> = None;
    let outcome = pipeline(client, &plan, &source, &mut dest, poll, cancel).await;

    release(client, "source", &source).await;
    if let Some(dest) = dest.as_ref() {
        release(client, "destination", dest).await;
    }
    outcome
}

async fn pipeline(
    client: &IicsClient,
    plan: &MigrationPlan,
    source: &Session,
    dest: &mut Option<Session>,
    poll: PollConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    ensure_live(cancel)?;
    println!("Submitting export for asset {}...", plan.asset_id);
    let request = ExportRequest::new(plan.asset_id.clone(), plan.include_dependencies);
    let export_id = export::submit(client, source, &request).await?;
    println!("Export started. Export ID: {export_id}");

    export::await_completion(client, source, &export_id, poll, cancel).await?;
    println!("Export successful.");

    ensure_live(cancel)?;
    let artifact = export::download(client, source, &export_id, &plan.package_path).await?;
    println!("Export package saved to {}.", plan.package_path.display());

    ensure_live(cancel)?;
    println!("Logging in to the destination organization...");
    let dest: &Session = dest.insert(
        session::login(client, &plan.dest.region_url, plan.dest.credentials.clone()).await?,
    );

    ensure_live(cancel)?;
    println!("Uploading export package...");
    let job_id = import::upload(client, dest, artifact).await?;
    println!("Package uploaded. Import Job ID: {job_id}");

    ensure_live(cancel)?;
    import::start(client, dest, &job_id).await?;
    println!("Import job started.");

    import::await_completion(client, dest, &job_id, poll, cancel).await?;
    println!("Import successful.");
    Ok(())
}

fn ensure_live(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}

/// Best-effort logout; a failure here is reported but never masks the
/// pipeline's own outcome and never stops the other session's logout.
async fn release(client: &IicsClient, which: &str, session: &Session) {
    println!("Logging out of the {which} organization...");
    if let Err(err) = session::logout(client, session).await {
        eprintln!("Logout of the {which} organization failed: {err}");
    }
}
