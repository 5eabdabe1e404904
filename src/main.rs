use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    icmig::cli::run_cli().await
}
