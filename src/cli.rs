use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Password, theme::ColorfulTheme};
use tokio_util::sync::CancellationToken;

use crate::client::IicsClient;
use crate::migrate::{self, MigrationPlan, OrgConnection};
use crate::poll::PollConfig;
use crate::session::Credentials;
use crate::util::parse_yes_no;

#[derive(Parser, Debug)]
#[command(name = "icmig", version, about = "Cross-org asset migration for Informatica Cloud", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export an asset from a source org and import it into a destination org
    Migrate(MigrateArgs),
}

#[derive(Args, Debug)]
struct MigrateArgs {
    /// Source (non-prod) region URL, e.g. dm-us.informaticacloud.com
    #[arg(long)]
    source_region: Option<String>,

    /// Source username
    #[arg(long)]
    source_username: Option<String>,

    /// Source password (prompted for when absent)
    #[arg(long, env = "ICMIG_SOURCE_PASSWORD", hide_env_values = true)]
    source_password: Option<String>,

    /// Asset ID to export
    #[arg(long)]
    asset: Option<String>,

    /// Include asset dependencies in the export (true/false)
    #[arg(long)]
    include_dependencies: Option<bool>,

    /// Destination (prod) region URL
    #[arg(long)]
    dest_region: Option<String>,

    /// Destination username
    #[arg(long)]
    dest_username: Option<String>,

    /// Destination password (prompted for when absent)
    #[arg(long, env = "ICMIG_DEST_PASSWORD", hide_env_values = true)]
    dest_password: Option<String>,

    /// Local path for the downloaded export package
    #[arg(long, default_value = "export_package.zip")]
    package_path: PathBuf,

    /// Seconds between job status checks
    #[arg(long, default_value_t = 5)]
    poll_interval_secs: u64,

    /// Overall deadline in seconds for each job to finish
    #[arg(long, default_value_t = 1800)]
    timeout_secs: u64,
}

impl Default for MigrateArgs {
    fn default() -> Self {
        Self {
            source_region: None,
            source_username: None,
            source_password: None,
            asset: None,
            include_dependencies: None,
            dest_region: None,
            dest_username: None,
            dest_password: None,
            package_path: PathBuf::from("export_package.zip"),
            poll_interval_secs: 5,
            timeout_secs: 1800,
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let args = match cli.command.unwrap_or(Commands::Migrate(MigrateArgs::default())) {
        Commands::Migrate(args) => args,
    };

    let poll = PollConfig {
        interval: Duration::from_secs(args.poll_interval_secs),
        max_elapsed: Duration::from_secs(args.timeout_secs),
    };
    let plan = build_plan(args)?;
    let client = IicsClient::new(cli.verbose)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancellation requested, shutting down...");
            ctrl_c.cancel();
        }
    });

    migrate::run(&client, plan, poll, &cancel).await?;
    println!("Migration completed successfully.");
    Ok(())
}

/// Fills in anything not supplied as a flag with an interactive prompt,
/// mirroring the original utility's question order.
fn build_plan(args: MigrateArgs) -> Result<MigrationPlan> {
    let theme = ColorfulTheme::default();

    println!("======= Cross-org asset migration =======");
    println!("--- Source (non-prod) organization ---");
    let source = prompt_connection(
        &theme,
        "Source",
        args.source_region,
        args.source_username,
        args.source_password,
    )?;

    let asset_id = match args.asset {
        Some(v) => v,
        None => Input::with_theme(&theme)
            .with_prompt("Asset ID to export")
            .interact_text()?,
    };
    let include_dependencies = match args.include_dependencies {
        Some(v) => v,
        None => {
            let answer: String = Input::with_theme(&theme)
                .with_prompt("Include dependencies? (y/n)")
                .validate_with(|s: &String| parse_yes_no(s).map(|_| ()).ok_or("enter y or n"))
                .interact_text()?;
            parse_yes_no(&answer).unwrap_or(false)
        }
    };

    println!("--- Destination (prod) organization ---");
    let dest = prompt_connection(
        &theme,
        "Destination",
        args.dest_region,
        args.dest_username,
        args.dest_password,
    )?;

    Ok(MigrationPlan {
        source,
        dest,
        asset_id,
        include_dependencies,
        package_path: args.package_path,
    })
}

fn prompt_connection(
    theme: &ColorfulTheme,
    which: &str,
    region: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<OrgConnection> {
    let region_url = match region {
        Some(v) => v,
        None => Input::with_theme(theme)
            .with_prompt(format!(
                "{which} region URL (e.g., dm-us.informaticacloud.com)"
            ))
            .interact_text()?,
    };
    let username = match username {
        Some(v) => v,
        None => Input::with_theme(theme)
            .with_prompt(format!("{which} username"))
            .interact_text()?,
    };
    let password = match password {
        Some(v) => v,
        None => Password::with_theme(theme)
            .with_prompt(format!("{which} password"))
            .interact()?,
    };
    Ok(OrgConnection {
        region_url,
        credentials: Credentials { username, password },
    })
}
