pub mod cli;
pub mod client;
pub mod error;
pub mod export;
pub mod import;
pub mod migrate;
pub mod poll;
pub mod session;
pub mod util;

pub use client::IicsClient;
pub use error::{Error, Result};
pub use export::{ExportRequest, PackageArtifact};
pub use migrate::{MigrationPlan, OrgConnection};
pub use poll::{JobStatus, PollConfig};
pub use session::{Credentials, Session};
pub use util::{normalize_region_url, parse_yes_no};
