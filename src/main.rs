mod cli;

use std::path::Path;

use clap::Parser;
use cli::Cli;
use drone_discord::Notifier;
use drone_discord::logging::setup_logging;
use tracing::{debug, error, info};

const PLUGIN_ENV_FILE: &str = "PLUGIN_ENV_FILE";
const DRONE_ENV_FILE: &str = "/run/drone/env";

/// Load env files before clap reads the environment.
/// Variables already set in the process are kept.
fn load_env_files() {
    if let Ok(path) = std::env::var(PLUGIN_ENV_FILE) {
        dotenv::from_path(&path).ok();
    }

    if Path::new(DRONE_ENV_FILE).exists() {
        dotenv::from_path(DRONE_ENV_FILE).ok();
    }
}

#[tokio::main]
async fn main() {
    load_env_files();

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let (context, config) = cli.into_parts();
    debug!(
        "Notifying for {} build #{} ({})",
        context.repo.full_name, context.build.number, context.build.event
    );

    let mut notifier = Notifier::new(context, config);
    match notifier.exec().await {
        Ok(report) => info!(
            "Sent {} messages and {} files",
            report.messages_sent, report.files_sent
        ),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
