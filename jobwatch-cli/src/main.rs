//! Jobwatch CLI
//!
//! Submits a job to the remote pipeline service at most once per context id
//! and blocks until it finishes. Exits non-zero on any failure.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use jobwatch_watcher::SecretStore;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(about = "Launch remote pipeline jobs idempotently and wait for them", long_about = None)]
struct Cli {
    /// Job service URL (falls back to the `service_url` secret)
    #[arg(long, env = "JOBWATCH_SERVICE_URL")]
    service_url: Option<String>,

    /// Seconds a single HTTP call to the service may take
    #[arg(long, env = "JOBWATCH_REQUEST_TIMEOUT", default_value_t = 60)]
    request_timeout: u64,

    /// Directory holding one file per secret
    #[arg(long, env = "JOBWATCH_SECRETS_DIR", default_value = SecretStore::DEFAULT_DIR)]
    secrets_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobwatch=info,jobwatch_watcher=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let secrets = SecretStore::new(cli.secrets_dir);
    let config = Config::resolve(cli.service_url, &secrets)?
        .with_request_timeout(Duration::from_secs(cli.request_timeout));

    handle_command(cli.command, &config).await
}
