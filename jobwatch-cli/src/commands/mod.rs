//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod launch;

pub use launch::LaunchArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a job (unless one with the same name exists) and wait for it
    Launch(LaunchArgs),
    /// Wait for an existing job to finish
    Wait {
        /// Job id assigned by the service
        job_id: String,

        /// Seconds to wait before giving up
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Seconds between status polls
        #[arg(long)]
        poll_interval: Option<u64>,
    },
    /// Show the current status of a job
    Status {
        /// Job id assigned by the service
        job_id: String,
    },
    /// List jobs
    List {
        /// Restrict the listing to a project or experiment
        #[arg(long)]
        scope: Option<String>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Launch(args) => launch::handle_launch(args, config).await,
        Commands::Wait {
            job_id,
            timeout,
            poll_interval,
        } => job::wait_for_job(config, &job_id, timeout, poll_interval).await,
        Commands::Status { job_id } => job::show_status(config, &job_id).await,
        Commands::List { scope } => job::list_jobs(config, scope.as_deref()).await,
    }
}
