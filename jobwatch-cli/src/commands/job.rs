//! Job command handlers
//!
//! Waiting on, inspecting and listing jobs that already exist.

use anyhow::{Context, Result};
use colored::Colorize;
use jobwatch_core::domain::job::JobHandle;
use jobwatch_watcher::{HttpJobRepository, RemoteJobWatcher, WatchConfig};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::output::{print_job_summary, print_status};

/// Wait for an existing job to reach a terminal state
pub async fn wait_for_job(
    config: &Config,
    job_id: &str,
    timeout: Option<u64>,
    poll_interval: Option<u64>,
) -> Result<()> {
    let mut watch_config = WatchConfig::from_env();
    if let Some(timeout) = timeout {
        watch_config = watch_config.with_timeout(Duration::from_secs(timeout));
    }
    if let Some(poll_interval) = poll_interval {
        watch_config = watch_config.with_poll_interval(Duration::from_secs(poll_interval));
    }
    watch_config.validate()?;

    let repository = Arc::new(HttpJobRepository::new(config.client()?));
    let watcher = RemoteJobWatcher::new(repository, watch_config);

    match watcher.wait(&JobHandle::new(job_id)).await {
        Ok(status) => {
            print_status(&status);
            Ok(())
        }
        Err(e) => {
            if let Some(status) = e.final_status() {
                print_status(status);
            }
            Err(e.into())
        }
    }
}

/// Show one status snapshot
pub async fn show_status(config: &Config, job_id: &str) -> Result<()> {
    let status = config
        .client()?
        .get_job_status(job_id)
        .await
        .with_context(|| format!("Failed to fetch status of job {}", job_id))?;

    print_status(&status);

    Ok(())
}

/// List jobs, optionally restricted to a scope
pub async fn list_jobs(config: &Config, scope: Option<&str>) -> Result<()> {
    let jobs = config
        .client()?
        .list_jobs(scope)
        .await
        .context("Failed to list jobs")?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(&job);
        }
    }

    Ok(())
}
