//! Launch command
//!
//! Builds a job request from the command line, submits it unless a job with
//! the same derived name already exists, and waits for a terminal state.
//! The job id can be written to a file as soon as it is known, so a
//! supervisor can track or cancel the job while the CLI is still waiting.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use clap::Args;
use jobwatch_core::domain::job::JobHandle;
use jobwatch_core::domain::request::JobRequest;
use jobwatch_watcher::{CorrelationScope, HttpJobRepository, RemoteJobWatcher, WatchConfig};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

use crate::config::Config;
use crate::output::print_status;

/// Format accepted by `--datetime`
pub const DATETIME_FORMAT: &str = "%Y%m%d-%H:%M:%S";

/// Arguments of `jobwatch launch`
#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Template or pipeline package to run
    #[arg(long)]
    pub template: String,

    /// Job name prefix; the job is named `<prefix>-<context id>`
    #[arg(long)]
    pub name_prefix: String,

    /// Project or experiment the job belongs to
    #[arg(long)]
    pub scope: Option<String>,

    /// Context id making the job name unique per run
    #[arg(long, conflicts_with = "datetime")]
    pub context_id: Option<String>,

    /// Run datetime (YYYYmmdd-HH:MM:SS); used as the context id and passed
    /// to the job as the `datetime` parameter
    #[arg(long, value_parser = parse_datetime)]
    pub datetime: Option<NaiveDateTime>,

    /// Job parameter as key=value; JSON values are accepted
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// JSON object file with job parameters; --param entries override it
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Seconds to wait before giving up (default: $JOBWATCH_TIMEOUT or 86400)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Seconds between status polls (default: $JOBWATCH_POLL_INTERVAL or 30)
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// File to write the job id to once the job is found or submitted
    #[arg(long)]
    pub job_id_file: Option<PathBuf>,
}

impl LaunchArgs {
    /// Context id requested on the command line, if any
    fn explicit_context_id(&self) -> Option<String> {
        match &self.datetime {
            Some(datetime) => Some(datetime.format(DATETIME_FORMAT).to_string()),
            None => self.context_id.clone(),
        }
    }

    /// Merges the parameters file, `--param` entries and the datetime
    fn parameters(&self) -> Result<HashMap<String, Value>> {
        let mut parameters = HashMap::new();

        if let Some(path) = &self.params_file {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let object: Map<String, Value> = serde_json::from_str(&raw)
                .with_context(|| format!("{} must hold a JSON object", path.display()))?;
            parameters.extend(object);
        }

        parameters.extend(self.params.iter().cloned());

        if let Some(datetime) = &self.datetime {
            parameters.insert(
                "datetime".to_string(),
                Value::String(datetime.format(DATETIME_FORMAT).to_string()),
            );
        }

        Ok(parameters)
    }

    fn watch_config(&self) -> Result<WatchConfig> {
        let mut config = WatchConfig::from_env();
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(poll_interval) = self.poll_interval {
            config = config.with_poll_interval(Duration::from_secs(poll_interval));
        }
        config.validate()?;
        Ok(config)
    }
}

/// Handle `jobwatch launch`
pub async fn handle_launch(args: LaunchArgs, config: &Config) -> Result<()> {
    let watch_config = args.watch_config()?;
    let parameters = args.parameters()?;

    let scope = CorrelationScope::begin(args.explicit_context_id());

    let mut request = JobRequest::new(&args.template, &args.name_prefix, scope.context_id())?
        .with_parameters(parameters);
    if let Some(job_scope) = &args.scope {
        request = request.with_scope(job_scope);
    }

    let repository = Arc::new(HttpJobRepository::new(config.client()?));
    let watcher = RemoteJobWatcher::new(repository, watch_config);

    let span = scope.span().clone();
    let handle = watcher.ensure_running(&request).instrument(span.clone()).await?;

    if let Some(path) = &args.job_id_file {
        write_job_id(path, &handle)?;
    }

    match watcher.wait(&handle).instrument(span).await {
        Ok(status) => {
            print_status(&status);
            scope.complete();
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

/// Writes the job id, newline terminated, replacing any previous content
fn write_job_id(path: &Path, handle: &JobHandle) -> Result<()> {
    std::fs::write(path, format!("{}\n", handle.id))
        .with_context(|| format!("Failed to write job id to {}", path.display()))?;
    tracing::info!(job_id = %handle.id, path = %path.display(), "Wrote job id");
    Ok(())
}

fn parse_datetime(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, DATETIME_FORMAT)
        .with_context(|| format!("expected {}, got '{}'", DATETIME_FORMAT, input))
}

fn parse_param(input: &str) -> Result<(String, Value)> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", input))?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("parameter name is empty in '{}'", input);
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        launch: LaunchArgs,
    }

    fn parse(args: &[&str]) -> LaunchArgs {
        let mut argv = vec!["jobwatch", "--template", "pipeline.tar.gz", "--name-prefix", "swf"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().launch
    }

    #[test]
    fn test_parse_param_values() {
        assert_eq!(parse_param("foo=bar").unwrap(), ("foo".to_string(), json!("bar")));
        assert_eq!(parse_param("n=3").unwrap(), ("n".to_string(), json!(3)));
        assert_eq!(
            parse_param(r#"env={"zone":"us-central1"}"#).unwrap(),
            ("env".to_string(), json!({ "zone": "us-central1" }))
        );
        assert_eq!(parse_param("url=a=b").unwrap(), ("url".to_string(), json!("a=b")));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_datetime_becomes_context_and_parameter() {
        let args = parse(&["--datetime", "20240131-02:30:00", "--param", "foo=bar"]);

        assert_eq!(args.explicit_context_id().as_deref(), Some("20240131-02:30:00"));
        let parameters = args.parameters().unwrap();
        assert_eq!(parameters["datetime"], json!("20240131-02:30:00"));
        assert_eq!(parameters["foo"], json!("bar"));
    }

    #[test]
    fn test_rejects_malformed_datetime() {
        let argv = [
            "jobwatch",
            "--template",
            "pipeline.tar.gz",
            "--name-prefix",
            "swf",
            "--datetime",
            "2024-01-31",
        ];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_context_id_conflicts_with_datetime() {
        let argv = [
            "jobwatch",
            "--template",
            "t",
            "--name-prefix",
            "swf",
            "--context-id",
            "ctx-1",
            "--datetime",
            "20240131-02:30:00",
        ];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_params_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"foo": "from-file", "zone": "us-central1"}"#).unwrap();

        let args = parse(&[
            "--params-file",
            path.to_str().unwrap(),
            "--param",
            "foo=from-flag",
        ]);
        let parameters = args.parameters().unwrap();

        assert_eq!(parameters["foo"], json!("from-flag"));
        assert_eq!(parameters["zone"], json!("us-central1"));
    }

    #[test]
    fn test_flags_override_watch_config() {
        let args = parse(&["--timeout", "120", "--poll-interval", "0"]);
        let config = args.watch_config().unwrap();

        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.poll_interval, Duration::ZERO);
    }

    #[test]
    fn test_job_id_file_receives_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job-id");
        std::fs::write(&path, "stale-id\n").unwrap();

        let args = parse(&["--job-id-file", path.to_str().unwrap()]);
        let target = args.job_id_file.as_deref().unwrap();
        write_job_id(target, &JobHandle::new("job-42")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "job-42\n");
    }

    #[test]
    fn test_job_id_file_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("job-id");

        assert!(write_job_id(&path, &JobHandle::new("job-42")).is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let args = parse(&["--timeout", "0"]);
        assert!(args.watch_config().is_err());
    }
}
