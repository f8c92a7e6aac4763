//! Error types for the watcher

use jobwatch_client::ClientError;
use jobwatch_core::domain::job::JobStatus;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that end a watch
///
/// None of these are recovered locally: the caller is expected to exit with a
/// failure indication.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Poll and timeout settings are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Listing existing jobs failed, so nothing was submitted
    #[error("Failed to look up existing jobs named {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: ClientError,
    },

    /// The service rejected the submission
    #[error("Failed to submit job {name}: {source}")]
    Submission {
        name: String,
        #[source]
        source: ClientError,
    },

    /// The job reached FAILED or CANCELLED
    #[error("Job {job_id} finished in state {}", .status.state)]
    RemoteJob {
        job_id: String,
        status: Box<JobStatus>,
    },

    /// No terminal state was observed within the wait budget.
    /// The job is left running remotely.
    #[error("Timed out after {timeout:?} waiting for job {job_id}")]
    Timeout { job_id: String, timeout: Duration },

    /// Fetching the status failed with a non-transient error, or transient
    /// errors outlasted the retry budget
    #[error("Failed to fetch status of job {job_id} after {attempts} attempt(s): {source}")]
    StatusFetch {
        job_id: String,
        attempts: u32,
        #[source]
        source: ClientError,
    },
}

impl WatchError {
    /// Last status observed before a FAILED/CANCELLED outcome
    pub fn final_status(&self) -> Option<&JobStatus> {
        match self {
            Self::RemoteJob { status, .. } => Some(&**status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
