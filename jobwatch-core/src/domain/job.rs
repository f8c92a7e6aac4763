//! Job domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier assigned by the remote service when it accepts a job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: String,
}

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Entry returned by the job listing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        alias = "currentState",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<JobState>,
}

impl JobSummary {
    pub fn handle(&self) -> JobHandle {
        JobHandle::new(self.id.clone())
    }
}

/// Snapshot of a job's status
///
/// Every fetch produces a fresh snapshot. Fields other than the id and the
/// state are kept verbatim in `metadata` so callers can inspect whatever the
/// service attached (error messages, timings, output locations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "currentState")]
    pub state: JobState,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl JobStatus {
    pub fn new(state: JobState) -> Self {
        Self {
            id: None,
            state,
            metadata: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Job state label
///
/// The services wrapped by this tool disagree on spelling (`DONE`,
/// `JOB_STATE_DONE`, `completed`), so labels are normalized on the way in.
/// Anything outside the known vocabulary is kept as `Other` and treated as
/// non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Pending,
    Running,
    Done,
    Failed,
    Cancelled,
    Other(String),
}

impl JobState {
    /// Parse a state label reported by the remote service
    pub fn parse(label: &str) -> Self {
        let upper = label.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("JOB_STATE_").unwrap_or(&upper);

        match bare {
            "PENDING" | "QUEUED" | "SUBMITTED" => JobState::Pending,
            "RUNNING" => JobState::Running,
            "DONE" | "COMPLETED" | "SUCCEEDED" => JobState::Done,
            "FAILED" | "ERROR" => JobState::Failed,
            "CANCELLED" | "CANCELED" => JobState::Cancelled,
            _ => JobState::Other(label.to_string()),
        }
    }

    /// DONE, FAILED and CANCELLED are terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed | JobState::Cancelled)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobState::Done)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Done => "DONE",
            JobState::Failed => "FAILED",
            JobState::Cancelled => "CANCELLED",
            JobState::Other(label) => label,
        }
    }
}

impl From<String> for JobState {
    fn from(label: String) -> Self {
        JobState::parse(&label)
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_normalizes_service_labels() {
        assert_eq!(JobState::parse("JOB_STATE_DONE"), JobState::Done);
        assert_eq!(JobState::parse("completed"), JobState::Done);
        assert_eq!(JobState::parse("job_state_pending"), JobState::Pending);
        assert_eq!(JobState::parse("Canceled"), JobState::Cancelled);
        assert_eq!(JobState::parse("error"), JobState::Failed);
    }

    #[test]
    fn test_unknown_label_is_not_terminal() {
        let state = JobState::parse("JOB_STATE_CANCELLING");
        assert_eq!(state, JobState::Other("JOB_STATE_CANCELLING".to_string()));
        assert!(!state.is_terminal());
        assert_eq!(state.to_string(), "JOB_STATE_CANCELLING");
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Done.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Done.is_success());
        assert!(!JobState::Failed.is_success());
    }

    #[test]
    fn test_status_accepts_current_state_field() {
        let status: JobStatus = serde_json::from_value(json!({
            "id": "job-1",
            "currentState": "JOB_STATE_DONE",
            "location": "us-central1"
        }))
        .unwrap();

        assert_eq!(status.id.as_deref(), Some("job-1"));
        assert_eq!(status.state, JobState::Done);
        assert_eq!(status.metadata.get("location"), Some(&json!("us-central1")));
        assert!(!status.metadata.contains_key("currentState"));
    }

    #[test]
    fn test_status_keeps_metadata_on_serialize() {
        let status = JobStatus::new(JobState::Failed)
            .with_id("job-7")
            .with_metadata("error", json!("out of memory"));

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({ "id": "job-7", "state": "FAILED", "error": "out of memory" })
        );
    }

    #[test]
    fn test_summary_without_state() {
        let summary: JobSummary =
            serde_json::from_value(json!({ "id": "job-1", "name": "test-ctx-1" })).unwrap();
        assert_eq!(summary.state, None);
        assert_eq!(summary.handle(), JobHandle::new("job-1"));
    }
}
