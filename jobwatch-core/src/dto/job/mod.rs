//! Job DTOs sent to the remote job service

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::request::JobRequest;

/// Body of the job submission call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJob {
    pub name: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub parameters: HashMap<String, serde_json::Value>,
}

impl From<&JobRequest> for SubmitJob {
    fn from(request: &JobRequest) -> Self {
        Self {
            name: request.job_name(),
            template: request.template().to_string(),
            scope: request.scope().map(str::to_string),
            parameters: request.parameters().clone(),
        }
    }
}

/// Query string of the job listing call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListJobsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}
