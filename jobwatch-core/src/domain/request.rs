//! Job request type

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error raised when a request cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Request to start (or reuse) a remote job
///
/// The job name `<prefix>-<context_id>` doubles as the idempotency key: a job
/// already listed under that name is reused instead of submitting a duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    template: String,
    name_prefix: String,
    context_id: String,
    scope: Option<String>,
    parameters: HashMap<String, Value>,
}

impl JobRequest {
    /// Creates a request for `template`
    ///
    /// # Errors
    /// Returns `RequestError::EmptyField` if any argument is blank.
    pub fn new(
        template: impl Into<String>,
        name_prefix: impl Into<String>,
        context_id: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let template = template.into();
        let name_prefix = name_prefix.into();
        let context_id = context_id.into();

        if template.trim().is_empty() {
            return Err(RequestError::EmptyField("template"));
        }
        if name_prefix.trim().is_empty() {
            return Err(RequestError::EmptyField("name prefix"));
        }
        if context_id.trim().is_empty() {
            return Err(RequestError::EmptyField("context id"));
        }

        Ok(Self {
            template,
            name_prefix,
            context_id,
            scope: None,
            parameters: HashMap::new(),
        })
    }

    /// Restricts the duplicate lookup (and the submission) to a scope,
    /// e.g. a project or experiment
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, Value>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Derived job name, used as the idempotency key
    pub fn job_name(&self) -> String {
        format!("{}-{}", self.name_prefix, self.context_id)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_name_joins_prefix_and_context() {
        let request = JobRequest::new("gs://foo/bar", "test", "ctx-1").unwrap();
        assert_eq!(request.job_name(), "test-ctx-1");
        assert_eq!(request.scope(), None);
    }

    #[test]
    fn test_rejects_blank_fields() {
        assert_eq!(
            JobRequest::new("", "test", "ctx-1"),
            Err(RequestError::EmptyField("template"))
        );
        assert_eq!(
            JobRequest::new("tpl", " ", "ctx-1"),
            Err(RequestError::EmptyField("name prefix"))
        );
        assert_eq!(
            JobRequest::new("tpl", "test", ""),
            Err(RequestError::EmptyField("context id"))
        );
    }

    #[test]
    fn test_parameters_accept_nested_values() {
        let request = JobRequest::new("tpl", "test", "ctx-1")
            .unwrap()
            .with_scope("project-1")
            .with_parameter("parameters", json!({ "foo": "bar" }))
            .with_parameter("retries", json!(3));

        assert_eq!(request.scope(), Some("project-1"));
        assert_eq!(request.parameters().len(), 2);
        assert_eq!(request.parameters()["parameters"]["foo"], json!("bar"));
    }
}
