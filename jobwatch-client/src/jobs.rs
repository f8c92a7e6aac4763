//! Job-related API endpoints

use crate::ServiceClient;
use crate::error::{ClientError, Result};
use jobwatch_core::domain::job::{JobHandle, JobStatus, JobSummary};
use jobwatch_core::dto::job::{ListJobsQuery, SubmitJob};
use tracing::debug;

impl ServiceClient {
    // =============================================================================
    // Job Lookup
    // =============================================================================

    /// List the jobs visible in a scope
    ///
    /// # Arguments
    /// * `scope` - Project or experiment to restrict the listing to; `None` lists
    ///   everything the credentials can see
    ///
    /// # Returns
    /// A summary (id and name) of every visible job
    pub async fn list_jobs(&self, scope: Option<&str>) -> Result<Vec<JobSummary>> {
        let url = self.endpoint(&["api", "jobs"])?;
        let query = ListJobsQuery {
            scope: scope.map(str::to_string),
        };
        debug!("GET {} (scope: {:?})", url, scope);
        let response = self
            .authorize(self.client.get(url).query(&query))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the current status of a job
    ///
    /// # Arguments
    /// * `job_id` - Id assigned by the service at submission
    ///
    /// # Returns
    /// A fresh status snapshot
    pub async fn get_job_status(&self, job_id: &str) -> Result<JobStatus> {
        let url = self.endpoint(&["api", "jobs", job_id])?;
        debug!("GET {}", url);
        let response = self.authorize(self.client.get(url)).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Submit a new job
    ///
    /// # Arguments
    /// * `req` - The job submission body
    ///
    /// # Returns
    /// The handle the service assigned to the job
    ///
    /// # Example
    /// ```no_run
    /// # use jobwatch_client::ServiceClient;
    /// # use jobwatch_core::dto::job::SubmitJob;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ServiceClient::new("http://localhost:8080");
    /// let handle = client.submit_job(&SubmitJob {
    ///     name: "nightly-20240101".to_string(),
    ///     template: "pipeline.tar.gz".to_string(),
    ///     scope: None,
    ///     parameters: Default::default(),
    /// }).await?;
    /// println!("submitted {}", handle);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_job(&self, req: &SubmitJob) -> Result<JobHandle> {
        if req.name.is_empty() {
            return Err(ClientError::InvalidRequest("job name is empty".to_string()));
        }

        let url = self.endpoint(&["api", "jobs"])?;
        debug!("POST {} (name: {})", url, req.name);
        let response = self.authorize(self.client.post(url).json(req)).send().await?;

        self.handle_response(response).await
    }
}
