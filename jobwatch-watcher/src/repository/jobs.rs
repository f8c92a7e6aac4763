//! Jobs repository
//!
//! Handles communication with the remote service for job operations:
//! - Listing the jobs visible in a scope
//! - Submitting a job
//! - Fetching a job's status

use async_trait::async_trait;
use jobwatch_client::{Result, ServiceClient};
use jobwatch_core::domain::job::{JobHandle, JobStatus, JobSummary};
use jobwatch_core::dto::job::SubmitJob;

/// Repository trait for job operations against the remote service
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Lists jobs visible in `scope`
    async fn list_jobs(&self, scope: Option<&str>) -> Result<Vec<JobSummary>>;

    /// Submits a job and returns the handle the service assigned
    async fn submit_job(&self, job: &SubmitJob) -> Result<JobHandle>;

    /// Fetches a fresh status snapshot
    async fn get_status(&self, handle: &JobHandle) -> Result<JobStatus>;
}

/// HTTP implementation of JobRepository
#[derive(Debug, Clone)]
pub struct HttpJobRepository {
    client: ServiceClient,
}

impl HttpJobRepository {
    /// Creates a repository backed by `client`
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn list_jobs(&self, scope: Option<&str>) -> Result<Vec<JobSummary>> {
        self.client.list_jobs(scope).await
    }

    async fn submit_job(&self, job: &SubmitJob) -> Result<JobHandle> {
        self.client.submit_job(job).await
    }

    async fn get_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.client.get_job_status(&handle.id).await
    }
}
