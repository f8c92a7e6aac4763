//! Scripted in-memory repository for tests

use async_trait::async_trait;
use jobwatch_client::{ClientError, Result};
use jobwatch_core::domain::job::{JobHandle, JobState, JobStatus, JobSummary};
use jobwatch_core::dto::job::SubmitJob;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::JobRepository;

/// Repository that replays scripted responses and counts calls
///
/// Status responses are consumed in order; once the script runs out the
/// fallback state (if any) is returned forever.
#[derive(Default)]
pub struct ScriptedJobRepository {
    jobs: Vec<JobSummary>,
    list_error: Mutex<Option<ClientError>>,
    submit_results: Mutex<VecDeque<Result<JobHandle>>>,
    statuses: Mutex<VecDeque<Result<JobStatus>>>,
    fallback: Option<JobStatus>,
    status_delay: Option<Duration>,
    submitted: Mutex<Vec<SubmitJob>>,
    list_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl ScriptedJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, id: &str, name: &str, state: Option<JobState>) -> Self {
        self.jobs.push(JobSummary {
            id: id.to_string(),
            name: name.to_string(),
            state,
        });
        self
    }

    pub fn with_list_error(self, error: ClientError) -> Self {
        *self.list_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_submit_result(self, result: Result<JobHandle>) -> Self {
        self.submit_results.lock().unwrap().push_back(result);
        self
    }

    pub fn with_states(self, id: &str, states: &[JobState]) -> Self {
        {
            let mut statuses = self.statuses.lock().unwrap();
            for state in states {
                statuses.push_back(Ok(JobStatus::new(state.clone()).with_id(id)));
            }
        }
        self
    }

    pub fn with_status(self, status: JobStatus) -> Self {
        self.statuses.lock().unwrap().push_back(Ok(status));
        self
    }

    pub fn with_status_error(self, error: ClientError) -> Self {
        self.statuses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_fallback(mut self, id: &str, state: JobState) -> Self {
        self.fallback = Some(JobStatus::new(state).with_id(id));
        self
    }

    /// Makes every status call take `delay` before answering
    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<SubmitJob> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRepository for ScriptedJobRepository {
    async fn list_jobs(&self, _scope: Option<&str>) -> Result<Vec<JobSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match self.list_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.jobs.clone()),
        }
    }

    async fn submit_job(&self, job: &SubmitJob) -> Result<JobHandle> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(job.clone());
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(JobHandle::new("job-1")))
    }

    async fn get_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.status_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(next) = self.statuses.lock().unwrap().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(status) => Ok(status.clone()),
            None => panic!("status script exhausted for {}", handle),
        }
    }
}
