//! Remote job watcher
//!
//! Submits a job at most once per job name, then polls its status until the
//! remote service reports a terminal state or the wait budget runs out.

use jobwatch_core::domain::job::{JobHandle, JobState, JobStatus};
use jobwatch_core::domain::request::JobRequest;
use jobwatch_core::dto::job::SubmitJob;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::WatchConfig;
use crate::error::{Result, WatchError};
use crate::repository::JobRepository;

/// Watches a single remote job per call
///
/// The repository is passed in explicitly so tests can substitute a double.
pub struct RemoteJobWatcher {
    repository: Arc<dyn JobRepository>,
    config: WatchConfig,
}

impl RemoteJobWatcher {
    /// Creates a watcher over `repository`
    pub fn new(repository: Arc<dyn JobRepository>, config: WatchConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Returns the handle of the job named after `request`, submitting it
    /// first if no such job is listed
    ///
    /// When several listed jobs share the name, a non-terminal one wins.
    /// Lookup-then-submit is not atomic: two processes racing on the same
    /// name can still both submit.
    ///
    /// # Errors
    /// - `WatchError::Lookup` if listing fails (nothing is submitted)
    /// - `WatchError::Submission` if the service rejects the job (not retried)
    pub async fn ensure_running(&self, request: &JobRequest) -> Result<JobHandle> {
        let name = request.job_name();

        let jobs = self
            .repository
            .list_jobs(request.scope())
            .await
            .map_err(|source| WatchError::Lookup {
                name: name.clone(),
                source,
            })?;

        let existing = jobs
            .iter()
            .filter(|job| job.name == name)
            .min_by_key(|job| job.state.as_ref().is_some_and(JobState::is_terminal));

        if let Some(job) = existing {
            info!("Job {} already exists as {}, not resubmitting", name, job.id);
            return Ok(job.handle());
        }

        info!("Submitting job {} (template: {})", name, request.template());
        let handle = self
            .repository
            .submit_job(&SubmitJob::from(request))
            .await
            .map_err(|source| {
                error!("Submission of job {} rejected: {}", name, source);
                WatchError::Submission {
                    name: name.clone(),
                    source,
                }
            })?;

        info!("Submitted job {} as {}", name, handle);
        Ok(handle)
    }

    /// Polls `handle` until it reaches a terminal state
    ///
    /// Returns the DONE status. The elapsed time is checked after every
    /// non-terminal observation and the sleep before the next poll never
    /// overshoots the remaining budget.
    ///
    /// # Errors
    /// - `WatchError::RemoteJob` on FAILED or CANCELLED, carrying that status
    /// - `WatchError::Timeout` once `timeout` elapses without a terminal state
    /// - `WatchError::StatusFetch` on a non-transient fetch error, or when
    ///   transient errors outlast `max_fetch_retries`
    pub async fn wait_for_terminal(
        &self,
        handle: &JobHandle,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<JobStatus> {
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            let status = self.fetch_status(handle, started, timeout).await?;
            polls += 1;

            match &status.state {
                JobState::Done => {
                    info!(
                        "Job {} is done after {} poll(s) in {:?}",
                        handle,
                        polls,
                        started.elapsed()
                    );
                    return Ok(status);
                }
                JobState::Failed | JobState::Cancelled => {
                    error!("Job {} finished in state {}", handle, status.state);
                    return Err(WatchError::RemoteJob {
                        job_id: handle.id.clone(),
                        status: Box::new(status),
                    });
                }
                state => debug!("Job {} is {}", handle, state),
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                warn!(
                    "Gave up on job {} after {:?} ({} poll(s)); it keeps running remotely",
                    handle, elapsed, polls
                );
                return Err(WatchError::Timeout {
                    job_id: handle.id.clone(),
                    timeout,
                });
            }

            time::sleep(poll_interval.min(timeout - elapsed)).await;
        }
    }

    /// `wait_for_terminal` with the configured interval and timeout
    pub async fn wait(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.wait_for_terminal(handle, self.config.poll_interval, self.config.timeout)
            .await
    }

    /// Ensures the job is running, then waits for it with the configured
    /// interval and timeout
    pub async fn run(&self, request: &JobRequest) -> Result<JobStatus> {
        let span = info_span!("job", name = %request.job_name());

        async {
            let handle = self.ensure_running(request).await?;
            self.wait(&handle).await
        }
        .instrument(span)
        .await
    }

    /// Fetches one status snapshot, retrying transient failures with
    /// exponential backoff
    ///
    /// Each call and each backoff sleep is bounded by what is left of the
    /// wait budget. A budget exhausted while fetching or retrying is reported
    /// as a timeout.
    async fn fetch_status(
        &self,
        handle: &JobHandle,
        started: Instant,
        timeout: Duration,
    ) -> Result<JobStatus> {
        let mut attempt: u32 = 0;
        let mut delay = self.config.initial_backoff;

        loop {
            attempt += 1;

            let remaining = timeout.saturating_sub(started.elapsed());
            let fetched = time::timeout(remaining, self.repository.get_status(handle))
                .await
                .map_err(|_| {
                    warn!(
                        "Status call for job {} still pending when the {:?} budget ran out",
                        handle, timeout
                    );
                    WatchError::Timeout {
                        job_id: handle.id.clone(),
                        timeout,
                    }
                })?;

            match fetched {
                Ok(status) => {
                    if attempt > 1 {
                        info!(
                            "Fetched status of job {} after {} attempt(s)",
                            handle, attempt
                        );
                    }
                    return Ok(status);
                }
                Err(e) if e.is_transient() && attempt <= self.config.max_fetch_retries => {
                    let remaining = timeout.saturating_sub(started.elapsed());
                    if remaining.is_zero() {
                        return Err(WatchError::Timeout {
                            job_id: handle.id.clone(),
                            timeout,
                        });
                    }

                    warn!(
                        "Failed to fetch status of job {} (attempt {}/{}): {}",
                        handle,
                        attempt,
                        self.config.max_fetch_retries + 1,
                        e
                    );
                    warn!("Retrying in {:?}...", delay.min(remaining));

                    time::sleep(delay.min(remaining)).await;

                    // Exponential backoff with cap
                    delay = (delay * 2).min(self.config.max_backoff);
                }
                Err(source) => {
                    error!(
                        "Failed to fetch status of job {} after {} attempt(s): {}",
                        handle, attempt, source
                    );
                    return Err(WatchError::StatusFetch {
                        job_id: handle.id.clone(),
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }
}
