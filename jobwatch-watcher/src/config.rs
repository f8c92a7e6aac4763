//! Watcher configuration
//!
//! Poll cadence, the overall wait budget and the retry policy for transient
//! status-fetch failures.

use std::time::Duration;

use crate::error::{Result, WatchError};

/// Watcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Delay between consecutive status polls (zero is allowed)
    pub poll_interval: Duration,

    /// Overall budget for waiting on a terminal state
    pub timeout: Duration,

    /// How many times a transient status-fetch failure is retried
    pub max_fetch_retries: u32,

    /// First backoff delay after a transient failure, doubled per retry
    pub initial_backoff: Duration,

    /// Upper bound on the backoff delay
    pub max_backoff: Duration,
}

impl WatchConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60 * 24);

    /// Creates a configuration with default retry settings
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
            max_fetch_retries: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables (all optional, unparsable values fall
    /// back to the defaults):
    /// - JOBWATCH_POLL_INTERVAL (seconds, default: 30)
    /// - JOBWATCH_TIMEOUT (seconds, default: 86400)
    /// - JOBWATCH_MAX_FETCH_RETRIES (default: 5)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seconds = |key: &str| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        let mut config = Self::default();
        if let Some(poll_interval) = seconds("JOBWATCH_POLL_INTERVAL") {
            config.poll_interval = poll_interval;
        }
        if let Some(timeout) = seconds("JOBWATCH_TIMEOUT") {
            config.timeout = timeout;
        }
        if let Some(retries) = lookup("JOBWATCH_MAX_FETCH_RETRIES")
            .and_then(|s| s.trim().parse::<u32>().ok())
        {
            config.max_fetch_retries = retries;
        }
        config
    }

    /// Overrides the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Overrides the wait budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(WatchError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_backoff < self.initial_backoff {
            return Err(WatchError::InvalidConfig(
                "max_backoff must not be shorter than initial_backoff".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POLL_INTERVAL, Self::DEFAULT_TIMEOUT)
    }
}
