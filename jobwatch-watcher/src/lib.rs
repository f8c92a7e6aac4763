//! Jobwatch Watcher
//!
//! Starts a long-running job on a remote service at most once per
//! idempotency key, then waits for it to reach a terminal state.
//!
//! Architecture:
//! - Repository: the seam to the remote service (list, submit, status)
//! - Watcher: idempotent submission and the poll loop
//! - Context: correlation scopes that supply the context id of a run
//! - Secrets and configuration: opaque credentials and poll/timeout tuning
//!
//! The remote service owns every state transition. The watcher only submits
//! and reads.

pub mod config;
pub mod context;
pub mod error;
pub mod repository;
pub mod secrets;
pub mod watcher;

pub use config::WatchConfig;
pub use context::CorrelationScope;
pub use error::{Result, WatchError};
pub use repository::{HttpJobRepository, JobRepository};
pub use secrets::{SecretError, SecretStore};
pub use watcher::RemoteJobWatcher;
