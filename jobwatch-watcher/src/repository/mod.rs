//! Repository layer
//!
//! Repositories abstract communication with the remote job service. They
//! carry no decision logic; the watcher decides what to call and when.
//!
//! The trait is the injection point for test doubles.

mod jobs;
#[cfg(test)]
pub(crate) mod mock;

pub use jobs::{HttpJobRepository, JobRepository};
