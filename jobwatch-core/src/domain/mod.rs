//! Core domain types
//!
//! These types describe jobs as the remote service reports them. The remote
//! service owns every state transition; the types here are read-only snapshots
//! plus the immutable request used to start a job.

pub mod job;
pub mod request;
