//! Data Transfer Objects for the remote job service
//!
//! Bodies and query strings sent over the wire. Responses deserialize
//! straight into the domain types.

pub mod job;
