//! Jobwatch Core
//!
//! Core types shared by the jobwatch crates.
//!
//! This crate contains:
//! - Domain types: job requests, handles, summaries and status snapshots
//! - DTOs: request bodies sent to the remote job service

pub mod domain;
pub mod dto;
