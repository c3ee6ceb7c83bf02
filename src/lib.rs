//! Flight delay risk scoring for logistics coordination.
//!
//! The scoring core lives in [`scoring`]; [`api`] exposes it over HTTP and
//! the binary adds a CLI around both.

pub mod api;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
