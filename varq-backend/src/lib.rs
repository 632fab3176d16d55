//! Sampling execution abstraction
//!
//! This crate defines the contract between estimation code and anything
//! that can physically sample a quantum circuit:
//!
//! - [`SamplingBackend`]: submits a bound circuit for a fixed number of
//!   shots and hands back a job
//! - [`SamplingJob`] / [`SamplingResult`]: blocking handle and counts of a
//!   measurement
//! - [`CompositeSamplingJob`] / [`CompositeSamplingResult`]: one logical
//!   measurement split across several physical submissions
//!
//! The crate never executes circuits itself and carries no retry logic:
//! failures surface as [`BackendError`] exactly as the backend reported
//! them.

pub mod backend;
pub mod error;
pub mod job;
pub mod result;

// Re-exports for convenience
pub use backend::{ensure_positive_shots, SamplingBackend};
pub use error::{BackendError, Result};
pub use job::{
    ChannelSamplingJob, CompletedSamplingJob, CompositeSamplingJob, JobStatus, SamplingJob,
};
pub use result::{CompositeSamplingResult, CountsResult, SamplingCounts, SamplingResult};
