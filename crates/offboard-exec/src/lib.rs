#![forbid(unsafe_code)]
//! offboard-exec: the batch orchestrator.
//!
//! Employees are processed strictly in input order on the calling thread.
//! Each one is isolated: a failed query, file write or send is recorded in the
//! run summary and the batch moves on.

pub mod metrics;
pub mod runtime;

pub use runtime::{Pipeline, PipelineError};
