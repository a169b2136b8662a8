#![forbid(unsafe_code)]
//! offboard-core: shared types for the offboarding pipeline.
//!
//! Directives, asset tables, configuration, the error taxonomy, and the run
//! summary live here. No network or database access happens in this crate;
//! the only I/O is reading an optional YAML config file.

pub mod config;
pub mod error;
pub mod hash;
pub mod summary;
pub mod types;

/// Crate version, recorded in run summaries for provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
