//! Readers for the directive list and for report files written earlier in a run.

pub mod csv;
pub mod directives;
