//! Report writers.

pub mod csv;
pub mod xlsx;
