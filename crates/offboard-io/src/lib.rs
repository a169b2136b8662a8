#![forbid(unsafe_code)]
//! offboard-io: everything that touches report files.
//!
//! - `readers::directives` loads the employee directive list.
//! - `readers::csv` re-reads tabular report files.
//! - `writers::csv` writes per-employee and combined audit CSVs.
//! - `writers::xlsx` converts a CSV into the single-sheet attachment.
//! - `html` renders the inline preview table for email bodies.
//! - `materializer` ties the above together per employee.

pub mod error;
pub mod html;
pub mod layout;
pub mod materializer;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
pub use layout::ReportLayout;
pub use materializer::{EmployeeReport, MaterializeError, ReportMaterializer};
pub use readers::csv::TextTable;
pub use readers::directives::{load_directives, split_emails, DirectiveLoader};
