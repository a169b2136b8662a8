#![forbid(unsafe_code)]
//! offboard: hardware-recovery reports and notifications for departing
//! employees.
//!
//! Facade over the workspace crates; the binary lives in `offboard-cli`.

pub use offboard_core::config::OffboardConfig;
pub use offboard_core::summary::{RunStatus, RunSummary};
pub use offboard_exec::{Pipeline, PipelineError};
pub use offboard_gateway::{AssetGateway, MemoryGateway};
pub use offboard_io::DirectiveLoader;
pub use offboard_notify::{MailTransport, MemoryTransport};
