#![forbid(unsafe_code)]
//! offboard-gateway: the asset lookup seam.
//!
//! The pipeline only sees [`AssetGateway`]. Matching on names is the
//! gateway's job: implementations compare trimmed, case-folded names.

pub mod error;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::{Error, Result};
pub use memory::MemoryGateway;
#[cfg(feature = "postgres")]
pub use postgres::PgAssetGateway;

use offboard_core::types::AssetTable;

/// Looks up the hardware assigned to one employee.
pub trait AssetGateway {
    /// Return the assets owned by (`given_name`, `surname`). An employee with
    /// nothing assigned yields an empty table that still carries its columns.
    fn fetch_assets(&mut self, given_name: &str, surname: &str) -> Result<AssetTable>;

    /// Release the underlying connection. Called once at the end of a run.
    fn close(&mut self) {}
}

impl<G: AssetGateway + ?Sized> AssetGateway for Box<G> {
    fn fetch_assets(&mut self, given_name: &str, surname: &str) -> Result<AssetTable> {
        (**self).fetch_assets(given_name, surname)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Normalize a name the way gateways compare it: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
