//! In-memory gateway for tests and dry runs.
//!
//! Holds a fixed column list and rows keyed by the owner's normalized name.

use std::collections::{HashMap, HashSet};

use offboard_core::types::AssetTable;

use crate::error::{Error, Result};
use crate::{normalize_name, AssetGateway};

type OwnerKey = (String, String);

#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    columns: Vec<String>,
    rows: HashMap<OwnerKey, Vec<Vec<Option<String>>>>,
    failing: HashSet<OwnerKey>,
    queries: usize,
    closed: bool,
}

impl MemoryGateway {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    fn key(given_name: &str, surname: &str) -> OwnerKey {
        (normalize_name(given_name), normalize_name(surname))
    }

    /// Assign one asset row to an employee. Values align with the columns.
    pub fn insert(&mut self, given_name: &str, surname: &str, values: Vec<Option<String>>) {
        self.rows
            .entry(Self::key(given_name, surname))
            .or_default()
            .push(values);
    }

    /// Make lookups for this employee fail with a query error.
    pub fn fail_for(&mut self, given_name: &str, surname: &str) {
        self.failing.insert(Self::key(given_name, surname));
    }

    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl AssetGateway for MemoryGateway {
    fn fetch_assets(&mut self, given_name: &str, surname: &str) -> Result<AssetTable> {
        if self.closed {
            return Err(Error::Connection("gateway already closed".into()));
        }
        self.queries += 1;

        let key = Self::key(given_name, surname);
        if self.failing.contains(&key) {
            return Err(Error::Query(format!(
                "lookup failed for {given_name} {surname}"
            )));
        }

        let values = self.rows.get(&key).cloned().unwrap_or_default();
        Ok(AssetTable::from_values(self.columns.clone(), values)?)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
