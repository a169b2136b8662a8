//! Directive and asset row types.
//!
//! The asset schema is whatever the gateway's query returns, so rows are kept
//! as ordered `(column, value)` pairs instead of a fixed struct.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One employee to process, plus the addresses to CC on their notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDirective {
    pub given_name: String,
    pub surname: String,
    pub cc_emails: Vec<String>,
}

impl EmployeeDirective {
    /// Build a directive, trimming both names. Returns `None` when either name
    /// is empty after trimming.
    pub fn new(given_name: &str, surname: &str, cc_emails: Vec<String>) -> Option<Self> {
        let given_name = given_name.trim();
        let surname = surname.trim();
        if given_name.is_empty() || surname.is_empty() {
            return None;
        }
        Some(Self {
            given_name: given_name.to_string(),
            surname: surname.to_string(),
            cc_emails,
        })
    }

    /// "Given Surname", as used in greetings and log lines.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }
}

/// A single named value in an asset row. `None` is a SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub name: String,
    pub value: Option<String>,
}

/// One asset row in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRow {
    pub cells: Vec<Cell>,
}

impl AssetRow {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.value.as_deref())
    }

    /// Cell values with NULLs rendered as empty strings.
    pub fn display_values(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.iter().map(|c| c.value.as_deref().unwrap_or(""))
    }
}

/// Result of one gateway lookup: the column list and rows aligned to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTable {
    pub columns: Vec<String>,
    pub rows: Vec<AssetRow>,
}

impl AssetTable {
    /// An empty result that still carries its schema.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Zip raw positional values with the column list.
    ///
    /// Every row must have exactly one value per column.
    pub fn from_values(columns: Vec<String>, values: Vec<Vec<Option<String>>>) -> Result<Self> {
        let mut rows = Vec::with_capacity(values.len());
        for (idx, row) in values.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::Schema(format!(
                    "row {} has {} values but the result has {} columns",
                    idx,
                    row.len(),
                    columns.len()
                )));
            }
            let cells = columns
                .iter()
                .zip(row)
                .map(|(name, value)| Cell {
                    name: name.clone(),
                    value,
                })
                .collect();
            rows.push(AssetRow { cells });
        }
        Ok(Self { columns, rows })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
