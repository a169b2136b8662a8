//! Directive list loader.
//!
//! The input is a delimited file with a header row naming the two name
//! columns and one CC column. Header labels are matched case-insensitively
//! after trimming; the CC column is the first configured candidate present.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use offboard_core::config::InputConfig;
use offboard_core::types::EmployeeDirective;

use crate::error::{Error, Result};
use crate::readers::csv::strip_bom;

/// Split a raw CC field into addresses.
///
/// Splits on `;` when present, otherwise on `,`, otherwise keeps the whole
/// string. Tokens are trimmed and empty tokens dropped.
pub fn split_emails(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let parts: Vec<&str> = if raw.contains(';') {
        raw.split(';').collect()
    } else if raw.contains(',') {
        raw.split(',').collect()
    } else {
        vec![raw]
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    surname: usize,
    given_name: usize,
    cc: usize,
}

#[derive(Debug, Clone)]
pub struct DirectiveLoader {
    config: InputConfig,
}

impl DirectiveLoader {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// Load directives from the configured path.
    pub fn load(&self) -> Result<Vec<EmployeeDirective>> {
        self.load_path(&self.config.path)
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Vec<EmployeeDirective>> {
        let file = std::fs::File::open(path.as_ref())?;
        self.load_reader(file)
    }

    /// Parse directives from any reader (file, in-memory buffer).
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<EmployeeDirective>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter()?)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let map = self.resolve_columns(&headers)?;

        let mut directives = Vec::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("");
            let cc = split_emails(field(map.cc));
            match EmployeeDirective::new(field(map.given_name), field(map.surname), cc) {
                Some(d) => directives.push(d),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "skipped directive rows with a blank name");
        }
        Ok(directives)
    }

    fn delimiter(&self) -> Result<u8> {
        let d = self.config.delimiter;
        if d.is_ascii() {
            Ok(d as u8)
        } else {
            Err(Error::Schema(format!(
                "delimiter {d:?} must be a single ASCII character"
            )))
        }
    }

    fn resolve_columns(&self, headers: &StringRecord) -> Result<ColumnMap> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| strip_bom(h).trim().to_lowercase())
            .collect();
        let find = |label: &str| {
            let label = label.trim().to_lowercase();
            normalized.iter().position(|h| *h == label)
        };

        let surname = find(self.config.surname_column.as_str());
        let given_name = find(self.config.given_name_column.as_str());

        let mut missing = Vec::new();
        if surname.is_none() {
            missing.push(self.config.surname_column.trim());
        }
        if given_name.is_none() {
            missing.push(self.config.given_name_column.trim());
        }
        missing.sort_unstable();

        let (Some(surname), Some(given_name)) = (surname, given_name) else {
            return Err(Error::Schema(format!(
                "input is missing required column(s): {}",
                missing.join(", ")
            )));
        };

        let cc = self
            .config
            .cc_columns
            .iter()
            .find_map(|candidate| find(candidate.as_str()))
            .ok_or_else(|| {
                let accepted: Vec<String> = self
                    .config
                    .cc_columns
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect();
                Error::Schema(format!(
                    "input is missing the CC email column; include one of: {}",
                    accepted.join(", ")
                ))
            })?;

        Ok(ColumnMap {
            surname,
            given_name,
            cc,
        })
    }
}

/// Load directives with the given input settings.
pub fn load_directives(config: &InputConfig) -> Result<Vec<EmployeeDirective>> {
    DirectiveLoader::new(config.clone()).load()
}
