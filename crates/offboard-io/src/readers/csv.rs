//! Plain string tables read back from CSV report files.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::Result;

const UTF8_BOM: char = '\u{feff}';

/// Header plus string rows, exactly as they appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Strip a leading UTF-8 byte-order mark, as left by spreadsheet exports.
pub(crate) fn strip_bom(s: &str) -> &str {
    s.strip_prefix(UTF8_BOM).unwrap_or(s)
}

/// Read a whole CSV file with a header row. Short rows are padded with empty
/// strings so every row lines up with the header.
pub fn read_table(path: impl AsRef<Path>, delimiter: u8) -> Result<TextTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path.as_ref())?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { strip_bom(h) } else { h }.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() < columns.len() {
            row.resize(columns.len(), String::new());
        }
        rows.push(row);
    }

    Ok(TextTable { columns, rows })
}
