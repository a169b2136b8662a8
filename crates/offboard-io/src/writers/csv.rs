//! CSV report writers: the per-employee table and the combined audit file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use offboard_core::types::AssetRow;

use crate::error::Result;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_rows<W: Write>(
    writer: W,
    columns: Option<&[String]>,
    rows: &[AssetRow],
) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(writer);
    if let Some(columns) = columns {
        w.write_record(columns)?;
    }
    for row in rows {
        w.write_record(row.display_values())?;
    }
    w.flush()?;
    Ok(())
}

/// Write `columns` as a header followed by `rows`, truncating any existing
/// file. NULL cells become empty strings.
pub fn write_table(path: impl AsRef<Path>, columns: &[String], rows: &[AssetRow]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let file = File::create(path)?;
    write_rows(file, Some(columns), rows)
}

/// Append one employee's rows to the combined audit file.
///
/// The header is written only when `first_contribution` is set, and then the
/// file is truncated first. An empty first contribution still produces a
/// header-only file; an empty later contribution leaves the file untouched.
/// Returns the number of rows appended.
pub fn append_combined(
    path: impl AsRef<Path>,
    columns: &[String],
    rows: &[AssetRow],
    first_contribution: bool,
) -> Result<usize> {
    let path = path.as_ref();
    if rows.is_empty() && !first_contribution {
        return Ok(0);
    }

    ensure_parent(path)?;
    let file = if first_contribution {
        File::create(path)?
    } else {
        OpenOptions::new().create(true).append(true).open(path)?
    };

    let header = first_contribution.then_some(columns);
    write_rows(file, header, rows)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use offboard_core::types::AssetTable;

    fn table(values: Vec<Vec<Option<&str>>>) -> AssetTable {
        AssetTable::from_values(
            vec!["A".into(), "B".into()],
            values
                .into_iter()
                .map(|r| r.into_iter().map(|v| v.map(str::to_string)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn null_cells_are_written_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/t.csv");
        let t = table(vec![vec![Some("1"), None]]);
        write_table(&path, &t.columns, &t.rows).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A,B\n1,\n");
    }

    #[test]
    fn empty_later_contribution_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.csv");
        let t = table(vec![]);
        assert_eq!(append_combined(&path, &t.columns, &t.rows, false).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn first_contribution_truncates_stale_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.csv");
        fs::write(&path, "stale\n").unwrap();

        let t = table(vec![]);
        assert_eq!(append_combined(&path, &t.columns, &t.rows, true).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "A,B\n");

        let t = table(vec![vec![Some("x"), Some("y")]]);
        assert_eq!(append_combined(&path, &t.columns, &t.rows, false).unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "A,B\nx,y\n");
    }
}
