//! CSV → XLSX conversion for email attachments, plus read-back.
//!
//! Every cell is written as a string so the workbook holds exactly the text of
//! the CSV; nothing is re-typed as a number or date on the way through.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{Error, Result};
use crate::readers::csv::{read_table, TextTable};

/// Extra characters of padding added to each auto-sized column.
const WIDTH_PADDING: usize = 2;

#[derive(Debug, Clone)]
pub struct XlsxOptions {
    pub sheet_name: String,
    pub max_column_width: usize,
}

impl Default for XlsxOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Hardware".to_string(),
            max_column_width: 80,
        }
    }
}

/// Width per column: the longer of the header and the longest cell (in
/// characters) plus padding, capped at `max_width`.
pub fn column_widths(table: &TextTable, max_width: usize) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let longest_cell = table
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            let content = header.chars().count().max(longest_cell);
            (content + WIDTH_PADDING).min(max_width)
        })
        .collect()
}

/// Write `table` as a single-sheet workbook at `path`.
pub fn write_workbook(path: impl AsRef<Path>, table: &TextTable, opts: &XlsxOptions) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    // Text-formatted blanks keep empty cells (and all-empty rows) in the sheet.
    let blank_format = Format::new().set_num_format("@");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&opts.sheet_name)?;

    for (col, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(col)?, header, &header_format)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(r + 1)
            .map_err(|_| Error::Schema(format!("row {r} exceeds the worksheet limit")))?;
        for (col, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                worksheet.write_blank(row_num, col_num(col)?, &blank_format)?;
            } else {
                worksheet.write_string(row_num, col_num(col)?, cell)?;
            }
        }
    }

    for (col, width) in column_widths(table, opts.max_column_width)
        .into_iter()
        .enumerate()
    {
        worksheet.set_column_width(col_num(col)?, width as f64)?;
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

fn col_num(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| Error::Schema(format!("column {col} exceeds the worksheet limit")))
}

/// Re-read a CSV written earlier and convert it to `<same stem>.xlsx`.
/// Returns the spreadsheet path.
pub fn convert_csv_to_xlsx(
    csv_path: impl AsRef<Path>,
    delimiter: u8,
    opts: &XlsxOptions,
) -> Result<PathBuf> {
    let csv_path = csv_path.as_ref();
    let xlsx_path = csv_path.with_extension("xlsx");
    let table = read_table(csv_path, delimiter)?;
    write_workbook(&xlsx_path, &table, opts)?;
    Ok(xlsx_path)
}

/// Read one sheet back as strings. The first row is the header; rows are
/// padded to the header width.
///
/// Blank cells are not part of the value range, so the row count comes from
/// the sheet's recorded dimensions. Trailing all-blank rows come back as rows
/// of empty strings.
pub fn read_workbook(path: impl AsRef<Path>, sheet_name: &str) -> Result<TextTable> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())?;
    let last_row = workbook
        .worksheet_cells_reader(sheet_name)?
        .dimensions()
        .end
        .0 as usize;
    let range = workbook.worksheet_range(sheet_name)?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

    let columns = rows.next().unwrap_or_default();
    let width = columns.len();
    let mut rows: Vec<Vec<String>> = rows
        .map(|mut row| {
            if row.len() < width {
                row.resize(width, String::new());
            }
            row
        })
        .collect();
    // the header sits on row 0, so `last_row` is also the data row count
    if !columns.is_empty() && rows.len() < last_row {
        rows.resize(last_row, vec![String::new(); width]);
    }

    Ok(TextTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_use_longest_of_header_and_cells_and_cap() {
        let table = TextTable {
            columns: vec!["SerialNo".into(), "D".into(), "Notes".into()],
            rows: vec![vec!["A1".into(), "Latitude 7440".into(), "x".repeat(200)]],
        };
        assert_eq!(column_widths(&table, 80), vec![10, 15, 80]);
    }

    #[test]
    fn blank_rows_survive_the_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.xlsx");
        let table = TextTable {
            columns: vec!["A".into(), "B".into()],
            rows: vec![
                vec!["1".into(), "2".into()],
                vec![String::new(), String::new()],
                vec![String::new(), "x".into()],
                vec![String::new(), String::new()],
            ],
        };
        write_workbook(&path, &table, &XlsxOptions::default()).unwrap();

        let back = read_workbook(&path, "Hardware").unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn widths_count_characters_not_bytes() {
        let table = TextTable {
            columns: vec!["Ort".into()],
            rows: vec![vec!["Zürich".into()]],
        };
        assert_eq!(column_widths(&table, 80), vec![8]);
    }
}
