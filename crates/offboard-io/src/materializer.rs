//! Per-employee report materialization.
//!
//! `materialize` writes the employee CSV and its XLSX conversion and hands back
//! an `EmployeeReport`; the combined append and the preview both read from
//! that report. A failed step is reported with its stage and earlier
//! artifacts are left in place.

use std::path::{Path, PathBuf};

use thiserror::Error;

use offboard_core::config::ReportConfig;
use offboard_core::summary::Stage;
use offboard_core::types::{AssetTable, EmployeeDirective};

use crate::error::{Error, Result};
use crate::html::build_html_table;
use crate::layout::ReportLayout;
use crate::writers::csv::{append_combined, write_table};
use crate::writers::xlsx::{convert_csv_to_xlsx, XlsxOptions};

/// Report files always use a comma, whatever the directive file uses.
pub const REPORT_DELIMITER: u8 = b',';

/// One employee's asset table and the files written for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeReport {
    pub table: AssetTable,
    pub csv_path: PathBuf,
    pub xlsx_path: PathBuf,
}

impl EmployeeReport {
    pub fn row_count(&self) -> usize {
        self.table.num_rows()
    }
}

/// A materialization step failed.
#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct MaterializeError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

fn at(stage: Stage) -> impl FnOnce(Error) -> MaterializeError {
    move |source| MaterializeError { stage, source }
}

#[derive(Debug, Clone)]
pub struct ReportMaterializer {
    layout: ReportLayout,
    xlsx: XlsxOptions,
    combined_path: PathBuf,
}

impl ReportMaterializer {
    pub fn new(cfg: &ReportConfig) -> Self {
        Self {
            layout: ReportLayout::from_config(cfg),
            xlsx: XlsxOptions {
                sheet_name: cfg.sheet_name.clone(),
                max_column_width: cfg.max_column_width,
            },
            combined_path: PathBuf::from(&cfg.combined_path),
        }
    }

    pub fn combined_path(&self) -> &Path {
        &self.combined_path
    }

    /// Write `{output_dir}/{prefix}{given}_{surname}.csv`; returns its path.
    pub fn write_employee_csv(
        &self,
        directive: &EmployeeDirective,
        table: &AssetTable,
    ) -> Result<PathBuf> {
        self.layout.ensure_output_dir()?;
        let path = self
            .layout
            .employee_csv_path(&directive.given_name, &directive.surname);
        write_table(&path, &table.columns, &table.rows)?;
        Ok(path)
    }

    /// Convert the employee CSV to the XLSX attachment; returns its path.
    pub fn write_spreadsheet(&self, csv_path: &Path) -> Result<PathBuf> {
        convert_csv_to_xlsx(csv_path, REPORT_DELIMITER, &self.xlsx)
    }

    /// Write the employee CSV, then its XLSX conversion.
    pub fn materialize(
        &self,
        directive: &EmployeeDirective,
        table: AssetTable,
    ) -> std::result::Result<EmployeeReport, MaterializeError> {
        let csv_path = self
            .write_employee_csv(directive, &table)
            .map_err(at(Stage::EmployeeCsv))?;
        let xlsx_path = self
            .write_spreadsheet(&csv_path)
            .map_err(at(Stage::Spreadsheet))?;
        Ok(EmployeeReport {
            table,
            csv_path,
            xlsx_path,
        })
    }

    /// Append the report's rows to the combined audit file; returns rows
    /// appended.
    pub fn append_combined(
        &self,
        report: &EmployeeReport,
        first_contribution: bool,
    ) -> Result<usize> {
        append_combined(
            &self.combined_path,
            &report.table.columns,
            &report.table.rows,
            first_contribution,
        )
    }

    /// Inline preview for the email body ("" when there are no rows).
    pub fn preview_html(&self, report: &EmployeeReport) -> String {
        build_html_table(&report.table)
    }

    /// Remove a combined file left over from an earlier run.
    pub fn reset_combined(&self) -> Result<bool> {
        if self.combined_path.exists() {
            std::fs::remove_file(&self.combined_path)?;
            return Ok(true);
        }
        Ok(false)
    }
}
