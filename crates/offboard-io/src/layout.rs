//! Deterministic report file locations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use offboard_core::config::ReportConfig;

/// Where per-employee reports go and how they are named.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    output_dir: PathBuf,
    file_prefix: String,
}

impl ReportLayout {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
        }
    }

    pub fn from_config(cfg: &ReportConfig) -> Self {
        Self::new(&cfg.output_dir, cfg.file_prefix.clone())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `{prefix}{given}_{surname}` with spaces and path separators replaced
    /// by underscores, so every report stays inside `output_dir`.
    pub fn employee_stem(&self, given_name: &str, surname: &str) -> String {
        format!("{}{}_{}", self.file_prefix, given_name, surname)
            .replace([' ', '/', '\\'], "_")
    }

    pub fn employee_csv_path(&self, given_name: &str, surname: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.csv", self.employee_stem(given_name, surname)))
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.output_dir)
    }
}
