//! Pipeline configuration that the CLI builds once and hands to the pipeline.
//!
//! Layering: `Default` → optional YAML file → `OFFBOARD_*` environment
//! variables → command-line flags (applied by the binary).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default asset lookup. Every column is cast to text so rows can be read
/// generically; aliases become the report headers.
pub const DEFAULT_ASSET_QUERY: &str = r#"SELECT
    va.manufacturer_name::text AS "ManufacturerName",
    va.device_description::text AS "DeviceDescription",
    va.type_description::text AS "TypeDescription",
    a.description::text AS "Description",
    a.serial_no::text AS "SerialNo",
    e.surname::text AS "Surname",
    e.given_name::text AS "GivenName",
    e.location::text AS "Location",
    e.manager_ad_login::text AS "ManagerADLogin"
FROM assets AS a
JOIN asset_list AS va ON va.id = a.id
JOIN employee AS e ON va.employee_id = e.id
WHERE LOWER(TRIM(e.given_name)) = LOWER(TRIM($1))
  AND LOWER(TRIM(e.surname)) = LOWER(TRIM($2))"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OffboardConfig {
    pub input: InputConfig,
    pub reports: ReportConfig,
    pub mail: MailConfig,
    pub database: DatabaseConfig,

    /// Where to write the JSON run summary, if anywhere.
    pub summary_path: Option<String>,
}

/// Directive file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: String,
    pub delimiter: char,
    pub surname_column: String,
    pub given_name_column: String,
    /// CC column candidates in priority order; the first present wins.
    pub cc_columns: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: "employeesInput.csv".to_string(),
            delimiter: ',',
            surname_column: "Surname".to_string(),
            given_name_column: "GivenName".to_string(),
            cc_columns: vec![
                "Email".to_string(),
                "EmailAddress".to_string(),
                "CC".to_string(),
                "Cc".to_string(),
            ],
        }
    }
}

/// Report artifact locations and spreadsheet formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: String,
    /// Prepended to `{given}_{surname}` for per-employee files.
    pub file_prefix: String,
    pub combined_path: String,
    pub sheet_name: String,
    pub max_column_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: "out".to_string(),
            file_prefix: "hardware_".to_string(),
            combined_path: "hardwareOutput.csv".to_string(),
            sheet_name: "Hardware".to_string(),
            max_column_width: 80,
        }
    }
}

/// Plain SMTP relay settings (no auth, no TLS).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Name announced in EHLO; the local hostname when unset.
    pub hello_name: Option<String>,
    pub sender: String,
    pub recipient_domain: String,
    pub subject: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 25,
            hello_name: None,
            sender: "noreply@example.com".to_string(),
            recipient_domain: "example.com".to_string(),
            subject: "IT Equipment Return (Offboarding)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub asset_query: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/assets".to_string(),
            asset_query: DEFAULT_ASSET_QUERY.to_string(),
        }
    }
}

impl OffboardConfig {
    /// Parse a YAML document; missing keys fall back to defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    /// Overlay environment variables on top of the current values.
    ///
    /// Environment variables:
    /// - `OFFBOARD_INPUT_PATH`: directive file
    /// - `OFFBOARD_CSV_DELIMITER`: single character delimiter
    /// - `OFFBOARD_OUTPUT_DIR`: per-employee report directory
    /// - `OFFBOARD_COMBINED_PATH`: combined audit file
    /// - `OFFBOARD_SMTP_HOST`, `OFFBOARD_SMTP_PORT`, `OFFBOARD_SMTP_HELLO`
    /// - `OFFBOARD_SENDER`, `OFFBOARD_RECIPIENT_DOMAIN`, `OFFBOARD_SUBJECT`
    /// - `OFFBOARD_DATABASE_URL` (falls back to `DATABASE_URL`)
    /// - `OFFBOARD_SUMMARY_PATH`: JSON run summary
    pub fn apply_env(&mut self) {
        if let Ok(s) = std::env::var("OFFBOARD_INPUT_PATH") {
            self.input.path = s;
        }

        if let Ok(s) = std::env::var("OFFBOARD_CSV_DELIMITER") {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                self.input.delimiter = c;
            }
        }

        if let Ok(s) = std::env::var("OFFBOARD_OUTPUT_DIR") {
            self.reports.output_dir = s;
        }

        if let Ok(s) = std::env::var("OFFBOARD_COMBINED_PATH") {
            self.reports.combined_path = s;
        }

        if let Ok(s) = std::env::var("OFFBOARD_SMTP_HOST") {
            self.mail.smtp_host = s;
        }

        if let Ok(s) = std::env::var("OFFBOARD_SMTP_PORT") {
            if let Ok(v) = s.parse::<u16>() {
                self.mail.smtp_port = v;
            }
        }

        if let Ok(s) = std::env::var("OFFBOARD_SMTP_HELLO") {
            self.mail.hello_name = Some(s);
        }

        if let Ok(s) = std::env::var("OFFBOARD_SENDER") {
            self.mail.sender = s;
        }

        if let Ok(s) = std::env::var("OFFBOARD_RECIPIENT_DOMAIN") {
            self.mail.recipient_domain = s;
        }

        if let Ok(s) = std::env::var("OFFBOARD_SUBJECT") {
            self.mail.subject = s;
        }

        if let Ok(s) =
            std::env::var("OFFBOARD_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
        {
            self.database.url = s;
        }

        if let Ok(s) = std::env::var("OFFBOARD_SUMMARY_PATH") {
            self.summary_path = Some(s);
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.input.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter {:?} must be a single ASCII character",
                self.input.delimiter
            )));
        }
        if self.input.surname_column.trim().is_empty()
            || self.input.given_name_column.trim().is_empty()
        {
            return Err(Error::Config("name column labels cannot be empty".into()));
        }
        if self.input.cc_columns.is_empty() {
            return Err(Error::Config("at least one CC column name is required".into()));
        }
        if self.reports.max_column_width == 0 {
            return Err(Error::Config("max_column_width must be positive".into()));
        }
        if self.reports.sheet_name.trim().is_empty() {
            return Err(Error::Config("sheet_name cannot be empty".into()));
        }
        if self.mail.recipient_domain.trim().is_empty() {
            return Err(Error::Config("recipient_domain cannot be empty".into()));
        }
        if self.mail.sender.trim().is_empty() {
            return Err(Error::Config("sender cannot be empty".into()));
        }
        Ok(())
    }
}
