//! Run summary for audit: what happened to every employee in a batch.
//!
//! The orchestrator fills one `EmployeeOutcome` per directive, in input order,
//! and finishes the summary with the combined audit file's digest.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-employee processing step, used to say where a failure stopped work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Query,
    EmployeeCsv,
    Spreadsheet,
    CombinedAudit,
    Send,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Query => "query",
            Stage::EmployeeCsv => "employee csv",
            Stage::Spreadsheet => "spreadsheet",
            Stage::CombinedAudit => "combined audit",
            Stage::Send => "send",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Sent,
    /// Reports were written but the notification could not be delivered.
    SendFailed { reason: String },
    /// Processing stopped before a notification was attempted.
    Failed { stage: Stage, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeOutcome {
    pub given_name: String,
    pub surname: String,
    pub to_address: String,
    pub row_count: usize,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl EmployeeOutcome {
    pub fn sent(&self) -> bool {
        matches!(self.status, OutcomeStatus::Sent)
    }
}

/// How the run ended, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The directive file held no usable rows.
    NoEmployees,
    /// Employees were processed but none had any assets.
    NoMatches,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: RunId,

    /// Crate version string for provenance.
    pub version: String,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,

    pub total_rows_written: usize,
    pub outcomes: Vec<EmployeeOutcome>,

    pub combined_path: String,
    /// blake3 of the combined audit file, when one was written.
    pub combined_digest: Option<Hash256>,
}

impl RunSummary {
    pub fn new(combined_path: impl Into<String>, started_ms: u64) -> Self {
        Self {
            id: RunId(Uuid::new_v4()),
            version: crate::VERSION.to_string(),
            started_ms,
            finished_ms: started_ms,
            total_rows_written: 0,
            outcomes: Vec::new(),
            combined_path: combined_path.into(),
            combined_digest: None,
        }
    }

    pub fn record(&mut self, outcome: EmployeeOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(mut self, finished_ms: u64, combined_digest: Option<Hash256>) -> Self {
        self.finished_ms = finished_ms;
        self.combined_digest = combined_digest;
        self
    }

    /// Wall time of the run; zero if the clock stepped backwards.
    pub fn duration_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.started_ms)
    }

    pub fn status(&self) -> RunStatus {
        if self.outcomes.is_empty() {
            RunStatus::NoEmployees
        } else if self.total_rows_written == 0 {
            RunStatus::NoMatches
        } else {
            RunStatus::Completed
        }
    }

    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.sent_count()
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
