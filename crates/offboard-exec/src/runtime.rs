//! Runtime: walk the directive batch in order and emit a RunSummary.
//!
//! Per employee:
//! - query the gateway;
//! - write the employee CSV, convert it to XLSX, append to the combined file;
//! - render the preview and compose the notification;
//! - hand it to the transport.
//!
//! A failure stops that employee at the failing stage and is recorded in the
//! summary. The gateway and transport are closed when the run ends, however
//! it ends.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use offboard_core::config::OffboardConfig;
use offboard_core::hash::{hash_reader, Hash256};
use offboard_core::summary::{EmployeeOutcome, OutcomeStatus, RunSummary, Stage};
use offboard_core::types::EmployeeDirective;

use offboard_gateway::AssetGateway;
use offboard_io::{DirectiveLoader, ReportMaterializer};
use offboard_notify::{Dispatcher, MailTransport};

use crate::metrics::stage_done;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("loading directives: {0}")]
    Load(#[source] offboard_io::Error),

    #[error("removing previous combined file: {0}")]
    Reset(#[source] offboard_io::Error),
}

impl From<PipelineError> for offboard_core::error::Error {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Load(inner) | PipelineError::Reset(inner) => inner.into(),
        }
    }
}

/// Pipeline owns the gateway, the report materializer, and the dispatcher.
#[derive(Debug)]
pub struct Pipeline<G: AssetGateway, T: MailTransport> {
    gateway: G,
    materializer: ReportMaterializer,
    dispatcher: Dispatcher<T>,
    summary_path: Option<PathBuf>,
}

/// A stage failure for one employee.
struct StageFailure {
    stage: Stage,
    reason: String,
}

fn at<E: std::fmt::Display>(stage: Stage) -> impl FnOnce(E) -> StageFailure {
    move |e| StageFailure {
        stage,
        reason: e.to_string(),
    }
}

impl<G: AssetGateway, T: MailTransport> Pipeline<G, T> {
    pub fn new(cfg: &OffboardConfig, gateway: G, transport: T) -> Self {
        Self {
            gateway,
            materializer: ReportMaterializer::new(&cfg.reports),
            dispatcher: Dispatcher::new(transport, &cfg.mail),
            summary_path: cfg.summary_path.as_ref().map(PathBuf::from),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    pub fn materializer(&self) -> &ReportMaterializer {
        &self.materializer
    }

    /// Load the directive list and run the batch.
    pub fn execute(&mut self, loader: &DirectiveLoader) -> Result<RunSummary, PipelineError> {
        let directives = match loader.load() {
            Ok(d) => d,
            Err(e) => {
                self.close();
                return Err(PipelineError::Load(e));
            }
        };
        self.run(&directives)
    }

    /// Process `directives` in order and return the run summary.
    pub fn run(&mut self, directives: &[EmployeeDirective]) -> Result<RunSummary, PipelineError> {
        let result = self.run_batch(directives);
        self.close();
        result
    }

    fn run_batch(&mut self, directives: &[EmployeeDirective]) -> Result<RunSummary, PipelineError> {
        let combined_path = self.materializer.combined_path().display().to_string();
        let mut summary = RunSummary::new(combined_path, now_millis());

        if directives.is_empty() {
            tracing::info!("no valid employees in the directive list; nothing to do");
            return Ok(summary.finish(now_millis(), None));
        }

        if self
            .materializer
            .reset_combined()
            .map_err(PipelineError::Reset)?
        {
            tracing::debug!(
                path = %self.materializer.combined_path().display(),
                "removed combined file from a previous run"
            );
        }

        let mut first_contribution = true;
        for directive in directives {
            let (outcome, written) = self.process_employee(directive, &mut first_contribution);
            summary.total_rows_written += written;
            summary.record(outcome);
        }

        let digest = digest_file(self.materializer.combined_path());
        let summary = summary.finish(now_millis(), digest);

        tracing::info!(
            employees = summary.outcomes.len(),
            sent = summary.sent_count(),
            failed = summary.failed_count(),
            rows = summary.total_rows_written,
            "batch finished"
        );

        if let Some(path) = &self.summary_path {
            if let Err(e) = write_summary(path, &summary) {
                tracing::error!(path = %path.display(), error = %e, "failed to write run summary");
            }
        }

        Ok(summary)
    }

    /// Handle one employee. Returns the outcome and the rows it added to the
    /// combined file.
    fn process_employee(
        &mut self,
        directive: &EmployeeDirective,
        first_contribution: &mut bool,
    ) -> (EmployeeOutcome, usize) {
        let mut outcome = EmployeeOutcome {
            given_name: directive.given_name.clone(),
            surname: directive.surname.clone(),
            to_address: self.dispatcher.recipient_for(directive),
            row_count: 0,
            status: OutcomeStatus::Sent,
        };
        let mut written = 0usize;

        let result = self.materialize_and_send(directive, first_contribution, &mut outcome, &mut written);
        match result {
            Ok(status) => outcome.status = status,
            Err(failure) => {
                tracing::error!(
                    employee = %directive.display_name(),
                    stage = %failure.stage,
                    error = %failure.reason,
                    "employee processing failed"
                );
                outcome.status = OutcomeStatus::Failed {
                    stage: failure.stage,
                    reason: failure.reason,
                };
            }
        }

        (outcome, written)
    }

    fn materialize_and_send(
        &mut self,
        directive: &EmployeeDirective,
        first_contribution: &mut bool,
        outcome: &mut EmployeeOutcome,
        written: &mut usize,
    ) -> Result<OutcomeStatus, StageFailure> {
        let table = self
            .gateway
            .fetch_assets(&directive.given_name, &directive.surname)
            .map_err(at(Stage::Query))?;
        let rows = table.num_rows();
        outcome.row_count = rows;
        stage_done(Stage::Query, directive, rows);

        let report = self
            .materializer
            .materialize(directive, table)
            .map_err(|e| StageFailure {
                stage: e.stage,
                reason: e.source.to_string(),
            })?;
        stage_done(Stage::EmployeeCsv, directive, rows);
        stage_done(Stage::Spreadsheet, directive, rows);

        let appended = self
            .materializer
            .append_combined(&report, *first_contribution)
            .map_err(at(Stage::CombinedAudit))?;
        // A header-only write leaves the slot open for the first employee
        // that actually has rows.
        if appended > 0 {
            *first_contribution = false;
        }
        *written = appended;
        stage_done(Stage::CombinedAudit, directive, appended);

        let table_html = self.materializer.preview_html(&report);
        let message = self.dispatcher.compose(
            directive,
            report.row_count(),
            &table_html,
            &report.xlsx_path,
        );

        let status = match self.dispatcher.dispatch(&message) {
            Ok(()) => OutcomeStatus::Sent,
            Err(e) => OutcomeStatus::SendFailed {
                reason: e.to_string(),
            },
        };
        stage_done(Stage::Send, directive, rows);
        Ok(status)
    }

    /// Release the gateway and transport connections.
    pub fn close(&mut self) {
        self.gateway.close();
        self.dispatcher.close();
    }
}

// --- helpers ---

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn digest_file(path: &Path) -> Option<Hash256> {
    let file = File::open(path).ok()?;
    match hash_reader(file) {
        Ok(h) => Some(h),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not hash combined file");
            None
        }
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> offboard_core::error::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, summary.to_json_pretty()?)?;
    Ok(())
}
