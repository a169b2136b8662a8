//! Per-stage trace events.
//!
//! Kept to plain `tracing` so the binary decides where events go.

use offboard_core::summary::Stage;
use offboard_core::types::EmployeeDirective;

pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("offboard", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

/// Trace that `stage` finished for one employee.
pub fn stage_done(stage: Stage, directive: &EmployeeDirective, rows: usize) {
    emit_span(
        "stage_done",
        &[
            ("stage", stage.to_string()),
            ("employee", directive.display_name()),
            ("rows", rows.to_string()),
        ],
    );
}
