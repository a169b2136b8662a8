//! End-to-end pipeline tests over the in-memory gateway and transport

use offboard_core::config::OffboardConfig;
use offboard_core::summary::{OutcomeStatus, RunStatus, Stage};
use offboard_core::types::EmployeeDirective;
use offboard_exec::Pipeline;
use offboard_gateway::MemoryGateway;
use offboard_io::DirectiveLoader;
use offboard_notify::MemoryTransport;
use std::fs;
use std::path::Path;

const COLUMNS: [&str; 3] = ["ManufacturerName", "SerialNo", "Description"];

fn config(dir: &Path) -> OffboardConfig {
    let mut cfg = OffboardConfig::default();
    cfg.input.path = dir.join("employeesInput.csv").display().to_string();
    cfg.reports.output_dir = dir.join("out").display().to_string();
    cfg.reports.combined_path = dir.join("hardwareOutput.csv").display().to_string();
    cfg
}

fn gateway() -> MemoryGateway {
    let mut g = MemoryGateway::new(COLUMNS.iter().map(|c| c.to_string()).collect());
    g.insert(
        "Jane",
        "Doe",
        vec![Some("Dell".into()), Some("SN-1".into()), Some("Laptop".into())],
    );
    g.insert(
        "Jane",
        "Doe",
        vec![Some("Dell".into()), Some("SN-2".into()), None],
    );
    g.insert(
        "Rick",
        "Roe",
        vec![Some("HP".into()), Some("SN-3".into()), Some("Monitor".into())],
    );
    g
}

fn directive(given: &str, surname: &str, cc: &[&str]) -> EmployeeDirective {
    EmployeeDirective::new(given, surname, cc.iter().map(|c| c.to_string()).collect())
        .expect("directive")
}

#[test]
fn test_single_header_when_first_employee_has_no_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());

    let summary = pipeline
        .run(&[
            directive("John", "Smith", &[]),
            directive("Jane", "Doe", &[]),
            directive("Nobody", "Here", &[]),
        ])
        .expect("run");

    assert_eq!(summary.status(), RunStatus::Completed);
    assert_eq!(summary.total_rows_written, 2);

    let combined = fs::read_to_string(&cfg.reports.combined_path).expect("combined");
    assert_eq!(
        combined,
        "ManufacturerName,SerialNo,Description\nDell,SN-1,Laptop\nDell,SN-2,\n"
    );
    assert_eq!(combined.matches("ManufacturerName").count(), 1);
    assert!(summary.combined_digest.is_some());

    // every employee still gets reports and a notification
    assert_eq!(pipeline.transport().sent().len(), 3);
    for stem in ["hardware_John_Smith", "hardware_Jane_Doe", "hardware_Nobody_Here"] {
        assert!(dir.path().join("out").join(format!("{stem}.csv")).exists());
        assert!(dir.path().join("out").join(format!("{stem}.xlsx")).exists());
    }
}

#[test]
fn test_send_failure_does_not_stop_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    let mut transport = MemoryTransport::new();
    transport.fail_for("rick.roe@example.com");
    let mut pipeline = Pipeline::new(&cfg, gateway(), transport);

    let summary = pipeline
        .run(&[
            directive("Jane", "Doe", &["boss@example.com"]),
            directive("Rick", "Roe", &[]),
            directive("John", "Smith", &[]),
        ])
        .expect("run");

    assert!(summary.outcomes[0].sent());
    assert!(matches!(
        summary.outcomes[1].status,
        OutcomeStatus::SendFailed { .. }
    ));
    assert!(summary.outcomes[2].sent());
    assert_eq!(summary.sent_count(), 2);
    assert_eq!(summary.failed_count(), 1);

    // the failed employee's rows are still in the audit file
    assert_eq!(summary.total_rows_written, 3);
    let combined = fs::read_to_string(&cfg.reports.combined_path).expect("combined");
    assert!(combined.contains("SN-3"));

    let sent: Vec<&str> = pipeline
        .transport()
        .sent()
        .iter()
        .map(|m| m.to.as_str())
        .collect();
    assert_eq!(sent, vec!["jane.doe@example.com", "john.smith@example.com"]);
    assert_eq!(pipeline.transport().sent()[0].cc, vec!["boss@example.com"]);

    for stem in ["hardware_Jane_Doe", "hardware_Rick_Roe", "hardware_John_Smith"] {
        assert!(dir.path().join("out").join(format!("{stem}.csv")).exists());
        assert!(dir.path().join("out").join(format!("{stem}.xlsx")).exists());
    }
}

#[test]
fn test_spreadsheet_failure_isolated_to_one_employee() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    // a directory where Jane's attachment should go
    fs::create_dir_all(dir.path().join("out/hardware_Jane_Doe.xlsx")).expect("mkdir");
    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());

    let summary = pipeline
        .run(&[
            directive("Jane", "Doe", &[]),
            directive("Rick", "Roe", &[]),
            directive("John", "Smith", &[]),
        ])
        .expect("run");

    match &summary.outcomes[0].status {
        OutcomeStatus::Failed { stage, .. } => assert_eq!(*stage, Stage::Spreadsheet),
        other => panic!("expected spreadsheet failure, got {other:?}"),
    }
    assert!(summary.outcomes[1].sent());
    assert!(summary.outcomes[2].sent());
    assert_eq!(summary.failed_count(), 1);

    // Jane never reached the combined file, so Rick's append carries the header
    assert_eq!(summary.total_rows_written, 1);
    let combined = fs::read_to_string(&cfg.reports.combined_path).expect("combined");
    assert_eq!(
        combined,
        "ManufacturerName,SerialNo,Description\nHP,SN-3,Monitor\n"
    );

    let sent: Vec<&str> = pipeline
        .transport()
        .sent()
        .iter()
        .map(|m| m.to.as_str())
        .collect();
    assert_eq!(sent, vec!["rick.roe@example.com", "john.smith@example.com"]);

    assert!(dir.path().join("out/hardware_Jane_Doe.csv").exists());
    for stem in ["hardware_Rick_Roe", "hardware_John_Smith"] {
        assert!(dir.path().join("out").join(format!("{stem}.csv")).exists());
        assert!(dir.path().join("out").join(format!("{stem}.xlsx")).is_file());
    }
}

#[test]
fn test_query_failure_recorded_with_stage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    let mut g = gateway();
    g.fail_for("Jane", "Doe");
    let mut pipeline = Pipeline::new(&cfg, g, MemoryTransport::new());

    let summary = pipeline
        .run(&[directive("Jane", "Doe", &[]), directive("Rick", "Roe", &[])])
        .expect("run");

    match &summary.outcomes[0].status {
        OutcomeStatus::Failed { stage, .. } => assert_eq!(*stage, Stage::Query),
        other => panic!("expected query failure, got {other:?}"),
    }
    assert!(!dir.path().join("out/hardware_Jane_Doe.csv").exists());
    assert!(summary.outcomes[1].sent());
    assert_eq!(pipeline.gateway().queries(), 2);
}

#[test]
fn test_zero_row_employee_gets_nothing_found_mail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());

    let summary = pipeline
        .run(&[directive("John", "Smith", &[])])
        .expect("run");
    assert_eq!(summary.status(), RunStatus::NoMatches);
    assert_eq!(summary.outcomes[0].row_count, 0);

    let msg = &pipeline.transport().sent()[0];
    assert_eq!(msg.to, "john.smith@example.com");
    assert!(msg.html_body.contains("could not find any hardware"));
    assert!(!msg.html_body.contains("<table"));
    assert!(msg.attachment_path.ends_with("hardware_John_Smith.xlsx"));

    // header-only combined file from the first (empty) contribution
    let combined = fs::read_to_string(&cfg.reports.combined_path).expect("combined");
    assert_eq!(combined, "ManufacturerName,SerialNo,Description\n");
}

#[test]
fn test_equipment_mail_embeds_preview_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());

    pipeline
        .run(&[directive("  jane ", "DOE", &[])])
        .expect("run");

    let msg = &pipeline.transport().sent()[0];
    assert_eq!(msg.to, "jane.doe@example.com");
    assert_eq!(msg.subject, "IT Equipment Return (Offboarding)");
    assert!(msg.html_body.contains("Dear jane DOE,"));
    assert!(msg.html_body.contains("<table"));
    assert!(msg.html_body.contains("SN-2"));
    assert!(msg.html_body.contains("attached as an Excel file"));
    assert!(msg.attachment_path.ends_with("hardware_jane_DOE.xlsx"));
}

#[test]
fn test_previous_combined_file_removed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    fs::write(&cfg.reports.combined_path, "stale,data\n1,2\n").expect("write");

    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());
    pipeline
        .run(&[directive("Rick", "Roe", &[])])
        .expect("run");

    let combined = fs::read_to_string(&cfg.reports.combined_path).expect("combined");
    assert!(!combined.contains("stale"));
    assert_eq!(
        combined,
        "ManufacturerName,SerialNo,Description\nHP,SN-3,Monitor\n"
    );
}

#[test]
fn test_no_employees_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    fs::write(&cfg.input.path, "Surname,GivenName,Email\n,,\n").expect("write");
    fs::write(&cfg.reports.combined_path, "keep").expect("write");

    let loader = DirectiveLoader::new(cfg.input.clone());
    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());
    let summary = pipeline.execute(&loader).expect("execute");

    assert_eq!(summary.status(), RunStatus::NoEmployees);
    assert_eq!(pipeline.gateway().queries(), 0);
    assert!(pipeline.transport().sent().is_empty());
    assert_eq!(
        fs::read_to_string(&cfg.reports.combined_path).expect("combined"),
        "keep"
    );
}

#[test]
fn test_schema_error_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    fs::write(&cfg.input.path, "Surname,GivenName\nDoe,Jane\n").expect("write");

    let loader = DirectiveLoader::new(cfg.input.clone());
    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());
    let err = pipeline.execute(&loader).expect_err("should fail");

    let core: offboard_core::error::Error = err.into();
    assert!(core.is_fatal());
    assert!(pipeline.gateway().is_closed());
}

#[test]
fn test_summary_json_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cfg = config(dir.path());
    let summary_path = dir.path().join("runs/summary.json");
    cfg.summary_path = Some(summary_path.display().to_string());

    let mut transport = MemoryTransport::new();
    transport.fail_for("jane.doe@example.com");
    let mut pipeline = Pipeline::new(&cfg, gateway(), transport);
    let summary = pipeline
        .run(&[directive("Jane", "Doe", &[]), directive("Rick", "Roe", &[])])
        .expect("run");

    let text = fs::read_to_string(&summary_path).expect("summary file");
    let json: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(json["id"], summary.id.to_string());
    assert_eq!(json["total_rows_written"], 3);
    assert_eq!(json["outcomes"][0]["status"], "send_failed");
    assert_eq!(json["outcomes"][1]["status"], "sent");
    assert_eq!(json["outcomes"][1]["to_address"], "rick.roe@example.com");
}

#[test]
fn test_connections_closed_after_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path());
    let mut pipeline = Pipeline::new(&cfg, gateway(), MemoryTransport::new());
    pipeline
        .run(&[directive("Jane", "Doe", &[])])
        .expect("run");
    assert!(pipeline.gateway().is_closed());
    assert!(pipeline.transport().is_closed());
}
