// crates/webssotest-core/tests/audit.rs
// ============================================================================
// Module: Run Audit Sink Tests
// Description: JSON-line output of the file audit sink.
// ============================================================================
//! ## Overview
//! Runs a small suite through a [`FileAuditSink`] and reads back the log.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use serde_json::Value;
use support::FixedStatusCase;
use support::RecordingMockedEntity;
use support::TestResult;
use support::ensure;
use support::idp_metadata;
use support::mocked_sp_metadata;
use webssotest_core::FileAuditSink;
use webssotest_core::RunAuditEvent;
use webssotest_core::RunAuditKind;
use webssotest_core::RunAuditSink;
use webssotest_core::RunOptions;
use webssotest_core::StaticArtifactSource;
use webssotest_core::SuiteBuilder;
use webssotest_core::SuiteLifecycle;
use webssotest_core::SuiteRunner;
use webssotest_core::TestRole;
use webssotest_core::TestStatus;

#[test]
fn file_sink_writes_one_json_line_per_event() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("run-audit.jsonl");
    let sink = FileAuditSink::new(&path)?;
    let suite = SuiteBuilder::new("logged", TestRole::IdP, mocked_sp_metadata())
        .metadata_case(FixedStatusCase::new("always passes", TestStatus::Pass))
        .build()?;
    let source = StaticArtifactSource::new(idp_metadata(1));
    let runner = SuiteRunner::new(&source, &sink, RunOptions::default());

    runner.run_suite(&suite, &mut RecordingMockedEntity::default())?;

    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<Value> =
        content.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
    ensure(lines.len() == 4, format!("expected four events, got {}", lines.len()))?;
    let events: Vec<&str> = lines.iter().filter_map(|line| line["event"].as_str()).collect();
    ensure(
        events == vec!["suite_started", "suite_configured", "case_finished", "suite_finished"],
        format!("unexpected events {events:?}"),
    )?;
    ensure(lines[2]["outcome"] == "PASS", "case outcome label")?;
    ensure(lines[2]["case_index"] == 0, "case index")?;
    ensure(lines[2]["description"] == "always passes", "case description")?;
    ensure(lines.iter().all(|line| line["suite"] == "logged" && line["role"] == "idp"), "labels")?;
    Ok(())
}

#[test]
fn file_sink_appends_across_instances() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("append.jsonl");
    let event = RunAuditEvent::suite(
        RunAuditKind::SuiteAborted,
        "appended",
        TestRole::SP,
        SuiteLifecycle::Aborted,
        Some("mocked metadata rejected".to_string()),
    );
    FileAuditSink::new(&path)?.record(&event);
    FileAuditSink::new(&path)?.record(&event);

    let content = std::fs::read_to_string(&path)?;
    ensure(content.lines().count() == 2, "second sink appends")?;
    let first: Value = serde_json::from_str(content.lines().next().unwrap_or_default())?;
    ensure(first["lifecycle"] == "aborted", "lifecycle label")?;
    ensure(first["detail"] == "mocked metadata rejected", "detail")?;
    ensure(first["timestamp_ms"].is_u64(), "timestamp present")?;
    Ok(())
}

#[test]
fn event_kind_labels_are_stable() {
    let kinds = [
        (RunAuditKind::SuiteStarted, "suite_started"),
        (RunAuditKind::SuiteConfigured, "suite_configured"),
        (RunAuditKind::CaseFinished, "case_finished"),
        (RunAuditKind::SuiteFinished, "suite_finished"),
        (RunAuditKind::SuiteAborted, "suite_aborted"),
    ];
    for (kind, label) in kinds {
        assert_eq!(kind.as_str(), label);
    }
}
