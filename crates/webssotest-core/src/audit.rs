// crates/webssotest-core/src/audit.rs
// ============================================================================
// Module: Run Audit Logging
// Description: Structured audit events for suite and test case execution.
// Purpose: Emit JSON-line run logs without hard logging dependencies.
// Dependencies: crate::suite, serde, serde_json
// ============================================================================

//! ## Overview
//! The runner reports every lifecycle transition and every finished case as
//! a [`RunAuditEvent`]. Sinks serialize events as JSON lines so deployments
//! can route them to their preferred logging pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::suite::SuiteLifecycle;
use crate::suite::TestRole;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Run audit event classification.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAuditKind {
    /// Runner picked up a suite.
    SuiteStarted,
    /// Mocked entity accepted the suite metadata.
    SuiteConfigured,
    /// A test case produced an outcome.
    CaseFinished,
    /// Every test case in the suite returned.
    SuiteFinished,
    /// Suite stopped on a suite-level error.
    SuiteAborted,
}

impl RunAuditKind {
    /// Returns a stable label for the event kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuiteStarted => "suite_started",
            Self::SuiteConfigured => "suite_configured",
            Self::CaseFinished => "case_finished",
            Self::SuiteFinished => "suite_finished",
            Self::SuiteAborted => "suite_aborted",
        }
    }
}

/// Run audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RunAuditEvent {
    /// Event identifier.
    pub event: RunAuditKind,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Suite name.
    pub suite: String,
    /// Role of the entity under test.
    pub role: TestRole,
    /// Suite lifecycle state after the event.
    pub lifecycle: SuiteLifecycle,
    /// Zero-based case position for case events.
    pub case_index: Option<usize>,
    /// Case description for case events.
    pub description: Option<String>,
    /// Outcome label (`PASS`, `FAIL`, `INDETERMINATE`, `ERROR`).
    pub outcome: Option<&'static str>,
    /// Error or abort detail.
    pub detail: Option<String>,
}

impl RunAuditEvent {
    /// Creates a suite-level event with a consistent timestamp.
    #[must_use]
    pub fn suite(
        event: RunAuditKind,
        suite: &str,
        role: TestRole,
        lifecycle: SuiteLifecycle,
        detail: Option<String>,
    ) -> Self {
        Self {
            event,
            timestamp_ms: now_ms(),
            suite: suite.to_string(),
            role,
            lifecycle,
            case_index: None,
            description: None,
            outcome: None,
            detail,
        }
    }

    /// Creates a case-finished event with a consistent timestamp.
    #[must_use]
    pub fn case_finished(
        suite: &str,
        role: TestRole,
        case_index: usize,
        description: &str,
        outcome: &'static str,
        detail: Option<String>,
    ) -> Self {
        Self {
            event: RunAuditKind::CaseFinished,
            timestamp_ms: now_ms(),
            suite: suite.to_string(),
            role,
            lifecycle: SuiteLifecycle::Executing,
            case_index: Some(case_index),
            description: Some(description.to_string()),
            outcome: Some(outcome),
            detail,
        }
    }
}

/// Returns the current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for run events.
pub trait RunAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RunAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl RunAuditSink for StderrAuditSink {
    fn record(&self, event: &RunAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RunAuditSink for FileAuditSink {
    fn record(&self, event: &RunAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl RunAuditSink for NoopAuditSink {
    fn record(&self, _event: &RunAuditEvent) {}
}
