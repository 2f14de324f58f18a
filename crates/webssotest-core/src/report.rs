// crates/webssotest-core/src/report.rs
// ============================================================================
// Module: Run Reports
// Description: Per-case entries, per-suite reports, and run summaries.
// Purpose: Hand reporters a structured, serializable view of a run.
// Dependencies: crate::{case, status, suite}, serde
// ============================================================================

//! ## Overview
//! Reports keep fatal per-case errors distinct from failing statuses and
//! preserve the order in which the suite listed its cases. Rendering
//! (console, file, exit code) is left to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::case::ArtifactKind;
use crate::case::TestCase;
use crate::status::StatusCounts;
use crate::status::TestStatus;
use crate::suite::SuiteLifecycle;
use crate::suite::TestRole;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Report message used for inapplicable checks.
pub const NOT_APPLICABLE_MESSAGE: &str = "check was not applicable";
/// Outcome label used for fatal per-case errors.
pub const ERROR_LABEL: &str = "ERROR";

// ============================================================================
// SECTION: Case Outcome
// ============================================================================

/// Result of running one test case.
///
/// # Invariants
/// - `Error` is never a conformance verdict; it records a broken case or a
///   missing artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    /// The case returned a status.
    Status(TestStatus),
    /// The case could not produce a status.
    Error(String),
}

impl CaseOutcome {
    /// Returns the outcome label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Status(status) => status.as_str(),
            Self::Error(_) => ERROR_LABEL,
        }
    }

    /// Returns the status when the case produced one.
    #[must_use]
    pub const fn status(&self) -> Option<TestStatus> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Error(_) => None,
        }
    }

    /// Returns true for fatal per-case errors.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

// ============================================================================
// SECTION: Report Entry
// ============================================================================

/// One row of a suite report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Zero-based position of the case within its suite.
    pub index: usize,
    /// Case description.
    pub description: String,
    /// Artifact kind the case checked.
    pub kind: ArtifactKind,
    /// Case outcome.
    pub outcome: CaseOutcome,
    /// Success message, failure message, or error detail matching `outcome`.
    pub message: String,
    /// Optional runner note (for example, why a case was not invoked).
    pub note: Option<String>,
}

impl ReportEntry {
    /// Builds an entry, picking the message that matches the outcome.
    #[must_use]
    pub fn new(
        index: usize,
        kind: ArtifactKind,
        case: &dyn TestCase,
        outcome: CaseOutcome,
        note: Option<String>,
    ) -> Self {
        let message = match &outcome {
            CaseOutcome::Status(TestStatus::Pass) => case.success_message().to_string(),
            CaseOutcome::Status(TestStatus::Fail) => case.failed_message().to_string(),
            CaseOutcome::Status(TestStatus::Indeterminate) => NOT_APPLICABLE_MESSAGE.to_string(),
            CaseOutcome::Error(detail) => detail.clone(),
        };
        Self {
            index,
            description: case.description().to_string(),
            kind,
            outcome,
            message,
            note,
        }
    }
}

// ============================================================================
// SECTION: Suite Report
// ============================================================================

/// Report for one suite.
///
/// # Invariants
/// - `entries` follows the suite's case order.
/// - `counts` summarizes `entries`.
/// - `abort_reason` is set exactly when `lifecycle` is `Aborted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite: String,
    /// Role of the entity under test.
    pub role: TestRole,
    /// Final lifecycle state.
    pub lifecycle: SuiteLifecycle,
    /// Entries in case order.
    pub entries: Vec<ReportEntry>,
    /// Outcome counts.
    pub counts: StatusCounts,
    /// Overall suite status.
    pub status: TestStatus,
    /// Suite-level error that stopped the suite.
    pub abort_reason: Option<String>,
}

impl SuiteReport {
    /// Builds the report of a suite that ran to completion.
    #[must_use]
    pub fn complete(suite: &str, role: TestRole, entries: Vec<ReportEntry>) -> Self {
        let mut counts = StatusCounts::default();
        for entry in &entries {
            match entry.outcome {
                CaseOutcome::Status(status) => counts.record(status),
                CaseOutcome::Error(_) => counts.record_error(),
            }
        }
        Self {
            suite: suite.to_string(),
            role,
            lifecycle: SuiteLifecycle::Complete,
            entries,
            counts,
            status: counts.overall(),
            abort_reason: None,
        }
    }

    /// Builds the report of a suite stopped by a suite-level error.
    #[must_use]
    pub fn aborted(suite: &str, role: TestRole, reason: String) -> Self {
        Self {
            suite: suite.to_string(),
            role,
            lifecycle: SuiteLifecycle::Aborted,
            entries: Vec::new(),
            counts: StatusCounts::default(),
            status: TestStatus::Fail,
            abort_reason: Some(reason),
        }
    }

    /// Returns true when the suite was aborted.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self.lifecycle, SuiteLifecycle::Aborted)
    }
}

// ============================================================================
// SECTION: Run Summary
// ============================================================================

/// Aggregate over every suite in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Suite reports in scheduling order.
    pub suites: Vec<SuiteReport>,
    /// Outcome counts across all suites.
    pub counts: StatusCounts,
    /// Number of aborted suites.
    pub aborted_suites: usize,
    /// Overall run status.
    pub status: TestStatus,
}

impl RunSummary {
    /// Folds suite reports into a summary.
    #[must_use]
    pub fn new(suites: Vec<SuiteReport>) -> Self {
        let mut counts = StatusCounts::default();
        let mut aborted_suites = 0;
        for report in &suites {
            counts.merge(report.counts);
            if report.is_aborted() {
                aborted_suites += 1;
            }
        }
        let status = if aborted_suites > 0 || suites.iter().any(|report| report.status.is_fail()) {
            TestStatus::Fail
        } else {
            TestStatus::Pass
        };
        Self {
            suites,
            counts,
            aborted_suites,
            status,
        }
    }
}
