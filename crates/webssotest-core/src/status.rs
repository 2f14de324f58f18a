// crates/webssotest-core/src/status.rs
// ============================================================================
// Module: Test Status
// Description: Closed outcome values produced by every conformance check.
// Purpose: Give the runner and reporters one stable vocabulary for results.
// Dependencies: serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! Defines the three-valued test status (`pass/fail/indeterminate`) and the
//! aggregated counts used when folding many statuses into a suite verdict.
//! `Indeterminate` means the check was not applicable; it is never folded
//! into `Fail`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Test Status Value
// ============================================================================

/// Outcome of a single conformance check
///
/// # Invariants
/// - Represents a closed set of outcomes: pass, fail, or indeterminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    /// The artifact satisfies the checked requirement
    Pass,
    /// The artifact violates the checked requirement
    Fail,
    /// The check could not be meaningfully evaluated
    Indeterminate,
}

impl TestStatus {
    /// Returns true if the status is `Pass`
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if the status is `Fail`
    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }

    /// Returns true if the status is `Indeterminate`
    #[must_use]
    pub const fn is_indeterminate(self) -> bool {
        matches!(self, Self::Indeterminate)
    }

    /// Returns a stable, human-readable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Indeterminate => "INDETERMINATE",
        }
    }
}

impl From<bool> for TestStatus {
    fn from(value: bool) -> Self {
        if value { Self::Pass } else { Self::Fail }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Aggregated Counts
// ============================================================================

/// Aggregated outcome counts for a suite or a whole run
///
/// # Invariants
/// - `total()` equals the number of recorded outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Number of passing checks
    pub passed: usize,
    /// Number of failing checks
    pub failed: usize,
    /// Number of inapplicable checks
    pub indeterminate: usize,
    /// Number of checks that ended in a fatal per-case error
    pub errored: usize,
}

impl StatusCounts {
    /// Records a status returned by a check.
    pub const fn record(&mut self, status: TestStatus) {
        match status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Indeterminate => self.indeterminate += 1,
        }
    }

    /// Records a fatal per-case error.
    pub const fn record_error(&mut self) {
        self.errored += 1;
    }

    /// Adds another set of counts into this one.
    pub const fn merge(&mut self, other: Self) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.indeterminate += other.indeterminate;
        self.errored += other.errored;
    }

    /// Returns the number of recorded outcomes.
    #[must_use]
    pub const fn total(self) -> usize {
        self.passed + self.failed + self.indeterminate + self.errored
    }

    /// Folds the counts into an overall verdict.
    ///
    /// Any failure or fatal error makes the verdict `Fail`. Indeterminate
    /// checks do not affect the verdict, so an empty or fully inapplicable
    /// set passes vacuously.
    #[must_use]
    pub const fn overall(self) -> TestStatus {
        if self.failed > 0 || self.errored > 0 { TestStatus::Fail } else { TestStatus::Pass }
    }
}
