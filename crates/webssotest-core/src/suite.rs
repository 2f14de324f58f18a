// crates/webssotest-core/src/suite.rs
// ============================================================================
// Module: Test Suite Contracts
// Description: Test suites, target roles, and the suite lifecycle.
// Purpose: Bundle ordered test cases with the metadata of the mocked entity.
// Dependencies: crate::case, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`TestSuite`] targets one role (the entity under test is either an IdP
//! or an SP), supplies the metadata the mocked counterpart must present, and
//! owns an ordered list of test cases. [`SuiteLifecycle`] is the state
//! machine the runner walks for every suite. [`StaticTestSuite`] is a
//! ready-made suite assembled with [`SuiteBuilder`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::case::MetadataTestCase;
use crate::case::SuiteCase;

// ============================================================================
// SECTION: Target Role
// ============================================================================

/// Role of the entity under test.
///
/// # Invariants
/// - Variants are stable for configuration and report labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestRole {
    /// The entity under test is an Identity Provider.
    #[serde(rename = "idp")]
    IdP,
    /// The entity under test is a Service Provider.
    #[serde(rename = "sp")]
    SP,
}

impl TestRole {
    /// Returns the role played by the mocked entity.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::IdP => Self::SP,
            Self::SP => Self::IdP,
        }
    }

    /// Returns a stable label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdP => "idp",
            Self::SP => "sp",
        }
    }
}

impl fmt::Display for TestRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Suite Contract
// ============================================================================

/// Named, cohesive set of test cases for one target role.
pub trait TestSuite: Sync {
    /// Returns the suite name used in reports.
    fn name(&self) -> &str;

    /// Returns the role of the entity under test.
    fn role(&self) -> TestRole;

    /// Returns the complete, standalone metadata document the mocked entity
    /// must expose while this suite runs.
    ///
    /// Called once per run, before any test case executes.
    fn mocked_metadata(&self) -> String;

    /// Returns the suite's test cases in report order.
    fn cases(&self) -> &[SuiteCase];
}

// ============================================================================
// SECTION: Suite Lifecycle
// ============================================================================

/// Suite lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid suite lifecycle transition: {from} -> {to}")]
pub struct LifecycleError {
    /// State the suite was in.
    pub from: SuiteLifecycle,
    /// Requested state.
    pub to: SuiteLifecycle,
}

/// Lifecycle of one suite within a run.
///
/// # Invariants
/// - Forward-only: `Unconfigured -> MetadataSupplied -> Executing -> Complete`.
/// - `Aborted` is terminal and only reachable from `MetadataSupplied`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteLifecycle {
    /// Suite loaded, mocked metadata not yet requested.
    #[default]
    Unconfigured,
    /// Mocked metadata handed to the mocked entity.
    MetadataSupplied,
    /// Test cases are being invoked.
    Executing,
    /// Every test case has returned.
    Complete,
    /// Suite-level misconfiguration stopped the suite.
    Aborted,
}

impl SuiteLifecycle {
    /// Returns true when `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unconfigured, Self::MetadataSupplied)
                | (Self::MetadataSupplied, Self::Executing | Self::Aborted)
                | (Self::Executing, Self::Complete)
        )
    }

    /// Moves to `next`, rejecting illegal transitions.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] when `next` is not a legal successor.
    pub const fn advance(self, next: Self) -> Result<Self, LifecycleError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(LifecycleError {
                from: self,
                to: next,
            })
        }
    }

    /// Returns true for `Complete` and `Aborted`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Aborted)
    }

    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::MetadataSupplied => "metadata_supplied",
            Self::Executing => "executing",
            Self::Complete => "complete",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for SuiteLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Static Suite
// ============================================================================

/// Suite construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuiteError {
    /// Suite name was empty.
    #[error("suite name must be non-empty")]
    EmptyName,
    /// Mocked metadata was empty.
    #[error("suite `{0}` mocked metadata must be non-empty")]
    EmptyMetadata(String),
}

/// Suite assembled from fixed metadata text and an ordered case list.
#[derive(Debug)]
pub struct StaticTestSuite {
    /// Suite name.
    name: String,
    /// Role of the entity under test.
    role: TestRole,
    /// Metadata for the mocked entity.
    mocked_metadata: String,
    /// Cases in report order.
    cases: Vec<SuiteCase>,
}

impl TestSuite for StaticTestSuite {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> TestRole {
        self.role
    }

    fn mocked_metadata(&self) -> String {
        self.mocked_metadata.clone()
    }

    fn cases(&self) -> &[SuiteCase] {
        &self.cases
    }
}

/// Fluent builder for [`StaticTestSuite`].
pub struct SuiteBuilder {
    /// Suite name.
    name: String,
    /// Role of the entity under test.
    role: TestRole,
    /// Metadata for the mocked entity.
    mocked_metadata: String,
    /// Cases collected so far.
    cases: Vec<SuiteCase>,
}

impl SuiteBuilder {
    /// Starts a suite for `role` whose mocked entity serves `mocked_metadata`.
    pub fn new(name: impl Into<String>, role: TestRole, mocked_metadata: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role,
            mocked_metadata: mocked_metadata.into(),
            cases: Vec::new(),
        }
    }

    /// Appends a case of any kind.
    #[must_use]
    pub fn case(mut self, case: SuiteCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Appends a metadata test case.
    #[must_use]
    pub fn metadata_case(self, case: impl MetadataTestCase + 'static) -> Self {
        self.case(SuiteCase::metadata(case))
    }

    /// Builds the suite.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] when the name or mocked metadata is empty.
    pub fn build(self) -> Result<StaticTestSuite, SuiteError> {
        if self.name.trim().is_empty() {
            return Err(SuiteError::EmptyName);
        }
        if self.mocked_metadata.trim().is_empty() {
            return Err(SuiteError::EmptyMetadata(self.name));
        }
        Ok(StaticTestSuite {
            name: self.name,
            role: self.role,
            mocked_metadata: self.mocked_metadata,
            cases: self.cases,
        })
    }
}
