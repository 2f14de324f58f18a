// crates/webssotest-core/src/case.rs
// ============================================================================
// Module: Test Case Contracts
// Description: Base test case capability plus per-artifact check capabilities.
// Purpose: Let a runner invoke every kind of conformance check uniformly.
// Dependencies: crate::{document, status}, serde, thiserror
// ============================================================================

//! ## Overview
//! Every test case exposes the [`TestCase`] accessors (description plus the
//! success and failure messages used for reporting). Checking an artifact is
//! a separate capability: [`MetadataTestCase`] checks a parsed metadata
//! document. Suites hold cases as [`SuiteCase`] variants, so a new artifact
//! kind is a new capability trait plus a new variant, without touching the
//! base contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::document::MetadataDocument;
use crate::status::TestStatus;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by test case construction or by an exceptional check.
///
/// A returned `CaseError` is never a conformance verdict; the runner records
/// it as a fatal error for that case only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    /// A required reporting string was empty.
    #[error("test case {field} must be non-empty")]
    EmptyText {
        /// Name of the empty field.
        field: &'static str,
    },
    /// The configured expectation is unusable.
    #[error("invalid test case expectation: {0}")]
    InvalidExpectation(String),
    /// The check hit a condition it cannot turn into a status.
    #[error("test case check error: {0}")]
    Check(String),
}

// ============================================================================
// SECTION: Base Capability
// ============================================================================

/// Base contract shared by every test case.
///
/// Accessors are infallible and return fixed text; they never depend on run
/// results and are safe to call before or after execution.
pub trait TestCase {
    /// Returns a non-empty description of what the case verifies.
    fn description(&self) -> &str;

    /// Returns the message reported when the case passes.
    fn success_message(&self) -> &str;

    /// Returns the message reported when the case fails.
    fn failed_message(&self) -> &str;
}

/// Validated reporting text for a test case.
///
/// # Invariants
/// - All three strings are non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseText {
    /// Case description.
    description: String,
    /// Message for a passing case.
    success_message: String,
    /// Message for a failing case.
    failed_message: String,
}

impl CaseText {
    /// Builds reporting text, rejecting empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::EmptyText`] naming the first empty field.
    pub fn new(
        description: impl Into<String>,
        success_message: impl Into<String>,
        failed_message: impl Into<String>,
    ) -> Result<Self, CaseError> {
        let text = Self {
            description: description.into(),
            success_message: success_message.into(),
            failed_message: failed_message.into(),
        };
        for (field, value) in [
            ("description", &text.description),
            ("success message", &text.success_message),
            ("failed message", &text.failed_message),
        ] {
            if value.trim().is_empty() {
                return Err(CaseError::EmptyText {
                    field,
                });
            }
        }
        Ok(text)
    }
}

impl TestCase for CaseText {
    fn description(&self) -> &str {
        &self.description
    }

    fn success_message(&self) -> &str {
        &self.success_message
    }

    fn failed_message(&self) -> &str {
        &self.failed_message
    }
}

// ============================================================================
// SECTION: Metadata Capability
// ============================================================================

/// Test case that checks the metadata of the entity under test.
///
/// # Contract
/// - The document is well-formed; parse failures never reach this call.
/// - The result depends only on the document and the case's configured
///   expectations, so repeated calls with the same document agree.
/// - A missing element or attribute yields [`TestStatus::Fail`], or
///   [`TestStatus::Indeterminate`] when the check does not apply. It is
///   never an error.
pub trait MetadataTestCase: TestCase + Send + Sync {
    /// Checks the supplied metadata document.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError`] only for exceptional conditions; the runner
    /// records these separately from a failing status.
    fn check_metadata(&self, metadata: &MetadataDocument<'_>) -> Result<TestStatus, CaseError>;
}

// ============================================================================
// SECTION: Suite Case Variants
// ============================================================================

/// Kind of artifact a test case checks.
///
/// # Invariants
/// - Variants are stable for report labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// XML metadata of the entity under test.
    Metadata,
}

impl ArtifactKind {
    /// Returns a stable label for the artifact kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
        }
    }
}

/// Test case owned by a suite, tagged by the capability it provides.
pub enum SuiteCase {
    /// Checks the metadata of the entity under test.
    Metadata(Box<dyn MetadataTestCase>),
}

impl SuiteCase {
    /// Wraps a metadata test case.
    pub fn metadata(case: impl MetadataTestCase + 'static) -> Self {
        Self::Metadata(Box::new(case))
    }

    /// Returns the artifact kind this case needs.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        match self {
            Self::Metadata(_) => ArtifactKind::Metadata,
        }
    }

    /// Returns the base test case view.
    #[must_use]
    pub fn as_test_case(&self) -> &dyn TestCase {
        match self {
            Self::Metadata(case) => case.as_ref(),
        }
    }
}

impl std::fmt::Debug for SuiteCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteCase")
            .field("kind", &self.kind())
            .field("description", &self.as_test_case().description())
            .finish()
    }
}
