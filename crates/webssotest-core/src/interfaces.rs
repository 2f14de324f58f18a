// crates/webssotest-core/src/interfaces.rs
// ============================================================================
// Module: Runner Collaborator Interfaces
// Description: Contracts for the mocked SAML entity and artifact sources.
// Purpose: Keep hosting, transport, and message capture out of the core.
// Dependencies: crate::suite, thiserror
// ============================================================================

//! ## Overview
//! The runner needs two collaborators it does not implement: a mocked SAML
//! entity that serves the suite's metadata, and a source for the artifacts
//! under test (for metadata checks, the metadata published by the real
//! entity). Both are traits so HTTP servers, fixtures, or recorded exchanges
//! can be plugged in without changing the runner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::suite::TestRole;

// ============================================================================
// SECTION: Mocked Entity
// ============================================================================

/// Mocked entity errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MockedEntityError {
    /// The mocked entity refused the supplied metadata.
    #[error("mocked entity rejected metadata: {0}")]
    Rejected(String),
}

/// Stand-in SAML entity that plays the counterpart of the entity under test.
pub trait MockedEntity {
    /// Configures the entity with the metadata it must expose for the run.
    ///
    /// `role` is the role of the entity under test; the mocked entity plays
    /// [`TestRole::counterpart`].
    ///
    /// # Errors
    ///
    /// Returns [`MockedEntityError`] when the metadata cannot be served.
    fn configure(&mut self, role: TestRole, metadata: &str) -> Result<(), MockedEntityError>;
}

/// Builds one mocked entity per suite for parallel runs.
pub trait MockedEntityFactory: Sync {
    /// Creates a fresh mocked entity for the named suite.
    fn create(&self, suite_name: &str) -> Box<dyn MockedEntity + Send>;
}

impl<F> MockedEntityFactory for F
where
    F: Fn(&str) -> Box<dyn MockedEntity + Send> + Sync,
{
    fn create(&self, suite_name: &str) -> Box<dyn MockedEntity + Send> {
        self(suite_name)
    }
}

// ============================================================================
// SECTION: Artifact Source
// ============================================================================

/// Errors raised while obtaining an artifact under test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// Waiting for the artifact timed out.
    #[error("artifact timed out: {0}")]
    Timeout(String),
    /// The artifact is absent or could not be retrieved.
    #[error("artifact unavailable: {0}")]
    Unavailable(String),
}

/// Supplies artifacts captured from the entity under test.
pub trait ArtifactSource: Sync {
    /// Returns the metadata published by the entity under test.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] when the metadata cannot be obtained.
    fn target_metadata(&self, suite_name: &str, role: TestRole) -> Result<String, ArtifactError>;
}

/// Artifact source backed by fixed metadata text.
///
/// # Invariants
/// - Returns the same text for every suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticArtifactSource {
    /// Metadata text of the entity under test, when known.
    metadata: Option<String>,
}

impl StaticArtifactSource {
    /// Creates a source that always returns `metadata`.
    #[must_use]
    pub fn new(metadata: impl Into<String>) -> Self {
        Self {
            metadata: Some(metadata.into()),
        }
    }

    /// Creates a source that has no metadata to offer.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            metadata: None,
        }
    }
}

impl ArtifactSource for StaticArtifactSource {
    fn target_metadata(&self, _suite_name: &str, _role: TestRole) -> Result<String, ArtifactError> {
        self.metadata
            .clone()
            .ok_or_else(|| ArtifactError::Unavailable("no target metadata configured".to_string()))
    }
}
