// crates/webssotest-core/src/lib.rs
// ============================================================================
// Module: WebSSO Test Core
// Description: Public API surface for the conformance test contract.
// Purpose: Wire together statuses, cases, suites, the runner, and reports.
// Dependencies: crate::{audit, case, checks, document, interfaces, report, runner, saml, status,
//              suite}
// ============================================================================

//! ## Overview
//! `webssotest-core` defines the contract between a SAML2 Web-SSO
//! conformance test runner and the test implementations it executes: the
//! [`TestStatus`] outcome, the [`TestCase`] family, the [`TestSuite`] that
//! configures a mocked counterpart entity, and a reference [`SuiteRunner`]
//! that walks suites through their lifecycle and produces [`SuiteReport`]s.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod audit;
pub mod case;
pub mod checks;
pub mod document;
pub mod interfaces;
pub mod report;
pub mod runner;
pub mod saml;
pub mod status;
pub mod suite;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RunAuditEvent;
pub use audit::RunAuditKind;
pub use audit::RunAuditSink;
pub use audit::StderrAuditSink;
pub use case::ArtifactKind;
pub use case::CaseError;
pub use case::CaseText;
pub use case::MetadataTestCase;
pub use case::SuiteCase;
pub use case::TestCase;
pub use checks::AttributeValueIn;
pub use checks::ElementMultiplicity;
pub use checks::ElementName;
pub use checks::Presence;
pub use checks::RequiredAttribute;
pub use document::DEFAULT_MAX_METADATA_BYTES;
pub use document::DocumentError;
pub use document::Element;
pub use document::MetadataDocument;
pub use interfaces::ArtifactError;
pub use interfaces::ArtifactSource;
pub use interfaces::MockedEntity;
pub use interfaces::MockedEntityError;
pub use interfaces::MockedEntityFactory;
pub use interfaces::StaticArtifactSource;
pub use report::CaseOutcome;
pub use report::ReportEntry;
pub use report::RunSummary;
pub use report::SuiteReport;
pub use runner::RunOptions;
pub use runner::RunnerError;
pub use runner::SuiteRunner;
pub use status::StatusCounts;
pub use status::TestStatus;
pub use suite::LifecycleError;
pub use suite::StaticTestSuite;
pub use suite::SuiteBuilder;
pub use suite::SuiteError;
pub use suite::SuiteLifecycle;
pub use suite::TestRole;
pub use suite::TestSuite;
