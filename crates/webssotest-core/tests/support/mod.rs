// crates/webssotest-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared fixtures, mocks, and result helpers for core tests.
// ============================================================================
//! ## Overview
//! Metadata fixtures, a recording mocked entity, an in-memory audit sink,
//! and scripted test cases shared by the integration tests.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers, output, and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use webssotest_core::CaseError;
use webssotest_core::CaseText;
use webssotest_core::MetadataDocument;
use webssotest_core::MetadataTestCase;
use webssotest_core::MockedEntity;
use webssotest_core::MockedEntityError;
use webssotest_core::RunAuditEvent;
use webssotest_core::RunAuditKind;
use webssotest_core::RunAuditSink;
use webssotest_core::TestCase;
use webssotest_core::TestRole;
use webssotest_core::TestStatus;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across core integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Metadata Fixtures
// ========================================================================

/// Wraps role descriptors in an `md:EntityDescriptor`.
pub fn entity_descriptor(entity_id: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<md:EntityDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" entityID="{entity_id}">
{body}
</md:EntityDescriptor>"#
    )
}

/// A minimal IdP role descriptor.
pub fn idp_descriptor() -> String {
    r#"  <md:IDPSSODescriptor protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol">
    <md:SingleSignOnService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" Location="https://idp.example.org/sso"/>
  </md:IDPSSODescriptor>"#
        .to_string()
}

/// A minimal SP role descriptor.
pub fn sp_descriptor() -> String {
    r#"  <md:SPSSODescriptor protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol">
    <md:AssertionConsumerService index="0" Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" Location="https://sp.example.org/acs"/>
  </md:SPSSODescriptor>"#
        .to_string()
}

/// IdP metadata with `count` `IDPSSODescriptor` elements.
pub fn idp_metadata(count: usize) -> String {
    entity_descriptor("https://idp.example.org", &idp_descriptor().repeat(count))
}

/// SP metadata served by the mocked entity in IdP suites.
pub fn mocked_sp_metadata() -> String {
    entity_descriptor("https://mock-sp.example.org", &sp_descriptor())
}

/// Builds reporting text for a case.
pub fn text(description: &str) -> CaseText {
    CaseText::new(description, format!("{description}: ok"), format!("{description}: violated"))
        .expect("fixture text is non-empty")
}

// ========================================================================
// Mocked Entity
// ========================================================================

/// Mocked entity that records every configuration call.
#[derive(Clone, Default)]
pub struct RecordingMockedEntity {
    /// Recorded `(role, metadata)` pairs.
    pub configured: Arc<Mutex<Vec<(TestRole, String)>>>,
    /// Rejection reason; when set, every configuration fails.
    pub reject: Option<String>,
}

impl RecordingMockedEntity {
    /// Creates an entity that rejects every configuration.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            configured: Arc::default(),
            reject: Some(reason.to_string()),
        }
    }

    /// Returns the number of configuration calls.
    pub fn configure_calls(&self) -> usize {
        self.configured.lock().unwrap().len()
    }
}

impl MockedEntity for RecordingMockedEntity {
    fn configure(&mut self, role: TestRole, metadata: &str) -> Result<(), MockedEntityError> {
        self.configured.lock().unwrap().push((role, metadata.to_string()));
        match &self.reject {
            Some(reason) => Err(MockedEntityError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

// ========================================================================
// Audit Sink
// ========================================================================

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events.
    pub events: Mutex<Vec<RunAuditEvent>>,
}

impl MemoryAuditSink {
    /// Returns recorded event kinds in order.
    pub fn kinds(&self) -> Vec<RunAuditKind> {
        self.events.lock().unwrap().iter().map(|event| event.event).collect()
    }

    /// Returns recorded events for one suite.
    pub fn for_suite(&self, suite: &str) -> Vec<RunAuditEvent> {
        self.events.lock().unwrap().iter().filter(|event| event.suite == suite).cloned().collect()
    }
}

impl RunAuditSink for MemoryAuditSink {
    fn record(&self, event: &RunAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ========================================================================
// Scripted Test Cases
// ========================================================================

/// Case that always returns the same status and counts invocations.
pub struct FixedStatusCase {
    /// Reporting text.
    pub text: CaseText,
    /// Status to return.
    pub status: TestStatus,
    /// Invocation counter.
    pub calls: Arc<AtomicUsize>,
}

impl FixedStatusCase {
    /// Creates a case returning `status`.
    pub fn new(description: &str, status: TestStatus) -> Self {
        Self {
            text: text(description),
            status,
            calls: Arc::default(),
        }
    }
}

impl TestCase for FixedStatusCase {
    fn description(&self) -> &str {
        self.text.description()
    }

    fn success_message(&self) -> &str {
        self.text.success_message()
    }

    fn failed_message(&self) -> &str {
        self.text.failed_message()
    }
}

impl MetadataTestCase for FixedStatusCase {
    fn check_metadata(&self, _metadata: &MetadataDocument<'_>) -> Result<TestStatus, CaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.status)
    }
}

/// Case that reports an exceptional condition.
pub struct ErroringCase(pub CaseText);

impl TestCase for ErroringCase {
    fn description(&self) -> &str {
        self.0.description()
    }

    fn success_message(&self) -> &str {
        self.0.success_message()
    }

    fn failed_message(&self) -> &str {
        self.0.failed_message()
    }
}

impl MetadataTestCase for ErroringCase {
    fn check_metadata(&self, _metadata: &MetadataDocument<'_>) -> Result<TestStatus, CaseError> {
        Err(CaseError::Check("signature verifier unavailable".to_string()))
    }
}

/// Case that panics when invoked.
pub struct PanickingCase(pub CaseText);

impl TestCase for PanickingCase {
    fn description(&self) -> &str {
        self.0.description()
    }

    fn success_message(&self) -> &str {
        self.0.success_message()
    }

    fn failed_message(&self) -> &str {
        self.0.failed_message()
    }
}

impl MetadataTestCase for PanickingCase {
    fn check_metadata(&self, _metadata: &MetadataDocument<'_>) -> Result<TestStatus, CaseError> {
        panic!("index out of range in broken check")
    }
}
