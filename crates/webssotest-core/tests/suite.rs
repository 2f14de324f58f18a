// crates/webssotest-core/tests/suite.rs
// ============================================================================
// Module: Case and Suite Construction Tests
// Description: Validation of case text, suite builders, and role labels.
// ============================================================================
//! ## Overview
//! Covers the construction-time guarantees of [`CaseText`] and
//! [`SuiteBuilder`], plus capability dispatch through [`SuiteCase`].

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

use support::FixedStatusCase;
use support::TestResult;
use support::ensure;
use support::mocked_sp_metadata;
use webssotest_core::ArtifactKind;
use webssotest_core::CaseError;
use webssotest_core::CaseText;
use webssotest_core::SuiteBuilder;
use webssotest_core::SuiteCase;
use webssotest_core::SuiteError;
use webssotest_core::TestCase;
use webssotest_core::TestRole;
use webssotest_core::TestStatus;
use webssotest_core::TestSuite;

// ============================================================================
// SECTION: Case Text
// ============================================================================

#[test]
fn case_text_rejects_each_empty_field() {
    assert_eq!(
        CaseText::new(" ", "ok", "bad"),
        Err(CaseError::EmptyText {
            field: "description",
        })
    );
    assert_eq!(
        CaseText::new("d", "", "bad"),
        Err(CaseError::EmptyText {
            field: "success message",
        })
    );
    assert_eq!(
        CaseText::new("d", "ok", "\n"),
        Err(CaseError::EmptyText {
            field: "failed message",
        })
    );
}

#[test]
fn case_text_keeps_its_strings() -> TestResult {
    let text = CaseText::new("has signing key", "signing key found", "no signing key")?;
    ensure(text.description() == "has signing key", "description")?;
    ensure(text.success_message() == "signing key found", "success message")?;
    ensure(text.failed_message() == "no signing key", "failed message")?;
    Ok(())
}

// ============================================================================
// SECTION: Suite Builder
// ============================================================================

#[test]
fn builder_keeps_case_order_and_identity() -> TestResult {
    let suite = SuiteBuilder::new("sp-basics", TestRole::SP, mocked_sp_metadata())
        .metadata_case(FixedStatusCase::new("first", TestStatus::Pass))
        .case(SuiteCase::metadata(FixedStatusCase::new("second", TestStatus::Fail)))
        .build()?;
    ensure(suite.name() == "sp-basics", "name")?;
    ensure(suite.role() == TestRole::SP, "role")?;
    ensure(suite.mocked_metadata() == mocked_sp_metadata(), "mocked metadata")?;
    let descriptions: Vec<&str> =
        suite.cases().iter().map(|case| case.as_test_case().description()).collect();
    ensure(descriptions == vec!["first", "second"], "case order")?;
    ensure(suite.cases().iter().all(|case| case.kind() == ArtifactKind::Metadata), "kinds")?;
    ensure(matches!(suite.cases()[0], SuiteCase::Metadata(_)), "metadata capability")?;
    Ok(())
}

#[test]
fn builder_rejects_empty_name_and_metadata() {
    assert_eq!(
        SuiteBuilder::new("", TestRole::IdP, mocked_sp_metadata()).build().err(),
        Some(SuiteError::EmptyName)
    );
    assert_eq!(
        SuiteBuilder::new("idp", TestRole::IdP, "  ").build().err(),
        Some(SuiteError::EmptyMetadata("idp".to_string()))
    );
}

#[test]
fn repeated_metadata_requests_agree() -> TestResult {
    let suite = SuiteBuilder::new("stable", TestRole::IdP, mocked_sp_metadata()).build()?;
    let first = suite.mocked_metadata();
    let second = suite.mocked_metadata();
    ensure(first == second, "mocked metadata is stable")
}

// ============================================================================
// SECTION: Roles
// ============================================================================

#[test]
fn roles_have_counterparts_and_labels() {
    assert_eq!(TestRole::IdP.counterpart(), TestRole::SP);
    assert_eq!(TestRole::SP.counterpart(), TestRole::IdP);
    assert_eq!(TestRole::IdP.to_string(), "idp");
    assert_eq!(TestRole::SP.as_str(), "sp");
}
