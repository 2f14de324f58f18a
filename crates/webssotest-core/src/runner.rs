// crates/webssotest-core/src/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Executes suites against a mocked entity and collects reports.
// Purpose: Walk the suite lifecycle with per-case failure isolation.
// Dependencies: crate::{audit, case, document, interfaces, report, status, suite}
// ============================================================================

//! ## Overview
//! [`SuiteRunner`] drives one suite at a time through its lifecycle:
//! request the mocked metadata, check that it parses, configure the mocked
//! entity, then invoke every case in order. Cases within a suite are always
//! serialized. A broken case (error return or panic) is recorded as a fatal
//! per-case error and the next case still runs. A suite-level error aborts
//! only that suite; [`SuiteRunner::run_suites`] keeps going with the rest and
//! may run independent suites on separate threads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::thread;

use thiserror::Error;

use crate::audit::RunAuditEvent;
use crate::audit::RunAuditKind;
use crate::audit::RunAuditSink;
use crate::case::ArtifactKind;
use crate::case::MetadataTestCase;
use crate::case::SuiteCase;
use crate::document::DEFAULT_MAX_METADATA_BYTES;
use crate::document::MetadataDocument;
use crate::interfaces::ArtifactError;
use crate::interfaces::ArtifactSource;
use crate::interfaces::MockedEntity;
use crate::interfaces::MockedEntityFactory;
use crate::report::CaseOutcome;
use crate::report::ReportEntry;
use crate::report::RunSummary;
use crate::report::SuiteReport;
use crate::status::TestStatus;
use crate::suite::LifecycleError;
use crate::suite::SuiteLifecycle;
use crate::suite::TestSuite;

// ============================================================================
// SECTION: Options and Errors
// ============================================================================

/// Runner options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum size of any metadata document the runner parses.
    pub max_metadata_bytes: usize,
    /// Run independent suites on separate threads.
    pub parallel_suites: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_metadata_bytes: DEFAULT_MAX_METADATA_BYTES,
            parallel_suites: false,
        }
    }
}

/// Runner errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// The runner attempted an illegal lifecycle transition.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// A suite worker thread panicked.
    #[error("suite `{0}` worker panicked")]
    WorkerPanicked(String),
}

/// Why the target artifact could not be handed to a case.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArtifactFailure {
    /// The artifact source timed out; cases are not invoked.
    TimedOut(String),
    /// The artifact is absent or not well-formed.
    Unusable(String),
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Sequential suite runner.
pub struct SuiteRunner<'r> {
    /// Source of the artifacts under test.
    artifacts: &'r dyn ArtifactSource,
    /// Audit sink for run events.
    audit: &'r dyn RunAuditSink,
    /// Runner options.
    options: RunOptions,
}

impl<'r> SuiteRunner<'r> {
    /// Creates a runner.
    #[must_use]
    pub const fn new(
        artifacts: &'r dyn ArtifactSource,
        audit: &'r dyn RunAuditSink,
        options: RunOptions,
    ) -> Self {
        Self {
            artifacts,
            audit,
            options,
        }
    }

    /// Runs one suite against `mocked`.
    ///
    /// Suite-level misconfiguration yields an aborted report, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] only when the runner itself breaks the suite
    /// lifecycle.
    pub fn run_suite(
        &self,
        suite: &dyn TestSuite,
        mocked: &mut dyn MockedEntity,
    ) -> Result<SuiteReport, RunnerError> {
        let name = suite.name();
        let role = suite.role();
        let mut state = SuiteLifecycle::Unconfigured;
        self.audit.record(&RunAuditEvent::suite(RunAuditKind::SuiteStarted, name, role, state, None));

        let mocked_metadata = suite.mocked_metadata();
        state = state.advance(SuiteLifecycle::MetadataSupplied)?;

        let configured =
            MetadataDocument::parse_with_limit(&mocked_metadata, self.options.max_metadata_bytes)
                .map_err(|err| format!("mocked metadata rejected: {err}"))
                .and_then(|_| {
                    mocked
                        .configure(role, &mocked_metadata)
                        .map_err(|err| format!("mocked entity configuration failed: {err}"))
                });
        if let Err(reason) = configured {
            state = state.advance(SuiteLifecycle::Aborted)?;
            self.audit.record(&RunAuditEvent::suite(
                RunAuditKind::SuiteAborted,
                name,
                role,
                state,
                Some(reason.clone()),
            ));
            return Ok(SuiteReport::aborted(name, role, reason));
        }
        self.audit.record(&RunAuditEvent::suite(
            RunAuditKind::SuiteConfigured,
            name,
            role,
            state,
            None,
        ));

        state = state.advance(SuiteLifecycle::Executing)?;
        let cases = suite.cases();
        let needs_metadata = cases.iter().any(|case| case.kind() == ArtifactKind::Metadata);
        let target_text = if needs_metadata {
            Some(self.artifacts.target_metadata(name, role))
        } else {
            None
        };
        let target_document = target_text.as_ref().map(|text| self.parse_target(text));

        let mut entries = Vec::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            let (outcome, note) = match case {
                SuiteCase::Metadata(metadata_case) => {
                    invoke_metadata_case(metadata_case.as_ref(), target_document.as_ref())
                }
            };
            let detail = match &outcome {
                CaseOutcome::Error(detail) => Some(detail.clone()),
                CaseOutcome::Status(_) => note.clone(),
            };
            let entry = ReportEntry::new(index, case.kind(), case.as_test_case(), outcome, note);
            self.audit.record(&RunAuditEvent::case_finished(
                name,
                role,
                index,
                &entry.description,
                entry.outcome.label(),
                detail,
            ));
            entries.push(entry);
        }

        state = state.advance(SuiteLifecycle::Complete)?;
        let report = SuiteReport::complete(name, role, entries);
        self.audit.record(&RunAuditEvent::suite(
            RunAuditKind::SuiteFinished,
            name,
            role,
            state,
            Some(report.status.as_str().to_string()),
        ));
        Ok(report)
    }

    /// Runs every suite, each against its own mocked entity.
    ///
    /// Suites run on separate threads when [`RunOptions::parallel_suites`]
    /// is set. A suite that cannot complete is reported as aborted and the
    /// remaining suites still run. Reports keep the order of `suites`.
    #[must_use]
    pub fn run_suites(
        &self,
        suites: &[&dyn TestSuite],
        factory: &dyn MockedEntityFactory,
    ) -> RunSummary {
        let reports = if self.options.parallel_suites {
            thread::scope(|scope| {
                let handles: Vec<_> = suites
                    .iter()
                    .map(|suite| {
                        let suite = *suite;
                        let handle = scope.spawn(move || {
                            let mut mocked = factory.create(suite.name());
                            self.run_suite(suite, mocked.as_mut())
                        });
                        (suite, handle)
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|(suite, handle)| {
                        let result = handle.join().unwrap_or_else(|_| {
                            Err(RunnerError::WorkerPanicked(suite.name().to_string()))
                        });
                        settle(suite, result)
                    })
                    .collect::<Vec<_>>()
            })
        } else {
            suites
                .iter()
                .map(|suite| {
                    let suite = *suite;
                    let result = catch_unwind(AssertUnwindSafe(|| {
                        let mut mocked = factory.create(suite.name());
                        self.run_suite(suite, mocked.as_mut())
                    }))
                    .unwrap_or_else(|_| Err(RunnerError::WorkerPanicked(suite.name().to_string())));
                    settle(suite, result)
                })
                .collect()
        };
        RunSummary::new(reports)
    }

    /// Parses the target metadata once for every metadata case of a suite.
    fn parse_target<'t>(
        &self,
        text: &'t Result<String, ArtifactError>,
    ) -> Result<MetadataDocument<'t>, ArtifactFailure> {
        match text {
            Ok(text) => MetadataDocument::parse_with_limit(text, self.options.max_metadata_bytes)
                .map_err(|err| ArtifactFailure::Unusable(format!("target {err}"))),
            Err(ArtifactError::Timeout(reason)) => {
                Err(ArtifactFailure::TimedOut(format!("target metadata timed out: {reason}")))
            }
            Err(err @ ArtifactError::Unavailable(_)) => {
                Err(ArtifactFailure::Unusable(format!("target metadata missing: {err}")))
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a runner error into an aborted report so other suites proceed.
fn settle(suite: &dyn TestSuite, result: Result<SuiteReport, RunnerError>) -> SuiteReport {
    result.unwrap_or_else(|err| SuiteReport::aborted(suite.name(), suite.role(), err.to_string()))
}

/// Invokes a metadata case with panic isolation.
///
/// A timed-out artifact yields `Indeterminate` without calling the case; an
/// unusable artifact yields a fatal per-case error.
fn invoke_metadata_case(
    case: &dyn MetadataTestCase,
    document: Option<&Result<MetadataDocument<'_>, ArtifactFailure>>,
) -> (CaseOutcome, Option<String>) {
    let document = match document {
        Some(Ok(document)) => document,
        Some(Err(ArtifactFailure::TimedOut(reason))) => {
            return (CaseOutcome::Status(TestStatus::Indeterminate), Some(reason.clone()));
        }
        Some(Err(ArtifactFailure::Unusable(reason))) => {
            return (CaseOutcome::Error(reason.clone()), None);
        }
        None => {
            return (CaseOutcome::Error("target metadata was not requested".to_string()), None);
        }
    };
    match catch_unwind(AssertUnwindSafe(|| case.check_metadata(document))) {
        Ok(Ok(status)) => (CaseOutcome::Status(status), None),
        Ok(Err(err)) => (CaseOutcome::Error(err.to_string()), None),
        Err(payload) => (CaseOutcome::Error(panic_message(payload.as_ref())), None),
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("test case panicked: {detail}")
}
