//! Suite construction tests for webssotest-config.
// crates/webssotest-config/tests/suite_building.rs
// =============================================================================
// Module: Config Suite Building Tests
// Description: Build suites, sources, and sinks from a config directory.
// Purpose: Ensure a loaded config drives a complete run end to end.
// =============================================================================

use std::fs;
use std::path::Path;

use webssotest_config::WebSsoTestConfig;
use webssotest_core::CaseOutcome;
use webssotest_core::SuiteRunner;
use webssotest_core::TestRole;
use webssotest_core::TestStatus;
use webssotest_core::TestSuite;

type TestResult = Result<(), String>;

const SP_METADATA: &str = r#"<md:EntityDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" entityID="https://mock-sp.example.org">
  <md:SPSSODescriptor protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol">
    <md:AssertionConsumerService index="0" Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" Location="https://mock-sp.example.org/acs"/>
  </md:SPSSODescriptor>
</md:EntityDescriptor>"#;

const IDP_METADATA: &str = r#"<md:EntityDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" entityID="https://idp.example.org">
  <md:IDPSSODescriptor protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol">
    <md:SingleSignOnService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" Location="https://idp.example.org/sso"/>
  </md:IDPSSODescriptor>
</md:EntityDescriptor>"#;

const CONFIG: &str = r#"
[runner]
parallel_suites = true

[audit]
sink = "file"
path = "logs/run-audit.jsonl"

[target]
metadata_path = "target/idp.xml"

[[suites]]
name = "idp-metadata"
role = "idp"
mocked_metadata_path = "mock/sp.xml"

[[suites.checks]]
kind = "multiplicity"
description = "entity descriptor has exactly one IDPSSODescriptor"
success_message = "exactly one IDPSSODescriptor found"
failed_message = "IDPSSODescriptor count is not one"
element = { local_name = "IDPSSODescriptor" }
min = 1
max = 1

[[suites.checks]]
kind = "attribute_value_in"
description = "SingleSignOnService uses a supported binding"
success_message = "bindings supported"
failed_message = "unsupported binding"
element = { local_name = "SingleSignOnService" }
attribute = "Binding"
allowed = ["urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST"]

[[suites.checks]]
kind = "required_attribute"
description = "SingleLogoutService has Location when present"
success_message = "logout locations set"
failed_message = "logout location missing"
element = { local_name = "SingleLogoutService" }
attribute = "Location"
presence = "optional"
"#;

fn write(dir: &Path, relative: &str, content: &str) -> TestResult {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    fs::write(path, content).map_err(|err| err.to_string())
}

fn config_dir() -> Result<tempfile::TempDir, String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    write(dir.path(), "webssotest.toml", CONFIG)?;
    write(dir.path(), "mock/sp.xml", SP_METADATA)?;
    write(dir.path(), "target/idp.xml", IDP_METADATA)?;
    fs::create_dir_all(dir.path().join("logs")).map_err(|err| err.to_string())?;
    Ok(dir)
}

#[test]
fn loaded_config_builds_suites_in_order() -> TestResult {
    let dir = config_dir()?;
    let config = WebSsoTestConfig::load(Some(&dir.path().join("webssotest.toml")))
        .map_err(|err| err.to_string())?;
    let suites = config.build_suites().map_err(|err| err.to_string())?;
    if suites.len() != 1 {
        return Err(format!("expected one suite, got {}", suites.len()));
    }
    let suite = &suites[0];
    if suite.name() != "idp-metadata" || suite.role() != TestRole::IdP {
        return Err("suite identity mismatch".to_string());
    }
    if suite.mocked_metadata() != SP_METADATA {
        return Err("mocked metadata not read from file".to_string());
    }
    let descriptions: Vec<&str> =
        suite.cases().iter().map(|case| case.as_test_case().description()).collect();
    if descriptions.len() != 3 || descriptions[0] != "entity descriptor has exactly one IDPSSODescriptor" {
        return Err(format!("unexpected cases {}", descriptions.join(", ")));
    }
    if !config.runner.runner_options().parallel_suites {
        return Err("parallel flag not mapped".to_string());
    }
    Ok(())
}

#[test]
fn loaded_config_drives_a_run() -> TestResult {
    let dir = config_dir()?;
    let config = WebSsoTestConfig::load(Some(&dir.path().join("webssotest.toml")))
        .map_err(|err| err.to_string())?;
    let suites = config.build_suites().map_err(|err| err.to_string())?;
    let source = config.build_source().map_err(|err| err.to_string())?;
    let sink = config.build_audit_sink().map_err(|err| err.to_string())?;
    let runner = SuiteRunner::new(&source, sink.as_ref(), config.runner.runner_options());
    let mut mocked = Recorder::default();

    let report = runner.run_suite(&suites[0], &mut mocked).map_err(|err| err.to_string())?;

    let outcomes: Vec<CaseOutcome> = report.entries.iter().map(|entry| entry.outcome.clone()).collect();
    let expected = vec![
        CaseOutcome::Status(TestStatus::Pass),
        CaseOutcome::Status(TestStatus::Fail),
        CaseOutcome::Status(TestStatus::Indeterminate),
    ];
    if outcomes != expected {
        return Err("unexpected outcomes".to_string());
    }
    if mocked.configured != 1 {
        return Err("mocked entity not configured".to_string());
    }
    let log = fs::read_to_string(dir.path().join("logs/run-audit.jsonl"))
        .map_err(|err| err.to_string())?;
    if log.lines().count() != 6 {
        return Err(format!("expected six audit lines, got {}", log.lines().count()));
    }
    Ok(())
}

#[test]
fn missing_target_yields_empty_source() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let config = WebSsoTestConfig::from_toml("", dir.path()).map_err(|err| err.to_string())?;
    let source = config.build_source().map_err(|err| err.to_string())?;
    if source != webssotest_core::StaticArtifactSource::empty() {
        return Err("expected empty source".to_string());
    }
    Ok(())
}

#[test]
fn missing_mocked_metadata_file_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let content = "[[suites]]\nname = \"sp\"\nrole = \"sp\"\nmocked_metadata_path = \"absent.xml\"\n";
    let config = WebSsoTestConfig::from_toml(content, dir.path()).map_err(|err| err.to_string())?;
    match config.build_suites() {
        Err(err) if err.to_string().contains("suites.mocked_metadata_path") => Ok(()),
        Err(err) => Err(format!("unexpected error {err}")),
        Ok(_) => Err("expected io error".to_string()),
    }
}

#[test]
fn oversized_mocked_metadata_file_is_rejected_by_length() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let file = fs::File::create(dir.path().join("huge.xml")).map_err(|err| err.to_string())?;
    let oversized = u64::try_from(webssotest_config::MAX_METADATA_BYTES_LIMIT + 1)
        .map_err(|err| err.to_string())?;
    file.set_len(oversized).map_err(|err| err.to_string())?;
    let content = "[[suites]]\nname = \"sp\"\nrole = \"sp\"\nmocked_metadata_path = \"huge.xml\"\n";
    let config = WebSsoTestConfig::from_toml(content, dir.path()).map_err(|err| err.to_string())?;
    match config.build_suites() {
        Err(err) if err.to_string().contains("suites.mocked_metadata_path exceeds size limit") => Ok(()),
        Err(err) => Err(format!("unexpected error {err}")),
        Ok(_) => Err("expected size limit error".to_string()),
    }
}

/// Mocked entity that counts configuration calls.
#[derive(Default)]
struct Recorder {
    configured: usize,
}

impl webssotest_core::MockedEntity for Recorder {
    fn configure(
        &mut self,
        _role: TestRole,
        _metadata: &str,
    ) -> Result<(), webssotest_core::MockedEntityError> {
        self.configured += 1;
        Ok(())
    }
}
