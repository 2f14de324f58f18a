// crates/webssotest-config/src/config.rs
// ============================================================================
// Module: WebSSO Test Configuration
// Description: Configuration loading, validation, and suite construction.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: webssotest-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Relative paths inside the file resolve against the file's directory.
//! Suites are declared with the generic metadata checks and built into
//! [`StaticTestSuite`] values; every check is constructed once during
//! validation so a bad expectation is reported before any run starts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use webssotest_core::AttributeValueIn;
use webssotest_core::CaseText;
use webssotest_core::DEFAULT_MAX_METADATA_BYTES;
use webssotest_core::ElementMultiplicity;
use webssotest_core::ElementName;
use webssotest_core::FileAuditSink;
use webssotest_core::NoopAuditSink;
use webssotest_core::Presence;
use webssotest_core::RequiredAttribute;
use webssotest_core::RunAuditSink;
use webssotest_core::RunOptions;
use webssotest_core::StaticArtifactSource;
use webssotest_core::StaticTestSuite;
use webssotest_core::StderrAuditSink;
use webssotest_core::SuiteBuilder;
use webssotest_core::SuiteCase;
use webssotest_core::TestRole;
use webssotest_core::saml::MD_NS;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "webssotest.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "WEBSSOTEST_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `runner.max_metadata_bytes` and metadata files.
pub const MAX_METADATA_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Maximum number of configured suites.
const MAX_SUITES: usize = 256;
/// Maximum number of checks per suite.
const MAX_CHECKS_PER_SUITE: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Conformance run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebSsoTestConfig {
    /// Runner configuration.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Entity-under-test artifact configuration.
    #[serde(default)]
    pub target: TargetConfig,
    /// Declared suites, in run order.
    #[serde(default)]
    pub suites: Vec<SuiteConfig>,
    /// Directory that relative paths resolve against (not serialized).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl WebSsoTestConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let base_dir = resolved.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_toml(content, &base_dir)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.base_dir = base_dir.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.runner.validate()?;
        self.audit.validate()?;
        self.target.validate()?;
        if self.suites.len() > MAX_SUITES {
            return Err(ConfigError::Invalid(format!("too many suites (max {MAX_SUITES})")));
        }
        let mut names = BTreeSet::new();
        for suite in &self.suites {
            suite.validate()?;
            if !names.insert(suite.name.trim()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate suite name `{}`",
                    suite.name.trim()
                )));
            }
        }
        Ok(())
    }

    /// Builds every configured suite, reading mocked metadata from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a metadata file cannot be read or a
    /// suite cannot be built.
    pub fn build_suites(&self) -> Result<Vec<StaticTestSuite>, ConfigError> {
        self.suites.iter().map(|suite| suite.build_suite(&self.base_dir)).collect()
    }

    /// Builds the artifact source for the entity under test.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the target metadata file cannot be read.
    pub fn build_source(&self) -> Result<StaticArtifactSource, ConfigError> {
        self.target.build_source(&self.base_dir)
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit log cannot be opened.
    pub fn build_audit_sink(&self) -> Result<Box<dyn RunAuditSink>, ConfigError> {
        self.audit.build_sink(&self.base_dir)
    }
}

/// Runner configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Run independent suites on separate threads.
    #[serde(default)]
    pub parallel_suites: bool,
    /// Maximum size of any metadata document the runner parses.
    #[serde(default = "default_max_metadata_bytes")]
    pub max_metadata_bytes: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parallel_suites: false,
            max_metadata_bytes: default_max_metadata_bytes(),
        }
    }
}

impl RunnerConfig {
    /// Validates runner limits.
    fn validate(self) -> Result<(), ConfigError> {
        if self.max_metadata_bytes == 0 {
            return Err(ConfigError::Invalid(
                "runner.max_metadata_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_metadata_bytes > MAX_METADATA_BYTES_LIMIT {
            return Err(ConfigError::Invalid("runner.max_metadata_bytes too large".to_string()));
        }
        Ok(())
    }

    /// Returns the runner options for this configuration.
    #[must_use]
    pub const fn runner_options(self) -> RunOptions {
        RunOptions {
            max_metadata_bytes: self.max_metadata_bytes,
            parallel_suites: self.parallel_suites,
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Discard audit events.
    None,
}

/// Audit logging configuration for run events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines), required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit sink `file` requires audit.path".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid with sink `file`".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Builds the audit sink, opening the log file when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit log cannot be opened.
    pub fn build_sink(&self, base_dir: &Path) -> Result<Box<dyn RunAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
            (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(&base_dir.join(path.trim()))
                    .map_err(|err| ConfigError::Io(format!("audit.path: {err}")))?;
                Ok(Box::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit sink `file` requires audit.path".to_string()))
            }
        }
    }
}

/// Artifacts captured from the entity under test.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Metadata published by the entity under test.
    #[serde(default)]
    pub metadata_path: Option<String>,
}

impl TargetConfig {
    /// Validates target artifact paths.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.metadata_path {
            validate_path_string("target.metadata_path", path)?;
        }
        Ok(())
    }

    /// Builds the artifact source; it is empty when no metadata is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the metadata file cannot be read.
    pub fn build_source(&self, base_dir: &Path) -> Result<StaticArtifactSource, ConfigError> {
        match &self.metadata_path {
            Some(path) => {
                let text = read_metadata_file("target.metadata_path", base_dir, path)?;
                Ok(StaticArtifactSource::new(text))
            }
            None => Ok(StaticArtifactSource::empty()),
        }
    }
}

// ============================================================================
// SECTION: Suites
// ============================================================================

/// Declarative suite definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Suite name, unique within the file.
    pub name: String,
    /// Role of the entity under test.
    pub role: TestRole,
    /// Metadata file served by the mocked entity.
    pub mocked_metadata_path: String,
    /// Checks in run order.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

impl SuiteConfig {
    /// Validates the suite definition and every check in it.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("suite name is empty".to_string()));
        }
        validate_path_string("suites.mocked_metadata_path", &self.mocked_metadata_path)?;
        if self.checks.len() > MAX_CHECKS_PER_SUITE {
            return Err(ConfigError::Invalid(format!(
                "suite `{}` has too many checks (max {MAX_CHECKS_PER_SUITE})",
                self.name
            )));
        }
        for check in &self.checks {
            check.build_case().map_err(|err| match err {
                ConfigError::Invalid(message) => {
                    ConfigError::Invalid(format!("suite `{}`: {message}", self.name))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Builds the suite, reading the mocked metadata relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the metadata file cannot be read or a
    /// check is invalid.
    pub fn build_suite(&self, base_dir: &Path) -> Result<StaticTestSuite, ConfigError> {
        let metadata =
            read_metadata_file("suites.mocked_metadata_path", base_dir, &self.mocked_metadata_path)?;
        let mut builder = SuiteBuilder::new(self.name.trim(), self.role, metadata);
        for check in &self.checks {
            builder = builder.case(check.build_case()?);
        }
        builder.build().map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

/// Check type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Element occurrence bounds.
    Multiplicity,
    /// Attribute present and non-empty on every matching element.
    RequiredAttribute,
    /// Attribute value drawn from an allowed set.
    AttributeValueIn,
}

/// Namespace-qualified element reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementConfig {
    /// Namespace URI; defaults to the SAML metadata namespace.
    #[serde(default = "default_element_namespace")]
    pub namespace: String,
    /// Element local name.
    pub local_name: String,
}

/// Declarative metadata check.
///
/// Fields that do not apply to `kind` must be left unset.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    /// Check type.
    pub kind: CheckKind,
    /// What the check verifies.
    pub description: String,
    /// Message reported on pass.
    pub success_message: String,
    /// Message reported on fail.
    pub failed_message: String,
    /// Element the check inspects.
    pub element: ElementConfig,
    /// Attribute name for attribute checks.
    #[serde(default)]
    pub attribute: Option<String>,
    /// Minimum occurrences for multiplicity checks (defaults to zero).
    #[serde(default)]
    pub min: Option<usize>,
    /// Maximum occurrences for multiplicity checks.
    #[serde(default)]
    pub max: Option<usize>,
    /// Allowed values for `attribute_value_in`.
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Outcome when the element is absent, for attribute checks.
    #[serde(default)]
    pub presence: Option<Presence>,
}

impl CheckConfig {
    /// Builds the test case described by this entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when fields do not fit `kind` or the
    /// resulting case is invalid.
    pub fn build_case(&self) -> Result<SuiteCase, ConfigError> {
        let invalid = |message: String| {
            ConfigError::Invalid(format!("check `{}`: {message}", self.description.trim()))
        };
        let text = CaseText::new(&self.description, &self.success_message, &self.failed_message)
            .map_err(|err| invalid(err.to_string()))?;
        let element = ElementName::new(&self.element.namespace, &self.element.local_name)
            .map_err(|err| invalid(err.to_string()))?;
        match self.kind {
            CheckKind::Multiplicity => {
                if self.attribute.is_some() || !self.allowed.is_empty() || self.presence.is_some() {
                    return Err(invalid(
                        "multiplicity accepts only element, min, and max".to_string(),
                    ));
                }
                if self.min.is_none() && self.max.is_none() {
                    return Err(invalid("multiplicity requires min or max".to_string()));
                }
                let case =
                    ElementMultiplicity::between(text, element, self.min.unwrap_or(0), self.max)
                        .map_err(|err| invalid(err.to_string()))?;
                Ok(SuiteCase::metadata(case))
            }
            CheckKind::RequiredAttribute => {
                self.reject_bounds().map_err(invalid)?;
                if !self.allowed.is_empty() {
                    return Err(invalid("required_attribute does not accept allowed".to_string()));
                }
                let case = RequiredAttribute::new(
                    text,
                    element,
                    self.attribute_name().map_err(invalid)?,
                    self.presence.unwrap_or_default(),
                )
                .map_err(|err| invalid(err.to_string()))?;
                Ok(SuiteCase::metadata(case))
            }
            CheckKind::AttributeValueIn => {
                self.reject_bounds().map_err(invalid)?;
                let case = AttributeValueIn::new(
                    text,
                    element,
                    self.attribute_name().map_err(invalid)?,
                    self.allowed.clone(),
                    self.presence.unwrap_or_default(),
                )
                .map_err(|err| invalid(err.to_string()))?;
                Ok(SuiteCase::metadata(case))
            }
        }
    }

    /// Returns the attribute name required by attribute checks.
    fn attribute_name(&self) -> Result<&str, String> {
        self.attribute.as_deref().ok_or_else(|| "attribute checks require attribute".to_string())
    }

    /// Rejects multiplicity bounds on attribute checks.
    fn reject_bounds(&self) -> Result<(), String> {
        if self.min.is_some() || self.max.is_some() {
            return Err("attribute checks do not accept min or max".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or referenced files.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Reads a metadata file named by `field`, relative to `base_dir`.
fn read_metadata_file(field: &str, base_dir: &Path, value: &str) -> Result<String, ConfigError> {
    validate_path_string(field, value)?;
    let path = base_dir.join(value.trim());
    let len = fs::metadata(&path).map_err(|err| ConfigError::Io(format!("{field}: {err}")))?.len();
    if exceeds_limit(len, MAX_METADATA_BYTES_LIMIT) {
        return Err(ConfigError::Invalid(format!("{field} exceeds size limit")));
    }
    let bytes = fs::read(&path).map_err(|err| ConfigError::Io(format!("{field}: {err}")))?;
    if bytes.len() > MAX_METADATA_BYTES_LIMIT {
        return Err(ConfigError::Invalid(format!("{field} exceeds size limit")));
    }
    String::from_utf8(bytes).map_err(|_| ConfigError::Invalid(format!("{field} must be utf-8")))
}

/// Returns true when a file length on disk is larger than `limit` bytes.
fn exceeds_limit(len: u64, limit: usize) -> bool {
    !usize::try_from(len).is_ok_and(|len| len <= limit)
}

/// Default metadata size limit.
const fn default_max_metadata_bytes() -> usize {
    DEFAULT_MAX_METADATA_BYTES
}

/// Default element namespace.
fn default_element_namespace() -> String {
    MD_NS.to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
