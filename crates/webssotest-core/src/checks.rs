// crates/webssotest-core/src/checks.rs
// ============================================================================
// Module: Generic Metadata Checks
// Description: Configurable metadata test cases usable by any suite.
// Purpose: Cover element multiplicity and attribute requirements declaratively.
// Dependencies: crate::{case, document, status}, serde
// ============================================================================

//! ## Overview
//! Each check pairs validated [`CaseText`] with a fixed expectation and
//! evaluates it as a pure function of the supplied document. Absence is
//! reported as a status (`Fail`, or `Indeterminate` for optional targets),
//! never as an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::case::CaseError;
use crate::case::CaseText;
use crate::case::MetadataTestCase;
use crate::case::TestCase;
use crate::document::MetadataDocument;
use crate::status::TestStatus;

// ============================================================================
// SECTION: Shared Types
// ============================================================================

/// Whether a check's target element must be present.
///
/// # Invariants
/// - `Optional` turns an absent target into `Indeterminate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Absence of the target element fails the check.
    #[default]
    Required,
    /// Absence of the target element makes the check inapplicable.
    Optional,
}

impl Presence {
    /// Status reported when no target element exists.
    const fn absent_status(self) -> TestStatus {
        match self {
            Self::Required => TestStatus::Fail,
            Self::Optional => TestStatus::Indeterminate,
        }
    }
}

/// Namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementName {
    /// Namespace URI.
    pub namespace: String,
    /// Local name.
    pub local_name: String,
}

impl ElementName {
    /// Builds an element name, rejecting empty parts.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::InvalidExpectation`] when either part is empty.
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Result<Self, CaseError> {
        let name = Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        };
        if name.namespace.trim().is_empty() || name.local_name.trim().is_empty() {
            return Err(CaseError::InvalidExpectation(
                "element namespace and local name must be non-empty".to_string(),
            ));
        }
        Ok(name)
    }
}

/// Rejects empty attribute names.
fn require_attribute_name(attribute: String) -> Result<String, CaseError> {
    if attribute.trim().is_empty() {
        return Err(CaseError::InvalidExpectation("attribute name must be non-empty".to_string()));
    }
    Ok(attribute)
}

// ============================================================================
// SECTION: Element Multiplicity
// ============================================================================

/// Checks how many times an element occurs anywhere in the document.
///
/// # Invariants
/// - `max`, when set, is at least `min`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMultiplicity {
    /// Reporting text.
    text: CaseText,
    /// Element to count.
    element: ElementName,
    /// Minimum occurrences.
    min: usize,
    /// Maximum occurrences, unbounded when `None`.
    max: Option<usize>,
}

impl ElementMultiplicity {
    /// Requires between `min` and `max` occurrences (inclusive).
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::InvalidExpectation`] when `max < min`.
    pub fn between(
        text: CaseText,
        element: ElementName,
        min: usize,
        max: Option<usize>,
    ) -> Result<Self, CaseError> {
        if let Some(max) = max
            && max < min
        {
            return Err(CaseError::InvalidExpectation(format!(
                "maximum occurrences {max} is below minimum {min}"
            )));
        }
        Ok(Self {
            text,
            element,
            min,
            max,
        })
    }

    /// Requires exactly `count` occurrences.
    #[must_use]
    pub const fn exactly(text: CaseText, element: ElementName, count: usize) -> Self {
        Self {
            text,
            element,
            min: count,
            max: Some(count),
        }
    }

    /// Requires at least `min` occurrences.
    #[must_use]
    pub const fn at_least(text: CaseText, element: ElementName, min: usize) -> Self {
        Self {
            text,
            element,
            min,
            max: None,
        }
    }
}

impl TestCase for ElementMultiplicity {
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

impl MetadataTestCase for ElementMultiplicity {
    fn check_metadata(&self, metadata: &MetadataDocument<'_>) -> Result<TestStatus, CaseError> {
        let count =
            metadata.elements_named(&self.element.namespace, &self.element.local_name).len();
        let within = count >= self.min && self.max.is_none_or(|max| count <= max);
        Ok(TestStatus::from(within))
    }
}

// ============================================================================
// SECTION: Required Attribute
// ============================================================================

/// Checks that every matching element carries a non-empty attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredAttribute {
    /// Reporting text.
    text: CaseText,
    /// Elements to inspect.
    element: ElementName,
    /// Unprefixed attribute name.
    attribute: String,
    /// Outcome when no element matches.
    presence: Presence,
}

impl RequiredAttribute {
    /// Builds the check.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::InvalidExpectation`] when `attribute` is empty.
    pub fn new(
        text: CaseText,
        element: ElementName,
        attribute: impl Into<String>,
        presence: Presence,
    ) -> Result<Self, CaseError> {
        Ok(Self {
            text,
            element,
            attribute: require_attribute_name(attribute.into())?,
            presence,
        })
    }
}

impl TestCase for RequiredAttribute {
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

impl MetadataTestCase for RequiredAttribute {
    fn check_metadata(&self, metadata: &MetadataDocument<'_>) -> Result<TestStatus, CaseError> {
        let elements = metadata.elements_named(&self.element.namespace, &self.element.local_name);
        if elements.is_empty() {
            return Ok(self.presence.absent_status());
        }
        let all_present = elements.iter().all(|element| {
            element.attribute(&self.attribute).is_some_and(|value| !value.trim().is_empty())
        });
        Ok(TestStatus::from(all_present))
    }
}

// ============================================================================
// SECTION: Attribute Value Set
// ============================================================================

/// Checks that an attribute of every matching element has an allowed value.
///
/// A matching element without the attribute fails the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValueIn {
    /// Reporting text.
    text: CaseText,
    /// Elements to inspect.
    element: ElementName,
    /// Unprefixed attribute name.
    attribute: String,
    /// Allowed values, compared exactly.
    allowed: Vec<String>,
    /// Outcome when no element matches.
    presence: Presence,
}

impl AttributeValueIn {
    /// Builds the check.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::InvalidExpectation`] when `attribute` is empty
    /// or `allowed` has no values.
    pub fn new(
        text: CaseText,
        element: ElementName,
        attribute: impl Into<String>,
        allowed: Vec<String>,
        presence: Presence,
    ) -> Result<Self, CaseError> {
        if allowed.is_empty() {
            return Err(CaseError::InvalidExpectation(
                "allowed value set must be non-empty".to_string(),
            ));
        }
        Ok(Self {
            text,
            element,
            attribute: require_attribute_name(attribute.into())?,
            allowed,
            presence,
        })
    }
}

impl TestCase for AttributeValueIn {
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

impl MetadataTestCase for AttributeValueIn {
    fn check_metadata(&self, metadata: &MetadataDocument<'_>) -> Result<TestStatus, CaseError> {
        let elements = metadata.elements_named(&self.element.namespace, &self.element.local_name);
        if elements.is_empty() {
            return Ok(self.presence.absent_status());
        }
        let all_allowed = elements.iter().all(|element| {
            element
                .attribute(&self.attribute)
                .is_some_and(|value| self.allowed.iter().any(|allowed| allowed == value))
        });
        Ok(TestStatus::from(all_allowed))
    }
}
