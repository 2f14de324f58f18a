// crates/webssotest-core/src/document.rs
// ============================================================================
// Module: Metadata Document
// Description: Read-only, namespace-resolved XML tree for SAML metadata.
// Purpose: Parse once, then hand the same tree to many metadata checks.
// Dependencies: quick-xml, thiserror
// ============================================================================

//! ## Overview
//! A [`MetadataDocument`] is produced by the parse step that sits in front of
//! every metadata check. Parsing guarantees well-formedness (balanced tags,
//! resolvable namespace prefixes, a single root element) so checks only deal
//! with semantic questions. The tree is immutable once built and borrows the
//! text it was parsed from; checks receive `&MetadataDocument` and cannot
//! keep it past the call.
//!
//! Security posture: metadata is untrusted input. Size and depth are bounded
//! and document type declarations are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use quick_xml::NsReader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum metadata document size in bytes.
pub const DEFAULT_MAX_METADATA_BYTES: usize = 1024 * 1024;
/// Maximum element nesting depth accepted by the parser.
pub const MAX_ELEMENT_DEPTH: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing a metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Document exceeds the configured size limit.
    #[error("metadata document exceeds size limit: {actual} > {max} bytes")]
    TooLarge {
        /// Actual size in bytes.
        actual: usize,
        /// Configured maximum in bytes.
        max: usize,
    },
    /// Document is not well-formed XML.
    #[error("metadata document is malformed: {0}")]
    Malformed(String),
    /// Document contains no root element.
    #[error("metadata document has no root element")]
    NoRoot,
    /// Document contains more than one root element.
    #[error("metadata document has more than one root element")]
    MultipleRoots,
    /// Document declares a DOCTYPE.
    #[error("metadata document must not declare a doctype")]
    DoctypeForbidden,
    /// Element nesting exceeded [`MAX_ELEMENT_DEPTH`].
    #[error("metadata document nesting exceeds {max} levels")]
    TooDeep {
        /// Maximum allowed depth.
        max: usize,
    },
}

// ============================================================================
// SECTION: Tree Storage
// ============================================================================

/// Stored attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeData {
    /// Resolved namespace URI, `None` for unprefixed attributes.
    namespace: Option<String>,
    /// Local attribute name.
    local_name: String,
    /// Unescaped attribute value.
    value: String,
}

/// Stored element node.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ElementData {
    /// Resolved namespace URI.
    namespace: Option<String>,
    /// Local element name.
    local_name: String,
    /// Attributes in document order, namespace declarations excluded.
    attributes: Vec<AttributeData>,
    /// Concatenated, trimmed character data directly inside the element.
    text: String,
    /// Child element indices in document order.
    children: Vec<usize>,
    /// Parent element index.
    parent: Option<usize>,
}

// ============================================================================
// SECTION: Metadata Document
// ============================================================================

/// Parsed, well-formed SAML metadata document.
///
/// # Invariants
/// - Contains exactly one root element at index zero.
/// - Never mutated after [`MetadataDocument::parse`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDocument<'a> {
    /// Text the document was parsed from.
    source: &'a str,
    /// Element arena in document (pre-)order.
    elements: Vec<ElementData>,
}

impl<'a> MetadataDocument<'a> {
    /// Parses metadata using [`DEFAULT_MAX_METADATA_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the text is not a well-formed document.
    pub fn parse(source: &'a str) -> Result<Self, DocumentError> {
        Self::parse_with_limit(source, DEFAULT_MAX_METADATA_BYTES)
    }

    /// Parses metadata, rejecting input larger than `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the text is too large or not a
    /// well-formed document.
    pub fn parse_with_limit(source: &'a str, max_bytes: usize) -> Result<Self, DocumentError> {
        if source.len() > max_bytes {
            return Err(DocumentError::TooLarge {
                actual: source.len(),
                max: max_bytes,
            });
        }
        let elements = build_tree(source)?;
        Ok(Self {
            source,
            elements,
        })
    }

    /// Returns the text this document was parsed from.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> Element<'_> {
        Element {
            elements: &self.elements,
            index: 0,
        }
    }

    /// Returns the total number of elements in the document.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns every element with the given namespace and local name, in
    /// document order, including the root.
    #[must_use]
    pub fn elements_named(&self, namespace: &str, local_name: &str) -> Vec<Element<'_>> {
        (0 .. self.elements.len())
            .map(|index| Element {
                elements: &self.elements,
                index,
            })
            .filter(|element| element.is(namespace, local_name))
            .collect()
    }
}

// ============================================================================
// SECTION: Element View
// ============================================================================

/// Borrowed view of one element in a [`MetadataDocument`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'d> {
    /// Backing element arena.
    elements: &'d [ElementData],
    /// Index of this element in the arena.
    index: usize,
}

impl<'d> Element<'d> {
    /// Returns the stored node for this view.
    fn data(&self) -> &'d ElementData {
        &self.elements[self.index]
    }

    /// Returns the resolved namespace URI.
    #[must_use]
    pub fn namespace(&self) -> Option<&'d str> {
        self.data().namespace.as_deref()
    }

    /// Returns the local element name.
    #[must_use]
    pub fn local_name(&self) -> &'d str {
        &self.data().local_name
    }

    /// Returns true when the element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace() == Some(namespace) && self.local_name() == local_name
    }

    /// Returns an unprefixed attribute value.
    #[must_use]
    pub fn attribute(&self, local_name: &str) -> Option<&'d str> {
        self.data()
            .attributes
            .iter()
            .find(|attr| attr.namespace.is_none() && attr.local_name == local_name)
            .map(|attr| attr.value.as_str())
    }

    /// Returns a namespace-qualified attribute value.
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<&'d str> {
        self.data()
            .attributes
            .iter()
            .find(|attr| {
                attr.namespace.as_deref() == Some(namespace) && attr.local_name == local_name
            })
            .map(|attr| attr.value.as_str())
    }

    /// Returns the trimmed character data directly inside the element.
    #[must_use]
    pub fn text(&self) -> &'d str {
        &self.data().text
    }

    /// Returns the parent element, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.data().parent.map(|index| Self {
            elements: self.elements,
            index,
        })
    }

    /// Iterates over direct child elements in document order.
    pub fn children(self) -> impl Iterator<Item = Self> {
        let elements = self.elements;
        self.data().children.iter().map(move |&index| Element {
            elements,
            index,
        })
    }

    /// Iterates over direct children with the given namespace and local name.
    pub fn children_named<'q>(
        self,
        namespace: &'q str,
        local_name: &'q str,
    ) -> impl Iterator<Item = Self> {
        self.children().filter(move |child| child.is(namespace, local_name))
    }

    /// Returns all descendant elements in document order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.data().children.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            out.push(Self {
                elements: self.elements,
                index,
            });
            stack.extend(self.elements[index].children.iter().rev());
        }
        out
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Builds the element arena from source text.
fn build_tree(source: &str) -> Result<Vec<ElementData>, DocumentError> {
    let mut reader = NsReader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut elements: Vec<ElementData> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|err| malformed(&err))?;
        match event {
            Event::Start(start) => {
                let index = push_element(&reader, &start, &mut elements, &stack)?;
                stack.push(index);
                if stack.len() > MAX_ELEMENT_DEPTH {
                    return Err(DocumentError::TooDeep {
                        max: MAX_ELEMENT_DEPTH,
                    });
                }
            }
            Event::Empty(start) => {
                push_element(&reader, &start, &mut elements, &stack)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(|err| malformed(&err))?;
                append_text(&mut elements, &stack, &value)?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let value = std::str::from_utf8(&bytes)
                    .map_err(|_| DocumentError::Malformed("cdata is not utf-8".to_string()))?;
                append_text(&mut elements, &stack, value)?;
            }
            Event::DocType(_) => return Err(DocumentError::DoctypeForbidden),
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) => {}
        }
    }

    if let Some(&open) = stack.last() {
        return Err(DocumentError::Malformed(format!(
            "unclosed element `{}`",
            elements[open].local_name
        )));
    }
    if elements.is_empty() {
        return Err(DocumentError::NoRoot);
    }
    Ok(elements)
}

/// Resolves and stores an element, linking it to its parent.
fn push_element(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    elements: &mut Vec<ElementData>,
    stack: &[usize],
) -> Result<usize, DocumentError> {
    let parent = stack.last().copied();
    if parent.is_none() && !elements.is_empty() {
        return Err(DocumentError::MultipleRoots);
    }

    let (resolved, local) = reader.resolve_element(start.name());
    let namespace = resolved_namespace(resolved)?;
    let local_name = utf8(local.as_ref())?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| malformed(&err))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let namespace = resolved_namespace(resolved)?;
        let local_name = utf8(local.as_ref())?;
        let value = attr.unescape_value().map_err(|err| malformed(&err))?.into_owned();
        attributes.push(AttributeData {
            namespace,
            local_name,
            value,
        });
    }

    let index = elements.len();
    elements.push(ElementData {
        namespace,
        local_name,
        attributes,
        text: String::new(),
        children: Vec::new(),
        parent,
    });
    if let Some(parent) = parent {
        elements[parent].children.push(index);
    }
    Ok(index)
}

/// Appends character data to the innermost open element.
fn append_text(
    elements: &mut [ElementData],
    stack: &[usize],
    value: &str,
) -> Result<(), DocumentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match stack.last() {
        Some(&current) => {
            elements[current].text.push_str(trimmed);
            Ok(())
        }
        None => Err(DocumentError::Malformed("text outside the root element".to_string())),
    }
}

/// Converts a namespace resolution result into an owned URI.
fn resolved_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>, DocumentError> {
    match resolved {
        ResolveResult::Bound(namespace) => utf8(namespace.as_ref()).map(Some),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(DocumentError::Malformed(format!(
            "unknown namespace prefix `{}`",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

/// Decodes a UTF-8 name.
fn utf8(bytes: &[u8]) -> Result<String, DocumentError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| DocumentError::Malformed("name is not utf-8".to_string()))
}

/// Maps a parser error into [`DocumentError::Malformed`].
fn malformed(err: &impl std::fmt::Display) -> DocumentError {
    DocumentError::Malformed(err.to_string())
}
