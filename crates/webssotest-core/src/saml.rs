// crates/webssotest-core/src/saml.rs
// ============================================================================
// Module: SAML Metadata Vocabulary
// Description: Namespace URIs and element names used by metadata checks.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Names from the SAML 2.0 metadata schema that checks and suites refer to.

/// SAML 2.0 metadata namespace.
pub const MD_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";
/// XML digital signature namespace.
pub const DS_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// `md:EntityDescriptor`.
pub const ENTITY_DESCRIPTOR: &str = "EntityDescriptor";
/// `md:IDPSSODescriptor`.
pub const IDP_SSO_DESCRIPTOR: &str = "IDPSSODescriptor";
/// `md:SPSSODescriptor`.
pub const SP_SSO_DESCRIPTOR: &str = "SPSSODescriptor";
/// `md:SingleSignOnService`.
pub const SINGLE_SIGN_ON_SERVICE: &str = "SingleSignOnService";
/// `md:AssertionConsumerService`.
pub const ASSERTION_CONSUMER_SERVICE: &str = "AssertionConsumerService";
/// `md:SingleLogoutService`.
pub const SINGLE_LOGOUT_SERVICE: &str = "SingleLogoutService";

/// HTTP-Redirect binding URI.
pub const BINDING_HTTP_REDIRECT: &str = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect";
/// HTTP-POST binding URI.
pub const BINDING_HTTP_POST: &str = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST";
