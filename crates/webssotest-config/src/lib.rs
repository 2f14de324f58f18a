// crates/webssotest-config/src/lib.rs
// ============================================================================
// Module: WebSSO Test Config Library
// Description: Run configuration model and suite construction.
// Purpose: Single source of truth for webssotest.toml semantics.
// Dependencies: webssotest-core, serde, toml
// ============================================================================

//! ## Overview
//! `webssotest-config` loads a conformance run from TOML: runner options,
//! the audit sink, the captured target metadata, and declarative suites built
//! from the generic metadata checks. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
