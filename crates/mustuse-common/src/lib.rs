//! Common types and utilities for the mustuse checker.
//!
//! This crate provides foundational types used across all mustuse crates:
//! - Source positions (`LineMap`, `Position`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message/code tables)
//! - Walk and recursion limits

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics shared by the parser, binder and checker
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, diagnostic_messages, format_message,
};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
