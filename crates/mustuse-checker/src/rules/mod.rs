//! Rules run over a checked file.

pub mod must_use_result;

pub use must_use_result::{MustUseResult, Verdict};

/// Stable names of every rule, as used in configuration and diagnostics.
pub const RULE_NAMES: &[&str] = &[must_use_result::RULE_NAME];
