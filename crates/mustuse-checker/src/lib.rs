//! Type oracle and rules for the mustuse checker.
//!
//! A checked file is typed against a set of lib files (declaration files
//! parsed once and shared); the resulting `NodeTypes` table answers the
//! `TypeOracle` queries the `must-use-result` rule asks.
//!
//! - `state` / `context`: `CheckerState`, the per-file driver and caches
//! - `symbol_resolver`: names, imports and namespaces across files
//! - `declared_types`, `type_node`, `type_computation*`: the type model
//! - `node_types`: the frozen per-node types and the `TypeOracle` trait
//! - `navigator`: parent/child helpers for rules
//! - `rules`: the rules themselves

pub mod context;
mod declared_types;
pub mod error;
pub mod lib_file;
pub mod navigator;
pub mod node_types;
pub mod options;
pub mod rules;
pub mod state;
mod symbol_resolver;
mod type_computation;
mod type_computation_access;
mod type_node;

/// Diagnostics shared with the front end.
pub mod diagnostics {
    pub use mustuse_common::diagnostics::*;
}

pub use context::{CheckerContext, FileId};
pub use error::CheckError;
pub use lib_file::LibFile;
pub use node_types::{NodeTypes, TypeOracle};
pub use options::{CheckerOptions, MustUseResultOptions};
pub use rules::{MustUseResult, Verdict};
pub use state::{CheckResult, CheckerState, check_source_text};

#[cfg(test)]
#[path = "tests/navigator_tests.rs"]
mod navigator_tests;
#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod options_tests;
