//! Declaration files shared by every checked file.
//!
//! A lib file is parsed and bound once and then only read, so the CLI wraps
//! each one in an `Arc` and hands the same set to every worker.

use mustuse_binder::BinderState;
use mustuse_common::Diagnostic;
use mustuse_parser::{NodeArena, NodeIndex, ParserState};
use tracing::debug;

pub struct LibFile {
    pub file_name: String,
    pub arena: NodeArena,
    pub binder: BinderState,
    pub root: NodeIndex,
    /// Parse diagnostics; reported once by whoever loads the lib.
    pub diagnostics: Vec<Diagnostic>,
}

impl LibFile {
    pub fn parse(file_name: impl Into<String>, source: impl Into<String>) -> LibFile {
        let file_name = file_name.into();
        let mut parser = ParserState::new(file_name.clone(), source.into());
        let root = parser.parse_source_file();
        let diagnostics = parser.take_diagnostics();
        let arena = parser.into_arena();

        let mut binder = BinderState::new();
        binder.bind_source_file(&arena, root);
        debug!(
            file = %file_name,
            symbols = binder.symbols.len(),
            parse_errors = diagnostics.len(),
            "loaded lib file"
        );

        LibFile {
            file_name,
            arena,
            binder,
            root,
            diagnostics,
        }
    }
}
