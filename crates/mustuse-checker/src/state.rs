//! Checker state: one checked file against a set of lib files.
//!
//! `CheckerState` owns the `CheckerContext` and is the receiver of every
//! type computation method (`declared_types`, `type_node`,
//! `type_computation`, `symbol_resolver`). `check_source_file` computes
//! the node types of the file, freezes them into `NodeTypes`, and runs the
//! rules over the tree.

use std::sync::Arc;

use mustuse_binder::BinderState;
use mustuse_common::Diagnostic;
use mustuse_parser::{NodeArena, NodeIndex, ParserState};
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};

use crate::context::{CheckerContext, FileId};
use crate::error::CheckError;
use crate::lib_file::LibFile;
use crate::node_types::{NodeTypes, TypeOracle, recorded_nodes};
use crate::options::CheckerOptions;
use crate::rules::MustUseResult;

pub struct CheckerState<'a> {
    pub ctx: CheckerContext<'a>,
    node_types: Option<NodeTypes>,
}

impl<'a> CheckerState<'a> {
    pub fn new(
        arena: &'a NodeArena,
        binder: &'a BinderState,
        libs: &'a [Arc<LibFile>],
        file_name: impl Into<String>,
        options: CheckerOptions,
    ) -> Self {
        CheckerState {
            ctx: CheckerContext::new(arena, binder, libs, file_name.into(), options),
            node_types: None,
        }
    }

    /// Type the file and run the rules over it. Findings land in
    /// `ctx.diagnostics`; an error means nothing could be checked.
    pub fn check_source_file(&mut self, root: NodeIndex) -> Result<(), CheckError> {
        let span = debug_span!("check_source_file", file = %self.ctx.file_name);
        let _enter = span.enter();

        if self.ctx.arena.get_source_file_at(root).is_none() {
            return Err(CheckError::MissingSourceFile {
                file_name: self.ctx.file_name.clone(),
            });
        }
        // Without type information the rule refuses to run.
        let node_types = self
            .ctx
            .options
            .type_information
            .then(|| self.build_node_types());
        if let Some(node_types) = &node_types {
            debug!(recorded = node_types.len(), "node types ready");
        }

        let findings = {
            let oracle = node_types.as_ref().map(|types| types as &dyn TypeOracle);
            let rule = MustUseResult::new(
                oracle,
                self.ctx.arena,
                self.ctx.binder,
                &self.ctx.file_name,
                &self.ctx.options.must_use_result,
            )?;
            rule.check(root)
        };
        self.ctx.diagnostics.extend(findings);
        self.node_types = node_types;
        Ok(())
    }

    /// Types of every recorded node of the checked file, with the interner
    /// moved out of the context.
    fn build_node_types(&mut self) -> NodeTypes {
        let nodes = recorded_nodes(self.ctx.arena, self.ctx.binder);
        let mut types = FxHashMap::default();
        types.reserve(nodes.len());
        for node in nodes {
            let type_id = self.get_type_of_node(FileId::CHECKED, node);
            types.insert(node.0, type_id);
        }
        self.drain_pending();
        NodeTypes::new(std::mem::take(&mut self.ctx.types), types)
    }

    pub fn node_types(&self) -> Option<&NodeTypes> {
        self.node_types.as_ref()
    }

    pub fn take_node_types(&mut self) -> Option<NodeTypes> {
        self.node_types.take()
    }
}

/// Everything one check of one file produced.
pub struct CheckResult {
    pub file_name: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    /// Parse diagnostics and findings, ordered by position.
    pub diagnostics: Vec<Diagnostic>,
    pub node_types: NodeTypes,
}

/// Parse, bind and check `source` against `libs`.
pub fn check_source_text(
    file_name: &str,
    source: &str,
    libs: &[Arc<LibFile>],
    options: &CheckerOptions,
) -> Result<CheckResult, CheckError> {
    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    let mut diagnostics = parser.take_diagnostics();
    let arena = parser.into_arena();

    let mut binder = BinderState::new();
    binder.bind_source_file(&arena, root);

    let (findings, node_types) = {
        let mut state = CheckerState::new(&arena, &binder, libs, file_name, options.clone());
        state.check_source_file(root)?;
        let node_types = state.take_node_types().unwrap_or_else(NodeTypes::empty);
        (std::mem::take(&mut state.ctx.diagnostics), node_types)
    };
    diagnostics.extend(findings);
    diagnostics.sort_by_key(|diagnostic| diagnostic.start);

    Ok(CheckResult {
        file_name: file_name.to_string(),
        arena,
        root,
        diagnostics,
        node_types,
    })
}
