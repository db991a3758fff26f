//! Checker Context
//!
//! Holds the shared state of one check: the checked file, the lib files
//! visible to it, the type interner and every cache the type computation
//! fills. Declarations can come from any of those files, so nodes and
//! symbols are addressed by `(FileId, index)` pairs.

use std::sync::Arc;

use mustuse_binder::{BinderState, SymbolId};
use mustuse_common::Diagnostic;
use mustuse_common::limits::MAX_EXPR_CHECK_DEPTH;
use mustuse_parser::{NodeArena, NodeIndex};
use mustuse_solver::recursion::RecursionProfile;
use mustuse_solver::{RecursionGuard, ShapeId, TypeId, TypeInterner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::lib_file::LibFile;
use crate::options::CheckerOptions;

/// File a node or symbol belongs to. `0` is the checked file, `i + 1` is
/// lib file `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    pub const CHECKED: FileId = FileId(0);

    #[inline]
    pub fn lib(index: usize) -> FileId {
        FileId(index as u32 + 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub file: FileId,
    pub node: NodeIndex,
}

impl NodeRef {
    #[inline]
    pub fn new(file: FileId, node: NodeIndex) -> Self {
        NodeRef { file, node }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    pub file: FileId,
    pub symbol: SymbolId,
}

impl SymbolRef {
    #[inline]
    pub fn new(file: FileId, symbol: SymbolId) -> Self {
        SymbolRef { file, symbol }
    }
}

/// Class or interface shape whose members are still to be lowered.
///
/// Declared types are created as empty shells first so that mutually
/// referring declarations (`Ok` returns `Result`, `Result` names `Ok`)
/// resolve without recursion; `drain_pending` fills them in afterwards.
pub(crate) enum PendingShape {
    Interface {
        file: FileId,
        declarations: SmallVec<[NodeIndex; 2]>,
        shape: ShapeId,
    },
    Class {
        file: FileId,
        class: NodeIndex,
        /// Interface declarations merged into the class instance type.
        interfaces: SmallVec<[NodeIndex; 2]>,
        instance: ShapeId,
        constructor: ShapeId,
    },
}

pub struct CheckerContext<'a> {
    pub arena: &'a NodeArena,
    pub binder: &'a BinderState,
    pub file_name: String,
    pub libs: &'a [Arc<LibFile>],
    pub options: CheckerOptions,
    pub types: TypeInterner,
    pub diagnostics: Vec<Diagnostic>,

    /// Value types of symbols.
    pub(crate) symbol_types: FxHashMap<SymbolRef, TypeId>,
    /// Type meanings of symbols (interfaces, aliases, class instances).
    pub(crate) declared_types: FxHashMap<SymbolRef, TypeId>,
    /// Class node -> (instance type, constructor type).
    pub(crate) class_types: FxHashMap<NodeRef, (TypeId, TypeId)>,
    pub(crate) node_types: FxHashMap<NodeRef, TypeId>,
    pub(crate) type_node_types: FxHashMap<NodeRef, TypeId>,

    pub(crate) symbol_guard: RecursionGuard<SymbolRef>,
    pub(crate) alias_guard: RecursionGuard<SymbolRef>,
    pub(crate) node_guard: RecursionGuard<NodeRef>,

    pub(crate) pending_shapes: Vec<PendingShape>,
    pub(crate) draining: bool,
}

impl<'a> CheckerContext<'a> {
    pub fn new(
        arena: &'a NodeArena,
        binder: &'a BinderState,
        libs: &'a [Arc<LibFile>],
        file_name: String,
        options: CheckerOptions,
    ) -> Self {
        let expression_profile = RecursionProfile::Custom {
            max_depth: MAX_EXPR_CHECK_DEPTH,
            max_iterations: u32::MAX,
        };
        CheckerContext {
            arena,
            binder,
            file_name,
            libs,
            options,
            types: TypeInterner::new(),
            diagnostics: Vec::new(),
            symbol_types: FxHashMap::default(),
            declared_types: FxHashMap::default(),
            class_types: FxHashMap::default(),
            node_types: FxHashMap::default(),
            type_node_types: FxHashMap::default(),
            symbol_guard: RecursionGuard::with_profile(RecursionProfile::TypeLowering),
            alias_guard: RecursionGuard::with_profile(RecursionProfile::TypeLowering),
            node_guard: RecursionGuard::with_profile(expression_profile),
            pending_shapes: Vec::new(),
            draining: false,
        }
    }

    /// Arena and binder of `file`.
    pub fn view(&self, file: FileId) -> Option<(&'a NodeArena, &'a BinderState)> {
        if file == FileId::CHECKED {
            return Some((self.arena, self.binder));
        }
        let libs: &'a [Arc<LibFile>] = self.libs;
        let lib = libs.get(file.0 as usize - 1)?;
        Some((&lib.arena, &lib.binder))
    }

    #[inline]
    pub fn arena_of(&self, file: FileId) -> Option<&'a NodeArena> {
        self.view(file).map(|(arena, _)| arena)
    }

    /// Every file, checked file first.
    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + use<> {
        (0..=self.libs.len() as u32).map(FileId)
    }
}
