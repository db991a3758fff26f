//! Persistent scope tree.

use crate::symbols::SymbolId;
use mustuse_parser::NodeIndex;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    SourceFile,
    Function,
    Block,
    Class,
    Module,
}

/// Name to symbol map for one meaning (values or types) of one scope.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn set(&mut self, name: String, symbol: SymbolId) {
        self.symbols.insert(name, symbol);
    }

    pub fn has(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SymbolId)> {
        self.symbols.iter()
    }
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub parent: ScopeId,
    pub kind: ContainerKind,
    /// Node that opened the scope (source file, function, block, ...).
    pub container: NodeIndex,
    /// Value meanings.
    pub table: SymbolTable,
    /// Type meanings (interfaces, aliases, type parameters, classes, enums).
    pub types: SymbolTable,
    pub children: Vec<ScopeId>,
}

impl Scope {
    pub fn new(parent: ScopeId, kind: ContainerKind, container: NodeIndex) -> Self {
        Scope {
            parent,
            kind,
            container,
            table: SymbolTable::new(),
            types: SymbolTable::new(),
            children: Vec::new(),
        }
    }

    /// `var` declarations hoist up to the nearest scope of these kinds.
    pub fn is_var_container(&self) -> bool {
        matches!(
            self.kind,
            ContainerKind::SourceFile | ContainerKind::Function | ContainerKind::Module
        )
    }
}
