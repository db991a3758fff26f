//! Symbols and the references recorded against them.

use crate::scopes::ScopeId;
use mustuse_parser::NodeIndex;
use smallvec::SmallVec;

/// Index into a binder's `SymbolArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const FUNCTION_SCOPED_VARIABLE: u32 = 1 << 0;
    pub const BLOCK_SCOPED_VARIABLE: u32 = 1 << 1;
    pub const PARAMETER: u32 = 1 << 2;
    pub const FUNCTION: u32 = 1 << 3;
    pub const CLASS: u32 = 1 << 4;
    pub const INTERFACE: u32 = 1 << 5;
    pub const TYPE_ALIAS: u32 = 1 << 6;
    pub const TYPE_PARAMETER: u32 = 1 << 7;
    pub const ENUM: u32 = 1 << 8;
    pub const NAMESPACE: u32 = 1 << 9;
    /// Import binding; `import_module`/`import_name` say what it aliases.
    pub const ALIAS: u32 = 1 << 10;

    pub const VARIABLE: u32 = FUNCTION_SCOPED_VARIABLE | BLOCK_SCOPED_VARIABLE;
    pub const VALUE: u32 = VARIABLE | PARAMETER | FUNCTION | CLASS | ENUM | NAMESPACE;
    pub const TYPE: u32 = CLASS | INTERFACE | TYPE_ALIAS | TYPE_PARAMETER | ENUM;
}

pub mod reference_flags {
    pub const READ: u8 = 1 << 0;
    pub const WRITE: u8 = 1 << 1;
}

/// One identifier occurrence resolving to a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    pub node: NodeIndex,
    pub flags: u8,
}

impl Reference {
    #[inline]
    pub fn is_read(&self) -> bool {
        self.flags & reference_flags::READ != 0
    }

    #[inline]
    pub fn is_write(&self) -> bool {
        self.flags & reference_flags::WRITE != 0
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub flags: u32,
    /// Declaration nodes in source order (merged interfaces, overloads).
    pub declarations: SmallVec<[NodeIndex; 2]>,
    /// First declaration that introduced a value meaning.
    pub value_declaration: NodeIndex,
    /// Scope the symbol is declared in.
    pub scope: ScopeId,
    pub is_exported: bool,
    pub import_module: Option<String>,
    /// Imported export name: `"default"`, `"*"` or the named export.
    pub import_name: Option<String>,
    /// Every resolved occurrence, in document order. Declaration names are
    /// not included.
    pub references: Vec<Reference>,
}

impl Symbol {
    fn new(id: SymbolId, flags: u32, name: String, scope: ScopeId) -> Self {
        Symbol {
            id,
            name,
            flags,
            declarations: SmallVec::new(),
            value_declaration: NodeIndex::NONE,
            scope,
            is_exported: false,
            import_module: None,
            import_name: None,
            references: Vec::new(),
        }
    }

    #[inline]
    pub fn has_any_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    pub fn reads(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.is_read())
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, flags: u32, name: String, scope: ScopeId) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(id, flags, name, scope));
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}
