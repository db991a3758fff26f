//! Binder state: scope tree, symbol arena and name resolution queries.
//!
//! Binding runs in two passes over one source file:
//!
//! 1. `bind_node` walks statements, opens scopes and declares every symbol
//!    (`var` and function declarations hoist, `let`/`const`/classes stay in
//!    their block).
//! 2. `collect_references` walks the finished tree in document order and
//!    records every identifier in value position against the symbol it
//!    resolves to.
//!
//! After `bind_source_file` returns the state is only queried.

use crate::scopes::{ContainerKind, Scope, ScopeId, SymbolTable};
use crate::symbols::{Symbol, SymbolArena, SymbolId, symbol_flags};
use mustuse_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use mustuse_parser::{NodeArena, NodeIndex};
use rustc_hash::FxHashMap;
use tracing::{Level, debug, span, trace};

pub struct BinderState {
    pub symbols: SymbolArena,
    /// Scope 0 is the source file scope once binding has run.
    pub scopes: Vec<Scope>,
    /// Container node -> scope it opened.
    pub(crate) node_scope_ids: FxHashMap<u32, ScopeId>,
    /// Declaration node and declaration name node -> declared symbol.
    pub(crate) node_symbols: FxHashMap<u32, SymbolId>,
    /// Identifier node -> symbol, filled by the reference pass.
    pub(crate) identifier_symbols: FxHashMap<u32, SymbolId>,
    pub(crate) current_scope_id: ScopeId,
    pub(crate) file_name: String,
}

impl Default for BinderState {
    fn default() -> Self {
        Self::new()
    }
}

impl BinderState {
    pub fn new() -> Self {
        BinderState {
            symbols: SymbolArena::new(),
            scopes: Vec::new(),
            node_scope_ids: FxHashMap::default(),
            node_symbols: FxHashMap::default(),
            identifier_symbols: FxHashMap::default(),
            current_scope_id: ScopeId::NONE,
            file_name: String::new(),
        }
    }

    pub fn reset(&mut self) {
        self.symbols.clear();
        self.scopes.clear();
        self.node_scope_ids.clear();
        self.node_symbols.clear();
        self.identifier_symbols.clear();
        self.current_scope_id = ScopeId::NONE;
        self.file_name.clear();
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Bind one parsed source file. Any previous state is discarded.
    pub fn bind_source_file(&mut self, arena: &NodeArena, root: NodeIndex) {
        self.reset();
        let Some(source_file) = arena.get_source_file_at(root) else {
            return;
        };
        self.file_name = source_file.file_name.clone();
        let _span = span!(Level::DEBUG, "bind_source_file", file = %self.file_name).entered();

        self.enter_scope(ContainerKind::SourceFile, root);
        for &statement in &source_file.statements.nodes {
            self.bind_node(arena, statement);
        }
        self.exit_scope();

        self.collect_references(arena, root);

        debug!(
            symbols = self.symbols.len(),
            scopes = self.scopes.len(),
            references = self.identifier_symbols.len(),
            "bound source file"
        );
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope> {
        if id.is_none() {
            return None;
        }
        self.scopes.get(id.0 as usize)
    }

    /// Values declared at the top level of the file.
    pub fn file_locals(&self) -> Option<&SymbolTable> {
        self.scopes.first().map(|scope| &scope.table)
    }

    /// Types declared at the top level of the file.
    pub fn file_type_locals(&self) -> Option<&SymbolTable> {
        self.scopes.first().map(|scope| &scope.types)
    }

    /// Innermost scope enclosing `node`. A container node maps to the scope
    /// it opened.
    pub fn scope_of(&self, arena: &NodeArena, node: NodeIndex) -> ScopeId {
        let mut current = node;
        let mut iterations = 0;
        while current.is_some() && iterations < MAX_SCOPE_WALK_ITERATIONS {
            if let Some(&scope_id) = self.node_scope_ids.get(&current.0) {
                return scope_id;
            }
            current = arena.parent_of(current);
            iterations += 1;
        }
        if self.scopes.is_empty() {
            ScopeId::NONE
        } else {
            ScopeId(0)
        }
    }

    /// Scope opened by a container node (function, block, class, module).
    pub fn scope_for_container(&self, node: NodeIndex) -> Option<ScopeId> {
        self.node_scope_ids.get(&node.0).copied()
    }

    /// Symbol declared by a declaration node or its name identifier.
    pub fn symbol_for_declaration(&self, node: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&node.0).copied()
    }

    /// Value symbol an identifier resolves to, walking the scope chain.
    pub fn resolve_identifier(&self, arena: &NodeArena, node: NodeIndex) -> Option<SymbolId> {
        if let Some(&symbol) = self.identifier_symbols.get(&node.0) {
            return Some(symbol);
        }
        if let Some(symbol) = self.symbol_for_declaration(node) {
            return Some(symbol);
        }
        let name = arena.identifier_text(node)?;
        let scope = self.scope_of(arena, arena.parent_of(node));
        self.lookup_value(scope, name)
    }

    /// Type symbol named `name` visible from `node`.
    pub fn resolve_type_name(
        &self,
        arena: &NodeArena,
        node: NodeIndex,
        name: &str,
    ) -> Option<SymbolId> {
        let scope = self.scope_of(arena, node);
        self.walk_scopes(scope, |scope| scope.types.get(name))
    }

    pub fn lookup_value(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let found = self.walk_scopes(scope, |scope| scope.table.get(name));
        trace!(name, found = found.is_some(), "lookup_value");
        found
    }

    fn walk_scopes(
        &self,
        start: ScopeId,
        mut lookup: impl FnMut(&Scope) -> Option<SymbolId>,
    ) -> Option<SymbolId> {
        let mut scope_id = start;
        let mut iterations = 0;
        while let Some(scope) = self.get_scope(scope_id) {
            if let Some(symbol) = lookup(scope) {
                return Some(symbol);
            }
            iterations += 1;
            if iterations >= MAX_SCOPE_WALK_ITERATIONS {
                break;
            }
            scope_id = scope.parent;
        }
        None
    }

    // =========================================================================
    // Scope management
    // =========================================================================

    pub(crate) fn enter_scope(&mut self, kind: ContainerKind, container: NodeIndex) {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes
            .push(Scope::new(self.current_scope_id, kind, container));
        if !self.current_scope_id.is_none()
            && let Some(parent) = self.scopes.get_mut(self.current_scope_id.0 as usize)
        {
            parent.children.push(id);
        }
        if container.is_some() {
            self.node_scope_ids.insert(container.0, id);
        }
        self.current_scope_id = id;
    }

    pub(crate) fn exit_scope(&mut self) {
        if let Some(scope) = self.get_scope(self.current_scope_id) {
            self.current_scope_id = scope.parent;
        }
    }

    /// Nearest enclosing scope that receives `var` declarations.
    pub(crate) fn var_scope_id(&self) -> ScopeId {
        let mut scope_id = self.current_scope_id;
        while let Some(scope) = self.get_scope(scope_id) {
            if scope.is_var_container() {
                return scope_id;
            }
            scope_id = scope.parent;
        }
        self.current_scope_id
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Declare `name` in `scope_id`, merging with an existing symbol of the
    /// same name when the meanings allow it (interface + interface,
    /// function overloads, namespace + anything, repeated `var`).
    pub(crate) fn declare_symbol(
        &mut self,
        scope_id: ScopeId,
        name: &str,
        flags: u32,
        declaration: NodeIndex,
        name_node: NodeIndex,
    ) -> SymbolId {
        let existing = self.get_scope(scope_id).and_then(|scope| {
            let value = if flags & (symbol_flags::VALUE | symbol_flags::ALIAS) != 0 {
                scope.table.get(name)
            } else {
                None
            };
            value.or_else(|| {
                if flags & symbol_flags::TYPE != 0 {
                    scope.types.get(name)
                } else {
                    None
                }
            })
        });

        let symbol_id = match existing {
            Some(existing_id)
                if self
                    .symbols
                    .get(existing_id)
                    .is_some_and(|symbol| Self::can_merge_flags(symbol.flags, flags)) =>
            {
                trace!(name, symbol = existing_id.0, "merging declaration");
                existing_id
            }
            _ => self.symbols.alloc(flags, name.to_string(), scope_id),
        };

        if let Some(symbol) = self.symbols.get_mut(symbol_id) {
            symbol.flags |= flags;
            if !symbol.declarations.contains(&declaration) {
                symbol.declarations.push(declaration);
            }
            if symbol.value_declaration.is_none() && flags & symbol_flags::VALUE != 0 {
                symbol.value_declaration = declaration;
            }
        }

        if let Some(scope) = self.scopes.get_mut(scope_id.0 as usize) {
            if flags & (symbol_flags::VALUE | symbol_flags::ALIAS) != 0 {
                scope.table.set(name.to_string(), symbol_id);
            }
            if flags & (symbol_flags::TYPE | symbol_flags::ALIAS) != 0 {
                scope.types.set(name.to_string(), symbol_id);
            }
        }
        self.node_symbols.insert(declaration.0, symbol_id);
        if name_node.is_some() {
            self.node_symbols.insert(name_node.0, symbol_id);
        }
        symbol_id
    }

    /// Whether a new declaration with `new_flags` joins an existing symbol.
    pub fn can_merge_flags(existing_flags: u32, new_flags: u32) -> bool {
        let both = |flag: u32| existing_flags & flag != 0 && new_flags & flag != 0;
        if both(symbol_flags::INTERFACE)
            || both(symbol_flags::FUNCTION)
            || both(symbol_flags::FUNCTION_SCOPED_VARIABLE)
            || both(symbol_flags::ENUM)
        {
            return true;
        }
        if existing_flags & symbol_flags::NAMESPACE != 0 || new_flags & symbol_flags::NAMESPACE != 0
        {
            return true;
        }
        // A class or a value may share its name with an interface.
        let values = symbol_flags::VALUE & !symbol_flags::CLASS;
        (existing_flags & symbol_flags::INTERFACE != 0 && new_flags & symbol_flags::TYPE == 0)
            || (new_flags & symbol_flags::INTERFACE != 0 && existing_flags & symbol_flags::TYPE == 0)
            || (existing_flags & symbol_flags::INTERFACE != 0 && new_flags & symbol_flags::CLASS != 0)
            || (new_flags & symbol_flags::INTERFACE != 0 && existing_flags & symbol_flags::CLASS != 0)
            || (existing_flags & symbol_flags::TYPE_ALIAS != 0 && new_flags & values != 0)
            || (new_flags & symbol_flags::TYPE_ALIAS != 0 && existing_flags & values != 0)
    }
}
