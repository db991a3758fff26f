//! Symbol Resolution Module
//!
//! Name lookup across the checked file and the lib files:
//! - values and types through the binder's scope chain, then lib globals
//! - import bindings through `declare module "m"` blocks of lib files
//! - namespaces and dotted entity names (`ns.Result`, `a.b.C`)

use mustuse_binder::{ScopeId, symbol_flags};
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex};
use mustuse_scanner::SyntaxKind;
use mustuse_solver::TypeId;
use smallvec::SmallVec;
use tracing::trace;

use crate::context::{FileId, SymbolRef};
use crate::state::CheckerState;

/// Bound on alias hops (`import` of an `import`) and dotted name segments.
const MAX_ALIAS_HOPS: u32 = 16;

/// Which table of a scope a lookup consults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Meaning {
    Value,
    Type,
}

/// Scopes a namespace value exposes; merged namespaces have several.
#[derive(Clone, Debug, Default)]
pub(crate) struct NamespaceScopes {
    pub(crate) scopes: SmallVec<[(FileId, ScopeId); 2]>,
}

impl NamespaceScopes {
    pub(crate) fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// What an import binding refers to.
#[derive(Clone, Debug)]
pub(crate) enum ImportTarget {
    Symbol(SymbolRef),
    /// `import * as ns from "m"`
    Namespace(NamespaceScopes),
}

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Plain names
    // =========================================================================

    /// Value named `name` visible from `at` in `file`, falling back to lib
    /// globals.
    pub(crate) fn resolve_value_name(&self, file: FileId, at: NodeIndex, name: &str) -> Option<SymbolRef> {
        let (arena, binder) = self.ctx.view(file)?;
        let scope = binder.scope_of(arena, at);
        if let Some(symbol) = binder.lookup_value(scope, name) {
            return Some(SymbolRef::new(file, symbol));
        }
        self.resolve_global(name, Meaning::Value, file)
    }

    /// Type named `name` visible from `at` in `file`, falling back to lib
    /// globals.
    pub(crate) fn resolve_type_symbol(&self, file: FileId, at: NodeIndex, name: &str) -> Option<SymbolRef> {
        let (arena, binder) = self.ctx.view(file)?;
        if let Some(symbol) = binder.resolve_type_name(arena, at, name) {
            return Some(SymbolRef::new(file, symbol));
        }
        self.resolve_global(name, Meaning::Type, file)
    }

    /// Top-level declaration of some lib file other than `except`.
    pub(crate) fn resolve_global(&self, name: &str, meaning: Meaning, except: FileId) -> Option<SymbolRef> {
        self.ctx
            .file_ids()
            .filter(|&file| file != FileId::CHECKED && file != except)
            .find_map(|file| {
                let (_, binder) = self.ctx.view(file)?;
                let table = match meaning {
                    Meaning::Value => binder.file_locals()?,
                    Meaning::Type => binder.file_type_locals()?,
                };
                table.get(name).map(|symbol| SymbolRef::new(file, symbol))
            })
    }

    /// Declared type of a global type such as `Promise`, if some lib
    /// declares it.
    pub(crate) fn global_declared_type(&mut self, name: &str) -> Option<TypeId> {
        let symbol = self.resolve_global(name, Meaning::Type, FileId::CHECKED)?;
        Some(self.get_declared_type_of_symbol(symbol))
    }

    // =========================================================================
    // Imports
    // =========================================================================

    /// Follow an import binding to the declaration it names.
    ///
    /// Lib files are searched for a `declare module "m"` block first; a named
    /// import that no such block provides falls back to the lib globals, so
    /// a plain `.d.ts` of top-level declarations also serves as a module.
    pub(crate) fn resolve_import(&self, alias: SymbolRef, meaning: Meaning) -> Option<ImportTarget> {
        let mut current = alias;
        for _ in 0..MAX_ALIAS_HOPS {
            let (_, binder) = self.ctx.view(current.file)?;
            let symbol = binder.get_symbol(current.symbol)?;
            if !symbol.has_any_flags(symbol_flags::ALIAS) {
                return Some(ImportTarget::Symbol(current));
            }
            let module = symbol.import_module.as_deref()?;
            let imported = symbol.import_name.as_deref()?;

            let module_scopes = self.ambient_module_scopes(module);
            if imported == "*" {
                if module_scopes.is_empty() {
                    trace!(module, "namespace import of an unknown module");
                    return None;
                }
                return Some(ImportTarget::Namespace(module_scopes));
            }
            let found = self
                .lookup_in_scopes(&module_scopes, imported, meaning)
                .or_else(|| {
                    (imported != "default")
                        .then(|| self.resolve_global(imported, meaning, FileId::CHECKED))
                        .flatten()
                });
            match found {
                Some(next) if next != current => current = next,
                _ => {
                    trace!(module, imported, "unresolved import");
                    return None;
                }
            }
        }
        None
    }

    /// Scopes of every `declare module "name" { ... }` block in the lib
    /// files.
    fn ambient_module_scopes(&self, name: &str) -> NamespaceScopes {
        let mut found = NamespaceScopes::default();
        for (index, lib) in self.ctx.libs.iter().enumerate() {
            for &statement in lib.arena.source_file_statements(lib.root) {
                let Some(node) = lib.arena.get(statement) else {
                    continue;
                };
                if node.kind != syntax_kind_ext::MODULE_DECLARATION {
                    continue;
                }
                let Some(module) = lib.arena.get_module_decl(node) else {
                    continue;
                };
                let names_module = lib
                    .arena
                    .get(module.name)
                    .filter(|name_node| name_node.kind == SyntaxKind::StringLiteral as u16)
                    .and_then(|name_node| lib.arena.get_literal(name_node))
                    .is_some_and(|literal| literal.text == name);
                if names_module && let Some(scope) = lib.binder.scope_for_container(statement) {
                    found.scopes.push((FileId::lib(index), scope));
                }
            }
        }
        found
    }

    pub(crate) fn lookup_in_scopes(
        &self,
        scopes: &NamespaceScopes,
        name: &str,
        meaning: Meaning,
    ) -> Option<SymbolRef> {
        scopes.scopes.iter().find_map(|&(file, scope_id)| {
            let (_, binder) = self.ctx.view(file)?;
            let scope = binder.get_scope(scope_id)?;
            let table = match meaning {
                Meaning::Value => &scope.table,
                Meaning::Type => &scope.types,
            };
            table.get(name).map(|symbol| SymbolRef::new(file, symbol))
        })
    }

    // =========================================================================
    // Namespaces and dotted names
    // =========================================================================

    /// Scopes a symbol exposes as a namespace: its `namespace` blocks, or the
    /// module of a `* as ns` import.
    pub(crate) fn namespace_scopes_of(&self, symbol: SymbolRef) -> NamespaceScopes {
        let target = match self.resolve_import(symbol, Meaning::Value) {
            Some(ImportTarget::Namespace(scopes)) => return scopes,
            Some(ImportTarget::Symbol(target)) => target,
            None => return NamespaceScopes::default(),
        };
        let mut found = NamespaceScopes::default();
        let Some((arena, binder)) = self.ctx.view(target.file) else {
            return found;
        };
        let Some(data) = binder.get_symbol(target.symbol) else {
            return found;
        };
        if !data.has_any_flags(symbol_flags::NAMESPACE) {
            return found;
        }
        for &declaration in &data.declarations {
            if arena.kind_of(declaration) == Some(syntax_kind_ext::MODULE_DECLARATION)
                && let Some(scope) = binder.scope_for_container(declaration)
            {
                found.scopes.push((target.file, scope));
            }
        }
        found
    }

    /// Resolve a dotted entity (`a.b.C` as a qualified name or a property
    /// access chain). The last segment is looked up with `meaning`, earlier
    /// ones as namespaces. `namespace a.b.c { }` binds a single scope for
    /// the whole path, so a segment that is not found leaves the current
    /// scopes in place.
    pub(crate) fn resolve_entity_name(
        &self,
        file: FileId,
        entity: NodeIndex,
        meaning: Meaning,
    ) -> Option<SymbolRef> {
        let arena = self.ctx.arena_of(file)?;
        let segments = entity_segments(arena, entity)?;
        let (first, rest) = segments.split_first()?;
        if rest.is_empty() {
            return match meaning {
                Meaning::Value => self.resolve_value_name(file, entity, first),
                Meaning::Type => self.resolve_type_symbol(file, entity, first),
            };
        }

        let root = self.resolve_value_name(file, entity, first)?;
        let mut scopes = self.namespace_scopes_of(root);
        let (last, middle) = rest.split_last()?;
        for segment in middle {
            if let Some(inner) = self.lookup_in_scopes(&scopes, segment, Meaning::Value) {
                let inner_scopes = self.namespace_scopes_of(inner);
                if !inner_scopes.is_empty() {
                    scopes = inner_scopes;
                }
            }
        }
        self.lookup_in_scopes(&scopes, last, meaning)
    }
}

/// Names of a dotted entity, left to right.
pub(crate) fn entity_segments(arena: &NodeArena, entity: NodeIndex) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = entity;
    for _ in 0..MAX_ALIAS_HOPS * 4 {
        let node = arena.get(current)?;
        if let Some(text) = arena.identifier_text(current) {
            segments.push(text.to_string());
            segments.reverse();
            return Some(segments);
        }
        if let Some(qualified) = arena.get_qualified_name(node) {
            segments.push(arena.identifier_text(qualified.right)?.to_string());
            current = qualified.left;
        } else if node.kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION {
            let access = arena.get_access_expr(node)?;
            segments.push(arena.identifier_text(access.name_or_argument)?.to_string());
            current = access.expression;
        } else {
            return None;
        }
    }
    None
}
