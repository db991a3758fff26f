//! Following a must-use value into the variable it is stored in.

use mustuse_binder::{BinderState, SymbolId};
use mustuse_common::limits::MAX_TREE_WALK_ITERATIONS;
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex};
use smallvec::SmallVec;

use crate::navigator::is_scope_boundary;
use crate::node_types::TypeOracle;

/// Variable a must-use value ends up in.
pub(super) struct Binding {
    pub(super) name: String,
    pub(super) symbol: SymbolId,
}

/// Nearest enclosing `const x = ...` (up to the enclosing block) whose
/// initializer is must-use and whose name is a plain identifier.
/// Destructuring patterns never bind the value itself.
pub(super) fn resolve_assignment(
    arena: &NodeArena,
    binder: &BinderState,
    oracle: &dyn TypeOracle,
    protocol: &[String],
    node: NodeIndex,
) -> Option<Binding> {
    let mut current = arena.parent_of(node);
    for _ in 0..MAX_TREE_WALK_ITERATIONS {
        let current_node = arena.get(current)?;
        if current_node.kind == syntax_kind_ext::VARIABLE_DECLARATION {
            if let Some(declaration) = arena.get_variable_declaration(current_node)
                && let Some(name) = arena.identifier_text(declaration.name)
                && declaration.initializer.is_some()
                && oracle.is_must_use(declaration.initializer, protocol)
            {
                let symbol = binder
                    .symbol_for_declaration(current)
                    .or_else(|| binder.symbol_for_declaration(declaration.name))?;
                return Some(Binding {
                    name: name.to_string(),
                    symbol,
                });
            }
        }
        if is_scope_boundary(current_node.kind) {
            return None;
        }
        current = arena.parent_of(current);
    }
    None
}

/// Every occurrence of the binding after its declaration, nested scopes
/// included, in document order.
pub(super) fn all_reads(binder: &BinderState, binding: &Binding) -> SmallVec<[NodeIndex; 4]> {
    binder
        .get_symbol(binding.symbol)
        .map(|symbol| symbol.references.iter().map(|reference| reference.node).collect())
        .unwrap_or_default()
}
