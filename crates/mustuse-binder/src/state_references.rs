//! Reference pass: resolves identifiers in value position and records them
//! on their symbols in document order.

use crate::symbols::{Reference, reference_flags};
use mustuse_common::limits::MAX_TREE_WALK_ITERATIONS;
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex};
use mustuse_scanner::SyntaxKind;
use tracing::{trace, warn};

use super::state::BinderState;

impl BinderState {
    pub(crate) fn collect_references(&mut self, arena: &NodeArena, root: NodeIndex) {
        let mut stack = vec![root];
        let mut visited: u64 = 0;
        let budget = u64::from(MAX_TREE_WALK_ITERATIONS) * 1_000;

        while let Some(idx) = stack.pop() {
            visited += 1;
            if visited > budget {
                warn!(file = %self.file_name, "reference walk budget exhausted");
                break;
            }
            let Some(node) = arena.get(idx) else {
                continue;
            };
            if Self::is_type_only_subtree(arena, idx) {
                continue;
            }
            if node.kind == SyntaxKind::Identifier as u16 {
                self.record_reference(arena, idx);
                continue;
            }
            // Reverse so children pop in source order.
            stack.extend(arena.get_children(idx).into_iter().rev());
        }
    }

    fn record_reference(&mut self, arena: &NodeArena, ident: NodeIndex) {
        let parent = arena.parent_of(ident);
        if !Self::is_reference_position(arena, ident, parent) {
            return;
        }
        let Some(name) = arena.identifier_text(ident) else {
            return;
        };
        let scope = self.scope_of(arena, parent);
        let Some(symbol_id) = self.lookup_value(scope, name) else {
            trace!(name, "unresolved identifier");
            return;
        };
        let flags = Self::reference_flags_for(arena, ident, parent);
        self.identifier_symbols.insert(ident.0, symbol_id);
        if let Some(symbol) = self.symbols.get_mut(symbol_id) {
            symbol.references.push(Reference { node: ident, flags });
        }
    }

    /// Subtrees that never contain value references: type annotations,
    /// type parameters, interfaces, type aliases, signatures and
    /// `implements` clauses.
    fn is_type_only_subtree(arena: &NodeArena, idx: NodeIndex) -> bool {
        let Some(node) = arena.get(idx) else {
            return true;
        };
        if node.is_type_node() {
            return true;
        }
        match node.kind {
            k if k == syntax_kind_ext::TYPE_PARAMETER
                || k == syntax_kind_ext::INTERFACE_DECLARATION
                || k == syntax_kind_ext::TYPE_ALIAS_DECLARATION
                || k == syntax_kind_ext::PROPERTY_SIGNATURE
                || k == syntax_kind_ext::METHOD_SIGNATURE
                || k == syntax_kind_ext::CALL_SIGNATURE
                || k == syntax_kind_ext::CONSTRUCT_SIGNATURE
                || k == syntax_kind_ext::INDEX_SIGNATURE =>
            {
                true
            }
            k if k == syntax_kind_ext::HERITAGE_CLAUSE => arena
                .get_heritage_clause(node)
                .is_some_and(|clause| clause.token == SyntaxKind::ImplementsKeyword as u16),
            _ => false,
        }
    }

    /// Whether an identifier under `parent` reads or writes a binding, as
    /// opposed to naming a declaration, a property or a label.
    pub(crate) fn is_reference_position(
        arena: &NodeArena,
        ident: NodeIndex,
        parent: NodeIndex,
    ) -> bool {
        let Some(parent_node) = arena.get(parent) else {
            return false;
        };
        match parent_node.kind {
            k if k == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => arena
                .get_access_expr(parent_node)
                .is_some_and(|access| access.name_or_argument != ident),
            k if k == syntax_kind_ext::VARIABLE_DECLARATION => arena
                .get_variable_declaration(parent_node)
                .is_some_and(|decl| decl.name != ident),
            k if k == syntax_kind_ext::PARAMETER => arena
                .get_parameter(parent_node)
                .is_some_and(|param| param.name != ident),
            k if k == syntax_kind_ext::BINDING_ELEMENT => arena
                .get_binding_element(parent_node)
                .is_some_and(|element| element.name != ident && element.property_name != ident),
            k if k == syntax_kind_ext::PROPERTY_ASSIGNMENT
                || k == syntax_kind_ext::ENUM_MEMBER =>
            {
                arena
                    .get_property_assignment(parent_node)
                    .is_some_and(|assignment| assignment.name != ident)
            }
            k if k == syntax_kind_ext::PROPERTY_DECLARATION => arena
                .get_property_decl(parent_node)
                .is_some_and(|property| property.name != ident),
            k if k == syntax_kind_ext::FUNCTION_DECLARATION
                || k == syntax_kind_ext::FUNCTION_EXPRESSION
                || k == syntax_kind_ext::METHOD_DECLARATION
                || k == syntax_kind_ext::CONSTRUCTOR
                || k == syntax_kind_ext::GET_ACCESSOR
                || k == syntax_kind_ext::SET_ACCESSOR
                || k == syntax_kind_ext::ARROW_FUNCTION =>
            {
                // Only an arrow's expression body can be a bare identifier.
                arena
                    .get_function(parent_node)
                    .is_some_and(|func| func.name != ident)
            }
            k if k == syntax_kind_ext::CLASS_DECLARATION
                || k == syntax_kind_ext::CLASS_EXPRESSION
                || k == syntax_kind_ext::ENUM_DECLARATION =>
            {
                arena
                    .get_class(parent_node)
                    .is_some_and(|class| class.name != ident)
            }
            k if k == syntax_kind_ext::MODULE_DECLARATION
                || k == syntax_kind_ext::QUALIFIED_NAME
                || k == syntax_kind_ext::IMPORT_DECLARATION
                || k == syntax_kind_ext::IMPORT_SPECIFIER
                || k == syntax_kind_ext::BREAK_STATEMENT
                || k == syntax_kind_ext::CONTINUE_STATEMENT =>
            {
                false
            }
            k if k == syntax_kind_ext::EXPORT_SPECIFIER => {
                Self::is_local_export_name(arena, ident, parent)
            }
            _ => true,
        }
    }

    /// `export { local as exported }` reads `local` unless it re-exports
    /// from another module.
    fn is_local_export_name(arena: &NodeArena, ident: NodeIndex, specifier: NodeIndex) -> bool {
        let Some(data) = arena
            .get(specifier)
            .and_then(|node| arena.get_specifier(node))
        else {
            return false;
        };
        let local = if data.property_name.is_some() {
            data.property_name
        } else {
            data.name
        };
        if local != ident {
            return false;
        }
        let declaration = arena.parent_of(specifier);
        !arena
            .get(declaration)
            .and_then(|node| arena.get_export_decl(node))
            .is_some_and(|export| export.module_specifier.is_some())
    }

    fn reference_flags_for(arena: &NodeArena, ident: NodeIndex, parent: NodeIndex) -> u8 {
        let Some(parent_node) = arena.get(parent) else {
            return reference_flags::READ;
        };
        match parent_node.kind {
            k if k == syntax_kind_ext::BINARY_EXPRESSION => {
                let Some(binary) = arena.get_binary_expr(parent_node) else {
                    return reference_flags::READ;
                };
                let is_assignment = binary.operator_token >= SyntaxKind::EqualsToken as u16
                    && binary.operator_token <= SyntaxKind::QuestionQuestionEqualsToken as u16;
                if binary.left != ident || !is_assignment {
                    reference_flags::READ
                } else if binary.operator_token == SyntaxKind::EqualsToken as u16 {
                    reference_flags::WRITE
                } else {
                    reference_flags::READ | reference_flags::WRITE
                }
            }
            k if k == syntax_kind_ext::PREFIX_UNARY_EXPRESSION
                || k == syntax_kind_ext::POSTFIX_UNARY_EXPRESSION =>
            {
                let is_update = arena.get_unary_expr(parent_node).is_some_and(|unary| {
                    unary.operator == SyntaxKind::PlusPlusToken as u16
                        || unary.operator == SyntaxKind::MinusMinusToken as u16
                });
                if is_update {
                    reference_flags::READ | reference_flags::WRITE
                } else {
                    reference_flags::READ
                }
            }
            k if k == syntax_kind_ext::FOR_IN_STATEMENT
                || k == syntax_kind_ext::FOR_OF_STATEMENT =>
            {
                if arena
                    .get_for_in_of(parent_node)
                    .is_some_and(|stmt| stmt.initializer == ident)
                {
                    reference_flags::WRITE
                } else {
                    reference_flags::READ
                }
            }
            _ => reference_flags::READ,
        }
    }
}
