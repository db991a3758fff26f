//! Member access typing and the solver queries the checker wraps.
//!
//! Every query first fills pending class and interface shells, so a lookup
//! never sees a declaration whose members are still unlowered.

use mustuse_parser::NodeIndex;
use mustuse_parser::parser::node_flags;
use mustuse_scanner::SyntaxKind;
use mustuse_solver::{
    TypeId, TypeKey, array_element_type, awaited_type, call_return_type, construct_return_type,
    property_type,
};

use crate::context::FileId;
use crate::state::CheckerState;

impl<'a> CheckerState<'a> {
    pub(crate) fn property_access_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(node) = arena.get(index) else {
            return TypeId::ANY;
        };
        let Some(access) = arena.get_access_expr(node) else {
            return TypeId::ANY;
        };
        if access.expression.is_none() {
            return TypeId::ANY;
        }
        let Some(name) = arena.identifier_text(access.name_or_argument) else {
            return TypeId::ANY;
        };
        let object = self.get_type_of_node(file, access.expression);
        let found = match self.property_of(object, name) {
            Some(found) => found,
            None if name == "length" && self.element_type_of(object).is_some() => TypeId::NUMBER,
            None => TypeId::ANY,
        };
        if node.has_flag(node_flags::OPTIONAL_CHAIN) {
            self.ctx.types.union(vec![found, TypeId::UNDEFINED])
        } else {
            found
        }
    }

    /// `obj["name"]`, `tuple[0]` and `array[i]`.
    pub(crate) fn element_access_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(access) = arena.get(index).and_then(|node| arena.get_access_expr(node)) else {
            return TypeId::ANY;
        };
        let object = self.get_type_of_node(file, access.expression);
        let Some(argument) = arena.get(access.name_or_argument) else {
            return TypeId::ANY;
        };

        if argument.kind == SyntaxKind::StringLiteral as u16
            || argument.kind == SyntaxKind::NoSubstitutionTemplateLiteral as u16
        {
            if let Some(text) = arena.get_literal(argument).map(|literal| literal.text.as_str())
                && let Some(found) = self.property_of(object, text)
            {
                return found;
            }
            return TypeId::ANY;
        }
        if argument.kind == SyntaxKind::NumericLiteral as u16
            && let Some(TypeKey::Tuple(elements)) = self.ctx.types.lookup(object)
        {
            let position = arena
                .get_literal(argument)
                .and_then(|literal| literal.text.parse::<usize>().ok());
            if let Some(&element) = position.and_then(|i| elements.get(i)) {
                return element;
            }
        }
        self.element_type_of(object).unwrap_or(TypeId::ANY)
    }

    // =========================================================================
    // Solver wrappers
    // =========================================================================

    pub(crate) fn property_of(&mut self, object: TypeId, name: &str) -> Option<TypeId> {
        self.drain_pending();
        property_type(&mut self.ctx.types, object, name)
    }

    pub(crate) fn call_return_of(&mut self, callee: TypeId) -> Option<TypeId> {
        self.drain_pending();
        call_return_type(&mut self.ctx.types, callee)
    }

    pub(crate) fn construct_of(&mut self, constructor: TypeId) -> Option<TypeId> {
        self.drain_pending();
        construct_return_type(&mut self.ctx.types, constructor)
    }

    pub(crate) fn awaited_of(&mut self, operand: TypeId) -> TypeId {
        self.drain_pending();
        awaited_type(&mut self.ctx.types, operand)
    }

    pub(crate) fn element_type_of(&mut self, iterable: TypeId) -> Option<TypeId> {
        array_element_type(&mut self.ctx.types, iterable)
    }
}
