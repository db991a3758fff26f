//! Type Computation Module
//!
//! Expression types, as far as the must-use analysis needs them. Types flow
//! bottom-up from declarations; there is no contextual typing, narrowing or
//! generic instantiation, and anything the model cannot express is `any`.

use mustuse_binder::symbol_flags;
use mustuse_common::limits::MAX_TREE_WALK_ITERATIONS;
use mustuse_parser::NodeIndex;
use mustuse_parser::parser::{modifier_flags, node_flags, syntax_kind_ext};
use mustuse_scanner::SyntaxKind;
use mustuse_solver::{ObjectShape, PropertyInfo, TypeId, TypeInterner, TypeKey, union_parts};
use tracing::trace;

use crate::context::{FileId, NodeRef, SymbolRef};
use crate::state::CheckerState;
use crate::symbol_resolver::Meaning;

impl<'a> CheckerState<'a> {
    /// Type of an expression node, cached per node. A node whose type
    /// depends on itself (`const x = f(x)`) is `any`.
    pub fn get_type_of_node(&mut self, file: FileId, node: NodeIndex) -> TypeId {
        if node.is_none() {
            return TypeId::ANY;
        }
        let key = NodeRef::new(file, node);
        if let Some(&cached) = self.ctx.node_types.get(&key) {
            return cached;
        }
        let entered = self.ctx.node_guard.enter(key);
        if !entered.is_entered() {
            trace!(node = node.0, ?entered, "expression type not computed");
            return TypeId::ANY;
        }
        let result = self.compute_type_of_node(file, node);
        self.ctx.node_guard.leave(key);
        self.ctx.node_types.insert(key, result);
        result
    }

    fn compute_type_of_node(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(node) = arena.get(index) else {
            return TypeId::ANY;
        };

        if node.is_identifier() {
            return self.identifier_type(file, index);
        }
        let kind = node.kind;
        if kind == SyntaxKind::ThisKeyword as u16 {
            return self.this_expression_type(file, index);
        }
        if kind == SyntaxKind::SuperKeyword as u16 {
            let instance = self.this_expression_type(file, index);
            return self.base_instance_of(instance);
        }
        if kind == SyntaxKind::NullKeyword as u16 {
            return TypeId::NULL;
        }
        if kind == SyntaxKind::TrueKeyword as u16 || kind == SyntaxKind::FalseKeyword as u16 {
            return TypeId::BOOLEAN;
        }
        if kind == SyntaxKind::StringLiteral as u16
            || kind == SyntaxKind::NoSubstitutionTemplateLiteral as u16
            || kind == SyntaxKind::TemplateLiteral as u16
        {
            return TypeId::STRING;
        }
        if kind == SyntaxKind::NumericLiteral as u16 {
            return TypeId::NUMBER;
        }
        if kind == SyntaxKind::BigIntLiteral as u16 {
            return TypeId::BIGINT;
        }
        if kind == SyntaxKind::RegularExpressionLiteral as u16 {
            return self.global_declared_type("RegExp").unwrap_or(TypeId::OBJECT);
        }

        match kind {
            syntax_kind_ext::PARENTHESIZED_EXPRESSION
            | syntax_kind_ext::SATISFIES_EXPRESSION
            | syntax_kind_ext::SPREAD_ELEMENT => {
                let inner = match arena.get_unary_expr_ex(node) {
                    Some(unary) => unary.expression,
                    None => arena
                        .get_type_assertion(node)
                        .map_or(NodeIndex::NONE, |assertion| assertion.expression),
                };
                self.get_type_of_node(file, inner)
            }
            syntax_kind_ext::NON_NULL_EXPRESSION => {
                let inner = arena
                    .get_unary_expr_ex(node)
                    .map_or(NodeIndex::NONE, |unary| unary.expression);
                let inner_type = self.get_type_of_node(file, inner);
                self.without_nullish(inner_type)
            }
            syntax_kind_ext::AS_EXPRESSION => {
                let Some(assertion) = arena.get_type_assertion(node) else {
                    return TypeId::ANY;
                };
                let is_const = arena
                    .get(assertion.type_node)
                    .filter(|type_node| type_node.kind == syntax_kind_ext::KEYWORD_TYPE)
                    .and_then(|type_node| arena.get_literal(type_node))
                    .is_some_and(|literal| literal.text == "const");
                if is_const {
                    self.get_type_of_node(file, assertion.expression)
                } else {
                    self.get_type_from_type_node(file, assertion.type_node)
                }
            }
            syntax_kind_ext::CALL_EXPRESSION => self.call_expression_type(file, index),
            syntax_kind_ext::NEW_EXPRESSION => {
                let callee = arena
                    .get_call_expr(node)
                    .map_or(NodeIndex::NONE, |call| call.expression);
                let constructor = self.get_type_of_node(file, callee);
                self.construct_of(constructor).unwrap_or(TypeId::ANY)
            }
            syntax_kind_ext::AWAIT_EXPRESSION => {
                let operand = arena
                    .get_unary_expr_ex(node)
                    .map_or(NodeIndex::NONE, |unary| unary.expression);
                let operand_type = self.get_type_of_node(file, operand);
                self.awaited_of(operand_type)
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => self.property_access_type(file, index),
            syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => self.element_access_type(file, index),
            syntax_kind_ext::FUNCTION_EXPRESSION | syntax_kind_ext::ARROW_FUNCTION => {
                self.function_type_of(file, index)
            }
            syntax_kind_ext::CLASS_EXPRESSION => self.class_types_of(file, index).1,
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION => self.object_literal_type(file, index),
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION => {
                let Some(literal) = arena.get_literal_expr(node) else {
                    return TypeId::ANY;
                };
                let mut elements = Vec::with_capacity(literal.elements.len());
                for element in literal.elements.iter() {
                    let element_type = self.get_type_of_node(file, element);
                    if arena.kind_of(element) == Some(syntax_kind_ext::SPREAD_ELEMENT) {
                        elements.push(self.element_type_of(element_type).unwrap_or(TypeId::ANY));
                    } else {
                        elements.push(element_type);
                    }
                }
                let element = self.ctx.types.union(elements);
                self.ctx.types.array(element)
            }
            syntax_kind_ext::CONDITIONAL_EXPRESSION => {
                let Some(conditional) = arena.get_conditional_expr(node) else {
                    return TypeId::ANY;
                };
                let when_true = self.get_type_of_node(file, conditional.when_true);
                let when_false = self.get_type_of_node(file, conditional.when_false);
                self.ctx.types.union(vec![when_true, when_false])
            }
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => match arena.get_unary_expr(node) {
                Some(unary) if unary.operator == SyntaxKind::ExclamationToken as u16 => TypeId::BOOLEAN,
                _ => TypeId::NUMBER,
            },
            syntax_kind_ext::POSTFIX_UNARY_EXPRESSION => TypeId::NUMBER,
            syntax_kind_ext::TYPE_OF_EXPRESSION => TypeId::STRING,
            syntax_kind_ext::VOID_EXPRESSION => TypeId::UNDEFINED,
            syntax_kind_ext::DELETE_EXPRESSION => TypeId::BOOLEAN,
            syntax_kind_ext::BINARY_EXPRESSION => self.binary_expression_type(file, index),
            _ => TypeId::ANY,
        }
    }

    fn identifier_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some((arena, binder)) = self.ctx.view(file) else {
            return TypeId::ANY;
        };
        let Some(name) = arena.identifier_text(index) else {
            return TypeId::ANY;
        };
        let symbol = binder
            .resolve_identifier(arena, index)
            .map(|symbol| SymbolRef::new(file, symbol))
            .or_else(|| self.resolve_global(name, Meaning::Value, file));
        let Some(symbol) = symbol else {
            return if name == "undefined" {
                TypeId::UNDEFINED
            } else {
                TypeId::ANY
            };
        };
        let is_value = self
            .ctx
            .view(symbol.file)
            .and_then(|(_, binder)| binder.get_symbol(symbol.symbol))
            .is_some_and(|data| data.has_any_flags(symbol_flags::VALUE | symbol_flags::ALIAS));
        if !is_value {
            return TypeId::ANY;
        }
        self.get_type_of_symbol(symbol)
    }

    /// `this` in expression position: the class instance in instance
    /// members, the constructor in static ones, `any` inside non-arrow
    /// functions.
    fn this_expression_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let mut is_static = false;
        let mut current = arena.parent_of(index);
        let mut iterations = 0;
        while let Some(node) = arena.get(current) {
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                break;
            }
            match node.kind {
                syntax_kind_ext::FUNCTION_DECLARATION | syntax_kind_ext::FUNCTION_EXPRESSION => {
                    return TypeId::ANY;
                }
                syntax_kind_ext::METHOD_DECLARATION
                | syntax_kind_ext::PROPERTY_DECLARATION
                | syntax_kind_ext::GET_ACCESSOR
                | syntax_kind_ext::SET_ACCESSOR => {
                    is_static = node.has_flag(modifier_flags::STATIC);
                }
                syntax_kind_ext::CLASS_DECLARATION | syntax_kind_ext::CLASS_EXPRESSION => {
                    let (instance, constructor) = self.class_types_of(file, current);
                    return if is_static { constructor } else { instance };
                }
                syntax_kind_ext::SOURCE_FILE => break,
                _ => {}
            }
            current = arena.parent_of(current);
        }
        TypeId::ANY
    }

    fn base_instance_of(&mut self, instance: TypeId) -> TypeId {
        self.drain_pending();
        let base = match self.ctx.types.lookup(instance) {
            Some(TypeKey::Object(shape) | TypeKey::Class(shape)) => self
                .ctx
                .types
                .shape(*shape)
                .and_then(|shape| shape.bases.first().copied()),
            _ => None,
        };
        base.unwrap_or(TypeId::ANY)
    }

    fn call_expression_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(node) = arena.get(index) else {
            return TypeId::ANY;
        };
        let Some(call) = arena.get_call_expr(node) else {
            return TypeId::ANY;
        };
        let callee_kind = arena.kind_of(call.expression);
        if callee_kind == Some(SyntaxKind::SuperKeyword as u16) {
            return TypeId::VOID;
        }
        if callee_kind == Some(SyntaxKind::ImportKeyword as u16) {
            return self.promise_of(TypeId::ANY);
        }

        let callee = self.get_type_of_node(file, call.expression);
        let result = self.call_return_of(callee).unwrap_or(TypeId::ANY);
        if node.has_flag(node_flags::OPTIONAL_CHAIN) {
            self.ctx.types.union(vec![result, TypeId::UNDEFINED])
        } else {
            result
        }
    }

    fn binary_expression_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(binary) = arena.get(index).and_then(|node| arena.get_binary_expr(node)) else {
            return TypeId::ANY;
        };
        let operator = binary.operator_token;
        let is = |kind: SyntaxKind| operator == kind as u16;

        if is(SyntaxKind::EqualsToken) || is(SyntaxKind::CommaToken) || is(SyntaxKind::AmpersandAmpersandToken) {
            return self.get_type_of_node(file, binary.right);
        }
        if (SyntaxKind::PlusEqualsToken as u16..=SyntaxKind::QuestionQuestionEqualsToken as u16)
            .contains(&operator)
        {
            return self.get_type_of_node(file, binary.left);
        }
        if is(SyntaxKind::BarBarToken) || is(SyntaxKind::QuestionQuestionToken) {
            let left = self.get_type_of_node(file, binary.left);
            let right = self.get_type_of_node(file, binary.right);
            return self.ctx.types.union(vec![left, right]);
        }
        if is(SyntaxKind::LessThanToken)
            || is(SyntaxKind::LessThanEqualsToken)
            || is(SyntaxKind::GreaterThanToken)
            || is(SyntaxKind::EqualsEqualsToken)
            || is(SyntaxKind::ExclamationEqualsToken)
            || is(SyntaxKind::EqualsEqualsEqualsToken)
            || is(SyntaxKind::ExclamationEqualsEqualsToken)
            || is(SyntaxKind::InKeyword)
            || is(SyntaxKind::InstanceOfKeyword)
        {
            return TypeId::BOOLEAN;
        }
        if is(SyntaxKind::PlusToken) {
            let left = self.get_type_of_node(file, binary.left);
            let right = self.get_type_of_node(file, binary.right);
            let has_string = |types: &TypeInterner, id: TypeId| {
                union_parts(types, id).contains(&TypeId::STRING)
            };
            if has_string(&self.ctx.types, left) || has_string(&self.ctx.types, right) {
                return TypeId::STRING;
            }
            if left == TypeId::ANY || right == TypeId::ANY {
                return TypeId::ANY;
            }
        }
        TypeId::NUMBER
    }

    fn object_literal_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(literal) = arena.get(index).and_then(|node| arena.get_literal_expr(node)) else {
            return TypeId::ANY;
        };
        let mut shape = ObjectShape::default();
        for member in literal.elements.iter() {
            let Some(member_node) = arena.get(member) else {
                continue;
            };
            match member_node.kind {
                syntax_kind_ext::PROPERTY_ASSIGNMENT => {
                    let Some(assignment) = arena.get_property_assignment(member_node) else {
                        continue;
                    };
                    let Some(name) = arena.property_name_text(assignment.name) else {
                        continue;
                    };
                    let value = self.get_type_of_node(file, assignment.initializer);
                    shape.add_property(PropertyInfo::new(name, value));
                }
                syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT => {
                    let Some(assignment) = arena.get_property_assignment(member_node) else {
                        continue;
                    };
                    let Some(name) = arena.identifier_text(assignment.name) else {
                        continue;
                    };
                    let value = self.get_type_of_node(file, assignment.name);
                    shape.add_property(PropertyInfo::new(name, value));
                }
                syntax_kind_ext::SPREAD_ASSIGNMENT => {
                    let spread = arena
                        .get_unary_expr_ex(member_node)
                        .map_or(NodeIndex::NONE, |unary| unary.expression);
                    let spread_type = self.get_type_of_node(file, spread);
                    self.drain_pending();
                    if let Some(source) = self
                        .ctx
                        .types
                        .shape_of(spread_type)
                        .and_then(|shape_id| self.ctx.types.shape(shape_id))
                    {
                        for property in source.properties.values() {
                            shape.add_property(property.clone());
                        }
                    }
                }
                syntax_kind_ext::METHOD_DECLARATION | syntax_kind_ext::GET_ACCESSOR => {
                    let Some(name) = arena
                        .get_function(member_node)
                        .and_then(|function| arena.property_name_text(function.name))
                    else {
                        continue;
                    };
                    if member_node.kind == syntax_kind_ext::METHOD_DECLARATION {
                        let method = self.function_type_of(file, member);
                        shape.add_property(PropertyInfo::method(name, method));
                    } else {
                        let value = self.return_type_of(file, member);
                        shape.add_property(PropertyInfo::new(name, value));
                    }
                }
                _ => {}
            }
        }
        self.ctx.types.object_with_shape(shape)
    }

    // =========================================================================
    // Functions
    // =========================================================================

    pub(crate) fn function_type_of(&mut self, file: FileId, function: NodeIndex) -> TypeId {
        let ret = self.return_type_of(file, function);
        self.ctx.types.function(ret)
    }

    /// Declared return type, or the type inferred from the body's `return`
    /// statements. Async functions return a promise of the awaited result.
    pub(crate) fn return_type_of(&mut self, file: FileId, function: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(node) = arena.get(function) else {
            return TypeId::ANY;
        };
        let Some(data) = arena.get_function(node) else {
            // Signatures in type positions (`m(): T`).
            return match arena.get_signature(node) {
                Some(signature) => self.get_type_from_type_node(file, signature.type_annotation),
                None => TypeId::ANY,
            };
        };
        if data.type_annotation.is_some() {
            return self.get_type_from_type_node(file, data.type_annotation);
        }
        if data.body.is_none() || node.has_flag(modifier_flags::GENERATOR) {
            return TypeId::ANY;
        }

        let inferred = if arena.kind_of(data.body) == Some(syntax_kind_ext::BLOCK) {
            let returned: Vec<NodeIndex> = self.collect_return_expressions(file, data.body);
            if returned.is_empty() {
                TypeId::VOID
            } else {
                let types = returned
                    .into_iter()
                    .map(|expression| {
                        if expression.is_none() {
                            TypeId::VOID
                        } else {
                            self.get_type_of_node(file, expression)
                        }
                    })
                    .collect();
                self.ctx.types.union(types)
            }
        } else {
            self.get_type_of_node(file, data.body)
        };

        if node.has_flag(modifier_flags::ASYNC) {
            let awaited = self.awaited_of(inferred);
            self.promise_of(awaited)
        } else {
            inferred
        }
    }

    /// Expressions of the `return` statements that belong to the function
    /// owning `body` (nested functions and classes are skipped). A bare
    /// `return;` contributes NONE.
    fn collect_return_expressions(&self, file: FileId, body: NodeIndex) -> Vec<NodeIndex> {
        let Some(arena) = self.ctx.arena_of(file) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut stack = vec![body];
        let mut iterations = 0;
        while let Some(current) = stack.pop() {
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                trace!(body = body.0, "return collection truncated");
                break;
            }
            let Some(node) = arena.get(current) else {
                continue;
            };
            if current != body
                && (node.is_function_like()
                    || node.kind == syntax_kind_ext::CLASS_DECLARATION
                    || node.kind == syntax_kind_ext::CLASS_EXPRESSION)
            {
                continue;
            }
            if node.kind == syntax_kind_ext::RETURN_STATEMENT {
                let expression = arena
                    .get_return_statement(node)
                    .map_or(NodeIndex::NONE, |statement| statement.expression);
                found.push(expression);
                continue;
            }
            let mut children = arena.get_children(current);
            children.reverse();
            stack.extend(children);
        }
        found
    }

    /// `Promise<inner>`, using the lib's `Promise` declaration when present.
    pub(crate) fn promise_of(&mut self, inner: TypeId) -> TypeId {
        let base = self.global_declared_type("Promise").unwrap_or(TypeId::UNKNOWN);
        self.ctx.types.application("Promise", base, vec![inner])
    }

    fn without_nullish(&mut self, type_id: TypeId) -> TypeId {
        let parts = union_parts(&self.ctx.types, type_id);
        if parts.len() == 1 {
            return type_id;
        }
        let kept = parts
            .into_iter()
            .filter(|&part| part != TypeId::NULL && part != TypeId::UNDEFINED)
            .collect();
        self.ctx.types.union(kept)
    }
}
