//! Type node lowering.
//!
//! Turns annotation syntax (`Result<string, Error>`, `() => void`,
//! `{ get(): T }`) into interned types. Generic declarations are not
//! instantiated: a reference with type arguments becomes an application
//! that keeps the arguments for display and `await` unwrapping.

use mustuse_binder::symbol_flags;
use mustuse_parser::NodeIndex;
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_scanner::SyntaxKind;
use mustuse_solver::{IntrinsicKind, ObjectShape, TypeId, TypeKey};
use tracing::trace;

use crate::context::{FileId, NodeRef, SymbolRef};
use crate::state::CheckerState;
use crate::symbol_resolver::{Meaning, entity_segments};

impl<'a> CheckerState<'a> {
    /// Type an annotation denotes. NONE and unsupported syntax give `any`.
    pub(crate) fn get_type_from_type_node(&mut self, file: FileId, node: NodeIndex) -> TypeId {
        if node.is_none() {
            return TypeId::ANY;
        }
        let key = NodeRef::new(file, node);
        if let Some(&cached) = self.ctx.type_node_types.get(&key) {
            return cached;
        }
        let result = self.compute_type_from_type_node(file, node);
        self.ctx.type_node_types.insert(key, result);
        result
    }

    fn compute_type_from_type_node(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(node) = arena.get(index) else {
            return TypeId::ANY;
        };

        match node.kind {
            syntax_kind_ext::TYPE_REFERENCE => self.type_reference(file, index),
            syntax_kind_ext::KEYWORD_TYPE => {
                let text = arena.get_literal(node).map_or("", |literal| literal.text.as_str());
                match text {
                    "this" => self.this_type_at(file, index),
                    // `as const` is resolved on the assertion expression.
                    "const" => TypeId::ANY,
                    keyword => IntrinsicKind::from_keyword(keyword)
                        .map_or(TypeId::ANY, IntrinsicKind::type_id),
                }
            }
            syntax_kind_ext::LITERAL_TYPE => {
                let literal = arena
                    .get_wrapped_type(node)
                    .map_or(NodeIndex::NONE, |wrapped| wrapped.type_node);
                literal_type_of(arena.kind_of(literal))
            }
            syntax_kind_ext::PARENTHESIZED_TYPE => {
                let inner = arena
                    .get_wrapped_type(node)
                    .map_or(NodeIndex::NONE, |wrapped| wrapped.type_node);
                self.get_type_from_type_node(file, inner)
            }
            syntax_kind_ext::ARRAY_TYPE => {
                let element = arena
                    .get_wrapped_type(node)
                    .map_or(NodeIndex::NONE, |wrapped| wrapped.type_node);
                let element_type = self.get_type_from_type_node(file, element);
                self.ctx.types.array(element_type)
            }
            syntax_kind_ext::TUPLE_TYPE => {
                let Some(composite) = arena.get_composite_type(node) else {
                    return TypeId::ANY;
                };
                let elements = composite
                    .types
                    .iter()
                    .map(|element| self.get_type_from_type_node(file, element))
                    .collect();
                self.ctx.types.tuple(elements)
            }
            syntax_kind_ext::UNION_TYPE | syntax_kind_ext::INTERSECTION_TYPE => {
                let Some(composite) = arena.get_composite_type(node) else {
                    return TypeId::ANY;
                };
                let members: Vec<TypeId> = composite
                    .types
                    .iter()
                    .map(|member| self.get_type_from_type_node(file, member))
                    .collect();
                if node.kind == syntax_kind_ext::UNION_TYPE {
                    self.ctx.types.union(members)
                } else {
                    self.ctx.types.intersection(members)
                }
            }
            syntax_kind_ext::FUNCTION_TYPE => {
                let ret = arena
                    .get_function_type(node)
                    .map_or(NodeIndex::NONE, |function| function.type_annotation);
                let ret_type = self.get_type_from_type_node(file, ret);
                self.ctx.types.function(ret_type)
            }
            syntax_kind_ext::CONSTRUCTOR_TYPE => {
                let ret = arena
                    .get_function_type(node)
                    .map_or(NodeIndex::NONE, |function| function.type_annotation);
                let instance = self.get_type_from_type_node(file, ret);
                let mut shape = ObjectShape::default();
                shape.construct_signatures.push(instance);
                self.ctx.types.object_with_shape(shape)
            }
            syntax_kind_ext::TYPE_LITERAL => {
                let Some(literal) = arena.get_type_literal(node) else {
                    return TypeId::ANY;
                };
                let members = self.collect_type_members(file, &literal.members);
                let mut shape = ObjectShape::default();
                for property in members.properties {
                    shape.add_property(property);
                }
                shape.call_signatures = members.call_signatures;
                shape.construct_signatures = members.construct_signatures;
                self.ctx.types.object_with_shape(shape)
            }
            // `x is T` narrows; `asserts x` returns nothing.
            syntax_kind_ext::TYPE_PREDICATE => match arena.get_type_predicate(node) {
                Some(predicate) if predicate.type_node.is_none() => TypeId::VOID,
                _ => TypeId::BOOLEAN,
            },
            syntax_kind_ext::TYPE_QUERY => {
                let entity = arena
                    .get_wrapped_type(node)
                    .map_or(NodeIndex::NONE, |wrapped| wrapped.type_node);
                match self.resolve_entity_name(file, entity, Meaning::Value) {
                    Some(symbol) => self.get_type_of_symbol(symbol),
                    None => TypeId::ANY,
                }
            }
            // `readonly T[]` keeps the array; `keyof`/`unique` are opaque.
            syntax_kind_ext::TYPE_OPERATOR => {
                let inner = arena
                    .get_wrapped_type(node)
                    .map_or(NodeIndex::NONE, |wrapped| wrapped.type_node);
                match arena.kind_of(inner) {
                    Some(syntax_kind_ext::ARRAY_TYPE | syntax_kind_ext::TUPLE_TYPE) => {
                        self.get_type_from_type_node(file, inner)
                    }
                    _ => TypeId::ANY,
                }
            }
            syntax_kind_ext::INDEXED_ACCESS_TYPE => self.indexed_access_type(file, index),
            _ => {
                trace!(kind = node.kind, "unsupported type syntax");
                TypeId::ANY
            }
        }
    }

    fn type_reference(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(reference) = arena.get(index).and_then(|node| arena.get_type_ref(node)) else {
            return TypeId::ANY;
        };
        let args: Vec<TypeId> = reference
            .type_arguments
            .iter()
            .flat_map(|list| list.iter())
            .map(|arg| self.get_type_from_type_node(file, arg))
            .collect();

        let simple_name = arena.identifier_text(reference.type_name);
        if let Some(name) = simple_name {
            if let Some(kind) = IntrinsicKind::from_keyword(name) {
                return kind.type_id();
            }
            if (name == "Array" || name == "ReadonlyArray") && args.len() == 1 {
                return self.ctx.types.array(args[0]);
            }
        }

        let symbol = match simple_name {
            Some(name) => self.resolve_type_symbol(file, reference.type_name, name),
            None => self.resolve_entity_name(file, reference.type_name, Meaning::Type),
        };
        match symbol {
            Some(symbol) => self.referenced_type(symbol, args),
            None => {
                let rendered = entity_segments(arena, reference.type_name)
                    .map(|segments| segments.join("."))
                    .unwrap_or_default();
                trace!(name = %rendered, "unresolved type reference");
                if args.is_empty() {
                    TypeId::ANY
                } else {
                    self.ctx.types.application(rendered, TypeId::UNKNOWN, args)
                }
            }
        }
    }

    /// Type of a reference to `symbol` with `args`. Aliases expand to their
    /// (uninstantiated) body; generic classes and interfaces keep their
    /// arguments.
    pub(crate) fn referenced_type(&mut self, symbol: SymbolRef, args: Vec<TypeId>) -> TypeId {
        let declared = self.get_declared_type_of_symbol(symbol);
        if args.is_empty() {
            return declared;
        }
        let Some(data) = self
            .ctx
            .view(symbol.file)
            .and_then(|(_, binder)| binder.get_symbol(symbol.symbol))
        else {
            return declared;
        };
        if data.has_any_flags(symbol_flags::TYPE_ALIAS) {
            return declared;
        }
        self.ctx.types.application(data.name.clone(), declared, args)
    }

    /// Base type named in a heritage clause (`extends Base<T>`,
    /// `implements PromiseLike<R>`).
    pub(crate) fn heritage_type(&mut self, file: FileId, expression: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(data) = arena
            .get(expression)
            .and_then(|node| arena.get_expr_type_args(node))
        else {
            return TypeId::ANY;
        };
        let args: Vec<TypeId> = data
            .type_arguments
            .iter()
            .flat_map(|list| list.iter())
            .map(|arg| self.get_type_from_type_node(file, arg))
            .collect();

        if let Some(symbol) = self.resolve_entity_name(file, data.expression, Meaning::Type) {
            return self.referenced_type(symbol, args);
        }
        // `extends mixin(Base)`: the instance type of whatever the
        // expression constructs.
        let constructor = self.get_type_of_node(file, data.expression);
        self.construct_of(constructor).unwrap_or(TypeId::ANY)
    }

    /// Constructor value a class `extends`, for inherited statics.
    pub(crate) fn heritage_constructor_type(&mut self, file: FileId, expression: NodeIndex) -> Option<TypeId> {
        let arena = self.ctx.arena_of(file)?;
        let data = arena
            .get(expression)
            .and_then(|node| arena.get_expr_type_args(node))?;
        let symbol = self.resolve_entity_name(file, data.expression, Meaning::Value)?;
        let constructor = self.get_type_of_symbol(symbol);
        (constructor != TypeId::ANY).then_some(constructor)
    }

    /// `this` inside a class or interface body.
    pub(crate) fn this_type_at(&mut self, file: FileId, at: NodeIndex) -> TypeId {
        let Some((arena, binder)) = self.ctx.view(file) else {
            return TypeId::ANY;
        };
        let mut current = arena.parent_of(at);
        while let Some(node) = arena.get(current) {
            match node.kind {
                syntax_kind_ext::CLASS_DECLARATION | syntax_kind_ext::CLASS_EXPRESSION => {
                    return self.class_types_of(file, current).0;
                }
                syntax_kind_ext::INTERFACE_DECLARATION => {
                    return match binder.symbol_for_declaration(current) {
                        Some(symbol) => self.get_declared_type_of_symbol(SymbolRef::new(file, symbol)),
                        None => TypeId::ANY,
                    };
                }
                syntax_kind_ext::SOURCE_FILE => break,
                _ => current = arena.parent_of(current),
            }
        }
        TypeId::ANY
    }

    /// `T["name"]` and `Tuple[0]`.
    fn indexed_access_type(&mut self, file: FileId, index: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(composite) = arena.get(index).and_then(|node| arena.get_composite_type(node)) else {
            return TypeId::ANY;
        };
        let (Some(object), Some(key)) = (composite.types.nodes.first(), composite.types.nodes.get(1)) else {
            return TypeId::ANY;
        };
        let object_type = self.get_type_from_type_node(file, *object);
        let Some(literal_node) = arena
            .get(*key)
            .filter(|node| node.kind == syntax_kind_ext::LITERAL_TYPE)
            .and_then(|node| arena.get_wrapped_type(node))
            .and_then(|wrapped| arena.get(wrapped.type_node))
        else {
            return TypeId::ANY;
        };
        let Some(text) = arena.get_literal(literal_node).map(|literal| literal.text.as_str()) else {
            return TypeId::ANY;
        };
        if literal_node.kind == SyntaxKind::NumericLiteral as u16 {
            if let Some(TypeKey::Tuple(elements)) = self.ctx.types.lookup(object_type)
                && let Some(&element) = text.parse::<usize>().ok().and_then(|i| elements.get(i))
            {
                return element;
            }
            return self.element_type_of(object_type).unwrap_or(TypeId::ANY);
        }
        self.property_of(object_type, text).unwrap_or(TypeId::ANY)
    }
}

/// Widened type of the literal inside a literal type node.
fn literal_type_of(kind: Option<u16>) -> TypeId {
    let Some(kind) = kind else {
        return TypeId::ANY;
    };
    if kind == SyntaxKind::StringLiteral as u16
        || kind == SyntaxKind::NoSubstitutionTemplateLiteral as u16
        || kind == SyntaxKind::TemplateLiteral as u16
    {
        TypeId::STRING
    } else if kind == SyntaxKind::NumericLiteral as u16 {
        TypeId::NUMBER
    } else if kind == SyntaxKind::BigIntLiteral as u16 {
        TypeId::BIGINT
    } else if kind == SyntaxKind::TrueKeyword as u16 || kind == SyntaxKind::FalseKeyword as u16 {
        TypeId::BOOLEAN
    } else {
        TypeId::ANY
    }
}
