//! Declared Types Module
//!
//! Types of symbols, read off their declarations:
//! - `get_type_of_symbol`: the value meaning (variables, functions, class
//!   constructors, enums, namespaces, imports)
//! - `get_declared_type_of_symbol`: the type meaning (interfaces, class
//!   instances, aliases, type parameters)
//!
//! Classes and interfaces start as empty shells that `drain_pending` fills,
//! so declarations that refer to each other never recurse while lowering.

use mustuse_binder::{Symbol, symbol_flags};
use mustuse_parser::parser::{modifier_flags, node_flags, syntax_kind_ext};
use mustuse_parser::{NodeIndex, NodeList};
use mustuse_scanner::SyntaxKind;
use mustuse_solver::{ObjectShape, PropertyInfo, ShapeId, TypeId, TypeKey};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::context::{FileId, NodeRef, PendingShape, SymbolRef};
use crate::state::CheckerState;
use crate::symbol_resolver::{ImportTarget, Meaning, NamespaceScopes};

/// Members of an interface body or type literal.
#[derive(Default)]
pub(crate) struct TypeMembers {
    pub(crate) properties: Vec<PropertyInfo>,
    pub(crate) call_signatures: Vec<TypeId>,
    pub(crate) construct_signatures: Vec<TypeId>,
}

impl<'a> CheckerState<'a> {
    // =========================================================================
    // Value meaning
    // =========================================================================

    pub(crate) fn get_type_of_symbol(&mut self, symbol: SymbolRef) -> TypeId {
        if let Some(&cached) = self.ctx.symbol_types.get(&symbol) {
            return cached;
        }
        let Some((_, binder)) = self.ctx.view(symbol.file) else {
            return TypeId::ANY;
        };
        let Some(data) = binder.get_symbol(symbol.symbol) else {
            return TypeId::ANY;
        };
        let denied = self.ctx.symbol_guard.enter(symbol);
        if !denied.is_entered() {
            trace!(symbol = %data.name, ?denied, "circular symbol type");
            return TypeId::ANY;
        }
        let result = self.compute_type_of_symbol(symbol.file, data);
        self.ctx.symbol_guard.leave(symbol);
        self.ctx.symbol_types.insert(symbol, result);
        result
    }

    fn compute_type_of_symbol(&mut self, file: FileId, symbol: &Symbol) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let first_of = |kinds: &[u16]| {
            symbol
                .declarations
                .iter()
                .copied()
                .find(|&decl| arena.kind_of(decl).is_some_and(|kind| kinds.contains(&kind)))
        };

        if symbol.has_any_flags(symbol_flags::ALIAS) {
            return self.type_of_import(SymbolRef::new(file, symbol.id));
        }
        if symbol.has_any_flags(symbol_flags::CLASS)
            && let Some(class) = first_of(&[
                syntax_kind_ext::CLASS_DECLARATION,
                syntax_kind_ext::CLASS_EXPRESSION,
            ])
        {
            return self.class_types_of(file, class).1;
        }
        if symbol.has_any_flags(symbol_flags::FUNCTION)
            && let Some(function) = symbol
                .declarations
                .iter()
                .copied()
                .find(|&decl| arena.get(decl).is_some_and(|node| node.is_function_like()))
        {
            return self.function_type_of(file, function);
        }
        if symbol.has_any_flags(symbol_flags::ENUM) {
            return self.enum_object_type(file, symbol);
        }
        if symbol.has_any_flags(symbol_flags::VARIABLE | symbol_flags::PARAMETER) {
            let declaration = if symbol.value_declaration.is_some() {
                symbol.value_declaration
            } else {
                symbol.declarations.first().copied().unwrap_or(NodeIndex::NONE)
            };
            return match arena.kind_of(declaration) {
                Some(syntax_kind_ext::VARIABLE_DECLARATION) => {
                    self.variable_declaration_type(file, declaration)
                }
                Some(syntax_kind_ext::PARAMETER) => self.parameter_type(file, declaration),
                Some(syntax_kind_ext::BINDING_ELEMENT) => self.binding_element_type(file, declaration),
                _ => TypeId::ANY,
            };
        }
        if symbol.has_any_flags(symbol_flags::NAMESPACE) {
            let scopes = self.namespace_scopes_of(SymbolRef::new(file, symbol.id));
            return self.namespace_object_type(&symbol.name, &scopes);
        }
        TypeId::ANY
    }

    fn type_of_import(&mut self, alias: SymbolRef) -> TypeId {
        match self.resolve_import(alias, Meaning::Value) {
            Some(ImportTarget::Symbol(target)) => self.get_type_of_symbol(target),
            Some(ImportTarget::Namespace(scopes)) => {
                let name = self
                    .ctx
                    .view(alias.file)
                    .and_then(|(_, binder)| binder.get_symbol(alias.symbol))
                    .and_then(|symbol| symbol.import_module.clone())
                    .unwrap_or_default();
                self.namespace_object_type(&name, &scopes)
            }
            None => TypeId::ANY,
        }
    }

    /// Object holding every value a namespace (or module) declares, in name
    /// order.
    fn namespace_object_type(&mut self, name: &str, scopes: &NamespaceScopes) -> TypeId {
        let mut members: Vec<(String, SymbolRef)> = Vec::new();
        for &(file, scope_id) in &scopes.scopes {
            let Some(scope) = self
                .ctx
                .view(file)
                .and_then(|(_, binder)| binder.get_scope(scope_id))
            else {
                continue;
            };
            members.extend(
                scope
                    .table
                    .iter()
                    .map(|(member, &symbol)| (member.clone(), SymbolRef::new(file, symbol))),
            );
        }
        members.sort_by(|a, b| a.0.cmp(&b.0));

        let mut shape = ObjectShape::named(name);
        for (member, symbol) in members {
            let member_type = self.get_type_of_symbol(symbol);
            shape.add_property(PropertyInfo::new(member, member_type));
        }
        self.ctx.types.object_with_shape(shape)
    }

    fn enum_object_type(&mut self, file: FileId, symbol: &Symbol) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let mut shape = ObjectShape::named(symbol.name.clone());
        for &declaration in &symbol.declarations {
            let Some(enum_data) = arena
                .get(declaration)
                .filter(|node| node.kind == syntax_kind_ext::ENUM_DECLARATION)
                .and_then(|node| arena.get_class(node))
            else {
                continue;
            };
            for member in enum_data.members.iter() {
                let Some(data) = arena.get(member).and_then(|node| arena.get_property_assignment(node)) else {
                    continue;
                };
                let Some(name) = arena.property_name_text(data.name) else {
                    continue;
                };
                let is_string = arena.kind_of(data.initializer).is_some_and(|kind| {
                    kind == SyntaxKind::StringLiteral as u16
                        || kind == SyntaxKind::NoSubstitutionTemplateLiteral as u16
                });
                let member_type = if is_string { TypeId::STRING } else { TypeId::NUMBER };
                shape.add_property(PropertyInfo::new(name, member_type));
            }
        }
        self.ctx.types.object_with_shape(shape)
    }

    // =========================================================================
    // Variables, parameters and destructuring
    // =========================================================================

    /// Annotation, else initializer, else what the enclosing `for`/`catch`
    /// gives the variable.
    pub(crate) fn variable_declaration_type(&mut self, file: FileId, declaration: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(data) = arena
            .get(declaration)
            .and_then(|node| arena.get_variable_declaration(node))
        else {
            return TypeId::ANY;
        };
        if data.type_annotation.is_some() {
            return self.get_type_from_type_node(file, data.type_annotation);
        }
        if data.initializer.is_some() {
            return self.get_type_of_node(file, data.initializer);
        }

        let parent = arena.parent_of(declaration);
        if arena.kind_of(parent) == Some(syntax_kind_ext::CATCH_CLAUSE) {
            return TypeId::ANY;
        }
        let owner = arena.parent_of(parent);
        let Some(owner_node) = arena.get(owner) else {
            return TypeId::ANY;
        };
        match owner_node.kind {
            syntax_kind_ext::FOR_OF_STATEMENT => {
                let Some(statement) = arena.get_for_in_of(owner_node) else {
                    return TypeId::ANY;
                };
                let iterated = self.get_type_of_node(file, statement.expression);
                self.element_type_of(iterated).unwrap_or(TypeId::ANY)
            }
            syntax_kind_ext::FOR_IN_STATEMENT => TypeId::STRING,
            _ => TypeId::ANY,
        }
    }

    pub(crate) fn parameter_type(&mut self, file: FileId, parameter: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(data) = arena.get(parameter).and_then(|node| arena.get_parameter(node)) else {
            return TypeId::ANY;
        };
        if data.type_annotation.is_some() {
            self.get_type_from_type_node(file, data.type_annotation)
        } else if data.initializer.is_some() {
            self.get_type_of_node(file, data.initializer)
        } else {
            TypeId::ANY
        }
    }

    /// Type a destructured name receives from the value its pattern
    /// destructures.
    pub(crate) fn binding_element_type(&mut self, file: FileId, element: NodeIndex) -> TypeId {
        let Some(arena) = self.ctx.arena_of(file) else {
            return TypeId::ANY;
        };
        let Some(element_node) = arena.get(element) else {
            return TypeId::ANY;
        };
        let Some(data) = arena.get_binding_element(element_node) else {
            return TypeId::ANY;
        };
        let pattern = arena.parent_of(element);
        let Some(pattern_kind) = arena.kind_of(pattern) else {
            return TypeId::ANY;
        };
        let owner = arena.parent_of(pattern);
        let source = match arena.kind_of(owner) {
            Some(syntax_kind_ext::VARIABLE_DECLARATION) => self.variable_declaration_type(file, owner),
            Some(syntax_kind_ext::PARAMETER) => self.parameter_type(file, owner),
            Some(syntax_kind_ext::BINDING_ELEMENT) => self.binding_element_type(file, owner),
            _ => TypeId::ANY,
        };
        if element_node.has_flag(node_flags::REST) {
            return source;
        }

        let found = if pattern_kind == syntax_kind_ext::OBJECT_BINDING_PATTERN {
            let key = if data.property_name.is_some() {
                data.property_name
            } else {
                data.name
            };
            arena
                .property_name_text(key)
                .and_then(|name| self.property_of(source, name))
        } else {
            self.element_type_of(source)
        };
        match found {
            Some(found) => found,
            None if data.initializer.is_some() => self.get_type_of_node(file, data.initializer),
            None => TypeId::ANY,
        }
    }

    // =========================================================================
    // Type meaning
    // =========================================================================

    pub(crate) fn get_declared_type_of_symbol(&mut self, symbol: SymbolRef) -> TypeId {
        if let Some(&cached) = self.ctx.declared_types.get(&symbol) {
            return cached;
        }
        let Some((arena, binder)) = self.ctx.view(symbol.file) else {
            return TypeId::ANY;
        };
        let Some(data) = binder.get_symbol(symbol.symbol) else {
            return TypeId::ANY;
        };
        let declarations_of = |kind: u16| -> SmallVec<[NodeIndex; 2]> {
            data.declarations
                .iter()
                .copied()
                .filter(|&decl| arena.kind_of(decl) == Some(kind))
                .collect()
        };

        if data.has_any_flags(symbol_flags::ALIAS) {
            let result = match self.resolve_import(symbol, Meaning::Type) {
                Some(ImportTarget::Symbol(target)) => self.get_declared_type_of_symbol(target),
                _ => TypeId::ANY,
            };
            self.ctx.declared_types.insert(symbol, result);
            return result;
        }
        if data.has_any_flags(symbol_flags::CLASS) {
            let classes = declarations_of(syntax_kind_ext::CLASS_DECLARATION);
            let class = classes.first().copied().or_else(|| {
                declarations_of(syntax_kind_ext::CLASS_EXPRESSION).first().copied()
            });
            if let Some(class) = class {
                // class_types_of records the instance type for the symbol.
                return self.class_types_of(symbol.file, class).0;
            }
        }
        if data.has_any_flags(symbol_flags::INTERFACE) {
            let declarations = declarations_of(syntax_kind_ext::INTERFACE_DECLARATION);
            let shape = self.ctx.types.alloc_shape(ObjectShape::named(data.name.clone()));
            let result = self.ctx.types.intern(TypeKey::Object(shape));
            self.ctx.declared_types.insert(symbol, result);
            self.ctx.pending_shapes.push(PendingShape::Interface {
                file: symbol.file,
                declarations,
                shape,
            });
            return result;
        }
        if data.has_any_flags(symbol_flags::TYPE_ALIAS) {
            return self.type_alias_target(symbol, &declarations_of(syntax_kind_ext::TYPE_ALIAS_DECLARATION));
        }
        if data.has_any_flags(symbol_flags::ENUM) {
            return TypeId::NUMBER;
        }
        // Type parameters and anything else: no instantiation.
        let result = if data.has_any_flags(symbol_flags::TYPE_PARAMETER) {
            TypeId::UNKNOWN
        } else {
            TypeId::ANY
        };
        self.ctx.declared_types.insert(symbol, result);
        result
    }

    fn type_alias_target(&mut self, symbol: SymbolRef, declarations: &[NodeIndex]) -> TypeId {
        let Some(arena) = self.ctx.arena_of(symbol.file) else {
            return TypeId::ANY;
        };
        let Some(body) = declarations
            .first()
            .and_then(|&decl| arena.get(decl))
            .and_then(|node| arena.get_type_alias(node))
            .map(|alias| alias.type_node)
        else {
            return TypeId::ANY;
        };
        let entered = self.ctx.alias_guard.enter(symbol);
        if !entered.is_entered() {
            trace!(symbol = symbol.symbol.0, ?entered, "circular type alias");
            return TypeId::ANY;
        }
        let result = self.get_type_from_type_node(symbol.file, body);
        self.ctx.alias_guard.leave(symbol);
        self.ctx.declared_types.insert(symbol, result);
        result
    }

    /// Instance and constructor types of a class node, created on first use.
    pub(crate) fn class_types_of(&mut self, file: FileId, class: NodeIndex) -> (TypeId, TypeId) {
        let key = NodeRef::new(file, class);
        if let Some(&types) = self.ctx.class_types.get(&key) {
            return types;
        }
        let Some((arena, binder)) = self.ctx.view(file) else {
            return (TypeId::ANY, TypeId::ANY);
        };
        let Some(data) = arena.get(class).and_then(|node| arena.get_class(node)) else {
            return (TypeId::ANY, TypeId::ANY);
        };
        let name = arena.identifier_text(data.name).unwrap_or("").to_string();

        let symbol = binder.symbol_for_declaration(class);
        let interfaces: SmallVec<[NodeIndex; 2]> = symbol
            .and_then(|id| binder.get_symbol(id))
            .map(|symbol| {
                symbol
                    .declarations
                    .iter()
                    .copied()
                    .filter(|&decl| arena.kind_of(decl) == Some(syntax_kind_ext::INTERFACE_DECLARATION))
                    .collect()
            })
            .unwrap_or_default();

        let instance_shape = self.ctx.types.alloc_shape(ObjectShape::named(name.clone()));
        let instance = self.ctx.types.intern(TypeKey::Object(instance_shape));
        let mut constructor = ObjectShape::named(name);
        constructor.construct_signatures.push(instance);
        let constructor_shape = self.ctx.types.alloc_shape(constructor);
        let constructor_type = self.ctx.types.intern(TypeKey::Class(constructor_shape));

        self.ctx.class_types.insert(key, (instance, constructor_type));
        if let Some(id) = symbol {
            self.ctx.declared_types.insert(SymbolRef::new(file, id), instance);
        }
        self.ctx.pending_shapes.push(PendingShape::Class {
            file,
            class,
            interfaces,
            instance: instance_shape,
            constructor: constructor_shape,
        });
        (instance, constructor_type)
    }

    // =========================================================================
    // Filling shells
    // =========================================================================

    /// Lower the members of every pending class and interface shell.
    /// Re-entrant calls return immediately; the outer loop picks up shells
    /// created while draining.
    pub(crate) fn drain_pending(&mut self) {
        if self.ctx.draining {
            return;
        }
        self.ctx.draining = true;
        let mut filled = 0usize;
        while let Some(pending) = self.ctx.pending_shapes.pop() {
            match pending {
                PendingShape::Interface {
                    file,
                    declarations,
                    shape,
                } => self.fill_interface(file, &declarations, shape),
                PendingShape::Class {
                    file,
                    class,
                    interfaces,
                    instance,
                    constructor,
                } => self.fill_class(file, class, &interfaces, instance, constructor),
            }
            filled += 1;
        }
        self.ctx.draining = false;
        if filled > 0 {
            debug!(filled, "filled declared shapes");
        }
    }

    fn fill_interface(&mut self, file: FileId, declarations: &[NodeIndex], shape: ShapeId) {
        let mut members = TypeMembers::default();
        let mut bases = Vec::new();
        for &declaration in declarations {
            self.collect_interface_declaration(file, declaration, &mut members, &mut bases);
        }
        self.write_shape(shape, members, bases, Vec::new());
    }

    fn collect_interface_declaration(
        &mut self,
        file: FileId,
        declaration: NodeIndex,
        members: &mut TypeMembers,
        bases: &mut Vec<TypeId>,
    ) {
        let Some(arena) = self.ctx.arena_of(file) else {
            return;
        };
        let Some(interface) = arena.get(declaration).and_then(|node| arena.get_interface(node)) else {
            return;
        };
        for clause in interface.heritage_clauses.iter().flat_map(NodeList::iter) {
            let Some(heritage) = arena.get(clause).and_then(|node| arena.get_heritage_clause(node)) else {
                continue;
            };
            for base in heritage.types.iter() {
                bases.push(self.heritage_type(file, base));
            }
        }
        let own = self.collect_type_members(file, &interface.members);
        members.properties.extend(own.properties);
        members.call_signatures.extend(own.call_signatures);
        members.construct_signatures.extend(own.construct_signatures);
    }

    fn fill_class(
        &mut self,
        file: FileId,
        class: NodeIndex,
        interfaces: &[NodeIndex],
        instance: ShapeId,
        constructor: ShapeId,
    ) {
        let Some(arena) = self.ctx.arena_of(file) else {
            return;
        };
        let Some(data) = arena.get(class).and_then(|node| arena.get_class(node)) else {
            return;
        };

        let mut bases = Vec::new();
        let mut implements = Vec::new();
        let mut constructor_bases = Vec::new();
        for clause in data.heritage_clauses.iter().flat_map(NodeList::iter) {
            let Some(heritage) = arena.get(clause).and_then(|node| arena.get_heritage_clause(node)) else {
                continue;
            };
            for base in heritage.types.iter() {
                let base_type = self.heritage_type(file, base);
                if heritage.token == SyntaxKind::ExtendsKeyword as u16 {
                    bases.push(base_type);
                    if let Some(base_constructor) = self.heritage_constructor_type(file, base) {
                        constructor_bases.push(base_constructor);
                    }
                } else {
                    implements.push(base_type);
                }
            }
        }

        let mut members = TypeMembers::default();
        let mut statics = TypeMembers::default();
        for member in data.members.iter() {
            let Some(member_node) = arena.get(member) else {
                continue;
            };
            let target = if member_node.has_flag(modifier_flags::STATIC) {
                &mut statics
            } else {
                &mut members
            };
            match member_node.kind {
                syntax_kind_ext::PROPERTY_DECLARATION => {
                    let Some(property) = arena.get_property_decl(member_node) else {
                        continue;
                    };
                    let Some(name) = arena.property_name_text(property.name) else {
                        continue;
                    };
                    let property_type = if property.type_annotation.is_some() {
                        self.get_type_from_type_node(file, property.type_annotation)
                    } else if property.initializer.is_some() {
                        self.get_type_of_node(file, property.initializer)
                    } else {
                        TypeId::ANY
                    };
                    let mut info = PropertyInfo::new(name, property_type);
                    info.optional = member_node.has_flag(node_flags::OPTIONAL);
                    target.properties.push(info);
                }
                syntax_kind_ext::METHOD_DECLARATION => {
                    let Some(name) = arena
                        .get_function(member_node)
                        .and_then(|func| arena.property_name_text(func.name))
                    else {
                        continue;
                    };
                    let method_type = self.function_type_of(file, member);
                    target.properties.push(PropertyInfo::method(name, method_type));
                }
                syntax_kind_ext::GET_ACCESSOR => {
                    let Some(name) = arena
                        .get_function(member_node)
                        .and_then(|func| arena.property_name_text(func.name))
                    else {
                        continue;
                    };
                    let getter_type = self.return_type_of(file, member);
                    target.properties.push(PropertyInfo::new(name, getter_type));
                }
                syntax_kind_ext::SET_ACCESSOR => {
                    let Some(func) = arena.get_function(member_node) else {
                        continue;
                    };
                    let Some(name) = arena.property_name_text(func.name) else {
                        continue;
                    };
                    let value_type = func
                        .parameters
                        .iter()
                        .next()
                        .map_or(TypeId::ANY, |param| self.parameter_type(file, param));
                    target.properties.push(PropertyInfo::new(name, value_type));
                }
                syntax_kind_ext::CONSTRUCTOR => {
                    let Some(func) = arena.get_function(member_node) else {
                        continue;
                    };
                    // Parameter properties: `constructor(readonly value: T)`.
                    let property_modifiers = modifier_flags::PUBLIC
                        | modifier_flags::PRIVATE
                        | modifier_flags::PROTECTED
                        | modifier_flags::READONLY;
                    for param in func.parameters.iter() {
                        let Some(param_node) = arena.get(param) else {
                            continue;
                        };
                        if !param_node.has_flag(property_modifiers) {
                            continue;
                        }
                        let Some(name) = arena
                            .get_parameter(param_node)
                            .and_then(|data| arena.identifier_text(data.name))
                        else {
                            continue;
                        };
                        let param_type = self.parameter_type(file, param);
                        members.properties.push(PropertyInfo::new(name, param_type));
                    }
                }
                _ => {}
            }
        }
        for &interface in interfaces {
            self.collect_interface_declaration(file, interface, &mut members, &mut bases);
        }

        trace!(
            class = class.0,
            members = members.properties.len(),
            statics = statics.properties.len(),
            "filled class shape"
        );
        self.write_shape(instance, members, bases, implements);
        self.write_shape(constructor, statics, constructor_bases, Vec::new());
    }

    fn write_shape(
        &mut self,
        shape_id: ShapeId,
        members: TypeMembers,
        bases: Vec<TypeId>,
        implements: Vec<TypeId>,
    ) {
        let Some(shape) = self.ctx.types.shape_mut(shape_id) else {
            return;
        };
        for property in members.properties {
            shape.add_property(property);
        }
        shape.bases.extend(bases);
        shape.implements.extend(implements);
        shape.call_signatures.extend(members.call_signatures);
        shape.construct_signatures.extend(members.construct_signatures);
    }

    /// Members of an interface body or type literal.
    pub(crate) fn collect_type_members(&mut self, file: FileId, members: &NodeList) -> TypeMembers {
        let mut collected = TypeMembers::default();
        let Some(arena) = self.ctx.arena_of(file) else {
            return collected;
        };
        for member in members.iter() {
            let Some(member_node) = arena.get(member) else {
                continue;
            };
            let Some(signature) = arena.get_signature(member_node) else {
                continue;
            };
            let annotated = if signature.type_annotation.is_some() {
                self.get_type_from_type_node(file, signature.type_annotation)
            } else {
                TypeId::ANY
            };
            match member_node.kind {
                syntax_kind_ext::PROPERTY_SIGNATURE | syntax_kind_ext::METHOD_SIGNATURE => {
                    let Some(name) = arena.property_name_text(signature.name) else {
                        continue;
                    };
                    let mut info = if member_node.kind == syntax_kind_ext::METHOD_SIGNATURE {
                        let method_type = self.ctx.types.function(annotated);
                        PropertyInfo::method(name, method_type)
                    } else {
                        PropertyInfo::new(name, annotated)
                    };
                    info.optional = member_node.has_flag(node_flags::OPTIONAL);
                    collected.properties.push(info);
                }
                syntax_kind_ext::CALL_SIGNATURE => collected.call_signatures.push(annotated),
                syntax_kind_ext::CONSTRUCT_SIGNATURE => collected.construct_signatures.push(annotated),
                _ => {}
            }
        }
        collected
    }
}
