//! Declaration pass: opens scopes and declares symbols.

use crate::scopes::{ContainerKind, ScopeId};
use crate::symbols::symbol_flags;
use mustuse_parser::parser::node::{FunctionData, Node};
use mustuse_parser::parser::{modifier_flags, node_flags, syntax_kind_ext};
use mustuse_parser::{NodeArena, NodeIndex, NodeList};
use mustuse_scanner::SyntaxKind;
use tracing::trace;

use super::state::BinderState;

impl BinderState {
    pub(crate) fn bind_node(&mut self, arena: &NodeArena, idx: NodeIndex) {
        if idx.is_none() {
            return;
        }
        let Some(node) = arena.get(idx) else {
            return;
        };
        if node.is_type_node() {
            return;
        }

        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => {}
            k if k == syntax_kind_ext::VARIABLE_STATEMENT => {
                if let Some(statement) = arena.get_variable(node) {
                    let exported = node.has_flag(modifier_flags::EXPORT);
                    for list in statement.declarations.iter() {
                        self.bind_variable_declaration_list(arena, list, exported);
                    }
                }
            }
            k if k == syntax_kind_ext::VARIABLE_DECLARATION_LIST => {
                self.bind_variable_declaration_list(arena, idx, false);
            }
            k if k == syntax_kind_ext::FUNCTION_DECLARATION => {
                self.bind_function_declaration(arena, node, idx);
            }
            k if k == syntax_kind_ext::FUNCTION_EXPRESSION
                || k == syntax_kind_ext::ARROW_FUNCTION
                || k == syntax_kind_ext::METHOD_DECLARATION
                || k == syntax_kind_ext::CONSTRUCTOR
                || k == syntax_kind_ext::GET_ACCESSOR
                || k == syntax_kind_ext::SET_ACCESSOR =>
            {
                if let Some(func) = arena.get_function(node) {
                    // Method names are property keys; only a computed key
                    // holds an expression.
                    if k != syntax_kind_ext::FUNCTION_EXPRESSION {
                        self.bind_node(arena, func.name);
                    }
                    let own_name = (k == syntax_kind_ext::FUNCTION_EXPRESSION).then_some(func.name);
                    self.bind_function_like(arena, idx, func, own_name);
                }
            }
            k if k == syntax_kind_ext::CLASS_DECLARATION
                || k == syntax_kind_ext::CLASS_EXPRESSION =>
            {
                self.bind_class(arena, node, idx);
            }
            k if k == syntax_kind_ext::INTERFACE_DECLARATION => {
                if let Some(interface) = arena.get_interface(node) {
                    self.declare_named(arena, idx, interface.name, symbol_flags::INTERFACE, node);
                    self.bind_type_parameter_scope(arena, idx, interface.type_parameters.as_ref());
                }
            }
            k if k == syntax_kind_ext::TYPE_ALIAS_DECLARATION => {
                if let Some(alias) = arena.get_type_alias(node) {
                    self.declare_named(arena, idx, alias.name, symbol_flags::TYPE_ALIAS, node);
                    self.bind_type_parameter_scope(arena, idx, alias.type_parameters.as_ref());
                }
            }
            k if k == syntax_kind_ext::ENUM_DECLARATION => {
                if let Some(enum_data) = arena.get_class(node) {
                    self.declare_named(arena, idx, enum_data.name, symbol_flags::ENUM, node);
                    for member in enum_data.members.iter() {
                        if let Some(member_node) = arena.get(member)
                            && let Some(data) = arena.get_property_assignment(member_node)
                        {
                            self.bind_node(arena, data.initializer);
                        }
                    }
                }
            }
            k if k == syntax_kind_ext::MODULE_DECLARATION => {
                self.bind_module_declaration(arena, node, idx);
            }
            k if k == syntax_kind_ext::IMPORT_DECLARATION => {
                self.bind_import_declaration(arena, node, idx);
            }
            k if k == syntax_kind_ext::BLOCK => {
                if let Some(block) = arena.get_block(node) {
                    self.enter_scope(ContainerKind::Block, idx);
                    self.bind_statements(arena, &block.statements);
                    self.exit_scope();
                }
            }
            k if k == syntax_kind_ext::FOR_STATEMENT
                || k == syntax_kind_ext::FOR_IN_STATEMENT
                || k == syntax_kind_ext::FOR_OF_STATEMENT
                || k == syntax_kind_ext::SWITCH_STATEMENT =>
            {
                self.enter_scope(ContainerKind::Block, idx);
                self.bind_children(arena, idx);
                self.exit_scope();
            }
            k if k == syntax_kind_ext::CATCH_CLAUSE => {
                if let Some(clause) = arena.get_catch_clause(node) {
                    self.enter_scope(ContainerKind::Block, idx);
                    if let Some(decl_node) = arena.get(clause.variable_declaration)
                        && let Some(decl) = arena.get_variable_declaration(decl_node)
                    {
                        let scope = self.current_scope_id;
                        self.declare_binding_name(
                            arena,
                            scope,
                            clause.variable_declaration,
                            decl.name,
                            symbol_flags::BLOCK_SCOPED_VARIABLE,
                        );
                    }
                    self.bind_node(arena, clause.block);
                    self.exit_scope();
                }
            }
            _ => self.bind_children(arena, idx),
        }
    }

    fn bind_children(&mut self, arena: &NodeArena, idx: NodeIndex) {
        for child in arena.get_children(idx) {
            self.bind_node(arena, child);
        }
    }

    fn bind_statements(&mut self, arena: &NodeArena, statements: &NodeList) {
        for statement in statements.iter() {
            self.bind_node(arena, statement);
        }
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn bind_variable_declaration_list(&mut self, arena: &NodeArena, list: NodeIndex, exported: bool) {
        let Some(list_node) = arena.get(list) else {
            return;
        };
        let Some(data) = arena.get_variable(list_node) else {
            return;
        };
        let block_scoped = list_node.has_flag(node_flags::LET) || list_node.has_flag(node_flags::CONST);
        let (flags, scope) = if block_scoped {
            (symbol_flags::BLOCK_SCOPED_VARIABLE, self.current_scope_id)
        } else {
            (symbol_flags::FUNCTION_SCOPED_VARIABLE, self.var_scope_id())
        };

        for decl_idx in data.declarations.iter() {
            let Some(decl) = arena
                .get(decl_idx)
                .and_then(|decl_node| arena.get_variable_declaration(decl_node))
            else {
                continue;
            };
            self.declare_binding_name(arena, scope, decl_idx, decl.name, flags);
            if exported {
                self.mark_exported(decl_idx);
            }
            self.bind_node(arena, decl.initializer);
        }
    }

    /// Declare every identifier introduced by a binding name (plain
    /// identifier or nested destructuring pattern).
    fn declare_binding_name(
        &mut self,
        arena: &NodeArena,
        scope: ScopeId,
        declaration: NodeIndex,
        name: NodeIndex,
        flags: u32,
    ) {
        let Some(name_node) = arena.get(name) else {
            return;
        };
        if let Some(ident) = arena.get_identifier(name_node) {
            let text = ident.escaped_text.clone();
            self.declare_symbol(scope, &text, flags, declaration, name);
            return;
        }
        if let Some(pattern) = arena.get_binding_pattern(name_node) {
            for element in pattern.elements.iter() {
                let Some(element_data) = arena
                    .get(element)
                    .and_then(|element_node| arena.get_binding_element(element_node))
                else {
                    continue;
                };
                // `{ [key]: x }`
                if let Some(property) = arena.get(element_data.property_name)
                    && property.kind == syntax_kind_ext::COMPUTED_PROPERTY_NAME
                {
                    self.bind_node(arena, element_data.property_name);
                }
                self.declare_binding_name(arena, scope, element, element_data.name, flags);
                self.bind_node(arena, element_data.initializer);
            }
        }
    }

    fn mark_exported(&mut self, declaration: NodeIndex) {
        if let Some(&symbol_id) = self.node_symbols.get(&declaration.0)
            && let Some(symbol) = self.symbols.get_mut(symbol_id)
        {
            symbol.is_exported = true;
        }
    }

    /// Declare the identifier `name` of a declaration node in the current
    /// scope.
    fn declare_named(
        &mut self,
        arena: &NodeArena,
        declaration: NodeIndex,
        name: NodeIndex,
        flags: u32,
        node: &Node,
    ) {
        self.declare_named_in(arena, self.current_scope_id, declaration, name, flags, node);
    }

    fn declare_named_in(
        &mut self,
        arena: &NodeArena,
        scope: ScopeId,
        declaration: NodeIndex,
        name: NodeIndex,
        flags: u32,
        node: &Node,
    ) {
        let Some(text) = arena.identifier_text(name) else {
            return;
        };
        let text = text.to_string();
        self.declare_symbol(scope, &text, flags, declaration, name);
        if node.has_flag(modifier_flags::EXPORT) {
            self.mark_exported(declaration);
        }
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn bind_function_declaration(&mut self, arena: &NodeArena, node: &Node, idx: NodeIndex) {
        let Some(func) = arena.get_function(node) else {
            return;
        };
        let scope = self.var_scope_id();
        self.declare_named_in(arena, scope, idx, func.name, symbol_flags::FUNCTION, node);
        self.bind_function_like(arena, idx, func, None);
    }

    /// Open the function scope of `idx` and bind its name (function
    /// expressions only), type parameters, parameters and body. A block body
    /// shares the function scope.
    fn bind_function_like(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        func: &FunctionData,
        own_name: Option<NodeIndex>,
    ) {
        self.enter_scope(ContainerKind::Function, idx);
        let scope = self.current_scope_id;

        if let Some(name) = own_name
            && let Some(text) = arena.identifier_text(name)
        {
            let text = text.to_string();
            self.declare_symbol(scope, &text, symbol_flags::FUNCTION, idx, name);
        }
        self.declare_type_parameters(arena, func.type_parameters.as_ref());

        for param in func.parameters.iter() {
            let Some(param_data) = arena
                .get(param)
                .and_then(|param_node| arena.get_parameter(param_node))
            else {
                continue;
            };
            self.declare_binding_name(arena, scope, param, param_data.name, symbol_flags::PARAMETER);
            self.bind_node(arena, param_data.initializer);
        }

        match arena.get(func.body) {
            Some(body) if body.kind == syntax_kind_ext::BLOCK => {
                if let Some(block) = arena.get_block(body) {
                    self.bind_statements(arena, &block.statements);
                }
            }
            Some(_) => self.bind_node(arena, func.body),
            None => {}
        }
        self.exit_scope();
    }

    fn declare_type_parameters(&mut self, arena: &NodeArena, type_parameters: Option<&NodeList>) {
        let Some(type_parameters) = type_parameters else {
            return;
        };
        let scope = self.current_scope_id;
        for param in type_parameters.iter() {
            if let Some(data) = arena
                .get(param)
                .and_then(|param_node| arena.get_type_parameter(param_node))
                && let Some(text) = arena.identifier_text(data.name)
            {
                let text = text.to_string();
                self.declare_symbol(scope, &text, symbol_flags::TYPE_PARAMETER, param, data.name);
            }
        }
    }

    /// Interfaces and type aliases get a scope only for their type
    /// parameters.
    fn bind_type_parameter_scope(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        type_parameters: Option<&NodeList>,
    ) {
        if type_parameters.is_none_or(|params| params.is_empty()) {
            return;
        }
        self.enter_scope(ContainerKind::Block, idx);
        self.declare_type_parameters(arena, type_parameters);
        self.exit_scope();
    }

    fn bind_class(&mut self, arena: &NodeArena, node: &Node, idx: NodeIndex) {
        let Some(class) = arena.get_class(node) else {
            return;
        };
        let is_declaration = node.kind == syntax_kind_ext::CLASS_DECLARATION;
        if is_declaration {
            self.declare_named(arena, idx, class.name, symbol_flags::CLASS, node);
        }

        self.enter_scope(ContainerKind::Class, idx);
        if !is_declaration {
            let scope = self.current_scope_id;
            self.declare_named_in(arena, scope, idx, class.name, symbol_flags::CLASS, node);
        }
        self.declare_type_parameters(arena, class.type_parameters.as_ref());
        if let Some(clauses) = &class.heritage_clauses {
            for clause in clauses.iter() {
                self.bind_node(arena, clause);
            }
        }
        for member in class.members.iter() {
            self.bind_node(arena, member);
        }
        self.exit_scope();
    }

    // =========================================================================
    // Modules and imports
    // =========================================================================

    fn bind_module_declaration(&mut self, arena: &NodeArena, node: &Node, idx: NodeIndex) {
        let Some(module) = arena.get_module_decl(node) else {
            return;
        };
        let statements = arena
            .get(module.body)
            .and_then(|body| arena.get_block(body))
            .map(|block| &block.statements);

        // `declare global { ... }` adds to the file scope.
        if arena.identifier_text(module.name) == Some("global") {
            if let Some(statements) = statements {
                self.bind_statements(arena, statements);
            }
            return;
        }

        // `namespace a.b.c` declares `a` here.
        let mut leftmost = module.name;
        while let Some(qualified) = arena
            .get(leftmost)
            .and_then(|name_node| arena.get_qualified_name(name_node))
        {
            leftmost = qualified.left;
        }
        if arena.get(leftmost).is_some_and(|n| n.is_identifier()) {
            self.declare_named(arena, idx, leftmost, symbol_flags::NAMESPACE, node);
        }

        self.enter_scope(ContainerKind::Module, idx);
        if let Some(statements) = statements {
            self.bind_statements(arena, statements);
        }
        self.exit_scope();
    }

    fn bind_import_declaration(&mut self, arena: &NodeArena, node: &Node, idx: NodeIndex) {
        let Some(import) = arena.get_import_decl(node) else {
            return;
        };
        let module = arena
            .get(import.module_specifier)
            .and_then(|spec| arena.get_literal(spec))
            .map(|literal| literal.text.clone());

        if import.default_binding.is_some() {
            self.declare_import(arena, idx, import.default_binding, "default", module.clone());
        }
        if import.namespace_binding.is_some() {
            self.declare_import(arena, idx, import.namespace_binding, "*", module.clone());
        }
        if let Some(named) = &import.named_bindings {
            for specifier in named.iter() {
                let Some(data) = arena
                    .get(specifier)
                    .and_then(|spec_node| arena.get_specifier(spec_node))
                else {
                    continue;
                };
                let imported = if data.property_name.is_some() {
                    arena.identifier_text(data.property_name)
                } else {
                    arena.identifier_text(data.name)
                };
                if let Some(imported) = imported {
                    let imported = imported.to_string();
                    self.declare_import(arena, specifier, data.name, &imported, module.clone());
                }
            }
        }
    }

    fn declare_import(
        &mut self,
        arena: &NodeArena,
        declaration: NodeIndex,
        local: NodeIndex,
        imported: &str,
        module: Option<String>,
    ) {
        let Some(local_name) = arena.identifier_text(local) else {
            return;
        };
        let local_name = local_name.to_string();
        let scope = self.current_scope_id;
        let symbol_id = self.declare_symbol(scope, &local_name, symbol_flags::ALIAS, declaration, local);
        trace!(local = %local_name, imported, "import binding");
        if let Some(symbol) = self.symbols.get_mut(symbol_id) {
            symbol.import_name = Some(imported.to_string());
            symbol.import_module = module;
        }
    }
}
