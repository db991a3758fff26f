//! Tests for the scope tree.
use mustuse_binder::{BinderState, ContainerKind, ScopeId, symbol_flags};
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex, ParserState};

fn bind(source: &str) -> (NodeArena, NodeIndex, BinderState) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let arena = parser.into_arena();
    let mut binder = BinderState::new();
    binder.bind_source_file(&arena, root);
    (arena, root, binder)
}

/// First identifier node with the given text, in arena order.
fn identifiers_named(arena: &NodeArena, name: &str) -> Vec<NodeIndex> {
    (0..arena.len() as u32)
        .map(NodeIndex)
        .filter(|&idx| arena.identifier_text(idx) == Some(name))
        .collect()
}

fn scope_kinds(binder: &BinderState) -> Vec<ContainerKind> {
    binder.scopes.iter().map(|scope| scope.kind).collect()
}

#[test]
fn test_source_file_scope_is_root() {
    let (_arena, root, binder) = bind("const a = 1;");
    let scope = binder.get_scope(ScopeId(0)).unwrap();
    assert_eq!(scope.kind, ContainerKind::SourceFile);
    assert_eq!(scope.container, root);
    assert!(scope.parent.is_none());
}

#[test]
fn test_scope_tree_shape() {
    let (_arena, _root, binder) = bind(
        "function f(a) { if (a) { let x = 1; } }\nclass C { m() {} }\nfor (let i = 0; i < 1; i++) {}",
    );
    assert_eq!(
        scope_kinds(&binder),
        vec![
            ContainerKind::SourceFile,
            ContainerKind::Function,
            ContainerKind::Block,
            ContainerKind::Class,
            ContainerKind::Function,
            ContainerKind::Block,
            ContainerKind::Block,
        ]
    );
    let root = binder.get_scope(ScopeId(0)).unwrap();
    assert_eq!(root.children, vec![ScopeId(1), ScopeId(3), ScopeId(5)]);
    assert_eq!(binder.get_scope(ScopeId(2)).unwrap().parent, ScopeId(1));
}

#[test]
fn test_var_hoists_to_function_scope() {
    let (_arena, _root, binder) =
        bind("function f() { if (true) { var hoisted = 1; let local = 2; } }");
    let function_scope = binder.get_scope(ScopeId(1)).unwrap();
    assert_eq!(function_scope.kind, ContainerKind::Function);
    assert!(function_scope.table.has("hoisted"));
    assert!(!function_scope.table.has("local"));
    let block_scope = binder.get_scope(ScopeId(2)).unwrap();
    assert!(block_scope.table.has("local"));
}

#[test]
fn test_block_function_declarations_hoist() {
    let (_arena, _root, binder) = bind("{ function inner() {} }");
    assert!(binder.file_locals().unwrap().has("inner"));
}

#[test]
fn test_parameters_and_type_parameters_live_in_function_scope() {
    let (_arena, _root, binder) = bind("function f<T>(value: T, { a }: any) {}");
    let scope = binder.get_scope(ScopeId(1)).unwrap();
    assert!(scope.table.has("value"));
    assert!(scope.table.has("a"));
    assert!(scope.types.has("T"));
    let value = binder.get_symbol(scope.table.get("value").unwrap()).unwrap();
    assert!(value.has_any_flags(symbol_flags::PARAMETER));
    assert_eq!(value.scope, ScopeId(1));
}

#[test]
fn test_catch_variable_is_block_scoped() {
    let (_arena, _root, binder) = bind("try { } catch (e) { }");
    assert!(!binder.file_locals().unwrap().has("e"));
    let catch_scope = binder
        .scopes
        .iter()
        .find(|scope| scope.table.has("e"))
        .expect("catch scope declares 'e'");
    assert_eq!(catch_scope.kind, ContainerKind::Block);
}

#[test]
fn test_scope_of_walks_to_nearest_container() {
    let (arena, _root, binder) = bind("function outer() { const inner = () => { target; }; }");
    let target = identifiers_named(&arena, "target")[0];
    let scope = binder.get_scope(binder.scope_of(&arena, target)).unwrap();
    assert_eq!(scope.kind, ContainerKind::Function);
    assert_eq!(
        arena.get(scope.container).unwrap().kind,
        syntax_kind_ext::ARROW_FUNCTION
    );
}

#[test]
fn test_shadowing_resolves_to_innermost_declaration() {
    let (arena, _root, binder) =
        bind("const value = 1;\nfunction f() { const value = 2; use(value); }\nuse(value);");
    let uses = identifiers_named(&arena, "value");
    // Declarations: outer (0), inner (1); references: inner use (2), outer use (3).
    let outer = binder.symbol_for_declaration(uses[0]).unwrap();
    let inner = binder.symbol_for_declaration(uses[1]).unwrap();
    assert_ne!(outer, inner);
    assert_eq!(binder.resolve_identifier(&arena, uses[2]), Some(inner));
    assert_eq!(binder.resolve_identifier(&arena, uses[3]), Some(outer));
}

#[test]
fn test_resolve_type_name_sees_local_interfaces() {
    let (arena, _root, binder) = bind(
        "interface Outer {}\nfunction f<T>() { interface Local {} let x: T; }",
    );
    let x = identifiers_named(&arena, "x")[0];
    assert!(binder.resolve_type_name(&arena, x, "Outer").is_some());
    assert!(binder.resolve_type_name(&arena, x, "Local").is_some());
    assert!(binder.resolve_type_name(&arena, x, "T").is_some());
    assert!(binder.resolve_type_name(&arena, x, "Missing").is_none());
}

#[test]
fn test_namespace_opens_module_scope() {
    let (_arena, _root, binder) = bind("namespace Outer.Inner { export const v = 1; }");
    assert!(binder.file_locals().unwrap().has("Outer"));
    let module_scope = binder
        .scopes
        .iter()
        .find(|scope| scope.kind == ContainerKind::Module)
        .expect("namespace scope");
    assert!(module_scope.table.has("v"));
}

#[test]
fn test_declare_global_adds_to_file_scope() {
    let (_arena, _root, binder) = bind("declare global { interface Window { x: number } }");
    assert!(binder.file_type_locals().unwrap().has("Window"));
}
