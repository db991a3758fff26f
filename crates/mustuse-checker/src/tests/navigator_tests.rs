use crate::navigator::*;
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex, ParserState};

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty());
    (parser.into_arena(), root)
}

/// Nodes of `kind`, ordered by start position.
fn nodes_of_kind(arena: &NodeArena, kind: u16) -> Vec<NodeIndex> {
    let mut nodes: Vec<NodeIndex> = arena
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.kind == kind)
        .map(|(i, _)| NodeIndex(i as u32))
        .collect();
    nodes.sort_by_key(|&index| arena.get(index).unwrap().pos);
    nodes
}

fn statement_expression(arena: &NodeArena, root: NodeIndex, index: usize) -> NodeIndex {
    let stmt = arena.source_file_statements(root)[index];
    arena
        .get_expr_statement(arena.get(stmt).unwrap())
        .unwrap()
        .expression
}

fn callee(arena: &NodeArena, call: NodeIndex) -> NodeIndex {
    arena.get_call_expr(arena.get(call).unwrap()).unwrap().expression
}

fn object_of(arena: &NodeArena, access: NodeIndex) -> NodeIndex {
    arena
        .skip_parentheses(arena.get_access_expr(arena.get(access).unwrap()).unwrap().expression)
}

#[test]
fn test_candidate_sites_outer_before_inner() {
    let (arena, root) = parse("a(b());\nnew C();\nasync function f() { await d(); }");
    let kinds: Vec<u16> = candidate_sites(&arena, root)
        .into_iter()
        .map(|site| arena.get(site).unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::CALL_EXPRESSION,
            syntax_kind_ext::CALL_EXPRESSION,
            syntax_kind_ext::NEW_EXPRESSION,
            syntax_kind_ext::AWAIT_EXPRESSION,
            syntax_kind_ext::CALL_EXPRESSION,
        ]
    );
    let sites = candidate_sites(&arena, root);
    assert_eq!(sites[0], statement_expression(&arena, root, 0));
}

#[test]
fn test_member_access_and_invoking_call() {
    let (arena, root) = parse("getResult().unwrapOr('');");
    let outer = statement_expression(&arena, root, 0);
    let access = callee(&arena, outer);
    let inner = object_of(&arena, access);

    assert_eq!(member_access_of(&arena, inner), Some(access));
    assert_eq!(member_name(&arena, access), Some("unwrapOr"));
    assert_eq!(invoking_call(&arena, access), Some(outer));
    assert!(is_member_called(&arena, access));
    assert_eq!(member_access_of(&arena, outer), None);
}

#[test]
fn test_member_access_through_parentheses() {
    let (arena, root) = parse("(getResult()).map;");
    let access = statement_expression(&arena, root, 0);
    let inner = object_of(&arena, access);

    assert_eq!(member_access_of(&arena, inner), Some(access));
    assert_eq!(member_name(&arena, access), Some("map"));
    assert!(!is_member_called(&arena, access));
}

#[test]
fn test_parent_skipping_parens() {
    let (arena, root) = parse("((f()));");
    let call = nodes_of_kind(&arena, syntax_kind_ext::CALL_EXPRESSION)[0];
    let (parent, child) = parent_skipping_parens(&arena, call);
    assert_eq!(parent, arena.source_file_statements(root)[0]);
    assert_eq!(
        arena.get(child).unwrap().kind,
        syntax_kind_ext::PARENTHESIZED_EXPRESSION
    );
    assert_eq!(statement_expression(&arena, root, 0), child);
}

#[test]
fn test_awaited_call() {
    let (arena, _root) = parse("async function f() { await d(); e(); }");
    let awaited: Vec<bool> = nodes_of_kind(&arena, syntax_kind_ext::CALL_EXPRESSION)
        .into_iter()
        .map(|call| is_awaited_call(&arena, call))
        .collect();
    assert_eq!(awaited, vec![true, false]);
}

#[test]
fn test_ignored_parents() {
    let (arena, _root) = parse("const a = f() as T;\nconst b = g();\nconst c = h()!;");
    let ignored: Vec<bool> = nodes_of_kind(&arena, syntax_kind_ext::CALL_EXPRESSION)
        .into_iter()
        .map(|call| is_ignored_parent(&arena, call))
        .collect();
    assert_eq!(ignored, vec![true, false, true]);
}

#[test]
fn test_scope_boundaries() {
    assert!(is_scope_boundary(syntax_kind_ext::BLOCK));
    assert!(is_scope_boundary(syntax_kind_ext::SOURCE_FILE));
    assert!(!is_scope_boundary(syntax_kind_ext::ARROW_FUNCTION));
    assert!(is_candidate_kind(syntax_kind_ext::NEW_EXPRESSION));
    assert!(!is_candidate_kind(syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION));
}
