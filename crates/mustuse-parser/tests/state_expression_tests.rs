//! Tests for expression parsing.
use mustuse_parser::parser::{modifier_flags, node_flags, syntax_kind_ext};
use mustuse_parser::{NodeArena, NodeIndex, ParserState};
use mustuse_scanner::SyntaxKind;

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn nodes_of_kind(arena: &NodeArena, kind: u16) -> Vec<NodeIndex> {
    arena
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.kind == kind)
        .map(|(i, _)| NodeIndex(i as u32))
        .collect()
}

/// Expression of the `index`-th top-level expression statement.
fn statement_expression(arena: &NodeArena, root: NodeIndex, index: usize) -> NodeIndex {
    let stmt = arena.source_file_statements(root)[index];
    arena
        .get_expr_statement(arena.get(stmt).unwrap())
        .unwrap()
        .expression
}

fn property_name(arena: &NodeArena, access: NodeIndex) -> &str {
    let data = arena.get_access_expr(arena.get(access).unwrap()).unwrap();
    arena.identifier_text(data.name_or_argument).unwrap()
}

#[test]
fn parse_member_call_chain() {
    let (parser, root) = parse_source("getResult().map(() => {}).unwrapOr('')");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();

    let outer = statement_expression(arena, root, 0);
    assert_eq!(arena.get(outer).unwrap().kind, syntax_kind_ext::CALL_EXPRESSION);
    let outer_data = arena.get_call_expr(arena.get(outer).unwrap()).unwrap();
    assert_eq!(property_name(arena, outer_data.expression), "unwrapOr");

    let access = arena.get_access_expr(arena.get(outer_data.expression).unwrap()).unwrap();
    let map_call = arena.get_call_expr(arena.get(access.expression).unwrap()).unwrap();
    assert_eq!(property_name(arena, map_call.expression), "map");
    let arrow = map_call.arguments.as_ref().unwrap().nodes[0];
    assert_eq!(arena.get(arrow).unwrap().kind, syntax_kind_ext::ARROW_FUNCTION);
}

#[test]
fn parse_await_of_call() {
    let (parser, _root) =
        parse_source("async function f() { const v = await getResultPromise(); }");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let awaits = nodes_of_kind(arena, syntax_kind_ext::AWAIT_EXPRESSION);
    assert_eq!(awaits.len(), 1);
    let operand = arena
        .get_unary_expr_ex(arena.get(awaits[0]).unwrap())
        .unwrap()
        .expression;
    assert_eq!(
        arena.get(operand).unwrap().kind,
        syntax_kind_ext::CALL_EXPRESSION
    );
}

#[test]
fn parse_optional_chaining() {
    let (parser, root) = parse_source("a?.b?.()");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let call = statement_expression(arena, root, 0);
    let call_node = arena.get(call).unwrap();
    assert_eq!(call_node.kind, syntax_kind_ext::CALL_EXPRESSION);
    assert!(call_node.has_flag(node_flags::OPTIONAL_CHAIN));
    let callee = arena.get_call_expr(call_node).unwrap().expression;
    let callee_node = arena.get(callee).unwrap();
    assert_eq!(callee_node.kind, syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION);
    assert!(callee_node.has_flag(node_flags::OPTIONAL_CHAIN));
}

#[test]
fn parse_generic_call_versus_comparison() {
    let (parser, root) = parse_source("f<string>(x);\na < b;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();

    let call = statement_expression(arena, root, 0);
    let call_data = arena.get_call_expr(arena.get(call).unwrap()).unwrap();
    assert_eq!(call_data.type_arguments.as_ref().map(|t| t.len()), Some(1));

    let comparison = statement_expression(arena, root, 1);
    let binary = arena.get_binary_expr(arena.get(comparison).unwrap()).unwrap();
    assert_eq!(binary.operator_token, SyntaxKind::LessThanToken as u16);
}

#[test]
fn parse_glued_greater_than_operators() {
    let (parser, root) = parse_source("a >= b;\nc >> 2;\nd >>>= 1;");
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();

    let ge = statement_expression(arena, root, 0);
    let ge_data = arena.get_binary_expr(arena.get(ge).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(ge_data.right), Some("b"));

    let shift = statement_expression(arena, root, 1);
    assert_eq!(
        arena.get(shift).unwrap().kind,
        syntax_kind_ext::BINARY_EXPRESSION
    );

    let assign = statement_expression(arena, root, 2);
    let assign_data = arena.get_binary_expr(arena.get(assign).unwrap()).unwrap();
    let operator = assign_data.operator_token;
    assert!(operator >= SyntaxKind::EqualsToken as u16);
    assert!(operator <= SyntaxKind::QuestionQuestionEqualsToken as u16);
}

#[test]
fn parse_arrow_function_forms() {
    let source = "const f = async (x: number): Promise<void> => {};\nconst g = y => y;\nconst h = async z => z;";
    let (parser, _root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let arrows = nodes_of_kind(arena, syntax_kind_ext::ARROW_FUNCTION);
    assert_eq!(arrows.len(), 3);
    let asyncs: Vec<bool> = arrows
        .iter()
        .map(|&a| arena.get(a).unwrap().has_flag(modifier_flags::ASYNC))
        .collect();
    assert_eq!(asyncs, vec![true, false, true]);

    let f = arena.get_function(arena.get(arrows[0]).unwrap()).unwrap();
    assert!(f.type_annotation.is_some());
    let g = arena.get_function(arena.get(arrows[1]).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(g.body), Some("y"));
}

#[test]
fn parse_parenthesized_operand_in_conditional_is_not_an_arrow() {
    let (parser, _root) = parse_source("const c = cond ? (a) : b;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    assert_eq!(
        nodes_of_kind(arena, syntax_kind_ext::CONDITIONAL_EXPRESSION).len(),
        1
    );
    assert!(nodes_of_kind(arena, syntax_kind_ext::ARROW_FUNCTION).is_empty());
}

#[test]
fn parse_object_literal_members() {
    let source = "const o = { a: 1, b, ...c, m() { return 1; }, get g() { return 2; }, async n() {}, 'k': 2, [key]: 3 };";
    let (parser, _root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let literal = nodes_of_kind(arena, syntax_kind_ext::OBJECT_LITERAL_EXPRESSION)[0];
    let elements = &arena
        .get_literal_expr(arena.get(literal).unwrap())
        .unwrap()
        .elements;
    let kinds: Vec<u16> = elements.iter().map(|e| arena.get(e).unwrap().kind).collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            syntax_kind_ext::SPREAD_ASSIGNMENT,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::GET_ACCESSOR,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
        ]
    );
    assert!(
        arena
            .get(elements.nodes[5])
            .unwrap()
            .has_flag(modifier_flags::ASYNC)
    );
}

#[test]
fn parse_new_expressions_with_and_without_arguments() {
    let (parser, root) = parse_source("new Foo(1);\nnew Bar;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let with_args = statement_expression(arena, root, 0);
    let with_args_data = arena.get_call_expr(arena.get(with_args).unwrap()).unwrap();
    assert_eq!(arena.get(with_args).unwrap().kind, syntax_kind_ext::NEW_EXPRESSION);
    assert_eq!(with_args_data.arguments.as_ref().map(|a| a.len()), Some(1));

    let bare = statement_expression(arena, root, 1);
    let bare_data = arena.get_call_expr(arena.get(bare).unwrap()).unwrap();
    assert!(bare_data.arguments.is_none());
    assert_eq!(arena.identifier_text(bare_data.expression), Some("Bar"));
}

#[test]
fn parse_type_assertions_and_non_null() {
    let (parser, _root) =
        parse_source("const v = (x as Result<string, Error>)!;\nconst w = y satisfies T;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    assert_eq!(nodes_of_kind(arena, syntax_kind_ext::AS_EXPRESSION).len(), 1);
    assert_eq!(
        nodes_of_kind(arena, syntax_kind_ext::NON_NULL_EXPRESSION).len(),
        1
    );
    assert_eq!(
        nodes_of_kind(arena, syntax_kind_ext::SATISFIES_EXPRESSION).len(),
        1
    );
}

#[test]
fn parse_templates_and_regex_literals() {
    let (parser, _root) = parse_source("const t = `a${b}c`;\nconst r = /x+/g;\nconst d = a / b / c;");
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn parse_assignment_is_right_associative() {
    let (parser, root) = parse_source("a = b = c;");
    let arena = parser.get_arena();
    let outer = statement_expression(arena, root, 0);
    let outer_data = arena.get_binary_expr(arena.get(outer).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(outer_data.left), Some("a"));
    let inner = arena.get(outer_data.right).unwrap();
    assert_eq!(inner.kind, syntax_kind_ext::BINARY_EXPRESSION);
}

#[test]
fn parse_missing_expression_reports_parse_error() {
    let (parser, _root) = parse_source("const x = );");
    let diagnostics = parser.get_diagnostics();
    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics[0].code, "parse-error");
    assert_eq!(diagnostics[0].message_text, "Expression expected.");
}
