//! Tests for type parsing.
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex, ParserState};

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn count_kind(arena: &NodeArena, kind: u16) -> usize {
    arena.nodes.iter().filter(|node| node.kind == kind).count()
}

fn assert_clean(parser: &ParserState) {
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
}

#[test]
fn parse_nested_type_arguments_closing_with_adjacent_greater_than() {
    let (parser, _root) = parse_source("let v: Promise<Result<string, Error>> = p;");
    assert_clean(&parser);
    assert_eq!(count_kind(parser.get_arena(), syntax_kind_ext::TYPE_REFERENCE), 4);
}

#[test]
fn parse_function_union_array_and_tuple_types() {
    let (parser, _root) = parse_source(
        "type F = (a: string) => Result<number, Error> | undefined;\ntype A = string[] | [number, string?];",
    );
    assert_clean(&parser);
    let arena = parser.get_arena();
    let function_type = arena
        .nodes
        .iter()
        .find(|node| node.kind == syntax_kind_ext::FUNCTION_TYPE)
        .unwrap();
    let data = arena.get_function_type(function_type).unwrap();
    assert_eq!(data.parameters.len(), 1);
    assert_eq!(
        arena.get(data.type_annotation).unwrap().kind,
        syntax_kind_ext::UNION_TYPE
    );
    assert_eq!(count_kind(arena, syntax_kind_ext::ARRAY_TYPE), 1);
    assert_eq!(count_kind(arena, syntax_kind_ext::TUPLE_TYPE), 1);
}

#[test]
fn parse_type_predicates_in_signatures() {
    let (parser, _root) = parse_source(
        "interface R<T> { isOk(): this is Ok<T>; isErr(): boolean }\nfunction isStr(x: unknown): x is string { return true; }",
    );
    assert_clean(&parser);
    assert_eq!(count_kind(parser.get_arena(), syntax_kind_ext::TYPE_PREDICATE), 2);
}

#[test]
fn parse_conditional_mapped_and_indexed_types() {
    let (parser, _root) = parse_source(
        "type X<T> = T extends Promise<infer U> ? U : never;\ntype M = { readonly [K in keyof T]?: T[K] };",
    );
    assert_clean(&parser);
    let arena = parser.get_arena();
    assert_eq!(count_kind(arena, syntax_kind_ext::CONDITIONAL_TYPE), 1);
    assert_eq!(count_kind(arena, syntax_kind_ext::MAPPED_TYPE), 1);
    assert_eq!(count_kind(arena, syntax_kind_ext::INDEXED_ACCESS_TYPE), 1);
}

#[test]
fn parse_type_literals_and_qualified_names() {
    let (parser, _root) =
        parse_source("declare const x: { a: ns.Thing<string>; f(): void };");
    assert_clean(&parser);
    let arena = parser.get_arena();
    assert_eq!(count_kind(arena, syntax_kind_ext::TYPE_LITERAL), 1);
    assert_eq!(count_kind(arena, syntax_kind_ext::QUALIFIED_NAME), 1);
    assert_eq!(count_kind(arena, syntax_kind_ext::KEYWORD_TYPE), 1);
}

#[test]
fn parse_missing_type_reports_type_expected() {
    let (parser, _root) = parse_source("let x: = 1;");
    let diagnostics = parser.get_diagnostics();
    assert!(
        diagnostics
            .iter()
            .any(|d| d.message_text == "Type expected." && d.code == "parse-error")
    );
}
