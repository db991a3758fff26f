//! Tests for statement and declaration parsing.
use mustuse_parser::parser::{modifier_flags, node_flags, syntax_kind_ext};
use mustuse_parser::{NodeArena, NodeIndex, ParserState};

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn statement_kinds(arena: &NodeArena, root: NodeIndex) -> Vec<u16> {
    arena
        .source_file_statements(root)
        .iter()
        .map(|&stmt| arena.get(stmt).unwrap().kind)
        .collect()
}

fn first_of_kind(arena: &NodeArena, kind: u16) -> NodeIndex {
    let position = arena
        .nodes
        .iter()
        .position(|node| node.kind == kind)
        .unwrap_or_else(|| panic!("no node of kind {kind}"));
    NodeIndex(position as u32)
}

#[test]
fn parse_statement_recovery_on_malformed_top_level_diagnostics() {
    let (parser, root) = parse_source("const x = 1\nconst y = ;\nconst z = 3;");
    let sf = parser.get_arena().get_source_file_at(root).unwrap();
    assert_eq!(sf.statements.nodes.len(), 3);
    assert!(!parser.get_diagnostics().is_empty());
    assert!(
        parser
            .get_diagnostics()
            .iter()
            .all(|d| d.code == "parse-error")
    );
}

#[test]
fn parse_variable_statement_flags_and_declarations() {
    let (parser, root) = parse_source("let a = 1, b;\nconst c = 2;");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let statements = arena.source_file_statements(root);
    let stmt = arena.get(statements[0]).unwrap();
    let list_idx = arena.get_variable(stmt).unwrap().declarations.nodes[0];
    let list = arena.get(list_idx).unwrap();
    assert_eq!(list.kind, syntax_kind_ext::VARIABLE_DECLARATION_LIST);
    assert!(list.has_flag(node_flags::LET));
    assert_eq!(arena.get_variable(list).unwrap().declarations.len(), 2);

    let const_stmt = arena.get(statements[1]).unwrap();
    let const_list = arena.get_variable(const_stmt).unwrap().declarations.nodes[0];
    assert!(arena.get(const_list).unwrap().has_flag(node_flags::CONST));
}

#[test]
fn parse_function_declarations_with_modifiers_and_parameters() {
    let (parser, root) = parse_source(
        "declare function f(): void;\nasync function g(a: number, b?: string, ...rest: any[]) { return a; }",
    );
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let statements = arena.source_file_statements(root);

    let f = arena.get(statements[0]).unwrap();
    assert_eq!(f.kind, syntax_kind_ext::FUNCTION_DECLARATION);
    assert!(f.has_flag(modifier_flags::DECLARE));
    assert!(arena.get_function(f).unwrap().body.is_none());

    let g = arena.get(statements[1]).unwrap();
    assert!(g.has_flag(modifier_flags::ASYNC));
    let data = arena.get_function(g).unwrap();
    assert_eq!(arena.identifier_text(data.name), Some("g"));
    assert_eq!(data.parameters.len(), 3);
    let b = arena.get(data.parameters.nodes[1]).unwrap();
    assert!(b.has_flag(node_flags::OPTIONAL));
    let rest = arena.get(data.parameters.nodes[2]).unwrap();
    assert!(rest.has_flag(node_flags::REST));
}

#[test]
fn parse_class_members_and_heritage() {
    let source = "class A extends B implements C {\n  x = 1;\n  private y?: string;\n  constructor(private z: number) {}\n  get v() { return 1 }\n  static m<T>(a: T): T { return a; }\n}";
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.get_arena();
    let class_idx = arena.source_file_statements(root)[0];
    let class = arena.get_class(arena.get(class_idx).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(class.name), Some("A"));
    assert_eq!(class.heritage_clauses.as_ref().map(|h| h.len()), Some(2));

    let kinds: Vec<u16> = class
        .members
        .iter()
        .map(|m| arena.get(m).unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::CONSTRUCTOR,
            syntax_kind_ext::GET_ACCESSOR,
            syntax_kind_ext::METHOD_DECLARATION,
        ]
    );
    let y = arena.get(class.members.nodes[1]).unwrap();
    assert!(y.has_flag(modifier_flags::PRIVATE));
    assert!(y.has_flag(node_flags::OPTIONAL));
    let m = arena.get(class.members.nodes[4]).unwrap();
    assert!(m.has_flag(modifier_flags::STATIC));
}

#[test]
fn parse_static_block_is_skipped() {
    let (parser, root) =
        parse_source("class Holder {\n    static {\n        const v = 1;\n    }\n}\nconst ok = 1;");
    assert_eq!(parser.get_diagnostics().len(), 0);
    assert_eq!(statement_kinds(parser.get_arena(), root).len(), 2);
}

#[test]
fn parse_interface_members() {
    let source = "interface R<T> extends Base {\n  readonly a: T;\n  m?(x: number): R<T>;\n  (): void;\n  [k: string]: unknown\n}";
    let (parser, root) = parse_source(source);
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let iface_idx = arena.source_file_statements(root)[0];
    let iface = arena.get_interface(arena.get(iface_idx).unwrap()).unwrap();
    let kinds: Vec<u16> = iface
        .members
        .iter()
        .map(|m| arena.get(m).unwrap().kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            syntax_kind_ext::PROPERTY_SIGNATURE,
            syntax_kind_ext::METHOD_SIGNATURE,
            syntax_kind_ext::CALL_SIGNATURE,
            syntax_kind_ext::INDEX_SIGNATURE,
        ]
    );
    assert!(
        arena
            .get(iface.members.nodes[0])
            .unwrap()
            .has_flag(modifier_flags::READONLY)
    );
    assert!(
        arena
            .get(iface.members.nodes[1])
            .unwrap()
            .has_flag(node_flags::OPTIONAL)
    );
}

#[test]
fn parse_imports_and_exports() {
    let source = "import { ok, err as e, type T } from 'neverthrow';\nimport * as ns from \"x\";\nexport { a as b };\nexport default foo;";
    let (parser, root) = parse_source(source);
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    assert_eq!(
        statement_kinds(arena, root),
        vec![
            syntax_kind_ext::IMPORT_DECLARATION,
            syntax_kind_ext::IMPORT_DECLARATION,
            syntax_kind_ext::EXPORT_DECLARATION,
            syntax_kind_ext::EXPORT_ASSIGNMENT,
        ]
    );
    let statements = arena.source_file_statements(root);
    let import = arena.get_import_decl(arena.get(statements[0]).unwrap()).unwrap();
    let named = import.named_bindings.as_ref().unwrap();
    assert_eq!(named.len(), 3);
    let renamed = arena.get_specifier(arena.get(named.nodes[1]).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(renamed.property_name), Some("err"));
    assert_eq!(arena.identifier_text(renamed.name), Some("e"));

    let namespace = arena.get_import_decl(arena.get(statements[1]).unwrap()).unwrap();
    assert_eq!(arena.identifier_text(namespace.namespace_binding), Some("ns"));
}

#[test]
fn parse_control_flow_statements() {
    let source = "for (const x of xs) {}\nfor (let i = 0; i < n; i++) {}\nfor (const k in obj) {}\nwhile (a) break;\ndo { } while (b)\nswitch (c) { case 1: f(); break; default: g() }\ntry { } catch (e) { } finally { }\nif (a) { } else b();";
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    assert_eq!(
        statement_kinds(parser.get_arena(), root),
        vec![
            syntax_kind_ext::FOR_OF_STATEMENT,
            syntax_kind_ext::FOR_STATEMENT,
            syntax_kind_ext::FOR_IN_STATEMENT,
            syntax_kind_ext::WHILE_STATEMENT,
            syntax_kind_ext::DO_STATEMENT,
            syntax_kind_ext::SWITCH_STATEMENT,
            syntax_kind_ext::TRY_STATEMENT,
            syntax_kind_ext::IF_STATEMENT,
        ]
    );
}

#[test]
fn parse_return_respects_line_break() {
    let (parser, root) = parse_source("function f() {\n  return\n  g()\n}");
    assert!(parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let func = arena.source_file_statements(root)[0];
    let body = arena.get_function(arena.get(func).unwrap()).unwrap().body;
    let block = arena.get_block(arena.get(body).unwrap()).unwrap();
    assert_eq!(block.statements.len(), 2);
    let ret = arena.get(block.statements.nodes[0]).unwrap();
    assert_eq!(ret.kind, syntax_kind_ext::RETURN_STATEMENT);
    assert!(arena.get_return_statement(ret).unwrap().expression.is_none());
}

#[test]
fn parse_enums_and_namespaces() {
    let source =
        "enum Color { Red, Green = 2 }\nnamespace N { export const x = 1; }\ndeclare module 'm' { }";
    let (parser, root) = parse_source(source);
    assert!(parser.get_diagnostics().is_empty());
    assert_eq!(
        statement_kinds(parser.get_arena(), root),
        vec![
            syntax_kind_ext::ENUM_DECLARATION,
            syntax_kind_ext::MODULE_DECLARATION,
            syntax_kind_ext::MODULE_DECLARATION,
        ]
    );
}

#[test]
fn parent_links_follow_the_tree() {
    let (parser, root) = parse_source("const r = getResult();");
    let arena = parser.get_arena();
    let call = first_of_kind(arena, syntax_kind_ext::CALL_EXPRESSION);
    let decl = arena.parent_of(call);
    assert_eq!(
        arena.get(decl).unwrap().kind,
        syntax_kind_ext::VARIABLE_DECLARATION
    );
    let list = arena.parent_of(decl);
    let stmt = arena.parent_of(list);
    assert_eq!(
        arena.get(stmt).unwrap().kind,
        syntax_kind_ext::VARIABLE_STATEMENT
    );
    assert_eq!(arena.parent_of(stmt), root);
    assert!(arena.parent_of(root).is_none());
}

#[test]
fn children_are_in_source_order() {
    let (parser, _root) = parse_source("f(a, b);");
    let arena = parser.get_arena();
    let call = first_of_kind(arena, syntax_kind_ext::CALL_EXPRESSION);
    let names: Vec<&str> = arena
        .get_children(call)
        .into_iter()
        .filter_map(|child| arena.identifier_text(child))
        .collect();
    assert_eq!(names, vec!["f", "a", "b"]);
}
