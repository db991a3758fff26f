//! Tests for reference collection.
use mustuse_binder::{BinderState, Symbol};
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex, ParserState};

fn bind(source: &str) -> (NodeArena, NodeIndex, BinderState) {
    let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected parse diagnostics: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.into_arena();
    let mut binder = BinderState::new();
    binder.bind_source_file(&arena, root);
    (arena, root, binder)
}

fn symbol<'a>(binder: &'a BinderState, name: &str) -> &'a Symbol {
    let id = binder
        .file_locals()
        .and_then(|locals| locals.get(name))
        .unwrap_or_else(|| panic!("'{name}' should be declared"));
    binder.get_symbol(id).unwrap()
}

fn parent_kinds(arena: &NodeArena, symbol: &Symbol) -> Vec<u16> {
    symbol
        .references
        .iter()
        .map(|reference| arena.get(arena.parent_of(reference.node)).unwrap().kind)
        .collect()
}

#[test]
fn test_references_in_document_order_across_nested_scopes() {
    let (arena, _root, binder) = bind(
        "const result = getResult();\nif (cond) { result.unwrap(); }\nfunction f() { return () => result; }\nlog(result);",
    );
    let result = symbol(&binder, "result");
    assert_eq!(result.references.len(), 3);
    let positions: Vec<u32> = result
        .references
        .iter()
        .map(|r| arena.get(r.node).unwrap().pos)
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(result.references.iter().all(|r| r.is_read() && !r.is_write()));
    assert_eq!(
        parent_kinds(&arena, result),
        vec![
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
            syntax_kind_ext::ARROW_FUNCTION,
            syntax_kind_ext::CALL_EXPRESSION,
        ]
    );
}

#[test]
fn test_declaration_names_and_properties_are_not_references() {
    let (_arena, _root, binder) = bind(
        "const value = 1;\nconst o = { value: 2 };\nclass C { value = 3; value2() {} }\nobj.value;\nfunction g(value) {}",
    );
    assert!(symbol(&binder, "value").references.is_empty());
}

#[test]
fn test_shorthand_properties_and_computed_keys_are_references() {
    let (_arena, _root, binder) = bind("const a = 1;\nconst key = 'k';\nconst o = { a, [key]: 2 };");
    assert_eq!(symbol(&binder, "a").references.len(), 1);
    assert_eq!(symbol(&binder, "key").references.len(), 1);
}

#[test]
fn test_write_references() {
    let (_arena, _root, binder) = bind("let n = 0;\nn = 1;\nn += 2;\nn++;\nfor (n of xs) {}\nuse(n);");
    let flags: Vec<(bool, bool)> = symbol(&binder, "n")
        .references
        .iter()
        .map(|r| (r.is_read(), r.is_write()))
        .collect();
    assert_eq!(
        flags,
        vec![
            (false, true),
            (true, true),
            (true, true),
            (false, true),
            (true, false),
        ]
    );
    assert_eq!(symbol(&binder, "n").reads().count(), 3);
}

#[test]
fn test_type_positions_are_not_value_references() {
    let (_arena, _root, binder) = bind(
        "class Err {}\nlet e: Err;\ntype T = typeof Err;\ninterface I extends Err {}\nclass D implements Err {}\nnew Err();",
    );
    assert_eq!(symbol(&binder, "Err").references.len(), 1);
}

#[test]
fn test_class_heritage_extends_is_a_reference() {
    let (_arena, _root, binder) = bind("class Base {}\nclass Derived extends Base {}");
    assert_eq!(symbol(&binder, "Base").references.len(), 1);
}

#[test]
fn test_export_specifiers_read_local_names() {
    let (_arena, _root, binder) = bind(
        "const local = 1;\nexport { local as exported };\nexport { other } from './other';\nexport default local;",
    );
    assert_eq!(symbol(&binder, "local").references.len(), 2);
}

#[test]
fn test_labels_are_not_references() {
    let (_arena, _root, binder) = bind("let outer = 1;\nouter: for (;;) { break outer; }");
    assert!(symbol(&binder, "outer").references.is_empty());
}

#[test]
fn test_unresolved_identifiers_are_ignored() {
    let (arena, _root, binder) = bind("missing();");
    let call = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&idx| arena.identifier_text(idx) == Some("missing"))
        .unwrap();
    assert_eq!(binder.resolve_identifier(&arena, call), None);
    assert!(binder.symbols.is_empty());
}

#[test]
fn test_import_references() {
    let (_arena, _root, binder) =
        bind("import { getResult } from './api';\nconst r = getResult();\ngetResult();");
    assert_eq!(symbol(&binder, "getResult").references.len(), 2);
}
