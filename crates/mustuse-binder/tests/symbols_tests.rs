//! Tests for symbol declaration and merging.
use mustuse_binder::{BinderState, SymbolId, symbol_flags};
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

fn file_value(binder: &BinderState, name: &str) -> SymbolId {
    binder
        .file_locals()
        .and_then(|locals| locals.get(name))
        .unwrap_or_else(|| panic!("'{name}' should be a file-level value"))
}

fn file_type(binder: &BinderState, name: &str) -> SymbolId {
    binder
        .file_type_locals()
        .and_then(|locals| locals.get(name))
        .unwrap_or_else(|| panic!("'{name}' should be a file-level type"))
}

#[test]
fn test_declares_variables_functions_and_classes() {
    let (_arena, _root, binder) = bind(
        "const a = 1;\nlet b = 2;\nvar c = 3;\nfunction f() {}\nclass C {}\nenum E { X }\nnamespace N {}",
    );
    let expectations = [
        ("a", symbol_flags::BLOCK_SCOPED_VARIABLE),
        ("b", symbol_flags::BLOCK_SCOPED_VARIABLE),
        ("c", symbol_flags::FUNCTION_SCOPED_VARIABLE),
        ("f", symbol_flags::FUNCTION),
        ("C", symbol_flags::CLASS),
        ("E", symbol_flags::ENUM),
        ("N", symbol_flags::NAMESPACE),
    ];
    for (name, flag) in expectations {
        let symbol = binder.get_symbol(file_value(&binder, name)).unwrap();
        assert!(
            symbol.has_any_flags(flag),
            "'{name}' has flags {:#x}, expected {flag:#x}",
            symbol.flags
        );
    }
    // Classes and enums also have a type meaning.
    assert_eq!(file_type(&binder, "C"), file_value(&binder, "C"));
    assert_eq!(file_type(&binder, "E"), file_value(&binder, "E"));
}

#[test]
fn test_interfaces_and_aliases_are_types_only() {
    let (_arena, _root, binder) =
        bind("interface Result<T, E> { isOk(): boolean }\ntype Alias = Result<string, Error>;");
    assert!(binder.file_locals().unwrap().get("Result").is_none());
    let result = binder.get_symbol(file_type(&binder, "Result")).unwrap();
    assert!(result.has_any_flags(symbol_flags::INTERFACE));
    let alias = binder.get_symbol(file_type(&binder, "Alias")).unwrap();
    assert!(alias.has_any_flags(symbol_flags::TYPE_ALIAS));
}

#[test]
fn test_interface_declarations_merge() {
    let (_arena, _root, binder) = bind("interface A { x: number }\ninterface A { y: string }");
    let symbol = binder.get_symbol(file_type(&binder, "A")).unwrap();
    assert_eq!(symbol.declarations.len(), 2);
}

#[test]
fn test_class_merges_with_interface() {
    let (_arena, _root, binder) = bind("interface Box { label: string }\nclass Box {}");
    let symbol = binder.get_symbol(file_type(&binder, "Box")).unwrap();
    assert!(symbol.has_any_flags(symbol_flags::INTERFACE));
    assert!(symbol.has_any_flags(symbol_flags::CLASS));
    assert_eq!(file_value(&binder, "Box"), file_type(&binder, "Box"));
}

#[test]
fn test_function_overloads_share_one_symbol() {
    let (arena, root, binder) = bind(
        "function load(x: string): number;\nfunction load(x: number): number;\nfunction load(x: any) { return 1; }",
    );
    let symbol = binder.get_symbol(file_value(&binder, "load")).unwrap();
    assert_eq!(symbol.declarations.len(), 3);
    assert_eq!(symbol.value_declaration, arena.source_file_statements(root)[0]);
}

#[test]
fn test_import_bindings_record_imported_names() {
    let (_arena, _root, binder) = bind(
        "import def, { ok as makeOk, Result } from 'neverthrow';\nimport * as ns from './ns';",
    );
    let cases = [
        ("def", "default", "neverthrow"),
        ("makeOk", "ok", "neverthrow"),
        ("Result", "Result", "neverthrow"),
        ("ns", "*", "./ns"),
    ];
    for (local, imported, module) in cases {
        let symbol = binder.get_symbol(file_value(&binder, local)).unwrap();
        assert!(symbol.has_any_flags(symbol_flags::ALIAS));
        assert_eq!(symbol.import_name.as_deref(), Some(imported), "import name of '{local}'");
        assert_eq!(symbol.import_module.as_deref(), Some(module), "module of '{local}'");
    }
    // Imports carry both meanings.
    assert_eq!(file_type(&binder, "Result"), file_value(&binder, "Result"));
}

#[test]
fn test_symbol_for_declaration_maps_name_and_node() {
    let (arena, root, binder) = bind("const result = 1;");
    let statement = arena.source_file_statements(root)[0];
    let list = arena
        .get_variable(arena.get(statement).unwrap())
        .unwrap()
        .declarations
        .nodes[0];
    let decl = arena
        .get_variable(arena.get(list).unwrap())
        .unwrap()
        .declarations
        .nodes[0];
    let name = arena
        .get_variable_declaration(arena.get(decl).unwrap())
        .unwrap()
        .name;
    let expected = file_value(&binder, "result");
    assert_eq!(binder.symbol_for_declaration(name), Some(expected));
    assert_eq!(binder.symbol_for_declaration(decl), Some(expected));
    assert_eq!(binder.resolve_identifier(&arena, name), Some(expected));
}

#[test]
fn test_exported_declarations_are_marked() {
    let (_arena, _root, binder) = bind("export const a = 1;\nexport function f() {}\nconst b = 2;");
    assert!(binder.get_symbol(file_value(&binder, "a")).unwrap().is_exported);
    assert!(binder.get_symbol(file_value(&binder, "f")).unwrap().is_exported);
    assert!(!binder.get_symbol(file_value(&binder, "b")).unwrap().is_exported);
}

#[test]
fn test_destructuring_declares_every_name() {
    let (_arena, _root, binder) = bind("const { a, b: renamed, ...rest } = obj;\nconst [x, [y]] = arr;");
    for name in ["a", "renamed", "rest", "x", "y"] {
        file_value(&binder, name);
    }
    assert!(binder.file_locals().unwrap().get("b").is_none());
}

#[test]
fn test_rebinding_resets_state() {
    let mut parser = ParserState::new("a.ts".to_string(), "const a = 1;".to_string());
    let root = parser.parse_source_file();
    let mut binder = BinderState::new();
    binder.bind_source_file(parser.get_arena(), root);

    let mut other = ParserState::new("b.ts".to_string(), "const b = 1;".to_string());
    let other_root = other.parse_source_file();
    binder.bind_source_file(other.get_arena(), other_root);

    assert_eq!(binder.file_name(), "b.ts");
    assert!(binder.file_locals().unwrap().get("a").is_none());
    assert_eq!(binder.symbols.len(), 1);
}
