use std::path::{Path, PathBuf};

use super::config::{
    ConfigError, ResolvedConfig, config_path_for, load_config, parse_config, resolve_config,
};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

#[test]
fn parses_jsonc_with_comments_and_trailing_commas() {
    let input = r#"
    {
      // project files
      "include": ["src/**/*.ts",],
      "lib": ["types/result.d.ts"], /* shared declarations */
      "rules": {
        "mustUseResult": {
          "fieldAccessors": ["value", "error",],
        },
      },
    }
    "#;

    let config = parse_config(input).expect("should parse JSONC");
    assert_eq!(config.include, Some(vec!["src/**/*.ts".to_string()]));
    assert_eq!(config.lib, Some(vec!["types/result.d.ts".to_string()]));
    let rule = config.rules.unwrap().must_use_result.unwrap();
    assert_eq!(
        rule.field_accessors,
        Some(vec!["value".to_string(), "error".to_string()])
    );
    assert!(rule.terminal_methods.is_none());
}

#[test]
fn keeps_comment_markers_inside_strings() {
    let config = parse_config(r#"{ "include": ["src//*.ts", "a/*b*/c.ts", "q\"//.ts"] }"#).unwrap();
    assert_eq!(
        config.include,
        Some(vec![
            "src//*.ts".to_string(),
            "a/*b*/c.ts".to_string(),
            "q\"//.ts".to_string(),
        ])
    );
}

#[test]
fn accepts_boolean_strings() {
    let config = parse_config(r#"{ "typeInformation": "false" }"#).unwrap();
    assert_eq!(config.type_information, Some(false));
    assert!(parse_config(r#"{ "typeInformation": "maybe" }"#).is_err());
}

#[test]
fn resolve_fills_defaults() {
    let base = Path::new("/project");
    let resolved = ResolvedConfig::default_for(base);
    assert_eq!(resolved.base_dir, base);
    assert_eq!(resolved.include, vec!["**/*".to_string()]);
    assert_eq!(resolved.exclude, vec!["**/node_modules/**".to_string()]);
    assert!(resolved.lib_files.is_empty());
    assert!(resolved.checker.type_information);
    assert!(resolved.checker.must_use_result.is_terminal("unwrap"));
}

#[test]
fn resolve_applies_rule_lists_and_lib_paths() {
    let config = parse_config(
        r#"{
          "lib": ["types/result.d.ts"],
          "typeInformation": false,
          "rules": { "mustUseResult": { "terminalMethods": ["finish"] } }
        }"#,
    )
    .unwrap();
    let resolved = resolve_config(&config, Path::new("/project"));
    assert_eq!(resolved.lib_files, vec![PathBuf::from("/project/types/result.d.ts")]);
    assert!(!resolved.checker.type_information);
    assert_eq!(resolved.checker.must_use_result.terminal_methods, vec!["finish"]);
    assert!(resolved.checker.must_use_result.is_chain("map"));
}

#[test]
fn resolve_applies_guard_lists() {
    let config = parse_config(
        r#"{
          "rules": { "mustUseResult": { "discriminantMethods": ["isFailure"], "guardedFields": ["reason"] } }
        }"#,
    )
    .unwrap();
    let rule = resolve_config(&config, Path::new("/project")).checker.must_use_result;
    assert!(rule.is_discriminant("isFailure"));
    assert!(!rule.is_discriminant("isErr"));
    assert_eq!(rule.guarded_fields, vec!["reason"]);
    assert!(rule.is_field_accessor("value"));
}

#[test]
fn load_config_merges_extends() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "base.json",
        r#"{
          "include": ["lib/**/*.ts"],
          "lib": ["types/base.d.ts"],
          "rules": { "mustUseResult": { "terminalMethods": ["finish"], "fieldAccessors": ["ok"] } }
        }"#,
    );
    let child = write_file(
        dir.path(),
        "mustuse.json",
        r#"{
          "extends": "./base",
          "include": ["src/**/*.ts"],
          "rules": { "mustUseResult": { "fieldAccessors": ["value"] } }
        }"#,
    );

    let config = load_config(&child).expect("extends should load");
    assert!(config.extends.is_none());
    assert_eq!(config.include, Some(vec!["src/**/*.ts".to_string()]));
    assert_eq!(config.lib, Some(vec!["types/base.d.ts".to_string()]));
    let rule = config.rules.unwrap().must_use_result.unwrap();
    assert_eq!(rule.terminal_methods, Some(vec!["finish".to_string()]));
    assert_eq!(rule.field_accessors, Some(vec!["value".to_string()]));
}

#[test]
fn load_config_detects_extends_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(dir.path(), "a.json", r#"{ "extends": "./b.json" }"#);
    write_file(dir.path(), "b.json", r#"{ "extends": "./a.json" }"#);

    let err = load_config(&first).expect_err("cycle should fail");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ExtendsCycle(_))
    ));
}

#[test]
fn load_config_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("missing.json")).expect_err("missing config");
    assert!(format!("{err:#}").contains("failed to read config"));
}

#[test]
fn config_path_for_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(config_path_for(dir.path()), dir.path().join("mustuse.json"));
    let file = write_file(dir.path(), "custom.json", "{}");
    assert_eq!(config_path_for(&file), file);
}
