use crate::options::{CheckerOptions, MustUseResultOptions};

#[test]
fn test_default_options() {
    let options = CheckerOptions::default();
    assert!(options.type_information);

    let rule = &options.must_use_result;
    assert_eq!(
        rule.protocol_members,
        vec!["mapErr", "map", "andThen", "orElse", "match", "unwrapOr"]
    );
    assert_eq!(rule.chain_methods, rule.protocol_members);
    assert!(rule.is_terminal("unwrapOr"));
    assert!(rule.is_terminal("isErr"));
    assert!(!rule.is_terminal("map"));
    assert!(rule.is_chain("andThen"));
    assert!(rule.is_field_accessor("value"));
    assert!(!rule.is_field_accessor("error"));
    assert!(rule.is_discriminant("isOk"));
    assert!(rule.is_discriminant("isErr"));
    assert!(rule.is_guarded_field("error"));
    assert!(!rule.is_guarded_field("map"));
}

#[test]
fn test_partial_options_keep_defaults() {
    let options: CheckerOptions = serde_json::from_str(
        r#"{ "mustUseResult": { "fieldAccessors": ["value", "error"] } }"#,
    )
    .unwrap();
    assert!(options.type_information);
    assert!(options.must_use_result.is_field_accessor("error"));
    assert_eq!(
        options.must_use_result.terminal_methods,
        MustUseResultOptions::default().terminal_methods
    );
}

#[test]
fn test_options_serialize_camel_case() {
    let value = serde_json::to_value(CheckerOptions::default()).unwrap();
    assert_eq!(value["typeInformation"], serde_json::Value::Bool(true));
    assert!(value["mustUseResult"]["terminalMethods"].is_array());
    assert!(value["mustUseResult"].get("terminal_methods").is_none());
}
