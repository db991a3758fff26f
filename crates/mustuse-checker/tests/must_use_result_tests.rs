//! Tests for the must-use-result rule.
//!
//! Every case is checked against `fixtures/errok.d.ts`, a small Result
//! library with `getResult`, `getResultAsync`, `getResultPromise`,
//! `getNormal` and `obj` declared on top.
use std::sync::Arc;

use mustuse_checker::diagnostics::{Diagnostic, diagnostic_codes};
use mustuse_checker::{CheckError, CheckerOptions, LibFile, check_source_text};

const ERROK: &str = include_str!("fixtures/errok.d.ts");

fn libs() -> Vec<Arc<LibFile>> {
    let lib = LibFile::parse("errok.d.ts", ERROK);
    assert!(
        lib.diagnostics.is_empty(),
        "fixture should parse cleanly: {:?}",
        lib.diagnostics
    );
    vec![Arc::new(lib)]
}

fn check_with(source: &str, libs: &[Arc<LibFile>], options: &CheckerOptions) -> Vec<Diagnostic> {
    let result = check_source_text("test.ts", source, libs, options).unwrap();
    let (findings, other): (Vec<_>, Vec<_>) = result
        .diagnostics
        .into_iter()
        .partition(|diagnostic| diagnostic.code == diagnostic_codes::MUST_USE_RESULT);
    assert!(other.is_empty(), "unexpected parse diagnostics: {other:?}");
    findings
}

fn check(source: &str) -> Vec<Diagnostic> {
    check_with(source, &libs(), &CheckerOptions::default())
}

/// Source text each finding is anchored at.
fn flagged<'s>(source: &'s str, findings: &[Diagnostic]) -> Vec<&'s str> {
    findings
        .iter()
        .map(|finding| {
            let start = finding.start as usize;
            &source[start..start + finding.length as usize]
        })
        .collect()
}

fn assert_clean(source: &str) {
    let findings = check(source);
    assert!(
        findings.is_empty(),
        "expected no findings, got {:?}",
        flagged(source, &findings)
    );
}

// Handled values

#[test]
fn test_call_unwrap_on_stored_result() {
    assert_clean("const result = getResult()\nresult.unwrap()\n");
}

#[test]
fn test_call_is_err_on_stored_result() {
    assert_clean("const result = getResult();\nif (result.isErr()) {\n}\n");
}

#[test]
fn test_is_err_then_value_access() {
    assert_clean(
        "const result = getResult();\nif (result.isErr()) {\n} else {\n    result.value\n}\n",
    );
}

#[test]
fn test_result_async_unwrap() {
    assert_clean("const resultAsync = getResultAsync()\nresultAsync.unwrap()\n");
}

#[test]
fn test_awaited_promise_of_result_unwrap() {
    assert_clean("const result = await getResultPromise()\nresult.unwrap()\n");
}

#[test]
fn test_unwrap_or_after_chain_methods() {
    assert_clean("const result = getResult()\nresult.map(() => {}).unwrapOr('')\n");
    assert_clean("getResult().map(() => {}).unwrapOr('')\n");
    assert_clean("getResult().andThen(() => getResult()).mapErr(() => 1).match(() => {}, () => {})\n");
}

#[test]
fn test_call_match() {
    assert_clean("const result = getResult()\nresult.match(() => {}, () => {})\n");
}

#[test]
fn test_returned_from_function() {
    assert_clean("function main() {\n    return getResult().map(() => {})\n}\n");
}

#[test]
fn test_returned_from_arrow_function() {
    assert_clean("const main = () => getResult().map(() => {})\n");
}

#[test]
fn test_normal_function_call() {
    assert_clean("getNormal()\n");
}

#[test]
fn test_without_definitions() {
    let findings = check_with("// Without definitions\ngetNormal()\n", &[], &CheckerOptions::default());
    assert!(findings.is_empty());
}

#[test]
fn test_every_read_handled() {
    assert_clean(
        "const result = getResult();\nif (getNormal() > 1) {\n    result.unwrap();\n} else {\n    result.unwrapOr('x');\n}\n",
    );
}

#[test]
fn test_read_in_nested_function_handled() {
    assert_clean("const result = getResult();\nfunction later() {\n    result.match(() => {}, () => {});\n}\n");
}

#[test]
fn test_type_assertion_is_not_judged() {
    assert_clean("const value = getResult() as unknown;\nvalue;\n");
}

#[test]
fn test_declarations_in_checked_file() {
    // The same library declared in the checked file itself.
    let source = format!("{ERROK}\nconst result = getResult();\nresult.unwrapOr('');\n");
    let findings = check_with(&source, &[], &CheckerOptions::default());
    assert!(findings.is_empty(), "got {:?}", flagged(&source, &findings));
}

// Unhandled values

#[test]
fn test_only_assignment() {
    let source = "const result = getResult()\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
    assert!(findings[0].related_information.is_empty());
}

#[test]
fn test_awaited_promise_only_assignment() {
    let source = "const result = await getResultPromise()\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["await getResultPromise()"]);
}

#[test]
fn test_map_without_terminal_method() {
    let source = "const result = getResult();\nresult.map(() => {})\n";
    let findings = check(source);
    assert_eq!(
        flagged(source, &findings),
        vec!["getResult()", "result.map(() => {})"]
    );
    assert_eq!(findings[0].related_information.len(), 1);
    assert_eq!(
        findings[0].related_information[0].message_text,
        "The result stored in 'result' is not handled here."
    );
}

#[test]
fn test_bare_call_statement() {
    let source = "getResult()\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
    assert_eq!(
        findings[0].message_text,
        "Result must be handled with either of `match`, `unwrapOr` or `unwrap`."
    );
    assert_eq!(findings[0].file, "test.ts");
}

#[test]
fn test_await_result_async() {
    let source = "await getResultAsync()\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["await getResultAsync()"]);
}

#[test]
fn test_await_plain_result() {
    let source = "await getResult()\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["await getResult()"]);
}

#[test]
fn test_passed_to_external_function() {
    let source = "const v = getResult()\nexternalFunction(v)\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
    let related = &findings[0].related_information;
    assert_eq!(related.len(), 1);
    let start = related[0].start as usize;
    assert_eq!(&source[start..start + related[0].length as usize], "v");
}

#[test]
fn test_method_call_on_object() {
    let source = "obj.get()\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["obj.get()"]);
}

#[test]
fn test_terminal_method_not_invoked() {
    let source = "getResult().unwrapOr\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
}

#[test]
fn test_called_inside_function() {
    let source = "function main() {\n    getResult().map(() => {})\n}\n";
    let findings = check(source);
    assert_eq!(
        flagged(source, &findings),
        vec!["getResult().map(() => {})", "getResult()"]
    );
}

#[test]
fn test_one_unhandled_read_is_enough() {
    let source = "const result = getResult();\nresult.unwrap();\nlog(result);\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
    assert_eq!(findings[0].related_information.len(), 1);
}

#[test]
fn test_new_expression() {
    let source = "new Ok('x')\nconst handled = new Err(1);\nhandled.unwrapOr(0);\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["new Ok('x')"]);
}

#[test]
fn test_error_field_read_under_is_err() {
    assert_clean("const result = getResult();\nif (result.isErr()) {\n    result.error\n}\n");
}

#[test]
fn test_guarded_fields_in_conditional_expression() {
    assert_clean(
        "const result = getResult();\nconst message = result.isErr() ? result.error : result.value;\n",
    );
}

#[test]
fn test_guarded_field_after_logical_and() {
    assert_clean("const result = getResult();\nresult.isErr() && log(result.error);\n");
}

#[test]
fn test_unguarded_error_field_is_unhandled() {
    let source = "const result = getResult();\nresult.error;\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
}

#[test]
fn test_guard_on_another_variable_does_not_count() {
    let source =
        "const a = getResult();\nconst b = getResult();\nif (b.isErr()) {\n    a.error\n}\nb.unwrap();\n";
    let findings = check(source);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].start, 10, "only the result stored in `a` is unhandled");
}

#[test]
fn test_error_field_of_fresh_value_is_unhandled() {
    let source = "if (getResult().isErr()) {\n}\ngetResult().error;\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
    assert_eq!(findings[0].start, 29);

    let mut options = CheckerOptions::default();
    options
        .must_use_result
        .field_accessors
        .push("error".to_string());
    assert!(check_with(source, &libs(), &options).is_empty());
}

// Results passed from one variable to another

#[test]
fn test_result_handled_through_second_variable() {
    assert_clean("const r = getResult();\nconst s = r;\ns.unwrap();\n");
}

#[test]
fn test_result_dropped_in_second_variable() {
    let source = "const r = getResult();\nconst s = r;\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);
    assert_eq!(findings[0].related_information.len(), 1);
}

#[test]
fn test_unhandled_read_at_end_of_variable_chain() {
    let source = "const r = getResult();\nconst s = r;\nconst t = s;\nlog(t);\n";
    let findings = check(source);
    assert_eq!(flagged(source, &findings), vec!["getResult()"]);

    let related = &findings[0].related_information;
    assert_eq!(related.len(), 1);
    let start = related[0].start as usize;
    assert_eq!(&source[start..start + related[0].length as usize], "t");
    assert_eq!(start, source.rfind('t').unwrap());
    assert!(related[0].message_text.contains("'t'"), "{}", related[0].message_text);
}

#[test]
fn test_stored_result_returned() {
    assert_clean("function f() {\n    const r = getResult();\n    return r;\n}\n");
}

#[test]
fn test_stored_result_returned_through_chain() {
    assert_clean("const f = () => {\n    const r = getResult();\n    return r.map(x => x);\n};\n");
}

// Options and failure modes

#[test]
fn test_protocol_members_decide_must_use() {
    let mut options = CheckerOptions::default();
    options.must_use_result.protocol_members = vec!["map".to_string(), "flatten".to_string()];
    assert!(check_with("getResult()\n", &libs(), &options).is_empty());
}

#[test]
fn test_custom_terminal_method() {
    let source = "getResult().isOk()\n";
    assert_eq!(check(source).len(), 1);

    let mut options = CheckerOptions::default();
    options.must_use_result.terminal_methods.push("isOk".to_string());
    assert!(check_with(source, &libs(), &options).is_empty());
}

#[test]
fn test_types_unavailable() {
    let options = CheckerOptions {
        type_information: false,
        ..CheckerOptions::default()
    };
    let result = check_source_text("test.ts", "getResult()\n", &libs(), &options);
    assert!(matches!(result, Err(CheckError::TypesUnavailable)));
}

#[test]
fn test_findings_are_deterministic() {
    let source = "getResult()\nconst a = getResult();\na.map(() => {});\nfunction f() {\n    obj.get();\n}\nawait getResultAsync();\n";
    let libs = libs();
    let first = check_with(source, &libs, &CheckerOptions::default());
    let second = check_with(source, &libs, &CheckerOptions::default());
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    let starts: Vec<u32> = first.iter().map(|finding| finding.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}
