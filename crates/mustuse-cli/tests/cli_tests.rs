//! End-to-end tests of the `mustuse` binary: exit codes and output.
use std::path::Path;
use std::process::{Command, Output};

const RESULT_LIB: &str = include_str!("fixtures/result.d.ts");

fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

fn project(source: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "types/result.d.ts", RESULT_LIB);
    write_file(
        dir.path(),
        "mustuse.json",
        r#"{ "lib": ["types/result.d.ts"], "include": ["src/**/*"] }"#,
    );
    write_file(dir.path(), "src/main.ts", source);
    dir
}

fn mustuse(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mustuse"))
        .args(args)
        .current_dir(cwd)
        .env_remove("MUSTUSE_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run mustuse")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn clean_project_exits_zero() {
    let dir = project("getResult().match(() => 1, () => 2);\n");
    let output = mustuse(dir.path(), &["--no-pretty"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn findings_exit_one_with_text_report() {
    let dir = project("getResult();\nconst r = getResult();\nfunction f() {\n    return r;\n}\n");
    let output = mustuse(dir.path(), &["--no-pretty"]);
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    assert!(text.contains("main.ts:1:1 - error must-use-result: Result must be handled"));
    assert!(text.contains("~~~~~~~~~~~"));
    assert!(text.contains("Found 1 error in 1 file."), "report: {text}");
}

#[test]
fn json_format() {
    let dir = project("getResult();\nconst r = getResult();\nr.map(x => x);\n");
    let output = mustuse(dir.path(), &["--format", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let findings = value.as_array().expect("diagnostics array");
    assert_eq!(findings.len(), 3);
    assert!(findings.iter().all(|finding| finding["code"] == "must-use-result"));
    assert_eq!(findings[1]["related_information"].as_array().map(Vec::len), Some(1));
}

#[test]
fn no_types_exits_two() {
    let dir = project("getResult();\n");
    let output = mustuse(dir.path(), &["--no-types"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Types not available"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn no_types_without_files_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = mustuse(dir.path(), &["--no-types"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Types not available"));

    write_file(dir.path(), "mustuse.json", r#"{ "typeInformation": false }"#);
    let output = mustuse(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn bad_config_exits_two() {
    let dir = project("getResult();\n");
    write_file(dir.path(), "mustuse.json", "{ \"include\": [ }");
    let output = mustuse(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse config"));
}

#[test]
fn list_files_only() {
    let dir = project("getResult();\n");
    write_file(dir.path(), "src/util/helpers.ts", "export {};\n");
    let output = mustuse(dir.path(), &["--listFilesOnly"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("main.ts"));
    assert!(lines[1].ends_with("helpers.ts"));
}
