use clap::Parser;
use std::path::{Path, PathBuf};

use mustuse_checker::CheckError;
use mustuse_common::diagnostic_codes;

use super::args::CliArgs;
use super::driver::{check, list_files, load_project};

const RESULT_LIB: &str = include_str!("../../tests/fixtures/result.d.ts");

fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["mustuse"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("test args should parse")
}

/// A project with the result lib configured and two source files.
fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "types/result.d.ts", RESULT_LIB);
    write_file(
        root,
        "mustuse.json",
        r#"{
          // shared declarations
          "lib": ["types/result.d.ts"],
          "include": ["src/**/*"],
        }"#,
    );
    write_file(root, "src/clean.ts", "getResult().unwrapOr('');\ngetNormal();\n");
    write_file(
        root,
        "src/dirty.ts",
        "getResult();\nconst r = getResult();\nr.map(x => x);\n",
    );
    dir
}

#[test]
fn check_reports_findings_by_file_and_position() {
    let dir = project();
    let run = check(&args(&[]), dir.path()).expect("check should run");

    assert_eq!(run.files_checked.len(), 2);
    assert_eq!(run.diagnostics.len(), 3);
    assert!(run.has_errors());
    assert!(run
        .diagnostics
        .iter()
        .all(|diagnostic| diagnostic.code == diagnostic_codes::MUST_USE_RESULT
            && diagnostic.file.ends_with("dirty.ts")));
    let starts: Vec<u32> = run.diagnostics.iter().map(|diagnostic| diagnostic.start).collect();
    assert_eq!(starts, vec![0, 23, 36]);
    assert_eq!(run.diagnostics[1].related_information.len(), 1);
    assert!(run.sources.keys().any(|name| name.ends_with("result.d.ts")));
}

#[test]
fn explicit_file_arguments() {
    let dir = project();
    let run = check(&args(&["src/clean.ts"]), dir.path()).unwrap();
    assert_eq!(run.files_checked.len(), 1);
    assert!(!run.has_errors());
}

#[test]
fn lib_flag_adds_declarations() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(root, "decl/result.d.ts", RESULT_LIB);
    write_file(root, "main.ts", "getResult();\n");

    let without = check(&args(&[]), root).unwrap();
    assert!(without.diagnostics.is_empty());

    let with = check(&args(&["--lib", "decl/result.d.ts"]), root).unwrap();
    assert_eq!(with.diagnostics.len(), 1);
}

#[test]
fn parse_errors_are_diagnostics() {
    let dir = project();
    write_file(dir.path(), "src/broken.ts", "const = ;\n");
    let run = check(&args(&[]), dir.path()).unwrap();
    assert!(run
        .diagnostics
        .iter()
        .any(|diagnostic| diagnostic.file.ends_with("broken.ts")
            && diagnostic.code != diagnostic_codes::MUST_USE_RESULT));
}

#[test]
fn no_types_is_fatal() {
    let dir = project();
    let err = check(&args(&["--no-types"]), dir.path()).expect_err("types are required");
    assert_eq!(err.downcast_ref::<CheckError>(), Some(&CheckError::TypesUnavailable));
}

#[test]
fn no_types_is_fatal_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = check(&args(&["--no-types"]), dir.path()).expect_err("types are required");
    assert_eq!(err.downcast_ref::<CheckError>(), Some(&CheckError::TypesUnavailable));
}

#[test]
fn missing_lib_is_fatal() {
    let dir = project();
    let err = check(&args(&["--lib", "nope.d.ts"]), dir.path()).expect_err("lib must exist");
    assert!(format!("{err:#}").contains("failed to read lib file"));
}

#[test]
fn project_flag_points_at_config() {
    let dir = project();
    let nested = dir.path().join("nested");
    std::fs::create_dir_all(&nested).unwrap();

    let config = load_project(&args(&["-p", ".."]), &nested).unwrap();
    assert_eq!(config.base_dir, nested.join(".."));
    assert_eq!(config.lib_files.len(), 1);

    let defaults = load_project(&args(&[]), &nested).unwrap();
    assert!(defaults.lib_files.is_empty());
}

#[test]
fn list_files_uses_include_patterns() {
    let dir = project();
    write_file(dir.path(), "scripts/tool.ts", "getResult();\n");
    let files = list_files(&args(&[]), dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|file| file.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["clean.ts", "dirty.ts"]);
}
