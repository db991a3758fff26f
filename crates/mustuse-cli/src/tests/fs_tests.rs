use std::path::{Path, PathBuf};

use super::config::ConfigError;
use super::fs::{FileDiscoveryOptions, build_glob_set, discover_ts_files, is_checked_file};

fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, "export {};\n").unwrap();
    path
}

fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|file| {
            file.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn options(root: &Path, include: &[&str], exclude: &[&str]) -> FileDiscoveryOptions {
    FileDiscoveryOptions {
        base_dir: root.to_path_buf(),
        files: Vec::new(),
        include: include.iter().map(|s| s.to_string()).collect(),
        exclude: exclude.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn checked_file_extensions() {
    assert!(is_checked_file(Path::new("src/a.ts")));
    assert!(is_checked_file(Path::new("src/a.tsx")));
    assert!(is_checked_file(Path::new("src/a.mts")));
    assert!(is_checked_file(Path::new("src/a.cts")));
    assert!(!is_checked_file(Path::new("src/a.d.ts")));
    assert!(!is_checked_file(Path::new("src/a.js")));
    assert!(!is_checked_file(Path::new("src/ts")));
}

#[test]
fn walks_base_dir_with_patterns() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "src/b.ts");
    touch(root, "src/a.ts");
    touch(root, "src/nested/c.tsx");
    touch(root, "src/types.d.ts");
    touch(root, "node_modules/pkg/index.ts");
    touch(root, "scripts/build.ts");
    touch(root, "README.md");

    let files = discover_ts_files(&options(root, &["src/**/*"], &["**/node_modules/**"])).unwrap();
    assert_eq!(names(root, &files), vec!["src/a.ts", "src/b.ts", "src/nested/c.tsx"]);

    let files = discover_ts_files(&options(root, &["**/*"], &["**/node_modules/**", "scripts/**"])).unwrap();
    assert_eq!(names(root, &files), vec!["src/a.ts", "src/b.ts", "src/nested/c.tsx"]);
}

#[test]
fn explicit_files_and_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "src/a.ts");
    touch(root, "src/node_modules/x.ts");
    touch(root, "other/z.ts");
    let single = touch(root, "single.ts");

    let mut discovery = options(root, &["**/*"], &["**/node_modules/**"]);
    discovery.files = vec![PathBuf::from("src"), single.clone(), single];
    let files = discover_ts_files(&discovery).unwrap();
    assert_eq!(names(root, &files), vec!["single.ts", "src/a.ts"]);
}

#[test]
fn invalid_glob_is_a_config_error() {
    let err = build_glob_set(&["src/[".to_string()]).expect_err("unclosed class");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidGlob { pattern, .. }) if pattern == "src/["
    ));
}
