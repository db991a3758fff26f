//! Source file discovery.

use anyhow::Result;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::config::ConfigError;

const CHECKED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

#[derive(Debug, Clone, Default)]
pub struct FileDiscoveryOptions {
    pub base_dir: PathBuf,
    /// Explicit files and directories. When empty, `base_dir` is walked.
    pub files: Vec<PathBuf>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Whether `path` is a source file the checker looks at. Declaration
/// files only provide types and are loaded as libs instead.
pub fn is_checked_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    if [".d.ts", ".d.mts", ".d.cts"].iter().any(|suffix| name.ends_with(suffix)) {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CHECKED_EXTENSIONS.contains(&ext))
}

pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern.trim_start_matches("./"))
            .literal_separator(true)
            .build()
            .map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Checked files, sorted and deduplicated.
///
/// Explicit file arguments are always kept; directories (explicit or the
/// base directory) are walked and filtered by the include and exclude
/// patterns, relative to the walked directory.
pub fn discover_ts_files(options: &FileDiscoveryOptions) -> Result<Vec<PathBuf>> {
    let include = build_glob_set(&options.include)?;
    let exclude = build_glob_set(&options.exclude)?;

    let mut files = Vec::new();
    if options.files.is_empty() {
        walk_dir(&options.base_dir, &include, &exclude, &mut files);
    } else {
        for path in &options.files {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                options.base_dir.join(path)
            };
            if path.is_dir() {
                walk_dir(&path, &include, &exclude, &mut files);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "discovered files");
    Ok(files)
}

fn walk_dir(root: &Path, include: &GlobSet, exclude: &GlobSet, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !exclude.is_match(entry.path().strip_prefix(root).unwrap_or(entry.path()))
        });
    for entry in walker.filter_map(|entry| entry.ok()) {
        if !entry.file_type().is_file() || !is_checked_file(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if include.is_match(relative) && !exclude.is_match(relative) {
            files.push(entry.path().to_path_buf());
        } else {
            trace!(path = %relative.display(), "skipped by patterns");
        }
    }
}
