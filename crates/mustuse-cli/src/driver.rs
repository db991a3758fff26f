//! One run of the checker over a project.
//!
//! Lib files are parsed once and shared behind `Arc`; checked files are
//! independent and run in parallel. Every fatal problem (unreadable input,
//! bad config, no type information) is an error; findings are not.

use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, info_span};

use mustuse_checker::{CheckError, CheckerOptions, LibFile, check_source_text};
use mustuse_common::Diagnostic;

use crate::args::CliArgs;
use crate::config::{ResolvedConfig, config_path_for, load_config, resolve_config};
use crate::fs::{FileDiscoveryOptions, discover_ts_files};

#[derive(Debug, Clone)]
pub struct CheckRun {
    /// Parse diagnostics and findings, by file then position.
    pub diagnostics: Vec<Diagnostic>,
    pub files_checked: Vec<PathBuf>,
    /// Text of every checked and lib file, keyed by diagnostic file name.
    pub sources: FxHashMap<String, String>,
}

impl CheckRun {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// The project config in effect: `--project`, else `mustuse.json` in
/// `cwd` if present, else defaults rooted at `cwd`.
pub fn load_project(args: &CliArgs, cwd: &Path) -> Result<ResolvedConfig> {
    let explicit = args.project.as_ref().map(|project| config_path_for(&cwd.join(project)));
    let path = explicit.or_else(|| {
        let implicit = cwd.join(crate::config::CONFIG_FILE_NAME);
        implicit.is_file().then_some(implicit)
    });
    let Some(path) = path else {
        return Ok(ResolvedConfig::default_for(cwd));
    };

    let config = load_config(&path)?;
    let base_dir = path.parent().unwrap_or(cwd);
    debug!(config = %path.display(), "loaded project config");
    Ok(resolve_config(&config, base_dir))
}

/// Files the run would check, without checking them.
pub fn list_files(args: &CliArgs, cwd: &Path) -> Result<Vec<PathBuf>> {
    let config = load_project(args, cwd)?;
    discover(args, cwd, &config)
}

fn discover(args: &CliArgs, cwd: &Path, config: &ResolvedConfig) -> Result<Vec<PathBuf>> {
    let options = if args.files.is_empty() {
        FileDiscoveryOptions {
            base_dir: config.base_dir.clone(),
            files: Vec::new(),
            include: config.include.clone(),
            exclude: config.exclude.clone(),
        }
    } else {
        // Explicit paths are relative to the working directory.
        FileDiscoveryOptions {
            base_dir: cwd.to_path_buf(),
            files: args.files.clone(),
            include: vec!["**/*".to_string()],
            exclude: config.exclude.clone(),
        }
    };
    discover_ts_files(&options)
}

pub fn check(args: &CliArgs, cwd: &Path) -> Result<CheckRun> {
    let config = load_project(args, cwd)?;
    let mut options = config.checker.clone();
    if args.no_types {
        options.type_information = false;
    }
    // Fatal even when no file would be checked.
    if !options.type_information {
        return Err(CheckError::TypesUnavailable.into());
    }

    let lib_paths: Vec<PathBuf> = config
        .lib_files
        .iter()
        .cloned()
        .chain(args.lib.iter().map(|lib| cwd.join(lib)))
        .collect();
    let files = discover(args, cwd, &config)?;
    check_files(&files, &lib_paths, &options)
}

/// Check `files` against the declaration files `lib_paths`.
pub fn check_files(files: &[PathBuf], lib_paths: &[PathBuf], options: &CheckerOptions) -> Result<CheckRun> {
    let span = info_span!("check", files = files.len(), libs = lib_paths.len());
    let _enter = span.enter();

    let mut sources = FxHashMap::default();
    let mut diagnostics = Vec::new();

    let mut libs = Vec::with_capacity(lib_paths.len());
    for path in lib_paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lib file: {}", path.display()))?;
        let name = display_name(path);
        let lib = LibFile::parse(name.clone(), text.clone());
        diagnostics.extend(lib.diagnostics.iter().cloned());
        sources.insert(name, text);
        libs.push(Arc::new(lib));
    }

    let inputs = files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read file: {}", path.display()))
                .map(|text| (display_name(path), text))
        })
        .collect::<Result<Vec<_>>>()?;

    let per_file = inputs
        .par_iter()
        .map(|(name, text)| {
            check_source_text(name, text, &libs, options).map(|result| result.diagnostics)
        })
        .collect::<Result<Vec<_>, _>>()?;

    for ((name, text), file_diagnostics) in inputs.into_iter().zip(per_file) {
        diagnostics.extend(file_diagnostics);
        sources.insert(name, text);
    }
    diagnostics.sort_by(|left, right| {
        left.file
            .cmp(&right.file)
            .then(left.start.cmp(&right.start))
            .then(left.code.cmp(right.code))
    });

    info!(diagnostics = diagnostics.len(), "check finished");
    Ok(CheckRun {
        diagnostics,
        files_checked: files.to_vec(),
        sources,
    })
}

/// Name a file is reported under.
fn display_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
