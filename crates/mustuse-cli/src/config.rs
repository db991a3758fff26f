//! `mustuse.json` loading.
//!
//! The project file is JSONC: comments and trailing commas are stripped
//! before `serde_json` sees it. A config may `extends` another one; child
//! values win field by field.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use mustuse_checker::{CheckerOptions, MustUseResultOptions};

/// Name of the project file looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "mustuse.json";

pub const DEFAULT_EXCLUDE: &[&str] = &["**/node_modules/**"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config extends cycle detected at {}", .0.display())]
    ExtendsCycle(PathBuf),

    #[error("config file has no parent directory: {}", .0.display())]
    NoParentDirectory(PathBuf),

    #[error("invalid glob pattern '{pattern}'")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Accepts `true` as well as `"true"` for boolean options.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub lib: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub type_information: Option<bool>,
    #[serde(default)]
    pub rules: Option<RulesConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    #[serde(default)]
    pub must_use_result: Option<MustUseResultConfig>,
}

/// Rule lists as written; a missing list keeps the built-in default.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MustUseResultConfig {
    #[serde(default)]
    pub protocol_members: Option<Vec<String>>,
    #[serde(default)]
    pub terminal_methods: Option<Vec<String>>,
    #[serde(default)]
    pub chain_methods: Option<Vec<String>>,
    #[serde(default)]
    pub field_accessors: Option<Vec<String>>,
    #[serde(default)]
    pub discriminant_methods: Option<Vec<String>>,
    #[serde(default)]
    pub guarded_fields: Option<Vec<String>>,
}

/// Config with every path made absolute and every default filled in.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory include/exclude patterns are relative to.
    pub base_dir: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub lib_files: Vec<PathBuf>,
    pub checker: CheckerOptions,
}

impl ResolvedConfig {
    /// Defaults for a directory without a project file.
    pub fn default_for(base_dir: &Path) -> Self {
        resolve_config(&ProjectConfig::default(), base_dir)
    }
}

pub fn resolve_config(config: &ProjectConfig, base_dir: &Path) -> ResolvedConfig {
    let mut checker = CheckerOptions::default();
    if let Some(type_information) = config.type_information {
        checker.type_information = type_information;
    }
    if let Some(rule) = config
        .rules
        .as_ref()
        .and_then(|rules| rules.must_use_result.as_ref())
    {
        apply_rule_config(&mut checker.must_use_result, rule);
    }

    ResolvedConfig {
        base_dir: base_dir.to_path_buf(),
        include: config
            .include
            .clone()
            .unwrap_or_else(|| vec!["**/*".to_string()]),
        exclude: config
            .exclude
            .clone()
            .unwrap_or_else(|| DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect()),
        lib_files: config
            .lib
            .iter()
            .flatten()
            .map(|lib| base_dir.join(lib))
            .collect(),
        checker,
    }
}

fn apply_rule_config(options: &mut MustUseResultOptions, rule: &MustUseResultConfig) {
    if let Some(members) = &rule.protocol_members {
        options.protocol_members = members.clone();
    }
    if let Some(methods) = &rule.terminal_methods {
        options.terminal_methods = methods.clone();
    }
    if let Some(methods) = &rule.chain_methods {
        options.chain_methods = methods.clone();
    }
    if let Some(fields) = &rule.field_accessors {
        options.field_accessors = fields.clone();
    }
    if let Some(methods) = &rule.discriminant_methods {
        options.discriminant_methods = methods.clone();
    }
    if let Some(fields) = &rule.guarded_fields {
        options.guarded_fields = fields.clone();
    }
}

/// `path` itself, or `path/mustuse.json` when `path` is a directory.
pub fn config_path_for(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

pub fn parse_config(source: &str) -> Result<ProjectConfig> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let config = serde_json::from_str(&normalized).context("failed to parse mustuse.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let mut visited = HashSet::new();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<ProjectConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        return Err(ConfigError::ExtendsCycle(canonical).into());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_config_inner(&base_path, visited)?;
        config = merge_configs(base, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| ConfigError::NoParentDirectory(current_path.to_path_buf()))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

fn merge_configs(base: ProjectConfig, child: ProjectConfig) -> ProjectConfig {
    let base_rule = base.rules.and_then(|rules| rules.must_use_result);
    let child_rule = child.rules.and_then(|rules| rules.must_use_result);
    let must_use_result = match (base_rule, child_rule) {
        (Some(base), Some(child)) => Some(MustUseResultConfig {
            protocol_members: child.protocol_members.or(base.protocol_members),
            terminal_methods: child.terminal_methods.or(base.terminal_methods),
            chain_methods: child.chain_methods.or(base.chain_methods),
            field_accessors: child.field_accessors.or(base.field_accessors),
            discriminant_methods: child.discriminant_methods.or(base.discriminant_methods),
            guarded_fields: child.guarded_fields.or(base.guarded_fields),
        }),
        (base, child) => child.or(base),
    };

    ProjectConfig {
        extends: None,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
        lib: child.lib.or(base.lib),
        type_information: child.type_information.or(base.type_information),
        rules: must_use_result.map(|rule| RulesConfig {
            must_use_result: Some(rule),
        }),
    }
}

/// Where `strip_jsonc` is inside the input.
#[derive(Clone, Copy, PartialEq, Eq)]
enum JsoncState {
    Code,
    String { escaped: bool },
    LineComment,
    BlockComment,
}

/// Drops `//` and `/* */` comments outside strings. Newlines inside
/// comments are kept so serde error positions still match the file.
fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut state = JsoncState::Code;

    while let Some(ch) = chars.next() {
        state = match state {
            JsoncState::LineComment if ch == '\n' => {
                out.push(ch);
                JsoncState::Code
            }
            JsoncState::LineComment => JsoncState::LineComment,
            JsoncState::BlockComment if ch == '*' && chars.peek() == Some(&'/') => {
                chars.next();
                JsoncState::Code
            }
            JsoncState::BlockComment => {
                if ch == '\n' {
                    out.push(ch);
                }
                JsoncState::BlockComment
            }
            JsoncState::String { escaped } => {
                out.push(ch);
                match ch {
                    _ if escaped => JsoncState::String { escaped: false },
                    '\\' => JsoncState::String { escaped: true },
                    '"' => JsoncState::Code,
                    _ => JsoncState::String { escaped: false },
                }
            }
            JsoncState::Code => match (ch, chars.peek().copied()) {
                ('/', Some('/')) => {
                    chars.next();
                    JsoncState::LineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    JsoncState::BlockComment
                }
                ('"', _) => {
                    out.push(ch);
                    JsoncState::String { escaped: false }
                }
                _ => {
                    out.push(ch);
                    JsoncState::Code
                }
            },
        };
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == ',' {
            let mut lookahead = chars.clone();
            while lookahead.peek().is_some_and(|next| next.is_whitespace()) {
                lookahead.next();
            }
            if lookahead.peek().is_some_and(|&next| next == '}' || next == ']') {
                continue;
            }
        }

        out.push(ch);
    }

    out
}
