//! Tracing setup for the mustuse binary.
//!
//! `MUSTUSE_LOG` (or `RUST_LOG`) turns logging on and filters it, with the
//! usual `RUST_LOG` syntax. `MUSTUSE_LOG_FORMAT` picks the output:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! MUSTUSE_LOG=debug MUSTUSE_LOG_FORMAT=tree mustuse src/
//! MUSTUSE_LOG="mustuse_checker=trace" mustuse src/index.ts
//! ```
//!
//! Without either variable no subscriber is installed.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => LogFormat::Tree,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> Self {
        LogFormat::parse(&std::env::var("MUSTUSE_LOG_FORMAT").unwrap_or_default())
    }
}

/// `MUSTUSE_LOG` wins over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("MUSTUSE_LOG") {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber. Output goes to stderr so stdout stays
/// reserved for diagnostics.
pub fn init_tracing() {
    if std::env::var_os("MUSTUSE_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
