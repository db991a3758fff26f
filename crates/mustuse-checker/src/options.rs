//! Checker and rule options.
//!
//! Both structs deserialize from the `mustuse.json` project file with
//! camelCase keys; every field has a default, so a partial `rules` block is
//! valid.

use serde::{Deserialize, Serialize};

fn default_protocol_members() -> Vec<String> {
    ["mapErr", "map", "andThen", "orElse", "match", "unwrapOr"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_terminal_methods() -> Vec<String> {
    ["match", "unwrapOr", "_unsafeUnwrap", "unwrap", "isErr"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_field_accessors() -> Vec<String> {
    vec!["value".to_string()]
}

fn default_discriminant_methods() -> Vec<String> {
    vec!["isOk".to_string(), "isErr".to_string()]
}

fn default_guarded_fields() -> Vec<String> {
    vec!["value".to_string(), "error".to_string()]
}

/// Options of the `must-use-result` rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MustUseResultOptions {
    /// A type is must-use when one of its union parts has every one of
    /// these members.
    pub protocol_members: Vec<String>,
    /// Invoking one of these on a result handles it.
    pub terminal_methods: Vec<String>,
    /// Invoking one of these passes the handling question on to the
    /// returned value.
    pub chain_methods: Vec<String>,
    /// Reading one of these fields counts as handling.
    pub field_accessors: Vec<String>,
    /// Methods that tell the variants apart (`isErr()`).
    pub discriminant_methods: Vec<String>,
    /// Fields that count as handling when read from a variable inside a
    /// branch guarded by a discriminant call on that same variable:
    /// `if (r.isErr()) { r.error }`.
    pub guarded_fields: Vec<String>,
}

impl Default for MustUseResultOptions {
    fn default() -> Self {
        MustUseResultOptions {
            protocol_members: default_protocol_members(),
            terminal_methods: default_terminal_methods(),
            chain_methods: default_protocol_members(),
            field_accessors: default_field_accessors(),
            discriminant_methods: default_discriminant_methods(),
            guarded_fields: default_guarded_fields(),
        }
    }
}

impl MustUseResultOptions {
    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminal_methods.iter().any(|method| method == name)
    }

    pub fn is_chain(&self, name: &str) -> bool {
        self.chain_methods.iter().any(|method| method == name)
    }

    pub fn is_field_accessor(&self, name: &str) -> bool {
        self.field_accessors.iter().any(|field| field == name)
    }

    pub fn is_discriminant(&self, name: &str) -> bool {
        self.discriminant_methods.iter().any(|method| method == name)
    }

    pub fn is_guarded_field(&self, name: &str) -> bool {
        self.guarded_fields.iter().any(|field| field == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckerOptions {
    /// Without type information the must-use rule cannot run.
    pub type_information: bool,
    pub must_use_result: MustUseResultOptions,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            type_information: true,
            must_use_result: MustUseResultOptions::default(),
        }
    }
}
