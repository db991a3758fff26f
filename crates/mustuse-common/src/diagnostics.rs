//! Diagnostic types and message lookup.
//!
//! Every diagnostic carries a stable string code. The rule's finding uses
//! `must-use-result`; front-end problems use `parse-error` and friends.

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl DiagnosticCategory {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        }
    }
}

/// Related information for a diagnostic (e.g., "not handled here" locations).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
}

/// A diagnostic message with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: &'static str,
    /// Related information spans (e.g., the read that left a result unhandled)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create a diagnostic from a message table entry.
    #[must_use]
    pub fn from_message(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            message_text: format_message(message.message, args),
            category: message.category,
            code: message.code,
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Message,
        });
        self
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: &'static str,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const MUST_USE_RESULT: &str = "must-use-result";
    pub const PARSE_ERROR: &str = "parse-error";
    pub const INVALID_CHARACTER: &str = "invalid-character";
    pub const UNTERMINATED_LITERAL: &str = "unterminated-literal";
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const MUST_USE_RESULT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::MUST_USE_RESULT,
        category: DiagnosticCategory::Error,
        message: "Result must be handled with either of `match`, `unwrapOr` or `unwrap`.",
    };

    pub const RESULT_LEFT_UNHANDLED_HERE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::MUST_USE_RESULT,
        category: DiagnosticCategory::Message,
        message: "The result stored in '{0}' is not handled here.",
    };

    pub const EXPECTED_TOKEN: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PARSE_ERROR,
        category: DiagnosticCategory::Error,
        message: "'{0}' expected.",
    };

    pub const EXPRESSION_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PARSE_ERROR,
        category: DiagnosticCategory::Error,
        message: "Expression expected.",
    };

    pub const TYPE_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PARSE_ERROR,
        category: DiagnosticCategory::Error,
        message: "Type expected.",
    };

    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PARSE_ERROR,
        category: DiagnosticCategory::Error,
        message: "Identifier expected.",
    };

    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::PARSE_ERROR,
        category: DiagnosticCategory::Error,
        message: "Declaration or statement expected.",
    };

    pub const INVALID_CHARACTER: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INVALID_CHARACTER,
        category: DiagnosticCategory::Error,
        message: "Invalid character.",
    };

    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNTERMINATED_LITERAL,
        category: DiagnosticCategory::Error,
        message: "Unterminated string literal.",
    };

    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNTERMINATED_LITERAL,
        category: DiagnosticCategory::Error,
        message: "Unterminated template literal.",
    };

    pub const UNTERMINATED_COMMENT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNTERMINATED_LITERAL,
        category: DiagnosticCategory::Error,
        message: "'*/' expected.",
    };
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
