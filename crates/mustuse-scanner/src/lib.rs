//! Scanner for the TypeScript subset understood by mustuse.
//!
//! - `SyntaxKind`: token and keyword kinds (node kinds live in the parser's
//!   `syntax_kind_ext`, numbered after the last token kind)
//! - `Scanner`: turns source text into a token vector

pub mod scanner;
pub mod syntax_kind;

pub use scanner::{ScanResult, Scanner, ScannerDiagnostic, Token, scan_source};
pub use syntax_kind::SyntaxKind;

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
