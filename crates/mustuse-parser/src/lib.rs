//! TypeScript parser and AST for the mustuse checker.
//!
//! The AST lives in a `NodeArena`: nodes are addressed by `NodeIndex`, carry
//! their kind as a `u16` (token kinds from `SyntaxKind`, node kinds from
//! `syntax_kind_ext`), and know their parent.

pub mod parser;

pub use parser::{NodeArena, NodeIndex, NodeList, ParserState};
