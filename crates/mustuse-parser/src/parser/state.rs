//! Parser state: token cursor, diagnostics and the source-file entry point.
//!
//! The grammar rules live in `state_statements`, `state_expressions` and
//! `state_types`; this module owns the plumbing they share.

use super::base::{NodeIndex, NodeList};
use super::node::{NodeArena, NodeData, SourceFileData};
use super::syntax_kind_ext;
use mustuse_common::diagnostics::{DiagnosticMessage, diagnostic_messages};
use mustuse_common::limits::MAX_PARSER_RECURSION_DEPTH;
use mustuse_common::Diagnostic;
use mustuse_scanner::{SyntaxKind, Token, scan_source};
use tracing::{debug, trace};

/// Recursive-descent parser over a pre-scanned token vector.
pub struct ParserState {
    pub(crate) file_name: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) token_index: usize,
    pub(crate) arena: NodeArena,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// End of the last consumed token; becomes the `end` of finished nodes.
    pub(crate) last_token_end: u32,
    pub(crate) recursion_depth: u32,
    /// Set while parsing a `for` head, where `in` ends the initializer.
    pub(crate) disallow_in: bool,
    /// Position of the last reported error, to avoid cascades at one spot.
    last_error_pos: Option<u32>,
}

/// Snapshot taken before a speculative parse.
pub(crate) struct ParserCheckpoint {
    token_index: usize,
    last_token_end: u32,
    diagnostics_len: usize,
    node_len: usize,
    data_len: usize,
    last_error_pos: Option<u32>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let scanned = scan_source(&source_text);
        let mut diagnostics = Vec::with_capacity(scanned.diagnostics.len());
        for diag in &scanned.diagnostics {
            diagnostics.push(Diagnostic::from_message(
                file_name.clone(),
                diag.pos,
                diag.length,
                &diag.message,
                &[],
            ));
        }
        let estimated_nodes = scanned.tokens.len();
        ParserState {
            file_name,
            tokens: scanned.tokens,
            token_index: 0,
            arena: NodeArena::with_capacity(estimated_nodes),
            diagnostics,
            last_token_end: 0,
            recursion_depth: 0,
            disallow_in: false,
            last_error_pos: None,
        }
    }

    /// Parse the whole file and return the `SOURCE_FILE` root.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        debug!(file = %self.file_name, tokens = self.tokens.len(), "parse_source_file");
        let statements = self.parse_statement_list(|kind| kind == SyntaxKind::EndOfFileToken);
        let end = self.token().end;
        self.diagnostics.sort_by_key(|diag| diag.start);
        self.arena.add_node(
            syntax_kind_ext::SOURCE_FILE,
            0,
            end,
            NodeData::SourceFile(SourceFileData {
                file_name: self.file_name.clone(),
                statements: NodeList::new(statements),
            }),
        )
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> &Token {
        // The scanner always terminates the vector with an EOF token.
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.token_index.min(last)]
    }

    #[inline]
    pub(crate) fn token_kind(&self) -> SyntaxKind {
        self.token().kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.token().pos
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.token_kind() == kind
    }

    /// Kind of the token `offset` positions ahead of the current one.
    pub(crate) fn peek_kind(&self, offset: usize) -> SyntaxKind {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[(self.token_index + offset).min(last)].kind
    }

    pub(crate) fn peek_has_line_break(&self, offset: usize) -> bool {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[(self.token_index + offset).min(last)].has_preceding_line_break
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.token().has_preceding_line_break
    }

    /// Consume the current token (never moves past EOF).
    pub(crate) fn next_token(&mut self) {
        if self.token_kind() != SyntaxKind::EndOfFileToken {
            self.last_token_end = self.token().end;
            self.token_index += 1;
        }
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report "'x' expected." without consuming.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.parse_error_at_current_token(&diagnostic_messages::EXPECTED_TOKEN, &[kind.text()]);
        false
    }

    /// `>` closing a type argument list.
    pub(crate) fn parse_expected_greater_than(&mut self) -> bool {
        self.parse_expected(SyntaxKind::GreaterThanToken)
    }

    /// Automatic semicolon insertion: `;`, `}`, EOF, or a line break.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token_kind(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken) || self.can_parse_semicolon() {
            return;
        }
        self.parse_error_at_current_token(
            &diagnostic_messages::EXPECTED_TOKEN,
            &[SyntaxKind::SemicolonToken.text()],
        );
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at_current_token(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        let token = self.token();
        let (pos, len) = (token.pos, token.end.saturating_sub(token.pos));
        self.parse_error_at(pos, len, message, args);
    }

    pub(crate) fn parse_error_at(
        &mut self,
        pos: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) {
        if self.last_error_pos == Some(pos) {
            return;
        }
        self.last_error_pos = Some(pos);
        trace!(pos, message = message.message, "parse error");
        self.diagnostics.push(Diagnostic::from_message(
            self.file_name.clone(),
            pos,
            length,
            message,
            args,
        ));
    }

    // =========================================================================
    // Speculation and recursion guards
    // =========================================================================

    pub(crate) fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            token_index: self.token_index,
            last_token_end: self.last_token_end,
            diagnostics_len: self.diagnostics.len(),
            node_len: self.arena.nodes.len(),
            data_len: self.arena.data.len(),
            last_error_pos: self.last_error_pos,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: ParserCheckpoint) {
        self.token_index = checkpoint.token_index;
        self.last_token_end = checkpoint.last_token_end;
        self.diagnostics.truncate(checkpoint.diagnostics_len);
        self.arena
            .truncate(checkpoint.node_len, checkpoint.data_len);
        self.last_error_pos = checkpoint.last_error_pos;
    }

    /// Run `rule`; if it reports any diagnostic, undo everything it did.
    pub(crate) fn try_parse<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.checkpoint();
        let diagnostics_before = self.diagnostics.len();
        match rule(self) {
            Some(value) if self.diagnostics.len() == diagnostics_before => Some(value),
            _ => {
                self.rewind(checkpoint);
                None
            }
        }
    }

    /// Enter a recursive rule. Returns false (after reporting) when the
    /// nesting limit is hit; the caller must then bail out.
    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
            self.parse_error_at_current_token(&diagnostic_messages::EXPRESSION_EXPECTED, &[]);
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    // =========================================================================
    // Shared leaf rules
    // =========================================================================

    /// Identifier (contextual keywords allowed) or report and return `NONE`.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.token_kind().is_identifier_or_contextual_keyword() {
            return self.parse_identifier_name();
        }
        self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
        NodeIndex::NONE
    }

    /// Any word, reserved keywords included (after `.`, property keys).
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        let token = self.token();
        if !token.kind.is_identifier_or_keyword() {
            self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            return NodeIndex::NONE;
        }
        let (pos, end, text) = (token.pos, token.end, token.value.clone());
        self.next_token();
        self.arena
            .add_identifier(SyntaxKind::Identifier as u16, pos, end, text)
    }

    /// Literal token as a node of the token's own kind.
    pub(crate) fn parse_literal_node(&mut self) -> NodeIndex {
        let token = self.token();
        let (kind, pos, end, text) = (token.kind, token.pos, token.end, token.value.clone());
        self.next_token();
        self.arena.add_literal(kind as u16, pos, end, text)
    }

    /// Keyword used as a value or type (`this`, `null`, `true`, ...).
    pub(crate) fn parse_keyword_token(&mut self) -> NodeIndex {
        let token = self.token();
        let (kind, pos, end) = (token.kind, token.pos, token.end);
        self.next_token();
        self.arena.add_token(kind as u16, pos, end)
    }

    /// Comma-separated list between `open` and `close`.
    pub(crate) fn parse_delimited_list(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
        mut element: impl FnMut(&mut Self) -> NodeIndex,
    ) -> NodeList {
        let mut nodes = Vec::new();
        if !self.parse_expected(open) {
            return NodeList::new(nodes);
        }
        while !self.is_token(close) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_index;
            let node = element(self);
            if node.is_some() {
                nodes.push(node);
            }
            if self.parse_optional(SyntaxKind::CommaToken) {
                continue;
            }
            if !self.is_token(close) {
                self.parse_expected(SyntaxKind::CommaToken);
                if self.token_index == before {
                    self.next_token();
                }
                if self.is_list_terminator() {
                    break;
                }
            }
        }
        self.parse_expected(close);
        NodeList::new(nodes)
    }

    fn is_list_terminator(&self) -> bool {
        matches!(
            self.token_kind(),
            SyntaxKind::SemicolonToken | SyntaxKind::EndOfFileToken
        )
    }
}
