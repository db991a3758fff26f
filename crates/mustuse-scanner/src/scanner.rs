//! Scanner - turns source text into tokens.
//!
//! The whole file is scanned up front; the parser then works over the token
//! vector, which keeps arbitrary lookahead (arrow function detection) cheap.

use crate::SyntaxKind;
use mustuse_common::DiagnosticMessage;
use mustuse_common::diagnostic_messages;

/// A scanned token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    /// Start byte offset (after leading trivia)
    pub pos: u32,
    /// End byte offset (exclusive)
    pub end: u32,
    /// Whether a line terminator appeared between the previous token and this one
    pub has_preceding_line_break: bool,
    /// Identifier text or cooked literal value; empty for punctuation
    pub value: String,
}

/// A lexical error with its location.
#[derive(Clone, Debug)]
pub struct ScannerDiagnostic {
    pub pos: u32,
    pub length: u32,
    pub message: DiagnosticMessage,
}

/// Result of scanning a whole file. The last token is always `EndOfFileToken`.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<ScannerDiagnostic>,
}

/// Scan `source` into tokens.
pub fn scan_source(source: &str) -> ScanResult {
    Scanner::new(source).scan_all()
}

pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line_break_before: bool,
    last_kind: SyntaxKind,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line_break_before: false,
            last_kind: SyntaxKind::Unknown,
            diagnostics: Vec::new(),
        }
    }

    pub fn scan_all(mut self) -> ScanResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan();
            let done = token.kind == SyntaxKind::EndOfFileToken;
            self.last_kind = token.kind;
            tokens.push(token);
            if done {
                break;
            }
        }
        ScanResult {
            tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn error(&mut self, pos: usize, length: usize, message: DiagnosticMessage) {
        self.diagnostics.push(ScannerDiagnostic {
            pos: pos as u32,
            length: length as u32,
            message,
        });
    }

    #[inline]
    fn peek(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn skip_trivia(&mut self) {
        self.line_break_before = false;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' | b'\r' => {
                    self.line_break_before = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | 0x0b | 0x0c => self.pos += 1,
                b'/' if self.peek(1) == b'/' => {
                    while self.pos < self.bytes.len() && !matches!(self.bytes[self.pos], b'\n' | b'\r')
                    {
                        self.pos += 1;
                    }
                }
                b'/' if self.peek(1) == b'*' => {
                    let start = self.pos;
                    self.pos += 2;
                    let mut closed = false;
                    while self.pos < self.bytes.len() {
                        if self.bytes[self.pos] == b'*' && self.peek(1) == b'/' {
                            self.pos += 2;
                            closed = true;
                            break;
                        }
                        if matches!(self.bytes[self.pos], b'\n' | b'\r') {
                            self.line_break_before = true;
                        }
                        self.pos += 1;
                    }
                    if !closed {
                        self.error(start, 2, diagnostic_messages::UNTERMINATED_COMMENT);
                    }
                }
                b if b >= 0x80 => {
                    let ch = self.current_char();
                    if ch == '\u{2028}' || ch == '\u{2029}' {
                        self.line_break_before = true;
                        self.pos += ch.len_utf8();
                    } else if ch.is_whitespace() || ch == '\u{feff}' {
                        self.pos += ch.len_utf8();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn current_char(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn make(&self, kind: SyntaxKind, start: usize, value: String) -> Token {
        Token {
            kind,
            pos: start as u32,
            end: self.pos as u32,
            has_preceding_line_break: self.line_break_before,
            value,
        }
    }

    fn scan(&mut self) -> Token {
        self.skip_trivia();
        let start = self.pos;
        if self.pos >= self.bytes.len() {
            return self.make(SyntaxKind::EndOfFileToken, start, String::new());
        }

        let ch = self.current_char();
        if is_identifier_start(ch) {
            return self.scan_identifier(start);
        }

        match self.bytes[self.pos] {
            b'0'..=b'9' => self.scan_number(start),
            b'.' if self.peek(1).is_ascii_digit() => self.scan_number(start),
            b'"' | b'\'' => self.scan_string(start),
            b'`' => self.scan_template(start),
            b'/' if !self.last_kind.ends_operand() => self.scan_regex(start),
            _ => {
                let (kind, len) = self.scan_punctuation();
                if kind == SyntaxKind::Unknown {
                    let len = ch.len_utf8();
                    self.error(start, len, diagnostic_messages::INVALID_CHARACTER);
                    self.pos += len;
                } else {
                    self.pos += len;
                }
                self.make(kind, start, String::new())
            }
        }
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        while self.pos < self.bytes.len() && is_identifier_part(self.current_char()) {
            self.pos += self.current_char().len_utf8();
        }
        let text = &self.source[start..self.pos];
        let kind = SyntaxKind::from_keyword_text(text).unwrap_or(SyntaxKind::Identifier);
        self.make(kind, start, text.to_string())
    }

    fn scan_number(&mut self, start: usize) -> Token {
        if self.bytes[self.pos] == b'0' && matches!(self.peek(1), b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
        {
            self.pos += 2;
            while self.peek(0).is_ascii_hexdigit() || self.peek(0) == b'_' {
                self.pos += 1;
            }
        } else {
            self.scan_digits();
            if self.peek(0) == b'.' {
                self.pos += 1;
                self.scan_digits();
            }
            if matches!(self.peek(0), b'e' | b'E') {
                let sign = usize::from(matches!(self.peek(1), b'+' | b'-'));
                if self.peek(1 + sign).is_ascii_digit() {
                    self.pos += 1 + sign;
                    self.scan_digits();
                }
            }
        }
        let kind = if self.peek(0) == b'n' {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        let text = self.source[start..self.pos].replace('_', "");
        self.make(kind, start, text)
    }

    fn scan_digits(&mut self) {
        while self.peek(0).is_ascii_digit() || self.peek(0) == b'_' {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, start: usize) -> Token {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        let mut value = String::new();
        loop {
            if self.pos >= self.bytes.len() || matches!(self.bytes[self.pos], b'\n' | b'\r') {
                self.error(
                    start,
                    self.pos - start,
                    diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                );
                break;
            }
            let byte = self.bytes[self.pos];
            if byte == quote {
                self.pos += 1;
                break;
            }
            if byte == b'\\' {
                self.pos += 1;
                if let Some(escaped) = self.scan_escape() {
                    value.push(escaped);
                }
                continue;
            }
            let ch = self.current_char();
            value.push(ch);
            self.pos += ch.len_utf8();
        }
        self.make(SyntaxKind::StringLiteral, start, value)
    }

    /// Cook one escape sequence; `self.pos` is just past the backslash.
    fn scan_escape(&mut self) -> Option<char> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let ch = self.current_char();
        self.pos += ch.len_utf8();
        let cooked = match ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            '\r' => {
                if self.peek(0) == b'\n' {
                    self.pos += 1;
                }
                return None;
            }
            '\n' => return None,
            'x' => return self.scan_hex_escape(2),
            'u' if self.peek(0) == b'{' => {
                self.pos += 1;
                let digits_start = self.pos;
                while self.peek(0).is_ascii_hexdigit() {
                    self.pos += 1;
                }
                let code = u32::from_str_radix(&self.source[digits_start..self.pos], 16).ok();
                if self.peek(0) == b'}' {
                    self.pos += 1;
                }
                return code.and_then(char::from_u32);
            }
            'u' => return self.scan_hex_escape(4),
            other => other,
        };
        Some(cooked)
    }

    fn scan_hex_escape(&mut self, count: usize) -> Option<char> {
        let end = (self.pos + count).min(self.bytes.len());
        let digits = self.source.get(self.pos..end)?;
        if digits.len() != count || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        self.pos = end;
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
    }

    /// Templates are scanned as a single token; substitutions are skipped by
    /// brace matching and their raw text kept in the token value.
    fn scan_template(&mut self, start: usize) -> Token {
        self.pos += 1;
        let mut has_substitution = false;
        let mut value = String::new();
        loop {
            if self.pos >= self.bytes.len() {
                self.error(
                    start,
                    self.pos - start,
                    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
                );
                break;
            }
            match self.bytes[self.pos] {
                b'`' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.scan_escape() {
                        value.push(escaped);
                    }
                }
                b'$' if self.peek(1) == b'{' => {
                    has_substitution = true;
                    self.pos += 2;
                    self.skip_substitution();
                }
                _ => {
                    let ch = self.current_char();
                    value.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
        let kind = if has_substitution {
            SyntaxKind::TemplateLiteral
        } else {
            SyntaxKind::NoSubstitutionTemplateLiteral
        };
        self.make(kind, start, value)
    }

    fn skip_substitution(&mut self) {
        let mut depth = 1u32;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                b'\'' | b'"' => {
                    let quote = self.bytes[self.pos];
                    self.pos += 1;
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != quote {
                        if self.bytes[self.pos] == b'\\' {
                            self.pos += 1;
                        }
                        self.pos += 1;
                    }
                }
                b'`' => {
                    let nested = self.pos;
                    self.scan_template(nested);
                    continue;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn scan_regex(&mut self, start: usize) -> Token {
        self.pos += 1;
        let mut in_class = false;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 1,
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => {
                    self.pos += 1;
                    break;
                }
                b'\n' | b'\r' => {
                    self.error(
                        start,
                        self.pos - start,
                        diagnostic_messages::UNTERMINATED_STRING_LITERAL,
                    );
                    break;
                }
                _ => {}
            }
            self.pos += 1;
        }
        while self.peek(0).is_ascii_alphabetic() {
            self.pos += 1;
        }
        let text = self.source[start..self.pos.min(self.bytes.len())].to_string();
        self.make(SyntaxKind::RegularExpressionLiteral, start, text)
    }

    /// Longest-match punctuation. Returns the kind and byte length.
    fn scan_punctuation(&self) -> (SyntaxKind, usize) {
        let (c0, c1, c2) = (self.peek(0), self.peek(1), self.peek(2));
        match c0 {
            b'{' => (SyntaxKind::OpenBraceToken, 1),
            b'}' => (SyntaxKind::CloseBraceToken, 1),
            b'(' => (SyntaxKind::OpenParenToken, 1),
            b')' => (SyntaxKind::CloseParenToken, 1),
            b'[' => (SyntaxKind::OpenBracketToken, 1),
            b']' => (SyntaxKind::CloseBracketToken, 1),
            b';' => (SyntaxKind::SemicolonToken, 1),
            b',' => (SyntaxKind::CommaToken, 1),
            b':' => (SyntaxKind::ColonToken, 1),
            b'~' => (SyntaxKind::TildeToken, 1),
            b'@' => (SyntaxKind::AtToken, 1),
            b'>' => (SyntaxKind::GreaterThanToken, 1),
            b'.' if c1 == b'.' && c2 == b'.' => (SyntaxKind::DotDotDotToken, 3),
            b'.' => (SyntaxKind::DotToken, 1),
            b'?' if c1 == b'?' && c2 == b'=' => (SyntaxKind::QuestionQuestionEqualsToken, 3),
            b'?' if c1 == b'?' => (SyntaxKind::QuestionQuestionToken, 2),
            // `a?.5:b` is a conditional, not optional chaining
            b'?' if c1 == b'.' && !c2.is_ascii_digit() => (SyntaxKind::QuestionDotToken, 2),
            b'?' => (SyntaxKind::QuestionToken, 1),
            b'<' if c1 == b'<' && c2 == b'=' => (SyntaxKind::LessThanLessThanEqualsToken, 3),
            b'<' if c1 == b'<' => (SyntaxKind::LessThanLessThanToken, 2),
            b'<' if c1 == b'=' => (SyntaxKind::LessThanEqualsToken, 2),
            b'<' => (SyntaxKind::LessThanToken, 1),
            b'=' if c1 == b'=' && c2 == b'=' => (SyntaxKind::EqualsEqualsEqualsToken, 3),
            b'=' if c1 == b'=' => (SyntaxKind::EqualsEqualsToken, 2),
            b'=' if c1 == b'>' => (SyntaxKind::EqualsGreaterThanToken, 2),
            b'=' => (SyntaxKind::EqualsToken, 1),
            b'!' if c1 == b'=' && c2 == b'=' => (SyntaxKind::ExclamationEqualsEqualsToken, 3),
            b'!' if c1 == b'=' => (SyntaxKind::ExclamationEqualsToken, 2),
            b'!' => (SyntaxKind::ExclamationToken, 1),
            b'+' if c1 == b'+' => (SyntaxKind::PlusPlusToken, 2),
            b'+' if c1 == b'=' => (SyntaxKind::PlusEqualsToken, 2),
            b'+' => (SyntaxKind::PlusToken, 1),
            b'-' if c1 == b'-' => (SyntaxKind::MinusMinusToken, 2),
            b'-' if c1 == b'=' => (SyntaxKind::MinusEqualsToken, 2),
            b'-' => (SyntaxKind::MinusToken, 1),
            // `**=` is folded into `*=`; only the assignment-ness matters here
            b'*' if c1 == b'*' && c2 == b'=' => (SyntaxKind::AsteriskEqualsToken, 3),
            b'*' if c1 == b'*' => (SyntaxKind::AsteriskAsteriskToken, 2),
            b'*' if c1 == b'=' => (SyntaxKind::AsteriskEqualsToken, 2),
            b'*' => (SyntaxKind::AsteriskToken, 1),
            b'/' if c1 == b'=' => (SyntaxKind::SlashEqualsToken, 2),
            b'/' => (SyntaxKind::SlashToken, 1),
            b'%' if c1 == b'=' => (SyntaxKind::PercentEqualsToken, 2),
            b'%' => (SyntaxKind::PercentToken, 1),
            b'&' if c1 == b'&' && c2 == b'=' => (SyntaxKind::AmpersandAmpersandEqualsToken, 3),
            b'&' if c1 == b'&' => (SyntaxKind::AmpersandAmpersandToken, 2),
            b'&' if c1 == b'=' => (SyntaxKind::AmpersandEqualsToken, 2),
            b'&' => (SyntaxKind::AmpersandToken, 1),
            b'|' if c1 == b'|' && c2 == b'=' => (SyntaxKind::BarBarEqualsToken, 3),
            b'|' if c1 == b'|' => (SyntaxKind::BarBarToken, 2),
            b'|' if c1 == b'=' => (SyntaxKind::BarEqualsToken, 2),
            b'|' => (SyntaxKind::BarToken, 1),
            b'^' if c1 == b'=' => (SyntaxKind::CaretEqualsToken, 2),
            b'^' => (SyntaxKind::CaretToken, 1),
            _ => (SyntaxKind::Unknown, 0),
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$' || (!ch.is_ascii() && ch.is_alphabetic())
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || ch == '_'
        || ch == '$'
        || (!ch.is_ascii() && (ch.is_alphanumeric() || ch == '\u{200c}' || ch == '\u{200d}'))
}
