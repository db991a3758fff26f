use crate::{SyntaxKind, scan_source};

fn kinds(source: &str) -> Vec<SyntaxKind> {
    scan_source(source)
        .tokens
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn scans_call_chain_tokens() {
    assert_eq!(
        kinds("getResult().map(x => x)"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::DotToken,
            SyntaxKind::Identifier,
            SyntaxKind::OpenParenToken,
            SyntaxKind::Identifier,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseParenToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn greater_than_is_always_a_single_token() {
    assert_eq!(
        kinds("Promise<Result<T, E>>"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::CommaToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn keywords_and_contextual_keywords() {
    let result = scan_source("const await declare foo");
    let tokens = &result.tokens;
    assert_eq!(tokens[0].kind, SyntaxKind::ConstKeyword);
    assert!(!tokens[0].kind.is_contextual_keyword());
    assert_eq!(tokens[1].kind, SyntaxKind::AwaitKeyword);
    assert!(tokens[1].kind.is_identifier_or_contextual_keyword());
    assert_eq!(tokens[2].kind, SyntaxKind::DeclareKeyword);
    assert_eq!(tokens[3].kind, SyntaxKind::Identifier);
    assert_eq!(tokens[3].value, "foo");
}

#[test]
fn records_line_breaks_and_skips_comments() {
    let result = scan_source("a // trailing\n/* block\n */ b c");
    let tokens = &result.tokens;
    assert_eq!(tokens.len(), 4);
    assert!(!tokens[0].has_preceding_line_break);
    assert!(tokens[1].has_preceding_line_break);
    assert_eq!(tokens[1].value, "b");
    assert!(!tokens[2].has_preceding_line_break);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn cooks_string_escapes() {
    let result = scan_source(r#"'a\n\'b' "A\u{42}""#);
    assert_eq!(result.tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(result.tokens[0].value, "a\n'b");
    assert_eq!(result.tokens[1].value, "AB");
}

#[test]
fn templates_with_substitutions_are_one_token() {
    let result = scan_source("`x ${ { a: `inner` }.a } y` z");
    assert_eq!(result.tokens[0].kind, SyntaxKind::TemplateLiteral);
    assert_eq!(result.tokens[1].kind, SyntaxKind::Identifier);
    assert_eq!(result.tokens[1].value, "z");

    let plain = scan_source("`plain`");
    assert_eq!(plain.tokens[0].kind, SyntaxKind::NoSubstitutionTemplateLiteral);
    assert_eq!(plain.tokens[0].value, "plain");
}

#[test]
fn slash_after_operand_is_division() {
    assert_eq!(
        kinds("a / b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::SlashToken,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
    assert_eq!(
        kinds("x = /ab+c/g"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::EqualsToken,
            SyntaxKind::RegularExpressionLiteral,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn numbers_with_separators_and_exponents() {
    let result = scan_source("1_000 0x1F 1.5e-3 10n .5");
    let values: Vec<&str> = result.tokens[..5].iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["1000", "0x1F", "1.5e-3", "10n", ".5"]);
    assert_eq!(result.tokens[3].kind, SyntaxKind::BigIntLiteral);
}

#[test]
fn reports_invalid_characters_and_unterminated_strings() {
    let result = scan_source("a # 'open");
    let codes: Vec<&str> = result.diagnostics.iter().map(|d| d.message.code).collect();
    assert_eq!(codes, vec!["invalid-character", "unterminated-literal"]);
    assert_eq!(result.tokens.last().map(|t| t.kind), Some(SyntaxKind::EndOfFileToken));
}

#[test]
fn optional_chaining_versus_conditional_number() {
    assert_eq!(kinds("a?.b")[1], SyntaxKind::QuestionDotToken);
    assert_eq!(kinds("a?.5:b")[1], SyntaxKind::QuestionToken);
}
