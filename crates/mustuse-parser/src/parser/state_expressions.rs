//! Parser state - expression parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::ParserState;
use super::{modifier_flags, node_flags, syntax_kind_ext};
use mustuse_common::diagnostics::diagnostic_messages;
use mustuse_scanner::SyntaxKind;

/// Binary operator precedence; higher binds tighter. 0 means "not binary".
fn binary_operator_precedence(kind: SyntaxKind) -> u8 {
    match kind {
        SyntaxKind::QuestionQuestionToken => 4,
        SyntaxKind::BarBarToken => 5,
        SyntaxKind::AmpersandAmpersandToken => 6,
        SyntaxKind::BarToken => 7,
        SyntaxKind::CaretToken => 8,
        SyntaxKind::AmpersandToken => 9,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => 10,
        SyntaxKind::LessThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword
        | SyntaxKind::AsKeyword
        | SyntaxKind::SatisfiesKeyword => 11,
        SyntaxKind::LessThanLessThanToken => 12,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => 13,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 14,
        SyntaxKind::AsteriskAsteriskToken => 15,
        _ => 0,
    }
}

const RELATIONAL_PRECEDENCE: u8 = 11;
const SHIFT_PRECEDENCE: u8 = 12;

/// An operator spelled with several adjacent `>` tokens.
struct GluedOperator {
    kind: SyntaxKind,
    tokens: usize,
    precedence: u8,
}

impl GluedOperator {
    fn new(kind: SyntaxKind, tokens: usize, precedence: u8) -> GluedOperator {
        GluedOperator {
            kind,
            tokens,
            precedence,
        }
    }
}

impl ParserState {
    // =========================================================================
    // Expression entry points
    // =========================================================================

    /// Expression including the comma operator.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut expression = self.parse_assignment_expression();
        while expression.is_some() && self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression();
            expression = self.make_binary(pos, expression, SyntaxKind::CommaToken, right);
        }
        expression
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let expression = self.parse_assignment_expression_worker();
        self.exit_recursion();
        expression
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if let Some(arrow) = self.try_parse_arrow_function() {
            return arrow;
        }

        let pos = self.token_pos();
        let left = self.parse_conditional_expression();
        if left.is_none() {
            return left;
        }
        let operator = self.token_kind();
        if operator.is_assignment_operator() {
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.make_binary(pos, left, operator, right);
        }
        // `a >>= b` arrives as separate `>` tokens.
        if operator == SyntaxKind::GreaterThanToken {
            let glued = self.glued_greater_than();
            if glued.kind.is_assignment_operator() {
                for _ in 0..glued.tokens {
                    self.next_token();
                }
                let right = self.parse_assignment_expression();
                return self.make_binary(pos, left, glued.kind, right);
            }
        }
        left
    }

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if condition.is_none() || !self.is_token(SyntaxKind::QuestionToken) {
            return condition;
        }
        self.next_token();
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        let when_true = self.parse_assignment_expression();
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression();
        self.arena.add_node(
            syntax_kind_ext::CONDITIONAL_EXPRESSION,
            pos,
            self.last_token_end,
            NodeData::Conditional(ConditionalExprData {
                condition,
                when_true,
                when_false,
            }),
        )
    }

    /// Kind of the token `offset` ahead if it touches the previous token.
    fn adjacent_kind(&self, offset: usize) -> Option<SyntaxKind> {
        let index = self.token_index + offset;
        let previous = self.tokens.get(index.checked_sub(1)?)?;
        let token = self.tokens.get(index)?;
        (token.pos == previous.end).then_some(token.kind)
    }

    /// Glue the current `>` with touching `>` and `=` tokens into `>=`, `>>`,
    /// `>>>`, `>>=` or `>>>=`.
    fn glued_greater_than(&self) -> GluedOperator {
        let mut count = 1;
        while count < 3 && self.adjacent_kind(count) == Some(SyntaxKind::GreaterThanToken) {
            count += 1;
        }
        let with_equals = self.adjacent_kind(count) == Some(SyntaxKind::EqualsToken);
        match (count, with_equals) {
            (1, false) => GluedOperator::new(SyntaxKind::GreaterThanToken, 1, RELATIONAL_PRECEDENCE),
            (1, true) => GluedOperator::new(SyntaxKind::GreaterThanToken, 2, RELATIONAL_PRECEDENCE),
            // Right shifts are recorded with the left-shift kinds.
            (_, false) => GluedOperator::new(SyntaxKind::LessThanLessThanToken, count, SHIFT_PRECEDENCE),
            (_, true) => GluedOperator::new(SyntaxKind::LessThanLessThanEqualsToken, count + 1, 0),
        }
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        if left.is_none() {
            return left;
        }
        loop {
            let mut operator = self.token_kind();
            let mut token_count = 1;
            let mut precedence = binary_operator_precedence(operator);
            if operator == SyntaxKind::GreaterThanToken {
                let glued = self.glued_greater_than();
                if glued.kind.is_assignment_operator() {
                    break;
                }
                operator = glued.kind;
                token_count = glued.tokens;
                precedence = glued.precedence;
            }
            if operator == SyntaxKind::InKeyword && self.disallow_in {
                break;
            }
            if precedence == 0 || precedence <= min_precedence {
                // `**` is right-associative.
                if !(operator == SyntaxKind::AsteriskAsteriskToken && precedence == min_precedence)
                {
                    break;
                }
            }

            if matches!(operator, SyntaxKind::AsKeyword | SyntaxKind::SatisfiesKeyword) {
                if self.has_preceding_line_break() {
                    break;
                }
                self.next_token();
                let type_node = if operator == SyntaxKind::AsKeyword
                    && self.is_token(SyntaxKind::ConstKeyword)
                {
                    self.parse_keyword_type()
                } else {
                    self.parse_type()
                };
                let kind = if operator == SyntaxKind::AsKeyword {
                    syntax_kind_ext::AS_EXPRESSION
                } else {
                    syntax_kind_ext::SATISFIES_EXPRESSION
                };
                left = self.arena.add_node(
                    kind,
                    pos,
                    self.last_token_end,
                    NodeData::TypeAssertion(TypeAssertionData {
                        expression: left,
                        type_node,
                    }),
                );
                continue;
            }

            for _ in 0..token_count {
                self.next_token();
            }
            let right = self.parse_binary_expression(precedence);
            left = self.make_binary(pos, left, operator, right);
        }
        left
    }

    fn make_binary(
        &mut self,
        pos: u32,
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_node(
            syntax_kind_ext::BINARY_EXPRESSION,
            pos,
            self.last_token_end,
            NodeData::Binary(BinaryExprData {
                left,
                operator_token: operator as u16,
                right,
            }),
        )
    }

    // =========================================================================
    // Unary expressions
    // =========================================================================

    fn parse_unary_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let expression = self.parse_unary_expression_worker();
        self.exit_recursion();
        expression
    }

    fn parse_unary_expression_worker(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let operator = self.token_kind();
        match operator {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                self.next_token();
                let operand = self.parse_unary_expression();
                self.arena.add_node(
                    syntax_kind_ext::PREFIX_UNARY_EXPRESSION,
                    pos,
                    self.last_token_end,
                    NodeData::Unary(UnaryExprData {
                        operator: operator as u16,
                        operand,
                    }),
                )
            }
            SyntaxKind::TypeOfKeyword | SyntaxKind::VoidKeyword | SyntaxKind::DeleteKeyword => {
                self.next_token();
                let expression = self.parse_unary_expression();
                let kind = match operator {
                    SyntaxKind::TypeOfKeyword => syntax_kind_ext::TYPE_OF_EXPRESSION,
                    SyntaxKind::VoidKeyword => syntax_kind_ext::VOID_EXPRESSION,
                    _ => syntax_kind_ext::DELETE_EXPRESSION,
                };
                self.arena.add_node(
                    kind,
                    pos,
                    self.last_token_end,
                    NodeData::UnaryEx(UnaryExprDataEx { expression }),
                )
            }
            SyntaxKind::AwaitKeyword if self.next_starts_await_operand() => {
                self.next_token();
                let expression = self.parse_unary_expression();
                self.arena.add_node(
                    syntax_kind_ext::AWAIT_EXPRESSION,
                    pos,
                    self.last_token_end,
                    NodeData::UnaryEx(UnaryExprDataEx { expression }),
                )
            }
            SyntaxKind::LessThanToken => {
                // `<T>expr` assertions are not part of .ts/.tsx we accept.
                self.parse_error_at_current_token(&diagnostic_messages::EXPRESSION_EXPECTED, &[]);
                NodeIndex::NONE
            }
            _ => self.parse_postfix_expression(),
        }
    }

    /// `await` is an operator unless it is used as a plain name.
    fn next_starts_await_operand(&self) -> bool {
        Self::starts_expression(self.peek_kind(1))
    }

    fn starts_expression(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::RegularExpressionLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateLiteral
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::TildeToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::NewKeyword
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::DeleteKeyword
        ) || kind.is_contextual_keyword()
    }

    fn parse_postfix_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = self.parse_left_hand_side_expression();
        if expression.is_some()
            && matches!(
                self.token_kind(),
                SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
            )
            && !self.has_preceding_line_break()
        {
            let operator = self.token_kind();
            self.next_token();
            return self.arena.add_node(
                syntax_kind_ext::POSTFIX_UNARY_EXPRESSION,
                pos,
                self.last_token_end,
                NodeData::Unary(UnaryExprData {
                    operator: operator as u16,
                    operand: expression,
                }),
            );
        }
        expression
    }

    // =========================================================================
    // Member, call and new expressions
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        if expression.is_none() {
            return expression;
        }
        self.parse_member_and_call_rest(pos, expression, true)
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        if self.is_token(SyntaxKind::DotToken) {
            // `new.target`
            self.next_token();
            let name = self.parse_identifier_name();
            return self.arena.add_node(
                syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                pos,
                self.last_token_end,
                NodeData::AccessExpr(AccessExprData {
                    expression: NodeIndex::NONE,
                    name_or_argument: name,
                }),
            );
        }
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        if callee.is_none() {
            return callee;
        }
        let expression = self.parse_member_and_call_rest(callee_pos, callee, false);
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            self.try_parse_type_arguments_in_expression()
        } else {
            None
        };
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_arguments())
        } else {
            None
        };
        self.arena.add_node(
            syntax_kind_ext::NEW_EXPRESSION,
            pos,
            self.last_token_end,
            NodeData::CallExpr(CallExprData {
                expression,
                type_arguments,
                arguments,
            }),
        )
    }

    fn parse_member_and_call_rest(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> NodeIndex {
        loop {
            match self.token_kind() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_identifier_name();
                    expression = self.add_access(
                        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                        pos,
                        expression,
                        name,
                        false,
                    );
                }
                SyntaxKind::QuestionDotToken => {
                    self.next_token();
                    match self.token_kind() {
                        SyntaxKind::OpenParenToken if allow_calls => {
                            let arguments = self.parse_arguments();
                            expression = self.add_call(pos, expression, None, arguments, true);
                        }
                        SyntaxKind::LessThanToken if allow_calls => {
                            let type_arguments = self.try_parse_type_arguments_in_expression();
                            let arguments = self.parse_arguments();
                            expression =
                                self.add_call(pos, expression, type_arguments, arguments, true);
                        }
                        SyntaxKind::OpenBracketToken => {
                            self.next_token();
                            let argument = self.parse_expression();
                            self.parse_expected(SyntaxKind::CloseBracketToken);
                            expression = self.add_access(
                                syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
                                pos,
                                expression,
                                argument,
                                true,
                            );
                        }
                        _ => {
                            let name = self.parse_identifier_name();
                            expression = self.add_access(
                                syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                                pos,
                                expression,
                                name,
                                true,
                            );
                        }
                    }
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let argument = self.parse_expression();
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expression = self.add_access(
                        syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION,
                        pos,
                        expression,
                        argument,
                        false,
                    );
                }
                SyntaxKind::ExclamationToken if !self.has_preceding_line_break() => {
                    self.next_token();
                    expression = self.arena.add_node(
                        syntax_kind_ext::NON_NULL_EXPRESSION,
                        pos,
                        self.last_token_end,
                        NodeData::UnaryEx(UnaryExprDataEx { expression }),
                    );
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let arguments = self.parse_arguments();
                    expression = self.add_call(pos, expression, None, arguments, false);
                }
                SyntaxKind::LessThanToken if allow_calls => {
                    let Some(type_arguments) = self.try_parse_type_arguments_in_expression() else {
                        break;
                    };
                    if !self.is_token(SyntaxKind::OpenParenToken) {
                        // Instantiation expression `f<T>`: keep `f`.
                        continue;
                    }
                    let arguments = self.parse_arguments();
                    expression =
                        self.add_call(pos, expression, Some(type_arguments), arguments, false);
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateLiteral
                    if allow_calls =>
                {
                    // Tagged template: a call whose argument is the template.
                    let template = self.parse_literal_node();
                    expression = self.add_call(
                        pos,
                        expression,
                        None,
                        NodeList::new(vec![template]),
                        false,
                    );
                }
                _ => break,
            }
        }
        expression
    }

    fn add_access(
        &mut self,
        kind: u16,
        pos: u32,
        expression: NodeIndex,
        name_or_argument: NodeIndex,
        optional: bool,
    ) -> NodeIndex {
        let node = self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::AccessExpr(AccessExprData {
                expression,
                name_or_argument,
            }),
        );
        if optional {
            self.arena.set_flags(node, node_flags::OPTIONAL_CHAIN);
        }
        node
    }

    fn add_call(
        &mut self,
        pos: u32,
        expression: NodeIndex,
        type_arguments: Option<NodeList>,
        arguments: NodeList,
        optional: bool,
    ) -> NodeIndex {
        let node = self.arena.add_node(
            syntax_kind_ext::CALL_EXPRESSION,
            pos,
            self.last_token_end,
            NodeData::CallExpr(CallExprData {
                expression,
                type_arguments,
                arguments: Some(arguments),
            }),
        );
        if optional {
            self.arena.set_flags(node, node_flags::OPTIONAL_CHAIN);
        }
        node
    }

    /// `<T, U>` followed by something that makes them type arguments.
    fn try_parse_type_arguments_in_expression(&mut self) -> Option<NodeList> {
        self.try_parse(|p| {
            let list = p.parse_type_arguments_opt()?;
            // `a < b > c` is a comparison; type arguments must be followed by
            // a call, a template, or a token that cannot start an operand.
            let follows = p.token_kind();
            let ok = matches!(
                follows,
                SyntaxKind::OpenParenToken
                    | SyntaxKind::NoSubstitutionTemplateLiteral
                    | SyntaxKind::TemplateLiteral
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::DotToken
                    | SyntaxKind::QuestionDotToken
                    | SyntaxKind::EndOfFileToken
            ) || p.has_preceding_line_break();
            ok.then_some(list)
        })
    }

    pub(crate) fn parse_arguments(&mut self) -> NodeList {
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        let arguments = self.parse_delimited_list(
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            Self::parse_argument_or_array_element,
        );
        self.disallow_in = saved_disallow_in;
        arguments
    }

    fn parse_argument_or_array_element(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let pos = self.token_pos();
            self.next_token();
            let expression = self.parse_assignment_expression();
            return self.arena.add_node(
                syntax_kind_ext::SPREAD_ELEMENT,
                pos,
                self.last_token_end,
                NodeData::UnaryEx(UnaryExprDataEx { expression }),
            );
        }
        self.parse_assignment_expression()
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token_kind() {
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateLiteral => self.parse_literal_node(),
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => self.parse_keyword_token(),
            SyntaxKind::ImportKeyword => {
                // `import("x")` and `import.meta`
                let node = self.parse_keyword_token();
                if self.parse_optional(SyntaxKind::DotToken) {
                    let name = self.parse_identifier_name();
                    return self.add_access(
                        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                        pos,
                        node,
                        name,
                        false,
                    );
                }
                node
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let saved_disallow_in = self.disallow_in;
                self.disallow_in = false;
                let expression = self.parse_expression();
                self.disallow_in = saved_disallow_in;
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_node(
                    syntax_kind_ext::PARENTHESIZED_EXPRESSION,
                    pos,
                    self.last_token_end,
                    NodeData::UnaryEx(UnaryExprDataEx { expression }),
                )
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(pos, modifier_flags::NONE),
            SyntaxKind::AsyncKeyword
                if self.peek_kind(1) == SyntaxKind::FunctionKeyword
                    && !self.peek_has_line_break(1) =>
            {
                self.next_token();
                self.parse_function_expression(pos, modifier_flags::ASYNC)
            }
            SyntaxKind::ClassKeyword => {
                self.parse_class(pos, modifier_flags::NONE, syntax_kind_ext::CLASS_EXPRESSION)
            }
            kind if kind.is_identifier_or_contextual_keyword() => self.parse_identifier(),
            _ => {
                self.parse_error_at_current_token(&diagnostic_messages::EXPRESSION_EXPECTED, &[]);
                NodeIndex::NONE
            }
        }
    }

    fn parse_function_expression(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let mut modifiers = modifiers;
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            modifiers |= modifier_flags::GENERATOR;
        }
        let name = if self.token_kind().is_identifier_or_contextual_keyword() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters_opt();
        let parameters = self.parse_parameters();
        let type_annotation = self.parse_return_type_opt();
        let body = self.parse_function_body();
        let node = self.arena.add_node(
            syntax_kind_ext::FUNCTION_EXPRESSION,
            pos,
            self.last_token_end,
            NodeData::Function(FunctionData {
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
            }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }

    fn parse_array_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::CommaToken) {
                // Hole
                continue;
            }
            let element = self.parse_argument_or_array_element();
            if element.is_none() {
                break;
            }
            elements.push(element);
            if !self.is_token(SyntaxKind::CloseBracketToken)
                && !self.parse_expected(SyntaxKind::CommaToken)
            {
                break;
            }
        }
        self.disallow_in = saved_disallow_in;
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_node(
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION,
            pos,
            self.last_token_end,
            NodeData::LiteralExpr(LiteralExprData {
                elements: NodeList::new(elements),
            }),
        )
    }

    pub(crate) fn parse_object_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let saved_disallow_in = self.disallow_in;
        self.disallow_in = false;
        let elements = self.parse_delimited_list(
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            Self::parse_object_literal_member,
        );
        self.disallow_in = saved_disallow_in;
        self.arena.add_node(
            syntax_kind_ext::OBJECT_LITERAL_EXPRESSION,
            pos,
            self.last_token_end,
            NodeData::LiteralExpr(LiteralExprData { elements }),
        )
    }

    fn parse_object_literal_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return self.arena.add_node(
                syntax_kind_ext::SPREAD_ASSIGNMENT,
                pos,
                self.last_token_end,
                NodeData::UnaryEx(UnaryExprDataEx { expression }),
            );
        }

        let next = self.peek_kind(1);
        let next_is_name = !self.peek_has_line_break(1)
            && (next.is_identifier_or_keyword()
                || matches!(
                    next,
                    SyntaxKind::StringLiteral
                        | SyntaxKind::NumericLiteral
                        | SyntaxKind::OpenBracketToken
                        | SyntaxKind::AsteriskToken
                ));
        let mut modifiers = modifier_flags::NONE;
        if self.is_token(SyntaxKind::AsyncKeyword) && next_is_name {
            self.next_token();
            modifiers |= modifier_flags::ASYNC;
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            modifiers |= modifier_flags::GENERATOR;
        }
        if modifiers == modifier_flags::NONE && self.is_token(SyntaxKind::Identifier) && next_is_name
        {
            let accessor_kind = match self.token().value.as_str() {
                "get" => Some(syntax_kind_ext::GET_ACCESSOR),
                "set" => Some(syntax_kind_ext::SET_ACCESSOR),
                _ => None,
            };
            if let Some(kind) = accessor_kind {
                self.next_token();
                let name = self.parse_property_name();
                return self.parse_method_rest(pos, kind, name, modifiers);
            }
        }

        let is_shorthand_candidate = self.token_kind().is_identifier_or_contextual_keyword();
        let name = self.parse_property_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        if matches!(
            self.token_kind(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            return self.parse_method_rest(pos, syntax_kind_ext::METHOD_DECLARATION, name, modifiers);
        }
        if is_shorthand_candidate
            && matches!(
                self.token_kind(),
                SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EqualsToken
            )
        {
            // `{ a }` and the destructuring-default form `{ a = 1 }`
            if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression();
            }
            return self.arena.add_node(
                syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
                pos,
                self.last_token_end,
                NodeData::PropertyAssignment(PropertyAssignmentData {
                    name,
                    initializer: NodeIndex::NONE,
                }),
            );
        }
        self.parse_expected(SyntaxKind::ColonToken);
        let initializer = self.parse_assignment_expression();
        self.arena.add_node(
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            pos,
            self.last_token_end,
            NodeData::PropertyAssignment(PropertyAssignmentData { name, initializer }),
        )
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    fn try_parse_arrow_function(&mut self) -> Option<NodeIndex> {
        let pos = self.token_pos();
        let mut offset = 0;
        let mut modifiers = modifier_flags::NONE;
        if self.is_token(SyntaxKind::AsyncKeyword)
            && !self.peek_has_line_break(1)
            && (self.peek_kind(1) == SyntaxKind::OpenParenToken
                || self.peek_kind(1) == SyntaxKind::LessThanToken
                || (self.peek_kind(1).is_identifier_or_contextual_keyword()
                    && self.peek_kind(2) == SyntaxKind::EqualsGreaterThanToken))
        {
            offset = 1;
            modifiers |= modifier_flags::ASYNC;
        }

        let first = self.peek_kind(offset);
        if first.is_identifier_or_contextual_keyword()
            && self.peek_kind(offset + 1) == SyntaxKind::EqualsGreaterThanToken
            && !self.peek_has_line_break(offset + 1)
        {
            // `x => ...`
            for _ in 0..offset {
                self.next_token();
            }
            let param_pos = self.token_pos();
            let name = self.parse_identifier();
            let parameter = self.arena.add_node(
                syntax_kind_ext::PARAMETER,
                param_pos,
                self.last_token_end,
                NodeData::Parameter(ParameterData {
                    name,
                    type_annotation: NodeIndex::NONE,
                    initializer: NodeIndex::NONE,
                }),
            );
            self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
            let body = self.parse_arrow_body();
            return Some(self.add_arrow(
                pos,
                None,
                NodeList::new(vec![parameter]),
                NodeIndex::NONE,
                body,
                modifiers,
            ));
        }

        if first != SyntaxKind::OpenParenToken && first != SyntaxKind::LessThanToken {
            return None;
        }
        if first == SyntaxKind::OpenParenToken && !self.paren_may_start_arrow(offset) {
            return None;
        }

        let head = self.try_parse(|p| {
            for _ in 0..offset {
                p.next_token();
            }
            let type_parameters = p.parse_type_parameters_opt();
            let parameters = p.parse_parameters();
            let type_annotation = if p.is_token(SyntaxKind::ColonToken) {
                p.parse_return_type_opt()
            } else {
                NodeIndex::NONE
            };
            if !p.is_token(SyntaxKind::EqualsGreaterThanToken) || p.has_preceding_line_break() {
                return None;
            }
            p.next_token();
            Some((type_parameters, parameters, type_annotation))
        })?;
        let (type_parameters, parameters, type_annotation) = head;
        let body = self.parse_arrow_body();
        Some(self.add_arrow(
            pos,
            type_parameters,
            parameters,
            type_annotation,
            body,
            modifiers,
        ))
    }

    /// Cheap scan: the `(` at `offset` closes with `)` followed by `=>` or
    /// `:`, or is `()`/`(...`/`({`/`([` style parameter list.
    fn paren_may_start_arrow(&self, offset: usize) -> bool {
        let mut depth = 0usize;
        let mut index = self.token_index + offset;
        while let Some(token) = self.tokens.get(index) {
            match token.kind {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let after = self.tokens.get(index + 1).map(|t| t.kind);
                        return matches!(
                            after,
                            Some(SyntaxKind::EqualsGreaterThanToken) | Some(SyntaxKind::ColonToken)
                        );
                    }
                }
                SyntaxKind::EndOfFileToken => return false,
                _ => {}
            }
            index += 1;
        }
        false
    }

    fn parse_arrow_body(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_function_body()
        } else {
            self.parse_assignment_expression()
        }
    }

    fn add_arrow(
        &mut self,
        pos: u32,
        type_parameters: Option<NodeList>,
        parameters: NodeList,
        type_annotation: NodeIndex,
        body: NodeIndex,
        modifiers: u32,
    ) -> NodeIndex {
        let node = self.arena.add_node(
            syntax_kind_ext::ARROW_FUNCTION,
            pos,
            self.last_token_end,
            NodeData::Function(FunctionData {
                name: NodeIndex::NONE,
                type_parameters,
                parameters,
                type_annotation,
                body,
            }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }
}
