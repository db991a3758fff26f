//! Parser state - type parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::ParserState;
use super::{node_flags, syntax_kind_ext};
use mustuse_common::diagnostics::diagnostic_messages;
use mustuse_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Annotations
    // =========================================================================

    /// `: Type` or `NONE` when there is no colon.
    pub(crate) fn parse_type_annotation(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        }
    }

    /// `: Type`, `: x is Type` or `: asserts x is Type`.
    pub(crate) fn parse_return_type_opt(&mut self) -> NodeIndex {
        if !self.parse_optional(SyntaxKind::ColonToken) {
            return NodeIndex::NONE;
        }
        self.parse_return_type()
    }

    fn parse_return_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.is_token(SyntaxKind::Identifier)
            && self.token().value == "asserts"
            && !self.peek_has_line_break(1)
            && (self.peek_kind(1).is_identifier_or_contextual_keyword()
                || self.peek_kind(1) == SyntaxKind::ThisKeyword)
        {
            self.next_token();
            let parameter_name = self.parse_predicate_subject();
            let type_node = if self.is_token(SyntaxKind::Identifier) && self.token().value == "is" {
                self.next_token();
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            return self.arena.add_node(
                syntax_kind_ext::TYPE_PREDICATE,
                pos,
                self.last_token_end,
                NodeData::TypePredicate(TypePredicateData {
                    parameter_name,
                    type_node,
                }),
            );
        }
        let is_predicate = (self.token_kind().is_identifier_or_contextual_keyword()
            || self.is_token(SyntaxKind::ThisKeyword))
            && self.peek_kind(1) == SyntaxKind::Identifier
            && self.tokens[self.token_index + 1].value == "is"
            && !self.peek_has_line_break(1);
        if is_predicate {
            let parameter_name = self.parse_predicate_subject();
            // `is`
            self.next_token();
            let type_node = self.parse_type();
            return self.arena.add_node(
                syntax_kind_ext::TYPE_PREDICATE,
                pos,
                self.last_token_end,
                NodeData::TypePredicate(TypePredicateData {
                    parameter_name,
                    type_node,
                }),
            );
        }
        self.parse_type()
    }

    fn parse_predicate_subject(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::ThisKeyword) {
            self.parse_keyword_token()
        } else {
            self.parse_identifier()
        }
    }

    // =========================================================================
    // Type parameters and arguments
    // =========================================================================

    /// `<T extends C = D, U>` or `None`.
    pub(crate) fn parse_type_parameters_opt(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        self.next_token();
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let pos = self.token_pos();
            // `const T`, `in T`, `out T`
            while matches!(self.token_kind(), SyntaxKind::ConstKeyword | SyntaxKind::InKeyword)
                || (self.is_token(SyntaxKind::Identifier)
                    && self.token().value == "out"
                    && self.peek_kind(1).is_identifier_or_contextual_keyword())
            {
                self.next_token();
            }
            let name = self.parse_identifier();
            if name.is_none() {
                break;
            }
            let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            parameters.push(self.arena.add_node(
                syntax_kind_ext::TYPE_PARAMETER,
                pos,
                self.last_token_end,
                NodeData::TypeParameter(TypeParameterData {
                    name,
                    constraint,
                    default,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected_greater_than();
        Some(NodeList::new(parameters))
    }

    /// `<A, B>` or `None`.
    pub(crate) fn parse_type_arguments_opt(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        self.next_token();
        let mut arguments = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let argument = self.parse_type();
            if argument.is_none() {
                break;
            }
            arguments.push(argument);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected_greater_than();
        Some(NodeList::new(arguments))
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let type_node = self.parse_type_worker();
        self.exit_recursion();
        type_node
    }

    fn parse_type_worker(&mut self) -> NodeIndex {
        if self.is_start_of_function_type() {
            return self.parse_function_type(syntax_kind_ext::FUNCTION_TYPE);
        }
        if self.is_token(SyntaxKind::NewKeyword)
            || (self.is_token(SyntaxKind::AbstractKeyword)
                && self.peek_kind(1) == SyntaxKind::NewKeyword)
        {
            if self.is_token(SyntaxKind::AbstractKeyword) {
                self.next_token();
            }
            self.next_token();
            return self.parse_function_type(syntax_kind_ext::CONSTRUCTOR_TYPE);
        }

        let pos = self.token_pos();
        let check_type = self.parse_union_type();
        if check_type.is_none()
            || !self.is_token(SyntaxKind::ExtendsKeyword)
            || self.has_preceding_line_break()
        {
            return check_type;
        }

        // Conditional type
        self.next_token();
        let extends_type = self.parse_union_type();
        self.parse_expected(SyntaxKind::QuestionToken);
        let true_type = self.parse_type();
        self.parse_expected(SyntaxKind::ColonToken);
        let false_type = self.parse_type();
        self.arena.add_node(
            syntax_kind_ext::CONDITIONAL_TYPE,
            pos,
            self.last_token_end,
            NodeData::ConditionalType(ConditionalTypeData {
                check_type,
                extends_type,
                true_type,
                false_type,
            }),
        )
    }

    /// `(` that opens a parameter list rather than a parenthesized type.
    fn is_start_of_function_type(&self) -> bool {
        if self.is_token(SyntaxKind::LessThanToken) {
            return true;
        }
        if !self.is_token(SyntaxKind::OpenParenToken) {
            return false;
        }
        match self.peek_kind(1) {
            SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken => true,
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken => {
                self.paren_type_followed_by_arrow()
            }
            kind if kind.is_identifier_or_contextual_keyword() || kind == SyntaxKind::ThisKeyword => {
                matches!(
                    self.peek_kind(2),
                    SyntaxKind::ColonToken
                        | SyntaxKind::CommaToken
                        | SyntaxKind::QuestionToken
                        | SyntaxKind::EqualsToken
                ) || (self.peek_kind(2) == SyntaxKind::CloseParenToken
                    && self.peek_kind(3) == SyntaxKind::EqualsGreaterThanToken)
            }
            _ => false,
        }
    }

    fn paren_type_followed_by_arrow(&self) -> bool {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(self.token_index) {
            match token.kind {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.tokens.get(index + 1).map(|t| t.kind)
                            == Some(SyntaxKind::EqualsGreaterThanToken);
                    }
                }
                SyntaxKind::EndOfFileToken => return false,
                _ => {}
            }
        }
        false
    }

    fn parse_function_type(&mut self, kind: u16) -> NodeIndex {
        let pos = self.token_pos();
        let type_parameters = self.parse_type_parameters_opt();
        let parameters = self.parse_parameters();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let type_annotation = self.parse_return_type();
        self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::FunctionType(FunctionTypeData {
                type_parameters,
                parameters,
                type_annotation,
            }),
        )
    }

    fn parse_union_type(&mut self) -> NodeIndex {
        self.parse_composite_type(
            SyntaxKind::BarToken,
            syntax_kind_ext::UNION_TYPE,
            Self::parse_intersection_type,
        )
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        self.parse_composite_type(
            SyntaxKind::AmpersandToken,
            syntax_kind_ext::INTERSECTION_TYPE,
            Self::parse_type_operator_or_higher,
        )
    }

    fn parse_composite_type(
        &mut self,
        separator: SyntaxKind,
        kind: u16,
        constituent: fn(&mut Self) -> NodeIndex,
    ) -> NodeIndex {
        let pos = self.token_pos();
        // Leading separator: `| A | B`
        let leading = self.parse_optional(separator);
        let first = if self.is_start_of_function_type() {
            self.parse_function_type(syntax_kind_ext::FUNCTION_TYPE)
        } else {
            constituent(self)
        };
        if first.is_none() {
            return first;
        }
        if !self.is_token(separator) {
            if leading {
                return self.arena.add_node(
                    kind,
                    pos,
                    self.last_token_end,
                    NodeData::CompositeType(CompositeTypeData {
                        types: NodeList::new(vec![first]),
                    }),
                );
            }
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(separator) {
            let next = if self.is_start_of_function_type() {
                self.parse_function_type(syntax_kind_ext::FUNCTION_TYPE)
            } else {
                constituent(self)
            };
            if next.is_none() {
                break;
            }
            types.push(next);
        }
        self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::CompositeType(CompositeTypeData {
                types: NodeList::new(types),
            }),
        )
    }

    /// `keyof T`, `readonly T[]`, `unique symbol`, `infer U`, or a postfix type.
    fn parse_type_operator_or_higher(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let is_operator = match self.token_kind() {
            SyntaxKind::ReadonlyKeyword => true,
            SyntaxKind::Identifier => {
                matches!(self.token().value.as_str(), "keyof" | "unique" | "infer")
                    && (self.peek_kind(1).is_identifier_or_keyword()
                        || matches!(
                            self.peek_kind(1),
                            SyntaxKind::OpenParenToken
                                | SyntaxKind::OpenBracketToken
                                | SyntaxKind::OpenBraceToken
                        ))
            }
            _ => false,
        };
        if !is_operator {
            return self.parse_postfix_type();
        }
        let is_infer = self.token().value == "infer";
        self.next_token();
        let type_node = if is_infer {
            let name_pos = self.token_pos();
            let name = self.parse_identifier();
            self.arena.add_node(
                syntax_kind_ext::TYPE_PARAMETER,
                name_pos,
                self.last_token_end,
                NodeData::TypeParameter(TypeParameterData {
                    name,
                    constraint: NodeIndex::NONE,
                    default: NodeIndex::NONE,
                }),
            )
        } else {
            self.parse_type_operator_or_higher()
        };
        self.arena.add_node(
            syntax_kind_ext::TYPE_OPERATOR,
            pos,
            self.last_token_end,
            NodeData::WrappedType(WrappedTypeData { type_node }),
        )
    }

    /// Array and indexed-access suffixes: `T[]`, `T[K]`.
    fn parse_postfix_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut type_node = self.parse_non_array_type();
        while type_node.is_some()
            && self.is_token(SyntaxKind::OpenBracketToken)
            && !self.has_preceding_line_break()
        {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                type_node = self.arena.add_node(
                    syntax_kind_ext::ARRAY_TYPE,
                    pos,
                    self.last_token_end,
                    NodeData::WrappedType(WrappedTypeData { type_node }),
                );
                continue;
            }
            let index_type = self.parse_type();
            self.parse_expected(SyntaxKind::CloseBracketToken);
            type_node = self.arena.add_node(
                syntax_kind_ext::INDEXED_ACCESS_TYPE,
                pos,
                self.last_token_end,
                NodeData::CompositeType(CompositeTypeData {
                    types: NodeList::new(vec![type_node, index_type]),
                }),
            );
        }
        type_node
    }

    fn parse_non_array_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token_kind() {
            SyntaxKind::VoidKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::ThisKeyword
            | SyntaxKind::ConstKeyword => self.parse_keyword_type(),
            SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateLiteral => self.parse_literal_type(),
            SyntaxKind::MinusToken
                if matches!(
                    self.peek_kind(1),
                    SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
                ) =>
            {
                self.parse_literal_type()
            }
            SyntaxKind::TypeOfKeyword => {
                self.next_token();
                let type_node = self.parse_entity_name();
                self.parse_type_arguments_opt();
                self.arena.add_node(
                    syntax_kind_ext::TYPE_QUERY,
                    pos,
                    self.last_token_end,
                    NodeData::WrappedType(WrappedTypeData { type_node }),
                )
            }
            SyntaxKind::OpenBraceToken => {
                if self.is_start_of_mapped_type() {
                    self.parse_mapped_type()
                } else {
                    let members = self.parse_type_members();
                    self.arena.add_node(
                        syntax_kind_ext::TYPE_LITERAL,
                        pos,
                        self.last_token_end,
                        NodeData::TypeLiteral(TypeLiteralData { members }),
                    )
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let type_node = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_node(
                    syntax_kind_ext::PARENTHESIZED_TYPE,
                    pos,
                    self.last_token_end,
                    NodeData::WrappedType(WrappedTypeData { type_node }),
                )
            }
            SyntaxKind::ImportKeyword => {
                // `import("x").Name`
                self.next_token();
                self.parse_expected(SyntaxKind::OpenParenToken);
                if self.is_token(SyntaxKind::StringLiteral) {
                    self.parse_literal_node();
                }
                self.parse_expected(SyntaxKind::CloseParenToken);
                if self.parse_optional(SyntaxKind::DotToken) {
                    self.parse_type_reference()
                } else {
                    self.parse_keyword_type_named(pos, "unknown")
                }
            }
            kind if kind.is_identifier_or_contextual_keyword() => self.parse_type_reference(),
            _ => {
                self.parse_error_at_current_token(&diagnostic_messages::TYPE_EXPECTED, &[]);
                NodeIndex::NONE
            }
        }
    }

    /// `void`, `null`, `this` and `const` (in `as const`).
    pub(crate) fn parse_keyword_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let text = self.token().value.clone();
        self.next_token();
        self.arena
            .add_literal(syntax_kind_ext::KEYWORD_TYPE, pos, self.last_token_end, text)
    }

    fn parse_keyword_type_named(&mut self, pos: u32, text: &str) -> NodeIndex {
        self.arena.add_literal(
            syntax_kind_ext::KEYWORD_TYPE,
            pos,
            self.last_token_end,
            text.to_string(),
        )
    }

    fn parse_literal_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let negative = self.parse_optional(SyntaxKind::MinusToken);
        let literal = if matches!(
            self.token_kind(),
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword
        ) {
            self.parse_keyword_token()
        } else {
            self.parse_literal_node()
        };
        if negative {
            if let Some(node) = self.arena.get(literal).copied() {
                if let Some(NodeData::Literal(data)) = self
                    .arena
                    .data
                    .get_mut(node.data_index as usize)
                {
                    data.text.insert(0, '-');
                }
            }
        }
        self.arena.add_node(
            syntax_kind_ext::LITERAL_TYPE,
            pos,
            self.last_token_end,
            NodeData::WrappedType(WrappedTypeData { type_node: literal }),
        )
    }

    /// `A`, `A.B`, `A<T>`, `A.B<T>`.
    fn parse_type_reference(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let type_name = self.parse_entity_name();
        if type_name.is_none() {
            return type_name;
        }
        let type_arguments = if self.has_preceding_line_break() {
            None
        } else {
            self.parse_type_arguments_opt()
        };
        self.arena.add_node(
            syntax_kind_ext::TYPE_REFERENCE,
            pos,
            self.last_token_end,
            NodeData::TypeRef(TypeRefData {
                type_name,
                type_arguments,
            }),
        )
    }

    /// Identifier or qualified name.
    fn parse_entity_name(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut name = if self.is_token(SyntaxKind::ThisKeyword) {
            self.parse_keyword_token()
        } else {
            self.parse_identifier()
        };
        while name.is_some() && self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let right = self.parse_identifier_name();
            name = self.arena.add_node(
                syntax_kind_ext::QUALIFIED_NAME,
                pos,
                self.last_token_end,
                NodeData::QualifiedName(QualifiedNameData { left: name, right }),
            );
        }
        name
    }

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            self.parse_optional(SyntaxKind::DotDotDotToken);
            // Named members: `[first: A, rest?: B]`
            if self.token_kind().is_identifier_or_keyword()
                && matches!(self.peek_kind(1), SyntaxKind::ColonToken)
                || (self.token_kind().is_identifier_or_keyword()
                    && self.peek_kind(1) == SyntaxKind::QuestionToken
                    && self.peek_kind(2) == SyntaxKind::ColonToken)
            {
                self.next_token();
                self.parse_optional(SyntaxKind::QuestionToken);
                self.next_token();
            }
            let element = self.parse_type();
            if element.is_none() {
                break;
            }
            // Optional element: `[A?]`
            self.parse_optional(SyntaxKind::QuestionToken);
            elements.push(element);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_node(
            syntax_kind_ext::TUPLE_TYPE,
            pos,
            self.last_token_end,
            NodeData::CompositeType(CompositeTypeData {
                types: NodeList::new(elements),
            }),
        )
    }

    fn is_start_of_mapped_type(&self) -> bool {
        let mut offset = 1;
        if matches!(
            self.peek_kind(offset),
            SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            offset += 1;
        }
        if self.peek_kind(offset) == SyntaxKind::ReadonlyKeyword {
            offset += 1;
        }
        self.peek_kind(offset) == SyntaxKind::OpenBracketToken
            && self.peek_kind(offset + 1).is_identifier_or_contextual_keyword()
            && self.peek_kind(offset + 2) == SyntaxKind::InKeyword
    }

    /// `{ [K in keyof T]: X }`. The member type is kept; the key clause is
    /// parsed for error recovery only.
    fn parse_mapped_type(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        if matches!(
            self.token_kind(),
            SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            self.next_token();
        }
        self.parse_optional(SyntaxKind::ReadonlyKeyword);
        self.parse_expected(SyntaxKind::OpenBracketToken);
        self.parse_identifier();
        self.parse_expected(SyntaxKind::InKeyword);
        self.parse_type();
        if self.parse_optional(SyntaxKind::AsKeyword) {
            self.parse_type();
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        if matches!(
            self.token_kind(),
            SyntaxKind::PlusToken | SyntaxKind::MinusToken
        ) {
            self.next_token();
        }
        self.parse_optional(SyntaxKind::QuestionToken);
        let type_node = self.parse_type_annotation();
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.parse_optional(SyntaxKind::CommaToken);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_node(
            syntax_kind_ext::MAPPED_TYPE,
            pos,
            self.last_token_end,
            NodeData::WrappedType(WrappedTypeData { type_node }),
        )
    }

    // =========================================================================
    // Type members (interfaces and type literals)
    // =========================================================================

    pub(crate) fn parse_type_members(&mut self) -> NodeList {
        let mut members = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeList::new(members);
        }
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_index;
            let member = self.parse_type_member();
            if member.is_some() {
                members.push(member);
            }
            // Members are separated by `;`, `,` or a line break.
            if !self.parse_optional(SyntaxKind::SemicolonToken)
                && !self.parse_optional(SyntaxKind::CommaToken)
                && !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.has_preceding_line_break()
            {
                self.parse_expected(SyntaxKind::SemicolonToken);
            }
            if self.token_index == before {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::new(members)
    }

    fn parse_type_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if matches!(
            self.token_kind(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            return self.parse_signature_member(pos, syntax_kind_ext::CALL_SIGNATURE, NodeIndex::NONE);
        }
        if self.is_token(SyntaxKind::NewKeyword)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        {
            self.next_token();
            return self.parse_signature_member(
                pos,
                syntax_kind_ext::CONSTRUCT_SIGNATURE,
                NodeIndex::NONE,
            );
        }

        let mut modifiers = 0;
        if self.is_token(SyntaxKind::ReadonlyKeyword)
            && !matches!(
                self.peek_kind(1),
                SyntaxKind::ColonToken
                    | SyntaxKind::QuestionToken
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::SemicolonToken
                    | SyntaxKind::CommaToken
                    | SyntaxKind::CloseBraceToken
            )
        {
            self.next_token();
            modifiers |= super::modifier_flags::READONLY;
        }

        if self.is_index_signature_start() {
            return self.parse_index_signature(pos);
        }

        // Accessor signatures: `get x(): T;` reads as a property of type `T`.
        if self.is_token(SyntaxKind::Identifier)
            && matches!(self.token().value.as_str(), "get" | "set")
            && (self.peek_kind(1).is_identifier_or_keyword()
                || matches!(
                    self.peek_kind(1),
                    SyntaxKind::StringLiteral | SyntaxKind::OpenBracketToken
                ))
        {
            self.next_token();
        }

        let name = self.parse_property_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        let member = if matches!(
            self.token_kind(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            self.parse_signature_member(pos, syntax_kind_ext::METHOD_SIGNATURE, name)
        } else {
            let type_annotation = self.parse_type_annotation();
            self.arena.add_node(
                syntax_kind_ext::PROPERTY_SIGNATURE,
                pos,
                self.last_token_end,
                NodeData::Signature(SignatureData {
                    name,
                    type_parameters: None,
                    parameters: None,
                    type_annotation,
                }),
            )
        };
        self.arena.set_flags(
            member,
            modifiers | if optional { node_flags::OPTIONAL } else { 0 },
        );
        member
    }

    fn parse_signature_member(&mut self, pos: u32, kind: u16, name: NodeIndex) -> NodeIndex {
        let type_parameters = self.parse_type_parameters_opt();
        let parameters = self.parse_parameters();
        let type_annotation = self.parse_return_type_opt();
        self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::Signature(SignatureData {
                name,
                type_parameters,
                parameters: Some(parameters),
                type_annotation,
            }),
        )
    }

    /// `[key: string]` at the current position.
    pub(crate) fn is_index_signature_start(&self) -> bool {
        self.is_token(SyntaxKind::OpenBracketToken)
            && self.peek_kind(1).is_identifier_or_contextual_keyword()
            && self.peek_kind(2) == SyntaxKind::ColonToken
    }

    /// `[key: K]: T`
    pub(crate) fn parse_index_signature(&mut self, pos: u32) -> NodeIndex {
        let parameters = self.parse_delimited_list(
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            |p| {
                let pos = p.token_pos();
                let name = p.parse_identifier();
                let type_annotation = p.parse_type_annotation();
                p.arena.add_node(
                    syntax_kind_ext::PARAMETER,
                    pos,
                    p.last_token_end,
                    NodeData::Parameter(ParameterData {
                        name,
                        type_annotation,
                        initializer: NodeIndex::NONE,
                    }),
                )
            },
        );
        self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = self.parse_type_annotation();
        self.arena.add_node(
            syntax_kind_ext::INDEX_SIGNATURE,
            pos,
            self.last_token_end,
            NodeData::Signature(SignatureData {
                name: NodeIndex::NONE,
                type_parameters: None,
                parameters: Some(parameters),
                type_annotation,
            }),
        )
    }
}
