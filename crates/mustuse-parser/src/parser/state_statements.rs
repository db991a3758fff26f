//! Parser state - statement and declaration parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::ParserState;
use super::{modifier_flags, node_flags, syntax_kind_ext};
use mustuse_common::diagnostics::diagnostic_messages;
use mustuse_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Statement lists
    // =========================================================================

    /// Parse statements until `is_end` accepts the current token (or EOF).
    pub(crate) fn parse_statement_list(&mut self, is_end: impl Fn(SyntaxKind) -> bool) -> Vec<NodeIndex> {
        let mut statements = Vec::new();
        while !is_end(self.token_kind()) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_index;
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_index == before {
                // A rule refused the token: report once and move past it.
                self.parse_error_at_current_token(
                    &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    &[],
                );
                self.next_token();
            }
        }
        statements
    }

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let statement = self.parse_statement_worker();
        self.exit_recursion();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        match self.token_kind() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                self.next_token();
                self.arena
                    .add_token(syntax_kind_ext::EMPTY_STATEMENT, pos, self.last_token_end)
            }
            SyntaxKind::AtToken => {
                self.skip_decorators();
                self.parse_statement()
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_or_throw(syntax_kind_ext::RETURN_STATEMENT),
            SyntaxKind::ThrowKeyword => self.parse_return_or_throw(syntax_kind_ext::THROW_STATEMENT),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::BreakKeyword => self.parse_jump_statement(syntax_kind_ext::BREAK_STATEMENT),
            SyntaxKind::ContinueKeyword => {
                self.parse_jump_statement(syntax_kind_ext::CONTINUE_STATEMENT)
            }
            SyntaxKind::ExportKeyword => self.parse_export(),
            SyntaxKind::ImportKeyword
                if !matches!(
                    self.peek_kind(1),
                    SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                ) =>
            {
                self.parse_import_declaration()
            }
            SyntaxKind::DeclareKeyword
                if !self.peek_has_line_break(1) && self.is_declaration_start_at(1) =>
            {
                self.next_token();
                self.parse_declaration(pos, modifier_flags::DECLARE)
            }
            _ if self.is_declaration_start_at(0) => self.parse_declaration(pos, modifier_flags::NONE),
            SyntaxKind::Identifier if self.peek_kind(1) == SyntaxKind::ColonToken => {
                // Labels carry no meaning for the checker; keep the statement.
                self.next_token();
                self.next_token();
                self.parse_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Whether the token `offset` ahead starts a declaration.
    fn is_declaration_start_at(&self, offset: usize) -> bool {
        let next = self.peek_kind(offset + 1);
        let next_on_same_line = !self.peek_has_line_break(offset + 1);
        match self.peek_kind(offset) {
            SyntaxKind::VarKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword => true,
            SyntaxKind::LetKeyword => matches!(
                next,
                SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
            ) || next.is_identifier_or_contextual_keyword(),
            SyntaxKind::AsyncKeyword => next == SyntaxKind::FunctionKeyword && next_on_same_line,
            SyntaxKind::AbstractKeyword => next == SyntaxKind::ClassKeyword && next_on_same_line,
            SyntaxKind::InterfaceKeyword | SyntaxKind::TypeKeyword => {
                next.is_identifier_or_contextual_keyword() && next_on_same_line
            }
            SyntaxKind::Identifier => {
                let text = self.tokens[self.token_index + offset].value.as_str();
                match text {
                    "enum" => next.is_identifier_or_contextual_keyword(),
                    "namespace" | "module" => {
                        next_on_same_line
                            && (next.is_identifier_or_contextual_keyword()
                                || next == SyntaxKind::StringLiteral)
                    }
                    "global" => next == SyntaxKind::OpenBraceToken,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Parse a declaration after any `export`/`declare` modifiers.
    fn parse_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        match self.token_kind() {
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword => {
                self.parse_variable_statement(pos, modifiers)
            }
            SyntaxKind::ConstKeyword => {
                if self.peek_kind(1) == SyntaxKind::Identifier
                    && self.tokens[self.token_index + 1].value == "enum"
                {
                    self.next_token();
                    return self.parse_enum_declaration(pos, modifiers);
                }
                self.parse_variable_statement(pos, modifiers)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(pos, modifiers),
            SyntaxKind::AsyncKeyword => {
                self.next_token();
                self.parse_function_declaration(pos, modifiers | modifier_flags::ASYNC)
            }
            SyntaxKind::ClassKeyword => {
                self.parse_class(pos, modifiers, syntax_kind_ext::CLASS_DECLARATION)
            }
            SyntaxKind::AbstractKeyword => {
                self.next_token();
                self.parse_class(
                    pos,
                    modifiers | modifier_flags::ABSTRACT,
                    syntax_kind_ext::CLASS_DECLARATION,
                )
            }
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(pos, modifiers),
            SyntaxKind::TypeKeyword => self.parse_type_alias_declaration(pos, modifiers),
            SyntaxKind::Identifier => match self.token().value.as_str() {
                "enum" => self.parse_enum_declaration(pos, modifiers),
                "namespace" | "module" | "global" => self.parse_module_declaration(pos, modifiers),
                _ => self.parse_expression_statement(),
            },
            _ => {
                self.parse_error_at_current_token(
                    &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    &[],
                );
                NodeIndex::NONE
            }
        }
    }

    // =========================================================================
    // Blocks and simple statements
    // =========================================================================

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        self.parse_block_of_kind(syntax_kind_ext::BLOCK)
    }

    fn parse_block_of_kind(&mut self, kind: u16) -> NodeIndex {
        let pos = self.token_pos();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeIndex::NONE;
        }
        let statements = self.parse_statement_list(|kind| kind == SyntaxKind::CloseBraceToken);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::Block(BlockData {
                statements: NodeList::new(statements),
            }),
        )
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let expression = self.parse_expression();
        if expression.is_none() {
            return NodeIndex::NONE;
        }
        self.parse_semicolon();
        self.arena.add_node(
            syntax_kind_ext::EXPRESSION_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::ExprStatement(ExprStatementData { expression }),
        )
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_node(
            syntax_kind_ext::IF_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::If(IfStatementData {
                expression,
                then_statement,
                else_statement,
            }),
        )
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.arena.add_node(
            syntax_kind_ext::DO_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::Loop(LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            }),
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.add_node(
            syntax_kind_ext::WHILE_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::Loop(LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            }),
        )
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        // `for await (...)` iterates the same way for our purposes.
        self.parse_optional(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);

        let saved_disallow_in = self.disallow_in;
        self.disallow_in = true;
        let initializer = match self.token_kind() {
            SyntaxKind::SemicolonToken => NodeIndex::NONE,
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_declaration_list()
            }
            SyntaxKind::LetKeyword if self.is_declaration_start_at(0) => {
                self.parse_variable_declaration_list()
            }
            _ => self.parse_expression(),
        };
        self.disallow_in = saved_disallow_in;

        let for_in_of_kind = match self.token_kind() {
            SyntaxKind::OfKeyword => Some(syntax_kind_ext::FOR_OF_STATEMENT),
            SyntaxKind::InKeyword => Some(syntax_kind_ext::FOR_IN_STATEMENT),
            _ => None,
        };
        if let Some(kind) = for_in_of_kind {
            self.next_token();
            let expression = if kind == syntax_kind_ext::FOR_OF_STATEMENT {
                self.parse_assignment_expression()
            } else {
                self.parse_expression()
            };
            self.parse_expected(SyntaxKind::CloseParenToken);
            let statement = self.parse_statement();
            return self.arena.add_node(
                kind,
                pos,
                self.last_token_end,
                NodeData::ForInOf(ForInOfData {
                    initializer,
                    expression,
                    statement,
                }),
            );
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.arena.add_node(
            syntax_kind_ext::FOR_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::Loop(LoopData {
                initializer,
                condition,
                incrementor,
                statement,
            }),
        )
    }

    fn parse_return_or_throw(&mut self, kind: u16) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::Return(ReturnData { expression }),
        )
    }

    fn parse_jump_statement(&mut self, kind: u16) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let label = if !self.can_parse_semicolon()
            && self.token_kind().is_identifier_or_contextual_keyword()
        {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::Jump(JumpData { label }),
        )
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let decl_pos = self.token_pos();
                let name = self.parse_binding_name();
                let type_annotation = self.parse_type_annotation();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_node(
                    syntax_kind_ext::VARIABLE_DECLARATION,
                    decl_pos,
                    self.last_token_end,
                    NodeData::VariableDeclaration(VariableDeclarationData {
                        name,
                        type_annotation,
                        initializer: NodeIndex::NONE,
                    }),
                )
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block();
            self.arena.add_node(
                syntax_kind_ext::CATCH_CLAUSE,
                catch_pos,
                self.last_token_end,
                NodeData::CatchClause(CatchClauseData {
                    variable_declaration,
                    block,
                }),
            )
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };
        if catch_clause.is_none() && finally_block.is_none() {
            self.parse_error_at_current_token(&diagnostic_messages::EXPECTED_TOKEN, &["catch"]);
        }

        self.arena.add_node(
            syntax_kind_ext::TRY_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::Try(TryData {
                try_block,
                catch_clause,
                finally_block,
            }),
        )
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.parse_expected(SyntaxKind::OpenBraceToken);

        let mut clauses = Vec::new();
        while matches!(
            self.token_kind(),
            SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword
        ) {
            let clause_pos = self.token_pos();
            let (kind, expression) = if self.parse_optional(SyntaxKind::CaseKeyword) {
                (syntax_kind_ext::CASE_CLAUSE, self.parse_expression())
            } else {
                self.next_token();
                (syntax_kind_ext::DEFAULT_CLAUSE, NodeIndex::NONE)
            };
            self.parse_expected(SyntaxKind::ColonToken);
            let statements = self.parse_statement_list(|kind| {
                matches!(
                    kind,
                    SyntaxKind::CaseKeyword
                        | SyntaxKind::DefaultKeyword
                        | SyntaxKind::CloseBraceToken
                )
            });
            clauses.push(self.arena.add_node(
                kind,
                clause_pos,
                self.last_token_end,
                NodeData::CaseClause(CaseClauseData {
                    expression,
                    statements: NodeList::new(statements),
                }),
            ));
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);

        self.arena.add_node(
            syntax_kind_ext::SWITCH_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::Switch(SwitchData {
                expression,
                clauses: NodeList::new(clauses),
            }),
        )
    }

    // =========================================================================
    // Variables and binding patterns
    // =========================================================================

    fn parse_variable_statement(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        let list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        let statement = self.arena.add_node(
            syntax_kind_ext::VARIABLE_STATEMENT,
            pos,
            self.last_token_end,
            NodeData::Variable(VariableData {
                declarations: NodeList::new(vec![list]),
            }),
        );
        self.arena.set_flags(statement, modifiers);
        statement
    }

    pub(crate) fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let flags = match self.token_kind() {
            SyntaxKind::LetKeyword => node_flags::LET,
            SyntaxKind::ConstKeyword => node_flags::CONST,
            _ => node_flags::NONE,
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            let declaration = self.parse_variable_declaration();
            if declaration.is_some() {
                declarations.push(declaration);
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        let list = self.arena.add_node(
            syntax_kind_ext::VARIABLE_DECLARATION_LIST,
            pos,
            self.last_token_end,
            NodeData::Variable(VariableData {
                declarations: NodeList::new(declarations),
            }),
        );
        self.arena.set_flags(list, flags);
        list
    }

    fn parse_variable_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let name = self.parse_binding_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        // Definite assignment assertion: `let x!: T;`
        if !self.has_preceding_line_break() {
            self.parse_optional(SyntaxKind::ExclamationToken);
        }
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_node(
            syntax_kind_ext::VARIABLE_DECLARATION,
            pos,
            self.last_token_end,
            NodeData::VariableDeclaration(VariableDeclarationData {
                name,
                type_annotation,
                initializer,
            }),
        )
    }

    /// Identifier or destructuring pattern.
    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token_kind() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let elements = self.parse_delimited_list(
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            |p| {
                let pos = p.token_pos();
                let rest = p.parse_optional(SyntaxKind::DotDotDotToken);
                let first = if rest {
                    p.parse_identifier()
                } else {
                    p.parse_property_name()
                };
                let (property_name, name) = if !rest && p.parse_optional(SyntaxKind::ColonToken) {
                    (first, p.parse_binding_name())
                } else {
                    (NodeIndex::NONE, first)
                };
                let initializer = if p.parse_optional(SyntaxKind::EqualsToken) {
                    p.parse_assignment_expression()
                } else {
                    NodeIndex::NONE
                };
                let element = p.arena.add_node(
                    syntax_kind_ext::BINDING_ELEMENT,
                    pos,
                    p.last_token_end,
                    NodeData::BindingElement(BindingElementData {
                        property_name,
                        name,
                        initializer,
                    }),
                );
                if rest {
                    p.arena.set_flags(element, node_flags::REST);
                }
                element
            },
        );
        self.arena.add_node(
            syntax_kind_ext::OBJECT_BINDING_PATTERN,
            pos,
            self.last_token_end,
            NodeData::BindingPattern(BindingPatternData { elements }),
        )
    }

    fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.next_token();
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::CommaToken) {
                // Elision
                continue;
            }
            let element_pos = self.token_pos();
            let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            if name.is_none() {
                break;
            }
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            let element = self.arena.add_node(
                syntax_kind_ext::BINDING_ELEMENT,
                element_pos,
                self.last_token_end,
                NodeData::BindingElement(BindingElementData {
                    property_name: NodeIndex::NONE,
                    name,
                    initializer,
                }),
            );
            if rest {
                self.arena.set_flags(element, node_flags::REST);
            }
            elements.push(element);
            if !self.is_token(SyntaxKind::CloseBracketToken) {
                self.parse_expected(SyntaxKind::CommaToken);
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_node(
            syntax_kind_ext::ARRAY_BINDING_PATTERN,
            pos,
            self.last_token_end,
            NodeData::BindingPattern(BindingPatternData {
                elements: NodeList::new(elements),
            }),
        )
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn parse_function_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let mut modifiers = modifiers;
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            modifiers |= modifier_flags::GENERATOR;
        }
        let name = if self.token_kind().is_identifier_or_contextual_keyword() {
            self.parse_identifier()
        } else {
            if modifiers & modifier_flags::DEFAULT == 0 {
                self.parse_error_at_current_token(&diagnostic_messages::IDENTIFIER_EXPECTED, &[]);
            }
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters_opt();
        let parameters = self.parse_parameters();
        let type_annotation = self.parse_return_type_opt();
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            // Overload signature or ambient declaration
            self.parse_semicolon();
            NodeIndex::NONE
        };
        let node = self.arena.add_node(
            syntax_kind_ext::FUNCTION_DECLARATION,
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

    /// `(a, b?: T, ...rest: U[])`
    pub(crate) fn parse_parameters(&mut self) -> NodeList {
        if !self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_expected(SyntaxKind::OpenParenToken);
            return NodeList::default();
        }
        self.parse_delimited_list(
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            Self::parse_parameter,
        )
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.skip_decorators();
        // Parameter properties: `constructor(private readonly x: T)`
        let mut modifiers = modifier_flags::NONE;
        while self.peek_kind(1).is_identifier_or_contextual_keyword() {
            modifiers |= match self.token_kind() {
                SyntaxKind::PublicKeyword => modifier_flags::PUBLIC,
                SyntaxKind::PrivateKeyword => modifier_flags::PRIVATE,
                SyntaxKind::ProtectedKeyword => modifier_flags::PROTECTED,
                SyntaxKind::ReadonlyKeyword => modifier_flags::READONLY,
                _ => break,
            };
            self.next_token();
        }
        let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = if self.is_token(SyntaxKind::ThisKeyword) {
            self.parse_keyword_token()
        } else {
            self.parse_binding_name()
        };
        if name.is_none() {
            return NodeIndex::NONE;
        }
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        let node = self.arena.add_node(
            syntax_kind_ext::PARAMETER,
            pos,
            self.last_token_end,
            NodeData::Parameter(ParameterData {
                name,
                type_annotation,
                initializer,
            }),
        );
        let mut flags = modifiers;
        if rest {
            flags |= node_flags::REST;
        }
        if optional {
            flags |= node_flags::OPTIONAL;
        }
        self.arena.set_flags(node, flags);
        node
    }

    pub(crate) fn parse_function_body(&mut self) -> NodeIndex {
        self.parse_block()
    }

    fn skip_decorators(&mut self) {
        while self.parse_optional(SyntaxKind::AtToken) {
            // Decorator expressions are parsed for recovery and then dropped.
            self.parse_left_hand_side_expression();
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub(crate) fn parse_class(&mut self, pos: u32, modifiers: u32, kind: u16) -> NodeIndex {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.token_kind().is_identifier_or_contextual_keyword()
            && !self.is_token(SyntaxKind::ImplementsKeyword)
        {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters_opt();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_class_members();
        let node = self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::Class(ClassData {
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }

    fn parse_heritage_clauses(&mut self) -> Option<NodeList> {
        let mut clauses = Vec::new();
        while matches!(
            self.token_kind(),
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ) {
            let pos = self.token_pos();
            let token = self.token_kind() as u16;
            self.next_token();
            let mut types = Vec::new();
            loop {
                let type_pos = self.token_pos();
                let expression = self.parse_entity_name_expression();
                if expression.is_none() {
                    break;
                }
                let type_arguments = self.parse_type_arguments_opt();
                types.push(self.arena.add_node(
                    syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS,
                    type_pos,
                    self.last_token_end,
                    NodeData::ExprWithTypeArgs(ExprWithTypeArgsData {
                        expression,
                        type_arguments,
                    }),
                ));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            clauses.push(self.arena.add_node(
                syntax_kind_ext::HERITAGE_CLAUSE,
                pos,
                self.last_token_end,
                NodeData::Heritage(HeritageData {
                    token,
                    types: NodeList::new(types),
                }),
            ));
        }
        if clauses.is_empty() {
            None
        } else {
            Some(NodeList::new(clauses))
        }
    }

    /// `a.b.c` as nested property accesses.
    fn parse_entity_name_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let mut expression = self.parse_identifier();
        while expression.is_some() && self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name();
            expression = self.arena.add_node(
                syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
                pos,
                self.last_token_end,
                NodeData::AccessExpr(AccessExprData {
                    expression,
                    name_or_argument: name,
                }),
            );
        }
        expression
    }

    fn parse_class_members(&mut self) -> NodeList {
        let mut members = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeList::new(members);
        }
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_index;
            let member = self.parse_class_member();
            if member.is_some() {
                members.push(member);
            }
            if self.token_index == before {
                self.parse_error_at_current_token(
                    &diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                    &[],
                );
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::new(members)
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return NodeIndex::NONE;
        }
        self.skip_decorators();

        let mut modifiers = modifier_flags::NONE;
        loop {
            let flag = match self.token_kind() {
                SyntaxKind::PublicKeyword => modifier_flags::PUBLIC,
                SyntaxKind::PrivateKeyword => modifier_flags::PRIVATE,
                SyntaxKind::ProtectedKeyword => modifier_flags::PROTECTED,
                SyntaxKind::StaticKeyword => modifier_flags::STATIC,
                SyntaxKind::ReadonlyKeyword => modifier_flags::READONLY,
                SyntaxKind::AbstractKeyword => modifier_flags::ABSTRACT,
                SyntaxKind::DeclareKeyword => modifier_flags::DECLARE,
                SyntaxKind::AsyncKeyword if !self.peek_has_line_break(1) => modifier_flags::ASYNC,
                SyntaxKind::Identifier if self.token().value == "override" => modifier_flags::NONE,
                _ => break,
            };
            if !self.next_starts_class_member_name() {
                // The modifier word is the member name itself.
                break;
            }
            modifiers |= flag;
            self.next_token();
        }

        if modifiers & modifier_flags::STATIC != 0 && self.is_token(SyntaxKind::OpenBraceToken) {
            // Static initialization block
            self.parse_block();
            return NodeIndex::NONE;
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            modifiers |= modifier_flags::GENERATOR;
        }

        let accessor_kind = match self.token_kind() {
            SyntaxKind::Identifier if self.next_starts_class_member_name() => {
                match self.token().value.as_str() {
                    "get" => Some(syntax_kind_ext::GET_ACCESSOR),
                    "set" => Some(syntax_kind_ext::SET_ACCESSOR),
                    _ => None,
                }
            }
            _ => None,
        };
        if let Some(kind) = accessor_kind {
            self.next_token();
            let name = self.parse_property_name();
            return self.parse_method_rest(pos, kind, name, modifiers);
        }

        if self.is_token(SyntaxKind::Identifier)
            && self.token().value == "constructor"
            && self.peek_kind(1) == SyntaxKind::OpenParenToken
        {
            self.next_token();
            return self.parse_method_rest(
                pos,
                syntax_kind_ext::CONSTRUCTOR,
                NodeIndex::NONE,
                modifiers,
            );
        }

        if self.is_index_signature_start() {
            return self.parse_index_signature(pos);
        }

        let name = self.parse_property_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        if !optional {
            self.parse_optional(SyntaxKind::ExclamationToken);
        }

        if matches!(
            self.token_kind(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let method =
                self.parse_method_rest(pos, syntax_kind_ext::METHOD_DECLARATION, name, modifiers);
            if optional {
                self.arena.set_flags(method, node_flags::OPTIONAL);
            }
            return method;
        }

        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        let property = self.arena.add_node(
            syntax_kind_ext::PROPERTY_DECLARATION,
            pos,
            self.last_token_end,
            NodeData::PropertyDecl(PropertyDeclData {
                name,
                type_annotation,
                initializer,
            }),
        );
        self.arena.set_flags(
            property,
            modifiers | if optional { node_flags::OPTIONAL } else { 0 },
        );
        property
    }

    /// Whether the token after the current one can start a member name.
    fn next_starts_class_member_name(&self) -> bool {
        if self.peek_has_line_break(1) {
            // `static\n foo` keeps `static` as the name in ASI terms; we only
            // treat same-line words as modifiers.
            return false;
        }
        let next = self.peek_kind(1);
        next.is_identifier_or_keyword()
            || matches!(
                next,
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::AsteriskToken
                    | SyntaxKind::OpenBraceToken
            )
    }

    /// Parameters, optional return type and body (or `;`) of a method-like
    /// member whose name has already been parsed.
    pub(crate) fn parse_method_rest(
        &mut self,
        pos: u32,
        kind: u16,
        name: NodeIndex,
        modifiers: u32,
    ) -> NodeIndex {
        let type_parameters = self.parse_type_parameters_opt();
        let parameters = self.parse_parameters();
        let type_annotation = self.parse_return_type_opt();
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_function_body()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        };
        let node = self.arena.add_node(
            kind,
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

    /// Identifier, keyword, string/numeric literal or `[computed]` name.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        match self.token_kind() {
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral => self.parse_literal_node(),
            SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.next_token();
                let expression = self.parse_assignment_expression();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.arena.add_node(
                    syntax_kind_ext::COMPUTED_PROPERTY_NAME,
                    pos,
                    self.last_token_end,
                    NodeData::UnaryEx(UnaryExprDataEx { expression }),
                )
            }
            _ => self.parse_identifier_name(),
        }
    }

    // =========================================================================
    // Interfaces, type aliases, enums, namespaces
    // =========================================================================

    fn parse_interface_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters_opt();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_type_members();
        let node = self.arena.add_node(
            syntax_kind_ext::INTERFACE_DECLARATION,
            pos,
            self.last_token_end,
            NodeData::Interface(InterfaceData {
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }

    fn parse_type_alias_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters_opt();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        let node = self.arena.add_node(
            syntax_kind_ext::TYPE_ALIAS_DECLARATION,
            pos,
            self.last_token_end,
            NodeData::TypeAlias(TypeAliasData {
                name,
                type_parameters,
                type_node,
            }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }

    fn parse_enum_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        // `enum`
        self.next_token();
        let name = self.parse_identifier();
        let members = self.parse_delimited_list(
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            |p| {
                let pos = p.token_pos();
                let name = p.parse_property_name();
                let initializer = if p.parse_optional(SyntaxKind::EqualsToken) {
                    p.parse_assignment_expression()
                } else {
                    NodeIndex::NONE
                };
                p.arena.add_node(
                    syntax_kind_ext::ENUM_MEMBER,
                    pos,
                    p.last_token_end,
                    NodeData::PropertyAssignment(PropertyAssignmentData { name, initializer }),
                )
            },
        );
        let node = self.arena.add_node(
            syntax_kind_ext::ENUM_DECLARATION,
            pos,
            self.last_token_end,
            NodeData::Class(ClassData {
                name,
                type_parameters: None,
                heritage_clauses: None,
                members,
            }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }

    fn parse_module_declaration(&mut self, pos: u32, modifiers: u32) -> NodeIndex {
        let is_global = self.token().value == "global";
        let name = if is_global {
            self.parse_identifier_name()
        } else {
            // `namespace` / `module`
            self.next_token();
            if self.is_token(SyntaxKind::StringLiteral) {
                self.parse_literal_node()
            } else {
                let name_pos = self.token_pos();
                let mut name = self.parse_identifier();
                while name.is_some() && self.parse_optional(SyntaxKind::DotToken) {
                    let right = self.parse_identifier_name();
                    name = self.arena.add_node(
                        syntax_kind_ext::QUALIFIED_NAME,
                        name_pos,
                        self.last_token_end,
                        NodeData::QualifiedName(QualifiedNameData { left: name, right }),
                    );
                }
                name
            }
        };
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_block_of_kind(syntax_kind_ext::MODULE_BLOCK)
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        };
        let node = self.arena.add_node(
            syntax_kind_ext::MODULE_DECLARATION,
            pos,
            self.last_token_end,
            NodeData::ModuleDecl(ModuleDeclData { name, body }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ImportKeyword);
        let mut modifiers = modifier_flags::NONE;
        if self.is_token(SyntaxKind::TypeKeyword)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken | SyntaxKind::Identifier
            )
        {
            self.next_token();
            modifiers |= modifier_flags::TYPE_ONLY;
        }

        let mut default_binding = NodeIndex::NONE;
        let mut namespace_binding = NodeIndex::NONE;
        let mut named_bindings = None;

        if !self.is_token(SyntaxKind::StringLiteral) {
            if self.token_kind().is_identifier_or_contextual_keyword()
                && !(self.is_token(SyntaxKind::FromKeyword)
                    && self.peek_kind(1) == SyntaxKind::StringLiteral)
            {
                default_binding = self.parse_identifier();
                self.parse_optional(SyntaxKind::CommaToken);
            }
            if self.parse_optional(SyntaxKind::AsteriskToken) {
                self.parse_expected(SyntaxKind::AsKeyword);
                namespace_binding = self.parse_identifier();
            } else if self.is_token(SyntaxKind::OpenBraceToken) {
                named_bindings = Some(self.parse_delimited_list(
                    SyntaxKind::OpenBraceToken,
                    SyntaxKind::CloseBraceToken,
                    |p| p.parse_specifier(syntax_kind_ext::IMPORT_SPECIFIER),
                ));
            }
            self.parse_expected(SyntaxKind::FromKeyword);
        }

        let module_specifier = if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.parse_expected(SyntaxKind::StringLiteral);
            NodeIndex::NONE
        };
        self.skip_import_attributes();
        self.parse_semicolon();

        let node = self.arena.add_node(
            syntax_kind_ext::IMPORT_DECLARATION,
            pos,
            self.last_token_end,
            NodeData::ImportDecl(ImportDeclData {
                default_binding,
                namespace_binding,
                named_bindings,
                module_specifier,
            }),
        );
        self.arena.set_flags(node, modifiers);
        node
    }

    /// `with { type: "json" }` after a module specifier.
    fn skip_import_attributes(&mut self) {
        if self.is_token(SyntaxKind::Identifier)
            && matches!(self.token().value.as_str(), "with" | "assert")
            && self.peek_kind(1) == SyntaxKind::OpenBraceToken
            && !self.has_preceding_line_break()
        {
            self.next_token();
            self.parse_object_literal();
        }
    }

    /// `name`, `type name` or `property as name`.
    fn parse_specifier(&mut self, kind: u16) -> NodeIndex {
        let pos = self.token_pos();
        let mut flags = modifier_flags::NONE;
        if self.is_token(SyntaxKind::TypeKeyword)
            && self.peek_kind(1).is_identifier_or_keyword()
            && self.peek_kind(1) != SyntaxKind::AsKeyword
        {
            self.next_token();
            flags |= modifier_flags::TYPE_ONLY;
        }
        let first = if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.parse_identifier_name()
        };
        let (property_name, name) = if self.parse_optional(SyntaxKind::AsKeyword) {
            (first, self.parse_identifier_name())
        } else {
            (NodeIndex::NONE, first)
        };
        let node = self.arena.add_node(
            kind,
            pos,
            self.last_token_end,
            NodeData::Specifier(SpecifierData {
                property_name,
                name,
            }),
        );
        self.arena.set_flags(node, flags);
        node
    }

    fn parse_export(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::ExportKeyword);

        if self.parse_optional(SyntaxKind::DefaultKeyword) {
            let modifiers = modifier_flags::EXPORT | modifier_flags::DEFAULT;
            let is_declaration = match self.token_kind() {
                SyntaxKind::FunctionKeyword
                | SyntaxKind::ClassKeyword
                | SyntaxKind::InterfaceKeyword => true,
                SyntaxKind::AsyncKeyword | SyntaxKind::AbstractKeyword => {
                    self.is_declaration_start_at(0)
                }
                _ => false,
            };
            if is_declaration {
                return self.parse_declaration(pos, modifiers);
            }
            return self.parse_export_assignment(pos);
        }

        if self.is_token(SyntaxKind::EqualsToken) {
            self.next_token();
            return self.parse_export_assignment(pos);
        }

        let mut modifiers = modifier_flags::NONE;
        if self.is_token(SyntaxKind::TypeKeyword)
            && matches!(
                self.peek_kind(1),
                SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken
            )
        {
            self.next_token();
            modifiers |= modifier_flags::TYPE_ONLY;
        }

        if matches!(
            self.token_kind(),
            SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken
        ) {
            let specifiers = if self.parse_optional(SyntaxKind::AsteriskToken) {
                if self.parse_optional(SyntaxKind::AsKeyword) {
                    self.parse_identifier_name();
                }
                NodeList::default()
            } else {
                self.parse_delimited_list(
                    SyntaxKind::OpenBraceToken,
                    SyntaxKind::CloseBraceToken,
                    |p| p.parse_specifier(syntax_kind_ext::EXPORT_SPECIFIER),
                )
            };
            let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
                if self.is_token(SyntaxKind::StringLiteral) {
                    self.parse_literal_node()
                } else {
                    self.parse_expected(SyntaxKind::StringLiteral);
                    NodeIndex::NONE
                }
            } else {
                NodeIndex::NONE
            };
            self.parse_semicolon();
            let node = self.arena.add_node(
                syntax_kind_ext::EXPORT_DECLARATION,
                pos,
                self.last_token_end,
                NodeData::ExportDecl(ExportDeclData {
                    specifiers,
                    module_specifier,
                }),
            );
            self.arena.set_flags(node, modifiers);
            return node;
        }

        if self.is_token(SyntaxKind::DeclareKeyword) && self.is_declaration_start_at(1) {
            self.next_token();
            return self.parse_declaration(pos, modifier_flags::EXPORT | modifier_flags::DECLARE);
        }
        self.parse_declaration(pos, modifier_flags::EXPORT)
    }

    fn parse_export_assignment(&mut self, pos: u32) -> NodeIndex {
        let expression = self.parse_assignment_expression();
        self.parse_semicolon();
        self.arena.add_node(
            syntax_kind_ext::EXPORT_ASSIGNMENT,
            pos,
            self.last_token_end,
            NodeData::UnaryEx(UnaryExprDataEx { expression }),
        )
    }
}
