//! NodeArena access methods: typed payload accessors and tree navigation.

use super::base::NodeIndex;
use super::node::*;
use super::syntax_kind_ext;
use mustuse_scanner::SyntaxKind;

macro_rules! data_accessors {
    ($($(#[$meta:meta])* $name:ident => $variant:ident($ty:ty);)*) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $name(&self, node: &Node) -> Option<&$ty> {
                match self.data_of(node)? {
                    NodeData::$variant(data) => Some(data),
                    _ => None,
                }
            }
        )*
    };
}

impl NodeArena {
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_extended_mut(&mut self, index: NodeIndex) -> Option<&mut ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn data_of(&self, node: &Node) -> Option<&NodeData> {
        if node.has_data() {
            self.data.get(node.data_index as usize)
        } else {
            None
        }
    }

    data_accessors! {
        /// Identifier payload. Also present on contextual-keyword names.
        get_identifier => Identifier(IdentifierData);
        get_literal => Literal(LiteralData);
        get_source_file => SourceFile(SourceFileData);
        get_qualified_name => QualifiedName(QualifiedNameData);
        /// Parenthesized, spread, `await`, `typeof`, `void`, `delete`, `!`
        /// and computed property names.
        get_unary_expr_ex => UnaryEx(UnaryExprDataEx);
        get_type_parameter => TypeParameter(TypeParameterData);
        get_parameter => Parameter(ParameterData);
        get_signature => Signature(SignatureData);
        get_property_decl => PropertyDecl(PropertyDeclData);
        /// Every function-like node, arrows and methods included.
        get_function => Function(FunctionData);
        get_type_predicate => TypePredicate(TypePredicateData);
        get_type_ref => TypeRef(TypeRefData);
        get_function_type => FunctionType(FunctionTypeData);
        get_type_literal => TypeLiteral(TypeLiteralData);
        get_wrapped_type => WrappedType(WrappedTypeData);
        get_composite_type => CompositeType(CompositeTypeData);
        get_conditional_type => ConditionalType(ConditionalTypeData);
        get_binding_pattern => BindingPattern(BindingPatternData);
        get_binding_element => BindingElement(BindingElementData);
        get_literal_expr => LiteralExpr(LiteralExprData);
        get_access_expr => AccessExpr(AccessExprData);
        /// Call and `new` expressions.
        get_call_expr => CallExpr(CallExprData);
        get_unary_expr => Unary(UnaryExprData);
        get_binary_expr => Binary(BinaryExprData);
        get_conditional_expr => Conditional(ConditionalExprData);
        get_type_assertion => TypeAssertion(TypeAssertionData);
        get_property_assignment => PropertyAssignment(PropertyAssignmentData);
        get_block => Block(BlockData);
        get_variable => Variable(VariableData);
        get_variable_declaration => VariableDeclaration(VariableDeclarationData);
        get_expr_statement => ExprStatement(ExprStatementData);
        get_if_statement => If(IfStatementData);
        get_loop => Loop(LoopData);
        get_for_in_of => ForInOf(ForInOfData);
        get_jump => Jump(JumpData);
        /// `return` and `throw` statements.
        get_return_statement => Return(ReturnData);
        get_switch => Switch(SwitchData);
        get_case_clause => CaseClause(CaseClauseData);
        get_try => Try(TryData);
        get_catch_clause => CatchClause(CatchClauseData);
        get_class => Class(ClassData);
        get_interface => Interface(InterfaceData);
        get_type_alias => TypeAlias(TypeAliasData);
        get_heritage_clause => Heritage(HeritageData);
        get_expr_type_args => ExprWithTypeArgs(ExprWithTypeArgsData);
        get_import_decl => ImportDecl(ImportDeclData);
        get_specifier => Specifier(SpecifierData);
        get_export_decl => ExportDecl(ExportDeclData);
        get_module_decl => ModuleDecl(ModuleDeclData);
    }

    /// Parent of a node, `NONE` for the root and for unknown indices.
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    /// Children of a node in source order.
    pub fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.get(index)
            .and_then(|node| self.data_of(node))
            .map(NodeData::children)
            .unwrap_or_default()
    }

    #[inline]
    pub fn kind_of(&self, index: NodeIndex) -> Option<u16> {
        self.get(index).map(|node| node.kind)
    }

    /// Text of an identifier node.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_identifier(node)
            .map(|ident| ident.escaped_text.as_str())
    }

    /// Text of a property name: identifiers, string and numeric literals.
    pub fn property_name_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        if let Some(ident) = self.get_identifier(node) {
            return Some(&ident.escaped_text);
        }
        if node.kind == SyntaxKind::StringLiteral as u16
            || node.kind == SyntaxKind::NumericLiteral as u16
            || node.kind == SyntaxKind::NoSubstitutionTemplateLiteral as u16
        {
            return self.get_literal(node).map(|lit| lit.text.as_str());
        }
        None
    }

    /// Strip any number of parentheses around an expression.
    pub fn skip_parentheses(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(node) = self.get(index) {
            if node.kind != syntax_kind_ext::PARENTHESIZED_EXPRESSION {
                break;
            }
            match self.get_unary_expr_ex(node) {
                Some(paren) => index = paren.expression,
                None => break,
            }
        }
        index
    }

    pub fn get_source_file_at(&self, root: NodeIndex) -> Option<&SourceFileData> {
        self.get(root).and_then(|node| self.get_source_file(node))
    }

    /// Root statements of a source file node.
    pub fn source_file_statements(&self, root: NodeIndex) -> &[NodeIndex] {
        self.get(root)
            .and_then(|node| self.get_source_file(node))
            .map_or(&[], |file| file.statements.nodes.as_slice())
    }
}

impl Node {
    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.kind == SyntaxKind::Identifier as u16
    }

    /// Nodes that open a new function scope.
    #[inline]
    pub fn is_function_like(&self) -> bool {
        is_function_like_kind(self.kind)
    }

    #[inline]
    pub fn is_type_node(&self) -> bool {
        (syntax_kind_ext::TYPE_PREDICATE..=syntax_kind_ext::KEYWORD_TYPE).contains(&self.kind)
    }
}

pub fn is_function_like_kind(kind: u16) -> bool {
    matches!(
        kind,
        syntax_kind_ext::FUNCTION_DECLARATION
            | syntax_kind_ext::FUNCTION_EXPRESSION
            | syntax_kind_ext::ARROW_FUNCTION
            | syntax_kind_ext::METHOD_DECLARATION
            | syntax_kind_ext::CONSTRUCTOR
            | syntax_kind_ext::GET_ACCESSOR
            | syntax_kind_ext::SET_ACCESSOR
    )
}
