//! AST node storage.
//!
//! A `Node` is a small `Copy` header (kind, flags, span) plus a `data_index`
//! into the arena's data pool. Kind-specific payloads live in `NodeData` and
//! are reached through the typed `get_*` accessors in `node_access`.

use super::base::{NodeIndex, NodeList};
use serde::Serialize;

/// Node header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    /// `SyntaxKind` (tokens, identifiers, literals) or a `syntax_kind_ext` value
    pub kind: u16,
    /// `node_flags` and `modifier_flags` bits
    pub flags: u32,
    pub pos: u32,
    pub end: u32,
    /// Index into `NodeArena::data`, `u32::MAX` when the node has no payload
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Node::NO_DATA
    }

    #[inline]
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// Information every node carries besides its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

impl Default for ExtendedNodeInfo {
    fn default() -> Self {
        ExtendedNodeInfo {
            parent: NodeIndex::NONE,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// String, numeric, template and regex literals, plus keyword type names.
#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

/// `[expr]` property names, parenthesized expressions, spreads, `await`,
/// `typeof`, `void`, `delete`, non-null assertions.
#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprDataEx {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    /// Identifier, binding pattern, or `this`
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Property, method, call, construct and index signatures of type members.
#[derive(Clone, Debug, Serialize)]
pub struct SignatureData {
    /// `NONE` for call and construct signatures
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    /// `None` for property signatures
    pub parameters: Option<NodeList>,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyDeclData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

/// Function declarations and expressions, arrows, methods, accessors and
/// constructors.
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
    /// Block, expression (arrow bodies), or `NONE` for signatures-only
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypePredicateData {
    pub parameter_name: NodeIndex,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeRefData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

/// Function and constructor types.
#[derive(Clone, Debug, Serialize)]
pub struct FunctionTypeData {
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

/// Array element types, parenthesized types, type operators, and the
/// queried name of `typeof` types.
#[derive(Clone, Debug, Serialize)]
pub struct WrappedTypeData {
    pub type_node: NodeIndex,
}

/// Unions, intersections, tuples and indexed access (`[object, index]`).
#[derive(Clone, Debug, Serialize)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalTypeData {
    pub check_type: NodeIndex,
    pub extends_type: NodeIndex,
    pub true_type: NodeIndex,
    pub false_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingElementData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Array and object literal expressions.
#[derive(Clone, Debug, Serialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    /// Identifier name for property access, argument for element access
    pub name_or_argument: NodeIndex,
}

/// Call and `new` expressions.
#[derive(Clone, Debug, Serialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
    /// `None` for `new X` without an argument list
    pub arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnaryExprData {
    pub operator: u16,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// `as` and `satisfies` expressions.
#[derive(Clone, Debug, Serialize)]
pub struct TypeAssertionData {
    pub expression: NodeIndex,
    pub type_node: NodeIndex,
}

/// `name: value` and shorthand `name` members of object literals.
#[derive(Clone, Debug, Serialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    /// `NONE` for shorthand assignments
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
}

/// Variable statements and declaration lists.
#[derive(Clone, Debug, Serialize)]
pub struct VariableData {
    /// Declaration list for statements, declarations for lists
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `for (;;)`, `while` and `do` loops.
#[derive(Clone, Debug, Serialize)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForInOfData {
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
}

/// `break` and `continue`.
#[derive(Clone, Debug, Serialize)]
pub struct JumpData {
    pub label: NodeIndex,
}

/// `return` and `throw`.
#[derive(Clone, Debug, Serialize)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub clauses: NodeList,
}

/// `case` and `default` clauses.
#[derive(Clone, Debug, Serialize)]
pub struct CaseClauseData {
    /// `NONE` for `default`
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct CatchClauseData {
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

/// Class declarations and expressions.
#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct InterfaceData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub heritage_clauses: Option<NodeList>,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeAliasData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct HeritageData {
    /// `ExtendsKeyword` or `ImplementsKeyword`
    pub token: u16,
    pub types: NodeList,
}

/// `Base<T>` in heritage clauses.
#[derive(Clone, Debug, Serialize)]
pub struct ExprWithTypeArgsData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportDeclData {
    /// Default import binding
    pub default_binding: NodeIndex,
    /// `* as ns` binding
    pub namespace_binding: NodeIndex,
    pub named_bindings: Option<NodeList>,
    pub module_specifier: NodeIndex,
}

/// `name` or `property as name` inside import and export braces.
#[derive(Clone, Debug, Serialize)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

/// `namespace A { }`, `module "x" { }` and `declare global { }`.
#[derive(Clone, Debug, Serialize)]
pub struct ModuleDeclData {
    /// Identifier, qualified name or string literal
    pub name: NodeIndex,
    /// `MODULE_BLOCK`, or `NONE` for `declare module "x";`
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportDeclData {
    pub specifiers: NodeList,
    pub module_specifier: NodeIndex,
}

/// Kind-specific payload of a node.
#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    Identifier(IdentifierData),
    Literal(LiteralData),
    SourceFile(SourceFileData),
    QualifiedName(QualifiedNameData),
    UnaryEx(UnaryExprDataEx),
    TypeParameter(TypeParameterData),
    Parameter(ParameterData),
    Signature(SignatureData),
    PropertyDecl(PropertyDeclData),
    Function(FunctionData),
    TypePredicate(TypePredicateData),
    TypeRef(TypeRefData),
    FunctionType(FunctionTypeData),
    TypeLiteral(TypeLiteralData),
    WrappedType(WrappedTypeData),
    CompositeType(CompositeTypeData),
    ConditionalType(ConditionalTypeData),
    BindingPattern(BindingPatternData),
    BindingElement(BindingElementData),
    LiteralExpr(LiteralExprData),
    AccessExpr(AccessExprData),
    CallExpr(CallExprData),
    Unary(UnaryExprData),
    Binary(BinaryExprData),
    Conditional(ConditionalExprData),
    TypeAssertion(TypeAssertionData),
    PropertyAssignment(PropertyAssignmentData),
    Block(BlockData),
    Variable(VariableData),
    VariableDeclaration(VariableDeclarationData),
    ExprStatement(ExprStatementData),
    If(IfStatementData),
    Loop(LoopData),
    ForInOf(ForInOfData),
    Jump(JumpData),
    Return(ReturnData),
    Switch(SwitchData),
    CaseClause(CaseClauseData),
    Try(TryData),
    CatchClause(CatchClauseData),
    Class(ClassData),
    Interface(InterfaceData),
    TypeAlias(TypeAliasData),
    Heritage(HeritageData),
    ExprWithTypeArgs(ExprWithTypeArgsData),
    ImportDecl(ImportDeclData),
    Specifier(SpecifierData),
    ExportDecl(ExportDeclData),
    ModuleDecl(ModuleDeclData),
}

fn push_list(out: &mut Vec<NodeIndex>, list: &Option<NodeList>) {
    if let Some(list) = list {
        out.extend(list.iter());
    }
}

impl NodeData {
    /// Child nodes in source order. `NONE` slots are skipped.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        match self {
            NodeData::Identifier(_) | NodeData::Literal(_) => {}
            NodeData::SourceFile(d) => out.extend(d.statements.iter()),
            NodeData::QualifiedName(d) => out.extend([d.left, d.right]),
            NodeData::UnaryEx(d) => out.push(d.expression),
            NodeData::TypeParameter(d) => out.extend([d.name, d.constraint, d.default]),
            NodeData::Parameter(d) => out.extend([d.name, d.type_annotation, d.initializer]),
            NodeData::Signature(d) => {
                out.push(d.name);
                push_list(&mut out, &d.type_parameters);
                push_list(&mut out, &d.parameters);
                out.push(d.type_annotation);
            }
            NodeData::PropertyDecl(d) => out.extend([d.name, d.type_annotation, d.initializer]),
            NodeData::Function(d) => {
                out.push(d.name);
                push_list(&mut out, &d.type_parameters);
                out.extend(d.parameters.iter());
                out.extend([d.type_annotation, d.body]);
            }
            NodeData::TypePredicate(d) => out.extend([d.parameter_name, d.type_node]),
            NodeData::TypeRef(d) => {
                out.push(d.type_name);
                push_list(&mut out, &d.type_arguments);
            }
            NodeData::FunctionType(d) => {
                push_list(&mut out, &d.type_parameters);
                out.extend(d.parameters.iter());
                out.push(d.type_annotation);
            }
            NodeData::TypeLiteral(d) => out.extend(d.members.iter()),
            NodeData::WrappedType(d) => out.push(d.type_node),
            NodeData::CompositeType(d) => out.extend(d.types.iter()),
            NodeData::ConditionalType(d) => {
                out.extend([d.check_type, d.extends_type, d.true_type, d.false_type]);
            }
            NodeData::BindingPattern(d) => out.extend(d.elements.iter()),
            NodeData::BindingElement(d) => out.extend([d.property_name, d.name, d.initializer]),
            NodeData::LiteralExpr(d) => out.extend(d.elements.iter()),
            NodeData::AccessExpr(d) => out.extend([d.expression, d.name_or_argument]),
            NodeData::CallExpr(d) => {
                out.push(d.expression);
                push_list(&mut out, &d.type_arguments);
                push_list(&mut out, &d.arguments);
            }
            NodeData::Unary(d) => out.push(d.operand),
            NodeData::Binary(d) => out.extend([d.left, d.right]),
            NodeData::Conditional(d) => out.extend([d.condition, d.when_true, d.when_false]),
            NodeData::TypeAssertion(d) => out.extend([d.expression, d.type_node]),
            NodeData::PropertyAssignment(d) => out.extend([d.name, d.initializer]),
            NodeData::Block(d) => out.extend(d.statements.iter()),
            NodeData::Variable(d) => out.extend(d.declarations.iter()),
            NodeData::VariableDeclaration(d) => {
                out.extend([d.name, d.type_annotation, d.initializer]);
            }
            NodeData::ExprStatement(d) => out.push(d.expression),
            NodeData::If(d) => out.extend([d.expression, d.then_statement, d.else_statement]),
            NodeData::Loop(d) => {
                out.extend([d.initializer, d.condition, d.incrementor, d.statement]);
            }
            NodeData::ForInOf(d) => out.extend([d.initializer, d.expression, d.statement]),
            NodeData::Jump(d) => out.push(d.label),
            NodeData::Return(d) => out.push(d.expression),
            NodeData::Switch(d) => {
                out.push(d.expression);
                out.extend(d.clauses.iter());
            }
            NodeData::CaseClause(d) => {
                out.push(d.expression);
                out.extend(d.statements.iter());
            }
            NodeData::Try(d) => out.extend([d.try_block, d.catch_clause, d.finally_block]),
            NodeData::CatchClause(d) => out.extend([d.variable_declaration, d.block]),
            NodeData::Class(d) => {
                out.push(d.name);
                push_list(&mut out, &d.type_parameters);
                push_list(&mut out, &d.heritage_clauses);
                out.extend(d.members.iter());
            }
            NodeData::Interface(d) => {
                out.push(d.name);
                push_list(&mut out, &d.type_parameters);
                push_list(&mut out, &d.heritage_clauses);
                out.extend(d.members.iter());
            }
            NodeData::TypeAlias(d) => {
                out.push(d.name);
                push_list(&mut out, &d.type_parameters);
                out.push(d.type_node);
            }
            NodeData::Heritage(d) => out.extend(d.types.iter()),
            NodeData::ExprWithTypeArgs(d) => {
                out.push(d.expression);
                push_list(&mut out, &d.type_arguments);
            }
            NodeData::ImportDecl(d) => {
                out.extend([d.default_binding, d.namespace_binding]);
                push_list(&mut out, &d.named_bindings);
                out.push(d.module_specifier);
            }
            NodeData::Specifier(d) => {
                // `property as name`: the property name comes first in source.
                out.extend([d.property_name, d.name]);
            }
            NodeData::ExportDecl(d) => {
                out.extend(d.specifiers.iter());
                out.push(d.module_specifier);
            }
            NodeData::ModuleDecl(d) => out.extend([d.name, d.body]),
        }
        out.retain(|child| child.is_some());
        out
    }
}

/// Arena holding every node of one parsed file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended_info: Vec<ExtendedNodeInfo>,
    pub data: Vec<NodeData>,
}
