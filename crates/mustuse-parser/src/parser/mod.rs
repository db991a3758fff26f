//! Parser module: AST storage, navigation, and the recursive-descent parser.

mod base;
pub mod node;
mod node_access;
mod node_arena;
mod state;
mod state_expressions;
mod state_statements;
mod state_types;

pub use base::{NodeIndex, NodeList};
pub use node::*;
pub use node_access::is_function_like_kind;
pub use state::ParserState;

/// Extended syntax kinds for AST nodes (beyond the scanner's token kinds).
pub mod syntax_kind_ext {
    pub const SOURCE_FILE: u16 = 300;
    // Names
    pub const QUALIFIED_NAME: u16 = 301;
    pub const COMPUTED_PROPERTY_NAME: u16 = 302;
    // Signature elements
    pub const TYPE_PARAMETER: u16 = 303;
    pub const PARAMETER: u16 = 304;
    // Type members / class members
    pub const PROPERTY_SIGNATURE: u16 = 305;
    pub const PROPERTY_DECLARATION: u16 = 306;
    pub const METHOD_SIGNATURE: u16 = 307;
    pub const METHOD_DECLARATION: u16 = 308;
    pub const CONSTRUCTOR: u16 = 309;
    pub const GET_ACCESSOR: u16 = 310;
    pub const SET_ACCESSOR: u16 = 311;
    pub const CALL_SIGNATURE: u16 = 312;
    pub const CONSTRUCT_SIGNATURE: u16 = 313;
    pub const INDEX_SIGNATURE: u16 = 314;
    // Types
    pub const TYPE_PREDICATE: u16 = 320;
    pub const TYPE_REFERENCE: u16 = 321;
    pub const FUNCTION_TYPE: u16 = 322;
    pub const CONSTRUCTOR_TYPE: u16 = 323;
    pub const TYPE_QUERY: u16 = 324;
    pub const TYPE_LITERAL: u16 = 325;
    pub const ARRAY_TYPE: u16 = 326;
    pub const TUPLE_TYPE: u16 = 327;
    pub const UNION_TYPE: u16 = 328;
    pub const INTERSECTION_TYPE: u16 = 329;
    pub const CONDITIONAL_TYPE: u16 = 330;
    pub const PARENTHESIZED_TYPE: u16 = 331;
    pub const TYPE_OPERATOR: u16 = 332;
    pub const INDEXED_ACCESS_TYPE: u16 = 333;
    pub const MAPPED_TYPE: u16 = 334;
    pub const LITERAL_TYPE: u16 = 335;
    pub const KEYWORD_TYPE: u16 = 336;
    // Binding patterns
    pub const OBJECT_BINDING_PATTERN: u16 = 340;
    pub const ARRAY_BINDING_PATTERN: u16 = 341;
    pub const BINDING_ELEMENT: u16 = 342;
    // Expressions
    pub const ARRAY_LITERAL_EXPRESSION: u16 = 350;
    pub const OBJECT_LITERAL_EXPRESSION: u16 = 351;
    pub const PROPERTY_ACCESS_EXPRESSION: u16 = 352;
    pub const ELEMENT_ACCESS_EXPRESSION: u16 = 353;
    pub const CALL_EXPRESSION: u16 = 354;
    pub const NEW_EXPRESSION: u16 = 355;
    pub const PARENTHESIZED_EXPRESSION: u16 = 356;
    pub const FUNCTION_EXPRESSION: u16 = 357;
    pub const ARROW_FUNCTION: u16 = 358;
    pub const DELETE_EXPRESSION: u16 = 359;
    pub const TYPE_OF_EXPRESSION: u16 = 360;
    pub const VOID_EXPRESSION: u16 = 361;
    pub const AWAIT_EXPRESSION: u16 = 362;
    pub const PREFIX_UNARY_EXPRESSION: u16 = 363;
    pub const POSTFIX_UNARY_EXPRESSION: u16 = 364;
    pub const BINARY_EXPRESSION: u16 = 365;
    pub const CONDITIONAL_EXPRESSION: u16 = 366;
    pub const SPREAD_ELEMENT: u16 = 367;
    pub const AS_EXPRESSION: u16 = 368;
    pub const SATISFIES_EXPRESSION: u16 = 369;
    pub const NON_NULL_EXPRESSION: u16 = 370;
    pub const CLASS_EXPRESSION: u16 = 371;
    // Object literal members
    pub const PROPERTY_ASSIGNMENT: u16 = 380;
    pub const SHORTHAND_PROPERTY_ASSIGNMENT: u16 = 381;
    pub const SPREAD_ASSIGNMENT: u16 = 382;
    // Statements
    pub const BLOCK: u16 = 390;
    pub const VARIABLE_STATEMENT: u16 = 391;
    pub const EMPTY_STATEMENT: u16 = 392;
    pub const EXPRESSION_STATEMENT: u16 = 393;
    pub const IF_STATEMENT: u16 = 394;
    pub const DO_STATEMENT: u16 = 395;
    pub const WHILE_STATEMENT: u16 = 396;
    pub const FOR_STATEMENT: u16 = 397;
    pub const FOR_IN_STATEMENT: u16 = 398;
    pub const FOR_OF_STATEMENT: u16 = 399;
    pub const CONTINUE_STATEMENT: u16 = 400;
    pub const BREAK_STATEMENT: u16 = 401;
    pub const RETURN_STATEMENT: u16 = 402;
    pub const SWITCH_STATEMENT: u16 = 403;
    pub const THROW_STATEMENT: u16 = 404;
    pub const TRY_STATEMENT: u16 = 405;
    pub const VARIABLE_DECLARATION: u16 = 406;
    pub const VARIABLE_DECLARATION_LIST: u16 = 407;
    pub const FUNCTION_DECLARATION: u16 = 408;
    pub const CLASS_DECLARATION: u16 = 409;
    pub const INTERFACE_DECLARATION: u16 = 410;
    pub const TYPE_ALIAS_DECLARATION: u16 = 411;
    pub const CASE_CLAUSE: u16 = 412;
    pub const DEFAULT_CLAUSE: u16 = 413;
    pub const CATCH_CLAUSE: u16 = 414;
    pub const HERITAGE_CLAUSE: u16 = 415;
    pub const EXPRESSION_WITH_TYPE_ARGUMENTS: u16 = 416;
    pub const IMPORT_DECLARATION: u16 = 417;
    pub const IMPORT_SPECIFIER: u16 = 418;
    pub const EXPORT_DECLARATION: u16 = 419;
    pub const EXPORT_ASSIGNMENT: u16 = 420;
    pub const EXPORT_SPECIFIER: u16 = 421;
    pub const ENUM_DECLARATION: u16 = 422;
    pub const ENUM_MEMBER: u16 = 423;
    pub const MODULE_DECLARATION: u16 = 424;
    pub const MODULE_BLOCK: u16 = 425;
}

/// Flags stored on `Node::flags`.
pub mod node_flags {
    pub const NONE: u32 = 0;
    pub const LET: u32 = 1 << 0;
    pub const CONST: u32 = 1 << 1;
    /// `?.` on property access / element access / call
    pub const OPTIONAL_CHAIN: u32 = 1 << 2;
    /// `x?` on parameters, properties and signatures
    pub const OPTIONAL: u32 = 1 << 3;
    /// `...x` on parameters and binding elements
    pub const REST: u32 = 1 << 4;
    /// Node was produced during error recovery
    pub const THIS_NODE_HAS_ERROR: u32 = 1 << 5;
}

/// Modifier flags stored on `Node::flags` above the node-flag bits.
pub mod modifier_flags {
    pub const NONE: u32 = 0;
    pub const EXPORT: u32 = 1 << 8;
    pub const DECLARE: u32 = 1 << 9;
    pub const ASYNC: u32 = 1 << 10;
    pub const STATIC: u32 = 1 << 11;
    pub const READONLY: u32 = 1 << 12;
    pub const PUBLIC: u32 = 1 << 13;
    pub const PRIVATE: u32 = 1 << 14;
    pub const PROTECTED: u32 = 1 << 15;
    pub const ABSTRACT: u32 = 1 << 16;
    pub const DEFAULT: u32 = 1 << 17;
    pub const GENERATOR: u32 = 1 << 18;
    pub const TYPE_ONLY: u32 = 1 << 19;
}
