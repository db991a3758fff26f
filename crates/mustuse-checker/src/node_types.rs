//! Node types of a checked file, as seen by rules.
//!
//! `NodeTypes` is the finished product of type computation: the interner
//! and one type per expression node and symbol reference of the checked
//! file. Rules query it through `TypeOracle` and never touch the checker's
//! caches.

use mustuse_binder::BinderState;
use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex};
use mustuse_solver::{TypeFormatter, TypeId, TypeInterner, has_protocol};
use rustc_hash::FxHashMap;

/// Type queries a rule needs.
pub trait TypeOracle {
    /// Type of an expression node. Nodes without a recorded type are `any`.
    fn type_of(&self, node: NodeIndex) -> TypeId;

    /// Whether some union part of `type_id` has every member of `protocol`.
    fn has_protocol(&self, type_id: TypeId, protocol: &[String]) -> bool;

    fn format_type(&self, type_id: TypeId) -> String;

    /// Whether the value `node` evaluates to is must-use under `protocol`.
    fn is_must_use(&self, node: NodeIndex, protocol: &[String]) -> bool {
        self.has_protocol(self.type_of(node), protocol)
    }
}

pub struct NodeTypes {
    interner: TypeInterner,
    types: FxHashMap<u32, TypeId>,
}

impl NodeTypes {
    pub(crate) fn new(interner: TypeInterner, types: FxHashMap<u32, TypeId>) -> Self {
        NodeTypes { interner, types }
    }

    /// No types at all: every query answers `any`.
    pub fn empty() -> Self {
        NodeTypes::new(TypeInterner::new(), FxHashMap::default())
    }

    pub fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Rendered type of `node`, for logs and tests.
    pub fn display(&self, node: NodeIndex) -> String {
        self.format_type(self.type_of(node))
    }
}

impl TypeOracle for NodeTypes {
    fn type_of(&self, node: NodeIndex) -> TypeId {
        self.types.get(&node.0).copied().unwrap_or(TypeId::ANY)
    }

    fn has_protocol(&self, type_id: TypeId, protocol: &[String]) -> bool {
        has_protocol(&self.interner, type_id, protocol)
    }

    fn format_type(&self, type_id: TypeId) -> String {
        TypeFormatter::new(&self.interner).format(type_id)
    }
}

/// Expression kinds whose types are recorded.
pub(crate) fn is_recorded_expression(kind: u16) -> bool {
    (syntax_kind_ext::ARRAY_LITERAL_EXPRESSION..=syntax_kind_ext::CLASS_EXPRESSION).contains(&kind)
}

/// Nodes of the checked file that get a recorded type: expressions and
/// the identifiers that reference a symbol, in arena order.
pub(crate) fn recorded_nodes(arena: &NodeArena, binder: &BinderState) -> Vec<NodeIndex> {
    let mut nodes: Vec<NodeIndex> = (0..arena.nodes.len() as u32)
        .map(NodeIndex)
        .filter(|&index| arena.get(index).is_some_and(|node| is_recorded_expression(node.kind)))
        .collect();
    nodes.extend(
        binder
            .symbols
            .iter()
            .flat_map(|symbol| symbol.references.iter().map(|reference| reference.node)),
    );
    nodes.sort_unstable();
    nodes.dedup();
    nodes
}
