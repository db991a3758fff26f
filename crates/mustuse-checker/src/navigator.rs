//! Syntax navigation helpers for rules.
//!
//! Parent/child questions about the checked file's tree: which member
//! access a value is the object of, whether that access is invoked, which
//! nodes are rule candidates. Parentheses are transparent throughout.

use mustuse_parser::parser::syntax_kind_ext;
use mustuse_parser::{NodeArena, NodeIndex};

/// First ancestor of `node` that is not a parenthesized expression, with
/// the child of that ancestor `node` sits under.
pub fn parent_skipping_parens(arena: &NodeArena, node: NodeIndex) -> (NodeIndex, NodeIndex) {
    let mut child = node;
    let mut parent = arena.parent_of(node);
    while arena.kind_of(parent) == Some(syntax_kind_ext::PARENTHESIZED_EXPRESSION) {
        child = parent;
        parent = arena.parent_of(parent);
    }
    (parent, child)
}

/// Property access whose object is `node` (`node.name`).
pub fn member_access_of(arena: &NodeArena, node: NodeIndex) -> Option<NodeIndex> {
    let (parent, _) = parent_skipping_parens(arena, node);
    let parent_node = arena.get(parent)?;
    if parent_node.kind != syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION {
        return None;
    }
    let access = arena.get_access_expr(parent_node)?;
    (arena.skip_parentheses(access.expression) == node).then_some(parent)
}

/// Member name of a property access.
pub fn member_name(arena: &NodeArena, access: NodeIndex) -> Option<&str> {
    let node = arena.get(access)?;
    let data = arena.get_access_expr(node)?;
    arena.identifier_text(data.name_or_argument)
}

/// Call that invokes `access` as its callee (`access(...)`).
pub fn invoking_call(arena: &NodeArena, access: NodeIndex) -> Option<NodeIndex> {
    let (parent, _) = parent_skipping_parens(arena, access);
    let parent_node = arena.get(parent)?;
    if parent_node.kind != syntax_kind_ext::CALL_EXPRESSION {
        return None;
    }
    let call = arena.get_call_expr(parent_node)?;
    (arena.skip_parentheses(call.expression) == access).then_some(parent)
}

#[inline]
pub fn is_member_called(arena: &NodeArena, access: NodeIndex) -> bool {
    invoking_call(arena, access).is_some()
}

/// Parents under which a value-producing node is not judged: type-only
/// wrappers, type syntax, and declaration headers.
pub fn is_ignored_parent(arena: &NodeArena, node: NodeIndex) -> bool {
    let Some(parent) = arena.get(arena.parent_of(node)) else {
        return false;
    };
    parent.is_type_node()
        || matches!(
            parent.kind,
            syntax_kind_ext::AS_EXPRESSION
                | syntax_kind_ext::SATISFIES_EXPRESSION
                | syntax_kind_ext::NON_NULL_EXPRESSION
                | syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS
                | syntax_kind_ext::HERITAGE_CLAUSE
                | syntax_kind_ext::ENUM_MEMBER
                | syntax_kind_ext::CLASS_DECLARATION
                | syntax_kind_ext::FUNCTION_DECLARATION
                | syntax_kind_ext::METHOD_DECLARATION
                | syntax_kind_ext::PROPERTY_DECLARATION
        )
}

/// Whether `node` is a call directly under `await` (`await f()`); the
/// await expression is judged instead.
pub fn is_awaited_call(arena: &NodeArena, node: NodeIndex) -> bool {
    arena.kind_of(node) == Some(syntax_kind_ext::CALL_EXPRESSION)
        && arena.kind_of(arena.parent_of(node)) == Some(syntax_kind_ext::AWAIT_EXPRESSION)
}

#[inline]
pub fn is_candidate_kind(kind: u16) -> bool {
    matches!(
        kind,
        syntax_kind_ext::CALL_EXPRESSION
            | syntax_kind_ext::NEW_EXPRESSION
            | syntax_kind_ext::AWAIT_EXPRESSION
    )
}

/// Nodes that end an upward walk: a block or the file.
#[inline]
pub fn is_scope_boundary(kind: u16) -> bool {
    matches!(
        kind,
        syntax_kind_ext::BLOCK | syntax_kind_ext::MODULE_BLOCK | syntax_kind_ext::SOURCE_FILE
    )
}

/// Call, `new` and `await` nodes under `root`, in document order (outer
/// before inner, left before right).
pub fn candidate_sites(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    let mut visited = 0usize;
    while let Some(current) = stack.pop() {
        visited += 1;
        if visited > arena.nodes.len() {
            break;
        }
        if arena.kind_of(current).is_some_and(is_candidate_kind) {
            found.push(current);
        }
        let mut children = arena.get_children(current);
        children.reverse();
        stack.extend(children.into_iter().filter(|child| child.is_some()));
    }
    found
}
