//! Usage classification of one occurrence of a must-use value.

use mustuse_binder::{BinderState, SymbolId};
use mustuse_common::limits::MAX_TREE_WALK_ITERATIONS;
use mustuse_parser::parser::{Node, syntax_kind_ext};
use mustuse_parser::{NodeArena, NodeIndex};
use mustuse_scanner::SyntaxKind;

use crate::navigator::{
    invoking_call, is_member_called, is_scope_boundary, member_access_of, member_name,
};
use crate::options::MustUseResultOptions;

use super::Verdict;

/// Handling by invoking a member on the value: a terminal method directly
/// (`r.unwrap()`), or after any number of chain methods
/// (`r.map(f).unwrapOr(x)`). A member that is named but not invoked
/// (`r.unwrapOr`) handles nothing.
pub(super) fn method_handling(
    arena: &NodeArena,
    options: &MustUseResultOptions,
    node: NodeIndex,
) -> Option<Verdict> {
    let mut current = node;
    let mut via_chain = false;
    for _ in 0..MAX_TREE_WALK_ITERATIONS {
        let access = member_access_of(arena, current)?;
        let name = member_name(arena, access)?;
        let call = invoking_call(arena, access)?;
        if options.is_terminal(name) {
            return Some(if via_chain {
                Verdict::HandledViaChain
            } else {
                Verdict::HandledDirect
            });
        }
        if !options.is_chain(name) {
            return None;
        }
        current = call;
        via_chain = true;
    }
    None
}

/// Reading the success field (`r.value`).
pub(super) fn is_field_access_handled(
    arena: &NodeArena,
    options: &MustUseResultOptions,
    node: NodeIndex,
) -> bool {
    member_access_of(arena, node)
        .and_then(|access| member_name(arena, access))
        .is_some_and(|name| options.is_field_accessor(name))
}

/// Reading a branch-only field of a variable inside a branch whose
/// condition calls a discriminant on the same variable:
/// `if (r.isErr()) { r.error }`, `r.isOk() ? r.value : d`,
/// `r.isOk() && r.value`. Only reads of a variable qualify; a field of a
/// fresh value (`getResult().error`) is never guarded.
pub(super) fn is_guarded_field_access(
    arena: &NodeArena,
    binder: &BinderState,
    options: &MustUseResultOptions,
    node: NodeIndex,
) -> bool {
    if !arena.get(node).is_some_and(Node::is_identifier) {
        return false;
    }
    let Some(access) = member_access_of(arena, node) else {
        return false;
    };
    if !member_name(arena, access).is_some_and(|name| options.is_guarded_field(name)) {
        return false;
    }
    let Some(symbol) = binder.resolve_identifier(arena, node) else {
        return false;
    };

    let mut child = access;
    let mut current = arena.parent_of(access);
    for _ in 0..MAX_TREE_WALK_ITERATIONS {
        let Some(current_node) = arena.get(current) else {
            return false;
        };
        if let Some(condition) = guarding_condition(arena, current_node, child)
            && calls_discriminant_on(arena, binder, options, condition, symbol)
        {
            return true;
        }
        child = current;
        current = arena.parent_of(current);
    }
    false
}

/// Condition that decides whether `child`, a direct child of `parent`, is
/// evaluated.
fn guarding_condition(arena: &NodeArena, parent: &Node, child: NodeIndex) -> Option<NodeIndex> {
    match parent.kind {
        syntax_kind_ext::IF_STATEMENT => {
            let data = arena.get_if_statement(parent)?;
            (child == data.then_statement || child == data.else_statement).then_some(data.expression)
        }
        syntax_kind_ext::CONDITIONAL_EXPRESSION => {
            let data = arena.get_conditional_expr(parent)?;
            (child == data.when_true || child == data.when_false).then_some(data.condition)
        }
        syntax_kind_ext::BINARY_EXPRESSION => {
            let data = arena.get_binary_expr(parent)?;
            let logical = data.operator_token == SyntaxKind::AmpersandAmpersandToken as u16
                || data.operator_token == SyntaxKind::BarBarToken as u16;
            (logical && child == data.right).then_some(data.left)
        }
        _ => None,
    }
}

/// Whether `condition` contains `x.isErr()` (any discriminant) with `x`
/// resolving to `symbol`.
fn calls_discriminant_on(
    arena: &NodeArena,
    binder: &BinderState,
    options: &MustUseResultOptions,
    condition: NodeIndex,
    symbol: SymbolId,
) -> bool {
    let mut stack = vec![condition];
    let mut visited = 0u32;
    while let Some(current) = stack.pop() {
        visited += 1;
        if visited > MAX_TREE_WALK_ITERATIONS {
            return false;
        }
        if let Some(node) = arena.get(current)
            && node.kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            && member_name(arena, current).is_some_and(|name| options.is_discriminant(name))
            && is_member_called(arena, current)
            && let Some(access) = arena.get_access_expr(node)
        {
            let object = arena.skip_parentheses(access.expression);
            if arena.get(object).is_some_and(Node::is_identifier)
                && binder.resolve_identifier(arena, object) == Some(symbol)
            {
                return true;
            }
        }
        stack.extend(arena.get_children(current).into_iter().filter(|child| child.is_some()));
    }
    false
}

/// Whether the value leaves the current function: an enclosing `return`
/// or concise arrow body is reached before any block or the file.
pub(super) fn is_propagated(arena: &NodeArena, node: NodeIndex) -> bool {
    let mut current = arena.parent_of(node);
    for _ in 0..MAX_TREE_WALK_ITERATIONS {
        let Some(kind) = arena.kind_of(current) else {
            return false;
        };
        match kind {
            syntax_kind_ext::ARROW_FUNCTION | syntax_kind_ext::RETURN_STATEMENT => return true,
            kind if is_scope_boundary(kind) => return false,
            _ => current = arena.parent_of(current),
        }
    }
    false
}
