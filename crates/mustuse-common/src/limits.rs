//! Centralized limits and thresholds.
//!
//! Every upward tree walk, scope walk and recursive type query is bounded by
//! one of these constants so a malformed arena (shared substructure, parent
//! cycles) degrades to "no answer" instead of hanging.

/// Maximum number of parent steps taken by any upward tree walk.
///
/// Well-formed trees never get close; the limit only matters when a host
/// hands over an arena whose parent links loop.
pub const MAX_TREE_WALK_ITERATIONS: u32 = 10_000;

/// Maximum number of scope-chain steps when resolving a name.
pub const MAX_SCOPE_WALK_ITERATIONS: u32 = 10_000;

/// Maximum depth for recursive expression type computation.
///
/// ```typescript
/// // Deeply nested calls recurse once per level:
/// f(f(f(f(f(f(f(f(/* ... */))))))));
/// ```
pub const MAX_EXPR_CHECK_DEPTH: u32 = 500;

/// Maximum recursion depth of the parser's expression and statement rules.
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 1_000;

/// Maximum number of alias hops the must-use rule follows from one candidate
/// (`const a = f(); const b = a; const c = b; ...`).
pub const MAX_ALIAS_CHAIN_DEPTH: u32 = 256;
