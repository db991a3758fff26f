//! Name binder for the mustuse checker.
//!
//! Binding a source file produces an immutable scope tree, one symbol per
//! declared name, and for every symbol the list of identifier occurrences
//! that resolve to it. The checker's alias resolution reads those reference
//! lists directly.

pub mod scopes;
pub mod state;
mod state_binding;
mod state_references;
pub mod symbols;

pub use scopes::{ContainerKind, Scope, ScopeId, SymbolTable};
pub use state::BinderState;
pub use symbols::{Reference, Symbol, SymbolArena, SymbolId, reference_flags, symbol_flags};
