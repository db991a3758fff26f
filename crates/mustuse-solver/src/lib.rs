//! Type representation for the mustuse checker.
//!
//! - `types`: `TypeId`, `TypeKey` and object shapes
//! - `intern`: `TypeInterner`, the single owner of every type of one check
//! - `objects`: structural queries (union decomposition, property lookup,
//!   call/construct results, awaited types, protocol presence)
//! - `format`: human-readable rendering for logs and tests
//!
//! The solver does not instantiate generics, narrow, or relate types. A
//! reference to a generic declaration keeps its arguments for display and
//! `await` unwrapping only.

mod format;
mod intern;
pub mod objects;
pub mod recursion;
pub mod types;

pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use objects::{
    MAX_AWAIT_DEPTH, array_element_type, awaited_type, call_return_type, construct_return_type,
    has_property, has_protocol, property_type, union_parts,
};
pub use recursion::RecursionGuard;
pub use types::{IntrinsicKind, ObjectShape, PropertyInfo, ShapeId, TypeId, TypeKey};
