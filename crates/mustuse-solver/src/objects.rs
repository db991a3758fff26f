//! Structural queries over interned types.
//!
//! All queries are read-only except where a union of results has to be
//! interned; those take `&mut TypeInterner`.

use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{TypeId, TypeKey};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

/// Upper bound on nested `Promise<Promise<...>>` unwrapping.
pub const MAX_AWAIT_DEPTH: u32 = 10;

/// Members of a union, or the type itself.
pub fn union_parts(interner: &TypeInterner, type_id: TypeId) -> SmallVec<[TypeId; 4]> {
    match interner.lookup(type_id) {
        Some(TypeKey::Union(members)) => members.iter().copied().collect(),
        _ => smallvec![type_id],
    }
}

/// Type of member `name`, searching inherited members. `any` yields `any`.
/// On a union the result is the union of the member types of the parts
/// that declare it.
pub fn property_type(interner: &mut TypeInterner, type_id: TypeId, name: &str) -> Option<TypeId> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::PropertyLookup);
    let mut found = Vec::new();
    for part in union_parts(interner, type_id) {
        if let Some(member) = find_property(interner, part, name, &mut guard) {
            found.push(member);
        }
    }
    match found.len() {
        0 => None,
        1 => Some(found[0]),
        _ => Some(interner.union(found)),
    }
}

pub fn has_property(interner: &TypeInterner, type_id: TypeId, name: &str) -> bool {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::PropertyLookup);
    union_parts(interner, type_id)
        .into_iter()
        .any(|part| find_property(interner, part, name, &mut guard).is_some())
}

/// Whether some union part declares every name in `protocol`. Intrinsics
/// (`any` included) never qualify.
pub fn has_protocol<S: AsRef<str>>(interner: &TypeInterner, type_id: TypeId, protocol: &[S]) -> bool {
    if protocol.is_empty() {
        return false;
    }
    union_parts(interner, type_id).into_iter().any(|part| {
        if part.is_intrinsic() {
            return false;
        }
        let mut guard = RecursionGuard::with_profile(RecursionProfile::PropertyLookup);
        protocol
            .iter()
            .all(|name| find_property(interner, part, name.as_ref(), &mut guard).is_some())
    })
}

fn find_property(
    interner: &TypeInterner,
    type_id: TypeId,
    name: &str,
    guard: &mut RecursionGuard<TypeId>,
) -> Option<TypeId> {
    if type_id == TypeId::ANY {
        return Some(TypeId::ANY);
    }
    match guard.enter(type_id) {
        RecursionResult::Entered => {}
        denied => {
            trace!(type_id = type_id.0, ?denied, "property lookup stopped");
            return None;
        }
    }
    let found = match interner.lookup(type_id) {
        Some(TypeKey::Object(shape_id) | TypeKey::Class(shape_id)) => {
            interner.shape(*shape_id).and_then(|shape| {
                shape
                    .properties
                    .get(name)
                    .map(|property| property.type_id)
                    .or_else(|| {
                        shape
                            .bases
                            .iter()
                            .find_map(|&base| find_property(interner, base, name, guard))
                    })
            })
        }
        Some(TypeKey::Application { base, .. }) => find_property(interner, *base, name, guard),
        Some(TypeKey::Intersection(members)) => members
            .iter()
            .find_map(|&member| find_property(interner, member, name, guard)),
        Some(TypeKey::Union(members)) => members
            .iter()
            .find_map(|&member| find_property(interner, member, name, guard)),
        _ => None,
    };
    guard.leave(type_id);
    found
}

/// Result of calling a value of this type. Uses the first call signature;
/// a union calls every callable part.
pub fn call_return_type(interner: &mut TypeInterner, type_id: TypeId) -> Option<TypeId> {
    signature_result(interner, type_id, SignatureKind::Call)
}

/// Result of `new` on a value of this type.
pub fn construct_return_type(interner: &mut TypeInterner, type_id: TypeId) -> Option<TypeId> {
    signature_result(interner, type_id, SignatureKind::Construct)
}

#[derive(Clone, Copy)]
enum SignatureKind {
    Call,
    Construct,
}

fn signature_result(interner: &mut TypeInterner, type_id: TypeId, kind: SignatureKind) -> Option<TypeId> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::PropertyLookup);
    let mut results = Vec::new();
    for part in union_parts(interner, type_id) {
        if let Some(result) = find_signature(interner, part, kind, &mut guard) {
            results.push(result);
        }
    }
    match results.len() {
        0 => None,
        1 => Some(results[0]),
        _ => Some(interner.union(results)),
    }
}

fn find_signature(
    interner: &TypeInterner,
    type_id: TypeId,
    kind: SignatureKind,
    guard: &mut RecursionGuard<TypeId>,
) -> Option<TypeId> {
    if type_id == TypeId::ANY {
        return Some(TypeId::ANY);
    }
    if !guard.enter(type_id).is_entered() {
        return None;
    }
    let found = match (interner.lookup(type_id), kind) {
        (Some(TypeKey::Function { ret }), SignatureKind::Call) => Some(*ret),
        (Some(TypeKey::Object(shape_id) | TypeKey::Class(shape_id)), _) => {
            interner.shape(*shape_id).and_then(|shape| {
                let own = match kind {
                    SignatureKind::Call => shape.call_signatures.first(),
                    SignatureKind::Construct => shape.construct_signatures.first(),
                };
                own.copied().or_else(|| {
                    shape
                        .bases
                        .iter()
                        .find_map(|&base| find_signature(interner, base, kind, guard))
                })
            })
        }
        (Some(TypeKey::Application { base, .. }), _) => find_signature(interner, *base, kind, guard),
        (Some(TypeKey::Intersection(members)), _) => members
            .iter()
            .find_map(|&member| find_signature(interner, member, kind, guard)),
        _ => None,
    };
    guard.leave(type_id);
    found
}

/// Type produced by `await`: peels `Promise`/`PromiseLike` (directly or via
/// a declaration that extends or implements one) up to `MAX_AWAIT_DEPTH`
/// times. Unions are awaited member-wise; non-promises await to themselves.
pub fn awaited_type(interner: &mut TypeInterner, type_id: TypeId) -> TypeId {
    let parts = union_parts(interner, type_id);
    if parts.len() > 1 {
        let awaited = parts
            .into_iter()
            .map(|part| awaited_type(interner, part))
            .collect();
        return interner.union(awaited);
    }

    let mut current = type_id;
    let mut depth = 0;
    while let Some(inner) = promise_like_argument(interner, current) {
        depth += 1;
        if depth > MAX_AWAIT_DEPTH {
            break;
        }
        current = inner;
    }
    if union_parts(interner, current).len() > 1 && current != type_id {
        return awaited_type(interner, current);
    }
    current
}

/// `T` of `Promise<T>`, `PromiseLike<T>` or a declaration deriving from one.
pub fn promise_like_argument(interner: &TypeInterner, type_id: TypeId) -> Option<TypeId> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::PropertyLookup);
    find_promise_argument(interner, type_id, &mut guard)
}

fn find_promise_argument(
    interner: &TypeInterner,
    type_id: TypeId,
    guard: &mut RecursionGuard<TypeId>,
) -> Option<TypeId> {
    if !guard.enter(type_id).is_entered() {
        return None;
    }
    let found = match interner.lookup(type_id) {
        Some(TypeKey::Application { name, base, args }) => {
            if name == "Promise" || name == "PromiseLike" {
                Some(args.first().copied().unwrap_or(TypeId::UNKNOWN))
            } else {
                find_promise_argument(interner, *base, guard)
            }
        }
        Some(TypeKey::Object(shape_id) | TypeKey::Class(shape_id)) => {
            interner.shape(*shape_id).and_then(|shape| {
                shape
                    .bases
                    .iter()
                    .chain(shape.implements.iter())
                    .find_map(|&parent| find_promise_argument(interner, parent, guard))
            })
        }
        _ => None,
    };
    guard.leave(type_id);
    found
}

/// Element type of an array, `Array<T>`/`ReadonlyArray<T>` or tuple.
pub fn array_element_type(interner: &mut TypeInterner, type_id: TypeId) -> Option<TypeId> {
    if type_id == TypeId::ANY {
        return Some(TypeId::ANY);
    }
    match interner.lookup(type_id)?.clone() {
        TypeKey::Array(element) => Some(element),
        TypeKey::Tuple(elements) => Some(interner.union(elements)),
        TypeKey::Application { name, args, .. } if name == "Array" || name == "ReadonlyArray" => {
            Some(args.first().copied().unwrap_or(TypeId::UNKNOWN))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/objects_tests.rs"]
mod tests;
