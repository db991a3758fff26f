use super::*;
use crate::format::TypeFormatter;

#[test]
fn test_intrinsics_are_preregistered() {
    let interner = TypeInterner::new();
    assert_eq!(interner.len(), TypeId::FIRST_USER as usize);
    assert_eq!(
        interner.lookup(TypeId::STRING),
        Some(&TypeKey::Intrinsic(IntrinsicKind::String))
    );
    assert_eq!(
        interner.lookup(TypeId::OBJECT),
        Some(&TypeKey::Intrinsic(IntrinsicKind::Object))
    );
    assert_eq!(IntrinsicKind::from_keyword("bigint"), Some(IntrinsicKind::Bigint));
    assert_eq!(IntrinsicKind::from_keyword("Result"), None);
}

#[test]
fn test_structural_keys_dedupe() {
    let mut interner = TypeInterner::new();
    let a = interner.function(TypeId::STRING);
    let b = interner.function(TypeId::STRING);
    assert_eq!(a, b);
    let c = interner.function(TypeId::NUMBER);
    assert_ne!(a, c);

    let arr1 = interner.array(TypeId::NUMBER);
    let arr2 = interner.array(TypeId::NUMBER);
    assert_eq!(arr1, arr2);
}

#[test]
fn test_objects_are_nominal() {
    let mut interner = TypeInterner::new();
    let a = interner.object(vec![PropertyInfo::new("x", TypeId::NUMBER)]);
    let b = interner.object(vec![PropertyInfo::new("x", TypeId::NUMBER)]);
    assert_ne!(a, b);
    assert!(interner.shape_of(a).is_some());
    assert_eq!(interner.shape_of(TypeId::STRING), None);
}

#[test]
fn test_union_single_member() {
    let mut interner = TypeInterner::new();
    assert_eq!(interner.union(vec![TypeId::STRING]), TypeId::STRING);
    assert_eq!(
        interner.union(vec![TypeId::STRING, TypeId::STRING]),
        TypeId::STRING
    );
}

#[test]
fn test_union_empty_is_never() {
    let mut interner = TypeInterner::new();
    assert_eq!(interner.union(Vec::new()), TypeId::NEVER);
    assert_eq!(interner.union(vec![TypeId::NEVER]), TypeId::NEVER);
}

#[test]
fn test_union_any_and_unknown_absorb() {
    let mut interner = TypeInterner::new();
    assert_eq!(
        interner.union(vec![TypeId::STRING, TypeId::ANY]),
        TypeId::ANY
    );
    assert_eq!(
        interner.union(vec![TypeId::UNKNOWN, TypeId::NUMBER]),
        TypeId::UNKNOWN
    );
}

#[test]
fn test_union_removes_never_and_flattens() {
    let mut interner = TypeInterner::new();
    let inner = interner.union(vec![TypeId::STRING, TypeId::NUMBER]);
    let outer = interner.union(vec![inner, TypeId::BOOLEAN, TypeId::NEVER]);
    let flat = interner.union(vec![TypeId::BOOLEAN, TypeId::NUMBER, TypeId::STRING]);
    assert_eq!(outer, flat);
    match interner.lookup(outer) {
        Some(TypeKey::Union(members)) => assert_eq!(members.len(), 3),
        other => panic!("expected union, got {other:?}"),
    }
}

#[test]
fn test_union_is_order_independent() {
    let mut interner = TypeInterner::new();
    let a = interner.union(vec![TypeId::STRING, TypeId::NULL]);
    let b = interner.union(vec![TypeId::NULL, TypeId::STRING]);
    assert_eq!(a, b);
}

#[test]
fn test_intersection_normalization() {
    let mut interner = TypeInterner::new();
    assert_eq!(interner.intersection(Vec::new()), TypeId::UNKNOWN);
    assert_eq!(
        interner.intersection(vec![TypeId::STRING, TypeId::UNKNOWN]),
        TypeId::STRING
    );
    assert_eq!(
        interner.intersection(vec![TypeId::STRING, TypeId::NEVER]),
        TypeId::NEVER
    );
    let a = interner.object(vec![PropertyInfo::new("a", TypeId::NUMBER)]);
    let b = interner.object(vec![PropertyInfo::new("b", TypeId::NUMBER)]);
    let ab = interner.intersection(vec![a, b]);
    let ba = interner.intersection(vec![b, a]);
    assert_eq!(ab, ba);
}

#[test]
fn test_shape_mut_fills_members_late() {
    let mut interner = TypeInterner::new();
    let shape = interner.alloc_shape(ObjectShape::named("Node"));
    let node = interner.intern(TypeKey::Object(shape));
    if let Some(shape) = interner.shape_mut(shape) {
        shape.add_property(PropertyInfo::new("next", node));
    }
    let stored = interner.shape(shape).map(|shape| shape.properties.len());
    assert_eq!(stored, Some(1));
}

#[test]
fn test_add_property_keeps_first_declaration() {
    let mut shape = ObjectShape::default();
    shape.add_property(PropertyInfo::method("map", TypeId::STRING));
    shape.add_property(PropertyInfo::new("map", TypeId::NUMBER));
    let map = &shape.properties["map"];
    assert_eq!(map.type_id, TypeId::STRING);
    assert!(map.is_method);
}

#[test]
fn test_format_types() {
    let mut interner = TypeInterner::new();
    let result_shape = ObjectShape::named("Result");
    let result = interner.object_with_shape(result_shape);
    let app = interner.application("Result", result, vec![TypeId::STRING, TypeId::UNKNOWN]);
    let promise_base = interner.object_with_shape(ObjectShape::named("Promise"));
    let promise = interner.application("Promise", promise_base, vec![app]);
    let union = interner.union(vec![TypeId::STRING, TypeId::NUMBER]);
    let array = interner.array(union);
    let literal = interner.object(vec![PropertyInfo::new("ok", TypeId::BOOLEAN)]);
    let func = interner.function(TypeId::VOID);
    let tuple = interner.tuple(vec![TypeId::STRING, TypeId::NUMBER]);

    let formatter = TypeFormatter::new(&interner);
    assert_eq!(formatter.format(promise), "Promise<Result<string, unknown>>");
    assert_eq!(formatter.format(union), "string | number");
    assert_eq!(formatter.format(array), "(string | number)[]");
    assert_eq!(formatter.format(literal), "{ ok: boolean; }");
    assert_eq!(formatter.format(func), "(...) => void");
    assert_eq!(formatter.format(tuple), "[string, number]");
    assert_eq!(formatter.format(TypeId(9999)), "error");
}
