use super::*;
use crate::types::{ObjectShape, PropertyInfo};

const PROTOCOL: [&str; 6] = ["mapErr", "map", "andThen", "orElse", "match", "unwrapOr"];

/// `interface Result { mapErr; map; andThen; orElse; match; unwrapOr; isErr }`
fn result_interface(interner: &mut TypeInterner) -> TypeId {
    let shape = interner.alloc_shape(ObjectShape::named("Result"));
    let result = interner.intern(TypeKey::Object(shape));
    let returns_result = interner.function(result);
    let returns_boolean = interner.function(TypeId::BOOLEAN);
    if let Some(shape) = interner.shape_mut(shape) {
        for name in PROTOCOL {
            shape.add_property(PropertyInfo::method(name, returns_result));
        }
        shape.add_property(PropertyInfo::method("isErr", returns_boolean));
    }
    result
}

#[test]
fn test_protocol_on_interface() {
    let mut interner = TypeInterner::new();
    let result = result_interface(&mut interner);
    assert!(has_protocol(&interner, result, &PROTOCOL));
    assert!(!has_protocol(&interner, TypeId::STRING, &PROTOCOL));
    assert!(!has_protocol(&interner, TypeId::ANY, &PROTOCOL));
    let empty: [&str; 0] = [];
    assert!(!has_protocol(&interner, result, &empty));
}

#[test]
fn test_protocol_requires_every_member() {
    let mut interner = TypeInterner::new();
    let partial = interner.object(vec![
        PropertyInfo::method("map", TypeId::ANY),
        PropertyInfo::method("mapErr", TypeId::ANY),
    ]);
    assert!(!has_protocol(&interner, partial, &PROTOCOL));
    assert!(has_property(&interner, partial, "map"));
}

#[test]
fn test_protocol_on_union_part() {
    let mut interner = TypeInterner::new();
    let result = result_interface(&mut interner);
    let maybe = interner.union(vec![result, TypeId::UNDEFINED]);
    assert!(has_protocol(&interner, maybe, &PROTOCOL));
}

#[test]
fn test_protocol_through_application_and_bases() {
    let mut interner = TypeInterner::new();
    let result = result_interface(&mut interner);
    let mut ok_shape = ObjectShape::named("Ok");
    ok_shape.bases.push(result);
    ok_shape.add_property(PropertyInfo::new("value", TypeId::UNKNOWN));
    let ok = interner.object_with_shape(ok_shape);
    let ok_app = interner.application("Ok", ok, vec![TypeId::STRING]);
    assert!(has_protocol(&interner, ok_app, &PROTOCOL));
    assert_eq!(property_type(&mut interner, ok_app, "value"), Some(TypeId::UNKNOWN));
}

#[test]
fn test_cyclic_bases_terminate() {
    let mut interner = TypeInterner::new();
    let a_shape = interner.alloc_shape(ObjectShape::named("A"));
    let a = interner.intern(TypeKey::Object(a_shape));
    let mut b_shape = ObjectShape::named("B");
    b_shape.bases.push(a);
    let b = interner.object_with_shape(b_shape);
    if let Some(shape) = interner.shape_mut(a_shape) {
        shape.bases.push(b);
    }
    assert_eq!(property_type(&mut interner, a, "missing"), None);
    assert!(!has_protocol(&interner, b, &PROTOCOL));
}

#[test]
fn test_property_type_on_union_collects_parts() {
    let mut interner = TypeInterner::new();
    let a = interner.object(vec![PropertyInfo::new("v", TypeId::STRING)]);
    let b = interner.object(vec![PropertyInfo::new("v", TypeId::NUMBER)]);
    let c = interner.object(Vec::new());
    let ab = interner.union(vec![a, b, c]);
    let expected = interner.union(vec![TypeId::STRING, TypeId::NUMBER]);
    assert_eq!(property_type(&mut interner, ab, "v"), Some(expected));
    assert_eq!(property_type(&mut interner, TypeId::ANY, "v"), Some(TypeId::ANY));
    assert_eq!(property_type(&mut interner, TypeId::NUMBER, "v"), None);
}

#[test]
fn test_call_and_construct_results() {
    let mut interner = TypeInterner::new();
    let result = result_interface(&mut interner);
    let get = interner.function(result);
    assert_eq!(call_return_type(&mut interner, get), Some(result));
    assert_eq!(call_return_type(&mut interner, TypeId::ANY), Some(TypeId::ANY));
    assert_eq!(call_return_type(&mut interner, TypeId::STRING), None);

    let mut callable = ObjectShape::default();
    callable.call_signatures.push(TypeId::NUMBER);
    let callable = interner.object_with_shape(callable);
    assert_eq!(call_return_type(&mut interner, callable), Some(TypeId::NUMBER));

    let mut class_shape = ObjectShape::named("Widget");
    class_shape.construct_signatures.push(result);
    let class = interner.class(class_shape);
    assert_eq!(construct_return_type(&mut interner, class), Some(result));
    assert_eq!(call_return_type(&mut interner, class), None);
}

#[test]
fn test_union_of_callables() {
    let mut interner = TypeInterner::new();
    let f = interner.function(TypeId::STRING);
    let g = interner.function(TypeId::NUMBER);
    let either = interner.union(vec![f, g]);
    let expected = interner.union(vec![TypeId::STRING, TypeId::NUMBER]);
    assert_eq!(call_return_type(&mut interner, either), Some(expected));
}

#[test]
fn test_awaited_promise_chain() {
    let mut interner = TypeInterner::new();
    let result = result_interface(&mut interner);
    let promise_base = interner.object_with_shape(ObjectShape::named("Promise"));
    let inner = interner.application("Promise", promise_base, vec![result]);
    let outer = interner.application("Promise", promise_base, vec![inner]);
    assert_eq!(awaited_type(&mut interner, inner), result);
    assert_eq!(awaited_type(&mut interner, outer), result);
    assert_eq!(awaited_type(&mut interner, TypeId::STRING), TypeId::STRING);
    assert_eq!(awaited_type(&mut interner, result), result);
}

#[test]
fn test_awaited_through_implements() {
    // class ResultAsync implements PromiseLike<Result>
    let mut interner = TypeInterner::new();
    let result = result_interface(&mut interner);
    let like_base = interner.object_with_shape(ObjectShape::named("PromiseLike"));
    let like = interner.application("PromiseLike", like_base, vec![result]);
    let mut async_shape = ObjectShape::named("ResultAsync");
    async_shape.implements.push(like);
    let result_async = interner.object_with_shape(async_shape);
    let app = interner.application("ResultAsync", result_async, vec![TypeId::STRING]);
    assert_eq!(awaited_type(&mut interner, app), result);
    assert!(!has_protocol(&interner, app, &PROTOCOL));
}

#[test]
fn test_awaited_union_is_member_wise() {
    let mut interner = TypeInterner::new();
    let result = result_interface(&mut interner);
    let promise_base = interner.object_with_shape(ObjectShape::named("Promise"));
    let promise = interner.application("Promise", promise_base, vec![result]);
    let either = interner.union(vec![promise, TypeId::NUMBER]);
    let expected = interner.union(vec![result, TypeId::NUMBER]);
    assert_eq!(awaited_type(&mut interner, either), expected);
}

#[test]
fn test_awaited_depth_is_bounded() {
    let mut interner = TypeInterner::new();
    let promise_base = interner.object_with_shape(ObjectShape::named("Promise"));
    let mut current = TypeId::STRING;
    for _ in 0..(MAX_AWAIT_DEPTH + 5) {
        current = interner.application("Promise", promise_base, vec![current]);
    }
    let awaited = awaited_type(&mut interner, current);
    assert_ne!(awaited, TypeId::STRING);
    assert!(promise_like_argument(&interner, awaited).is_some());
}

#[test]
fn test_array_elements() {
    let mut interner = TypeInterner::new();
    let array = interner.array(TypeId::STRING);
    assert_eq!(array_element_type(&mut interner, array), Some(TypeId::STRING));
    let tuple = interner.tuple(vec![TypeId::STRING, TypeId::NUMBER]);
    let expected = interner.union(vec![TypeId::STRING, TypeId::NUMBER]);
    assert_eq!(array_element_type(&mut interner, tuple), Some(expected));
    let base = interner.object_with_shape(ObjectShape::named("Array"));
    let generic = interner.application("Array", base, vec![TypeId::BOOLEAN]);
    assert_eq!(array_element_type(&mut interner, generic), Some(TypeId::BOOLEAN));
    assert_eq!(array_element_type(&mut interner, TypeId::NUMBER), None);
}

#[test]
fn test_union_parts() {
    let mut interner = TypeInterner::new();
    let union = interner.union(vec![TypeId::STRING, TypeId::NULL]);
    assert_eq!(union_parts(&interner, union).len(), 2);
    assert_eq!(union_parts(&interner, TypeId::STRING).as_slice(), &[TypeId::STRING]);
}
