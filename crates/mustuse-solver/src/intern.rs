//! Type interning.
//!
//! Structural keys (`Union`, `Application`, `Function`, ...) are
//! deduplicated, so equal keys always produce the same `TypeId`. Object and
//! class types are keyed by their `ShapeId`: every declaration gets its own
//! shape and therefore its own identity, even when two declarations have the
//! same members.

use crate::types::{IntrinsicKind, ObjectShape, PropertyInfo, ShapeId, TypeId, TypeKey};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

pub struct TypeInterner {
    types: Vec<TypeKey>,
    ids: FxHashMap<TypeKey, TypeId>,
    shapes: Vec<ObjectShape>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut interner = TypeInterner {
            types: Vec::with_capacity(64),
            ids: FxHashMap::default(),
            shapes: Vec::new(),
        };
        for kind in IntrinsicKind::ALL {
            interner.intern(TypeKey::Intrinsic(kind));
        }
        interner
    }

    /// Number of distinct types, intrinsics included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn intern(&mut self, key: TypeKey) -> TypeId {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    pub fn lookup(&self, id: TypeId) -> Option<&TypeKey> {
        self.types.get(id.0 as usize)
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    pub fn alloc_shape(&mut self, shape: ObjectShape) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&ObjectShape> {
        self.shapes.get(id.0 as usize)
    }

    /// Shapes stay mutable so a declaration's type can be handed out before
    /// its members are filled in (self-referencing interfaces).
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut ObjectShape> {
        self.shapes.get_mut(id.0 as usize)
    }

    /// Shape behind an object or class type.
    pub fn shape_of(&self, id: TypeId) -> Option<ShapeId> {
        match self.lookup(id)? {
            TypeKey::Object(shape) | TypeKey::Class(shape) => Some(*shape),
            _ => None,
        }
    }

    /// Anonymous object type with the given members.
    pub fn object(&mut self, properties: Vec<PropertyInfo>) -> TypeId {
        let mut shape = ObjectShape::default();
        for property in properties {
            shape.add_property(property);
        }
        self.object_with_shape(shape)
    }

    pub fn object_with_shape(&mut self, shape: ObjectShape) -> TypeId {
        let shape_id = self.alloc_shape(shape);
        self.intern(TypeKey::Object(shape_id))
    }

    /// Constructor type of a class; `shape` holds statics and construct
    /// signatures.
    pub fn class(&mut self, shape: ObjectShape) -> TypeId {
        let shape_id = self.alloc_shape(shape);
        self.intern(TypeKey::Class(shape_id))
    }

    // =========================================================================
    // Structural constructors
    // =========================================================================

    pub fn function(&mut self, ret: TypeId) -> TypeId {
        self.intern(TypeKey::Function { ret })
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKey::Array(element))
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeKey::Tuple(elements))
    }

    pub fn application(&mut self, name: impl Into<String>, base: TypeId, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeKey::Application {
            name: name.into(),
            base,
            args,
        })
    }

    /// Normalized union: nested unions flatten, members dedupe, `never`
    /// drops out, `any` and `unknown` absorb everything. An empty union is
    /// `never`; a single member is returned unchanged.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat: SmallVec<[TypeId; 8]> = SmallVec::new();
        for member in members {
            match self.lookup(member) {
                Some(TypeKey::Union(inner)) => flat.extend(inner.iter().copied()),
                _ => flat.push(member),
            }
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|member| *member != TypeId::NEVER);
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let id = self.intern(TypeKey::Union(flat.to_vec()));
                trace!(id = id.0, members = flat.len(), "union");
                id
            }
        }
    }

    /// Normalized intersection: nested intersections flatten, `never` and
    /// `any` absorb, `unknown` drops out. An empty intersection is
    /// `unknown`.
    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut flat: SmallVec<[TypeId; 8]> = SmallVec::new();
        for member in members {
            match self.lookup(member) {
                Some(TypeKey::Intersection(inner)) => flat.extend(inner.iter().copied()),
                _ => flat.push(member),
            }
        }
        if flat.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        flat.retain(|member| *member != TypeId::UNKNOWN);
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => self.intern(TypeKey::Intersection(flat.to_vec())),
        }
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod tests;
