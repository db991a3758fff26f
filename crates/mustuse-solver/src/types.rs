//! Core type data.

use indexmap::IndexMap;

/// Interned type handle. Equal ids mean structurally identical keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    /// The non-primitive `object` keyword type.
    pub const OBJECT: TypeId = TypeId(11);

    pub const FIRST_USER: u32 = 12;

    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    Bigint,
    Symbol,
    Object,
}

impl IntrinsicKind {
    /// Registration order; index == `TypeId`.
    pub const ALL: [IntrinsicKind; 12] = [
        IntrinsicKind::Any,
        IntrinsicKind::Unknown,
        IntrinsicKind::Never,
        IntrinsicKind::Void,
        IntrinsicKind::Undefined,
        IntrinsicKind::Null,
        IntrinsicKind::String,
        IntrinsicKind::Number,
        IntrinsicKind::Boolean,
        IntrinsicKind::Bigint,
        IntrinsicKind::Symbol,
        IntrinsicKind::Object,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Bigint => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
        }
    }

    /// Pre-registered id of this intrinsic.
    #[inline]
    pub fn type_id(self) -> TypeId {
        TypeId(self as u32)
    }

    /// Keyword spelling to intrinsic (`string`, `number`, ...).
    pub fn from_keyword(text: &str) -> Option<IntrinsicKind> {
        IntrinsicKind::ALL
            .into_iter()
            .find(|kind| kind.name() == text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Intrinsic(IntrinsicKind),
    /// Object-like type: interface, type literal, class instance.
    Object(ShapeId),
    /// Class constructor value (`typeof C`); its shape holds statics and the
    /// construct signature.
    Class(ShapeId),
    /// Function type; only the return type is tracked.
    Function { ret: TypeId },
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    /// Reference to a generic declaration with type arguments. `base` is the
    /// declaration's own (uninstantiated) type.
    Application {
        name: String,
        base: TypeId,
        args: Vec<TypeId>,
    },
    Array(TypeId),
    Tuple(Vec<TypeId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
    pub is_method: bool,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        PropertyInfo {
            name: name.into(),
            type_id,
            optional: false,
            is_method: false,
        }
    }

    pub fn method(name: impl Into<String>, type_id: TypeId) -> Self {
        PropertyInfo {
            is_method: true,
            ..PropertyInfo::new(name, type_id)
        }
    }
}

/// Members of an object-like type, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ObjectShape {
    /// Declared name, for display (`Result`, `Ok`, ...).
    pub name: Option<String>,
    pub properties: IndexMap<String, PropertyInfo>,
    /// `extends` targets; their members are inherited.
    pub bases: Vec<TypeId>,
    /// `implements` targets; consulted for awaitability only.
    pub implements: Vec<TypeId>,
    /// Return types of call signatures.
    pub call_signatures: Vec<TypeId>,
    /// Instance types of construct signatures.
    pub construct_signatures: Vec<TypeId>,
}

impl ObjectShape {
    pub fn named(name: impl Into<String>) -> Self {
        ObjectShape {
            name: Some(name.into()),
            ..ObjectShape::default()
        }
    }

    /// Add a member. A later declaration of the same name (merged
    /// interfaces, overloads) keeps the first one's position and type.
    pub fn add_property(&mut self, property: PropertyInfo) {
        self.properties
            .entry(property.name.clone())
            .or_insert(property);
    }
}
