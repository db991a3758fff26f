//! Type rendering for diagnostics context, logs and tests.

use crate::intern::TypeInterner;
use crate::types::{TypeId, TypeKey};

/// Nested anonymous object literals beyond this depth print as `{ ... }`.
const MAX_FORMAT_DEPTH: u32 = 8;

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TypeFormatter { interner }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        let mut out = String::new();
        self.write(type_id, 0, &mut out);
        out
    }

    fn write(&self, type_id: TypeId, depth: u32, out: &mut String) {
        let Some(key) = self.interner.lookup(type_id) else {
            out.push_str("error");
            return;
        };
        match key {
            TypeKey::Intrinsic(kind) => out.push_str(kind.name()),
            TypeKey::Object(shape_id) => {
                let Some(shape) = self.interner.shape(*shape_id) else {
                    out.push_str("{}");
                    return;
                };
                if let Some(name) = &shape.name {
                    out.push_str(name);
                } else if depth >= MAX_FORMAT_DEPTH {
                    out.push_str("{ ... }");
                } else if shape.properties.is_empty() {
                    out.push_str("{}");
                } else {
                    out.push_str("{ ");
                    for property in shape.properties.values() {
                        out.push_str(&property.name);
                        if property.optional {
                            out.push('?');
                        }
                        out.push_str(": ");
                        self.write(property.type_id, depth + 1, out);
                        out.push_str("; ");
                    }
                    out.push('}');
                }
            }
            TypeKey::Class(shape_id) => {
                out.push_str("typeof ");
                let name = self
                    .interner
                    .shape(*shape_id)
                    .and_then(|shape| shape.name.as_deref())
                    .unwrap_or("(anonymous class)");
                out.push_str(name);
            }
            TypeKey::Function { ret } => {
                out.push_str("(...) => ");
                self.write(*ret, depth + 1, out);
            }
            TypeKey::Union(members) => self.write_joined(members, " | ", depth, out),
            TypeKey::Intersection(members) => self.write_joined(members, " & ", depth, out),
            TypeKey::Application { name, args, .. } => {
                out.push_str(name);
                out.push('<');
                self.write_joined(args, ", ", depth, out);
                out.push('>');
            }
            TypeKey::Array(element) => {
                let needs_parens = matches!(
                    self.interner.lookup(*element),
                    Some(TypeKey::Union(_) | TypeKey::Intersection(_) | TypeKey::Function { .. })
                );
                if needs_parens {
                    out.push('(');
                }
                self.write(*element, depth + 1, out);
                if needs_parens {
                    out.push(')');
                }
                out.push_str("[]");
            }
            TypeKey::Tuple(elements) => {
                out.push('[');
                self.write_joined(elements, ", ", depth, out);
                out.push(']');
            }
        }
    }

    fn write_joined(&self, members: &[TypeId], separator: &str, depth: u32, out: &mut String) {
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write(*member, depth + 1, out);
        }
    }
}
