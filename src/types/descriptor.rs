use crate::schema::ValidationMode;
use crate::value::{Value, is_nullish};
use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Map;
use std::fmt;

/// The primitive runtime types a descriptor can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (PrimitiveKind::String, Value::String(_))
                | (PrimitiveKind::Number, Value::Number(_))
                | (PrimitiveKind::Boolean, Value::Bool(_))
        )
    }
}

/// Constraint applied to every element of an array.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementRule {
    /// No element constraint, any array is accepted.
    Any,
    /// Every element must satisfy this descriptor.
    One(Box<Descriptor>),
    /// Every element must satisfy at least one of these descriptors.
    OneOf(Vec<Descriptor>),
}

/// The closed set of descriptor shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorKind {
    Primitive(PrimitiveKind),
    Array(ElementRule),
    Object {
        fields: IndexMap<String, Descriptor>,
        exact: bool,
    },
}

/// A composable rule describing which runtime values are acceptable for one field.
///
/// Descriptors are plain values: cloning one yields an independent copy, and the
/// only way to change the `required` flag is the consuming [`Descriptor::required`]
/// builder, so a descriptor shared between schemas can never be altered from the side.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    kind: DescriptorKind,
    required: bool,
}

impl Descriptor {
    pub fn new(kind: DescriptorKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    /// Marks the descriptor as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    /// Short type name used in diagnostics and wire checks.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            DescriptorKind::Primitive(kind) => kind.name(),
            DescriptorKind::Array(_) => "array",
            DescriptorKind::Object { .. } => "object",
        }
    }

    /// True for array and object descriptors.
    pub fn is_compound(&self) -> bool {
        !matches!(self.kind, DescriptorKind::Primitive(_))
    }

    /// Checks a value with the lenient, compatible rules.
    pub fn valid_for(&self, value: &Value) -> bool {
        self.valid_for_in(value, ValidationMode::Lenient)
    }

    /// Checks a value, enforcing nested object fields when `mode` is strict.
    pub fn valid_for_in(&self, value: &Value, mode: ValidationMode) -> bool {
        match &self.kind {
            DescriptorKind::Primitive(kind) => {
                if self.required && value.is_null() {
                    return false;
                }
                kind.matches(value)
            }
            DescriptorKind::Array(rule) => {
                if value.is_null() {
                    return !self.required;
                }
                let Some(items) = value.as_array() else {
                    return false;
                };
                match rule {
                    ElementRule::Any => true,
                    ElementRule::One(element) => {
                        items.iter().all(|item| element.valid_for_in(item, mode))
                    }
                    ElementRule::OneOf(alternatives) => items.iter().all(|item| {
                        alternatives
                            .iter()
                            .any(|alternative| alternative.valid_for_in(item, mode))
                    }),
                }
            }
            DescriptorKind::Object { fields, exact } => {
                if value.is_null() {
                    return !self.required;
                }
                let Some(object) = value.as_object() else {
                    return false;
                };
                if fields.is_empty() {
                    return !*exact || object.is_empty();
                }
                for (key, field_value) in object {
                    match fields.get(key) {
                        None if *exact => return false,
                        None => {}
                        Some(field) => {
                            // Lenient mode only requires presence of required keys;
                            // the nested check result is not enforced.
                            let nested_ok = field.valid_for_in(field_value, mode);
                            if mode == ValidationMode::Strict && !nested_ok {
                                return false;
                            }
                        }
                    }
                }
                all_keys_exist(fields, object)
            }
        }
    }

    /// Renders a short textual shape, e.g. `{ string: [ string ] }`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

/// Walks the field tree checking that every required key is present.
///
/// Only presence is checked; nested object fields are descended into when present.
fn all_keys_exist(fields: &IndexMap<String, Descriptor>, object: &Map<String, Value>) -> bool {
    let empty = Map::new();
    fields.iter().all(|(key, field)| {
        let value = object.get(key);
        if field.required && is_nullish(value) {
            return false;
        }
        match (&field.kind, value) {
            (DescriptorKind::Object { fields: nested, .. }, Some(present)) if !present.is_null() => {
                all_keys_exist(nested, present.as_object().unwrap_or(&empty))
            }
            _ => true,
        }
    })
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DescriptorKind::Primitive(kind) => write!(f, "{}", kind.name()),
            DescriptorKind::Array(ElementRule::Any) => write!(f, "[]"),
            DescriptorKind::Array(ElementRule::One(element)) => write!(f, "[ {} ]", element),
            DescriptorKind::Array(ElementRule::OneOf(alternatives)) => {
                write!(f, "[ {} ]", alternatives.iter().join(", "))
            }
            DescriptorKind::Object { fields, .. } => {
                let entries = fields
                    .values()
                    .map(|field| format!("string: {}", field))
                    .join(" ");
                write!(f, "{{ {} }}", entries)
            }
        }
    }
}
