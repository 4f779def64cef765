//! Input schemas and the validation algorithm shared by both schema flavors.
//!
//! A schema maps input names to field rules. Two rule flavors exist:
//!
//! * [`Descriptor`](crate::types::Descriptor): the composable descriptor tree.
//! * [`PropertyType`]: the flat `typeName`/`nullable` record checked by `typeof` alone.
//!
//! Both plug into the same [`validate`] function through the [`FieldRule`] trait,
//! so the extra-key, required-key and error aggregation logic exists only once.

mod flat;
mod validate;

pub use flat::*;
pub use validate::*;

use crate::types::Descriptor;
use crate::value::{Value, type_of};
use indexmap::IndexMap;

/// How deeply compound descriptors are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    /// Object descriptors only enforce presence of required keys in nested shapes.
    #[default]
    Lenient,
    /// Object descriptors also enforce each present field's own descriptor.
    Strict,
}

/// The per-field contract a schema flavor must provide.
pub trait FieldRule {
    fn is_required(&self) -> bool;

    fn valid_for(&self, value: &Value, mode: ValidationMode) -> bool;

    /// Type name used in messages and wire checks.
    fn type_name(&self) -> &str;

    /// Message body for an error code 3 on input `name`.
    fn mismatch_message(&self, name: &str, value: &Value) -> String {
        type_mismatch_message(name, value, self.type_name())
    }
}

fn type_mismatch_message(name: &str, value: &Value, expected: &str) -> String {
    format!(
        "Mismatched type for '{}': the operation was run with a mismatched type got '{}' expected '{}'",
        name,
        type_of(value),
        expected
    )
}

impl FieldRule for Descriptor {
    fn is_required(&self) -> bool {
        Descriptor::is_required(self)
    }

    fn valid_for(&self, value: &Value, mode: ValidationMode) -> bool {
        self.valid_for_in(value, mode)
    }

    fn type_name(&self) -> &str {
        Descriptor::type_name(self)
    }

    fn mismatch_message(&self, name: &str, value: &Value) -> String {
        if !self.is_compound() {
            return type_mismatch_message(name, value, self.type_name());
        }
        let fallback = if self.type_name() == "object" {
            "circular object"
        } else {
            "circular array"
        };
        let rendered = serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string());
        format!(
            "Mismatched type for '{}': the operation was run with an invalid shape expected {} for {}",
            name,
            self.describe(),
            rendered
        )
    }
}

/// An ordered mapping from input name to field rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema<R> {
    fields: IndexMap<String, R>,
}

impl<R> Default for Schema<R> {
    fn default() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }
}

impl<R> Schema<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an input, replacing any earlier rule under the same name.
    pub fn input(mut self, name: impl Into<String>, rule: impl Into<R>) -> Self {
        self.fields.insert(name.into(), rule.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R, K: Into<String>> FromIterator<(K, R)> for Schema<R> {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }
}

/// Builds a [`Schema`] from `name => rule` pairs, converting each rule with `Into`.
///
/// ```rust
/// use patchbay::{Descriptor, Schema, schema, types::Types};
///
/// let schema: Schema<Descriptor> = schema! {
///     "a" => Types::number().required(),
///     "tags" => Types::array().of(Types::string()),
/// };
/// assert_eq!(schema.len(), 2);
/// ```
#[macro_export]
macro_rules! schema {
    () => { $crate::Schema::new() };
    ( $( $name:expr => $rule:expr ),+ $(,)? ) => {
        $crate::Schema::new() $( .input($name, $rule) )+
    };
}
