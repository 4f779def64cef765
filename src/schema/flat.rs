use super::{FieldRule, ValidationMode};
use crate::value::{Value, type_of};
use serde::{Deserialize, Serialize};

/// A flat property rule: a runtime type name plus a nullability flag.
///
/// Values are checked purely by comparing their runtime type name; arrays and
/// objects are never inspected further.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyType {
    pub type_name: String,
    pub nullable: bool,
}

impl PropertyType {
    pub fn new(type_name: impl Into<String>, nullable: bool) -> Self {
        Self {
            type_name: type_name.into(),
            nullable,
        }
    }

    pub fn string() -> Self {
        Self::new("string", false)
    }

    pub fn number() -> Self {
        Self::new("number", false)
    }

    pub fn boolean() -> Self {
        Self::new("boolean", false)
    }

    pub fn object() -> Self {
        Self::new("object", false)
    }

    /// Allows `null` and missing values past the required check.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl FieldRule for PropertyType {
    fn is_required(&self) -> bool {
        !self.nullable
    }

    fn valid_for(&self, value: &Value, _mode: ValidationMode) -> bool {
        type_of(value) == self.type_name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}
