use super::{FieldRule, Schema, ValidationMode};
use crate::error::{ErrorCode, ValidationError, ValidationErrors};
use crate::value::{InputValues, Value, is_nullish};
use tracing::trace;

/// Validates `values` against `schema`, collecting every applicable error.
///
/// Errors are reported in this order:
/// 1. for each supplied value: an extra-property error when the name is not in the
///    schema, otherwise a missing-required error and/or a type-mismatch error;
/// 2. for each schema input: a missing-required error when it is required and
///    null or missing.
///
/// Both passes use the same required check, so a required input supplied as
/// `null` is reported twice with code 2.
pub fn validate<R: FieldRule>(
    schema: &Schema<R>,
    values: &InputValues,
    mode: ValidationMode,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for (name, value) in values {
        let Some(rule) = schema.get(name) else {
            errors.push(extra_property(name));
            continue;
        };
        if rule.is_required() && value.is_null() {
            errors.push(missing_required(name));
        }
        if !rule.valid_for(value, mode) {
            errors.push(type_mismatch(rule, name, value));
        }
    }

    for (name, rule) in schema.iter() {
        if rule.is_required() && is_nullish(values.get(name)) {
            errors.push(missing_required(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        trace!(error_count = errors.len(), "input validation failed");
        Err(ValidationErrors::new(errors))
    }
}

fn extra_property(name: &str) -> ValidationError {
    ValidationError {
        error_code: ErrorCode::ExtraProperty,
        property_name: name.to_string(),
        message: format!(
            "Extra property given '{}': the operation was asked to run with a value not included in its inputs",
            name
        ),
    }
}

fn missing_required(name: &str) -> ValidationError {
    ValidationError {
        error_code: ErrorCode::MissingRequired,
        property_name: name.to_string(),
        message: format!(
            "Unexpected null property for '{}': the operation was run with a null value for a non-nullable input",
            name
        ),
    }
}

fn type_mismatch<R: FieldRule>(rule: &R, name: &str, value: &Value) -> ValidationError {
    ValidationError {
        error_code: ErrorCode::TypeMismatch,
        property_name: name.to_string(),
        message: rule.mismatch_message(name, value),
    }
}
