//! Operation definitions: a schema, a template function and a declared output type.

use crate::error::{ExecuteError, TemplateError};
use crate::schema::{FieldRule, PropertyType, Schema, ValidationMode, validate};
use crate::types::Descriptor;
use crate::value::{InputValues, Value};
use std::fmt;
use std::sync::Arc;

/// The pure function behind an operation.
pub type Template = Arc<dyn Fn(&InputValues) -> Result<Value, TemplateError> + Send + Sync>;

/// An operation whose inputs are described by composable descriptors.
pub type CodeTemplate = OperationDefinition<Descriptor>;

/// An operation whose inputs are described by flat `typeName`/`nullable` records.
pub type CircuitDefinition = OperationDefinition<PropertyType>;

/// A named, schema-validated computation unit.
///
/// Definitions are created once by the host and are read-only afterwards; they can
/// be shared across threads and evaluated concurrently.
#[derive(Clone)]
pub struct OperationDefinition<R = Descriptor> {
    schema: Schema<R>,
    output: Descriptor,
    template: Template,
}

impl<R: FieldRule> OperationDefinition<R> {
    pub fn new<F>(schema: Schema<R>, template: F, output: impl Into<Descriptor>) -> Self
    where
        F: Fn(&InputValues) -> Result<Value, TemplateError> + Send + Sync + 'static,
    {
        Self {
            schema,
            output: output.into(),
            template: Arc::new(template),
        }
    }

    /// Validates `values` with the compatible (lenient) rules, then runs the template.
    pub fn execute(&self, values: &InputValues) -> Result<Value, ExecuteError> {
        self.execute_with(values, ValidationMode::Lenient)
    }

    /// Validates `values` in the given mode, then runs the template.
    ///
    /// The template is never invoked when validation reports any error. The
    /// returned value is not checked against the declared output descriptor.
    pub fn execute_with(
        &self,
        values: &InputValues,
        mode: ValidationMode,
    ) -> Result<Value, ExecuteError> {
        validate(&self.schema, values, mode)?;
        Ok((self.template)(values)?)
    }
}

impl<R> OperationDefinition<R> {
    pub fn schema(&self) -> &Schema<R> {
        &self.schema
    }

    /// Declared output type, used by tooling to check wires.
    pub fn output(&self) -> &Descriptor {
        &self.output
    }
}

impl<R: fmt::Debug> fmt::Debug for OperationDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDefinition")
            .field("schema", &self.schema)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
