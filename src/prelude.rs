//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types, traits and macros from the
//! patchbay crate.
//!
//! # Example
//!
//! ```rust
//! use patchbay::prelude::*;
//!
//! let greet: CodeTemplate = CodeTemplate::new(
//!     schema! { "name" => Types::string().required() },
//!     |values| Ok(Value::from(format!("hello {}", values["name"].as_str().unwrap_or("")))),
//!     Types::string(),
//! );
//! let result = greet.execute(&inputs! { "name" => "world" }).unwrap();
//! assert_eq!(result, "hello world");
//! ```

// Operations and evaluation
pub use crate::evaluator::{Evaluator, EvaluatorOptions, OperationTable, execute, run};
pub use crate::operation::{CircuitDefinition, CodeTemplate, OperationDefinition};

// Schemas and descriptors
pub use crate::schema::{FieldRule, PropertyType, Schema, ValidationMode};
pub use crate::types::{Descriptor, Types};
pub use crate::value::{InputValues, Value};

// Graph model
pub use crate::graph::{Graph, NodeInstance, Position, check};

// Error types
pub use crate::error::{
    ErrorCode, EvaluationError, ExecuteError, GraphIssue, TemplateError, ValidationError,
    ValidationErrors,
};

// Macros
pub use crate::{inputs, schema};

// Standard library re-exports commonly used with this crate
pub use std::collections::HashMap;
