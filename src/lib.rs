//! # Patchbay - Validated Operations and Graph Evaluation
//!
//! **Patchbay** is the runtime engine behind a node-and-wire value generation tool.
//! Users compose named, reusable *operations* (pure functions with a declared input
//! schema and output type) into a graph, and Patchbay evaluates that graph from a
//! single result node down to its leaves.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Inputs**: Build a [`Schema`] with composable [`Descriptor`]s from
//!     [`types::Types`] (or flat [`PropertyType`] records).
//! 2.  **Define Operations**: Pair each schema with a template function and an output
//!     descriptor in an [`OperationDefinition`]. Every call to `execute` validates its
//!     inputs first and reports *all* problems at once.
//! 3.  **Register**: Put the definitions in any map keyed by name; the engine only
//!     needs a read-only [`OperationTable`].
//! 4.  **Evaluate**: Hand a [`Graph`] and the table to [`run`] (or an [`Evaluator`]
//!     configured through [`Evaluator::builder`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use patchbay::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut operations: HashMap<String, CodeTemplate> = HashMap::new();
//!     operations.insert(
//!         "addition".to_string(),
//!         CodeTemplate::new(
//!             schema! {
//!                 "a" => Types::number().required(),
//!                 "b" => Types::number().required(),
//!             },
//!             |values| {
//!                 let a = values["a"].as_i64().unwrap_or_default();
//!                 let b = values["b"].as_i64().unwrap_or_default();
//!                 Ok(json!(a + b))
//!             },
//!             Types::number(),
//!         ),
//!     );
//!     operations.insert(
//!         "numberToString".to_string(),
//!         CodeTemplate::new(
//!             schema! { "input" => Types::number().required() },
//!             |values| Ok(json!(values["input"].to_string())),
//!             Types::string(),
//!         ),
//!     );
//!
//!     let graph = Graph::new(
//!         vec![
//!             NodeInstance::new("addition").with_input("a", 1).with_input("b", 2),
//!             NodeInstance::new("numberToString").with_connection("input", 0),
//!         ],
//!         1,
//!     );
//!
//!     let result = run(&graph, &operations)?;
//!     assert_eq!(result, json!("3"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod evaluator;
pub mod graph;
pub mod operation;
pub mod prelude;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{
    ErrorCode, EvaluationError, ExecuteError, GraphIssue, TemplateError, ValidationError,
    ValidationErrors,
};
pub use evaluator::{Evaluator, EvaluatorOptions, OperationTable, execute, run};
pub use graph::{Graph, NodeInstance, Position, check};
pub use operation::{CircuitDefinition, CodeTemplate, OperationDefinition};
pub use schema::{FieldRule, PropertyType, Schema, ValidationMode, validate};
pub use types::Descriptor;
pub use value::{InputValues, Value};

#[doc(hidden)]
pub use serde_json;
