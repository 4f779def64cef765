use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

/// Numeric classification of a single validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum ErrorCode {
    /// A value was supplied under a name the schema does not declare.
    ExtraProperty = 1,
    /// A required input was null or missing.
    MissingRequired = 2,
    /// A value was present but rejected by its field rule.
    TypeMismatch = 3,
}

impl ErrorCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// One reason a call to `execute` was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ValidationError {
    pub error_code: ErrorCode,
    pub property_name: String,
    pub message: String,
}

/// The complete, ordered list of validation errors produced by one call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("ValidationErrors:\n{}", render_messages(.errors))]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

fn render_messages(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| e.message.as_str()).join("\n  ")
}

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Numeric codes in report order.
    pub fn codes(&self) -> Vec<u8> {
        self.errors.iter().map(|e| e.error_code.code()).collect()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// A failure raised by an operation's template function itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TemplateError(pub String);

impl TemplateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur when executing a single operation.
#[derive(Error, Debug, Clone)]
pub enum ExecuteError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Template failed: {0}")]
    Template(#[from] TemplateError),
}

impl ExecuteError {
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            ExecuteError::Validation(set) => Some(set.errors()),
            ExecuteError::Template(_) => None,
        }
    }
}

/// Errors that can occur while evaluating a graph.
#[derive(Error, Debug, Clone)]
pub enum EvaluationError {
    #[error(
        "Graph is invalid, it contains a circular definition for node {node_index}, nodes run so far: {}",
        .path.iter().join(",")
    )]
    CircularDefinition { node_index: usize, path: Vec<usize> },

    #[error("Node {node_index} not found{}", describe_referrer(.referenced_by))]
    NodeNotFound {
        node_index: usize,
        referenced_by: Option<usize>,
    },

    #[error("Operation '{operation_name}' is not registered{}", describe_location(.node_index))]
    UnknownOperation {
        operation_name: String,
        node_index: Option<usize>,
    },

    #[error("Operation '{operation_name}' failed{}: {source}", describe_location(.node_index))]
    Operation {
        node_index: Option<usize>,
        operation_name: String,
        #[source]
        source: ExecuteError,
    },

    #[error("Node {node_index} exceeds the maximum evaluation depth of {limit}")]
    DepthLimitExceeded { node_index: usize, limit: usize },
}

fn describe_referrer(referenced_by: &Option<usize>) -> String {
    match referenced_by {
        Some(index) => format!(", which is required by a connection from node {}", index),
        None => " (result index)".to_string(),
    }
}

fn describe_location(node_index: &Option<usize>) -> String {
    node_index
        .map(|index| format!(" at node {}", index))
        .unwrap_or_default()
}

impl EvaluationError {
    /// The aggregated validation errors, when a node was rejected by its schema.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            EvaluationError::Operation { source, .. } => source.validation_errors(),
            _ => None,
        }
    }

    /// The node the failure is attributed to, if any.
    pub fn node_index(&self) -> Option<usize> {
        match self {
            EvaluationError::CircularDefinition { node_index, .. }
            | EvaluationError::NodeNotFound { node_index, .. }
            | EvaluationError::DepthLimitExceeded { node_index, .. } => Some(*node_index),
            EvaluationError::UnknownOperation { node_index, .. }
            | EvaluationError::Operation { node_index, .. } => *node_index,
        }
    }
}

/// A problem found by the static graph check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    #[error("Result index {result_index} is out of range for a graph of {node_count} nodes")]
    ResultOutOfRange {
        result_index: usize,
        node_count: usize,
    },

    #[error("Node {node_index} connects input '{input}' to missing node {upstream}")]
    ConnectionOutOfRange {
        node_index: usize,
        input: String,
        upstream: usize,
    },

    #[error("Node {node_index} uses unregistered operation '{operation_name}'")]
    UnknownOperation {
        node_index: usize,
        operation_name: String,
    },

    #[error("Node {node_index} has a connection into undeclared input '{input}'")]
    UndeclaredInput { node_index: usize, input: String },

    #[error(
        "Node {node_index} input '{input}' expects {expected}, but node {upstream} produces {found}"
    )]
    WireTypeMismatch {
        node_index: usize,
        input: String,
        upstream: usize,
        expected: String,
        found: String,
    },

    #[error("Node {node_index} closes a circular definition")]
    Cycle { node_index: usize },
}
