use crate::error::EvaluationError;
use crate::graph::{Graph, NodeInstance};
use crate::operation::OperationDefinition;
use crate::schema::{FieldRule, ValidationMode};
use crate::value::{InputValues, Value};
use ahash::AHashSet;
use tracing::{debug, trace};

mod table;

pub use table::OperationTable;

/// Settings applied to every node of an evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Validation mode used for every operation call.
    pub mode: ValidationMode,
    /// Maximum number of nodes on one evaluation path. `None` means unbounded.
    pub max_depth: Option<usize>,
}

/// Evaluates graphs of operation instances against a read-only operation table.
///
/// An `Evaluator` holds no per-run state: every call to [`Evaluator::run`] starts a
/// fresh traversal, so one evaluator can be reused and shared between threads as
/// long as the table is `Sync`.
#[derive(Debug)]
pub struct Evaluator<'a, T: ?Sized> {
    table: &'a T,
    options: EvaluatorOptions,
}

pub struct EvaluatorBuilder<'a, T: ?Sized> {
    table: &'a T,
    options: EvaluatorOptions,
}

impl<'a, T: ?Sized> EvaluatorBuilder<'a, T> {
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Enforces nested object field types for every node.
    pub fn strict(self) -> Self {
        self.mode(ValidationMode::Strict)
    }

    pub fn max_depth(mut self, limit: usize) -> Self {
        self.options.max_depth = Some(limit);
        self
    }

    pub fn options(mut self, options: EvaluatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Evaluator<'a, T> {
        Evaluator {
            table: self.table,
            options: self.options,
        }
    }
}

impl<'a, T: ?Sized> Evaluator<'a, T> {
    pub fn new(table: &'a T) -> Self {
        Self {
            table,
            options: EvaluatorOptions::default(),
        }
    }

    pub fn builder(table: &'a T) -> EvaluatorBuilder<'a, T> {
        EvaluatorBuilder {
            table,
            options: EvaluatorOptions::default(),
        }
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Evaluates `graph` from its result node down to its leaves.
    ///
    /// Each node's inputs are its literal inputs overlaid with the results of its
    /// connected upstream nodes (a connection wins over a literal under the same
    /// name). There is no memoization: a node reachable through two paths is
    /// evaluated once per path.
    ///
    /// The walk keeps its own frame stack instead of recursing, so chain length is
    /// bounded by memory rather than by the thread's call stack.
    ///
    /// # Errors
    ///
    /// * [`EvaluationError::CircularDefinition`] when a node appears twice on one path.
    /// * [`EvaluationError::NodeNotFound`] for an out-of-range result or connection index.
    /// * [`EvaluationError::UnknownOperation`] when a node names an operation the table lacks.
    /// * [`EvaluationError::Operation`] when a node's operation rejects its inputs or its
    ///   template fails; the aggregated validation errors stay reachable through
    ///   [`EvaluationError::validation_errors`].
    /// * [`EvaluationError::DepthLimitExceeded`] when `max_depth` is configured and exceeded.
    pub fn run<R: FieldRule>(&self, graph: &Graph) -> Result<Value, EvaluationError>
    where
        T: OperationTable<R>,
    {
        debug!(
            nodes = graph.len(),
            result_index = graph.result_index,
            "evaluating graph"
        );
        let mut path = Path::new();
        let root = self.enter::<R>(graph, graph.result_index, None, &path)?;
        path.push(root);

        let mut returned: Option<Value> = None;
        while let Some(frame) = path.top_mut() {
            if let (Some(value), Some(name)) = (returned.take(), frame.awaiting.take()) {
                frame.values.insert(name.to_string(), value);
            }
            if let Some((name, source)) = frame.next_connection() {
                frame.awaiting = Some(name);
                let referenced_by = frame.index;
                let child = self.enter::<R>(graph, source, Some(referenced_by), &path)?;
                path.push(child);
                continue;
            }
            if let Some(frame) = path.pop() {
                returned = Some(self.invoke(frame)?);
            }
        }
        // The last value handed back is the result node's own.
        Ok(returned.unwrap_or_default())
    }

    /// Invokes a single operation by name, bypassing any graph.
    pub fn execute<R: FieldRule>(
        &self,
        operation_name: &str,
        values: &InputValues,
    ) -> Result<Value, EvaluationError>
    where
        T: OperationTable<R>,
    {
        let definition = self.table.operation(operation_name).ok_or_else(|| {
            EvaluationError::UnknownOperation {
                operation_name: operation_name.to_string(),
                node_index: None,
            }
        })?;
        definition
            .execute_with(values, self.options.mode)
            .map_err(|source| EvaluationError::Operation {
                node_index: None,
                operation_name: operation_name.to_string(),
                source,
            })
    }

    /// Opens a frame for node `index`, checking the path, the depth limit, the index
    /// and the operation name before any of its inputs are resolved.
    fn enter<'g, R: FieldRule>(
        &'g self,
        graph: &'g Graph,
        index: usize,
        referenced_by: Option<usize>,
        path: &Path<'g, R>,
    ) -> Result<Frame<'g, R>, EvaluationError>
    where
        T: OperationTable<R>,
        R: 'g,
    {
        if path.contains(index) {
            let path = path.indices();
            debug!(node = index, ?path, "circular definition detected");
            return Err(EvaluationError::CircularDefinition {
                node_index: index,
                path,
            });
        }
        if let Some(limit) = self.options.max_depth {
            if path.len() >= limit {
                return Err(EvaluationError::DepthLimitExceeded {
                    node_index: index,
                    limit,
                });
            }
        }

        let node = graph
            .node(index)
            .ok_or(EvaluationError::NodeNotFound {
                node_index: index,
                referenced_by,
            })?;
        let definition = self.table.operation(&node.operation).ok_or_else(|| {
            EvaluationError::UnknownOperation {
                operation_name: node.operation.clone(),
                node_index: Some(index),
            }
        })?;

        trace!(node = index, operation = %node.operation, depth = path.len(), "resolving node");
        Ok(Frame {
            index,
            node,
            definition,
            values: node.input.clone().unwrap_or_default(),
            next: 0,
            awaiting: None,
        })
    }

    fn invoke<R: FieldRule>(&self, frame: Frame<'_, R>) -> Result<Value, EvaluationError> {
        frame
            .definition
            .execute_with(&frame.values, self.options.mode)
            .map_err(|source| {
                debug!(node = frame.index, operation = %frame.node.operation, error = %source, "node failed");
                EvaluationError::Operation {
                    node_index: Some(frame.index),
                    operation_name: frame.node.operation.clone(),
                    source,
                }
            })
    }
}

/// One node whose inputs are being gathered.
struct Frame<'g, R> {
    index: usize,
    node: &'g NodeInstance,
    definition: &'g OperationDefinition<R>,
    /// Literal inputs first, then each resolved connection in declaration order.
    values: InputValues,
    next: usize,
    /// Input name waiting for the value of the frame above this one.
    awaiting: Option<&'g str>,
}

impl<'g, R> Frame<'g, R> {
    fn next_connection(&mut self) -> Option<(&'g str, usize)> {
        let node: &'g NodeInstance = self.node;
        let connection = node.connection_at(self.next)?;
        self.next += 1;
        Some(connection)
    }
}

/// The nodes currently being evaluated, outermost first.
///
/// No index may appear twice; the set mirrors the frame list for constant-time lookups.
struct Path<'g, R> {
    frames: Vec<Frame<'g, R>>,
    on_path: AHashSet<usize>,
}

impl<'g, R> Path<'g, R> {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            on_path: AHashSet::new(),
        }
    }

    fn push(&mut self, frame: Frame<'g, R>) {
        self.on_path.insert(frame.index);
        self.frames.push(frame);
    }

    fn pop(&mut self) -> Option<Frame<'g, R>> {
        let frame = self.frames.pop()?;
        self.on_path.remove(&frame.index);
        Some(frame)
    }

    fn top_mut(&mut self) -> Option<&mut Frame<'g, R>> {
        self.frames.last_mut()
    }

    fn contains(&self, index: usize) -> bool {
        self.on_path.contains(&index)
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn indices(&self) -> Vec<usize> {
        self.frames.iter().map(|frame| frame.index).collect()
    }
}

/// Evaluates `graph` against `table` with default options.
pub fn run<R, T>(graph: &Graph, table: &T) -> Result<Value, EvaluationError>
where
    R: FieldRule,
    T: OperationTable<R> + ?Sized,
{
    Evaluator::new(table).run::<R>(graph)
}

/// Invokes the operation registered under `operation_name` with `values`.
pub fn execute<R, T>(
    table: &T,
    operation_name: &str,
    values: &InputValues,
) -> Result<Value, EvaluationError>
where
    R: FieldRule,
    T: OperationTable<R> + ?Sized,
{
    Evaluator::new(table).execute::<R>(operation_name, values)
}
