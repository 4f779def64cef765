//! The in-memory graph shape evaluated by the [`Evaluator`](crate::evaluator::Evaluator).
//!
//! A graph is an ordered list of node instances plus the index of the node whose
//! output is the overall result. Nodes refer to each other by index through their
//! `connections`. The serde field aliases accept both host vocabularies
//! (`operations`/`resultOperation`/`op` and `steps`/`resultStep`/`template`).

mod check;

pub use check::*;

use crate::value::{InputValues, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Editor layout metadata. Ignored by evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One placed occurrence of an operation within a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    #[serde(alias = "op", alias = "template")]
    pub operation: String,
    #[serde(default)]
    pub input: Option<InputValues>,
    /// Input name to upstream node index.
    #[serde(default)]
    pub connections: Option<IndexMap<String, usize>>,
    #[serde(default, alias = "pos")]
    pub position: Option<Position>,
}

impl NodeInstance {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            input: None,
            connections: None,
            position: None,
        }
    }

    /// Binds a literal value to an input.
    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.input
            .get_or_insert_with(InputValues::new)
            .insert(name.into(), value.into());
        self
    }

    /// Wires an input to the output of the node at `source`.
    pub fn with_connection(mut self, name: impl Into<String>, source: usize) -> Self {
        self.connections
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), source);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    /// Connections in declaration order; empty when none are set.
    pub fn connection_iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.connections
            .iter()
            .flatten()
            .map(|(name, &source)| (name.as_str(), source))
    }

    /// The connection declared at `position`, counting in declaration order.
    pub fn connection_at(&self, position: usize) -> Option<(&str, usize)> {
        let (name, &source) = self.connections.as_ref()?.get_index(position)?;
        Some((name.as_str(), source))
    }
}

/// An ordered collection of node instances plus the index of the result node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(alias = "operations", alias = "steps")]
    pub nodes: Vec<NodeInstance>,
    #[serde(
        rename = "resultIndex",
        alias = "resultOperation",
        alias = "resultStep",
        alias = "result_index"
    )]
    pub result_index: usize,
}

impl Graph {
    pub fn new(nodes: Vec<NodeInstance>, result_index: usize) -> Self {
        Self {
            nodes,
            result_index,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn node(&self, index: usize) -> Option<&NodeInstance> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
