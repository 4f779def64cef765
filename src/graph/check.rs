use super::Graph;
use crate::error::GraphIssue;
use crate::evaluator::OperationTable;
use crate::schema::FieldRule;
use std::collections::BTreeSet;
use tracing::debug;

/// Statically checks a graph without invoking any template.
///
/// Reports every out-of-range index, unknown operation, connection into an
/// undeclared input, wire whose upstream output type cannot feed the target
/// input, and node that closes a cycle. Evaluation performs its own checks
/// regardless; this is the editor-side lint for wires.
pub fn check<R, T>(graph: &Graph, table: &T) -> Result<(), Vec<GraphIssue>>
where
    R: FieldRule,
    T: OperationTable<R> + ?Sized,
{
    let mut issues = Vec::new();

    if graph.result_index >= graph.len() {
        issues.push(GraphIssue::ResultOutOfRange {
            result_index: graph.result_index,
            node_count: graph.len(),
        });
    }

    for (index, node) in graph.nodes.iter().enumerate() {
        let definition = table.operation(&node.operation);
        if definition.is_none() {
            issues.push(GraphIssue::UnknownOperation {
                node_index: index,
                operation_name: node.operation.clone(),
            });
        }

        for (input, source) in node.connection_iter() {
            let Some(upstream) = graph.node(source) else {
                issues.push(GraphIssue::ConnectionOutOfRange {
                    node_index: index,
                    input: input.to_string(),
                    upstream: source,
                });
                continue;
            };
            let Some(definition) = definition else {
                continue;
            };
            let Some(rule) = definition.schema().get(input) else {
                issues.push(GraphIssue::UndeclaredInput {
                    node_index: index,
                    input: input.to_string(),
                });
                continue;
            };
            if let Some(producer) = table.operation(&upstream.operation) {
                let produced = producer.output().type_name();
                if !wire_accepts(rule.type_name(), produced) {
                    issues.push(GraphIssue::WireTypeMismatch {
                        node_index: index,
                        input: input.to_string(),
                        upstream: source,
                        expected: rule.type_name().to_string(),
                        found: produced.to_string(),
                    });
                }
            }
        }
    }

    issues.extend(
        find_cycle_closers(graph)
            .into_iter()
            .map(|node_index| GraphIssue::Cycle { node_index }),
    );

    if issues.is_empty() {
        Ok(())
    } else {
        debug!(issue_count = issues.len(), "graph check found issues");
        Err(issues)
    }
}

/// Whether an input of type `expected` can take an output of type `produced`.
///
/// Flat rules name arrays `object`, so an `object` input also takes arrays.
fn wire_accepts(expected: &str, produced: &str) -> bool {
    expected == produced || (expected == "object" && produced == "array")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Returns every node that is the target of a back edge, in index order.
fn find_cycle_closers(graph: &Graph) -> BTreeSet<usize> {
    let mut marks = vec![Mark::Unvisited; graph.len()];
    let mut closers = BTreeSet::new();
    for start in 0..graph.len() {
        if marks[start] == Mark::Unvisited {
            visit(graph, start, &mut marks, &mut closers);
        }
    }
    closers
}

/// Depth-first walk from `start` on an explicit stack of `(node, next edge)` pairs.
fn visit(graph: &Graph, start: usize, marks: &mut [Mark], closers: &mut BTreeSet<usize>) {
    let mut stack = vec![(start, 0)];
    marks[start] = Mark::OnPath;
    while let Some((index, edge)) = stack.last_mut() {
        let index = *index;
        let upstream = graph.nodes[index].connection_at(*edge);
        *edge += 1;
        let Some((_, source)) = upstream else {
            marks[index] = Mark::Done;
            stack.pop();
            continue;
        };
        match marks.get(source) {
            Some(Mark::Unvisited) => {
                marks[source] = Mark::OnPath;
                stack.push((source, 0));
            }
            Some(Mark::OnPath) => {
                closers.insert(source);
            }
            Some(Mark::Done) | None => {}
        }
    }
}
