//! Integration tests for patchbay
//!
//! End-to-end tests that load host graph documents and evaluate them.
//!
mod common;
use common::*;
use patchbay::prelude::*;
use serde_json::json;

const BOARD_JSON: &str = r#"{
    "operations": [
        { "op": "addition", "input": { "a": 1, "b": 2 }, "connections": null, "pos": { "x": 0, "y": 0 } },
        { "op": "numberToString", "input": null, "connections": { "input": 0 }, "pos": { "x": 0, "y": 100 } },
        { "op": "concatStrings", "input": { "a": "Our result is: " }, "connections": { "b": 1 }, "pos": { "x": 0, "y": 100 } }
    ],
    "resultOperation": 2
}"#;

const WORKFLOW_JSON: &str = r#"{
    "steps": [
        { "template": "addition", "input": { "a": 1, "b": 2 }, "connections": null, "pos": { "x": 0, "y": 0 } },
        { "template": "numberToString", "input": null, "connections": { "input": 0 }, "pos": { "x": 0, "y": 100 } },
        { "template": "concatStrings", "input": { "a": "Our result is: " }, "connections": { "b": 1 }, "pos": null }
    ],
    "resultStep": 2
}"#;

#[test]
fn test_board_document_with_flat_schemas() {
    let graph = Graph::from_json(BOARD_JSON).expect("Failed to parse board");
    assert_eq!(graph.result_index, 2);
    assert_eq!(graph.nodes[1].position, Some(Position { x: 0.0, y: 100.0 }));
    let result = run(&graph, &circuits()).expect("Failed to evaluate board");
    assert_eq!(result, json!("Our result is: 3"));
}

#[test]
fn test_workflow_document_with_descriptor_schemas() {
    let graph = Graph::from_json(WORKFLOW_JSON).expect("Failed to parse workflow");
    let result = run(&graph, &code_templates()).expect("Failed to evaluate workflow");
    assert_eq!(result, json!("Our result is: 3"));
}

#[test]
fn test_graph_round_trips_through_serde() {
    let graph = program_tree();
    let text = serde_json::to_string(&graph).unwrap();
    assert_eq!(Graph::from_json(&text).unwrap(), graph);
}

#[test]
fn test_static_check_accepts_the_program_tree() {
    assert_eq!(check(&program_tree(), &code_templates()), Ok(()));
    assert_eq!(check(&program_tree(), &circuits()), Ok(()));
}

#[test]
fn test_static_check_finds_what_evaluation_would_hit() {
    let graph = Graph::new(
        vec![
            NodeInstance::new("addition").with_input("a", 1).with_input("b", 2),
            NodeInstance::new("concatStrings")
                .with_input("a", "total: ")
                .with_connection("b", 0),
        ],
        1,
    );

    let issues = check(&graph, &code_templates()).unwrap_err();
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        &issues[0],
        GraphIssue::WireTypeMismatch { node_index: 1, upstream: 0, .. }
    ));

    let err = run(&graph, &code_templates()).unwrap_err();
    assert_eq!(err.validation_errors().unwrap()[0].error_code, ErrorCode::TypeMismatch);
}

#[test]
fn test_shared_table_across_threads() {
    let table = code_templates();
    let graph = program_tree();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| run(&graph, &table).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), json!("Our result is: 3"));
        }
    });
}
