//! Common test utilities for building operation tables and graphs.
use patchbay::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn add(values: &InputValues) -> Result<Value, TemplateError> {
    let (a, b) = (&values["a"], &values["b"]);
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => Ok(json!(a + b)),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => Ok(json!(a + b)),
            _ => Err(TemplateError::new("addition needs two numbers")),
        },
    }
}

fn number_to_string(values: &InputValues) -> Result<Value, TemplateError> {
    match &values["input"] {
        Value::Number(n) => Ok(json!(n.to_string())),
        other => Err(TemplateError::new(format!("not a number: {}", other))),
    }
}

fn concat(values: &InputValues) -> Result<Value, TemplateError> {
    let a = values["a"].as_str().unwrap_or_default();
    let b = values["b"].as_str().unwrap_or_default();
    Ok(json!(format!("{}{}", a, b)))
}

/// `addition`, `numberToString` and `concatStrings` with descriptor schemas.
#[allow(dead_code)]
pub fn code_templates() -> HashMap<String, CodeTemplate> {
    let mut table = HashMap::new();
    table.insert(
        "addition".to_string(),
        CodeTemplate::new(
            schema! {
                "a" => Types::number().required(),
                "b" => Types::number().required(),
            },
            add,
            Types::number(),
        ),
    );
    table.insert(
        "numberToString".to_string(),
        CodeTemplate::new(
            schema! { "input" => Types::number().required() },
            number_to_string,
            Types::string(),
        ),
    );
    table.insert(
        "concatStrings".to_string(),
        CodeTemplate::new(
            schema! {
                "a" => Types::string().required(),
                "b" => Types::string().required(),
            },
            concat,
            Types::string(),
        ),
    );
    table
}

/// The same three operations with flat `typeName`/`nullable` schemas.
#[allow(dead_code)]
pub fn circuits() -> HashMap<String, CircuitDefinition> {
    let mut table = HashMap::new();
    table.insert(
        "addition".to_string(),
        CircuitDefinition::new(
            schema! { "a" => PropertyType::number(), "b" => PropertyType::number() },
            add,
            Types::number(),
        ),
    );
    table.insert(
        "numberToString".to_string(),
        CircuitDefinition::new(
            schema! { "input" => PropertyType::number() },
            number_to_string,
            Types::string(),
        ),
    );
    table.insert(
        "concatStrings".to_string(),
        CircuitDefinition::new(
            schema! { "a" => PropertyType::string(), "b" => PropertyType::string() },
            concat,
            Types::string(),
        ),
    );
    table
}

/// `concatStrings("Our result is: ", numberToString(addition(1, 2)))`.
#[allow(dead_code)]
pub fn program_tree() -> Graph {
    Graph::new(
        vec![
            NodeInstance::new("addition")
                .with_input("a", 1)
                .with_input("b", 2)
                .at(0.0, 0.0),
            NodeInstance::new("numberToString")
                .with_connection("input", 0)
                .at(0.0, 100.0),
            NodeInstance::new("concatStrings")
                .with_input("a", "Our result is: ")
                .with_connection("b", 1)
                .at(0.0, 100.0),
        ],
        2,
    )
}

/// An operation that accepts anything and counts how often its template runs.
#[allow(dead_code)]
pub fn counting_operation(
    schema: Schema<Descriptor>,
    output: Value,
) -> (CodeTemplate, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let definition = CodeTemplate::new(
        schema,
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(output.clone())
        },
        Types::string(),
    );
    (definition, calls)
}

#[allow(dead_code)]
pub fn call_count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}

/// A table holding only `identity(x: number) -> x`.
#[allow(dead_code)]
pub fn identity_table() -> HashMap<String, CodeTemplate> {
    let mut table = HashMap::new();
    table.insert(
        "identity".to_string(),
        CodeTemplate::new(
            schema! { "x" => Types::number().required() },
            |values| Ok(values["x"].clone()),
            Types::number(),
        ),
    );
    table
}

/// `length` identity nodes where node `i` reads `x` from node `i - 1`; node 0 holds `seed`.
#[allow(dead_code)]
pub fn identity_chain(length: usize, seed: i64) -> Graph {
    let nodes = (0..length)
        .map(|i| match i {
            0 => NodeInstance::new("identity").with_input("x", seed),
            _ => NodeInstance::new("identity").with_connection("x", i - 1),
        })
        .collect();
    Graph::new(nodes, length - 1)
}
