use clap::Parser;
use patchbay::prelude::*;
use serde_json::json;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Evaluate a patchbay graph against the built-in operation library
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph JSON file
    graph_path: String,

    /// Enforce nested object field types
    #[arg(long)]
    strict: bool,

    /// Maximum number of nodes on one evaluation path
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Only run the static wire check, never evaluate
    #[arg(long)]
    check_only: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let graph_json = fs::read_to_string(&cli.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            &cli.graph_path, e
        ))
    });
    let graph = Graph::from_json(&graph_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse graph JSON: {}", e)));
    let operations = builtin_operations();

    if cli.check_only {
        match check(&graph, &operations) {
            Ok(()) => println!("Graph OK: {} nodes, result node {}", graph.len(), graph.result_index),
            Err(issues) => {
                eprintln!("\nGraph check found {} issue(s):", issues.len());
                for issue in &issues {
                    eprintln!("  - {}", issue);
                }
                std::process::exit(1);
            }
        }
        return;
    }

    let mut builder = Evaluator::builder(&operations);
    if cli.strict {
        builder = builder.strict();
    }
    if let Some(limit) = cli.max_depth {
        builder = builder.max_depth(limit);
    }
    let evaluator = builder.build();

    let eval_start = Instant::now();
    let result = evaluator.run::<Descriptor>(&graph);
    let eval_duration = eval_start.elapsed();

    match result {
        Ok(value) => {
            let rendered = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to render result: {}", e)));
            println!("{}", rendered);
            eprintln!("Evaluated {} nodes in {:?}", graph.len(), eval_duration);
        }
        Err(error) => {
            if let Some(errors) = error.validation_errors() {
                eprintln!("\nValidation failed with {} error(s):", errors.len());
                for e in errors {
                    eprintln!("  [{}] {}: {}", e.error_code.code(), e.property_name, e.message);
                }
            }
            exit_with_error(&error.to_string());
        }
    }
}

/// The demo library every graph file is evaluated against.
fn builtin_operations() -> HashMap<String, CodeTemplate> {
    let mut operations = HashMap::new();
    operations.insert(
        "addition".to_string(),
        CodeTemplate::new(
            schema! {
                "a" => Types::number().required(),
                "b" => Types::number().required(),
            },
            |values| {
                let a = values["a"].as_f64().unwrap_or_default();
                let b = values["b"].as_f64().unwrap_or_default();
                Ok(number(a + b))
            },
            Types::number(),
        ),
    );
    operations.insert(
        "numberToString".to_string(),
        CodeTemplate::new(
            schema! { "input" => Types::number().required() },
            |values| Ok(json!(values["input"].to_string())),
            Types::string(),
        ),
    );
    operations.insert(
        "concatStrings".to_string(),
        CodeTemplate::new(
            schema! {
                "a" => Types::string().required(),
                "b" => Types::string().required(),
            },
            |values| {
                let a = values["a"].as_str().unwrap_or_default();
                let b = values["b"].as_str().unwrap_or_default();
                Ok(json!(format!("{a}{b}")))
            },
            Types::string(),
        ),
    );
    operations.insert(
        "join".to_string(),
        CodeTemplate::new(
            schema! {
                "items" => Types::array().of(Types::string()).required(),
                "separator" => Types::string(),
            },
            |values| {
                let separator = values
                    .get("separator")
                    .and_then(Value::as_str)
                    .unwrap_or(",");
                let items = values["items"].as_array().ok_or_else(|| {
                    TemplateError::new("items must be an array of strings")
                })?;
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(separator);
                Ok(json!(joined))
            },
            Types::string(),
        ),
    );
    operations.insert(
        "uppercase".to_string(),
        CodeTemplate::new(
            schema! { "text" => Types::string().required() },
            |values| Ok(json!(values["text"].as_str().unwrap_or_default().to_uppercase())),
            Types::string(),
        ),
    );
    operations
}

/// Keeps whole sums integral so `1 + 2` prints as `3`, not `3.0`.
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
