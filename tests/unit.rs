//! Unit tests for operation validation and its error taxonomy.
mod common;
use common::*;
use patchbay::prelude::*;
use serde_json::json;

fn hello_world(schema: Schema<Descriptor>) -> CodeTemplate {
    CodeTemplate::new(
        schema,
        |values| {
            let test = values.get("test").map(|v| v.to_string()).unwrap_or_default();
            Ok(json!(format!("hello world {}", test)))
        },
        Types::string(),
    )
}

fn nested_shape() -> Schema<Descriptor> {
    schema! {
        "test" => Types::shape()
            .field(
                "hello",
                Types::shape()
                    .field("testing", Types::array().of(Types::string().required()).required())
                    .required(),
            )
            .required(),
    }
}

fn codes(err: &ExecuteError) -> Vec<u8> {
    err.validation_errors()
        .unwrap()
        .iter()
        .map(|e| e.error_code.code())
        .collect()
}

#[test]
fn test_extra_properties_are_code_1() {
    let err = hello_world(Schema::new())
        .execute(&inputs! { "test" => 1 })
        .unwrap_err();
    assert_eq!(codes(&err), vec![1]);
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors[0].property_name, "test");
    assert!(errors[0].message.starts_with("Extra property given 'test'"));
}

#[test]
fn test_null_for_required_reports_exact_duplicate_count() {
    let err = hello_world(schema! { "test" => Types::string().required() })
        .execute(&inputs! { "test" => null })
        .unwrap_err();
    assert_eq!(codes(&err), vec![2, 3, 2]);
}

#[test]
fn test_missing_required_is_code_2_once() {
    let err = hello_world(schema! { "test" => Types::string().required() })
        .execute(&inputs! {})
        .unwrap_err();
    assert_eq!(codes(&err), vec![2]);
}

#[test]
fn test_wrong_primitive_type_is_code_3() {
    let err = hello_world(schema! { "test" => Types::string() })
        .execute(&inputs! { "test" => 1 })
        .unwrap_err();
    assert_eq!(codes(&err), vec![3]);
    assert_eq!(
        err.validation_errors().unwrap()[0].message,
        "Mismatched type for 'test': the operation was run with a mismatched type got 'number' expected 'string'"
    );
}

#[test]
fn test_runs_with_required_array_of_required_strings() {
    let definition = hello_world(schema! {
        "test" => Types::array().of(Types::string().required()).required(),
    });
    assert!(definition.execute(&inputs! { "test" => ["hi", "hi"] }).is_ok());
}

#[test]
fn test_optional_array_may_be_absent_but_required_may_not() {
    let optional = hello_world(schema! { "test" => Types::array().of(Types::string()) });
    assert!(optional.execute(&inputs! {}).is_ok());
    assert!(optional.execute(&inputs! { "test" => null }).is_ok());

    let required = hello_world(schema! { "test" => Types::array().of(Types::string()).required() });
    let err = required.execute(&inputs! {}).unwrap_err();
    assert_eq!(codes(&err), vec![2]);
}

#[test]
fn test_complex_shape_that_matches() {
    let definition = hello_world(nested_shape());
    let result = definition.execute(&inputs! { "test" => { "hello": { "testing": ["hi", "hi"] } } });
    assert!(result.is_ok());
}

#[test]
fn test_complex_shape_that_does_not_match() {
    let definition = hello_world(nested_shape());
    let err = definition
        .execute(&inputs! { "test" => ["hi", "hi"] })
        .unwrap_err();
    assert_eq!(codes(&err), vec![3]);
    let message = &err.validation_errors().unwrap()[0].message;
    assert!(message.contains("{ string: { string: [ string ] } }"));
    assert!(message.ends_with(r#"for ["hi","hi"]"#));
}

#[test]
fn test_lenient_shape_keeps_wrong_nested_types() {
    let definition = hello_world(nested_shape());
    let value = inputs! { "test" => { "hello": { "testing": "not an array" } } };
    assert!(definition.execute(&value).is_ok());
    assert!(definition.execute_with(&value, ValidationMode::Strict).is_err());
}

#[test]
fn test_round_trip_returns_template_output() {
    let table = code_templates();
    let concat = &table["concatStrings"];
    let result = concat.execute(&inputs! { "a" => "x", "b" => "y" }).unwrap();
    assert_eq!(result, json!("xy"));
}

#[test]
fn test_flat_schema_taxonomy() {
    let table = circuits();
    let addition = &table["addition"];

    let err = addition
        .execute(&inputs! { "a" => "1", "b" => null, "z" => 0 })
        .unwrap_err();
    // a: mismatch, b: null (+ mismatch, typeof null is object), z: extra, b again from schema pass
    assert_eq!(codes(&err), vec![3, 2, 3, 1, 2]);
}

#[test]
fn test_template_never_runs_on_invalid_input() {
    let (definition, calls) =
        counting_operation(schema! { "n" => Types::number().required() }, json!(null));
    assert!(definition.execute(&inputs! { "n" => "x" }).is_err());
    assert!(definition.execute(&inputs! { "n" => 1, "m" => 2 }).is_err());
    assert!(definition.execute(&inputs! {}).is_err());
    assert_eq!(call_count(&calls), 0);
}

#[test]
fn test_error_display() {
    let err = hello_world(schema! { "test" => Types::string().required() })
        .execute(&inputs! { "extra" => true })
        .unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("ValidationErrors:\nExtra property given 'extra'"));
    assert!(text.contains("\n  Unexpected null property for 'test'"));

    let eval_err = EvaluationError::CircularDefinition {
        node_index: 1,
        path: vec![1, 0],
    };
    assert_eq!(
        eval_err.to_string(),
        "Graph is invalid, it contains a circular definition for node 1, nodes run so far: 1,0"
    );
}

#[test]
fn test_validation_errors_serialize_with_numeric_codes() {
    let err = hello_world(Schema::new())
        .execute(&inputs! { "test" => 1 })
        .unwrap_err();
    let record = serde_json::to_value(&err.validation_errors().unwrap()[0]).unwrap();
    assert_eq!(record["errorCode"], json!(1));
    assert_eq!(record["propertyName"], json!("test"));
}

#[test]
fn test_template_error_is_surfaced() {
    let failing: CodeTemplate = OperationDefinition::new(
        Schema::new(),
        |_| Err(TemplateError::new("boom")),
        Types::string(),
    );
    let err = failing.execute(&inputs! {}).unwrap_err();
    assert!(matches!(err, ExecuteError::Template(_)));
    assert!(err.validation_errors().is_none());
    assert_eq!(err.to_string(), "Template failed: boom");
}

#[test]
fn test_output_descriptor_is_not_enforced() {
    let liar: CodeTemplate =
        OperationDefinition::new(Schema::new(), |_| Ok(json!(42)), Types::string().required());
    assert_eq!(liar.execute(&inputs! {}).unwrap(), json!(42));
    assert_eq!(liar.output().type_name(), "string");
}
