//! Fixture builders shared by unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use serde_json::{Value, json};

use crate::diagnostics::DiagnosticLog;
use crate::extractor::{Extraction, extract_interface};
use crate::model::InterfaceModel;
use crate::options::ProcessorOptions;
use crate::symbols::ClassDeclaration;
use crate::validator::{ValidationContext, ValidationResult, ValidatorStrategy};

/// `com.example.TestService` in `src/TestService.kt`, with `extra` merged in.
pub fn class(extra: Value) -> ClassDeclaration {
    let mut class = json!({
        "qualifiedName": "com.example.TestService",
        "file": { "path": "src/TestService.kt" },
        "functions": []
    });
    if let (Some(target), Some(extra)) = (class.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(class).unwrap()
}

/// Extracted model of [`class`], panics when extraction does not produce one.
pub fn model(extra: Value) -> InterfaceModel {
    let mut log = DiagnosticLog::new("test");
    match extract_interface(&class(extra), &[], &mut log.root()).unwrap() {
        Extraction::Ready(model) => model,
        other => panic!("extraction did not produce a model: {other:?}\n{}", log.tree_report()),
    }
}

/// Model with a single function.
pub fn single(function: Value) -> InterfaceModel {
    model(json!({ "functions": [function] }))
}

/// Abstract suspend function.
pub fn function(name: &str, annotations: Value, parameters: Value, return_type: Value) -> Value {
    json!({
        "name": name,
        "modifiers": ["suspend", "abstract"],
        "annotations": annotations,
        "parameters": parameters,
        "returnType": return_type
    })
}

pub fn annotation(name: &str, arguments: Value) -> Value {
    json!({ "qualifiedName": name, "arguments": arguments })
}

pub fn parameter(name: &str, type_ref: Value, annotations: Value) -> Value {
    json!({ "name": name, "type": type_ref, "annotations": annotations })
}

pub fn named(name: &str) -> Value {
    json!({ "qualifiedName": name })
}

pub fn nullable(name: &str) -> Value {
    json!({ "qualifiedName": name, "nullable": true })
}

pub fn generic(name: &str, arguments: Value) -> Value {
    json!({ "qualifiedName": name, "arguments": arguments })
}

pub fn string() -> Value {
    named("kotlin.String")
}

pub fn run(validator: &dyn ValidatorStrategy, model: &InterfaceModel) -> ValidationResult {
    run_with(validator, model, &ProcessorOptions::default())
}

pub fn run_with(validator: &dyn ValidatorStrategy, model: &InterfaceModel, options: &ProcessorOptions) -> ValidationResult {
    validator.validate(&ValidationContext::new(model, options))
}

/// Messages of the findings, errors and warnings mixed in order.
pub fn messages(result: &ValidationResult) -> Vec<String> {
    result.findings().iter().map(|finding| finding.message.clone()).collect()
}
