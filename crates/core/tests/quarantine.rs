//! One bad interface never takes its siblings down, a fatal one aborts the round.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ktorgen_core::options::CheckLevel;
use ktorgen_core::{CollectingSink, KtorGenProcessor, ProcessorOptions, SymbolTable};
use serde_json::{Value, json};

fn service(name: &str, method_annotations: Value, return_type: &str) -> Value {
    json!({
        "qualifiedName": format!("com.example.{name}"),
        "file": { "path": format!("src/{name}.kt") },
        "functions": [{
            "name": "call",
            "modifiers": ["suspend", "abstract"],
            "annotations": method_annotations,
            "returnType": { "qualifiedName": return_type }
        }]
    })
}

fn get(path: &str) -> Value {
    json!({ "qualifiedName": "io.github.kingg22.ktorgen.http.GET", "arguments": { "value": path } })
}

fn head(path: &str) -> Value {
    json!({ "qualifiedName": "io.github.kingg22.ktorgen.http.HEAD", "arguments": { "value": path } })
}

fn symbols(classes: Value) -> SymbolTable {
    serde_json::from_value(json!({ "classes": classes })).expect("valid symbol table")
}

#[test]
fn test_invalid_interface_does_not_block_valid_one() {
    for order in [["Broken", "Healthy"], ["Healthy", "Broken"]] {
        let classes: Vec<Value> = order
            .iter()
            .map(|name| match *name {
                "Broken" => service(name, json!([get("a"), head("b")]), "kotlin.String"),
                _ => service(name, json!([get("posts")]), "kotlin.String"),
            })
            .collect();
        let mut processor = KtorGenProcessor::new(ProcessorOptions::default());
        let mut sink = CollectingSink::default();
        let output = processor.process(&symbols(json!(classes)), &mut sink).unwrap();

        assert_eq!(output.valid, vec!["com.example.Healthy"]);
        assert_eq!(output.dropped, vec!["com.example.Broken"]);
        assert_eq!(output.files.len(), 1);
        assert_eq!(output.files[0].file_name, "_HealthyImpl.kt");
        assert!(sink.errors().any(|error| error.symbol.as_deref().is_some_and(|s| s.starts_with("com.example.Broken"))));
    }
}

#[test]
fn test_expect_interface_aborts_round_after_flushing() {
    let mut expect = service("Multiplatform", json!([get("posts")]), "kotlin.String");
    expect["modifiers"] = json!(["expect"]);
    let classes = json!([service("Healthy", json!([get("posts")]), "kotlin.String"), expect]);

    let mut processor = KtorGenProcessor::new(ProcessorOptions::default());
    let mut sink = CollectingSink::default();
    let err = processor.process(&symbols(classes), &mut sink).unwrap_err();

    assert!(err.to_string().starts_with("Fatal error occurred."));
    assert_eq!(sink.fatal.len(), 1);
    assert!(sink.errors().count() >= 1);
    assert!(
        sink.diagnostics.iter().any(|diagnostic| diagnostic.message.contains("Generated")),
        "steps of the healthy interface are flushed before the abort"
    );
}

#[test]
fn test_warning_level_demotes_errors() {
    let options = ProcessorOptions {
        check_level: CheckLevel::Warnings,
        ..ProcessorOptions::default()
    };
    let mut processor = KtorGenProcessor::new(options);
    let mut sink = CollectingSink::default();
    let output = processor
        .process(&symbols(json!([service("Broken", json!([get("a"), head("b")]), "kotlin.String")])), &mut sink)
        .unwrap();

    assert_eq!(sink.errors().count(), 0);
    assert!(sink.warnings().count() >= 1);
    assert!(output.files.is_empty(), "demoted errors still drop the interface");
}

#[test]
fn test_duplicate_factory_across_interfaces() {
    let factory = json!({ "qualifiedName": "io.github.kingg22.ktorgen.core.KtorGenTopLevelFactory", "arguments": { "name": "create" } });
    let mut first = service("First", json!([get("a")]), "kotlin.String");
    first["annotations"] = json!([factory]);
    let mut second = service("Second", json!([get("b")]), "kotlin.String");
    second["annotations"] = json!([factory]);
    // Same name and parameter list: `create(httpClient: HttpClient)`.
    let mut processor = KtorGenProcessor::new(ProcessorOptions::default());
    let mut sink = CollectingSink::default();
    let output = processor.process(&symbols(json!([first, second])), &mut sink).unwrap();

    assert_eq!(output.files.len(), 2);
    assert!(sink.has_warning_containing("Duplicate top-level factory function detected"));
    assert!(output.files[0].content().contains("fun create(httpClient: HttpClient): First"));
    assert!(!output.files[1].content().contains("fun create("));

    // The registry does not leak into the next round.
    let again = processor.process(&symbols(json!([first_only()])), &mut sink).unwrap();
    assert!(again.files[0].content().contains("fun create(httpClient: HttpClient): First"));
}

fn first_only() -> Value {
    let factory = json!({ "qualifiedName": "io.github.kingg22.ktorgen.core.KtorGenTopLevelFactory", "arguments": { "name": "create" } });
    let mut first = service("First", json!([get("a")]), "kotlin.String");
    first["annotations"] = json!([factory]);
    first
}
