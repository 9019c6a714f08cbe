//! End-to-end rounds over small symbol tables.
//!
//! Each test builds the declarations a symbol processor would hand over,
//! runs one round and asserts on the diagnostics and the generated Kotlin.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ktorgen_core::diagnostics::messages;
use ktorgen_core::{CollectingSink, KtorGenProcessor, ProcessorOptions, RoundOutput, SymbolTable};
use serde_json::{Value, json};

const HTTP: &str = "io.github.kingg22.ktorgen.http";

fn http(name: &str, arguments: Value) -> Value {
    json!({ "qualifiedName": format!("{HTTP}.{name}"), "arguments": arguments })
}

fn string() -> Value {
    json!({ "qualifiedName": "kotlin.String" })
}

fn suspend_fun(name: &str, annotations: Value, parameters: Value, return_type: Value) -> Value {
    json!({
        "name": name,
        "modifiers": ["suspend", "abstract"],
        "annotations": annotations,
        "parameters": parameters,
        "returnType": return_type
    })
}

fn param(name: &str, type_ref: Value, annotations: Value) -> Value {
    json!({ "name": name, "type": type_ref, "annotations": annotations })
}

fn interface(name: &str, functions: Value) -> Value {
    json!({
        "qualifiedName": format!("com.example.{name}"),
        "file": { "path": format!("src/{name}.kt") },
        "functions": functions
    })
}

fn round(classes: Value) -> (RoundOutput, CollectingSink) {
    let symbols: SymbolTable = serde_json::from_value(json!({ "classes": classes })).expect("valid symbol table");
    let mut processor = KtorGenProcessor::new(ProcessorOptions::default());
    let mut sink = CollectingSink::default();
    let output = processor.process(&symbols, &mut sink).expect("round should not abort");
    (output, sink)
}

fn single(function: Value) -> (RoundOutput, CollectingSink) {
    round(json!([interface("TestService", json!([function]))]))
}

fn content(output: &RoundOutput) -> String {
    assert_eq!(output.files.len(), 1, "expected exactly one generated file");
    output.files[0].content()
}

#[test]
fn test_get_returning_string() {
    let (output, sink) = single(suspend_fun("test", json!([http("GET", json!({ "value": "posts" }))]), json!([]), string()));
    assert_eq!(sink.errors().count(), 0);
    assert_eq!(sink.warnings().count(), 0);

    let code = content(&output);
    assert!(code.contains("override suspend fun test(): String {"), "{code}");
    assert!(code.contains("return _httpClient.request {"), "{code}");
    assert!(code.contains("this.method = HttpMethod.Get"), "{code}");
    assert!(code.contains("this.takeFrom(\"posts\")"), "{code}");
    assert!(code.contains("}.body<String>()"), "{code}");
}

#[test]
fn test_head_must_return_unit() {
    let (output, sink) = single(suspend_fun("ping", json!([http("HEAD", json!({ "value": "ping" }))]), json!([]), string()));
    assert_eq!(sink.errors().count(), 1);
    assert!(sink.has_error_containing(messages::HTTP_METHOD_HEAD_NOT_RETURN_BODY));
    assert!(output.files.is_empty());
    assert_eq!(output.dropped, vec!["com.example.TestService"]);
}

#[test]
fn test_body_without_content_type_warns() {
    let (output, sink) = single(suspend_fun(
        "test",
        json!([http("POST", json!({}))]),
        json!([param("id", json!({ "qualifiedName": "kotlin.String", "nullable": true }), json!([http("Body", json!({}))]))]),
        string(),
    ));
    assert_eq!(sink.errors().count(), 0);
    assert_eq!(sink.warnings().count(), 1);
    assert!(sink.has_warning_containing("Content type for body maybe unknown"));
    assert!(content(&output).contains("this.setBody(id)"));
}

#[test]
fn test_form_url_encoded_field() {
    let (output, sink) = single(suspend_fun(
        "test",
        json!([http("FormUrlEncoded", json!({})), http("POST", json!({ "value": "user" }))]),
        json!([param("id", string(), json!([http("Field", json!({ "value": "id" }))]))]),
        string(),
    ));
    assert_eq!(sink.errors().count(), 0);

    let code = content(&output);
    assert!(code.contains("val _formDataContent = Parameters.build {\n"), "{code}");
    assert!(code.contains("this.append(\"id\", id)"), "{code}");
    assert!(code.contains("this.setBody(FormDataContent(_formDataContent))"), "{code}");
    assert!(code.contains("this.contentType(ContentType.Application.FormUrlEncoded)"), "{code}");
}

#[test]
fn test_two_http_methods_drop_the_interface() {
    let (output, sink) = single(suspend_fun(
        "test",
        json!([http("GET", json!({ "value": "a" })), http("POST", json!({ "value": "b" }))]),
        json!([]),
        string(),
    ));
    assert_eq!(sink.errors().count(), 1);
    assert!(sink.has_error_containing(messages::ONLY_ONE_HTTP_METHOD_IS_ALLOWED));
    assert!(output.files.is_empty());
}

#[test]
fn test_path_placeholder_is_encoded_unless_marked() {
    let (output, _) = single(suspend_fun(
        "user",
        json!([http("GET", json!({ "value": "user/{id}/{slug}" }))]),
        json!([
            param("id", string(), json!([http("Path", json!({ "value": "id" }))])),
            param("slug", string(), json!([http("Path", json!({ "value": "slug", "encoded": true }))]))
        ]),
        string(),
    ));
    let code = content(&output);
    assert!(code.contains("this.takeFrom(\"user/${\"$id\".encodeURLPath()}/${slug}\")"), "{code}");
}

#[test]
fn test_nullable_roles_are_guarded() {
    let nullable = json!({ "qualifiedName": "kotlin.String", "nullable": true });
    let (output, sink) = single(suspend_fun(
        "search",
        json!([http("GET", json!({ "value": "search" }))]),
        json!([
            param("q", nullable.clone(), json!([http("Query", json!({ "value": "q" }))])),
            param("page", string(), json!([http("Query", json!({ "value": "page" }))])),
            param("token", nullable, json!([http("HeaderParam", json!({ "name": "X-Token" }))]))
        ]),
        string(),
    ));
    assert_eq!(sink.errors().count(), 0);
    let code = content(&output);
    assert!(code.contains("q?.let {\n                    this.parameters.append(\"q\", it)\n"), "{code}");
    assert!(code.contains("                this.parameters.append(\"page\", page)\n"), "{code}");
    assert!(code.contains("token?.let {\n                    this.append(\"X-Token\", it)\n"), "{code}");
}

#[test]
fn test_conflicting_body_kinds() {
    let (output, sink) = single(suspend_fun(
        "upload",
        json!([http("Multipart", json!({})), http("POST", json!({ "value": "upload" }))]),
        json!([
            param("body", string(), json!([http("Body", json!({}))])),
            param("name", string(), json!([http("Part", json!({ "value": "name" }))]))
        ]),
        string(),
    ));
    assert!(sink.has_error_containing(messages::CONFLICT_BODY_TYPE));
    assert!(output.files.is_empty());
}

#[test]
fn test_map_role_shape_error() {
    let (_, sink) = single(suspend_fun(
        "search",
        json!([http("GET", json!({ "value": "search" }))]),
        json!([param("filters", string(), json!([http("QueryMap", json!({}))]))]),
        string(),
    ));
    assert_eq!(sink.errors().count(), 1);
    assert!(sink.has_error_containing(messages::QUERY_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING));
}

#[test]
fn test_constructor_with_property_and_supertype() {
    let mut declaration = interface(
        "TestService",
        json!([suspend_fun("test", json!([http("GET", json!({ "value": "posts" }))]), json!([]), string())]),
    );
    declaration["properties"] = json!([{ "name": "token", "type": string() }]);
    declaration["supertypes"] = json!([{ "qualifiedName": "com.example.Closeable" }]);
    let (output, sink) = round(json!([declaration]));
    assert_eq!(sink.errors().count(), 0);
    let code = content(&output);
    assert!(
        code.contains("constructor(\n    private val _httpClient: HttpClient,\n    override val token: String,\n    closeable: Closeable,\n)"),
        "{code}"
    );
    assert!(code.contains(") : TestService, Closeable by closeable {"), "{code}");
    assert!(code.contains("return _TestServiceImpl(httpClient, token, closeable)"), "{code}");
}

#[test]
fn test_generation_is_deterministic() {
    let classes = json!([interface(
        "TestService",
        json!([suspend_fun(
            "search",
            json!([http("GET", json!({ "value": "search" })), http("Headers", json!({ "value": ["Accept: application/json", "X-Trace: 1"] }))]),
            json!([
                param("b", string(), json!([http("Query", json!({ "value": "b" }))])),
                param("a", string(), json!([http("Query", json!({ "value": "a" }))]))
            ]),
            string()
        )])
    )]);
    let (first, _) = round(classes.clone());
    let (second, _) = round(classes);
    assert_eq!(content(&first), content(&second));
    let code = content(&first);
    let b = code.find("append(\"b\"").expect("query b");
    let a = code.find("append(\"a\"").expect("query a");
    assert!(b < a, "queries keep declaration order");
}
