//! The statements populating `HttpRequestBuilder` for one function.
//!
//! Order is fixed: builder parameters, method, URL, headers, cookies, body, tags.

use ktorgen_common::{TemplatePart, escape_kotlin_string, kotlin_string};

use super::ktor;
use super::values::{Value, for_each_entry, for_each_value};
use crate::annotations::{CookieValue, CookieValues, HttpMethod, ParameterAnnotation, RoleKind};
use crate::error::FatalError;
use crate::kotlin::{ImportTable, KtBlock, KtStmt};
use crate::model::types::{HTTP_REQUEST_BUILDER, PART_DATA};
use crate::model::{BuilderKind, Container, FunctionModel, ParameterModel, TypeShape};

const PART_DATA_LIST: &str = "_partDataList";
const MULTIPART_CONTENT: &str = "_multiPartDataContent";
const FORM_DATA_CONTENT: &str = "_formDataContent";

/// Builds the request population of one function, registering imports as it goes.
pub struct RequestWriter<'a> {
    function: &'a FunctionModel,
    imports: &'a mut ImportTable,
}

impl std::fmt::Debug for RequestWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestWriter").field("function", &self.function.name).finish()
    }
}

impl<'a> RequestWriter<'a> {
    pub fn new(function: &'a FunctionModel, imports: &'a mut ImportTable) -> Self {
        Self { function, imports }
    }

    /// Fails only when a URL placeholder has no `@Path` binding, which validation rules out.
    pub fn write(mut self) -> Result<Vec<KtStmt>, FatalError> {
        let mut out = self.builders();
        out.extend(self.method());
        out.extend(self.url()?);
        out.extend(self.headers());
        out.extend(self.cookies());
        out.extend(self.body());
        out.extend(self.tags());
        Ok(out)
    }

    // =========================================================================
    // Builders and method
    // =========================================================================

    fn builders(&mut self) -> Vec<KtStmt> {
        let mut out = Vec::new();
        let function = self.function;
        for parameter in function.builder_parameters() {
            if parameter.builder != Some(BuilderKind::TakeFrom) {
                continue;
            }
            if !parameter.type_ref.is(HTTP_REQUEST_BUILDER) {
                self.imports.member(ktor::REQUEST_TAKE_FROM);
            }
            out.extend(for_each_value(&parameter.name, &whole(parameter), |value| {
                vec![KtStmt::Expr(format!("this.takeFrom({})", value.expr()))]
            }));
        }
        for parameter in function.builder_parameters() {
            if parameter.builder != Some(BuilderKind::Lambda) {
                continue;
            }
            let call = if parameter.is_nullable() {
                format!("{}?.invoke(this)", parameter.name)
            } else {
                format!("{}(this)", parameter.name)
            };
            out.push(KtStmt::Expr(call));
        }
        out
    }

    fn method(&mut self) -> Option<KtStmt> {
        let function = self.function;
        let method = &function.http_method.method;
        if *method == HttpMethod::Absent {
            return None;
        }
        let http_method = self.imports.name(ktor::HTTP_METHOD);
        let value = match method.ktor_constant() {
            Some(constant) => format!("{http_method}.{constant}"),
            None => format!("{http_method}.parse({})", kotlin_string(method.verb())),
        };
        Some(KtStmt::Expr(format!("this.method = {value}")))
    }

    // =========================================================================
    // URL
    // =========================================================================

    fn url(&mut self) -> Result<Option<KtStmt>, FatalError> {
        let function = self.function;
        let mut body = Vec::new();

        for parameter in function.parameters_with(RoleKind::Url) {
            let take_from = self.imports.member(ktor::URL_TAKE_FROM);
            body.push(KtStmt::Expr(format!("this.{take_from}({})", parameter.name)));
        }
        if !function.path.is_empty() {
            let take_from = self.imports.member(ktor::URL_TAKE_FROM);
            let template = self.path_template()?;
            body.push(KtStmt::Expr(format!("this.{take_from}(\"{template}\")")));
        }

        for parameter in &function.parameters {
            for role in &parameter.roles {
                match role {
                    ParameterAnnotation::Query { value, encoded } => {
                        let target = parameters_target(*encoded);
                        let name = kotlin_string(value);
                        body.extend(for_each_value(&parameter.name, &parameter.shape(), |item| {
                            vec![KtStmt::Expr(format!("this.{target}.append({name}, {})", item.text()))]
                        }));
                    }
                    ParameterAnnotation::QueryName { encoded } => {
                        let target = parameters_target(*encoded);
                        body.extend(for_each_value(&parameter.name, &parameter.shape(), |item| {
                            vec![KtStmt::Expr(format!("this.{target}.appendAll({}, emptyList())", item.text()))]
                        }));
                    }
                    ParameterAnnotation::QueryMap { encoded } => {
                        let target = parameters_target(*encoded);
                        body.extend(for_each_entry(parameter, |key, item| {
                            vec![KtStmt::Expr(format!("this.{target}.append({key}, {})", item.text()))]
                        }));
                    }
                    _ => {}
                }
            }
        }

        if let Some((value, encoded)) = function.fragment() {
            body.push(KtStmt::Expr(format!("this.{} = {}", fragment_target(encoded), kotlin_string(value))));
        }
        for parameter in function.parameters_with(RoleKind::Fragment) {
            let Some(ParameterAnnotation::Fragment { encoded }) = parameter.role(RoleKind::Fragment) else {
                continue;
            };
            let target = fragment_target(*encoded);
            body.extend(for_each_value(&parameter.name, &parameter.shape(), |item| {
                vec![KtStmt::Expr(format!("this.{target} = {}", item.text()))]
            }));
        }

        Ok((!body.is_empty()).then(|| KtBlock::new("this.url", body).into()))
    }

    /// Contents of the string literal passed to `takeFrom`, placeholders substituted.
    fn path_template(&mut self) -> Result<String, FatalError> {
        let function = self.function;
        let mut out = String::new();
        for part in &function.path.parts {
            match part {
                TemplatePart::Literal(text) => out.push_str(&escape_kotlin_string(text)),
                TemplatePart::Placeholder(placeholder) => {
                    let path = function.parameters_with(RoleKind::Path).find_map(|parameter| {
                        match parameter.role(RoleKind::Path) {
                            Some(ParameterAnnotation::Path { value, encoded }) if value == placeholder => {
                                Some((parameter, *encoded))
                            }
                            _ => None,
                        }
                    });
                    match path {
                        Some((parameter, true)) => out.push_str(&format!("${{{}}}", parameter.name)),
                        Some((parameter, false)) => {
                            let encode = self.imports.member(ktor::ENCODE_URL_PATH);
                            out.push_str(&format!("${{\"${}\".{encode}()}}", parameter.name));
                        }
                        None => {
                            return Err(FatalError::implementation(format!(
                                "placeholder '{{{placeholder}}}' of function '{}' has no @Path parameter",
                                function.name
                            )));
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    // =========================================================================
    // Headers and cookies
    // =========================================================================

    fn headers(&mut self) -> Vec<KtStmt> {
        let function = self.function;
        let mut out = Vec::new();
        if function.is_form_url() && !function.is_multipart() {
            let content_type_fn = self.imports.member(ktor::CONTENT_TYPE_FN);
            let content_type = self.imports.name(ktor::CONTENT_TYPE);
            out.push(KtStmt::Expr(format!(
                "this.{content_type_fn}({content_type}.Application.FormUrlEncoded)"
            )));
        }

        let mut body = Vec::new();
        for parameter in &function.parameters {
            for role in &parameter.roles {
                match role {
                    ParameterAnnotation::Header { name } => {
                        let name = kotlin_string(name.trim());
                        body.extend(for_each_value(&parameter.name, &parameter.shape(), |item| {
                            vec![KtStmt::Expr(format!("this.append({name}, {})", item.text()))]
                        }));
                    }
                    ParameterAnnotation::HeaderMap => {
                        body.extend(for_each_entry(parameter, |key, item| {
                            vec![KtStmt::Expr(format!("this.append({key}, {})", item.text()))]
                        }));
                    }
                    _ => {}
                }
            }
        }
        for raw in function.raw_headers() {
            if let Some((name, value)) = raw.split_once(':') {
                body.push(KtStmt::Expr(format!(
                    "this.append({}, {})",
                    kotlin_string(name.trim()),
                    kotlin_string(value.trim())
                )));
            }
        }

        if !body.is_empty() {
            let headers = self.imports.member(ktor::HEADERS);
            out.push(KtBlock::new(format!("this.{headers}"), body).into());
        }
        out
    }

    fn cookies(&mut self) -> Vec<KtStmt> {
        let function = self.function;
        let mut out = Vec::new();
        for cookie in function.cookies() {
            let value = match &cookie.value {
                CookieValue::Literal(value) => kotlin_string(value),
                CookieValue::FromParameter => kotlin_string(""),
            };
            let render = self.cookie_renderer(cookie);
            out.push(KtStmt::Expr(render(&value)));
        }

        for parameter in function.parameters_with(RoleKind::Cookie) {
            for role in parameter.roles_of(RoleKind::Cookie) {
                let ParameterAnnotation::Cookie { cookie } = role else {
                    continue;
                };
                let render = self.cookie_renderer(cookie);
                match &cookie.value {
                    CookieValue::Literal(value) => out.push(KtStmt::Expr(render(&kotlin_string(value)))),
                    CookieValue::FromParameter => {
                        out.extend(for_each_value(&parameter.name, &parameter.shape(), |item| {
                            vec![KtStmt::Expr(render(&item.text()))]
                        }));
                    }
                }
            }
        }
        out
    }

    /// `this.cookie(...)` with every argument but the value fixed.
    fn cookie_renderer(&mut self, cookie: &CookieValues) -> impl Fn(&str) -> String + use<> {
        let cookie_fn = self.imports.member(ktor::COOKIE);
        let expires = match cookie.expires_timestamp {
            Some(timestamp) => format!("{}({timestamp}L)", self.imports.name(ktor::GMT_DATE)),
            None => "null".to_string(),
        };
        let optional = |text: &str| {
            if text.is_empty() {
                "null".to_string()
            } else {
                kotlin_string(text)
            }
        };
        let extensions = if cookie.extensions.is_empty() {
            "emptyMap()".to_string()
        } else {
            let pairs: Vec<_> = cookie
                .extensions
                .iter()
                .map(|(key, value)| format!("{} to {}", kotlin_string(key), kotlin_string(value)))
                .collect();
            format!("mapOf({})", pairs.join(", "))
        };
        let name = kotlin_string(&cookie.name);
        let rest = format!(
            "maxAge = {}, expires = {expires}, domain = {}, path = {}, secure = {}, httpOnly = {}, extensions = {extensions}",
            cookie.max_age,
            optional(&cookie.domain),
            optional(&cookie.path),
            cookie.secure,
            cookie.http_only,
        );
        move |value: &str| format!("this.{cookie_fn}(name = {name}, value = {value}, {rest})")
    }

    // =========================================================================
    // Body and tags
    // =========================================================================

    fn body(&mut self) -> Vec<KtStmt> {
        let function = self.function;
        if let Some(parameter) = function.parameters_with(RoleKind::Body).next() {
            let set_body = self.imports.member(ktor::SET_BODY);
            return vec![KtStmt::Expr(format!("this.{set_body}({})", parameter.name))];
        }
        if function.is_multipart() {
            return self.multipart();
        }
        if function.is_form_url() {
            return self.form();
        }
        Vec::new()
    }

    fn multipart(&mut self) -> Vec<KtStmt> {
        let function = self.function;
        let part_data = self.imports.name(PART_DATA);
        let mut parts = Vec::new();
        for parameter in &function.parameters {
            for role in &parameter.roles {
                match role {
                    ParameterAnnotation::Part { value, .. } => {
                        let shape = parameter.shape();
                        if shape.element.is(PART_DATA) {
                            parts.extend(for_each_value(&parameter.name, &shape, |item| {
                                vec![KtStmt::Expr(format!("{PART_DATA_LIST}.add({})", item.expr()))]
                            }));
                        } else {
                            let name = kotlin_string(value);
                            parts.extend(for_each_value(&parameter.name, &shape, |item| {
                                vec![KtStmt::Expr(format!("this.append({name}, {})", item.text()))]
                            }));
                        }
                    }
                    ParameterAnnotation::PartMap { .. } => {
                        parts.extend(for_each_entry(parameter, |key, item| {
                            vec![KtStmt::Expr(format!("this.append({key}, {})", item.text()))]
                        }));
                    }
                    _ => {}
                }
            }
        }

        let form_data = self.imports.member(ktor::FORM_DATA);
        let content = self.imports.name(ktor::MULTIPART_CONTENT);
        let set_body = self.imports.member(ktor::SET_BODY);
        vec![
            KtStmt::Val {
                name: PART_DATA_LIST.into(),
                init: format!("mutableListOf<{part_data}>()"),
            },
            KtBlock::new(format!("val {MULTIPART_CONTENT} = {form_data}"), parts).into(),
            KtStmt::Expr(format!(
                "this.{set_body}({content}({PART_DATA_LIST} + {MULTIPART_CONTENT}))"
            )),
        ]
    }

    fn form(&mut self) -> Vec<KtStmt> {
        let function = self.function;
        let mut fields = Vec::new();
        for parameter in &function.parameters {
            for role in &parameter.roles {
                match role {
                    ParameterAnnotation::Field { value, encoded } => {
                        let name = kotlin_string(value);
                        let decode = self.decoder(*encoded);
                        fields.extend(for_each_value(&parameter.name, &parameter.shape(), |item| {
                            vec![KtStmt::Expr(format!("this.append({name}, {})", field_text(item, decode.as_deref())))]
                        }));
                    }
                    ParameterAnnotation::FieldMap { encoded } => {
                        let decode = self.decoder(*encoded);
                        fields.extend(for_each_entry(parameter, |key, item| {
                            vec![KtStmt::Expr(format!("this.append({key}, {})", field_text(item, decode.as_deref())))]
                        }));
                    }
                    _ => {}
                }
            }
        }

        let parameters = self.imports.name(ktor::PARAMETERS);
        let content = self.imports.name(ktor::FORM_DATA_CONTENT);
        let set_body = self.imports.member(ktor::SET_BODY);
        vec![
            KtBlock::new(format!("val {FORM_DATA_CONTENT} = {parameters}.build"), fields).into(),
            KtStmt::Expr(format!("this.{set_body}({content}({FORM_DATA_CONTENT}))")),
        ]
    }

    /// Pre-encoded fields are decoded first, `Parameters` encodes every value again.
    fn decoder(&mut self, encoded: bool) -> Option<String> {
        encoded.then(|| self.imports.member(ktor::DECODE_URL_QUERY_COMPONENT))
    }

    fn tags(&mut self) -> Vec<KtStmt> {
        let function = self.function;
        let mut out = Vec::new();
        for parameter in function.parameters_with(RoleKind::Tag) {
            let Some(ParameterAnnotation::Tag { value }) = parameter.role(RoleKind::Tag) else {
                continue;
            };
            let key = self.imports.name(ktor::ATTRIBUTE_KEY);
            let mut value_type = parameter.type_ref.clone();
            value_type.nullable = false;
            let value_type = self.imports.type_name(&value_type);
            let name = kotlin_string(value);
            out.extend(for_each_value(&parameter.name, &whole(parameter), |item| {
                vec![KtStmt::Expr(format!(
                    "this.attributes.put({key}<{value_type}>({name}), {})",
                    item.expr()
                ))]
            }));
        }
        out
    }
}

/// Shape of a parameter used as one object, collections included.
fn whole(parameter: &ParameterModel) -> TypeShape {
    TypeShape {
        container: Container::Single,
        container_nullable: parameter.type_ref.nullable,
        element: parameter.type_ref.clone(),
        element_nullable: parameter.type_ref.nullable,
    }
}

fn field_text(item: &Value, decode: Option<&str>) -> String {
    match decode {
        Some(decode) => format!("{}.{decode}(plusIsSpace = true)", item.text()),
        None => item.text(),
    }
}

fn parameters_target(encoded: bool) -> &'static str {
    if encoded { "encodedParameters" } else { "parameters" }
}

fn fragment_target(encoded: bool) -> &'static str {
    if encoded { "encodedFragment" } else { "fragment" }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::{Value as Json, json};

    use super::*;
    use crate::kotlin::Emit;
    use crate::test_support::{annotation, function, generic, named, nullable, parameter, single, string};

    fn render(declaration: Json) -> (String, Vec<String>) {
        let model = single(declaration);
        let mut imports = ImportTable::new("com.example");
        let stmts = RequestWriter::new(&model.functions[0], &mut imports).write().unwrap();
        (stmts.iter().map(Emit::emit).collect(), imports.imports())
    }

    fn get(path: &str) -> Json {
        annotation("GET", json!({ "value": path }))
    }

    fn with_role(name: &str, type_ref: Json, role: &str, arguments: Json) -> Json {
        parameter(name, type_ref, json!([annotation(role, arguments)]))
    }

    fn vararg(mut parameter: Json) -> Json {
        parameter["isVararg"] = json!(true);
        parameter
    }

    fn string_map(value: Json) -> Json {
        generic("kotlin.collections.Map", json!([string(), value]))
    }

    fn builder_lambda(nullable: bool) -> Json {
        json!({
            "qualifiedName": "kotlin.Function1",
            "nullable": nullable,
            "function": {
                "receiver": { "qualifiedName": HTTP_REQUEST_BUILDER },
                "returnType": { "qualifiedName": "kotlin.Unit" }
            }
        })
    }

    fn position(code: &str, needle: &str) -> usize {
        assert!(code.contains(needle), "'{needle}' not found in\n{code}");
        code.find(needle).unwrap()
    }

    #[test]
    fn test_population_order() {
        let (code, _) = render(function(
            "update",
            json!([
                annotation("POST", json!({ "value": "users/{id}" })),
                annotation("Headers", json!({ "value": ["Accept: application/json"] })),
                annotation("Cookie", json!({ "name": "session", "value": "abc" })),
            ]),
            json!([
                with_role("trace", string(), "Tag", json!({})),
                with_role("user", named("com.example.User"), "Body", json!({})),
                with_role("id", string(), "Path", json!({})),
                parameter("configure", builder_lambda(false), json!([])),
            ]),
            named("kotlin.Unit"),
        ));
        let order = [
            "configure(this)",
            "this.method = HttpMethod.Post",
            "this.url {",
            "this.headers {",
            "this.cookie(name = \"session\"",
            "this.setBody(user)",
            "this.attributes.put(",
        ];
        let positions: Vec<_> = order.iter().map(|needle| position(&code, needle)).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{code}");
        assert!(code.contains("this.takeFrom(\"users/${\"$id\".encodeURLPath()}\")"), "{code}");
    }

    #[test]
    fn test_custom_verb_is_parsed() {
        let (code, imports) = render(function(
            "search",
            json!([annotation("HTTP", json!({ "method": "propfind", "path": "dav" }))]),
            json!([]),
            string(),
        ));
        assert!(code.starts_with("this.method = HttpMethod.parse(\"PROPFIND\")\n"), "{code}");
        assert!(imports.contains(&ktor::HTTP_METHOD.to_string()));
    }

    #[test]
    fn test_unbound_placeholder_is_an_implementation_error() {
        let model = single(function("user", json!([get("users/{id}")]), json!([]), string()));
        let mut imports = ImportTable::new("com.example");
        let err = RequestWriter::new(&model.functions[0], &mut imports).write().unwrap_err();
        assert!(matches!(err, FatalError::Implementation { .. }), "{err:?}");
    }

    #[test]
    fn test_tags_by_nullability() {
        let (code, imports) = render(function(
            "load",
            json!([get("posts")]),
            json!([
                with_role("trace", string(), "Tag", json!({})),
                with_role("span", nullable("kotlin.Long"), "Tag", json!({ "value": "span-id" })),
            ]),
            string(),
        ));
        assert!(code.contains("this.attributes.put(AttributeKey<String>(\"trace\"), trace)\n"), "{code}");
        assert!(
            code.contains("span?.let {\n    this.attributes.put(AttributeKey<Long>(\"span-id\"), it)\n}\n"),
            "{code}"
        );
        assert!(imports.contains(&ktor::ATTRIBUTE_KEY.to_string()));
    }

    #[test]
    fn test_fragments_by_nullability_and_encoding() {
        let (code, _) = render(function(
            "load",
            json!([get("posts")]),
            json!([
                with_role("section", nullable("kotlin.String"), "Fragment", json!({})),
                with_role("hash", string(), "Fragment", json!({ "encoded": true })),
            ]),
            string(),
        ));
        assert!(code.contains("    section?.let {\n        this.fragment = it\n    }\n"), "{code}");
        assert!(code.contains("    this.encodedFragment = hash\n"), "{code}");

        let (code, _) = render(function(
            "load",
            json!([get("posts"), annotation("Fragment", json!({ "value": "top" }))]),
            json!([]),
            string(),
        ));
        assert!(code.contains("    this.fragment = \"top\"\n"), "{code}");
    }

    #[test]
    fn test_queries_plain_and_encoded() {
        let (code, imports) = render(function(
            "search",
            json!([get("search")]),
            json!([
                with_role("q", string(), "Query", json!({})),
                with_role("raw", string(), "Query", json!({ "value": "r", "encoded": true })),
                with_role("page", nullable("kotlin.Int"), "Query", json!({})),
            ]),
            string(),
        ));
        assert!(code.contains("    this.parameters.append(\"q\", q)\n"), "{code}");
        assert!(code.contains("    this.encodedParameters.append(\"r\", raw)\n"), "{code}");
        assert!(code.contains("    page?.let {\n        this.parameters.append(\"page\", \"$it\")\n    }\n"), "{code}");
        assert!(!imports.contains(&ktor::DECODE_URL_QUERY_COMPONENT.to_string()));
    }

    #[test]
    fn test_cookies_keep_declaration_order() {
        let (code, imports) = render(function(
            "load",
            json!([
                get("posts"),
                annotation("Cookie", json!({
                    "name": "session",
                    "value": "abc",
                    "secure": true,
                    "expiresTimestamp": 1000,
                    "extensions": [{ "annotation": {
                        "qualifiedName": "PairString",
                        "arguments": { "first": "a", "second": "b" }
                    } }]
                })),
            ]),
            json!([
                vararg(with_role("ids", string(), "Cookie", json!({ "name": "id" }))),
                with_role("token", string(), "Cookie", json!({ "name": "token" })),
                with_role("other", nullable("kotlin.String"), "Cookie", json!({ "name": "o", "httpOnly": true })),
            ]),
            string(),
        ));
        assert!(code.contains(
            "this.cookie(name = \"session\", value = \"abc\", maxAge = 0, expires = GMTDate(1000L), domain = null, path = null, secure = true, httpOnly = false, extensions = mapOf(\"a\" to \"b\"))\n"
        ), "{code}");
        assert!(code.contains(
            "ids.forEach {\n    this.cookie(name = \"id\", value = it, maxAge = 0, expires = null, domain = null, path = null, secure = false, httpOnly = false, extensions = emptyMap())\n}\n"
        ), "{code}");
        assert!(code.contains("this.cookie(name = \"token\", value = token, "), "{code}");
        assert!(code.contains("other?.let {\n    this.cookie(name = \"o\", value = it, "), "{code}");
        assert!(code.contains("httpOnly = true"), "{code}");

        assert!(position(&code, "name = \"session\"") < position(&code, "ids.forEach"));
        assert!(position(&code, "ids.forEach") < position(&code, "name = \"token\""));
        assert!(position(&code, "name = \"token\"") < position(&code, "other?.let"));
        assert!(imports.contains(&ktor::GMT_DATE.to_string()));
        assert!(imports.contains(&ktor::COOKIE.to_string()));
    }

    #[test]
    fn test_header_maps_and_pairs() {
        let pair = generic("kotlin.Pair", json!([string(), string()]));
        let (code, _) = render(function(
            "load",
            json!([get("posts")]),
            json!([
                with_role("single", nullable("kotlin.String"), "Header", json!({ "name": "X-Single" })),
                with_role("meta", pair.clone(), "HeaderMap", json!({})),
                vararg(with_role("extra", pair, "HeaderMap", json!({}))),
                with_role("all", string_map(nullable("kotlin.String")), "HeaderMap", json!({})),
            ]),
            string(),
        ));
        assert!(code.starts_with("this.method = HttpMethod.Get\n"), "{code}");
        assert!(code.contains("this.headers {\n    single?.let {\n        this.append(\"X-Single\", it)\n    }\n"), "{code}");
        assert!(code.contains("    meta.let { pair ->\n        this.append(pair.first, pair.second)\n    }\n"), "{code}");
        assert!(code.contains("    extra.forEach { pair ->\n        this.append(pair.first, pair.second)\n    }\n"), "{code}");
        assert!(code.contains(
            "    all.forEach { entry ->\n        entry.value?.let { value ->\n            this.append(entry.key, value)\n        }\n    }\n"
        ), "{code}");
    }

    #[test]
    fn test_query_maps_vararg_and_nullable() {
        let (code, _) = render(function(
            "search",
            json!([get("search")]),
            json!([
                vararg(with_role("extras", string_map(named("kotlin.Int")), "QueryMap", json!({}))),
                with_role(
                    "filters",
                    json!({
                        "qualifiedName": "kotlin.collections.Map",
                        "nullable": true,
                        "arguments": [string(), string()]
                    }),
                    "QueryMap",
                    json!({ "encoded": true })
                ),
            ]),
            string(),
        ));
        assert!(code.contains(
            "    extras.forEach { _map ->\n        _map.forEach { entry ->\n            this.parameters.append(entry.key, \"${entry.value}\")\n        }\n    }\n"
        ), "{code}");
        assert!(code.contains(
            "    filters?.forEach { entry ->\n        this.encodedParameters.append(entry.key, entry.value)\n    }\n"
        ), "{code}");
    }

    #[test]
    fn test_form_fields_decode_encoded_values() {
        let (code, imports) = render(function(
            "login",
            json!([annotation("POST", json!({ "value": "login" })), annotation("FormUrlEncoded", json!({}))]),
            json!([
                with_role("user", string(), "Field", json!({})),
                with_role("secret", string(), "Field", json!({ "value": "pass", "encoded": true })),
                with_role("more", string_map(string()), "FieldMap", json!({ "encoded": true })),
                with_role("remember", nullable("kotlin.Boolean"), "Field", json!({})),
            ]),
            string(),
        ));
        assert!(code.contains("this.contentType(ContentType.Application.FormUrlEncoded)\n"), "{code}");
        assert!(code.contains("val _formDataContent = Parameters.build {\n    this.append(\"user\", user)\n"), "{code}");
        assert!(code.contains("    this.append(\"pass\", secret.decodeURLQueryComponent(plusIsSpace = true))\n"), "{code}");
        assert!(code.contains(
            "    more.forEach { entry ->\n        this.append(entry.key, entry.value.decodeURLQueryComponent(plusIsSpace = true))\n    }\n"
        ), "{code}");
        assert!(code.contains("    remember?.let {\n        this.append(\"remember\", \"$it\")\n    }\n"), "{code}");
        assert!(code.ends_with("this.setBody(FormDataContent(_formDataContent))\n"), "{code}");
        assert!(imports.contains(&ktor::DECODE_URL_QUERY_COMPONENT.to_string()));
    }

    #[test]
    fn test_multipart_parts_and_part_data() {
        let part_data = named(PART_DATA);
        let (code, imports) = render(function(
            "upload",
            json!([annotation("POST", json!({ "value": "upload" })), annotation("Multipart", json!({}))]),
            json!([
                with_role("title", string(), "Part", json!({})),
                with_role("count", nullable("kotlin.Int"), "Part", json!({})),
                with_role("avatar", nullable(PART_DATA), "Part", json!({})),
                with_role("files", generic("kotlin.collections.List", json!([part_data])), "Part", json!({})),
                with_role("extra", string_map(string()), "PartMap", json!({})),
            ]),
            string(),
        ));
        assert!(!code.contains("FormUrlEncoded"), "{code}");
        assert!(code.contains("val _partDataList = mutableListOf<PartData>()\n"), "{code}");
        assert!(code.contains("val _multiPartDataContent = formData {\n    this.append(\"title\", title)\n"), "{code}");
        assert!(code.contains("    count?.let {\n        this.append(\"count\", \"$it\")\n    }\n"), "{code}");
        assert!(code.contains("    avatar?.let {\n        _partDataList.add(it)\n    }\n"), "{code}");
        assert!(code.contains("    files.forEach {\n        _partDataList.add(it)\n    }\n"), "{code}");
        assert!(code.contains("    extra.forEach { entry ->\n        this.append(entry.key, entry.value)\n    }\n"), "{code}");
        assert!(code.ends_with("this.setBody(MultiPartFormDataContent(_partDataList + _multiPartDataContent))\n"), "{code}");
        assert!(imports.contains(&PART_DATA.to_string()));
        assert!(imports.contains(&ktor::FORM_DATA.to_string()));
    }

    #[test]
    fn test_builder_parameters_run_first() {
        let (code, imports) = render(function(
            "load",
            json!([get("posts")]),
            json!([
                parameter("configure", builder_lambda(true), json!([])),
                parameter("base", named(HTTP_REQUEST_BUILDER), json!([])),
                parameter("data", nullable("io.ktor.client.request.HttpRequestData"), json!([])),
            ]),
            string(),
        ));
        assert!(
            code.starts_with("this.takeFrom(base)\ndata?.let {\n    this.takeFrom(it)\n}\nconfigure?.invoke(this)\n"),
            "{code}"
        );
        assert!(imports.contains(&ktor::REQUEST_TAKE_FROM.to_string()));
    }
}
