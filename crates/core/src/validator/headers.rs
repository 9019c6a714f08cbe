use ktorgen_common::{is_blank, remove_whitespace};

use super::{ValidationContext, ValidationResult, ValidatorStrategy, map_shape};
use crate::annotations::{ParameterAnnotation, RoleKind};
use crate::diagnostics::messages;

const CONTENT_TYPE: &str = "Content-Type";

fn is_content_type(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(CONTENT_TYPE)
}

/// Static and dynamic headers, including the `Content-Type` bookkeeping across both.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadersValidator;

impl ValidatorStrategy for HeadersValidator {
    fn name(&self) -> &'static str {
        "Headers"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            let implicit_content_type = function.is_form_url() || function.is_multipart();
            let mut content_types = 0;

            for raw in function.raw_headers() {
                let compact = remove_whitespace(&raw);
                let (name, value) = compact.split_once(':').unwrap_or((compact.as_str(), ""));
                if is_blank(name) || is_blank(value) {
                    result.function_error(
                        context,
                        function,
                        None,
                        format!("{} Found '{raw}'", messages::INVALID_HEADER_FORMAT),
                    );
                }
                if is_content_type(name) {
                    content_types += 1;
                }
            }

            for parameter in &function.parameters {
                let highlight = Some(parameter.name.as_str());
                for role in parameter.roles_of(RoleKind::Header) {
                    let ParameterAnnotation::Header { name } = role else {
                        continue;
                    };
                    if is_blank(name) {
                        result.function_error(context, function, highlight, messages::INVALID_HEADER_FORMAT);
                    }
                    if is_content_type(&remove_whitespace(name)) {
                        content_types += 1;
                    }
                }
                if parameter.has_role(RoleKind::HeaderMap) && map_shape(parameter, true).is_none() {
                    result.function_error(
                        context,
                        function,
                        highlight,
                        messages::HEADER_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING,
                    );
                }
            }

            if implicit_content_type && content_types > 0 {
                result.function_error(context, function, None, messages::ONLY_ONE_CONTENT_TYPE_IS_ALLOWED);
            } else if content_types > 1 {
                result.function_error(
                    context,
                    function,
                    None,
                    format!("{} Found {content_types} declarations.", messages::ONLY_ONE_CONTENT_TYPE_IS_ALLOWED),
                );
            }

            if function.has_body_parameter() && content_types == 0 && !function.has_role(RoleKind::HeaderMap) {
                result.function_warning(context, function, None, messages::CONTENT_TYPE_BODY_UNKNOWN);
            }
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::{annotation, function, generic, messages as texts, nullable, parameter, run, single, string};
    use serde_json::{Value, json};

    fn post(extra: Value) -> Value {
        let mut annotations = vec![annotation("POST", json!({ "value": "items" }))];
        if let Value::Array(extra) = extra {
            annotations.extend(extra);
        }
        Value::Array(annotations)
    }

    fn body() -> Value {
        parameter("id", nullable("kotlin.String"), json!([annotation("Body", json!({}))]))
    }

    #[test]
    fn test_body_without_content_type_warns_once() {
        let result = run(&HeadersValidator, &single(function("test", post(json!([])), json!([body()]), string())));
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.warning_count(), 1);
        assert!(texts(&result)[0].starts_with(messages::CONTENT_TYPE_BODY_UNKNOWN));
    }

    #[test]
    fn test_explicit_content_type_silences_warning() {
        let headers = json!([annotation("Headers", json!({ "value": ["Content-Type: application/json", "Accept:  */*"] }))]);
        let result = run(&HeadersValidator, &single(function("test", post(headers), json!([body()]), string())));
        assert_eq!(result.findings().len(), 0, "{:?}", texts(&result));
    }

    #[test]
    fn test_invalid_static_headers() {
        let headers = json!([annotation("Headers", json!({ "value": ["Accept", "X-Empty: "] }))]);
        let result = run(&HeadersValidator, &single(function("test", post(headers), json!([]), string())));
        assert_eq!(result.error_count(), 2);
        assert!(texts(&result)[0].starts_with(messages::INVALID_HEADER_FORMAT));
    }

    #[test]
    fn test_content_type_conflicts() {
        let field = parameter("name", string(), json!([annotation("Field", json!({}))]));
        let content_type = parameter("type", string(), json!([annotation("HeaderParam", json!({ "name": "content-type" }))]));
        let form = json!([annotation("FormUrlEncoded", json!({}))]);
        let result = run(&HeadersValidator, &single(function("test", post(form), json!([field, content_type.clone()]), string())));
        assert_eq!(result.error_count(), 1);
        assert!(texts(&result)[0].starts_with(messages::ONLY_ONE_CONTENT_TYPE_IS_ALLOWED));

        let header = json!([annotation("Header", json!({ "name": "Content-Type", "value": "text/plain" }))]);
        let twice = run(&HeadersValidator, &single(function("test", post(header), json!([content_type]), string())));
        assert_eq!(twice.error_count(), 1);
    }

    #[test]
    fn test_header_map_needs_string_values() {
        let map = |value: Value| {
            json!({
                "name": "headers",
                "type": generic("kotlin.collections.Map", json!([string(), value])),
                "annotations": [annotation("HeaderMap", json!({}))]
            })
        };
        let ok = run(&HeadersValidator, &single(function("test", post(json!([])), json!([map(nullable("kotlin.String")), body()]), string())));
        assert_eq!(ok.findings().len(), 0, "{:?}", texts(&ok));

        let bad = run(&HeadersValidator, &single(function("test", post(json!([])), json!([map(json!({ "qualifiedName": "kotlin.Int" }))]), string())));
        assert_eq!(bad.error_count(), 1);
        assert!(texts(&bad)[0].starts_with(messages::HEADER_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING));
    }
}
