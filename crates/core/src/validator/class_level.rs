use super::{ValidationContext, ValidationResult, ValidatorStrategy};
use crate::annotations::HttpMethod;
use crate::diagnostics::messages;
use crate::model::types::is_any;
use crate::symbols::Visibility;

/// Visibility options, companion/`KtorGen` placement, and the role of every parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassLevelValidator;

impl ClassLevelValidator {
    fn check_visibility(context: &ValidationContext<'_>, result: &mut ValidationResult) {
        let options = &context.model.options;
        let symbol = || Some(context.qualified_name.to_string());

        let checks = [
            (&options.class_visibility, messages::ONLY_PUBLIC_INTERNAL_CLASS, false),
            (&options.constructor_visibility, messages::PRIVATE_CONSTRUCTOR, true),
            (&options.function_visibility, messages::PRIVATE_FUNCTION, true),
        ];
        for (value, message, forbid_private) in checks {
            match Visibility::parse(value) {
                None => {
                    if value.trim().is_empty() {
                        result.error(format!("{message}Current '{value}'"), symbol());
                    }
                    result.error(
                        format!("{}Current '{value}'", messages::INVALID_VISIBILITY_MODIFIER),
                        symbol(),
                    );
                }
                Some(Visibility::Protected) => result.error(format!("{message}Current '{value}'"), symbol()),
                Some(Visibility::Private) if forbid_private => {
                    result.error(format!("{message}Current '{value}'"), symbol());
                }
                Some(_) => {}
            }
        }

        if Visibility::parse(&options.class_visibility) == Some(Visibility::Private) && !options.has_any_factory() {
            result.error(messages::PRIVATE_CLASS_NO_ACCESS, symbol());
        }
        if context.visibility == Visibility::Private {
            result.error(
                format!("{}Current '{}'", messages::PRIVATE_INTERFACE_CANT_GENERATE, context.visibility),
                symbol(),
            );
        }
        if options.companion_factory.is_some() && !context.model.has_companion() {
            result.error(messages::MISSING_COMPANION_TO_GENERATE, symbol());
        }
        if context.model.has_two_ktorgen() {
            let companion = context
                .model
                .companion
                .as_ref()
                .map(|companion| format!("{}.{}", context.qualified_name, companion.name));
            result.error(messages::TWO_KTORGEN_ANNOTATIONS, companion);
        }
    }

    fn check_functions(context: &ValidationContext<'_>, result: &mut ValidationResult) {
        for function in &context.model.functions {
            if function.is_abstract && !function.generate {
                result.function_error(context, function, None, messages::ABSTRACT_FUNCTION_IGNORED);
            }
        }

        for function in context.functions() {
            if is_any(&function.return_type) {
                result.function_error(context, function, None, messages::ANY_TYPE_INVALID);
            }
            let builders = function.builder_parameters().count();
            if function.http_method.method == HttpMethod::Absent && builders == 0 {
                result.function_error(context, function, None, messages::NO_HTTP_ANNOTATION);
            }

            for parameter in &function.parameters {
                let highlight = Some(parameter.name.as_str());
                if parameter.roles.is_empty() && parameter.builder.is_none() {
                    result.function_error(context, function, highlight, messages::PARAMETER_WITHOUT_ANNOTATION);
                }
                let single_roles = parameter
                    .roles
                    .iter()
                    .filter(|role| !role.kind().is_repeatable())
                    .count();
                let role_kinds = parameter.role_kinds().len();
                if single_roles > 1 || (single_roles == 1 && role_kinds > 1) {
                    result.function_error(context, function, highlight, messages::PARAMETER_WITH_LOT_ANNOTATIONS);
                }
                if parameter.is_vararg {
                    result.function_warning(context, function, highlight, messages::VARARG_PARAMETER_EXPERIMENTAL);
                }
                if is_any(&parameter.type_ref) {
                    result.function_error(context, function, highlight, messages::ANY_TYPE_INVALID);
                }
            }

            if builders > 1 {
                result.function_error(context, function, None, messages::ONLY_ONE_HTTP_REQUEST_BUILDER);
            }
        }
    }
}

impl ValidatorStrategy for ClassLevelValidator {
    fn name(&self) -> &'static str {
        "Class Level"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        Self::check_visibility(context, &mut result);
        Self::check_functions(context, &mut result);
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_support::{annotation, function, messages as texts, model, named, parameter, run, single, string};
    use serde_json::json;

    fn get() -> serde_json::Value {
        json!([annotation("GET", json!({ "value": "posts" }))])
    }

    #[test]
    fn test_valid_interface_is_clean() {
        let result = run(&ClassLevelValidator, &single(function("test", get(), json!([]), string())));
        assert_eq!(result.error_count(), 0, "{:?}", texts(&result));
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_parameter_without_role() {
        let function = function("test", get(), json!([parameter("id", string(), json!([]))]), string());
        let result = run(&ClassLevelValidator, &single(function));
        assert_eq!(result.error_count(), 1);
        assert!(texts(&result)[0].starts_with(messages::PARAMETER_WITHOUT_ANNOTATION));
        assert!(texts(&result)[0].contains("**id**"));
    }

    #[test]
    fn test_mixed_roles_but_repeatable_cookies_allowed() {
        let mixed = parameter(
            "id",
            string(),
            json!([annotation("Body", json!({})), annotation("Query", json!({}))]),
        );
        let cookies = parameter(
            "token",
            string(),
            json!([
                annotation("Cookie", json!({ "name": "a" })),
                annotation("Cookie", json!({ "name": "b" }))
            ]),
        );
        let result = run(&ClassLevelValidator, &single(function("test", get(), json!([mixed, cookies]), string())));
        assert_eq!(result.error_count(), 1);
        assert!(texts(&result)[0].contains(messages::PARAMETER_WITH_LOT_ANNOTATIONS));
    }

    #[test]
    fn test_absent_method_needs_builder() {
        let without = single(function("test", json!([]), json!([]), string()));
        assert_eq!(run(&ClassLevelValidator, &without).error_count(), 1);

        let builder = parameter("builder", named("io.ktor.client.request.HttpRequestBuilder"), json!([]));
        let with = single(function("test", json!([]), json!([builder.clone()]), string()));
        assert_eq!(run(&ClassLevelValidator, &with).error_count(), 0);

        let two = single(function("test", json!([]), json!([builder.clone(), {
            "name": "other", "type": named("io.ktor.client.request.HttpRequestBuilder")
        }]), string()));
        let result = run(&ClassLevelValidator, &two);
        assert!(texts(&result).iter().any(|text| text.starts_with(messages::ONLY_ONE_HTTP_REQUEST_BUILDER)));
    }

    #[test]
    fn test_any_and_vararg() {
        let vararg = json!({ "name": "ids", "type": string(), "isVararg": true, "annotations": [annotation("Query", json!({}))] });
        let result = run(&ClassLevelValidator, &single(function("test", get(), json!([vararg]), named("kotlin.Any"))));
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_ignored_abstract_function() {
        let ignored = function("test", json!([annotation("KtorGenIgnore", json!({}))]), json!([]), string());
        let result = run(&ClassLevelValidator, &single(ignored));
        assert_eq!(result.error_count(), 1);
        assert!(texts(&result)[0].starts_with(messages::ABSTRACT_FUNCTION_IGNORED));
    }

    #[test]
    fn test_visibility_rules() {
        let model = model(json!({
            "annotations": [annotation("KtorGen", json!({
                "classVisibilityModifier": "private",
                "constructorVisibilityModifier": "protected",
                "functionVisibilityModifier": "open",
                "generateTopLevelFunction": false
            }))]
        }));
        let result = run(&ClassLevelValidator, &model);
        let all = texts(&result);
        assert!(all.iter().any(|text| text.starts_with(messages::PRIVATE_CONSTRUCTOR)));
        assert!(all.iter().any(|text| text.starts_with(messages::INVALID_VISIBILITY_MODIFIER)));
        assert!(all.iter().any(|text| text == messages::PRIVATE_CLASS_NO_ACCESS));
    }

    #[test]
    fn test_companion_rules() {
        let missing = model(json!({
            "annotations": [annotation("KtorGen", json!({ "generateCompanionExtFunction": true }))]
        }));
        assert!(texts(&run(&ClassLevelValidator, &missing)).contains(&messages::MISSING_COMPANION_TO_GENERATE.to_string()));

        let twice = model(json!({
            "annotations": [annotation("KtorGen", json!({}))],
            "companion": { "annotations": [annotation("KtorGen", json!({}))] }
        }));
        let result = run(&ClassLevelValidator, &twice);
        assert_eq!(result.findings()[0].symbol.as_deref(), Some("com.example.TestService.Companion"));
    }

    #[test]
    fn test_private_interface() {
        let result = run(&ClassLevelValidator, &model(json!({ "visibility": "private" })));
        assert!(texts(&result).iter().any(|text| text.starts_with(messages::PRIVATE_INTERFACE_CANT_GENERATE)));
    }
}
