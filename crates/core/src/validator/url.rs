use std::collections::BTreeSet;

use ktorgen_common::{PathTemplate, is_blank};
use url::Url;

use super::{ValidationContext, ValidationResult, ValidatorStrategy};
use crate::annotations::{ParameterAnnotation, RoleKind};
use crate::diagnostics::messages;

/// Every `{placeholder}` of the URL template is matched by exactly one `@Path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParameterValidator;

impl ValidatorStrategy for PathParameterValidator {
    fn name(&self) -> &'static str {
        "Path Parameters"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            let placeholders = function.path.placeholders();
            let has_path = function.has_role(RoleKind::Path);
            let method_path = &function.http_method.path;

            if has_path && placeholders.is_empty() {
                result.function_error(
                    context,
                    function,
                    None,
                    format!(
                        "{}, current URL without path placeholders: '{}'. ",
                        messages::PATH_CAN_ONLY_BE_USED_WITH_RELATIVE_URL_ON,
                        function.path.raw
                    ),
                );
            }
            if placeholders.is_empty() {
                continue;
            }
            if !has_path {
                result.function_error(context, function, None, format!("{}{method_path}. ", messages::MISSING_PATH_VALUE));
            }
            let distinct: BTreeSet<_> = placeholders.iter().copied().collect();
            if distinct.len() != placeholders.len() {
                result.function_error(
                    context,
                    function,
                    None,
                    format!("{}{method_path}. ", messages::DUPLICATE_PATH_PLACEHOLDER),
                );
            }
            if has_path {
                for placeholder in &distinct {
                    let bound = function
                        .parameters_with(RoleKind::Path)
                        .filter(|parameter| {
                            matches!(
                                parameter.role(RoleKind::Path),
                                Some(ParameterAnnotation::Path { value, .. }) if value == placeholder
                            )
                        })
                        .count();
                    match bound {
                        0 => result.function_error(
                            context,
                            function,
                            None,
                            format!("{}{method_path}, placeholder '{{{placeholder}}}'. ", messages::MISSING_PATH_VALUE),
                        ),
                        1 => {}
                        _ => result.function_error(
                            context,
                            function,
                            None,
                            format!(
                                "{}{method_path}, placeholder '{{{placeholder}}}'. ",
                                messages::PATH_PLACEHOLDER_BOUND_MORE_THAN_ONCE
                            ),
                        ),
                    }
                }
            }

            for parameter in function.parameters_with(RoleKind::Path) {
                let Some(ParameterAnnotation::Path { value, .. }) = parameter.role(RoleKind::Path) else {
                    continue;
                };
                if parameter.is_nullable() {
                    result.function_error(
                        context,
                        function,
                        Some(&parameter.name),
                        messages::PATH_PARAMETER_TYPE_MAY_NOT_BE_NULLABLE,
                    );
                }
                if !placeholders.contains(&value.as_str()) {
                    result.function_error(
                        context,
                        function,
                        Some(&parameter.name),
                        format!("{}{method_path}. ", messages::MISSING_PATH_VALUE),
                    );
                }
            }
        }
        result
    }
}

fn is_valid_url(path: &str) -> bool {
    match Url::parse(path) {
        Ok(_) => true,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("https://localhost/")
            .and_then(|base| base.join(path))
            .is_ok(),
        Err(_) => false,
    }
}

/// Base path ending with `/` followed by a method path starting with `/`.
fn has_suspicious_double_slash(base_path: &str, method_path: &str) -> bool {
    if is_blank(base_path) || is_blank(method_path) || base_path == method_path {
        return false;
    }
    base_path.ends_with('/')
        && method_path
            .strip_prefix(base_path)
            .unwrap_or(method_path)
            .starts_with('/')
        && base_path != "/"
        && method_path != "/"
}

/// `@Url` usage, URL syntax and fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlSyntaxValidator;

impl ValidatorStrategy for UrlSyntaxValidator {
    fn name(&self) -> &'static str {
        "Url Syntax"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        let base_path = &context.model.options.base_path;

        for function in context.functions() {
            let method_path = &function.http_method.path;
            let sample = PathTemplate::parse(method_path).substitute_all("valid");
            let urls: Vec<_> = function.parameters_with(RoleKind::Url).collect();

            if !is_blank(&sample) && !urls.is_empty() {
                result.function_error(context, function, None, messages::URL_WITH_PATH_VALUE);
            }
            if !is_valid_url(&sample) {
                result.function_warning(
                    context,
                    function,
                    None,
                    format!(
                        "{}Current path ('valid' is a placeholder for runtime values): {sample}",
                        messages::URL_SYNTAX_ERROR
                    ),
                );
            }
            if has_suspicious_double_slash(base_path, method_path) {
                result.function_warning(
                    context,
                    function,
                    None,
                    format!(
                        "{}Base path '{base_path}' and endpoint path '{method_path}' will generate a double slash ('//'). \
                         Consider removing the trailing or leading '/'.",
                        messages::DOUBLE_SLASH_IN_URL_PATH
                    ),
                );
            }

            if urls.len() > 1 || urls.first().is_some_and(|url| url.is_vararg) {
                result.function_error(context, function, None, messages::MULTIPLE_URL_FOUND);
            }
            if let Some(url) = urls.first() {
                if url.is_nullable() {
                    result.function_error(
                        context,
                        function,
                        Some(&url.name),
                        messages::URL_PARAMETER_TYPE_MAY_NOT_BE_NULLABLE,
                    );
                }
                if function.has_role(RoleKind::Path) {
                    result.function_error(context, function, None, messages::URL_WITH_PATH_PARAMETER);
                }
            }

            let fragments = function.parameters_with(RoleKind::Fragment).count();
            match function.fragment() {
                Some((value, _)) => {
                    if is_blank(value) {
                        result.function_error(context, function, None, messages::URL_FRAGMENT_IN_FUNCTION_IS_BLANK);
                    }
                    if fragments > 0 {
                        result.function_error(context, function, None, messages::MULTIPLE_URL_FRAGMENT);
                    }
                }
                None if fragments > 1 => {
                    result.function_error(context, function, None, messages::MULTIPLE_URL_FRAGMENT);
                }
                None => {}
            }
        }
        result
    }
}
