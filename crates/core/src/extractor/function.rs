use ktorgen_common::PathTemplate;
use tracing::trace;

use super::parameter::extract_parameter;
use crate::annotations::{
    CookieValue, FunctionAnnotation, HttpMethodAnnotation, RoleKind, read_function_annotations,
};
use crate::diagnostics::Step;
use crate::diagnostics::messages;
use crate::model::{FunctionModel, ReturnKind};
use crate::symbols::{FunctionDeclaration, Modifier};

/// URL template of a function: base path joined with the method path.
///
/// An absolute method path ignores the base path, and an empty one next to an
/// `@Url` parameter leaves the URL entirely to that parameter.
pub fn effective_path(base_path: &str, method_path: &str, has_url_parameter: bool) -> String {
    if method_path.is_empty() && has_url_parameter {
        return String::new();
    }
    if method_path.starts_with("http://") || method_path.starts_with("https://") {
        return method_path.to_string();
    }
    format!("{base_path}{method_path}")
}

/// Build the model of one function, `None` when an error was recorded for it.
pub fn extract_function(
    declaration: &FunctionDeclaration,
    base_path: &str,
    owner: &str,
    step: &mut Step<'_>,
) -> Option<FunctionModel> {
    let symbol = format!("{owner}.{}", declaration.name);
    let read = read_function_annotations(&declaration.annotations);
    let mut failed = false;

    if read.methods.len() > 1 {
        step.error(messages::ONLY_ONE_HTTP_METHOD_IS_ALLOWED, Some(&symbol));
        failed = true;
    }
    let Some(return_type) = declaration.return_type.clone() else {
        step.error(messages::FUNCTION_NOT_RETURN_TYPE, Some(&symbol));
        return None;
    };
    for annotation in &read.metadata {
        if let FunctionAnnotation::Cookie { cookie } = annotation {
            if cookie.value == CookieValue::FromParameter {
                step.error(
                    format!("{} Cookie: {}", messages::COOKIE_ON_FUNCTION_WITHOUT_VALUE, cookie.name),
                    Some(&symbol),
                );
                failed = true;
            }
        }
    }
    if failed {
        return None;
    }

    let parameters: Vec<_> = declaration.parameters.iter().map(extract_parameter).collect();
    let http_method = read
        .methods
        .into_iter()
        .next()
        .unwrap_or_else(HttpMethodAnnotation::absent);
    let has_url_parameter = parameters.iter().any(|parameter| parameter.has_role(RoleKind::Url));
    let path = effective_path(base_path, &http_method.path, has_url_parameter);
    let is_abstract = declaration.has_modifier(Modifier::Abstract);

    trace!(function = %symbol, method = %http_method.method, path = %path, "Extracted function");
    Some(FunctionModel {
        name: declaration.name.clone(),
        return_kind: ReturnKind::classify(&return_type),
        return_type,
        is_suspend: declaration.has_modifier(Modifier::Suspend),
        is_abstract,
        generate: is_abstract && read.options.generate,
        http_method,
        path: PathTemplate::parse(&path),
        annotations: read.metadata,
        parameters,
        options: read.options,
        type_parameters: declaration.type_parameters.clone(),
        passthrough: read.passthrough,
    })
}
