use super::{ValidationContext, ValidationResult, ValidatorStrategy};
use crate::annotations::HttpMethod;
use crate::diagnostics::messages;
use crate::symbols::{TypeArgument, TypeRef};

/// True when a generic type variable appears anywhere in the type, stars excluded.
fn has_type_variable(type_ref: &TypeRef) -> bool {
    type_ref.type_parameter
        || type_ref.arguments.iter().any(|argument| match argument {
            TypeArgument::Star => false,
            TypeArgument::Type(inner) => has_type_variable(inner),
        })
        || type_ref.function.as_ref().is_some_and(|function| {
            function.receiver.as_ref().is_some_and(has_type_variable)
                || function.parameters.iter().any(has_type_variable)
                || has_type_variable(&function.return_type)
        })
}

/// Generated overrides cannot be generic.
///
/// Parameters may use star projections (`Map<String, *>`), the return type may not.
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardParameterValidator;

impl ValidatorStrategy for WildcardParameterValidator {
    fn name(&self) -> &'static str {
        "Type Parameters and Wildcards"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            if !function.type_parameters.is_empty() {
                let names = function.type_parameters.join(", ");
                result.function_error(
                    context,
                    function,
                    None,
                    format!("{}<{names}>", messages::TYPE_VARIABLE_OR_WILDCARD),
                );
            }
            if function.return_type.has_type_variable_or_star() {
                result.function_error(
                    context,
                    function,
                    None,
                    format!("{}{}", messages::TYPE_VARIABLE_OR_WILDCARD, function.return_type),
                );
            }
            for parameter in &function.parameters {
                if has_type_variable(&parameter.type_ref) {
                    result.function_error(
                        context,
                        function,
                        Some(&parameter.name),
                        format!("{}{}", messages::TYPE_VARIABLE_OR_WILDCARD, parameter.type_ref),
                    );
                }
            }
        }
        result
    }
}

/// Functions that execute the request must suspend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnTypeValidator;

impl ValidatorStrategy for ReturnTypeValidator {
    fn name(&self) -> &'static str {
        "Return Type"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            if !function.is_suspend && !function.return_kind.is_non_suspending() {
                result.function_error(
                    context,
                    function,
                    None,
                    format!("{}{}", messages::SUSPEND_FUNCTION_OR_FLOW, function.return_type),
                );
            }
        }
        result
    }
}

/// `@HEAD` functions must return `Unit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadReturnNothingValidator;

impl ValidatorStrategy for HeadReturnNothingValidator {
    fn name(&self) -> &'static str {
        "HEAD Return Type"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            if function.http_method.method == HttpMethod::Head && !function.return_kind.is_unit() {
                result.function_error(context, function, None, messages::HTTP_METHOD_HEAD_NOT_RETURN_BODY);
            }
        }
        result
    }
}
