use super::{ValidationContext, ValidationResult, ValidatorStrategy, map_shape};
use crate::annotations::RoleKind;
use crate::diagnostics::messages;

/// `@QueryMap` parameters are `Map<String, *>` or `Pair<String, *>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryValidator;

impl ValidatorStrategy for QueryValidator {
    fn name(&self) -> &'static str {
        "Query Parameters"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            for parameter in function.parameters_with(RoleKind::QueryMap) {
                if map_shape(parameter, false).is_none() {
                    result.function_error(
                        context,
                        function,
                        Some(&parameter.name),
                        messages::QUERY_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING,
                    );
                }
            }
        }
        result
    }
}

/// Repeated `@Cookie` on vararg parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieValidator;

impl ValidatorStrategy for CookieValidator {
    fn name(&self) -> &'static str {
        "Cookies"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            for parameter in function.parameters_with(RoleKind::Cookie) {
                if parameter.is_vararg && parameter.roles_of(RoleKind::Cookie).count() > 1 {
                    result.function_warning(
                        context,
                        function,
                        Some(&parameter.name),
                        messages::VARARG_PARAMETER_WITH_LOT_ANNOTATIONS,
                    );
                }
            }
        }
        result
    }
}
