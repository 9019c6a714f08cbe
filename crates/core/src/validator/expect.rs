use super::{ValidationContext, ValidationResult, ValidatorStrategy};
use crate::diagnostics::messages;

/// `@KtorGenFunctionKmp` factories must be `expect` declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectFunctionsValidator;

impl ValidatorStrategy for ExpectFunctionsValidator {
    fn name(&self) -> &'static str {
        "Expect Functions"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in &context.model.expect_functions {
            let symbol = format!("{}.{}", function.package_name, function.name);
            if !function.is_expect {
                result.error(messages::EXPECT_FUNCTION_NOT_EXPECT, Some(symbol));
            } else if !context.options.experimental {
                result.warning(
                    format!("{}{}", messages::EXPECT_FUNCTION_NEEDS_EXPERIMENTAL, function.name),
                    Some(symbol),
                );
            }
        }
        result
    }
}
