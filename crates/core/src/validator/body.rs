use super::{ValidationContext, ValidationResult, ValidatorStrategy, map_shape};
use crate::annotations::{HttpMethod, HttpMethodAnnotation, RoleKind};
use crate::diagnostics::messages;
use crate::model::FunctionModel;

/// Form and multipart bodies belong on POST, PUT, PATCH or an explicit `hasBody` method.
fn accepts_encoded_body(method: &HttpMethodAnnotation) -> bool {
    method.has_body || matches!(method.method, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
}

/// At most one body kind, on a method that carries a body.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyUsageValidator;

impl ValidatorStrategy for BodyUsageValidator {
    fn name(&self) -> &'static str {
        "Body Usage"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            let kinds = [function.has_body_parameter(), function.is_form_url(), function.is_multipart()];
            let used = kinds.iter().filter(|used| **used).count();

            if used > 0 && !function.http_method.allows_body() {
                result.function_warning(
                    context,
                    function,
                    None,
                    format!("{}{}", function.http_method.method, messages::BODY_USAGE_INVALID_HTTP_METHOD),
                );
            }
            if used > 1 {
                result.function_error(context, function, None, messages::CONFLICT_BODY_TYPE);
            }
            let bodies: Vec<_> = function.parameters_with(RoleKind::Body).collect();
            if bodies.len() > 1 || bodies.iter().any(|body| body.is_vararg) {
                result.function_error(context, function, None, messages::INVALID_BODY_PARAMETER);
            }
        }
        result
    }
}

/// Rules shared by the two encoded body kinds.
struct EncodedBody {
    marked: fn(&FunctionModel) -> bool,
    single: RoleKind,
    map: RoleKind,
    implied: &'static str,
    empty: &'static str,
    method_mismatch: &'static str,
    bad_map: &'static str,
}

impl EncodedBody {
    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for function in context.functions() {
            let has_parts = function.has_role(self.single) || function.has_role(self.map);
            let mut encoded = (self.marked)(function);
            if !encoded && has_parts {
                result.function_warning(context, function, None, self.implied);
                encoded = true;
            }
            if encoded && !has_parts {
                result.function_error(context, function, None, self.empty);
            }
            if encoded && !accepts_encoded_body(&function.http_method) {
                result.function_warning(context, function, None, self.method_mismatch);
            }
            for parameter in function.parameters_with(self.map) {
                if map_shape(parameter, false).is_none() {
                    result.function_error(context, function, Some(&parameter.name), self.bad_map);
                }
            }
        }
        result
    }
}

/// Form url encoded functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormUrlBodyValidator;

impl ValidatorStrategy for FormUrlBodyValidator {
    fn name(&self) -> &'static str {
        "Form Url Encoded"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        EncodedBody {
            marked: FunctionModel::has_form_marker,
            single: RoleKind::Field,
            map: RoleKind::FieldMap,
            implied: messages::FORM_ENCODED_ANNOTATION_MISSING_FOUND_FIELD,
            empty: messages::FORM_ENCODED_MUST_CONTAIN_AT_LEAST_ONE_FIELD,
            method_mismatch: messages::FORM_ENCODED_ANNOTATION_MISMATCH_HTTP_METHOD,
            bad_map: messages::FIELD_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING,
        }
        .validate(context)
    }
}

/// Multipart functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipartValidator;

impl ValidatorStrategy for MultipartValidator {
    fn name(&self) -> &'static str {
        "Multipart"
    }

    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult {
        EncodedBody {
            marked: FunctionModel::has_multipart_marker,
            single: RoleKind::Part,
            map: RoleKind::PartMap,
            implied: messages::MULTIPART_ANNOTATION_MISSING_FOUND_PART,
            empty: messages::MULTIPART_MUST_CONTAIN_AT_LEAST_ONE_PART,
            method_mismatch: messages::MULTIPART_CAN_ONLY_BE_SPECIFIED_ON_HTTP_METHODS,
            bad_map: messages::PART_MAP_PARAMETER_TYPE_MUST_BE_MAP_PAIR_STRING,
        }
        .validate(context)
    }
}
