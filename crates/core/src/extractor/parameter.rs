use crate::annotations::read_parameter_annotations;
use crate::model::types::{HTTP_REQUEST, HTTP_REQUEST_BUILDER, HTTP_REQUEST_DATA, UNIT};
use crate::model::{BuilderKind, ParameterModel};
use crate::symbols::{ParameterDeclaration, TypeRef};

/// Request-builder escape hatch recognized from the parameter type alone.
pub fn builder_kind(type_ref: &TypeRef) -> Option<BuilderKind> {
    if let Some(function) = &type_ref.function {
        let receiver_is_builder = function
            .receiver
            .as_ref()
            .is_some_and(|receiver| receiver.is(HTTP_REQUEST_BUILDER) && !receiver.nullable);
        return (receiver_is_builder
            && function.parameters.is_empty()
            && function.return_type.is(UNIT)
            && !function.suspend)
            .then_some(BuilderKind::Lambda);
    }
    [HTTP_REQUEST_BUILDER, HTTP_REQUEST, HTTP_REQUEST_DATA]
        .iter()
        .any(|name| type_ref.is(name))
        .then_some(BuilderKind::TakeFrom)
}

/// Model of one parameter, roles and passthrough annotations split.
pub fn extract_parameter(declaration: &ParameterDeclaration) -> ParameterModel {
    let (roles, passthrough) = read_parameter_annotations(&declaration.annotations, &declaration.name);
    // A builder-typed parameter with an explicit role keeps the role.
    let builder = if roles.is_empty() {
        builder_kind(&declaration.type_ref)
    } else {
        None
    };
    ParameterModel {
        name: declaration.name.clone(),
        type_ref: declaration.type_ref.clone(),
        is_vararg: declaration.is_vararg,
        roles,
        builder,
        passthrough,
    }
}
