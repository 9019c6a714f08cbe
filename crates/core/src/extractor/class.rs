use ktorgen_common::{is_unset, name_or};
use tracing::debug;

use super::Extraction;
use super::function::extract_function;
use crate::annotations::{
    FactoryOverrides, KtorGenAnnotation, is_vocabulary, read_class_options, read_kmp_function,
};
use crate::diagnostics::Step;
use crate::diagnostics::messages;
use crate::error::FatalError;
use crate::model::types::{HTTP_CLIENT, is_any};
use crate::model::{ClassOptions, CompanionModel, ExpectFunction, InterfaceModel, PropertyModel};
use crate::symbols::{ClassDeclaration, ClassKind, FunctionDeclaration, Modifier};

fn has_ktorgen(class: &ClassDeclaration) -> (bool, bool) {
    let on_interface = read_class_options(&class.annotations).0.is_some();
    let on_companion = class
        .companion
        .as_ref()
        .is_some_and(|companion| read_class_options(&companion.annotations).0.is_some());
    (on_interface, on_companion)
}

/// Declarations the processor looks at: anything carrying `KtorGen`, and interfaces
/// with at least one function using the vocabulary.
pub fn is_candidate(class: &ClassDeclaration) -> bool {
    if class.kind == ClassKind::Companion {
        return false;
    }
    let (on_interface, on_companion) = has_ktorgen(class);
    on_interface
        || on_companion
        || (class.kind == ClassKind::Interface
            && class.functions.iter().any(|function| {
                function
                    .annotations
                    .iter()
                    .any(|annotation| is_vocabulary(&annotation.qualified_name))
            }))
}

fn unresolved_names(class: &ClassDeclaration, expect_functions: &[&FunctionDeclaration]) -> Vec<String> {
    let mut out = Vec::new();
    for supertype in &class.supertypes {
        supertype.collect_unresolved(&mut out);
    }
    for property in &class.properties {
        property.type_ref.collect_unresolved(&mut out);
    }
    for function in class.functions.iter().chain(expect_functions.iter().copied()) {
        if let Some(return_type) = &function.return_type {
            return_type.collect_unresolved(&mut out);
        }
        for parameter in &function.parameters {
            parameter.type_ref.collect_unresolved(&mut out);
        }
    }
    out
}

fn resolve_options(class: &ClassDeclaration, ktorgen: &KtorGenAnnotation, factories: &FactoryOverrides) -> ClassOptions {
    let simple = class.simple_name();
    let visibility = if is_unset(&ktorgen.visibility_modifier) {
        class.visibility.keyword().to_string()
    } else {
        ktorgen.visibility_modifier.clone()
    };
    let or_visibility = |value: &str| {
        if is_unset(value) {
            visibility.clone()
        } else {
            value.to_string()
        }
    };

    ClassOptions {
        generated_name: name_or(&ktorgen.name, &format!("_{simple}Impl")),
        base_path: ktorgen.base_path.clone(),
        generate: ktorgen.generate,
        top_level_factory: (ktorgen.generate_top_level_function || factories.top_level.is_some()).then(|| {
            name_or(factories.top_level.as_deref().unwrap_or_default(), simple)
        }),
        companion_factory: (ktorgen.generate_companion_ext_function || factories.companion.is_some())
            .then(|| name_or(factories.companion.as_deref().unwrap_or_default(), "create")),
        http_client_factory: (ktorgen.generate_http_client_extension || factories.http_client.is_some())
            .then(|| {
                name_or(
                    factories.http_client.as_deref().unwrap_or_default(),
                    &format!("create{simple}"),
                )
            }),
        propagate_annotations: ktorgen.propagate_annotations,
        annotations: ktorgen.annotations.clone(),
        opt_in_annotations: ktorgen.opt_in_annotations.clone(),
        function_annotations: ktorgen.function_annotations.clone(),
        class_visibility: or_visibility(&ktorgen.class_visibility_modifier),
        constructor_visibility: or_visibility(&ktorgen.constructor_visibility_modifier),
        function_visibility: or_visibility(&ktorgen.function_visibility_modifier),
        custom_file_header: ktorgen.custom_file_header.clone(),
        custom_class_header: ktorgen.custom_class_header.clone(),
    }
}

fn expect_function(declaration: &FunctionDeclaration) -> Option<ExpectFunction> {
    let return_type = declaration.return_type.clone()?;
    Some(ExpectFunction {
        name: declaration.name.clone(),
        package_name: declaration.package().to_string(),
        visibility: declaration.visibility,
        is_expect: declaration.has_modifier(Modifier::Expect),
        parameters: declaration
            .parameters
            .iter()
            .map(|parameter| (parameter.name.clone(), parameter.type_ref.clone()))
            .collect(),
        return_type,
        custom_header: read_kmp_function(&declaration.annotations).unwrap_or_default(),
        passthrough: declaration
            .annotations
            .iter()
            .filter(|annotation| !is_vocabulary(&annotation.qualified_name))
            .cloned()
            .collect(),
        source_file: declaration.file.as_ref().map(|file| file.path.clone()),
    })
}

/// Build the model of one candidate declaration.
///
/// `expect_functions` are the top-level `@KtorGenFunctionKmp` factories returning this interface.
pub fn extract_interface(
    class: &ClassDeclaration,
    expect_functions: &[&FunctionDeclaration],
    step: &mut Step<'_>,
) -> Result<Extraction<InterfaceModel>, FatalError> {
    let symbol = class.qualified_name.as_str();

    if class.has_modifier(Modifier::Expect) || class.has_modifier(Modifier::External) {
        return Err(step.die(format!("{}{symbol}", messages::EXPECT_OR_EXTERNAL_NOT_SUPPORTED), Some(symbol)));
    }
    if let Some(function) = class
        .functions
        .iter()
        .find(|function| function.has_modifier(Modifier::Expect) || function.has_modifier(Modifier::External))
    {
        let function_symbol = format!("{symbol}.{}", function.name);
        return Err(step.die(
            format!("{}{function_symbol}", messages::EXPECT_OR_EXTERNAL_NOT_SUPPORTED),
            Some(&function_symbol),
        ));
    }
    if class.kind != ClassKind::Interface {
        step.error(messages::KTOR_GEN_TYPE_NOT_ALLOWED, Some(symbol));
        return Ok(Extraction::Rejected);
    }
    let Some(file) = &class.file else {
        step.error(messages::INTERFACE_NOT_HAVE_FILE, Some(symbol));
        return Ok(Extraction::Rejected);
    };

    let unresolved = unresolved_names(class, expect_functions);
    if !unresolved.is_empty() {
        debug!(interface = %symbol, unresolved = ?unresolved, "Deferring interface");
        step.step(format!("Deferred, unresolved: {}", unresolved.join(", ")));
        return Ok(Extraction::Deferred(unresolved));
    }

    let (on_interface, mut factories) = read_class_options(&class.annotations);
    let (on_companion, companion_factories) = class
        .companion
        .as_ref()
        .map(|companion| read_class_options(&companion.annotations))
        .unwrap_or_default();
    factories.top_level = factories.top_level.or(companion_factories.top_level);
    factories.companion = factories.companion.or(companion_factories.companion);
    factories.http_client = factories.http_client.or(companion_factories.http_client);

    let ktorgen_on_interface = on_interface.is_some();
    let ktorgen_on_companion = on_companion.is_some();
    let ktorgen = on_interface.or(on_companion).unwrap_or_default();
    if !ktorgen.generate {
        step.step("Skipped, generate = false");
        return Ok(Extraction::Skipped);
    }
    let options = resolve_options(class, &ktorgen, &factories);

    let mut client_property = None;
    let mut properties = Vec::new();
    for property in &class.properties {
        if client_property.is_none() && property.type_ref.is(HTTP_CLIENT) && !property.type_ref.nullable {
            client_property = Some(property.name.clone());
        } else {
            properties.push(PropertyModel {
                name: property.name.clone(),
                type_ref: property.type_ref.clone(),
                mutable: property.mutable,
            });
        }
    }

    let before = step.error_count();
    let functions: Vec<_> = class
        .functions
        .iter()
        .filter_map(|function| extract_function(function, &options.base_path, symbol, step))
        .collect();
    if step.error_count() > before {
        return Ok(Extraction::Rejected);
    }

    let model = InterfaceModel {
        qualified_name: class.qualified_name.clone(),
        simple_name: class.simple_name().to_string(),
        package_name: class.package().to_string(),
        visibility: class.visibility,
        options,
        supertypes: class
            .supertypes
            .iter()
            .filter(|supertype| !is_any(supertype))
            .cloned()
            .collect(),
        properties,
        client_property,
        functions,
        companion: class.companion.as_ref().map(|companion| CompanionModel {
            name: companion.name.clone(),
            has_ktorgen: ktorgen_on_companion,
        }),
        ktorgen_on_interface,
        expect_functions: expect_functions.iter().filter_map(|function| expect_function(function)).collect(),
        imports: file.imports.clone(),
        source_file: file.path.clone(),
    };
    step.step(format!("Extracted {} function(s)", model.functions.len()));
    Ok(Extraction::Ready(model))
}
