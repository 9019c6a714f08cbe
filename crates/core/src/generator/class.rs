//! The implementation class: primary constructor, delegation and overrides.

use ktorgen_common::{is_blank, lower_camel};
use tracing::trace;

use super::function_body::function_body;
use super::{ktor, propagation};
use crate::diagnostics::Step;
use crate::error::FatalError;
use crate::kotlin::{ImportTable, KtClass, KtFunction, KtParam};
use crate::model::types::HTTP_CLIENT;
use crate::model::{FunctionModel, InterfaceModel};
use crate::symbols::TypeRef;

/// KDoc of overrides without a custom header.
pub const DEFAULT_FUNCTION_DOC: &str = "Generated by KtorGen";

/// One primary-constructor parameter of the generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorParam {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub type_ref: TypeRef,
    /// `override val`, `private val`, or nothing for delegates.
    pub property: Option<&'static str>,
}

/// Constructor parameters in order: client, interface properties, supertype delegates.
pub fn constructor_params(model: &InterfaceModel) -> Vec<ConstructorParam> {
    let mut out = vec![ConstructorParam {
        name: model.client_name().to_string(),
        type_ref: TypeRef::named(HTTP_CLIENT),
        property: Some(if model.client_property.is_some() { "override val" } else { "private val" }),
    }];
    out.extend(model.properties.iter().map(|property| ConstructorParam {
        name: property.name.clone(),
        type_ref: property.type_ref.clone(),
        property: Some(if property.mutable { "override var" } else { "override val" }),
    }));
    out.extend(model.supertypes.iter().map(|supertype| ConstructorParam {
        name: lower_camel(supertype.simple_name()),
        type_ref: supertype.clone(),
        property: None,
    }));
    out
}

pub fn build_class(model: &InterfaceModel, imports: &mut ImportTable, step: &mut Step<'_>) -> Result<KtClass, FatalError> {
    let options = &model.options;
    let mut annotations = vec![format!("@{}", imports.name(ktor::GENERATED))];
    annotations.extend(propagation::markers(&options.annotations, imports));
    annotations.extend(propagation::opt_in(&options.opt_in_annotations, imports));

    let mut constructor = Vec::new();
    for param in constructor_params(model) {
        let mut kt_param = KtParam::new(param.name, imports.type_name(&param.type_ref));
        kt_param.property = param.property.map(str::to_string);
        constructor.push(kt_param);
    }

    let mut supertypes = vec![imports.name(&model.qualified_name)];
    for supertype in &model.supertypes {
        let type_name = imports.type_name(supertype);
        supertypes.push(format!("{type_name} by {}", lower_camel(supertype.simple_name())));
    }

    let mut functions = Vec::new();
    for function in model.generated_functions() {
        let kt_function = step.task(&format!("Generate {}", function.name), |step| {
            let kt_function = override_function(model, function, imports)?;
            step.step(format!("Generated {}", function.signature(&model.simple_name, None)));
            Ok(kt_function)
        })?;
        functions.push(kt_function);
    }
    trace!(class = %options.generated_name, functions = functions.len(), "Built implementation class");

    Ok(KtClass {
        doc: (!is_blank(&options.custom_class_header)).then(|| options.custom_class_header.clone()),
        annotations,
        modifiers: vec![options.class_visibility.clone()],
        name: options.generated_name.clone(),
        constructor_modifiers: vec![options.constructor_visibility.clone()],
        constructor,
        supertypes,
        functions,
    })
}

fn override_function(
    model: &InterfaceModel,
    function: &FunctionModel,
    imports: &mut ImportTable,
) -> Result<KtFunction, FatalError> {
    let mut annotations = Vec::new();
    if model.options.propagate_annotations && function.options.propagate_annotations {
        for annotation in &function.passthrough {
            annotations.push(propagation::render(annotation, imports));
        }
    }
    annotations.extend(propagation::markers(&function.options.annotations, imports));
    let opt_ins = model.options.opt_in_annotations.iter().chain(&function.options.opt_in_annotations);
    annotations.extend(propagation::opt_in(opt_ins, imports));

    let mut modifiers = vec!["override".to_string()];
    if function.is_suspend {
        modifiers.push("suspend".to_string());
    }

    let mut params = Vec::new();
    for parameter in &function.parameters {
        let mut kt_param = KtParam::new(parameter.name.clone(), imports.type_name(&parameter.type_ref));
        kt_param.vararg = parameter.is_vararg;
        kt_param.annotations = parameter
            .passthrough
            .iter()
            .map(|annotation| propagation::render(annotation, imports))
            .collect();
        params.push(kt_param);
    }

    let return_type = imports.type_name(&function.return_type);
    let body = function_body(function, model.client_name(), imports)?;
    let doc = if is_blank(&function.options.custom_header) {
        DEFAULT_FUNCTION_DOC.to_string()
    } else {
        function.options.custom_header.clone()
    };

    Ok(KtFunction {
        doc: Some(doc),
        annotations,
        modifiers,
        receiver: None,
        name: function.name.clone(),
        params,
        return_type: Some(return_type),
        body,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::DiagnosticLog;
    use crate::kotlin::Emit;
    use crate::test_support::{annotation, function, model, named, parameter, string};

    fn render(model: &InterfaceModel) -> (String, Vec<String>) {
        let mut imports = ImportTable::new(&model.package_name);
        let mut log = DiagnosticLog::new("test");
        let class = build_class(model, &mut imports, &mut log.root()).unwrap();
        (class.emit(), imports.imports())
    }

    fn get_posts() -> serde_json::Value {
        function(
            "posts",
            json!([annotation("io.github.kingg22.ktorgen.http.GET", json!({ "value": "posts" }))]),
            json!([]),
            string(),
        )
    }

    #[test]
    fn test_constructor_order() {
        let model = model(json!({
            "supertypes": [named("java.io.Closeable")],
            "properties": [
                { "name": "client", "type": named(HTTP_CLIENT) },
                { "name": "token", "type": string(), "mutable": true }
            ],
            "functions": [get_posts()]
        }));
        let params = constructor_params(&model);
        let names: Vec<_> = params.iter().map(|param| param.name.as_str()).collect();
        assert_eq!(names, vec!["client", "token", "closeable"]);
        assert_eq!(params[1].property, Some("override var"));
        assert_eq!(params[2].property, None);

        let (code, _) = render(&model);
        assert!(code.contains(
            "public class _TestServiceImpl public constructor(\n    override val client: HttpClient,\n    override var token: String,\n    closeable: Closeable,\n) : TestService, Closeable by closeable {\n"
        ));
    }

    #[test]
    fn test_default_client_is_private() {
        let (code, imports) = render(&model(json!({ "functions": [get_posts()] })));
        assert!(code.starts_with("@Generated\npublic class _TestServiceImpl public constructor(private val _httpClient: HttpClient) : TestService {\n"));
        assert!(code.contains("    /**\n     * Generated by KtorGen\n     */\n    override suspend fun posts(): String {\n"));
        assert!(imports.contains(&"io.github.kingg22.ktorgen.core.Generated".to_string()));
    }

    #[test]
    fn test_propagated_annotations_and_opt_in() {
        let mut declaration = get_posts();
        declaration["annotations"]
            .as_array_mut()
            .unwrap()
            .push(annotation("kotlin.Deprecated", json!({ "message": "old" })));
        let model = model(json!({
            "annotations": [annotation(
                "io.github.kingg22.ktorgen.core.KtorGen",
                json!({ "optInAnnotations": [{ "class": "kotlin.ExperimentalStdlibApi" }] })
            )],
            "functions": [declaration]
        }));
        let (code, _) = render(&model);
        assert!(code.contains("@OptIn(ExperimentalStdlibApi::class)\npublic class"));
        assert!(code.contains("    @Deprecated(message = \"old\")\n    @OptIn(ExperimentalStdlibApi::class)\n    override suspend fun posts()"));
    }

    #[test]
    fn test_vararg_parameters_keep_modifier() {
        let mut declaration = function(
            "search",
            json!([annotation("io.github.kingg22.ktorgen.http.GET", json!({ "value": "search" }))]),
            json!([parameter(
                "tags",
                string(),
                json!([annotation("io.github.kingg22.ktorgen.http.Query", json!({ "value": "tag" }))])
            )]),
            string(),
        );
        declaration["parameters"][0]["isVararg"] = json!(true);
        let (code, _) = render(&model(json!({ "functions": [declaration] })));
        assert!(code.contains("override suspend fun search(vararg tags: String): String {"));
        assert!(code.contains("tags.forEach {\n"));
    }
}
