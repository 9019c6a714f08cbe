//! `actual` implementations of `@KtorGenFunctionKmp` expect factories.

use tracing::debug;

use super::class::constructor_params;
use super::factory::{Factory, FactoryKey, constructor_call, factory_annotations};
use super::{SourceFile, kt_file, propagation};
use crate::diagnostics::{Step, messages};
use crate::kotlin::{ImportTable, KtFunction, KtParam};
use crate::model::{ExpectFunction, InterfaceModel};

/// `actual` functions of one interface.
#[derive(Debug, Default)]
pub struct Actuals {
    /// Actuals living in the package of the interface, written to its main file.
    pub main: Vec<KtFunction>,
    /// One file per actual declared in another package.
    pub files: Vec<SourceFile>,
}

/// Emit an `actual` for every expect function of `model`.
///
/// An expect function whose signature equals a generated factory turns that
/// factory into the `actual`. Otherwise its parameters must match the
/// constructor one to one, a mismatch is an error and the actual is skipped.
pub fn build_actuals(
    model: &InterfaceModel,
    factories: &mut [Factory],
    imports: &mut ImportTable,
    step: &mut Step<'_>,
) -> Actuals {
    let mut actuals = Actuals::default();
    for expect in model.expect_functions.iter().filter(|expect| expect.is_expect) {
        let symbol = format!("{}.{}", expect.package_name, expect.name);
        let key = FactoryKey {
            name: expect.name.clone(),
            package: expect.package_name.clone(),
            parameter_types: expect.parameters.iter().map(|(_, type_ref)| type_ref.to_string()).collect(),
        };
        if let Some(factory) = factories.iter_mut().find(|factory| factory.key == key) {
            step.warning(
                format!(
                    "Expect function '{}' has the signature of the generated {}, it becomes the actual",
                    expect.name,
                    factory.kind.label()
                ),
                Some(&symbol),
            );
            factory.function.modifiers.push("actual".to_string());
            continue;
        }
        if !matches_constructor(model, expect, &symbol, step) {
            continue;
        }

        if expect.package_name == model.package_name {
            actuals.main.push(actual_function(model, expect, imports));
            continue;
        }
        let mut own_imports = ImportTable::new(&expect.package_name);
        let function = actual_function(model, expect, &mut own_imports);
        own_imports.name(&format!("{}.{}", model.package_name, model.options.generated_name));
        let mut dependencies = vec![model.source_file.clone()];
        dependencies.extend(expect.source_file.clone());
        let file_name = format!("_{}KmpActual.kt", expect.name);
        debug!(file = %file_name, "Writing actual in its own file");
        actuals.files.push(SourceFile {
            package: expect.package_name.clone(),
            file_name,
            file: kt_file(model, &expect.package_name, own_imports.imports(), Vec::new(), vec![function]),
            dependencies,
        });
    }
    actuals
}

fn matches_constructor(model: &InterfaceModel, expect: &ExpectFunction, symbol: &str, step: &mut Step<'_>) -> bool {
    let params = constructor_params(model);
    if params.len() != expect.parameters.len() {
        step.error(
            format!(
                "{}Constructor mismatch for {}. Expect function '{}' has {} parameter(s) but generated constructor expects {} parameter(s)",
                messages::EXPECT_FUNCTION_SIZE_MISMATCH,
                model.options.generated_name,
                expect.name,
                expect.parameters.len(),
                params.len()
            ),
            Some(symbol),
        );
        return false;
    }
    for (index, (param, (_, found))) in params.iter().zip(&expect.parameters).enumerate() {
        if !param.type_ref.same_type(found) {
            step.error(
                format!(
                    "{}Parameter type mismatch at position {index} for expect function '{}'. Expected: {}, Found: {found}",
                    messages::EXPECT_FUNCTION_TYPE_MISMATCH,
                    expect.name,
                    param.type_ref
                ),
                Some(symbol),
            );
            return false;
        }
    }
    true
}

fn actual_function(model: &InterfaceModel, expect: &ExpectFunction, imports: &mut ImportTable) -> KtFunction {
    let mut annotations = factory_annotations(model, imports);
    annotations.extend(expect.passthrough.iter().map(|annotation| propagation::render(annotation, imports)));
    let arguments: Vec<String> = expect.parameters.iter().map(|(name, _)| name.clone()).collect();
    KtFunction {
        doc: (!expect.custom_header.trim().is_empty()).then(|| expect.custom_header.clone()),
        annotations,
        modifiers: vec![expect.visibility.keyword().to_string(), "actual".to_string()],
        receiver: None,
        name: expect.name.clone(),
        params: expect
            .parameters
            .iter()
            .map(|(name, type_ref)| KtParam::new(name.clone(), imports.type_name(type_ref)))
            .collect(),
        return_type: Some(imports.type_name(&expect.return_type)),
        body: vec![constructor_call(model, &arguments)],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::DiagnosticLog;
    use crate::kotlin::Emit;
    use crate::symbols::{TypeRef, Visibility};
    use crate::test_support::model;

    fn expect_function(package: &str, parameters: Vec<(&str, &str)>) -> ExpectFunction {
        ExpectFunction {
            name: "buildTestService".into(),
            package_name: package.into(),
            visibility: Visibility::Public,
            is_expect: true,
            parameters: parameters
                .into_iter()
                .map(|(name, type_name)| (name.to_string(), TypeRef::named(type_name)))
                .collect(),
            return_type: TypeRef::named("com.example.TestService"),
            custom_header: String::new(),
            passthrough: Vec::new(),
            source_file: Some("src/Factory.kt".into()),
        }
    }

    fn run(model: &InterfaceModel) -> (Actuals, DiagnosticLog) {
        let mut log = DiagnosticLog::new("test");
        let mut imports = ImportTable::new("com.example");
        let actuals = build_actuals(model, &mut [], &mut imports, &mut log.root());
        (actuals, log)
    }

    #[test]
    fn test_same_package_actual() {
        let mut model = model(json!({}));
        model
            .expect_functions
            .push(expect_function("com.example", vec![("client", "io.ktor.client.HttpClient")]));
        let (actuals, log) = run(&model);
        assert_eq!(log.error_count(), 0);
        assert_eq!(actuals.main.len(), 1);
        assert!(actuals.main[0].emit().contains(
            "public actual fun buildTestService(client: HttpClient): TestService {\n    return _TestServiceImpl(client)\n}"
        ));
    }

    #[test]
    fn test_other_package_gets_own_file() {
        let mut model = model(json!({}));
        model
            .expect_functions
            .push(expect_function("com.example.di", vec![("client", "io.ktor.client.HttpClient")]));
        let (actuals, _) = run(&model);
        assert_eq!(actuals.files.len(), 1);
        let file = &actuals.files[0];
        assert_eq!(file.file_name, "_buildTestServiceKmpActual.kt");
        assert_eq!(file.dependencies, vec!["src/TestService.kt", "src/Factory.kt"]);
        assert!(file.content().contains("import com.example._TestServiceImpl\n"));
    }

    #[test]
    fn test_size_mismatch() {
        let mut model = model(json!({}));
        model.expect_functions.push(expect_function("com.example", vec![]));
        let (actuals, log) = run(&model);
        assert!(actuals.main.is_empty());
        assert_eq!(log.error_count(), 1);
        assert!(log.tree_report().contains(
            "Expect function 'buildTestService' has 0 parameter(s) but generated constructor expects 1 parameter(s)"
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let mut model = model(json!({}));
        model.expect_functions.push(expect_function("com.example", vec![("client", "kotlin.String")]));
        let (_, log) = run(&model);
        assert!(log.tree_report().contains(
            "Parameter type mismatch at position 0 for expect function 'buildTestService'. Expected: io.ktor.client.HttpClient, Found: kotlin.String"
        ));
    }
}
