//! Kotlin synthesis for validated interface models.
//!
//! One call to [`generate`] produces the main file of an interface (the
//! implementation class, its factories and same-package `actual` functions)
//! plus one extra file per `actual` declared in another package.

mod class;
mod expect_actual;
mod factory;
mod function_body;
mod ktor;
mod propagation;
mod request;
mod values;

use std::path::PathBuf;

use ktorgen_common::is_blank;
use serde::Serialize;
use tracing::debug;

pub use class::{ConstructorParam, DEFAULT_FUNCTION_DOC, constructor_params};
pub use factory::{FactoryKey, FactoryRegistry};

use crate::annotations::is_vocabulary;
use crate::diagnostics::Step;
use crate::error::FatalError;
use crate::kotlin::{Emit, ImportTable, KtClass, KtFile, KtFunction};
use crate::model::InterfaceModel;
use crate::options::ProcessorOptions;

/// Leading comment of generated files without a custom header.
pub const DEFAULT_FILE_COMMENT: &str = "Generated by KtorGen. Do not edit, changes are lost on the next build.";

/// `@file:Suppress` of every generated file.
pub const FILE_SUPPRESSIONS: &str = "Suppress(\"REDUNDANT_VISIBILITY_MODIFIER\", \"unused\", \"UNUSED_IMPORT\", \"warnings\", \"RemoveSingleExpressionStringTemplate\", \"ktlint\", \"detekt:all\")";

/// A generated Kotlin file with the sources it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Package of the generated class.
    pub package: String,
    /// `_NameImpl.kt`.
    pub file_name: String,
    /// File tree to emit.
    #[serde(skip)]
    pub file: KtFile,
    /// Source files whose change invalidates this output.
    pub dependencies: Vec<String>,
}

impl SourceFile {
    /// `com/example/_TestServiceImpl.kt`
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.package.split('.').filter(|part| !part.is_empty()).collect();
        path.push(&self.file_name);
        path
    }

    /// Emitted Kotlin source.
    pub fn content(&self) -> String {
        self.file.emit()
    }
}

pub(crate) fn kt_file(
    model: &InterfaceModel,
    package: &str,
    imports: Vec<String>,
    classes: Vec<KtClass>,
    functions: Vec<KtFunction>,
) -> KtFile {
    let header = &model.options.custom_file_header;
    KtFile {
        file_annotations: vec![FILE_SUPPRESSIONS.to_string()],
        comment: Some(if is_blank(header) { DEFAULT_FILE_COMMENT.to_string() } else { header.clone() }),
        package: package.to_string(),
        imports,
        classes,
        functions,
    }
}

/// Files for one validated interface.
///
/// `registry` holds the factories of the current round, so two interfaces
/// asking for the same factory signature only get it once.
pub fn generate(
    model: &InterfaceModel,
    options: &ProcessorOptions,
    registry: &mut FactoryRegistry,
    step: &mut Step<'_>,
) -> Result<Vec<SourceFile>, FatalError> {
    let mut imports = ImportTable::new(&model.package_name);
    for import in model.imports.iter().filter(|import| !is_vocabulary(import)) {
        imports.add_source_import(import);
    }

    let class = class::build_class(model, &mut imports, step)?;
    let mut factories = factory::build_factories(model, registry, &mut imports, step)?;
    let actuals = if options.experimental {
        expect_actual::build_actuals(model, &mut factories, &mut imports, step)
    } else {
        expect_actual::Actuals::default()
    };

    let mut functions: Vec<KtFunction> = factories.into_iter().map(|factory| factory.function).collect();
    functions.extend(actuals.main);

    let mut dependencies = vec![model.source_file.clone()];
    for expect in &model.expect_functions {
        if let Some(source) = &expect.source_file {
            if !dependencies.contains(source) {
                dependencies.push(source.clone());
            }
        }
    }

    let main = SourceFile {
        package: model.package_name.clone(),
        file_name: format!("{}.kt", model.options.generated_name),
        file: kt_file(model, &model.package_name, imports.imports(), vec![class], functions),
        dependencies,
    };
    debug!(file = %main.relative_path().display(), "Generated implementation");
    step.step(format!("Generated {}", main.relative_path().display()));

    let mut files = vec![main];
    files.extend(actuals.files);
    Ok(files)
}
