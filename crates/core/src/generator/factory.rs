//! Factory functions constructing the implementation class.
//!
//! Up to three per interface:
//! - top-level: `fun TestService(httpClient: HttpClient): TestService`
//! - companion extension: `fun TestService.Companion.create(httpClient: HttpClient): TestService`
//! - client extension: `fun HttpClient.createTestService(): TestService`
//!
//! Every emitted factory is registered by name, package and parameter types.
//! A second factory with the same key in the same round is skipped with a warning.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use super::class::{ConstructorParam, constructor_params};
use super::{ktor, propagation};
use crate::diagnostics::Step;
use crate::error::FatalError;
use crate::kotlin::{ImportTable, KtFunction, KtParam, KtStmt};
use crate::model::InterfaceModel;
use crate::model::types::HTTP_CLIENT;

/// Identity of a generated top-level function.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactoryKey {
    /// Function name.
    pub name: String,
    /// Package of the generated file.
    pub package: String,
    /// Receiver first when there is one, qualified.
    pub parameter_types: Vec<String>,
}

impl fmt::Display for FactoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.package, self.name, self.parameter_types.join(", "))
    }
}

/// Factories emitted during the current round.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
    keys: BTreeSet<FactoryKey>,
}

impl FactoryRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`, false when it was already taken.
    pub fn register(&mut self, key: FactoryKey) -> bool {
        self.keys.insert(key)
    }

    /// `key` was registered this round.
    pub fn contains(&self, key: &FactoryKey) -> bool {
        self.keys.contains(key)
    }

    /// Registered factories.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Nothing registered yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    TopLevel,
    Companion,
    HttpClient,
}

impl FactoryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::TopLevel => "top-level factory function",
            Self::Companion => "companion extension function",
            Self::HttpClient => "HttpClient extension function",
        }
    }
}

/// A factory kept for the output file.
#[derive(Debug, Clone)]
pub struct Factory {
    pub kind: FactoryKind,
    pub key: FactoryKey,
    pub function: KtFunction,
}

/// Factory parameter names: the constructor names without leading underscores,
/// unless that would give two parameters the same name.
pub fn factory_param_names(params: &[&ConstructorParam]) -> Vec<String> {
    let trimmed: Vec<&str> = params.iter().map(|param| param.name.trim_start_matches('_')).collect();
    params
        .iter()
        .zip(&trimmed)
        .enumerate()
        .map(|(index, (param, short))| {
            let clashes = params.iter().zip(&trimmed).enumerate().any(|(other, (sibling, sibling_short))| {
                other != index && (sibling.name == *short || sibling_short == short)
            });
            if short.is_empty() || clashes {
                param.name.clone()
            } else {
                (*short).to_string()
            }
        })
        .collect()
}

/// `Impl(a, b)` from already rendered arguments.
pub fn constructor_call(model: &InterfaceModel, arguments: &[String]) -> KtStmt {
    KtStmt::Return(Some(format!("{}({})", model.options.generated_name, arguments.join(", "))))
}

/// Annotations shared by factories and `actual` functions.
pub fn factory_annotations(model: &InterfaceModel, imports: &mut ImportTable) -> Vec<String> {
    let options = &model.options;
    let mut annotations = vec![format!("@{}", imports.name(ktor::GENERATED))];
    annotations.extend(propagation::markers(&options.function_annotations, imports));
    annotations.extend(propagation::opt_in(&options.opt_in_annotations, imports));
    annotations
}

struct Builder<'a> {
    model: &'a InterfaceModel,
    params: Vec<ConstructorParam>,
    interface: String,
}

impl Builder<'_> {
    fn function(
        &self,
        imports: &mut ImportTable,
        name: &str,
        receiver: Option<String>,
        params: &[(&ConstructorParam, &str)],
        arguments: Vec<String>,
    ) -> KtFunction {
        KtFunction {
            doc: None,
            annotations: factory_annotations(self.model, imports),
            modifiers: vec![self.model.options.function_visibility.clone()],
            receiver,
            name: name.to_string(),
            params: params
                .iter()
                .map(|(param, name)| KtParam::new(*name, imports.type_name(&param.type_ref)))
                .collect(),
            return_type: Some(self.interface.clone()),
            body: vec![constructor_call(self.model, &arguments)],
        }
    }

    fn key(&self, name: &str, receiver: Option<String>, params: &[(&ConstructorParam, &str)]) -> FactoryKey {
        FactoryKey {
            name: name.to_string(),
            package: self.model.package_name.clone(),
            parameter_types: receiver
                .into_iter()
                .chain(params.iter().map(|(param, _)| param.type_ref.to_string()))
                .collect(),
        }
    }
}

/// The enabled factories of `model` that are not registered yet.
pub fn build_factories(
    model: &InterfaceModel,
    registry: &mut FactoryRegistry,
    imports: &mut ImportTable,
    step: &mut Step<'_>,
) -> Result<Vec<Factory>, FatalError> {
    let options = &model.options;
    let builder = Builder {
        model,
        params: constructor_params(model),
        interface: imports.name(&model.qualified_name),
    };
    let params: Vec<&ConstructorParam> = builder.params.iter().collect();
    let names = factory_param_names(&params);
    let all: Vec<(&ConstructorParam, &str)> = params.iter().copied().zip(names.iter().map(String::as_str)).collect();
    let all_arguments = names.clone();

    let mut candidates = Vec::new();
    if let Some(name) = &options.top_level_factory {
        candidates.push((
            FactoryKind::TopLevel,
            builder.key(name, None, &all),
            builder.function(imports, name, None, &all, all_arguments.clone()),
        ));
    }
    if let Some(name) = &options.companion_factory {
        let Some(companion) = &model.companion else {
            return Err(FatalError::implementation(format!(
                "companion factory requested for {} without a companion object",
                model.qualified_name
            )));
        };
        let receiver = format!("{}.{}", builder.interface, companion.name);
        let qualified_receiver = format!("{}.{}", model.qualified_name, companion.name);
        candidates.push((
            FactoryKind::Companion,
            builder.key(name, Some(qualified_receiver), &all),
            builder.function(imports, name, Some(receiver), &all, all_arguments.clone()),
        ));
    }
    if let Some(name) = &options.http_client_factory {
        let rest = &all[1..];
        let mut arguments = vec!["this".to_string()];
        arguments.extend(rest.iter().map(|(_, name)| (*name).to_string()));
        let receiver = imports.name(HTTP_CLIENT);
        candidates.push((
            FactoryKind::HttpClient,
            builder.key(name, Some(HTTP_CLIENT.to_string()), rest),
            builder.function(imports, name, Some(receiver), rest, arguments),
        ));
    }

    let mut out = Vec::new();
    for (kind, key, function) in candidates {
        if !registry.register(key.clone()) {
            step.warning(format!("Duplicate {} detected: {key}", kind.label()), Some(&model.qualified_name));
            continue;
        }
        debug!(factory = %key, kind = kind.label(), "Registered factory");
        out.push(Factory { kind, key, function });
    }
    Ok(out)
}
