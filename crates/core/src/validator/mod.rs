//! Ordered validator units with accumulation semantics.
//!
//! Every unit sees the same read-only [`ValidationContext`] and returns its own
//! [`ValidationResult`]. The pipeline runs all of them, each inside its own
//! diagnostic step, and drops the interface when any unit reported an error.

mod body;
mod class_level;
mod expect;
mod headers;
mod params;
mod shapes;
mod types;
mod url;

use tracing::debug;

pub use body::{BodyUsageValidator, FormUrlBodyValidator, MultipartValidator};
pub use class_level::ClassLevelValidator;
pub use expect::ExpectFunctionsValidator;
pub use headers::HeadersValidator;
pub use params::{CookieValidator, QueryValidator};
pub use shapes::{MapShape, map_shape};
pub use types::{HeadReturnNothingValidator, ReturnTypeValidator, WildcardParameterValidator};
pub use url::{PathParameterValidator, UrlSyntaxValidator};

use crate::diagnostics::{Severity, Step, messages};
use crate::error::FatalError;
use crate::model::{FunctionModel, InterfaceModel};
use crate::options::ProcessorOptions;
use crate::symbols::Visibility;

/// Shared read-only view of one interface.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Interface name without the package.
    pub class_name: &'a str,
    /// Fully qualified interface name.
    pub qualified_name: &'a str,
    /// Package of the interface.
    pub package_name: &'a str,
    /// Declared visibility of the interface.
    pub visibility: Visibility,
    /// The interface under validation.
    pub model: &'a InterfaceModel,
    /// Options of the current round.
    pub options: &'a ProcessorOptions,
}

impl<'a> ValidationContext<'a> {
    /// View over `model`.
    pub fn new(model: &'a InterfaceModel, options: &'a ProcessorOptions) -> Self {
        Self {
            class_name: &model.simple_name,
            qualified_name: &model.qualified_name,
            package_name: &model.package_name,
            visibility: model.visibility,
            model,
            options,
        }
    }

    /// Functions the generated class overrides, the only ones most units look at.
    pub fn functions(&self) -> impl Iterator<Item = &'a FunctionModel> {
        self.model.generated_functions()
    }

    /// `qualified.Name.function`, the symbol of function findings.
    pub fn function_symbol(&self, function: &FunctionModel) -> String {
        format!("{}.{}", self.qualified_name, function.name)
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Error or warning.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// Declaration the finding is about.
    pub symbol: Option<String>,
}

/// Errors and warnings of one validator unit, in the order they were found.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    findings: Vec<Finding>,
}

impl ValidationResult {
    /// Error on the interface or one of its declarations.
    pub fn error(&mut self, message: impl Into<String>, symbol: Option<String>) {
        self.push(Severity::Error, message.into(), symbol);
    }

    /// Warning on the interface or one of its declarations.
    pub fn warning(&mut self, message: impl Into<String>, symbol: Option<String>) {
        self.push(Severity::Warning, message.into(), symbol);
    }

    /// Error on a function, with its signature appended and `highlight` marked.
    pub fn function_error(
        &mut self,
        context: &ValidationContext<'_>,
        function: &FunctionModel,
        highlight: Option<&str>,
        message: impl AsRef<str>,
    ) {
        let text = Self::describe(context, function, highlight, message.as_ref());
        self.push(Severity::Error, text, Some(context.function_symbol(function)));
    }

    /// Warning on a function, formatted like `function_error`.
    pub fn function_warning(
        &mut self,
        context: &ValidationContext<'_>,
        function: &FunctionModel,
        highlight: Option<&str>,
        message: impl AsRef<str>,
    ) {
        let text = Self::describe(context, function, highlight, message.as_ref());
        self.push(Severity::Warning, text, Some(context.function_symbol(function)));
    }

    fn describe(
        context: &ValidationContext<'_>,
        function: &FunctionModel,
        highlight: Option<&str>,
        message: &str,
    ) -> String {
        format!(
            "{message}{}",
            messages::declaration(&function.signature(context.class_name, highlight))
        )
    }

    fn push(&mut self, severity: Severity, message: String, symbol: Option<String>) {
        self.findings.push(Finding {
            severity,
            message,
            symbol,
        });
    }

    /// Every finding in order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Errors found.
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
            .count()
    }

    /// Warnings found.
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count()
    }

    /// Append the findings to `step`.
    pub fn dump(&self, step: &mut Step<'_>) {
        for finding in &self.findings {
            match finding.severity {
                Severity::Error => step.error(&finding.message, finding.symbol.as_deref()),
                Severity::Warning => step.warning(&finding.message, finding.symbol.as_deref()),
                Severity::Step => step.step(&finding.message),
            }
        }
    }
}

/// One independent rule set.
pub trait ValidatorStrategy: std::fmt::Debug {
    /// Step name shown in diagnostic reports.
    fn name(&self) -> &'static str;

    /// Findings for the interface in `context`.
    fn validate(&self, context: &ValidationContext<'_>) -> ValidationResult;
}

/// The ordered validator list.
#[derive(Debug)]
pub struct ValidatorPipeline {
    validators: Vec<Box<dyn ValidatorStrategy>>,
}

impl Default for ValidatorPipeline {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ClassLevelValidator),
            Box::new(ExpectFunctionsValidator),
            Box::new(WildcardParameterValidator),
            Box::new(ReturnTypeValidator),
            Box::new(PathParameterValidator),
            Box::new(QueryValidator),
            Box::new(UrlSyntaxValidator),
            Box::new(HeadReturnNothingValidator),
            Box::new(HeadersValidator),
            Box::new(BodyUsageValidator),
            Box::new(FormUrlBodyValidator),
            Box::new(MultipartValidator),
            Box::new(CookieValidator),
        ])
    }
}

impl ValidatorPipeline {
    /// Pipeline running `validators` in order.
    pub fn new(validators: Vec<Box<dyn ValidatorStrategy>>) -> Self {
        Self { validators }
    }

    /// Unit names in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|validator| validator.name()).collect()
    }

    /// Run every unit and hand the model back when none of them reported an error.
    ///
    /// Only an empty pipeline is fatal, user problems never are.
    pub fn validate(
        &self,
        model: InterfaceModel,
        options: &ProcessorOptions,
        step: &mut Step<'_>,
    ) -> Result<Option<InterfaceModel>, FatalError> {
        if self.validators.is_empty() {
            return Err(FatalError::implementation("ValidatorPipeline must have at least one validator"));
        }
        let context = ValidationContext::new(&model, options);
        let mut errors = 0;
        for validator in &self.validators {
            errors += step.task(validator.name(), |task| {
                let result = validator.validate(&context);
                result.dump(task);
                Ok(result.error_count())
            })?;
        }
        debug!(interface = %model.qualified_name, errors, "Validation finished");
        Ok((errors == 0).then_some(model))
    }
}
