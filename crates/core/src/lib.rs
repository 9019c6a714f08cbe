//! KtorGen code generator core.
//!
//! Turns host declarations of annotated Kotlin interfaces into Ktor client
//! implementations. The pipeline, leaves first:
//! - `annotations`: the closed annotation vocabulary and its typed reader
//! - `extractor`: declarations to `InterfaceModel` / `FunctionModel` / `ParameterModel`
//! - `validator`: ordered validator units with accumulation semantics
//! - `generator`: Kotlin IR synthesis (class, request bodies, factories)
//! - `diagnostics`: hierarchical steps, timing and the round-fatal `die`
//!
//! `KtorGenProcessor` drives one discovery round at a time.

pub mod annotations;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod kotlin;
pub mod model;
pub mod options;
pub mod processor;
pub mod symbols;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use error::{ConfigError, FatalError, SymbolError};
pub use generator::SourceFile;
pub use model::{FunctionModel, InterfaceModel, ParameterModel};
pub use options::{CheckLevel, ProcessorOptions};
pub use processor::{KtorGenProcessor, RoundOutput};
pub use symbols::SymbolTable;
