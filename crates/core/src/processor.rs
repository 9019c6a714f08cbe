//! Round driver: extraction, validation and generation for every candidate.
//!
//! One [`KtorGenProcessor`] lives across the rounds of a build. Each round:
//! 1. starts an empty factory registry
//! 2. walks the candidates of the round plus the declarations deferred earlier
//! 3. extracts, validates and generates each interface in its own step, so an
//!    invalid interface only drops itself
//! 4. flushes the diagnostics to the sink, before a fatal error propagates too
//!
//! Declarations with unresolved types are kept and retried in the next round,
//! at most `max_deferred_rounds` times.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::annotations::read_kmp_function;
use crate::diagnostics::{DiagnosticLog, DiagnosticSink, Step, messages};
use crate::error::FatalError;
use crate::extractor::{Extraction, extract_interface, is_candidate};
use crate::generator::{FactoryRegistry, SourceFile, generate};
use crate::model::InterfaceModel;
use crate::options::ProcessorOptions;
use crate::symbols::{ClassDeclaration, FunctionDeclaration, SymbolTable};
use crate::validator::ValidatorPipeline;

/// What one round produced.
#[derive(Debug, Default)]
pub struct RoundOutput {
    /// Generated files in processing order.
    pub files: Vec<SourceFile>,
    /// Interfaces that passed validation, in processing order.
    pub valid: Vec<String>,
    /// Interfaces dropped because of errors.
    pub dropped: Vec<String>,
    /// Interfaces waiting for unresolved types.
    pub deferred: Vec<String>,
    /// Interfaces with `KtorGen(generate = false)`.
    pub skipped: Vec<String>,
    /// Errors reported this round.
    pub errors: usize,
    /// Warnings reported this round.
    pub warnings: usize,
}

impl RoundOutput {
    /// At least one error was reported.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

#[derive(Debug, Clone)]
struct Deferred {
    class: ClassDeclaration,
    rounds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Generate,
    Check,
}

/// Round driver, keeps deferred declarations between rounds.
#[derive(Debug)]
pub struct KtorGenProcessor {
    options: ProcessorOptions,
    pipeline: ValidatorPipeline,
    deferred: BTreeMap<String, Deferred>,
    round: u32,
}

impl KtorGenProcessor {
    /// Processor with the default validators.
    pub fn new(options: ProcessorOptions) -> Self {
        Self::with_pipeline(options, ValidatorPipeline::default())
    }

    /// Processor with a custom validator pipeline.
    pub fn with_pipeline(options: ProcessorOptions, pipeline: ValidatorPipeline) -> Self {
        Self {
            options,
            pipeline,
            deferred: BTreeMap::new(),
            round: 0,
        }
    }

    /// Options in effect.
    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Qualified names still waiting for a later round.
    pub fn pending(&self) -> Vec<String> {
        self.deferred.keys().cloned().collect()
    }

    /// Run one round and generate every valid interface.
    pub fn process(&mut self, symbols: &SymbolTable, sink: &mut dyn DiagnosticSink) -> Result<RoundOutput, FatalError> {
        self.round_with(symbols, sink, Mode::Generate)
    }

    /// Run one round without generating: extraction and validation only.
    pub fn check(&mut self, symbols: &SymbolTable, sink: &mut dyn DiagnosticSink) -> Result<RoundOutput, FatalError> {
        self.round_with(symbols, sink, Mode::Check)
    }

    /// Last round of the build: anything still deferred can no longer resolve.
    pub fn finish(&mut self, sink: &mut dyn DiagnosticSink) -> Result<(), FatalError> {
        if self.deferred.is_empty() {
            return Ok(());
        }
        let mut log = DiagnosticLog::new("KtorGen finish");
        let names = self.pending().join(", ");
        self.deferred.clear();
        let err = log.root().die(format!("{}{names}", messages::UNRESOLVED_SYMBOLS), None);
        log.flush(sink, self.options.check_level);
        sink.fatal(&err, self.options.print_stacktrace);
        Err(err)
    }

    /// Extracted models of a symbol table, unvalidated.
    pub fn inspect(&self, symbols: &SymbolTable, sink: &mut dyn DiagnosticSink) -> Result<Vec<InterfaceModel>, FatalError> {
        let mut log = DiagnosticLog::new("KtorGen inspect");
        let result = {
            let mut root = log.root();
            let mut models = Vec::new();
            let mut outcome = Ok(());
            for class in symbols.classes.iter().filter(|class| is_candidate(class)) {
                let expects = expect_functions(symbols, &class.qualified_name);
                match root.task(&format!("Extract {}", class.qualified_name), |step| {
                    extract_interface(class, &expects, step)
                }) {
                    Ok(extraction) => models.extend(extraction.ready()),
                    Err(err) => {
                        outcome = Err(err);
                        break;
                    }
                }
            }
            outcome.map(|()| models)
        };
        self.close_log(log, sink, result)
    }

    fn round_with(
        &mut self,
        symbols: &SymbolTable,
        sink: &mut dyn DiagnosticSink,
        mode: Mode,
    ) -> Result<RoundOutput, FatalError> {
        self.round += 1;
        let mut registry = FactoryRegistry::new();
        let mut log = DiagnosticLog::new(format!("KtorGen round {}", self.round));
        let result = self.run(symbols, &mut registry, &mut log.root(), mode);

        let errors = log.error_count();
        let warnings = log.warning_count();
        let result = result.map(|mut output| {
            output.errors = errors;
            output.warnings = warnings;
            output
        });
        let output = self.close_log(log, sink, result)?;
        info!(
            round = self.round,
            files = output.files.len(),
            valid = output.valid.len(),
            dropped = output.dropped.len(),
            deferred = output.deferred.len(),
            errors,
            warnings,
            "KtorGen round finished"
        );
        Ok(output)
    }

    /// Close the log and flush it, whatever the outcome was.
    fn close_log<T>(
        &self,
        mut log: DiagnosticLog,
        sink: &mut dyn DiagnosticSink,
        result: Result<T, FatalError>,
    ) -> Result<T, FatalError> {
        let result = match (result, log.finish()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(closing)) => Err(closing),
            (Err(original), Ok(())) => Err(original),
            (Err(original), Err(closing)) => Err(original.suppress(closing)),
        };
        debug!("\n{}", log.tree_report());
        log.flush(sink, self.options.check_level);
        if let Err(err) = &result {
            sink.fatal(err, self.options.print_stacktrace);
        }
        result
    }

    fn run(
        &mut self,
        symbols: &SymbolTable,
        registry: &mut FactoryRegistry,
        root: &mut Step<'_>,
        mode: Mode,
    ) -> Result<RoundOutput, FatalError> {
        let mut output = RoundOutput::default();

        let mut candidates: Vec<(ClassDeclaration, u32)> = Vec::new();
        for class in symbols.classes.iter().filter(|class| is_candidate(class)) {
            let rounds = self.deferred.remove(&class.qualified_name).map_or(0, |deferred| deferred.rounds);
            candidates.push((class.clone(), rounds));
        }
        for (_, deferred) in std::mem::take(&mut self.deferred) {
            candidates.push((deferred.class, deferred.rounds));
        }

        for (class, rounds) in candidates {
            let name = class.qualified_name.clone();
            let expects = expect_functions(symbols, &name);
            let options = &self.options;
            let pipeline = &self.pipeline;
            let deferred = &mut self.deferred;
            let registry = &mut *registry;
            let output = &mut output;
            root.task(&format!("Interface {name}"), |step| {
                let model = match extract_interface(&class, &expects, step)? {
                    Extraction::Ready(model) => model,
                    Extraction::Deferred(unresolved) => {
                        let rounds = rounds + 1;
                        if rounds > options.max_deferred_rounds {
                            return Err(step.die(
                                format!("{}{}", messages::UNRESOLVED_SYMBOLS, unresolved.join(", ")),
                                Some(&name),
                            ));
                        }
                        debug!(interface = %name, rounds, "Retrying in the next round");
                        deferred.insert(name.clone(), Deferred { class: class.clone(), rounds });
                        output.deferred.push(name.clone());
                        return Ok(());
                    }
                    Extraction::Rejected => {
                        output.dropped.push(name.clone());
                        return Ok(());
                    }
                    Extraction::Skipped => {
                        output.skipped.push(name.clone());
                        return Ok(());
                    }
                };

                let Some(model) = pipeline.validate(model, options, step)? else {
                    warn!(interface = %name, "Interface has errors, nothing is generated for it");
                    output.dropped.push(name.clone());
                    return Ok(());
                };
                output.valid.push(name.clone());
                if mode == Mode::Generate {
                    output.files.extend(generate(&model, options, registry, step)?);
                }
                Ok(())
            })?;
        }
        Ok(output)
    }
}

/// Top-level `@KtorGenFunctionKmp` functions returning `interface`.
fn expect_functions<'a>(symbols: &'a SymbolTable, interface: &str) -> Vec<&'a FunctionDeclaration> {
    symbols
        .functions
        .iter()
        .filter(|function| read_kmp_function(&function.annotations).is_some())
        .filter(|function| function.return_type.as_ref().is_some_and(|return_type| return_type.is(interface)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::CollectingSink;

    fn table(value: serde_json::Value) -> SymbolTable {
        serde_json::from_value(value).unwrap()
    }

    fn service(name: &str, return_type: serde_json::Value) -> serde_json::Value {
        json!({
            "qualifiedName": format!("com.example.{name}"),
            "file": { "path": format!("src/{name}.kt") },
            "functions": [{
                "name": "posts",
                "modifiers": ["suspend", "abstract"],
                "annotations": [{ "qualifiedName": "io.github.kingg22.ktorgen.http.GET", "arguments": { "value": "posts" } }],
                "returnType": return_type
            }]
        })
    }

    #[test]
    fn test_deferred_then_resolved() {
        let mut processor = KtorGenProcessor::new(ProcessorOptions::default());
        let mut sink = CollectingSink::default();
        let unresolved = json!({ "qualifiedName": "com.example.Post", "resolved": false });
        let first = processor
            .process(&table(json!({ "classes": [service("Api", unresolved)] })), &mut sink)
            .unwrap();
        assert_eq!(first.deferred, vec!["com.example.Api"]);
        assert!(first.files.is_empty());
        assert_eq!(processor.pending(), vec!["com.example.Api"]);

        let resolved = json!({ "qualifiedName": "com.example.Post" });
        let second = processor
            .process(&table(json!({ "classes": [service("Api", resolved)] })), &mut sink)
            .unwrap();
        assert_eq!(second.valid, vec!["com.example.Api"]);
        assert_eq!(second.files.len(), 1);
        assert!(processor.pending().is_empty());
        processor.finish(&mut sink).unwrap();
    }

    #[test]
    fn test_deferral_is_bounded() {
        let options = ProcessorOptions {
            max_deferred_rounds: 1,
            ..ProcessorOptions::default()
        };
        let mut processor = KtorGenProcessor::new(options);
        let mut sink = CollectingSink::default();
        let unresolved = json!({ "qualifiedName": "com.example.Post", "resolved": false });
        let symbols = table(json!({ "classes": [service("Api", unresolved)] }));
        processor.process(&symbols, &mut sink).unwrap();
        let err = processor.process(&SymbolTable::default(), &mut sink).unwrap_err();
        assert!(err.to_string().contains("Symbols could not be resolved: com.example.Post"));
        assert_eq!(sink.fatal.len(), 1);
        assert!(sink.has_error_containing("Symbols could not be resolved"));
    }

    #[test]
    fn test_finish_fails_on_pending() {
        let mut processor = KtorGenProcessor::new(ProcessorOptions::default());
        let mut sink = CollectingSink::default();
        let unresolved = json!({ "qualifiedName": "com.example.Post", "resolved": false });
        processor
            .process(&table(json!({ "classes": [service("Api", unresolved)] })), &mut sink)
            .unwrap();
        let err = processor.finish(&mut sink).unwrap_err();
        assert!(err.to_string().contains("com.example.Api"));
    }

    #[test]
    fn test_check_mode_generates_nothing() {
        let mut processor = KtorGenProcessor::new(ProcessorOptions::default());
        let mut sink = CollectingSink::default();
        let symbols = table(json!({ "classes": [service("Api", json!({ "qualifiedName": "kotlin.String" }))] }));
        let output = processor.check(&symbols, &mut sink).unwrap();
        assert_eq!(output.valid, vec!["com.example.Api"]);
        assert!(output.files.is_empty());
    }

    #[test]
    fn test_inspect_returns_models() {
        let processor = KtorGenProcessor::new(ProcessorOptions::default());
        let mut sink = CollectingSink::default();
        let symbols = table(json!({ "classes": [service("Api", json!({ "qualifiedName": "kotlin.String" }))] }));
        let models = processor.inspect(&symbols, &mut sink).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].options.generated_name, "_ApiImpl");
    }
}
