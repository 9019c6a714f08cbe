//! Outbound diagnostics: where flushed messages go.

use tracing::{debug, error, warn};

use super::{Diagnostic, Severity};
use crate::error::FatalError;

const PREFIX: &str = "[KtorGen]:";

/// Receiver of flushed diagnostics and of the final round-fatal signal.
pub trait DiagnosticSink {
    /// Called for every record, in raising order.
    fn report(&mut self, diagnostic: &Diagnostic);

    /// Called once when a round aborts. `print_causes` asks for the full cause chain.
    fn fatal(&mut self, error: &FatalError, print_causes: bool);
}

/// Forwards diagnostics as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        let symbol = diagnostic.symbol.as_deref().unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => error!(symbol, "{PREFIX} {}", diagnostic.message),
            Severity::Warning => warn!(symbol, "{PREFIX} {}", diagnostic.message),
            Severity::Step => debug!(symbol, "{PREFIX} {}", diagnostic.message),
        }
    }

    fn fatal(&mut self, err: &FatalError, print_causes: bool) {
        let text = if print_causes {
            err.full_report()
        } else {
            err.to_string()
        };
        error!(symbol = err.symbol().unwrap_or_default(), "{PREFIX} {text}");
    }
}

/// Keeps everything in memory, used by tests and the `check` command.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    /// Every record, in report order.
    pub diagnostics: Vec<Diagnostic>,
    /// Fatal error reports.
    pub fatal: Vec<String>,
}

impl CollectingSink {
    /// Error records.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.of(Severity::Error)
    }

    /// Warning records.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.of(Severity::Warning)
    }

    fn of(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.severity == severity)
    }

    /// True when some error message contains `needle`.
    pub fn has_error_containing(&self, needle: &str) -> bool {
        self.errors().any(|diagnostic| diagnostic.message.contains(needle))
    }

    /// True when some warning message contains `needle`.
    pub fn has_warning_containing(&self, needle: &str) -> bool {
        self.warnings().any(|diagnostic| diagnostic.message.contains(needle))
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }

    fn fatal(&mut self, err: &FatalError, print_causes: bool) {
        self.fatal.push(if print_causes {
            err.full_report()
        } else {
            err.to_string()
        });
    }
}
