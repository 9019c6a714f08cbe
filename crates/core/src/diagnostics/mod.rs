//! Hierarchical diagnostics with timing.
//!
//! A [`DiagnosticLog`] is a tree of steps (root, phases, tasks). Every message is
//! appended to one chronological list and attached to the step that was current
//! when it was raised. Steps are opened with [`Step::task`], which closes the step
//! on every exit path, and [`Step::die`] closes every open step before handing
//! back the round-fatal error.

pub mod messages;
mod report;
pub mod sink;

use std::time::{Duration, Instant};

use serde::Serialize;

pub use sink::{CollectingSink, DiagnosticSink, TracingSink};

use crate::error::FatalError;
use crate::options::CheckLevel;

/// Weight of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Informational progress.
    Step,
    /// Reported, the round still succeeds.
    Warning,
    /// Reported, the round fails.
    Error,
}

impl Severity {
    /// Upper-case label printed before the message.
    pub fn label(self) -> &'static str {
        match self {
            Self::Step => "STEP",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// One message raised inside a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Weight of the message.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// Qualified name of the declaration the message is about.
    pub symbol: Option<String>,
    /// Step names from the root to the step that raised the message.
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepStatus {
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Message(usize),
    Child(usize),
}

#[derive(Debug)]
struct StepNode {
    name: String,
    parent: Option<usize>,
    entries: Vec<Entry>,
    started: Instant,
    elapsed: Option<Duration>,
    status: StepStatus,
}

/// One processing run: the step tree and the chronological message list.
#[derive(Debug)]
pub struct DiagnosticLog {
    nodes: Vec<StepNode>,
    records: Vec<Diagnostic>,
}

const ROOT: usize = 0;

impl DiagnosticLog {
    /// Start a log whose root step is already running.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![StepNode {
                name: name.into(),
                parent: None,
                entries: Vec::new(),
                started: Instant::now(),
                elapsed: None,
                status: StepStatus::InProgress,
            }],
            records: Vec::new(),
        }
    }

    /// Handle on the root step.
    pub fn root(&mut self) -> Step<'_> {
        Step { log: self, id: ROOT }
    }

    /// Every record, in raising order.
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Errors in the whole log.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Warnings in the whole log.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.records
            .iter()
            .filter(|record| record.severity == severity)
            .count()
    }

    /// Close the root step. Fails when a child step was left open.
    pub fn finish(&mut self) -> Result<(), FatalError> {
        if self.nodes[ROOT].status == StepStatus::InProgress {
            self.close(ROOT, StepStatus::Completed)
        } else {
            Ok(())
        }
    }

    /// The root step is closed.
    pub fn is_finished(&self) -> bool {
        self.nodes[ROOT].status != StepStatus::InProgress
    }

    /// Forward every record to `sink`, applying the strictness level to errors.
    pub fn flush(&self, sink: &mut dyn DiagnosticSink, check_level: CheckLevel) {
        for record in &self.records {
            match (record.severity, check_level) {
                (Severity::Error, CheckLevel::Off) => {}
                (Severity::Error, CheckLevel::Warnings) => {
                    let demoted = Diagnostic {
                        severity: Severity::Warning,
                        ..record.clone()
                    };
                    sink.report(&demoted);
                }
                _ => sink.report(record),
            }
        }
    }

    fn open(&mut self, parent: usize, name: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(StepNode {
            name: name.to_string(),
            parent: Some(parent),
            entries: Vec::new(),
            started: Instant::now(),
            elapsed: None,
            status: StepStatus::InProgress,
        });
        self.nodes[parent].entries.push(Entry::Child(id));
        id
    }

    fn close(&mut self, id: usize, status: StepStatus) -> Result<(), FatalError> {
        let node = &self.nodes[id];
        if node.status != StepStatus::InProgress {
            // Steps already closed by `die` are closed again while unwinding.
            return if status == StepStatus::Failed {
                Ok(())
            } else {
                Err(FatalError::implementation(format!(
                    "Step '{}' already finished",
                    node.name
                )))
            };
        }
        let open_children = node
            .entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Child(child) if self.nodes[*child].status == StepStatus::InProgress))
            .count();
        let name = node.name.clone();
        let node = &mut self.nodes[id];
        node.elapsed = Some(node.started.elapsed());
        node.status = status;
        if open_children > 0 {
            return Err(FatalError::implementation(format!(
                "Step '{name}' finished with {open_children} child step(s) still in progress"
            )));
        }
        Ok(())
    }

    /// Close every open step, deepest first.
    fn close_open_steps(&mut self) {
        for id in (0..self.nodes.len()).rev() {
            let node = &mut self.nodes[id];
            if node.status == StepStatus::InProgress {
                node.elapsed = Some(node.started.elapsed());
                node.status = StepStatus::Failed;
            }
        }
    }

    fn push(&mut self, step: usize, severity: Severity, message: &str, symbol: Option<&str>) {
        let index = self.records.len();
        self.records.push(Diagnostic {
            severity,
            message: message.trim().to_string(),
            symbol: symbol.map(str::to_string),
            path: self.path_of(step),
        });
        self.nodes[step].entries.push(Entry::Message(index));
    }

    fn path_of(&self, step: usize) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(step);
        while let Some(id) = current {
            path.push(self.nodes[id].name.clone());
            current = self.nodes[id].parent;
        }
        path.reverse();
        path
    }

    fn subtree_count(&self, step: usize, severity: Severity) -> usize {
        self.nodes[step]
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Message(index) => usize::from(self.records[*index].severity == severity),
                Entry::Child(child) => self.subtree_count(*child, severity),
            })
            .sum()
    }
}

/// Handle on the current step of a [`DiagnosticLog`].
#[derive(Debug)]
pub struct Step<'a> {
    log: &'a mut DiagnosticLog,
    id: usize,
}

impl Step<'_> {
    /// Step name.
    pub fn name(&self) -> &str {
        &self.log.nodes[self.id].name
    }

    /// Run `work` inside a child step that is closed however `work` returns.
    ///
    /// When closing fails after `work` already failed, the closing failure is
    /// attached to the original error as suppressed.
    pub fn task<T>(
        &mut self,
        name: &str,
        work: impl FnOnce(&mut Step<'_>) -> Result<T, FatalError>,
    ) -> Result<T, FatalError> {
        let id = self.log.open(self.id, name);
        let result = {
            let mut child = Step {
                log: &mut *self.log,
                id,
            };
            work(&mut child)
        };
        let status = if result.is_ok() {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        };
        match (result, self.log.close(id, status)) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(closing)) => Err(closing),
            (Err(original), Ok(())) => Err(original),
            (Err(original), Err(closing)) => Err(original.suppress(closing)),
        }
    }

    /// Informational record.
    pub fn step(&mut self, message: impl AsRef<str>) {
        self.log.push(self.id, Severity::Step, message.as_ref(), None);
    }

    /// Warning record.
    pub fn warning(&mut self, message: impl AsRef<str>, symbol: Option<&str>) {
        self.log.push(self.id, Severity::Warning, message.as_ref(), symbol);
    }

    /// Error record; the step itself keeps running.
    pub fn error(&mut self, message: impl AsRef<str>, symbol: Option<&str>) {
        self.log.push(self.id, Severity::Error, message.as_ref(), symbol);
    }

    /// Record `message` as an error, close every open step and return the fatal error to propagate.
    pub fn die(&mut self, message: impl AsRef<str>, symbol: Option<&str>) -> FatalError {
        let message = message.as_ref();
        self.log.push(self.id, Severity::Error, message, symbol);
        self.log.close_open_steps();
        FatalError::die(message.trim(), symbol.map(str::to_string))
    }

    /// Errors raised in this step and its descendants.
    pub fn error_count(&self) -> usize {
        self.log.subtree_count(self.id, Severity::Error)
    }

    /// Warnings raised in this step and its descendants.
    pub fn warning_count(&self) -> usize {
        self.log.subtree_count(self.id, Severity::Warning)
    }

    /// At least one error in this subtree.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
