//! Text reports over a [`DiagnosticLog`].

use std::fmt::Write as _;
use std::time::Duration;

use super::{DiagnosticLog, Entry, ROOT, Severity, StepStatus};

fn format_duration(elapsed: Option<Duration>) -> String {
    elapsed.map_or_else(
        || "--".to_string(),
        |elapsed| format!("{:.3} ms", elapsed.as_secs_f64() * 1000.0),
    )
}

impl DiagnosticLog {
    fn label(&self, id: usize) -> &'static str {
        match self.depth(id) {
            0 => "Processor",
            1 => "Phase",
            _ => "Task",
        }
    }

    fn depth(&self, id: usize) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent].parent;
        }
        depth
    }

    fn icon(&self, id: usize) -> &'static str {
        match self.nodes[id].status {
            StepStatus::InProgress => "…",
            StepStatus::Failed => "✖",
            StepStatus::Completed if self.subtree_count(id, Severity::Error) > 0 => "✖",
            StepStatus::Completed => "✔",
        }
    }

    /// Full tree of steps and messages with durations.
    pub fn tree_report(&self) -> String {
        let root = &self.nodes[ROOT];
        let mut out = format!(
            "┌─ {} {}: {} ({})\n",
            self.icon(ROOT),
            self.label(ROOT),
            root.name,
            format_duration(root.elapsed)
        );
        self.write_entries(&mut out, ROOT, 0);
        let _ = writeln!(
            out,
            "└─ Summary: {} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        );
        out
    }

    fn write_entries(&self, out: &mut String, id: usize, depth: usize) {
        let indent = "┃   ".repeat(depth);
        for entry in &self.nodes[id].entries {
            match entry {
                Entry::Message(index) => {
                    let record = &self.records[*index];
                    let _ = write!(out, "{indent}┣─ {}: {}", record.severity.label(), record.message);
                    if let Some(symbol) = &record.symbol {
                        let _ = write!(out, " (at {symbol})");
                    }
                    out.push('\n');
                }
                Entry::Child(child) => {
                    let node = &self.nodes[*child];
                    let _ = writeln!(
                        out,
                        "{indent}┣─ {} {}: {} ({})",
                        self.icon(*child),
                        self.label(*child),
                        node.name,
                        format_duration(node.elapsed)
                    );
                    self.write_entries(out, *child, depth + 1);
                }
            }
        }
    }

    /// Renders a report containing only errors.
    pub fn errors_report(&self) -> String {
        self.filtered_report("Errors", &[Severity::Error])
    }

    /// Renders a report containing only warnings.
    pub fn warnings_report(&self) -> String {
        self.filtered_report("Warnings", &[Severity::Warning])
    }

    /// Renders a report containing errors and warnings.
    pub fn problems_report(&self) -> String {
        self.filtered_report("Errors and warnings", &[Severity::Error, Severity::Warning])
    }

    fn filtered_report(&self, title: &str, severities: &[Severity]) -> String {
        let mut out = format!("{title} found during \"{}\" execution:\n", self.nodes[ROOT].name);
        self.write_filtered(&mut out, ROOT, 0, severities);
        out
    }

    fn contains(&self, id: usize, severities: &[Severity]) -> bool {
        severities
            .iter()
            .any(|severity| self.subtree_count(id, *severity) > 0)
    }

    fn write_filtered(&self, out: &mut String, id: usize, level: usize, severities: &[Severity]) {
        if !self.contains(id, severities) {
            return;
        }
        let indent = "  ".repeat(level);
        let node = &self.nodes[id];
        let _ = writeln!(out, "{indent}{} {} ({})", self.icon(id), node.name, format_duration(node.elapsed));
        for entry in &node.entries {
            match entry {
                Entry::Message(index) => {
                    let record = &self.records[*index];
                    if severities.contains(&record.severity) {
                        let _ = writeln!(out, "{indent}  {}: {}", record.severity.label(), record.message);
                        if let Some(symbol) = &record.symbol {
                            let _ = writeln!(out, "{indent}    -> at {symbol}");
                        }
                    }
                }
                Entry::Child(child) => self.write_filtered(out, *child, level + 1, severities),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::super::DiagnosticLog;

    fn sample() -> DiagnosticLog {
        let mut log = DiagnosticLog::new("KtorGen");
        log.root()
            .task("Validation", |phase| {
                phase.task("com.example.Api", |task| {
                    task.step("Class Level");
                    task.error("Only one HTTP method is allowed.", Some("com.example.Api.get"));
                    task.warning("vararg parameters are experimental", None);
                    Ok(())
                })
            })
            .unwrap();
        log.finish().unwrap();
        log
    }

    #[test]
    fn test_tree_report_shape() {
        let report = sample().tree_report();
        assert!(report.starts_with("┌─ ✖ Processor: KtorGen ("), "{report}");
        assert!(report.contains("┣─ ✖ Phase: Validation"), "{report}");
        assert!(report.contains("┃   ┣─ ✖ Task: com.example.Api"), "{report}");
        assert!(report.contains("┃   ┃   ┣─ STEP: Class Level"), "{report}");
        assert!(report.contains("(at com.example.Api.get)"), "{report}");
        assert!(report.trim_end().ends_with("└─ Summary: 1 error(s), 1 warning(s)"), "{report}");
    }

    #[test]
    fn test_filtered_reports() {
        let log = sample();
        let errors = log.errors_report();
        assert!(errors.starts_with("Errors found during \"KtorGen\" execution:"));
        assert!(errors.contains("ERROR: Only one HTTP method is allowed."));
        assert!(!errors.contains("WARNING"));
        let warnings = log.warnings_report();
        assert!(warnings.contains("WARNING: vararg parameters are experimental"));
        assert!(!warnings.contains("ERROR"));
        assert!(log.problems_report().contains("-> at com.example.Api.get"));
    }

    #[test]
    fn test_clean_log_has_no_entries() {
        let mut log = DiagnosticLog::new("KtorGen");
        log.finish().unwrap();
        assert_eq!(log.errors_report(), "Errors found during \"KtorGen\" execution:\n");
    }
}
