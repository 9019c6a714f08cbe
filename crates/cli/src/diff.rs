//! Unified diffs between generated sources and what is already on disk.

use std::fs;
use std::path::Path;

use console::style;
use ktorgen_core::SourceFile;
use similar::{ChangeTag, TextDiff};

/// A generated file compared with its counterpart under the output directory.
#[derive(Debug)]
pub struct FileDrift {
    /// Path relative to the output directory.
    pub rel_path: String,
    /// Freshly generated content.
    pub generated: String,
    /// Content on disk, `None` when the file does not exist yet.
    pub current: Option<String>,
}

impl FileDrift {
    /// Reads the on-disk counterpart of `file`.
    pub fn compare(out_dir: &Path, file: &SourceFile) -> Self {
        let rel_path = file.relative_path();
        Self {
            rel_path: rel_path.display().to_string(),
            generated: file.content(),
            current: fs::read_to_string(out_dir.join(&rel_path)).ok(),
        }
    }

    /// Nothing on disk yet.
    pub fn is_missing(&self) -> bool {
        self.current.is_none()
    }

    /// On disk but different.
    pub fn is_stale(&self) -> bool {
        self.current.as_ref().is_some_and(|current| current != &self.generated)
    }

    /// `None` when the file on disk is up to date.
    pub fn render(&self) -> Option<String> {
        match &self.current {
            Some(current) if current == &self.generated => None,
            Some(current) => Some(unified_diff(&self.rel_path, current, &self.generated, "current")),
            None => Some(unified_diff(&self.rel_path, "", &self.generated, "missing")),
        }
    }
}

/// Diff `old` against `new` with three lines of context.
pub fn unified_diff(rel_path: &str, old: &str, new: &str, old_label: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut output = String::new();

    output.push_str(&format!("{}\n", style(format!("--- {rel_path} ({old_label})")).bold()));
    output.push_str(&format!("{}\n", style(format!("+++ {rel_path} (generated)")).bold()));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let mut line = match change.tag() {
                    ChangeTag::Delete => format!("-{}", change.value()),
                    ChangeTag::Insert => format!("+{}", change.value()),
                    ChangeTag::Equal => format!(" {}", change.value()),
                };
                if change.missing_newline() {
                    line.push('\n');
                }
                let line = match change.tag() {
                    ChangeTag::Delete => style(line).red().to_string(),
                    ChangeTag::Insert => style(line).green().to_string(),
                    ChangeTag::Equal => line,
                };
                output.push_str(&line);
            }
        }
    }
    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_line_with_context() {
        console::set_colors_enabled(false);
        let old = "a\nb\nc\nd\n";
        let new = "a\nb\nC\nd\n";
        let diff = unified_diff("com/example/Api.kt", old, new, "current");
        assert!(diff.starts_with("--- com/example/Api.kt (current)\n+++ com/example/Api.kt (generated)\n"));
        assert!(diff.contains("-c\n+C\n"), "{diff}");
        assert!(diff.contains(" d\n"));
    }

    #[test]
    fn test_distant_changes_are_grouped() {
        console::set_colors_enabled(false);
        let old: String = (0..20).map(|i| format!("line {i}\n")).collect();
        let new = old.replace("line 1\n", "line one\n").replace("line 18\n", "line eighteen\n");
        let diff = unified_diff("Api.kt", &old, &new, "current");
        assert!(diff.contains("...\n"), "{diff}");
        assert!(!diff.contains(" line 9\n"));
    }

    #[test]
    fn test_up_to_date_file_has_no_diff() {
        let drift = FileDrift {
            rel_path: "Api.kt".into(),
            generated: "x\n".into(),
            current: Some("x\n".into()),
        };
        assert!(drift.render().is_none());
        assert!(!drift.is_stale());
        assert!(!drift.is_missing());
    }
}
