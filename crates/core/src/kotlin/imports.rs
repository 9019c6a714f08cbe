//! Import bookkeeping for one generated file.

use std::collections::{BTreeMap, BTreeSet};

use crate::symbols::{TypeArgument, TypeRef};

/// Packages Kotlin imports implicitly.
const DEFAULT_PACKAGES: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
];

/// Maps qualified names to the names written in the file.
///
/// The first qualified name registered for a simple name owns it, later ones
/// with the same simple name are written fully qualified.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    package: String,
    owners: BTreeMap<String, String>,
    imports: BTreeSet<String>,
    /// Wildcard and aliased imports carried over verbatim.
    verbatim: BTreeSet<String>,
}

impl ImportTable {
    /// Empty table for a file in `package`.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    /// Keep an import of the source file.
    pub fn add_source_import(&mut self, import: &str) {
        let import = import.trim();
        if import.ends_with(".*") || import.contains(" as ") {
            self.verbatim.insert(import.to_string());
        } else if !import.is_empty() {
            self.name(import);
        }
    }

    /// Name to write for a class, importing it when needed.
    pub fn name(&mut self, qualified_name: &str) -> String {
        let Some((package, simple)) = qualified_name.rsplit_once('.') else {
            return qualified_name.to_string();
        };
        match self.owners.get(simple) {
            Some(owner) if owner == qualified_name => return simple.to_string(),
            Some(_) => return qualified_name.to_string(),
            None => {}
        }
        self.owners.insert(simple.to_string(), qualified_name.to_string());
        if package != self.package && !DEFAULT_PACKAGES.contains(&package) {
            self.imports.insert(qualified_name.to_string());
        }
        simple.to_string()
    }

    /// Import a top-level function or property. Kotlin resolves same-named
    /// functions by overload, so members never clash.
    pub fn member(&mut self, qualified_name: &str) -> String {
        let Some((package, simple)) = qualified_name.rsplit_once('.') else {
            return qualified_name.to_string();
        };
        if package != self.package && !DEFAULT_PACKAGES.contains(&package) {
            self.imports.insert(qualified_name.to_string());
        }
        simple.to_string()
    }

    /// Kotlin rendering of a resolved type, importing every class it mentions.
    pub fn type_name(&mut self, type_ref: &TypeRef) -> String {
        if let Some(function) = &type_ref.function {
            let mut out = String::new();
            if function.suspend {
                out.push_str("suspend ");
            }
            if let Some(receiver) = &function.receiver {
                out.push_str(&self.type_name(receiver));
                out.push('.');
            }
            let parameters: Vec<_> = function
                .parameters
                .iter()
                .map(|parameter| self.type_name(parameter))
                .collect();
            out.push_str(&format!("({}) -> {}", parameters.join(", "), self.type_name(&function.return_type)));
            return if type_ref.nullable { format!("({out})?") } else { out };
        }

        let mut out = if type_ref.type_parameter {
            type_ref.qualified_name.clone()
        } else {
            self.name(&type_ref.qualified_name)
        };
        if !type_ref.arguments.is_empty() {
            let arguments: Vec<_> = type_ref
                .arguments
                .iter()
                .map(|argument| match argument {
                    TypeArgument::Star => "*".to_string(),
                    TypeArgument::Type(inner) => self.type_name(inner),
                })
                .collect();
            out.push_str(&format!("<{}>", arguments.join(", ")));
        }
        if type_ref.nullable {
            out.push('?');
        }
        out
    }

    /// Sorted import lines without the `import` keyword.
    pub fn imports(&self) -> Vec<String> {
        let mut all: Vec<_> = self.imports.iter().chain(&self.verbatim).cloned().collect();
        all.sort();
        all.dedup();
        all
    }
}
