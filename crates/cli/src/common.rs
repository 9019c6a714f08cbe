//! Input loading, processor options and diagnostic printing shared by the commands.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use ktorgen_core::{CollectingSink, ProcessorOptions, Severity, SymbolTable};
use tracing::debug;
use walkdir::WalkDir;

/// Repeated `-o key=value` flags, forwarded to the processor as its option map.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Raw `key=value` pairs.
    #[arg(
        short = 'o',
        long = "option",
        value_name = "KEY=VALUE",
        help = "Processor option, e.g. ktorgen_check_type=2. May be repeated"
    )]
    pub options: Vec<String>,
}

impl OptionArgs {
    /// Parsed options, defaults for absent keys.
    pub fn processor_options(&self) -> Result<ProcessorOptions, String> {
        ProcessorOptions::from_pairs(&self.options).map_err(|err| format!("Invalid option: {err}"))
    }
}

/// Load one round of declarations.
///
/// A file is read as a single symbol table. A directory contributes every
/// `*.json` file below it, merged in path order.
pub fn load_input(path: &Path) -> Result<SymbolTable, String> {
    if path.is_file() {
        return read_table(path);
    }
    if !path.is_dir() {
        return Err(format!("Input not found: {}", path.display()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|file| file.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(format!("No .json symbol files found in {}", path.display()));
    }

    let mut table = SymbolTable::default();
    for file in files {
        debug!(file = %file.display(), "Loading symbol file");
        table.merge(read_table(&file)?);
    }
    Ok(table)
}

fn read_table(path: &Path) -> Result<SymbolTable, String> {
    SymbolTable::from_path(path).map_err(|err| format!("Failed to load {}: {err}", path.display()))
}

/// Print errors and warnings collected so far, steps stay in the trace log.
pub fn print_diagnostics(sink: &CollectingSink) {
    for diagnostic in &sink.diagnostics {
        let label = match diagnostic.severity {
            Severity::Error => style("error").red().bold(),
            Severity::Warning => style("warning").yellow().bold(),
            Severity::Step => continue,
        };
        eprintln!("{label}: {}", diagnostic.message);
        if let Some(symbol) = &diagnostic.symbol {
            eprintln!("  {} {symbol}", style("-->").blue().bold());
        }
    }
}

/// `N error(s), M warning(s)` line printed after a run.
pub fn summary(sink: &CollectingSink) -> String {
    let errors = sink.errors().count();
    let warnings = sink.warnings().count();
    format!("{errors} error(s), {warnings} warning(s)")
}
