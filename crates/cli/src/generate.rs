//! `ktorgen generate`: write or diff generated sources.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use ktorgen_core::{CollectingSink, KtorGenProcessor, SourceFile};
use tracing::{debug, info};

use crate::common::{OptionArgs, load_input, print_diagnostics, summary};
use crate::diff::FileDrift;
use crate::run_command;

/// Arguments of `ktorgen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Inputs, one round each.
    #[arg(
        value_name = "INPUT",
        required = true,
        help = "Symbol table JSON file or directory. Each input is one processing round"
    )]
    pub inputs: Vec<PathBuf>,

    /// Output root.
    #[arg(long, value_name = "DIR", help = "Directory receiving the generated sources")]
    pub out: PathBuf,

    /// Processor options.
    #[command(flatten)]
    pub options: OptionArgs,

    /// Compare instead of writing.
    #[arg(
        long,
        default_value_t = false,
        help = "Write nothing, fail with a diff when generated sources are out of date"
    )]
    pub check: bool,
}

/// Exit code of the command.
pub fn run(args: GenerateArgs) -> i32 {
    run_command(|| run_inner(args))
}

/// Processes every round, then writes or diffs the generated files.
pub fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let options = args.options.processor_options()?;
    let mut processor = KtorGenProcessor::new(options);
    let mut sink = CollectingSink::default();
    let mut files: Vec<SourceFile> = Vec::new();

    for input in &args.inputs {
        let symbols = load_input(input)?;
        debug!(input = %input.display(), classes = symbols.classes.len(), "Starting round");
        match processor.process(&symbols, &mut sink) {
            Ok(output) => files.extend(output.files),
            Err(err) => {
                print_diagnostics(&sink);
                return Err(err.to_string());
            }
        }
    }
    if let Err(err) = processor.finish(&mut sink) {
        print_diagnostics(&sink);
        return Err(err.to_string());
    }
    print_diagnostics(&sink);

    if args.check {
        check_outputs(&args.out, &files)?;
    } else {
        write_outputs(&args.out, &files)?;
    }

    let errors = sink.errors().count();
    if errors > 0 {
        return Err(format!("KtorGen finished with {}", summary(&sink)));
    }
    Ok(())
}

fn write_outputs(out: &Path, files: &[SourceFile]) -> Result<(), String> {
    for file in files {
        let path = out.join(file.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
        }
        fs::write(&path, file.content()).map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        debug!(path = %path.display(), "Wrote generated source");
    }
    info!(files = files.len(), out = %out.display(), "Generated sources written");
    println!("{} {} file(s) into {}", style("Generated").green().bold(), files.len(), out.display());
    Ok(())
}

fn check_outputs(out: &Path, files: &[SourceFile]) -> Result<(), String> {
    let drifts: Vec<FileDrift> = files.iter().map(|file| FileDrift::compare(out, file)).collect();
    for diff in drifts.iter().filter_map(FileDrift::render) {
        println!("{diff}");
    }
    let missing = drifts.iter().filter(|drift| drift.is_missing()).count();
    let stale = drifts.iter().filter(|drift| drift.is_stale()).count();
    if missing + stale > 0 {
        return Err(format!(
            "Generated sources in {} are out of date: {stale} stale, {missing} missing",
            out.display()
        ));
    }
    println!("{} {} file(s) up to date", style("Checked").green().bold(), files.len());
    Ok(())
}
