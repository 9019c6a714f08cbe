//! `ktorgen check`: validation only.

use std::path::PathBuf;

use clap::Args;
use console::style;
use ktorgen_core::{CollectingSink, KtorGenProcessor, RoundOutput};

use crate::common::{OptionArgs, load_input, print_diagnostics, summary};
use crate::run_command;

/// Arguments of `ktorgen check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Inputs, one round each.
    #[arg(
        value_name = "INPUT",
        required = true,
        help = "Symbol table JSON file or directory. Each input is one processing round"
    )]
    pub inputs: Vec<PathBuf>,

    /// Processor options.
    #[command(flatten)]
    pub options: OptionArgs,
}

/// Exit code of the command.
pub fn run(args: CheckArgs) -> i32 {
    run_command(|| run_inner(args))
}

/// Validates every round and fails on errors or pending declarations.
pub fn run_inner(args: CheckArgs) -> Result<(), String> {
    let options = args.options.processor_options()?;
    let mut processor = KtorGenProcessor::new(options);
    let mut sink = CollectingSink::default();

    for input in &args.inputs {
        let symbols = load_input(input)?;
        let output = match processor.check(&symbols, &mut sink) {
            Ok(output) => output,
            Err(err) => {
                print_diagnostics(&sink);
                return Err(err.to_string());
            }
        };
        print_round(&output);
    }
    let finished = processor.finish(&mut sink);
    print_diagnostics(&sink);
    finished.map_err(|err| err.to_string())?;

    if sink.errors().count() > 0 {
        return Err(format!("Check failed: {}", summary(&sink)));
    }
    println!("{} {}", style("Check passed:").green().bold(), summary(&sink));
    Ok(())
}

fn print_round(output: &RoundOutput) {
    for name in &output.valid {
        println!("  {} {name}", style("ok").green());
    }
    for name in &output.dropped {
        println!("  {} {name}", style("invalid").red());
    }
    for name in &output.deferred {
        println!("  {} {name}", style("deferred").yellow());
    }
    for name in &output.skipped {
        println!("  {} {name}", style("skipped").dim());
    }
}
