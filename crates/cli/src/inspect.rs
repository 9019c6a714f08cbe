//! `ktorgen inspect`: dump extracted models.

use std::path::PathBuf;

use clap::Args;
use ktorgen_core::{CollectingSink, KtorGenProcessor};

use crate::common::{OptionArgs, load_input, print_diagnostics};
use crate::run_command;

/// Arguments of `ktorgen inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Input of the single round.
    #[arg(value_name = "INPUT", help = "Symbol table JSON file or directory")]
    pub input: PathBuf,

    /// Processor options.
    #[command(flatten)]
    pub options: OptionArgs,
}

/// Exit code of the command.
pub fn run(args: InspectArgs) -> i32 {
    run_command(|| run_inner(args))
}

/// Prints the models to stdout.
pub fn run_inner(args: InspectArgs) -> Result<(), String> {
    println!("{}", render(&args)?);
    Ok(())
}

/// Pretty JSON of the models extracted from the input, without validation.
pub fn render(args: &InspectArgs) -> Result<String, String> {
    let processor = KtorGenProcessor::new(args.options.processor_options()?);
    let symbols = load_input(&args.input)?;
    let mut sink = CollectingSink::default();
    let models = processor.inspect(&symbols, &mut sink);
    print_diagnostics(&sink);
    let models = models.map_err(|err| err.to_string())?;
    serde_json::to_string_pretty(&models).map_err(|err| format!("Failed to serialize models: {err}"))
}
