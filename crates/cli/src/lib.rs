//! Command line front end of the generator.
//!
//! Each command module exposes `run(args) -> i32`, the binary only parses the
//! process arguments and exits with the returned code.

pub mod check;
pub mod common;
pub mod diff;
pub mod generate;
pub mod inspect;

use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ktorgen",
    version,
    about = "\x1b[33mktorgen\x1b[0m generates Ktor client implementations for annotated Kotlin interfaces"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Kotlin sources, one processing round per input
    Generate(generate::GenerateArgs),
    /// Extract and validate without generating
    Check(check::CheckArgs),
    /// Print the extracted interface models as JSON
    Inspect(inspect::InspectArgs),
}

/// Parse `args` (program name first) and run the selected command.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(args),
            Some(Commands::Check(args)) => check::run(args),
            Some(Commands::Inspect(args)) => inspect::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

pub(crate) fn run_command<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
