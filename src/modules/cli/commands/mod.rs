//! CLI commands

mod completion;
mod generate;
mod target;
mod validate;

pub use completion::CompletionCommand;
pub use generate::GenerateCommand;
pub use target::TargetArgs;
pub use validate::{ValidateCommand, ValidationSummary};

use clap::{Parser, Subcommand};

/// confgen - unified telemetry configuration generator
#[derive(Parser, Debug)]
#[command(name = "confgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Unified configuration file path
    ///
    /// This is a *global* option so it can be specified after subcommands,
    /// e.g. `confgen validate -f config.yaml`.
    #[arg(
        short = 'f',
        long = "file",
        global = true,
        default_value = "config.yaml"
    )]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and validate a configuration
    Validate(ValidateCommand),

    /// Generate backend configuration files
    Generate(GenerateCommand),

    /// Generate shell completion scripts
    #[command(hide = true)]
    Completion(CompletionCommand),
}
