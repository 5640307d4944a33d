mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::Result;

use commands::normalize::NormalizeArgs;
use commands::validate::ValidateArgs;

/// Validate and normalize YAML build manifests
#[derive(Parser, Debug)]
#[command(name = "manifest", version, about)]
struct Cli {
    /// Enable debug logging (overridden by MANIFEST_LOG / RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that a manifest is well-formed and summarize it
    Validate(ValidateArgs),
    /// Print the canonical form of a manifest
    Normalize(NormalizeArgs),
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Normalize(args) => commands::normalize::execute(args),
    }
}
