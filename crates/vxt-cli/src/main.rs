//! VxT CLI - offline tools for the VxT EQ.

mod commands;
mod wav;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vxt")]
#[command(author, version, about = "VxT EQ command-line tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a WAV file through the EQ
    Process(commands::process::ProcessArgs),

    /// Print the magnitude response curve
    Curve(commands::curve::CurveArgs),

    /// List the EQ parameters
    Params(commands::params::ParamsArgs),

    /// Write a parameter state file
    State(commands::state::StateArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    // Diagnostics go to stderr so command output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Curve(args) => commands::curve::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::State(args) => commands::state::run(args),
    }
}
