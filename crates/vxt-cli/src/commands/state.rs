//! State file writer.

use super::common::ParamArgs;
use clap::Args;
use std::path::PathBuf;
use vxt_plugin::save_state;

#[derive(Args)]
pub struct StateArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Destination file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

pub fn run(args: StateArgs) -> anyhow::Result<()> {
    let shared = args.params.build_store()?;
    let bytes = save_state(&shared)?;
    std::fs::write(&args.output, &bytes)?;
    tracing::info!(path = %args.output.display(), bytes = bytes.len(), "state written");
    println!("Wrote {}", args.output.display());
    Ok(())
}
