//! Offline WAV processing through the EQ.

use super::common::ParamArgs;
use crate::wav::{WavSpec, read_wav, write_wav};
use clap::Args;
use std::path::PathBuf;
use vxt_core::linear_to_db;
use vxt_plugin::VxtAudioProcessor;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    params: ParamArgs,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("Unsupported bit depth {} (expected 16, 24 or 32)", args.bit_depth);
    }
    if args.block_size == 0 {
        anyhow::bail!("Block size must be at least 1");
    }

    let shared = args.params.build_store()?;

    println!("Reading {}...", args.input.display());
    let (mut channels, spec) = read_wav(&args.input)?;
    if channels.len() > 2 {
        anyhow::bail!(
            "{} has {} channels; only mono and stereo are supported",
            args.input.display(),
            channels.len()
        );
    }
    let frames = channels.first().map_or(0, Vec::len);
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        channels.len(),
        spec.sample_rate,
        frames as f32 / spec.sample_rate as f32
    );

    let mut processor = VxtAudioProcessor::new(shared.clone());
    processor.prepare(spec.sample_rate as f32, args.block_size)?;

    let settings = shared.chain_settings();
    tracing::info!(
        low_cut = settings.low_cut_freq,
        low_slope = settings.low_cut_slope.db_per_octave(),
        high_cut = settings.high_cut_freq,
        high_slope = settings.high_cut_slope.db_per_octave(),
        peak_freq = settings.peak_freq,
        peak_gain = settings.peak_gain_db,
        peak_q = settings.peak_q,
        "processing"
    );

    let input_peak = peak(&channels);
    let num_inputs = channels.len();
    let mut start = 0;
    while start < frames {
        let len = args.block_size.min(frames - start);
        let mut block: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|c| &mut c[start..start + len])
            .collect();
        processor.process_block(&mut block, num_inputs, len)?;
        start += len;
    }
    processor.release();

    let output_peak = peak(&channels);
    println!("\nStats:");
    println!("  Input:  Peak {:.1} dB", linear_to_db(input_peak));
    println!("  Output: Peak {:.1} dB", linear_to_db(output_peak));

    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &channels, out_spec)?;
    println!("Done!");

    Ok(())
}

fn peak(channels: &[Vec<f32>]) -> f32 {
    channels
        .iter()
        .flatten()
        .map(|s| s.abs())
        .fold(0.0, f32::max)
}
