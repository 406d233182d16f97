//! Magnitude response export.

use super::common::ParamArgs;
use clap::{Args, ValueEnum};
use egui::{Rect, pos2, vec2};
use serde::Serialize;
use std::io::Write;
use vxt_core::ChainSnapshot;
use vxt_gui_core::{ResponseCurveRenderer, frequency_at};

#[derive(Args)]
pub struct CurveArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Number of points (one per pixel column)
    #[arg(long, default_value = "800")]
    width: u32,

    /// Plot height in pixels, used for the y column
    #[arg(long, default_value = "400")]
    height: u32,

    /// Sample rate the filters are designed at
    #[arg(long, default_value = "48000")]
    sample_rate: f32,

    /// Output format
    #[arg(long, value_enum, default_value_t = CurveFormat::Csv)]
    format: CurveFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CurveFormat {
    Csv,
    Json,
}

#[derive(Serialize)]
struct CurvePoint {
    frequency_hz: f32,
    magnitude_db: f64,
    x: f32,
    y: f32,
}

pub fn run(args: CurveArgs) -> anyhow::Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("Width and height must be at least 1");
    }

    let shared = args.params.build_store()?;
    let settings = shared.chain_settings();
    let snapshot = ChainSnapshot::design(&settings, args.sample_rate)?;
    shared.publish_snapshot(&snapshot);

    let rect = Rect::from_min_size(
        pos2(0.0, 0.0),
        vec2(args.width as f32, args.height as f32),
    );
    let mut renderer = ResponseCurveRenderer::new(rect);
    renderer.tick(&shared);

    let width = renderer.points().len();
    let points: Vec<CurvePoint> = renderer
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let frequency_hz = frequency_at(i, width);
            CurvePoint {
                frequency_hz,
                magnitude_db: snapshot.magnitude_db_at(frequency_hz),
                x: p.x,
                y: p.y,
            }
        })
        .collect();
    tracing::debug!(points = points.len(), "curve computed");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        CurveFormat::Csv => {
            writeln!(out, "frequency_hz,magnitude_db,x,y")?;
            for p in &points {
                writeln!(
                    out,
                    "{:.3},{:.4},{:.1},{:.3}",
                    p.frequency_hz, p.magnitude_db, p.x, p.y
                )?;
            }
        }
        CurveFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &points)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
