//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use vxt_core::{PARAMS, ParamFlags, ParamScale};

#[derive(Args)]
pub struct ParamsArgs {
    /// Print descriptors as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if args.json {
        let list: Vec<serde_json::Value> = PARAMS
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id.0,
                    "string_id": d.string_id,
                    "name": d.name,
                    "short_name": d.short_name,
                    "unit": d.unit.suffix().trim(),
                    "min": d.min,
                    "max": d.max,
                    "default": d.default,
                    "step": d.step,
                    "scale": match d.scale {
                        ParamScale::Linear => "linear",
                        ParamScale::Logarithmic => "log",
                    },
                    "automatable": d.flags.contains(ParamFlags::AUTOMATABLE),
                    "stepped": d.flags.contains(ParamFlags::STEPPED),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("VxT EQ Parameters");
    println!("=================");
    println!();
    println!(
        "  {:4}  {:14}  {:9}  {:14}  {:12}  {:12}  {:12}",
        "ID", "Name", "Short", "String ID", "Min", "Max", "Default"
    );
    println!(
        "  {:4}  {:14}  {:9}  {:14}  {:12}  {:12}  {:12}",
        "--", "----", "-----", "---------", "---", "---", "-------"
    );
    for d in &PARAMS {
        println!(
            "  {:4}  {:14}  {:9}  {:14}  {:12}  {:12}  {:12}",
            d.id.0,
            d.name,
            d.short_name,
            d.string_id,
            d.format_value(d.min),
            d.format_value(d.max),
            d.format_value(d.default)
        );
    }

    Ok(())
}
