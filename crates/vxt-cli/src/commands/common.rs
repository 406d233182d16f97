//! Shared CLI helpers used across multiple commands.

use clap::Args;
use std::path::PathBuf;
use vxt_core::EqParam;
use vxt_plugin::{VxtShared, load_state};

/// EQ parameter flags accepted by every command that builds a chain.
///
/// Values are parsed with the parameter's own display format, so
/// `--peak-freq 2.5kHz`, `--peak-gain "+6 dB"` and `--low-cut-slope 48` all
/// work. Flags are applied on top of `--state`.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// State file to start from (JSON written by `vxt state`)
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Low-cut frequency (e.g., "80", "80 Hz")
    #[arg(long, value_name = "FREQ")]
    pub low_cut: Option<String>,

    /// Low-cut slope in dB/oct (12, 24, 36, 48)
    #[arg(long, value_name = "SLOPE")]
    pub low_cut_slope: Option<String>,

    /// High-cut frequency (e.g., "12000", "12 kHz")
    #[arg(long, value_name = "FREQ")]
    pub high_cut: Option<String>,

    /// High-cut slope in dB/oct (12, 24, 36, 48)
    #[arg(long, value_name = "SLOPE")]
    pub high_cut_slope: Option<String>,

    /// Peak center frequency
    #[arg(long, value_name = "FREQ")]
    pub peak_freq: Option<String>,

    /// Peak gain in dB
    #[arg(long, value_name = "DB", allow_hyphen_values = true)]
    pub peak_gain: Option<String>,

    /// Peak quality factor
    #[arg(long, value_name = "Q")]
    pub peak_q: Option<String>,

    /// Any parameter by name or string ID (e.g., "peak_gain=-3")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    pub param: Vec<(String, String)>,
}

impl ParamArgs {
    /// Builds a parameter store from `--state` and the individual flags.
    pub fn build_store(&self) -> anyhow::Result<VxtShared> {
        let shared = VxtShared::new();

        if let Some(path) = &self.state {
            let bytes = std::fs::read(path)?;
            load_state(&shared, &bytes)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
            tracing::info!(path = %path.display(), "loaded state");
        }

        let flags = [
            (EqParam::LowCut, &self.low_cut),
            (EqParam::LowCutSlope, &self.low_cut_slope),
            (EqParam::HighCut, &self.high_cut),
            (EqParam::HighCutSlope, &self.high_cut_slope),
            (EqParam::PeakFreq, &self.peak_freq),
            (EqParam::PeakGain, &self.peak_gain),
            (EqParam::PeakQ, &self.peak_q),
        ];
        for (param, text) in flags {
            if let Some(text) = text {
                apply_text(&shared, param.index(), text)?;
            }
        }

        for (name, text) in &self.param {
            let index = shared.index_by_name(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown parameter '{}'. Use 'vxt params' to list parameters.",
                    name
                )
            })?;
            apply_text(&shared, index, text)?;
        }

        Ok(shared)
    }
}

fn apply_text(shared: &VxtShared, index: usize, text: &str) -> anyhow::Result<()> {
    let desc = shared
        .descriptor(index)
        .ok_or_else(|| anyhow::anyhow!("no parameter at index {}", index))?;
    let value = desc
        .parse_value(text)
        .ok_or_else(|| anyhow::anyhow!("Invalid value for {}: '{}'", desc.name, text))?;
    shared.set_value(index, value);
    Ok(())
}

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        ));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vxt_core::Slope;

    #[test]
    fn flags_are_parsed_with_units() {
        let args = ParamArgs {
            peak_freq: Some("2.5kHz".into()),
            peak_gain: Some("-6 dB".into()),
            low_cut_slope: Some("48".into()),
            ..ParamArgs::default()
        };
        let settings = args.build_store().unwrap().chain_settings();
        assert_eq!(settings.peak_freq, 2500.0);
        assert_eq!(settings.peak_gain_db, -6.0);
        assert_eq!(settings.low_cut_slope, Slope::Db48);
    }

    #[test]
    fn generic_param_uses_string_id() {
        let args = ParamArgs {
            param: vec![("high_cut_freq".into(), "8000".into())],
            ..ParamArgs::default()
        };
        let shared = args.build_store().unwrap();
        assert_eq!(shared.value(EqParam::HighCut), 8000.0);
    }

    #[test]
    fn unknown_param_and_bad_value_fail() {
        let args = ParamArgs {
            param: vec![("wobble".into(), "1".into())],
            ..ParamArgs::default()
        };
        assert!(args.build_store().is_err());

        let args = ParamArgs {
            peak_q: Some("sharp".into()),
            ..ParamArgs::default()
        };
        assert!(args.build_store().is_err());
    }

    #[test]
    fn key_val_parsing() {
        assert_eq!(
            parse_key_val("peak_q=2").unwrap(),
            ("peak_q".to_string(), "2".to_string())
        );
        assert!(parse_key_val("peak_q").is_err());
    }
}
