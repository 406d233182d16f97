//! Parameter metadata for the EQ's automatable parameters.
//!
//! Each parameter is described by a [`ParamDescriptor`]: display names,
//! range, default, step, unit, a stable [`ParamId`] used by the persisted
//! state, a [`ParamScale`] for normalized host values, and [`ParamFlags`].
//!
//! # Example
//!
//! ```rust
//! use vxt_core::{ParamDescriptor, ParamId};
//!
//! let peak = ParamDescriptor::frequency_hz("PeakFreq", "Peak", 200.0, 20000.0, 1000.0)
//!     .with_id(ParamId(104), "peak_freq");
//! assert_eq!(peak.clamp(50.0), 200.0);
//! assert!((peak.denormalize(peak.normalize(1000.0)) - 1000.0).abs() < 0.1);
//! ```

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values; used for frequencies. Requires `min > 0`.
    Logarithmic,
}

/// Stable parameter identifier.
///
/// Keys the persisted state blob, so a `ParamId` must never change for a
/// given parameter once released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags for hosts.
///
/// ```rust
/// use vxt_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete steps (choice lists).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Metadata describing one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name, also the lookup name (e.g., `"LowCut"`).
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit used for formatting.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value on construction and after a state reset.
    pub default: f32,

    /// Recommended step increment for controls.
    pub step: f32,

    /// Stable numeric ID used by the persisted state.
    pub id: ParamId,

    /// Human-readable stable ID (e.g., `"low_cut_freq"`).
    pub string_id: &'static str,

    /// Normalization curve.
    pub scale: ParamScale,

    /// Host capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Frequency parameter in Hz with logarithmic normalization and 1 Hz steps.
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Logarithmic,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Gain parameter in decibels with 1 dB steps.
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Dimensionless quality factor with 0.05 steps.
    pub const fn q_factor(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.05,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Filter slope choice: ordinals 0..=3 for 12/24/36/48 dB/oct,
    /// defaulting to 24 dB/oct.
    pub const fn slope(name: &'static str, short_name: &'static str) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::DbPerOctave,
            min: 0.0,
            max: 3.0,
            default: 1.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's range.
    ///
    /// NaN is passed through unchanged; callers reject it separately.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to the normalized range `[0, 1]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// Converts a normalized value back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
        }
    }

    /// Formats a value with its unit for display.
    ///
    /// ```rust
    /// use vxt_core::ParamDescriptor;
    ///
    /// let slope = ParamDescriptor::slope("LowCutSlope", "LC Slope");
    /// assert_eq!(slope.format_value(2.0), "36 dB/Oct");
    /// let gain = ParamDescriptor::gain_db("PeakGain", "Gain", -24.0, 12.0, 0.0);
    /// assert_eq!(gain.format_value(6.0), "+6.0 dB");
    /// ```
    #[cfg(feature = "std")]
    pub fn format_value(&self, value: f32) -> String {
        match self.unit {
            ParamUnit::Hertz if value >= 1000.0 => format!("{:.2} kHz", value / 1000.0),
            ParamUnit::Hertz => format!("{value:.0} Hz"),
            ParamUnit::Decibels => format!("{value:+.1} dB"),
            ParamUnit::DbPerOctave => {
                let ordinal = libm::roundf(self.clamp(value)) as u32;
                format!("{} dB/Oct", (ordinal + 1) * 12)
            }
            ParamUnit::None => format!("{value:.2}"),
        }
    }

    /// Parses display text back into a plain value, clamped to range.
    ///
    /// Accepts a bare number or a number followed by the unit suffix. Slopes
    /// accept either the ordinal or the dB/oct figure (`"36 dB/Oct"` or `"36"`).
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let text = text.trim();
        let (number, multiplier) = if let Some(stripped) = text.strip_suffix("kHz") {
            (stripped, 1000.0)
        } else {
            let stripped = text
                .strip_suffix("dB/Oct")
                .or_else(|| text.strip_suffix("Hz"))
                .or_else(|| text.strip_suffix("dB"))
                .unwrap_or(text);
            (stripped, 1.0)
        };
        let value = number.trim().parse::<f32>().ok()? * multiplier;
        if !value.is_finite() {
            return None;
        }
        let value = match self.unit {
            ParamUnit::DbPerOctave if value >= 12.0 => value / 12.0 - 1.0,
            _ => value,
        };
        Some(self.clamp(value))
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels, for gain.
    Decibels,
    /// Hertz, for cutoff and center frequencies.
    Hertz,
    /// Slope choice; the value is an ordinal, displayed as dB/octave.
    DbPerOctave,
    /// Dimensionless (Q).
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::DbPerOctave => " dB/Oct",
            ParamUnit::None => "",
        }
    }
}
