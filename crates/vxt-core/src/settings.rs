//! Parameter layout and the immutable settings snapshot.
//!
//! The EQ exposes seven automatable parameters. [`EqParam`] names their
//! indices, [`PARAMS`] holds their descriptors, and [`ChainSettings`] is the
//! typed snapshot built from a full set of parameter values.

use crate::param_info::{ParamDescriptor, ParamId};

/// Filter rolloff for the low-cut and high-cut sections.
///
/// | Ordinal | Slope | Order | Biquad stages |
/// |---------|-------|-------|---------------|
/// | 0 | 12 dB/oct | 2 | 1 |
/// | 1 | 24 dB/oct | 4 | 2 |
/// | 2 | 36 dB/oct | 6 | 3 |
/// | 3 | 48 dB/oct | 8 | 4 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slope {
    /// 12 dB/octave.
    Db12,
    /// 24 dB/octave.
    #[default]
    Db24,
    /// 36 dB/octave.
    Db36,
    /// 48 dB/octave.
    Db48,
}

impl Slope {
    /// All slopes in ordinal order.
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    /// Slope for an ordinal; values above 3 saturate to 48 dB/oct.
    pub const fn from_ordinal(ordinal: usize) -> Self {
        match ordinal {
            0 => Slope::Db12,
            1 => Slope::Db24,
            2 => Slope::Db36,
            _ => Slope::Db48,
        }
    }

    /// Slope for a raw parameter value: rounded to the nearest ordinal and
    /// clamped into range. NaN maps to the default.
    pub fn from_value(value: f32) -> Self {
        if value.is_nan() {
            return Slope::default();
        }
        Self::from_ordinal(libm::roundf(value.clamp(0.0, 3.0)) as usize)
    }

    /// Ordinal 0..=3.
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Butterworth filter order: `(ordinal + 1) * 2`.
    pub const fn order(self) -> usize {
        (self.ordinal() + 1) * 2
    }

    /// Number of biquad sections: `ordinal + 1`.
    pub const fn stages(self) -> usize {
        self.ordinal() + 1
    }

    /// Ultimate rolloff in dB/octave.
    pub const fn db_per_octave(self) -> u32 {
        (self.ordinal() as u32 + 1) * 12
    }

    /// Value stored in the parameter store for this slope.
    pub const fn as_value(self) -> f32 {
        self.ordinal() as f32
    }
}

/// Index of each parameter in [`PARAMS`] and in the parameter store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqParam {
    /// Low-cut frequency (Hz).
    LowCut,
    /// Low-cut slope ordinal.
    LowCutSlope,
    /// High-cut frequency (Hz).
    HighCut,
    /// High-cut slope ordinal.
    HighCutSlope,
    /// Peak center frequency (Hz).
    PeakFreq,
    /// Peak gain (dB).
    PeakGain,
    /// Peak quality factor.
    PeakQ,
}

impl EqParam {
    /// All parameters in index order.
    pub const ALL: [EqParam; PARAM_COUNT] = [
        EqParam::LowCut,
        EqParam::LowCutSlope,
        EqParam::HighCut,
        EqParam::HighCutSlope,
        EqParam::PeakFreq,
        EqParam::PeakGain,
        EqParam::PeakQ,
    ];

    /// Position in the parameter store.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at `index`, if any.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < PARAM_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Descriptor for this parameter.
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &PARAMS[self as usize]
    }
}

/// Number of automatable parameters.
pub const PARAM_COUNT: usize = 7;

/// Descriptors in index order. IDs are persisted and must stay stable.
pub static PARAMS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::frequency_hz("LowCut", "Low Cut", 20.0, 2000.0, 20.0)
        .with_id(ParamId(100), "low_cut_freq"),
    ParamDescriptor::slope("LowCutSlope", "LC Slope").with_id(ParamId(101), "low_cut_slope"),
    ParamDescriptor::frequency_hz("HighCut", "High Cut", 200.0, 20000.0, 20000.0)
        .with_id(ParamId(102), "high_cut_freq"),
    ParamDescriptor::slope("HighCutSlope", "HC Slope").with_id(ParamId(103), "high_cut_slope"),
    ParamDescriptor::frequency_hz("PeakFreq", "Peak", 200.0, 20000.0, 1000.0)
        .with_id(ParamId(104), "peak_freq"),
    ParamDescriptor::gain_db("PeakGain", "Gain", -24.0, 12.0, 0.0)
        .with_id(ParamId(105), "peak_gain"),
    ParamDescriptor::q_factor("PeakQ", "Q", 0.1, 10.0, 1.0).with_id(ParamId(106), "peak_q"),
];

/// Immutable snapshot of every filter parameter.
///
/// Built fresh for each audio block and each visualizer refresh. Frequency
/// ordering is not enforced: a low-cut above the high-cut is allowed and
/// simply produces a very narrow or empty passband.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    /// Low-cut (highpass) corner frequency in Hz.
    pub low_cut_freq: f32,
    /// Low-cut rolloff.
    pub low_cut_slope: Slope,
    /// High-cut (lowpass) corner frequency in Hz.
    pub high_cut_freq: f32,
    /// High-cut rolloff.
    pub high_cut_slope: Slope,
    /// Peak center frequency in Hz.
    pub peak_freq: f32,
    /// Peak gain in dB.
    pub peak_gain_db: f32,
    /// Peak quality factor.
    pub peak_q: f32,
}

impl ChainSettings {
    /// Builds a snapshot from raw parameter values in [`EqParam`] order.
    pub fn from_values(values: &[f32; PARAM_COUNT]) -> Self {
        Self {
            low_cut_freq: values[EqParam::LowCut.index()],
            low_cut_slope: Slope::from_value(values[EqParam::LowCutSlope.index()]),
            high_cut_freq: values[EqParam::HighCut.index()],
            high_cut_slope: Slope::from_value(values[EqParam::HighCutSlope.index()]),
            peak_freq: values[EqParam::PeakFreq.index()],
            peak_gain_db: values[EqParam::PeakGain.index()],
            peak_q: values[EqParam::PeakQ.index()],
        }
    }

    /// Raw parameter values in [`EqParam`] order.
    pub fn to_values(&self) -> [f32; PARAM_COUNT] {
        [
            self.low_cut_freq,
            self.low_cut_slope.as_value(),
            self.high_cut_freq,
            self.high_cut_slope.as_value(),
            self.peak_freq,
            self.peak_gain_db,
            self.peak_q,
        ]
    }

    /// Bitwise equality, treating `-0.0`/`0.0` and NaN payloads as distinct.
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.to_values()
            .iter()
            .zip(other.to_values().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Default for ChainSettings {
    fn default() -> Self {
        let mut values = [0.0; PARAM_COUNT];
        for (value, desc) in values.iter_mut().zip(PARAMS.iter()) {
            *value = desc.default;
        }
        Self::from_values(&values)
    }
}
