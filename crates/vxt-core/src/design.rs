//! Coefficient designer for the peak and cut sections.
//!
//! The peak band is a single RBJ peaking biquad. The cut sections are
//! Butterworth filters of order 2, 4, 6 or 8 realized as cascades of
//! second-order sections, one per conjugate pole pair.
//!
//! # Section Q values
//!
//! For an order-`N` Butterworth filter, section `k` (1-based, `k <= N/2`)
//! uses:
//!
//! ```text
//! Q_k = 1 / (2 * sin((2k - 1) * pi / (2N)))
//! ```
//!
//! | Order | Section Qs |
//! |-------|------------|
//! | 2 | 0.7071 |
//! | 4 | 1.3066, 0.5412 |
//! | 6 | 1.9319, 0.7071, 0.5176 |
//! | 8 | 2.5629, 0.9000, 0.6013, 0.5098 |
//!
//! # Bounds
//!
//! Non-finite inputs are rejected with [`EqError`]. Finite inputs are
//! clamped: frequency into `[MIN_FREQUENCY, NYQUIST_MARGIN * sample_rate]`,
//! Q into `[MIN_Q, MAX_Q]`, gain into `[MIN_GAIN_DB, MAX_GAIN_DB]`. Every
//! successful result therefore holds finite, stable coefficients.

use core::f32::consts::PI;
use libm::sinf;

use crate::biquad::BiquadCoefficients;
use crate::error::{EqError, validate_sample_rate};
use crate::settings::ChainSettings;

/// Maximum number of biquad sections per cut side.
pub const MAX_CUT_STAGES: usize = 4;

/// Highest supported Butterworth order.
pub const MAX_ORDER: usize = MAX_CUT_STAGES * 2;

/// Lowest frequency handed to the cookbook formulas.
pub const MIN_FREQUENCY: f32 = 1.0;

/// Frequencies are kept below this fraction of the sample rate (95% of Nyquist).
pub const NYQUIST_MARGIN: f32 = 0.475;

/// Lowest accepted Q.
pub const MIN_Q: f32 = 0.1;

/// Highest accepted Q.
pub const MAX_Q: f32 = 10.0;

/// Lowest accepted peak gain in dB.
pub const MIN_GAIN_DB: f32 = -24.0;

/// Highest accepted peak gain in dB.
pub const MAX_GAIN_DB: f32 = 12.0;

/// Which cut section a cascade is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutKind {
    /// Removes content below the corner (highpass sections).
    LowCut,
    /// Removes content above the corner (lowpass sections).
    HighCut,
}

/// Fixed-capacity list of up to [`MAX_CUT_STAGES`] section coefficients.
///
/// Lives on the stack; designing and applying a cascade never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutCascade {
    sections: [BiquadCoefficients; MAX_CUT_STAGES],
    len: usize,
}

impl CutCascade {
    /// An empty cascade.
    pub const fn new() -> Self {
        Self {
            sections: [BiquadCoefficients::IDENTITY; MAX_CUT_STAGES],
            len: 0,
        }
    }

    /// Appends a section. Returns `false` if the cascade is already full.
    pub fn push(&mut self, section: BiquadCoefficients) -> bool {
        if self.len == MAX_CUT_STAGES {
            return false;
        }
        self.sections[self.len] = section;
        self.len += 1;
        true
    }

    /// Number of designed sections.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` if no sections are present.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Section at `index`, if designed.
    pub fn get(&self, index: usize) -> Option<&BiquadCoefficients> {
        self.as_slice().get(index)
    }

    /// Designed sections in order.
    pub fn as_slice(&self) -> &[BiquadCoefficients] {
        &self.sections[..self.len]
    }
}

impl Default for CutCascade {
    fn default() -> Self {
        Self::new()
    }
}

/// Every coefficient the chain needs for one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainCoefficients {
    /// Peak section.
    pub peak: BiquadCoefficients,
    /// Low-cut sections, one per active stage.
    pub low_cut: CutCascade,
    /// High-cut sections, one per active stage.
    pub high_cut: CutCascade,
}

fn require_finite(name: &'static str, value: f32) -> Result<f32, EqError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EqError::InvalidParameter { name, value })
    }
}

/// Clamps `frequency` into the designable band for `sample_rate`.
///
/// If the band is empty (a rate [`validate_sample_rate`] rejects) the
/// result is `MIN_FREQUENCY`.
pub fn clamp_frequency(frequency: f32, sample_rate: f32) -> f32 {
    frequency
        .min(sample_rate * NYQUIST_MARGIN)
        .max(MIN_FREQUENCY)
}

/// Q of section `k` (0-based) of an order-`order` Butterworth cascade.
pub fn butterworth_q(order: usize, k: usize) -> f32 {
    let n = order as f32;
    let angle = (2.0 * k as f32 + 1.0) * PI / (2.0 * n);
    1.0 / (2.0 * sinf(angle))
}

/// Designs the peaking EQ section.
pub fn design_peak(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> Result<BiquadCoefficients, EqError> {
    let sample_rate = validate_sample_rate(sample_rate)?;
    let frequency = clamp_frequency(require_finite("frequency", frequency)?, sample_rate);
    let q = require_finite("q", q)?.clamp(MIN_Q, MAX_Q);
    let gain_db = require_finite("gain", gain_db)?.clamp(MIN_GAIN_DB, MAX_GAIN_DB);

    Ok(BiquadCoefficients::peaking(frequency, q, gain_db, sample_rate))
}

/// Designs an order-`order` Butterworth cut as `order / 2` sections.
///
/// `order` must be 2, 4, 6 or 8.
pub fn design_cut_cascade(
    kind: CutKind,
    frequency: f32,
    sample_rate: f32,
    order: usize,
) -> Result<CutCascade, EqError> {
    if order == 0 || order % 2 != 0 || order > MAX_ORDER {
        return Err(EqError::InvalidOrder(order));
    }
    let sample_rate = validate_sample_rate(sample_rate)?;
    let frequency = clamp_frequency(require_finite("frequency", frequency)?, sample_rate);

    let mut cascade = CutCascade::new();
    for k in 0..order / 2 {
        let q = butterworth_q(order, k);
        let section = match kind {
            CutKind::LowCut => BiquadCoefficients::highpass(frequency, q, sample_rate),
            CutKind::HighCut => BiquadCoefficients::lowpass(frequency, q, sample_rate),
        };
        cascade.push(section);
    }
    Ok(cascade)
}

/// Designs peak, low-cut and high-cut together.
///
/// Either every part succeeds or an error is returned and nothing is
/// produced, so callers never apply a half-designed set.
pub fn design_chain(
    settings: &ChainSettings,
    sample_rate: f32,
) -> Result<ChainCoefficients, EqError> {
    let peak = design_peak(
        settings.peak_freq,
        settings.peak_q,
        settings.peak_gain_db,
        sample_rate,
    )?;
    let low_cut = design_cut_cascade(
        CutKind::LowCut,
        settings.low_cut_freq,
        sample_rate,
        settings.low_cut_slope.order(),
    )?;
    let high_cut = design_cut_cascade(
        CutKind::HighCut,
        settings.high_cut_freq,
        sample_rate,
        settings.high_cut_slope.order(),
    )?;

    Ok(ChainCoefficients {
        peak,
        low_cut,
        high_cut,
    })
}
