//! Biquad (bi-quadratic) filter section.
//!
//! Provides normalized second-order IIR coefficients with RBJ Audio EQ
//! Cookbook constructors, a Direct Form I processing stage, and closed-form
//! magnitude evaluation used by the response curve.

use core::f32::consts::PI;
use libm::{cos, cosf, fabsf, sinf, sqrt};

use crate::math::db_to_linear;

/// Normalized biquad coefficients (`a0 == 1`).
///
/// Transfer function:
/// ```text
///         b0 + b1 z^-1 + b2 z^-2
/// H(z) = ------------------------
///          1 + a1 z^-1 + a2 z^-2
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f32,
    /// Feedforward coefficient for x[n-1].
    pub b1: f32,
    /// Feedforward coefficient for x[n-2].
    pub b2: f32,
    /// Feedback coefficient for y[n-1].
    pub a1: f32,
    /// Feedback coefficient for y[n-2].
    pub a2: f32,
}

/// Tolerance used when deciding whether a section is magnitude-neutral.
const NEUTRAL_EPSILON: f32 = 1e-6;

impl BiquadCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds coefficients from raw cookbook values, dividing through by `a0`.
    pub fn from_raw(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Second-order low-pass section.
    ///
    /// `q` of `1/sqrt(2)` gives a single Butterworth section.
    pub fn lowpass(frequency: f32, q: f32, sample_rate: f32) -> Self {
        let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::from_raw(b0, b1, b2, a0, a1, a2)
    }

    /// Second-order high-pass section.
    pub fn highpass(frequency: f32, q: f32, sample_rate: f32) -> Self {
        let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        let b2 = (1.0 + cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::from_raw(b0, b1, b2, a0, a1, a2)
    }

    /// Peaking EQ section: boosts or cuts `gain_db` around `frequency`.
    ///
    /// At 0 dB the numerator equals the denominator and the section is
    /// magnitude-neutral at every frequency.
    pub fn peaking(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Self {
        let a = db_to_linear(gain_db * 0.5); // sqrt(10^(dB/20))
        let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        Self::from_raw(b0, b1, b2, a0, a1, a2)
    }

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }

    /// Returns `true` if numerator and denominator match, so `|H| == 1`
    /// everywhere (a peak section at 0 dB gain).
    pub fn is_neutral(&self) -> bool {
        fabsf(self.b0 - 1.0) <= NEUTRAL_EPSILON
            && fabsf(self.b1 - self.a1) <= NEUTRAL_EPSILON
            && fabsf(self.b2 - self.a2) <= NEUTRAL_EPSILON
    }

    /// Magnitude `|H(e^jw)|` at `frequency`.
    ///
    /// Evaluated in double precision so steep cascades stay accurate far
    /// into the stopband.
    pub fn magnitude_at(&self, frequency: f32, sample_rate: f32) -> f64 {
        let omega = 2.0 * core::f64::consts::PI * f64::from(frequency) / f64::from(sample_rate);
        let cos_omega = cos(omega);
        let cos_2omega = cos(2.0 * omega);

        let (b0, b1, b2) = (f64::from(self.b0), f64::from(self.b1), f64::from(self.b2));
        let (a1, a2) = (f64::from(self.a1), f64::from(self.a2));

        // |H|^2 = |B(e^jw)|^2 / |A(e^jw)|^2
        let num = b0 * b0 + b1 * b1 + b2 * b2
            + 2.0 * (b0 * b1 + b1 * b2) * cos_omega
            + 2.0 * b0 * b2 * cos_2omega;
        let den = 1.0 + a1 * a1 + a2 * a2
            + 2.0 * (a1 + a1 * a2) * cos_omega
            + 2.0 * a2 * cos_2omega;

        if den > 0.0 { sqrt(num.max(0.0) / den) } else { 0.0 }
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let alpha = sinf(omega) / (2.0 * q);
    (cosf(omega), alpha)
}

/// A single biquad stage: coefficients plus Direct Form I state.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    coefficients: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a passthrough stage with cleared state.
    pub fn new() -> Self {
        Self {
            coefficients: BiquadCoefficients::IDENTITY,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Replaces the coefficients, keeping the delay lines.
    #[inline]
    pub fn set_coefficients(&mut self, coefficients: &BiquadCoefficients) {
        self.coefficients = *coefficients;
    }

    /// Current coefficients.
    #[inline]
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coefficients;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
                                  - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::math::flush_denormal(output);

        output
    }

    /// Processes a buffer in place.
    #[inline]
    pub fn process_in_place(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the delay lines without touching the coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}
