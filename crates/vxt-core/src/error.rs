//! Error type shared by the coefficient designer and the chain setup.

use crate::design::{MIN_FREQUENCY, NYQUIST_MARGIN};

/// Errors raised while designing filters or configuring processing.
///
/// Finite out-of-range values are clamped by the designer and never produce
/// an error; only values that cannot be made meaningful end up here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EqError {
    /// A filter parameter was NaN or infinite.
    InvalidParameter {
        /// Parameter name (e.g., `"frequency"`, `"q"`).
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Sample rate was not finite, or too low to leave a designable band.
    InvalidSampleRate(f32),
    /// Block size of zero at prepare time.
    InvalidBlockSize(usize),
    /// Butterworth order was odd, zero, or above the cascade capacity.
    InvalidOrder(usize),
}

impl core::fmt::Display for EqError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid filter parameter {name}: {value}")
            }
            Self::InvalidSampleRate(sr) => write!(f, "invalid sample rate: {sr}"),
            Self::InvalidBlockSize(n) => write!(f, "invalid block size: {n}"),
            Self::InvalidOrder(order) => {
                write!(f, "invalid filter order {order} (expected 2, 4, 6 or 8)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EqError {}

/// Returns `Ok(sample_rate)` if it is finite and leaves a designable band.
///
/// The band `[MIN_FREQUENCY, NYQUIST_MARGIN * sample_rate]` must be
/// non-empty, which rules out rates of about 2.1 Hz and below.
pub fn validate_sample_rate(sample_rate: f32) -> Result<f32, EqError> {
    if sample_rate.is_finite() && sample_rate * NYQUIST_MARGIN > MIN_FREQUENCY {
        Ok(sample_rate)
    } else {
        Err(EqError::InvalidSampleRate(sample_rate))
    }
}
