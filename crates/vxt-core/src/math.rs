//! Level conversions and small numeric helpers.
//!
//! All functions are allocation-free and `no_std` compatible.

use libm::{expf, log10, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use vxt_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels, flooring the input at `1e-10` (-200 dB).
///
/// # Example
/// ```rust
/// use vxt_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert a double-precision magnitude to decibels.
///
/// Unlike [`linear_to_db`] this does not floor the input: zero maps to
/// `-inf` and NaN stays NaN, so callers can clamp to their own display range.
#[inline]
pub fn magnitude_to_db(magnitude: f64) -> f64 {
    20.0 * log10(magnitude)
}

/// Flush denormal (subnormal) floats to zero.
///
/// Feedback paths in IIR filters decay toward zero indefinitely; subnormal
/// arithmetic is slow on most CPUs, so values below 1e-20 are zeroed.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Map `value` from `[in_min, in_max]` to `[out_min, out_max]` linearly.
///
/// No clamping; callers clamp `value` first when they need it.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_roundtrip() {
        for db in [-24.0, -6.0, 0.0, 6.0, 12.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-4, "{db} -> {back}");
        }
    }

    #[test]
    fn linear_to_db_floors_silence() {
        assert!((linear_to_db(0.0) + 200.0).abs() < 0.01);
    }

    #[test]
    fn magnitude_to_db_passes_edge_cases_through() {
        assert_eq!(magnitude_to_db(1.0), 0.0);
        assert!(magnitude_to_db(0.0).is_infinite());
        assert!(magnitude_to_db(f64::NAN).is_nan());
    }

    #[test]
    fn flush_denormal_zeroes_tiny_values() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }

    #[test]
    fn remap_endpoints() {
        assert_eq!(remap(-24.0, -24.0, 12.0, 400.0, 0.0), 400.0);
        assert_eq!(remap(12.0, -24.0, 12.0, 400.0, 0.0), 0.0);
        assert_eq!(remap(-6.0, -24.0, 12.0, 400.0, 0.0), 200.0);
    }
}
