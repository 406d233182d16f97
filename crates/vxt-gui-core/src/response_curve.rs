//! Change-gated magnitude response rendering.
//!
//! The audio path redesigns coefficients every block; the visualizer only
//! recomputes when a parameter actually changed. [`ResponseSource`] exposes
//! the dirty flag and the committed chain state, and
//! [`ResponseCurveRenderer`] turns them into one polyline point per pixel
//! column.
//!
//! # Mapping
//!
//! ```text
//! column i of width w:  freq = 20 * 1000^(i / w)        (20 Hz .. 20 kHz, log)
//! magnitude:            |H| = product of active stages
//! y:                    -24 dB -> bottom, +12 dB -> top (linear in dB)
//! ```

use egui::{Pos2, Rect, pos2};
use vxt_core::{ChainSettings, ChainSnapshot, remap};

/// Left edge of the frequency axis in Hz.
pub const MIN_FREQUENCY: f32 = 20.0;

/// Right edge of the frequency axis in Hz.
pub const MAX_FREQUENCY: f32 = 20000.0;

/// Bottom of the dB axis.
pub const MIN_DB: f64 = -24.0;

/// Top of the dB axis.
pub const MAX_DB: f64 = 12.0;

/// Sample rate used for previews before the audio side has published.
pub const PREVIEW_SAMPLE_RATE: f32 = 48000.0;

/// Where the renderer gets its data.
///
/// Implemented by the plugin's shared parameter store. All methods are
/// called from the UI thread and must not block on the audio thread.
pub trait ResponseSource {
    /// Atomically tests and clears the parameter dirty flag.
    ///
    /// Returns `true` at most once per burst of changes.
    fn take_changed(&self) -> bool;

    /// Current parameter values.
    fn chain_settings(&self) -> ChainSettings;

    /// Chain state last committed by the audio thread, if any.
    fn committed_snapshot(&self) -> Option<ChainSnapshot>;
}

/// Frequency in Hz for column `index` of a `width`-column curve.
pub fn frequency_at(index: usize, width: usize) -> f32 {
    let x = index as f32 / width.max(1) as f32;
    let log_min = MIN_FREQUENCY.log10();
    let log_max = MAX_FREQUENCY.log10();
    10.0f32.powf(log_min + x * (log_max - log_min))
}

/// Vertical position for `db` between `bottom` (at [`MIN_DB`]) and `top`
/// (at [`MAX_DB`]). NaN and out-of-range values clamp to the nearest bound,
/// NaN to the bottom.
pub fn db_to_y(db: f64, bottom: f32, top: f32) -> f32 {
    let db = if db.is_nan() { MIN_DB } else { db.clamp(MIN_DB, MAX_DB) };
    remap(db as f32, MIN_DB as f32, MAX_DB as f32, bottom, top)
}

/// Number of pixel columns in `rect`. Empty, inverted and non-finite
/// widths give zero.
fn column_count(rect: Rect) -> usize {
    let width = rect.width();
    if width.is_finite() && width > 0.0 {
        width as usize
    } else {
        0
    }
}

/// Caches the response polyline and rebuilds it only when needed.
///
/// A rebuild happens on the first tick, after the drawing rect changes,
/// whenever the source reports a parameter change, and when the committed
/// sample rate differs from the one last drawn.
#[derive(Debug)]
pub struct ResponseCurveRenderer {
    rect: Rect,
    points: Vec<Pos2>,
    stale: bool,
    drawn_sample_rate: Option<f32>,
    recompute_count: u64,
}

impl ResponseCurveRenderer {
    /// Creates a renderer for `rect`. Nothing is computed until [`tick`](Self::tick).
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            points: Vec::with_capacity(column_count(rect)),
            stale: true,
            drawn_sample_rate: None,
            recompute_count: 0,
        }
    }

    /// Moves or resizes the drawing area. A different rect forces the next
    /// tick to rebuild.
    pub fn set_rect(&mut self, rect: Rect) {
        if rect != self.rect {
            self.rect = rect;
            self.stale = true;
        }
    }

    /// Current drawing area.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rebuilds the curve if parameters changed since the last tick.
    ///
    /// Returns `true` if the points were recomputed.
    pub fn tick(&mut self, source: &dyn ResponseSource) -> bool {
        let changed = source.take_changed();
        let committed = source.committed_snapshot();
        // A prepare at a new rate publishes without touching any parameter.
        let rate_moved =
            committed.is_some_and(|s| Some(s.sample_rate) != self.drawn_sample_rate);
        if !changed && !self.stale && !rate_moved {
            return false;
        }

        let settings = source.chain_settings();
        let snapshot = match committed {
            Some(snapshot) if snapshot.settings.bit_eq(&settings) => snapshot,
            _ => {
                let sample_rate = committed.map_or(PREVIEW_SAMPLE_RATE, |s| s.sample_rate);
                match ChainSnapshot::design(&settings, sample_rate) {
                    Ok(preview) => preview,
                    Err(_) => match committed {
                        Some(snapshot) => snapshot,
                        // Nothing drawable yet; retry on the next tick.
                        None => {
                            self.stale = true;
                            return false;
                        }
                    },
                }
            }
        };

        self.rebuild(&snapshot);
        self.drawn_sample_rate = Some(snapshot.sample_rate);
        self.stale = false;
        self.recompute_count += 1;
        true
    }

    fn rebuild(&mut self, snapshot: &ChainSnapshot) {
        let width = column_count(self.rect);
        let (bottom, top) = (self.rect.bottom(), self.rect.top());

        self.points.clear();
        for i in 0..width {
            let freq = frequency_at(i, width);
            let db = snapshot.magnitude_db_at(freq);
            let x = self.rect.left() + i as f32;
            self.points.push(pos2(x, db_to_y(db, bottom, top)));
        }
    }

    /// Cached polyline, one point per pixel column.
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Number of rebuilds so far.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }
}
