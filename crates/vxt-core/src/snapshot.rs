//! Committed chain state and its lock-free hand-off.
//!
//! The audio thread publishes a [`ChainSnapshot`] after every coefficient
//! update; the UI thread reads the latest one to draw the response curve.
//! [`SnapshotCell`] is a single-writer sequence lock over atomic words:
//!
//! ```text
//! writer: seq -> odd, store words, seq -> even
//! reader: load seq (retry if odd), load words, reload seq (retry if changed)
//! ```
//!
//! Publishing never blocks, allocates or waits on the reader. Readers retry
//! until they observe a consistent generation, so a torn snapshot is never
//! returned.

use core::sync::atomic::{AtomicU32, Ordering, fence};

use crate::biquad::BiquadCoefficients;
use crate::chain::MonoChain;
use crate::design::{MAX_CUT_STAGES, design_chain};
use crate::error::EqError;
use crate::math::magnitude_to_db;
use crate::settings::{ChainSettings, PARAM_COUNT};

/// Copy of everything needed to evaluate a chain's magnitude response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSnapshot {
    /// Sample rate the coefficients were designed for.
    pub sample_rate: f32,
    /// Settings the coefficients were designed from.
    pub settings: ChainSettings,
    /// Peak section coefficients.
    pub peak: BiquadCoefficients,
    /// `false` when the peak is magnitude-neutral (0 dB gain).
    pub peak_active: bool,
    /// Low-cut stage coefficients.
    pub low_cut: [BiquadCoefficients; MAX_CUT_STAGES],
    /// Which low-cut stages are un-bypassed.
    pub low_active: [bool; MAX_CUT_STAGES],
    /// High-cut stage coefficients.
    pub high_cut: [BiquadCoefficients; MAX_CUT_STAGES],
    /// Which high-cut stages are un-bypassed.
    pub high_active: [bool; MAX_CUT_STAGES],
}

const COEFF_WORDS: usize = 5;

/// Size of the encoded snapshot in 32-bit words.
pub const SNAPSHOT_WORDS: usize =
    1 + PARAM_COUNT + COEFF_WORDS + 1 + 2 * (MAX_CUT_STAGES * COEFF_WORDS + 1);

impl ChainSnapshot {
    /// Designs a chain for `settings` and captures it without touching any
    /// live filter state.
    pub fn design(settings: &ChainSettings, sample_rate: f32) -> Result<Self, EqError> {
        let coefficients = design_chain(settings, sample_rate).inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, sample_rate, "snapshot design rejected settings");
        })?;
        let mut chain = MonoChain::new();
        chain.apply(&coefficients, settings);
        Ok(chain.snapshot(sample_rate, settings))
    }

    /// Combined magnitude `|H|` at `frequency`: product of every active stage.
    pub fn magnitude_at(&self, frequency: f32) -> f64 {
        let sr = self.sample_rate;
        let mut magnitude = 1.0;

        if self.peak_active {
            magnitude *= self.peak.magnitude_at(frequency, sr);
        }
        for (coefficients, active) in self.low_cut.iter().zip(self.low_active.iter()) {
            if *active {
                magnitude *= coefficients.magnitude_at(frequency, sr);
            }
        }
        for (coefficients, active) in self.high_cut.iter().zip(self.high_active.iter()) {
            if *active {
                magnitude *= coefficients.magnitude_at(frequency, sr);
            }
        }
        magnitude
    }

    /// Combined magnitude at `frequency` in dB. Unfloored: may be `-inf`.
    pub fn magnitude_db_at(&self, frequency: f32) -> f64 {
        magnitude_to_db(self.magnitude_at(frequency))
    }

    /// Encodes into a fixed word array.
    pub fn to_words(&self) -> [u32; SNAPSHOT_WORDS] {
        let mut words = [0u32; SNAPSHOT_WORDS];
        let mut writer = WordWriter {
            words: &mut words,
            pos: 0,
        };

        writer.f32(self.sample_rate);
        for value in self.settings.to_values() {
            writer.f32(value);
        }
        writer.coefficients(&self.peak);
        writer.word(u32::from(self.peak_active));
        for coefficients in &self.low_cut {
            writer.coefficients(coefficients);
        }
        writer.word(mask(&self.low_active));
        for coefficients in &self.high_cut {
            writer.coefficients(coefficients);
        }
        writer.word(mask(&self.high_active));

        words
    }

    /// Decodes a word array produced by [`to_words`](Self::to_words).
    pub fn from_words(words: &[u32; SNAPSHOT_WORDS]) -> Self {
        let mut reader = WordReader { words, pos: 0 };

        let sample_rate = reader.f32();
        let mut values = [0.0; PARAM_COUNT];
        for value in &mut values {
            *value = reader.f32();
        }
        let peak = reader.coefficients();
        let peak_active = reader.word() != 0;
        let low_cut = core::array::from_fn(|_| reader.coefficients());
        let low_active = unmask(reader.word());
        let high_cut = core::array::from_fn(|_| reader.coefficients());
        let high_active = unmask(reader.word());

        Self {
            sample_rate,
            settings: ChainSettings::from_values(&values),
            peak,
            peak_active,
            low_cut,
            low_active,
            high_cut,
            high_active,
        }
    }
}

fn mask(active: &[bool; MAX_CUT_STAGES]) -> u32 {
    active
        .iter()
        .enumerate()
        .fold(0, |bits, (i, on)| if *on { bits | (1 << i) } else { bits })
}

fn unmask(bits: u32) -> [bool; MAX_CUT_STAGES] {
    core::array::from_fn(|i| bits & (1 << i) != 0)
}

struct WordWriter<'a> {
    words: &'a mut [u32; SNAPSHOT_WORDS],
    pos: usize,
}

impl WordWriter<'_> {
    fn word(&mut self, word: u32) {
        self.words[self.pos] = word;
        self.pos += 1;
    }

    fn f32(&mut self, value: f32) {
        self.word(value.to_bits());
    }

    fn coefficients(&mut self, c: &BiquadCoefficients) {
        for value in [c.b0, c.b1, c.b2, c.a1, c.a2] {
            self.f32(value);
        }
    }
}

struct WordReader<'a> {
    words: &'a [u32; SNAPSHOT_WORDS],
    pos: usize,
}

impl WordReader<'_> {
    fn word(&mut self) -> u32 {
        let word = self.words[self.pos];
        self.pos += 1;
        word
    }

    fn f32(&mut self) -> f32 {
        f32::from_bits(self.word())
    }

    fn coefficients(&mut self) -> BiquadCoefficients {
        BiquadCoefficients {
            b0: self.f32(),
            b1: self.f32(),
            b2: self.f32(),
            a1: self.f32(),
            a2: self.f32(),
        }
    }
}

/// Single-writer, multi-reader sequence lock holding one [`ChainSnapshot`].
///
/// Only one thread may call [`publish`](Self::publish) at a time (the audio
/// thread). Any number of threads may [`read`](Self::read).
pub struct SnapshotCell {
    sequence: AtomicU32,
    words: [AtomicU32; SNAPSHOT_WORDS],
}

impl SnapshotCell {
    /// An empty cell; [`read`](Self::read) returns `None` until the first
    /// publish.
    pub fn new() -> Self {
        Self {
            sequence: AtomicU32::new(0),
            words: core::array::from_fn(|_| AtomicU32::new(0)),
        }
    }

    /// Stores `snapshot`. Wait-free for the writer.
    pub fn publish(&self, snapshot: &ChainSnapshot) {
        let seq = self.sequence.load(Ordering::Relaxed);
        self.sequence.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        for (slot, word) in self.words.iter().zip(snapshot.to_words()) {
            slot.store(word, Ordering::Relaxed);
        }

        // Zero is reserved for "never published".
        let next = match seq.wrapping_add(2) {
            0 => 2,
            n => n,
        };
        self.sequence.store(next, Ordering::Release);
    }

    /// Latest published snapshot, or `None` if nothing was published yet.
    pub fn read(&self) -> Option<ChainSnapshot> {
        let mut words = [0u32; SNAPSHOT_WORDS];
        loop {
            let before = self.sequence.load(Ordering::Acquire);
            if before == 0 {
                return None;
            }
            if before & 1 == 1 {
                core::hint::spin_loop();
                continue;
            }

            for (word, slot) in words.iter_mut().zip(self.words.iter()) {
                *word = slot.load(Ordering::Relaxed);
            }

            fence(Ordering::Acquire);
            if self.sequence.load(Ordering::Relaxed) == before {
                return Some(ChainSnapshot::from_words(&words));
            }
        }
    }

    /// Number of completed publishes (wrapping).
    pub fn generation(&self) -> u32 {
        self.sequence.load(Ordering::Acquire) / 2
    }
}

impl Default for SnapshotCell {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SnapshotCell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnapshotCell")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Slope;

    fn sample_settings() -> ChainSettings {
        ChainSettings {
            low_cut_freq: 120.0,
            low_cut_slope: Slope::Db48,
            high_cut_freq: 8000.0,
            high_cut_slope: Slope::Db12,
            peak_freq: 750.0,
            peak_gain_db: -9.0,
            peak_q: 3.5,
        }
    }

    #[test]
    fn words_roundtrip() {
        let snapshot = ChainSnapshot::design(&sample_settings(), 44100.0).unwrap();
        let back = ChainSnapshot::from_words(&snapshot.to_words());
        assert_eq!(snapshot, back);
        assert_eq!(back.low_active, [true; 4]);
        assert_eq!(back.high_active, [true, false, false, false]);
    }

    #[test]
    fn empty_cell_reads_none() {
        let cell = SnapshotCell::new();
        assert!(cell.read().is_none());
        assert_eq!(cell.generation(), 0);
    }

    #[test]
    fn publish_then_read() {
        let cell = SnapshotCell::new();
        let snapshot = ChainSnapshot::design(&ChainSettings::default(), 48000.0).unwrap();
        cell.publish(&snapshot);
        assert_eq!(cell.read(), Some(snapshot));
        assert_eq!(cell.generation(), 1);
    }

    #[test]
    fn neutral_peak_contributes_nothing() {
        let snapshot = ChainSnapshot::design(&ChainSettings::default(), 48000.0).unwrap();
        assert!(!snapshot.peak_active);
        // Default cuts sit at the band edges; mid-band is flat.
        assert!(snapshot.magnitude_db_at(1000.0).abs() < 0.01);
    }

    #[test]
    fn concurrent_reads_are_never_torn() {
        use std::sync::Arc;
        use std::sync::atomic::AtomicBool;

        let cell = Arc::new(SnapshotCell::new());
        let done = Arc::new(AtomicBool::new(false));

        // Every field of generation g carries g, so a torn read shows up as
        // a mismatch between fields.
        let stamped = |g: u32| {
            let v = g as f32;
            let c = BiquadCoefficients {
                b0: v,
                b1: v,
                b2: v,
                a1: v,
                a2: v,
            };
            ChainSnapshot {
                sample_rate: v,
                settings: ChainSettings {
                    low_cut_freq: v,
                    low_cut_slope: Slope::Db12,
                    high_cut_freq: v,
                    high_cut_slope: Slope::Db12,
                    peak_freq: v,
                    peak_gain_db: v,
                    peak_q: v,
                },
                peak: c,
                peak_active: true,
                low_cut: [c; MAX_CUT_STAGES],
                low_active: [true; MAX_CUT_STAGES],
                high_cut: [c; MAX_CUT_STAGES],
                high_active: [true; MAX_CUT_STAGES],
            }
        };

        let writer = {
            let cell = Arc::clone(&cell);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                for g in 1..20_000u32 {
                    cell.publish(&stamped(g));
                }
                done.store(true, Ordering::Release);
            })
        };

        let mut reads = 0u32;
        while !done.load(Ordering::Acquire) || reads == 0 {
            if let Some(snapshot) = cell.read() {
                let g = snapshot.sample_rate;
                assert_eq!(snapshot, stamped(g as u32), "torn snapshot at {g}");
                reads += 1;
            }
        }
        writer.join().unwrap();
        assert!(reads > 0);
    }
}
