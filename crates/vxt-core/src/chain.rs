//! Fixed-topology mono filter chain: LowCut(4) → Peak → HighCut(4).
//!
//! Variable filter order is realized with bypass flags over a fixed set of
//! stage slots. Changing slope never allocates or reshapes the chain; it
//! only flips which cut stages run.

use crate::biquad::{Biquad, BiquadCoefficients};
use crate::design::{ChainCoefficients, CutCascade, MAX_CUT_STAGES};
use crate::settings::{ChainSettings, Slope};
use crate::snapshot::ChainSnapshot;

/// Which cut section of the chain to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutSide {
    /// Highpass cascade at the head of the chain.
    Low,
    /// Lowpass cascade at the tail of the chain.
    High,
}

/// Up to four biquad stages with a bypass flag each.
#[derive(Debug, Clone)]
pub struct CutFilter {
    stages: [Biquad; MAX_CUT_STAGES],
    bypassed: [bool; MAX_CUT_STAGES],
}

impl CutFilter {
    /// All stages bypassed, passthrough coefficients.
    pub fn new() -> Self {
        Self {
            stages: core::array::from_fn(|_| Biquad::new()),
            bypassed: [true; MAX_CUT_STAGES],
        }
    }

    /// Whether stage `index` is bypassed. Out-of-range indices report `true`.
    pub fn is_bypassed(&self, index: usize) -> bool {
        self.bypassed.get(index).copied().unwrap_or(true)
    }

    /// Number of stages currently running.
    pub fn active_stages(&self) -> usize {
        self.bypassed.iter().filter(|b| !**b).count()
    }

    /// Coefficients held by stage `index`.
    pub fn stage_coefficients(&self, index: usize) -> Option<&BiquadCoefficients> {
        self.stages.get(index).map(Biquad::coefficients)
    }

    fn bypass_all(&mut self) {
        self.bypassed = [true; MAX_CUT_STAGES];
    }

    /// Loads `cascade` for `slope`: everything is bypassed first, then each
    /// stage is filled and enabled in turn. Stops at the first missing or
    /// non-finite block, leaving that stage and the rest bypassed.
    fn load(&mut self, cascade: &CutCascade, slope: Slope) {
        self.bypass_all();
        for index in 0..slope.stages().min(MAX_CUT_STAGES) {
            let Some(block) = cascade.get(index) else {
                break;
            };
            if !block.is_finite() {
                break;
            }
            self.stages[index].set_coefficients(block);
            self.bypassed[index] = false;
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut sample = input;
        for (stage, bypassed) in self.stages.iter_mut().zip(self.bypassed.iter()) {
            if !*bypassed {
                sample = stage.process(sample);
            }
        }
        sample
    }

    fn clear(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
    }

    pub(crate) fn export(&self) -> ([BiquadCoefficients; MAX_CUT_STAGES], [bool; MAX_CUT_STAGES]) {
        let coefficients = core::array::from_fn(|i| *self.stages[i].coefficients());
        let active = core::array::from_fn(|i| !self.bypassed[i]);
        (coefficients, active)
    }
}

impl Default for CutFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// One channel's filter chain.
///
/// The peak stage always runs in the audio path. At 0 dB its zeros and
/// poles coincide, so it passes the signal through up to f32 rounding and
/// is left out of the drawn response.
///
/// ```rust
/// use vxt_core::{ChainSettings, MonoChain, design_chain};
///
/// let settings = ChainSettings::default();
/// let coefficients = design_chain(&settings, 48000.0).unwrap();
///
/// let mut chain = MonoChain::new();
/// chain.apply(&coefficients, &settings);
///
/// let mut block = [0.0f32; 64];
/// block[0] = 1.0;
/// chain.process_in_place(&mut block);
/// ```
#[derive(Debug, Clone)]
pub struct MonoChain {
    low_cut: CutFilter,
    peak: Biquad,
    high_cut: CutFilter,
}

impl MonoChain {
    /// A chain with every cut stage bypassed and a passthrough peak.
    pub fn new() -> Self {
        Self {
            low_cut: CutFilter::new(),
            peak: Biquad::new(),
            high_cut: CutFilter::new(),
        }
    }

    /// Replaces the peak coefficients.
    pub fn set_peak_coefficients(&mut self, coefficients: &BiquadCoefficients) {
        self.peak.set_coefficients(coefficients);
    }

    /// Loads a cut cascade into `side` for the given slope.
    pub fn set_cut_coefficients(&mut self, side: CutSide, cascade: &CutCascade, slope: Slope) {
        self.cut_mut(side).load(cascade, slope);
    }

    /// Applies a fully designed coefficient set.
    pub fn apply(&mut self, coefficients: &ChainCoefficients, settings: &ChainSettings) {
        self.set_peak_coefficients(&coefficients.peak);
        self.set_cut_coefficients(CutSide::Low, &coefficients.low_cut, settings.low_cut_slope);
        self.set_cut_coefficients(CutSide::High, &coefficients.high_cut, settings.high_cut_slope);
    }

    /// Processes one sample through low-cut, peak and high-cut.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let sample = self.low_cut.process(input);
        let sample = self.peak.process(sample);
        self.high_cut.process(sample)
    }

    /// Processes a block in place.
    pub fn process_in_place(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears all delay lines and bypasses every cut stage.
    pub fn reset(&mut self) {
        self.low_cut.clear();
        self.low_cut.bypass_all();
        self.peak.clear();
        self.high_cut.clear();
        self.high_cut.bypass_all();
    }

    /// The cut filter on `side`.
    pub fn cut(&self, side: CutSide) -> &CutFilter {
        match side {
            CutSide::Low => &self.low_cut,
            CutSide::High => &self.high_cut,
        }
    }

    fn cut_mut(&mut self, side: CutSide) -> &mut CutFilter {
        match side {
            CutSide::Low => &mut self.low_cut,
            CutSide::High => &mut self.high_cut,
        }
    }

    /// Whether stage `index` of `side` is bypassed.
    pub fn is_bypassed(&self, side: CutSide, index: usize) -> bool {
        self.cut(side).is_bypassed(index)
    }

    /// Current peak coefficients.
    pub fn peak_coefficients(&self) -> &BiquadCoefficients {
        self.peak.coefficients()
    }

    /// Captures the committed coefficients and bypass state.
    pub fn snapshot(&self, sample_rate: f32, settings: &ChainSettings) -> ChainSnapshot {
        let (low_cut, low_active) = self.low_cut.export();
        let (high_cut, high_active) = self.high_cut.export();
        let peak = *self.peak.coefficients();
        ChainSnapshot {
            sample_rate,
            settings: *settings,
            peak,
            peak_active: !peak.is_neutral(),
            low_cut,
            low_active,
            high_cut,
            high_active,
        }
    }
}

impl Default for MonoChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{CutKind, design_chain, design_cut_cascade};

    #[test]
    fn new_chain_is_passthrough() {
        let mut chain = MonoChain::new();
        let mut block = [0.25f32, -0.5, 1.0, 0.0];
        let expected = block;
        chain.process_in_place(&mut block);
        assert_eq!(block, expected);
        for i in 0..MAX_CUT_STAGES {
            assert!(chain.is_bypassed(CutSide::Low, i));
            assert!(chain.is_bypassed(CutSide::High, i));
        }
    }

    #[test]
    fn twelve_db_low_cut_enables_one_stage() {
        let cascade = design_cut_cascade(CutKind::LowCut, 20.0, 44100.0, 2).unwrap();
        let mut chain = MonoChain::new();
        chain.set_cut_coefficients(CutSide::Low, &cascade, Slope::Db12);

        assert!(!chain.is_bypassed(CutSide::Low, 0));
        for i in 1..MAX_CUT_STAGES {
            assert!(chain.is_bypassed(CutSide::Low, i));
        }
        assert_eq!(chain.cut(CutSide::Low).active_stages(), 1);
        assert_eq!(chain.cut(CutSide::High).active_stages(), 0);
    }

    #[test]
    fn lowering_slope_bypasses_upper_stages() {
        let mut chain = MonoChain::new();
        let steep = design_cut_cascade(CutKind::HighCut, 5000.0, 48000.0, 8).unwrap();
        chain.set_cut_coefficients(CutSide::High, &steep, Slope::Db48);
        assert_eq!(chain.cut(CutSide::High).active_stages(), 4);

        let shallow = design_cut_cascade(CutKind::HighCut, 5000.0, 48000.0, 4).unwrap();
        chain.set_cut_coefficients(CutSide::High, &shallow, Slope::Db24);
        assert_eq!(chain.cut(CutSide::High).active_stages(), 2);
        assert!(chain.is_bypassed(CutSide::High, 2));
        assert!(chain.is_bypassed(CutSide::High, 3));
    }

    #[test]
    fn short_cascade_leaves_rest_bypassed() {
        // Slope asks for 4 stages but only 2 blocks were designed.
        let cascade = design_cut_cascade(CutKind::LowCut, 100.0, 48000.0, 4).unwrap();
        let mut chain = MonoChain::new();
        chain.set_cut_coefficients(CutSide::Low, &cascade, Slope::Db48);

        assert!(!chain.is_bypassed(CutSide::Low, 0));
        assert!(!chain.is_bypassed(CutSide::Low, 1));
        assert!(chain.is_bypassed(CutSide::Low, 2));
        assert!(chain.is_bypassed(CutSide::Low, 3));
    }

    #[test]
    fn non_finite_block_stops_loading() {
        let mut cascade = CutCascade::new();
        cascade.push(BiquadCoefficients::highpass(100.0, 0.7, 48000.0));
        cascade.push(BiquadCoefficients {
            b0: f32::NAN,
            ..BiquadCoefficients::IDENTITY
        });
        cascade.push(BiquadCoefficients::highpass(100.0, 0.7, 48000.0));

        let mut chain = MonoChain::new();
        chain.set_cut_coefficients(CutSide::Low, &cascade, Slope::Db36);
        assert!(!chain.is_bypassed(CutSide::Low, 0));
        assert!(chain.is_bypassed(CutSide::Low, 1));
        assert!(chain.is_bypassed(CutSide::Low, 2));
        assert!(
            chain
                .cut(CutSide::Low)
                .stage_coefficients(1)
                .unwrap()
                .is_finite()
        );
    }

    #[test]
    fn apply_is_idempotent() {
        let settings = ChainSettings {
            low_cut_freq: 80.0,
            low_cut_slope: Slope::Db36,
            high_cut_freq: 9000.0,
            high_cut_slope: Slope::Db12,
            peak_freq: 1500.0,
            peak_gain_db: 6.0,
            peak_q: 2.0,
        };
        let coefficients = design_chain(&settings, 48000.0).unwrap();

        let mut chain = MonoChain::new();
        chain.apply(&coefficients, &settings);
        let first = chain.snapshot(48000.0, &settings);
        chain.apply(&coefficients, &settings);
        let second = chain.snapshot(48000.0, &settings);

        assert_eq!(first, second);
        assert!(first.peak_active);
        assert_eq!(first.low_active, [true, true, true, false]);
        assert_eq!(first.high_active, [true, false, false, false]);
    }

    #[test]
    fn reset_clears_and_bypasses() {
        let settings = ChainSettings::default();
        let coefficients = design_chain(&settings, 48000.0).unwrap();
        let mut chain = MonoChain::new();
        chain.apply(&coefficients, &settings);
        chain.process_in_place(&mut [1.0; 32]);

        chain.reset();
        assert_eq!(chain.cut(CutSide::Low).active_stages(), 0);
        assert_eq!(chain.cut(CutSide::High).active_stages(), 0);
        assert_eq!(chain.process(0.0), 0.0);
    }

    #[test]
    fn zero_gain_peak_passes_signal_within_rounding() {
        let settings = ChainSettings::default();
        let coefficients = design_chain(&settings, 48000.0).unwrap();
        let mut chain = MonoChain::new();
        chain.set_peak_coefficients(&coefficients.peak);

        let input: [f32; 8] = [0.1, -0.3, 0.7, 0.0, -1.0, 0.5, 0.25, -0.125];
        let mut block = input;
        chain.process_in_place(&mut block);
        for (out, inp) in block.iter().zip(input.iter()) {
            assert!((out - inp).abs() < 1e-6);
        }
        assert!(!chain.snapshot(48000.0, &settings).peak_active);
    }
}
