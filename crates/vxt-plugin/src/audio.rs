//! Audio processor for the VxT EQ.
//!
//! Handles the real-time block callback: snapshots the parameter store,
//! redesigns and applies coefficients for both channels, publishes the
//! committed chain for the editor, and filters the buffers in place.
//!
//! Coefficients are redesigned on every block regardless of whether a
//! parameter moved, so automation is tracked block by block. Nothing in
//! [`VxtAudioProcessor::process_block`] allocates, locks or logs.

use vxt_core::{ChainSettings, EqError, MonoChain, design_chain, validate_sample_rate};

use crate::error::ProcessError;
use crate::shared::VxtShared;

/// Lifecycle of a [`VxtAudioProcessor`].
///
/// ```text
/// Uninitialized --prepare--> Prepared --process_block--> Processing
///                               ^                            |
///                               +--prepare-- Released <--release
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Created, never prepared.
    Uninitialized,
    /// Prepared with a sample rate and block size; no block processed yet.
    Prepared,
    /// At least one block processed since the last prepare.
    Processing,
    /// Released by the host; must be prepared again before processing.
    Released,
}

/// Stereo EQ processor: one [`MonoChain`] per channel.
pub struct VxtAudioProcessor {
    shared: VxtShared,
    left: MonoChain,
    right: MonoChain,
    sample_rate: f32,
    max_block_size: usize,
    state: ProcessorState,
}

impl VxtAudioProcessor {
    /// Creates an unprepared processor reading parameters from `shared`.
    pub fn new(shared: VxtShared) -> Self {
        Self {
            shared,
            left: MonoChain::new(),
            right: MonoChain::new(),
            sample_rate: 0.0,
            max_block_size: 0,
            state: ProcessorState::Uninitialized,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Sample rate from the last successful `prepare`.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Block size from the last successful `prepare`.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// The parameter store this processor reads.
    pub fn shared(&self) -> &VxtShared {
        &self.shared
    }

    /// Filter chain for `channel` (0 = left, 1 = right).
    pub fn chain(&self, channel: usize) -> Option<&MonoChain> {
        match channel {
            0 => Some(&self.left),
            1 => Some(&self.right),
            _ => None,
        }
    }

    /// Prepares for playback.
    ///
    /// A sample rate [`validate_sample_rate`] rejects (non-finite, or at or
    /// below about 2.1 Hz), or a zero block size, is rejected and leaves the processor untouched. On success both chains
    /// are reset, loaded from the current parameters, and the initial
    /// snapshot is published.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), ProcessError> {
        let sample_rate = validate_sample_rate(sample_rate).inspect_err(|err| {
            tracing::warn!(error = %err, "rejecting prepare");
        })?;
        if max_block_size == 0 {
            tracing::warn!("rejecting prepare: zero block size");
            return Err(EqError::InvalidBlockSize(max_block_size).into());
        }

        let settings = self.shared.chain_settings();
        let coefficients = design_chain(&settings, sample_rate)?;

        self.left.reset();
        self.right.reset();
        self.left.apply(&coefficients, &settings);
        self.right.apply(&coefficients, &settings);
        self.shared
            .publish_snapshot(&self.left.snapshot(sample_rate, &settings));

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.state = ProcessorState::Prepared;
        tracing::info!(sample_rate, max_block_size, "processor prepared");
        Ok(())
    }

    /// Stops processing. The processor can be prepared again afterwards.
    pub fn release(&mut self) {
        if matches!(
            self.state,
            ProcessorState::Prepared | ProcessorState::Processing
        ) {
            tracing::info!("processor released");
        }
        self.left.reset();
        self.right.reset();
        self.state = ProcessorState::Released;
    }

    /// Clears filter memory without changing the lifecycle state.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    /// Processes one block in place using the current parameters.
    ///
    /// `channels[..num_inputs]` hold input audio; channels from `num_inputs`
    /// on are output-only and are zeroed first. Channel 0 runs through the
    /// left chain and channel 1 through the right chain; further input
    /// channels pass through.
    pub fn process_block(
        &mut self,
        channels: &mut [&mut [f32]],
        num_inputs: usize,
        num_samples: usize,
    ) -> Result<(), ProcessError> {
        let settings = self.shared.chain_settings();
        self.process_block_with(&settings, channels, num_inputs, num_samples)
    }

    /// Like [`process_block`](Self::process_block) with explicit settings.
    ///
    /// If the settings cannot be designed the error is returned before any
    /// chain or buffer is touched beyond the output clearing step.
    pub fn process_block_with(
        &mut self,
        settings: &ChainSettings,
        channels: &mut [&mut [f32]],
        num_inputs: usize,
        num_samples: usize,
    ) -> Result<(), ProcessError> {
        if !matches!(
            self.state,
            ProcessorState::Prepared | ProcessorState::Processing
        ) {
            return Err(ProcessError::NotPrepared);
        }
        if let Some(short) = channels.iter().find(|c| c.len() < num_samples) {
            return Err(ProcessError::BufferTooShort {
                needed: num_samples,
                available: short.len(),
            });
        }

        for channel in channels.iter_mut().skip(num_inputs) {
            channel[..num_samples].fill(0.0);
        }

        let coefficients = design_chain(settings, self.sample_rate)?;
        self.left.apply(&coefficients, settings);
        self.right.apply(&coefficients, settings);
        self.shared
            .publish_snapshot(&self.left.snapshot(self.sample_rate, settings));
        self.state = ProcessorState::Processing;

        let processed = num_inputs.min(channels.len());
        let mut chains = [&mut self.left, &mut self.right];
        for (channel, chain) in channels[..processed].iter_mut().zip(chains.iter_mut()) {
            chain.process_in_place(&mut channel[..num_samples]);
        }
        Ok(())
    }
}

impl core::fmt::Debug for VxtAudioProcessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VxtAudioProcessor")
            .field("state", &self.state)
            .field("sample_rate", &self.sample_rate)
            .field("max_block_size", &self.max_block_size)
            .finish_non_exhaustive()
    }
}
