//! VxT Core - filter design and chain management for the VxT EQ
//!
//! This crate holds the DSP side of the equalizer: coefficient design, the
//! fixed-topology filter chain, parameter metadata, and the lock-free
//! snapshot used to hand committed filter state to a visualizer. Nothing in
//! the processing path allocates.
//!
//! # Signal Flow
//!
//! ```text
//! input -> LowCut (1-4 highpass biquads) -> Peak (1 biquad) -> HighCut (1-4 lowpass biquads) -> output
//! ```
//!
//! Cut sections are Butterworth filters of order 2, 4, 6 or 8 selected by
//! [`Slope`]. Unused stage slots are bypassed rather than removed, so slope
//! changes never reshape the chain.
//!
//! # Modules
//!
//! - [`biquad`] - [`BiquadCoefficients`] (RBJ cookbook) and the Direct Form I [`Biquad`]
//! - [`design`] - [`design_peak`], [`design_cut_cascade`], [`design_chain`]
//! - [`chain`] - [`MonoChain`] with bypass-then-fill-then-enable updates
//! - [`settings`] - [`ChainSettings`], [`Slope`], the [`PARAMS`] layout
//! - [`snapshot`] - [`ChainSnapshot`] and the [`SnapshotCell`] sequence lock
//! - [`param_info`] - descriptor metadata shared with hosts and UIs
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build without the standard library:
//!
//! ```toml
//! [dependencies]
//! vxt-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use vxt_core::{ChainSettings, MonoChain, Slope, design_chain};
//!
//! let settings = ChainSettings {
//!     low_cut_slope: Slope::Db48,
//!     low_cut_freq: 80.0,
//!     peak_gain_db: 6.0,
//!     ..ChainSettings::default()
//! };
//!
//! let coefficients = design_chain(&settings, 48000.0).unwrap();
//! let mut left = MonoChain::new();
//! left.apply(&coefficients, &settings);
//!
//! let mut block = [0.0f32; 256];
//! left.process_in_place(&mut block);
//!
//! let committed = left.snapshot(48000.0, &settings);
//! assert!(committed.magnitude_db_at(20.0) < -40.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod chain;
pub mod design;
pub mod error;
pub mod math;
pub mod param_info;
pub mod settings;
pub mod snapshot;

pub use biquad::{Biquad, BiquadCoefficients};
pub use chain::{CutFilter, CutSide, MonoChain};
pub use design::{
    ChainCoefficients, CutCascade, CutKind, MAX_CUT_STAGES, butterworth_q, design_chain,
    design_cut_cascade, design_peak,
};
pub use error::{EqError, validate_sample_rate};
pub use math::{db_to_linear, flush_denormal, linear_to_db, magnitude_to_db, remap};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit};
pub use settings::{ChainSettings, EqParam, PARAM_COUNT, PARAMS, Slope};
pub use snapshot::{ChainSnapshot, SNAPSHOT_WORDS, SnapshotCell};
