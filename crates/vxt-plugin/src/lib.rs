//! Host-facing runtime for the VxT EQ.
//!
//! This crate connects the DSP in `vxt-core` to the threads of an audio
//! host: a lock-free parameter store shared by every thread, the real-time
//! block processor, and versioned state persistence.
//!
//! # Architecture
//!
//! ```text
//! host / editor ──► VxtShared::set_value ──► AtomicU32 values ─┐
//!                         │                                     │
//!                         ├─► dirty flag ──► ResponseCurveRenderer::tick
//!                         └─► listeners                         │
//!                                                               ▼
//!                                    VxtAudioProcessor::process_block
//!                                       design_chain (every block)
//!                                       apply to left/right chains
//!                                       publish ChainSnapshot ──► SnapshotCell
//! ```
//!
//! | Type | Thread | Role |
//! |------|--------|------|
//! | [`VxtShared`] | all | parameter values, dirty flag, listeners, committed chain |
//! | [`VxtAudioProcessor`] | audio | per-block design and filtering |
//! | [`state`] functions | main | JSON save, strict load, lenient restore |

pub mod audio;
pub mod error;
pub mod shared;
pub mod state;

pub use audio::{ProcessorState, VxtAudioProcessor};
pub use error::{ProcessError, StateError};
pub use shared::{ListenerId, ParamIndex, VxtShared};
pub use state::{STATE_VERSION, load_state, restore_state_or_default, save_state};
