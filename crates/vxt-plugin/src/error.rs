//! Error types for processing and state persistence.

use vxt_core::EqError;

/// Errors returned by [`VxtAudioProcessor`](crate::VxtAudioProcessor).
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ProcessError {
    /// `process_block` was called before `prepare` or after `release`.
    #[error("processor is not prepared")]
    NotPrepared,

    /// A channel slice is shorter than the requested sample count.
    #[error("channel buffer too short: need {needed} samples, got {available}")]
    BufferTooShort {
        /// Requested samples.
        needed: usize,
        /// Length of the shortest channel.
        available: usize,
    },

    /// Filter configuration or design failed.
    #[error("filter configuration error: {0}")]
    Design(#[from] EqError),
}

/// Errors raised while saving or strictly loading a state blob.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The blob is not valid JSON or could not be serialized.
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value (or the params table) is not a JSON object.
    #[error("state is not a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("state is missing field '{0}'")]
    MissingField(&'static str),

    /// The blob was written by an incompatible format version.
    #[error("unsupported state version: {0}")]
    UnsupportedVersion(u64),

    /// A known parameter ID carries a non-numeric or non-finite value.
    #[error("invalid value for parameter {0}")]
    InvalidValue(String),
}
