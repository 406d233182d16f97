//! Shared GUI components for the VxT EQ.
//!
//! This crate turns committed filter state into something drawable. The
//! [`ResponseCurveRenderer`] samples the chain's magnitude response across a
//! log frequency axis, gated by a parameter dirty flag so an unchanged EQ
//! costs nothing per frame. [`RefreshTimer`] caps recomputation at 60 Hz and
//! [`ResponseCurveView`] wraps both as an egui widget.
//!
//! # Modules
//!
//! - [`response_curve`] - [`ResponseSource`] trait and the change-gated renderer
//! - [`timer`] - Fixed-rate refresh timer
//! - [`theme`] - Visual styling constants and egui theme application
//! - [`widgets`] - The response curve widget

pub mod response_curve;
pub mod theme;
pub mod timer;
pub mod widgets;

pub use response_curve::{
    MAX_DB, MAX_FREQUENCY, MIN_DB, MIN_FREQUENCY, PREVIEW_SAMPLE_RATE, ResponseCurveRenderer,
    ResponseSource, db_to_y, frequency_at,
};
pub use theme::Theme;
pub use timer::{DEFAULT_REFRESH_HZ, RefreshTimer};
pub use widgets::ResponseCurveView;
