//! Audio-specific egui widgets.

mod response_view;

pub use response_view::ResponseCurveView;
