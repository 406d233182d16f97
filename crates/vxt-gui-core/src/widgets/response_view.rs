//! Response curve widget.

use std::time::Instant;

use egui::{Response, Sense, Shape, StrokeKind, Ui, Vec2, Widget, vec2};

use crate::response_curve::{ResponseCurveRenderer, ResponseSource};
use crate::theme::Theme;
use crate::timer::RefreshTimer;

/// Draws the EQ magnitude response with a fixed rounded border.
///
/// The widget owns no state; the renderer and timer live in the editor so
/// the cached curve survives across frames.
///
/// ```rust,ignore
/// ui.add(ResponseCurveView::new(&mut self.renderer, &mut self.timer, &*self.shared));
/// ```
pub struct ResponseCurveView<'a> {
    renderer: &'a mut ResponseCurveRenderer,
    timer: &'a mut RefreshTimer,
    source: &'a dyn ResponseSource,
    theme: Theme,
    size: Vec2,
}

impl<'a> ResponseCurveView<'a> {
    /// Create a response view.
    pub fn new(
        renderer: &'a mut ResponseCurveRenderer,
        timer: &'a mut RefreshTimer,
        source: &'a dyn ResponseSource,
    ) -> Self {
        Self {
            renderer,
            timer,
            source,
            theme: Theme::default(),
            size: vec2(800.0, 300.0),
        }
    }

    /// Set the drawing size.
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = vec2(width, height);
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl Widget for ResponseCurveView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::hover());

        self.renderer.set_rect(rect);
        if self.timer.poll(Instant::now()) {
            self.renderer.tick(self.source);
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let radius = f32::from(self.theme.border_radius);

            painter.rect_filled(rect, radius, self.theme.plot_bg);

            let points = self.renderer.points();
            if points.len() > 1 {
                painter.add(Shape::line(points.to_vec(), self.theme.curve_stroke()));
            }

            painter.rect_stroke(
                rect,
                radius,
                self.theme.border_stroke(),
                StrokeKind::Inside,
            );
        }

        ui.ctx().request_repaint_after(self.timer.interval());
        response
    }
}
