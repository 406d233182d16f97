//! Visual styling for the VxT EQ editor.

use egui::{Color32, CornerRadius, Stroke, Style, Visuals};

/// Theme colors and strokes.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main window background color.
    pub background: Color32,
    /// Response area background color.
    pub plot_bg: Color32,
    /// Response curve color.
    pub curve: Color32,
    /// Response curve line width.
    pub curve_width: f32,
    /// Border drawn around the response area.
    pub border: Color32,
    /// Border line width.
    pub border_width: f32,
    /// Border corner radius.
    pub border_radius: u8,
    /// Primary text color.
    pub text_primary: Color32,
    /// Secondary/muted text color.
    pub text_secondary: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(25, 25, 30),
            plot_bg: Color32::from_rgb(18, 18, 22),
            curve: Color32::WHITE,
            curve_width: 2.0,
            border: Color32::from_rgb(255, 165, 0),
            border_width: 1.0,
            border_radius: 4,
            text_primary: Color32::from_rgb(230, 230, 235),
            text_secondary: Color32::from_rgb(150, 150, 160),
        }
    }
}

impl Theme {
    /// Apply the theme to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = Style::default();
        let mut visuals = Visuals::dark();

        visuals.window_fill = self.background;
        visuals.panel_fill = self.background;
        visuals.extreme_bg_color = self.plot_bg;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.noninteractive.corner_radius = CornerRadius::same(self.border_radius);
        visuals.override_text_color = Some(self.text_primary);

        style.visuals = visuals;
        ctx.set_style(style);
    }

    /// Stroke for the response polyline.
    pub fn curve_stroke(&self) -> Stroke {
        Stroke::new(self.curve_width, self.curve)
    }

    /// Stroke for the fixed border.
    pub fn border_stroke(&self) -> Stroke {
        Stroke::new(self.border_width, self.border)
    }
}
