//! Resize-to-font scaling for text nodes.
//!
//! Baselines are captured once when a resize session starts. Every observed
//! width maps linearly onto a font size, so the result depends only on the
//! total width change and never compounds rounding error across frames.

use overlay_core::clamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScaler {
    pub baseline_width: f64,
    pub baseline_font: f64,
    pub min_font: f64,
    pub max_font: f64,
}

impl FontScaler {
    pub fn new(baseline_width: f64, baseline_font: f64, min_font: f64, max_font: f64) -> Self {
        Self {
            baseline_width,
            baseline_font,
            min_font,
            max_font,
        }
    }

    /// Font size for an observed box width, clamped to the font bounds.
    pub fn font_for_width(&self, width: f64) -> f64 {
        if self.baseline_width <= 0.0 {
            return clamp(self.baseline_font, self.min_font, self.max_font);
        }
        clamp(
            self.baseline_font * (width / self.baseline_width),
            self.min_font,
            self.max_font,
        )
    }
}
