//! Editor configuration, injected once at construction.

use overlay_core::{MAX_FONT_PX, MIN_FONT_PX, Rgba, Size, Stage, Vec2};

#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Initial stage extent. Layout changes go through `OverlayEditor::set_stage_size`.
    pub stage: Stage,

    /// Side of the square resize hot-zone at a node's bottom-right corner.
    pub resize_hot_zone: f64,
    /// Smallest box a resize may produce.
    pub min_size: Size,

    pub min_font_px: f64,
    pub max_font_px: f64,

    /// Content, family and size given to freshly added text nodes.
    pub default_text: String,
    pub default_font_family: String,
    pub default_font_px: f64,
    pub default_image_size: Size,

    /// Where new nodes land, as a fraction of the stage extent.
    pub placement: (f64, f64),

    /// Offset applied to duplicated nodes.
    pub duplicate_offset: Vec2,

    pub nudge_step: f64,
    pub nudge_step_large: f64,

    /// First value of the z counter; the first new node gets `initial_z + 1`.
    pub initial_z: u32,

    /// Shown in the color controls when nothing is selected or the node
    /// never had a color set.
    pub fallback_text_color: Rgba,
    pub fallback_background: Rgba,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            stage: Stage::default(),
            resize_hot_zone: 14.0,
            min_size: Size::new(20.0, 20.0),
            min_font_px: MIN_FONT_PX,
            max_font_px: MAX_FONT_PX,
            default_text: "Double-click to edit".to_string(),
            default_font_family: "Inter, system-ui, sans-serif".to_string(),
            default_font_px: 24.0,
            default_image_size: Size::new(200.0, 200.0),
            placement: (0.1, 0.1),
            duplicate_offset: Vec2::new(10.0, 10.0),
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            initial_z: 10,
            fallback_text_color: Rgba::WHITE,
            fallback_background: Rgba::TRANSPARENT,
        }
    }
}

impl EditorConfig {
    pub fn with_stage(mut self, width: f64, height: f64) -> Self {
        self.stage = Stage::new(width, height);
        self
    }
}
