//! Overlay node model.
//!
//! A node is a positioned, styled element on the stage: either a block of
//! text or an image. Geometry and stacking live on [`Node`]; content and
//! type-specific style live on [`NodeKind`].
//!
//! Style fields are `Option` on purpose: a field that is `None` was never
//! set (by a control or by an imported document), and rendering falls back
//! to the stylesheet default for it.

use crate::color::Rgba;
use crate::geometry::{clamp_font_px, clamp_unit};
use crate::id::NodeId;
use crate::rotation::Rotation;
use kurbo::{Point, Rect, Size};

/// Font size assumed for text nodes that never had one set.
pub const DEFAULT_FONT_PX: f64 = 24.0;
/// Box size assumed for image nodes without an explicit extent.
pub const DEFAULT_IMAGE_PX: f64 = 200.0;

// ─── Style enums ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }

    /// Accepts keywords and numeric weights; 600 and above count as bold.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "bold" | "bolder" => Some(FontWeight::Bold),
            "normal" | "lighter" => Some(FontWeight::Normal),
            _ => s.parse::<u16>().ok().map(Self::from_numeric),
        }
    }

    pub fn from_numeric(weight: u16) -> Self {
        if weight >= 600 {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(FontStyle::Normal),
            "italic" | "oblique" => Some(FontStyle::Italic),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FontStyle::Normal => FontStyle::Italic,
            FontStyle::Italic => FontStyle::Normal,
        }
    }
}

/// How an image fills its node box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
    Fill,
    None,
    ScaleDown,
}

impl ObjectFit {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectFit::Contain => "contain",
            ObjectFit::Cover => "cover",
            ObjectFit::Fill => "fill",
            ObjectFit::None => "none",
            ObjectFit::ScaleDown => "scale-down",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contain" => Some(ObjectFit::Contain),
            "cover" => Some(ObjectFit::Cover),
            "fill" => Some(ObjectFit::Fill),
            "none" => Some(ObjectFit::None),
            "scale-down" => Some(ObjectFit::ScaleDown),
            _ => None,
        }
    }
}

// ─── Text style ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub font_family: Option<String>,
    /// Always within `[MIN_FONT_PX, MAX_FONT_PX]` when set.
    pub font_size_px: Option<f64>,
    pub color: Option<Rgba>,
    /// Alpha 0 renders as transparent.
    pub background_color: Option<Rgba>,
    pub text_align: Option<TextAlign>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub underline: Option<bool>,
}

impl TextStyle {
    pub fn font_px(&self) -> f64 {
        self.font_size_px.unwrap_or(DEFAULT_FONT_PX)
    }

    /// Store a font size, clamped into the allowed range. Returns the stored value.
    pub fn set_font_px(&mut self, px: f64) -> f64 {
        let px = clamp_font_px(px);
        self.font_size_px = Some(px);
        px
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == Some(FontWeight::Bold)
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == Some(FontStyle::Italic)
    }

    pub fn is_underlined(&self) -> bool {
        self.underline.unwrap_or(false)
    }
}

// ─── Text measurement ────────────────────────────────────────────────────

/// Sizes a text box from its content when no explicit extent is set.
pub trait TextMeasure {
    fn measure(&self, content: &str, font_px: f64) -> Size;
}

/// Fixed-advance approximation: every glyph is `advance` em wide and every
/// line `line_height` em tall, plus padding on each side.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasure {
    pub advance: f64,
    pub line_height: f64,
    pub padding: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
            padding: 4.0,
        }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, content: &str, font_px: f64) -> Size {
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in content.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        Size::new(
            widest.max(1) as f64 * font_px * self.advance + self.padding * 2.0,
            lines as f64 * font_px * self.line_height + self.padding * 2.0,
        )
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Text {
        content: String,
        style: TextStyle,
    },
    Image {
        /// A URL or an embedded `data:` payload.
        source: String,
        object_fit: Option<ObjectFit>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Top-left corner, stage-relative.
    pub origin: Point,
    /// Explicit extent. `None` means derived (from content for text,
    /// `DEFAULT_IMAGE_PX` for images).
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Stacking order, always >= 1. Ties render in insertion order.
    pub z_index: u32,
    pub rotation: Rotation,
    /// 0.0 ..= 1.0
    pub opacity: f64,
}

impl Node {
    pub fn text(id: NodeId, content: impl Into<String>, style: TextStyle) -> Self {
        Self::with_kind(
            id,
            NodeKind::Text {
                content: content.into(),
                style,
            },
        )
    }

    pub fn image(id: NodeId, source: impl Into<String>) -> Self {
        Self::with_kind(
            id,
            NodeKind::Image {
                source: source.into(),
                object_fit: Some(ObjectFit::Contain),
            },
        )
    }

    fn with_kind(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            origin: Point::ORIGIN,
            width: None,
            height: None,
            z_index: 1,
            rotation: Rotation::NONE,
            opacity: 1.0,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Text { .. } => "text",
            NodeKind::Image { .. } => "image",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            NodeKind::Text { style, .. } => Some(style),
            NodeKind::Image { .. } => None,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            NodeKind::Text { style, .. } => Some(style),
            NodeKind::Image { .. } => None,
        }
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = clamp_unit(opacity);
    }

    /// The rendered box size: explicit extents where set, derived otherwise.
    pub fn box_size(&self, measure: &dyn TextMeasure) -> Size {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Size::new(w, h),
            (w, h) => {
                let derived = match &self.kind {
                    NodeKind::Text { content, style } => measure.measure(content, style.font_px()),
                    NodeKind::Image { .. } => Size::new(DEFAULT_IMAGE_PX, DEFAULT_IMAGE_PX),
                };
                Size::new(w.unwrap_or(derived.width), h.unwrap_or(derived.height))
            }
        }
    }

    pub fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        Rect::from_origin_size(self.origin, self.box_size(measure))
    }

    /// Pin both extents to the current box size.
    pub fn set_size(&mut self, size: Size) {
        self.width = Some(size.width);
        self.height = Some(size.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IdAllocator;

    #[test]
    fn text_box_derives_from_content() {
        let mut ids = IdAllocator::new();
        let measure = ApproxTextMeasure::default();
        let short = Node::text(ids.next_id(), "ab", TextStyle::default());
        let long = Node::text(ids.next_id(), "abcdef", TextStyle::default());
        assert!(long.box_size(&measure).width > short.box_size(&measure).width);

        let two_lines = Node::text(ids.next_id(), "ab\ncd", TextStyle::default());
        assert!(two_lines.box_size(&measure).height > short.box_size(&measure).height);
    }

    #[test]
    fn explicit_extent_wins() {
        let mut ids = IdAllocator::new();
        let measure = ApproxTextMeasure::default();
        let mut node = Node::text(ids.next_id(), "hello", TextStyle::default());
        node.width = Some(321.0);
        let size = node.box_size(&measure);
        assert_eq!(size.width, 321.0);
        assert!(size.height > 0.0);
    }

    #[test]
    fn image_defaults_to_square_box() {
        let mut ids = IdAllocator::new();
        let node = Node::image(ids.next_id(), "a.png");
        assert_eq!(
            node.box_size(&ApproxTextMeasure::default()),
            Size::new(DEFAULT_IMAGE_PX, DEFAULT_IMAGE_PX)
        );
    }

    #[test]
    fn style_keywords_parse() {
        assert_eq!(TextAlign::parse(" Center "), Some(TextAlign::Center));
        assert_eq!(TextAlign::parse("start"), Some(TextAlign::Left));
        assert_eq!(ObjectFit::parse("scale-down"), Some(ObjectFit::ScaleDown));
        assert_eq!(ObjectFit::parse("COVER"), Some(ObjectFit::Cover));
        assert_eq!(ObjectFit::parse("stretch"), None);
    }

    #[test]
    fn font_size_is_clamped() {
        let mut style = TextStyle::default();
        assert_eq!(style.set_font_px(400.0), 300.0);
        assert_eq!(style.font_size_px, Some(300.0));
        assert_eq!(style.set_font_px(1.0), 8.0);
    }

    #[test]
    fn weight_parsing() {
        assert_eq!(FontWeight::parse("700"), Some(FontWeight::Bold));
        assert_eq!(FontWeight::parse("bold"), Some(FontWeight::Bold));
        assert_eq!(FontWeight::parse("400"), Some(FontWeight::Normal));
        assert_eq!(FontWeight::parse("heavy"), None);
    }
}
