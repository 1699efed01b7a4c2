//! Style and content controls.
//!
//! `ControlBindings` is the set of values the toolbar shows for the current
//! selection. The host renders it and sends edits back as `ControlInput`.
//! Colors are edited as a hex value plus a separate alpha, so each half of
//! a color edit is composed with the other half currently shown.

use crate::config::EditorConfig;
use overlay_core::{
    FontStyle, FontWeight, Node, NodeKind, Rgba, Rotation, TextAlign, clamp,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ControlBindings {
    /// `false` when nothing is selected.
    pub enabled: bool,
    /// Text-only controls are disabled for image nodes.
    pub text_enabled: bool,
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub color_hex: String,
    pub color_alpha: f64,
    pub background_hex: String,
    pub background_alpha: f64,
    pub text_align: TextAlign,
    pub rotation: i32,
    pub opacity: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl ControlBindings {
    /// Values shown with no selection.
    pub fn cleared(config: &EditorConfig) -> Self {
        let (color_hex, color_alpha) = config.fallback_text_color.decompose();
        let (background_hex, background_alpha) = config.fallback_background.decompose();
        Self {
            enabled: false,
            text_enabled: false,
            text: String::new(),
            font_family: config.default_font_family.clone(),
            font_size: config.default_font_px,
            color_hex,
            color_alpha,
            background_hex,
            background_alpha,
            text_align: TextAlign::Left,
            rotation: 0,
            opacity: 1.0,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    /// Populate from a node's current values. Unset style fields show the
    /// configured fallbacks.
    pub fn from_node(node: &Node, config: &EditorConfig) -> Self {
        let mut bindings = Self::cleared(config);
        bindings.enabled = true;
        bindings.rotation = node.rotation.degrees();
        bindings.opacity = node.opacity;

        if let NodeKind::Text { content, style } = &node.kind {
            bindings.text_enabled = true;
            bindings.text = content.clone();
            if let Some(family) = &style.font_family {
                bindings.font_family = family.clone();
            }
            bindings.font_size = style.font_size_px.unwrap_or(config.default_font_px);
            let (hex, alpha) = style.color.unwrap_or(config.fallback_text_color).decompose();
            bindings.color_hex = hex;
            bindings.color_alpha = alpha;
            let (hex, alpha) = style
                .background_color
                .unwrap_or(config.fallback_background)
                .decompose();
            bindings.background_hex = hex;
            bindings.background_alpha = alpha;
            bindings.text_align = style.text_align.unwrap_or(TextAlign::Left);
            bindings.bold = style.is_bold();
            bindings.italic = style.is_italic();
            bindings.underline = style.is_underlined();
        }
        bindings
    }

    /// Apply one edit to `node`. Returns `false` when the edit does not
    /// apply (a text-only control on an image, an unparsable color).
    ///
    /// The bindings are not updated here; callers repopulate them from the
    /// node so clamped values show as stored.
    pub fn apply(&self, input: &ControlInput, node: &mut Node, config: &EditorConfig) -> bool {
        match input {
            ControlInput::Rotation(deg) => {
                node.rotation = Rotation::from_f64(*deg);
                return true;
            }
            ControlInput::Opacity(opacity) => {
                node.set_opacity(*opacity);
                return true;
            }
            _ => {}
        }

        let NodeKind::Text { content, style } = &mut node.kind else {
            log::debug!("ignoring {:?} for image node {}", input.name(), node.id);
            return false;
        };

        match input {
            ControlInput::Text(text) => *content = text.clone(),
            ControlInput::FontFamily(family) => {
                let family = family.trim();
                style.font_family = (!family.is_empty()).then(|| family.to_string());
            }
            ControlInput::FontSize(px) => {
                style.set_font_px(clamp(*px, config.min_font_px, config.max_font_px));
            }
            ControlInput::TextColor(hex) => match Rgba::compose(hex, self.color_alpha) {
                Some(c) => style.color = Some(c),
                None => return false,
            },
            ControlInput::TextAlpha(alpha) => {
                match Rgba::compose(&self.color_hex, *alpha) {
                    Some(c) => style.color = Some(c),
                    None => return false,
                }
            }
            ControlInput::BackgroundColor(hex) => {
                match Rgba::compose(hex, self.background_alpha) {
                    Some(c) => style.background_color = Some(c),
                    None => return false,
                }
            }
            ControlInput::BackgroundAlpha(alpha) => {
                match Rgba::compose(&self.background_hex, *alpha) {
                    Some(c) => style.background_color = Some(c),
                    None => return false,
                }
            }
            ControlInput::TextAlign(align) => style.text_align = Some(*align),
            ControlInput::ToggleBold => {
                let weight = style.font_weight.unwrap_or(FontWeight::Normal);
                style.font_weight = Some(weight.toggled());
            }
            ControlInput::ToggleItalic => {
                let font_style = style.font_style.unwrap_or(FontStyle::Normal);
                style.font_style = Some(font_style.toggled());
            }
            ControlInput::ToggleUnderline => {
                style.underline = Some(!style.is_underlined());
            }
            ControlInput::Rotation(_) | ControlInput::Opacity(_) => {}
        }
        true
    }
}

/// One edit from a style or content control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlInput {
    Text(String),
    FontFamily(String),
    /// Clamped into the configured font bounds.
    FontSize(f64),
    /// `#rrggbb`, composed with the alpha currently shown.
    TextColor(String),
    TextAlpha(f64),
    BackgroundColor(String),
    BackgroundAlpha(f64),
    TextAlign(TextAlign),
    Rotation(f64),
    Opacity(f64),
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
}

impl ControlInput {
    pub fn name(&self) -> &'static str {
        match self {
            ControlInput::Text(_) => "text",
            ControlInput::FontFamily(_) => "font-family",
            ControlInput::FontSize(_) => "font-size",
            ControlInput::TextColor(_) => "color",
            ControlInput::TextAlpha(_) => "color-alpha",
            ControlInput::BackgroundColor(_) => "background",
            ControlInput::BackgroundAlpha(_) => "background-alpha",
            ControlInput::TextAlign(_) => "text-align",
            ControlInput::Rotation(_) => "rotate",
            ControlInput::Opacity(_) => "opacity",
            ControlInput::ToggleBold => "bold",
            ControlInput::ToggleItalic => "italic",
            ControlInput::ToggleUnderline => "underline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::{NodeId, TextStyle};
    use pretty_assertions::assert_eq;

    fn text_node() -> Node {
        Node::text(NodeId::from_raw(1), "Hello", TextStyle::default())
    }

    #[test]
    fn cleared_shows_fallbacks() {
        let config = EditorConfig::default();
        let bindings = ControlBindings::cleared(&config);
        assert!(!bindings.enabled);
        assert_eq!(bindings.color_hex, "#ffffff");
        assert_eq!(bindings.color_alpha, 1.0);
        assert_eq!(bindings.background_alpha, 0.0);
        assert_eq!(bindings.font_size, 24.0);
    }

    #[test]
    fn populated_from_text_node() {
        let config = EditorConfig::default();
        let mut node = text_node();
        let style = node.text_style_mut().unwrap();
        style.color = Some(Rgba::new(255, 0, 0, 0.5));
        style.font_weight = Some(FontWeight::Bold);
        node.rotation = Rotation(15);

        let bindings = ControlBindings::from_node(&node, &config);
        assert_eq!(bindings.text, "Hello");
        assert_eq!(bindings.color_hex, "#ff0000");
        assert_eq!(bindings.color_alpha, 0.5);
        assert!(bindings.bold);
        assert!(!bindings.italic);
        assert_eq!(bindings.rotation, 15);
    }

    #[test]
    fn alpha_composes_with_shown_hex() {
        let config = EditorConfig::default();
        let mut node = text_node();
        let mut bindings = ControlBindings::from_node(&node, &config);
        assert!(bindings.apply(&ControlInput::TextColor("#00ff00".into()), &mut node, &config));
        bindings = ControlBindings::from_node(&node, &config);
        assert!(bindings.apply(&ControlInput::TextAlpha(0.25), &mut node, &config));
        assert_eq!(
            node.text_style().unwrap().color,
            Some(Rgba::new(0, 255, 0, 0.25))
        );
    }

    #[test]
    fn font_size_clamped() {
        let config = EditorConfig::default();
        let mut node = text_node();
        let bindings = ControlBindings::from_node(&node, &config);
        bindings.apply(&ControlInput::FontSize(400.0), &mut node, &config);
        assert_eq!(node.text_style().unwrap().font_size_px, Some(300.0));
        bindings.apply(&ControlInput::FontSize(2.0), &mut node, &config);
        assert_eq!(node.text_style().unwrap().font_size_px, Some(8.0));
    }

    #[test]
    fn toggles_flip() {
        let config = EditorConfig::default();
        let mut node = text_node();
        let bindings = ControlBindings::from_node(&node, &config);
        bindings.apply(&ControlInput::ToggleBold, &mut node, &config);
        bindings.apply(&ControlInput::ToggleUnderline, &mut node, &config);
        let style = node.text_style().unwrap();
        assert!(style.is_bold());
        assert!(style.is_underlined());
        bindings.apply(&ControlInput::ToggleBold, &mut node, &config);
        assert!(!node.text_style().unwrap().is_bold());
    }

    #[test]
    fn text_controls_ignored_for_images() {
        let config = EditorConfig::default();
        let mut node = Node::image(NodeId::from_raw(2), "a.png");
        let bindings = ControlBindings::from_node(&node, &config);
        assert!(!bindings.text_enabled);
        assert!(!bindings.apply(&ControlInput::ToggleBold, &mut node, &config));
        assert!(bindings.apply(&ControlInput::Opacity(1.7), &mut node, &config));
        assert_eq!(node.opacity, 1.0);
    }

    #[test]
    fn bad_hex_rejected() {
        let config = EditorConfig::default();
        let mut node = text_node();
        let bindings = ControlBindings::from_node(&node, &config);
        assert!(!bindings.apply(&ControlInput::TextColor("blue".into()), &mut node, &config));
        assert_eq!(node.text_style().unwrap().color, None);
    }
}
