//! Overlay document schema and the synchronous half of the codec.
//!
//! ```json
//! { "exportedAt": "2024-05-01T12:00:00.000Z", "image": null,
//!   "nodes": [ { "type": "text", "left": 80, "top": 60, "width": 300,
//!                "height": 40, "zIndex": 11, "rotate": "0deg",
//!                "opacity": 1, "text": "Hello", "fontSize": "24px" } ] }
//! ```
//!
//! Reading is lenient field by field: a value that is missing, empty or
//! unreadable leaves the field `None`, so sparse and hand-written documents
//! import without clobbering styles they do not mention. Only a document
//! that is not JSON, or not a JSON object, is rejected.

use crate::color::Rgba;
use crate::error::{OverlayError, Result};
use crate::geometry::{Stage, clamp_font_px, clamp_unit};
use crate::id::NodeId;
use crate::model::*;
use crate::parse::{self, Length};
use crate::rotation::Rotation;
use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The full editor state as a transferable document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayDocument {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::string"
    )]
    pub exported_at: Option<String>,

    /// Display name of the template.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::string"
    )]
    pub name: Option<String>,

    /// Base image reference; written as `null` when there is none.
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: Option<String>,

    /// `None` when the input had no `nodes` array: importing such a
    /// document leaves the placed nodes alone.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::records"
    )]
    pub nodes: Option<Vec<NodeRecord>>,
}

impl OverlayDocument {
    /// Parse a document. Fails only on invalid JSON or a non-object root.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(OverlayError::InvalidDocument(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| OverlayError::InvalidDocument(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `textDecoration` as carried in documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecoration {
    None,
    Underline,
}

impl TextDecoration {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDecoration::None => "none",
            TextDecoration::Underline => "underline",
        }
    }
}

/// One placed node as written in a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::string"
    )]
    pub kind: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::length",
        deserialize_with = "lenient::length"
    )]
    pub left: Option<Length>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::length",
        deserialize_with = "lenient::length"
    )]
    pub top: Option<Length>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::length",
        deserialize_with = "lenient::length"
    )]
    pub width: Option<Length>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::length",
        deserialize_with = "lenient::length"
    )]
    pub height: Option<Length>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::integer"
    )]
    pub z_index: Option<i64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::rotation"
    )]
    pub rotate: Option<Rotation>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::number"
    )]
    pub opacity: Option<f64>,

    // ── Text ──
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::text"
    )]
    pub text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::string"
    )]
    pub font_family: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::px",
        deserialize_with = "lenient::px"
    )]
    pub font_size: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::color",
        deserialize_with = "lenient::color"
    )]
    pub color: Option<Rgba>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::color",
        deserialize_with = "lenient::color"
    )]
    pub background_color: Option<Rgba>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::text_align",
        deserialize_with = "lenient::text_align"
    )]
    pub text_align: Option<TextAlign>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::font_weight",
        deserialize_with = "lenient::font_weight"
    )]
    pub font_weight: Option<FontWeight>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::font_style",
        deserialize_with = "lenient::font_style"
    )]
    pub font_style: Option<FontStyle>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::text_decoration",
        deserialize_with = "lenient::text_decoration"
    )]
    pub text_decoration: Option<TextDecoration>,

    // ── Image ──
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::string"
    )]
    pub src: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "emit::object_fit",
        deserialize_with = "lenient::object_fit"
    )]
    pub object_fit: Option<ObjectFit>,
}

impl NodeRecord {
    /// Snapshot a node. Geometry is rounded to whole pixels.
    pub fn from_node(node: &Node, measure: &dyn TextMeasure) -> Self {
        let size = node.box_size(measure);
        let mut record = NodeRecord {
            kind: Some(node.kind_name().to_string()),
            left: Some(Length::Px(node.origin.x.round())),
            top: Some(Length::Px(node.origin.y.round())),
            width: Some(Length::Px(size.width.round())),
            height: Some(Length::Px(size.height.round())),
            z_index: Some(i64::from(node.z_index)),
            rotate: Some(node.rotation),
            opacity: Some(node.opacity),
            ..Default::default()
        };

        match &node.kind {
            NodeKind::Text { content, style } => {
                record.text = Some(content.clone());
                record.font_family = style.font_family.clone();
                record.font_size = style.font_size_px;
                record.color = style.color;
                record.background_color = style.background_color;
                record.text_align = style.text_align;
                record.font_weight = style.font_weight;
                record.font_style = style.font_style;
                record.text_decoration = style.underline.map(|u| {
                    if u {
                        TextDecoration::Underline
                    } else {
                        TextDecoration::None
                    }
                });
            }
            NodeKind::Image { source, object_fit } => {
                record.src = (!source.is_empty()).then(|| source.clone());
                record.object_fit = Some(object_fit.unwrap_or_default());
            }
        }
        record
    }

    pub fn is_image(&self) -> bool {
        self.kind.as_deref() == Some("image")
    }

    /// Rebuild a node. Fields absent from the record stay unset on the
    /// node; a missing position falls back to `default_origin`.
    pub fn to_node(&self, id: NodeId, stage: &Stage, default_origin: Point) -> Node {
        let mut node = if self.is_image() {
            let mut node = Node::image(id, self.src.clone().unwrap_or_default());
            if let NodeKind::Image { object_fit, .. } = &mut node.kind {
                *object_fit = self.object_fit.or(Some(ObjectFit::Contain));
            }
            node
        } else {
            let style = TextStyle {
                font_family: self.font_family.clone(),
                font_size_px: self.font_size.map(clamp_font_px),
                color: self.color,
                background_color: self.background_color,
                text_align: self.text_align,
                font_weight: self.font_weight,
                font_style: self.font_style,
                underline: self
                    .text_decoration
                    .map(|d| d == TextDecoration::Underline),
            };
            Node::text(id, self.text.clone().unwrap_or_default(), style)
        };

        node.origin = Point::new(
            self.left
                .map(|l| l.resolve(stage.width()))
                .unwrap_or(default_origin.x),
            self.top
                .map(|t| t.resolve(stage.height()))
                .unwrap_or(default_origin.y),
        );
        node.width = self
            .width
            .map(|w| w.resolve(stage.width()))
            .filter(|w| *w > 0.0);
        node.height = self
            .height
            .map(|h| h.resolve(stage.height()))
            .filter(|h| *h > 0.0);
        node.z_index = self
            .z_index
            .map(|z| z.clamp(1, i64::from(u32::MAX)) as u32)
            .unwrap_or(1);
        if let Some(rotation) = self.rotate {
            node.rotation = rotation;
        }
        if let Some(opacity) = self.opacity {
            node.opacity = clamp_unit(opacity);
        }
        node
    }
}

// ─── Writers ─────────────────────────────────────────────────────────────

mod emit {
    use super::*;

    pub fn length<S: Serializer>(v: &Option<Length>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(Length::Px(px)) if px.fract() == 0.0 && px.abs() < 9.0e15 => {
                s.serialize_i64(*px as i64)
            }
            Some(Length::Px(px)) => s.serialize_f64(*px),
            Some(Length::Percent(p)) => s.collect_str(&format_args!("{p}%")),
            None => s.serialize_none(),
        }
    }

    pub fn px<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(px) => s.collect_str(&format_args!("{px}px")),
            None => s.serialize_none(),
        }
    }

    pub fn color<S: Serializer>(v: &Option<Rgba>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(c) => s.collect_str(c),
            None => s.serialize_none(),
        }
    }

    pub fn text_align<S: Serializer>(v: &Option<TextAlign>, s: S) -> Result<S::Ok, S::Error> {
        str_or_none(v.map(TextAlign::as_str), s)
    }

    pub fn font_weight<S: Serializer>(v: &Option<FontWeight>, s: S) -> Result<S::Ok, S::Error> {
        str_or_none(v.map(FontWeight::as_str), s)
    }

    pub fn font_style<S: Serializer>(v: &Option<FontStyle>, s: S) -> Result<S::Ok, S::Error> {
        str_or_none(v.map(FontStyle::as_str), s)
    }

    pub fn text_decoration<S: Serializer>(
        v: &Option<TextDecoration>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        str_or_none(v.map(TextDecoration::as_str), s)
    }

    pub fn object_fit<S: Serializer>(v: &Option<ObjectFit>, s: S) -> Result<S::Ok, S::Error> {
        str_or_none(v.map(ObjectFit::as_str), s)
    }

    fn str_or_none<S: Serializer>(v: Option<&str>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(v) => s.serialize_str(v),
            None => s.serialize_none(),
        }
    }
}

// ─── Lenient readers ─────────────────────────────────────────────────────

mod lenient {
    use super::*;

    /// Read any JSON value; map it through `f`; unreadable values become `None`.
    fn read<'de, D, T>(d: D, f: impl FnOnce(&Value) -> Option<T>) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().and_then(f))
    }

    fn non_empty_str(v: &Value) -> Option<&str> {
        v.as_str().map(str::trim).filter(|s| !s.is_empty())
    }

    fn as_f64(v: &Value) -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite())
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        read(d, |v| non_empty_str(v).map(str::to_string))
    }

    /// Text content keeps surrounding whitespace and may be empty.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        read(d, |v| v.as_str().map(str::to_string))
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        read(d, as_f64)
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        read(d, |v| as_f64(v).map(|n| n.round() as i64))
    }

    pub fn length<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Length>, D::Error> {
        read(d, |v| match v {
            Value::Number(n) => n.as_f64().map(Length::Px),
            Value::String(s) => parse::length(s),
            _ => None,
        })
    }

    pub fn px<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        read(d, |v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse::pixels(s),
            _ => None,
        })
    }

    pub fn rotation<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Rotation>, D::Error> {
        read(d, |v| match v {
            Value::Number(n) => n.as_f64().map(Rotation::from_f64),
            Value::String(s) => Rotation::parse(s),
            _ => None,
        })
    }

    pub fn color<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Rgba>, D::Error> {
        read(d, |v| non_empty_str(v).and_then(parse::css_color))
    }

    pub fn text_align<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TextAlign>, D::Error> {
        read(d, |v| non_empty_str(v).and_then(TextAlign::parse))
    }

    pub fn font_weight<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FontWeight>, D::Error> {
        read(d, |v| match v {
            Value::Number(n) => n
                .as_u64()
                .map(|w| FontWeight::from_numeric(w.min(1000) as u16)),
            _ => non_empty_str(v).and_then(FontWeight::parse),
        })
    }

    pub fn font_style<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FontStyle>, D::Error> {
        read(d, |v| non_empty_str(v).and_then(FontStyle::parse))
    }

    pub fn text_decoration<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<TextDecoration>, D::Error> {
        read(d, |v| {
            non_empty_str(v).map(|s| {
                if s.to_ascii_lowercase().contains("underline") {
                    TextDecoration::Underline
                } else {
                    TextDecoration::None
                }
            })
        })
    }

    pub fn object_fit<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ObjectFit>, D::Error> {
        read(d, |v| non_empty_str(v).and_then(ObjectFit::parse))
    }

    /// Keep only object entries of a `nodes` array; anything else is skipped.
    pub fn records<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<NodeRecord>>, D::Error> {
        read(d, |v| {
            let items = v.as_array()?;
            let records: Vec<NodeRecord> = items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| match serde_json::from_value(item.clone()) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        log::warn!("skipping unreadable node record: {e}");
                        None
                    }
                })
                .collect();
            Some(records)
        })
    }
}
