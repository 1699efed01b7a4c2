//! RGB + alpha colors and their hex / CSS encodings.
//!
//! Style controls work in a `(#rrggbb, alpha)` pair while documents carry a
//! single composited `rgb()` / `rgba()` string. `compose` and `decompose`
//! convert between the two and round-trip to three decimal places of alpha.

use crate::geometry::clamp_unit;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 (transparent) ..= 1.0 (opaque), quantized to 1/1000.
    pub a: f64,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn quantize_alpha(a: f64) -> f64 {
    (clamp_unit(a) * 1000.0).round() / 1000.0
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build a color, clamping alpha into `[0, 1]`.
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: quantize_alpha(a),
        }
    }

    /// Parse `#RGB` or `#RRGGBB` (the `#` is optional). Alpha is 1.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Combine a control's hex value with its separate alpha control.
    pub fn compose(hex: &str, alpha: f64) -> Option<Self> {
        let base = Self::from_hex(hex)?;
        Some(Self::new(base.r, base.g, base.b, alpha))
    }

    /// Split into the `(#rrggbb, alpha)` pair the style controls show.
    pub fn decompose(&self) -> (String, f64) {
        (self.to_hex(), self.a)
    }

    /// Lowercase `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)` when opaque, otherwise `rgba(r, g, b, a)`.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn parse_css(s: &str) -> Option<Self> {
        crate::parse::css_color(s)
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
