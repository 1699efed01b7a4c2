//! Rotation stored as whole degrees, rendered with a `deg` suffix.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Whole-degree rotation. Any value is allowed; it wraps visually every 360.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rotation(pub i32);

impl Rotation {
    pub const NONE: Self = Self(0);

    pub fn degrees(self) -> i32 {
        self.0
    }

    /// The visually equivalent angle in `[0, 360)`.
    pub fn normalized(self) -> i32 {
        self.0.rem_euclid(360)
    }

    /// Accepts `15`, `"15"`, `"15deg"` or `"rotate(15deg)"`.
    pub fn parse(s: &str) -> Option<Self> {
        crate::parse::degrees(s).map(Self::from_f64)
    }

    pub fn from_f64(deg: f64) -> Self {
        Self(deg.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
    }

    /// Suffixed string used for rendering and serialization.
    pub fn to_css(self) -> String {
        format!("{}deg", self.0)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", self.0)
    }
}

impl Serialize for Rotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RotationVisitor;

        impl Visitor<'_> for RotationVisitor {
            type Value = Rotation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number of degrees or a `<n>deg` string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rotation, E> {
                Ok(Rotation::from_f64(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rotation, E> {
                Ok(Rotation::from_f64(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Rotation, E> {
                Ok(Rotation::from_f64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Rotation, E> {
                Rotation::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(RotationVisitor)
    }
}
