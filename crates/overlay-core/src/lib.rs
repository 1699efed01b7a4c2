pub mod color;
pub mod data_url;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod parse;
pub mod rotation;

pub use color::Rgba;
pub use document::{NodeRecord, OverlayDocument, TextDecoration};
pub use error::{OverlayError, Result};
pub use geometry::{MAX_FONT_PX, MIN_FONT_PX, Stage, clamp};
pub use id::{IdAllocator, NodeId};
pub use model::*;
pub use parse::Length;
pub use rotation::Rotation;

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Size, Vec2};
