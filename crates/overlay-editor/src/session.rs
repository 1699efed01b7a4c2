//! Pointer sessions and the interaction state machine.
//!
//! A session spans one pointer-down to pointer-up interval and holds the
//! values captured at its start. Geometry is always computed from those
//! start values plus the total pointer delta, never from the previous frame,
//! so repeated moves and clamping cannot drift.

use crate::scaler::FontScaler;
use overlay_core::{NodeId, Point, Size, Stage, Vec2, clamp};

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub node: NodeId,
    pub start_pointer: Point,
    pub start_origin: Point,
}

impl DragSession {
    /// Origin for the current pointer, clamped so a box of `size` stays on stage.
    pub fn origin_at(&self, pointer: Point, size: Size, stage: &Stage) -> Point {
        let delta: Vec2 = pointer - self.start_pointer;
        stage.clamp_origin(self.start_origin + delta, size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub node: NodeId,
    pub origin: Point,
    pub start_size: Size,
    /// Present for text nodes only.
    pub scaler: Option<FontScaler>,
    /// Aspect lock applies to image nodes only.
    pub lock_aspect_allowed: bool,
}

impl ResizeSession {
    /// Box size for the current pointer.
    ///
    /// The pointer is clamped onto the stage first; the result is at least
    /// `min_size`, at most the stage extent remaining right of / below the
    /// node origin, and rounded to whole pixels.
    pub fn size_at(&self, pointer: Point, lock_aspect: bool, min_size: Size, stage: &Stage) -> Size {
        let p = stage.clamp_point(pointer);
        let max_w = min_size.width.max(stage.width() - self.origin.x);
        let max_h = min_size.height.max(stage.height() - self.origin.y);
        let mut w = clamp(p.x - self.origin.x, min_size.width, max_w);
        let mut h = clamp(p.y - self.origin.y, min_size.height, max_h);

        if lock_aspect && self.lock_aspect_allowed {
            let ratio = self.start_size.height / self.start_size.width.max(1.0);
            if w * ratio > h {
                w = h / ratio;
            } else {
                h = w * ratio;
            }
            // The minimum wins over the ratio; the other side follows it
            // as far as the stage allows.
            if w < min_size.width {
                w = min_size.width;
                h = clamp(w * ratio, min_size.height, max_h);
            }
            if h < min_size.height {
                h = min_size.height;
                w = clamp(h / ratio, min_size.width, max_w);
            }
        }

        Size::new(w.round(), h.round())
    }
}

/// Where the editor is in its interaction cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Selected(NodeId),
    Dragging(DragSession),
    Resizing(ResizeSession),
    EditingText { node: NodeId, buffer: String },
}

impl Interaction {
    /// The node this state refers to, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Interaction::Idle => None,
            Interaction::Selected(id) => Some(*id),
            Interaction::Dragging(s) => Some(s.node),
            Interaction::Resizing(s) => Some(s.node),
            Interaction::EditingText { node, .. } => Some(*node),
        }
    }

    pub fn is_pointer_session(&self) -> bool {
        matches!(self, Interaction::Dragging(_) | Interaction::Resizing(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Selected(_) => "selected",
            Interaction::Dragging(_) => "dragging",
            Interaction::Resizing(_) => "resizing",
            Interaction::EditingText { .. } => "editing",
        }
    }
}
