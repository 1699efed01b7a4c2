//! Hit testing: point → node lookup.
//!
//! Walks nodes front-to-back in render order (z-index, ties by insertion)
//! and tests the axis-aligned node box.

use overlay_core::{Node, NodeId, Point, Rect, TextMeasure};

/// Pointer cursor to show at a stage position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Move,
    Resize,
}

impl CursorHint {
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Move => "move",
            CursorHint::Resize => "nwse-resize",
        }
    }
}

/// Indices into `nodes` in paint order: ascending z-index, stable on ties so
/// later insertions paint above earlier ones.
pub fn render_order(nodes: &[Node]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&i| nodes[i].z_index);
    order
}

/// Find the topmost node containing `p`.
pub fn hit_test(nodes: &[Node], measure: &dyn TextMeasure, p: Point) -> Option<NodeId> {
    render_order(nodes)
        .into_iter()
        .rev()
        .map(|i| &nodes[i])
        .find(|node| contains(node.bounds(measure), p))
        .map(|node| node.id)
}

/// Whether `p` falls in the square resize hot-zone at the bottom-right
/// corner of `bounds`.
pub fn in_resize_zone(bounds: Rect, p: Point, zone: f64) -> bool {
    contains(bounds, p) && p.x >= bounds.x1 - zone && p.y >= bounds.y1 - zone
}

pub fn cursor_at(nodes: &[Node], measure: &dyn TextMeasure, p: Point, zone: f64) -> CursorHint {
    let Some(id) = hit_test(nodes, measure, p) else {
        return CursorHint::Default;
    };
    match nodes.iter().find(|n| n.id == id) {
        Some(node) if in_resize_zone(node.bounds(measure), p, zone) => CursorHint::Resize,
        Some(_) => CursorHint::Move,
        None => CursorHint::Default,
    }
}

/// Inclusive on all edges so the far corner pixel stays grabbable.
fn contains(r: Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}
