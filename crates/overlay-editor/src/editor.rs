//! The editor session: node set, selection, and the interaction engine.
//!
//! `OverlayEditor` owns everything one editing session needs (nodes, the z
//! counter, selection, the active pointer session, control bindings), so two
//! editors never share state. Input arrives through [`OverlayEditor::handle`];
//! toolbar actions call the public operations directly. Both paths queue
//! [`EditorEvent`]s for the host to drain and redraw from.

use crate::config::EditorConfig;
use crate::controls::{ControlBindings, ControlInput};
use crate::hit::{self, CursorHint};
use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::scaler::FontScaler;
use crate::session::{DragSession, Interaction, ResizeSession};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use overlay_core::data_url;
use overlay_core::{
    ApproxTextMeasure, IdAllocator, Node, NodeId, NodeKind, NodeRecord, OverlayDocument, Point,
    Rect, Result, Size, Stage, TextMeasure, TextStyle, Vec2, clamp,
};
use serde_json::Value;
use smallvec::SmallVec;

pub type Events = SmallVec<[EditorEvent; 4]>;

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectionChanged(Option<NodeId>),
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    /// Position or box size changed.
    GeometryChanged(NodeId),
    /// Font size rewritten by a resize of a text node.
    FontScaled { id: NodeId, px: f64 },
    EditStarted(NodeId),
    ContentCommitted(NodeId),
    StyleChanged(NodeId),
    ZOrderChanged { id: NodeId, z: u32 },
    /// The whole node set was rebuilt (import or clear).
    NodesReplaced { count: usize },
    Request(HostRequest),
}

/// Work the editor cannot do itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Let the user pick an image, then call `add_image`.
    PickImage,
    /// Run the export flow.
    Save,
}

/// Remembers the last raise so an immediate send-backward can undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RaiseMark {
    node: NodeId,
    previous: u32,
    raised: u32,
}

pub struct OverlayEditor {
    nodes: Vec<Node>,
    ids: IdAllocator,
    z_counter: u32,
    interaction: Interaction,
    stage: Stage,
    config: EditorConfig,
    controls: ControlBindings,
    measure: Box<dyn TextMeasure>,
    base_image: Option<String>,
    name: Option<String>,
    last_raise: Option<RaiseMark>,
    pending: Events,
}

impl OverlayEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_measure(config, Box::new(ApproxTextMeasure::default()))
    }

    pub fn with_measure(config: EditorConfig, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            nodes: Vec::new(),
            ids: IdAllocator::new(),
            z_counter: config.initial_z,
            interaction: Interaction::Idle,
            stage: config.stage,
            controls: ControlBindings::cleared(&config),
            config,
            measure,
            base_image: None,
            name: None,
            last_raise: None,
            pending: SmallVec::new(),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.interaction.node()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected().and_then(|id| self.node(id))
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn controls(&self) -> &ControlBindings {
        &self.controls
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn z_counter(&self) -> u32 {
        self.z_counter
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        &*self.measure
    }

    pub fn base_image(&self) -> Option<&str> {
        self.base_image.as_deref()
    }

    pub fn set_base_image(&mut self, image: Option<String>) {
        self.base_image = image;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.filter(|n| !n.trim().is_empty());
    }

    /// Rendered box of a node, stage-relative.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node(id).map(|n| n.bounds(&*self.measure))
    }

    /// Nodes in paint order, back to front.
    pub fn render_order(&self) -> Vec<&Node> {
        hit::render_order(&self.nodes)
            .into_iter()
            .map(|i| &self.nodes[i])
            .collect()
    }

    pub fn cursor_at(&self, x: f64, y: f64) -> CursorHint {
        hit::cursor_at(
            &self.nodes,
            &*self.measure,
            Point::new(x, y),
            self.config.resize_hot_zone,
        )
    }

    /// Layout changed the stage extent. Nodes are re-clamped on their next move.
    pub fn set_stage_size(&mut self, width: f64, height: f64) {
        self.stage = Stage::new(width, height);
    }

    /// Drain the events queued since the last call.
    pub fn take_events(&mut self) -> Events {
        std::mem::take(&mut self.pending)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event; returns every event it produced.
    pub fn handle(&mut self, event: &InputEvent) -> Events {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers: _,
            } => self.pointer_down(Point::new(*x, *y), *button),
            InputEvent::PointerMove { x, y, modifiers } => {
                self.pointer_move(Point::new(*x, *y), modifiers)
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerCancel => self.end_session(),
            InputEvent::DoubleClick { x, y } => self.double_click(Point::new(*x, *y)),
            InputEvent::EditText { content } => {
                if let Interaction::EditingText { buffer, .. } = &mut self.interaction {
                    buffer.clone_from(content);
                }
            }
            InputEvent::FocusLost => self.commit_edit(),
            InputEvent::Key { key, modifiers } => {
                let typing = matches!(self.interaction, Interaction::EditingText { .. });
                if let Some(action) = ShortcutMap::resolve(key, modifiers, typing) {
                    self.apply_shortcut(action);
                }
            }
        }
        self.take_events()
    }

    fn pointer_down(&mut self, p: Point, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        if self.interaction.is_pointer_session() {
            log::debug!("pointer down ignored: {} in progress", self.interaction.name());
            return;
        }

        let Some(id) = hit::hit_test(&self.nodes, &*self.measure, p) else {
            self.set_selection(None);
            return;
        };

        // Clicking inside the text being edited just moves the caret
        if let Interaction::EditingText { node, .. } = &self.interaction
            && *node == id
        {
            return;
        }

        self.set_selection(Some(id));
        let Some(i) = self.index_of(id) else {
            return;
        };
        let node = &self.nodes[i];
        let bounds = node.bounds(&*self.measure);

        if hit::in_resize_zone(bounds, p, self.config.resize_hot_zone) {
            let scaler = node.text_style().map(|style| {
                FontScaler::new(
                    bounds.width(),
                    style.font_px(),
                    self.config.min_font_px,
                    self.config.max_font_px,
                )
            });
            log::debug!("resize start {} at {:?}", id, bounds.size());
            self.interaction = Interaction::Resizing(ResizeSession {
                node: id,
                origin: node.origin,
                start_size: bounds.size(),
                scaler,
                lock_aspect_allowed: !node.is_text(),
            });
        } else {
            log::debug!("drag start {} from {:?}", id, node.origin);
            self.interaction = Interaction::Dragging(DragSession {
                node: id,
                start_pointer: p,
                start_origin: node.origin,
            });
        }
    }

    fn pointer_move(&mut self, p: Point, modifiers: &Modifiers) {
        match &self.interaction {
            Interaction::Dragging(session) => {
                let session = session.clone();
                let Some(i) = self.index_of(session.node) else {
                    return;
                };
                let node = &mut self.nodes[i];
                let size = node.box_size(&*self.measure);
                let origin = session.origin_at(p, size, &self.stage);
                if origin != node.origin {
                    node.origin = origin;
                    self.last_raise = None;
                    log::trace!("drag {} -> {:?}", session.node, origin);
                    self.pending.push(EditorEvent::GeometryChanged(session.node));
                }
            }
            Interaction::Resizing(session) => {
                let session = session.clone();
                let Some(i) = self.index_of(session.node) else {
                    return;
                };
                let size = session.size_at(p, modifiers.shift, self.config.min_size, &self.stage);
                // A box grown to the minimum against an edge shifts back on stage
                let origin = self.stage.clamp_origin(session.origin, size);
                let node = &mut self.nodes[i];
                if node.box_size(&*self.measure) != size
                    || node.origin != origin
                    || node.width.is_none()
                    || node.height.is_none()
                {
                    node.set_size(size);
                    node.origin = origin;
                    self.last_raise = None;
                    log::trace!("resize {} -> {:?}", session.node, size);
                    self.pending.push(EditorEvent::GeometryChanged(session.node));
                    self.on_geometry_changed(session.node);
                }
            }
            _ => {}
        }
    }

    /// Box-size notification, raised synchronously after every resize step.
    /// During a text resize it rewrites the font from the session baseline.
    fn on_geometry_changed(&mut self, id: NodeId) {
        let Interaction::Resizing(ResizeSession {
            node,
            scaler: Some(scaler),
            ..
        }) = &self.interaction
        else {
            return;
        };
        if *node != id {
            return;
        }
        let scaler = *scaler;
        let Some(i) = self.index_of(id) else {
            return;
        };
        let width = self.nodes[i].box_size(&*self.measure).width;
        let Some(style) = self.nodes[i].text_style_mut() else {
            return;
        };
        let px = style.set_font_px(scaler.font_for_width(width));
        self.pending.push(EditorEvent::FontScaled { id, px });
        self.refresh_controls();
    }

    fn end_session(&mut self) {
        if !self.interaction.is_pointer_session() {
            return;
        }
        if let Some(id) = self.interaction.node() {
            log::debug!("{} end {}", self.interaction.name(), id);
            self.interaction = Interaction::Selected(id);
        }
    }

    fn double_click(&mut self, p: Point) {
        let Some(id) = hit::hit_test(&self.nodes, &*self.measure, p) else {
            return;
        };
        self.set_selection(Some(id));
        let Some(NodeKind::Text { content, .. }) = self.node(id).map(|n| &n.kind) else {
            return;
        };
        let buffer = content.clone();
        self.interaction = Interaction::EditingText { node: id, buffer };
        log::debug!("editing {}", id);
        self.pending.push(EditorEvent::EditStarted(id));
    }

    /// Write the in-place editor's text back into the node.
    fn commit_edit(&mut self) {
        let Interaction::EditingText { node, buffer } = &self.interaction else {
            return;
        };
        let id = *node;
        let text = buffer.clone();
        self.interaction = Interaction::Selected(id);
        if let Some(i) = self.index_of(id)
            && let NodeKind::Text { content, .. } = &mut self.nodes[i].kind
        {
            *content = text;
            self.last_raise = None;
            log::debug!("committed text for {}", id);
            self.pending.push(EditorEvent::ContentCommitted(id));
        }
        self.refresh_controls();
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select a node. Returns `false` if it does not exist.
    pub fn select(&mut self, id: NodeId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.set_selection(Some(id));
        true
    }

    pub fn deselect(&mut self) {
        self.set_selection(None);
    }

    fn set_selection(&mut self, id: Option<NodeId>) {
        self.commit_edit();
        let previous = self.selected();
        self.interaction = match id {
            Some(id) => Interaction::Selected(id),
            None => Interaction::Idle,
        };
        self.refresh_controls();
        if previous != id {
            self.last_raise = None;
            log::debug!("selection {:?} -> {:?}", previous, id);
            self.pending.push(EditorEvent::SelectionChanged(id));
        }
    }

    /// Drop the selection without committing a pending text edit.
    fn discard_selection(&mut self) {
        let previous = self.selected();
        self.interaction = Interaction::Idle;
        self.controls = ControlBindings::cleared(&self.config);
        if previous.is_some() {
            self.pending.push(EditorEvent::SelectionChanged(None));
        }
    }

    fn refresh_controls(&mut self) {
        self.controls = match self.selected().and_then(|id| self.node(id)) {
            Some(node) => ControlBindings::from_node(node, &self.config),
            None => ControlBindings::cleared(&self.config),
        };
    }

    // ─── Node creation ───────────────────────────────────────────────────

    /// Add a text node with the configured default content, selected.
    pub fn add_text(&mut self) -> NodeId {
        let id = self.ids.next_id();
        let mut style = TextStyle {
            font_family: Some(self.config.default_font_family.clone()),
            ..Default::default()
        };
        style.set_font_px(self.config.default_font_px);
        let mut node = Node::text(id, self.config.default_text.clone(), style);
        node.origin = self.default_origin();
        node.z_index = self.next_z();
        self.insert(node)
    }

    /// Add an image node. With `size`, it lands at the stage origin at that
    /// size (clamped to the stage); otherwise at the default placement and
    /// default size.
    pub fn add_image(&mut self, source: impl Into<String>, size: Option<Size>) -> NodeId {
        let id = self.ids.next_id();
        let mut node = Node::image(id, source);
        match size {
            Some(size) => {
                let min = self.config.min_size;
                node.origin = Point::ORIGIN;
                node.set_size(Size::new(
                    clamp(size.width, min.width, min.width.max(self.stage.width())).round(),
                    clamp(size.height, min.height, min.height.max(self.stage.height())).round(),
                ));
            }
            None => {
                node.origin = self.default_origin();
                node.set_size(self.config.default_image_size);
            }
        }
        node.z_index = self.next_z();
        self.insert(node)
    }

    /// Clone the selected node, offset it, put it on top and select it.
    pub fn duplicate(&mut self) -> Option<NodeId> {
        self.commit_edit();
        let i = self.index_of(self.selected()?)?;
        let mut clone = self.nodes[i].clone();
        clone.id = self.ids.next_id();
        clone.origin += self.config.duplicate_offset;
        clone.z_index = self.next_z();
        Some(self.insert(clone))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id;
        log::debug!("add {} {} z={}", node.kind_name(), id, node.z_index);
        self.nodes.push(node);
        self.last_raise = None;
        self.pending.push(EditorEvent::NodeAdded(id));
        self.set_selection(Some(id));
        id
    }

    fn default_origin(&self) -> Point {
        let (fx, fy) = self.config.placement;
        self.stage.at_fraction(fx, fy)
    }

    fn next_z(&mut self) -> u32 {
        self.z_counter = self.z_counter.saturating_add(1);
        self.z_counter
    }

    // ─── Mutations on the selection ──────────────────────────────────────

    /// Remove the selected node. Selection is cleared first.
    pub fn delete_selected(&mut self) -> Option<NodeId> {
        let id = self.selected()?;
        self.discard_selection();
        let i = self.index_of(id)?;
        self.nodes.remove(i);
        if self.last_raise.is_some_and(|m| m.node == id) {
            self.last_raise = None;
        }
        log::debug!("removed {}", id);
        self.pending.push(EditorEvent::NodeRemoved(id));
        Some(id)
    }

    /// Raise the selected node above everything. Returns its new z-index.
    pub fn bring_forward(&mut self) -> Option<u32> {
        let id = self.selected()?;
        let i = self.index_of(id)?;
        let previous = self.nodes[i].z_index;
        let raised = self.next_z();
        self.nodes[i].z_index = raised;
        self.last_raise = Some(RaiseMark {
            node: id,
            previous,
            raised,
        });
        self.pending.push(EditorEvent::ZOrderChanged { id, z: raised });
        Some(raised)
    }

    /// Lower the selected node by one, floored at 1. Directly after a
    /// `bring_forward` of the same node, with no edit or selection change in
    /// between, it restores the pre-raise value.
    pub fn send_backward(&mut self) -> Option<u32> {
        let id = self.selected()?;
        let i = self.index_of(id)?;
        let z = self.nodes[i].z_index;
        let lowered = match self.last_raise.take() {
            Some(mark) if mark.node == id && mark.raised == z => mark.previous,
            _ => z.saturating_sub(1).max(1),
        };
        self.nodes[i].z_index = lowered;
        if lowered != z {
            self.pending.push(EditorEvent::ZOrderChanged { id, z: lowered });
        }
        Some(lowered)
    }

    /// Move the selected node by `(dx, dy)`, clamped to the stage.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> bool {
        if self.interaction.is_pointer_session() {
            return false;
        }
        let Some(i) = self.selected().and_then(|id| self.index_of(id)) else {
            return false;
        };
        let node = &mut self.nodes[i];
        let size = node.box_size(&*self.measure);
        let origin = self
            .stage
            .clamp_origin(node.origin + Vec2::new(dx, dy), size);
        if origin == node.origin {
            return false;
        }
        node.origin = origin;
        let id = node.id;
        self.last_raise = None;
        self.pending.push(EditorEvent::GeometryChanged(id));
        true
    }

    /// Apply a style or content control edit to the selected node.
    pub fn apply_control(&mut self, input: &ControlInput) -> bool {
        let Some(id) = self.selected() else {
            return false;
        };
        let Some(i) = self.index_of(id) else {
            return false;
        };
        if !self.controls.apply(input, &mut self.nodes[i], &self.config) {
            return false;
        }
        self.last_raise = None;

        if let ControlInput::Text(text) = input {
            if let Interaction::EditingText { node, buffer } = &mut self.interaction
                && *node == id
            {
                buffer.clone_from(text);
            }
            self.pending.push(EditorEvent::ContentCommitted(id));
        } else {
            self.pending.push(EditorEvent::StyleChanged(id));
        }
        self.refresh_controls();
        true
    }

    /// Run a resolved keyboard shortcut.
    pub fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Deselect => self.deselect(),
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::Nudge { dx, dy, large } => {
                let step = if large {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                self.nudge(f64::from(dx) * step, f64::from(dy) * step);
            }
            ShortcutAction::BringForward => {
                self.bring_forward();
            }
            ShortcutAction::SendBackward => {
                self.send_backward();
            }
            ShortcutAction::AddText => {
                self.add_text();
            }
            ShortcutAction::AddImage => {
                self.pending
                    .push(EditorEvent::Request(HostRequest::PickImage));
            }
            ShortcutAction::Duplicate => {
                self.duplicate();
            }
            ShortcutAction::ToggleBold => {
                self.apply_control(&ControlInput::ToggleBold);
            }
            ShortcutAction::ToggleItalic => {
                self.apply_control(&ControlInput::ToggleItalic);
            }
            ShortcutAction::ToggleUnderline => {
                self.apply_control(&ControlInput::ToggleUnderline);
            }
            ShortcutAction::Save => {
                self.pending.push(EditorEvent::Request(HostRequest::Save));
            }
        }
    }

    /// Remove every node and reset selection and any active session.
    pub fn clear_nodes(&mut self) {
        self.discard_selection();
        self.nodes.clear();
        self.last_raise = None;
        self.pending.push(EditorEvent::NodesReplaced { count: 0 });
    }

    // ─── Codec ───────────────────────────────────────────────────────────

    /// Synchronous snapshot of the current state. Image sources are written
    /// as stored; `exportedAt` is left for the exporter to stamp. Text being
    /// edited in place is written as currently displayed.
    pub fn snapshot(&self) -> OverlayDocument {
        let editing = match &self.interaction {
            Interaction::EditingText { node, buffer } => Some((*node, buffer)),
            _ => None,
        };
        let records = self
            .nodes
            .iter()
            .map(|node| {
                let mut record = NodeRecord::from_node(node, &*self.measure);
                if let Some((id, buffer)) = editing
                    && id == node.id
                {
                    record.text = Some(buffer.clone());
                }
                record
            })
            .collect();

        OverlayDocument {
            exported_at: None,
            name: self.name.clone(),
            image: self.base_image.clone(),
            nodes: Some(records),
        }
    }

    /// Rebuild from a parsed document. When it carries `nodes`, every placed
    /// node is destroyed and replaced in array order. Returns the number of
    /// nodes reconstructed.
    pub fn import_document(&mut self, document: OverlayDocument) -> usize {
        if let Some(name) = document.name {
            self.set_name(Some(name));
        }
        if let Some(image) = document.image
            && data_url::is_data_url(&image)
        {
            self.base_image = Some(image);
        }
        let Some(records) = document.nodes else {
            log::debug!("document has no nodes; keeping {} placed", self.nodes.len());
            return 0;
        };

        self.discard_selection();
        self.nodes.clear();
        self.last_raise = None;

        let origin = self.default_origin();
        for record in &records {
            let node = record.to_node(self.ids.next_id(), &self.stage, origin);
            self.z_counter = self.z_counter.max(node.z_index);
            self.nodes.push(node);
        }

        let count = self.nodes.len();
        log::debug!("imported {} nodes, z counter {}", count, self.z_counter);
        self.pending.push(EditorEvent::NodesReplaced { count });
        count
    }

    /// Parse and import JSON text. On any error the editor is untouched.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let document = OverlayDocument::from_json(text)
            .inspect_err(|e| log::warn!("import rejected: {e}"))?;
        Ok(self.import_document(document))
    }

    /// Import an already-parsed JSON value.
    pub fn import_value(&mut self, value: &Value) -> Result<usize> {
        let document = OverlayDocument::from_value(value.clone())
            .inspect_err(|e| log::warn!("import rejected: {e}"))?;
        Ok(self.import_document(document))
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }
}

impl Default for OverlayEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::Rotation;

    fn editor() -> OverlayEditor {
        OverlayEditor::new(EditorConfig::default().with_stage(800.0, 600.0))
    }

    #[test]
    fn add_text_defaults() {
        let mut ed = editor();
        let id = ed.add_text();
        let node = ed.node(id).unwrap();
        assert_eq!(node.origin, Point::new(80.0, 60.0));
        assert_eq!(node.z_index, 11);
        assert_eq!(ed.selected(), Some(id));
        let NodeKind::Text { content, style } = &node.kind else {
            panic!("expected text");
        };
        assert_eq!(content, "Double-click to edit");
        assert_eq!(style.font_size_px, Some(24.0));
        assert!(ed.controls().enabled);
    }

    #[test]
    fn click_empty_deselects() {
        let mut ed = editor();
        ed.add_text();
        ed.take_events();
        let events = ed.handle(&InputEvent::pointer_down(700.0, 550.0));
        assert_eq!(ed.selected(), None);
        assert!(events.contains(&EditorEvent::SelectionChanged(None)));
        assert!(!ed.controls().enabled);
    }

    #[test]
    fn secondary_button_ignored() {
        let mut ed = editor();
        let id = ed.add_image("a.png", None);
        ed.deselect();
        ed.handle(&InputEvent::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Secondary,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(ed.selected(), None);
        assert!(ed.node(id).is_some());
    }

    #[test]
    fn drag_then_release_returns_to_selected() {
        let mut ed = editor();
        let id = ed.add_image("a.png", None);
        ed.handle(&InputEvent::pointer_down(100.0, 100.0));
        assert!(matches!(ed.interaction(), Interaction::Dragging(_)));
        ed.handle(&InputEvent::pointer_move(130.0, 120.0));
        assert_eq!(ed.node(id).unwrap().origin, Point::new(110.0, 80.0));
        ed.handle(&InputEvent::pointer_up(130.0, 120.0));
        assert_eq!(ed.interaction(), &Interaction::Selected(id));
    }

    #[test]
    fn pointer_cancel_ends_session() {
        let mut ed = editor();
        let id = ed.add_image("a.png", None);
        ed.handle(&InputEvent::pointer_down(100.0, 100.0));
        ed.handle(&InputEvent::PointerCancel);
        assert_eq!(ed.interaction(), &Interaction::Selected(id));
    }

    #[test]
    fn double_click_edits_and_focus_loss_commits() {
        let mut ed = editor();
        let id = ed.add_text();
        let events = ed.handle(&InputEvent::DoubleClick { x: 90.0, y: 70.0 });
        assert!(events.contains(&EditorEvent::EditStarted(id)));
        ed.handle(&InputEvent::EditText {
            content: "Hello".into(),
        });
        // Not committed until focus leaves
        let NodeKind::Text { content, .. } = &ed.node(id).unwrap().kind else {
            panic!("expected text");
        };
        assert_eq!(content, "Double-click to edit");

        let events = ed.handle(&InputEvent::FocusLost);
        assert!(events.contains(&EditorEvent::ContentCommitted(id)));
        assert_eq!(ed.interaction(), &Interaction::Selected(id));
        assert_eq!(ed.controls().text, "Hello");
    }

    #[test]
    fn double_click_on_image_only_selects() {
        let mut ed = editor();
        let id = ed.add_image("a.png", None);
        ed.deselect();
        ed.handle(&InputEvent::DoubleClick { x: 100.0, y: 100.0 });
        assert_eq!(ed.interaction(), &Interaction::Selected(id));
    }

    #[test]
    fn send_backward_floors_at_one() {
        let mut ed = editor();
        let id = ed.add_text();
        for _ in 0..20 {
            ed.send_backward();
        }
        assert_eq!(ed.node(id).unwrap().z_index, 1);
        assert_eq!(ed.send_backward(), Some(1));
    }

    #[test]
    fn forward_then_backward_restores() {
        let mut ed = editor();
        let first = ed.add_text();
        ed.add_text();
        ed.select(first);
        let before = ed.node(first).unwrap().z_index;
        let raised = ed.bring_forward().unwrap();
        assert!(raised > before + 1);
        assert_eq!(ed.send_backward(), Some(before));
        // A second press is an ordinary nudge
        assert_eq!(ed.send_backward(), Some(before - 1));
    }

    #[test]
    fn rotation_control() {
        let mut ed = editor();
        let id = ed.add_text();
        assert!(ed.apply_control(&ControlInput::Rotation(44.6)));
        assert_eq!(ed.node(id).unwrap().rotation, Rotation(45));
    }

    #[test]
    fn shortcut_requests_reach_host() {
        let mut ed = editor();
        let alt = Modifiers {
            alt: true,
            ..Modifiers::NONE
        };
        let events = ed.handle(&InputEvent::key("i", alt));
        assert!(events.contains(&EditorEvent::Request(HostRequest::PickImage)));
        let events = ed.handle(&InputEvent::key("s", alt));
        assert!(events.contains(&EditorEvent::Request(HostRequest::Save)));
    }

    #[test]
    fn delete_key_ignored_while_editing() {
        let mut ed = editor();
        let id = ed.add_text();
        ed.handle(&InputEvent::DoubleClick { x: 90.0, y: 70.0 });
        ed.handle(&InputEvent::key("Backspace", Modifiers::NONE));
        assert!(ed.node(id).is_some());
        ed.handle(&InputEvent::key("Escape", Modifiers::NONE));
        assert_eq!(ed.selected(), None);
        ed.select(id);
        ed.handle(&InputEvent::key("Delete", Modifiers::NONE));
        assert!(ed.node(id).is_none());
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn snapshot_uses_displayed_text() {
        let mut ed = editor();
        ed.add_text();
        ed.handle(&InputEvent::DoubleClick { x: 90.0, y: 70.0 });
        ed.handle(&InputEvent::EditText {
            content: "typing…".into(),
        });
        let doc = ed.snapshot();
        assert_eq!(doc.nodes.unwrap()[0].text.as_deref(), Some("typing…"));
    }

    #[test]
    fn import_without_nodes_keeps_placed() {
        let mut ed = editor();
        ed.add_text();
        assert_eq!(ed.import_json(r#"{"name":"Promo"}"#).unwrap(), 0);
        assert_eq!(ed.nodes().len(), 1);
        assert_eq!(ed.name(), Some("Promo"));
    }
}
