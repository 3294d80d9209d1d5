//! # Interaction Controller
//!
//! Single-selection pointer state machine over a [`Document`]. The host
//! translates its input events into [`EditorSession`] calls; all mutation is
//! synchronous and the session owns the document for its lifetime.
//!
//! Drag tracking is a session, not a hit-test loop: once a drag starts, move
//! and up events apply to the grabbed element no matter where the pointer is,
//! so drags survive the pointer leaving the element's bounds. The host must
//! keep delivering move/up events for the whole gesture (pointer capture or a
//! window-level hook).

use log::debug;
use uuid::Uuid;

use crate::document::{DesignElement, Document, ElementKind, ElementPatch};

/// Pointer/selection state. At most one element is ever selected or dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    Selected { id: Uuid },
    Dragging { id: Uuid, last: (f32, f32) },
}

/// An editing session: one document plus its selection/drag state.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub document: Document,
    state: SessionState,
}

impl EditorSession {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the selected (or actively dragged) element, if any.
    pub fn selected_id(&self) -> Option<Uuid> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Selected { id } | SessionState::Dragging { id, .. } => Some(id),
        }
    }

    pub fn selected(&self) -> Option<&DesignElement> {
        self.selected_id().and_then(|id| self.document.element(id))
    }

    /// Replace the document wholesale, as after a template apply.
    ///
    /// The old selection id cannot exist in the new element list, so the
    /// session drops back to Idle.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.state = SessionState::Idle;
    }

    /// Pointer pressed at canvas coordinates.
    ///
    /// Landing on an element selects it and starts a drag; empty canvas
    /// deselects. Selection alone never changes any element.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        match self.document.hit_test(x, y).map(|e| e.id) {
            Some(id) => {
                debug!("pointer down grabbed element {id}");
                self.state = SessionState::Dragging { id, last: (x, y) };
            }
            None => {
                self.state = SessionState::Idle;
            }
        }
    }

    /// Pointer moved. Only meaningful mid-drag; otherwise ignored.
    ///
    /// The grabbed element translates by the pointer delta. No snapping and
    /// no clamping: elements may move off-canvas.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let SessionState::Dragging { id, last } = self.state else {
            return;
        };
        let (dx, dy) = (x - last.0, y - last.1);
        if let Some(element) = self.document.element_mut(id) {
            element.x += dx;
            element.y += dy;
        }
        self.state = SessionState::Dragging { id, last: (x, y) };
    }

    /// Pointer released: the drag ends, the element stays selected.
    pub fn pointer_up(&mut self) {
        if let SessionState::Dragging { id, .. } = self.state {
            self.state = SessionState::Selected { id };
        }
    }

    /// Append a fresh element of `kind` and select it.
    pub fn add_element(&mut self, kind: ElementKind) -> Uuid {
        let id = self.document.add_element(kind);
        self.state = SessionState::Selected { id };
        id
    }

    /// Patch the selected element. No selection, or a patch of nothing,
    /// changes nothing; selection itself is never affected.
    pub fn update_selected(&mut self, patch: &ElementPatch) -> bool {
        match self.selected_id() {
            Some(id) => self.document.update_element(id, patch),
            None => false,
        }
    }

    /// Remove the selected element and drop to Idle.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected_id() else {
            return false;
        };
        let removed = self.document.remove_element(id);
        self.state = SessionState::Idle;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementKind;

    fn session_with_two_rects() -> (EditorSession, Uuid, Uuid) {
        let mut doc = Document::new(600, 400);
        let a = doc.add_element(ElementKind::Rect);
        let b = doc.add_element(ElementKind::Rect);
        // Separate them so hit tests are unambiguous.
        doc.element_mut(b).unwrap().x = 300.0;
        doc.element_mut(b).unwrap().y = 200.0;
        (EditorSession::new(doc), a, b)
    }

    #[test]
    fn pointer_down_on_element_selects_and_grabs() {
        let (mut session, a, _) = session_with_two_rects();
        session.pointer_down(80.0, 80.0);
        assert!(matches!(session.state(), SessionState::Dragging { id, .. } if id == a));
        assert_eq!(session.selected_id(), Some(a));
    }

    #[test]
    fn pointer_down_on_empty_canvas_deselects() {
        let (mut session, _, _) = session_with_two_rects();
        session.pointer_down(80.0, 80.0);
        session.pointer_up();
        session.pointer_down(590.0, 390.0);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn drag_moves_only_the_grabbed_element() {
        let (mut session, a, b) = session_with_two_rects();
        let before_b = session.document.element(b).unwrap().clone();

        session.pointer_down(80.0, 80.0);
        session.pointer_move(95.0, 110.0);
        session.pointer_move(100.0, 120.0);
        session.pointer_up();

        let moved = session.document.element(a).unwrap();
        assert_eq!((moved.x, moved.y), (80.0, 100.0));
        assert_eq!(session.document.element(b).unwrap(), &before_b);
        assert_eq!(session.state(), SessionState::Selected { id: a });
    }

    #[test]
    fn drag_survives_leaving_the_canvas() {
        let (mut session, a, _) = session_with_two_rects();
        session.pointer_down(80.0, 80.0);
        // Way outside any hit area, even off-canvas. No clamping.
        session.pointer_move(-500.0, 1200.0);
        let element = session.document.element(a).unwrap();
        assert_eq!((element.x, element.y), (-520.0, 1180.0));
        assert!(matches!(session.state(), SessionState::Dragging { .. }));
    }

    #[test]
    fn pointer_move_without_drag_is_ignored() {
        let (mut session, a, _) = session_with_two_rects();
        let before = session.document.element(a).unwrap().clone();
        session.pointer_move(10.0, 10.0);
        assert_eq!(session.document.element(a).unwrap(), &before);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn reselection_changes_no_geometry() {
        let (mut session, _, b) = session_with_two_rects();
        let before = session.document.clone();

        session.pointer_down(80.0, 80.0);
        session.pointer_up();
        session.pointer_down(320.0, 220.0);
        session.pointer_up();

        assert_eq!(session.document, before);
        assert_eq!(session.selected_id(), Some(b));
    }

    #[test]
    fn update_selected_targets_only_selection() {
        let (mut session, a, b) = session_with_two_rects();
        session.pointer_down(80.0, 80.0);
        session.pointer_up();

        let patch = ElementPatch {
            text: Some("hello".into()),
            ..Default::default()
        };
        assert!(session.update_selected(&patch));
        assert_eq!(session.document.element(a).unwrap().text, "hello");
        assert_ne!(session.document.element(b).unwrap().text, "hello");
        // Selection is untouched by property edits.
        assert_eq!(session.selected_id(), Some(a));
    }

    #[test]
    fn update_without_selection_is_noop() {
        let (mut session, _, _) = session_with_two_rects();
        let patch = ElementPatch {
            text: Some("hello".into()),
            ..Default::default()
        };
        assert!(!session.update_selected(&patch));
    }

    #[test]
    fn delete_selected_removes_and_idles() {
        let (mut session, a, _) = session_with_two_rects();
        session.pointer_down(80.0, 80.0);
        session.pointer_up();

        assert!(session.delete_selected());
        assert!(session.document.element(a).is_none());
        assert_eq!(session.document.elements.len(), 1);
        assert_eq!(session.state(), SessionState::Idle);
        // A second delete with nothing selected does nothing.
        assert!(!session.delete_selected());
    }

    #[test]
    fn add_element_appends_and_selects() {
        let (mut session, _, _) = session_with_two_rects();
        let id = session.add_element(ElementKind::Text);
        assert_eq!(session.selected_id(), Some(id));
        assert_eq!(session.document.elements.last().unwrap().id, id);
    }

    #[test]
    fn replace_document_resets_selection() {
        let (mut session, _, _) = session_with_two_rects();
        session.pointer_down(80.0, 80.0);
        session.replace_document(Document::new(800, 600));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.document.width, 800);
    }
}
