//! # Design Document Model
//!
//! A single type hierarchy that is both the Rust API and the JSON
//! representation. `Document` is constructible in Rust and round-trips
//! through serde unchanged.
//!
//! ```
//! use popstudio::document::{Document, ElementKind};
//!
//! let mut doc = Document::new(600, 400);
//! let id = doc.add_element(ElementKind::Rect);
//! assert!(doc.element(id).is_some());
//! ```
//!
//! Element order is z-order: later elements render on top. Ids are unique
//! within a document and elements never reference each other.

pub mod types;

pub use types::*;

use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The in-memory composition being edited.
///
/// Lives only in session state; only exported artifacts and saved templates
/// outlive the editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Ordered element list; list order is z-order, later = topmost.
    #[serde(default)]
    pub elements: Vec<DesignElement>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(600, 400)
    }
}

impl Document {
    /// Create an empty document with a white background.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background_color: types::WHITE,
            elements: Vec::new(),
        }
    }

    /// Create an element with kind defaults, append it topmost, and return
    /// its fresh id.
    pub fn add_element(&mut self, kind: ElementKind) -> Uuid {
        let element = DesignElement::new(kind);
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Append an already-built element as topmost.
    pub fn push(&mut self, element: DesignElement) {
        self.elements.push(element);
    }

    /// Look up an element by id.
    pub fn element(&self, id: Uuid) -> Option<&DesignElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Look up an element by id, mutably.
    pub fn element_mut(&mut self, id: Uuid) -> Option<&mut DesignElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Merge a partial update into the matching element.
    ///
    /// A missing id is a logged no-op, never a panic: the editor may race a
    /// patch against a delete within one event batch.
    pub fn update_element(&mut self, id: Uuid, patch: &ElementPatch) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.apply_patch(patch);
                true
            }
            None => {
                warn!("update for unknown element {id} ignored");
                false
            }
        }
    }

    /// Remove the matching element. Returns whether anything was removed.
    ///
    /// Clearing a selection that pointed at the element is the editor's job.
    pub fn remove_element(&mut self, id: Uuid) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        self.elements.len() != before
    }

    /// Topmost element containing the given canvas-space point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&DesignElement> {
        self.elements.iter().rev().find(|e| e.contains(x, y))
    }
}
