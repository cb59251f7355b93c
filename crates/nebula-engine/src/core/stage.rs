//! Stage: the engine's view of the page.
//!
//! The bridge registers every element that can anchor an effect and pushes
//! rect updates on layout changes. Geometry lookups return `Option` — a
//! removed element makes the consuming effect complete early instead of
//! failing. Re-registering an id bumps its generation so behavior scheduled
//! against the old element can detect it went stale.

use glam::Vec2;

use crate::api::types::AnchorId;

/// Screen-space rectangle of an anchored element (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl AnchorRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        AnchorRect { x, y, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A registered DOM anchor.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub id: AnchorId,
    pub rect: AnchorRect,
    pub generation: u32,
}

/// Flat registry of anchors. Designed for tens of elements, not thousands.
#[derive(Default)]
pub struct Stage {
    anchors: Vec<Anchor>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an anchor, or refresh it if the id is already present.
    /// Re-registering bumps the generation: the element was replaced.
    pub fn register(&mut self, id: AnchorId, rect: AnchorRect) {
        if let Some(anchor) = self.anchors.iter_mut().find(|a| a.id == id) {
            anchor.rect = rect;
            anchor.generation += 1;
        } else {
            self.anchors.push(Anchor {
                id,
                rect,
                generation: 0,
            });
        }
    }

    /// Update an anchor's rect after layout/resize. Unknown ids are ignored.
    pub fn update_rect(&mut self, id: AnchorId, rect: AnchorRect) {
        if let Some(anchor) = self.anchors.iter_mut().find(|a| a.id == id) {
            anchor.rect = rect;
        }
    }

    /// Remove an anchor (element left the document).
    pub fn remove(&mut self, id: AnchorId) -> bool {
        if let Some(idx) = self.anchors.iter().position(|a| a.id == id) {
            self.anchors.swap_remove(idx);
            true
        } else {
            false
        }
    }

    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    /// Center of an anchor, or `None` when it is gone.
    pub fn center(&self, id: AnchorId) -> Option<Vec2> {
        self.get(id).map(|a| a.rect.center())
    }

    /// Center of an anchor only if it still carries the expected generation.
    pub fn center_at_generation(&self, id: AnchorId, generation: u32) -> Option<Vec2> {
        self.get(id)
            .filter(|a| a.generation == generation)
            .map(|a| a.rect.center())
    }

    pub fn generation(&self, id: AnchorId) -> Option<u32> {
        self.get(id).map(|a| a.generation)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }
}

/// The one owner of the global screen offset (screen shake).
///
/// Exactly one writer exists — the screen-effect system — so two effects can
/// never fight over the page transform. The bridge reads the offset from the
/// frame header and applies it to the page container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    offset: Vec2,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub(crate) fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }
}
