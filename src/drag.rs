//! Pointer-drag pipeline over an owned spatial index.
//!
//! A [`DragSession`] is what the host's interaction controller holds. It owns
//! the board's [`SpatialIndex`] (constructed and injected by the host, one per
//! board surface) and runs the per-move loop:
//!
//! 1. `begin` snapshots the item being dragged;
//! 2. each `pointer_move` asks the index for neighbours of the tentative
//!    position, snaps against them and keeps the corrected position;
//! 3. `end` writes the final position back into the index and hands it to
//!    the host for persistence, while `cancel` leaves the index untouched.
//!
//! The index is never updated mid-drag: the mover's stale entry is skipped by
//! id when snapping.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::collections::HashSet;

use crate::config::GeometryConfig;
use crate::guides::{SnapOptions, SnapResult, calculate_snap};
use crate::rect::{ItemId, Rect};
use crate::spatial::SpatialIndex;

/// State for one drag in progress.
#[derive(Debug, Clone)]
struct ActiveDrag {
    origin: Rect,
    current: Rect,
    /// Ids that move along with the dragged rectangle and must not attract it.
    excluded: HashSet<ItemId>,
}

/// Drag controller: owns the spatial index and at most one active drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    index: SpatialIndex,
    snap: SnapOptions,
    neighbor_radius: f64,
    active: Option<ActiveDrag>,
}

impl DragSession {
    /// Wrap an already-loaded index.
    #[must_use]
    pub fn new(index: SpatialIndex, config: &GeometryConfig) -> Self {
        Self { index, snap: SnapOptions::from(config), neighbor_radius: config.neighbor_radius, active: None }
    }

    #[must_use]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Mutable access for host-driven store changes (adds, removes, remote moves).
    pub fn index_mut(&mut self) -> &mut SpatialIndex {
        &mut self.index
    }

    #[must_use]
    pub fn into_index(self) -> SpatialIndex {
        self.index
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Start dragging an indexed item. Returns `false` (and does nothing) for
    /// an unknown id. Any drag already in progress is abandoned.
    pub fn begin(&mut self, id: &str) -> bool {
        let Some(rect) = self.index.get(id) else {
            tracing::trace!(id, "drag begin: unknown id");
            return false;
        };
        let rect = rect.clone();
        self.start(rect, HashSet::new());
        true
    }

    /// Start dragging a selection frame, which is usually not indexed itself.
    /// `members` are the selected items; they travel with the frame and are
    /// never snap targets.
    pub fn begin_selection(&mut self, frame: Rect, members: impl IntoIterator<Item = ItemId>) {
        self.start(frame, members.into_iter().collect());
    }

    fn start(&mut self, rect: Rect, excluded: HashSet<ItemId>) {
        if let Some(stale) = self.active.take() {
            tracing::debug!(id = %stale.origin.id, "drag abandoned by new drag");
        }
        tracing::debug!(id = %rect.id, kind = %rect.kind, "drag begin");
        self.active = Some(ActiveDrag { origin: rect.clone(), current: rect, excluded });
    }

    /// Feed the tentative origin of the dragged rectangle. Returns the guides
    /// and corrected position, or `None` when no drag is active.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<SnapResult> {
        let drag = self.active.as_mut()?;
        drag.current.x = x;
        drag.current.y = y;

        let neighbors: Vec<&Rect> = self
            .index
            .find_nearby_items(&drag.current, self.neighbor_radius)
            .into_iter()
            .filter(|r| !drag.excluded.contains(&r.id))
            .collect();
        let result = calculate_snap(&drag.current, &neighbors, &self.snap);

        drag.current.x = result.snapped_position.x;
        drag.current.y = result.snapped_position.y;
        Some(result)
    }

    /// Rectangle at its latest corrected position, if dragging.
    #[must_use]
    pub fn current(&self) -> Option<&Rect> {
        self.active.as_ref().map(|d| &d.current)
    }

    /// Finish the drag: commit the last corrected position to the index and
    /// return it for persistence. Rectangles the index does not hold (a
    /// selection frame) are returned without touching the index.
    pub fn end(&mut self) -> Option<Rect> {
        let drag = self.active.take()?;
        let fin = drag.current;
        self.index.update_item_position(&fin.id, fin.x, fin.y, fin.width, fin.height);
        tracing::debug!(id = %fin.id, from_x = drag.origin.x, from_y = drag.origin.y, x = fin.x, y = fin.y, "drag end");
        Some(fin)
    }

    /// Abandon the drag. The index is left as it was; the original rectangle
    /// is returned so the host can restore it.
    pub fn cancel(&mut self) -> Option<Rect> {
        let drag = self.active.take()?;
        tracing::debug!(id = %drag.origin.id, "drag cancelled");
        Some(drag.origin)
    }

    /// Resynchronize the index with the output of a layout pass.
    pub fn apply_layout(&mut self, rects: &[Rect]) {
        self.index.sync_positions(rects);
        tracing::debug!(count = rects.len(), "layout applied to index");
    }
}
