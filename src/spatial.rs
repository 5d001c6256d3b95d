//! Grid-bucketed spatial index over board rectangles.
//!
//! DESIGN
//! ======
//! Two maps: `items` owns a copy of every indexed rectangle keyed by id, and
//! `buckets` maps a grid cell to the ids whose *center* falls inside it. The
//! bucket map is derived state; [`SpatialIndex::rebuild`] recomputes it from
//! `items` at any time. Every mutation keeps each id in exactly one bucket, the
//! one its current center hashes to.
//!
//! TRADE-OFFS
//! ==========
//! Radius queries sample the center bucket plus its four axis-aligned
//! neighbours only. Items within the radius whose center lands in a diagonal
//! bucket are missed, so the grid size must stay larger than the typical query
//! radius. Box queries scan every bucket the box touches (widened by the
//! largest half-extent ever indexed) and then filter exactly, so they never
//! miss.

#[cfg(test)]
#[path = "spatial_test.rs"]
mod spatial_test;

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::{GeometryConfig, validate_grid_size};
use crate::consts::DEFAULT_GRID_SIZE;
use crate::error::GeometryError;
use crate::rect::{Bounds, ItemId, Rect};

/// Integer grid cell `(floor(cx / grid), floor(cy / grid))`.
pub type BucketKey = (i64, i64);

/// Bucket offsets sampled by [`SpatialIndex::find_nearby_items`]: self, N, S, W, E.
const NEIGHBOR_OFFSETS: [(i64, i64); 5] = [(0, 0), (0, -1), (0, 1), (-1, 0), (1, 0)];

/// Spatial hash of rectangles for proximity and range queries.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    grid_size: f64,
    items: HashMap<ItemId, Rect>,
    buckets: HashMap<BucketKey, HashSet<ItemId>>,
    /// High-water mark of `max(width, height) / 2` over everything indexed.
    max_half_extent: f64,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialIndex {
    /// Create an empty index with the default 500-unit grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            items: HashMap::new(),
            buckets: HashMap::new(),
            max_half_extent: 0.0,
        }
    }

    /// Create an empty index with a custom bucket size.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGridSize`] unless `grid_size` is finite and positive.
    pub fn with_grid_size(grid_size: f64) -> Result<Self, GeometryError> {
        validate_grid_size(grid_size)?;
        Ok(Self { grid_size, ..Self::new() })
    }

    /// Create an empty index sized from `config`.
    ///
    /// # Errors
    ///
    /// Same as [`with_grid_size`](Self::with_grid_size).
    pub fn from_config(config: &GeometryConfig) -> Result<Self, GeometryError> {
        Self::with_grid_size(config.grid_size)
    }

    #[must_use]
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Number of indexed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of non-empty buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Stored copy of an item.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rect> {
        self.items.get(id)
    }

    /// All stored items, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = &Rect> {
        self.items.values()
    }

    /// Grid cell holding the center of `rect`.
    #[must_use]
    pub fn bucket_key(&self, rect: &Rect) -> BucketKey {
        (self.cell(rect.center_x()), self.cell(rect.center_y()))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell(&self, coord: f64) -> i64 {
        (coord / self.grid_size).floor() as i64
    }

    /// Insert every item. Used once when a board is opened.
    pub fn bulk_load(&mut self, items: impl IntoIterator<Item = Rect>) {
        let before = self.items.len();
        for item in items {
            self.add_item(item);
        }
        tracing::debug!(loaded = self.items.len() - before, buckets = self.buckets.len(), "spatial index bulk load");
    }

    /// Insert or replace an item.
    ///
    /// Replacing an id that is already indexed first drops its old bucket
    /// membership, so the item always lives in exactly one bucket.
    pub fn add_item(&mut self, item: Rect) {
        if let Some(old) = self.items.get(&item.id) {
            let old_key = self.bucket_key(old);
            self.detach(&item.id, old_key);
        }
        let key = self.bucket_key(&item);
        tracing::trace!(id = %item.id, ?key, "index add");
        self.track_extent(&item);
        self.buckets.entry(key).or_default().insert(item.id.clone());
        self.items.insert(item.id.clone(), item);
    }

    /// Remove an item. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &str) {
        let Some(item) = self.items.remove(id) else {
            tracing::trace!(id, "index remove: unknown id");
            return;
        };
        let key = self.bucket_key(&item);
        tracing::trace!(id, ?key, "index remove");
        self.detach(id, key);
    }

    /// Move and resize an item in one step. Unknown ids are ignored.
    pub fn update_item_position(&mut self, id: &str, x: f64, y: f64, width: f64, height: f64) {
        let Some(stored) = self.items.get(id) else {
            tracing::trace!(id, "index update: unknown id");
            return;
        };
        let old_key = self.bucket_key(stored);
        self.detach(id, old_key);

        let Some(stored) = self.items.get_mut(id) else {
            return;
        };
        stored.x = x;
        stored.y = y;
        stored.width = width;
        stored.height = height;
        let moved = stored.clone();

        let new_key = self.bucket_key(&moved);
        tracing::trace!(id, ?old_key, ?new_key, "index move");
        self.track_extent(&moved);
        self.buckets.entry(new_key).or_default().insert(moved.id);
    }

    /// Write back positions produced by a layout pass. Ids that are not
    /// indexed are ignored.
    pub fn sync_positions(&mut self, rects: &[Rect]) {
        for rect in rects {
            self.update_item_position(&rect.id, rect.x, rect.y, rect.width, rect.height);
        }
    }

    /// Items whose center is within `radius` of `item`'s center, excluding
    /// `item` itself, ordered by id.
    ///
    /// Only the center bucket and its four axis-aligned neighbours are
    /// searched; diagonal buckets are never sampled.
    #[must_use]
    pub fn find_nearby_items(&self, item: &Rect, radius: f64) -> Vec<&Rect> {
        let (bx, by) = self.bucket_key(item);
        let mut candidates: BTreeSet<&str> = BTreeSet::new();
        for (dx, dy) in NEIGHBOR_OFFSETS {
            if let Some(ids) = self.buckets.get(&(bx.saturating_add(dx), by.saturating_add(dy))) {
                candidates.extend(ids.iter().map(String::as_str));
            }
        }
        candidates
            .into_iter()
            .filter(|id| *id != item.id)
            .filter_map(|id| self.items.get(id))
            .filter(|other| item.center_distance(other) <= radius)
            .collect()
    }

    /// Items overlapping `area` (edge contact excluded), ordered by id.
    #[must_use]
    pub fn find_items_in_box(&self, area: &Bounds) -> Vec<&Rect> {
        // A rect's center can sit up to half its size outside the area it overlaps.
        let pad = self.max_half_extent;
        let (min_x, max_x) = (self.cell(area.x - pad), self.cell(area.right() + pad));
        let (min_y, max_y) = (self.cell(area.y - pad), self.cell(area.bottom() + pad));

        let mut candidates: BTreeSet<&str> = BTreeSet::new();
        if self.buckets.len() < bucket_span(min_x, max_x, min_y, max_y) {
            for (&(bx, by), ids) in &self.buckets {
                if (min_x..=max_x).contains(&bx) && (min_y..=max_y).contains(&by) {
                    candidates.extend(ids.iter().map(String::as_str));
                }
            }
        } else {
            for bx in min_x..=max_x {
                for by in min_y..=max_y {
                    if let Some(ids) = self.buckets.get(&(bx, by)) {
                        candidates.extend(ids.iter().map(String::as_str));
                    }
                }
            }
        }

        candidates
            .into_iter()
            .filter_map(|id| self.items.get(id))
            .filter(|item| item.intersects(area))
            .collect()
    }

    /// Recompute the bucket map and extent mark from the stored items.
    pub fn rebuild(&mut self) {
        self.buckets.clear();
        self.max_half_extent = 0.0;
        let keyed: Vec<(BucketKey, ItemId)> =
            self.items.values().map(|item| (self.bucket_key(item), item.id.clone())).collect();
        for (key, id) in keyed {
            self.buckets.entry(key).or_default().insert(id);
        }
        for item in self.items.values() {
            self.max_half_extent = self.max_half_extent.max(half_extent(item));
        }
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.buckets.clear();
        self.max_half_extent = 0.0;
    }

    fn detach(&mut self, id: &str, key: BucketKey) {
        if let Some(ids) = self.buckets.get_mut(&key) {
            ids.remove(id);
            if ids.is_empty() {
                self.buckets.remove(&key);
            }
        }
    }

    fn track_extent(&mut self, item: &Rect) {
        self.max_half_extent = self.max_half_extent.max(half_extent(item));
    }
}

fn half_extent(item: &Rect) -> f64 {
    item.width.max(item.height) / 2.0
}

/// Number of cells in an inclusive bucket range, saturating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bucket_span(min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> usize {
    let w = max_x.saturating_sub(min_x).saturating_add(1).max(0) as u64;
    let h = max_y.saturating_sub(min_y).saturating_add(1).max(0) as u64;
    usize::try_from(w.saturating_mul(h)).unwrap_or(usize::MAX)
}
