//! Data model: rectangles, query boxes and points on the board.
//!
//! `Rect` is the only shape the geometry subsystem understands. The host item
//! store turns notes, lists and widgets into rectangles (with an opaque `kind`
//! tag) before handing them to the index, the snap calculator or the layout
//! engine. Everything is axis-aligned; rotation is not modelled.

#[cfg(test)]
#[path = "rect_test.rs"]
mod rect_test;

use serde::{Deserialize, Serialize};

/// Unique identifier for a board item, as issued by the host store.
pub type ItemId = String;

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An anonymous axis-aligned box, used for range queries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Open-interval overlap test: boxes that only touch along an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.right() <= other.x || other.right() <= self.x || self.bottom() <= other.y || other.bottom() <= self.y)
    }
}

/// A board item as seen by the geometry subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Host-assigned identifier, unique within any live collection.
    pub id: ItemId,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// Width in world units, never negative.
    pub width: f64,
    /// Height in world units, never negative.
    pub height: f64,
    /// Opaque category tag. Only used for grouping and sorting, and to detect
    /// the selection frame.
    #[serde(default)]
    pub kind: String,
}

impl Rect {
    /// Create a rectangle with an empty `kind`.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { id: id.into(), x, y, width, height, kind: String::new() }
    }

    /// Builder-style setter for `kind`.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// The rectangle's geometry without its identity.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Center-to-center Euclidean distance.
    #[must_use]
    pub fn center_distance(&self, other: &Rect) -> f64 {
        self.center().distance_to(other.center())
    }

    /// Open-interval overlap test against a query box.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.bounds().intersects(other)
    }

    /// Shrink by `inset` on every side. Used for the selection frame, whose
    /// handles are drawn outside the content it wraps.
    #[must_use]
    pub fn inset(&self, inset: f64) -> Bounds {
        Bounds::new(self.x + inset, self.y + inset, self.width - 2.0 * inset, self.height - 2.0 * inset)
    }
}
