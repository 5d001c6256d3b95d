//! Shared numeric constants for the geometry crate.

// ── Spatial index ───────────────────────────────────────────────

/// Default bucket edge length in world units.
pub const DEFAULT_GRID_SIZE: f64 = 500.0;

// ── Snapping ────────────────────────────────────────────────────

/// Default snap distance in world units. Hypotheses at or beyond it are dropped.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 10.0;

/// How far a selection frame's handles sit outside the selected content, per side.
pub const SELECTION_PADDING: f64 = 20.0;

/// How far a guide line extends past the outermost snapped edge, per end.
pub const GUIDE_OUTSET: f64 = 20.0;

/// `kind` tag the host gives to the multi-selection frame.
pub const SELECTION_KIND: &str = "selection";

// ── Layout ──────────────────────────────────────────────────────

/// Default gap between neighbouring items placed by the layout engine.
pub const DEFAULT_LAYOUT_SPACING: f64 = 10.0;

/// `smart_align` needs at least this many items to do anything.
pub const MIN_ALIGN_ITEMS: usize = 2;

/// `grid_arrange` needs at least this many items to do anything.
pub const MIN_GRID_ITEMS: usize = 3;
