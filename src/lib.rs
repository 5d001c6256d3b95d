//! Geometry subsystem for the infinite board.
//!
//! Freeform items (notes, lists, widgets) sit on the board at absolute
//! coordinates. This crate holds the pieces that make moving them feel solid:
//! a bucketed spatial index for proximity and range queries, an alignment
//! guide calculator that produces magnetic snapping during a drag, and a batch
//! layout engine that aligns or grids a selection in one shot.
//!
//! Everything here is synchronous and does no I/O. The host owns the item
//! store and persistence; it feeds rectangles in and applies the positions
//! that come back out.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`rect`] | Rectangle, bounds and point types shared by every module |
//! | [`spatial`] | Grid-bucketed [`spatial::SpatialIndex`] |
//! | [`guides`] | Snap hypotheses, tie-break arbitration and guide lines |
//! | [`layout`] | `smart_align` and `grid_arrange` batch operations |
//! | [`drag`] | [`drag::DragSession`], the pointer-drag pipeline over an owned index |
//! | [`config`] | Environment-driven [`config::GeometryConfig`] |
//! | [`error`] | [`error::GeometryError`] for construction and config failures |
//! | [`consts`] | Shared numeric defaults |

pub mod config;
pub mod consts;
pub mod drag;
pub mod error;
pub mod guides;
pub mod layout;
pub mod rect;
pub mod spatial;

pub use config::GeometryConfig;
pub use drag::DragSession;
pub use error::GeometryError;
pub use guides::{GuideLine, SnapOptions, SnapResult, calculate_snap};
pub use layout::{AlignOptions, Columns, Direction, GridOptions, grid_arrange, smart_align};
pub use rect::{Bounds, ItemId, Point, Rect};
pub use spatial::SpatialIndex;
