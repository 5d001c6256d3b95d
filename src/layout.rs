//! Layout engine: one-shot repositioning of a selection.
//!
//! Two operations, both pure: [`smart_align`] flushes a selection against one
//! edge and chains it with even spacing, [`grid_arrange`] lays it out
//! row-major in a grid. Each takes a slice and returns a new, repositioned
//! `Vec`; the caller's items are never touched. Neither touches the spatial
//! index either; hosts push the result back with
//! [`SpatialIndex::sync_positions`](crate::spatial::SpatialIndex::sync_positions).
//!
//! Internally every pass works on indices into one working copy and collects
//! new positions separately, so clustering never aliases the output.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LAYOUT_SPACING, MIN_ALIGN_ITEMS, MIN_GRID_ITEMS};
use crate::rect::{Point, Rect};

// =============================================================================
// OPTIONS
// =============================================================================

/// Edge to align a selection against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
    /// Anything unrecognized. Aligning in this direction is a no-op.
    #[serde(other)]
    Other,
}

impl From<&str> for Direction {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Other,
        }
    }
}

impl Direction {
    /// Orientation whose clusters survive alignment in this direction.
    fn native_orientation(self) -> Option<Orientation> {
        match self {
            Self::Left | Self::Right => Some(Orientation::Row),
            Self::Top | Self::Bottom => Some(Orientation::Column),
            Self::Other => None,
        }
    }

    /// True for directions that pin the far edge (right, bottom).
    fn is_trailing(self) -> bool {
        matches!(self, Self::Right | Self::Bottom)
    }
}

/// Options for [`smart_align`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignOptions {
    pub direction: Direction,
    /// Sort by `kind` first and keep kinds in contiguous bands.
    #[serde(default, alias = "group_by_kind")]
    pub sort: bool,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
}

impl AlignOptions {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self { direction, sort: false, spacing: DEFAULT_LAYOUT_SPACING }
    }
}

/// Column count for [`grid_arrange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ColumnsRepr", into = "ColumnsRepr")]
pub enum Columns {
    /// `ceil(sqrt(n))` columns.
    #[default]
    Auto,
    /// A fixed count; zero is treated as one.
    Fixed(usize),
}

impl Columns {
    /// Concrete column count for `n` items.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn resolve(self, n: usize) -> usize {
        match self {
            Self::Auto => ((n as f64).sqrt().ceil() as usize).max(1),
            Self::Fixed(c) => c.max(1),
        }
    }
}

impl FromStr for Columns {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        raw.parse::<usize>()
            .map(Self::Fixed)
            .map_err(|_| format!("invalid column count '{raw}' (expected 'auto' or a number)"))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColumnsRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<ColumnsRepr> for Columns {
    type Error = String;

    fn try_from(repr: ColumnsRepr) -> Result<Self, Self::Error> {
        match repr {
            ColumnsRepr::Count(c) => Ok(Self::Fixed(c)),
            ColumnsRepr::Keyword(word) => word.parse(),
        }
    }
}

impl From<Columns> for ColumnsRepr {
    fn from(columns: Columns) -> Self {
        match columns {
            Columns::Auto => Self::Keyword("auto".into()),
            Columns::Fixed(c) => Self::Count(c),
        }
    }
}

/// Options for [`grid_arrange`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub columns: Columns,
    /// Sort by `kind` first and never mix two kinds in one row.
    #[serde(alias = "group_by_kind")]
    pub sort: bool,
    pub spacing: f64,
    /// Left edge of the grid; defaults to the leftmost item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_x: Option<f64>,
    /// Top edge of the grid; defaults to the topmost item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_y: Option<f64>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self { columns: Columns::Auto, sort: false, spacing: DEFAULT_LAYOUT_SPACING, start_x: None, start_y: None }
    }
}

fn default_spacing() -> f64 {
    DEFAULT_LAYOUT_SPACING
}

// =============================================================================
// ORIENTATION AND CLUSTERING
// =============================================================================

/// Which way a selection is predominantly spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Spread horizontally.
    Row,
    /// Spread vertically.
    Column,
}

fn mean_gap(mut coords: Vec<f64>) -> f64 {
    if coords.len() < 2 {
        return 0.0;
    }
    coords.sort_by(f64::total_cmp);
    let total: f64 = coords.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    #[allow(clippy::cast_precision_loss)]
    let gaps = (coords.len() - 1) as f64;
    total / gaps
}

/// Row if consecutive x positions are on average further apart than
/// consecutive y positions, column otherwise (ties included).
#[must_use]
pub fn infer_orientation(items: &[Rect]) -> Orientation {
    let x_gap = mean_gap(items.iter().map(|r| r.x).collect());
    let y_gap = mean_gap(items.iter().map(|r| r.y).collect());
    if x_gap > y_gap { Orientation::Row } else { Orientation::Column }
}

fn by_coord(items: &[Rect], coord: fn(&Rect) -> f64) -> impl Fn(&usize, &usize) -> Ordering + '_ {
    move |&a, &b| coord(&items[a]).total_cmp(&coord(&items[b]))
}

/// Single greedy pass along `main`: an item joins the open cluster when its
/// `main` coordinate is within half its own `size` of the cluster's first
/// item. Each cluster is then ordered along `cross`.
fn cluster(items: &[Rect], main: fn(&Rect) -> f64, size: fn(&Rect) -> f64, cross: fn(&Rect) -> f64) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(by_coord(items, main));

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut reference = 0.0;
    for idx in order {
        let item = &items[idx];
        match clusters.last_mut() {
            Some(open) if (main(item) - reference).abs() <= size(item) / 2.0 => open.push(idx),
            _ => {
                reference = main(item);
                clusters.push(vec![idx]);
            }
        }
    }
    for members in &mut clusters {
        members.sort_by(by_coord(items, cross));
    }
    clusters
}

/// Cluster items into rows (by `y`), each row ordered left to right.
/// Returns indices into `items`.
#[must_use]
pub fn group_by_rows(items: &[Rect]) -> Vec<Vec<usize>> {
    cluster(items, top, height, left)
}

/// Cluster items into columns (by `x`), each column ordered top to bottom.
/// Returns indices into `items`.
#[must_use]
pub fn group_by_columns(items: &[Rect]) -> Vec<Vec<usize>> {
    cluster(items, left, width, top)
}

// =============================================================================
// SMART ALIGN
// =============================================================================

/// Accessors for the axis items are chained along.
#[derive(Clone, Copy)]
struct Track {
    pos: fn(&Rect) -> f64,
    size: fn(&Rect) -> f64,
    set: fn(&mut Point, f64),
}

fn left(r: &Rect) -> f64 {
    r.x
}

fn top(r: &Rect) -> f64 {
    r.y
}

fn width(r: &Rect) -> f64 {
    r.width
}

fn height(r: &Rect) -> f64 {
    r.height
}

fn set_x(p: &mut Point, v: f64) {
    p.x = v;
}

fn set_y(p: &mut Point, v: f64) {
    p.y = v;
}

const HORIZONTAL: Track = Track { pos: left, size: width, set: set_x };
const VERTICAL: Track = Track { pos: top, size: height, set: set_y };

/// Chain `members` along `track` with `spacing` gaps, starting at `start`
/// (leading) or ending at `end` (trailing, laid out back to front).
fn chain(items: &[Rect], members: &[usize], track: Track, trailing: bool, spacing: f64, out: &mut [Point]) {
    if trailing {
        let mut cursor = members
            .iter()
            .map(|&i| (track.pos)(&items[i]) + (track.size)(&items[i]))
            .fold(f64::NEG_INFINITY, f64::max);
        for &i in members.iter().rev() {
            let at = cursor - (track.size)(&items[i]);
            (track.set)(&mut out[i], at);
            cursor = at - spacing;
        }
    } else {
        let mut cursor = members.iter().map(|&i| (track.pos)(&items[i])).fold(f64::INFINITY, f64::min);
        for &i in members {
            (track.set)(&mut out[i], cursor);
            cursor += (track.size)(&items[i]) + spacing;
        }
    }
}

/// Contiguous runs of equal `kind` in `items` order.
fn kind_bands(items: &[Rect]) -> Vec<Vec<usize>> {
    let mut bands: Vec<Vec<usize>> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match bands.last_mut() {
            Some(band) if items[band[0]].kind == item.kind => band.push(idx),
            _ => bands.push(vec![idx]),
        }
    }
    bands
}

/// Align a selection against one edge.
///
/// When the selection is spread along the direction's own axis (a row
/// aligned left/right, a column aligned top/bottom) each row or column is
/// packed against its own extreme edge. Otherwise everything collapses onto
/// the global extreme edge and is stacked single file across it, ordered by
/// original position (per `kind` band when sorting).
///
/// Fewer than two items, or [`Direction::Other`], return the input unchanged.
///
/// # Limitations
///
/// A second pass reproduces the first only while the inferred orientation
/// stays the same. Packing a row shrinks its x gaps, and when they drop
/// below the mean y gap the next pass sees a column and stacks the items.
#[must_use]
pub fn smart_align(items: &[Rect], opts: &AlignOptions) -> Vec<Rect> {
    if items.len() < MIN_ALIGN_ITEMS {
        tracing::trace!(count = items.len(), "smart align: not enough items");
        return items.to_vec();
    }
    let Some(native) = opts.direction.native_orientation() else {
        tracing::trace!(direction = ?opts.direction, "smart align: unknown direction");
        return items.to_vec();
    };

    let mut work = items.to_vec();
    if opts.sort {
        work.sort_by(|a, b| a.kind.cmp(&b.kind));
    }
    let orientation = infer_orientation(&work);
    let trailing = opts.direction.is_trailing();
    let mut positions: Vec<Point> = work.iter().map(|r| Point::new(r.x, r.y)).collect();

    if orientation == native {
        let (clusters, track) = match native {
            Orientation::Row => (group_by_rows(&work), HORIZONTAL),
            Orientation::Column => (group_by_columns(&work), VERTICAL),
        };
        for members in &clusters {
            chain(&work, members, track, trailing, opts.spacing, &mut positions);
        }
        tracing::debug!(
            count = work.len(),
            ?orientation,
            clusters = clusters.len(),
            direction = ?opts.direction,
            "smart align: packed clusters"
        );
    } else {
        // Pinned axis is the direction's own; items stack along the other.
        let (pinned, stacked) = match native {
            Orientation::Row => (HORIZONTAL, VERTICAL),
            Orientation::Column => (VERTICAL, HORIZONTAL),
        };
        let edge = if trailing {
            work.iter().map(|r| (pinned.pos)(r) + (pinned.size)(r)).fold(f64::NEG_INFINITY, f64::max)
        } else {
            work.iter().map(|r| (pinned.pos)(r)).fold(f64::INFINITY, f64::min)
        };
        for (item, pos) in work.iter().zip(positions.iter_mut()) {
            let at = if trailing { edge - (pinned.size)(item) } else { edge };
            (pinned.set)(pos, at);
        }

        let bands = if opts.sort { kind_bands(&work) } else { vec![(0..work.len()).collect()] };
        let mut cursor = work.iter().map(|r| (stacked.pos)(r)).fold(f64::INFINITY, f64::min);
        for mut band in bands {
            band.sort_by(by_coord(&work, stacked.pos));
            for idx in band {
                (stacked.set)(&mut positions[idx], cursor);
                cursor += (stacked.size)(&work[idx]) + opts.spacing;
            }
        }
        tracing::debug!(
            count = work.len(),
            ?orientation,
            direction = ?opts.direction,
            sorted = opts.sort,
            "smart align: stacked"
        );
    }

    for (item, pos) in work.iter_mut().zip(positions) {
        item.x = pos.x;
        item.y = pos.y;
    }
    work
}

// =============================================================================
// GRID ARRANGE
// =============================================================================

/// Lay items out row-major in a grid.
///
/// Each row is as tall as its tallest item; columns are not aligned across
/// rows (every item advances the cursor by its own width). With `sort`, a
/// new row starts whenever the `kind` changes.
///
/// Fewer than three items return the input unchanged.
#[must_use]
pub fn grid_arrange(items: &[Rect], opts: &GridOptions) -> Vec<Rect> {
    if items.len() < MIN_GRID_ITEMS {
        tracing::trace!(count = items.len(), "grid arrange: not enough items");
        return items.to_vec();
    }

    let mut work = items.to_vec();
    if opts.sort {
        work.sort_by(|a, b| a.kind.cmp(&b.kind));
    }
    let columns = opts.columns.resolve(work.len());
    let start_x = opts.start_x.unwrap_or_else(|| work.iter().map(|r| r.x).fold(f64::INFINITY, f64::min));
    let start_y = opts.start_y.unwrap_or_else(|| work.iter().map(|r| r.y).fold(f64::INFINITY, f64::min));

    let (mut cur_x, mut cur_y) = (start_x, start_y);
    let mut row_height = 0.0_f64;
    let mut in_row = 0_usize;
    let mut rows = 0_usize;
    let mut prev_kind: Option<String> = None;

    for item in &mut work {
        let kind_changed = prev_kind.as_deref().is_some_and(|k| k != item.kind);
        if opts.sort && kind_changed && in_row > 0 {
            cur_y += row_height + opts.spacing;
            cur_x = start_x;
            row_height = 0.0;
            in_row = 0;
            rows += 1;
        }
        prev_kind = Some(item.kind.clone());

        item.x = cur_x;
        item.y = cur_y;
        cur_x += item.width + opts.spacing;
        row_height = row_height.max(item.height);
        in_row += 1;

        if in_row == columns {
            cur_y += row_height + opts.spacing;
            cur_x = start_x;
            row_height = 0.0;
            in_row = 0;
            rows += 1;
        }
    }
    if in_row > 0 {
        rows += 1;
    }

    tracing::debug!(count = work.len(), columns, rows, sorted = opts.sort, "grid arrange");
    work
}
