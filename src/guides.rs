//! Alignment guides: magnetic snapping for an item being dragged.
//!
//! Each axis is solved on its own. For every nearby candidate the mover's
//! edges and center are compared against the candidate's through a fixed
//! catalog of [`AlignKind`]s. Every comparison closer than the threshold
//! becomes a [`Hypothesis`]; [`select_winner`] then arbitrates:
//!
//! 1. smallest distance wins;
//! 2. among equally close hypotheses, the lowest priority number wins;
//! 3. among equal priorities, the alignment kind registered first wins, and a
//!    kind registered more than once keeps its latest registration.
//!
//! The selection frame is special: its handles are drawn `selection_padding`
//! outside the content, so snapping works on the inset rectangle and the
//! result is translated back out.

#[cfg(test)]
#[path = "guides_test.rs"]
mod guides_test;

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;
use crate::consts::{DEFAULT_SNAP_THRESHOLD, GUIDE_OUTSET, SELECTION_KIND, SELECTION_PADDING};
use crate::rect::{Bounds, Point, Rect};

/// Axis a hypothesis moves the mover along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// One entry in the fixed comparison catalog: which mover feature lines up
/// with which candidate feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignKind {
    LeftToLeft,
    RightToRight,
    CenterX,
    LeftToRight,
    RightToLeft,
    TopToTop,
    BottomToBottom,
    CenterY,
    TopToCenter,
    BottomToCenter,
    TopToBottom,
    BottomToTop,
}

impl AlignKind {
    pub const X_CATALOG: [AlignKind; 5] =
        [Self::LeftToLeft, Self::RightToRight, Self::CenterX, Self::LeftToRight, Self::RightToLeft];

    pub const Y_CATALOG: [AlignKind; 7] = [
        Self::TopToTop,
        Self::BottomToBottom,
        Self::CenterY,
        Self::TopToCenter,
        Self::BottomToCenter,
        Self::TopToBottom,
        Self::BottomToTop,
    ];

    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::LeftToLeft | Self::RightToRight | Self::CenterX | Self::LeftToRight | Self::RightToLeft => Axis::X,
            _ => Axis::Y,
        }
    }

    /// Lower is stronger: edge-to-same-edge, then centers, then edge-to-opposite.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Self::LeftToLeft | Self::RightToRight | Self::TopToTop | Self::BottomToBottom => 1,
            Self::CenterX | Self::CenterY => 2,
            Self::LeftToRight | Self::RightToLeft | Self::TopToCenter | Self::BottomToCenter => 3,
            Self::TopToBottom | Self::BottomToTop => 4,
        }
    }

    /// `(mover value, candidate value, resulting mover origin)` for this kind.
    ///
    /// The origin is the mover's new left (x axis) or top (y axis) edge that
    /// realizes the alignment.
    fn measure(self, mover: &Bounds, other: &Rect) -> (f64, f64, f64) {
        let (mw, mh) = (mover.width, mover.height);
        let (m_cx, m_cy) = (mover.x + mw / 2.0, mover.y + mh / 2.0);
        match self {
            Self::LeftToLeft => (mover.x, other.x, other.x),
            Self::RightToRight => (mover.right(), other.right(), other.right() - mw),
            Self::CenterX => (m_cx, other.center_x(), other.center_x() - mw / 2.0),
            Self::LeftToRight => (mover.x, other.right(), other.right()),
            Self::RightToLeft => (mover.right(), other.x, other.x - mw),
            Self::TopToTop => (mover.y, other.y, other.y),
            Self::BottomToBottom => (mover.bottom(), other.bottom(), other.bottom() - mh),
            Self::CenterY => (m_cy, other.center_y(), other.center_y() - mh / 2.0),
            Self::TopToCenter => (mover.y, other.center_y(), other.center_y()),
            Self::BottomToCenter => (mover.bottom(), other.center_y(), other.center_y() - mh),
            Self::TopToBottom => (mover.y, other.bottom(), other.bottom()),
            Self::BottomToTop => (mover.bottom(), other.y, other.y - mh),
        }
    }
}

/// A renderable guide segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    pub start_x: f64,
    pub start_y: f64,
    pub length: f64,
    pub is_vertical: bool,
}

/// A candidate alignment, alive for one query only.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub kind: AlignKind,
    /// Candidate coordinate the mover lines up with; where the guide is drawn.
    pub value: f64,
    /// `|mover value - candidate value|`.
    pub distance: f64,
    /// Mover's (active) left or top edge after snapping.
    pub resulting: f64,
    pub guide: GuideLine,
}

impl Hypothesis {
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.kind.axis()
    }

    #[must_use]
    pub fn priority(&self) -> u8 {
        self.kind.priority()
    }
}

/// Tunables for [`calculate_snap`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapOptions {
    /// Hypotheses at or beyond this distance are dropped.
    pub threshold: f64,
    /// Inset applied to rectangles whose kind is `"selection"`.
    pub selection_padding: f64,
    /// Guide extension past the outermost edge, per end.
    pub guide_outset: f64,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self { threshold: DEFAULT_SNAP_THRESHOLD, selection_padding: SELECTION_PADDING, guide_outset: GUIDE_OUTSET }
    }
}

impl From<&GeometryConfig> for SnapOptions {
    fn from(config: &GeometryConfig) -> Self {
        Self {
            threshold: config.snap_threshold,
            selection_padding: config.selection_padding,
            guide_outset: config.guide_outset,
        }
    }
}

/// Guides to draw and the corrected mover position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Zero, one or two guides: at most one vertical (x snap) and one horizontal (y snap).
    pub snap_lines: Vec<GuideLine>,
    /// Mover origin to apply. Axes without a winner keep the original coordinate.
    pub snapped_position: Point,
}

/// Rectangle actually compared against candidates, and how far it sits
/// inside the raw rectangle.
fn active_bounds(mover: &Rect, opts: &SnapOptions) -> (Bounds, f64) {
    if mover.kind == SELECTION_KIND {
        (mover.inset(opts.selection_padding), opts.selection_padding)
    } else {
        (mover.bounds(), 0.0)
    }
}

fn guide_for(axis: Axis, value: f64, mover: &Bounds, other: &Rect, outset: f64) -> GuideLine {
    match axis {
        Axis::X => {
            let top = mover.y.min(other.y);
            let bottom = mover.bottom().max(other.bottom());
            GuideLine { start_x: value, start_y: top - outset, length: bottom - top + 2.0 * outset, is_vertical: true }
        }
        Axis::Y => {
            let left = mover.x.min(other.x);
            let right = mover.right().max(other.right());
            GuideLine { start_x: left - outset, start_y: value, length: right - left + 2.0 * outset, is_vertical: false }
        }
    }
}

/// Every hypothesis on `axis` closer than the threshold, in candidate order
/// then catalog order. The mover itself (same id) is skipped.
#[must_use]
pub fn hypotheses<'a>(
    mover: &Rect,
    candidates: impl IntoIterator<Item = &'a Rect>,
    axis: Axis,
    opts: &SnapOptions,
) -> Vec<Hypothesis> {
    let (active, _) = active_bounds(mover, opts);
    let catalog: &[AlignKind] = match axis {
        Axis::X => &AlignKind::X_CATALOG,
        Axis::Y => &AlignKind::Y_CATALOG,
    };

    let mut out = Vec::new();
    for other in candidates {
        if other.id == mover.id {
            continue;
        }
        for &kind in catalog {
            let (mine, theirs, resulting) = kind.measure(&active, other);
            let distance = (mine - theirs).abs();
            if distance.is_nan() || distance >= opts.threshold {
                continue;
            }
            out.push(Hypothesis {
                kind,
                value: theirs,
                distance,
                resulting,
                guide: guide_for(axis, theirs, &active, other, opts.guide_outset),
            });
        }
    }
    out
}

/// Pick the winning hypothesis: minimum distance, then minimum priority,
/// then first-registered kind (whose latest registration is used).
#[must_use]
#[allow(clippy::float_cmp)]
pub fn select_winner(hyps: &[Hypothesis]) -> Option<&Hypothesis> {
    let best = hyps.iter().map(|h| h.distance).fold(f64::INFINITY, f64::min);

    // Kinds in first-registration order, each holding its latest registration.
    let mut slots: Vec<&Hypothesis> = Vec::new();
    for h in hyps.iter().filter(|h| h.distance == best) {
        match slots.iter_mut().find(|slot| slot.kind == h.kind) {
            Some(slot) => *slot = h,
            None => slots.push(h),
        }
    }

    let mut winner: Option<&Hypothesis> = None;
    for h in slots {
        if winner.is_none_or(|w| h.priority() < w.priority()) {
            winner = Some(h);
        }
    }
    winner
}

/// Snap `mover` against `candidates` on both axes.
///
/// Candidates are typically the result of
/// [`SpatialIndex::find_nearby_items`](crate::spatial::SpatialIndex::find_nearby_items).
/// Their order matters only for exact ties.
#[must_use]
pub fn calculate_snap(mover: &Rect, candidates: &[&Rect], opts: &SnapOptions) -> SnapResult {
    let (_, pad) = active_bounds(mover, opts);
    let mut snap_lines = Vec::with_capacity(2);
    let mut snapped_position = Point::new(mover.x, mover.y);

    let x_hyps = hypotheses(mover, candidates.iter().copied(), Axis::X, opts);
    if let Some(win) = select_winner(&x_hyps) {
        tracing::debug!(id = %mover.id, kind = ?win.kind, value = win.value, distance = win.distance, "snap x");
        snap_lines.push(win.guide);
        snapped_position.x = win.resulting - pad;
    }

    let y_hyps = hypotheses(mover, candidates.iter().copied(), Axis::Y, opts);
    if let Some(win) = select_winner(&y_hyps) {
        tracing::debug!(id = %mover.id, kind = ?win.kind, value = win.value, distance = win.distance, "snap y");
        snap_lines.push(win.guide);
        snapped_position.y = win.resulting - pad;
    }

    SnapResult { snap_lines, snapped_position }
}
