#![allow(clippy::float_cmp)]

use super::*;

fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(id, x, y, w, h)
}

fn snap(mover: &Rect, candidates: &[Rect]) -> SnapResult {
    let refs: Vec<&Rect> = candidates.iter().collect();
    calculate_snap(mover, &refs, &SnapOptions::default())
}

fn hyp(kind: AlignKind, distance: f64, resulting: f64) -> Hypothesis {
    Hypothesis {
        kind,
        value: resulting,
        distance,
        resulting,
        guide: GuideLine { start_x: resulting, start_y: 0.0, length: 1.0, is_vertical: kind.axis() == Axis::X },
    }
}

// =============================================================
// Catalog
// =============================================================

#[test]
fn catalog_priorities() {
    let x: Vec<u8> = AlignKind::X_CATALOG.iter().map(|k| k.priority()).collect();
    let y: Vec<u8> = AlignKind::Y_CATALOG.iter().map(|k| k.priority()).collect();
    assert_eq!(x, vec![1, 1, 2, 3, 3]);
    assert_eq!(y, vec![1, 1, 2, 3, 3, 4, 4]);
}

#[test]
fn catalog_axes() {
    assert!(AlignKind::X_CATALOG.iter().all(|k| k.axis() == Axis::X));
    assert!(AlignKind::Y_CATALOG.iter().all(|k| k.axis() == Axis::Y));
}

#[test]
fn align_kind_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&AlignKind::TopToCenter).unwrap(), "\"top_to_center\"");
}

// =============================================================
// calculate_snap
// =============================================================

#[test]
fn shared_left_edge_snaps_with_single_vertical_guide() {
    let a = rect("a", 100.0, 0.0, 80.0, 40.0);
    let b = rect("b", 100.0, 300.0, 120.0, 40.0);
    let mover = rect("m", 104.0, 150.0, 60.0, 40.0);

    let result = snap(&mover, &[a, b]);
    assert_eq!(result.snap_lines.len(), 1);
    assert!(result.snap_lines[0].is_vertical);
    assert_eq!(result.snap_lines[0].start_x, 100.0);
    assert_eq!(result.snapped_position, Point::new(100.0, 150.0));
}

#[test]
fn selection_snaps_on_inset_rect_and_reports_raw_position() {
    let neighbor = rect("n", 50.0, 0.0, 60.0, 30.0);
    // Active rect is (53, 520, 100, 60): its left edge is 3 from the neighbour's.
    let mover = rect("sel", 33.0, 500.0, 140.0, 100.0).with_kind("selection");

    let result = snap(&mover, &[neighbor]);
    assert_eq!(result.snapped_position.x, 30.0);
    assert_eq!(result.snapped_position.y, 500.0);
}

#[test]
fn selection_guide_spans_active_rect() {
    let neighbor = rect("n", 50.0, 0.0, 60.0, 30.0);
    let mover = rect("sel", 33.0, 500.0, 140.0, 100.0).with_kind("selection");

    let result = snap(&mover, &[neighbor]);
    let guide = result.snap_lines[0];
    // From neighbour top (0) to active bottom (580), outset by 20 each end.
    assert_eq!(guide.start_y, -20.0);
    assert_eq!(guide.length, 620.0);
}

#[test]
fn non_selection_kind_uses_raw_bounds() {
    let neighbor = rect("n", 50.0, 0.0, 60.0, 30.0);
    let mover = rect("m", 33.0, 500.0, 140.0, 100.0).with_kind("note");
    let result = snap(&mover, &[neighbor]);
    assert!(result.snap_lines.is_empty());
    assert_eq!(result.snapped_position, Point::new(33.0, 500.0));
}

#[test]
fn no_candidates_keeps_position() {
    let mover = rect("m", 12.0, 34.0, 10.0, 10.0);
    let result = snap(&mover, &[]);
    assert!(result.snap_lines.is_empty());
    assert_eq!(result.snapped_position, Point::new(12.0, 34.0));
}

#[test]
fn threshold_is_exclusive() {
    let other = rect("o", 100.0, 0.0, 50.0, 50.0);
    let mover = rect("m", 110.0, 500.0, 200.0, 50.0);
    let result = snap(&mover, &[other]);
    assert!(result.snap_lines.is_empty());
    assert_eq!(result.snapped_position.x, 110.0);
}

#[test]
fn custom_threshold_widens_capture() {
    let other = rect("o", 100.0, 0.0, 50.0, 50.0);
    let mover = rect("m", 110.0, 500.0, 200.0, 50.0);
    let opts = SnapOptions { threshold: 15.0, ..SnapOptions::default() };
    let result = calculate_snap(&mover, &[&other], &opts);
    assert_eq!(result.snapped_position.x, 100.0);
}

#[test]
fn mover_is_not_its_own_candidate() {
    let mover = rect("m", 100.0, 100.0, 50.0, 50.0);
    let stale_copy = rect("m", 101.0, 101.0, 50.0, 50.0);
    let result = snap(&mover, &[stale_copy]);
    assert!(result.snap_lines.is_empty());
}

#[test]
fn smaller_distance_beats_better_priority() {
    // Center-to-center is 2 away (priority 2); left-to-left is 5 away (priority 1).
    let other = rect("o", 95.0, 0.0, 104.0, 20.0);
    let mover = rect("m", 100.0, 500.0, 90.0, 20.0);
    let result = snap(&mover, &[other]);
    // Center of other = 147; mover center lands there.
    assert_eq!(result.snapped_position.x, 147.0 - 45.0);
}

#[test]
fn equal_distance_prefers_lower_priority_number() {
    // Mover left edge is 3 from c1's right edge (priority 3) and 3 from c2's left edge (priority 1).
    let c1 = rect("c1", 3.0, 0.0, 100.0, 20.0);
    let c2 = rect("c2", 97.0, 0.0, 200.0, 20.0);
    let mover = rect("m", 100.0, 500.0, 50.0, 20.0);
    let result = snap(&mover, &[c1, c2]);
    assert_eq!(result.snapped_position.x, 97.0);
    assert_eq!(result.snap_lines[0].start_x, 97.0);
}

#[test]
fn top_to_bottom_snap_draws_horizontal_guide() {
    let other = rect("o", 0.0, 0.0, 100.0, 100.0);
    let mover = rect("m", 300.0, 104.0, 50.0, 20.0);
    let result = snap(&mover, &[other]);

    assert_eq!(result.snapped_position, Point::new(300.0, 100.0));
    assert_eq!(result.snap_lines.len(), 1);
    let guide = result.snap_lines[0];
    assert!(!guide.is_vertical);
    assert_eq!(guide.start_y, 100.0);
    assert_eq!(guide.start_x, -20.0);
    assert_eq!(guide.length, 390.0);
}

#[test]
fn top_to_center_outranks_top_to_bottom_at_equal_distance() {
    // Mover top (104) is 4 from c1 center (100) and 4 from c2 bottom (108).
    let c1 = rect("c1", 1000.0, 50.0, 30.0, 100.0);
    let c2 = rect("c2", 2000.0, 0.0, 30.0, 108.0);
    let mover = rect("m", 0.0, 104.0, 30.0, 300.0);
    let result = snap(&mover, &[c2, c1]);
    assert_eq!(result.snapped_position.y, 100.0);
}

#[test]
fn both_axes_yield_two_guides() {
    let other = rect("o", 100.0, 100.0, 50.0, 50.0);
    // Left edge 3 right of other's left; top edge 3 below other's bottom.
    let mover = rect("m", 103.0, 153.0, 50.0, 50.0);
    let result = snap(&mover, &[other]);

    assert_eq!(result.snap_lines.len(), 2);
    assert!(result.snap_lines[0].is_vertical);
    assert!(!result.snap_lines[1].is_vertical);
    assert_eq!(result.snapped_position, Point::new(100.0, 150.0));
}

#[test]
fn nan_coordinates_never_snap() {
    let other = rect("o", f64::NAN, 0.0, 50.0, 50.0);
    let mover = rect("m", 0.0, 500.0, 50.0, 50.0);
    let result = snap(&mover, &[other]);
    assert!(result.snap_lines.is_empty());
}

#[test]
fn snap_options_from_config() {
    let cfg = GeometryConfig { snap_threshold: 4.0, selection_padding: 8.0, guide_outset: 2.0, ..GeometryConfig::default() };
    let opts = SnapOptions::from(&cfg);
    assert_eq!(opts, SnapOptions { threshold: 4.0, selection_padding: 8.0, guide_outset: 2.0 });
}

// =============================================================
// hypotheses
// =============================================================

#[test]
fn hypotheses_follow_candidate_then_catalog_order() {
    let a = rect("a", 0.0, 0.0, 100.0, 10.0);
    let mover = rect("m", 2.0, 500.0, 100.0, 10.0);
    let hyps = hypotheses(&mover, [&a], Axis::X, &SnapOptions::default());
    let kinds: Vec<AlignKind> = hyps.iter().map(|h| h.kind).collect();
    assert_eq!(kinds, vec![AlignKind::LeftToLeft, AlignKind::RightToRight, AlignKind::CenterX]);
    assert!(hyps.iter().all(|h| h.distance == 2.0 && h.resulting == 0.0));
}

// =============================================================
// select_winner
// =============================================================

#[test]
fn select_winner_empty_is_none() {
    assert!(select_winner(&[]).is_none());
}

#[test]
fn select_winner_minimizes_distance_first() {
    let hyps = vec![hyp(AlignKind::LeftToLeft, 5.0, 1.0), hyp(AlignKind::RightToLeft, 1.0, 2.0)];
    assert_eq!(select_winner(&hyps).unwrap().resulting, 2.0);
}

#[test]
fn select_winner_then_minimizes_priority() {
    let hyps = vec![hyp(AlignKind::CenterX, 3.0, 1.0), hyp(AlignKind::RightToRight, 3.0, 2.0)];
    assert_eq!(select_winner(&hyps).unwrap().kind, AlignKind::RightToRight);
}

#[test]
fn select_winner_first_registered_kind_wins_priority_ties() {
    let hyps = vec![hyp(AlignKind::RightToRight, 3.0, 1.0), hyp(AlignKind::LeftToLeft, 3.0, 2.0)];
    assert_eq!(select_winner(&hyps).unwrap().kind, AlignKind::RightToRight);
}

#[test]
fn select_winner_repeated_kind_keeps_latest_registration() {
    let hyps = vec![
        hyp(AlignKind::LeftToLeft, 3.0, 1.0),
        hyp(AlignKind::RightToRight, 3.0, 2.0),
        hyp(AlignKind::LeftToLeft, 3.0, 3.0),
    ];
    let win = select_winner(&hyps).unwrap();
    assert_eq!(win.kind, AlignKind::LeftToLeft);
    assert_eq!(win.resulting, 3.0);
}

#[test]
fn select_winner_ignores_farther_registrations() {
    let hyps = vec![
        hyp(AlignKind::LeftToLeft, 6.0, 1.0),
        hyp(AlignKind::CenterX, 2.0, 2.0),
        hyp(AlignKind::LeftToLeft, 7.0, 3.0),
    ];
    assert_eq!(select_winner(&hyps).unwrap().kind, AlignKind::CenterX);
}
