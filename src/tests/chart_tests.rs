/// Tests for the price-history draw list: series normalization, point
/// placement, and the no-data case. All tests are pure.
use crate::chart::{build, normalize_history, DrawCmd, GRID_LINES, NO_DATA_TEXT, PADDING};
use crate::types::PricePoint;

const W: f64 = 400.0;
const H: f64 = 300.0;

fn pt(round: u32, price: f64) -> PricePoint {
    PricePoint { round, price }
}

fn markers(cmds: &[DrawCmd]) -> Vec<(f64, f64)> {
    cmds.iter()
        .filter_map(|c| match c {
            DrawCmd::Marker { at } => Some(*at),
            _ => None,
        })
        .collect()
}

fn segments(cmds: &[DrawCmd]) -> Vec<((f64, f64), (f64, f64))> {
    cmds.iter()
        .filter_map(|c| match c {
            DrawCmd::Segment { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

// ── normalize_history ─────────────────────────────────────────────────────────

#[test]
fn round_zero_price_is_anchored_to_zero() {
    let out = normalize_history(&[pt(0, 57.0), pt(1, 10.0)]);
    assert_eq!(out[0].price, 0.0);
    assert_eq!(out[1].price, 10.0);
}

#[test]
fn first_point_of_a_later_round_keeps_its_price() {
    let out = normalize_history(&[pt(3, 57.0), pt(4, 60.0)]);
    assert_eq!(out[0].price, 57.0);
}

#[test]
fn trailing_duplicate_round_is_dropped() {
    let out = normalize_history(&[pt(0, 0.0), pt(1, 10.0), pt(1, 12.0)]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].round, 1);
    assert_eq!(out[1].price, 10.0);
}

#[test]
fn trailing_duplicate_price_is_dropped() {
    let out = normalize_history(&[pt(0, 0.0), pt(1, 10.0), pt(2, 10.0)]);
    assert_eq!(out.len(), 2);
}

#[test]
fn two_point_series_is_never_trimmed() {
    // The drop applies only past two points, even when they duplicate.
    let out = normalize_history(&[pt(1, 10.0), pt(1, 10.0)]);
    assert_eq!(out.len(), 2);
}

#[test]
fn trailing_drop_runs_at_most_once() {
    // Both tail points share a price with their predecessor; only the last
    // one goes.
    let out = normalize_history(&[pt(0, 0.0), pt(1, 10.0), pt(2, 10.0), pt(3, 10.0)]);
    assert_eq!(out.len(), 3);
    assert_eq!(out[2].round, 2);
}

// ── build: no data ────────────────────────────────────────────────────────────

#[test]
fn empty_series_yields_only_a_centered_no_data_label() {
    let cmds = build(&[], W, H);
    assert_eq!(cmds.len(), 1);
    match &cmds[0] {
        DrawCmd::NoData { at, text } => {
            assert_eq!(*at, (W / 2.0, H / 2.0));
            assert_eq!(text, NO_DATA_TEXT);
        }
        other => panic!("expected NoData, got {other:?}"),
    }
}

// ── build: point placement ────────────────────────────────────────────────────

#[test]
fn single_point_is_centered_with_no_segments() {
    let cmds = build(&[pt(1, 10.0)], W, H);
    let markers = markers(&cmds);
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].0, PADDING + (W - PADDING * 2.0) / 2.0);
    assert!(segments(&cmds).is_empty());
}

#[test]
fn anchored_round_zero_marker_sits_on_the_baseline() {
    let cmds = build(&[pt(0, 5.0), pt(1, 10.0)], W, H);
    let markers = markers(&cmds);
    assert_eq!(markers.len(), 2);
    // Price 0 maps to the bottom of the plot area.
    assert_eq!(markers[0].1, H - PADDING);
    // Price 10 is the max, which maps to the top.
    assert_eq!(markers[1].1, PADDING);
}

#[test]
fn polyline_starts_at_the_second_point() {
    // 4 raw points; the trailing duplicate price is dropped, leaving 3.
    let cmds = build(&[pt(0, 0.0), pt(1, 10.0), pt(2, 20.0), pt(3, 20.0)], W, H);
    let markers = markers(&cmds);
    let segments = segments(&cmds);
    assert_eq!(markers.len(), 3);
    // One segment only: index 1 → index 2. The anchored round-0 point is a
    // marker without a connecting line.
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].0, markers[1]);
    assert_eq!(segments[0].1, markers[2]);
}

#[test]
fn two_point_series_draws_no_segments() {
    let cmds = build(&[pt(0, 0.0), pt(1, 10.0)], W, H);
    assert!(segments(&cmds).is_empty());
    assert_eq!(markers(&cmds).len(), 2);
}

#[test]
fn points_are_evenly_spaced_across_the_plot_width() {
    let cmds = build(&[pt(0, 0.0), pt(1, 5.0), pt(2, 10.0), pt(3, 15.0), pt(4, 20.0)], W, H);
    let markers = markers(&cmds);
    assert_eq!(markers.len(), 5);
    assert_eq!(markers[0].0, PADDING);
    assert_eq!(markers[4].0, W - PADDING);
    let step = markers[1].0 - markers[0].0;
    for pair in markers.windows(2) {
        assert!((pair[1].0 - pair[0].0 - step).abs() < 1e-9);
    }
}

// ── build: scaffolding ────────────────────────────────────────────────────────

#[test]
fn axes_gridlines_and_captions_are_always_present() {
    let cmds = build(&[pt(1, 10.0), pt(2, 20.0), pt(3, 30.0)], W, H);
    let axes = cmds.iter().filter(|c| matches!(c, DrawCmd::Axis { .. })).count();
    let grid = cmds
        .iter()
        .filter(|c| matches!(c, DrawCmd::GridLine { .. }))
        .count();
    let captions = cmds
        .iter()
        .filter(|c| matches!(c, DrawCmd::Caption { .. }))
        .count();
    assert_eq!(axes, 2);
    assert_eq!(grid, GRID_LINES + 1);
    assert_eq!(captions, 2);
}

#[test]
fn gridline_labels_run_from_max_price_down_to_zero() {
    let cmds = build(&[pt(1, 0.0), pt(2, 100.0), pt(3, 50.0)], W, H);
    let labels: Vec<&str> = cmds
        .iter()
        .filter_map(|c| match c {
            DrawCmd::GridLine { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels.first(), Some(&"100"));
    assert_eq!(labels.last(), Some(&"0"));
}

#[test]
fn flat_zero_series_still_builds_without_dividing_by_zero() {
    let cmds = build(&[pt(1, 0.0), pt(2, 0.0), pt(3, 0.0)], W, H);
    // All markers on the baseline; the Y range degrades to 1 internally.
    for (_, y) in markers(&cmds) {
        assert_eq!(y, H - PADDING);
    }
}

// ── build: round labels ───────────────────────────────────────────────────────

#[test]
fn first_and_last_points_always_carry_round_labels() {
    let series: Vec<PricePoint> = (0..12).map(|i| pt(i, i as f64)).collect();
    let cmds = build(&series, W, H);
    let labels: Vec<&str> = cmds
        .iter()
        .filter_map(|c| match c {
            DrawCmd::RoundLabel { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    // Trailing dedup does not fire (rounds and prices all distinct).
    assert_eq!(labels.first(), Some(&"0"));
    assert_eq!(labels.last(), Some(&"11"));
    // Label density is bounded: far fewer labels than points for long series.
    assert!(labels.len() <= 7, "got {} labels", labels.len());
}
