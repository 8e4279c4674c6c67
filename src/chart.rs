use crate::types::PricePoint;

/// Inset between the coordinate box edges and the plot area.
pub const PADDING: f64 = 40.0;
/// Number of horizontal gridlines (plus the top edge).
pub const GRID_LINES: usize = 5;

pub const NO_DATA_TEXT: &str = "Нет данных для графика";
pub const X_AXIS_CAPTION: &str = "Раунд";
pub const Y_AXIS_CAPTION: &str = "Цена (монеты)";

/// One drawing primitive, in a top-left-origin coordinate box (y grows
/// downward, as on a raster canvas). The painter decides how lines, dots and
/// text are realized.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Axis { from: (f64, f64), to: (f64, f64) },
    GridLine { from: (f64, f64), to: (f64, f64), label: String },
    Segment { from: (f64, f64), to: (f64, f64) },
    Marker { at: (f64, f64) },
    RoundLabel { at: (f64, f64), text: String },
    Caption { at: (f64, f64), text: String, vertical: bool },
    NoData { at: (f64, f64), text: String },
}

/// Normalizes a raw price series for drawing:
/// 1. the round-0 point is anchored to price 0 (pre-game baseline, whatever
///    the server reported for it);
/// 2. a degenerate trailing point — same round or same price as its
///    predecessor — is dropped once, and only when more than two points
///    remain, so the last segment never renders as a misleading plateau.
pub fn normalize_history(history: &[PricePoint]) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = history.to_vec();
    if let Some(first) = points.first_mut() {
        if first.round == 0 {
            first.price = 0.0;
        }
    }
    if points.len() > 2 {
        let last = points[points.len() - 1];
        let prev = points[points.len() - 2];
        if last.round == prev.round || last.price == prev.price {
            points.pop();
        }
    }
    points
}

/// Builds the draw list for a price-history chart inside a `width` × `height`
/// box. An empty series yields a single centered no-data label and nothing
/// else.
pub fn build(history: &[PricePoint], width: f64, height: f64) -> Vec<DrawCmd> {
    if history.is_empty() {
        return vec![DrawCmd::NoData {
            at: (width / 2.0, height / 2.0),
            text: NO_DATA_TEXT.to_string(),
        }];
    }

    let points = normalize_history(history);
    let n = points.len();

    let plot_w = width - PADDING * 2.0;
    let plot_h = height - PADDING * 2.0;

    // Y domain is fixed at [0, max price]; X spacing is uniform per index,
    // round numbers are textual annotations only.
    let max_price = points.iter().map(|p| p.price).fold(0.0_f64, f64::max);
    let price_range = if max_price > 0.0 { max_price } else { 1.0 };

    let x_at = |i: usize| -> f64 {
        if n > 1 {
            PADDING + plot_w / (n - 1) as f64 * i as f64
        } else {
            // A lone point has no index spacing; center it.
            PADDING + plot_w / 2.0
        }
    };
    let y_at = |price: f64| -> f64 { PADDING + plot_h - price / price_range * plot_h };

    let mut cmds = Vec::new();

    // Axes.
    cmds.push(DrawCmd::Axis {
        from: (PADDING, height - PADDING),
        to: (width - PADDING, height - PADDING),
    });
    cmds.push(DrawCmd::Axis {
        from: (PADDING, PADDING),
        to: (PADDING, height - PADDING),
    });

    // Horizontal gridlines with price labels, top to bottom.
    for i in 0..=GRID_LINES {
        let y = PADDING + plot_h / GRID_LINES as f64 * i as f64;
        let price = max_price - price_range / GRID_LINES as f64 * i as f64;
        cmds.push(DrawCmd::GridLine {
            from: (PADDING, y),
            to: (width - PADDING, y),
            label: format!("{}", price.round() as i64),
        });
    }

    // Polyline from index 1: the anchored round-0 point is a marker only,
    // not part of the connecting line.
    for i in 2..n {
        cmds.push(DrawCmd::Segment {
            from: (x_at(i - 1), y_at(points[i - 1].price)),
            to: (x_at(i), y_at(points[i].price)),
        });
    }

    // Markers on every point; round labels on the first, the last and every
    // ⌈n/5⌉-th point, bounding label density for long series.
    let label_stride = n.div_ceil(5).max(1);
    for (i, point) in points.iter().enumerate() {
        let x = x_at(i);
        cmds.push(DrawCmd::Marker {
            at: (x, y_at(point.price)),
        });
        if i == 0 || i == n - 1 || i % label_stride == 0 {
            cmds.push(DrawCmd::RoundLabel {
                at: (x, height - PADDING + 20.0),
                text: point.round.to_string(),
            });
        }
    }

    cmds.push(DrawCmd::Caption {
        at: (width / 2.0, height - 10.0),
        text: X_AXIS_CAPTION.to_string(),
        vertical: false,
    });
    cmds.push(DrawCmd::Caption {
        at: (15.0, height / 2.0),
        text: Y_AXIS_CAPTION.to_string(),
        vertical: true,
    });

    cmds
}
