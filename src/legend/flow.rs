//! Legend flow layout.
//!
//! The legend either stacks below the snapshot or flows in fixed-width
//! columns beside it. Sizing ([`composite_size`]) and placement
//! ([`place_entries`]) are separate pure functions; both go through
//! [`select_strategy`] and [`measurement_bounds`] so they always agree.

use crate::foundation::core::{Insets, Point, Rect, Size};
use crate::foundation::pixel::PixelGrid;

/// Fixed legend spacing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LegendMetrics {
    /// Margins around the legend region.
    pub insets: Insets,
    /// Gap between columns.
    pub horizontal_spacing: f64,
    /// Gap between entries in a column or stack.
    pub vertical_spacing: f64,
    /// Column width, and the narrowest legend the composite allows.
    pub minimum_width: f64,
}

impl Default for LegendMetrics {
    fn default() -> Self {
        Self {
            insets: Insets::uniform(16.0),
            horizontal_spacing: 16.0,
            vertical_spacing: 16.0,
            minimum_width: 284.0,
        }
    }
}

impl LegendMetrics {
    /// Snapshot width below which the legend always stacks.
    pub fn columnar_threshold(&self) -> f64 {
        self.minimum_width + self.insets.x0 + self.insets.x1
    }
}

/// Where the legend goes relative to the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStrategy {
    /// Full width below the snapshot, one entry per row.
    StackedBelow,
    /// Fixed-width columns to the right of the snapshot.
    ColumnarBeside,
}

/// Pick the flow for a snapshot of `snapshot` size.
///
/// Wide snapshots, and snapshots narrower than the columnar threshold,
/// stack the legend below; everything else gets columns.
pub fn select_strategy(snapshot: Size, metrics: &LegendMetrics) -> FlowStrategy {
    let aspect_ratio = snapshot.width / snapshot.height;
    if aspect_ratio > 1.0 || snapshot.width < metrics.columnar_threshold() {
        FlowStrategy::StackedBelow
    } else {
        FlowStrategy::ColumnarBeside
    }
}

/// Space each entry is measured against.
pub fn measurement_bounds(
    strategy: FlowStrategy,
    snapshot: Size,
    metrics: &LegendMetrics,
) -> Size {
    let insets = metrics.insets;
    match strategy {
        FlowStrategy::StackedBelow => Size::new(
            snapshot.width.max(metrics.columnar_threshold()) - insets.x0 - insets.x1,
            f64::INFINITY,
        ),
        FlowStrategy::ColumnarBeside => Size::new(
            metrics.minimum_width,
            column_height(snapshot, metrics),
        ),
    }
}

fn column_height(snapshot: Size, metrics: &LegendMetrics) -> f64 {
    (snapshot.height - metrics.insets.y0 - metrics.insets.y1).max(0.0)
}

/// Column index and top offset of each entry, filled greedily in order.
///
/// An entry opens a new column when it would cross the column's bottom
/// edge; an entry taller than the column still gets a column to itself.
pub fn assign_columns(heights: &[f64], column_height: f64, spacing: f64) -> Vec<(usize, f64)> {
    let mut out = Vec::with_capacity(heights.len());
    let mut column = 0usize;
    let mut bottom: Option<f64> = None;
    for &h in heights {
        let top = match bottom {
            None => 0.0,
            Some(b) if b + spacing + h <= column_height => b + spacing,
            Some(_) => {
                column += 1;
                0.0
            }
        };
        out.push((column, top));
        bottom = Some(top + h);
    }
    out
}

/// Number of columns the greedy fill opens.
pub fn column_count(heights: &[f64], column_height: f64, spacing: f64) -> usize {
    assign_columns(heights, column_height, spacing)
        .last()
        .map_or(0, |(column, _)| column + 1)
}

/// Smallest composite size that holds the snapshot and every entry.
///
/// `entries` are the natural sizes measured against [`measurement_bounds`].
/// With no entries the composite is exactly the snapshot.
pub fn composite_size(
    strategy: FlowStrategy,
    snapshot: Size,
    entries: &[Size],
    metrics: &LegendMetrics,
    grid: PixelGrid,
) -> Size {
    if entries.is_empty() {
        return snapshot;
    }
    let insets = metrics.insets;
    let size = match strategy {
        FlowStrategy::StackedBelow => {
            let widest = entries.iter().map(|s| s.width).fold(0.0, f64::max);
            let stacked: f64 = entries.iter().map(|s| s.height).sum::<f64>()
                + (entries.len() - 1) as f64 * metrics.vertical_spacing;
            Size::new(
                snapshot
                    .width
                    .max(widest + insets.x0 + insets.x1)
                    .max(metrics.columnar_threshold()),
                snapshot.height + insets.y0 + stacked + insets.y1,
            )
        }
        FlowStrategy::ColumnarBeside => {
            let heights: Vec<f64> = entries.iter().map(|s| s.height).collect();
            let columns = column_count(
                &heights,
                column_height(snapshot, metrics),
                metrics.vertical_spacing,
            ) as f64;
            let tallest = heights.iter().copied().fold(0.0, f64::max);
            Size::new(
                snapshot.width
                    + insets.x0
                    + columns * metrics.minimum_width
                    + (columns - 1.0) * metrics.horizontal_spacing
                    + insets.x1,
                snapshot.height.max(tallest + insets.y0 + insets.y1),
            )
        }
    };
    grid.ceil_size(size)
}

/// Snapshot origin and entry frames inside `bounds`.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowPlacement {
    /// Top-left corner of the snapshot.
    pub snapshot_origin: Point,
    /// One frame per entry, in entry order.
    pub entries: Vec<Rect>,
}

/// Position the snapshot and every entry inside `bounds`.
pub fn place_entries(
    strategy: FlowStrategy,
    snapshot: Size,
    entries: &[Size],
    bounds: Size,
    metrics: &LegendMetrics,
    grid: PixelGrid,
) -> FlowPlacement {
    let centered = |outer: f64, inner: f64| grid.floor(((outer - inner) * 0.5).max(0.0));
    let insets = metrics.insets;

    if entries.is_empty() {
        return FlowPlacement {
            snapshot_origin: Point::new(
                centered(bounds.width, snapshot.width),
                centered(bounds.height, snapshot.height),
            ),
            entries: Vec::new(),
        };
    }

    match strategy {
        FlowStrategy::StackedBelow => {
            let mut y = snapshot.height + insets.y0;
            let frames = entries
                .iter()
                .map(|size| {
                    let frame = Rect::from_origin_size(Point::new(insets.x0, y), *size);
                    y += size.height + metrics.vertical_spacing;
                    frame
                })
                .collect();
            FlowPlacement {
                snapshot_origin: Point::new(centered(bounds.width, snapshot.width), 0.0),
                entries: frames,
            }
        }
        FlowStrategy::ColumnarBeside => {
            let heights: Vec<f64> = entries.iter().map(|s| s.height).collect();
            let slots = assign_columns(
                &heights,
                column_height(snapshot, metrics),
                metrics.vertical_spacing,
            );
            let frames = slots
                .iter()
                .zip(entries)
                .map(|(&(column, top), size)| {
                    let x = snapshot.width
                        + insets.x0
                        + column as f64 * (metrics.minimum_width + metrics.horizontal_spacing);
                    Rect::from_origin_size(Point::new(x, insets.y0 + top), *size)
                })
                .collect();
            FlowPlacement {
                snapshot_origin: Point::new(0.0, centered(bounds.height, snapshot.height)),
                entries: frames,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/legend/flow.rs"]
mod tests;
