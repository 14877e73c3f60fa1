use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{SnapshotError, SnapshotResult};

/// One bounded sub-capture region, in the subject's coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// Region covered by this tile.
    pub rect: Rect,
    /// Column index in the sweep.
    pub column: usize,
    /// Row index in the sweep.
    pub row: usize,
}

/// Whether a subject of `bounds` fits a single surface of `max_side` points.
pub fn fits_single_surface(bounds: Size, max_side: f64) -> bool {
    bounds.width.max(bounds.height) <= max_side
}

/// Row-major grid of tiles of at most `max_side` covering `bounds`.
///
/// Tiles run left to right, then top to bottom; the last tile in each
/// direction is shortened to the remaining extent.
pub fn tile_grid(bounds: Size, max_side: f64) -> SnapshotResult<Vec<Tile>> {
    if !max_side.is_finite() || max_side <= 0.0 {
        return Err(SnapshotError::validation("max tile side must be finite and > 0"));
    }
    if !bounds.width.is_finite() || !bounds.height.is_finite() {
        return Err(SnapshotError::validation("subject bounds must be finite"));
    }
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Ok(Vec::new());
    }

    let columns = (bounds.width / max_side).ceil() as usize;
    let rows = (bounds.height / max_side).ceil() as usize;
    let mut tiles = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        let y0 = row as f64 * max_side;
        let y1 = (y0 + max_side).min(bounds.height);
        for column in 0..columns {
            let x0 = column as f64 * max_side;
            let x1 = (x0 + max_side).min(bounds.width);
            tiles.push(Tile {
                rect: Rect::new(x0, y0, x1, y1),
                column,
                row,
            });
        }
    }
    Ok(tiles)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/tiles.rs"]
mod tests;
