use crate::capture::desaturate::{DesaturationLimit, desaturate};
use crate::capture::host::{CaptureSubject, ReparentGuard};
use crate::capture::tiles::{fits_single_surface, tile_grid};
use crate::foundation::core::{Affine, Bitmap, Insets, Rect, Vec2};
use crate::foundation::error::{SnapshotError, SnapshotResult};
use crate::foundation::pixel::PixelGrid;

/// Side length, in points, of the largest surface rendered in one pass.
pub const MAX_SURFACE_SIDE: f64 = 2000.0;

/// How the subject's pixels are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Render the layer tree directly. Never tiles.
    ContextRender,
    /// Draw the on-screen hierarchy, tiling large subjects.
    #[default]
    HierarchyDraw,
}

/// Per-capture options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureOptions {
    /// Rendering strategy.
    pub mode: RenderMode,
    /// Desaturate the captured bitmap.
    pub desaturate: bool,
    /// Device pixels per point.
    pub scale: f64,
    /// Largest single-surface side, in points.
    pub max_tile_side: f64,
    /// Platform desaturation ceiling, if any.
    pub desaturation_limit: Option<DesaturationLimit>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            desaturate: false,
            scale: 1.0,
            max_tile_side: MAX_SURFACE_SIDE,
            desaturation_limit: None,
        }
    }
}

/// Capture `subject` into a bitmap.
///
/// Subjects larger than `max_tile_side` in hierarchy-draw mode are drawn in
/// tiles and stitched; tiling requires an identity transform. The subject
/// gets a layout pass before capture and another once it is back in place.
#[tracing::instrument(skip(subject))]
pub fn capture<S: CaptureSubject + ?Sized>(
    subject: &mut S,
    opts: &CaptureOptions,
) -> SnapshotResult<Bitmap> {
    let grid = PixelGrid::new(opts.scale)?;
    let bounds = subject.bounds();

    let bitmap = if opts.mode == RenderMode::ContextRender
        || fits_single_surface(bounds, opts.max_tile_side)
    {
        subject.layout_if_needed();
        match opts.mode {
            RenderMode::ContextRender => subject.render_layer(grid.scale())?,
            RenderMode::HierarchyDraw => {
                subject.draw_hierarchy(Rect::from_origin_size((0.0, 0.0), bounds), grid.scale())?
            }
        }
    } else {
        let transform = subject.transform();
        if transform != Affine::IDENTITY {
            return Err(SnapshotError::UnsupportedTransform(transform));
        }
        capture_tiled(subject, opts.max_tile_side, grid)?
    };
    // Hosting changes during capture can leave geometry pending.
    subject.layout_if_needed();

    if opts.desaturate {
        desaturate(bitmap, opts.desaturation_limit)
    } else {
        Ok(bitmap)
    }
}

fn capture_tiled<S: CaptureSubject + ?Sized>(
    subject: &mut S,
    max_side: f64,
    grid: PixelGrid,
) -> SnapshotResult<Bitmap> {
    let bounds = subject.bounds();
    let tiles = tile_grid(bounds, max_side)?;
    tracing::debug!(tiles = tiles.len(), "capturing subject in tiles");

    subject.layout_if_needed();
    let original_insets = subject.safe_area_insets();

    let mut hosted = ReparentGuard::enter(subject);
    hosted.layout_if_needed();
    let drift = hosted.safe_area_insets();
    hosted.set_additional_safe_area_insets(inset_difference(original_insets, drift));
    hosted.layout_if_needed();

    let mut out = Bitmap::transparent(
        grid.pixels(bounds.width),
        grid.pixels(bounds.height),
        grid.scale(),
    );
    for tile in &tiles {
        hosted.set_container_offset(Vec2::new(tile.rect.x0, tile.rect.y0));
        hosted.layout_if_needed();
        let local = Rect::from_origin_size((0.0, 0.0), tile.rect.size());
        let pixels = hosted.draw_hierarchy(local, grid.scale())?;
        out.blit(
            &pixels,
            (tile.rect.x0 * grid.scale()).round() as u32,
            (tile.rect.y0 * grid.scale()).round() as u32,
        );
    }
    Ok(out)
}

fn inset_difference(want: Insets, have: Insets) -> Insets {
    Insets::new(
        want.x0 - have.x0,
        want.y0 - have.y0,
        want.x1 - have.x1,
        want.y1 - have.y1,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/capture/service.rs"]
mod tests;
