//! CPU rasterization of an [`Arrangement`].
//!
//! The snapshot is composited onto a white canvas. Overlays and
//! the legend are drawn with `vello_cpu` into a transparent layer that is
//! then composited over it, so snapshot pixels outside any overlay are left
//! untouched.

use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape as _;

use crate::compose::composer::{ArrangedEntry, Arrangement};
use crate::foundation::core::{Affine, BezPath, Bitmap, Color, Point, Rect, Vec2};
use crate::foundation::error::{SnapshotError, SnapshotResult};
use crate::foundation::pixel::PixelGrid;
use crate::legend::entry::{PILL_RADIUS, PlacedText};
use crate::overlay::mapper::Overlay;
use crate::render::composite::{layer_over, over_at};

const SWATCH_RADIUS: f64 = 3.0;
const INDICATOR_STROKE: f64 = 2.0;
const PILL_FILL: Color = Color::rgb(0xee, 0xee, 0xee);

/// Rasterize `arrangement` with `snapshot` at its snapshot frame.
///
/// The output is premultiplied RGBA8 covering `arrangement.bounds` at
/// `arrangement.scale`.
#[tracing::instrument(skip_all, fields(width = arrangement.bounds.width, height = arrangement.bounds.height))]
pub fn render_arrangement(arrangement: &Arrangement, snapshot: &Bitmap) -> SnapshotResult<Bitmap> {
    let grid = PixelGrid::new(arrangement.scale)?;
    if (snapshot.scale - grid.scale()).abs() > f64::EPSILON {
        return Err(SnapshotError::render(format!(
            "snapshot scale {} does not match arrangement scale {}",
            snapshot.scale,
            grid.scale()
        )));
    }
    let width = grid.pixels(arrangement.bounds.width);
    let height = grid.pixels(arrangement.bounds.height);

    let mut out = Bitmap::filled(width, height, grid.scale(), Color::WHITE);
    let origin = arrangement.snapshot_frame.origin();
    over_at(
        &mut out,
        snapshot,
        (origin.x * grid.scale()).round() as u32,
        (origin.y * grid.scale()).round() as u32,
    );
    if width == 0 || height == 0 {
        return Ok(out);
    }

    let (w, h) = surface_extent(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let mut fonts = FontCache::default();
    let device = Affine::scale(grid.scale());

    let snapshot_space = device * Affine::translate(origin.to_vec2());
    for overlay in &arrangement.overlays {
        draw_overlay(&mut ctx, snapshot_space, &overlay.overlay);
        if let Some(indicator) = &overlay.indicator {
            ctx.set_transform(affine_to_cpu(snapshot_space));
            ctx.set_paint(paint(indicator.color));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(INDICATOR_STROKE));
            ctx.stroke_path(&bezpath_to_cpu(&indicator.glyph_path()));
        }
    }

    for entry in &arrangement.legend {
        draw_entry(&mut ctx, device, entry, &mut fonts);
    }

    let mut layer = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut layer);
    layer_over(&mut out, layer.data_as_u8_slice())?;
    Ok(out)
}

fn surface_extent(width: u32, height: u32) -> SnapshotResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SnapshotError::render("composite width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SnapshotError::render("composite height exceeds u16"))?;
    Ok((w, h))
}

fn draw_overlay(ctx: &mut vello_cpu::RenderContext, transform: Affine, overlay: &Overlay) {
    ctx.set_transform(affine_to_cpu(transform));
    match overlay {
        Overlay::Fill { rect, color } => {
            ctx.set_paint(paint(*color));
            ctx.fill_rect(&rect_to_cpu(*rect));
        }
        Overlay::Stroke { path, color, width } => {
            ctx.set_paint(paint(*color));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
            ctx.stroke_path(&bezpath_to_cpu(path));
        }
    }
}

fn draw_entry(
    ctx: &mut vello_cpu::RenderContext,
    device: Affine,
    entry: &ArrangedEntry,
    fonts: &mut FontCache,
) {
    let local = device * Affine::translate(entry.frame.origin().to_vec2());
    let layout = &entry.layout;

    ctx.set_transform(affine_to_cpu(local));
    ctx.set_paint(paint(layout.swatch_color));
    ctx.fill_path(&rounded_rect(layout.swatch, SWATCH_RADIUS));

    for pill in &layout.pills {
        ctx.set_transform(affine_to_cpu(local));
        ctx.set_paint(paint(PILL_FILL));
        ctx.fill_path(&rounded_rect(pill.rect, PILL_RADIUS));
    }

    let texts = layout
        .texts
        .iter()
        .chain(layout.pills.iter().map(|p| &p.label));
    for text in texts {
        draw_text(ctx, local, text, fonts);
    }
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    entry_space: Affine,
    placed: &PlacedText,
    fonts: &mut FontCache,
) {
    let shaped = &placed.text;
    let Some(font_bytes) = &shaped.font else {
        return;
    };
    if shaped.glyphs.is_empty() {
        return;
    }
    let font = fonts.get(font_bytes);
    let at = entry_space * Affine::translate(Vec2::new(placed.origin.x, placed.origin.y));
    ctx.set_transform(affine_to_cpu(at));
    ctx.set_paint(paint(shaped.style.color));
    let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
        id: g.id,
        x: g.x,
        y: g.y,
    });
    ctx.glyph_run(&font)
        .font_size(shaped.style.size)
        .fill_glyphs(glyphs);
}

/// `FontData` per distinct font buffer.
#[derive(Default)]
struct FontCache {
    fonts: HashMap<usize, vello_cpu::peniko::FontData>,
}

impl FontCache {
    fn get(&mut self, bytes: &Arc<Vec<u8>>) -> vello_cpu::peniko::FontData {
        let key = Arc::as_ptr(bytes) as usize;
        self.fonts
            .entry(key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                    0,
                )
            })
            .clone()
    }
}

fn paint(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rounded_rect(rect: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let rr = kurbo::RoundedRect::from_rect(rect, radius);
    bezpath_to_cpu(&rr.to_path(0.1))
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
