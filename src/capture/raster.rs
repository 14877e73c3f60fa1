//! In-memory capture subject backed by a bitmap.
//!
//! `RasterView` stands in for an on-screen view: it owns pixel content, a
//! safe area, a transform and a superview slot, and it records the layout
//! passes and hosting changes the capture service drives. The CLI uses it to
//! capture decoded images; tests use it to observe the reparenting protocol.

use crate::capture::host::{CaptureSubject, HostPlacement, ParentSlot};
use crate::foundation::core::{Affine, Bitmap, Insets, Point, Rect, Size, Vec2};
use crate::foundation::error::{SnapshotError, SnapshotResult};
use crate::foundation::pixel::PixelGrid;

#[derive(Clone, Debug, PartialEq)]
enum Hosting {
    Attached,
    Contained {
        offset: Vec2,
        additional_insets: Insets,
    },
}

/// Bitmap-backed view with simulated hierarchy hosting.
#[derive(Clone, Debug)]
pub struct RasterView {
    content: Bitmap,
    bounds: Size,
    transform: Affine,
    safe_area: Insets,
    container_drift: Insets,
    placement: HostPlacement,
    hosting: Hosting,
    layout_passes: usize,
    containers_entered: usize,
    tile_insets: Vec<Insets>,
}

impl RasterView {
    /// View whose bounds equal the content's point size and which has no superview.
    pub fn new(content: Bitmap) -> Self {
        let bounds = content.point_size();
        Self {
            content,
            bounds,
            transform: Affine::IDENTITY,
            safe_area: Insets::ZERO,
            container_drift: Insets::ZERO,
            placement: HostPlacement {
                parent: None,
                origin: Point::ZERO,
                autoresizes: false,
            },
            hosting: Hosting::Attached,
            layout_passes: 0,
            containers_entered: 0,
            tile_insets: Vec::new(),
        }
    }

    /// Set the active transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Set the safe-area insets reported while attached.
    pub fn with_safe_area(mut self, insets: Insets) -> Self {
        self.safe_area = insets;
        self
    }

    /// Extra insets the intermediate container adds to the safe area until corrected.
    pub fn with_container_drift(mut self, drift: Insets) -> Self {
        self.container_drift = drift;
        self
    }

    /// Attach to a superview slot.
    pub fn with_placement(mut self, placement: HostPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Attach to superview `parent_id` at child `index`, at `origin`.
    pub fn attached_to(self, parent_id: u64, index: usize, origin: Point) -> Self {
        self.with_placement(HostPlacement {
            parent: Some(ParentSlot {
                parent_id,
                index: Some(index),
            }),
            origin,
            autoresizes: true,
        })
    }

    /// Number of layout passes run so far.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Whether the view currently sits in an intermediate container.
    pub fn is_contained(&self) -> bool {
        matches!(self.hosting, Hosting::Contained { .. })
    }

    /// How many times the view was moved into a container.
    pub fn containers_entered(&self) -> usize {
        self.containers_entered
    }

    /// Safe-area insets observed each time a tile was drawn inside a container.
    pub fn tile_insets(&self) -> &[Insets] {
        &self.tile_insets
    }

    /// Pixel content.
    pub fn content(&self) -> &Bitmap {
        &self.content
    }

    fn sample_into(&self, rect: Rect, offset: Vec2, scale: f64) -> SnapshotResult<Bitmap> {
        if (scale - self.content.scale).abs() > f64::EPSILON {
            return Err(SnapshotError::render(format!(
                "raster view holds {}x content and cannot draw at {scale}x",
                self.content.scale
            )));
        }
        let grid = PixelGrid::new(scale)?;
        let width = grid.pixels(rect.width());
        let height = grid.pixels(rect.height());
        let left = ((rect.x0 + offset.x) * scale).round() as i64;
        let top = ((rect.y0 + offset.y) * scale).round() as i64;

        let mut out = Bitmap::transparent(width, height, scale);
        for y in 0..height {
            let sy = top + i64::from(y);
            if sy < 0 || sy >= i64::from(self.content.height) {
                continue;
            }
            for x in 0..width {
                let sx = left + i64::from(x);
                if sx < 0 || sx >= i64::from(self.content.width) {
                    continue;
                }
                let s = (sy as usize * self.content.width as usize + sx as usize) * 4;
                let d = (y as usize * width as usize + x as usize) * 4;
                out.data[d..d + 4].copy_from_slice(&self.content.data[s..s + 4]);
            }
        }
        Ok(out)
    }
}

impl CaptureSubject for RasterView {
    fn bounds(&self) -> Size {
        self.bounds
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn safe_area_insets(&self) -> Insets {
        match &self.hosting {
            Hosting::Attached => self.safe_area,
            Hosting::Contained {
                additional_insets, ..
            } => Insets::new(
                self.safe_area.x0 + self.container_drift.x0 + additional_insets.x0,
                self.safe_area.y0 + self.container_drift.y0 + additional_insets.y0,
                self.safe_area.x1 + self.container_drift.x1 + additional_insets.x1,
                self.safe_area.y1 + self.container_drift.y1 + additional_insets.y1,
            ),
        }
    }

    fn layout_if_needed(&mut self) {
        self.layout_passes += 1;
    }

    fn placement(&self) -> HostPlacement {
        self.placement.clone()
    }

    fn enter_container(&mut self, _container: Size) {
        self.hosting = Hosting::Contained {
            offset: Vec2::ZERO,
            additional_insets: Insets::ZERO,
        };
        self.placement.parent = None;
        self.placement.origin = Point::ZERO;
        self.placement.autoresizes = false;
        self.containers_entered += 1;
    }

    fn set_container_offset(&mut self, offset: Vec2) {
        if let Hosting::Contained { offset: o, .. } = &mut self.hosting {
            *o = offset;
        }
    }

    fn set_additional_safe_area_insets(&mut self, insets: Insets) {
        if let Hosting::Contained {
            additional_insets, ..
        } = &mut self.hosting
        {
            *additional_insets = insets;
        }
    }

    fn restore(&mut self, placement: &HostPlacement) {
        self.hosting = Hosting::Attached;
        self.placement = placement.clone();
    }

    fn render_layer(&mut self, scale: f64) -> SnapshotResult<Bitmap> {
        self.sample_into(Rect::from_origin_size(Point::ZERO, self.bounds), Vec2::ZERO, scale)
    }

    fn draw_hierarchy(&mut self, rect: Rect, scale: f64) -> SnapshotResult<Bitmap> {
        let offset = match self.hosting {
            Hosting::Attached => Vec2::ZERO,
            Hosting::Contained { offset, .. } => {
                self.tile_insets.push(self.safe_area_insets());
                offset
            }
        };
        self.sample_into(rect, offset, scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/raster.rs"]
mod tests;
