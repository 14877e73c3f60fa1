//! Snapshot composition.
//!
//! [`SnapshotComposer`] is the composing container: it captures a subject,
//! pairs each marker with its overlay and legend entry, and answers the
//! host's two-phase size negotiation ([`SnapshotComposer::size_that_fits`]
//! then [`SnapshotComposer::arrange`]). Both phases share one measurement
//! pass, so the reported size and the final placement always agree.

use crate::capture::host::CaptureSubject;
use crate::capture::service::capture;
use crate::config::SnapshotConfig;
use crate::foundation::core::{Bitmap, Color, Rect, Size};
use crate::foundation::error::{SnapshotError, SnapshotResult};
use crate::foundation::pixel::PixelGrid;
use crate::legend::entry::{EntryLayout, LegendEntry};
use crate::legend::flow::{
    FlowStrategy, composite_size, measurement_bounds, place_entries, select_strategy,
};
use crate::legend::text::{FixedMetricsShaper, TextShaper};
use crate::markers::model::Marker;
use crate::markers::source::MarkerSource;
use crate::overlay::mapper::{MarkerOverlay, map_marker};
use crate::render::cpu::render_arrangement;

/// A marker paired with the artifacts built for it in one composition run.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayMarker {
    /// Position in parser order.
    pub index: usize,
    /// Source marker.
    pub marker: Marker,
    /// Palette color shared by the overlay and the legend swatch.
    pub color: Color,
    /// Highlight and optional activation indicator.
    pub overlay: MarkerOverlay,
    /// Legend entry content.
    pub entry: LegendEntry,
}

/// One legend entry positioned in composite space.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrangedEntry {
    /// Frame in composite space.
    pub frame: Rect,
    /// Entry contents relative to `frame`'s origin.
    pub layout: EntryLayout,
}

/// Final placement of the snapshot, its overlays and the legend.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrangement {
    /// Composite bounds.
    pub bounds: Size,
    /// Device pixels per point.
    pub scale: f64,
    /// Flow the legend uses.
    pub strategy: FlowStrategy,
    /// Snapshot frame in composite space. Overlays are relative to its origin.
    pub snapshot_frame: Rect,
    /// Overlays in snapshot space, in marker order.
    pub overlays: Vec<MarkerOverlay>,
    /// Legend entries in marker order.
    pub legend: Vec<ArrangedEntry>,
}

struct Measured {
    strategy: FlowStrategy,
    layouts: Vec<EntryLayout>,
}

/// Composing container for one subject at a time.
pub struct SnapshotComposer {
    config: SnapshotConfig,
    grid: PixelGrid,
    shaper: Box<dyn TextShaper>,
    snapshot: Option<Bitmap>,
    markers: Vec<DisplayMarker>,
    generation: u64,
}

impl std::fmt::Debug for SnapshotComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotComposer")
            .field("config", &self.config)
            .field("markers", &self.markers.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl SnapshotComposer {
    /// Composer measuring text with [`FixedMetricsShaper`].
    pub fn new(config: SnapshotConfig) -> SnapshotResult<Self> {
        config.validate()?;
        let grid = PixelGrid::new(config.capture.scale)?;
        Ok(Self {
            config,
            grid,
            shaper: Box::new(FixedMetricsShaper::default()),
            snapshot: None,
            markers: Vec::new(),
            generation: 0,
        })
    }

    /// Replace the text shaper.
    pub fn with_shaper(mut self, shaper: Box<dyn TextShaper>) -> Self {
        self.shaper = shaper;
        self
    }

    /// Configuration fixed at construction.
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Number of completed composition runs.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Captured snapshot of the current generation.
    pub fn snapshot(&self) -> Option<&Bitmap> {
        self.snapshot.as_ref()
    }

    /// Markers of the current generation, in parser order.
    pub fn display_markers(&self) -> &[DisplayMarker] {
        &self.markers
    }

    /// Capture `subject`, read its markers and rebuild every display marker.
    ///
    /// The previous generation is torn down before capture starts, so a
    /// failed run leaves the composer empty rather than stale.
    #[tracing::instrument(skip_all, fields(generation = self.generation + 1))]
    pub fn compose<S, M>(&mut self, subject: &mut S, source: &mut M) -> SnapshotResult<()>
    where
        S: CaptureSubject + ?Sized,
        M: MarkerSource<S> + ?Sized,
    {
        self.teardown();
        let bitmap = capture(subject, &self.config.capture.options())?;
        let markers = source.markers(subject)?;
        self.install(bitmap, markers)
    }

    /// Rebuild the display markers around an already captured snapshot.
    pub fn compose_bitmap(&mut self, bitmap: Bitmap, markers: Vec<Marker>) -> SnapshotResult<()> {
        self.teardown();
        self.install(bitmap, markers)
    }

    fn teardown(&mut self) {
        self.markers.clear();
        self.snapshot = None;
    }

    fn install(&mut self, bitmap: Bitmap, markers: Vec<Marker>) -> SnapshotResult<()> {
        if (bitmap.scale - self.grid.scale()).abs() > f64::EPSILON {
            return Err(SnapshotError::validation(format!(
                "snapshot scale {} does not match configured scale {}",
                bitmap.scale,
                self.grid.scale()
            )));
        }
        let snapshot = bitmap.point_size();
        self.markers = markers
            .into_iter()
            .enumerate()
            .map(|(index, marker)| {
                let color = self.config.color_for(index);
                DisplayMarker {
                    index,
                    overlay: map_marker(&marker, color, self.config.activation_points, snapshot),
                    entry: LegendEntry::new(&marker, color, self.config.show_user_input_labels),
                    color,
                    marker,
                }
            })
            .collect();
        self.snapshot = Some(bitmap);
        self.generation += 1;
        tracing::debug!(markers = self.markers.len(), "composed snapshot");
        Ok(())
    }

    fn snapshot_size(&self) -> Size {
        self.snapshot.as_ref().map_or(Size::ZERO, Bitmap::point_size)
    }

    fn measure(&mut self) -> SnapshotResult<Measured> {
        let snapshot = self.snapshot_size();
        let metrics = &self.config.legend;
        let strategy = select_strategy(snapshot, metrics);
        let available = measurement_bounds(strategy, snapshot, metrics);
        tracing::debug!(?strategy, ?available, "measuring legend");

        let mut layouts = Vec::with_capacity(self.markers.len());
        for dm in &self.markers {
            let mut layout = dm.entry.layout(self.shaper.as_mut(), available)?;
            layout.size = self.grid.ceil_size(layout.size);
            layouts.push(layout);
        }
        Ok(Measured { strategy, layouts })
    }

    /// Natural size of the composite: the snapshot plus its legend.
    ///
    /// The composite has one natural size regardless of what the host
    /// proposes; with no markers it is exactly the snapshot size.
    pub fn size_that_fits(&mut self) -> SnapshotResult<Size> {
        let measured = self.measure()?;
        let sizes: Vec<Size> = measured.layouts.iter().map(|l| l.size).collect();
        Ok(composite_size(
            measured.strategy,
            self.snapshot_size(),
            &sizes,
            &self.config.legend,
            self.grid,
        ))
    }

    /// Place the snapshot, overlays and legend inside `bounds`.
    ///
    /// `bounds` at least as large as [`Self::size_that_fits`] keeps every
    /// entry inside and free of overlap.
    pub fn arrange(&mut self, bounds: Size) -> SnapshotResult<Arrangement> {
        let snapshot = self.snapshot_size();
        let measured = self.measure()?;
        let sizes: Vec<Size> = measured.layouts.iter().map(|l| l.size).collect();
        let placement = place_entries(
            measured.strategy,
            snapshot,
            &sizes,
            bounds,
            &self.config.legend,
            self.grid,
        );

        let legend = placement
            .entries
            .into_iter()
            .zip(measured.layouts)
            .map(|(frame, layout)| ArrangedEntry { frame, layout })
            .collect();

        Ok(Arrangement {
            bounds,
            scale: self.grid.scale(),
            strategy: measured.strategy,
            snapshot_frame: Rect::from_origin_size(
                self.grid.floor_point(placement.snapshot_origin),
                snapshot,
            ),
            overlays: self.markers.iter().map(|dm| dm.overlay.clone()).collect(),
            legend,
        })
    }

    /// Arrange at the natural size and rasterize the composite.
    pub fn render(&mut self) -> SnapshotResult<Bitmap> {
        let bounds = self.size_that_fits()?;
        let arrangement = self.arrange(bounds)?;
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or_else(|| SnapshotError::validation("nothing composed yet"))?;
        render_arrangement(&arrangement, snapshot)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
