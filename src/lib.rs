//! a11y-snapshot composes accessibility snapshots: a bitmap of a view with
//! a translucent highlight over every accessibility element and a legend
//! describing each one.
//!
//! # Pipeline overview
//!
//! 1. **Capture**: `CaptureSubject -> Bitmap`, tiling subjects larger than one
//!    render surface and optionally desaturating the result ([`capture`]).
//! 2. **Map**: each [`Marker`] becomes an [`Overlay`] plus an optional
//!    [`ActivationIndicator`], colored from the configured palette.
//! 3. **Lay out**: the legend either stacks below the snapshot or flows in
//!    columns beside it ([`select_strategy`]); [`composite_size`] and
//!    [`place_entries`] always agree on the flow.
//! 4. **Render** (optional): [`render_arrangement`] rasterizes the result on
//!    the CPU as premultiplied RGBA8.
//!
//! [`SnapshotComposer`] drives all four steps and answers the host's
//! two-phase size negotiation.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: layout is a pure function of the snapshot size, the
//!   measured entries and the device scale.
//! - **Pixel aligned**: composite sizes round up and snapshot offsets round
//!   down to the device pixel grid.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod capture;
mod compose;
mod config;
mod foundation;
mod legend;
mod markers;
mod overlay;
mod render;

pub use capture::desaturate::{DesaturationLimit, desaturate};
pub use capture::host::{CaptureSubject, HostPlacement, ParentSlot, ReparentGuard};
pub use capture::raster::RasterView;
pub use capture::service::{CaptureOptions, MAX_SURFACE_SIDE, RenderMode, capture};
pub use capture::tiles::{Tile, fits_single_surface, tile_grid};
pub use compose::composer::{ArrangedEntry, Arrangement, DisplayMarker, SnapshotComposer};
pub use config::{CaptureConfig, DEFAULT_PALETTE, SnapshotConfig};
pub use foundation::core::{
    Affine, BezPath, Bitmap, Color, Insets, PixelSize, Point, Rect, Size, Vec2,
};
pub use foundation::error::{SnapshotError, SnapshotResult};
pub use foundation::pixel::PixelGrid;
pub use legend::entry::{
    ACTION_INDENT, EntryLayout, HINT_SPACING, LegendEntry, PILL_GAP, PILL_PADDING, PILL_RADIUS,
    PlacedPill, PlacedText, SECTION_SPACING, SWATCH_SIDE, SWATCH_TO_TEXT,
};
pub use legend::flow::{
    FlowPlacement, FlowStrategy, LegendMetrics, assign_columns, column_count, composite_size,
    measurement_bounds, place_entries, select_strategy,
};
pub use legend::strings::LegendStrings;
pub use legend::text::{
    FixedMetricsShaper, ParleyShaper, PositionedGlyph, ShapedText, TextBrush, TextShaper,
    TextStyle,
};
pub use markers::model::{ActivationPointPolicy, Marker, MarkerShape};
pub use markers::source::{MarkerSource, StaticMarkers};
pub use overlay::mapper::{
    ActivationIndicator, INDICATOR_SIDE, MarkerOverlay, OVERLAY_ALPHA, Overlay,
    PATH_STROKE_WIDTH, map_marker,
};
pub use render::cpu::render_arrangement;
