use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Color, Point, Rect, Size};
use crate::markers::model::{ActivationPointPolicy, Marker, MarkerShape};

/// Opacity of region highlights.
pub const OVERLAY_ALPHA: f64 = 0.3;
/// Stroke width of path highlights, in points.
pub const PATH_STROKE_WIDTH: f64 = 4.0;
/// Side of the activation-point indicator, in points.
pub const INDICATOR_SIDE: f64 = 16.0;

/// Highlight drawn over the snapshot for one marker.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    /// Translucent filled rectangle.
    Fill {
        /// Highlighted region.
        rect: Rect,
        /// Fill color, alpha included.
        color: Color,
    },
    /// Translucent outline spanning the whole snapshot; no fill.
    Stroke {
        /// Outline to stroke.
        path: BezPath,
        /// Stroke color, alpha included.
        color: Color,
        /// Stroke width in points.
        width: f64,
    },
}

/// Crosshair glyph marking an activation point.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivationIndicator {
    /// Glyph frame, centered on the activation point.
    pub frame: Rect,
    /// Tint.
    pub color: Color,
}

impl ActivationIndicator {
    /// Ring plus cross, in snapshot space.
    pub fn glyph_path(&self) -> BezPath {
        let c = self.frame.center();
        let r = self.frame.width() * 0.5;
        let mut path = kurbo::Circle::new(c, r * 0.55).to_path(0.1);
        path.move_to(Point::new(c.x, self.frame.y0));
        path.line_to(Point::new(c.x, self.frame.y1));
        path.move_to(Point::new(self.frame.x0, c.y));
        path.line_to(Point::new(self.frame.x1, c.y));
        path
    }
}

/// Overlay artifacts for one marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerOverlay {
    /// Region highlight.
    pub overlay: Overlay,
    /// Activation-point indicator, when the policy and bounds allow it.
    pub indicator: Option<ActivationIndicator>,
}

/// Build the highlight and indicator for `marker` drawn in `color` over a
/// snapshot of `snapshot` size.
pub fn map_marker(
    marker: &Marker,
    color: Color,
    policy: ActivationPointPolicy,
    snapshot: Size,
) -> MarkerOverlay {
    let tint = color.with_alpha(OVERLAY_ALPHA);
    let overlay = match &marker.shape {
        MarkerShape::Frame(rect) => Overlay::Fill {
            rect: *rect,
            color: tint,
        },
        MarkerShape::Path(path) => Overlay::Stroke {
            path: path.clone(),
            color: tint,
            width: PATH_STROKE_WIDTH,
        },
    };

    let visible = Rect::from_origin_size(Point::ZERO, snapshot);
    let indicator = (policy.wants_indicator(marker) && visible.contains(marker.activation_point))
        .then(|| ActivationIndicator {
            frame: Rect::from_center_size(
                marker.activation_point,
                Size::new(INDICATOR_SIDE, INDICATOR_SIDE),
            ),
            color,
        });

    MarkerOverlay { overlay, indicator }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/mapper.rs"]
mod tests;
