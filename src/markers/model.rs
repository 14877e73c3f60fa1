use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Point, Rect};

/// Region of an accessibility element, in the snapshot's coordinate space.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkerShape {
    /// Axis-aligned frame.
    Frame(Rect),
    /// Arbitrary outline.
    Path(BezPath),
}

impl MarkerShape {
    /// Axis-aligned bounds of the shape.
    pub fn bounding_box(&self) -> Rect {
        match self {
            MarkerShape::Frame(rect) => *rect,
            MarkerShape::Path(path) => path.bounding_box(),
        }
    }
}

/// One parsed accessibility element.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    /// Element region.
    pub shape: MarkerShape,
    /// Spoken description; may be empty.
    pub description: String,
    /// Spoken hint.
    pub hint: Option<String>,
    /// Custom action names, in declaration order.
    pub custom_actions: Vec<String>,
    /// Input labels for voice control.
    pub user_input_labels: Option<Vec<String>>,
    /// Point an assistive technology activates.
    pub activation_point: Point,
    /// Whether `activation_point` is the element's default.
    pub uses_default_activation_point: bool,
    /// Locale tag used to localize fixed legend strings.
    pub accessibility_language: Option<String>,
}

impl Marker {
    /// Marker for a frame with only a description; the activation point is
    /// the frame center and counts as the default.
    pub fn frame(rect: Rect, description: impl Into<String>) -> Self {
        Self {
            shape: MarkerShape::Frame(rect),
            description: description.into(),
            hint: None,
            custom_actions: Vec::new(),
            user_input_labels: None,
            activation_point: rect.center(),
            uses_default_activation_point: true,
            accessibility_language: None,
        }
    }
}

/// When to draw the activation-point indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationPointPolicy {
    /// Every marker gets an indicator.
    Always,
    /// Only markers whose activation point differs from the default.
    #[default]
    WhenOverridden,
    /// No indicators.
    Never,
}

impl ActivationPointPolicy {
    /// Whether the policy asks for an indicator on `marker`, before bounds checks.
    pub fn wants_indicator(self, marker: &Marker) -> bool {
        match self {
            ActivationPointPolicy::Always => true,
            ActivationPointPolicy::WhenOverridden => !marker.uses_default_activation_point,
            ActivationPointPolicy::Never => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markers/model.rs"]
mod tests;
