use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::error::{SnapshotError, SnapshotResult};
use crate::markers::model::{Marker, MarkerShape};

/// Produces the ordered markers for a subject.
///
/// Marker order drives color assignment and legend order, so implementations
/// must return a stable sequence for identical input.
pub trait MarkerSource<S: ?Sized> {
    /// Walk `subject` and return its accessibility markers in reading order.
    fn markers(&mut self, subject: &S) -> SnapshotResult<Vec<Marker>>;
}

/// A pre-parsed marker list, returned as-is for any subject.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticMarkers(pub Vec<Marker>);

impl<S: ?Sized> MarkerSource<S> for StaticMarkers {
    fn markers(&mut self, _subject: &S) -> SnapshotResult<Vec<Marker>> {
        Ok(self.0.clone())
    }
}

impl StaticMarkers {
    /// Parse a JSON array of marker records.
    pub fn from_json_str(json: &str) -> SnapshotResult<Self> {
        let records: Vec<MarkerRecord> = serde_json::from_str(json)
            .map_err(|e| SnapshotError::validation(format!("invalid marker json: {e}")))?;
        let markers = records
            .into_iter()
            .enumerate()
            .map(|(idx, r)| r.into_marker().map_err(|e| prefix(idx, e)))
            .collect::<SnapshotResult<Vec<_>>>()?;
        Ok(Self(markers))
    }

    /// Read and parse a JSON marker file.
    pub fn from_json_path(path: &Path) -> SnapshotResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read markers '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

fn prefix(idx: usize, err: SnapshotError) -> SnapshotError {
    match err {
        SnapshotError::Validation(msg) => SnapshotError::validation(format!("marker {idx}: {msg}")),
        other => other,
    }
}

/// Serialized form of a [`Marker`].
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct MarkerRecord {
    #[serde(default)]
    frame: Option<[f64; 4]>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    custom_actions: Vec<String>,
    #[serde(default)]
    user_input_labels: Option<Vec<String>>,
    #[serde(default)]
    activation_point: Option<[f64; 2]>,
    #[serde(default)]
    accessibility_language: Option<String>,
}

impl MarkerRecord {
    fn into_marker(self) -> SnapshotResult<Marker> {
        let shape = match (self.frame, self.path) {
            (Some([x, y, w, h]), None) => {
                if ![x, y, w, h].iter().all(|v| v.is_finite()) || w < 0.0 || h < 0.0 {
                    return Err(SnapshotError::validation(
                        "frame must be finite with non-negative size",
                    ));
                }
                MarkerShape::Frame(Rect::new(x, y, x + w, y + h))
            }
            (None, Some(d)) => MarkerShape::Path(parse_path(&d)?),
            _ => {
                return Err(SnapshotError::validation(
                    "exactly one of `frame` or `path` is required",
                ));
            }
        };

        let default_point = shape.bounding_box().center();
        let (activation_point, uses_default_activation_point) = match self.activation_point {
            Some([x, y]) => {
                let p = Point::new(x, y);
                (p, p == default_point)
            }
            None => (default_point, true),
        };

        Ok(Marker {
            shape,
            description: self.description,
            hint: self.hint,
            custom_actions: self.custom_actions,
            user_input_labels: self.user_input_labels,
            activation_point,
            uses_default_activation_point,
            accessibility_language: self.accessibility_language,
        })
    }
}

fn parse_path(d: &str) -> SnapshotResult<BezPath> {
    let d = d.trim();
    if d.is_empty() {
        return Err(SnapshotError::validation("path must be non-empty"));
    }
    BezPath::from_svg(d).map_err(|e| SnapshotError::validation(format!("invalid path: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/markers/source.rs"]
mod tests;
