//! One legend entry: a color swatch next to the marker's description, with
//! optional hint, custom actions and input-label sections stacked below.
//!
//! Layout is a pure function of the available width. Heights are never
//! constrained, so an entry is never clipped or truncated.

use crate::foundation::core::{Color, Point, Rect, Size};
use crate::foundation::error::SnapshotResult;
use crate::legend::strings::LegendStrings;
use crate::legend::text::{ShapedText, TextShaper, TextStyle};
use crate::markers::model::Marker;

/// Side of the marker swatch.
pub const SWATCH_SIDE: f64 = 14.0;
/// Gap between the swatch and the text column.
pub const SWATCH_TO_TEXT: f64 = 16.0;
/// Gap between the description row and the hint.
pub const HINT_SPACING: f64 = 4.0;
/// Gap above the actions and input-label sections.
pub const SECTION_SPACING: f64 = 8.0;
/// Indent of each custom action under its heading.
pub const ACTION_INDENT: f64 = 8.0;
/// Horizontal and vertical padding inside an input-label pill.
pub const PILL_PADDING: (f64, f64) = (8.0, 4.0);
/// Gap between pills on both axes.
pub const PILL_GAP: f64 = 4.0;
/// Pill corner radius.
pub const PILL_RADIUS: f64 = 6.0;

const BODY_SIZE: f32 = 12.0;
const PRIMARY: Color = Color::BLACK;
const SECONDARY: Color = Color::rgb(0x66, 0x66, 0x66);

/// Shaped text positioned inside an entry.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedText {
    /// Top-left corner relative to the entry origin.
    pub origin: Point,
    /// Shaped content.
    pub text: ShapedText,
}

impl PlacedText {
    /// Occupied rectangle relative to the entry origin.
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.text.size)
    }
}

/// Rounded pill holding one input label.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPill {
    /// Pill outline relative to the entry origin.
    pub rect: Rect,
    /// Label inside the pill.
    pub label: PlacedText,
}

/// Arranged contents of one legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryLayout {
    /// Natural size of the entry.
    pub size: Size,
    /// Swatch rectangle.
    pub swatch: Rect,
    /// Swatch color.
    pub swatch_color: Color,
    /// Text blocks in reading order.
    pub texts: Vec<PlacedText>,
    /// Input-label pills.
    pub pills: Vec<PlacedPill>,
}

/// Content of one legend entry, ready to lay out at any width.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    description: String,
    hint: Option<String>,
    custom_actions: Vec<String>,
    input_labels: Vec<String>,
    color: Color,
    strings: LegendStrings,
}

impl LegendEntry {
    /// Entry for `marker` drawn in `color`; input labels are dropped unless
    /// `show_input_labels`.
    pub fn new(marker: &Marker, color: Color, show_input_labels: bool) -> Self {
        let input_labels = if show_input_labels {
            marker.user_input_labels.clone().unwrap_or_default()
        } else {
            Vec::new()
        };
        Self {
            description: marker.description.clone(),
            hint: marker.hint.clone().filter(|h| !h.trim().is_empty()),
            custom_actions: marker.custom_actions.clone(),
            input_labels,
            color,
            strings: LegendStrings::for_language(marker.accessibility_language.as_deref()),
        }
    }

    /// Swatch color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Natural size for `available` space.
    pub fn natural_size(
        &self,
        shaper: &mut dyn TextShaper,
        available: Size,
    ) -> SnapshotResult<Size> {
        Ok(self.layout(shaper, available)?.size)
    }

    /// Arrange the entry's parts for `available` space. Only the width
    /// constrains wrapping; the height is reported, never enforced.
    pub fn layout(
        &self,
        shaper: &mut dyn TextShaper,
        available: Size,
    ) -> SnapshotResult<EntryLayout> {
        let text_x = SWATCH_SIDE + SWATCH_TO_TEXT;
        let text_w = (available.width - text_x).max(0.0);
        let primary = TextStyle {
            size: BODY_SIZE,
            color: PRIMARY,
        };
        let secondary = TextStyle {
            size: BODY_SIZE,
            color: SECONDARY,
        };

        let mut texts = Vec::new();
        let mut pills = Vec::new();

        let description = shaper.shape(&self.description, primary, Some(text_w))?;
        let row_h = SWATCH_SIDE.max(description.size.height);
        let swatch = Rect::from_origin_size(
            Point::new(0.0, (row_h - SWATCH_SIDE) * 0.5),
            Size::new(SWATCH_SIDE, SWATCH_SIDE),
        );
        let mut content_w = description.size.width;
        if description.size.height > 0.0 {
            texts.push(PlacedText {
                origin: Point::new(text_x, (row_h - description.size.height) * 0.5),
                text: description,
            });
        }
        let mut y = row_h;

        if let Some(hint) = &self.hint {
            y += HINT_SPACING;
            let text = shaper.shape(hint, secondary, Some(text_w))?;
            content_w = content_w.max(text.size.width);
            y = place(&mut texts, text, Point::new(text_x, y));
        }

        if !self.custom_actions.is_empty() {
            y += SECTION_SPACING;
            let title = shaper.shape(self.strings.actions_title, primary, Some(text_w))?;
            content_w = content_w.max(title.size.width);
            y = place(&mut texts, title, Point::new(text_x, y));

            let action_w = (text_w - ACTION_INDENT).max(0.0);
            for action in &self.custom_actions {
                let text = shaper.shape(action, secondary, Some(action_w))?;
                content_w = content_w.max(ACTION_INDENT + text.size.width);
                y = place(&mut texts, text, Point::new(text_x + ACTION_INDENT, y));
            }
        }

        if !self.input_labels.is_empty() {
            y += SECTION_SPACING;
            let title = shaper.shape(self.strings.input_labels_title, primary, Some(text_w))?;
            content_w = content_w.max(title.size.width);
            y = place(&mut texts, title, Point::new(text_x, y)) + PILL_GAP;

            let (pad_x, pad_y) = PILL_PADDING;
            let label_w = (text_w - 2.0 * pad_x).max(0.0);
            let mut x = 0.0;
            let mut row_bottom = y;
            for label in &self.input_labels {
                let text = shaper.shape(label, secondary, Some(label_w))?;
                let pill = Size::new(
                    text.size.width + 2.0 * pad_x,
                    text.size.height + 2.0 * pad_y,
                );
                if x > 0.0 && x + pill.width > text_w {
                    x = 0.0;
                    y = row_bottom + PILL_GAP;
                }
                let rect = Rect::from_origin_size(Point::new(text_x + x, y), pill);
                pills.push(PlacedPill {
                    rect,
                    label: PlacedText {
                        origin: Point::new(rect.x0 + pad_x, rect.y0 + pad_y),
                        text,
                    },
                });
                content_w = content_w.max(x + pill.width);
                row_bottom = row_bottom.max(rect.y1);
                x += pill.width + PILL_GAP;
            }
            y = row_bottom;
        }

        Ok(EntryLayout {
            size: Size::new(text_x + content_w, y),
            swatch,
            swatch_color: self.color,
            texts,
            pills,
        })
    }
}

fn place(texts: &mut Vec<PlacedText>, text: ShapedText, origin: Point) -> f64 {
    let bottom = origin.y + text.size.height;
    texts.push(PlacedText { origin, text });
    bottom
}

#[cfg(test)]
#[path = "../../tests/unit/legend/entry.rs"]
mod tests;
