use std::sync::Arc;

use crate::foundation::core::{Color, Size};
use crate::foundation::error::{SnapshotError, SnapshotResult};

/// Font size and color for a run of legend text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// Glyph id and baseline position relative to the text block origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the shaping font.
    pub id: u32,
    /// Horizontal position.
    pub x: f32,
    /// Baseline position.
    pub y: f32,
}

/// Measured (and possibly shaped) block of text.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedText {
    /// Natural size of the wrapped block.
    pub size: Size,
    /// Style the block was shaped with.
    pub style: TextStyle,
    /// Glyphs to draw; empty for measurement-only shapers.
    pub glyphs: Vec<PositionedGlyph>,
    /// Font the glyph ids refer to.
    pub font: Option<Arc<Vec<u8>>>,
}

impl ShapedText {
    /// Zero-size block for empty strings.
    pub fn empty(style: TextStyle) -> Self {
        Self {
            size: Size::ZERO,
            style,
            glyphs: Vec::new(),
            font: None,
        }
    }
}

/// Measures, and optionally shapes, wrapped text.
pub trait TextShaper {
    /// Lay out `text` wrapped at `max_width` (unbounded when `None`).
    fn shape(
        &mut self,
        text: &str,
        style: TextStyle,
        max_width: Option<f64>,
    ) -> SnapshotResult<ShapedText>;
}

/// Deterministic monospace metrics with greedy word wrapping.
///
/// Produces sizes only; nothing is drawn for text measured this way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMetricsShaper {
    /// Advance of every character, in ems.
    pub advance_em: f64,
    /// Line height, in ems.
    pub line_height_em: f64,
}

impl Default for FixedMetricsShaper {
    fn default() -> Self {
        Self {
            advance_em: 0.5,
            line_height_em: 1.25,
        }
    }
}

impl FixedMetricsShaper {
    fn wrap(&self, text: &str, advance: f64, max_width: Option<f64>) -> Vec<usize> {
        let max_chars = max_width
            .map(|w| ((w / advance) + 1e-9).floor().max(1.0) as usize)
            .unwrap_or(usize::MAX);

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = 0usize;
            for word in paragraph.split_whitespace() {
                let mut len = word.chars().count();
                let needed = if current == 0 { len } else { current + 1 + len };
                if needed <= max_chars {
                    current = needed;
                    continue;
                }
                if current > 0 {
                    lines.push(current);
                }
                while len > max_chars {
                    lines.push(max_chars);
                    len -= max_chars;
                }
                current = len;
            }
            lines.push(current);
        }
        lines
    }
}

impl TextShaper for FixedMetricsShaper {
    fn shape(
        &mut self,
        text: &str,
        style: TextStyle,
        max_width: Option<f64>,
    ) -> SnapshotResult<ShapedText> {
        if !style.size.is_finite() || style.size <= 0.0 {
            return Err(SnapshotError::validation("text size must be finite and > 0"));
        }
        if text.trim().is_empty() {
            return Ok(ShapedText::empty(style));
        }
        let em = f64::from(style.size);
        let advance = self.advance_em * em;
        let lines = self.wrap(text, advance, max_width);
        let widest = lines.iter().copied().max().unwrap_or(0);
        Ok(ShapedText {
            size: Size::new(
                widest as f64 * advance,
                lines.len() as f64 * self.line_height_em * em,
            ),
            style,
            glyphs: Vec::new(),
            font: None,
        })
    }
}

/// RGBA8 brush carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Parley-backed shaper for a single font face.
///
/// Words wider than the wrap width break between glyphs, so a shaped block
/// never exceeds its `max_width`.
pub struct ParleyShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font_bytes: Arc<Vec<u8>>,
}

impl ParleyShaper {
    /// Register `font_bytes` and shape all text with its first family.
    pub fn new(font_bytes: Vec<u8>) -> SnapshotResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SnapshotError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SnapshotError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_bytes: Arc::new(font_bytes),
        })
    }

    /// Family every run is shaped with.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

impl TextShaper for ParleyShaper {
    fn shape(
        &mut self,
        text: &str,
        style: TextStyle,
        max_width: Option<f64>,
    ) -> SnapshotResult<ShapedText> {
        if !style.size.is_finite() || style.size <= 0.0 {
            return Err(SnapshotError::validation("text size must be finite and > 0"));
        }
        if text.trim().is_empty() {
            return Ok(ShapedText::empty(style));
        }

        let brush = TextBrush {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        builder.push_default(parley::style::StyleProperty::OverflowWrap(
            parley::style::OverflowWrap::Anywhere,
        ));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        let max_width = max_width.map(|w| w as f32);
        layout.break_all_lines(max_width);
        layout.align(
            max_width,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| PositionedGlyph {
                    id: u32::from(g.id),
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedText {
            size: Size::new(f64::from(layout.width()), f64::from(layout.height())),
            style,
            glyphs,
            font: Some(self.font_bytes.clone()),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/legend/text.rs"]
mod tests;
