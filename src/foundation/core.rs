use crate::foundation::error::{SnapshotError, SnapshotResult};

pub use kurbo::{Affine, BezPath, Insets, Point, Rect, Size, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    #[serde(default = "opaque_alpha")]
    pub a: u8,
}

fn opaque_alpha() -> u8 {
    255
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from red, green and blue channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul(self) -> [u8; 4] {
        let premul = |c: u8| -> u8 { ((u16::from(c) * u16::from(self.a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// Integer pixel extent of a bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl PixelSize {
    /// Construct a pixel size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Premultiplied RGBA8 pixels, row-major, tagged with the device scale they were produced at.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Device pixels per point.
    pub scale: f64,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl Bitmap {
    /// A fully transparent bitmap.
    pub fn transparent(width: u32, height: u32, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// A bitmap filled with a single color.
    pub fn filled(width: u32, height: u32, scale: f64, color: Color) -> Self {
        let px = color.to_premul();
        let mut out = Self::transparent(width, height, scale);
        for chunk in out.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        out
    }

    /// Wrap premultiplied bytes, validating their length.
    pub fn from_premul(width: u32, height: u32, scale: f64, data: Vec<u8>) -> SnapshotResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(SnapshotError::validation(format!(
                "bitmap byte length {} does not match {width}x{height} rgba8",
                data.len()
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SnapshotError::validation("bitmap scale must be finite and > 0"));
        }
        Ok(Self {
            width,
            height,
            scale,
            data,
        })
    }

    /// Premultiply straight RGBA8 bytes (e.g. decoded PNG data).
    pub fn from_straight_rgba8(
        width: u32,
        height: u32,
        scale: f64,
        mut data: Vec<u8>,
    ) -> SnapshotResult<Self> {
        for px in data.chunks_exact_mut(4) {
            let c = Color {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            };
            px.copy_from_slice(&c.to_premul());
        }
        Self::from_premul(width, height, scale, data)
    }

    /// Straight RGBA8 copy of the pixels, suitable for PNG encoding.
    pub fn to_rgba8_unpremultiplied(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Pixel extent.
    pub fn pixel_size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Extent in points (pixels divided by scale).
    pub fn point_size(&self) -> Size {
        Size::new(
            f64::from(self.width) / self.scale,
            f64::from(self.height) / self.scale,
        )
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Copy `src` into this bitmap with its top-left corner at `(x, y)`, clipping to bounds.
    pub fn blit(&mut self, src: &Bitmap, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = src.width.min(self.width - x) as usize;
        let rows = src.height.min(self.height - y) as usize;
        let dst_stride = self.width as usize * 4;
        let src_stride = src.width as usize * 4;
        for row in 0..rows {
            let d = (y as usize + row) * dst_stride + x as usize * 4;
            let s = row * src_stride;
            self.data[d..d + cols * 4].copy_from_slice(&src.data[s..s + cols * 4]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
