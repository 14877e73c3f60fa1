use crate::foundation::core::{Bitmap, PixelSize};
use crate::foundation::error::{SnapshotError, SnapshotResult};

/// Pixel ceiling above which a platform's desaturation filter silently
/// produces a blank image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DesaturationLimit {
    /// Largest pixel extent the filter handles.
    pub maximum: PixelSize,
}

impl DesaturationLimit {
    /// Ceiling of the affected legacy filter pipeline.
    pub const LEGACY_FILTER: Self = Self {
        maximum: PixelSize::new(1365, 1365),
    };

    /// Limit for a host OS major version; only version 12 is affected.
    pub fn for_os_major(major: u32) -> Option<Self> {
        (major == 12).then_some(Self::LEGACY_FILTER)
    }

    fn admits(self, size: PixelSize) -> bool {
        size.width <= self.maximum.width && size.height <= self.maximum.height
    }
}

/// Zero-saturation copy of `bitmap`.
///
/// Returns [`SnapshotError::ExceedsMaximumSize`] when `limit` rules the bitmap
/// out. Any other filter failure hands back the original pixels unchanged.
#[tracing::instrument(skip(bitmap), fields(width = bitmap.width, height = bitmap.height))]
pub fn desaturate(bitmap: Bitmap, limit: Option<DesaturationLimit>) -> SnapshotResult<Bitmap> {
    if let Some(limit) = limit
        && !limit.admits(bitmap.pixel_size())
    {
        return Err(SnapshotError::ExceedsMaximumSize {
            view_size: bitmap.pixel_size(),
            maximum_size: limit.maximum,
        });
    }

    match grayscale(&bitmap) {
        Ok(data) => Ok(Bitmap { data, ..bitmap }),
        Err(err) => {
            tracing::warn!(%err, "desaturation filter failed; keeping color bitmap");
            Ok(bitmap)
        }
    }
}

// Luma of premultiplied channels is the premultiplied luma, so alpha stays valid.
fn grayscale(bitmap: &Bitmap) -> SnapshotResult<Vec<u8>> {
    let expected = bitmap.width as usize * bitmap.height as usize * 4;
    if bitmap.data.len() != expected {
        return Err(SnapshotError::render(format!(
            "{}x{} bitmap holds {} bytes, expected {expected}",
            bitmap.width,
            bitmap.height,
            bitmap.data.len()
        )));
    }
    let rgba = image::RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.data.clone())
        .ok_or_else(|| SnapshotError::render("bitmap does not fit an rgba8 image buffer"))?;
    let gray = image::imageops::grayscale_alpha(&rgba);
    Ok(image::DynamicImage::ImageLumaA8(gray).into_rgba8().into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/desaturate.rs"]
mod tests;
