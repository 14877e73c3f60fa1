use crate::foundation::core::{Affine, PixelSize};

/// Convenience result type used across the crate.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Top-level error taxonomy used by capture, layout and rendering APIs.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// The subject is large enough to require tiling, but tiling only supports identity transforms.
    #[error("tiled capture does not support non-identity transforms: {0:?}")]
    UnsupportedTransform(Affine),

    /// Desaturation is unreliable above `maximum_size` on the configured platform.
    #[error(
        "view of {}x{} px exceeds the maximum desaturation size of {}x{} px",
        view_size.width,
        view_size.height,
        maximum_size.width,
        maximum_size.height
    )]
    ExceedsMaximumSize {
        /// Pixel size of the captured bitmap.
        view_size: PixelSize,
        /// Largest pixel size the desaturation filter handles correctly.
        maximum_size: PixelSize,
    },

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or stitching pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapshotError {
    /// Build a [`SnapshotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SnapshotError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
