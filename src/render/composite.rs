//! Premultiplied RGBA8 blending for the snapshot and the overlay layer.

use crate::foundation::core::Bitmap;
use crate::foundation::error::{SnapshotError, SnapshotResult};

/// Source-over of one premultiplied pixel onto another.
pub(crate) fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255 - u16::from(sa);
            std::array::from_fn(|i| src[i].saturating_add(mul_div255(u16::from(dst[i]), inv)))
        }
    }
}

/// Composite a same-sized premultiplied layer over `dst`.
pub(crate) fn layer_over(dst: &mut Bitmap, layer: &[u8]) -> SnapshotResult<()> {
    if dst.data.len() != layer.len() {
        return Err(SnapshotError::render(format!(
            "layer holds {} bytes, canvas {}x{} needs {}",
            layer.len(),
            dst.width,
            dst.height,
            dst.data.len()
        )));
    }
    blend_row(&mut dst.data, layer);
    Ok(())
}

/// Source-over of `src` onto `dst` with its top-left corner at `(x, y)`,
/// clipped to `dst`.
pub(crate) fn over_at(dst: &mut Bitmap, src: &Bitmap, x: u32, y: u32) {
    if x >= dst.width || y >= dst.height {
        return;
    }
    let cols = src.width.min(dst.width - x) as usize;
    let rows = src.height.min(dst.height - y) as usize;
    let dst_stride = dst.width as usize * 4;
    let src_stride = src.width as usize * 4;
    for row in 0..rows {
        let d = (y as usize + row) * dst_stride + x as usize * 4;
        let s = row * src_stride;
        blend_row(&mut dst.data[d..d + cols * 4], &src.data[s..s + cols * 4]);
    }
}

fn blend_row(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
