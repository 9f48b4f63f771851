//! Bounds-checked raster paste
//!
//! Assembly writes every tile into the destination canvas with a raw
//! row-by-row copy. A tile that would land outside the canvas indicates
//! a sizing bug upstream, so the copy refuses rather than clips.

use crate::io::error::{MosaicError, Result};
use image::RgbaImage;

const CHANNELS: usize = 4;

/// Copy a source tile into the destination at a pixel offset
///
/// # Errors
///
/// Returns [`MosaicError::PasteOutOfBounds`] if any part of the source
/// would fall outside the destination. Nothing is written in that case.
pub fn paste(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) -> Result<()> {
    let (src_w, src_h) = src.dimensions();
    let (dst_w, dst_h) = dst.dimensions();

    if x.checked_add(src_w).is_none_or(|right| right > dst_w)
        || y.checked_add(src_h).is_none_or(|bottom| bottom > dst_h)
    {
        return Err(MosaicError::PasteOutOfBounds {
            tile: (src_w, src_h),
            offset: (x, y),
            canvas: (dst_w, dst_h),
        });
    }

    let src_stride = src_w as usize * CHANNELS;
    let dst_stride = dst_w as usize * CHANNELS;
    let src_raw: &[u8] = src.as_raw();
    let dst_raw: &mut [u8] = dst;

    for row in 0..src_h as usize {
        let src_start = row * src_stride;
        let dst_start = (y as usize + row) * dst_stride + x as usize * CHANNELS;
        if let (Some(dst_row), Some(src_row)) = (
            dst_raw.get_mut(dst_start..dst_start + src_stride),
            src_raw.get(src_start..src_start + src_stride),
        ) {
            dst_row.copy_from_slice(src_row);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_paste_writes_expected_region() {
        let mut canvas = solid(8, 8, [0, 0, 0, 0]);
        let tile = solid(4, 2, [255, 0, 0, 255]);

        assert!(paste(&mut canvas, &tile, 2, 3).is_ok());

        assert_eq!(canvas.get_pixel(2, 3), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(5, 4), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(1, 3), &Rgba([0, 0, 0, 0]));
        assert_eq!(canvas.get_pixel(2, 5), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_paste_rejects_overflow() {
        let mut canvas = solid(8, 8, [0, 0, 0, 0]);
        let tile = solid(4, 4, [255, 0, 0, 255]);

        assert!(paste(&mut canvas, &tile, 6, 0).is_err());
        assert!(paste(&mut canvas, &tile, 0, 6).is_err());

        // The failed paste must not have clipped anything in
        for pixel in canvas.pixels() {
            assert_eq!(pixel, &Rgba([0, 0, 0, 0]));
        }
    }
}
