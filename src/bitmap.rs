//! Blitting of packed grayscale images into a `FrameBuffer`.
//!
//! Images are row-major, each row starting on a byte boundary, pixels packed most significant bits
//! first. Pixels falling outside the buffer are dropped.

use core::convert::TryFrom;

use itertools::iproduct;

use crate::error::BitmapError;
use crate::framebuffer::FrameBuffer;

/// Number of bytes an image of `height` rows of `stride` bytes occupies, checked against `len`.
fn check_len(stride: usize, height: usize, len: usize) -> Result<(), BitmapError> {
    let needed = stride.checked_mul(height).unwrap_or(usize::max_value());
    if len < needed {
        return Err(BitmapError { needed, len });
    }
    Ok(())
}

/// `origin + delta`, or `None` when the sum cannot be represented and so lies off the buffer.
fn offset(origin: i32, delta: usize) -> Option<i32> {
    i32::try_from(delta).ok().and_then(|d| origin.checked_add(d))
}

impl FrameBuffer {
    /// Draw a `width` x `height` image of 4-bit pixels, two per byte with the left pixel in the
    /// high nibble, with its top left corner at `(x, y)`. Each pixel is reduced to a 2-bit level
    /// by dropping its two low bits. Rows of odd width end in a padding nibble.
    ///
    /// Returns an error without drawing anything if `data` is shorter than the image.
    pub fn draw_4bpp_bitmap(
        &mut self,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
        data: &[u8],
    ) -> Result<(), BitmapError> {
        let stride = (width + 1) / 2;
        check_len(stride, height, data.len())?;
        for (row, col) in iproduct!(0..height, 0..width) {
            let byte = data[row * stride + col / 2];
            let nibble = if col % 2 == 0 { byte >> 4 } else { byte & 0x0F };
            if let (Some(px), Some(py)) = (offset(x, col), offset(y, row)) {
                self.set_pixel(px, py, nibble >> 2);
            }
        }
        Ok(())
    }

    /// Draw a `width` x `height` image of 2-bit pixels, four per byte starting with the two most
    /// significant bits, with its top left corner at `(x, y)`. Levels are copied unchanged. When
    /// the width is not a multiple of four, the last byte of each row is only partly used.
    ///
    /// Returns an error without drawing anything if `data` is shorter than the image.
    pub fn draw_2bpp_bitmap(
        &mut self,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
        data: &[u8],
    ) -> Result<(), BitmapError> {
        let stride = (width + 3) / 4;
        check_len(stride, height, data.len())?;
        for (row, col) in iproduct!(0..height, 0..width) {
            let byte = data[row * stride + col / 4];
            let shift = 6 - 2 * (col % 4);
            if let (Some(px), Some(py)) = (offset(x, col), offset(y, row)) {
                self.set_pixel(px, py, (byte >> shift) & 0x03);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_bpp_downshifts() {
        let mut fb = FrameBuffer::new();
        fb.draw_4bpp_bitmap(0, 0, 2, 1, &[0xF0]).unwrap();
        assert_eq!(fb.pixel(0, 0), Some(3));
        assert_eq!(fb.pixel(1, 0), Some(0));

        fb.draw_4bpp_bitmap(10, 20, 4, 1, &[0x48, 0xC3]).unwrap();
        assert_eq!(fb.pixel(10, 20), Some(1));
        assert_eq!(fb.pixel(11, 20), Some(2));
        assert_eq!(fb.pixel(12, 20), Some(3));
        assert_eq!(fb.pixel(13, 20), Some(0));
    }

    #[test]
    fn four_bpp_odd_width_skips_padding() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(3, 0, 2);
        fb.set_pixel(3, 1, 2);
        // 3 pixels per row, 2 bytes per row; the low nibble of each second byte is padding.
        fb.draw_4bpp_bitmap(0, 0, 3, 2, &[0xFF, 0x8F, 0x40, 0x0F]).unwrap();
        assert_eq!(fb.pixel(0, 0), Some(3));
        assert_eq!(fb.pixel(1, 0), Some(3));
        assert_eq!(fb.pixel(2, 0), Some(2));
        assert_eq!(fb.pixel(3, 0), Some(2));
        assert_eq!(fb.pixel(0, 1), Some(1));
        assert_eq!(fb.pixel(1, 1), Some(0));
        assert_eq!(fb.pixel(2, 1), Some(0));
        assert_eq!(fb.pixel(3, 1), Some(2));
    }

    #[test]
    fn two_bpp_partial_group() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(5, 0, 1);
        // 5 pixels per row: one full byte and the top two bits of the next.
        fb.draw_2bpp_bitmap(0, 0, 5, 2, &[0b00_01_10_11, 0b10_11_11_11, 0xFF, 0b01_00_00_00])
            .unwrap();
        let row0: std::vec::Vec<_> = (0..6).map(|x| fb.pixel(x, 0).unwrap()).collect();
        assert_eq!(row0, vec![0, 1, 2, 3, 2, 1]);
        let row1: std::vec::Vec<_> = (0..5).map(|x| fb.pixel(x, 1).unwrap()).collect();
        assert_eq!(row1, vec![3, 3, 3, 3, 1]);
    }

    #[test]
    fn clipped_at_buffer_edges() {
        let mut fb = FrameBuffer::new();
        fb.draw_2bpp_bitmap(126, 62, 4, 4, &[0xFF; 4]).unwrap();
        assert_eq!(fb.pixel(126, 62), Some(3));
        assert_eq!(fb.pixel(127, 63), Some(3));
        fb.draw_4bpp_bitmap(-1, -1, 2, 2, &[0x4C, 0x8F]).unwrap();
        // Only the bottom right pixel, 0xF >> 2, lands in the buffer.
        assert_eq!(fb.pixel(0, 0), Some(3));
        assert_eq!(fb.pixel(1, 0), Some(0));
        assert_eq!(fb.pixel(0, 1), Some(0));
    }

    #[test]
    fn origin_near_i32_max_is_clipped() {
        let mut fb = FrameBuffer::new();
        fb.draw_4bpp_bitmap(i32::max_value(), 0, 4, 1, &[0xFF, 0xFF]).unwrap();
        fb.draw_2bpp_bitmap(0, i32::max_value() - 1, 4, 3, &[0xFF; 3]).unwrap();
        fb.draw_2bpp_bitmap(i32::max_value() - 2, i32::max_value(), 8, 2, &[0xFF; 4])
            .unwrap();
        assert!(fb.rows().iter().all(|row| row.iter().all(|p| *p == 0)));
    }

    #[test]
    fn short_data_is_rejected() {
        let mut fb = FrameBuffer::new();
        assert_eq!(
            fb.draw_4bpp_bitmap(0, 0, 3, 2, &[0xFF, 0xFF, 0xFF]),
            Err(BitmapError { needed: 4, len: 3 })
        );
        assert_eq!(
            fb.draw_2bpp_bitmap(0, 0, 5, 3, &[0xFF; 5]),
            Err(BitmapError { needed: 6, len: 5 })
        );
        assert!(fb.rows().iter().all(|row| row.iter().all(|p| *p == 0)));
    }

    #[test]
    fn empty_image_draws_nothing() {
        let mut fb = FrameBuffer::new();
        fb.draw_4bpp_bitmap(0, 0, 0, 10, &[]).unwrap();
        fb.draw_2bpp_bitmap(0, 0, 10, 0, &[]).unwrap();
        assert!(fb.rows().iter().all(|row| row.iter().all(|p| *p == 0)));
    }
}
