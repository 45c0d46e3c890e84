//! The in-memory pixel buffer, holding one 2-bit grayscale level per panel pixel.

use crate::command::consts::{PIXEL_COLS, PIXEL_ROWS, RAM_BYTES_PER_ROW};

/// Width of the buffer in pixels.
pub const WIDTH: i32 = PIXEL_COLS as i32;
/// Height of the buffer in pixels.
pub const HEIGHT: i32 = PIXEL_ROWS as i32;
/// Brightest grayscale level.
pub const MAX_LEVEL: u8 = 3;

/// Display RAM intensity for each of the four grayscale levels. Every level is written as two
/// bytes of this value.
pub const LEVEL_TO_BYTE: [u8; 4] = [0x00, 0x55, 0xAA, 0xFF];

pub(crate) fn in_range<T: PartialOrd>(x: T, lo: T, hi: T) -> bool {
    x >= lo && x < hi
}

/// Expand one buffer row into the bytes written to display RAM: each level maps through
/// `LEVEL_TO_BYTE` and is written twice.
pub fn expand_row(row: &[u8; PIXEL_COLS], out: &mut [u8; RAM_BYTES_PER_ROW]) {
    for (level, pair) in row.iter().zip(out.chunks_mut(2)) {
        let b = LEVEL_TO_BYTE[(*level & MAX_LEVEL) as usize];
        pair[0] = b;
        pair[1] = b;
    }
}

/// Bytes in one row of a full panel image packed four 2-bit pixels per byte.
pub const PACKED_ROW_BYTES: usize = PIXEL_COLS / 4;

/// Expand one row of a packed 2-bit image into display RAM bytes, like `expand_row`. Pixels are
/// taken most significant bits first. A short `packed` leaves the tail of `out` untouched.
pub fn expand_packed_row(packed: &[u8], out: &mut [u8; RAM_BYTES_PER_ROW]) {
    for (byte, quad) in packed.iter().zip(out.chunks_mut(8)) {
        for (i, pair) in quad.chunks_mut(2).enumerate() {
            let b = LEVEL_TO_BYTE[usize::from((byte >> (6 - 2 * i)) & MAX_LEVEL)];
            pair[0] = b;
            pair[1] = b;
        }
    }
}

/// A 128x64 grid of grayscale levels 0-3. Writes outside the grid are dropped.
#[derive(Clone)]
pub struct FrameBuffer {
    rows: [[u8; PIXEL_COLS]; PIXEL_ROWS],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new()
    }
}

impl FrameBuffer {
    /// A buffer with every pixel at level 0.
    pub const fn new() -> Self {
        FrameBuffer {
            rows: [[0; PIXEL_COLS]; PIXEL_ROWS],
        }
    }

    /// Set the pixel at column `x`, row `y` to `level`, masked to 2 bits. Does nothing if the
    /// coordinates lie outside the buffer.
    pub fn set_pixel(&mut self, x: i32, y: i32, level: u8) {
        if in_range(x, 0, WIDTH) && in_range(y, 0, HEIGHT) {
            self.rows[y as usize][x as usize] = level & MAX_LEVEL;
        }
    }

    /// The level of the pixel at column `x`, row `y`, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        if in_range(x, 0, WIDTH) && in_range(y, 0, HEIGHT) {
            Some(self.rows[y as usize][x as usize])
        } else {
            None
        }
    }

    /// Set every pixel to level 0.
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            *row = [0; PIXEL_COLS];
        }
    }

    /// Set every pixel of the rows `[y, y + height)` to level 0. Rows outside the buffer are
    /// skipped.
    pub fn clear_rows(&mut self, y: i32, height: i32) {
        for r in y..y.saturating_add(height) {
            if in_range(r, 0, HEIGHT) {
                self.rows[r as usize] = [0; PIXEL_COLS];
            }
        }
    }

    /// The rows of the buffer, top to bottom.
    pub fn rows(&self) -> &[[u8; PIXEL_COLS]; PIXEL_ROWS] {
        &self.rows
    }
}
