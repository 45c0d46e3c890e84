//! Rectangular windows of display RAM.

use crate::command::consts::*;

/// A window of display RAM, in controller column addresses and RAM rows, both bounds inclusive.
/// Each column address covers two framebuffer bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub col_start: u8,
    pub col_end: u8,
    pub row_start: u8,
    pub row_end: u8,
}

impl Region {
    /// The window covering the whole panel, used by refreshes and full image writes.
    pub const FULL: Region = Region {
        col_start: 0,
        col_end: COLUMN_ADDR_MAX,
        row_start: 0,
        row_end: PIXEL_ROWS as u8 - 1,
    };
}
