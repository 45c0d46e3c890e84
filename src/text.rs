//! Glyph rendering into a `FrameBuffer`, and the cursor based text context used for stream
//! style printing.
//!
//! Every function here takes a string as a sequence of bytes: each byte occupies one character
//! cell, and bytes outside printable ASCII draw nothing but still take up their cell.

use core::fmt;

use itertools::iproduct;

use crate::font::{glyph, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::framebuffer::{FrameBuffer, HEIGHT, MAX_LEVEL, WIDTH};

/// Row of the top edge of text centered vertically on the panel.
pub const CENTER_ROW: i32 = (HEIGHT - GLYPH_HEIGHT) / 2;

fn byte_len(s: &str) -> i32 {
    s.len().min(i32::max_value() as usize / GLYPH_ADVANCE as usize) as i32
}

impl FrameBuffer {
    /// Draw `c` with its top left corner at `(x, y)`. Set bits of the glyph are written at the
    /// brightest level and clear bits at level 0, so the character replaces whatever was under
    /// its 6x8 cell. Pixels outside the buffer are skipped individually. Characters outside
    /// printable ASCII leave the buffer unchanged.
    pub fn draw_char(&mut self, x: i32, y: i32, c: char) {
        let g = match glyph(c) {
            Some(g) => g,
            None => return,
        };
        for (col, row) in iproduct!(0..GLYPH_WIDTH, 0..GLYPH_HEIGHT) {
            let set = (g[col as usize] >> row) & 1 != 0;
            let level = if set { MAX_LEVEL } else { 0 };
            if let (Some(px), Some(py)) = (x.checked_add(col), y.checked_add(row)) {
                self.set_pixel(px, py, level);
            }
        }
    }

    /// Draw `c` magnified `size` times, each set glyph bit becoming a `size` by `size` block of
    /// level `color`.
    ///
    /// Unlike `draw_char`, clear bits are not written: the background shows through, and the
    /// caller clears it first if needed.
    pub fn draw_char_scaled(&mut self, x: i32, y: i32, c: char, size: u8, color: u8) {
        let g = match glyph(c) {
            Some(g) => g,
            None => return,
        };
        let size = i32::from(size);
        for (col, row) in iproduct!(0..GLYPH_WIDTH, 0..GLYPH_HEIGHT) {
            if (g[col as usize] >> row) & 1 == 0 {
                continue;
            }
            for (dx, dy) in iproduct!(0..size, 0..size) {
                let px = x.checked_add(col * size + dx);
                let py = y.checked_add(row * size + dy);
                if let (Some(px), Some(py)) = (px, py) {
                    self.set_pixel(px, py, color);
                }
            }
        }
    }

    /// Clear the 8 row band starting at `y`, then draw `s` in it starting at column `-offset`,
    /// one character every 7 columns.
    pub fn draw_string_at_offset(&mut self, s: &str, y: i32, offset: i32) {
        self.clear_rows(y, GLYPH_HEIGHT);
        let mut x = offset.saturating_neg();
        for b in s.bytes() {
            if x >= WIDTH {
                break;
            }
            self.draw_char(x, y, char::from(b));
            x = x.saturating_add(GLYPH_ADVANCE);
        }
    }

    /// Clear the whole buffer and draw `s` as a single line centered on the panel. An overlong
    /// line starts left of column 0 and is clipped on both sides.
    pub fn draw_string_centered(&mut self, s: &str) {
        let len = byte_len(s);
        let total_width = len * GLYPH_WIDTH + (len - 1);
        let x0 = (WIDTH - total_width) / 2;
        self.clear();
        for (i, b) in s.bytes().enumerate().take(len as usize) {
            self.draw_char(x0 + i as i32 * GLYPH_ADVANCE, CENTER_ROW, char::from(b));
        }
    }

    /// Draw `s` horizontally centered with its top edge at row `y`, leaving the rest of the
    /// buffer alone. A line too wide for the panel starts at column 0.
    pub fn draw_line_centered(&mut self, s: &str, y: i32) {
        let len = byte_len(s);
        let total_width = len * GLYPH_WIDTH + (len + 1);
        let x0 = ((WIDTH - total_width) / 2).max(0);
        for (i, b) in s.bytes().enumerate().take(len as usize) {
            self.draw_char(x0 + i as i32 * GLYPH_ADVANCE, y, char::from(b));
        }
    }
}

/// Text style and cursor for stream style printing with `print_char`, `print_str` and the
/// `Printer` returned by `printer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextContext {
    cursor_x: i32,
    cursor_y: i32,
    size: u8,
    color: u8,
    wrap: bool,
}

impl Default for TextContext {
    fn default() -> Self {
        TextContext::new()
    }
}

impl TextContext {
    /// Size 1, brightest color, no wrapping, cursor at the top left corner.
    pub const fn new() -> Self {
        TextContext {
            cursor_x: 0,
            cursor_y: 0,
            size: 1,
            color: MAX_LEVEL,
            wrap: false,
        }
    }

    /// Set the magnification of printed text. Sizes outside 1-4 are ignored.
    pub fn set_text_size(&mut self, size: u8) {
        if (1..=4).contains(&size) {
            self.size = size;
        }
    }

    pub fn text_size(&self) -> u8 {
        self.size
    }

    /// Set the grayscale level of printed text, masked to 2 bits.
    pub fn set_text_color(&mut self, color: u8) {
        self.color = color & MAX_LEVEL;
    }

    pub fn text_color(&self) -> u8 {
        self.color
    }

    /// Whether printing moves to the next line before a character that would cross the right
    /// edge of the panel.
    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn text_wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// The cursor as `(x, y)`.
    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor_x, self.cursor_y)
    }

    fn char_width(&self) -> i32 {
        GLYPH_WIDTH * i32::from(self.size)
    }

    fn advance(&self) -> i32 {
        self.char_width() + i32::from(self.size)
    }

    fn line_height(&self) -> i32 {
        GLYPH_HEIGHT * i32::from(self.size) + i32::from(self.size)
    }

    /// Print `c` at the cursor and advance it. A newline moves the cursor to column 0 of the
    /// next line. Characters whose origin is right of or below the panel are not drawn, but the
    /// cursor still advances.
    pub fn print_char(&mut self, fb: &mut FrameBuffer, c: char) {
        if c == '\n' {
            self.cursor_x = 0;
            self.cursor_y = self.cursor_y.saturating_add(self.line_height());
            return;
        }
        if self.wrap && self.cursor_x.saturating_add(self.char_width()) >= WIDTH {
            self.cursor_x = 0;
            self.cursor_y = self.cursor_y.saturating_add(self.line_height());
        }
        if self.cursor_x < WIDTH && self.cursor_y < HEIGHT {
            fb.draw_char_scaled(self.cursor_x, self.cursor_y, c, self.size, self.color);
        }
        self.cursor_x = self.cursor_x.saturating_add(self.advance());
    }

    /// Print every byte of `s` with `print_char`.
    pub fn print_str(&mut self, fb: &mut FrameBuffer, s: &str) {
        for b in s.bytes() {
            self.print_char(fb, char::from(b));
        }
    }

    /// Draw `s` in the current style starting at `(x, y)`, without touching the cursor. Newlines
    /// and wrapping return to column `x`. Drawing stops as soon as a new line would start at or
    /// below the bottom of the panel.
    pub fn draw_string(&self, fb: &mut FrameBuffer, x: i32, y: i32, s: &str) {
        let (mut cx, mut cy) = (x, y);
        for b in s.bytes() {
            if b == b'\n' {
                cx = x;
                cy = cy.saturating_add(self.line_height());
                if cy >= HEIGHT {
                    break;
                }
                continue;
            }
            if self.wrap && cx.saturating_add(self.char_width()) >= WIDTH {
                cx = x;
                cy = cy.saturating_add(self.line_height());
                if cy >= HEIGHT {
                    break;
                }
            }
            if cx < WIDTH && cy < HEIGHT {
                fb.draw_char_scaled(cx, cy, char::from(b), self.size, self.color);
            }
            cx = cx.saturating_add(self.advance());
        }
    }

    /// A `core::fmt::Write` sink printing into `fb` at this context's cursor.
    pub fn printer<'a>(&'a mut self, fb: &'a mut FrameBuffer) -> Printer<'a> {
        Printer { fb, ctx: self }
    }
}

/// Prints formatted text through a `TextContext`, e.g. `write!(ctx.printer(&mut fb), "{}", n)`.
pub struct Printer<'a> {
    fb: &'a mut FrameBuffer,
    ctx: &'a mut TextContext,
}

impl<'a> fmt::Write for Printer<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.ctx.print_str(self.fb, s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    /// Columns containing at least one lit pixel in row band `[y, y + h)`.
    fn lit_columns(fb: &FrameBuffer, y: i32, h: i32) -> std::vec::Vec<i32> {
        (0..WIDTH)
            .filter(|&x| (y..y + h).any(|r| fb.pixel(x, r).unwrap_or(0) != 0))
            .collect()
    }

    fn snapshot(fb: &FrameBuffer) -> [[u8; 128]; 64] {
        *fb.rows()
    }

    #[test]
    fn draw_char_overwrites_cell() {
        let mut fb = FrameBuffer::new();
        for (x, y) in iproduct!(0..6, 0..8) {
            fb.set_pixel(x, y, 1);
        }
        fb.draw_char(0, 0, 'I');
        // 'I' is [0x00, 0x41, 0x7F, 0x41, 0x00, 0x00].
        assert_eq!(fb.pixel(0, 0), Some(0));
        assert_eq!(fb.pixel(1, 0), Some(3));
        assert_eq!(fb.pixel(1, 1), Some(0));
        assert_eq!(fb.pixel(1, 6), Some(3));
        assert_eq!(fb.pixel(2, 3), Some(3));
        assert_eq!(fb.pixel(2, 7), Some(0));
        assert_eq!(fb.pixel(5, 4), Some(0));
        // Outside the cell is untouched.
        fb.set_pixel(6, 0, 2);
        fb.draw_char(0, 0, 'I');
        assert_eq!(fb.pixel(6, 0), Some(2));
    }

    #[test]
    fn invalid_codes_leave_buffer_unchanged() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(2, 2, 2);
        let before = snapshot(&fb);
        for c in ['\u{0}', '\u{1F}', '\u{80}', '\u{FF}', 'ü'].iter() {
            fb.draw_char(0, 0, *c);
            fb.draw_char_scaled(0, 0, *c, 2, 3);
        }
        assert_eq!(snapshot(&fb), before);
    }

    #[test]
    fn partial_glyph_is_clipped() {
        let mut fb = FrameBuffer::new();
        fb.draw_char(-2, -1, 'H');
        // 'H' column 2 is 0x08: only row 3 set, which lands at (0, 2).
        assert_eq!(fb.pixel(0, 2), Some(3));
        assert_eq!(fb.pixel(0, 3), Some(0));
        // Column 4 (0x7F) lands at x = 2.
        assert!((0..6).all(|y| fb.pixel(2, y) == Some(3)));
        assert_eq!(fb.pixel(2, 6), Some(0));

        let mut fb = FrameBuffer::new();
        fb.draw_char(125, 60, 'H');
        assert!((60..64).all(|y| fb.pixel(125, y) == Some(3)));
    }

    #[test]
    fn scaled_draw_keeps_background() {
        let mut fb = FrameBuffer::new();
        for (x, y) in iproduct!(0..12, 0..16) {
            fb.set_pixel(x, y, 1);
        }
        fb.draw_char_scaled(0, 0, 'I', 2, 2);
        // Column 0 of 'I' is empty: background stays.
        assert_eq!(fb.pixel(0, 0), Some(1));
        assert_eq!(fb.pixel(1, 15), Some(1));
        // Column 1 bit 0 is set: a 2x2 block at (2..4, 0..2).
        for (x, y) in iproduct!(2..4, 0..2) {
            assert_eq!(fb.pixel(x, y), Some(2));
        }
        // Column 1 bit 1 is clear: background stays.
        assert_eq!(fb.pixel(2, 2), Some(1));
        // Column 2 is fully set for rows 0..7, i.e. pixel rows 0..14.
        assert!((0..14).all(|y| fb.pixel(4, y) == Some(2)));
        assert_eq!(fb.pixel(4, 14), Some(1));
    }

    #[test]
    fn scaled_size_zero_draws_nothing() {
        let mut fb = FrameBuffer::new();
        fb.draw_char_scaled(10, 10, 'W', 0, 3);
        assert!(lit_columns(&fb, 0, HEIGHT).is_empty());
    }

    #[test]
    fn glyphs_near_i32_max_are_clipped() {
        let mut fb = FrameBuffer::new();
        fb.draw_char(i32::max_value(), 0, 'A');
        fb.draw_char(0, i32::max_value() - 3, 'A');
        fb.draw_char_scaled(0, i32::max_value() - 2, 'A', 2, 3);
        fb.draw_char_scaled(i32::max_value(), 10, 'W', 4, 3);
        fb.draw_string_at_offset("AB", i32::max_value(), 0);
        assert_eq!(snapshot(&fb), [[0; 128]; 64]);
    }

    #[test]
    fn centered_two_chars() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0, 3);
        fb.draw_string_centered("AB");
        // Cleared first.
        assert_eq!(fb.pixel(0, 0), Some(0));
        // 'A' occupies columns 57..=61 and 'B' 64..=68, on rows 28..36.
        let cols = lit_columns(&fb, CENTER_ROW, GLYPH_HEIGHT);
        assert_eq!(cols, vec![57, 58, 59, 60, 61, 64, 65, 66, 67, 68]);
        assert!(lit_columns(&fb, 0, CENTER_ROW).is_empty());
        assert!(lit_columns(&fb, CENTER_ROW + GLYPH_HEIGHT, 64).is_empty());
    }

    #[test]
    fn centered_overlong_line_starts_left_of_panel() {
        let mut fb = FrameBuffer::new();
        let s = "ABCDEFGHIJKLMNOPQRSTU"; // 21 chars, 146 px wide
        fb.draw_string_centered(s);
        // x0 = (128 - 146) / 2 = -9: 'B' starts at column -2, so its column 2 lands at 0.
        // 'B' column 2 is 0x49.
        assert_eq!(fb.pixel(0, CENTER_ROW), Some(3));
        assert_eq!(fb.pixel(0, CENTER_ROW + 1), Some(0));
    }

    #[test]
    fn line_centered_does_not_clear() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0, 2);
        fb.draw_line_centered("AB", 10);
        assert_eq!(fb.pixel(0, 0), Some(2));
        // total width 2 * 6 + 3 = 15, x0 = 56.
        let cols = lit_columns(&fb, 10, GLYPH_HEIGHT);
        assert_eq!(cols, vec![56, 57, 58, 59, 60, 63, 64, 65, 66, 67]);

        let mut fb = FrameBuffer::new();
        fb.draw_line_centered("ABCDEFGHIJKLMNOPQRSTU", 0);
        assert_eq!(lit_columns(&fb, 0, 8)[0], 0);
    }

    #[test]
    fn at_offset_clears_band_only() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(100, 4, 3);
        fb.set_pixel(100, 3, 3);
        fb.set_pixel(100, 12, 3);
        fb.draw_string_at_offset("A", 4, 0);
        assert_eq!(fb.pixel(100, 4), Some(0));
        assert_eq!(fb.pixel(100, 3), Some(3));
        assert_eq!(fb.pixel(100, 12), Some(3));
        assert_eq!(lit_columns(&fb, 4, 8), vec![0, 1, 2, 3, 4]);

        fb.draw_string_at_offset("AB", 4, 3);
        // 'A' starts at -3, 'B' at 4.
        assert_eq!(lit_columns(&fb, 4, 8), vec![0, 1, 4, 5, 6, 7, 8]);

        fb.draw_string_at_offset("A", 4, -10);
        assert_eq!(lit_columns(&fb, 4, 8), vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn text_context_defaults_and_setters() {
        let mut ctx = TextContext::default();
        assert_eq!(ctx.text_size(), 1);
        assert_eq!(ctx.text_color(), 3);
        assert!(!ctx.text_wrap());
        assert_eq!(ctx.cursor(), (0, 0));

        ctx.set_text_size(4);
        ctx.set_text_size(0);
        ctx.set_text_size(5);
        assert_eq!(ctx.text_size(), 4);
        ctx.set_text_color(6);
        assert_eq!(ctx.text_color(), 2);
        ctx.set_text_wrap(true);
        assert!(ctx.text_wrap());
        ctx.set_cursor(-3, 70);
        assert_eq!(ctx.cursor(), (-3, 70));
    }

    #[test]
    fn print_advances_cursor() {
        let mut fb = FrameBuffer::new();
        let mut ctx = TextContext::new();
        ctx.print_str(&mut fb, "ab");
        assert_eq!(ctx.cursor(), (14, 0));
        ctx.set_text_size(2);
        ctx.print_char(&mut fb, 'c');
        assert_eq!(ctx.cursor(), (28, 0));
        ctx.print_char(&mut fb, '\n');
        assert_eq!(ctx.cursor(), (0, 18));
    }

    #[test]
    fn print_without_wrap_runs_off_the_edge() {
        let mut fb = FrameBuffer::new();
        let mut ctx = TextContext::new();
        ctx.set_cursor(126, 0);
        ctx.print_char(&mut fb, 'H');
        // Clipped rather than skipped: column 0 of 'H' lands at 126.
        assert_eq!(fb.pixel(126, 0), Some(3));
        assert_eq!(ctx.cursor(), (133, 0));
        // Origin past the right edge: not drawn, still advances.
        ctx.print_char(&mut fb, 'H');
        assert_eq!(ctx.cursor(), (140, 0));
    }

    #[test]
    fn print_wraps_before_drawing() {
        let mut fb = FrameBuffer::new();
        let mut ctx = TextContext::new();
        ctx.set_text_wrap(true);
        ctx.set_cursor(126, 0);
        ctx.print_str(&mut fb, "H");
        assert!(lit_columns(&fb, 0, 8).is_empty());
        assert_eq!(lit_columns(&fb, 9, 8), vec![0, 1, 2, 3, 4]);
        assert_eq!(ctx.cursor(), (7, 9));
    }

    #[test]
    fn print_below_panel_is_skipped() {
        let mut fb = FrameBuffer::new();
        let mut ctx = TextContext::new();
        ctx.set_cursor(0, 64);
        ctx.print_str(&mut fb, "HH");
        assert!(lit_columns(&fb, 0, HEIGHT).is_empty());
        assert_eq!(ctx.cursor(), (14, 64));
    }

    #[test]
    fn draw_string_uses_origin_and_stops_below_panel() {
        let mut fb = FrameBuffer::new();
        let mut ctx = TextContext::new();
        ctx.set_text_color(1);
        ctx.set_cursor(5, 5);
        ctx.draw_string(&mut fb, 20, 50, "H\nH\nH");
        // Cursor is untouched.
        assert_eq!(ctx.cursor(), (5, 5));
        // First line at row 50, second at 59 (clipped), third would start at 68.
        assert_eq!(fb.pixel(20, 50), Some(1));
        assert_eq!(fb.pixel(20, 59), Some(1));
        assert_eq!(lit_columns(&fb, 50, 14), vec![20, 21, 22, 23, 24]);

        let mut fb = FrameBuffer::new();
        ctx.set_text_wrap(true);
        ctx.draw_string(&mut fb, 100, 0, "HHHHH");
        // Origins 100, 107, 114 and 121 fit; 128 + 6 >= 128 wraps back to column 100 on row 9.
        let row0 = lit_columns(&fb, 0, 8);
        assert_eq!(row0.len(), 20);
        assert_eq!(row0[0], 100);
        assert_eq!(row0[19], 125);
        assert_eq!(lit_columns(&fb, 9, 8), vec![100, 101, 102, 103, 104]);
    }

    #[test]
    fn printer_formats_into_buffer() {
        let mut fb = FrameBuffer::new();
        let mut ctx = TextContext::new();
        write!(ctx.printer(&mut fb), "{}-{}", 1, 2).unwrap();
        assert_eq!(ctx.cursor(), (21, 0));
        // '1' column 2 is 0x7F.
        assert_eq!(fb.pixel(2, 0), Some(3));
        // '-' is row 3 only.
        assert_eq!(fb.pixel(7, 3), Some(3));
        assert_eq!(fb.pixel(7, 2), Some(0));
    }
}
