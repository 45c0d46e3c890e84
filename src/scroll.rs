//! A single line of text that scrolls back and forth when it is wider than the panel.

use core::fmt::{self, Write};

use heapless::String;
use log::trace;

use crate::font::GLYPH_ADVANCE;
use crate::framebuffer::{FrameBuffer, WIDTH};

/// Maximum number of bytes of text a `ScrollLine` keeps.
pub const SCROLL_TEXT_CAPACITY: usize = 63;

/// Appends to a fixed capacity string. The first character that does not fit ends the text:
/// it and everything written after it are dropped.
struct Truncating<'a> {
    buf: &'a mut String<SCROLL_TEXT_CAPACITY>,
    full: bool,
}

impl<'a> Truncating<'a> {
    fn new(buf: &'a mut String<SCROLL_TEXT_CAPACITY>) -> Self {
        Truncating { buf, full: false }
    }
}

impl<'a> Write for Truncating<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.full {
                break;
            }
            self.full = self.buf.push(c).is_err();
        }
        Ok(())
    }
}

/// An animated text row. Each `tick` redraws the row: a line that fits on the panel is drawn
/// centered and never moves, a wider one sweeps left and right one pixel per tick, reversing at
/// either end.
#[derive(Clone, Debug)]
pub struct ScrollLine {
    text: String<SCROLL_TEXT_CAPACITY>,
    pixel_width: i32,
    offset: i32,
    direction: i32,
    y: i32,
}

impl ScrollLine {
    /// A line showing `text` with its top edge at row `y`. Text beyond `SCROLL_TEXT_CAPACITY`
    /// bytes is dropped.
    pub fn new(text: &str, y: i32) -> Self {
        let mut buf = String::new();
        // Truncating never fails.
        let _ = Truncating::new(&mut buf).write_str(text);
        Self::with_text(buf, y)
    }

    /// A line showing formatted text, e.g. `ScrollLine::from_fmt(format_args!("{} C", t), 0)`.
    pub fn from_fmt(args: fmt::Arguments, y: i32) -> Self {
        let mut buf = String::new();
        let _ = Truncating::new(&mut buf).write_fmt(args);
        Self::with_text(buf, y)
    }

    fn with_text(text: String<SCROLL_TEXT_CAPACITY>, y: i32) -> Self {
        let pixel_width = text.len() as i32 * GLYPH_ADVANCE - 1;
        ScrollLine {
            text,
            pixel_width,
            offset: 0,
            direction: 1,
            y,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Width of the rendered text in pixels, not counting the gap after the last character.
    pub fn pixel_width(&self) -> i32 {
        self.pixel_width
    }

    /// Offset the next `tick` draws at, for a line wider than the panel.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// +1 while sweeping towards the end of the text, -1 while sweeping back.
    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Redraw the line into `fb` and advance the animation by one step.
    pub fn tick(&mut self, fb: &mut FrameBuffer) {
        if self.pixel_width <= WIDTH {
            let pad = (WIDTH - self.pixel_width) / 2;
            fb.draw_string_at_offset(&self.text, self.y, -pad);
            return;
        }
        trace!("scroll line at row {} offset {}", self.y, self.offset);
        fb.draw_string_at_offset(&self.text, self.y, self.offset);
        self.offset += self.direction;
        // Both ends are checked on every step.
        if self.offset + WIDTH >= self.pixel_width {
            self.direction = -1;
        }
        if self.offset <= 0 {
            self.direction = 1;
        }
    }
}
