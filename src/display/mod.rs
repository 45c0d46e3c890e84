//! The main API to the display driver. A `Display` owns the controller, the framebuffer drawing
//! operations mutate, and the text context used for cursor based printing.

pub mod region;

use core::fmt;

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;
use log::{debug, trace};

use crate::command::consts::{PIXEL_ROWS, RAM_BYTES_PER_ROW};
use crate::command::Command;
use crate::config::Config;
use crate::controller::{Controller, ControllerResult, PowerState};
use crate::display::region::Region;
use crate::error::{BitmapError, Error};
use crate::framebuffer::{expand_packed_row, expand_row, FrameBuffer, PACKED_ROW_BYTES};
use crate::interface::DisplayInterface;
use crate::text::{Printer, TextContext};

/// A driver for a 128x64 SSD1322 panel.
pub struct Display<DI, RST, DELAY> {
    ctrl: Controller<DI, RST, DELAY>,
    config: Config,
    fb: FrameBuffer,
    text: TextContext,
    contrast: u8,
}

impl<DI, RST, DELAY> Display<DI, RST, DELAY>
where
    DI: DisplayInterface,
    RST: OutputPin,
    DELAY: DelayMs<u16>,
{
    /// Construct a new display driver talking to the controller through `iface`, with `reset`
    /// wired to its reset line. `delay` provides the reset hold times and the pause between
    /// retried transfers. Nothing is sent until `init`.
    pub fn new(iface: DI, reset: RST, delay: DELAY, config: Config) -> Self {
        Display {
            ctrl: Controller::new(iface, reset, delay, &config),
            contrast: config.contrast_current_value(),
            config,
            fb: FrameBuffer::new(),
            text: TextContext::new(),
        }
    }

    /// Reset the controller, write the configured register sequence and turn the panel on. The
    /// framebuffer is not sent; call `refresh` to show it.
    pub fn init(&mut self) -> ControllerResult<DI, RST> {
        self.ctrl.init(&self.config)?;
        self.contrast = self.config.contrast_current_value();
        Ok(())
    }

    /// Stream the whole framebuffer into display RAM.
    pub fn refresh(&mut self) -> ControllerResult<DI, RST> {
        trace!("refresh");
        self.ctrl.set_address_window(Region::FULL)?;
        self.ctrl.write_ram()?;
        let mut line = [0u8; RAM_BYTES_PER_ROW];
        for row in self.fb.rows().iter() {
            expand_row(row, &mut line);
            self.ctrl.send_data(&line)?;
        }
        Ok(())
    }

    /// Write a full panel image straight to display RAM, bypassing the framebuffer, which keeps
    /// its contents. `image` holds 64 rows of 32 bytes, four 2-bit pixels per byte with the
    /// leftmost in the two most significant bits. Bytes past the image are ignored.
    ///
    /// A short `image` is rejected with `Error::Bitmap` before anything is sent.
    pub fn write_image_2bpp(&mut self, image: &[u8]) -> ControllerResult<DI, RST> {
        let needed = PACKED_ROW_BYTES * PIXEL_ROWS;
        if image.len() < needed {
            return Err(Error::Bitmap(BitmapError {
                needed,
                len: image.len(),
            }));
        }
        trace!("write image");
        self.ctrl.set_address_window(Region::FULL)?;
        self.ctrl.write_ram()?;
        let mut line = [0u8; RAM_BYTES_PER_ROW];
        for packed in image[..needed].chunks(PACKED_ROW_BYTES) {
            expand_packed_row(packed, &mut line);
            self.ctrl.send_data(&line)?;
        }
        Ok(())
    }

    /// Set every framebuffer pixel to level 0. Nothing is sent.
    pub fn clear_framebuffer(&mut self) {
        self.fb.clear();
    }

    /// Clear the framebuffer and refresh, blanking the panel.
    pub fn clear_and_refresh(&mut self) -> ControllerResult<DI, RST> {
        self.fb.clear();
        self.refresh()
    }

    /// Replace the whole image with `s` centered on the panel, and refresh.
    pub fn draw_string_centered(&mut self, s: &str) -> ControllerResult<DI, RST> {
        self.fb.draw_string_centered(s);
        self.refresh()
    }

    /// Turn the panel on or off. The framebuffer and display RAM are kept.
    pub fn set_power(&mut self, on: bool) -> ControllerResult<DI, RST> {
        self.ctrl.set_power(on)
    }

    pub fn power_state(&self) -> PowerState {
        self.ctrl.state()
    }

    /// Set the segment drive current. The value is remembered and returned by `contrast`.
    pub fn set_contrast(&mut self, contrast: u8) -> ControllerResult<DI, RST> {
        self.ctrl.command(Command::SetContrastCurrent(contrast))?;
        debug!("contrast {:#04x}", contrast);
        self.contrast = contrast;
        Ok(())
    }

    /// The contrast last set, or configured by `init`.
    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    /// Scale all segment currents by `(contrast + 1) / 16`. Only the low 4 bits are used.
    pub fn set_master_contrast(&mut self, contrast: u8) -> ControllerResult<DI, RST> {
        self.ctrl.command(Command::SetMasterContrast(contrast & 0x0F))
    }

    /// Light every pixel at full brightness regardless of display RAM.
    pub fn entire_display_on(&mut self) -> ControllerResult<DI, RST> {
        self.ctrl.entire_display(true)
    }

    /// Turn every pixel off regardless of display RAM.
    pub fn entire_display_off(&mut self) -> ControllerResult<DI, RST> {
        self.ctrl.entire_display(false)
    }

    /// Print `c` at the text cursor. See `TextContext::print_char`.
    pub fn print_char(&mut self, c: char) {
        self.text.print_char(&mut self.fb, c);
    }

    /// Print `s` at the text cursor. See `TextContext::print_str`.
    pub fn print_str(&mut self, s: &str) {
        self.text.print_str(&mut self.fb, s);
    }

    /// Draw `s` in the current text style starting at `(x, y)`. See `TextContext::draw_string`.
    pub fn draw_string(&mut self, x: i32, y: i32, s: &str) {
        self.text.draw_string(&mut self.fb, x, y, s);
    }

    /// A `core::fmt::Write` sink printing at the text cursor.
    pub fn printer(&mut self) -> Printer<'_> {
        self.text.printer(&mut self.fb)
    }

    /// Print formatted text at the text cursor, e.g. `display.print_fmt(format_args!("{}", n))`.
    pub fn print_fmt(&mut self, args: fmt::Arguments) {
        // The printer itself never fails.
        let _ = fmt::Write::write_fmt(&mut self.printer(), args);
    }
}

impl<DI, RST, DELAY> Display<DI, RST, DELAY> {
    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    pub fn text(&self) -> &TextContext {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextContext {
        &mut self.text
    }

    /// Direct access to the controller, e.g. to send commands not covered by `Display`.
    pub fn controller(&mut self) -> &mut Controller<DI, RST, DELAY> {
        &mut self.ctrl
    }

    /// Give back the interface, reset pin and delay.
    pub fn release(self) -> (DI, RST, DELAY) {
        self.ctrl.release()
    }
}
