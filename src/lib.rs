//! Driver library for 128x64 panels built on the Solomon Systech SSD1322 dot matrix OLED
//! controller, with a 2-bit grayscale framebuffer and a fixed 6x8 bitmap font.
//!
//! Drawing operations mutate an in-memory `FrameBuffer`; nothing reaches the panel until
//! `Display::refresh` streams the whole buffer to the controller's display RAM.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;


pub mod bitmap;
pub mod command;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod interface;
pub mod scroll;
pub mod text;

// Re-exports for primary API.
pub use command::{consts, ComLayout, ComScanDirection};
pub use config::{Config, RetryPolicy};
pub use controller::{Controller, PowerState};
pub use display::region::Region;
pub use display::Display;
pub use error::{BitmapError, Error};
pub use framebuffer::FrameBuffer;
pub use interface::spi::SpiInterface;
pub use scroll::ScrollLine;
pub use text::{Printer, TextContext};
