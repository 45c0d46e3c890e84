//! The command set for the SSD1322.
//!
//! Note 1: The display RAM of the SSD1322 is addressed in columns, where each column is 4 adjacent
//! pixels (segments) in the row, and each pixel is 4 bits/16 levels of intensity, so each column
//! address also refers to two adjacent bytes. The 128x64 panels this crate drives are written as
//! 256 bytes per row, two bytes per logical framebuffer column.

pub mod consts {
    //! Geometry of the panel and ranges of the controller address registers.

    /// Width of the panel in logical pixels.
    pub const PIXEL_COLS: usize = 128;
    /// Height of the panel in logical pixels.
    pub const PIXEL_ROWS: usize = 64;
    /// Display RAM bytes written per panel row. Every logical column drives two bytes.
    pub const RAM_BYTES_PER_ROW: usize = PIXEL_COLS * 2;
    /// Largest value accepted by the column address register (7 bits).
    pub const COLUMN_ADDR_MAX: u8 = 0x7F;
    /// Largest row address of the 128 rows of display RAM.
    pub const ROW_ADDR_MAX: u8 = 0x7F;
    /// Number of rows of display RAM.
    pub const NUM_RAM_ROWS: u8 = 128;
}

use self::consts::*;

/// The address increment orientation when writing image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncrementAxis {
    /// The column address will increment as image data is written, writing pairs of bytes
    /// (horizontal groups of 4 pixels) from left to right in the range set by `SetColumnAddress`
    /// command, and then top to bottom in the range set by `SetRowAddress` command.
    Horizontal,
    /// The row address will increment as image data is written, writing pairs of bytes
    /// (*horizontal* groups of 4 pixels) from top to bottom in the range set by `SetRowAddress`
    /// command, and then left to right in the range set by `SetColumnAddress` command.
    Vertical,
}

/// Setting of column address remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRemap {
    /// Column addresses 0->119 map to segments 0,1,2,3->476,477,478,479.
    Forward,
    /// Column addresses 0->119 map to segments 476,477,478,479->0,1,2,3. Note that the pixels
    /// within each column number in the same order; `NibbleRemap` controls the order of mapping
    /// pixels to nibbles within each column.
    Reverse,
}

/// Setting of data nibble remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NibbleRemap {
    /// 2-byte sequence 0xABCD maps (in L->R order) to pixels 3,2,1,0.
    Reverse,
    /// 2-byte sequence 0xABCD maps (in L->R order) to pixels 0,1,2,3.
    Forward,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM lines scan row addresses top to bottom, so that row address 0 is the first row of the
    /// display.
    RowZeroFirst,
    /// COM lines scan row addresses bottom to top, so that row address 0 is the last row of the
    /// display.
    RowZeroLast,
}

/// Setting the layout of the COM lines to the display rows. This setting is dictated by how the
/// display module itself wires the OLED matrix to the driver chip, and changing it to anything
/// other than the correct setting for your module will yield a corrupted image. See the display
/// module datasheet for the correct value to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComLayout {
    /// COM lines are connected to display rows in a progressive arrangement, so that COM lines
    /// 0->127 map to display rows 0->127.
    Progressive,
    /// COM lines are connected to display rows in an interlaced arrangement, so that COM lines
    /// 0->63 map to *even* display rows 0->126, and COM lines 64->127 map to *odd* display rows
    /// 1->127.
    Interlaced,
    /// COM lines are connected to display rows in a dual-COM progressive arrangement, so that COM
    /// lines 0->63 map to display rows 0->63 for half of the columns, and COM lines 64->127 map to
    /// display rows 0->63 for the other half.
    DualProgressive,
}

/// Setting of the display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// Entire display off: all pixels at grayscale level 0 regardless of display RAM.
    BlankDark,
    /// Entire display on: all pixels at grayscale level 15 regardless of display RAM.
    BlankBright,
    /// The display operates normally, showing the image in the display RAM.
    Normal,
    /// The display operates with inverse brightness, showing the image in the display RAM with the
    /// grayscale levels inverted (level 0->15, 1->14, ..., 15->0).
    Inverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set the column start and end address range when writing to the display RAM. The column
    /// address pointer is reset to the start column address such that `WriteRam` will begin
    /// writing there. Range is 0-127. (Note 1)
    SetColumnAddress(u8, u8),
    /// Set the row start and end address range when writing to the display RAM. The row address
    /// pointer is reset to the start row address such that `WriteRam` will begin writing there.
    /// Range is 0-127.
    SetRowAddress(u8, u8),
    /// Put the controller in RAM write mode. Data bytes sent afterwards land in display RAM at the
    /// window set by `SetColumnAddress` and `SetRowAddress`.
    WriteRam,
    /// Set the direction of display address increment, column address remapping, data nibble
    /// remapping, COM scan direction, and COM line layout. See documentation for each enum for
    /// details.
    SetRemapping(
        IncrementAxis,
        ColumnRemap,
        NibbleRemap,
        ComScanDirection,
        ComLayout,
    ),
    /// Set the display start line. Setting this to e.g. 40 will cause the first row of pixels on
    /// the display to display row 40 or the display RAM, and rows 0-39 of the display RAM will be
    /// wrapped to the bottom, "rolling" the displayed image upwards. Range is 0-127.
    SetStartLine(u8),
    /// Set the display COM line offset. This has a similar effect to `SetStartLine`, except that
    /// it is applied *after* the MUX ratio setting. Range is 0-127.
    SetDisplayOffset(u8),
    /// Set the display operating mode. See enum for details.
    SetDisplayMode(DisplayMode),
    /// Disable partial display mode.
    DisablePartialDisplay,
    /// Select the internal (`true`) or an external (`false`) VDD regulator.
    SetFunctionSelection(bool),
    /// Control sleep mode. Sleep turns the panel off; display RAM is retained.
    SetSleepMode(bool),
    /// Set the refresh phase lengths. The first phase (reset) can be set from 5-31 DCLKs, and the
    /// second (first pre-charge) can be set from 3-15 DCLKs. The display module datasheet should
    /// have appropriate values.
    SetPhaseLengths(u8, u8),
    /// Set the oscillator frequency Fosc and the display clock divider. Fosc is a setting from
    /// 0-15, higher values increasing the frequency. The divider DIVSET is a value n from 0-10,
    /// where DCLK is produced by dividing Fosc by 2^n.
    SetClockFoscDivset(u8, u8),
    /// Enable or disable display enhancements "external VSL" and "Enhanced low GS display
    /// quality".
    SetDisplayEnhancements(bool, bool),
    /// Set the GPIO0/GPIO1 pin modes. Range 0-15.
    SetGpio(u8),
    /// Set the second pre-charge period. Range 0-15 DCLKs.
    SetSecondPrechargePeriod(u8),
    /// Set the gray scale gamma table to the factory default.
    SetDefaultGrayScaleTable,
    /// Set the pre-charge voltage level, from 0.2*Vcc to 0.6*Vcc. Range 0-31.
    SetPreChargeVoltage(u8),
    /// Set the COM deselect voltage level, from 0.72*Vcc to 0.86*Vcc. Range 0-7.
    SetComDeselectVoltage(u8),
    /// Set the contrast current. Range 0-255.
    SetContrastCurrent(u8),
    /// Set the master contrast control, uniformly reducing all grayscale levels by 0-15
    /// sixteenths. Range 0 (maximum dimming) to 15 (normal contrast).
    SetMasterContrast(u8),
    /// Set the MUX ratio, which controls the number of COM lines that are active and thus the
    /// number of display pixel rows which are active. Range 16-128.
    SetMuxRatio(u8),
    /// Set display enhancement B. The argument is the first data byte; the second is fixed at
    /// 0x20 by the datasheet.
    SetDisplayEnhancementB(u8),
    /// Set whether the command lock is enabled or disabled. Enabling the command lock blocks all
    /// commands except `SetCommandLock`.
    SetCommandLock(bool),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        Ok(($cmd, &$buf[..2]))
    }};
}

impl Command {
    /// Validate the arguments and produce the opcode and argument bytes, using `arg_buf` as
    /// storage for the arguments. Arguments outside the controller's accepted range give
    /// `Err(())`.
    pub fn encode(self, arg_buf: &mut [u8; 2]) -> Result<(u8, &[u8]), ()> {
        match self {
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=COLUMN_ADDR_MAX, 0..=COLUMN_ADDR_MAX) => {
                    ok_command!(arg_buf, 0x15, [start, end])
                }
                _ => Err(()),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (0..=ROW_ADDR_MAX, 0..=ROW_ADDR_MAX) => ok_command!(arg_buf, 0x75, [start, end]),
                _ => Err(()),
            },
            Command::WriteRam => ok_command!(arg_buf, 0x5C, []),
            Command::SetRemapping(
                increment_axis,
                column_remap,
                nibble_remap,
                com_scan_direction,
                com_layout,
            ) => {
                let ia = match increment_axis {
                    IncrementAxis::Horizontal => 0x00,
                    IncrementAxis::Vertical => 0x01,
                };
                let cr = match column_remap {
                    ColumnRemap::Forward => 0x00,
                    ColumnRemap::Reverse => 0x02,
                };
                let nr = match nibble_remap {
                    NibbleRemap::Reverse => 0x00,
                    NibbleRemap::Forward => 0x04,
                };
                let csd = match com_scan_direction {
                    ComScanDirection::RowZeroFirst => 0x00,
                    ComScanDirection::RowZeroLast => 0x10,
                };
                let (interlace, dual_com) = match com_layout {
                    ComLayout::Progressive => (0x00, 0x01),
                    ComLayout::Interlaced => (0x20, 0x01),
                    ComLayout::DualProgressive => (0x00, 0x11),
                };
                ok_command!(arg_buf, 0xA0, [ia | cr | nr | csd | interlace, dual_com])
            }
            Command::SetStartLine(line) => match line {
                0..=ROW_ADDR_MAX => ok_command!(arg_buf, 0xA1, [line]),
                _ => Err(()),
            },
            Command::SetDisplayOffset(line) => match line {
                0..=ROW_ADDR_MAX => ok_command!(arg_buf, 0xA2, [line]),
                _ => Err(()),
            },
            Command::SetDisplayMode(mode) => ok_command!(
                arg_buf,
                match mode {
                    DisplayMode::BlankDark => 0xA4,
                    DisplayMode::BlankBright => 0xA5,
                    DisplayMode::Normal => 0xA6,
                    DisplayMode::Inverse => 0xA7,
                },
                []
            ),
            Command::DisablePartialDisplay => ok_command!(arg_buf, 0xA9, []),
            Command::SetFunctionSelection(internal_vdd) => {
                ok_command!(arg_buf, 0xAB, [internal_vdd as u8])
            }
            Command::SetSleepMode(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0xAE,
                    false => 0xAF,
                },
                []
            ),
            Command::SetPhaseLengths(phase_1, phase_2) => match (phase_1, phase_2) {
                (5..=31, 3..=15) => {
                    let p1 = (phase_1 - 1) >> 1;
                    let p2 = 0xF0 & (phase_2 << 4);
                    ok_command!(arg_buf, 0xB1, [p1 | p2])
                }
                _ => Err(()),
            },
            Command::SetClockFoscDivset(fosc, divset) => match (fosc, divset) {
                (0..=15, 0..=10) => ok_command!(arg_buf, 0xB3, [fosc << 4 | divset]),
                _ => Err(()),
            },
            Command::SetDisplayEnhancements(ena_external_vsl, ena_enhanced_low_gs_quality) => {
                let vsl = match ena_external_vsl {
                    true => 0xA0,
                    false => 0xA2,
                };
                let gs = match ena_enhanced_low_gs_quality {
                    true => 0xFD,
                    false => 0xB5,
                };
                ok_command!(arg_buf, 0xB4, [vsl, gs])
            }
            Command::SetGpio(mode) => match mode {
                0..=15 => ok_command!(arg_buf, 0xB5, [mode]),
                _ => Err(()),
            },
            Command::SetSecondPrechargePeriod(period) => match period {
                0..=15 => ok_command!(arg_buf, 0xB6, [period]),
                _ => Err(()),
            },
            Command::SetDefaultGrayScaleTable => ok_command!(arg_buf, 0xB9, []),
            Command::SetPreChargeVoltage(voltage) => match voltage {
                0..=31 => ok_command!(arg_buf, 0xBB, [voltage]),
                _ => Err(()),
            },
            Command::SetComDeselectVoltage(voltage) => match voltage {
                0..=7 => ok_command!(arg_buf, 0xBE, [voltage]),
                _ => Err(()),
            },
            Command::SetContrastCurrent(current) => ok_command!(arg_buf, 0xC1, [current]),
            Command::SetMasterContrast(contrast) => match contrast {
                0..=15 => ok_command!(arg_buf, 0xC7, [contrast]),
                _ => Err(()),
            },
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_RAM_ROWS => ok_command!(arg_buf, 0xCA, [ratio - 1]),
                _ => Err(()),
            },
            Command::SetDisplayEnhancementB(a) => ok_command!(arg_buf, 0xD1, [a, 0x20]),
            Command::SetCommandLock(ena) => {
                let e = match ena {
                    true => 0x16,
                    false => 0x12,
                };
                ok_command!(arg_buf, 0xFD, [e])
            }
        }
    }
}
