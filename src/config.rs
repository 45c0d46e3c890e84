//! Defines structs for storing register values sent to the SSD1322 during initialization, and the
//! policy for retrying failed transfers.

use crate::command::*;

/// Number of registers written by the initialization sequence, between powering the panel off
/// and powering it back on.
pub const INIT_SEQUENCE_LEN: usize = 19;

/// How often a failed transfer is attempted before the failure is reported to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts per transfer, including the first. Zero is treated as one.
    pub attempts: u8,
    /// Pause between two attempts, in milliseconds.
    pub delay_ms: u16,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            delay_ms: 1,
        }
    }
}

/// A configuration for the display. The initialization sequence always writes the same registers
/// in the same order; builder methods only change the values written. The defaults are the
/// values for a 128x64 NHD-2.7-12864 style module.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    clock_fosc_divset_cmd: Command,
    mux_ratio_cmd: Command,
    display_offset_cmd: Command,
    function_selection_cmd: Command,
    start_line_cmd: Command,
    remapping_cmd: Command,
    master_contrast_cmd: Command,
    contrast_current_cmd: Command,
    phase_lengths_cmd: Command,
    precharge_voltage_cmd: Command,
    display_enhancements_cmd: Command,
    com_deselect_voltage_cmd: Command,
    display_enhancement_b_cmd: Command,
    gpio_cmd: Command,
    second_precharge_period_cmd: Command,
    pub(crate) retry: RetryPolicy,
    pub(crate) reset_hold_ms: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config::new(ComScanDirection::RowZeroLast, ComLayout::DualProgressive)
    }
}

impl Config {
    /// Create a new configuration. COM scan direction and COM layout are mandatory because the
    /// display will not function correctly unless they are set, so they must be provided in the
    /// constructor. All other values start at the module defaults and can be changed by calling
    /// the provided builder methods on `Config`.
    pub fn new(com_scan_direction: ComScanDirection, com_layout: ComLayout) -> Self {
        Config {
            clock_fosc_divset_cmd: Command::SetClockFoscDivset(9, 1),
            mux_ratio_cmd: Command::SetMuxRatio(64),
            display_offset_cmd: Command::SetDisplayOffset(0),
            function_selection_cmd: Command::SetFunctionSelection(true),
            start_line_cmd: Command::SetStartLine(0),
            // Framebuffer bytes arrive left to right, two per column, so the column address and
            // the nibbles within it are both remapped to keep the image upright.
            remapping_cmd: Command::SetRemapping(
                IncrementAxis::Horizontal,
                ColumnRemap::Reverse,
                NibbleRemap::Forward,
                com_scan_direction,
                com_layout,
            ),
            master_contrast_cmd: Command::SetMasterContrast(15),
            contrast_current_cmd: Command::SetContrastCurrent(0x9F),
            phase_lengths_cmd: Command::SetPhaseLengths(5, 7),
            precharge_voltage_cmd: Command::SetPreChargeVoltage(31),
            display_enhancements_cmd: Command::SetDisplayEnhancements(true, true),
            com_deselect_voltage_cmd: Command::SetComDeselectVoltage(4),
            display_enhancement_b_cmd: Command::SetDisplayEnhancementB(0xA2),
            gpio_cmd: Command::SetGpio(0),
            second_precharge_period_cmd: Command::SetSecondPrechargePeriod(8),
            retry: RetryPolicy::default(),
            reset_hold_ms: 150,
        }
    }

    /// Extend this `Config` to explicitly configure display contrast current. See
    /// `Command::SetContrastCurrent`.
    pub fn contrast_current(self, current: u8) -> Self {
        Self {
            contrast_current_cmd: Command::SetContrastCurrent(current),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the master contrast. See
    /// `Command::SetMasterContrast`.
    pub fn master_contrast(self, contrast: u8) -> Self {
        Self {
            master_contrast_cmd: Command::SetMasterContrast(contrast),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure OLED drive phase lengths. See
    /// `Command::SetPhaseLengths`.
    pub fn phase_lengths(self, reset: u8, first_precharge: u8) -> Self {
        Self {
            phase_lengths_cmd: Command::SetPhaseLengths(reset, first_precharge),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the display clock frequency and divider. See
    /// `Command::SetClockFoscDivset`.
    pub fn clock_fosc_divset(self, fosc: u8, divset: u8) -> Self {
        Self {
            clock_fosc_divset_cmd: Command::SetClockFoscDivset(fosc, divset),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure display enhancement features. See
    /// `Command::SetDisplayEnhancements`.
    pub fn display_enhancements(self, external_vsl: bool, enhanced_low_gs_quality: bool) -> Self {
        Self {
            display_enhancements_cmd: Command::SetDisplayEnhancements(
                external_vsl,
                enhanced_low_gs_quality,
            ),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure OLED drive second precharge period length. See
    /// `Command::SetSecondPrechargePeriod`.
    pub fn second_precharge_period(self, period: u8) -> Self {
        Self {
            second_precharge_period_cmd: Command::SetSecondPrechargePeriod(period),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure OLED drive precharge voltage. See
    /// `Command::SetPreChargeVoltage`.
    pub fn precharge_voltage(self, voltage: u8) -> Self {
        Self {
            precharge_voltage_cmd: Command::SetPreChargeVoltage(voltage),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure OLED drive COM deselect voltage. See
    /// `Command::SetComDeselectVoltage`.
    pub fn com_deselect_voltage(self, voltage: u8) -> Self {
        Self {
            com_deselect_voltage_cmd: Command::SetComDeselectVoltage(voltage),
            ..self
        }
    }

    /// Select the internal or an external VDD regulator. See `Command::SetFunctionSelection`.
    pub fn internal_vdd(self, internal: bool) -> Self {
        Self {
            function_selection_cmd: Command::SetFunctionSelection(internal),
            ..self
        }
    }

    /// Change how failed transfers are retried.
    pub fn retry_policy(self, retry: RetryPolicy) -> Self {
        Self { retry, ..self }
    }

    /// Change how long the reset line is held low, and then high, during `init`.
    pub fn reset_hold_ms(self, reset_hold_ms: u16) -> Self {
        Self {
            reset_hold_ms,
            ..self
        }
    }

    /// The registers written by `Controller::init`, in the order they are sent. The order is
    /// fixed: the remapping and addressing must be configured before display RAM is written.
    pub fn init_sequence(&self) -> [Command; INIT_SEQUENCE_LEN] {
        [
            Command::SetCommandLock(false),
            self.clock_fosc_divset_cmd,
            self.mux_ratio_cmd,
            self.display_offset_cmd,
            self.function_selection_cmd,
            self.start_line_cmd,
            self.remapping_cmd,
            self.master_contrast_cmd,
            self.contrast_current_cmd,
            self.phase_lengths_cmd,
            self.precharge_voltage_cmd,
            self.display_enhancements_cmd,
            self.com_deselect_voltage_cmd,
            Command::SetDisplayMode(DisplayMode::Normal),
            Command::DisablePartialDisplay,
            self.display_enhancement_b_cmd,
            self.gpio_cmd,
            Command::SetDefaultGrayScaleTable,
            self.second_precharge_period_cmd,
        ]
    }

    /// The contrast current the sequence configures.
    pub(crate) fn contrast_current_value(&self) -> u8 {
        match self.contrast_current_cmd {
            Command::SetContrastCurrent(c) => c,
            _ => 0x9F,
        }
    }
}
