//! The protocol layer: framing of commands and data into chip-select transactions, bounded retry
//! of failed transfers, hardware reset, and the initialization and power state of the controller.

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;
use log::{debug, error, trace, warn};

use crate::command::{Command, DisplayMode};
use crate::config::{Config, RetryPolicy};
use crate::display::region::Region;
use crate::error::Error;
use crate::interface::{DataCommand, DisplayInterface};

/// Where the controller is in its bring-up. `init` walks through `Resetting` and `Configuring`
/// and leaves the controller `PoweredOn`; afterwards only the two powered states are entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    /// Not initialized since construction, or the last `init` failed.
    Uninitialized,
    /// The reset line is being pulsed.
    Resetting,
    /// The register sequence is being written.
    Configuring,
    /// Initialized, panel off.
    PoweredOff,
    /// Initialized, panel on.
    PoweredOn,
}

/// Result type of operations on a `Controller` with interface `DI` and reset pin `RST`.
pub type ControllerResult<DI, RST> = Result<
    (),
    Error<<DI as DisplayInterface>::Error, <RST as OutputPin>::Error>,
>;

/// Owns the interface to the SSD1322, its reset line and a delay source.
pub struct Controller<DI, RST, DELAY> {
    iface: DI,
    reset: RST,
    delay: DELAY,
    retry: RetryPolicy,
    reset_hold_ms: u16,
    state: PowerState,
}

impl<DI, RST, DELAY> Controller<DI, RST, DELAY> {
    /// The current power state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Give back the interface, reset pin and delay.
    pub fn release(self) -> (DI, RST, DELAY) {
        (self.iface, self.reset, self.delay)
    }
}

impl<DI, RST, DELAY> Controller<DI, RST, DELAY>
where
    DI: DisplayInterface,
    RST: OutputPin,
    DELAY: DelayMs<u16>,
{
    /// Construct a controller. Nothing is sent until `init`. Only the retry policy and reset
    /// timing are taken from `config` here; the registers are written by `init`.
    pub fn new(iface: DI, reset: RST, delay: DELAY, config: &Config) -> Self {
        Controller {
            iface,
            reset,
            delay,
            retry: config.retry,
            reset_hold_ms: config.reset_hold_ms,
            state: PowerState::Uninitialized,
        }
    }

    /// Write `buf` at D/C level `dc`, retrying according to the retry policy. The error of the
    /// last attempt is returned if all attempts fail.
    fn transmit(&mut self, dc: DataCommand, buf: &[u8]) -> Result<(), DI::Error> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.iface.write(dc, buf) {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= attempts => {
                    error!("transfer of {} bytes failed after {} attempts", buf.len(), attempt);
                    return Err(e);
                }
                Err(_) => {
                    warn!("transfer attempt {} of {} failed, retrying", attempt, attempts);
                    self.delay.delay_ms(self.retry.delay_ms);
                    attempt += 1;
                }
            }
        }
    }

    /// Run `f` with chip select asserted. Chip select is released even if `f` fails.
    fn framed<F>(&mut self, f: F) -> ControllerResult<DI, RST>
    where
        F: FnOnce(&mut Self) -> Result<(), DI::Error>,
    {
        self.iface.set_selected(true).map_err(Error::Interface)?;
        let res = f(self);
        let released = self.iface.set_selected(false);
        res.map_err(Error::Interface)?;
        released.map_err(Error::Interface)
    }

    /// Send one command byte with no arguments, as its own transaction.
    pub fn send_command(&mut self, op: u8) -> ControllerResult<DI, RST> {
        self.framed(|c| c.transmit(DataCommand::Command, &[op]))
    }

    /// Send a command byte followed by its argument bytes at data level, holding chip select for
    /// the whole transaction. The arguments are not sent if the command byte fails.
    pub fn send_command_with_data(&mut self, op: u8, payload: &[u8]) -> ControllerResult<DI, RST> {
        self.framed(|c| {
            c.transmit(DataCommand::Command, &[op])?;
            if payload.is_empty() {
                Ok(())
            } else {
                c.transmit(DataCommand::Data, payload)
            }
        })
    }

    /// Send bytes at data level as their own transaction, e.g. one row of display RAM.
    pub fn send_data(&mut self, payload: &[u8]) -> ControllerResult<DI, RST> {
        self.framed(|c| c.transmit(DataCommand::Data, payload))
    }

    /// Validate and send a typed command.
    pub fn command(&mut self, cmd: Command) -> ControllerResult<DI, RST> {
        let mut arg_buf = [0u8; 2];
        let (op, args) = cmd.encode(&mut arg_buf).map_err(|_| Error::InvalidArgument)?;
        self.send_command_with_data(op, args)
    }

    /// Pulse the reset line low and then high, holding each level for the configured time.
    pub fn reset(&mut self) -> ControllerResult<DI, RST> {
        debug!("resetting controller");
        self.reset.set_low().map_err(Error::ResetPin)?;
        self.delay.delay_ms(self.reset_hold_ms);
        self.reset.set_high().map_err(Error::ResetPin)?;
        self.delay.delay_ms(self.reset_hold_ms);
        Ok(())
    }

    /// Set the display RAM window subsequent RAM writes land in.
    pub fn set_address_window(&mut self, region: Region) -> ControllerResult<DI, RST> {
        trace!("address window {:?}", region);
        self.command(Command::SetColumnAddress(region.col_start, region.col_end))?;
        self.command(Command::SetRowAddress(region.row_start, region.row_end))
    }

    /// Put the controller in RAM write mode.
    pub fn write_ram(&mut self) -> ControllerResult<DI, RST> {
        self.command(Command::WriteRam)
    }

    /// Turn the panel on or off. Only valid once `init` has completed.
    pub fn set_power(&mut self, on: bool) -> ControllerResult<DI, RST> {
        match self.state {
            PowerState::PoweredOn | PowerState::PoweredOff => (),
            _ => return Err(Error::NotInitialized),
        }
        self.command(Command::SetSleepMode(!on))?;
        debug!("panel power {}", if on { "on" } else { "off" });
        self.state = match on {
            true => PowerState::PoweredOn,
            false => PowerState::PoweredOff,
        };
        Ok(())
    }

    /// Force every pixel on (`true`, 0xA5) or every pixel off (`false`, 0xA4). Sending
    /// `Command::SetDisplayMode(DisplayMode::Normal)` shows display RAM again.
    pub fn entire_display(&mut self, on: bool) -> ControllerResult<DI, RST> {
        let mode = match on {
            true => DisplayMode::BlankBright,
            false => DisplayMode::BlankDark,
        };
        self.command(Command::SetDisplayMode(mode))
    }

    /// Reset the controller and write the register sequence of `config`, then turn the panel on.
    ///
    /// There is no rollback. If any transfer fails, the controller is left in an undefined state,
    /// the state goes back to `Uninitialized`, and the error is returned.
    pub fn init(&mut self, config: &Config) -> ControllerResult<DI, RST> {
        self.retry = config.retry;
        self.reset_hold_ms = config.reset_hold_ms;
        let res = self.run_init(config);
        if res.is_err() {
            self.state = PowerState::Uninitialized;
        }
        res
    }

    fn run_init(&mut self, config: &Config) -> ControllerResult<DI, RST> {
        self.state = PowerState::Resetting;
        self.reset()?;
        self.state = PowerState::Configuring;
        self.command(Command::SetSleepMode(true))?;
        for cmd in config.init_sequence().iter() {
            self.command(*cmd)?;
        }
        self.state = PowerState::PoweredOff;
        self.set_power(true)?;
        debug!("controller initialized");
        Ok(())
    }
}
