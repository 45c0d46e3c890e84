/// Level of the D/C line while bytes are clocked out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataCommand {
    /// Bytes are interpreted as a command opcode.
    Command,
    /// Bytes are interpreted as command arguments or display RAM data.
    Data,
}

/// The byte transport to the controller. Transfers happen between `set_selected(true)` and
/// `set_selected(false)`, so a command and its arguments can be framed as one transaction.
///
/// A `write` may fail transiently (for example a bus timeout); callers retry it.
pub trait DisplayInterface {
    type Error;

    /// Assert (`true`) or release (`false`) chip select.
    fn set_selected(&mut self, selected: bool) -> Result<(), Self::Error>;

    /// Drive the D/C line to `dc` and send `buf`.
    fn write(&mut self, dc: DataCommand, buf: &[u8]) -> Result<(), Self::Error>;
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the driver, such that each word on the
    //! SPI bus is 8 bits. The "3-wire" mode replaces the D/C GPIO with a 9th bit on each word,
    //! which seems really awkward to implement with embedded_hal SPI.

    use hal::blocking::spi::Write;
    use hal::digital::v2::OutputPin;

    use super::{DataCommand, DisplayInterface};

    /// Failure of the SPI interface.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum SpiError<E> {
        /// The SPI master reported an error.
        Spi(E),
        /// The D/C or C/S pin could not be driven.
        Pin,
    }

    pub struct SpiInterface<SPI, DC, CS> {
        /// The SPI master device connected to the SSD1322.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the SSD1322 (the fourth
        /// "wire" of "4-wire" mode).
        dc: DC,
        /// A GPIO output pin connected to the active-low C/S pin of the SSD1322.
        cs: CS,
    }

    impl<SPI, DC, CS> SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: OutputPin,
    {
        /// Create a new SPI interface to communicate with the display driver. `spi` is the SPI
        /// master device, `dc` is the GPIO output pin connected to the D/C pin of the SSD1322, and
        /// `cs` the pin connected to its C/S pin.
        pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
            Self { spi, dc, cs }
        }

        /// Give back the SPI master and pins.
        pub fn release(self) -> (SPI, DC, CS) {
            (self.spi, self.dc, self.cs)
        }
    }

    impl<SPI, DC, CS> DisplayInterface for SpiInterface<SPI, DC, CS>
    where
        SPI: Write<u8>,
        DC: OutputPin,
        CS: OutputPin,
    {
        type Error = SpiError<SPI::Error>;

        fn set_selected(&mut self, selected: bool) -> Result<(), Self::Error> {
            let res = match selected {
                true => self.cs.set_low(),
                false => self.cs.set_high(),
            };
            res.map_err(|_| SpiError::Pin)
        }

        fn write(&mut self, dc: DataCommand, buf: &[u8]) -> Result<(), Self::Error> {
            let res = match dc {
                DataCommand::Command => self.dc.set_low(),
                DataCommand::Data => self.dc.set_high(),
            };
            res.map_err(|_| SpiError::Pin)?;
            self.spi.write(buf).map_err(SpiError::Spi)
        }
    }
}

#[cfg(test)]
pub mod test_spy {
    //! Interfaces for use in unit tests to spy on whatever was sent to them.

    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use hal::blocking::delay::DelayMs;
    use hal::digital::v2::OutputPin;

    use super::{DataCommand, DisplayInterface};

    #[derive(Clone, Debug, PartialEq)]
    pub enum Sent {
        Cmd(u8),
        Data(Vec<u8>),
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SpyError;

    #[derive(Default)]
    struct SpyState {
        sent: Vec<Sent>,
        selected: bool,
        transactions: usize,
        fail_writes: usize,
        attempts: usize,
    }

    /// Records commands and data. Clones made with `split` share the same record, so one handle
    /// can be moved into the driver while the test keeps the other.
    pub struct TestSpyInterface {
        state: Rc<RefCell<SpyState>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            TestSpyInterface {
                state: Rc::new(RefCell::new(SpyState::default())),
            }
        }
        pub fn split(&self) -> Self {
            TestSpyInterface {
                state: self.state.clone(),
            }
        }
        pub fn check_multi(&self, expect: &[Sent]) {
            assert_eq!(self.state.borrow().sent, expect);
        }
        pub fn sent(&self) -> Vec<Sent> {
            self.state.borrow().sent.clone()
        }
        /// Number of completed chip-select framed transactions.
        pub fn transactions(&self) -> usize {
            self.state.borrow().transactions
        }
        /// Number of `write` calls, failed ones included.
        pub fn attempts(&self) -> usize {
            self.state.borrow().attempts
        }
        pub fn is_selected(&self) -> bool {
            self.state.borrow().selected
        }
        /// Make the next `n` writes fail.
        pub fn fail_next_writes(&self, n: usize) {
            self.state.borrow_mut().fail_writes = n;
        }
        pub fn clear(&mut self) {
            let mut state = self.state.borrow_mut();
            state.sent.clear();
            state.transactions = 0;
            state.attempts = 0;
        }
    }

    impl DisplayInterface for TestSpyInterface {
        type Error = SpyError;

        fn set_selected(&mut self, selected: bool) -> Result<(), SpyError> {
            let mut state = self.state.borrow_mut();
            assert_ne!(state.selected, selected, "unbalanced chip select");
            if !selected {
                state.transactions += 1;
            }
            state.selected = selected;
            Ok(())
        }

        fn write(&mut self, dc: DataCommand, buf: &[u8]) -> Result<(), SpyError> {
            let mut state = self.state.borrow_mut();
            assert!(state.selected, "write without chip select");
            state.attempts += 1;
            if state.fail_writes > 0 {
                state.fail_writes -= 1;
                return Err(SpyError);
            }
            match dc {
                DataCommand::Command => {
                    for b in buf {
                        state.sent.push(Sent::Cmd(*b));
                    }
                }
                DataCommand::Data => state.sent.push(Sent::Data(buf.to_vec())),
            }
            Ok(())
        }
    }

    /// Records every level driven onto a pin, `true` being high.
    pub struct PinSpy {
        levels: Rc<RefCell<Vec<bool>>>,
    }

    impl PinSpy {
        pub fn new() -> Self {
            PinSpy {
                levels: Rc::new(RefCell::new(Vec::new())),
            }
        }
        pub fn split(&self) -> Self {
            PinSpy {
                levels: self.levels.clone(),
            }
        }
        pub fn levels(&self) -> Vec<bool> {
            self.levels.borrow().clone()
        }
    }

    impl OutputPin for PinSpy {
        type Error = ();

        fn set_low(&mut self) -> Result<(), ()> {
            self.levels.borrow_mut().push(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), ()> {
            self.levels.borrow_mut().push(true);
            Ok(())
        }
    }

    /// Records requested delays instead of sleeping.
    pub struct DelaySpy {
        delays: Rc<RefCell<Vec<u16>>>,
    }

    impl DelaySpy {
        pub fn new() -> Self {
            DelaySpy {
                delays: Rc::new(RefCell::new(Vec::new())),
            }
        }
        pub fn split(&self) -> Self {
            DelaySpy {
                delays: self.delays.clone(),
            }
        }
        pub fn delays(&self) -> Vec<u16> {
            self.delays.borrow().clone()
        }
        pub fn clear(&self) {
            self.delays.borrow_mut().clear()
        }
    }

    impl DelayMs<u16> for DelaySpy {
        fn delay_ms(&mut self, ms: u16) {
            self.delays.borrow_mut().push(ms);
        }
    }
}
