//! Error types reported by the driver.

use core::fmt;

/// Failures reported by operations that talk to the controller.
///
/// `IE` is the error type of the `DisplayInterface`, and `PE` is the error type of the reset
/// line output pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<IE, PE> {
    /// The interface failed on every attempt allowed by the retry policy. Carries the error from
    /// the final attempt. The controller state is undefined after this.
    Interface(IE),
    /// The reset line could not be driven.
    ResetPin(PE),
    /// A command argument lies outside the range accepted by the controller.
    InvalidArgument,
    /// The operation needs a controller which has completed `init`.
    NotInitialized,
    /// An image source was too short. Nothing was sent.
    Bitmap(BitmapError),
}

impl<IE, PE> fmt::Display for Error<IE, PE>
where
    IE: fmt::Debug,
    PE: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "display interface failed after retries: {:?}", e),
            Error::ResetPin(e) => write!(f, "could not drive reset line: {:?}", e),
            Error::InvalidArgument => f.write_str("command argument out of range"),
            Error::NotInitialized => f.write_str("controller not initialized"),
            Error::Bitmap(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<IE, PE> std::error::Error for Error<IE, PE>
where
    IE: fmt::Debug,
    PE: fmt::Debug,
{
}

/// A packed bitmap source was shorter than its declared width and height require.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapError {
    /// Number of bytes the declared geometry needs.
    pub needed: usize,
    /// Number of bytes actually supplied.
    pub len: usize,
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "bitmap needs {} bytes but only {} were supplied",
            self.needed, self.len
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BitmapError {}
