//! Unified error type for banker-trainer.
//!
//! We avoid `alloc` - all error variants are fieldless.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Top-level error type used across the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Display
    /// The display did not answer during initialisation. Fatal.
    DisplayInit,

    /// Drawing or flushing a frame failed.
    Display,

    // GPIO
    /// Reading a button line or driving an LED line failed.
    Gpio,

    // Generic
    /// Rendered text did not fit its line buffer.
    BufferOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::DisplayInit => "display init failed",
            Error::Display => "display write failed",
            Error::Gpio => "gpio access failed",
            Error::BufferOverflow => "line buffer overflow",
        };
        f.write_str(msg)
    }
}
