//! Bus transport abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the
//! [`I2cInterface`] struct for talking to the SSD1306 over a byte-oriented
//! control bus.
//!
//! One `write` call is one bus transmission. The controller has no
//! transaction boundaries of its own beyond the control-prefix framing, so
//! everything that must not be split by other traffic - a command stream,
//! or a page select plus its data run - is handed to the transport as a
//! single call. Serializing *between* calls is the
//! [`Display`](crate::display::Display) session's job.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ssd1306_lite::{DisplayInterface, I2cInterface};
//! # use core::convert::Infallible;
//! # struct MockI2c;
//! # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
//! # impl embedded_hal::i2c::I2c for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [embedded_hal::i2c::Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! let mut interface = I2cInterface::new(MockI2c);
//!
//! // One framed transmission: command-stream prefix + inverted mode
//! let _ = interface.write(0x3C, &[0x00, 0xA7]);
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::I2c;

/// Trait for the byte transport to the SSD1306 controller
///
/// Implementations perform raw byte writes to a bus address. Each call is
/// assumed atomic with respect to other bus traffic; no atomicity across
/// calls is assumed or required.
///
/// For most cases, use the provided [`I2cInterface`]. Implement this trait
/// directly for other byte-oriented buses or for capturing transports in
/// tests.
pub trait DisplayInterface {
    /// Error type for transport operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Transmit one framed byte sequence to the given 7-bit address
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the bus write fails. The caller
    /// treats a failure as aborting the logical operation in progress.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// [`DisplayInterface`] implementation over embedded-hal v1.0 I2C
///
/// Owns the bus handle exclusively for the lifetime of the session; use
/// [`I2cInterface::release`] to get it back.
pub struct I2cInterface<I2C> {
    /// Underlying I2C bus
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c,
{
    /// Create a new interface over an I2C bus
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume the interface and return the bus handle
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> DisplayInterface for I2cInterface<I2C>
where
    I2C: I2c,
    I2C::Error: Debug,
{
    type Error = I2C::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl embedded_hal::i2c::ErrorType for MockI2c {
        type Error = core::convert::Infallible;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [embedded_hal::i2c::Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let embedded_hal::i2c::Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_forwards_address_and_frame() {
        let mut interface = I2cInterface::new(MockI2c::default());
        interface.write(0x3C, &[0x00, 0xA6]).unwrap();
        interface.write(0x3D, &[0x40, 0x01]).unwrap();

        let i2c = interface.release();
        assert_eq!(
            i2c.writes,
            alloc::vec![(0x3C, alloc::vec![0x00, 0xA6]), (0x3D, alloc::vec![0x40, 0x01])]
        );
    }
}
