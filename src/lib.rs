//! SSD1306 OLED Display Driver
//!
//! A framebuffer-less, page-mode driver for the SSD1306 monochrome OLED
//! controller over a byte-oriented control bus (I2C).
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - Text rendering through a built-in 8x8 ASCII glyph table, no
//!   framebuffer required
//! - Whole-display 1-bit bitmap and pre-rendered QR payload blits
//! - Contrast and inversion control
//! - Pluggable rendering backend: the pure-software pipeline is the
//!   reference an accelerated implementation must match byte-for-byte
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ssd1306_lite::{Builder, Dimensions, Display, I2cInterface};
//!
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
//! # let i2c = MockI2c;
//! let dims = match Dimensions::new(128, 64) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let interface = I2cInterface::new(i2c);
//! let mut display = match Display::open(interface, config) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//! let _ = display.clear();
//! let _ = display.set_text("Hello\nWorld");
//! let _ = display.close();
//! ```
//!
//! ## Concurrency
//!
//! Every operation takes `&mut self` and runs its bus writes to
//! completion before returning, so operations can never interleave their
//! byte streams. Callers sharing one session across tasks wrap it in a
//! mutex held for the whole logical operation.

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(test)]
extern crate std;

/// SSD1306 command definitions and frame encoders
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Display session and operation surface
pub mod display;
/// Error types for the driver
pub mod error;
/// Built-in 8x8 glyph table
pub mod font;
/// Bus transport abstraction
pub mod interface;
/// Page-addressed render pipeline and backend seam
pub mod render;

pub use config::{Builder, Config, DEFAULT_ADDRESS, DEFAULT_CONTRAST, Dimensions};
pub use display::Display;
pub use error::{BuilderError, Error};
pub use interface::{DisplayInterface, I2cInterface};
pub use render::{Backend, Request, SoftwarePipeline};
