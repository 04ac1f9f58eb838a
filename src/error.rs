//! Error types for the driver
//!
//! - [`BuilderError`] - configuration construction errors
//! - [`Error`] - runtime errors during display operations
//!
//! Transport failures are wrapped, never retried: a failed bus write aborts
//! the remaining writes of the current operation and is returned to the
//! caller, leaving the panel in whatever partially updated state the
//! completed writes produced.
//!
//! ## Example
//!
//! ```
//! use ssd1306_lite::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions (height must be a whole number of pages)
//! let result = Dimensions::new(128, 30);
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific transport
/// error, so callers can match on the underlying hardware failure.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Bus transport error
    ///
    /// Wraps the underlying error from the [`DisplayInterface`]
    /// implementation. Not retried; the current operation is aborted.
    Interface(I::Error),
    /// The session was closed; no bus write was attempted
    Closed,
    /// Contrast value outside 0-255, rejected before any bus write
    ContrastOutOfRange {
        /// The rejected value
        value: u16,
    },
    /// Bitmap dimensions are zero or exceed the configured panel
    InvalidBitmap {
        /// Declared width in pixels
        width: u16,
        /// Declared height in pixels
        height: u16,
    },
    /// The supplied buffer holds fewer pixel bits than declared
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// The backend does not implement the requested operation
    ///
    /// The software pipeline supports every request; accelerated backends
    /// may decline individual variants.
    Unsupported,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Bus transport error"),
            Self::Closed => write!(f, "Display session is closed"),
            Self::ContrastOutOfRange { value } => {
                write!(f, "Contrast value {value} is outside 0-255")
            }
            Self::InvalidBitmap { width, height } => {
                write!(f, "Invalid bitmap dimensions: {width}x{height}")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::Unsupported => write!(f, "Operation not supported by this backend"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before any session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in columns requested
        cols: u8,
        /// Height in pixel rows requested
        rows: u8,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { cols, rows } => write!(
                f,
                "Invalid dimensions {cols}x{rows} (max 128x64, rows must be a multiple of 8)"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
