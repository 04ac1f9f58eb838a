//! Display configuration types and builder

use crate::font::{self, Font};

pub use crate::error::BuilderError;

/// Default 7-bit bus address of SSD1306 modules (SA0 low).
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Default contrast register value after initialization.
pub const DEFAULT_CONTRAST: u8 = 0x7F;

/// Maximum columns (segment outputs) the SSD1306 can drive.
pub const MAX_COLS: u8 = 128;

/// Maximum rows (common outputs) the SSD1306 can drive.
pub const MAX_ROWS: u8 = 64;

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in columns (segment outputs)
    pub cols: u8,
    /// Height in pixel rows (common outputs)
    pub rows: u8,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - cols == 0 or cols > MAX_COLS
    /// - rows == 0 or rows > MAX_ROWS
    /// - rows % 8 != 0 (height must be a whole number of pages)
    pub fn new(cols: u8, rows: u8) -> Result<Self, BuilderError> {
        if cols == 0 || cols > MAX_COLS {
            return Err(BuilderError::InvalidDimensions { cols, rows });
        }
        if rows == 0 || rows > MAX_ROWS || !rows.is_multiple_of(8) {
            return Err(BuilderError::InvalidDimensions { cols, rows });
        }
        Ok(Self { cols, rows })
    }

    /// Number of 8-row pages covering the display height
    pub fn pages(&self) -> u8 {
        self.rows / 8
    }
}

/// Display configuration
///
/// Bus address, panel dimensions, initial contrast, and the glyph table
/// are the configurable parameters; the remaining tuning constants (clock divider,
/// charge pump mode, pre-charge timing, VCOMH level) are fixed per the
/// datasheet. Use [`Builder`] to create a Config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// 7-bit bus address of the controller
    pub address: u8,
    /// Panel dimensions
    pub dimensions: Dimensions,
    /// Contrast applied at initialization
    pub contrast: u8,
    /// Glyph table used for text rendering
    pub font: &'static Font,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use ssd1306_lite::{Builder, Dimensions};
///
/// let dims = match Dimensions::new(128, 64) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).address(0x3D).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Panel dimensions (required)
    dimensions: Option<Dimensions>,
    /// 7-bit bus address
    address: u8,
    /// Contrast applied at initialization
    contrast: u8,
    /// Glyph table used for text rendering
    font: &'static Font,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            address: DEFAULT_ADDRESS,
            contrast: DEFAULT_CONTRAST,
            font: &font::FONT8X8,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the 7-bit bus address (default 0x3C; modules with SA0 high use 0x3D)
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the contrast applied at initialization
    pub fn contrast(mut self, contrast: u8) -> Self {
        self.contrast = contrast;
        self
    }

    /// Replace the built-in glyph table
    ///
    /// The table must follow the same layout: 128 entries of 8 column
    /// bytes, LSB = top row. Codes without an entry render blank.
    pub fn font(mut self, font: &'static Font) -> Self {
        self.font = font;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            address: self.address,
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            contrast: self.contrast,
            font: self.font,
        })
    }
}
