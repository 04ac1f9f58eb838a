//! Page-addressed render pipeline
//!
//! Turns a [`Request`] into the ordered sequence of framed bus writes the
//! controller expects. The software path ([`SoftwarePipeline`]) linearizes
//! text and bitmaps into the controller's column-major page layout: one
//! output byte is one 8-pixel vertical column of the current page, LSB =
//! top row.
//!
//! The [`Backend`] trait is the seam between this software path and an
//! accelerated implementation of the same operation contract, selected
//! once when the session opens.

use crate::command;
use crate::config::{self, Config};
use crate::error::Error;
use crate::font;
use crate::interface::DisplayInterface;

/// A single drawing or control request
///
/// Request data is borrowed for the duration of the operation and not
/// retained afterward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request<'a> {
    /// Blank every page of the display
    Clear,
    /// Render ASCII text from the top-left corner; `\n` advances one page
    Text(&'a str),
    /// Render a 1-bit bitmap from the top-left corner
    Bitmap {
        /// Row-major bitmap bits, MSB first within each byte
        data: &'a [u8],
        /// Declared width in pixels
        width: u16,
        /// Declared height in pixels
        height: u16,
    },
    /// Render a pre-rendered QR payload: byte 0 is the module count per
    /// side, remaining bytes are LSB-first module bits
    QrCode(&'a [u8]),
    /// Change the contrast register (valid range 0-255)
    SetContrast(u16),
    /// Switch between inverted and normal display mode
    SetInversion(bool),
}

/// Operation contract shared by the software pipeline and any accelerated
/// backend
///
/// A backend executes each request as one uninterrupted sequence of bus
/// writes. The session guarantees no other request runs concurrently; the
/// backend guarantees the write order within a request.
pub trait Backend<I: DisplayInterface> {
    /// Bring the panel up; called once when the session opens
    fn open(&mut self, interface: &mut I, config: &Config) -> Result<(), Error<I>>;

    /// Execute one request
    ///
    /// Backends that do not implement a request variant return
    /// [`Error::Unsupported`] without touching the bus.
    fn run(
        &mut self,
        interface: &mut I,
        config: &Config,
        request: Request<'_>,
    ) -> Result<(), Error<I>>;
}

/// Pure-software reference implementation of the [`Backend`] contract
///
/// Stateless; every request is encoded through [`crate::command`] and the
/// built-in glyph table. An accelerated backend must be bit-for-bit
/// compatible with the byte streams this pipeline produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoftwarePipeline;

impl SoftwarePipeline {
    fn clear<I: DisplayInterface>(
        interface: &mut I,
        config: &Config,
    ) -> Result<(), Error<I>> {
        let mut buf = [0u8; command::PAGE_FRAME_LEN];
        let blank = [0u8; command::MAX_COLS];
        let cols = config.dimensions.cols as usize;
        for page in 0..config.dimensions.pages() {
            let frame = command::page_frame(&mut buf, page, &blank[..cols]);
            write(interface, config.address, frame)?;
        }
        Ok(())
    }

    fn text<I: DisplayInterface>(
        interface: &mut I,
        config: &Config,
        text: &str,
    ) -> Result<(), Error<I>> {
        write(interface, config.address, &command::cursor_reset(0))?;
        let mut page = 0u8;
        for byte in text.bytes() {
            if byte == b'\n' {
                // The newline itself emits no data; the page register wraps
                // in hardware past the last page.
                page = page.wrapping_add(1);
                write(interface, config.address, &command::cursor_reset(page))?;
            } else {
                let frame = command::glyph_frame(font::glyph_or_blank(config.font, byte));
                write(interface, config.address, &frame)?;
            }
        }
        Ok(())
    }

    /// Slice row-major MSB-first bits into per-page column bytes.
    ///
    /// Pages past the declared height stay blank; rows past the declared
    /// height consume no input bits.
    fn bitmap<I: DisplayInterface>(
        interface: &mut I,
        config: &Config,
        data: &[u8],
        width: u16,
        height: u16,
    ) -> Result<(), Error<I>> {
        let dims = config.dimensions;
        if width == 0
            || height == 0
            || width > u16::from(dims.cols)
            || height > u16::from(dims.rows)
        {
            return Err(Error::InvalidBitmap { width, height });
        }
        let required = (usize::from(width) * usize::from(height)).div_ceil(8);
        if data.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: data.len(),
            });
        }

        write(interface, config.address, &command::cursor_reset(0))?;

        let mut buf = [0u8; command::PAGE_FRAME_LEN];
        let mut bit = 0usize;
        for page in 0..dims.pages() {
            let mut columns = [0u8; command::MAX_COLS];
            for y in 0..8u16 {
                let row = u16::from(page) * 8 + y;
                if row >= height {
                    continue;
                }
                for x in 0..usize::from(width) {
                    if data[bit / 8] & (1 << (7 - (bit % 8))) != 0 {
                        columns[x] |= 1 << y;
                    }
                    bit += 1;
                }
            }
            let frame = command::page_frame(&mut buf, page, &columns[..dims.cols as usize]);
            write(interface, config.address, frame)?;
        }
        Ok(())
    }

    /// Render a QR payload: `payload[0]` modules per side, then LSB-first
    /// module bits in row-major order.
    fn qrcode<I: DisplayInterface>(
        interface: &mut I,
        config: &Config,
        payload: &[u8],
    ) -> Result<(), Error<I>> {
        let dims = config.dimensions;
        let Some((&size, modules)) = payload.split_first() else {
            return Err(Error::InvalidBitmap { width: 0, height: 0 });
        };
        let side = u16::from(size);
        if side == 0 || side > u16::from(dims.cols) || side > u16::from(dims.rows) {
            return Err(Error::InvalidBitmap {
                width: side,
                height: side,
            });
        }
        let required = (usize::from(side) * usize::from(side)).div_ceil(8);
        if modules.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: modules.len(),
            });
        }

        write(interface, config.address, &command::cursor_reset(0))?;

        let mut buf = [0u8; command::PAGE_FRAME_LEN];
        for page in 0..dims.pages() {
            let mut columns = [0u8; command::MAX_COLS];
            for y in 0..8u16 {
                let row = u16::from(page) * 8 + y;
                if row >= side {
                    continue;
                }
                for x in 0..usize::from(side) {
                    let index = usize::from(row) * usize::from(side) + x;
                    if modules[index / 8] & (1 << (index % 8)) != 0 {
                        columns[x] |= 1 << y;
                    }
                }
            }
            let frame = command::page_frame(&mut buf, page, &columns[..dims.cols as usize]);
            write(interface, config.address, frame)?;
        }
        Ok(())
    }

    fn contrast<I: DisplayInterface>(
        interface: &mut I,
        config: &Config,
        value: u16,
    ) -> Result<(), Error<I>> {
        let Ok(value) = u8::try_from(value) else {
            return Err(Error::ContrastOutOfRange { value });
        };
        write(interface, config.address, &command::contrast(value))
    }

    fn inversion<I: DisplayInterface>(
        interface: &mut I,
        config: &Config,
        enabled: bool,
    ) -> Result<(), Error<I>> {
        write(interface, config.address, &command::inversion(enabled))
    }
}

impl<I: DisplayInterface> Backend<I> for SoftwarePipeline {
    fn open(&mut self, interface: &mut I, config: &Config) -> Result<(), Error<I>> {
        let sequence = command::init_sequence(config.dimensions);
        write(interface, config.address, &sequence)?;
        if config.contrast != config::DEFAULT_CONTRAST {
            write(interface, config.address, &command::contrast(config.contrast))?;
        }
        Ok(())
    }

    fn run(
        &mut self,
        interface: &mut I,
        config: &Config,
        request: Request<'_>,
    ) -> Result<(), Error<I>> {
        match request {
            Request::Clear => Self::clear(interface, config),
            Request::Text(text) => Self::text(interface, config, text),
            Request::Bitmap {
                data,
                width,
                height,
            } => Self::bitmap(interface, config, data, width, height),
            Request::QrCode(payload) => Self::qrcode(interface, config, payload),
            Request::SetContrast(value) => Self::contrast(interface, config, value),
            Request::SetInversion(enabled) => Self::inversion(interface, config, enabled),
        }
    }
}

fn write<I: DisplayInterface>(
    interface: &mut I,
    address: u8,
    bytes: &[u8],
) -> Result<(), Error<I>> {
    interface.write(address, bytes).map_err(Error::Interface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Dimensions};
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct RecordingInterface {
        frames: Vec<Vec<u8>>,
        addresses: Vec<u8>,
    }

    impl DisplayInterface for RecordingInterface {
        type Error = core::convert::Infallible;

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            self.addresses.push(address);
            self.frames.push(bytes.to_vec());
            Ok(())
        }
    }

    fn test_config(cols: u8, rows: u8) -> Config {
        Builder::new()
            .dimensions(Dimensions::new(cols, rows).unwrap())
            .build()
            .unwrap()
    }

    fn run(config: &Config, request: Request<'_>) -> Result<RecordingInterface, &'static str> {
        let mut interface = RecordingInterface::default();
        SoftwarePipeline
            .run(&mut interface, config, request)
            .map_err(|_| "request failed")?;
        Ok(interface)
    }

    #[test]
    fn test_clear_writes_one_frame_per_page() {
        let config = test_config(128, 32);
        let interface = run(&config, Request::Clear).unwrap();
        assert_eq!(interface.frames.len(), 4);
        for (page, frame) in interface.frames.iter().enumerate() {
            assert_eq!(frame.len(), 3 + 128);
            assert_eq!(frame[0], 0x80);
            assert_eq!(frame[1], 0xB0 | page as u8);
            assert_eq!(frame[2], 0x40);
            assert!(frame[3..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_clear_blank_run_matches_width() {
        let config = test_config(64, 16);
        let interface = run(&config, Request::Clear).unwrap();
        assert_eq!(interface.frames.len(), 2);
        assert_eq!(interface.frames[0].len(), 3 + 64);
    }

    #[test]
    fn test_empty_text_emits_one_cursor_reset() {
        let config = test_config(128, 64);
        let interface = run(&config, Request::Text("")).unwrap();
        assert_eq!(interface.frames, alloc::vec![alloc::vec![0x00, 0x00, 0x10, 0xB0]]);
    }

    #[test]
    fn test_text_with_newline_advances_page() {
        let config = test_config(128, 64);
        let interface = run(&config, Request::Text("A\nB")).unwrap();

        let glyph_a = font::glyph(b'A').unwrap();
        let glyph_b = font::glyph(b'B').unwrap();
        assert_eq!(interface.frames.len(), 4);
        assert_eq!(interface.frames[0], alloc::vec![0x00, 0x00, 0x10, 0xB0]);
        assert_eq!(interface.frames[1][0], 0x40);
        assert_eq!(&interface.frames[1][1..], glyph_a);
        assert_eq!(interface.frames[2], alloc::vec![0x00, 0x00, 0x10, 0xB1]);
        assert_eq!(interface.frames[3][0], 0x40);
        assert_eq!(&interface.frames[3][1..], glyph_b);
    }

    #[test]
    fn test_text_glyph_frames_are_nine_bytes() {
        let config = test_config(128, 64);
        let interface = run(&config, Request::Text("Hi")).unwrap();
        assert_eq!(interface.frames.len(), 3);
        assert_eq!(interface.frames[1].len(), 9);
        assert_eq!(interface.frames[2].len(), 9);
    }

    #[test]
    fn test_text_non_ascii_renders_blank_glyph() {
        let config = test_config(128, 64);
        let interface = run(&config, Request::Text("\u{00E9}")).unwrap();
        // One cursor reset plus one blank frame per UTF-8 byte.
        assert_eq!(interface.frames.len(), 3);
        assert!(interface.frames[1][1..].iter().all(|&b| b == 0));
        assert!(interface.frames[2][1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_text_uses_configured_font() {
        static CHECKER: font::Font = {
            let mut table = [[0u8; font::GLYPH_WIDTH]; font::GLYPH_COUNT];
            table[b'A' as usize] = [0xAA; font::GLYPH_WIDTH];
            table
        };
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .font(&CHECKER)
            .build()
            .unwrap();
        let interface = run(&config, Request::Text("A")).unwrap();
        assert_eq!(&interface.frames[1][1..], &[0xAA; 8]);
    }

    #[test]
    fn test_long_line_is_not_wrapped() {
        // 20 glyphs on a 128-column panel overrun the width; the pipeline
        // keeps emitting glyph frames and lets the column counter run on.
        let config = test_config(128, 32);
        let text = "ABCDEFGHIJKLMNOPQRST";
        let interface = run(&config, Request::Text(text)).unwrap();
        assert_eq!(interface.frames.len(), 1 + text.len());
        assert!(interface.frames[1..].iter().all(|f| f[0] == 0x40));
    }

    #[test]
    fn test_bitmap_slices_rows_into_column_bytes() {
        let config = test_config(128, 32);
        // 8x8 all-on block in the top-left corner.
        let data = [0xFFu8; 8];
        let interface = run(
            &config,
            Request::Bitmap {
                data: &data,
                width: 8,
                height: 8,
            },
        )
        .unwrap();

        // Cursor reset plus one frame per page.
        assert_eq!(interface.frames.len(), 1 + 4);
        let page0 = &interface.frames[1];
        assert_eq!(&page0[..3], &[0x80, 0xB0, 0x40]);
        assert!(page0[3..11].iter().all(|&b| b == 0xFF));
        assert!(page0[11..].iter().all(|&b| b == 0));
        // Pages past the bitmap height are blank.
        assert!(interface.frames[2][3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bitmap_msb_is_leftmost_pixel() {
        let config = test_config(128, 32);
        // Single row, one byte: only the leftmost pixel set.
        let data = [0x80u8];
        let interface = run(
            &config,
            Request::Bitmap {
                data: &data,
                width: 8,
                height: 1,
            },
        )
        .unwrap();
        let page0 = &interface.frames[1];
        assert_eq!(page0[3], 0x01);
        assert!(page0[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bitmap_rejects_oversize_dimensions() {
        let config = test_config(128, 32);
        let data = [0u8; 1024];
        let mut interface = RecordingInterface::default();
        let result = SoftwarePipeline.run(
            &mut interface,
            &config,
            Request::Bitmap {
                data: &data,
                width: 129,
                height: 8,
            },
        );
        assert!(matches!(
            result,
            Err(Error::InvalidBitmap {
                width: 129,
                height: 8
            })
        ));
        assert!(interface.frames.is_empty());
    }

    #[test]
    fn test_bitmap_rejects_short_buffer() {
        let config = test_config(128, 32);
        let data = [0u8; 4];
        let mut interface = RecordingInterface::default();
        let result = SoftwarePipeline.run(
            &mut interface,
            &config,
            Request::Bitmap {
                data: &data,
                width: 16,
                height: 16,
            },
        );
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: 32,
                provided: 4
            })
        ));
        assert!(interface.frames.is_empty());
    }

    #[test]
    fn test_qrcode_reads_size_header_and_lsb_first_bits() {
        let config = test_config(128, 32);
        // 2x2 modules: bits 0 and 2 set -> left column dark in both rows.
        let payload = [2u8, 0b0000_0101];
        let interface = run(&config, Request::QrCode(&payload)).unwrap();

        assert_eq!(interface.frames.len(), 1 + 4);
        let page0 = &interface.frames[1];
        assert_eq!(page0[3], 0b0000_0011);
        assert_eq!(page0[4], 0);
    }

    #[test]
    fn test_qrcode_rejects_empty_payload() {
        let config = test_config(128, 32);
        let mut interface = RecordingInterface::default();
        let result = SoftwarePipeline.run(&mut interface, &config, Request::QrCode(&[]));
        assert!(matches!(result, Err(Error::InvalidBitmap { .. })));
    }

    #[test]
    fn test_qrcode_rejects_short_payload() {
        let config = test_config(128, 32);
        let payload = [21u8, 0xFF];
        let mut interface = RecordingInterface::default();
        let result = SoftwarePipeline.run(&mut interface, &config, Request::QrCode(&payload));
        assert!(matches!(result, Err(Error::BufferTooSmall { .. })));
        assert!(interface.frames.is_empty());
    }

    #[test]
    fn test_contrast_boundaries() {
        let config = test_config(128, 64);
        let interface = run(&config, Request::SetContrast(0)).unwrap();
        assert_eq!(interface.frames, alloc::vec![alloc::vec![0x00, 0x81, 0x00]]);

        let interface = run(&config, Request::SetContrast(255)).unwrap();
        assert_eq!(interface.frames, alloc::vec![alloc::vec![0x00, 0x81, 0xFF]]);
    }

    #[test]
    fn test_contrast_out_of_range_writes_nothing() {
        let config = test_config(128, 64);
        let mut interface = RecordingInterface::default();
        let result = SoftwarePipeline.run(&mut interface, &config, Request::SetContrast(256));
        assert!(matches!(
            result,
            Err(Error::ContrastOutOfRange { value: 256 })
        ));
        assert!(interface.frames.is_empty());
    }

    #[test]
    fn test_inversion_frames() {
        let config = test_config(128, 64);
        let interface = run(&config, Request::SetInversion(true)).unwrap();
        assert_eq!(interface.frames, alloc::vec![alloc::vec![0x00, 0xA7]]);

        let interface = run(&config, Request::SetInversion(false)).unwrap();
        assert_eq!(interface.frames, alloc::vec![alloc::vec![0x00, 0xA6]]);
    }

    #[test]
    fn test_open_emits_framed_init_sequence() {
        let config = test_config(128, 64);
        let mut interface = RecordingInterface::default();
        SoftwarePipeline.open(&mut interface, &config).unwrap();
        assert_eq!(interface.frames.len(), 1);
        assert_eq!(interface.frames[0][0], 0x00);
        assert_eq!(interface.frames[0].len(), command::INIT_SEQUENCE_LEN);
        assert_eq!(interface.addresses, alloc::vec![0x3C]);
    }

    #[test]
    fn test_open_applies_non_default_contrast() {
        let config = Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .contrast(0xC0)
            .build()
            .unwrap();
        let mut interface = RecordingInterface::default();
        SoftwarePipeline.open(&mut interface, &config).unwrap();
        assert_eq!(interface.frames.len(), 2);
        assert_eq!(interface.frames[1], alloc::vec![0x00, 0x81, 0xC0]);
    }
}
