//! SSD1306 command definitions and frame encoders
//!
//! The SSD1306 is driven over a byte-oriented control bus. Every
//! transmission opens with one control-prefix byte telling the controller
//! how to interpret the payload:
//!
//! 1. [`CTRL_SINGLE_COMMAND`] (0x80) - one command byte follows
//! 2. [`CTRL_COMMAND_STREAM`] (0x00) - a stream of command bytes follows
//! 3. [`CTRL_DATA_STREAM`] (0x40) - GDDRAM data bytes follow
//!
//! The encoders in this module are pure functions from a logical operation
//! to the exact framed byte sequence, including the prefix. Each returned
//! frame is meant to go out as one atomic bus write.

use crate::config::Dimensions;

// Control-prefix bytes

/// Control prefix: a single command byte follows (0x80)
pub const CTRL_SINGLE_COMMAND: u8 = 0x80;

/// Control prefix: a command stream follows (0x00)
pub const CTRL_COMMAND_STREAM: u8 = 0x00;

/// Control prefix: a GDDRAM data stream follows (0x40)
pub const CTRL_DATA_STREAM: u8 = 0x40;

// Fundamental commands (datasheet pg. 28)

/// Set contrast command (0x81)
///
/// Followed by one byte, 0x00-0xFF. Reset value is 0x7F.
pub const SET_CONTRAST: u8 = 0x81;

/// Resume displaying GDDRAM content (0xA4)
pub const DISPLAY_RAM: u8 = 0xA4;

/// Normal (non-inverted) display mode (0xA6)
pub const DISPLAY_NORMAL: u8 = 0xA6;

/// Inverted display mode (0xA7)
pub const DISPLAY_INVERTED: u8 = 0xA7;

/// Display off / sleep mode (0xAE)
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

// Addressing commands (datasheet pg. 30)

/// Set memory addressing mode (0x20)
///
/// Followed by one byte: 0x00 horizontal, 0x01 vertical, 0x02 page.
pub const SET_MEMORY_ADDR_MODE: u8 = 0x20;

/// Horizontal addressing mode operand for [`SET_MEMORY_ADDR_MODE`]
pub const ADDR_MODE_HORIZONTAL: u8 = 0x00;

/// Set lower column start address base (0x00 | low nibble)
pub const SET_COLUMN_LOW: u8 = 0x00;

/// Set higher column start address base (0x10 | high nibble)
pub const SET_COLUMN_HIGH: u8 = 0x10;

/// Set page start address base (0xB0 | page), page addressing mode
pub const SET_PAGE_BASE: u8 = 0xB0;

// Hardware configuration commands (datasheet pg. 31)

/// Set display start line 0 (0x40)
pub const SET_START_LINE: u8 = 0x40;

/// Segment remap: column 127 maps to SEG0 (0xA1)
pub const SET_SEGMENT_REMAP: u8 = 0xA1;

/// Set multiplex ratio (0xA8)
///
/// Followed by one byte: number of rows - 1.
pub const SET_MUX_RATIO: u8 = 0xA8;

/// COM scan direction: remapped, scan from COM\[N-1\] to COM0 (0xC8)
pub const SET_COM_SCAN_REMAP: u8 = 0xC8;

/// Set display offset (0xD3)
///
/// Followed by one byte, vertical shift 0-63.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Set COM pins hardware configuration (0xDA)
///
/// Followed by one byte: 0x02 sequential (panels up to 32 rows),
/// 0x12 alternative (64-row panels).
pub const SET_COM_PIN_MAP: u8 = 0xDA;

// Timing and driving commands (datasheet pg. 32)

/// Set display clock divide ratio / oscillator frequency (0xD5)
pub const SET_CLOCK_DIVIDE: u8 = 0xD5;

/// Set pre-charge period (0xD9)
pub const SET_PRECHARGE: u8 = 0xD9;

/// Set VCOMH deselect level (0xDB)
pub const SET_VCOMH_LEVEL: u8 = 0xDB;

// Charge pump (datasheet pg. 62)

/// Charge pump setting (0x8D)
///
/// Followed by one byte: 0x14 enables the pump. The panel cannot light
/// without it unless an external VCC is supplied.
pub const SET_CHARGE_PUMP: u8 = 0x8D;

/// Charge pump enable operand for [`SET_CHARGE_PUMP`]
pub const CHARGE_PUMP_ON: u8 = 0x14;

// Fixed tuning operands, per the datasheet's application notes.
const DEFAULT_CLOCK_DIVIDE: u8 = 0x80;
const DEFAULT_CONTRAST: u8 = 0x7F;
const DEFAULT_PRECHARGE: u8 = 0xF1;
const DEFAULT_VCOMH: u8 = 0x30;
const COM_PINS_SEQUENTIAL: u8 = 0x02;
const COM_PINS_ALTERNATIVE: u8 = 0x12;

/// Length of the framed initialization sequence in bytes.
pub const INIT_SEQUENCE_LEN: usize = 25;

/// Maximum columns the controller can drive; bounds the page frame size.
pub const MAX_COLS: usize = 128;

/// Length of the buffer backing [`page_frame`]:
/// single-command prefix + page select + data prefix + one full page.
pub const PAGE_FRAME_LEN: usize = 3 + MAX_COLS;

/// Encode the full initialization sequence as one command-stream frame.
///
/// Panel off, clocking and multiplex setup for the configured height,
/// charge pump on, fixed orientation (segment remap + COM scan remap),
/// default contrast and drive timing, normal mode, horizontal addressing,
/// panel on. Pure function of the dimensions: encoding twice yields
/// byte-identical output.
pub fn init_sequence(dims: Dimensions) -> [u8; INIT_SEQUENCE_LEN] {
    let com_pins = if dims.rows > 32 {
        COM_PINS_ALTERNATIVE
    } else {
        COM_PINS_SEQUENTIAL
    };
    [
        CTRL_COMMAND_STREAM,
        DISPLAY_OFF,
        SET_CLOCK_DIVIDE,
        DEFAULT_CLOCK_DIVIDE,
        SET_MUX_RATIO,
        dims.rows - 1,
        SET_DISPLAY_OFFSET,
        0x00,
        SET_START_LINE,
        SET_CHARGE_PUMP,
        CHARGE_PUMP_ON,
        SET_SEGMENT_REMAP,
        SET_COM_SCAN_REMAP,
        SET_COM_PIN_MAP,
        com_pins,
        SET_CONTRAST,
        DEFAULT_CONTRAST,
        SET_PRECHARGE,
        DEFAULT_PRECHARGE,
        SET_VCOMH_LEVEL,
        DEFAULT_VCOMH,
        DISPLAY_NORMAL,
        SET_MEMORY_ADDR_MODE,
        ADDR_MODE_HORIZONTAL,
        DISPLAY_ON,
    ]
}

/// Encode a cursor reset to column 0 of the given page.
///
/// The page index is masked to the controller's 3-bit page register,
/// mirroring the hardware wrap-around when text runs past the last page.
pub fn cursor_reset(page: u8) -> [u8; 4] {
    [
        CTRL_COMMAND_STREAM,
        SET_COLUMN_LOW,
        SET_COLUMN_HIGH,
        SET_PAGE_BASE | (page & 0x07),
    ]
}

/// Encode one page write: page select plus a run of column bytes.
///
/// The frame carries two control-prefixed sub-streams and must be sent as
/// a single bus write so no other traffic can split them:
/// `[0x80, 0xB0|page, 0x40, data...]`.
///
/// `data` is truncated to [`MAX_COLS`] bytes. Returns the occupied slice
/// of `buf`.
pub fn page_frame<'a>(buf: &'a mut [u8; PAGE_FRAME_LEN], page: u8, data: &[u8]) -> &'a [u8] {
    let len = data.len().min(MAX_COLS);
    buf[0] = CTRL_SINGLE_COMMAND;
    buf[1] = SET_PAGE_BASE | (page & 0x07);
    buf[2] = CTRL_DATA_STREAM;
    buf[3..3 + len].copy_from_slice(&data[..len]);
    &buf[..3 + len]
}

/// Encode one glyph as a data-stream frame.
///
/// The 8 column bytes land at the controller's current column/page cursor,
/// which auto-increments after each byte.
pub fn glyph_frame(glyph: &[u8; 8]) -> [u8; 9] {
    let mut frame = [CTRL_DATA_STREAM; 9];
    frame[1..].copy_from_slice(glyph);
    frame
}

/// Encode a contrast change. Callers validate the range; the encoder
/// takes the already-clamped register value.
pub fn contrast(value: u8) -> [u8; 3] {
    [CTRL_COMMAND_STREAM, SET_CONTRAST, value]
}

/// Encode an inversion mode change.
pub fn inversion(enabled: bool) -> [u8; 2] {
    let mode = if enabled {
        DISPLAY_INVERTED
    } else {
        DISPLAY_NORMAL
    };
    [CTRL_COMMAND_STREAM, mode]
}

/// Encode the display-off command sent when a session closes.
pub fn display_off() -> [u8; 2] {
    [CTRL_COMMAND_STREAM, DISPLAY_OFF]
}
