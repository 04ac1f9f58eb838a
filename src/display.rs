//! Display session and operation surface
//!
//! A [`Display`] is the single writer for one panel: it owns the bus
//! transport exclusively and runs one logical operation at a time, so the
//! framed byte streams of two operations can never interleave on the bus.
//! The controller has no transaction boundaries of its own; this ordering
//! is the driver's core correctness property.
//!
//! Every operation takes `&mut self`, so exclusivity for the full
//! operation is enforced by the type system. To share a session between
//! concurrent callers, wrap it in a mutex and hold the lock for the whole
//! call, not per write.
//!
//! A failed bus write aborts the remaining writes of the current operation
//! and is returned to the caller; the session stays open. The panel may be
//! left partially updated - there is no rollback and no retry.

use log::{debug, trace};

use crate::command;
use crate::config::Config;
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::render::{Backend, Request, SoftwarePipeline};

/// Session lifecycle. `Closed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Open,
    Closed,
}

/// An open session with one SSD1306 panel
///
/// Created by [`Display::open`], which runs the initialization sequence
/// against the bus; if that write fails, no session exists. The backend
/// parameter selects the rendering path once, at open time: the default
/// [`SoftwarePipeline`], or an accelerated implementation of the same
/// [`Backend`] contract.
pub struct Display<I, B = SoftwarePipeline> {
    /// Bus transport, exclusively owned
    interface: I,
    /// Address, dimensions, initial contrast
    config: Config,
    /// Rendering path selected at open time
    backend: B,
    /// Lifecycle flag checked before every operation
    state: State,
}

impl<I> Display<I, SoftwarePipeline>
where
    I: DisplayInterface,
{
    /// Open a session using the software rendering path
    ///
    /// Sends the initialization sequence. On a failed write the error is
    /// returned and no session exists.
    pub fn open(interface: I, config: Config) -> Result<Self, Error<I>> {
        Self::open_with_backend(interface, config, SoftwarePipeline)
    }
}

impl<I, B> Display<I, B>
where
    I: DisplayInterface,
    B: Backend<I>,
{
    /// Open a session with an explicit backend
    pub fn open_with_backend(
        mut interface: I,
        config: Config,
        mut backend: B,
    ) -> Result<Self, Error<I>> {
        backend.open(&mut interface, &config)?;
        debug!(
            "ssd1306 session open: {}x{} at {:#04X}",
            config.dimensions.cols, config.dimensions.rows, config.address
        );
        Ok(Self {
            interface,
            config,
            backend,
            state: State::Open,
        })
    }

    /// Execute one render request
    ///
    /// This is the generic entry point behind the named operations. The
    /// request runs to completion (all constituent bus writes, in order)
    /// before this returns; no other operation on this session can start
    /// in between.
    pub fn apply(&mut self, request: Request<'_>) -> Result<(), Error<I>> {
        if self.state == State::Closed {
            return Err(Error::Closed);
        }
        trace!("ssd1306 request: {request:?}");
        self.backend.run(&mut self.interface, &self.config, request)
    }

    /// Blank the entire display
    pub fn clear(&mut self) -> Result<(), Error<I>> {
        self.apply(Request::Clear)
    }

    /// Render ASCII text from the top-left corner
    ///
    /// `\n` advances to the next page; bytes outside the glyph table
    /// render as blank cells. Lines longer than the display width are not
    /// wrapped - the controller's column counter runs on.
    pub fn set_text(&mut self, text: &str) -> Result<(), Error<I>> {
        self.apply(Request::Text(text))
    }

    /// Render a row-major, MSB-first 1-bit bitmap from the top-left corner
    pub fn set_bitmap(&mut self, data: &[u8], width: u16, height: u16) -> Result<(), Error<I>> {
        self.apply(Request::Bitmap {
            data,
            width,
            height,
        })
    }

    /// Render a pre-rendered QR payload (byte 0 = modules per side)
    pub fn set_qrcode(&mut self, payload: &[u8]) -> Result<(), Error<I>> {
        self.apply(Request::QrCode(payload))
    }

    /// Set the contrast register
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContrastOutOfRange`] for values above 255, before
    /// any bus write is attempted.
    pub fn set_contrast(&mut self, value: u16) -> Result<(), Error<I>> {
        self.apply(Request::SetContrast(value))
    }

    /// Switch between inverted and normal display mode
    pub fn set_inversion(&mut self, enabled: bool) -> Result<(), Error<I>> {
        self.apply(Request::SetInversion(enabled))
    }

    /// Close the session
    ///
    /// Sends display-off and marks the session closed; every subsequent
    /// operation fails with [`Error::Closed`] without touching the bus.
    /// The session is marked closed even if the display-off write fails.
    pub fn close(&mut self) -> Result<(), Error<I>> {
        if self.state == State::Closed {
            return Err(Error::Closed);
        }
        self.state = State::Closed;
        debug!("ssd1306 session closed");
        self.interface
            .write(self.config.address, &command::display_off())
            .map_err(Error::Interface)
    }

    /// Whether the session is still open
    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// The configuration this session was opened with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the session and return the bus transport
    pub fn release(self) -> I {
        self.interface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Dimensions};
    use crate::font;
    use alloc::vec::Vec;
    use std::sync::{Arc, Mutex};

    /// Records every frame; shareable so tests keep a handle after the
    /// display takes ownership.
    #[derive(Debug, Clone, Default)]
    struct SharedRecorder {
        frames: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl SharedRecorder {
        fn frames(&self) -> Vec<Vec<u8>> {
            self.frames.lock().unwrap().clone()
        }
    }

    impl DisplayInterface for SharedRecorder {
        type Error = core::convert::Infallible;

        fn write(&mut self, _address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            self.frames.lock().unwrap().push(bytes.to_vec());
            Ok(())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct BusError;

    /// Fails every write once `remaining` hits zero.
    #[derive(Debug)]
    struct FlakyInterface {
        remaining: usize,
        frames: Vec<Vec<u8>>,
    }

    impl DisplayInterface for FlakyInterface {
        type Error = BusError;

        fn write(&mut self, _address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.remaining == 0 {
                return Err(BusError);
            }
            self.remaining -= 1;
            self.frames.push(bytes.to_vec());
            Ok(())
        }
    }

    fn test_config() -> Config {
        Builder::new()
            .dimensions(Dimensions::new(128, 64).unwrap())
            .build()
            .unwrap()
    }

    fn open_display() -> (Display<SharedRecorder>, SharedRecorder) {
        let recorder = SharedRecorder::default();
        let display = Display::open(recorder.clone(), test_config()).unwrap();
        (display, recorder)
    }

    #[test]
    fn test_open_sends_init_sequence() {
        let (display, recorder) = open_display();
        assert!(display.is_open());
        let frames = recorder.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), command::INIT_SEQUENCE_LEN);
        assert_eq!(frames[0][0], command::CTRL_COMMAND_STREAM);
    }

    #[test]
    fn test_failed_init_means_no_session() {
        let interface = FlakyInterface {
            remaining: 0,
            frames: Vec::new(),
        };
        let result = Display::open(interface, test_config());
        assert!(matches!(result, Err(Error::Interface(BusError))));
    }

    #[test]
    fn test_operations_after_close_fail_without_bus_writes() {
        let (mut display, recorder) = open_display();
        display.close().unwrap();
        assert!(!display.is_open());
        let frames_after_close = recorder.frames().len();

        assert!(matches!(display.clear(), Err(Error::Closed)));
        assert!(matches!(display.set_text("x"), Err(Error::Closed)));
        assert!(matches!(display.set_contrast(10), Err(Error::Closed)));
        assert!(matches!(display.close(), Err(Error::Closed)));
        assert_eq!(recorder.frames().len(), frames_after_close);
    }

    #[test]
    fn test_close_sends_display_off() {
        let (mut display, recorder) = open_display();
        display.close().unwrap();
        let frames = recorder.frames();
        assert_eq!(frames.last().unwrap(), &alloc::vec![0x00, 0xAE]);
    }

    #[test]
    fn test_clear_emits_one_write_per_page() {
        let (mut display, recorder) = open_display();
        display.clear().unwrap();
        // init frame + 8 pages on a 64-row panel
        assert_eq!(recorder.frames().len(), 1 + 8);
    }

    #[test]
    fn test_midway_transport_failure_leaves_session_open() {
        let interface = FlakyInterface {
            // init + cursor reset + first glyph succeed, second glyph fails
            remaining: 3,
            frames: Vec::new(),
        };
        let mut display = Display::open(interface, test_config()).unwrap();

        let result = display.set_text("AB");
        assert!(matches!(result, Err(Error::Interface(BusError))));
        assert!(display.is_open());

        // The aborted operation performed exactly the writes that succeeded.
        let frames = display.release().frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(&frames[2][1..], font::glyph(b'A').unwrap());
    }

    #[test]
    fn test_contrast_out_of_range_is_rejected_before_the_bus() {
        let (mut display, recorder) = open_display();
        let before = recorder.frames().len();
        assert!(matches!(
            display.set_contrast(256),
            Err(Error::ContrastOutOfRange { value: 256 })
        ));
        assert_eq!(recorder.frames().len(), before);

        display.set_contrast(255).unwrap();
        assert_eq!(recorder.frames().last().unwrap(), &alloc::vec![0x00, 0x81, 0xFF]);
    }

    #[test]
    fn test_release_returns_the_transport() {
        let (display, recorder) = open_display();
        let interface = display.release();
        assert_eq!(interface.frames().len(), recorder.frames().len());
    }

    /// A backend that declines everything, standing in for an accelerated
    /// path with a partial operation set.
    struct DecliningBackend;

    impl<I: DisplayInterface> Backend<I> for DecliningBackend {
        fn open(&mut self, _interface: &mut I, _config: &Config) -> Result<(), Error<I>> {
            Ok(())
        }

        fn run(
            &mut self,
            _interface: &mut I,
            _config: &Config,
            _request: Request<'_>,
        ) -> Result<(), Error<I>> {
            Err(Error::Unsupported)
        }
    }

    #[test]
    fn test_backend_may_decline_requests() {
        let recorder = SharedRecorder::default();
        let mut display =
            Display::open_with_backend(recorder.clone(), test_config(), DecliningBackend).unwrap();
        assert!(matches!(display.set_qrcode(&[1, 1]), Err(Error::Unsupported)));
        assert!(recorder.frames().is_empty());
        assert!(display.is_open());
    }

    #[test]
    fn test_concurrent_set_text_never_interleaves() {
        let (display, recorder) = open_display();
        let shared = Arc::new(Mutex::new(display));

        let mut handles = Vec::new();
        for text in ["AA", "BB"] {
            let shared = Arc::clone(&shared);
            handles.push(std::thread::spawn(move || {
                shared.lock().unwrap().set_text(text).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Skip the init frame; what remains is two operations of three
        // frames each (cursor reset + two glyphs).
        let frames = recorder.frames();
        let ops = &frames[1..];
        assert_eq!(ops.len(), 6);

        let reset = [0x00u8, 0x00, 0x10, 0xB0];
        assert_eq!(ops[0], reset);
        assert_eq!(ops[3], reset);

        // Within each operation both glyph frames belong to the same
        // caller, so the two byte streams reconstruct without overlap.
        assert_eq!(ops[1], ops[2]);
        assert_eq!(ops[4], ops[5]);
        let glyph_a = command::glyph_frame(font::glyph(b'A').unwrap()).to_vec();
        let glyph_b = command::glyph_frame(font::glyph(b'B').unwrap()).to_vec();
        assert!(
            (ops[1] == glyph_a && ops[4] == glyph_b)
                || (ops[1] == glyph_b && ops[4] == glyph_a)
        );
    }
}
