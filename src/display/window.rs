//! Headless display resource.
//!
//! A [`Display`] keeps the last frame shown on it and the input state a window would
//! report. Input arrives as [`DisplayEvent`]s sent through a [`DisplayController`]; the
//! blocking `wait` calls consume them.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::pixel::buffer::Image;
use crate::registry::handle::{Resource, ResourceKind};

/// Input delivered to a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Mouse button bit mask (0 = released).
    Button(u32),
    /// Pointer moved; `-1` on both axes means outside the window.
    Mouse {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// The window was closed.
    Close,
}

/// Sending side of a display's event queue.
#[derive(Clone, Debug)]
pub struct DisplayController {
    tx: Sender<DisplayEvent>,
}

impl DisplayController {
    /// Queue `event`. Fails once the display has been released.
    pub fn send(&self, event: DisplayEvent) -> BridgeResult<()> {
        self.tx
            .send(event)
            .map_err(|_| BridgeError::invalid_handle("display was released"))
    }
}

/// How frame values are scaled for viewing (0 none, 1 always, 2 once, 3 auto).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Normalization(u32);

impl Normalization {
    /// Validate a mode code.
    pub fn from_code(code: u32) -> BridgeResult<Self> {
        if code > 3 {
            return Err(BridgeError::bad_argument(format!(
                "display normalization must be 0..=3, got {code}"
            )));
        }
        Ok(Self(code))
    }

    /// Mode code.
    pub fn code(self) -> u32 {
        self.0
    }
}

/// Window state without a window.
#[derive(Debug)]
pub struct Display {
    title: String,
    normalization: Normalization,
    fullscreen: bool,
    frame: Image,
    button: u32,
    mouse: (i32, i32),
    closed: bool,
    tx: Sender<DisplayEvent>,
    rx: Receiver<DisplayEvent>,
}

impl Resource for Display {
    const KIND: ResourceKind = ResourceKind::Display;
}

impl Display {
    /// Open a display showing `frame`.
    pub fn new(
        frame: Image,
        title: impl Into<String>,
        normalization: Normalization,
        fullscreen: bool,
        closed: bool,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            title: title.into(),
            normalization,
            fullscreen,
            frame,
            button: 0,
            mouse: (-1, -1),
            closed,
            tx,
            rx,
        }
    }

    /// Handle for feeding input events.
    pub fn controller(&self) -> DisplayController {
        DisplayController {
            tx: self.tx.clone(),
        }
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Normalization mode.
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Fullscreen flag.
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Last frame shown.
    pub fn frame(&self) -> &Image {
        &self.frame
    }

    /// Replace the shown frame; showing reopens a closed display.
    pub fn show(&mut self, frame: &Image) {
        self.frame.clone_from(frame);
        self.closed = false;
    }

    /// Closed by the user or created closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Current button mask.
    pub fn button(&self) -> u32 {
        self.button
    }

    /// Pointer column, `-1` when outside.
    pub fn mouse_x(&self) -> i32 {
        self.mouse.0
    }

    /// Pointer row, `-1` when outside.
    pub fn mouse_y(&self) -> i32 {
        self.mouse.1
    }

    fn apply(&mut self, event: DisplayEvent) {
        tracing::trace!(?event, title = %self.title, "display event");
        match event {
            DisplayEvent::Button(mask) => self.button = mask,
            DisplayEvent::Mouse { x, y } => self.mouse = (x, y),
            DisplayEvent::Close => self.closed = true,
        }
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Block until at least one event arrives; returns at once when closed.
    pub fn wait(&mut self) {
        if self.closed {
            self.drain();
            return;
        }
        if let Ok(event) = self.rx.recv() {
            self.apply(event);
        }
        self.drain();
    }

    /// Like [`Display::wait`], giving up after `ms` milliseconds.
    pub fn wait_time(&mut self, ms: u32) {
        if self.closed {
            self.drain();
            return;
        }
        match self.rx.recv_timeout(Duration::from_millis(u64::from(ms))) {
            Ok(event) => self.apply(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
        }
        self.drain();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/window.rs"]
mod tests;
