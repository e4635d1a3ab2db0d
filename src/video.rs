//! Video frame plumbing
//!
//! The camera and the display are external collaborators behind narrow
//! traits: a [`FrameSource`] yields one frame per call, a [`FrameSink`]
//! presents a composited frame and reports whether the user asked to quit
//! the display. The session's display sub-loop is the only consumer.

use image::{Rgb, RgbImage};

use crate::Result;

/// A video frame pixel buffer
pub type Frame = RgbImage;

/// What the sink observed while presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    /// Keep displaying
    Continue,
    /// User requested to close the display
    QuitRequested,
}

/// Produces video frames, one per call
pub trait FrameSource: Send {
    /// Pull the next frame, or `None` at end of stream
    ///
    /// # Errors
    ///
    /// Returns error if the capture device fails
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Presents composited frames
pub trait FrameSink: Send {
    /// Display one frame
    ///
    /// # Errors
    ///
    /// Returns error if presentation fails
    fn present(&mut self, frame: &Frame) -> Result<SinkEvent>;
}

/// Synthetic frame source for overlay diagnostics and tests
///
/// Produces a slowly shifting gradient so composited output is visually
/// distinguishable frame to frame.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u32,
}

impl TestPatternSource {
    /// Create a source producing frames of the given size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }
}

impl FrameSource for TestPatternSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let tick = self.tick;
        self.tick = self.tick.wrapping_add(1);

        #[allow(clippy::cast_possible_truncation)]
        let frame = RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb([
                ((x + tick) % 256) as u8,
                ((y + tick) % 256) as u8,
                (tick % 256) as u8,
            ])
        });

        Ok(Some(frame))
    }
}

/// Sink that drops frames, counting them
///
/// Useful on headless machines where no display is available.
pub struct NullSink {
    presented: u64,
}

impl NullSink {
    /// Create a new counting sink
    #[must_use]
    pub fn new() -> Self {
        Self { presented: 0 }
    }

    /// Number of frames presented so far
    #[must_use]
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame) -> Result<SinkEvent> {
        self.presented += 1;
        Ok(SinkEvent::Continue)
    }
}
