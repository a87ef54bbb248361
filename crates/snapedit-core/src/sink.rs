//! Destination for composed live frames (a video encoder in practice).

use crate::error::{Result, SnapEditError};
use crate::pixel::PixelBuffer;

/// Receives composed frames in presentation order.
///
/// `begin` is called once with the dimensions every following frame will
/// have; `finish` flushes and closes the output. A sink is not reused after
/// `finish`.
pub trait FrameSink {
    /// Open the output for frames of the given size.
    fn begin(&mut self, width: u32, height: u32) -> Result<()>;

    /// Append one frame.
    fn write_frame(&mut self, frame: &PixelBuffer) -> Result<()>;

    /// Flush and close the output.
    fn finish(&mut self) -> Result<()>;

    /// Short description for logs (e.g. the output path).
    fn describe(&self) -> String {
        "frame sink".into()
    }
}

/// Sink that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    size: Option<(u32, u32)>,
    frames: Vec<PixelBuffer>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[PixelBuffer] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }
}

impl FrameSink for MemorySink {
    fn begin(&mut self, width: u32, height: u32) -> Result<()> {
        if self.size.is_some() {
            return Err(SnapEditError::Recording("sink already started".into()));
        }
        self.size = Some((width, height));
        Ok(())
    }

    fn write_frame(&mut self, frame: &PixelBuffer) -> Result<()> {
        match self.size {
            None => Err(SnapEditError::Recording("sink not started".into())),
            Some(_) if self.finished => Err(SnapEditError::Recording("sink already finished".into())),
            Some(size) if size != frame.dimensions() => Err(SnapEditError::DimensionMismatch {
                expected: format!("{}x{}", size.0, size.1),
                got: format!("{}x{}", frame.width(), frame.height()),
            }),
            Some(_) => {
                self.frames.push(frame.clone());
                Ok(())
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory sink ({} frames)", self.frames.len())
    }
}
