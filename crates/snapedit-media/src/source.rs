//! Live frame source decoded by FFmpeg via ffmpeg-sidecar.
//!
//! Stands in for a webcam: any input FFmpeg can open (a file, or a capture
//! device with its demuxer name) is decoded to raw RGB and handed out as BGR
//! pixel buffers.

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use snapedit_core::{ChannelLayout, PixelBuffer, Result, SnapEditError};
use tracing::{debug, info, warn};

/// Sequential decoder producing BGR frames.
pub struct VideoFrameSource {
    input: String,
    child: FfmpegChild,
    events: FfmpegIterator,
    frames_read: u64,
    max_frames: Option<u64>,
    done: bool,
}

impl VideoFrameSource {
    /// Open a file (or URL) for decoding.
    pub fn open(input: impl Into<String>) -> Result<Self> {
        Self::spawn(input.into(), None)
    }

    /// Open a capture device, e.g. `("v4l2", "/dev/video0")`.
    pub fn open_device(format: &str, device: impl Into<String>) -> Result<Self> {
        Self::spawn(device.into(), Some(format))
    }

    fn spawn(input: String, format: Option<&str>) -> Result<Self> {
        info!(input = %input, format = format.unwrap_or("auto"), "Opening video source");

        let mut command = FfmpegCommand::new();
        if let Some(format) = format {
            command.format(format);
        }
        command.input(&input).rawvideo();

        let mut child = command
            .spawn()
            .map_err(|e| SnapEditError::Decode(format!("Failed to spawn ffmpeg: {e}")))?;
        let events = child
            .iter()
            .map_err(|e| SnapEditError::Decode(format!("Failed to read ffmpeg output: {e}")))?;

        Ok(Self {
            input,
            child,
            events,
            frames_read: 0,
            max_frames: None,
            done: false,
        })
    }

    /// Stop after `limit` frames.
    pub fn with_max_frames(mut self, limit: u64) -> Self {
        self.max_frames = Some(limit);
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Frames handed out so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Decode the next frame; `Ok(None)` at end of stream.
    pub fn next_frame(&mut self) -> Result<Option<PixelBuffer>> {
        if self.done || self.max_frames.is_some_and(|max| self.frames_read >= max) {
            return Ok(None);
        }

        for event in self.events.by_ref() {
            match event {
                FfmpegEvent::OutputFrame(frame) => {
                    let buffer = rgb24_to_bgr(frame.width, frame.height, frame.data)?;
                    self.frames_read += 1;
                    return Ok(Some(buffer));
                }
                FfmpegEvent::Error(message) => {
                    self.done = true;
                    return Err(SnapEditError::Decode(format!("{}: {message}", self.input)));
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) => {
                    warn!(input = %self.input, %message, "ffmpeg error");
                }
                FfmpegEvent::Done => break,
                _ => {}
            }
        }

        self.done = true;
        debug!(input = %self.input, frames = self.frames_read, "Video source exhausted");
        if self.frames_read == 0 {
            return Err(SnapEditError::Decode(format!(
                "{}: no frames decoded",
                self.input
            )));
        }
        Ok(None)
    }
}

impl Iterator for VideoFrameSource {
    type Item = Result<PixelBuffer>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

impl Drop for VideoFrameSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Reorder packed RGB samples into a BGR buffer.
pub fn rgb24_to_bgr(width: u32, height: u32, mut data: Vec<u8>) -> Result<PixelBuffer> {
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    PixelBuffer::from_raw(width, height, ChannelLayout::Bgr, data)
}
