//! Recording composed live frames to a video file.
//!
//! Frames are piped as raw `bgr24` into an FFmpeg sidecar process which
//! encodes and muxes them.

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::{ffmpeg_is_installed, FfmpegCommand};
use serde::{Deserialize, Serialize};
use snapedit_core::{FrameRate, FrameSink, PixelBuffer, Result, SnapEditError};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ChildStdin;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

// ── Settings ────────────────────────────────────────────────────

/// Video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// MPEG-4 Part 2 (`mp4v`).
    #[default]
    Mpeg4,
    H264,
}

impl VideoCodec {
    /// FFmpeg encoder name.
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::Mpeg4 => "mpeg4",
            Self::H264 => "libx264",
        }
    }

    /// FFmpeg option that takes the quality value.
    fn quality_flag(self) -> &'static str {
        match self {
            Self::Mpeg4 => "-q:v",
            Self::H264 => "-crf",
        }
    }

    /// File extension for this codec.
    pub fn extension(self) -> &'static str {
        "mp4"
    }
}

/// Recording configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    pub codec: VideoCodec,
    pub frame_rate: FrameRate,
    /// Codec quality (`-q:v` 1-31 for MPEG-4, CRF 0-51 for H.264; lower is better).
    pub quality: Option<u32>,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self::mp4v()
    }
}

impl RecordSettings {
    /// MPEG-4 at 30 fps, the classic webcam capture setup.
    pub fn mp4v() -> Self {
        Self {
            codec: VideoCodec::Mpeg4,
            frame_rate: FrameRate::FPS_30,
            quality: None,
        }
    }

    /// H.264 at 30 fps.
    pub fn h264() -> Self {
        Self {
            codec: VideoCodec::H264,
            frame_rate: FrameRate::FPS_30,
            quality: Some(18),
        }
    }
}

// ── Recorder ────────────────────────────────────────────────────

struct Running {
    child: FfmpegChild,
    stdin: ChildStdin,
    log_drain: Option<JoinHandle<Vec<String>>>,
    size: (u32, u32),
}

/// [`FrameSink`] that encodes frames with FFmpeg.
pub struct FfmpegRecorder {
    output_path: PathBuf,
    settings: RecordSettings,
    running: Option<Running>,
    frames: u64,
    finished: bool,
}

impl FfmpegRecorder {
    pub fn new(output_path: impl Into<PathBuf>, settings: RecordSettings) -> Self {
        Self {
            output_path: output_path.into(),
            settings,
            running: None,
            frames: 0,
            finished: false,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn settings(&self) -> &RecordSettings {
        &self.settings
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// Build the FFmpeg command arguments for `width` x `height` input.
    pub fn ffmpeg_args(&self, width: u32, height: u32) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();

        // Input from pipe (raw frames)
        args.extend_from_slice(&[
            "-y".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pixel_format".into(),
            "bgr24".into(),
            "-video_size".into(),
            format!("{}x{}", width, height),
            "-framerate".into(),
            self.settings.frame_rate.to_ffmpeg_arg(),
            "-i".into(),
            "pipe:0".into(),
        ]);

        // 4:2:0 output needs even dimensions
        if width % 2 == 1 || height % 2 == 1 {
            args.extend_from_slice(&["-vf".into(), "pad=ceil(iw/2)*2:ceil(ih/2)*2".into()]);
        }

        args.extend_from_slice(&[
            "-c:v".into(),
            self.settings.codec.ffmpeg_encoder().into(),
        ]);
        if self.settings.codec == VideoCodec::Mpeg4 {
            args.extend_from_slice(&["-tag:v".into(), "mp4v".into()]);
        }
        if let Some(quality) = self.settings.quality {
            args.extend_from_slice(&[
                self.settings.codec.quality_flag().into(),
                quality.to_string(),
            ]);
        }

        args.extend_from_slice(&["-pix_fmt".into(), "yuv420p".into()]);
        args.push(self.output_path.to_string_lossy().into_owned());

        args
    }
}

impl FrameSink for FfmpegRecorder {
    fn begin(&mut self, width: u32, height: u32) -> Result<()> {
        if self.running.is_some() || self.finished {
            return Err(SnapEditError::Recording(format!(
                "recorder for {} already started",
                self.output_path.display()
            )));
        }
        if !ffmpeg_is_installed() {
            return Err(SnapEditError::Recording(
                "ffmpeg executable not found".into(),
            ));
        }

        let args = self.ffmpeg_args(width, height);
        debug!(?args, "Spawning ffmpeg encoder");
        let mut child = FfmpegCommand::new()
            .args(&args)
            .spawn()
            .map_err(|e| SnapEditError::Recording(format!("Failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .take_stdin()
            .ok_or_else(|| SnapEditError::Recording("Failed to open ffmpeg stdin".into()))?;

        // Drain stderr so a chatty encoder never blocks on a full pipe
        let log_drain = child.take_stderr().map(|stderr| {
            std::thread::spawn(move || {
                BufReader::new(stderr)
                    .lines()
                    .map_while(std::io::Result::ok)
                    .collect::<Vec<_>>()
            })
        });

        info!(
            path = %self.output_path.display(),
            width,
            height,
            codec = ?self.settings.codec,
            fps = self.settings.frame_rate.to_fps_f64(),
            "Encoder started"
        );
        self.running = Some(Running {
            child,
            stdin,
            log_drain,
            size: (width, height),
        });
        Ok(())
    }

    fn write_frame(&mut self, frame: &PixelBuffer) -> Result<()> {
        let running = self
            .running
            .as_mut()
            .ok_or_else(|| SnapEditError::Recording("recorder not started".into()))?;

        if frame.dimensions() != running.size {
            return Err(SnapEditError::DimensionMismatch {
                expected: format!("{}x{}", running.size.0, running.size.1),
                got: format!("{}x{}", frame.width(), frame.height()),
            });
        }

        let bgr;
        let bytes = if frame.layout().has_alpha() {
            bgr = frame.to_bgr();
            bgr.as_bytes()
        } else {
            frame.as_bytes()
        };
        running
            .stdin
            .write_all(bytes)
            .map_err(|e| SnapEditError::Recording(format!("Failed to write frame: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        let Running {
            mut child,
            stdin,
            log_drain,
            ..
        } = running;

        // Close stdin to signal end-of-stream
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| SnapEditError::Recording(format!("Failed to wait for ffmpeg: {e}")))?;
        let log = log_drain
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            let tail = log.iter().rev().take(5).rev().cloned().collect::<Vec<_>>();
            warn!(stderr = %tail.join("\n"), "ffmpeg reported an error");
            return Err(SnapEditError::Recording(format!(
                "ffmpeg exited with status: {}",
                status
            )));
        }

        info!(
            path = %self.output_path.display(),
            frames = self.frames,
            seconds = self.settings.frame_rate.seconds_for(self.frames),
            "Recording written"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.output_path.display().to_string()
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if let Some(mut running) = self.running.take() {
            warn!(path = %self.output_path.display(), "Recorder dropped while running, stopping ffmpeg");
            let _ = running.child.kill();
            let _ = running.child.wait();
        }
    }
}
