//! Frame timing for live capture and recording.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        self.numerator as f64 / self.denominator as f64
    }

    /// Wall-clock interval between two frames; zero for a degenerate rate.
    pub fn frame_interval(self) -> Duration {
        if self.numerator == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.denominator as u64 * 1_000_000_000 / self.numerator as u64)
    }

    /// Seconds covered by `frames` frames at this rate.
    pub fn seconds_for(self, frames: u64) -> f64 {
        let fps = self.to_fps_f64();
        if fps == 0.0 {
            return 0.0;
        }
        frames as f64 / fps
    }

    /// `num/den` form understood by ffmpeg's `-framerate`.
    pub fn to_ffmpeg_arg(self) -> String {
        format!("{}/{}", self.numerator, self.denominator)
    }

    /// Common frame rates
    pub const FPS_15: Self = Self::new(15, 1);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
