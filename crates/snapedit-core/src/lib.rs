//! SnapEdit Core - Foundation types for sticker compositing
//!
//! This crate provides the fundamental types used throughout SnapEdit:
//! - Pixel buffers and channel layouts
//! - Integer geometry for placement, clipping and display mapping
//! - Frame timing for live capture and recording
//! - The frame sink seam used by recorders

pub mod error;
pub mod geometry;
pub mod pixel;
pub mod sink;
pub mod time;

pub use error::{Result, SnapEditError};
pub use geometry::{PixelRect, ViewTransform};
pub use pixel::{ChannelLayout, PixelBuffer};
pub use sink::{FrameSink, MemorySink};
pub use time::FrameRate;
