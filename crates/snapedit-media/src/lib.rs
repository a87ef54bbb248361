//! SnapEdit Media - image files and FFmpeg video I/O
//!
//! This crate handles:
//! - Still image decode/encode to BGR/BGRA buffers
//! - Loading the sticker catalog from disk
//! - Recording composed frames through FFmpeg
//! - Decoding video files or capture devices into frames

pub mod catalog;
pub mod image_io;
pub mod recorder;
pub mod source;

pub use catalog::{load_catalog, load_catalog_dir};
pub use image_io::{load_pixel_buffer, save_pixel_buffer};
pub use recorder::{FfmpegRecorder, RecordSettings, VideoCodec};
pub use source::VideoFrameSource;
