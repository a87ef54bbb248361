//! Pixel buffers for still images, camera frames and overlays in CPU memory.
//!
//! Samples are 8 bits per channel, row-major and tightly packed (no row
//! padding). Channel order is blue, green, red and optionally alpha.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapEditError};

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChannelLayout {
    /// 8-bit BGR, opaque (24 bits per pixel)
    #[default]
    Bgr,
    /// 8-bit BGRA, alpha in the fourth channel (32 bits per pixel)
    Bgra,
}

impl ChannelLayout {
    /// Number of channels per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            Self::Bgr => 3,
            Self::Bgra => 4,
        }
    }

    /// Whether the fourth channel carries an alpha mask.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Bgra)
    }

    /// Layout for a channel count, if supported.
    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            3 => Some(Self::Bgr),
            4 => Some(Self::Bgra),
            _ => None,
        }
    }

    /// Calculate total bytes needed for a buffer of this layout.
    pub fn buffer_size(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.channels()
    }
}

/// A fixed-size grid of 8-bit color samples.
///
/// Every buffer owns its samples; cloning produces an independent copy, so
/// a snapshot never aliases the canvas it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zeroed buffer (black, and fully transparent for BGRA).
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Self {
        Self {
            width,
            height,
            layout,
            data: vec![0u8; layout.buffer_size(width, height)],
        }
    }

    /// Wrap raw samples, checking that the length matches the dimensions.
    pub fn from_raw(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = layout.buffer_size(width, height);
        if data.len() != expected {
            return Err(SnapEditError::DimensionMismatch {
                expected: format!("{expected} bytes for {width}x{height} {layout:?}"),
                got: format!("{} bytes", data.len()),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// A BGR buffer filled with one color.
    pub fn solid_bgr(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let mut buffer = Self::new(width, height, ChannelLayout::Bgr);
        for px in buffer.data.chunks_exact_mut(3) {
            px.copy_from_slice(&bgr);
        }
        buffer
    }

    /// A BGRA buffer filled with one color.
    pub fn solid_bgra(width: u32, height: u32, bgra: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height, ChannelLayout::Bgra);
        for px in buffer.data.chunks_exact_mut(4) {
            px.copy_from_slice(&bgra);
        }
        buffer
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels()
    }

    /// True when the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when both buffers have the same width and height.
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Total memory usage of the samples in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Get a mutable row of pixel data.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Samples of one pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        Some(&self.data[start..start + c])
    }

    /// Mutable samples of one pixel, or `None` outside the buffer.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        Some(&mut self.data[start..start + c])
    }

    /// Opaque copy; alpha is dropped.
    pub fn to_bgr(&self) -> PixelBuffer {
        match self.layout {
            ChannelLayout::Bgr => self.clone(),
            ChannelLayout::Bgra => {
                let data = self
                    .data
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                Self {
                    width: self.width,
                    height: self.height,
                    layout: ChannelLayout::Bgr,
                    data,
                }
            }
        }
    }

    /// Copy with an alpha channel; opaque sources get alpha 255.
    pub fn to_bgra(&self) -> PixelBuffer {
        match self.layout {
            ChannelLayout::Bgra => self.clone(),
            ChannelLayout::Bgr => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .flat_map(|px| [px[0], px[1], px[2], 255])
                    .collect();
                Self {
                    width: self.width,
                    height: self.height,
                    layout: ChannelLayout::Bgra,
                    data,
                }
            }
        }
    }

    /// Nearest-neighbour resample, used for thumbnails and previews.
    pub fn resize_nearest(&self, width: u32, height: u32) -> PixelBuffer {
        let mut out = Self::new(width, height, self.layout);
        if self.is_empty() || width == 0 || height == 0 {
            return out;
        }
        let c = self.channels();
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            let src_row = self.row(sy);
            let dst_row = out.row_mut(y);
            for x in 0..width as usize {
                let sx = x * self.width as usize / width as usize;
                dst_row[x * c..x * c + c].copy_from_slice(&src_row[sx * c..sx * c + c]);
            }
        }
        out
    }

    /// Create a test pattern buffer (color bars), BGR.
    pub fn test_pattern(width: u32, height: u32) -> Self {
        let mut buffer = Self::new(width, height, ChannelLayout::Bgr);
        // White, yellow, cyan, green, magenta, red, blue, black
        let colors: [[u8; 3]; 8] = [
            [255, 255, 255],
            [0, 255, 255],
            [255, 255, 0],
            [0, 255, 0],
            [255, 0, 255],
            [0, 0, 255],
            [255, 0, 0],
            [0, 0, 0],
        ];
        for y in 0..height {
            let row = buffer.row_mut(y);
            for x in 0..width {
                let bar = (x * 8 / width) as usize;
                let i = x as usize * 3;
                row[i..i + 3].copy_from_slice(&colors[bar]);
            }
        }
        buffer
    }
}
