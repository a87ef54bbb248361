//! Built-in image filters.
//!
//! Every filter is pure: it reads the input buffer and returns a new one of
//! the same size and layout. Color channels saturate instead of wrapping and
//! an alpha channel, if present, is copied through untouched.

use rayon::prelude::*;
use snapedit_core::PixelBuffer;

use crate::colormap::{self, ColorLut};
use crate::kernels;
use crate::ImageFilter;

/// Apply `f` to the three color samples of every pixel, rows in parallel.
///
/// `f` receives the source BGR triple and writes the destination triple.
pub(crate) fn map_pixels<F>(image: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(&[u8], &mut [u8]) + Sync,
{
    let mut out = image.clone();
    if image.is_empty() {
        return out;
    }
    let cn = image.channels();
    let stride = image.stride();
    let src = image.as_bytes();
    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(dst_row, src_row)| {
            for (d, s) in dst_row.chunks_exact_mut(cn).zip(src_row.chunks_exact(cn)) {
                f(&s[..3], &mut d[..3]);
            }
        });
    out
}

/// Pass-through filter.
pub struct Identity;

impl ImageFilter for Identity {
    fn name(&self) -> &str {
        "Original"
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        image.clone()
    }
}

/// Luma expanded back to three equal channels.
pub struct Grayscale;

impl ImageFilter for Grayscale {
    fn name(&self) -> &str {
        "Grayscale"
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        map_pixels(image, |s, d| {
            let y = colormap::luma(s[0], s[1], s[2]);
            d.fill(y);
        })
    }
}

/// `255 - value` on every color channel.
pub struct Invert {
    name: String,
}

impl Invert {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ImageFilter for Invert {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        map_pixels(image, |s, d| {
            for (dv, sv) in d.iter_mut().zip(s) {
                *dv = 255 - sv;
            }
        })
    }
}

/// Square Gaussian blur.
pub struct GaussianBlur {
    name: String,
    pub ksize: usize,
    /// Non-positive values derive sigma from the kernel size.
    pub sigma: f64,
}

impl GaussianBlur {
    pub fn new(name: impl Into<String>, ksize: usize, sigma: f64) -> Self {
        Self {
            name: name.into(),
            ksize,
            sigma,
        }
    }
}

impl ImageFilter for GaussianBlur {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        kernels::gaussian_blur(image, self.ksize, self.sigma)
    }
}

/// False color: luma looked up in a 256-entry BGR table.
pub struct ColorMap {
    name: String,
    lut: Box<ColorLut>,
}

impl ColorMap {
    pub fn new(name: impl Into<String>, lut: ColorLut) -> Self {
        Self {
            name: name.into(),
            lut: Box::new(lut),
        }
    }

    pub fn lut(&self) -> &ColorLut {
        &self.lut
    }
}

impl ImageFilter for ColorMap {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        let lut = &*self.lut;
        map_pixels(image, |s, d| {
            let y = colormap::luma(s[0], s[1], s[2]);
            d.copy_from_slice(&lut[y as usize]);
        })
    }
}

/// 3x3 linear mix; row `c` of the matrix produces output channel `c`.
///
/// Rows and columns follow buffer order (blue, green, red).
pub struct ColorMatrix {
    name: String,
    matrix: [[f32; 3]; 3],
}

impl ColorMatrix {
    pub fn new(name: impl Into<String>, matrix: [[f32; 3]; 3]) -> Self {
        Self {
            name: name.into(),
            matrix,
        }
    }

    /// Classic sepia tone.
    pub fn sepia(name: impl Into<String>) -> Self {
        Self::new(
            name,
            [
                [0.272, 0.534, 0.131],
                [0.349, 0.686, 0.168],
                [0.393, 0.769, 0.189],
            ],
        )
    }
}

impl ImageFilter for ColorMatrix {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        let m = self.matrix;
        map_pixels(image, |s, d| {
            let (b, g, r) = (s[0] as f32, s[1] as f32, s[2] as f32);
            for (c, row) in m.iter().enumerate() {
                let v = row[0] * b + row[1] * g + row[2] * r;
                d[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        })
    }
}

/// Uniform additive boost, saturating at 255.
pub struct Brightness {
    name: String,
    pub amount: u8,
}

impl Brightness {
    pub fn new(name: impl Into<String>, amount: u8) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

impl ImageFilter for Brightness {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        let amount = self.amount;
        map_pixels(image, |s, d| {
            for (dv, sv) in d.iter_mut().zip(s) {
                *dv = sv.saturating_add(amount);
            }
        })
    }
}

/// Edge-preserving smoothing.
pub struct Bilateral {
    name: String,
    pub diameter: i32,
    pub sigma_color: f64,
    pub sigma_space: f64,
}

impl Bilateral {
    pub fn new(name: impl Into<String>, diameter: i32, sigma_color: f64, sigma_space: f64) -> Self {
        Self {
            name: name.into(),
            diameter,
            sigma_color,
            sigma_space,
        }
    }
}

impl ImageFilter for Bilateral {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        kernels::bilateral_filter(image, self.diameter, self.sigma_color, self.sigma_space)
    }
}

/// The same 256-entry curve applied to each color channel.
pub struct ToneCurve {
    name: String,
    lut: [u8; 256],
}

impl ToneCurve {
    pub fn new(name: impl Into<String>, lut: [u8; 256]) -> Self {
        Self {
            name: name.into(),
            lut,
        }
    }

    /// `min(i + offset, 255)`.
    pub fn lift(name: impl Into<String>, offset: u8) -> Self {
        let mut lut = [0u8; 256];
        for (i, v) in lut.iter_mut().enumerate() {
            *v = (i as u8).saturating_add(offset);
        }
        Self::new(name, lut)
    }
}

impl ImageFilter for ToneCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        let lut = &self.lut;
        map_pixels(image, |s, d| {
            for (dv, sv) in d.iter_mut().zip(s) {
                *dv = lut[*sv as usize];
            }
        })
    }
}
