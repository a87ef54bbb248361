//! Still image decode/encode through the `image` crate.
//!
//! Buffers come back as BGR when the source is opaque and BGRA when the
//! source format carries alpha.

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use snapedit_core::{ChannelLayout, PixelBuffer, Result, SnapEditError};
use std::path::Path;
use tracing::debug;

/// Decode a raster file into a pixel buffer.
pub fn load_pixel_buffer<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SnapEditError::NotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }
    let img = image::open(path)
        .map_err(|e| SnapEditError::Decode(format!("{}: {e}", path.display())))?;
    let buffer = from_dynamic(&img)?;
    debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        layout = ?buffer.layout(),
        "Image loaded"
    );
    Ok(buffer)
}

/// Encode a pixel buffer; the format follows the file extension.
///
/// Alpha is dropped for formats that cannot store it.
pub fn save_pixel_buffer<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)
        .map_err(|e| SnapEditError::Encode(format!("{}: {e}", path.display())))?;

    let mut img = to_dynamic(buffer)?;
    if buffer.layout().has_alpha() && !stores_alpha(format) {
        img = DynamicImage::ImageRgb8(img.to_rgb8());
    }
    img.save_with_format(path, format)
        .map_err(|e| SnapEditError::Encode(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), ?format, "Image saved");
    Ok(())
}

fn stores_alpha(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Tiff | ImageFormat::WebP
    )
}

/// Convert a decoded image into BGR or BGRA samples.
pub fn from_dynamic(img: &DynamicImage) -> Result<PixelBuffer> {
    let (w, h) = (img.width(), img.height());
    if img.color().has_alpha() {
        let data = img
            .to_rgba8()
            .pixels()
            .flat_map(|p| [p[2], p[1], p[0], p[3]])
            .collect();
        PixelBuffer::from_raw(w, h, ChannelLayout::Bgra, data)
    } else {
        let data = img
            .to_rgb8()
            .pixels()
            .flat_map(|p| [p[2], p[1], p[0]])
            .collect();
        PixelBuffer::from_raw(w, h, ChannelLayout::Bgr, data)
    }
}

/// Convert a pixel buffer into an RGB or RGBA image.
pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage> {
    let (w, h) = buffer.dimensions();
    let invalid = || SnapEditError::Encode(format!("buffer does not match {w}x{h}"));
    match buffer.layout() {
        ChannelLayout::Bgr => {
            let data = buffer
                .as_bytes()
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect();
            RgbImage::from_raw(w, h, data)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(invalid)
        }
        ChannelLayout::Bgra => {
            let data = buffer
                .as_bytes()
                .chunks_exact(4)
                .flat_map(|px| [px[2], px[1], px[0], px[3]])
                .collect();
            RgbaImage::from_raw(w, h, data)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(invalid)
        }
    }
}
