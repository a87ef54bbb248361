//! Sticker compositing onto canvases, camera frames and the live layer.
//!
//! The overlay is centered on the anchor and clipped against the background
//! on all four sides. Placement outside the background is a silent no-op.

use serde::{Deserialize, Serialize};
use snapedit_core::{PixelBuffer, PixelRect};

/// How overlay alpha is combined with the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Hard-edged masked add: background survives where alpha is below 255,
    /// overlay survives where alpha is above 0, and the two are summed with
    /// saturation.
    #[default]
    Masked,
    /// Rounded integer alpha lerp.
    Alpha,
}

/// Where an overlay lands after clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Destination rectangle inside the background.
    pub dst: PixelRect,
    /// Top-left of the matching region inside the overlay.
    pub src_x: u32,
    pub src_y: u32,
}

/// Clip a centered overlay footprint against the background bounds.
pub fn placement(
    background: (u32, u32),
    overlay: (u32, u32),
    anchor_x: i32,
    anchor_y: i32,
) -> Option<Placement> {
    let footprint = PixelRect::from_center_size(anchor_x, anchor_y, overlay.0, overlay.1);
    let dst = footprint.intersect(PixelRect::bounds(background.0, background.1))?;
    Some(Placement {
        dst,
        src_x: (dst.x - footprint.x) as u32,
        src_y: (dst.y - footprint.y) as u32,
    })
}

/// Stateless compositor configured with a blend mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compositor {
    pub mode: BlendMode,
}

impl Compositor {
    pub fn new(mode: BlendMode) -> Self {
        Self { mode }
    }

    /// Draw `overlay` centered at the anchor into `background`.
    ///
    /// Returns the rectangle written, or `None` when nothing overlapped.
    pub fn blend(
        &self,
        background: &mut PixelBuffer,
        overlay: &PixelBuffer,
        anchor_x: i32,
        anchor_y: i32,
    ) -> Option<PixelRect> {
        blend(background, overlay, anchor_x, anchor_y, self.mode)
    }

    /// Copy-returning variant of [`Compositor::blend`].
    pub fn blended(
        &self,
        background: &PixelBuffer,
        overlay: &PixelBuffer,
        anchor_x: i32,
        anchor_y: i32,
    ) -> PixelBuffer {
        let mut out = background.clone();
        blend(&mut out, overlay, anchor_x, anchor_y, self.mode);
        out
    }

    /// Composite a full-frame layer (same size as `frame`) at the origin.
    pub fn overlay_full(&self, frame: &mut PixelBuffer, layer: &PixelBuffer) -> Option<PixelRect> {
        let (w, h) = layer.dimensions();
        blend(frame, layer, (w / 2) as i32, (h / 2) as i32, self.mode)
    }
}

/// Draw `overlay` centered at `(anchor_x, anchor_y)` into `background`.
///
/// A 3-channel overlay behaves as fully opaque. With a 4-channel background
/// its alpha channel accumulates coverage by the same rule.
pub fn blend(
    background: &mut PixelBuffer,
    overlay: &PixelBuffer,
    anchor_x: i32,
    anchor_y: i32,
    mode: BlendMode,
) -> Option<PixelRect> {
    let p = placement(
        background.dimensions(),
        overlay.dimensions(),
        anchor_x,
        anchor_y,
    )?;

    let bc = background.channels();
    let oc = overlay.channels();
    let dst_x = p.dst.x as usize;
    let src_x = p.src_x as usize;
    let width = p.dst.width as usize;

    for row in 0..p.dst.height as u32 {
        let src_row = overlay.row(p.src_y + row);
        let dst_row = background.row_mut(p.dst.y as u32 + row);
        let src_px = src_row[src_x * oc..(src_x + width) * oc].chunks_exact(oc);
        let dst_px = dst_row[dst_x * bc..(dst_x + width) * bc].chunks_exact_mut(bc);
        for (d, s) in dst_px.zip(src_px) {
            let a = if oc == 4 { s[3] } else { 255 };
            match mode {
                BlendMode::Masked => blend_masked(d, s, a),
                BlendMode::Alpha => blend_alpha(d, s, a),
            }
        }
    }

    Some(p.dst)
}

/// Copy-returning variant of [`blend`].
pub fn blended(
    background: &PixelBuffer,
    overlay: &PixelBuffer,
    anchor_x: i32,
    anchor_y: i32,
    mode: BlendMode,
) -> PixelBuffer {
    let mut out = background.clone();
    blend(&mut out, overlay, anchor_x, anchor_y, mode);
    out
}

#[inline]
fn blend_masked(dst: &mut [u8], src: &[u8], a: u8) {
    let keep_bg = a != 255;
    let keep_fg = a != 0;
    for c in 0..3 {
        let bg = if keep_bg { dst[c] } else { 0 };
        let fg = if keep_fg { src[c] } else { 0 };
        dst[c] = bg.saturating_add(fg);
    }
    if let Some(da) = dst.get_mut(3) {
        let bg = if keep_bg { *da } else { 0 };
        let fg = if keep_fg { a } else { 0 };
        *da = bg.saturating_add(fg);
    }
}

#[inline]
fn blend_alpha(dst: &mut [u8], src: &[u8], a: u8) {
    let a = a as u32;
    let inv = 255 - a;
    if dst.len() < 4 {
        for c in 0..3 {
            dst[c] = ((src[c] as u32 * a + dst[c] as u32 * inv + 127) / 255) as u8;
        }
        return;
    }

    // "Over" onto a layer with its own alpha; color stays straight (not
    // premultiplied) so compositing the layer later applies alpha once.
    let da = dst[3] as u32;
    let weight_dst = da * inv;
    let denom = a * 255 + weight_dst;
    if denom == 0 {
        return;
    }
    for c in 0..3 {
        let num = src[c] as u32 * a * 255 + dst[c] as u32 * weight_dst;
        dst[c] = ((num + denom / 2) / denom) as u8;
    }
    dst[3] = ((denom + 127) / 255).min(255) as u8;
}
