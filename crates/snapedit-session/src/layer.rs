//! Persistent sticker layer for live sessions.

use snapedit_core::{ChannelLayout, PixelBuffer, PixelRect};
use snapedit_effects::Compositor;

/// Full-frame BGRA buffer that accumulates stickers across live frames.
///
/// Starts fully transparent. Alpha records where stickers have landed, so
/// compositing the layer onto a fresh frame leaves untouched pixels alone.
#[derive(Debug, Clone)]
pub struct StickerLayer {
    buffer: PixelBuffer,
    placements: usize,
}

impl StickerLayer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height, ChannelLayout::Bgra),
            placements: 0,
        }
    }

    /// Draw a sticker into the layer centered at `(x, y)`.
    pub fn place(
        &mut self,
        compositor: &Compositor,
        overlay: &PixelBuffer,
        x: i32,
        y: i32,
    ) -> Option<PixelRect> {
        let rect = compositor.blend(&mut self.buffer, overlay, x, y)?;
        self.placements += 1;
        Some(rect)
    }

    /// Composite the layer onto a frame of the same size.
    pub fn compose_onto(&self, compositor: &Compositor, frame: &mut PixelBuffer) {
        compositor.overlay_full(frame, &self.buffer);
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Number of placements that touched the layer.
    pub fn placements(&self) -> usize {
        self.placements
    }

    /// True while nothing has been drawn.
    pub fn is_blank(&self) -> bool {
        self.placements == 0
    }
}
