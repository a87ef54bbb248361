//! Integer geometry for pixel placement and display mapping.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates.
///
/// `x`/`y` may be negative (a footprint hanging off the top-left edge);
/// `width`/`height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    /// Create a new rectangle. Negative sizes collapse to zero.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// The full extent of a `width` x `height` buffer.
    pub fn bounds(width: u32, height: u32) -> Self {
        Self::new(0, 0, clamp_dim(width), clamp_dim(height))
    }

    /// Rectangle of the given size whose center is `(cx, cy)`.
    ///
    /// The top-left corner is `(cx - width / 2, cy - height / 2)` with integer
    /// division, so odd sizes put the extra pixel after the center.
    pub fn from_center_size(cx: i32, cy: i32, width: u32, height: u32) -> Self {
        let w = clamp_dim(width);
        let h = clamp_dim(height);
        Self::new(cx.saturating_sub(w / 2), cy.saturating_sub(h / 2), w, h)
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn area(self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Check if a point lies inside the rectangle.
    #[inline]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two rectangles, or `None` when they do not overlap.
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Move the rectangle by an offset.
    #[inline]
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

fn clamp_dim(v: u32) -> i32 {
    v.min(i32::MAX as u32) as i32
}

/// Aspect-preserving fit of an image into a display frame.
///
/// Maps pointer positions in window coordinates back to image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Display pixels per image pixel.
    pub scale: f64,
    /// Window position of the image's top-left corner.
    pub origin: (i32, i32),
    /// Size of the image in image pixels.
    pub image_size: (u32, u32),
}

impl ViewTransform {
    /// Largest scale at which the image fits inside `frame_w` x `frame_h`.
    pub fn fit(image_w: u32, image_h: u32, frame_w: u32, frame_h: u32, origin: (i32, i32)) -> Self {
        let scale = if image_w == 0 || image_h == 0 {
            1.0
        } else {
            (frame_w as f64 / image_w as f64).min(frame_h as f64 / image_h as f64)
        };
        Self {
            scale,
            origin,
            image_size: (image_w, image_h),
        }
    }

    /// Size of the image once scaled for display.
    pub fn display_size(&self) -> (u32, u32) {
        (
            (self.image_size.0 as f64 * self.scale) as u32,
            (self.image_size.1 as f64 * self.scale) as u32,
        )
    }

    /// Window rectangle covered by the displayed image.
    pub fn display_rect(&self) -> PixelRect {
        let (w, h) = self.display_size();
        PixelRect::new(self.origin.0, self.origin.1, clamp_dim(w), clamp_dim(h))
    }

    /// Image pixel under a window position, or `None` outside the image.
    pub fn to_image(&self, wx: i32, wy: i32) -> Option<(i32, i32)> {
        if !self.display_rect().contains(wx, wy) || self.scale <= 0.0 {
            return None;
        }
        let ix = ((wx - self.origin.0) as f64 / self.scale) as i32;
        let iy = ((wy - self.origin.1) as f64 / self.scale) as i32;
        let (w, h) = self.image_size;
        Some((ix.min(clamp_dim(w) - 1), iy.min(clamp_dim(h) - 1)))
    }

    /// Window position of an image pixel.
    pub fn to_window(&self, ix: i32, iy: i32) -> (i32, i32) {
        (
            self.origin.0 + (ix as f64 * self.scale) as i32,
            self.origin.1 + (iy as f64 * self.scale) as i32,
        )
    }
}
