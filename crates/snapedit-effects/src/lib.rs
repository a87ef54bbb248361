//! SnapEdit Effects - filter catalog and sticker compositing
//!
//! Provides the fixed filter bank (color remaps, blur, smoothing), the
//! compositor used for sticker placement, and the CPU kernels behind them.

pub mod colormap;
pub mod compositor;
pub mod filters;
pub mod kernels;

pub use compositor::{blend, blended, BlendMode, Compositor, Placement};

use snapedit_core::PixelBuffer;
use tracing::warn;

use filters::{
    Bilateral, Brightness, ColorMap, ColorMatrix, GaussianBlur, Grayscale, Identity, Invert,
    ToneCurve,
};

/// Index of the pass-through filter.
pub const ORIGINAL: usize = 0;

/// Trait for image filters.
pub trait ImageFilter: Send + Sync {
    /// Get the filter name.
    fn name(&self) -> &str;

    /// Produce a filtered copy; never mutates the input.
    fn apply(&self, image: &PixelBuffer) -> PixelBuffer;
}

/// Ordered, immutable filter catalog.
pub struct FilterBank {
    filters: Vec<Box<dyn ImageFilter>>,
}

impl FilterBank {
    /// Create the standard catalog.
    pub fn new() -> Self {
        Self {
            filters: vec![
                Box::new(Identity),
                Box::new(Grayscale),
                Box::new(Invert::new("Invert")),
                Box::new(GaussianBlur::new("Blur", 15, 0.0)),
                Box::new(ColorMap::new("Tumblr", colormap::pink())),
                Box::new(ColorMap::new("Prism", colormap::rainbow())),
                Box::new(ColorMatrix::sepia("Vintage")),
                Box::new(Brightness::new("Silly Face", 30)),
                Box::new(Bilateral::new("Slim", 15, 80.0, 80.0)),
                Box::new(ToneCurve::lift("Kodak", 20)),
                Box::new(Invert::new("Negative")),
            ],
        }
    }

    /// Get all registered filters.
    pub fn filters(&self) -> &[Box<dyn ImageFilter>] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.filters.len()
    }

    pub fn get(&self, index: usize) -> Option<&dyn ImageFilter> {
        self.filters.get(index).map(|f| f.as_ref())
    }

    /// Filter names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Find a filter index by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.filters
            .iter()
            .position(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Apply filter `index` to `image`.
    ///
    /// An unknown index yields an unchanged copy.
    pub fn apply(&self, image: &PixelBuffer, index: usize) -> PixelBuffer {
        match self.filters.get(index) {
            Some(filter) => filter.apply(image),
            None => {
                warn!(index, count = self.filters.len(), "Unknown filter index, passing image through");
                image.clone()
            }
        }
    }

    /// One `width` x `height` thumbnail per filter, in catalog order.
    pub fn previews(&self, image: &PixelBuffer, width: u32, height: u32) -> Vec<PixelBuffer> {
        // Filter the downscaled image; full-size blur and bilateral are slow
        let small = image.resize_nearest(width, height);
        self.filters.iter().map(|f| f.apply(&small)).collect()
    }
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
