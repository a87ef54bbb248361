//! Read-only overlay catalog.

use snapedit_core::{PixelBuffer, Result, SnapEditError};

/// A named sticker image.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub name: String,
    pub image: PixelBuffer,
}

impl Overlay {
    pub fn new(name: impl Into<String>, image: PixelBuffer) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

/// Ordered, immutable set of stickers, loaded once per process.
#[derive(Debug, Clone)]
pub struct OverlayCatalog {
    overlays: Vec<Overlay>,
}

impl OverlayCatalog {
    /// Build a catalog. Fails when empty or when a name repeats.
    pub fn new(overlays: Vec<Overlay>) -> Result<Self> {
        if overlays.is_empty() {
            return Err(SnapEditError::EmptyCatalog);
        }
        for (i, overlay) in overlays.iter().enumerate() {
            if overlays[..i].iter().any(|o| o.name == overlay.name) {
                return Err(SnapEditError::InvalidParameter(format!(
                    "duplicate overlay name '{}'",
                    overlay.name
                )));
            }
        }
        Ok(Self { overlays })
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Overlay> {
        self.overlays.get(index)
    }

    /// Find an overlay index by name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.overlays.iter().position(|o| o.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }
}
