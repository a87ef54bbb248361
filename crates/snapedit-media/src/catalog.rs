//! Loading the sticker catalog from disk.

use snapedit_core::{Result, SnapEditError};
use snapedit_session::{Overlay, OverlayCatalog};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::image_io::load_pixel_buffer;

/// Load every `(name, path)` entry. The first failure aborts the whole load.
pub fn load_catalog<I, S, P>(entries: I) -> Result<OverlayCatalog>
where
    I: IntoIterator<Item = (S, P)>,
    S: Into<String>,
    P: AsRef<Path>,
{
    let overlays = entries
        .into_iter()
        .map(|(name, path)| -> Result<Overlay> { Ok(Overlay::new(name, load_pixel_buffer(path)?)) })
        .collect::<Result<Vec<_>>>()?;
    let catalog = OverlayCatalog::new(overlays)?;
    info!(count = catalog.len(), "Overlay catalog loaded");
    Ok(catalog)
}

/// Load all `*.png` files in `dir`, ordered by file name.
///
/// Each overlay is named after its file stem.
pub fn load_catalog_dir<P: AsRef<Path>>(dir: P) -> Result<OverlayCatalog> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SnapEditError::NotFound(format!(
            "Sticker directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_png(p))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if paths.is_empty() {
        return Err(SnapEditError::EmptyCatalog);
    }

    load_catalog(paths.into_iter().map(|p| {
        let name = p
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (name, p)
    }))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}
