//! `snapedit edit`: replay a script against a still image.

use anyhow::Context as _;
use snapedit_core::ViewTransform;
use snapedit_effects::FilterBank;
use snapedit_media::{load_catalog_dir, load_pixel_buffer, save_pixel_buffer};
use snapedit_session::{EditSession, EventOutcome, EventScript, SaveOutcome, SessionEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::EditArgs;

pub fn run(args: EditArgs, config: AppConfig) -> anyhow::Result<()> {
    let image = load_pixel_buffer(&args.image)
        .with_context(|| format!("load image '{}'", args.image.display()))?;
    let overlays = load_catalog_dir(&args.stickers)
        .with_context(|| format!("load stickers from '{}'", args.stickers.display()))?;
    let script = load_script(args.script.as_deref())?;

    let view = args
        .display
        .map(|(w, h)| ViewTransform::fit(image.width(), image.height(), w, h, (0, 0)));

    let mut session = EditSession::open_static(
        image,
        Arc::new(overlays),
        Arc::new(FilterBank::new()),
        config.session,
    )?;

    let mut saves = 0usize;
    for event in script.events() {
        let Some(event) = to_canvas(*event, view.as_ref()) else {
            debug!(?event, "Click outside the displayed image, skipped");
            continue;
        };
        match session.handle(event)? {
            EventOutcome::Saved(SaveOutcome::Still(canvas)) => {
                let path = numbered_path(&args.output, saves);
                save_pixel_buffer(&canvas, &path)
                    .with_context(|| format!("save '{}'", path.display()))?;
                info!(path = %path.display(), "Canvas saved");
                saves += 1;
            }
            outcome => debug!(?event, ?outcome, "Event applied"),
        }
    }

    if saves == 0 {
        if let Some(canvas) = session.current_canvas() {
            save_pixel_buffer(canvas, &args.output)
                .with_context(|| format!("save '{}'", args.output.display()))?;
            info!(path = %args.output.display(), "Final canvas saved");
        }
    }

    if let Some(history) = session.history() {
        info!(
            snapshots = history.len(),
            bytes = history.memory_size(),
            "Edit history"
        );
    }
    session.close()?;
    Ok(())
}

pub(crate) fn load_script(path: Option<&Path>) -> anyhow::Result<EventScript> {
    match path {
        Some(path) => EventScript::load_from_file(path)
            .with_context(|| format!("load script '{}'", path.display())),
        None => Ok(EventScript::new(Vec::new())),
    }
}

/// Map window-space pointer events to canvas pixels.
///
/// Without a view, coordinates are already canvas pixels.
pub(crate) fn to_canvas(event: SessionEvent, view: Option<&ViewTransform>) -> Option<SessionEvent> {
    match (event, view) {
        (SessionEvent::PointerDown { x, y, button }, Some(view)) => {
            let (x, y) = view.to_image(x, y)?;
            Some(SessionEvent::PointerDown { x, y, button })
        }
        _ => Some(event),
    }
}

/// `out.png`, then `out-1.png`, `out-2.png`, ...
pub(crate) fn numbered_path(base: &Path, index: usize) -> PathBuf {
    if index == 0 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{stem}-{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{index}"),
    };
    base.with_file_name(name)
}
