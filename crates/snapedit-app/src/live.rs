//! `snapedit live`: run a live session over decoded video frames.

use anyhow::Context as _;
use snapedit_core::FrameSink;
use snapedit_effects::FilterBank;
use snapedit_media::{load_catalog_dir, save_pixel_buffer, FfmpegRecorder, VideoFrameSource};
use snapedit_session::{EditSession, EventOutcome, SaveOutcome};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::edit::{load_script, numbered_path};
use crate::LiveArgs;

pub fn run(args: LiveArgs, config: AppConfig) -> anyhow::Result<()> {
    let overlays = load_catalog_dir(&args.stickers)
        .with_context(|| format!("load stickers from '{}'", args.stickers.display()))?;
    let script = load_script(args.script.as_deref())?;

    let mut source = match &args.device_format {
        Some(format) => VideoFrameSource::open_device(format, args.video.clone())?,
        None => VideoFrameSource::open(args.video.clone())?,
    };
    if let Some(limit) = args.frames {
        source = source.with_max_frames(limit);
    }

    let first = source
        .next_frame()?
        .with_context(|| format!("no frames in '{}'", args.video))?;

    let sink: Option<Box<dyn FrameSink>> = args
        .record
        .as_ref()
        .map(|path| Box::new(FfmpegRecorder::new(path, config.record)) as Box<dyn FrameSink>);

    let mut session = EditSession::open_live(
        first.width(),
        first.height(),
        Arc::new(overlays),
        Arc::new(FilterBank::new()),
        config.session,
        sink,
    )?;

    let started = Instant::now();
    let mut stills = 0usize;
    let mut frame_index = 0u64;
    let mut next = Some(first);

    while let Some(frame) = next {
        for event in script.events_at(frame_index) {
            match session.handle(*event)? {
                EventOutcome::Saved(SaveOutcome::Still(still)) => {
                    if let Some(preview) = &args.preview {
                        let path = numbered_path(preview, stills);
                        save_pixel_buffer(&still, &path)
                            .with_context(|| format!("save '{}'", path.display()))?;
                        info!(path = %path.display(), frame = frame_index, "Still saved");
                        stills += 1;
                    }
                }
                outcome => debug!(frame = frame_index, ?event, ?outcome, "Event applied"),
            }
        }

        session.process_frame(&frame)?;
        frame_index += 1;
        next = source.next_frame()?;
    }

    if stills == 0 {
        if let (Some(preview), Some(canvas)) = (&args.preview, session.current_canvas()) {
            save_pixel_buffer(canvas, preview)
                .with_context(|| format!("save '{}'", preview.display()))?;
            info!(path = %preview.display(), "Last frame saved");
        }
    }

    let recording = session.recording_state();
    let elapsed = started.elapsed().as_secs_f64();
    session.close()?;
    info!(
        frames = frame_index,
        fps = if elapsed > 0.0 { frame_index as f64 / elapsed } else { 0.0 },
        ?recording,
        "Live session finished"
    );
    Ok(())
}
