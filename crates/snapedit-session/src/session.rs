//! Edit session state machine.
//!
//! An [`EditSession`] owns everything that changes while the user edits: the
//! selection indices, the static-mode history or the live-mode sticker layer,
//! and the recording lifecycle. Callers feed it one event at a time.

use std::sync::Arc;

use snapedit_core::{FrameSink, PixelBuffer, Result, SnapEditError};
use snapedit_effects::{compositor, Compositor, FilterBank, ORIGINAL};
use tracing::{debug, info, warn};

use crate::catalog::OverlayCatalog;
use crate::config::SessionConfig;
use crate::event::{
    EventOutcome, PlaceOutcome, PointerButton, SaveOutcome, SelectOutcome, SessionEvent,
    UndoOutcome,
};
use crate::history::EditHistory;
use crate::layer::StickerLayer;

/// Recording lifecycle of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// No edit yet, or no sink attached.
    #[default]
    Idle,
    /// An edit happened; the next composed frame starts the sink.
    Armed,
    Active { frames: u64 },
    /// Finalized; the sink is not reused.
    Finished { frames: u64 },
}

impl RecordingState {
    pub fn is_recording(self) -> bool {
        matches!(self, Self::Armed | Self::Active { .. })
    }
}

/// Which kind of session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Static,
    Live,
}

struct StaticState {
    history: EditHistory,
}

struct LiveState {
    layer: StickerLayer,
    recording: RecordingState,
    sink: Option<Box<dyn FrameSink>>,
    last_frame: Option<PixelBuffer>,
}

enum SessionMode {
    Static(StaticState),
    Live(LiveState),
}

/// One editing session over a still image or a live frame stream.
pub struct EditSession {
    overlays: Arc<OverlayCatalog>,
    filters: Arc<FilterBank>,
    compositor: Compositor,
    overlay_index: usize,
    filter_index: usize,
    mode: SessionMode,
}

impl EditSession {
    /// Start editing a still image. The image becomes history slot 0.
    ///
    /// The canvas is always opaque BGR; alpha in the source is dropped.
    pub fn open_static(
        image: PixelBuffer,
        overlays: Arc<OverlayCatalog>,
        filters: Arc<FilterBank>,
        config: SessionConfig,
    ) -> Result<Self> {
        if image.is_empty() {
            return Err(SnapEditError::InvalidParameter(
                "cannot edit an empty image".into(),
            ));
        }
        info!(
            width = image.width(),
            height = image.height(),
            overlays = overlays.len(),
            "Opening static session"
        );
        let image = if image.layout().has_alpha() {
            debug!("Dropping alpha from static background");
            image.to_bgr()
        } else {
            image
        };
        let history = EditHistory::with_limit(image, config.history_limit);
        Ok(Self {
            overlays,
            filters,
            compositor: Compositor::new(config.blend_mode),
            overlay_index: 0,
            filter_index: ORIGINAL,
            mode: SessionMode::Static(StaticState { history }),
        })
    }

    /// Start a live session for frames of `width` x `height`.
    ///
    /// With a sink attached, the first placement or filter pick starts a
    /// recording of every composed frame.
    pub fn open_live(
        width: u32,
        height: u32,
        overlays: Arc<OverlayCatalog>,
        filters: Arc<FilterBank>,
        config: SessionConfig,
        sink: Option<Box<dyn FrameSink>>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SnapEditError::InvalidParameter(format!(
                "invalid live frame size {width}x{height}"
            )));
        }
        let sink_desc = sink
            .as_ref()
            .map_or_else(|| "none".to_string(), |s| s.describe());
        info!(width, height, sink = %sink_desc, "Opening live session");
        Ok(Self {
            overlays,
            filters,
            compositor: Compositor::new(config.blend_mode),
            overlay_index: 0,
            filter_index: ORIGINAL,
            mode: SessionMode::Live(LiveState {
                layer: StickerLayer::new(width, height),
                recording: RecordingState::Idle,
                sink,
                last_frame: None,
            }),
        })
    }

    pub fn mode(&self) -> ModeKind {
        match self.mode {
            SessionMode::Static(_) => ModeKind::Static,
            SessionMode::Live(_) => ModeKind::Live,
        }
    }

    pub fn overlay_index(&self) -> usize {
        self.overlay_index
    }

    pub fn filter_index(&self) -> usize {
        self.filter_index
    }

    pub fn overlays(&self) -> &OverlayCatalog {
        &self.overlays
    }

    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }

    /// Static-mode history.
    pub fn history(&self) -> Option<&EditHistory> {
        match &self.mode {
            SessionMode::Static(s) => Some(&s.history),
            SessionMode::Live(_) => None,
        }
    }

    /// Live-mode sticker layer.
    pub fn sticker_layer(&self) -> Option<&StickerLayer> {
        match &self.mode {
            SessionMode::Static(_) => None,
            SessionMode::Live(l) => Some(&l.layer),
        }
    }

    /// Live-mode recording state.
    pub fn recording_state(&self) -> Option<RecordingState> {
        match &self.mode {
            SessionMode::Static(_) => None,
            SessionMode::Live(l) => Some(l.recording),
        }
    }

    /// What is on screen: the history top, or the last composed live frame.
    pub fn current_canvas(&self) -> Option<&PixelBuffer> {
        match &self.mode {
            SessionMode::Static(s) => Some(s.history.top()),
            SessionMode::Live(l) => l.last_frame.as_ref(),
        }
    }

    /// Choose the sticker used by later placements.
    pub fn select_overlay(&mut self, index: usize) -> SelectOutcome {
        let count = self.overlays.len();
        if index >= count {
            warn!(index, count, "Overlay index out of range, keeping selection");
            return SelectOutcome::Ignored { index, count };
        }
        self.overlay_index = index;
        debug!(index, "Overlay selected");
        SelectOutcome::Selected(index)
    }

    /// Choose a filter.
    ///
    /// Static sessions replace the canvas with the filtered original as a new
    /// undoable edit. Live sessions use it for subsequent frames.
    pub fn select_filter(&mut self, index: usize) -> SelectOutcome {
        let count = self.filters.len();
        if index >= count {
            warn!(index, count, "Filter index out of range, keeping selection");
            return SelectOutcome::Ignored { index, count };
        }
        self.filter_index = index;
        match &mut self.mode {
            SessionMode::Static(s) => {
                let filtered = self.filters.apply(s.history.initial(), index);
                s.history.push(filtered);
                debug!(index, history = s.history.len(), "Filter applied");
            }
            SessionMode::Live(l) => {
                arm_recording(l);
                debug!(index, "Live filter selected");
            }
        }
        SelectOutcome::Selected(index)
    }

    /// Place the selected sticker centered at `(x, y)` in canvas pixels.
    ///
    /// Static placements push a new history entry; a placement that misses
    /// the canvas pushes nothing.
    pub fn place_overlay(&mut self, x: i32, y: i32) -> PlaceOutcome {
        let Some(overlay) = self.overlays.get(self.overlay_index) else {
            return PlaceOutcome::Outside;
        };
        let sticker = &overlay.image;

        let outcome = match &mut self.mode {
            SessionMode::Static(s) => {
                let canvas = s.history.top();
                if compositor::placement(canvas.dimensions(), sticker.dimensions(), x, y).is_none() {
                    PlaceOutcome::Outside
                } else {
                    let snapshot = canvas.clone();
                    s.history.push(snapshot);
                    match self.compositor.blend(s.history.top_mut(), sticker, x, y) {
                        Some(rect) => PlaceOutcome::Placed(rect),
                        None => PlaceOutcome::Outside,
                    }
                }
            }
            SessionMode::Live(l) => {
                arm_recording(l);
                match l.layer.place(&self.compositor, sticker, x, y) {
                    Some(rect) => PlaceOutcome::Placed(rect),
                    None => PlaceOutcome::Outside,
                }
            }
        };

        match outcome {
            PlaceOutcome::Placed(rect) => debug!(
                overlay = %overlay.name,
                x,
                y,
                ?rect,
                "Sticker placed"
            ),
            PlaceOutcome::Outside => debug!(x, y, "Sticker placement outside canvas"),
        }
        outcome
    }

    /// Revert the last static edit. Live sessions cannot undo.
    pub fn undo(&mut self) -> UndoOutcome {
        match &mut self.mode {
            SessionMode::Static(s) => {
                if s.history.undo() {
                    debug!(remaining = s.history.len(), "Undo");
                    UndoOutcome::Undone {
                        remaining: s.history.len(),
                    }
                } else {
                    debug!("Undo at initial image ignored");
                    UndoOutcome::AtInitial
                }
            }
            SessionMode::Live(_) => {
                debug!("Undo requested in live session, ignored");
                UndoOutcome::Unsupported
            }
        }
    }

    /// Save, depending on mode.
    ///
    /// Static sessions hand back the canvas. Live sessions finalize a running
    /// recording, or otherwise hand back the last composed frame.
    pub fn save(&mut self) -> Result<SaveOutcome> {
        match &mut self.mode {
            SessionMode::Static(s) => Ok(SaveOutcome::Still(s.history.top().clone())),
            SessionMode::Live(l) => {
                if l.recording.is_recording() {
                    let frames = finish_recording(l)?;
                    return Ok(SaveOutcome::RecordingFinished { frames });
                }
                Ok(match &l.last_frame {
                    Some(frame) => SaveOutcome::Still(frame.clone()),
                    None => SaveOutcome::NothingToSave,
                })
            }
        }
    }

    /// Filter a live frame, draw the sticker layer over it, and record it.
    ///
    /// Returns the composed frame for display.
    pub fn process_frame(&mut self, frame: &PixelBuffer) -> Result<PixelBuffer> {
        let SessionMode::Live(l) = &mut self.mode else {
            return Err(SnapEditError::InvalidParameter(
                "process_frame requires a live session".into(),
            ));
        };

        let (w, h) = l.layer.dimensions();
        if frame.dimensions() != (w, h) {
            return Err(SnapEditError::DimensionMismatch {
                expected: format!("{w}x{h}"),
                got: format!("{}x{}", frame.width(), frame.height()),
            });
        }

        let mut composed = self.filters.apply(frame, self.filter_index);
        if composed.layout().has_alpha() {
            composed = composed.to_bgr();
        }
        l.layer.compose_onto(&self.compositor, &mut composed);

        match (l.recording, l.sink.as_mut()) {
            (RecordingState::Armed, Some(sink)) => {
                sink.begin(w, h)?;
                info!(sink = %sink.describe(), width = w, height = h, "Recording started");
                sink.write_frame(&composed)?;
                l.recording = RecordingState::Active { frames: 1 };
            }
            (RecordingState::Active { frames }, Some(sink)) => {
                sink.write_frame(&composed)?;
                l.recording = RecordingState::Active { frames: frames + 1 };
            }
            _ => {}
        }

        l.last_frame = Some(composed.clone());
        Ok(composed)
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: SessionEvent) -> Result<EventOutcome> {
        Ok(match event {
            SessionEvent::SelectOverlay { index } => {
                EventOutcome::OverlaySelected(self.select_overlay(index))
            }
            SessionEvent::SelectFilter { index } => {
                EventOutcome::FilterSelected(self.select_filter(index))
            }
            SessionEvent::PointerDown {
                x,
                y,
                button: PointerButton::Primary,
            } => EventOutcome::Placed(self.place_overlay(x, y)),
            SessionEvent::PointerDown {
                button: PointerButton::Secondary,
                ..
            }
            | SessionEvent::Undo => EventOutcome::Undo(self.undo()),
            SessionEvent::Save => EventOutcome::Saved(self.save()?),
        })
    }

    /// End the session, finalizing any running recording.
    pub fn close(mut self) -> Result<()> {
        if let SessionMode::Live(l) = &mut self.mode {
            if l.recording.is_recording() {
                finish_recording(l)?;
            }
        }
        info!(mode = ?self.mode(), "Session closed");
        Ok(())
    }
}

fn arm_recording(live: &mut LiveState) {
    if live.recording == RecordingState::Idle && live.sink.is_some() {
        live.recording = RecordingState::Armed;
        debug!("Recording armed");
    }
}

fn finish_recording(live: &mut LiveState) -> Result<u64> {
    let frames = match live.recording {
        RecordingState::Active { frames } => frames,
        _ => 0,
    };
    // Finished before any I/O error so a failed finalize is not retried
    live.recording = RecordingState::Finished { frames };
    if let Some(sink) = live.sink.as_mut() {
        sink.finish()?;
        info!(sink = %sink.describe(), frames, "Recording finished");
    }
    Ok(frames)
}
