//! Integration tests for live sessions and recording.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use snapedit_core::{FrameSink, MemorySink, PixelBuffer, Result, SnapEditError};
use snapedit_effects::FilterBank;
use snapedit_session::{
    EditSession, EventScript, Overlay, OverlayCatalog, PlaceOutcome, PointerButton,
    RecordingState, SaveOutcome, ScriptedEvent, SessionConfig, SessionEvent, UndoOutcome,
};

// ── Helpers ────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<MemorySink>>);

impl FrameSink for SharedSink {
    fn begin(&mut self, width: u32, height: u32) -> Result<()> {
        self.0.borrow_mut().begin(width, height)
    }
    fn write_frame(&mut self, frame: &PixelBuffer) -> Result<()> {
        self.0.borrow_mut().write_frame(frame)
    }
    fn finish(&mut self) -> Result<()> {
        self.0.borrow_mut().finish()
    }
}

const W: u32 = 64;
const H: u32 = 48;

fn live(sink: Option<SharedSink>) -> EditSession {
    let catalog = OverlayCatalog::new(vec![Overlay::new(
        "dot",
        PixelBuffer::solid_bgr(8, 8, [255, 255, 255]),
    )])
    .unwrap();
    EditSession::open_live(
        W,
        H,
        Arc::new(catalog),
        Arc::new(FilterBank::new()),
        SessionConfig::default(),
        sink.map(|s| Box::new(s) as Box<dyn FrameSink>),
    )
    .unwrap()
}

fn frame(shade: u8) -> PixelBuffer {
    PixelBuffer::solid_bgr(W, H, [shade, shade / 2, 10])
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn stickers_persist_across_frames() {
    let mut session = live(None);
    assert_eq!(
        session.place_overlay(10, 10),
        PlaceOutcome::Placed(snapedit_core::PixelRect::new(6, 6, 8, 8))
    );

    for shade in [20u8, 90, 160] {
        let out = session.process_frame(&frame(shade)).unwrap();
        assert_eq!(out.pixel(10, 10), Some(&[255u8, 255, 255][..]));
        assert_eq!(out.pixel(40, 40), frame(shade).pixel(40, 40));
    }
    assert_eq!(session.sticker_layer().unwrap().placements(), 1);
}

#[test]
fn filter_applies_under_stickers() {
    let mut session = live(None);
    session.select_filter(2);
    session.place_overlay(32, 24);

    let input = frame(100);
    let out = session.process_frame(&input).unwrap();
    let inverted = FilterBank::new().apply(&input, 2);
    assert_eq!(out.pixel(0, 0), inverted.pixel(0, 0));
    assert_eq!(out.pixel(32, 24), Some(&[255u8, 255, 255][..]));
}

#[test]
fn recording_starts_on_first_edit() {
    let sink = SharedSink::default();
    let mut session = live(Some(sink.clone()));

    session.process_frame(&frame(1)).unwrap();
    session.process_frame(&frame(2)).unwrap();
    assert_eq!(session.recording_state(), Some(RecordingState::Idle));
    assert!(sink.0.borrow().size().is_none());

    session.place_overlay(20, 20);
    assert_eq!(session.recording_state(), Some(RecordingState::Armed));
    for shade in 3..6 {
        session.process_frame(&frame(shade)).unwrap();
    }
    assert_eq!(
        session.recording_state(),
        Some(RecordingState::Active { frames: 3 })
    );

    let saved = session.save().unwrap();
    assert_eq!(saved, SaveOutcome::RecordingFinished { frames: 3 });
    assert_eq!(
        session.recording_state(),
        Some(RecordingState::Finished { frames: 3 })
    );

    // Later frames are not recorded
    session.process_frame(&frame(9)).unwrap();
    let recorded = sink.0.borrow();
    assert!(recorded.is_finished());
    assert_eq!(recorded.size(), Some((W, H)));
    assert_eq!(recorded.frames().len(), 3);
    assert_eq!(recorded.frames()[0].pixel(20, 20), Some(&[255u8, 255, 255][..]));
}

#[test]
fn save_without_recording_returns_still() {
    let mut session = live(None);
    assert_eq!(session.save().unwrap(), SaveOutcome::NothingToSave);

    session.place_overlay(5, 5);
    let shown = session.process_frame(&frame(50)).unwrap();
    assert_eq!(session.save().unwrap(), SaveOutcome::Still(shown));
}

#[test]
fn close_finalizes_recording() {
    let sink = SharedSink::default();
    let mut session = live(Some(sink.clone()));
    session.select_filter(1);
    session.process_frame(&frame(70)).unwrap();
    session.close().unwrap();

    assert!(sink.0.borrow().is_finished());
    assert_eq!(sink.0.borrow().frames().len(), 1);
}

#[test]
fn live_undo_is_unsupported() {
    let mut session = live(None);
    session.place_overlay(10, 10);
    assert_eq!(session.undo(), UndoOutcome::Unsupported);
    assert_eq!(session.sticker_layer().unwrap().placements(), 1);
}

#[test]
fn wrong_frame_size_is_rejected() {
    let mut session = live(None);
    let err = session
        .process_frame(&PixelBuffer::solid_bgr(W + 1, H, [0, 0, 0]))
        .unwrap_err();
    assert!(matches!(err, SnapEditError::DimensionMismatch { .. }));
}

#[test]
fn static_session_rejects_frames() {
    let mut session = EditSession::open_static(
        frame(0),
        Arc::new(OverlayCatalog::new(vec![Overlay::new("dot", frame(1))]).unwrap()),
        Arc::new(FilterBank::new()),
        SessionConfig::default(),
    )
    .unwrap();
    assert!(matches!(
        session.process_frame(&frame(0)),
        Err(SnapEditError::InvalidParameter(_))
    ));
}

#[test]
fn frame_pinned_script_drives_recording() {
    let script = EventScript::new(vec![
        ScriptedEvent::at_frame(2, SessionEvent::SelectFilter { index: 10 }),
        ScriptedEvent::at_frame(
            2,
            SessionEvent::PointerDown {
                x: 32,
                y: 24,
                button: PointerButton::Primary,
            },
        ),
        ScriptedEvent::at_frame(5, SessionEvent::Save),
    ]);

    let sink = SharedSink::default();
    let mut session = live(Some(sink.clone()));
    for index in 0..8u64 {
        for event in script.events_at(index) {
            session.handle(*event).unwrap();
        }
        session.process_frame(&frame(index as u8 * 10)).unwrap();
    }

    // Frames 2, 3 and 4 are recorded; the save fires before frame 5
    assert_eq!(sink.0.borrow().frames().len(), 3);
    assert_eq!(
        session.recording_state(),
        Some(RecordingState::Finished { frames: 3 })
    );
}

#[test]
fn alpha_blend_matches_static_result() {
    let mut sticker = PixelBuffer::solid_bgra(6, 6, [200, 200, 200, 128]);
    sticker
        .pixel_mut(0, 0)
        .unwrap()
        .copy_from_slice(&[40, 80, 120, 255]);
    sticker
        .pixel_mut(5, 5)
        .unwrap()
        .copy_from_slice(&[90, 90, 90, 30]);
    let catalog = Arc::new(OverlayCatalog::new(vec![Overlay::new("soft", sticker)]).unwrap());
    let config = SessionConfig::smooth();
    let background = PixelBuffer::solid_bgr(W, H, [100, 100, 100]);

    let mut still = EditSession::open_static(
        background.clone(),
        catalog.clone(),
        Arc::new(FilterBank::new()),
        config,
    )
    .unwrap();
    still.place_overlay(20, 20);

    let mut streaming = EditSession::open_live(
        W,
        H,
        catalog,
        Arc::new(FilterBank::new()),
        config,
        None,
    )
    .unwrap();
    streaming.place_overlay(20, 20);
    let shown = streaming.process_frame(&background).unwrap();

    assert_eq!(&shown, still.current_canvas().unwrap());
    assert_eq!(shown.pixel(20, 20), Some(&[150u8, 150, 150][..]));
}
