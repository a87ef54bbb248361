//! Integration tests for static editing sessions.
//!
//! Exercises snapedit-session history and event handling on top of the
//! snapedit-effects filter bank and compositor.

use std::sync::Arc;

use proptest::prelude::*;
use snapedit_core::{ChannelLayout, PixelBuffer, PixelRect};
use snapedit_effects::{BlendMode, FilterBank};
use snapedit_session::{
    EditHistory, EditSession, EventOutcome, EventScript, Overlay, OverlayCatalog, PlaceOutcome,
    PointerButton, SaveOutcome, ScriptedEvent, SelectOutcome, SessionConfig, SessionEvent,
    UndoOutcome,
};

// ── Helpers ────────────────────────────────────────────────────

fn stickers() -> Arc<OverlayCatalog> {
    let mut heart = PixelBuffer::solid_bgra(20, 20, [60, 20, 220, 255]);
    heart.pixel_mut(0, 0).unwrap().copy_from_slice(&[0, 0, 0, 0]);
    Arc::new(
        OverlayCatalog::new(vec![
            Overlay::new("star", PixelBuffer::solid_bgr(20, 20, [0, 215, 255])),
            Overlay::new("heart", heart),
        ])
        .unwrap(),
    )
}

fn session(config: SessionConfig) -> EditSession {
    EditSession::open_static(
        PixelBuffer::test_pattern(100, 100),
        stickers(),
        Arc::new(FilterBank::new()),
        config,
    )
    .unwrap()
}

fn click(x: i32, y: i32) -> SessionEvent {
    SessionEvent::PointerDown {
        x,
        y,
        button: PointerButton::Primary,
    }
}

fn shade(value: u8) -> PixelBuffer {
    PixelBuffer::solid_bgr(4, 4, [value; 3])
}

// ── History laws ───────────────────────────────────────────────

proptest! {
    #[test]
    fn push_then_undo_returns_to_first(count in 1usize..24) {
        let mut history = EditHistory::new(shade(0));
        for i in 1..count {
            history.push(shade(i as u8));
        }
        for _ in 1..count {
            prop_assert!(history.undo());
        }
        prop_assert_eq!(history.top(), &shade(0));
        prop_assert_eq!(history.len(), 1);
    }

    #[test]
    fn bounded_history_keeps_initial(limit in 2usize..8, pushes in 0usize..32) {
        let mut history = EditHistory::with_limit(shade(0), Some(limit));
        for i in 0..pushes {
            history.push(shade(i as u8 + 1));
        }
        prop_assert!(history.len() <= limit);
        prop_assert_eq!(history.initial(), &shade(0));
        while history.undo() {}
        prop_assert_eq!(history.top(), &shade(0));
    }
}

#[test]
fn undo_at_initial_is_idempotent() {
    let mut history = EditHistory::new(shade(7));
    for _ in 0..3 {
        assert!(!history.undo());
        assert_eq!(history.top(), &shade(7));
        assert_eq!(history.len(), 1);
    }
}

// ── Session scenarios ──────────────────────────────────────────

#[test]
fn grayscale_survives_undo_of_original_pick() {
    let mut session = session(SessionConfig::default());
    let original = session.current_canvas().unwrap().clone();
    let gray = FilterBank::new().apply(&original, 1);

    assert_eq!(session.select_filter(1), SelectOutcome::Selected(1));
    assert_eq!(session.select_filter(0), SelectOutcome::Selected(0));
    assert_eq!(session.history().unwrap().len(), 3);
    assert_eq!(session.current_canvas().unwrap(), &original);

    assert_eq!(session.undo(), UndoOutcome::Undone { remaining: 2 });
    assert_eq!(session.current_canvas().unwrap(), &gray);
    assert_ne!(session.current_canvas().unwrap(), &original);
}

#[test]
fn placement_changes_only_the_clipped_rect() {
    let mut session = session(SessionConfig::default());
    let before = session.current_canvas().unwrap().clone();

    let outcome = session.place_overlay(10, 10);
    assert_eq!(outcome, PlaceOutcome::Placed(PixelRect::new(0, 0, 20, 20)));

    let after = session.current_canvas().unwrap();
    for y in 0..100 {
        for x in 0..100 {
            if x >= 20 || y >= 20 {
                assert_eq!(after.pixel(x, y), before.pixel(x, y));
            } else {
                assert_eq!(after.pixel(x, y), Some(&[0u8, 215, 255][..]));
            }
        }
    }
}

#[test]
fn missed_click_leaves_canvas_and_history() {
    let mut session = session(SessionConfig::default());
    let before = session.current_canvas().unwrap().clone();

    assert_eq!(session.place_overlay(-50, -50), PlaceOutcome::Outside);
    assert_eq!(session.current_canvas().unwrap(), &before);
    assert_eq!(session.history().unwrap().len(), 1);
    assert_eq!(session.undo(), UndoOutcome::AtInitial);
}

#[test]
fn out_of_range_selection_keeps_previous() {
    let mut session = session(SessionConfig::default());
    session.select_overlay(1);
    assert_eq!(
        session.select_overlay(5),
        SelectOutcome::Ignored { index: 5, count: 2 }
    );
    assert_eq!(session.overlay_index(), 1);

    assert_eq!(
        session.select_filter(11),
        SelectOutcome::Ignored { index: 11, count: 11 }
    );
    assert_eq!(session.filter_index(), 0);
    assert_eq!(session.history().unwrap().len(), 1);
}

#[test]
fn scripted_session_round_trip() {
    let script = EventScript::new(vec![
        ScriptedEvent::new(SessionEvent::SelectFilter { index: 4 }),
        ScriptedEvent::new(SessionEvent::SelectOverlay { index: 1 }),
        ScriptedEvent::new(click(50, 50)),
        ScriptedEvent::new(click(90, 90)),
        ScriptedEvent::new(SessionEvent::PointerDown {
            x: 0,
            y: 0,
            button: PointerButton::Secondary,
        }),
        ScriptedEvent::new(SessionEvent::Save),
    ]);
    let script = EventScript::from_json(&script.to_json().unwrap()).unwrap();

    let mut session = session(SessionConfig::default());
    let mut saved = None;
    for event in script.events() {
        if let EventOutcome::Saved(SaveOutcome::Still(canvas)) = session.handle(*event).unwrap() {
            saved = Some(canvas);
        }
    }

    // Filter, one sticker; the second sticker was undone by the right click
    let bank = FilterBank::new();
    let mut expected = bank.apply(session.history().unwrap().initial(), 4);
    let heart = &session.overlays().get(1).unwrap().image;
    snapedit_effects::blend(&mut expected, heart, 50, 50, BlendMode::Masked);

    assert_eq!(session.history().unwrap().len(), 3);
    assert_eq!(saved.as_ref(), Some(&expected));
    session.close().unwrap();
}

#[test]
fn bounded_session_history() {
    let mut session = session(SessionConfig::bounded(3));
    for x in [20, 40, 60, 80] {
        session.place_overlay(x, 50);
    }
    let history = session.history().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.initial(), &PixelBuffer::test_pattern(100, 100));
}

#[test]
fn alpha_blend_config_smooths_edges() {
    let mut sticker = PixelBuffer::solid_bgra(2, 1, [200, 200, 200, 255]);
    sticker
        .pixel_mut(1, 0)
        .unwrap()
        .copy_from_slice(&[200, 200, 200, 128]);
    let catalog = Arc::new(OverlayCatalog::new(vec![Overlay::new("edge", sticker)]).unwrap());

    let config = SessionConfig {
        blend_mode: BlendMode::Alpha,
        ..SessionConfig::default()
    };
    let mut session = EditSession::open_static(
        PixelBuffer::solid_bgr(4, 1, [100, 100, 100]),
        catalog,
        Arc::new(FilterBank::new()),
        config,
    )
    .unwrap();

    session.place_overlay(1, 0);
    let canvas = session.current_canvas().unwrap();
    assert_eq!(canvas.pixel(0, 0), Some(&[200u8, 200, 200][..]));
    // (200 * 128 + 100 * 127 + 127) / 255 = 150
    assert_eq!(canvas.pixel(1, 0), Some(&[150u8, 150, 150][..]));
}

#[test]
fn transparent_background_edits_stay_opaque() {
    let catalog = Arc::new(
        OverlayCatalog::new(vec![Overlay::new(
            "ghost",
            PixelBuffer::solid_bgra(2, 2, [10, 10, 10, 128]),
        )])
        .unwrap(),
    );
    let mut session = EditSession::open_static(
        PixelBuffer::solid_bgra(4, 4, [100, 100, 100, 0]),
        catalog,
        Arc::new(FilterBank::new()),
        SessionConfig::default(),
    )
    .unwrap();
    assert_eq!(
        session.current_canvas().unwrap().layout(),
        ChannelLayout::Bgr
    );

    session.place_overlay(2, 2);
    let canvas = session.current_canvas().unwrap();
    assert_eq!(canvas.layout(), ChannelLayout::Bgr);
    assert_eq!(canvas.pixel(2, 2), Some(&[110u8, 110, 110][..]));

    session.select_filter(2);
    assert_eq!(
        session.current_canvas().unwrap().layout(),
        ChannelLayout::Bgr
    );
}
