//! End-to-end tests: stickers and scripts on disk, through a session, back to
//! an image file.

use std::sync::Arc;

use snapedit_core::{ChannelLayout, PixelBuffer};
use snapedit_effects::FilterBank;
use snapedit_media::{load_catalog_dir, load_pixel_buffer, save_pixel_buffer};
use snapedit_session::{
    EditSession, EventOutcome, EventScript, PointerButton, SaveOutcome, ScriptedEvent,
    SessionConfig, SessionEvent,
};

#[test]
fn edit_still_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let stickers = dir.path().join("stickers");
    std::fs::create_dir(&stickers).unwrap();

    save_pixel_buffer(
        &PixelBuffer::solid_bgra(10, 10, [0, 0, 255, 255]),
        stickers.join("b_red.png"),
    )
    .unwrap();
    save_pixel_buffer(
        &PixelBuffer::solid_bgra(10, 10, [255, 0, 0, 255]),
        stickers.join("a_blue.PNG"),
    )
    .unwrap();
    std::fs::write(stickers.join("notes.txt"), b"not a sticker").unwrap();

    let input = dir.path().join("photo.png");
    save_pixel_buffer(&PixelBuffer::test_pattern(80, 60), &input).unwrap();

    let script_path = dir.path().join("script.json");
    EventScript::new(vec![
        ScriptedEvent::new(SessionEvent::SelectOverlay { index: 1 }),
        ScriptedEvent::new(SessionEvent::PointerDown {
            x: 40,
            y: 30,
            button: PointerButton::Primary,
        }),
        ScriptedEvent::new(SessionEvent::Save),
    ])
    .save_to_file(&script_path)
    .unwrap();

    let catalog = load_catalog_dir(&stickers).unwrap();
    assert_eq!(catalog.names(), vec!["a_blue", "b_red"]);
    let image = load_pixel_buffer(&input).unwrap();
    let script = EventScript::load_from_file(&script_path).unwrap();

    let mut session = EditSession::open_static(
        image,
        Arc::new(catalog),
        Arc::new(FilterBank::new()),
        SessionConfig::default(),
    )
    .unwrap();

    let output = dir.path().join("out.png");
    for event in script.events() {
        if let EventOutcome::Saved(SaveOutcome::Still(canvas)) = session.handle(*event).unwrap() {
            save_pixel_buffer(&canvas, &output).unwrap();
        }
    }
    session.close().unwrap();

    let written = load_pixel_buffer(&output).unwrap();
    assert_eq!(written.dimensions(), (80, 60));
    assert_eq!(written.layout(), ChannelLayout::Bgr);
    assert_eq!(written.pixel(40, 30), Some(&[0u8, 0, 255][..]));
    assert_eq!(written.pixel(0, 0), Some(&[255u8, 255, 255][..]));
}
