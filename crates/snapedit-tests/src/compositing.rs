//! Integration tests for sticker compositing.
//!
//! Exercises snapedit-effects placement against buffers built with
//! snapedit-core, checking that pixels outside the footprint never change.

use proptest::prelude::*;
use snapedit_core::{ChannelLayout, PixelBuffer, PixelRect};
use snapedit_effects::{blended, compositor, BlendMode};

// ── Helpers ────────────────────────────────────────────────────

fn arb_buffer(
    w: std::ops::Range<u32>,
    h: std::ops::Range<u32>,
    layout: ChannelLayout,
) -> impl Strategy<Value = PixelBuffer> {
    (w, h).prop_flat_map(move |(w, h)| {
        proptest::collection::vec(any::<u8>(), layout.buffer_size(w, h)).prop_map(move |data| {
            PixelBuffer::from_raw(w, h, layout, data).unwrap()
        })
    })
}

/// Expected masked result for one background pixel under one overlay pixel.
fn masked_pixel(bg: &[u8], ov: &[u8]) -> Vec<u8> {
    let a = ov.get(3).copied().unwrap_or(255);
    (0..3)
        .map(|c| {
            let b = if a != 255 { bg[c] } else { 0 };
            let f = if a != 0 { ov[c] } else { 0 };
            b.saturating_add(f)
        })
        .collect()
}

fn assert_unchanged_outside(before: &PixelBuffer, after: &PixelBuffer, rect: Option<PixelRect>) {
    for y in 0..before.height() {
        for x in 0..before.width() {
            let inside = rect.is_some_and(|r| r.contains(x as i32, y as i32));
            if !inside {
                assert_eq!(before.pixel(x, y), after.pixel(x, y), "pixel ({x}, {y})");
            }
        }
    }
}

// ── Scenarios ──────────────────────────────────────────────────

#[test]
fn opaque_sticker_near_corner() {
    let bg = PixelBuffer::solid_bgr(100, 100, [40, 80, 120]);
    let sticker = PixelBuffer::solid_bgr(20, 20, [0, 0, 255]);

    let out = blended(&bg, &sticker, 10, 10, BlendMode::Masked);
    let rect = compositor::placement(bg.dimensions(), sticker.dimensions(), 10, 10)
        .unwrap()
        .dst;

    assert_eq!(rect, PixelRect::new(0, 0, 20, 20));
    assert_unchanged_outside(&bg, &out, Some(rect));
    for y in 0..20 {
        for x in 0..20 {
            assert_eq!(out.pixel(x, y), Some(&[0u8, 0, 255][..]));
        }
    }
    assert_eq!(out.pixel(20, 20), bg.pixel(20, 20));
}

#[test]
fn sticker_fully_outside_is_noop() {
    let bg = PixelBuffer::test_pattern(100, 100);
    let sticker = PixelBuffer::solid_bgr(20, 20, [0, 0, 255]);

    for mode in [BlendMode::Masked, BlendMode::Alpha] {
        assert_eq!(blended(&bg, &sticker, -50, -50, mode), bg);
        assert_eq!(blended(&bg, &sticker, 150, 40, mode), bg);
    }
}

#[test]
fn sticker_straddling_every_edge() {
    let bg = PixelBuffer::solid_bgr(30, 20, [10, 10, 10]);
    let sticker = PixelBuffer::solid_bgr(8, 8, [200, 0, 0]);

    for (x, y) in [(0, 10), (29, 10), (15, 0), (15, 19), (0, 0), (29, 19)] {
        let out = blended(&bg, &sticker, x, y, BlendMode::Masked);
        let rect = compositor::placement(bg.dimensions(), sticker.dimensions(), x, y).unwrap();
        assert!(rect.dst.x >= 0 && rect.dst.right() <= 30);
        assert!(rect.dst.y >= 0 && rect.dst.bottom() <= 20);
        assert_unchanged_outside(&bg, &out, Some(rect.dst));
    }
}

#[test]
fn transparent_corners_keep_background() {
    // Round sticker: opaque center, transparent corners
    let mut sticker = PixelBuffer::solid_bgra(3, 3, [0, 255, 0, 255]);
    for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
        sticker
            .pixel_mut(x, y)
            .unwrap()
            .copy_from_slice(&[0, 0, 0, 0]);
    }
    let bg = PixelBuffer::solid_bgr(5, 5, [50, 50, 50]);

    let out = blended(&bg, &sticker, 2, 2, BlendMode::Masked);
    assert_eq!(out.pixel(1, 1), Some(&[50u8, 50, 50][..]));
    assert_eq!(out.pixel(2, 1), Some(&[0u8, 255, 0][..]));
    assert_eq!(out.pixel(2, 2), Some(&[0u8, 255, 0][..]));
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn masked_blend_matches_rule_inside_footprint(
        bg in arb_buffer(8..40, 8..40, ChannelLayout::Bgr),
        ov in arb_buffer(1..8, 1..8, ChannelLayout::Bgra),
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        // Anchors that keep the whole footprint on the background
        let (ow, oh) = ov.dimensions();
        let min_x = (ow / 2) as i32;
        let min_y = (oh / 2) as i32;
        let max_x = (bg.width() - (ow - ow / 2)) as i32;
        let max_y = (bg.height() - (oh - oh / 2)) as i32;
        let ax = min_x + ((max_x - min_x) as f64 * fx) as i32;
        let ay = min_y + ((max_y - min_y) as f64 * fy) as i32;

        let out = blended(&bg, &ov, ax, ay, BlendMode::Masked);
        let p = compositor::placement(bg.dimensions(), ov.dimensions(), ax, ay).unwrap();
        prop_assert_eq!(p.dst.width as u32, ow);
        prop_assert_eq!(p.dst.height as u32, oh);

        for y in 0..bg.height() {
            for x in 0..bg.width() {
                let got = out.pixel(x, y).unwrap();
                if p.dst.contains(x as i32, y as i32) {
                    let sx = x - p.dst.x as u32;
                    let sy = y - p.dst.y as u32;
                    let want = masked_pixel(bg.pixel(x, y).unwrap(), ov.pixel(sx, sy).unwrap());
                    prop_assert_eq!(got, &want[..]);
                } else {
                    prop_assert_eq!(got, bg.pixel(x, y).unwrap());
                }
            }
        }
    }

    #[test]
    fn blend_never_writes_outside_clip(
        bg in arb_buffer(1..24, 1..24, ChannelLayout::Bgr),
        ov in arb_buffer(1..16, 1..16, ChannelLayout::Bgra),
        ax in -40i32..64,
        ay in -40i32..64,
        alpha in any::<bool>(),
    ) {
        let mode = if alpha { BlendMode::Alpha } else { BlendMode::Masked };
        let out = blended(&bg, &ov, ax, ay, mode);
        prop_assert_eq!(out.dimensions(), bg.dimensions());

        match compositor::placement(bg.dimensions(), ov.dimensions(), ax, ay) {
            Some(p) => {
                prop_assert!(p.dst.x >= 0 && p.dst.y >= 0);
                prop_assert!(p.dst.right() <= bg.width() as i32);
                prop_assert!(p.dst.bottom() <= bg.height() as i32);
                for y in 0..bg.height() {
                    for x in 0..bg.width() {
                        if !p.dst.contains(x as i32, y as i32) {
                            prop_assert_eq!(out.pixel(x, y), bg.pixel(x, y));
                        }
                    }
                }
            }
            None => prop_assert_eq!(out, bg),
        }
    }
}
