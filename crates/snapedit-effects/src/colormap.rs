//! Luma conversion and false-color lookup tables.

/// 256-entry BGR lookup table indexed by luma.
pub type ColorLut = [[u8; 3]; 256];

// BT.601 weights in 14-bit fixed point
const LUMA_SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;

/// BT.601 luma of a BGR sample, rounded.
#[inline]
pub fn luma(b: u8, g: u8, r: u8) -> u8 {
    let sum = b as u32 * B_WEIGHT + g as u32 * G_WEIGHT + r as u32 * R_WEIGHT;
    ((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

fn to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Warm pink ramp: `sqrt((2 * gray + hot) / 3)` per channel.
pub fn pink() -> ColorLut {
    let mut lut = [[0u8; 3]; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let t = i as f64 / 255.0;
        // "hot" ramps red, then green, then blue
        let hot_r = (t * 8.0 / 3.0).min(1.0);
        let hot_g = ((t - 3.0 / 8.0) * 8.0 / 3.0).clamp(0.0, 1.0);
        let hot_b = ((t - 3.0 / 4.0) * 4.0).clamp(0.0, 1.0);

        let r = ((2.0 * t + hot_r) / 3.0).sqrt();
        let g = ((2.0 * t + hot_g) / 3.0).sqrt();
        let b = ((2.0 * t + hot_b) / 3.0).sqrt();
        *entry = [to_u8(b), to_u8(g), to_u8(r)];
    }
    lut
}

/// Rainbow ramp: hue sweeps from red (dark) to violet (bright).
pub fn rainbow() -> ColorLut {
    let mut lut = [[0u8; 3]; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let hue = i as f64 / 255.0 * 270.0;
        let (r, g, b) = hue_to_rgb(hue);
        *entry = [to_u8(b), to_u8(g), to_u8(r)];
    }
    lut
}

/// Fully saturated, full value color for a hue in degrees.
fn hue_to_rgb(hue: f64) -> (f64, f64, f64) {
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    }
}
