//! CPU convolution kernels: separable Gaussian blur and bilateral smoothing.
//!
//! Both read borders with reflect-101 (`dcb|abcd|cba`) and leave an alpha
//! channel untouched. Output rows are computed in parallel.

use rayon::prelude::*;
use snapedit_core::PixelBuffer;

/// Index into `0..n` with reflect-101 border handling.
#[inline]
pub fn reflect_101(i: isize, n: usize) -> usize {
    let n = n as isize;
    if n <= 1 {
        return 0;
    }
    let mut i = i;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Sigma used when none is given, derived from the kernel size.
#[inline]
pub fn default_sigma(ksize: usize) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian kernel of odd size `ksize`.
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f32> {
    let ksize = ksize.max(1) | 1;
    let sigma = if sigma > 0.0 { sigma } else { default_sigma(ksize) };
    let scale = -0.5 / (sigma * sigma);
    let center = (ksize as f64 - 1.0) * 0.5;

    let mut kernel: Vec<f64> = (0..ksize)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel.into_iter().map(|k| k as f32).collect()
}

/// Separable Gaussian blur with an odd `ksize` x `ksize` kernel.
pub fn gaussian_blur(src: &PixelBuffer, ksize: usize, sigma: f64) -> PixelBuffer {
    let mut out = src.clone();
    if src.is_empty() {
        return out;
    }

    let kernel = gaussian_kernel(ksize, sigma);
    let r = (kernel.len() / 2) as isize;
    let (w, h) = (src.width() as usize, src.height() as usize);
    let cn = src.channels();
    let stride = src.stride();
    let data = src.as_bytes();

    // Horizontal pass into f32 scratch
    let mut tmp = vec![0.0f32; stride * h];
    tmp.par_chunks_mut(stride).enumerate().for_each(|(y, row_out)| {
        let row_in = &data[y * stride..(y + 1) * stride];
        for x in 0..w {
            for c in 0..3 {
                let mut acc = 0.0f32;
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as isize + k as isize - r, w);
                    acc += row_in[sx * cn + c] as f32 * weight;
                }
                row_out[x * cn + c] = acc;
            }
        }
    });

    // Vertical pass back to u8
    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                for c in 0..3 {
                    let mut acc = 0.0f32;
                    for (k, weight) in kernel.iter().enumerate() {
                        let sy = reflect_101(y as isize + k as isize - r, h);
                        acc += tmp[sy * stride + x * cn + c] * weight;
                    }
                    row_out[x * cn + c] = acc.round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    out
}

/// Edge-preserving bilateral filter.
///
/// Neighbours within a disc of radius `diameter / 2` are weighted by spatial
/// distance and by the L1 color distance summed over the three color channels.
pub fn bilateral_filter(
    src: &PixelBuffer,
    diameter: i32,
    sigma_color: f64,
    sigma_space: f64,
) -> PixelBuffer {
    let mut out = src.clone();
    if src.is_empty() {
        return out;
    }

    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };
    let radius = if diameter <= 0 {
        (sigma_space * 1.5).round() as i32
    } else {
        diameter / 2
    }
    .max(1);

    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    // Color weight indexed by the summed absolute difference of 3 channels
    let color_weight: Vec<f32> = (0..256 * 3)
        .map(|i| ((i * i) as f64 * color_coeff).exp() as f32)
        .collect();

    let mut offsets: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            if dist > radius as f64 {
                continue;
            }
            let weight = (dist * dist * space_coeff).exp() as f32;
            offsets.push((dx as isize, dy as isize, weight));
        }
    }

    let (w, h) = (src.width() as usize, src.height() as usize);
    let cn = src.channels();
    let stride = src.stride();
    let data = src.as_bytes();

    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                let center = &data[y * stride + x * cn..y * stride + x * cn + 3];
                let mut sum = [0.0f32; 3];
                let mut wsum = 0.0f32;
                for &(dx, dy, space_w) in &offsets {
                    let sx = reflect_101(x as isize + dx, w);
                    let sy = reflect_101(y as isize + dy, h);
                    let idx = sy * stride + sx * cn;
                    let px = &data[idx..idx + 3];
                    let diff = center
                        .iter()
                        .zip(px)
                        .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs() as usize)
                        .sum::<usize>();
                    let weight = space_w * color_weight[diff];
                    for c in 0..3 {
                        sum[c] += px[c] as f32 * weight;
                    }
                    wsum += weight;
                }
                for c in 0..3 {
                    row_out[x * cn + c] = (sum[c] / wsum).round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    out
}
