//! Grayscale filters backing the gradient segmentation strategy.
//!
//! Small fixed-kernel operations on flat `y * width + x` luma buffers: 3x3
//! convolution (border pixels pass through unfiltered), linear contrast
//! stretch around the image mean, and a 50/50 blend of two filter outputs.

use image::RgbaImage;

/// 3x3 edge-detection kernel (high-pass, zero response on flat regions).
pub const FIND_EDGES: [i32; 9] = [-1, -1, -1, -1, 8, -1, -1, -1, -1];

/// 3x3 edge-enhancement kernel (unit DC gain, exaggerated local contrast).
pub const EDGE_ENHANCE_MORE: [i32; 9] = [-1, -1, -1, -1, 9, -1, -1, -1, -1];

/// Convert an RGBA image to a flat grayscale buffer (ITU-R 601-2 luma).
#[must_use]
pub fn grayscale(image: &RgbaImage) -> Vec<u8> {
    let mut gray = Vec::with_capacity((image.width() as usize) * (image.height() as usize));
    for px in image.pixels() {
        let lum =
            (u32::from(px[0]) * 299 + u32::from(px[1]) * 587 + u32::from(px[2]) * 114 + 500)
                / 1000;
        #[allow(clippy::cast_possible_truncation)]
        gray.push(lum as u8);
    }
    gray
}

/// Convolve a grayscale buffer with a 3x3 kernel, clamping results to 0-255.
///
/// The one-pixel border is copied from the source unfiltered; images narrower
/// or shorter than 3 pixels are returned unchanged.
#[must_use]
pub fn convolve3(gray: &[u8], width: usize, height: usize, kernel: &[i32; 9]) -> Vec<u8> {
    let mut out = gray.to_vec();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = 0i32;
            let mut k = 0;
            for dy in 0..3 {
                for dx in 0..3 {
                    let sample = gray[(y + dy - 1) * width + (x + dx - 1)];
                    acc += i32::from(sample) * kernel[k];
                    k += 1;
                }
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                out[y * width + x] = acc.clamp(0, 255) as u8;
            }
        }
    }
    out
}

/// Linear contrast stretch around the buffer's mean value.
///
/// `out = mean + factor * (v - mean)`, clamped to 0-255. A factor of 1.0 is
/// the identity; 2.0 doubles the deviation from the mean.
#[must_use]
pub fn stretch_contrast(gray: &[u8], factor: f64) -> Vec<u8> {
    if gray.is_empty() {
        return Vec::new();
    }

    let sum: u64 = gray.iter().map(|&v| u64::from(v)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = ((sum as f64) / (gray.len() as f64) + 0.5).floor();

    gray.iter()
        .map(|&v| {
            let stretched = mean + factor * (f64::from(v) - mean);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                stretched.clamp(0.0, 255.0).round() as u8
            }
        })
        .collect()
}

/// Blend two equal-length buffers 50/50, rounding half up.
#[must_use]
pub fn blend_half(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&va, &vb)| {
            #[allow(clippy::cast_possible_truncation)]
            {
                ((u16::from(va) + u16::from(vb) + 1) / 2) as u8
            }
        })
        .collect()
}
