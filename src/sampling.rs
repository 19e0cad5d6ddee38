//! Border pixel sampling for background color estimation.
//!
//! The subject of a photograph rarely touches all four image borders, so the
//! border pixels are a cheap, bounded source of background evidence. Two
//! sampling policies are provided: a dense strip histogram that returns the
//! most frequent border color, and a single-line sweep that returns the mean
//! border color. Both run in time linear in the image perimeter.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

/// Strip width divisor for dense sampling: `strip = min(w, h) / STRIP_DIVISOR`.
pub const STRIP_DIVISOR: u32 = 20;

/// Stride divisor for dense sampling: `stride = max(1, dim / STRIDE_DIVISOR)`.
pub const STRIDE_DIVISOR: u32 = 50;

/// Most frequent color in a dense strip along all four image borders.
///
/// Samples a strip of width `max(1, min(w, h) / 20)` along each edge, at a
/// stride of `max(1, dim / 50)` along the edge's long axis, and returns the
/// exact RGBA value seen most often. Ties are broken by first occurrence, so
/// the result is deterministic for identical input pixels.
///
/// Returns `None` for zero-area images.
#[must_use]
pub fn border_mode(image: &RgbaImage) -> Option<Rgba<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    // Strip width clamps to at least one line so tiny images still sample.
    let strip = (width.min(height) / STRIP_DIVISOR).max(1);
    let stride_x = (width / STRIDE_DIVISOR).max(1);
    let stride_y = (height / STRIDE_DIVISOR).max(1);

    let mut counts: HashMap<[u8; 4], (u32, u32)> = HashMap::new();
    let mut order = 0u32;
    let mut tally = |px: &Rgba<u8>| {
        let entry = counts.entry(px.0).or_insert_with(|| {
            order += 1;
            (0, order)
        });
        entry.0 += 1;
    };

    for x in (0..width).step_by(stride_x as usize) {
        for j in 0..strip {
            tally(image.get_pixel(x, j));
            tally(image.get_pixel(x, height - 1 - j));
        }
    }
    for y in (0..height).step_by(stride_y as usize) {
        for j in 0..strip {
            tally(image.get_pixel(j, y));
            tally(image.get_pixel(width - 1 - j, y));
        }
    }

    counts
        .into_iter()
        .max_by(|(_, (ca, oa)), (_, (cb, ob))| ca.cmp(cb).then(ob.cmp(oa)))
        .map(|(color, _)| Rgba(color))
}

/// Mean RGB color of the outermost row and column on each side.
///
/// Collects the top and bottom rows plus the left and right columns (corner
/// pixels fall on two lines and are counted twice) and averages each channel.
/// Returns `None` for zero-area images.
#[must_use]
pub fn border_mean(image: &RgbaImage) -> Option<[f64; 3]> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let mut sums = [0.0f64; 3];
    let mut count = 0u64;
    let mut add = |px: &Rgba<u8>| {
        sums[0] += f64::from(px[0]);
        sums[1] += f64::from(px[1]);
        sums[2] += f64::from(px[2]);
        count += 1;
    };

    for x in 0..width {
        add(image.get_pixel(x, 0));
        add(image.get_pixel(x, height - 1));
    }
    for y in 0..height {
        add(image.get_pixel(0, y));
        add(image.get_pixel(width - 1, y));
    }

    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    Some([sums[0] / n, sums[1] / n, sums[2] / n])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn border_mode_finds_dominant_border_color() {
        // Blue field with a red square that never touches the sampled strip.
        let mut img = solid(100, 100, [0, 0, 255, 255]);
        for y in 30..70 {
            for x in 30..70 {
                img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        assert_eq!(border_mode(&img), Some(Rgba([0, 0, 255, 255])));
    }

    #[test]
    fn border_mode_handles_one_pixel_image() {
        let img = solid(1, 1, [9, 8, 7, 255]);
        assert_eq!(border_mode(&img), Some(Rgba([9, 8, 7, 255])));
    }

    #[test]
    fn border_mode_rejects_zero_area_image() {
        assert!(border_mode(&RgbaImage::new(0, 0)).is_none());
    }

    #[test]
    fn border_mean_of_uniform_image_is_exact() {
        let img = solid(40, 25, [10, 20, 30, 255]);
        let mean = border_mean(&img).unwrap();
        assert!((mean[0] - 10.0).abs() < 1e-9);
        assert!((mean[1] - 20.0).abs() < 1e-9);
        assert!((mean[2] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn border_mean_ignores_interior_pixels() {
        let mut img = solid(50, 50, [0, 0, 255, 255]);
        for y in 1..49 {
            for x in 1..49 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let mean = border_mean(&img).unwrap();
        assert!(mean[0].abs() < 1e-9);
        assert!(mean[1].abs() < 1e-9);
        assert!((mean[2] - 255.0).abs() < 1e-9);
    }

    #[test]
    fn border_mean_handles_one_pixel_image() {
        let mean = border_mean(&solid(1, 1, [100, 150, 200, 255])).unwrap();
        assert!((mean[0] - 100.0).abs() < 1e-9);
        assert!((mean[1] - 150.0).abs() < 1e-9);
        assert!((mean[2] - 200.0).abs() < 1e-9);
    }
}
