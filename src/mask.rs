//! Per-pixel confidence masks and morphological cleanup.
//!
//! A [`Mask`] is a flat `y * width + x` byte buffer holding foreground
//! confidence (0 = background, 255 = foreground, intermediate values appear
//! only while smoothing). Cleanup passes are small and classical: a 3x3
//! median (majority value for binary masks) and a clamped box blur.

use image::{Rgba, RgbaImage};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A per-pixel intensity grid with the same dimensions as its source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Create a zero-filled (all background) mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Intensity at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }

    /// Set the intensity at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.data[(y * self.width + x) as usize] = value;
    }

    /// The flat `y * width + x` intensity buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fill the mask row by row with `fill(y, row)`.
    ///
    /// Rows are independent, so the pass runs row-chunked in parallel when the
    /// `parallel` feature is enabled.
    pub fn fill_rows<F>(&mut self, fill: F)
    where
        F: Fn(u32, &mut [u8]) + Sync,
    {
        let width = self.width as usize;
        if width == 0 {
            return;
        }

        #[cfg(feature = "parallel")]
        {
            self.data
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    #[allow(clippy::cast_possible_truncation)]
                    fill(y as u32, row);
                });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (y, row) in self.data.chunks_mut(width).enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                fill(y as u32, row);
            }
        }
    }

    /// 3x3 median filter with border replication.
    ///
    /// Each cell becomes the median of itself and its 8 neighbors (coordinates
    /// clamped at the borders). For binary masks this is a majority filter: it
    /// drops isolated speckles and smooths jagged region boundaries.
    #[must_use]
    pub fn median3(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        if self.width == 0 || self.height == 0 {
            return out;
        }

        let w = i64::from(self.width);
        let h = i64::from(self.height);
        out.fill_rows(|y, row| {
            let mut window = [0u8; 9];
            for (x, cell) in row.iter_mut().enumerate() {
                let mut n = 0;
                for dy in -1..=1i64 {
                    for dx in -1..=1i64 {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let sx = (x as i64 + dx).clamp(0, w - 1) as u32;
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let sy = (i64::from(y) + dy).clamp(0, h - 1) as u32;
                        window[n] = self.get(sx, sy);
                        n += 1;
                    }
                }
                window.sort_unstable();
                *cell = window[4];
            }
        });
        out
    }

    /// Repeated separable box blur with clamped windows.
    ///
    /// Three passes at radius 2 approximate a Gaussian blur with a standard
    /// deviation of about 2 pixels.
    #[must_use]
    pub fn box_blur(&self, radius: u32, passes: u32) -> Self {
        let mut current = self.clone();
        if self.width == 0 || self.height == 0 || radius == 0 {
            return current;
        }

        for _ in 0..passes {
            current = current.box_blur_once(radius);
        }
        current
    }

    fn box_blur_once(&self, radius: u32) -> Self {
        let r = i64::from(radius);
        let w = i64::from(self.width);
        let h = i64::from(self.height);

        // Horizontal pass.
        let mut horizontal = Self::new(self.width, self.height);
        horizontal.fill_rows(|y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                let x = x as i64;
                let lo = (x - r).max(0);
                let hi = (x + r).min(w - 1);
                let mut sum = 0u32;
                for sx in lo..=hi {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    {
                        sum += u32::from(self.get(sx as u32, y));
                    }
                }
                #[allow(clippy::cast_possible_truncation)]
                {
                    *cell = (sum / (hi - lo + 1) as u32) as u8;
                }
            }
        });

        // Vertical pass.
        let mut out = Self::new(self.width, self.height);
        out.fill_rows(|y, row| {
            let y = i64::from(y);
            let lo = (y - r).max(0);
            let hi = (y + r).min(h - 1);
            for (x, cell) in row.iter_mut().enumerate() {
                let mut sum = 0u32;
                for sy in lo..=hi {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    {
                        sum += u32::from(horizontal.get(x as u32, sy as u32));
                    }
                }
                #[allow(clippy::cast_possible_truncation)]
                {
                    *cell = (sum / (hi - lo + 1) as u32) as u8;
                }
            }
        });
        out
    }
}

/// Composite an image against a mask.
///
/// Pixels where `mask > cutoff` (strictly) keep their original RGBA value;
/// everything else becomes fully transparent `(0, 0, 0, 0)`.
#[must_use]
pub fn apply_mask(image: &RgbaImage, mask: &Mask, cutoff: u8) -> RgbaImage {
    let mut out = RgbaImage::new(image.width(), image.height());
    for (x, y, px) in image.enumerate_pixels() {
        if mask.get(x, y) > cutoff {
            out.put_pixel(x, y, *px);
        } else {
            out.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }
    out
}

/// Binary occupancy mask from an image's alpha channel: 255 where `alpha > 0`.
#[must_use]
pub fn alpha_occupancy(image: &RgbaImage) -> Mask {
    let mut mask = Mask::new(image.width(), image.height());
    for (x, y, px) in image.enumerate_pixels() {
        if px[3] > 0 {
            mask.set(x, y, 255);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_removes_isolated_speckle() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, 255);
        let cleaned = mask.median3();
        assert_eq!(cleaned.get(2, 2), 0);
    }

    #[test]
    fn median_preserves_solid_region_interior() {
        let mut mask = Mask::new(10, 10);
        for y in 2..8 {
            for x in 2..8 {
                mask.set(x, y, 255);
            }
        }
        let cleaned = mask.median3();
        // Interior survives; corners of the square erode (4 of 9 in window).
        assert_eq!(cleaned.get(4, 4), 255);
        assert_eq!(cleaned.get(2, 2), 0);
        assert_eq!(cleaned.get(3, 2), 255);
    }

    #[test]
    fn median_handles_one_pixel_mask() {
        let mut mask = Mask::new(1, 1);
        mask.set(0, 0, 255);
        assert_eq!(mask.median3().get(0, 0), 255);
    }

    #[test]
    fn box_blur_leaves_uniform_mask_unchanged() {
        let mut mask = Mask::new(8, 8);
        mask.fill_rows(|_, row| row.fill(200));
        let blurred = mask.box_blur(2, 3);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(blurred.get(x, y), 200);
            }
        }
    }

    #[test]
    fn box_blur_spreads_intensity_outward() {
        let mut mask = Mask::new(9, 9);
        mask.set(4, 4, 255);
        let blurred = mask.box_blur(2, 1);
        assert!(blurred.get(4, 4) < 255);
        assert!(blurred.get(5, 4) > 0);
        assert_eq!(blurred.get(8, 8), 0);
    }

    #[test]
    fn apply_mask_cutoff_is_strict() {
        let img = RgbaImage::from_pixel(2, 1, Rgba([7, 7, 7, 255]));
        let mut mask = Mask::new(2, 1);
        mask.set(0, 0, 128);
        mask.set(1, 0, 129);
        let out = apply_mask(&img, &mask, 128);
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([7, 7, 7, 255]));
    }

    #[test]
    fn alpha_occupancy_tracks_nonzero_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 0]));
        img.put_pixel(1, 0, Rgba([1, 2, 3, 1]));
        let mask = alpha_occupancy(&img);
        assert_eq!(mask.get(0, 0), 0);
        assert_eq!(mask.get(1, 0), 255);
    }
}
