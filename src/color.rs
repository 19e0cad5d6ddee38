//! Color distance and position-adaptive thresholds.
//!
//! Distances are Euclidean over the RGB channels; alpha never participates.
//! The two threshold shapes are complementary: one grows with distance from
//! the image center (lenient near the border, strict in the middle), the
//! other grows with distance from the nearest border (strict near the border,
//! lenient in the middle). Each segmentation strategy supplies its own
//! `base`/`spread` constants.

use image::Rgba;

/// Euclidean distance between two colors over their RGB channels.
#[must_use]
pub fn distance(a: Rgba<u8>, b: Rgba<u8>) -> f64 {
    let dr = f64::from(a[0]) - f64::from(b[0]);
    let dg = f64::from(a[1]) - f64::from(b[1]);
    let db = f64::from(a[2]) - f64::from(b[2]);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Euclidean distance from a pixel to a fractional RGB reference color.
#[must_use]
pub fn distance_to(px: Rgba<u8>, reference: [f64; 3]) -> f64 {
    let dr = f64::from(px[0]) - reference[0];
    let dg = f64::from(px[1]) - reference[1];
    let db = f64::from(px[2]) - reference[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Tolerance growing with distance from the image center.
///
/// `base + spread * (distance_from_center / half_diagonal)`. The half-diagonal
/// normalization makes the shape resolution independent: the center always
/// gets `base`, the corners approach `base + spread`.
#[must_use]
pub fn center_weighted_tolerance(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    base: f64,
    spread: f64,
) -> f64 {
    let cx = f64::from(width / 2);
    let cy = f64::from(height / 2);
    let dx = f64::from(x) - cx;
    let dy = f64::from(y) - cy;
    let half_diagonal = (f64::from(width) / 2.0).hypot(f64::from(height) / 2.0);
    if half_diagonal <= 0.0 {
        return base;
    }
    base + spread * ((dx.hypot(dy)) / half_diagonal)
}

/// Threshold growing with distance from the nearest image border.
///
/// `base + spread * min(x, y, width-1-x, height-1-y)`. Border pixels get the
/// bare `base`; the requirement to differ from the background estimate rises
/// toward the middle of the image.
#[must_use]
pub fn edge_weighted_threshold(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    base: f64,
    spread: f64,
) -> f64 {
    let to_edge = x
        .min(y)
        .min(width.saturating_sub(x + 1))
        .min(height.saturating_sub(y + 1));
    base + spread * f64::from(to_edge)
}
