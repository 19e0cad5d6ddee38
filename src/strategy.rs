//! The four background segmentation strategies.
//!
//! Each strategy is a pure function `(image, config) -> RGBA result`: it
//! estimates a background reference color (or an edge geometry), classifies
//! every pixel against a fixed or position-adaptive threshold, optionally
//! smooths the resulting mask, and composites the input against it. The
//! strategies share no state and may run concurrently on the same decoded
//! image.

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::{color, filter, mask, mask::Mask, sampling};

/// Identifies one of the four segmentation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Grow a foreground region outward from the image center color.
    CenterSeed,
    /// Classify against the mean border color with an edge-weighted threshold.
    EdgeCluster,
    /// Keep pixels near detected edges, fading with coordinate distance.
    GradientDistance,
    /// Classify against the dominant border color with a center-weighted tolerance.
    BorderHistogram,
}

/// Tunables for [`StrategyKind::CenterSeed`].
#[derive(Debug, Clone)]
pub struct CenterSeedConfig {
    /// Maximum color distance from the center pixel to count as foreground.
    pub similarity: f64,
    /// Mask intensity (exclusive) above which a pixel is composited as foreground.
    pub mask_cutoff: u8,
}

impl Default for CenterSeedConfig {
    fn default() -> Self {
        Self {
            similarity: 50.0,
            mask_cutoff: 128,
        }
    }
}

/// Tunables for [`StrategyKind::EdgeCluster`].
#[derive(Debug, Clone)]
pub struct EdgeClusterConfig {
    /// Threshold at the image border.
    pub base: f64,
    /// Threshold growth per pixel of distance from the nearest border.
    pub spread: f64,
    /// Radius of the box blur smoothing the confidence mask.
    pub blur_radius: u32,
    /// Number of blur passes (three passes approximate a Gaussian).
    pub blur_passes: u32,
    /// Smoothed intensity (exclusive) above which a pixel is kept.
    pub mask_cutoff: u8,
}

impl Default for EdgeClusterConfig {
    fn default() -> Self {
        Self {
            base: 60.0,
            spread: 0.5,
            blur_radius: 2,
            blur_passes: 3,
            mask_cutoff: 100,
        }
    }
}

/// Tunables for [`StrategyKind::GradientDistance`].
#[derive(Debug, Clone)]
pub struct GradientConfig {
    /// Contrast stretch factor applied before edge enhancement.
    pub contrast: f64,
    /// Edge-map intensity (exclusive) above which a pixel is an edge point.
    pub edge_cutoff: u8,
    /// Cost cap: only the first N edge points in scan order participate in
    /// the distance transform. Raising it trades speed for edge coverage.
    pub max_edge_points: usize,
    /// Distances below this map to full foreground confidence.
    pub near: f64,
    /// Distances at or beyond this map to zero confidence.
    pub far: f64,
    /// Mask intensity (exclusive) above which a pixel is kept.
    pub mask_cutoff: u8,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            contrast: 2.0,
            edge_cutoff: 50,
            max_edge_points: 100,
            near: 20.0,
            far: 50.0,
            mask_cutoff: 128,
        }
    }
}

/// Tunables for [`StrategyKind::BorderHistogram`].
#[derive(Debug, Clone)]
pub struct BorderHistogramConfig {
    /// Tolerance at the image center.
    pub base_tolerance: f64,
    /// Additional tolerance at a full half-diagonal from the center.
    pub spread: f64,
    /// Filtered occupancy intensity (exclusive) above which a pixel survives
    /// small-region removal.
    pub mask_cutoff: u8,
}

impl Default for BorderHistogramConfig {
    fn default() -> Self {
        Self {
            base_tolerance: 30.0,
            spread: 40.0,
            mask_cutoff: 128,
        }
    }
}

/// Per-strategy tunables, one independent set per strategy.
#[derive(Debug, Clone, Default)]
pub struct StrategyConfig {
    /// Constants for the center-seed strategy.
    pub center_seed: CenterSeedConfig,
    /// Constants for the edge-cluster strategy.
    pub edge_cluster: EdgeClusterConfig,
    /// Constants for the gradient-distance strategy.
    pub gradient: GradientConfig,
    /// Constants for the border-histogram strategy.
    pub border_histogram: BorderHistogramConfig,
}

/// Run the strategy identified by `kind` on `image`.
///
/// # Errors
///
/// Returns [`Error::DegenerateImage`] for zero-area inputs.
pub fn apply(image: &RgbaImage, kind: StrategyKind, config: &StrategyConfig) -> Result<RgbaImage> {
    match kind {
        StrategyKind::CenterSeed => center_seed(image, &config.center_seed),
        StrategyKind::EdgeCluster => edge_cluster(image, &config.edge_cluster),
        StrategyKind::GradientDistance => gradient_distance(image, &config.gradient),
        StrategyKind::BorderHistogram => border_histogram(image, &config.border_histogram),
    }
}

fn require_pixels(image: &RgbaImage) -> Result<(u32, u32)> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::DegenerateImage { width, height });
    }
    Ok((width, height))
}

/// Center-seed growth: the subject is assumed to sit in the middle.
///
/// The central rectangle covering half the image width and height is marked
/// foreground unconditionally; every other pixel joins the foreground when its
/// color sits within `similarity` of the center pixel. A 3x3 median pass
/// smooths the mask before compositing.
///
/// # Errors
///
/// Returns [`Error::DegenerateImage`] for zero-area inputs.
pub fn center_seed(image: &RgbaImage, config: &CenterSeedConfig) -> Result<RgbaImage> {
    let (width, height) = require_pixels(image)?;

    let reference = *image.get_pixel(width / 2, height / 2);
    let (margin_x, margin_y) = (width / 4, height / 4);
    let seed_x = (width / 2).saturating_sub(margin_x)..width / 2 + margin_x;
    let seed_y = (height / 2).saturating_sub(margin_y)..height / 2 + margin_y;

    let mut confidence = Mask::new(width, height);
    confidence.fill_rows(|y, row| {
        let seed_row = seed_y.contains(&y);
        for (x, cell) in row.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let x = x as u32;
            if (seed_row && seed_x.contains(&x))
                || color::distance(*image.get_pixel(x, y), reference) < config.similarity
            {
                *cell = 255;
            }
        }
    });

    let cleaned = confidence.median3();
    Ok(mask::apply_mask(image, &cleaned, config.mask_cutoff))
}

/// Edge-color clustering: the border estimates the background.
///
/// The mean color of the outermost border lines stands in for the background;
/// pixels far enough from it are foreground. The bar rises toward the image
/// center, so a pixel deep inside the frame must differ strongly to be kept
/// while border pixels are let go easily.
///
/// # Errors
///
/// Returns [`Error::DegenerateImage`] for zero-area inputs.
pub fn edge_cluster(image: &RgbaImage, config: &EdgeClusterConfig) -> Result<RgbaImage> {
    let (width, height) = require_pixels(image)?;

    let reference = sampling::border_mean(image).ok_or(Error::DegenerateImage {
        width,
        height,
    })?;

    let mut confidence = Mask::new(width, height);
    confidence.fill_rows(|y, row| {
        for (x, cell) in row.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let x = x as u32;
            let threshold =
                color::edge_weighted_threshold(x, y, width, height, config.base, config.spread);
            if color::distance_to(*image.get_pixel(x, y), reference) > threshold {
                *cell = 255;
            }
        }
    });

    let smoothed = confidence.box_blur(config.blur_radius, config.blur_passes);
    Ok(mask::apply_mask(image, &smoothed, config.mask_cutoff))
}

/// Gradient segmentation: foreground lives near detected edges.
///
/// An edge map is built by blending a plain edge-detection pass with an
/// edge-enhancement pass over the contrast-stretched grayscale image. Pixels
/// whose coordinate distance to the nearest edge point is under `near` are
/// certain foreground; confidence falls off linearly to zero at `far`. Only
/// the first `max_edge_points` edge points discovered in scan order (columns
/// left to right, top to bottom within a column) participate.
///
/// # Errors
///
/// Returns [`Error::DegenerateImage`] for zero-area inputs.
pub fn gradient_distance(image: &RgbaImage, config: &GradientConfig) -> Result<RgbaImage> {
    let (width, height) = require_pixels(image)?;
    let (w, h) = (width as usize, height as usize);

    let gray = filter::grayscale(image);
    let edges = filter::convolve3(&gray, w, h, &filter::FIND_EDGES);
    let enhanced = filter::stretch_contrast(&gray, config.contrast);
    let enhanced_edges = filter::convolve3(&enhanced, w, h, &filter::EDGE_ENHANCE_MORE);
    let edge_map = filter::blend_half(&edges, &enhanced_edges);

    let mut points: Vec<(u32, u32)> = Vec::with_capacity(config.max_edge_points);
    'discover: for x in 0..width {
        for y in 0..height {
            if edge_map[(y as usize) * w + (x as usize)] > config.edge_cutoff {
                points.push((x, y));
                if points.len() == config.max_edge_points {
                    break 'discover;
                }
            }
        }
    }

    let mut confidence = Mask::new(width, height);
    if !points.is_empty() {
        confidence.fill_rows(|y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                let x = x as u32;
                let mut nearest_sq = f64::INFINITY;
                for &(ex, ey) in &points {
                    let dx = f64::from(x) - f64::from(ex);
                    let dy = f64::from(y) - f64::from(ey);
                    let sq = dx * dx + dy * dy;
                    if sq < nearest_sq {
                        nearest_sq = sq;
                    }
                }
                let nearest = nearest_sq.sqrt();
                *cell = if nearest < config.near {
                    255
                } else if nearest < config.far {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    {
                        (255.0 * (config.far - nearest) / (config.far - config.near)) as u8
                    }
                } else {
                    0
                };
            }
        });
    }

    Ok(mask::apply_mask(image, &confidence, config.mask_cutoff))
}

/// Border-histogram adaptive threshold.
///
/// The most frequent color in a dense border strip estimates the background.
/// A pixel whose distance to that estimate falls under the center-weighted
/// tolerance becomes transparent; the rest keep their original value. A final
/// occupancy-median pass removes small isolated survivors.
///
/// # Errors
///
/// Returns [`Error::DegenerateImage`] for zero-area inputs.
pub fn border_histogram(image: &RgbaImage, config: &BorderHistogramConfig) -> Result<RgbaImage> {
    let (width, height) = require_pixels(image)?;

    let mode = sampling::border_mode(image).ok_or(Error::DegenerateImage {
        width,
        height,
    })?;
    let reference = [f64::from(mode[0]), f64::from(mode[1]), f64::from(mode[2])];

    let mut keep = Mask::new(width, height);
    keep.fill_rows(|y, row| {
        for (x, cell) in row.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let x = x as u32;
            let tolerance = color::center_weighted_tolerance(
                x,
                y,
                width,
                height,
                config.base_tolerance,
                config.spread,
            );
            if color::distance_to(*image.get_pixel(x, y), reference) >= tolerance {
                *cell = 255;
            }
        }
    });

    let mut composed = RgbaImage::new(width, height);
    for (x, y, px) in image.enumerate_pixels() {
        if keep.get(x, y) == 255 {
            composed.put_pixel(x, y, *px);
        } else {
            composed.put_pixel(x, y, Rgba([255, 255, 255, 0]));
        }
    }

    // Small-region removal: median-filter the alpha occupancy and re-gate.
    let filtered = mask::alpha_occupancy(&composed).median3();
    Ok(mask::apply_mask(&composed, &filtered, config.mask_cutoff))
}
