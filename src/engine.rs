//! Core background removal engine.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::consensus;
use crate::error::{Error, Result};
use crate::strategy::{self, StrategyConfig, StrategyKind};

/// Segmentation method selected by the caller.
///
/// Unrecognized selector strings never fail: they fall through to [`Method::Smart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Ensemble: center-seed, edge-cluster and gradient strategies merged by
    /// per-pixel majority vote. The default.
    #[default]
    Smart,
    /// Border-histogram adaptive threshold alone.
    White,
    /// Gradient/edge-based segmentation alone.
    Edge,
    /// Edge-color clustering alone.
    Color,
}

impl Method {
    /// Parse a method selector string.
    ///
    /// `"white"` and `"smart-v2"` select [`Method::White`], `"edge"` selects
    /// [`Method::Edge`], `"color"` selects [`Method::Color`]; anything else
    /// (including `"smart"` and unknown values) selects [`Method::Smart`].
    #[must_use]
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_lowercase().as_str() {
            "white" | "smart-v2" => Self::White,
            "edge" => Self::Edge,
            "color" => Self::Color,
            _ => Self::Smart,
        }
    }

    /// The canonical selector string for this method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::White => "white",
            Self::Edge => "edge",
            Self::Color => "color",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling file-level processing behavior.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Segmentation method to apply.
    pub method: Method,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Method that was requested.
    pub method: Method,
    /// Human-readable status message.
    pub message: String,
}

/// The background removal engine.
///
/// Create once with [`RemovalEngine::new()`] and reuse for multiple images.
/// Holds the per-strategy tunables; the engine itself carries no per-image
/// state, so a single instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct RemovalEngine {
    config: StrategyConfig,
}

impl RemovalEngine {
    /// Create an engine with the default strategy constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom strategy constants.
    #[must_use]
    pub fn with_config(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// The engine's strategy constants.
    #[must_use]
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Run a single segmentation strategy on a decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateImage`] for zero-area inputs.
    pub fn segment(&self, image: &RgbaImage, kind: StrategyKind) -> Result<RgbaImage> {
        strategy::apply(image, kind, &self.config)
    }

    /// Run the three-strategy ensemble and merge by majority vote.
    ///
    /// The center-seed, edge-cluster and gradient strategies run independently
    /// (concurrently when the `parallel` feature is enabled) over the same
    /// decoded pixels; the border-histogram strategy deliberately stays out of
    /// the vote — it is held in reserve as the fallback.
    ///
    /// # Errors
    ///
    /// Fails when any voting strategy fails; the caller (or
    /// [`RemovalEngine::process`]) decides how to recover.
    pub fn ensemble(&self, image: &RgbaImage) -> Result<RgbaImage> {
        #[cfg(feature = "parallel")]
        let (seeded, (clustered, gradient)) = rayon::join(
            || self.segment(image, StrategyKind::CenterSeed),
            || {
                rayon::join(
                    || self.segment(image, StrategyKind::EdgeCluster),
                    || self.segment(image, StrategyKind::GradientDistance),
                )
            },
        );

        #[cfg(not(feature = "parallel"))]
        let (seeded, (clustered, gradient)) = (
            self.segment(image, StrategyKind::CenterSeed),
            (
                self.segment(image, StrategyKind::EdgeCluster),
                self.segment(image, StrategyKind::GradientDistance),
            ),
        );

        consensus::majority_merge(&[seeded?, clustered?, gradient?])
    }

    /// Remove the background from a decoded image.
    ///
    /// Never fails for a decoded image: if the selected strategy (or the
    /// ensemble) errors, the engine falls back to the border-histogram
    /// strategy on the original pixels, and if that fails too it returns the
    /// original image unchanged.
    #[must_use]
    pub fn process(&self, image: &RgbaImage, method: Method) -> RgbaImage {
        let attempt = match method {
            Method::Smart => self.ensemble(image),
            Method::White => self.segment(image, StrategyKind::BorderHistogram),
            Method::Edge => self.segment(image, StrategyKind::GradientDistance),
            Method::Color => self.segment(image, StrategyKind::EdgeCluster),
        };

        match attempt {
            Ok(result) => result,
            // The border-histogram pass is the reserve; don't re-run it when
            // it was the method that just failed.
            Err(_) if method != Method::White => self
                .segment(image, StrategyKind::BorderHistogram)
                .unwrap_or_else(|_| image.clone()),
            Err(_) => image.clone(),
        }
    }

    /// Process a single image file: load, segment, save.
    ///
    /// Returns a [`ProcessResult`] rather than an error; a file that cannot be
    /// decoded is the only unrecoverable failure class and is reported there.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        opts: &ProcessOptions,
    ) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            success: false,
            method: opts.method,
            message: String::new(),
        };

        let decoded = match load_image(input) {
            Ok(img) => img,
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };

        let processed = self.process(&decoded, opts.method);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match save_image(&processed, output) {
            Ok(()) => {
                result.success = true;
                result.message = format!("Background removed ({} method)", opts.method);
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Process all supported images in a directory.
    ///
    /// Uses parallel iteration when the `parallel` feature is enabled (via
    /// rayon). Returns a [`ProcessResult`] for each image found.
    ///
    /// # Panics
    ///
    /// Panics if any directory entry has no filename (should not happen for
    /// regular files).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let entries: Vec<_> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .filter(|e| is_supported_image(e.path().as_path()))
                .collect(),
            Err(e) => {
                return vec![ProcessResult {
                    path: input_dir.to_path_buf(),
                    success: false,
                    method: opts.method,
                    message: format!("Failed to read directory: {e}"),
                }];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult {
                    path: output_dir.to_path_buf(),
                    success: false,
                    method: opts.method,
                    message: format!("Failed to create output directory: {e}"),
                }];
            }
        }

        let run = |entry: &std::fs::DirEntry| {
            let input_path = entry.path();
            let stem = input_path.file_stem().unwrap().to_string_lossy().to_string();
            let output_path = output_dir.join(format!("{stem}_nobg.png"));
            self.process_file(&input_path, &output_path, opts)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(run).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            entries.iter().map(run).collect()
        }
    }
}

/// Decode an image file into RGBA pixels.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the file cannot be read as an image — the
/// one failure class the engine cannot recover from.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(Error::Decode)?;
    Ok(img.to_rgba8())
}

/// Check if a file has a supported input image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGBA image, restricted to formats that preserve the alpha channel.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for formats that would discard
/// transparency (or cannot be inferred from the path), and an encoding error
/// if writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::WebP => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!(
                "{format:?} cannot preserve the alpha channel"
            )));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// The output is always PNG so transparency survives encoding.
/// Example: `"photo.jpg"` becomes `"photo_nobg.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_nobg.png"))
}
