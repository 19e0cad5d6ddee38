//! Remove image backgrounds via multi-strategy heuristic segmentation.
//!
//! Four independent classical-vision strategies classify every pixel as
//! foreground or background: center-seeded region growth, edge-color
//! clustering, gradient/edge distance falloff, and a border-histogram
//! adaptive threshold. The default "smart" method runs the first three
//! concurrently and merges them by per-pixel majority vote; the
//! border-histogram pass is held in reserve as the fallback when a strategy
//! fails. The engine is deterministic: identical input pixels always produce
//! byte-identical output.
//!
//! # Quick Start
//!
//! ```no_run
//! use bgremover::{Method, RemovalEngine};
//!
//! let engine = RemovalEngine::new();
//! let img = image::open("photo.jpg").unwrap().to_rgba8();
//! let cutout = engine.process(&img, Method::Smart);
//! cutout.save("cutout.png").unwrap();
//! ```
//!
//! # Single strategies
//!
//! Each strategy is also available on its own, returning an error instead of
//! falling back:
//!
//! ```no_run
//! use bgremover::{RemovalEngine, StrategyKind};
//!
//! let engine = RemovalEngine::new();
//! let img = image::open("photo.jpg").unwrap().to_rgba8();
//! let cutout = engine.segment(&img, StrategyKind::BorderHistogram).unwrap();
//! ```

#![deny(missing_docs)]

pub mod color;
pub mod consensus;
mod engine;
pub mod error;
pub mod filter;
pub mod mask;
pub mod sampling;
pub mod strategy;

pub use engine::{
    default_output_path, is_supported_image, load_image, save_image, Method, ProcessOptions,
    ProcessResult, RemovalEngine,
};
pub use error::{Error, Result};
pub use strategy::{
    BorderHistogramConfig, CenterSeedConfig, EdgeClusterConfig, GradientConfig, StrategyConfig,
    StrategyKind,
};
