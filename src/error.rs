//! Error types for the bgremover crate.

/// Errors that can occur during background segmentation and file processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes could not be decoded as an image.
    #[error("failed to decode input image: {0}")]
    Decode(image::ImageError),

    /// The image has no pixels to segment.
    #[error("degenerate image dimensions ({width}x{height})")]
    DegenerateImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// Consensus inputs do not share the same dimensions.
    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        /// Width of the first input.
        expected_width: u32,
        /// Height of the first input.
        expected_height: u32,
        /// Width of the offending input.
        width: u32,
        /// Height of the offending input.
        height: u32,
    },

    /// Consensus was invoked with no inputs to merge.
    #[error("no segmentation results to combine")]
    EmptyConsensus,

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format cannot represent an alpha channel (or is unknown).
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
