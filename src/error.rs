//! Error types for depth-eval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for depth-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during dataset evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A listed input path does not exist on disk.
    #[error("File does not exist: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Prediction and ground-truth lists have different lengths.
    #[error("Prediction count ({predictions}) should match ground truth count ({ground_truths})")]
    LengthMismatch {
        /// Number of prediction paths.
        predictions: usize,
        /// Number of ground-truth paths.
        ground_truths: usize,
    },

    /// Failed to decode an image file.
    #[error("Image load failed: {path}: {reason}")]
    ImageLoad {
        /// Path to the image that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Unsupported image or sample format.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Channel counts don't match between prediction and ground truth.
    #[error("Channel mismatch: expected {expected}, got {actual}")]
    ChannelMismatch {
        /// Channel count of the first image.
        expected: usize,
        /// Channel count of the second image.
        actual: usize,
    },

    /// Error in dataset discovery.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Error rendering a visual comparison.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
