//! Error types for the landforge pipeline

use thiserror::Error;

/// Main error type for the pipeline.
///
/// Configuration problems abort a run before any grid work begins.
/// Numeric degeneracies (zero amplitude sums, zero-length normals) are
/// guarded with fallback values inside the stages instead of surfacing
/// here; classification gaps are reported through `log::warn`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}: noise layer stack is empty")]
    EmptyLayerStack(String),

    #[error("{0}: noise layer amplitudes sum to zero")]
    ZeroAmplitudeSum(String),

    #[error("{0}: noise layer frequency must be positive, got {1}")]
    InvalidFrequency(String, f64),

    #[error("{0}: noise layer amplitude must be non-negative, got {1}")]
    InvalidAmplitude(String, f64),

    #[error("grid size mismatch: {0} vs {1}")]
    GridSizeMismatch(usize, usize),

    #[error("raster supports 1 or 4 channels, got {0}")]
    UnsupportedChannels(usize),

    #[error("store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
