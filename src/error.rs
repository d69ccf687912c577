//! Error taxonomy for the detection pipeline.
//!
//! Geometric and configuration failures are deterministic: retrying the same
//! input cannot change the outcome, so errors propagate to the caller of the
//! composed entry point, which decides whether to skip the page or abort a
//! batch. Empty results (no lines, no elements) are not errors; stages log a
//! warning and return empty collections.

use crate::types::{LineOrientation, Rect};
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DetectError>;

#[derive(Debug, Error)]
pub enum DetectError {
    /// A threshold parameter is missing, out of range or contradictory.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A cluster rectangle that survived the span filter contains no
    /// foreground pixels when cropped for line fitting. This indicates a
    /// tuning mismatch between stroke thickness and span filters and must
    /// not be skipped silently: the resulting table structure would be
    /// incomplete in a way the caller cannot detect.
    #[error("{orientation:?} cluster {rect:?} contains no line pixels to fit")]
    DegenerateCluster {
        orientation: LineOrientation,
        rect: Rect,
    },

    /// The least-squares fit failed to produce a finite line direction.
    #[error("line fit over {point_count} points produced no finite direction")]
    LineFit { point_count: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        DetectError::Configuration(msg.into())
    }
}
