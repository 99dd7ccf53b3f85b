//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

use autoclip_media::MediaError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that terminate one video's processing.
///
/// Failures stay local to the affected video: the batch executor catches
/// them at the task boundary and synthesizes a failed report while sibling
/// videos continue.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Source file missing: {0}")]
    MissingSource(PathBuf),

    #[error("Media operation failed: {0}")]
    Media(#[from] MediaError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Worker task panicked: {0}")]
    TaskPanicked(String),
}

impl PipelineError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
