//! Timed transcription spans.

use serde::{Deserialize, Serialize};

/// One timed text span returned by the transcription collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSpan {
    /// Span start in seconds.
    pub start_secs: f64,

    /// Span end in seconds.
    pub end_secs: f64,

    /// Spoken text.
    pub text: String,
}

impl TranscriptSpan {
    /// Create a new span.
    pub fn new(start_secs: f64, end_secs: f64, text: impl Into<String>) -> Self {
        Self {
            start_secs,
            end_secs,
            text: text.into(),
        }
    }

    /// Span duration in seconds, floored at a minimum display time.
    pub fn display_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.05)
    }
}
