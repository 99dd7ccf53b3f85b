//! Probed media metadata.

use serde::{Deserialize, Serialize};

/// Container/stream metadata for a source file.
///
/// Every field except the path is optional: probing is best-effort and a
/// failed probe simply leaves fields unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaProbe {
    /// Source path as given.
    pub path: String,

    /// Container duration in seconds.
    pub duration_secs: Option<f64>,

    /// Video width in pixels.
    pub width: Option<u32>,

    /// Video height in pixels.
    pub height: Option<u32>,

    /// Video frame rate.
    pub fps: Option<f64>,

    /// Audio channel count, when an audio stream is present.
    pub audio_channels: Option<u32>,

    /// Audio sample rate in Hz.
    pub sample_rate: Option<u32>,

    /// Container bitrate in bits/second.
    pub bit_rate: Option<u64>,
}

impl MediaProbe {
    /// Create an empty probe for a path.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Whether the source carries an audio stream.
    pub fn has_audio(&self) -> bool {
        self.audio_channels.map(|c| c > 0).unwrap_or(false)
    }
}
