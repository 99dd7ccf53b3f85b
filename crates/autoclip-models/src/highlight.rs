//! Highlight and manual trim models.

use serde::{Deserialize, Serialize};

/// Score assigned to manually trimmed ranges substituted for detection output.
pub const MANUAL_TRIM_SCORE: f64 = 1.0;

/// A scene retained after duration and motion-score filtering, ranked for
/// inclusion in the final edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    /// Start of the highlight in source time (seconds).
    pub start_secs: f64,

    /// End of the highlight in source time (seconds).
    pub end_secs: f64,

    /// Average motion magnitude over the scene's frame pairs.
    pub score: f64,
}

impl Highlight {
    /// Create a new highlight.
    pub fn new(start_secs: f64, end_secs: f64, score: f64) -> Self {
        Self {
            start_secs,
            end_secs,
            score,
        }
    }

    /// Build a highlight from a manual trim, scored at [`MANUAL_TRIM_SCORE`].
    pub fn from_trim(trim: &TrimRange) -> Self {
        Self {
            start_secs: trim.start_secs,
            end_secs: trim.end_secs,
            score: MANUAL_TRIM_SCORE,
        }
    }

    /// Highlight duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// A manually specified time range, supplied per video in the metadata file.
///
/// Trims are substituted wholesale for detected highlights when detection
/// yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRange {
    /// Start in seconds.
    #[serde(rename = "start")]
    pub start_secs: f64,

    /// End in seconds.
    #[serde(rename = "end")]
    pub end_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_trim_uses_manual_score() {
        let trim = TrimRange {
            start_secs: 2.0,
            end_secs: 4.0,
        };
        let highlight = Highlight::from_trim(&trim);
        assert_eq!(highlight.start_secs, 2.0);
        assert_eq!(highlight.end_secs, 4.0);
        assert_eq!(highlight.score, MANUAL_TRIM_SCORE);
    }

    #[test]
    fn test_trim_serde_field_names() {
        let trim: TrimRange = serde_json::from_str(r#"{"start": 1.5, "end": 3.0}"#).unwrap();
        assert_eq!(trim.start_secs, 1.5);
        assert_eq!(trim.end_secs, 3.0);
    }
}
