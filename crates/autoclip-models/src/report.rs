//! Per-video processing reports.

use serde::{Deserialize, Serialize};

use crate::highlight::Highlight;
use crate::probe::MediaProbe;

/// Maximum number of highlights recorded in a report.
pub const REPORT_HIGHLIGHT_CAP: usize = 10;

/// Result record for one processed video.
///
/// One report is produced per source video, serialized to JSON next to the
/// exported files. A report with an error marker means the video was skipped
/// or failed; sibling videos are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoReport {
    /// Source path as given.
    pub file: String,

    /// Probe metadata (best-effort).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<MediaProbe>,

    /// First [`REPORT_HIGHLIGHT_CAP`] highlights of the selection.
    #[serde(default)]
    pub highlights: Vec<Highlight>,

    /// Output files produced (or planned, when `dry_run` is set).
    #[serde(default)]
    pub outputs: Vec<String>,

    /// Whether the run skipped encoder invocations.
    #[serde(default)]
    pub dry_run: bool,

    /// Error marker when the video was skipped or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoReport {
    /// Create an empty report for a source file.
    pub fn new(file: impl Into<String>, dry_run: bool) -> Self {
        Self {
            file: file.into(),
            probe: None,
            highlights: Vec::new(),
            outputs: Vec::new(),
            dry_run,
            error: None,
        }
    }

    /// Create a report marking the video as failed.
    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(file, false)
        }
    }

    /// Record the selection, truncated to the report cap.
    pub fn record_highlights(&mut self, highlights: &[Highlight]) {
        self.highlights = highlights
            .iter()
            .take(REPORT_HIGHLIGHT_CAP)
            .copied()
            .collect();
    }

    /// Whether this video terminated without producing output.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlights_truncated_to_cap() {
        let mut report = VideoReport::new("clip.mp4", false);
        let highlights: Vec<Highlight> = (0..20)
            .map(|i| Highlight::new(i as f64, i as f64 + 1.0, 1.0))
            .collect();
        report.record_highlights(&highlights);
        assert_eq!(report.highlights.len(), REPORT_HIGHLIGHT_CAP);
    }

    #[test]
    fn test_error_marker_omitted_when_absent() {
        let report = VideoReport::new("clip.mp4", true);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("error"));
        assert!(json.contains("\"dry_run\":true"));

        let failed = VideoReport::failed("clip.mp4", "missing_file");
        assert!(failed.is_failed());
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("missing_file"));
    }
}
