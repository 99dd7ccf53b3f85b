//! End-to-end highlight detection over one source video.

use std::path::Path;
use tracing::info;

use autoclip_models::Highlight;

use crate::features::{FeatureStream, DEFAULT_FPS_FALLBACK};
use crate::scoring::rank_highlights;
use crate::segmenter::SceneSegmenter;

/// Tuning parameters for highlight detection.
#[derive(Debug, Clone)]
pub struct DetectionParams {
    /// Minimum scene duration to qualify as a highlight (seconds).
    pub min_scene_len_secs: f64,
    /// Motion score threshold before calibration scaling.
    pub motion_threshold: f64,
    /// Frame rate assumed when the container reports none.
    pub fps_fallback: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_scene_len_secs: 2.0,
            motion_threshold: 12.0,
            fps_fallback: DEFAULT_FPS_FALLBACK,
        }
    }
}

/// Outcome of one detection pass.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    /// Ranked highlight candidates (full list; callers truncate to top-K).
    pub highlights: Vec<Highlight>,
    /// Total frames decoded.
    pub total_frames: u32,
    /// Effective frame rate used for time conversion.
    pub fps: f64,
}

impl DetectionOutcome {
    /// Source duration derived from the decoded frame count.
    pub fn stream_duration_secs(&self) -> f64 {
        self.total_frames as f64 / self.fps
    }
}

/// Detect scenes and score them into ranked highlights.
///
/// Runs the single decode pass: per-frame features feed the scene segmenter
/// while motion magnitudes accumulate for scoring. An unreadable source
/// produces an empty outcome — "no highlights detected" — not an error.
///
/// This performs blocking decode and optical-flow work; confine it to a
/// blocking thread when called from async code.
pub fn detect_highlights(path: impl AsRef<Path>, params: &DetectionParams) -> DetectionOutcome {
    let path = path.as_ref();

    let mut stream = FeatureStream::open(path, params.fps_fallback);
    let fps = stream.fps();

    let mut segmenter = SceneSegmenter::new();
    let mut motion: Vec<f64> = Vec::new();
    let mut total_frames = 0u32;

    for feature in &mut stream {
        segmenter.ingest(feature.index, &feature.histogram);
        if let Some(magnitude) = feature.motion {
            motion.push(magnitude);
        }
        total_frames = feature.index + 1;
    }

    let cut_count = segmenter.cut_count();
    let scenes = segmenter.finalize(total_frames);
    let highlights = rank_highlights(
        &scenes,
        &motion,
        fps,
        params.min_scene_len_secs,
        params.motion_threshold,
    );

    info!(
        path = %path.display(),
        frames = total_frames,
        cuts = cut_count,
        candidates = highlights.len(),
        "Highlight detection finished"
    );

    DetectionOutcome {
        highlights,
        total_frames,
        fps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_yields_empty_outcome() {
        let outcome = detect_highlights("/not/a/real/file.mp4", &DetectionParams::default());
        assert!(outcome.highlights.is_empty());
        assert_eq!(outcome.total_frames, 0);
        assert_eq!(outcome.fps, DEFAULT_FPS_FALLBACK);
        assert_eq!(outcome.stream_duration_secs(), 0.0);
    }
}
