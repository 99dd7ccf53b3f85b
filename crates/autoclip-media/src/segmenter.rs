//! Scene segmentation from histogram streams.
//!
//! The segmenter consumes per-frame histograms and partitions the timeline
//! into contiguous scenes at detected cuts. A cut is declared when the
//! Bhattacharyya distance between consecutive histograms exceeds
//! [`SCENE_CUT_THRESHOLD`].

use autoclip_models::Scene;

/// Histogram dissimilarity above which a frame starts a new scene.
///
/// Fixed calibration constant; a candidate for future configuration exposure
/// but not varied by any current config surface.
pub const SCENE_CUT_THRESHOLD: f64 = 0.5;

/// Converts a stream of frame histograms into an ordered scene list.
///
/// Boundaries always start at frame 0 and end at the total frame count, so a
/// non-empty stream produces at least one scene spanning the whole video.
pub struct SceneSegmenter {
    prev_histogram: Option<Vec<f32>>,
    boundaries: Vec<u32>,
}

impl SceneSegmenter {
    /// Create a new segmenter.
    pub fn new() -> Self {
        Self {
            prev_histogram: None,
            boundaries: vec![0],
        }
    }

    /// Process one frame's histogram.
    ///
    /// # Arguments
    /// - `index`: zero-based frame index, strictly increasing
    /// - `histogram`: normalized intensity histogram for the frame
    pub fn ingest(&mut self, index: u32, histogram: &[f32]) {
        if let Some(prev) = &self.prev_histogram {
            let distance = bhattacharyya_distance(prev, histogram);
            if distance > SCENE_CUT_THRESHOLD {
                self.boundaries.push(index);
            }
        }
        self.prev_histogram = Some(histogram.to_vec());
    }

    /// Finalize and return the scene list.
    ///
    /// Must be called after all frames have been ingested. A zero-frame
    /// stream yields no scenes.
    pub fn finalize(mut self, total_frames: u32) -> Vec<Scene> {
        if total_frames == 0 {
            return Vec::new();
        }

        self.boundaries.push(total_frames);
        self.boundaries
            .windows(2)
            .filter(|pair| pair[0] < pair[1])
            .map(|pair| Scene::new(pair[0], pair[1]))
            .collect()
    }

    /// Number of cuts detected so far.
    pub fn cut_count(&self) -> usize {
        self.boundaries.len() - 1
    }
}

impl Default for SceneSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Bhattacharyya distance between two histograms.
///
/// Returns a bounded dissimilarity in [0, 1] where 0 = identical. Mismatched
/// or degenerate histograms compare as identical (no evidence of a cut).
pub fn bhattacharyya_distance(h1: &[f32], h2: &[f32]) -> f64 {
    if h1.len() != h2.len() || h1.is_empty() {
        return 0.0;
    }

    let mut sum1 = 0.0f64;
    let mut sum2 = 0.0f64;
    let mut coefficient = 0.0f64;

    for (a, b) in h1.iter().zip(h2.iter()) {
        let a = *a as f64;
        let b = *b as f64;
        sum1 += a;
        sum2 += b;
        coefficient += (a * b).sqrt();
    }

    let denominator = (sum1 * sum2).sqrt();
    if denominator <= f64::EPSILON {
        return 0.0;
    }

    (1.0 - coefficient / denominator).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_histogram() -> Vec<f32> {
        vec![0.125; 64]
    }

    fn shifted_histogram() -> Vec<f32> {
        let mut hist = vec![0.0; 64];
        hist[63] = 1.0;
        hist
    }

    #[test]
    fn test_distance_identical_is_zero() {
        let hist = uniform_histogram();
        assert!(bhattacharyya_distance(&hist, &hist) < 1e-6);
    }

    #[test]
    fn test_distance_disjoint_is_one() {
        let mut h1 = vec![0.0f32; 64];
        let mut h2 = vec![0.0f32; 64];
        h1[0] = 1.0;
        h2[63] = 1.0;
        assert!((bhattacharyya_distance(&h1, &h2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_bounded() {
        let h1 = uniform_histogram();
        let h2 = shifted_histogram();
        let distance = bhattacharyya_distance(&h1, &h2);
        assert!((0.0..=1.0).contains(&distance));
    }

    #[test]
    fn test_no_cuts_yield_single_scene() {
        let mut segmenter = SceneSegmenter::new();
        let hist = uniform_histogram();
        for index in 0..300 {
            segmenter.ingest(index, &hist);
        }
        let scenes = segmenter.finalize(300);
        assert_eq!(scenes, vec![Scene::new(0, 300)]);
    }

    #[test]
    fn test_cut_splits_timeline() {
        // Simulated hard cut at frame 150: histogram mass jumps buckets.
        let mut segmenter = SceneSegmenter::new();
        let before = uniform_histogram();
        let after = shifted_histogram();
        for index in 0..300 {
            let hist = if index < 150 { &before } else { &after };
            segmenter.ingest(index, hist);
        }
        let scenes = segmenter.finalize(300);
        assert_eq!(scenes, vec![Scene::new(0, 150), Scene::new(150, 300)]);
    }

    #[test]
    fn test_boundaries_cover_timeline() {
        let mut segmenter = SceneSegmenter::new();
        let calm = uniform_histogram();
        let jump = shifted_histogram();
        for index in 0..100 {
            // Cuts at 25 and 75
            let hist = if (25..75).contains(&index) { &jump } else { &calm };
            segmenter.ingest(index, hist);
        }
        let scenes = segmenter.finalize(100);

        assert_eq!(scenes.first().unwrap().start_frame, 0);
        assert_eq!(scenes.last().unwrap().end_frame, 100);
        for pair in scenes.windows(2) {
            assert_eq!(pair[0].end_frame, pair[1].start_frame);
        }
        for scene in &scenes {
            assert!(scene.start_frame < scene.end_frame);
        }
    }

    #[test]
    fn test_empty_stream_yields_no_scenes() {
        let segmenter = SceneSegmenter::new();
        assert!(segmenter.finalize(0).is_empty());
    }

    #[test]
    fn test_first_frame_never_cuts() {
        let mut segmenter = SceneSegmenter::new();
        segmenter.ingest(0, &shifted_histogram());
        assert_eq!(segmenter.cut_count(), 0);
    }
}
