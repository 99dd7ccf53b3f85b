//! Highlight scoring, filtering and ranking.

use autoclip_models::{Highlight, Scene};

/// Scale applied to the configured motion threshold before filtering scores.
///
/// Fixed calibration constant; flagged as a possible future config surface.
pub const MOTION_SCORE_SCALE: f64 = 0.1;

/// Score scenes by aggregate motion, filter and rank them.
///
/// - `motion[i]` is the flow magnitude between frames `i` and `i + 1`
/// - scenes shorter than `min_scene_len_secs` are dropped
/// - remaining scenes must score at least
///   `motion_threshold * MOTION_SCORE_SCALE`
/// - survivors are sorted by score descending; equal scores keep their
///   original scene order
///
/// The full ranked list is returned; callers truncate to top-K. An empty
/// result is a valid outcome, not an error. The function is pure: the same
/// input always yields the identical list.
pub fn rank_highlights(
    scenes: &[Scene],
    motion: &[f64],
    fps: f64,
    min_scene_len_secs: f64,
    motion_threshold: f64,
) -> Vec<Highlight> {
    let mut highlights: Vec<Highlight> = Vec::new();

    for scene in scenes {
        let start_secs = scene.start_secs(fps);
        let end_secs = scene.end_secs(fps);
        if end_secs - start_secs < min_scene_len_secs {
            continue;
        }

        let score = scene_motion_score(scene, motion);
        if score >= motion_threshold * MOTION_SCORE_SCALE {
            highlights.push(Highlight::new(start_secs, end_secs, score));
        }
    }

    // Stable sort keeps original scene order for equal scores
    highlights.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    highlights
}

/// Average motion magnitude for the frame pairs inside a scene.
///
/// For a scene `[s, e)` the motion sub-range is `[s, max(s, e - 1))`; an
/// empty sub-range scores 0.
pub fn scene_motion_score(scene: &Scene, motion: &[f64]) -> f64 {
    let start = (scene.start_frame as usize).min(motion.len());
    let end = (scene.end_frame as usize)
        .saturating_sub(1)
        .clamp(start, motion.len());

    let window = &motion[start..end];
    if window.is_empty() {
        return 0.0;
    }
    window.iter().sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const FPS: f64 = 30.0;

    fn two_scenes() -> Vec<Scene> {
        vec![Scene::new(0, 150), Scene::new(150, 300)]
    }

    #[test]
    fn test_uniform_low_motion_filters_everything() {
        // Motion below threshold * scale everywhere -> no highlights.
        let motion = vec![0.5; 299];
        let highlights = rank_highlights(&two_scenes(), &motion, FPS, 2.0, 12.0);
        assert!(highlights.is_empty());
    }

    #[test]
    fn test_motion_in_first_scene_only() {
        // Frames [0, 150) move, the rest are static.
        let mut motion = vec![0.0; 299];
        for sample in motion.iter_mut().take(149) {
            *sample = 5.0;
        }
        let highlights = rank_highlights(&two_scenes(), &motion, FPS, 2.0, 12.0);

        assert_eq!(highlights.len(), 1);
        assert!((highlights[0].start_secs - 0.0).abs() < 1e-9);
        assert!((highlights[0].end_secs - 5.0).abs() < 1e-9);
        assert!((highlights[0].score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let scenes = vec![Scene::new(0, 100), Scene::new(100, 200), Scene::new(200, 300)];
        let mut motion = vec![0.0; 299];
        motion[..99].iter_mut().for_each(|m| *m = 2.0);
        motion[100..199].iter_mut().for_each(|m| *m = 9.0);
        motion[200..299].iter_mut().for_each(|m| *m = 4.0);

        let highlights = rank_highlights(&scenes, &motion, FPS, 1.0, 10.0);
        assert_eq!(highlights.len(), 3);
        assert!(highlights[0].score >= highlights[1].score);
        assert!(highlights[1].score >= highlights[2].score);
        assert!((highlights[0].start_secs - 100.0 / FPS).abs() < 1e-9);
    }

    #[test]
    fn test_equal_scores_keep_scene_order() {
        let scenes = vec![Scene::new(0, 100), Scene::new(100, 200)];
        let motion = vec![3.0; 199];
        let highlights = rank_highlights(&scenes, &motion, FPS, 1.0, 10.0);

        assert_eq!(highlights.len(), 2);
        assert!(highlights[0].start_secs < highlights[1].start_secs);
    }

    #[test]
    fn test_short_scene_dropped_even_with_high_score() {
        // 1s scene with huge motion, 2s minimum.
        let scenes = vec![Scene::new(0, 30), Scene::new(30, 300)];
        let motion = vec![100.0; 299];
        let highlights = rank_highlights(&scenes, &motion, FPS, 2.0, 12.0);

        assert_eq!(highlights.len(), 1);
        assert!((highlights[0].start_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_motion_series_scores_zero() {
        let scenes = two_scenes();
        let highlights = rank_highlights(&scenes, &[], FPS, 2.0, 12.0);
        assert!(highlights.is_empty());

        // With a zero threshold the zero-scored scenes survive.
        let highlights = rank_highlights(&scenes, &[], FPS, 2.0, 0.0);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].score, 0.0);
    }

    #[test]
    fn test_single_frame_scene_scores_zero() {
        let scenes = vec![Scene::new(10, 11)];
        let motion = vec![50.0; 100];
        assert_eq!(scene_motion_score(&scenes[0], &motion), 0.0);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let scenes = vec![Scene::new(0, 100), Scene::new(100, 200), Scene::new(200, 300)];
        let motion: Vec<f64> = (0..299).map(|i| (i % 7) as f64).collect();

        let first = rank_highlights(&scenes, &motion, FPS, 1.0, 5.0);
        let second = rank_highlights(&scenes, &motion, FPS, 1.0, 5.0);
        assert_eq!(first, second);
    }
}
