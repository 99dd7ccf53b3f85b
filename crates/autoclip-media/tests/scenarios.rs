//! End-to-end detection and assembly scenarios over synthetic feature data.

use autoclip_media::assembler::{join_segments, select_segments, DEFAULT_SEGMENT_PAD_SECS};
use autoclip_media::scoring::rank_highlights;
use autoclip_media::segmenter::SceneSegmenter;
use autoclip_models::{Scene, SourceRange, TransitionKind};

const FPS: f64 = 30.0;

fn uniform_histogram() -> Vec<f32> {
    vec![0.125; 64]
}

fn shifted_histogram() -> Vec<f32> {
    let mut hist = vec![0.0; 64];
    hist[63] = 1.0;
    hist
}

/// Segment a 10s/30fps stream with one simulated hard cut at frame 150.
fn segment_with_cut_at_150() -> Vec<Scene> {
    let before = uniform_histogram();
    let after = shifted_histogram();
    let mut segmenter = SceneSegmenter::new();
    for index in 0..300 {
        let hist = if index < 150 { &before } else { &after };
        segmenter.ingest(index, hist);
    }
    segmenter.finalize(300)
}

#[test]
fn quiet_source_falls_back_to_whole_clip() {
    let scenes = segment_with_cut_at_150();
    assert_eq!(scenes, vec![Scene::new(0, 150), Scene::new(150, 300)]);

    // Uniform motion below threshold everywhere: no highlights survive.
    let motion = vec![0.5; 299];
    let highlights = rank_highlights(&scenes, &motion, FPS, 2.0, 12.0);
    assert!(highlights.is_empty());

    let segments = select_segments(&highlights, 10.0, DEFAULT_SEGMENT_PAD_SECS);
    assert_eq!(segments, vec![SourceRange::new(0.0, 10.0)]);

    let timeline = join_segments(&segments, TransitionKind::Crossfade, 0.5).unwrap();
    assert_eq!(timeline.clips.len(), 1);
    assert!((timeline.duration_secs - 10.0).abs() < 1e-9);
}

#[test]
fn active_first_scene_becomes_the_single_padded_highlight() {
    let scenes = segment_with_cut_at_150();

    // Motion above threshold only across the first scene's frame pairs.
    let mut motion = vec![0.0; 299];
    for sample in motion.iter_mut().take(149) {
        *sample = 5.0;
    }
    let highlights = rank_highlights(&scenes, &motion, FPS, 2.0, 12.0);
    assert_eq!(highlights.len(), 1);
    assert!((highlights[0].start_secs - 0.0).abs() < 1e-9);
    assert!((highlights[0].end_secs - 5.0).abs() < 1e-9);

    let top_k: Vec<_> = highlights.into_iter().take(5).collect();
    let segments = select_segments(&top_k, 10.0, DEFAULT_SEGMENT_PAD_SECS);
    assert_eq!(segments, vec![SourceRange::new(0.0, 5.25)]);
}

#[test]
fn crossfade_join_loses_one_overlap_per_seam() {
    let selection = vec![
        autoclip_models::Highlight::new(1.0, 3.0, 9.0),
        autoclip_models::Highlight::new(6.0, 8.0, 4.0),
    ];
    let segments = select_segments(&selection, 10.0, DEFAULT_SEGMENT_PAD_SECS);
    assert_eq!(
        segments,
        vec![SourceRange::new(0.75, 3.25), SourceRange::new(5.75, 8.25)]
    );

    let timeline = join_segments(&segments, TransitionKind::Crossfade, 0.5).unwrap();
    let summed: f64 = segments.iter().map(|s| s.duration_secs()).sum();
    assert!((timeline.duration_secs - (summed - 0.5)).abs() < 1e-9);
}
