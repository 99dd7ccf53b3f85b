//! Sequence assembly: padding, fallback and timeline joins.

use tracing::debug;

use autoclip_models::{Highlight, SourceRange, Timeline, TimelineClip, TransitionKind};

use crate::error::{MediaError, MediaResult};

/// Time buffer added before and after each selected range, clamped to the
/// source bounds.
pub const DEFAULT_SEGMENT_PAD_SECS: f64 = 0.25;

/// Map a selection of highlights back to padded, clamped source sub-ranges.
///
/// An empty selection falls back to a single sub-range covering the entire
/// source, so the assembler never produces an empty timeline.
pub fn select_segments(
    selection: &[Highlight],
    source_duration_secs: f64,
    pad_secs: f64,
) -> Vec<SourceRange> {
    let mut segments: Vec<SourceRange> = selection
        .iter()
        .map(|highlight| SourceRange {
            start_secs: (highlight.start_secs - pad_secs).max(0.0),
            end_secs: (highlight.end_secs + pad_secs).min(source_duration_secs),
        })
        .collect();

    if segments.is_empty() {
        debug!("Empty selection, falling back to the whole source");
        segments.push(SourceRange::new(0.0, source_duration_secs));
    }

    segments
}

/// Join source sub-ranges into an ordered timeline.
///
/// A single segment is returned unchanged with no join logic invoked. For
/// overlapping transitions each subsequent clip starts `transition_secs`
/// before the previous clip ends and blends across the overlap; otherwise
/// clips are placed back-to-back.
///
/// Joining zero segments indicates a broken upstream invariant (the
/// whole-source fallback guarantees at least one) and fails loudly.
pub fn join_segments(
    segments: &[SourceRange],
    transition: TransitionKind,
    transition_secs: f64,
) -> MediaResult<Timeline> {
    if segments.is_empty() {
        return Err(MediaError::assembly_contract(
            "attempted to join zero segments",
        ));
    }

    let mut clips = Vec::with_capacity(segments.len());
    let mut cursor = 0.0f64;

    for (position, segment) in segments.iter().enumerate() {
        let offset_secs = if position == 0 {
            0.0
        } else if transition.overlaps() {
            (cursor - transition_secs).max(0.0)
        } else {
            cursor
        };

        clips.push(TimelineClip {
            source: *segment,
            offset_secs,
        });
        cursor = offset_secs + segment.duration_secs();
    }

    Ok(Timeline {
        clips,
        transition,
        transition_secs,
        duration_secs: cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_clamped_to_source_bounds() {
        let selection = vec![Highlight::new(0.0, 5.0, 3.0)];
        let segments = select_segments(&selection, 10.0, DEFAULT_SEGMENT_PAD_SECS);

        assert_eq!(segments.len(), 1);
        assert!((segments[0].start_secs - 0.0).abs() < 1e-9);
        assert!((segments[0].end_secs - 5.25).abs() < 1e-9);
    }

    #[test]
    fn test_interior_selection_padded_both_sides() {
        let selection = vec![Highlight::new(2.0, 4.0, 1.0)];
        let segments = select_segments(&selection, 10.0, DEFAULT_SEGMENT_PAD_SECS);

        assert!((segments[0].start_secs - 1.75).abs() < 1e-9);
        assert!((segments[0].end_secs - 4.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_selection_falls_back_to_whole_source() {
        let segments = select_segments(&[], 10.0, DEFAULT_SEGMENT_PAD_SECS);
        assert_eq!(segments, vec![SourceRange::new(0.0, 10.0)]);
    }

    #[test]
    fn test_join_zero_segments_fails_loudly() {
        let result = join_segments(&[], TransitionKind::Crossfade, 0.5);
        assert!(matches!(
            result,
            Err(MediaError::AssemblyContractViolation(_))
        ));
    }

    #[test]
    fn test_single_segment_joined_unchanged() {
        let segments = vec![SourceRange::new(0.0, 10.0)];
        let timeline = join_segments(&segments, TransitionKind::Crossfade, 0.5).unwrap();

        assert_eq!(timeline.clips.len(), 1);
        assert_eq!(timeline.clips[0].offset_secs, 0.0);
        assert!((timeline.duration_secs - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_crossfade_overlaps_once_per_join() {
        let segments = vec![SourceRange::new(0.0, 4.0), SourceRange::new(6.0, 9.0)];
        let timeline = join_segments(&segments, TransitionKind::Crossfade, 0.5).unwrap();

        // Total = sum of segment durations minus one overlap.
        assert!((timeline.duration_secs - (4.0 + 3.0 - 0.5)).abs() < 1e-9);
        assert!((timeline.clips[1].offset_secs - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_cut_concatenates_back_to_back() {
        let segments = vec![
            SourceRange::new(0.0, 4.0),
            SourceRange::new(6.0, 9.0),
            SourceRange::new(9.0, 10.0),
        ];
        let timeline = join_segments(&segments, TransitionKind::Cut, 0.5).unwrap();

        assert!((timeline.duration_secs - 8.0).abs() < 1e-9);
        assert!((timeline.clips[1].offset_secs - 4.0).abs() < 1e-9);
        assert!((timeline.clips[2].offset_secs - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_fade_behaves_like_crossfade() {
        let segments = vec![SourceRange::new(0.0, 4.0), SourceRange::new(4.0, 8.0)];
        let crossfade = join_segments(&segments, TransitionKind::Crossfade, 0.5).unwrap();
        let fade = join_segments(&segments, TransitionKind::Fade, 0.5).unwrap();
        assert_eq!(crossfade.duration_secs, fade.duration_secs);
    }
}
