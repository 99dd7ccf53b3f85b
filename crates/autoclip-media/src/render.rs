//! Physical realization of assembled timelines.
//!
//! The assembler decides *what* plays and *when*; this module drives the
//! encoder to cut the selected sub-ranges and join them with the configured
//! transition.

use std::path::{Path, PathBuf};

use tracing::info;

use autoclip_models::{EncodingConfig, SourceRange, Timeline};

use crate::command::FfmpegCommand;
use crate::error::MediaResult;

/// Extract one source sub-range to its own file.
///
/// Segments are re-encoded (rather than stream-copied) so every piece shares
/// codec parameters and keyframe alignment ahead of the transition join.
pub async fn extract_segment(
    input: &Path,
    output: &Path,
    range: &SourceRange,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    FfmpegCommand::new(output)
        .trimmed_input(input, range.start_secs, range.duration_secs())
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .run()
        .await
}

/// Cut and join a timeline into a single sequence file.
///
/// Returns the path of the assembled clip inside `work_dir`. A single-clip
/// timeline skips the join entirely.
pub async fn render_timeline(
    source: &Path,
    timeline: &Timeline,
    work_dir: &Path,
    has_audio: bool,
    encoding: &EncodingConfig,
) -> MediaResult<PathBuf> {
    let mut segment_paths = Vec::with_capacity(timeline.clips.len());
    for (index, clip) in timeline.clips.iter().enumerate() {
        let segment_path = work_dir.join(format!("segment_{index:03}.mp4"));
        extract_segment(source, &segment_path, &clip.source, encoding).await?;
        segment_paths.push(segment_path);
    }

    if segment_paths.len() == 1 {
        return Ok(segment_paths.into_iter().next().expect("one segment"));
    }

    info!(
        clips = segment_paths.len(),
        transition = timeline.transition.as_name(),
        "Joining timeline"
    );

    let graph = if timeline.transition.overlaps() {
        crossfade_graph(timeline, has_audio)
    } else {
        concat_graph(timeline.clips.len(), has_audio)
    };

    let assembled = work_dir.join("assembled.mp4");
    let mut command = FfmpegCommand::new(&assembled);
    for segment_path in &segment_paths {
        command = command.input(segment_path);
    }
    command = command.filter_complex(graph).map("[v]");
    if has_audio {
        command = command
            .map("[a]")
            .audio_codec(&encoding.audio_codec)
            .audio_bitrate(&encoding.audio_bitrate);
    }
    command
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .run()
        .await?;

    Ok(assembled)
}

/// Build the xfade/acrossfade chain for an overlapping transition.
///
/// Each clip's timeline offset marks where its blend with the previous clip
/// begins, which is exactly xfade's `offset` parameter.
fn crossfade_graph(timeline: &Timeline, has_audio: bool) -> String {
    let count = timeline.clips.len();
    let duration = timeline.transition_secs;
    let mut graph = String::new();

    let mut current = "[0:v]".to_string();
    for index in 1..count {
        let label = if index == count - 1 {
            "[v]".to_string()
        } else {
            format!("[vx{index}]")
        };
        graph.push_str(&format!(
            "{current}[{index}:v]xfade=transition=fade:duration={duration:.3}:offset={offset:.3}{label};",
            offset = timeline.clips[index].offset_secs,
        ));
        current = label;
    }

    if has_audio {
        let mut current = "[0:a]".to_string();
        for index in 1..count {
            let label = if index == count - 1 {
                "[a]".to_string()
            } else {
                format!("[ax{index}]")
            };
            graph.push_str(&format!(
                "{current}[{index}:a]acrossfade=d={duration:.3}{label};"
            ));
            current = label;
        }
    }

    graph.pop();
    graph
}

/// Build the concat graph for a back-to-back join.
fn concat_graph(count: usize, has_audio: bool) -> String {
    let mut graph = String::new();
    for index in 0..count {
        graph.push_str(&format!("[{index}:v]"));
        if has_audio {
            graph.push_str(&format!("[{index}:a]"));
        }
    }
    if has_audio {
        graph.push_str(&format!("concat=n={count}:v=1:a=1[v][a]"));
    } else {
        graph.push_str(&format!("concat=n={count}:v=1:a=0[v]"));
    }
    graph
}

/// Apply a chain of video filters in one encode pass, keeping audio as-is.
pub async fn apply_video_filters(
    input: &Path,
    output: &Path,
    filters: &[String],
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    FfmpegCommand::new(output)
        .input(input)
        .video_filter(filters.join(","))
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec("copy")
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclip_models::{TimelineClip, TransitionKind};

    fn crossfade_timeline() -> Timeline {
        Timeline {
            clips: vec![
                TimelineClip {
                    source: SourceRange::new(0.0, 4.0),
                    offset_secs: 0.0,
                },
                TimelineClip {
                    source: SourceRange::new(6.0, 9.0),
                    offset_secs: 3.5,
                },
                TimelineClip {
                    source: SourceRange::new(9.0, 10.0),
                    offset_secs: 6.0,
                },
            ],
            transition: TransitionKind::Crossfade,
            transition_secs: 0.5,
            duration_secs: 7.0,
        }
    }

    #[test]
    fn test_crossfade_graph_offsets_follow_timeline() {
        let graph = crossfade_graph(&crossfade_timeline(), true);
        assert!(graph.contains("[0:v][1:v]xfade=transition=fade:duration=0.500:offset=3.500[vx1]"));
        assert!(graph.contains("[vx1][2:v]xfade=transition=fade:duration=0.500:offset=6.000[v]"));
        assert!(graph.contains("[0:a][1:a]acrossfade=d=0.500[ax1]"));
        assert!(graph.ends_with("[a]"));
    }

    #[test]
    fn test_crossfade_graph_video_only() {
        let graph = crossfade_graph(&crossfade_timeline(), false);
        assert!(!graph.contains("acrossfade"));
        assert!(graph.ends_with("[v]"));
    }

    #[test]
    fn test_concat_graph() {
        assert_eq!(
            concat_graph(2, true),
            "[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[v][a]"
        );
        assert_eq!(concat_graph(3, false), "[0:v][1:v][2:v]concat=n=3:v=1:a=0[v]");
    }
}
