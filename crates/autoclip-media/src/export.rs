//! Multi-resolution export and preview clips.

use std::path::{Path, PathBuf};

use tracing::warn;

use autoclip_models::EncodingConfig;

use crate::command::FfmpegCommand;
use crate::error::MediaResult;
use crate::filters::scale_filter;

/// Default preview clip length in seconds.
pub const PREVIEW_DURATION_SECS: f64 = 15.0;

/// Resolve a resolution name to pixel dimensions.
///
/// Accepts the common ladder names (`1080p`, `720p`, `480p`) and explicit
/// `WxH` forms; anything else is unknown and skipped by the caller.
pub fn parse_resolution(name: &str) -> Option<(u32, u32)> {
    match name.to_lowercase().as_str() {
        "1080p" => Some((1920, 1080)),
        "720p" => Some((1280, 720)),
        "480p" => Some((854, 480)),
        other => {
            let (width, height) = other.split_once('x')?;
            Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
        }
    }
}

/// Output path for one resolution rendition of a master file.
pub fn rendition_path(master: &Path, resolution: &str) -> PathBuf {
    let stem = master
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = master
        .extension()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "mp4".to_string());
    master.with_file_name(format!("{stem}_{resolution}.{extension}"))
}

/// Re-encode the master at each requested resolution.
///
/// Unknown resolution names are logged and skipped. Returns the paths
/// actually written.
pub async fn export_resolutions(
    master: &Path,
    resolutions: &[String],
    encoding: &EncodingConfig,
) -> MediaResult<Vec<PathBuf>> {
    let mut outputs = Vec::new();

    for resolution in resolutions {
        let Some((width, height)) = parse_resolution(resolution) else {
            warn!(resolution, "Unknown resolution, skipping");
            continue;
        };

        let out_path = rendition_path(master, resolution);
        FfmpegCommand::new(&out_path)
            .input(master)
            .video_filter(scale_filter(width, height))
            .video_codec(&encoding.codec)
            .preset(&encoding.preset)
            .crf(encoding.crf)
            .audio_codec(&encoding.audio_codec)
            .audio_bitrate(&encoding.audio_bitrate)
            .run()
            .await?;
        outputs.push(out_path);
    }

    Ok(outputs)
}

/// Cut a short preview from the head of the master.
pub async fn export_preview(
    master: &Path,
    output: &Path,
    duration_secs: f64,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    FfmpegCommand::new(output)
        .input(master)
        .limit_duration(duration_secs)
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_resolutions() {
        assert_eq!(parse_resolution("1080p"), Some((1920, 1080)));
        assert_eq!(parse_resolution("720P"), Some((1280, 720)));
        assert_eq!(parse_resolution("480p"), Some((854, 480)));
    }

    #[test]
    fn test_parse_explicit_dimensions() {
        assert_eq!(parse_resolution("640x360"), Some((640, 360)));
        assert_eq!(parse_resolution("1920X1080"), Some((1920, 1080)));
    }

    #[test]
    fn test_parse_unknown_resolution() {
        assert_eq!(parse_resolution("potato"), None);
        assert_eq!(parse_resolution("640x"), None);
    }

    #[test]
    fn test_rendition_path_naming() {
        let path = rendition_path(Path::new("/out/clip_1700000000.mp4"), "720p");
        assert_eq!(path, PathBuf::from("/out/clip_1700000000_720p.mp4"));
    }
}
