//! Voice cleanup and background music mixing.
//!
//! Audio DSP is delegated to ffmpeg's filter library: `afftdn` for
//! denoising, `loudnorm` for level normalization and `amix` for layering a
//! background track under the voice.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use autoclip_models::EncodingConfig;

use crate::command::FfmpegCommand;
use crate::error::MediaResult;
use crate::probe::probe_media;

/// Default background music gain in dB.
pub const DEFAULT_MUSIC_GAIN_DB: f64 = -18.0;

/// Loudness target for the voice track, in LUFS.
const VOICE_TARGET_LUFS: f64 = -14.0;

/// Audio extensions considered when scanning a music directory.
const MUSIC_EXTENSIONS: [&str; 4] = ["mp3", "wav", "flac", "m4a"];

/// Pick a background track from the music directory.
///
/// Tracks are probed for duration and the shortest one wins, which keeps
/// the mix encode cheap. Returns `None` when the directory is missing,
/// empty or holds no supported audio files.
pub async fn choose_background_track(music_dir: Option<&Path>) -> Option<PathBuf> {
    let music_dir = music_dir?;
    let mut entries = match tokio::fs::read_dir(music_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %music_dir.display(), "Music directory unreadable: {e}");
            return None;
        }
    };

    let mut tracks: Vec<(PathBuf, f64)> = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Music directory scan failed: {e}");
                break;
            }
        };
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| MUSIC_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if !supported {
            continue;
        }

        let duration = probe_media(&path).await.duration_secs.unwrap_or(f64::MAX);
        tracks.push((path, duration));
    }

    tracks
        .into_iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(path, _)| path)
}

/// Denoise and normalize the voice track, optionally mixing in background
/// music, keeping the video stream untouched.
///
/// The music input is looped to cover the voice and trimmed to it
/// (`amix=duration=first`), then attenuated by `music_gain_db`.
pub async fn mix_audio(
    input: &Path,
    output: &Path,
    music: Option<&Path>,
    music_gain_db: f64,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let voice_chain = format!("afftdn,loudnorm=I={VOICE_TARGET_LUFS}");

    let mut command = FfmpegCommand::new(output).input(input);
    let graph = match music {
        Some(music_path) => {
            command = command.input_with_args(["-stream_loop", "-1"], music_path);
            format!(
                "[0:a]{voice_chain}[voice];\
                 [1:a]volume={music_gain_db}dB[music];\
                 [voice][music]amix=inputs=2:duration=first:dropout_transition=2[a]"
            )
        }
        None => format!("[0:a]{voice_chain}[a]"),
    };

    command
        .filter_complex(graph)
        .map("0:v")
        .map("[a]")
        .output_args(["-c:v", "copy"])
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_music_dir_yields_none() {
        assert!(choose_background_track(None).await.is_none());
        assert!(
            choose_background_track(Some(Path::new("/no/such/music")))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_unsupported_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "not audio")
            .await
            .unwrap();
        assert!(choose_background_track(Some(dir.path())).await.is_none());
    }

    #[tokio::test]
    async fn test_supported_extension_is_picked_up() {
        // Probe fails on a fake file, but extension filtering still selects it.
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("loop.mp3");
        tokio::fs::write(&track, "fake").await.unwrap();
        assert_eq!(choose_background_track(Some(dir.path())).await, Some(track));
    }
}
