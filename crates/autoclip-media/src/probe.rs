//! FFprobe media information.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use autoclip_models::MediaProbe;

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    channels: Option<u32>,
    sample_rate: Option<String>,
}

/// Probe a source file for container and stream metadata.
///
/// Probing is best-effort: any failure (missing ffprobe, unreadable file,
/// malformed output) returns a probe with unset fields rather than an error.
pub async fn probe_media(path: impl AsRef<Path>) -> MediaProbe {
    let path = path.as_ref();
    let mut info = MediaProbe::for_path(path.to_string_lossy());

    let output = match run_ffprobe(path).await {
        Some(o) => o,
        None => return info,
    };

    info.duration_secs = output.format.duration.as_deref().and_then(|d| d.parse().ok());
    info.bit_rate = output.format.bit_rate.as_deref().and_then(|b| b.parse().ok());

    for stream in &output.streams {
        match stream.codec_type.as_str() {
            "video" if info.width.is_none() => {
                info.width = stream.width;
                info.height = stream.height;
                info.fps = stream
                    .r_frame_rate
                    .as_deref()
                    .or(stream.avg_frame_rate.as_deref())
                    .and_then(parse_frame_rate);
            }
            "audio" if info.audio_channels.is_none() => {
                info.audio_channels = stream.channels;
                info.sample_rate = stream.sample_rate.as_deref().and_then(|s| s.parse().ok());
            }
            _ => {}
        }
    }

    info
}

async fn run_ffprobe(path: &Path) -> Option<FfprobeOutput> {
    which::which("ffprobe").ok()?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        debug!(path = %path.display(), "ffprobe exited non-zero");
        return None;
    }

    serde_json::from_slice(&output.stdout).ok()
}

/// Parse a frame rate string (e.g., "30/1", "30000/1001" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            let fps = num / den;
            return (fps > 0.0).then_some(fps);
        }
        return None;
    }
    s.parse().ok().filter(|fps| *fps > 0.0)
}
