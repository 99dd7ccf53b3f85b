//! Speech-to-text collaborator.
//!
//! Transcription is an external service from the pipeline's perspective: it
//! returns timed text spans or an empty list, and never raises into the
//! core.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use autoclip_models::TranscriptSpan;

/// Transcription collaborator contract.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a media file into ordered timed spans.
    ///
    /// Any failure yields an empty list.
    async fn transcribe(&self, source: &Path) -> Vec<TranscriptSpan>;
}

/// Transcriber backed by the `whisper` CLI.
#[derive(Debug, Clone)]
pub struct WhisperCli {
    model: String,
}

impl WhisperCli {
    /// Create a transcriber using the given whisper model size.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, source: &Path) -> Vec<TranscriptSpan> {
        if which::which("whisper").is_err() {
            debug!("whisper CLI not found, skipping transcription");
            return Vec::new();
        }

        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Failed to create transcription scratch dir: {e}");
                return Vec::new();
            }
        };

        let status = Command::new("whisper")
            .arg(source)
            .args(["--model", &self.model])
            .args(["--task", "transcribe"])
            .args(["--output_format", "srt"])
            .arg("--output_dir")
            .arg(scratch.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(source = %source.display(), "whisper exited with {status}, skipping captions");
                return Vec::new();
            }
            Err(e) => {
                warn!(source = %source.display(), "whisper invocation failed: {e}");
                return Vec::new();
            }
        }

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let srt_path = scratch.path().join(format!("{stem}.srt"));
        match tokio::fs::read_to_string(&srt_path).await {
            Ok(text) => parse_srt(&text),
            Err(e) => {
                warn!(path = %srt_path.display(), "No transcript produced: {e}");
                Vec::new()
            }
        }
    }
}

/// Parse SRT text into timed spans. Malformed blocks are skipped.
pub fn parse_srt(srt: &str) -> Vec<TranscriptSpan> {
    let mut spans = Vec::new();

    for block in srt.split("\n\n") {
        let lines: Vec<&str> = block.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() < 2 {
            continue;
        }

        // Block layout: counter, time range, text lines
        let Some((start_secs, end_secs)) = parse_srt_time_range(lines[1]) else {
            continue;
        };
        let text = lines[2..].join(" ");
        spans.push(TranscriptSpan::new(start_secs, end_secs, text));
    }

    spans
}

fn parse_srt_time_range(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once(" --> ")?;
    Some((parse_srt_time(start.trim())?, parse_srt_time(end.trim())?))
}

fn parse_srt_time(time: &str) -> Option<f64> {
    // HH:MM:SS,mmm
    let mut parts = time.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let rest = parts.next()?;
    let (seconds, millis) = rest.split_once(',')?;
    let seconds: f64 = seconds.parse().ok()?;
    let millis: f64 = millis.parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}
