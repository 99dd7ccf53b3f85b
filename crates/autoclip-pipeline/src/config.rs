//! Run configuration.
//!
//! Configuration is assembled from three layers: built-in defaults, an
//! optional JSON metadata file, and CLI overrides (strongest). The metadata
//! file also carries the per-video work list with manual trim ranges; when
//! it lists no videos, the input directory is scanned for media files.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use autoclip_media::audio::DEFAULT_MUSIC_GAIN_DB;
use autoclip_models::{CaptionStyle, EncodingConfig, StylePreset, TransitionKind, TrimRange};

use crate::error::{PipelineError, PipelineResult};

/// File extensions treated as source videos when scanning the input dir.
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "mkv", "avi", "m4v"];

/// One source video to process.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    /// Source file path.
    pub file: PathBuf,

    /// Manual trim ranges, substituted when detection finds nothing.
    #[serde(default)]
    pub trims: Vec<TrimRange>,
}

impl VideoItem {
    /// Create an item for a discovered file with no manual trims.
    pub fn discovered(file: PathBuf) -> Self {
        Self {
            file,
            trims: Vec::new(),
        }
    }
}

/// Transition settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionConfig {
    /// Transition name; unrecognized names fall back to a plain cut.
    #[serde(rename = "default", default = "default_transition_name")]
    pub name: String,

    /// Transition duration in seconds.
    #[serde(default = "default_transition_secs")]
    pub duration: f64,
}

fn default_transition_name() -> String {
    "crossfade".to_string()
}
fn default_transition_secs() -> f64 {
    0.5
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            name: default_transition_name(),
            duration: default_transition_secs(),
        }
    }
}

impl TransitionConfig {
    /// Resolved transition kind.
    pub fn kind(&self) -> TransitionKind {
        TransitionKind::from_name(&self.name)
    }
}

/// Look settings: preset selection plus per-step switches.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Preset name; unknown names resolve to the standard preset.
    #[serde(default)]
    pub name: String,

    /// Whether to run the stabilization filter.
    #[serde(default = "default_true")]
    pub stabilize: bool,

    /// Whether to apply preset color correction.
    #[serde(default = "default_true")]
    pub color_correct: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            stabilize: true,
            color_correct: true,
        }
    }
}

impl StyleConfig {
    /// Resolved style preset.
    pub fn preset(&self) -> StylePreset {
        StylePreset::from_name(&self.name)
    }
}

/// Title card and watermark settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlayConfig {
    /// Title card text; no card is rendered when unset.
    pub title: Option<String>,

    /// Optional second title line.
    pub subtitle: Option<String>,

    /// Watermark image path; no watermark when unset.
    pub watermark: Option<PathBuf>,

    /// Watermark corner name (e.g. "bottom-right").
    #[serde(default)]
    pub watermark_position: String,

    /// Title card hold time in seconds.
    #[serde(default = "default_title_secs")]
    pub title_duration: f64,
}

fn default_title_secs() -> f64 {
    2.0
}

/// Export settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Resolution renditions to produce besides the master.
    #[serde(default = "default_resolutions")]
    pub resolutions: Vec<String>,

    /// Whether to cut a short preview clip.
    #[serde(default)]
    pub preview: bool,
}

fn default_resolutions() -> Vec<String> {
    vec!["1080p".to_string(), "720p".to_string()]
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            resolutions: default_resolutions(),
            preview: false,
        }
    }
}

/// Highlight detection tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    /// Minimum scene duration to qualify as a highlight (seconds).
    #[serde(default = "default_min_scene_len")]
    pub min_scene_len: f64,

    /// Motion score threshold before calibration scaling.
    #[serde(default = "default_motion_threshold")]
    pub motion_threshold: f64,

    /// Number of top-ranked highlights kept for assembly.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_min_scene_len() -> f64 {
    2.0
}
fn default_motion_threshold() -> f64 {
    12.0
}
fn default_top_k() -> usize {
    5
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            min_scene_len: default_min_scene_len(),
            motion_threshold: default_motion_threshold(),
            top_k: default_top_k(),
        }
    }
}

/// Audio mixing tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Background music gain in dB.
    #[serde(default = "default_music_gain_db")]
    pub music_gain_db: f64,
}

fn default_music_gain_db() -> f64 {
    DEFAULT_MUSIC_GAIN_DB
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_gain_db: default_music_gain_db(),
        }
    }
}

/// Shape of the optional JSON metadata file.
#[derive(Debug, Default, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    videos: Vec<VideoItem>,
    #[serde(default)]
    captions: Option<CaptionStyle>,
    #[serde(default)]
    transitions: Option<TransitionConfig>,
    #[serde(default)]
    style: Option<StyleConfig>,
    #[serde(default)]
    overlay: Option<OverlayConfig>,
    #[serde(default)]
    highlight: Option<HighlightConfig>,
    #[serde(default)]
    audio: Option<AudioConfig>,
}

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub music_dir: Option<PathBuf>,
    pub videos: Vec<VideoItem>,
    pub captions: CaptionStyle,
    pub transitions: TransitionConfig,
    pub style: StyleConfig,
    pub overlay: OverlayConfig,
    pub export: ExportConfig,
    pub highlight: HighlightConfig,
    pub audio: AudioConfig,
    pub encoding: EncodingConfig,
    pub whisper_model: String,
    pub max_workers: usize,
    /// Write a JSON report per processed video.
    pub log_reports: bool,
    /// Plan outputs without invoking the encoder.
    pub dry_run: bool,
}

/// CLI-sourced overrides applied on top of metadata.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub style: Option<String>,
    pub resolutions: Option<Vec<String>>,
    pub preview: bool,
    pub whisper_model: Option<String>,
    pub max_workers: Option<usize>,
    pub min_scene_len: Option<f64>,
    pub motion_threshold: Option<f64>,
    pub top_k: Option<usize>,
    pub music_gain_db: Option<f64>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub watermark: Option<PathBuf>,
    pub watermark_position: Option<String>,
    pub dry_run: bool,
}

impl AppConfig {
    /// Load configuration from the metadata file (if any) and apply CLI
    /// overrides.
    ///
    /// Creates the output directory. When the metadata lists no videos, the
    /// input directory is scanned for media files in name order.
    pub fn load(
        input_dir: PathBuf,
        output_dir: PathBuf,
        music_dir: Option<PathBuf>,
        metadata_path: Option<&Path>,
        overrides: CliOverrides,
    ) -> PipelineResult<Self> {
        let metadata = match metadata_path {
            Some(path) => load_metadata_file(path)?,
            None => MetadataFile::default(),
        };

        let videos = if metadata.videos.is_empty() {
            discover_videos(&input_dir)?
        } else {
            metadata.videos
        };

        let mut style = metadata.style.unwrap_or_default();
        if let Some(name) = overrides.style {
            style.name = name;
        }

        let mut overlay = metadata.overlay.unwrap_or_default();
        if let Some(title) = overrides.title {
            overlay.title = Some(title);
        }
        if let Some(subtitle) = overrides.subtitle {
            overlay.subtitle = Some(subtitle);
        }
        if let Some(watermark) = overrides.watermark {
            overlay.watermark = Some(watermark);
        }
        if let Some(position) = overrides.watermark_position {
            overlay.watermark_position = position;
        }

        let mut highlight = metadata.highlight.unwrap_or_default();
        if let Some(value) = overrides.min_scene_len {
            highlight.min_scene_len = value;
        }
        if let Some(value) = overrides.motion_threshold {
            highlight.motion_threshold = value;
        }
        if let Some(value) = overrides.top_k {
            highlight.top_k = value;
        }

        let mut audio = metadata.audio.unwrap_or_default();
        if let Some(value) = overrides.music_gain_db {
            audio.music_gain_db = value;
        }

        let export = ExportConfig {
            resolutions: overrides.resolutions.unwrap_or_else(default_resolutions),
            preview: overrides.preview,
        };

        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            input_dir,
            output_dir,
            music_dir,
            videos,
            captions: metadata.captions.unwrap_or_default(),
            transitions: metadata.transitions.unwrap_or_default(),
            style,
            overlay,
            export,
            highlight,
            audio,
            encoding: EncodingConfig::default(),
            whisper_model: overrides
                .whisper_model
                .unwrap_or_else(|| "small".to_string()),
            max_workers: overrides.max_workers.unwrap_or(1).max(1),
            log_reports: true,
            dry_run: overrides.dry_run,
        })
    }
}

fn load_metadata_file(path: &Path) -> PipelineResult<MetadataFile> {
    if !path.exists() {
        return Err(PipelineError::config(format!(
            "metadata file not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| PipelineError::config(format!("invalid metadata file {}: {e}", path.display())))
}

/// Scan the input directory for video files, sorted by name.
fn discover_videos(input_dir: &Path) -> PipelineResult<Vec<VideoItem>> {
    if !input_dir.is_dir() {
        return Err(PipelineError::config(format!(
            "input directory not found: {}",
            input_dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    Ok(files.into_iter().map(VideoItem::discovered).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_metadata(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("metadata.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp4"), "x").unwrap();
        std::fs::write(dir.path().join("a.MOV"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let videos = discover_videos(dir.path()).unwrap();
        assert_eq!(videos.len(), 2);
        assert!(videos[0].file.ends_with("a.MOV"));
        assert!(videos[1].file.ends_with("b.mp4"));
    }

    #[test]
    fn test_metadata_videos_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ignored.mp4"), "x").unwrap();
        let metadata = write_metadata(
            dir.path(),
            r#"{"videos": [{"file": "chosen.mp4", "trims": [{"start": 2.0, "end": 4.0}]}]}"#,
        );

        let out = tempfile::tempdir().unwrap();
        let config = AppConfig::load(
            dir.path().to_path_buf(),
            out.path().join("out"),
            None,
            Some(&metadata),
            CliOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.videos.len(), 1);
        assert_eq!(config.videos[0].file, PathBuf::from("chosen.mp4"));
        assert_eq!(config.videos[0].trims.len(), 1);
        assert!(config.output_dir.is_dir());
    }

    #[test]
    fn test_cli_overrides_beat_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = write_metadata(
            dir.path(),
            r#"{
                "videos": [{"file": "a.mp4"}],
                "highlight": {"min_scene_len": 3.5, "top_k": 2},
                "style": {"name": "vlog"},
                "transitions": {"default": "fade", "duration": 1.0}
            }"#,
        );

        let out = tempfile::tempdir().unwrap();
        let overrides = CliOverrides {
            top_k: Some(7),
            style: Some("cinematic".to_string()),
            ..Default::default()
        };
        let config = AppConfig::load(
            dir.path().to_path_buf(),
            out.path().to_path_buf(),
            None,
            Some(&metadata),
            overrides,
        )
        .unwrap();

        // Metadata survives where the CLI stayed silent.
        assert_eq!(config.highlight.min_scene_len, 3.5);
        assert_eq!(config.highlight.top_k, 7);
        assert_eq!(config.style.preset(), StylePreset::Cinematic);
        assert_eq!(config.transitions.kind(), TransitionKind::Fade);
        assert_eq!(config.transitions.duration, 1.0);
    }

    #[test]
    fn test_missing_metadata_file_is_an_error() {
        let out = tempfile::tempdir().unwrap();
        let result = AppConfig::load(
            out.path().to_path_buf(),
            out.path().join("out"),
            None,
            Some(Path::new("/no/such/metadata.json")),
            CliOverrides::default(),
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_unknown_transition_name_falls_back_to_cut() {
        let config = TransitionConfig {
            name: "wipe".to_string(),
            duration: 0.5,
        };
        assert_eq!(config.kind(), TransitionKind::Cut);
    }

    #[test]
    fn test_max_workers_floor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp4"), "x").unwrap();
        let out = tempfile::tempdir().unwrap();
        let overrides = CliOverrides {
            max_workers: Some(0),
            ..Default::default()
        };
        let config = AppConfig::load(
            dir.path().to_path_buf(),
            out.path().to_path_buf(),
            None,
            None,
            overrides,
        )
        .unwrap();
        assert_eq!(config.max_workers, 1);
    }
}
