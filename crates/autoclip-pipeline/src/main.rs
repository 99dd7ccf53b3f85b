//! Automated short-form video editing CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use autoclip_pipeline::{init_tracing, process_batch, AppConfig, CliOverrides};

#[derive(Debug, Parser)]
#[command(
    name = "autoclip",
    version,
    about = "Automated short-form video editing pipeline"
)]
struct Cli {
    /// Folder with raw video files
    #[arg(long)]
    input: PathBuf,

    /// Output folder for exports
    #[arg(long)]
    output: PathBuf,

    /// Folder with royalty-free music tracks
    #[arg(long)]
    music: Option<PathBuf>,

    /// Optional JSON metadata file (video list, trims, tuning)
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Style preset: cinematic, vlog, reel, youtube
    #[arg(long)]
    style: Option<String>,

    /// Comma-separated output resolutions (names or WxH)
    #[arg(long, value_delimiter = ',')]
    resolutions: Option<Vec<String>>,

    /// Export a 15s preview clip per video
    #[arg(long)]
    preview: bool,

    /// Whisper model size for transcription
    #[arg(long)]
    whisper_model: Option<String>,

    /// Number of videos processed in parallel
    #[arg(long)]
    max_workers: Option<usize>,

    /// Minimum scene length in seconds
    #[arg(long)]
    min_scene_len: Option<f64>,

    /// Motion score threshold
    #[arg(long)]
    motion_threshold: Option<f64>,

    /// Number of top highlights to keep
    #[arg(long)]
    top_k: Option<usize>,

    /// Background music gain in dB
    #[arg(long)]
    music_gain_db: Option<f64>,

    /// Title card text
    #[arg(long)]
    title: Option<String>,

    /// Title card subtitle text
    #[arg(long)]
    subtitle: Option<String>,

    /// Path to a watermark image
    #[arg(long)]
    watermark: Option<PathBuf>,

    /// Watermark corner (bottom-right, bottom-left, top-right, top-left)
    #[arg(long)]
    watermark_position: Option<String>,

    /// Plan outputs without writing files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let overrides = CliOverrides {
        style: cli.style,
        resolutions: cli.resolutions,
        preview: cli.preview,
        whisper_model: cli.whisper_model,
        max_workers: cli.max_workers,
        min_scene_len: cli.min_scene_len,
        motion_threshold: cli.motion_threshold,
        top_k: cli.top_k,
        music_gain_db: cli.music_gain_db,
        title: cli.title,
        subtitle: cli.subtitle,
        watermark: cli.watermark,
        watermark_position: cli.watermark_position,
        dry_run: cli.dry_run,
    };

    let config = AppConfig::load(
        cli.input,
        cli.output,
        cli.music,
        cli.metadata.as_deref(),
        overrides,
    )
    .context("loading configuration")?;

    if config.videos.is_empty() {
        warn!(input = %config.input_dir.display(), "No videos to process");
        return Ok(());
    }

    let reports = process_batch(Arc::new(config)).await;
    let failed = reports.iter().filter(|report| report.is_failed()).count();
    info!(processed = reports.len() - failed, failed, "All done");
    Ok(())
}
