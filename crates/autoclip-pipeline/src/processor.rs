//! Per-video pipeline orchestration.
//!
//! Drives one source video through the fixed stage sequence: probing,
//! highlight detection, sequence assembly, enhancement/overlay, audio mix
//! and export. Collaborator failures (transcription, rasterization,
//! filters, music) degrade the output; only a missing source, a broken
//! assembly invariant or an encoder failure terminates the video.

use std::path::{Path, PathBuf};

use chrono::Utc;

use autoclip_media::assembler::{join_segments, select_segments, DEFAULT_SEGMENT_PAD_SECS};
use autoclip_media::audio::{choose_background_track, mix_audio};
use autoclip_media::captions::{burn_captions, CaptionRasterizer, DrawtextRasterizer};
use autoclip_media::detect::{detect_highlights, DetectionOutcome, DetectionParams};
use autoclip_media::export::{
    export_preview, export_resolutions, parse_resolution, rendition_path, PREVIEW_DURATION_SECS,
};
use autoclip_media::features::DEFAULT_FPS_FALLBACK;
use autoclip_media::filters::{color_correction_filter, stabilization_filter};
use autoclip_media::overlays::{
    overlay_watermark, prepend_title_card, WatermarkCorner, DEFAULT_WATERMARK_OPACITY,
    DEFAULT_WATERMARK_WIDTH_RATIO,
};
use autoclip_media::probe::probe_media;
use autoclip_media::render::{apply_video_filters, render_timeline};
use autoclip_media::transcribe::{Transcriber, WhisperCli};
use autoclip_models::{Highlight, MediaProbe, TrimRange, VideoReport};

use crate::config::{AppConfig, VideoItem};
use crate::error::{PipelineError, PipelineResult};
use crate::logging::VideoLogger;
use crate::stage::Stage;

/// Frame size assumed for overlays when probing reports none.
const FALLBACK_FRAME_SIZE: (u32, u32) = (1920, 1080);

/// Run the full pipeline for one video.
///
/// `Err` terminates this video only: the batch executor turns it into a
/// failed report without affecting sibling videos. A missing source maps to
/// a skip marker there rather than a loud failure; everything else
/// (broken assembly invariant, encoder errors, panicked detection) is a
/// genuine fault.
pub async fn process_video(
    config: &AppConfig,
    item: &VideoItem,
    logger: &mut VideoLogger,
) -> PipelineResult<VideoReport> {
    let mut report = VideoReport::new(item.file.to_string_lossy(), config.dry_run);

    logger.enter_stage(Stage::Probing.as_name());
    if !item.file.exists() {
        return Err(PipelineError::MissingSource(item.file.clone()));
    }

    let probe = probe_media(&item.file).await;
    logger.progress(&format!(
        "Probed: duration={:?}s, {}x{}",
        probe.duration_secs,
        probe.width.unwrap_or(0),
        probe.height.unwrap_or(0)
    ));
    report.probe = Some(probe.clone());

    logger.enter_stage(Stage::HighlightDetection.as_name());
    let outcome = run_detection(config, item, &probe).await?;
    let highlights = resolve_selection(outcome.highlights.clone(), &item.trims);
    if highlights.is_empty() {
        logger.progress("No highlights detected; assembler will use the whole source");
    } else {
        logger.progress(&format!("{} highlight candidates ranked", highlights.len()));
    }
    report.record_highlights(&highlights);

    logger.enter_stage(Stage::SequenceAssembly.as_name());
    let source_duration = probe
        .duration_secs
        .unwrap_or_else(|| outcome.stream_duration_secs());
    let selection: Vec<Highlight> = highlights
        .into_iter()
        .take(config.highlight.top_k)
        .collect();
    let segments = select_segments(&selection, source_duration, DEFAULT_SEGMENT_PAD_SECS);
    let timeline = join_segments(
        &segments,
        config.transitions.kind(),
        config.transitions.duration,
    )?;
    logger.progress(&format!(
        "Timeline: {} clips, {:.2}s, {} transition",
        timeline.clips.len(),
        timeline.duration_secs,
        timeline.transition.as_name()
    ));

    let master = master_path(&config.output_dir, &item.file);
    if config.dry_run {
        logger.progress(&format!(
            "[dry-run] Would export master and renditions to {}",
            master.display()
        ));
        record_planned_outputs(config, &master, &mut report);
        return Ok(report);
    }

    let work_dir = tempfile::Builder::new().prefix("autoclip-").tempdir()?;
    let has_audio = probe.has_audio();
    let mut current = render_timeline(
        &item.file,
        &timeline,
        work_dir.path(),
        has_audio,
        &config.encoding,
    )
    .await?;

    logger.enter_stage(Stage::EnhancementAndOverlay.as_name());
    current = apply_enhancements(config, item, &probe, current, work_dir.path(), logger).await;

    logger.enter_stage(Stage::AudioMix.as_name());
    if has_audio {
        let music = choose_background_track(config.music_dir.as_deref()).await;
        let mixed = work_dir.path().join("mixed.mp4");
        match mix_audio(
            &current,
            &mixed,
            music.as_deref(),
            config.audio.music_gain_db,
            &config.encoding,
        )
        .await
        {
            Ok(()) => current = mixed,
            Err(e) => logger.warning(&format!("Audio mix failed, keeping original track: {e}")),
        }
    } else {
        logger.progress("No audio stream, skipping mix");
    }

    logger.enter_stage(Stage::Export.as_name());
    tokio::fs::copy(&current, &master).await?;
    report.outputs.push(master.to_string_lossy().to_string());

    let renditions = export_resolutions(&master, &config.export.resolutions, &config.encoding).await?;
    report.outputs.extend(
        renditions
            .iter()
            .map(|path| path.to_string_lossy().to_string()),
    );

    if config.export.preview {
        let preview = preview_path(&master);
        export_preview(&master, &preview, PREVIEW_DURATION_SECS, &config.encoding).await?;
        report.outputs.push(preview.to_string_lossy().to_string());
    }

    logger.enter_stage(Stage::Done.as_name());
    logger.progress(&format!("{} outputs produced", report.outputs.len()));
    Ok(report)
}

/// Decode/flow work runs on a blocking thread; a panic there fails only
/// this video.
async fn run_detection(
    config: &AppConfig,
    item: &VideoItem,
    probe: &MediaProbe,
) -> PipelineResult<DetectionOutcome> {
    let path = item.file.clone();
    let params = DetectionParams {
        min_scene_len_secs: config.highlight.min_scene_len,
        motion_threshold: config.highlight.motion_threshold,
        fps_fallback: probe.fps.unwrap_or(DEFAULT_FPS_FALLBACK),
    };
    tokio::task::spawn_blocking(move || detect_highlights(&path, &params))
        .await
        .map_err(|e| PipelineError::TaskPanicked(format!("highlight detection: {e}")))
}

/// Substitute manual trims when detection came back empty.
///
/// Trims are scored uniformly so they rank together; a non-empty detection
/// result always wins over trims.
fn resolve_selection(detected: Vec<Highlight>, trims: &[TrimRange]) -> Vec<Highlight> {
    if detected.is_empty() && !trims.is_empty() {
        return trims.iter().map(Highlight::from_trim).collect();
    }
    detected
}

/// Title card, style filters, captions and watermark, each degrading to the
/// previous file on failure.
async fn apply_enhancements(
    config: &AppConfig,
    item: &VideoItem,
    probe: &MediaProbe,
    mut current: PathBuf,
    work_dir: &Path,
    logger: &VideoLogger,
) -> PathBuf {
    let rasterizers = build_rasterizers(config);
    let frame_size = match (probe.width, probe.height) {
        (Some(width), Some(height)) => (width, height),
        _ => FALLBACK_FRAME_SIZE,
    };
    let fps = probe.fps.unwrap_or(DEFAULT_FPS_FALLBACK);

    if let Some(title) = &config.overlay.title {
        let titled = work_dir.join("titled.mp4");
        match prepend_title_card(
            &current,
            &titled,
            &rasterizers,
            title,
            config.overlay.subtitle.as_deref(),
            &config.captions,
            frame_size,
            fps,
            config.overlay.title_duration,
            probe.has_audio(),
            &config.encoding,
        )
        .await
        {
            Ok(Some(())) => current = titled,
            Ok(None) => {}
            Err(e) => logger.warning(&format!("Title card failed, continuing without: {e}")),
        }
    }

    let mut filters = Vec::new();
    if config.style.color_correct {
        filters.push(color_correction_filter(&config.style.preset().params()));
    }
    if config.style.stabilize {
        filters.push(stabilization_filter());
    }
    if !filters.is_empty() {
        let styled = work_dir.join("styled.mp4");
        match apply_video_filters(&current, &styled, &filters, &config.encoding).await {
            Ok(()) => current = styled,
            Err(e) => logger.warning(&format!("Style filters failed, keeping unfiltered: {e}")),
        }
    }

    let transcriber = WhisperCli::new(&config.whisper_model);
    let spans = transcriber.transcribe(&item.file).await;
    if spans.is_empty() {
        logger.progress("No transcript spans, skipping captions");
    } else {
        let captioned = work_dir.join("captioned.mp4");
        match burn_captions(
            &current,
            &captioned,
            &spans,
            &config.captions,
            &rasterizers,
            frame_size,
            &config.encoding,
        )
        .await
        {
            Ok(true) => current = captioned,
            Ok(false) => logger.progress("No captions rendered"),
            Err(e) => logger.warning(&format!("Caption burn-in failed, continuing without: {e}")),
        }
    }

    if let Some(watermark) = &config.overlay.watermark {
        let watermarked = work_dir.join("watermarked.mp4");
        match overlay_watermark(
            &current,
            &watermarked,
            watermark,
            WatermarkCorner::from_name(&config.overlay.watermark_position),
            DEFAULT_WATERMARK_OPACITY,
            DEFAULT_WATERMARK_WIDTH_RATIO,
            &config.encoding,
        )
        .await
        {
            Ok(()) => current = watermarked,
            Err(e) => logger.warning(&format!("Watermark failed, continuing without: {e}")),
        }
    }

    current
}

/// Ordered rasterization strategies: configured font first, then the
/// platform default.
fn build_rasterizers(config: &AppConfig) -> Vec<Box<dyn CaptionRasterizer>> {
    vec![
        Box::new(DrawtextRasterizer::named_font(&config.captions.font)),
        Box::new(DrawtextRasterizer::default_font()),
    ]
}

/// Timestamped master path for a source file.
fn master_path(output_dir: &Path, source: &Path) -> PathBuf {
    output_dir.join(format!(
        "{}_{}.mp4",
        safe_stem(source),
        Utc::now().timestamp()
    ))
}

/// Preview path next to a master file.
fn preview_path(master: &Path) -> PathBuf {
    let stem = master
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    master.with_file_name(format!("{stem}_preview.mp4"))
}

/// Source stem with whitespace made filename-safe.
fn safe_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(' ', "_"))
        .unwrap_or_else(|| "video".to_string())
}

/// Record the outputs a non-dry run would have produced.
fn record_planned_outputs(config: &AppConfig, master: &Path, report: &mut VideoReport) {
    report.outputs.push(master.to_string_lossy().to_string());
    for resolution in &config.export.resolutions {
        if parse_resolution(resolution).is_none() {
            continue;
        }
        report
            .outputs
            .push(rendition_path(master, resolution).to_string_lossy().to_string());
    }
    if config.export.preview {
        report
            .outputs
            .push(preview_path(master).to_string_lossy().to_string());
    }
}

/// Serialize a report next to the exported files.
pub async fn write_report(config: &AppConfig, report: &VideoReport) -> PipelineResult<PathBuf> {
    let stem = safe_stem(Path::new(&report.file));
    let path = config.output_dir.join(format!("{stem}_report.json"));
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}
