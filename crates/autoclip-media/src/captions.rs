//! Caption rasterization and burn-in.
//!
//! Text rendering is an external collaborator: rasterizers produce a
//! full-frame RGBA image per caption, and an explicit ordered strategy list
//! is tried until one succeeds. A caption whose rasterization fails on every
//! strategy is skipped; no rasterizer failure escapes this boundary.

use std::path::Path;

use async_trait::async_trait;
use image::RgbaImage;
use tracing::{debug, warn};

use autoclip_models::{CaptionPosition, CaptionStyle, EncodingConfig, TranscriptSpan};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// Horizontal margin kept around caption text, in pixels.
const TEXT_MARGIN: u32 = 40;

/// Renders text into a full-frame image with alpha.
#[async_trait]
pub trait CaptionRasterizer: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Render `text` onto a transparent canvas of the target frame size.
    async fn rasterize(
        &self,
        text: &str,
        width: u32,
        height: u32,
        style: &CaptionStyle,
    ) -> MediaResult<RgbaImage>;
}

/// Rasterizer backed by FFmpeg's `drawtext` filter over a transparent
/// `lavfi` canvas.
#[derive(Debug, Clone)]
pub struct DrawtextRasterizer {
    font: Option<String>,
}

impl DrawtextRasterizer {
    /// Render with a specific font family (resolved through fontconfig).
    pub fn named_font(font: impl Into<String>) -> Self {
        Self {
            font: Some(font.into()),
        }
    }

    /// Render with the platform default font.
    pub fn default_font() -> Self {
        Self { font: None }
    }
}

#[async_trait]
impl CaptionRasterizer for DrawtextRasterizer {
    fn name(&self) -> &'static str {
        match self.font {
            Some(_) => "drawtext",
            None => "drawtext-default-font",
        }
    }

    async fn rasterize(
        &self,
        text: &str,
        width: u32,
        height: u32,
        style: &CaptionStyle,
    ) -> MediaResult<RgbaImage> {
        let scratch = tempfile::tempdir()?;

        // drawtext renders embedded newlines, so wrapping happens up front
        // and the whole block goes through a text file (no filter escaping).
        let wrapped = wrap_text(text, max_chars_per_line(width, style.font_size)).join("\n");
        let text_path = scratch.path().join("caption.txt");
        tokio::fs::write(&text_path, &wrapped).await?;

        let canvas = format!("color=c=black@0.0:s={width}x{height}:d=1,format=rgba");
        let png_path = scratch.path().join("caption.png");

        FfmpegCommand::new(&png_path)
            .input_with_args(["-f", "lavfi"], canvas)
            .video_filter(drawtext_filter(&text_path, style, self.font.as_deref()))
            .single_frame()
            .run()
            .await?;

        let rendered = image::open(&png_path)
            .map_err(|e| MediaError::rasterization_failed(format!("decoding rendered text: {e}")))?;
        Ok(rendered.to_rgba8())
    }
}

/// Build the drawtext filter for a caption text file.
fn drawtext_filter(text_path: &Path, style: &CaptionStyle, font: Option<&str>) -> String {
    let y_expr = match style.position {
        CaptionPosition::Bottom => format!("h-text_h-{TEXT_MARGIN}"),
        CaptionPosition::Top => TEXT_MARGIN.to_string(),
        CaptionPosition::Center => "(h-text_h)/2".to_string(),
    };

    let mut filter = format!(
        "drawtext=textfile='{}':fontsize={}:fontcolor={}:borderw={}:bordercolor={}:x=(w-text_w)/2:y={}",
        text_path.display(),
        style.font_size,
        style.color,
        style.stroke_width,
        style.stroke_color,
        y_expr,
    );
    if let Some(font) = font {
        filter.push_str(&format!(":font='{font}'"));
    }
    filter
}

/// Rough character budget per line for a given frame width and font size.
fn max_chars_per_line(width: u32, font_size: u32) -> usize {
    let usable = width.saturating_sub(2 * TEXT_MARGIN) as f64;
    let glyph_width = (font_size as f64 * 0.6).max(1.0);
    (usable / glyph_width).max(1.0) as usize
}

/// Greedy word wrap to a maximum line length.
///
/// A single word longer than the budget gets its own line rather than being
/// broken mid-word.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Try each rasterizer in order until one succeeds.
pub async fn rasterize_with_fallback(
    rasterizers: &[Box<dyn CaptionRasterizer>],
    text: &str,
    width: u32,
    height: u32,
    style: &CaptionStyle,
) -> Option<RgbaImage> {
    for rasterizer in rasterizers {
        match rasterizer.rasterize(text, width, height, style).await {
            Ok(rendered) => return Some(rendered),
            Err(e) => {
                debug!(strategy = rasterizer.name(), "Rasterizer failed, trying next: {e}");
            }
        }
    }
    warn!("All rasterizers failed for caption text, skipping");
    None
}

/// Burn transcript spans onto a video as timed overlays.
///
/// Returns `Ok(false)` when nothing was rendered (no spans, or every
/// rasterization failed) and the input should be used as-is.
pub async fn burn_captions(
    input: &Path,
    output: &Path,
    spans: &[TranscriptSpan],
    style: &CaptionStyle,
    rasterizers: &[Box<dyn CaptionRasterizer>],
    frame_size: (u32, u32),
    encoding: &EncodingConfig,
) -> MediaResult<bool> {
    let (width, height) = frame_size;
    let scratch = tempfile::tempdir()?;

    let mut overlays: Vec<(std::path::PathBuf, f64, f64)> = Vec::new();
    for (index, span) in spans.iter().enumerate() {
        if span.text.trim().is_empty() {
            continue;
        }
        let Some(rendered) =
            rasterize_with_fallback(rasterizers, span.text.trim(), width, height, style).await
        else {
            continue;
        };

        let png_path = scratch.path().join(format!("caption_{index}.png"));
        rendered
            .save(&png_path)
            .map_err(|e| MediaError::rasterization_failed(format!("saving caption: {e}")))?;
        overlays.push((png_path, span.start_secs, span.start_secs + span.display_secs()));
    }

    if overlays.is_empty() {
        return Ok(false);
    }

    let mut command = FfmpegCommand::new(output).input(input);
    for (png_path, _, _) in &overlays {
        command = command.input(png_path);
    }

    // Chain one overlay per caption, each enabled for its span only.
    let mut graph = String::new();
    let mut current = "[0:v]".to_string();
    for (index, (_, start_secs, end_secs)) in overlays.iter().enumerate() {
        let label = format!("[cap{}]", index + 1);
        graph.push_str(&format!(
            "{current}[{stream}:v]overlay=0:0:enable='between(t,{start_secs:.3},{end_secs:.3})'{label};",
            stream = index + 1,
        ));
        current = label;
    }
    graph.pop(); // trailing ';'

    command
        .filter_complex(graph)
        .map(current)
        .map("0:a?")
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec("copy")
        .run()
        .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_wrap_text_respects_budget() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= 15, "line too long: {line}");
        }
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_text_single_long_word() {
        let lines = wrap_text("supercalifragilistic", 5);
        assert_eq!(lines, vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn test_drawtext_filter_positions() {
        let style = CaptionStyle::default();
        let path = PathBuf::from("/tmp/caption.txt");
        let bottom = drawtext_filter(&path, &style, None);
        assert!(bottom.contains("y=h-text_h-40"));
        assert!(!bottom.contains(":font="));

        let mut top_style = style.clone();
        top_style.position = CaptionPosition::Top;
        assert!(drawtext_filter(&path, &top_style, Some("Arial")).contains("font='Arial'"));
    }

    #[test]
    fn test_max_chars_scales_with_font() {
        assert!(max_chars_per_line(1920, 36) > max_chars_per_line(1920, 72));
        assert!(max_chars_per_line(10, 100) >= 1);
    }
}
