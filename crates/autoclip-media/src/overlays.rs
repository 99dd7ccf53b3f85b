//! Title cards and watermark overlays.

use std::path::Path;

use tracing::warn;

use autoclip_models::{CaptionStyle, EncodingConfig};

use crate::captions::{rasterize_with_fallback, CaptionRasterizer};
use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// Corner anchoring a watermark, with a fixed 20px margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatermarkCorner {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl WatermarkCorner {
    /// Resolve a position name; unknown names fall back to bottom-right.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "bottom-left" => Self::BottomLeft,
            "top-right" => Self::TopRight,
            "top-left" => Self::TopLeft,
            _ => Self::BottomRight,
        }
    }

    /// Overlay position expressions for this corner.
    fn overlay_expr(&self) -> (&'static str, &'static str) {
        match self {
            Self::BottomRight => ("W-w-20", "H-h-20"),
            Self::BottomLeft => ("20", "H-h-20"),
            Self::TopRight => ("W-w-20", "20"),
            Self::TopLeft => ("20", "20"),
        }
    }
}

/// Render a title card and prepend it to the sequence.
///
/// The card is the rasterized title (plus optional subtitle) over an opaque
/// black background, held for `duration_secs` with silent audio so the
/// concat keeps stream layouts aligned. Returns `Ok(None)` when the card
/// could not be rasterized; the sequence is then used unchanged.
#[allow(clippy::too_many_arguments)]
pub async fn prepend_title_card(
    input: &Path,
    output: &Path,
    rasterizers: &[Box<dyn CaptionRasterizer>],
    title: &str,
    subtitle: Option<&str>,
    style: &CaptionStyle,
    frame_size: (u32, u32),
    fps: f64,
    duration_secs: f64,
    has_audio: bool,
    encoding: &EncodingConfig,
) -> MediaResult<Option<()>> {
    let (width, height) = frame_size;
    let text = match subtitle {
        Some(subtitle) => format!("{title}\n{subtitle}"),
        None => title.to_string(),
    };

    let title_style = style.for_title();
    let Some(rendered) =
        rasterize_with_fallback(rasterizers, &text, width, height, &title_style).await
    else {
        warn!("Title card rasterization failed, continuing without title");
        return Ok(None);
    };

    let scratch = tempfile::tempdir()?;
    let card_png = scratch.path().join("title.png");
    rendered
        .save(&card_png)
        .map_err(|e| MediaError::rasterization_failed(format!("saving title card: {e}")))?;

    // Card clip: black canvas + rendered text + silent audio track.
    let card_clip = scratch.path().join("title.mp4");
    let canvas = format!("color=c=black:s={width}x{height}:r={fps:.3}:d={duration_secs:.3}");
    let silence = format!("anullsrc=channel_layout=stereo:sample_rate=44100:d={duration_secs:.3}");
    FfmpegCommand::new(&card_clip)
        .input_with_args(["-f", "lavfi"], canvas)
        .input(&card_png)
        .input_with_args(["-f", "lavfi"], silence)
        .filter_complex("[0:v][1:v]overlay=0:0[card]")
        .map("[card]")
        .map("2:a")
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .limit_duration(duration_secs)
        .run()
        .await?;

    let graph = if has_audio {
        "[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[v][a]"
    } else {
        "[0:v][1:v]concat=n=2:v=1:a=0[v]"
    };

    let mut command = FfmpegCommand::new(output)
        .input(&card_clip)
        .input(input)
        .filter_complex(graph)
        .map("[v]");
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

    Ok(Some(()))
}

/// Overlay a watermark image scaled to a fraction of the frame width.
pub async fn overlay_watermark(
    input: &Path,
    output: &Path,
    image: &Path,
    corner: WatermarkCorner,
    opacity: f64,
    width_ratio: f64,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    if !image.exists() {
        return Err(MediaError::FileNotFound(image.to_path_buf()));
    }

    let (x, y) = corner.overlay_expr();
    let graph = watermark_filter_graph(width_ratio, opacity, x, y);

    FfmpegCommand::new(output)
        .input(input)
        .input(image)
        .filter_complex(graph)
        .map("[v]")
        .map("0:a?")
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec("copy")
        .run()
        .await
}

/// Build the scale + opacity + overlay graph for a watermark.
fn watermark_filter_graph(width_ratio: f64, opacity: f64, x: &str, y: &str) -> String {
    format!(
        "[1:v][0:v]scale2ref=w=main_w*{width_ratio:.3}:h=ow/mdar[wm][vid];\
         [wm]format=rgba,colorchannelmixer=aa={opacity:.3}[wmo];\
         [vid][wmo]overlay={x}:{y}[v]"
    )
}

/// Default watermark opacity.
pub const DEFAULT_WATERMARK_OPACITY: f64 = 0.7;

/// Default watermark width as a fraction of the frame width.
pub const DEFAULT_WATERMARK_WIDTH_RATIO: f64 = 0.15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_from_name() {
        assert_eq!(WatermarkCorner::from_name("top-left"), WatermarkCorner::TopLeft);
        assert_eq!(
            WatermarkCorner::from_name("somewhere"),
            WatermarkCorner::BottomRight
        );
    }

    #[test]
    fn test_watermark_graph_shape() {
        let graph = watermark_filter_graph(0.15, 0.7, "W-w-20", "H-h-20");
        assert!(graph.contains("scale2ref=w=main_w*0.150"));
        assert!(graph.contains("colorchannelmixer=aa=0.700"));
        assert!(graph.ends_with("overlay=W-w-20:H-h-20[v]"));
    }

    #[tokio::test]
    async fn test_missing_watermark_image_is_an_error() {
        let result = overlay_watermark(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            Path::new("/no/such/watermark.png"),
            WatermarkCorner::BottomRight,
            DEFAULT_WATERMARK_OPACITY,
            DEFAULT_WATERMARK_WIDTH_RATIO,
            &EncodingConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
