//! Caption styling.

use serde::{Deserialize, Serialize};

/// Vertical placement of rendered text on the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptionPosition {
    #[default]
    Bottom,
    Top,
    /// Centered on the frame; used for title cards.
    Center,
}

/// Style parameters handed to the caption rasterizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionStyle {
    /// Font family name.
    #[serde(default = "default_font")]
    pub font: String,

    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Vertical placement.
    #[serde(default)]
    pub position: CaptionPosition,

    /// Fill color.
    #[serde(default = "default_color")]
    pub color: String,

    /// Outline color.
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,

    /// Outline width in pixels.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
}

fn default_font() -> String {
    "Arial".to_string()
}
fn default_font_size() -> u32 {
    36
}
fn default_color() -> String {
    "white".to_string()
}
fn default_stroke_color() -> String {
    "black".to_string()
}
fn default_stroke_width() -> u32 {
    2
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: default_font_size(),
            position: CaptionPosition::default(),
            color: default_color(),
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
        }
    }
}

impl CaptionStyle {
    /// Variant of this style used for title cards.
    pub fn for_title(&self) -> Self {
        Self {
            font_size: 64,
            position: CaptionPosition::Center,
            ..self.clone()
        }
    }
}
