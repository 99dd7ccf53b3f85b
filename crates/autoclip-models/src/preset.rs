//! Style presets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known look presets.
///
/// Each preset is an explicit immutable parameter record; unknown preset
/// names resolve to [`StylePreset::Standard`] rather than producing an empty
/// override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    Cinematic,
    Vlog,
    Reel,
    Youtube,
    #[default]
    Standard,
}

/// Color-correction parameters carried by a preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetParams {
    /// Additive brightness lift applied to normalized pixel values.
    pub exposure_boost: f64,

    /// Multiplicative contrast gain.
    pub contrast_gain: f64,
}

impl StylePreset {
    /// Resolve a preset name; unknown names map to the standard preset.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "cinematic" => Self::Cinematic,
            "vlog" => Self::Vlog,
            "reel" | "instagram" | "short" => Self::Reel,
            "youtube" => Self::Youtube,
            _ => Self::Standard,
        }
    }

    /// Parameter record for this preset.
    pub fn params(&self) -> PresetParams {
        match self {
            Self::Cinematic => PresetParams {
                exposure_boost: 0.02,
                contrast_gain: 1.08,
            },
            Self::Vlog => PresetParams {
                exposure_boost: 0.015,
                contrast_gain: 1.04,
            },
            Self::Reel => PresetParams {
                exposure_boost: 0.025,
                contrast_gain: 1.1,
            },
            Self::Youtube | Self::Standard => PresetParams {
                exposure_boost: 0.01,
                contrast_gain: 1.05,
            },
        }
    }

    /// Name used in logs and filenames.
    pub fn as_name(&self) -> &'static str {
        match self {
            Self::Cinematic => "cinematic",
            Self::Vlog => "vlog",
            Self::Reel => "reel",
            Self::Youtube => "youtube",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_name())
    }
}
