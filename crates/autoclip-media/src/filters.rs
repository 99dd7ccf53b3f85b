//! FFmpeg filter string builders.

use autoclip_models::PresetParams;

/// Color correction mapped from preset parameters.
///
/// The exposure boost lifts normalized pixel values additively and the
/// contrast gain multiplies them, matching `eq`'s brightness/contrast
/// semantics.
pub fn color_correction_filter(params: &PresetParams) -> String {
    format!(
        "eq=contrast={:.3}:brightness={:.3}",
        params.contrast_gain, params.exposure_boost
    )
}

/// Stabilization via ffmpeg's deshake filter.
pub fn stabilization_filter() -> String {
    "deshake".to_string()
}

/// Scale to an exact output size.
pub fn scale_filter(width: u32, height: u32) -> String {
    format!("scale={width}:{height}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclip_models::StylePreset;

    #[test]
    fn test_color_correction_from_preset() {
        let filter = color_correction_filter(&StylePreset::Cinematic.params());
        assert_eq!(filter, "eq=contrast=1.080:brightness=0.020");
    }

    #[test]
    fn test_scale_filter() {
        assert_eq!(scale_filter(1280, 720), "scale=1280:720");
    }
}
