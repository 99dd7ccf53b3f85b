//! Per-frame visual features.

/// Number of intensity buckets in a frame histogram.
pub const HISTOGRAM_BINS: usize = 64;

/// Visual features computed for a single decoded frame.
///
/// Features are produced one per frame in timestamp order and live only for
/// the duration of one video's detection pass.
#[derive(Debug, Clone)]
pub struct FrameFeature {
    /// Zero-based frame index.
    pub index: u32,

    /// Presentation time in seconds (`index / fps`).
    pub timestamp_secs: f64,

    /// L2-normalized intensity histogram with [`HISTOGRAM_BINS`] buckets.
    pub histogram: Vec<f32>,

    /// Mean optical-flow magnitude against the previous frame.
    ///
    /// `None` for the first frame, which has no predecessor to diff against.
    pub motion: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_has_no_motion() {
        let feature = FrameFeature {
            index: 0,
            timestamp_secs: 0.0,
            histogram: vec![0.0; HISTOGRAM_BINS],
            motion: None,
        };
        assert!(feature.motion.is_none());
        assert_eq!(feature.histogram.len(), HISTOGRAM_BINS);
    }
}
