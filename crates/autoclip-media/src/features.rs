//! Per-frame feature extraction.
//!
//! Streams decoded frames and computes, for each one, a normalized intensity
//! histogram plus the mean dense optical-flow magnitude against the previous
//! frame. The stream is lazy, forward-only and single-pass; re-extraction
//! requires reopening the source.

use std::path::Path;
#[cfg(feature = "opencv")]
use tracing::debug;
use tracing::warn;

use autoclip_models::FrameFeature;
#[cfg(feature = "opencv")]
use autoclip_models::HISTOGRAM_BINS;

#[cfg(feature = "opencv")]
use opencv::{
    core::{self, Mat, Vector},
    imgproc,
    prelude::*,
    video, videoio,
};

/// Frame rate assumed when the container reports none.
pub const DEFAULT_FPS_FALLBACK: f64 = 30.0;

/// Lazy iterator of [`FrameFeature`] over a video source.
///
/// A source that cannot be opened yields an empty stream rather than an
/// error; callers treat an empty feature stream as "no highlights detected".
/// A mid-stream decode failure ends the stream.
pub struct FeatureStream {
    #[cfg(feature = "opencv")]
    capture: Option<videoio::VideoCapture>,
    #[cfg(feature = "opencv")]
    prev_gray: Option<Mat>,
    fps: f64,
    index: u32,
}

impl FeatureStream {
    /// Open a source for feature extraction.
    ///
    /// `fps_fallback` is used only when the container reports no usable frame
    /// rate.
    #[cfg(feature = "opencv")]
    pub fn open(path: impl AsRef<Path>, fps_fallback: f64) -> Self {
        let path = path.as_ref();
        let capture = match videoio::VideoCapture::from_file(
            path.to_string_lossy().as_ref(),
            videoio::CAP_ANY,
        ) {
            Ok(cap) if cap.is_opened().unwrap_or(false) => Some(cap),
            Ok(_) => {
                warn!(path = %path.display(), "Source could not be opened, yielding empty feature stream");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), "Capture open failed ({e}), yielding empty feature stream");
                None
            }
        };

        let fps = capture
            .as_ref()
            .and_then(|cap| cap.get(videoio::CAP_PROP_FPS).ok())
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(fps_fallback);

        Self {
            capture,
            prev_gray: None,
            fps,
            index: 0,
        }
    }

    /// Non-opencv stub: always an empty stream at the fallback rate.
    #[cfg(not(feature = "opencv"))]
    pub fn open(path: impl AsRef<Path>, fps_fallback: f64) -> Self {
        warn!(path = %path.as_ref().display(), "Built without frame decoding support, yielding empty feature stream");
        Self {
            fps: fps_fallback,
            index: 0,
        }
    }

    /// Effective frame rate (reported by the source, or the fallback).
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Number of frames yielded so far.
    pub fn frames_read(&self) -> u32 {
        self.index
    }
}

impl Iterator for FeatureStream {
    type Item = FrameFeature;

    #[cfg(feature = "opencv")]
    fn next(&mut self) -> Option<FrameFeature> {
        let capture = self.capture.as_mut()?;

        let mut frame = Mat::default();
        match capture.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(_) => {
                self.capture = None;
                return None;
            }
            Err(e) => {
                debug!("Frame read failed at index {}: {e}", self.index);
                self.capture = None;
                return None;
            }
        }

        let gray = match to_grayscale(&frame) {
            Ok(gray) => gray,
            Err(e) => {
                debug!("Grayscale conversion failed at index {}: {e}", self.index);
                self.capture = None;
                return None;
            }
        };

        let histogram = match intensity_histogram(&gray) {
            Ok(histogram) => histogram,
            Err(e) => {
                debug!("Histogram computation failed at index {}: {e}", self.index);
                self.capture = None;
                return None;
            }
        };

        // No predecessor to diff against on the first frame; a failed flow
        // estimate degrades to a missing sample rather than ending the stream.
        let motion = match &self.prev_gray {
            Some(prev) => match mean_flow_magnitude(prev, &gray) {
                Ok(magnitude) => Some(magnitude),
                Err(e) => {
                    debug!("Optical flow failed at index {}: {e}", self.index);
                    None
                }
            },
            None => None,
        };

        let index = self.index;
        self.index += 1;
        self.prev_gray = Some(gray);

        Some(FrameFeature {
            index,
            timestamp_secs: index as f64 / self.fps,
            histogram,
            motion,
        })
    }

    #[cfg(not(feature = "opencv"))]
    fn next(&mut self) -> Option<FrameFeature> {
        None
    }
}

/// Convert a decoded frame to single-channel intensity.
#[cfg(feature = "opencv")]
fn to_grayscale(frame: &Mat) -> Result<Mat, opencv::Error> {
    if frame.channels() == 1 {
        return frame.try_clone();
    }
    let mut gray = Mat::default();
    imgproc::cvt_color_def(frame, &mut gray, imgproc::COLOR_BGR2GRAY)?;
    Ok(gray)
}

/// Compute the L2-normalized intensity histogram of a grayscale frame.
#[cfg(feature = "opencv")]
fn intensity_histogram(gray: &Mat) -> Result<Vec<f32>, opencv::Error> {
    let bins = HISTOGRAM_BINS as i32;

    let mut images: Vector<Mat> = Vector::new();
    images.push(gray.try_clone()?);
    let channels = Vector::from_slice(&[0]);
    let hist_size = Vector::from_slice(&[bins]);
    let ranges = Vector::from_slice(&[0.0f32, 256.0]);
    let mask = Mat::default();

    let mut hist = Mat::default();
    imgproc::calc_hist(&images, &channels, &mask, &mut hist, &hist_size, &ranges, false)?;

    let mut normalized = Mat::default();
    core::normalize(
        &hist,
        &mut normalized,
        1.0,
        0.0,
        core::NORM_L2,
        -1,
        &Mat::default(),
    )?;

    let mut histogram = Vec::with_capacity(HISTOGRAM_BINS);
    for bin in 0..bins {
        histogram.push(*normalized.at::<f32>(bin)?);
    }
    Ok(histogram)
}

/// Average magnitude of the dense Farneback flow field between two frames.
#[cfg(feature = "opencv")]
fn mean_flow_magnitude(prev_gray: &Mat, gray: &Mat) -> Result<f64, opencv::Error> {
    let mut flow = Mat::default();
    video::calc_optical_flow_farneback(prev_gray, gray, &mut flow, 0.5, 3, 15, 3, 5, 1.2, 0)?;

    let mut components: Vector<Mat> = Vector::new();
    core::split(&flow, &mut components)?;
    let mut magnitude = Mat::default();
    core::magnitude(&components.get(0)?, &components.get(1)?, &mut magnitude)?;

    Ok(core::mean(&magnitude, &core::no_array())?[0])
}
