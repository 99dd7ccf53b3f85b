//! Highlight detection and FFmpeg-driven assembly.
//!
//! This crate provides:
//! - Per-frame feature extraction (histograms + optical-flow motion)
//! - Scene segmentation and highlight scoring/ranking
//! - Sequence assembly with transition joins
//! - Type-safe FFmpeg command building and probing
//! - Collaborator wrappers: transcription, caption rasterization, overlays,
//!   audio mixing and multi-resolution export

pub mod assembler;
pub mod audio;
pub mod captions;
pub mod command;
pub mod detect;
pub mod error;
pub mod export;
pub mod features;
pub mod filters;
pub mod overlays;
pub mod probe;
pub mod render;
pub mod scoring;
pub mod segmenter;
pub mod transcribe;

pub use assembler::{join_segments, select_segments, DEFAULT_SEGMENT_PAD_SECS};
pub use captions::{burn_captions, CaptionRasterizer, DrawtextRasterizer};
pub use command::FfmpegCommand;
pub use detect::{detect_highlights, DetectionOutcome, DetectionParams};
pub use error::{MediaError, MediaResult};
pub use features::{FeatureStream, DEFAULT_FPS_FALLBACK};
pub use probe::probe_media;
pub use scoring::{rank_highlights, MOTION_SCORE_SCALE};
pub use segmenter::{SceneSegmenter, SCENE_CUT_THRESHOLD};
pub use transcribe::{Transcriber, WhisperCli};
