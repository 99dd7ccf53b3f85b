//! Shared data models for the autoclip editing pipeline.
//!
//! This crate provides the types exchanged between detection, assembly and
//! orchestration:
//! - Per-frame features, scenes and ranked highlights
//! - Source sub-ranges and the assembled timeline
//! - Probe metadata and per-video reports
//! - Caption styling, encoding settings and style presets

pub mod caption;
pub mod encoding;
pub mod feature;
pub mod highlight;
pub mod preset;
pub mod probe;
pub mod report;
pub mod scene;
pub mod timeline;
pub mod transcript;

// Re-export common types
pub use caption::{CaptionPosition, CaptionStyle};
pub use encoding::EncodingConfig;
pub use feature::{FrameFeature, HISTOGRAM_BINS};
pub use highlight::{Highlight, TrimRange, MANUAL_TRIM_SCORE};
pub use preset::{PresetParams, StylePreset};
pub use probe::MediaProbe;
pub use report::{VideoReport, REPORT_HIGHLIGHT_CAP};
pub use scene::Scene;
pub use timeline::{SourceRange, Timeline, TimelineClip, TransitionKind};
pub use transcript::TranscriptSpan;
