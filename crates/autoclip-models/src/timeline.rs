//! Assembled timeline models.

use serde::{Deserialize, Serialize};

/// A sub-range of the source media, after padding and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRange {
    /// Start offset into the source (seconds).
    pub start_secs: f64,

    /// End offset into the source (seconds).
    pub end_secs: f64,
}

impl SourceRange {
    /// Create a new source range.
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_secs,
            end_secs,
        }
    }

    /// Range duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }
}

/// Transition applied between adjacent timeline clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Adjacent clips overlap and blend across the transition duration.
    Crossfade,
    /// Alias behavior of crossfade.
    Fade,
    /// Clips are concatenated back-to-back with no overlap.
    Cut,
}

impl TransitionKind {
    /// Resolve a transition name; unrecognized names fall back to a plain cut.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "crossfade" => Self::Crossfade,
            "fade" => Self::Fade,
            _ => Self::Cut,
        }
    }

    /// Whether adjacent clips overlap under this transition.
    pub fn overlaps(&self) -> bool {
        matches!(self, Self::Crossfade | Self::Fade)
    }

    /// Name used in logs and filenames.
    pub fn as_name(&self) -> &'static str {
        match self {
            Self::Crossfade => "crossfade",
            Self::Fade => "fade",
            Self::Cut => "cut",
        }
    }
}

impl Default for TransitionKind {
    fn default() -> Self {
        Self::Crossfade
    }
}

/// One clip placed on the assembled timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineClip {
    /// Source sub-range this clip plays.
    pub source: SourceRange,

    /// Offset of the clip on the output timeline (seconds).
    ///
    /// For overlapping transitions this is also where the blend with the
    /// previous clip begins.
    pub offset_secs: f64,
}

/// An ordered, never-empty sequence of source clips plus the transition
/// policy joining them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Clips in playback order.
    pub clips: Vec<TimelineClip>,

    /// Transition applied between adjacent clips.
    pub transition: TransitionKind,

    /// Transition duration in seconds.
    pub transition_secs: f64,

    /// Total duration of the joined output (seconds).
    pub duration_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_from_name() {
        assert_eq!(TransitionKind::from_name("crossfade"), TransitionKind::Crossfade);
        assert_eq!(TransitionKind::from_name("FADE"), TransitionKind::Fade);
        assert_eq!(TransitionKind::from_name("wipe"), TransitionKind::Cut);
        assert_eq!(TransitionKind::from_name(""), TransitionKind::Cut);
    }

    #[test]
    fn test_overlapping_kinds() {
        assert!(TransitionKind::Crossfade.overlaps());
        assert!(TransitionKind::Fade.overlaps());
        assert!(!TransitionKind::Cut.overlaps());
    }

    #[test]
    fn test_range_duration_never_negative() {
        let range = SourceRange::new(5.0, 3.0);
        assert_eq!(range.duration_secs(), 0.0);
    }
}
