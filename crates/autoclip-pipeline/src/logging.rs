//! Tracing setup and per-video structured logging.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// Plain ANSI output by default; JSON when `LOG_FORMAT=json`. Filtering
/// comes from `RUST_LOG` with an `autoclip=info` floor.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("autoclip=info".parse().expect("static directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Structured logger for one video's pipeline run.
///
/// Carries the video identity and current stage so every line is
/// attributable without a global registry; each worker task gets its own
/// instance, scoped to the run.
#[derive(Debug, Clone)]
pub struct VideoLogger {
    video: String,
    stage: String,
}

impl VideoLogger {
    /// Create a logger for a source video.
    pub fn new(video: impl Into<String>) -> Self {
        Self {
            video: video.into(),
            stage: "probing".to_string(),
        }
    }

    /// Record entry into a pipeline stage.
    pub fn enter_stage(&mut self, stage: &str) {
        self.stage = stage.to_string();
        info!(video = %self.video, stage = %self.stage, "Stage started");
    }

    /// Log a progress update within the current stage.
    pub fn progress(&self, message: &str) {
        info!(video = %self.video, stage = %self.stage, "{message}");
    }

    /// Log a degraded-but-continuing condition.
    pub fn warning(&self, message: &str) {
        warn!(video = %self.video, stage = %self.stage, "{message}");
    }

    /// Log a terminal failure for this video.
    pub fn failure(&self, message: &str) {
        error!(video = %self.video, stage = %self.stage, "{message}");
    }

    /// The video this logger is bound to.
    pub fn video(&self) -> &str {
        &self.video
    }

    /// Create a tracing span covering this video's run.
    pub fn span(&self) -> Span {
        tracing::info_span!("video", video = %self.video)
    }
}
