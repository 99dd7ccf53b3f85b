//! Pipeline orchestration for automated short-form editing.
//!
//! This crate provides:
//! - Run configuration (CLI + JSON metadata layering)
//! - The per-video stage state machine
//! - Bounded batch execution with per-task results
//! - Structured per-video logging and JSON reports

pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod processor;
pub mod stage;

pub use config::{AppConfig, CliOverrides, VideoItem};
pub use error::{PipelineError, PipelineResult};
pub use executor::process_batch;
pub use logging::{init_tracing, VideoLogger};
pub use processor::{process_video, write_report};
pub use stage::Stage;
