//! Bounded batch execution over independent videos.
//!
//! Videos are independent instances of the same per-video pipeline, run as
//! a structured task group: `max_workers` permits bound the parallelism and
//! every task yields a report, success or failure. One task's failure (or
//! panic) never terminates the group.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};
use uuid::Uuid;

use autoclip_models::VideoReport;

use crate::config::{AppConfig, VideoItem};
use crate::error::PipelineError;
use crate::logging::VideoLogger;
use crate::processor::{process_video, write_report};

/// Process every configured video and collect one report each.
///
/// With `max_workers <= 1` videos run sequentially in input order. Above
/// that, completion order across workers is not guaranteed; within one
/// video the stages stay strictly sequential on its worker.
pub async fn process_batch(config: Arc<AppConfig>) -> Vec<VideoReport> {
    let run_id = format!("run-{}", Uuid::new_v4());
    info!(
        run = %run_id,
        videos = config.videos.len(),
        workers = config.max_workers,
        "Starting batch"
    );

    let reports = if config.max_workers <= 1 {
        let mut reports = Vec::with_capacity(config.videos.len());
        for item in &config.videos {
            reports.push(run_one(&config, item).await);
        }
        reports
    } else {
        run_parallel(&config).await
    };

    let failed = reports.iter().filter(|report| report.is_failed()).count();
    info!(
        run = %run_id,
        completed = reports.len() - failed,
        failed,
        "Batch finished"
    );
    reports
}

async fn run_parallel(config: &Arc<AppConfig>) -> Vec<VideoReport> {
    let semaphore = Arc::new(Semaphore::new(config.max_workers));
    let mut tasks: JoinSet<VideoReport> = JoinSet::new();
    let mut files_by_task = HashMap::new();

    for item in config.videos.iter().cloned() {
        let config = Arc::clone(config);
        let semaphore = Arc::clone(&semaphore);
        let file = item.file.to_string_lossy().to_string();

        let handle = tasks.spawn(async move {
            // Closed only on JoinSet drop, which outlives the spawn loop.
            let _permit = semaphore.acquire_owned().await.expect("semaphore open");
            run_one(&config, &item).await
        });
        files_by_task.insert(handle.id(), file);
    }

    let mut reports = Vec::with_capacity(config.videos.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, report)) => reports.push(report),
            Err(join_error) => {
                // A panicked task fails its own video only.
                let file = files_by_task
                    .get(&join_error.id())
                    .cloned()
                    .unwrap_or_else(|| "<unknown>".to_string());
                error!(video = %file, "Worker task panicked: {join_error}");
                let report = VideoReport::failed(&file, format!("worker panicked: {join_error}"));
                if let Err(e) = write_report(config, &report).await {
                    error!(video = %file, "Failed to write report: {e}");
                }
                reports.push(report);
            }
        }
    }
    reports
}

/// Run one video to a report, catching hard failures at this boundary.
async fn run_one(config: &AppConfig, item: &VideoItem) -> VideoReport {
    let mut logger = VideoLogger::new(item.file.to_string_lossy());

    let report = match process_video(config, item, &mut logger).await {
        Ok(report) => report,
        // A missing source skips the video; it is not a pipeline fault.
        Err(PipelineError::MissingSource(_)) => {
            logger.warning("Skipping missing file");
            VideoReport::failed(item.file.to_string_lossy(), "missing_file")
        }
        Err(e) => {
            logger.failure(&format!("Video failed: {e}"));
            VideoReport::failed(item.file.to_string_lossy(), e.to_string())
        }
    };

    if config.log_reports {
        if let Err(e) = write_report(config, &report).await {
            logger.warning(&format!("Failed to write report: {e}"));
        }
    }
    report
}
