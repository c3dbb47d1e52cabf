//! Eager (whole-batch) conversion entry points.
//!
//! [`convert_all`] submits every job at once, waits for all of them and
//! returns a [`BatchReport`]. The process therefore never exits with a
//! conversion still in flight. Use [`crate::stream::convert_stream`] instead
//! to observe outcomes as they land.
//!
//! A job either ends with its PDF renamed into place, or with a [`JobError`].
//! A failure in one job never affects another.

use crate::config::RenderConfig;
use crate::error::{Docs2PdfError, JobError};
use crate::job::{self, ConversionJob};
use crate::output::{BatchReport, JobOutcome, JobReport};
use crate::render::{PdfRenderer, PdfiumRenderer};
use crate::stream::convert_stream;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert the five documentation files next to the running program.
///
/// Resolves [`job::base_dir`], builds [`job::default_jobs`] and renders them
/// with [`PdfiumRenderer`].
///
/// # Returns
/// `Ok(BatchReport)` once every job has finished, even if some failed
/// (check `report.stats.failed` or call [`BatchReport::into_result`]).
///
/// # Errors
/// Only when the program directory cannot be determined.
pub async fn convert_documentation(config: &RenderConfig) -> Result<BatchReport, Docs2PdfError> {
    let base = job::base_dir()?;
    info!("Resolving documentation jobs against {}", base.display());
    let renderer: Arc<dyn PdfRenderer> = Arc::new(PdfiumRenderer::new());
    Ok(convert_all(job::default_jobs(&base), renderer, config).await)
}

/// Run every job concurrently and wait for all of them.
///
/// Jobs are submitted in list order without waiting for each other.
/// Outcomes in the report are in submission order.
pub async fn convert_all(
    jobs: Vec<ConversionJob>,
    renderer: Arc<dyn PdfRenderer>,
    config: &RenderConfig,
) -> BatchReport {
    let total_start = Instant::now();
    let total = jobs.len();
    info!("Submitting {} conversion jobs", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let outcomes: Vec<JobOutcome> = convert_stream(jobs, renderer, config).collect().await;
    let report = BatchReport::new(outcomes, total_start.elapsed().as_millis() as u64);

    info!(
        "Batch complete: {}/{} documents, {} bytes, {}ms",
        report.stats.succeeded,
        report.stats.total_jobs,
        report.stats.total_bytes,
        report.stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, report.stats.succeeded);
    }

    report
}

/// Synchronous wrapper around [`convert_all`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_all_sync(
    jobs: Vec<ConversionJob>,
    renderer: Arc<dyn PdfRenderer>,
    config: &RenderConfig,
) -> Result<BatchReport, Docs2PdfError> {
    Ok(tokio::runtime::Runtime::new()
        .map_err(|e| Docs2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_all(jobs, renderer, config)))
}

/// Convert a single job and fire its completion or error callback.
///
/// `on_job_complete` runs only after the PDF has been renamed onto
/// `job.destination`.
pub async fn convert_job(
    index: usize,
    job: ConversionJob,
    renderer: Arc<dyn PdfRenderer>,
    config: &RenderConfig,
) -> JobOutcome {
    let start = Instant::now();
    let result = run_job(&job, renderer, config, start).await;

    match &result {
        Ok(report) => info!(
            "{} ({} bytes, {}ms)",
            job.success_message(),
            report.bytes_written,
            report.duration_ms
        ),
        Err(e) => warn!("{}", e),
    }

    if let Some(ref cb) = config.progress_callback {
        match &result {
            Ok(report) => cb.on_job_complete(&job, report),
            Err(e) => cb.on_job_error(&job, e),
        }
    }

    JobOutcome {
        index,
        label: job.label,
        result,
    }
}

async fn run_job(
    job: &ConversionJob,
    renderer: Arc<dyn PdfRenderer>,
    config: &RenderConfig,
    start: Instant,
) -> Result<JobReport, JobError> {
    debug!(
        "{}: {} → {}",
        job.label,
        job.source.display(),
        job.destination.display()
    );

    let markdown = read_source(job).await?;

    // ── Render on the blocking pool ──────────────────────────────────────
    let render_start = Instant::now();
    let render_config = config.clone();
    let pdf = tokio::task::spawn_blocking(move || renderer.render(&markdown, &render_config))
        .await
        .map_err(|e| JobError::TaskFailed {
            label: job.label.clone(),
            detail: e.to_string(),
        })?
        .map_err(|e| JobError::RenderFailed {
            label: job.label.clone(),
            detail: e.to_string(),
        })?;
    debug!(
        "{}: rendered {} bytes in {}ms",
        job.label,
        pdf.len(),
        render_start.elapsed().as_millis()
    );

    write_atomic(job, &pdf).await?;

    Ok(JobReport {
        label: job.label.clone(),
        source: job.source.clone(),
        destination: job.destination.clone(),
        bytes_written: pdf.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Read the Markdown source, classifying the failure.
async fn read_source(job: &ConversionJob) -> Result<String, JobError> {
    tokio::fs::read_to_string(&job.source)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => JobError::SourceNotFound {
                label: job.label.clone(),
                path: job.source.clone(),
            },
            ErrorKind::PermissionDenied => JobError::PermissionDenied {
                label: job.label.clone(),
                path: job.source.clone(),
            },
            _ => JobError::ReadFailed {
                label: job.label.clone(),
                path: job.source.clone(),
                detail: e.to_string(),
            },
        })
}

/// Temporary sibling the PDF is written to before the rename.
fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

/// Atomic write: write to a temp sibling, then rename onto the destination.
async fn write_atomic(job: &ConversionJob, bytes: &[u8]) -> Result<(), JobError> {
    let path = &job.destination;
    let write_failed = |e: std::io::Error| JobError::OutputWriteFailed {
        label: job.label.clone(),
        path: path.clone(),
        detail: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let tmp_path = temp_path(path);
    let written = match tokio::fs::write(&tmp_path, bytes).await {
        Ok(()) => tokio::fs::rename(&tmp_path, path).await,
        Err(e) => Err(e),
    };

    // A partial temp file must not outlive a failed write or rename.
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_failed(e));
    }

    Ok(())
}
