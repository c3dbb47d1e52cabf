//! Progress-callback trait for per-job conversion events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::RenderConfigBuilder::progress_callback`] to be told when
//! each document is submitted, when its PDF has landed on disk, and when it
//! fails.
//!
//! `on_job_complete` fires only after the destination file has been fully
//! written and renamed into place, so a callback may open the PDF it is told
//! about.
//!
//! # Example
//!
//! ```rust
//! use docs2pdf::{BatchProgressCallback, ConversionJob, JobReport, RenderConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_job_complete(&self, job: &ConversionJob, report: &JobReport) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{} ({} bytes)", job.success_message(), report.bytes_written);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = RenderConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::JobError;
use crate::job::ConversionJob;
use crate::output::JobReport;
use std::sync::Arc;

/// Called by the batch runner as it processes each job.
///
/// Jobs run concurrently, so every method except `on_batch_start` and
/// `on_batch_complete` may be called from several tasks at once.
/// Implementations must protect shared mutable state with `Mutex` or atomics.
/// All methods default to no-ops.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any job is submitted.
    fn on_batch_start(&self, total_jobs: usize) {
        let _ = total_jobs;
    }

    /// Called when a job is submitted, in list order.
    fn on_job_start(&self, job: &ConversionJob) {
        let _ = job;
    }

    /// Called once the job's PDF has been written to its destination.
    fn on_job_complete(&self, job: &ConversionJob, report: &JobReport) {
        let _ = (job, report);
    }

    /// Called when a job fails. The other jobs are unaffected.
    fn on_job_error(&self, job: &ConversionJob, error: &JobError) {
        let _ = (job, error);
    }

    /// Called once after every job has finished.
    fn on_batch_complete(&self, total_jobs: usize, succeeded: usize) {
        let _ = (total_jobs, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Reports each event through `tracing`; the success line goes out at INFO.
pub struct TracingProgressCallback;

impl BatchProgressCallback for TracingProgressCallback {
    fn on_job_complete(&self, job: &ConversionJob, report: &JobReport) {
        tracing::info!(
            bytes = report.bytes_written,
            ms = report.duration_ms,
            "{}",
            job.success_message()
        );
    }

    fn on_job_error(&self, _job: &ConversionJob, error: &JobError) {
        tracing::error!("{}", error);
    }
}

/// Convenience alias matching the type stored in [`crate::config::RenderConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        succeeded: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_jobs: usize) {
            self.started_total.store(total_jobs, Ordering::SeqCst);
        }

        fn on_job_start(&self, _job: &ConversionJob) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_job_complete(&self, _job: &ConversionJob, _report: &JobReport) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_job_error(&self, _job: &ConversionJob, _error: &JobError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _total_jobs: usize, succeeded: usize) {
            self.succeeded.store(succeeded, Ordering::SeqCst);
        }
    }

    fn job(label: &str) -> ConversionJob {
        ConversionJob::new(
            PathBuf::from(format!("/docs/{label}.md")),
            PathBuf::from(format!("/docs/{label}.pdf")),
            label,
        )
    }

    fn report(job: &ConversionJob) -> JobReport {
        JobReport {
            label: job.label.clone(),
            source: job.source.clone(),
            destination: job.destination.clone(),
            bytes_written: 1024,
            duration_ms: 12,
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let j = job("a");
        cb.on_batch_start(1);
        cb.on_job_start(&j);
        cb.on_job_complete(&j, &report(&j));
        cb.on_job_error(
            &j,
            &JobError::RenderFailed {
                label: "a".into(),
                detail: "x".into(),
            },
        );
        cb.on_batch_complete(1, 0);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        let (a, b) = (job("a"), job("b"));

        tracker.on_batch_start(2);
        tracker.on_job_start(&a);
        tracker.on_job_start(&b);
        tracker.on_job_complete(&a, &report(&a));
        tracker.on_job_error(
            &b,
            &JobError::SourceNotFound {
                label: "b".into(),
                path: b.source.clone(),
            },
        );
        tracker.on_batch_complete(2, 1);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.succeeded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(TracingProgressCallback);
        let j = job("c");
        cb.on_batch_start(1);
        cb.on_job_complete(&j, &report(&j));
    }
}
