//! Streaming conversion API: emit job outcomes as they complete.
//!
//! Unlike [`crate::batch::convert_all`], which returns only after every job
//! has finished, [`convert_stream`] yields each [`JobOutcome`] the moment its
//! job ends. Outcomes arrive in completion order; use `outcome.index` to map
//! them back to the submitted list.
//!
//! Only job-level callbacks fire here (`on_job_start`, `on_job_complete`,
//! `on_job_error`). The batch-level events belong to `convert_all`.

use crate::batch::convert_job;
use crate::config::RenderConfig;
use crate::job::ConversionJob;
use crate::output::JobOutcome;
use crate::render::PdfRenderer;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::debug;

/// A boxed stream of job outcomes.
pub type JobStream = Pin<Box<dyn Stream<Item = JobOutcome> + Send>>;

/// Submit every job at once and stream outcomes as they finish.
///
/// Jobs are submitted in list order; there is no cap on how many are in
/// flight. Dropping the stream stops polling unfinished jobs, but a render
/// already running on the blocking pool still runs to completion.
pub fn convert_stream(
    jobs: Vec<ConversionJob>,
    renderer: Arc<dyn PdfRenderer>,
    config: &RenderConfig,
) -> JobStream {
    let in_flight = jobs.len().max(1);
    let config = config.clone();

    let s = stream::iter(jobs.into_iter().enumerate().map(move |(index, job)| {
        debug!("Submitting job {}: {}", index, job.label);
        if let Some(ref cb) = config.progress_callback {
            cb.on_job_start(&job);
        }
        let renderer = Arc::clone(&renderer);
        let config = config.clone();
        async move { convert_job(index, job, renderer, &config).await }
    }))
    .buffer_unordered(in_flight);

    Box::pin(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Sleeps for a duration encoded in the Markdown, so the test controls
    /// completion order.
    struct SleepyRenderer;

    impl PdfRenderer for SleepyRenderer {
        fn render(&self, markdown: &str, _config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
            let ms: u64 = markdown.trim().parse().unwrap_or(0);
            std::thread::sleep(Duration::from_millis(ms));
            Ok(markdown.as_bytes().to_vec())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn outcomes_arrive_in_completion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut jobs = Vec::new();
        for (name, delay) in [("slow", "400"), ("fast", "0")] {
            let src = dir.path().join(format!("{name}.md"));
            std::fs::write(&src, delay).unwrap();
            jobs.push(ConversionJob::new(src, dir.path().join(format!("{name}.pdf")), name));
        }

        let outcomes: Vec<JobOutcome> =
            convert_stream(jobs, Arc::new(SleepyRenderer), &RenderConfig::default())
                .collect()
                .await;

        let labels: Vec<&str> = outcomes.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["fast", "slow"]);
        assert_eq!(outcomes[0].index, 1);
    }

    #[tokio::test]
    async fn job_start_fires_in_submission_order() {
        use crate::progress::BatchProgressCallback;

        struct Recorder(Mutex<Vec<String>>);
        impl BatchProgressCallback for Recorder {
            fn on_job_start(&self, job: &ConversionJob) {
                self.0.lock().unwrap().push(job.label.clone());
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let jobs: Vec<ConversionJob> = ["one", "two", "three"]
            .iter()
            .map(|n| ConversionJob::new(dir.path().join(format!("{n}.md")), dir.path().join(format!("{n}.pdf")), *n))
            .collect();

        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let config = RenderConfig::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();

        let outcomes: Vec<JobOutcome> =
            convert_stream(jobs, Arc::new(SleepyRenderer), &config).collect().await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.result.is_err()), "sources do not exist");
        assert_eq!(*recorder.0.lock().unwrap(), ["one", "two", "three"]);
    }
}
