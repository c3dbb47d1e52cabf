//! Result types produced by a conversion batch.

use crate::error::{Docs2PdfError, JobError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A successfully converted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub label: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Size of the PDF written to `destination`.
    pub bytes_written: u64,
    /// Wall-clock time from submission to rename.
    pub duration_ms: u64,
}

/// The outcome of one submitted job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Position of the job in the submitted list (0-indexed).
    pub index: usize,
    pub label: String,
    pub result: Result<JobReport, JobError>,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate counters for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_jobs: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Sum of `bytes_written` over successful jobs.
    pub total_bytes: u64,
    pub total_duration_ms: u64,
}

/// Everything a batch produced, in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// Assemble a report; `outcomes` may arrive in completion order.
    pub fn new(mut outcomes: Vec<JobOutcome>, total_duration_ms: u64) -> Self {
        outcomes.sort_by_key(|o| o.index);
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        let total_bytes = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.bytes_written)
            .sum();
        let stats = BatchStats {
            total_jobs: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            total_bytes,
            total_duration_ms,
        };
        Self { outcomes, stats }
    }

    /// Errors of the failed jobs, in submission order.
    pub fn errors(&self) -> impl Iterator<Item = &JobError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Turn any job failure into a fatal error.
    pub fn into_result(self) -> Result<BatchReport, Docs2PdfError> {
        let Some(first_error) = self.errors().next().map(ToString::to_string) else {
            return Ok(self);
        };

        if self.stats.succeeded == 0 {
            Err(Docs2PdfError::AllJobsFailed {
                total: self.stats.total_jobs,
                first_error,
            })
        } else {
            Err(Docs2PdfError::PartialFailure {
                succeeded: self.stats.succeeded,
                failed: self.stats.failed,
                total: self.stats.total_jobs,
                first_error,
            })
        }
    }
}
