//! Error types for the docs2pdf library.
//!
//! Three error types reflect three distinct failure scopes:
//!
//! * [`Docs2PdfError`]: **Fatal**. The batch cannot run at all (the program
//!   directory is unknown, the configuration is invalid), or the caller asked
//!   [`crate::output::BatchReport::into_result`] to turn job failures into an
//!   error.
//!
//! * [`JobError`]: **Non-fatal**. A single document failed (missing source,
//!   unwritable destination, renderer fault) while the other jobs carry on.
//!   Stored inside [`crate::output::JobOutcome`].
//!
//! * [`RenderError`]: raised by a [`crate::render::PdfRenderer`] and wrapped
//!   into [`JobError::RenderFailed`] by the batch runner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docs2pdf library.
#[derive(Debug, Error)]
pub enum Docs2PdfError {
    /// The directory the job table is resolved against could not be determined.
    #[error("Cannot determine the program directory: {source}\nSet DOCS2PDF_BASE_DIR to override it.")]
    BaseDirUnavailable {
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Some jobs succeeded but at least one failed.
    #[error("{failed}/{total} documents failed to convert\nFirst error: {first_error}")]
    PartialFailure {
        succeeded: usize,
        failed: usize,
        total: usize,
        first_error: String,
    },

    /// Every job failed; no PDF was produced.
    #[error("All {total} documents failed to convert.\nFirst error: {first_error}")]
    AllJobsFailed { total: usize, first_error: String },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single conversion job.
///
/// The other jobs in the batch are unaffected.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum JobError {
    /// The Markdown source does not exist.
    #[error("{label}: source file not found: '{}'", path.display())]
    SourceNotFound { label: String, path: PathBuf },

    /// The process may not read the Markdown source.
    #[error("{label}: permission denied reading '{}'", path.display())]
    PermissionDenied { label: String, path: PathBuf },

    /// Reading the source failed for another reason (not UTF-8, I/O error).
    #[error("{label}: failed to read '{}': {detail}", path.display())]
    ReadFailed {
        label: String,
        path: PathBuf,
        detail: String,
    },

    /// The renderer could not produce a PDF.
    #[error("{label}: rendering failed: {detail}")]
    RenderFailed { label: String, detail: String },

    /// The PDF could not be written to its destination.
    #[error("{label}: failed to write '{}': {detail}", path.display())]
    OutputWriteFailed {
        label: String,
        path: PathBuf,
        detail: String,
    },

    /// The blocking render task panicked or was cancelled.
    #[error("{label}: render task failed: {detail}")]
    TaskFailed { label: String, detail: String },
}

impl JobError {
    /// Human-readable name of the document this error belongs to.
    pub fn label(&self) -> &str {
        match self {
            JobError::SourceNotFound { label, .. }
            | JobError::PermissionDenied { label, .. }
            | JobError::ReadFailed { label, .. }
            | JobError::RenderFailed { label, .. }
            | JobError::OutputWriteFailed { label, .. }
            | JobError::TaskFailed { label, .. } => label,
        }
    }
}

/// Errors raised while turning Markdown into PDF bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The PDFium shared library could not be located or bound.
    #[error(
        "PDFium engine unavailable: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or place the library next to the docs2pdf binary."
    )]
    EngineUnavailable(String),

    /// PDFium rejected an operation while building the document.
    #[error("PDFium error: {0}")]
    Engine(String),
}
