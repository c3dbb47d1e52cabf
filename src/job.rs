//! The fixed documentation job table and program-directory resolution.
//!
//! Paths in [`DOCUMENTATION_JOBS`] are relative. They are joined onto the
//! program's own directory by [`default_jobs`], so the converter behaves the
//! same regardless of the working directory it is launched from.

use crate::error::Docs2PdfError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the directory jobs are resolved against.
pub const BASE_DIR_ENV: &str = "DOCS2PDF_BASE_DIR";

/// `(source, destination, label)` for every document, in submission order.
pub const DOCUMENTATION_JOBS: [(&str, &str, &str); 5] = [
    (
        "documentation.md",
        "AI_Model_Marketplace_Documentation.pdf",
        "API Documentation",
    ),
    (
        "user_guide.md",
        "AI_Model_Marketplace_User_Guide.pdf",
        "User Guide",
    ),
    (
        "guides/code_guide.md",
        "AI_Model_Marketplace_Code_Guide.pdf",
        "Code Guide",
    ),
    (
        "TEXT_PROCESSING.md",
        "AI_Model_Text_Processing_Guide.pdf",
        "Text Processing Guide",
    ),
    (
        "changes.md",
        "AI_Model_Changes_Documentation.pdf",
        "Changes Documentation",
    ),
];

/// One document to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Absolute path of the Markdown source.
    pub source: PathBuf,
    /// Absolute path of the PDF to produce.
    pub destination: PathBuf,
    /// Human-readable document name used in log lines.
    pub label: String,
}

impl ConversionJob {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            label: label.into(),
        }
    }

    /// The line reported once this job's PDF has been written.
    pub fn success_message(&self) -> String {
        format!("{} converted to PDF successfully!", self.label)
    }
}

/// Build the documentation jobs with paths joined onto `base_dir`.
pub fn default_jobs(base_dir: &Path) -> Vec<ConversionJob> {
    DOCUMENTATION_JOBS
        .iter()
        .map(|(source, destination, label)| {
            ConversionJob::new(base_dir.join(source), base_dir.join(destination), *label)
        })
        .collect()
}

/// The directory the job table is resolved against.
///
/// `DOCS2PDF_BASE_DIR` wins when set and non-empty; otherwise the directory
/// containing the running executable.
pub fn base_dir() -> Result<PathBuf, Docs2PdfError> {
    if let Ok(dir) = std::env::var(BASE_DIR_ENV) {
        if !dir.is_empty() {
            debug!("Using {}={}", BASE_DIR_ENV, dir);
            return Ok(PathBuf::from(dir));
        }
    }

    let exe = std::env::current_exe()
        .and_then(|p| p.canonicalize())
        .map_err(|source| Docs2PdfError::BaseDirUnavailable { source })?;

    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Docs2PdfError::BaseDirUnavailable {
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("executable '{}' has no parent directory", exe.display()),
            ),
        })
}
