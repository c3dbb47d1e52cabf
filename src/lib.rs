//! # docs2pdf
//!
//! Batch-convert the AI Model Marketplace Markdown documentation into PDF.
//!
//! Five documents are converted, each from a fixed source path to a fixed
//! destination path next to the program:
//!
//! | Source | Destination | Label |
//! |--------|-------------|-------|
//! | `documentation.md` | `AI_Model_Marketplace_Documentation.pdf` | API Documentation |
//! | `user_guide.md` | `AI_Model_Marketplace_User_Guide.pdf` | User Guide |
//! | `guides/code_guide.md` | `AI_Model_Marketplace_Code_Guide.pdf` | Code Guide |
//! | `TEXT_PROCESSING.md` | `AI_Model_Text_Processing_Guide.pdf` | Text Processing Guide |
//! | `changes.md` | `AI_Model_Changes_Documentation.pdf` | Changes Documentation |
//!
//! ## Pipeline Overview
//!
//! ```text
//! job table
//!  │
//!  ├─ 1. Resolve  join relative paths onto the program directory
//!  ├─ 2. Submit   every job at once, in list order
//!  ├─ 3. Read     Markdown source (tokio::fs)
//!  ├─ 4. Render   comrak blocks → layout → pdfium (spawn_blocking)
//!  ├─ 5. Write    temp file + rename, so no partial PDF is ever visible
//!  └─ 6. Report   "<label> converted to PDF successfully!" per job
//! ```
//!
//! Jobs are independent: a missing source fails that one document and the
//! others still produce their PDFs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docs2pdf::{convert_documentation, RenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = convert_documentation(&RenderConfig::default()).await?;
//!     for outcome in &report.outcomes {
//!         match &outcome.result {
//!             Ok(r) => println!("{} → {}", r.label, r.destination.display()),
//!             Err(e) => eprintln!("{e}"),
//!         }
//!     }
//!     report.into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docs2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod job;
pub mod output;
pub mod progress;
pub mod render;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_all, convert_all_sync, convert_documentation, convert_job};
pub use config::{Orientation, PaperSize, RenderConfig, RenderConfigBuilder};
pub use error::{Docs2PdfError, JobError, RenderError};
pub use job::{base_dir, default_jobs, ConversionJob, BASE_DIR_ENV, DOCUMENTATION_JOBS};
pub use output::{BatchReport, BatchStats, JobOutcome, JobReport};
pub use progress::{
    BatchProgressCallback, NoopProgressCallback, ProgressCallback, TracingProgressCallback,
};
pub use render::{PdfRenderer, PdfiumRenderer};
pub use stream::{convert_stream, JobStream};
