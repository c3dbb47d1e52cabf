//! CLI binary for docs2pdf.
//!
//! A thin shim over the library crate: maps the rendering flags to a
//! `RenderConfig`, converts the fixed documentation set and prints one
//! confirmation line per document.

use anyhow::{Context, Result};
use clap::Parser;
use docs2pdf::{
    convert_documentation, BatchProgressCallback, ConversionJob, JobError, JobReport,
    Orientation, PaperSize, ProgressCallback, RenderConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Console reporting ────────────────────────────────────────────────────────

/// Prints the per-document confirmation lines, optionally under a live
/// progress bar. Documents finish out of order, so every line names its
/// document.
struct ConsoleReporter {
    /// Hidden when progress is disabled; `println` then goes straight to stdout.
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl ConsoleReporter {
    fn new(show_progress: bool) -> Arc<Self> {
        let bar = if show_progress {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:30.green/238}] {pos}/{len} documents  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Converting");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        } else {
            ProgressBar::hidden()
        };

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    fn line(&self, text: String) {
        if self.bar.is_hidden() {
            println!("{text}");
        } else {
            self.bar.println(text);
        }
    }
}

impl BatchProgressCallback for ConsoleReporter {
    fn on_batch_start(&self, total_jobs: usize) {
        self.bar.set_length(total_jobs as u64);
    }

    fn on_job_start(&self, job: &ConversionJob) {
        self.bar.set_message(job.label.clone());
    }

    fn on_job_complete(&self, job: &ConversionJob, report: &JobReport) {
        self.line(format!(
            "{} {}  {}",
            green("✓"),
            job.success_message(),
            dim(&format!(
                "{} bytes, {:.1}s",
                report.bytes_written,
                report.duration_ms as f64 / 1000.0
            )),
        ));
        self.bar.inc(1);
    }

    fn on_job_error(&self, _job: &ConversionJob, error: &JobError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        // Without a bar the WARN log already carries the error.
        if !self.bar.is_hidden() {
            self.bar.suspend(|| eprintln!("{} {}", red("✗"), red(&error.to_string())));
        }
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_jobs: usize, succeeded: usize) {
        self.bar.finish_and_clear();
        if self.bar.is_hidden() {
            return;
        }
        let failed = self.errors.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!(
                "{} {} documents converted",
                green("✔"),
                bold(&succeeded.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents converted  ({} failed)",
                red("✘"),
                bold(&succeeded.to_string()),
                total_jobs,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"DOCUMENTS (relative to the docs2pdf binary):
  documentation.md        →  AI_Model_Marketplace_Documentation.pdf
  user_guide.md           →  AI_Model_Marketplace_User_Guide.pdf
  guides/code_guide.md    →  AI_Model_Marketplace_Code_Guide.pdf
  TEXT_PROCESSING.md      →  AI_Model_Text_Processing_Guide.pdf
  changes.md              →  AI_Model_Changes_Documentation.pdf

EXAMPLES:
  # Convert everything with the defaults (A4 portrait, 20mm margins)
  docs2pdf

  # US Letter, larger text
  docs2pdf --paper letter --font-size 12

  # Machine-readable summary
  docs2pdf --json --no-progress > report.json

ENVIRONMENT VARIABLES:
  DOCS2PDF_BASE_DIR   Resolve the documents against this directory instead
                      of the directory containing the binary
  PDFIUM_LIB_PATH     Path to the PDFium shared library
  RUST_LOG            Override the log filter (e.g. docs2pdf=debug)
"#;

/// Convert the AI Model Marketplace Markdown documentation to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "docs2pdf",
    version,
    about = "Convert the AI Model Marketplace Markdown documentation to PDF",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Paper format.
    #[arg(long, env = "DOCS2PDF_PAPER", value_enum, default_value = "a4")]
    paper: PaperArg,

    /// Landscape orientation.
    #[arg(long, env = "DOCS2PDF_LANDSCAPE")]
    landscape: bool,

    /// Body font size in points (6–24).
    #[arg(long, env = "DOCS2PDF_FONT_SIZE", default_value_t = 11.0)]
    font_size: f32,

    /// Page margin in millimetres.
    #[arg(long, env = "DOCS2PDF_MARGIN_MM", default_value_t = 20.0)]
    margin_mm: f32,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "DOCS2PDF_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "DOCS2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCS2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCS2PDF_QUIET")]
    quiet: bool,
}

impl Cli {
    fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress && !self.json
    }

    /// Default log filter. INFO logs would duplicate the confirmation lines
    /// under the progress bar, so the bar keeps only errors.
    fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet || self.show_progress() {
            "error"
        } else {
            "info"
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PaperArg> for PaperSize {
    fn from(v: PaperArg) -> Self {
        match v {
            PaperArg::A3 => PaperSize::A3,
            PaperArg::A4 => PaperSize::A4,
            PaperArg::A5 => PaperSize::A5,
            PaperArg::Letter => PaperSize::Letter,
            PaperArg::Legal => PaperSize::Legal,
            PaperArg::Tabloid => PaperSize::Tabloid,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = cli.show_progress();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let reporter: Option<ProgressCallback> = if cli.quiet || cli.json {
        None
    } else {
        Some(ConsoleReporter::new(show_progress) as ProgressCallback)
    };

    let config = build_config(&cli, reporter)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = convert_documentation(&config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    }

    // Any failed document becomes a non-zero exit status.
    report.into_result().context("Conversion failed")?;
    Ok(())
}

/// Map CLI args to `RenderConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RenderConfig> {
    let orientation = if cli.landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };

    let mut builder = RenderConfig::builder()
        .paper(cli.paper.clone().into())
        .orientation(orientation)
        .font_size(cli.font_size)
        .margin_mm(cli.margin_mm);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docs2pdf").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn log_filter_follows_output_mode() {
        assert_eq!(parse(&[]).log_filter(), "error");
        assert_eq!(parse(&["--no-progress"]).log_filter(), "info");
        assert_eq!(parse(&["--json"]).log_filter(), "info");
        assert_eq!(parse(&["--quiet"]).log_filter(), "error");
        assert_eq!(parse(&["--verbose"]).log_filter(), "debug");
        assert_eq!(parse(&["--quiet", "--verbose"]).log_filter(), "debug");
    }

    #[test]
    fn nan_font_size_is_rejected() {
        let cli = parse(&["--font-size", "NaN"]);
        assert!(build_config(&cli, None).is_err());
    }

    #[test]
    fn hidden_reporter_counts_errors_without_a_bar() {
        let reporter = ConsoleReporter::new(false);
        let job = ConversionJob::new("a.md", "a.pdf", "A");
        let error = JobError::RenderFailed {
            label: "A".into(),
            detail: "boom".into(),
        };
        reporter.on_job_error(&job, &error);
        assert_eq!(reporter.errors.load(Ordering::SeqCst), 1);
        assert!(reporter.bar.is_hidden());
    }
}
