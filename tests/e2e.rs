//! End-to-end tests for the PDFium renderer.
//!
//! These need a PDFium shared library at runtime. They are gated behind the
//! `E2E_ENABLED` environment variable so they do not run in CI unless
//! explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test e2e -- --nocapture

use docs2pdf::{
    convert_all, convert_documentation, default_jobs, ConversionJob, PaperSize, PdfRenderer, PdfiumRenderer,
    RenderConfig, BASE_DIR_ENV, DOCUMENTATION_JOBS,
};
use std::sync::Arc;

/// Skip this test unless E2E_ENABLED is set *and* PDFium can be bound.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let renderer = PdfiumRenderer::new();
        if !renderer.is_available() {
            println!("SKIP: PDFium library not found; set PDFIUM_LIB_PATH");
            return;
        }
        renderer
    }};
}

const SAMPLE: &str = r#"# AI Model Marketplace

A marketplace for **machine learning models**.

## Features

- Upload models
- Browse and *purchase* models
  - nested item
1. first
2. second

```python
def predict(x):
    return model(x)
```

> Note: prices are listed in tokens.

| Model | Price |
|-------|-------|
| GPT   | 10    |

---

Final paragraph.
"#;

fn assert_pdf(bytes: &[u8], context: &str) {
    assert!(bytes.len() > 100, "[{context}] PDF suspiciously small: {} bytes", bytes.len());
    assert!(bytes.starts_with(b"%PDF-"), "[{context}] missing %PDF header");
    let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(64)..]);
    assert!(tail.contains("%%EOF"), "[{context}] missing EOF trailer");
    println!("[{context}] ✓  {} bytes", bytes.len());
}

#[test]
fn test_render_sample_document() {
    let renderer = e2e_skip_unless_ready!();
    let bytes = renderer
        .render(SAMPLE, &RenderConfig::default())
        .expect("render should succeed");
    assert_pdf(&bytes, "sample");
}

#[test]
fn test_render_empty_document() {
    let renderer = e2e_skip_unless_ready!();
    let bytes = renderer
        .render("", &RenderConfig::default())
        .expect("empty Markdown still yields a one-page PDF");
    assert_pdf(&bytes, "empty");
}

#[test]
fn test_long_document_grows_with_pages() {
    let renderer = e2e_skip_unless_ready!();
    let short = renderer.render("Hello.", &RenderConfig::default()).unwrap();
    let long_md = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n\n".repeat(300);
    let long = renderer.render(&long_md, &RenderConfig::default()).unwrap();
    assert_pdf(&long, "long");
    assert!(long.len() > short.len());
}

#[test]
fn test_same_markdown_renders_equivalent_pdfs() {
    let renderer = e2e_skip_unless_ready!();
    let config = RenderConfig::default();
    let first = renderer.render(SAMPLE, &config).unwrap();
    let second = renderer.render(SAMPLE, &config).unwrap();

    // The file ID changes on every save, so compare what the pages say.
    let first_pages = renderer.page_texts(&first).unwrap();
    let second_pages = renderer.page_texts(&second).unwrap();
    assert_eq!(first_pages.len(), second_pages.len());
    assert_eq!(first_pages, second_pages);
    assert!(first_pages[0].contains("AI Model Marketplace"), "got: {:?}", first_pages[0]);
}

#[test]
fn test_explicit_library_path_renders() {
    let _ready = e2e_skip_unless_ready!();
    let Ok(path) = std::env::var("PDFIUM_LIB_PATH") else {
        println!("SKIP: PDFIUM_LIB_PATH not set");
        return;
    };
    let renderer = PdfiumRenderer::with_library(path);
    let bytes = renderer.render(SAMPLE, &RenderConfig::default()).unwrap();
    assert_pdf(&bytes, "explicit-library");
}

#[test]
fn test_letter_landscape_renders() {
    let renderer = e2e_skip_unless_ready!();
    let config = RenderConfig::builder()
        .paper(PaperSize::Letter)
        .orientation(docs2pdf::Orientation::Landscape)
        .build()
        .unwrap();
    let bytes = renderer.render(SAMPLE, &config).unwrap();
    assert_pdf(&bytes, "letter-landscape");
}

#[tokio::test]
async fn test_full_documentation_batch_with_pdfium() {
    let renderer = e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    for (source, _, label) in DOCUMENTATION_JOBS {
        let path = dir.path().join(source);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("# {label}\n\n{SAMPLE}")).unwrap();
    }

    let jobs: Vec<ConversionJob> = default_jobs(dir.path());
    let report = convert_all(jobs, Arc::new(renderer), &RenderConfig::default()).await;

    assert_eq!(report.stats.succeeded, 5, "{:?}", report.errors().collect::<Vec<_>>());
    for (_, destination, _) in DOCUMENTATION_JOBS {
        let bytes = std::fs::read(dir.path().join(destination)).unwrap();
        assert_pdf(&bytes, destination);
    }
}

#[tokio::test]
async fn test_convert_documentation_honours_base_dir_override() {
    let _renderer = e2e_skip_unless_ready!();
    let dir = tempfile::tempdir().unwrap();
    for (source, _, label) in DOCUMENTATION_JOBS {
        let path = dir.path().join(source);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("# {label}\n")).unwrap();
    }

    // Only this test reads the variable.
    std::env::set_var(BASE_DIR_ENV, dir.path());
    let report = convert_documentation(&RenderConfig::default()).await.unwrap();
    std::env::remove_var(BASE_DIR_ENV);

    assert!(report.into_result().is_ok());
    for (_, destination, _) in DOCUMENTATION_JOBS {
        assert_pdf(&std::fs::read(dir.path().join(destination)).unwrap(), destination);
    }
}
