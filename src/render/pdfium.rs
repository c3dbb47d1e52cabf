//! PDFium-backed [`PdfRenderer`].
//!
//! ## Why a process-wide lock?
//!
//! PDFium keeps global state and is not re-entrant. The batch runner renders
//! every job on its own blocking thread, so [`PdfiumRenderer::render`] takes
//! `ENGINE_LOCK` before binding the library. File reads and writes of other
//! jobs still overlap with rendering; only the PDF building is serialised.
//!
//! ## Library lookup
//!
//! First match wins:
//!
//! 1. the path given to [`PdfiumRenderer::with_library`]
//! 2. `PDFIUM_LIB_PATH`
//! 3. the platform library file next to the running executable
//! 4. the system library search path

use super::layout::{self, FontFace};
use super::PdfRenderer;
use crate::config::RenderConfig;
use crate::error::RenderError;
use once_cell::sync::Lazy;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Environment variable naming an existing PDFium shared library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

static ENGINE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Platform file name of the PDFium shared library.
#[cfg(target_os = "macos")]
const LIBRARY_NAME: &str = "libpdfium.dylib";
#[cfg(target_os = "windows")]
const LIBRARY_NAME: &str = "pdfium.dll";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const LIBRARY_NAME: &str = "libpdfium.so";

/// Renders Markdown with PDFium's standard Helvetica and Courier fonts.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    library_path: Option<PathBuf>,
}

impl PdfiumRenderer {
    /// Use the default library lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the PDFium library at `path` instead of searching for one.
    pub fn with_library(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    /// Whether a PDFium library can currently be bound.
    pub fn is_available(&self) -> bool {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        bind_pdfium(self.library_path.as_deref()).is_ok()
    }

    /// Extract the text of every page of a PDF, in page order.
    pub fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, RenderError> {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let pdfium = bind_pdfium(self.library_path.as_deref())?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(engine_error)?;

        document
            .pages()
            .iter()
            .map(|page| {
                let text = page.text().map_err(engine_error)?;
                Ok(text.all())
            })
            .collect()
    }
}

impl PdfRenderer for PdfiumRenderer {
    fn render(&self, markdown: &str, config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
        let pages = layout::layout(&layout::parse_blocks(markdown), config);
        let (width, height) = config.page_size_pt();

        let _guard = ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let pdfium = bind_pdfium(self.library_path.as_deref())?;
        let mut document = pdfium.create_new_pdf().map_err(engine_error)?;

        let regular = document.fonts_mut().helvetica();
        let bold = document.fonts_mut().helvetica_bold();
        let italic = document.fonts_mut().helvetica_oblique();
        let mono = document.fonts_mut().courier();

        for layout_page in &pages {
            let mut page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::from_points(
                    PdfPoints::new(width),
                    PdfPoints::new(height),
                ))
                .map_err(engine_error)?;

            for item in &layout_page.items {
                let font = match item.face {
                    FontFace::Regular => regular,
                    FontFace::Bold => bold,
                    FontFace::Italic => italic,
                    FontFace::Mono => mono,
                };
                page.objects_mut()
                    .create_text_object(
                        PdfPoints::new(item.x),
                        PdfPoints::new(item.y),
                        &item.text,
                        font,
                        PdfPoints::new(item.size),
                    )
                    .map_err(engine_error)?;
            }
        }

        debug!("Laid out {} PDF pages", pages.len());
        document.save_to_bytes().map_err(engine_error)
    }
}

fn engine_error(e: PdfiumError) -> RenderError {
    RenderError::Engine(format!("{e:?}"))
}

/// Candidate library files, most specific first. Only existing files are kept.
fn library_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(LIBRARY_NAME));
    }

    candidates.retain(|p| p.is_file());
    candidates
}

/// Bind PDFium following the lookup order in the module docs.
fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, RenderError> {
    let mut attempts = Vec::new();

    for candidate in library_candidates(explicit) {
        match Pdfium::bind_to_library(&candidate) {
            Ok(bindings) => {
                debug!("Bound PDFium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {e:?}", candidate.display())),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound system PDFium library");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {e:?}"));
            Err(RenderError::EngineUnavailable(attempts.join("; ")))
        }
    }
}
