//! Markdown-to-PDF rendering.
//!
//! The batch runner only knows the [`PdfRenderer`] trait: Markdown text in,
//! PDF bytes out. The production implementation is [`PdfiumRenderer`]:
//!
//! ```text
//! markdown ──▶ layout::parse_blocks ──▶ layout::layout ──▶ pdfium ──▶ bytes
//!              (comrak AST → blocks)    (wrap + paginate)  (text objects)
//! ```
//!
//! [`layout`] is pure and unit-tested on its own; [`pdfium`] only turns
//! positioned text into PDF page objects.

pub mod layout;
pub mod pdfium;

pub use self::pdfium::PdfiumRenderer;

use crate::config::RenderConfig;
use crate::error::RenderError;

/// Turns one Markdown document into a complete PDF file image.
///
/// Implementations are called from `tokio::task::spawn_blocking`, so they may
/// block freely, but must be `Send + Sync` because several jobs share one
/// renderer.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, markdown: &str, config: &RenderConfig) -> Result<Vec<u8>, RenderError>;
}
