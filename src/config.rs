//! Configuration types for Markdown-to-PDF rendering.
//!
//! Every rendering knob lives in [`RenderConfig`], built via its
//! [`RenderConfigBuilder`]. The same config is shared by all jobs of a batch,
//! so the five documents come out with identical page geometry.
//!
//! Defaults mirror the classic markdown-pdf output: portrait A4 with a 2cm
//! border on every side.

use crate::error::Docs2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One millimetre in PDF points.
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Configuration for rendering Markdown documents to PDF.
///
/// Built via [`RenderConfig::builder()`] or using [`RenderConfig::default()`].
///
/// # Example
/// ```rust
/// use docs2pdf::{PaperSize, RenderConfig};
///
/// let config = RenderConfig::builder()
///     .paper(PaperSize::Letter)
///     .font_size(12.0)
///     .margin_mm(25.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RenderConfig {
    /// Paper format. Default: [`PaperSize::A4`].
    pub paper: PaperSize,

    /// Page orientation. Default: [`Orientation::Portrait`].
    pub orientation: Orientation,

    /// Margin on every side, in points. Default: 2cm (≈56.7pt).
    pub margin_pt: f32,

    /// Body text size in points. Range: 6–24. Default: 11.
    ///
    /// Headings and code are scaled from this value.
    pub font_size: f32,

    /// Line height as a multiple of the font size. Range: 1.0–3.0. Default: 1.4.
    pub line_spacing: f32,

    /// Optional progress callback receiving per-job events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::default(),
            orientation: Orientation::default(),
            margin_pt: 20.0 * POINTS_PER_MM,
            font_size: 11.0,
            line_spacing: 1.4,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("paper", &self.paper)
            .field("orientation", &self.orientation)
            .field("margin_pt", &self.margin_pt)
            .field("font_size", &self.font_size)
            .field("line_spacing", &self.line_spacing)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }

    /// Page width and height in points, after applying the orientation.
    pub fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = self.paper.dimensions_pt();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Width available to text between the left and right margins.
    pub fn text_width_pt(&self) -> f32 {
        self.page_size_pt().0 - 2.0 * self.margin_pt
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn paper(mut self, paper: PaperSize) -> Self {
        self.config.paper = paper;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn margin_pt(mut self, pt: f32) -> Self {
        self.config.margin_pt = pt.max(0.0);
        self
    }

    pub fn margin_mm(self, mm: f32) -> Self {
        self.margin_pt(mm * POINTS_PER_MM)
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.font_size = pt.clamp(6.0, 24.0);
        self
    }

    pub fn line_spacing(mut self, factor: f32) -> Self {
        self.config.line_spacing = factor.clamp(1.0, 3.0);
        self
    }

    /// Attach a progress callback to receive per-job events.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating that the page keeps a printable area.
    pub fn build(self) -> Result<RenderConfig, Docs2PdfError> {
        let c = &self.config;
        for (name, value) in [
            ("font_size", c.font_size),
            ("line_spacing", c.line_spacing),
            ("margin", c.margin_pt),
        ] {
            if !value.is_finite() {
                return Err(Docs2PdfError::InvalidConfig(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
        let (w, h) = c.page_size_pt();
        // At least a few characters per line and a few lines per page.
        let min_extent = c.font_size * 4.0;
        if w - 2.0 * c.margin_pt < min_extent || h - 2.0 * c.margin_pt < min_extent {
            return Err(Docs2PdfError::InvalidConfig(format!(
                "margin of {:.1}pt leaves no printable area on a {:.0}×{:.0}pt page",
                c.margin_pt, w, h
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Paper formats supported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A3,
    /// 210 × 297 mm (default).
    #[default]
    A4,
    A5,
    /// 8.5 × 11 in.
    Letter,
    /// 8.5 × 14 in.
    Legal,
    /// 11 × 17 in.
    Tabloid,
}

impl PaperSize {
    /// Portrait width and height in points.
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0 * POINTS_PER_MM, 420.0 * POINTS_PER_MM),
            PaperSize::A4 => (210.0 * POINTS_PER_MM, 297.0 * POINTS_PER_MM),
            PaperSize::A5 => (148.0 * POINTS_PER_MM, 210.0 * POINTS_PER_MM),
            PaperSize::Letter => (612.0, 792.0),
            PaperSize::Legal => (612.0, 1008.0),
            PaperSize::Tabloid => (792.0, 1224.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a4_portrait_with_2cm_margins() {
        let c = RenderConfig::default();
        assert_eq!(c.paper, PaperSize::A4);
        assert_eq!(c.orientation, Orientation::Portrait);
        assert!((c.margin_pt - 56.69).abs() < 0.01, "got {}", c.margin_pt);
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let c = RenderConfig::builder()
            .paper(PaperSize::Letter)
            .orientation(Orientation::Landscape)
            .build()
            .unwrap();
        assert_eq!(c.page_size_pt(), (792.0, 612.0));
    }

    #[test]
    fn builder_clamps_font_size() {
        let c = RenderConfig::builder().font_size(200.0).build().unwrap();
        assert_eq!(c.font_size, 24.0);
        let c = RenderConfig::builder().font_size(1.0).build().unwrap();
        assert_eq!(c.font_size, 6.0);
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let err = RenderConfig::builder().margin_mm(120.0).build().unwrap_err();
        assert!(matches!(err, Docs2PdfError::InvalidConfig(_)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let builders = [
            RenderConfig::builder().font_size(f32::NAN),
            RenderConfig::builder().line_spacing(f32::NAN),
            RenderConfig::builder().margin_pt(f32::INFINITY),
        ];
        for builder in builders {
            let err = builder.build().unwrap_err();
            assert!(matches!(err, Docs2PdfError::InvalidConfig(_)), "got {err:?}");
        }
    }

    #[test]
    fn text_width_excludes_margins() {
        let c = RenderConfig::builder()
            .paper(PaperSize::Letter)
            .margin_pt(72.0)
            .build()
            .unwrap();
        assert_eq!(c.text_width_pt(), 612.0 - 144.0);
    }

    #[test]
    fn debug_hides_callback() {
        let dbg = format!("{:?}", RenderConfig::default());
        assert!(dbg.contains("RenderConfig"));
        assert!(dbg.contains("progress_callback: None"));
    }
}
