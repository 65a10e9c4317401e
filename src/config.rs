//! Configuration types for thumbnail generation.
//!
//! All generation behaviour is controlled through [`ThumbnailConfig`], built
//! via its [`ThumbnailConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across a batch run, log it, and diff two runs
//! to understand why their outputs differ.
//!
//! Setters clamp rather than error where a sensible floor exists; `build()`
//! validates the rest.

use crate::error::ThumbError;
use serde::{Deserialize, Serialize};

/// Thumbnail rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Style {
    /// Multi-page documents as side-by-side page tiles with a "+" indicator
    /// for documents with more than 4 pages. (default)
    #[default]
    Composite,
    /// A fixed `width × round(1.42·width)` thumbnail showing the first page
    /// only, with a page-count badge for multi-page documents.
    Uniform,
}

/// Configuration for a thumbnail generation call.
///
/// Built via [`ThumbnailConfig::builder()`] or using
/// [`ThumbnailConfig::default()`].
///
/// # Example
/// ```rust
/// use docthumb::{Style, ThumbnailConfig};
///
/// let config = ThumbnailConfig::builder()
///     .width(128)
///     .style(Style::Uniform)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    /// Target thumbnail width in pixels. Default: 64.
    ///
    /// Every output dimension is a pure function of this value and the
    /// selected style: tiles are `width × round(width·√2)` in Composite
    /// style, the whole canvas is `width × round(width·1.42)` in Uniform
    /// style.
    pub width: u32,

    /// Rendering mode. Default: [`Style::Composite`].
    pub style: Style,

    /// Rendering DPI used when rasterising each PDF page. Range: 72–400.
    /// Default: 150.
    ///
    /// 150 DPI keeps small text legible after the downscale to thumbnail
    /// width without rendering absurdly large intermediates. Only the PDF
    /// path uses this; TIFF/JPEG/PNG pages arrive at their stored size.
    pub dpi: u32,

    /// Maximum rendered page dimension (width or height) in pixels.
    /// Default: 2000.
    ///
    /// A safety cap independent of DPI. A 150-DPI render of an A0 poster
    /// would produce a 12 000 × 17 000 px intermediate and exhaust memory
    /// for a 64 px thumbnail. The longest edge is clamped to this value,
    /// scaling the other proportionally.
    pub max_rendered_pixels: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Run the statistical corruption detector on extracted pages and on
    /// the final thumbnail, logging corrupt buffers. Default: true.
    ///
    /// Detection never fails the pipeline; it exists because some pdfium
    /// builds emit RGBA buffers with garbage alpha bytes, and a logged
    /// warning is the only signal short of eyeballing every thumbnail.
    pub detect_corruption: bool,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 64,
            style: Style::Composite,
            dpi: 150,
            max_rendered_pixels: 2000,
            password: None,
            detect_corruption: true,
        }
    }
}

impl ThumbnailConfig {
    /// Create a new builder for `ThumbnailConfig`.
    pub fn builder() -> ThumbnailConfigBuilder {
        ThumbnailConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ThumbnailConfig`].
#[derive(Debug)]
pub struct ThumbnailConfigBuilder {
    config: ThumbnailConfig,
}

impl ThumbnailConfigBuilder {
    pub fn width(mut self, width: u32) -> Self {
        self.config.width = width.max(1);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.config.style = style;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn detect_corruption(mut self, v: bool) -> Self {
        self.config.detect_corruption = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ThumbnailConfig, ThumbError> {
        let c = &self.config;
        if c.width == 0 {
            return Err(ThumbError::InvalidConfig("width must be ≥ 1".into()));
        }
        if c.dpi < 72 || c.dpi > 400 {
            return Err(ThumbError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        Ok(self.config)
    }
}
