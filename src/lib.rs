//! # docthumb
//!
//! Generate fixed-size raster thumbnails for PDF, TIFF, JPEG and PNG
//! documents, for use in file browsers and document lists.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Source   dispatch on extension, decode ordered page bitmaps
//!  │              (PDF via pdfium, TIFF/JPEG/PNG via the image crate)
//!  ├─ 2. Detect   statistical alpha-channel check for rasteriser
//!  │              corruption (logged, never fatal)
//!  ├─ 3. Fit      scale each page to the target width, crop from the
//!  │              top or pad below onto the canonical canvas
//!  ├─ 4. Layout   composite tiles side by side, or a single uniform
//!  │              page with a page-count badge
//!  └─ 5. Output   one RGBA buffer of deterministic dimensions
//! ```
//!
//! On any failure, [`generate_or_placeholder`] substitutes a labelled
//! placeholder of the same canonical dimensions, so grid-style callers
//! always have something to draw.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docthumb::{generate, thumbnail_path};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let thumb = generate("report.pdf", 64)?;
//!     thumb.save(thumbnail_path("report.pdf", 64))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Styles
//!
//! | Style | Canvas | Multi-page treatment |
//! |-------|--------|----------------------|
//! | [`Style::Composite`] (default) | `n·w × round(w·√2)` | up to 4 tiles side by side, "+" overflow tile |
//! | [`Style::Uniform`] | `w × round(w·1.42)` | first page only, page-count badge |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docthumb` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docthumb = { version = "0.3", default-features = false }
//! ```
//!
//! ## The pdfium dependency
//!
//! PDF rasterisation binds the pdfium shared library at runtime. Set
//! `PDFIUM_DYNAMIC_LIB_PATH` to point at an existing `libpdfium`, place
//! it next to the executable, or install it on the system search path.
//! The TIFF/JPEG/PNG paths have no native dependency.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Style, ThumbnailConfig, ThumbnailConfigBuilder};
pub use error::ThumbError;
pub use generate::{
    generate, generate_or_placeholder, generate_styled, generate_styled_to_file,
    generate_to_file, generate_with, thumbnail_path,
};
pub use pipeline::corrupt::{check_corruption, CorruptionResult};
pub use pipeline::fit::{page_height, uniform_height};
pub use pipeline::placeholder::{classify, render_placeholder, PlaceholderSpec};
pub use pipeline::source::{PageBitmap, PageSet};
