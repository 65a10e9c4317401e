//! PDF page rasterisation via pdfium.
//!
//! ## Resource lifetime
//!
//! Document, page and bitmap handles are RAII guards over pdfium-owned
//! state; each is released on drop, so every exit path — success, a
//! failed page, a bad password — returns the handles before this module
//! returns. The rendered pixel buffer lives in memory pdfium may reclaim
//! once its bitmap handle goes away, so each page is defensively copied
//! into a crate-owned [`PageBitmap`] *before* the handle drops.
//!
//! ## Library discovery
//!
//! pdfium ships as a separate shared library. Discovery order:
//! `PDFIUM_DYNAMIC_LIB_PATH` (explicit path to the library file), then
//! next to the running executable, then the system search paths.

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::debug;

use super::source::{PageBitmap, PageSet, PageSource};
use crate::config::ThumbnailConfig;
use crate::error::ThumbError;

pub(crate) struct PdfSource;

impl PageSource for PdfSource {
    fn extract(&self, path: &Path, config: &ThumbnailConfig) -> Result<PageSet, ThumbError> {
        render_pdf_pages(path, config)
    }
}

/// Bind to a pdfium library, trying the explicit env override first.
fn bind_pdfium() -> Result<Pdfium, ThumbError> {
    if let Ok(lib_path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        debug!("binding pdfium from PDFIUM_DYNAMIC_LIB_PATH={lib_path}");
        let bindings = Pdfium::bind_to_library(&lib_path)
            .map_err(|e| ThumbError::RendererUnavailable(format!("{lib_path}: {e:?}")))?;
        return Ok(Pdfium::new(bindings));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            let candidate = Pdfium::pdfium_platform_library_name_at_path(
                exe_dir.to_string_lossy().as_ref(),
            );
            if Path::new(&candidate).exists() {
                if let Ok(bindings) = Pdfium::bind_to_library(&candidate) {
                    return Ok(Pdfium::new(bindings));
                }
            }
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| ThumbError::RendererUnavailable(format!("{e:?}")))
}

/// Render every page of the document at the configured DPI.
///
/// A failed page aborts the whole document: a thumbnail silently missing
/// pages is worse than a placeholder.
fn render_pdf_pages(path: &Path, config: &ThumbnailConfig) -> Result<PageSet, ThumbError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(path, config.password.as_deref())
        .map_err(|e| map_open_error(path, e))?;

    let pages = document.pages();
    let page_count = pages.len();
    debug!("PDF {} loaded: {} pages", path.display(), page_count);

    let mut bitmaps: Vec<PageBitmap> = Vec::with_capacity(page_count as usize);

    for index in 0..page_count {
        let page_num = index as usize + 1;
        let page = pages.get(index).map_err(|e| ThumbError::RenderFailed {
            page: page_num,
            detail: format!("{e:?}"),
        })?;

        let (px_w, px_h) = render_size(
            page.width().value,
            page.height().value,
            config.dpi,
            config.max_rendered_pixels,
        );
        let render_config = PdfRenderConfig::new()
            .set_target_width(px_w)
            .set_target_height(px_h);

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ThumbError::RenderFailed {
                    page: page_num,
                    detail: format!("{e:?}"),
                })?;

        // Defensive copy into a crate-owned buffer; the pdfium bitmap
        // handle (and its backing memory) is released right after.
        let page_image = bitmap.as_image().into_rgba8();
        debug!(
            "rendered page {page_num} → {}x{} px",
            page_image.width(),
            page_image.height()
        );
        bitmaps.push(page_image);
    }

    PageSet::new(bitmaps, path)
}

/// Target pixel dimensions for one page: the page's point size at `dpi`,
/// with the longest edge clamped to `max_pixels` preserving aspect ratio.
fn render_size(points_w: f32, points_h: f32, dpi: u32, max_pixels: u32) -> (i32, i32) {
    let scale = dpi as f32 / 72.0;
    let mut w = (points_w * scale).max(1.0);
    let mut h = (points_h * scale).max(1.0);

    let longest = w.max(h);
    if longest > max_pixels as f32 {
        let shrink = max_pixels as f32 / longest;
        w *= shrink;
        h *= shrink;
    }

    (w.round().max(1.0) as i32, h.round().max(1.0) as i32)
}

/// Map a document-open failure onto the error taxonomy.
///
/// pdfium does not expose a stable error code for password failures
/// through this binding, so the debug representation is inspected — the
/// same heuristic downstream consumers apply to our own error text.
fn map_open_error(path: &Path, error: PdfiumError) -> ThumbError {
    let detail = format!("{error:?}");
    if is_password_error(&detail) {
        ThumbError::PasswordProtected {
            path: path.to_path_buf(),
        }
    } else {
        ThumbError::DecodeFailure {
            path: path.to_path_buf(),
            detail,
        }
    }
}

fn is_password_error(detail: &str) -> bool {
    detail.contains("Password") || detail.contains("password")
}
