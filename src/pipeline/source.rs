//! Page extraction: normalise per-format decoding into one contract.
//!
//! Every supported format answers the same question — "give me the
//! ordered page bitmaps for this path" — through the [`PageSource`]
//! capability trait, with one implementation per format family:
//! pdfium-backed PDF rendering ([`super::pdf`]) and `image`-crate
//! decoding for TIFF and single-frame images ([`super::raster`]).
//! Dispatch is a lookup keyed on the lowercased file extension rather
//! than anything content-sniffed; an unknown extension fails before any
//! I/O beyond the existence check.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::corrupt;
use super::pdf::PdfSource;
use super::raster::{StillImageSource, TiffSource};
use crate::config::ThumbnailConfig;
use crate::error::ThumbError;

/// A decoded page raster: packed 8-bit RGBA, row-major, stride = width×4.
///
/// The buffer invariants (length == stride × height) are structural
/// guarantees of the `image` crate's buffer type. Pipeline stages never
/// mutate a page in place once it has been handed on; fitting and
/// compositing always allocate fresh buffers.
pub type PageBitmap = RgbaImage;

/// An ordered, non-empty sequence of decoded pages in document order.
///
/// Non-emptiness holds by construction: [`PageSet::new`] rejects an empty
/// vector with [`ThumbError::NoPages`], so an empty extraction is a
/// failure, never a valid empty set.
#[derive(Debug)]
pub struct PageSet {
    pages: Vec<PageBitmap>,
}

impl PageSet {
    pub(crate) fn new(pages: Vec<PageBitmap>, path: &Path) -> Result<Self, ThumbError> {
        if pages.is_empty() {
            return Err(ThumbError::NoPages {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { pages })
    }

    /// Number of pages; always ≥ 1.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The first page. Infallible by the non-emptiness invariant.
    pub fn first(&self) -> &PageBitmap {
        &self.pages[0]
    }

    /// All pages in document order.
    pub fn pages(&self) -> &[PageBitmap] {
        &self.pages
    }
}

/// One format family's page extraction.
pub trait PageSource: Sync {
    /// Decode the ordered page bitmaps for `path`.
    fn extract(&self, path: &Path, config: &ThumbnailConfig) -> Result<PageSet, ThumbError>;
}

static SOURCES: Lazy<HashMap<&'static str, &'static dyn PageSource>> = Lazy::new(|| {
    static PDF: PdfSource = PdfSource;
    static TIFF: TiffSource = TiffSource;
    static STILL: StillImageSource = StillImageSource;

    let mut table: HashMap<&'static str, &'static dyn PageSource> = HashMap::new();
    table.insert("pdf", &PDF);
    table.insert("tif", &TIFF);
    table.insert("tiff", &TIFF);
    table.insert("jpg", &STILL);
    table.insert("jpeg", &STILL);
    table.insert("png", &STILL);
    table
});

/// Lowercased extension of `path`, empty when there is none.
fn normalized_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Extract the ordered page set for `path`, dispatching on extension.
///
/// When `config.detect_corruption` is set, every extracted page is run
/// through the corruption detector; corrupt pages are logged and kept —
/// a logged warning beats a missing thumbnail.
pub(crate) fn extract_pages(
    path: &Path,
    config: &ThumbnailConfig,
) -> Result<PageSet, ThumbError> {
    if !path.exists() {
        return Err(ThumbError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = normalized_extension(path);
    let source = SOURCES
        .get(extension.as_str())
        .copied()
        .ok_or(ThumbError::UnsupportedFormat { extension })?;

    let pages = source.extract(path, config)?;
    debug!("extracted {} page(s) from {}", pages.len(), path.display());

    if config.detect_corruption {
        for (index, page) in pages.pages().iter().enumerate() {
            let check = corrupt::check_rgba(page);
            if check.corrupt {
                warn!(
                    "page {} of {} looks corrupt: {} ({:.1}% of rows)",
                    index + 1,
                    path.display(),
                    check.reason,
                    check.corrupt_row_fraction * 100.0
                );
            } else if check.non_opaque_row_fraction > 0.0 {
                debug!(
                    "page {} of {}: {:.1}% non-opaque rows (below threshold)",
                    index + 1,
                    path.display(),
                    check.non_opaque_row_fraction * 100.0
                );
            }
        }
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn page_set_rejects_empty() {
        let err = PageSet::new(Vec::new(), Path::new("empty.pdf")).unwrap_err();
        assert!(matches!(err, ThumbError::NoPages { .. }));
    }

    #[test]
    fn page_set_preserves_order() {
        let pages = vec![
            RgbaImage::from_pixel(2, 2, Rgba([1, 0, 0, 255])),
            RgbaImage::from_pixel(2, 2, Rgba([2, 0, 0, 255])),
        ];
        let set = PageSet::new(pages, Path::new("two.pdf")).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.first().get_pixel(0, 0).0[0], 1);
        assert_eq!(set.pages()[1].get_pixel(0, 0).0[0], 2);
    }

    #[test]
    fn dispatch_table_covers_supported_extensions() {
        for ext in ["pdf", "tif", "tiff", "jpg", "jpeg", "png"] {
            assert!(SOURCES.contains_key(ext), "missing {ext}");
        }
        assert!(!SOURCES.contains_key("bmp"));
        assert!(!SOURCES.contains_key("gif"));
    }

    #[test]
    fn extension_normalisation() {
        assert_eq!(normalized_extension(Path::new("A.PDF")), "pdf");
        assert_eq!(normalized_extension(Path::new("scan.Tiff")), "tiff");
        assert_eq!(normalized_extension(Path::new("noext")), "");
    }

    #[test]
    fn missing_file_is_reported_before_dispatch() {
        let config = ThumbnailConfig::default();
        let err = extract_pages(Path::new("/nonexistent/x.xyz"), &config).unwrap_err();
        assert!(matches!(err, ThumbError::FileNotFound { .. }));
    }

    #[test]
    fn unknown_extension_carries_raw_string() {
        let config = ThumbnailConfig::default();
        // The file must exist for dispatch to be reached.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.docx");
        std::fs::write(&path, b"not an image").unwrap();
        let err = extract_pages(&path, &config).unwrap_err();
        match err {
            ThumbError::UnsupportedFormat { extension } => assert_eq!(extension, "docx"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
