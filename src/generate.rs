//! Top-level thumbnail generation entry points.
//!
//! The pipeline is synchronous and owns nothing across calls: each call
//! extracts its own page set, composes its own canvas and hands the
//! finished buffer to the caller. The only blocking work is the decode
//! I/O inside the source adapter; callers needing bounded latency wrap
//! the whole call in their own timeout.
//!
//! [`generate_or_placeholder`] is the one recovery point in the crate:
//! it converts any failure into a labelled placeholder of the canonical
//! dimensions, for callers that must always render something. Everything
//! else propagates errors untouched.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::config::{Style, ThumbnailConfig};
use crate::error::ThumbError;
use crate::pipeline::{corrupt, layout, placeholder, source};

/// Generate a composite-style thumbnail for the document at `path`.
///
/// `width` is the per-tile width in pixels; the canvas is
/// `shown_pages × width` wide (plus one tile for the overflow indicator)
/// and `round(width·√2)` tall. Supported inputs: PDF, TIFF (first frame),
/// JPEG, PNG.
pub fn generate(path: impl AsRef<Path>, width: u32) -> Result<RgbaImage, ThumbError> {
    generate_styled(path, width, Style::Composite)
}

/// Generate a thumbnail for `path` in the given style.
pub fn generate_styled(
    path: impl AsRef<Path>,
    width: u32,
    style: Style,
) -> Result<RgbaImage, ThumbError> {
    let config = ThumbnailConfig::builder().width(width).style(style).build()?;
    generate_with(path, &config)
}

/// Generate a thumbnail with full control over the configuration.
pub fn generate_with(
    path: impl AsRef<Path>,
    config: &ThumbnailConfig,
) -> Result<RgbaImage, ThumbError> {
    let path = path.as_ref();
    let start = Instant::now();
    info!(
        "generating thumbnail for {} (width={}, style={:?})",
        path.display(),
        config.width,
        config.style
    );

    let pages = source::extract_pages(path, config)?;

    let thumbnail = match config.style {
        Style::Uniform => layout::uniform_page(pages.first(), pages.len(), config.width),
        Style::Composite => layout::composite_pages(&pages, config.width),
    };

    if config.detect_corruption {
        let check = corrupt::check_rgba(&thumbnail);
        if check.corrupt {
            warn!(
                "final thumbnail for {} looks corrupt: {} ({:.1}% of rows)",
                path.display(),
                check.reason,
                check.corrupt_row_fraction * 100.0
            );
        }
    }

    debug!(
        "thumbnail ready: {}x{} in {}ms",
        thumbnail.width(),
        thumbnail.height(),
        start.elapsed().as_millis()
    );
    Ok(thumbnail)
}

/// Generate a thumbnail, substituting a labelled placeholder on any
/// failure. Never returns an absent image: nonexistent files, unsupported
/// extensions and decode failures all yield a placeholder of the same
/// canonical dimensions a success would have had.
pub fn generate_or_placeholder(path: impl AsRef<Path>, width: u32, style: Style) -> RgbaImage {
    match generate_styled(&path, width, style) {
        Ok(thumbnail) => thumbnail,
        Err(error) => {
            warn!(
                "substituting placeholder for {}: {}",
                path.as_ref().display(),
                error
            );
            let spec = placeholder::classify(&error);
            placeholder::render_placeholder(&spec, width, style)
        }
    }
}

/// Generate a composite-style thumbnail and save it as PNG.
pub fn generate_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    width: u32,
) -> Result<(), ThumbError> {
    generate_styled_to_file(input, output, width, Style::Composite)
}

/// Generate a styled thumbnail and save it as PNG, creating parent
/// directories as needed.
pub fn generate_styled_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    width: u32,
    style: Style,
) -> Result<(), ThumbError> {
    let thumbnail = generate_styled(input, width, style)?;
    save_png(&thumbnail, output.as_ref())
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<(), ThumbError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ThumbError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| ThumbError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })
}

/// The conventional thumbnail path for a document: the original path with
/// its extension replaced by `tn_<width>.png`.
///
/// ```rust
/// use docthumb::thumbnail_path;
/// use std::path::PathBuf;
///
/// assert_eq!(thumbnail_path("doc.pdf", 64), PathBuf::from("doc.tn_64.png"));
/// ```
pub fn thumbnail_path(document_path: impl AsRef<Path>, width: u32) -> PathBuf {
    document_path
        .as_ref()
        .with_extension(format!("tn_{width}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_path_convention() {
        let cases = [
            ("doc.pdf", 64, "doc.tn_64.png"),
            ("/path/to/file.tiff", 128, "/path/to/file.tn_128.png"),
            ("image.jpg", 32, "image.tn_32.png"),
        ];
        for (input, width, expected) in cases {
            assert_eq!(thumbnail_path(input, width), PathBuf::from(expected));
        }
    }

    #[test]
    fn unsupported_extension_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();
        let err = generate(&path, 64).unwrap_err();
        assert!(matches!(err, ThumbError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_errors() {
        let err = generate("/definitely/not/here.png", 64).unwrap_err();
        assert!(matches!(err, ThumbError::FileNotFound { .. }));
    }

    #[test]
    fn placeholder_substitution_never_fails() {
        // Missing file → dark grey "File Not Found" at canonical size.
        let img = generate_or_placeholder("/gone/doc.pdf", 64, Style::Composite);
        assert_eq!(img.dimensions(), (64, 91));
        assert_eq!(*img.get_pixel(1, 1), image::Rgba([80, 80, 80, 255]));

        // Unsupported extension → grey "Unsupported Format".
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.zip");
        std::fs::write(&path, b"PK").unwrap();
        let img = generate_or_placeholder(&path, 64, Style::Uniform);
        assert_eq!(img.dimensions(), (64, 91));
        assert_eq!(*img.get_pixel(1, 1), image::Rgba([130, 130, 130, 255]));
    }
}
