//! TIFF and single-frame image decoding via the `image` crate.
//!
//! JPEG and PNG are inherently single-frame: each decodes to a page set
//! of length 1. TIFF is nominally multi-page, but the decoder reads the
//! first IFD only, so multi-page TIFFs degrade to their first frame.
//! This is an accepted, documented limitation carried over deliberately —
//! substituting a full multi-frame decoder would silently change
//! thumbnail layouts for existing documents.

use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::debug;

use super::source::{PageSet, PageSource};
use crate::config::ThumbnailConfig;
use crate::error::ThumbError;

/// JPEG/PNG: one decoded frame, one page.
pub(crate) struct StillImageSource;

impl PageSource for StillImageSource {
    fn extract(&self, path: &Path, _config: &ThumbnailConfig) -> Result<PageSet, ThumbError> {
        let image = decode(path)?;
        debug!(
            "decoded still image {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        PageSet::new(vec![image.into_rgba8()], path)
    }
}

/// TIFF: first frame only (first IFD).
pub(crate) struct TiffSource;

impl PageSource for TiffSource {
    fn extract(&self, path: &Path, _config: &ThumbnailConfig) -> Result<PageSet, ThumbError> {
        let image = decode(path)?;
        debug!(
            "decoded TIFF {} first frame ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        PageSet::new(vec![image.into_rgba8()], path)
    }
}

/// Open and decode one frame, mapping I/O and decode failures onto the
/// crate's error taxonomy.
fn decode(path: &Path) -> Result<DynamicImage, ThumbError> {
    let reader = ImageReader::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ThumbError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ThumbError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ThumbError::DecodeFailure {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    })?;

    reader.decode().map_err(|e| ThumbError::DecodeFailure {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba([10, 200, 10, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn png_decodes_to_single_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "green.png", 30, 20);
        let set = StillImageSource
            .extract(&path, &ThumbnailConfig::default())
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.first().dimensions(), (30, 20));
    }

    #[test]
    fn garbage_bytes_are_a_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n but then garbage").unwrap();
        let err = StillImageSource
            .extract(&path, &ThumbnailConfig::default())
            .unwrap_err();
        assert!(matches!(err, ThumbError::DecodeFailure { .. }));
    }
}
