//! Error types for the docthumb library.
//!
//! One enum covers the whole pipeline. The taxonomy distinguishes failures
//! the user can correct (`UnsupportedFormat`), failures of the source
//! material (`DecodeFailure`, `NoPages`, `PasswordProtected`) and failures
//! of the rendering environment (`RendererUnavailable`, `RenderFailed`).
//! Nothing is retried; every failure surfaces to the immediate caller.
//!
//! The `Display` strings carry a compatibility constraint: the placeholder
//! renderer in [`crate::pipeline::placeholder`] classifies errors by
//! substring match over this text ("invalid password", "unsupported file
//! format", "not exist"). Changing the wording of those variants silently
//! changes which placeholder a caller sees.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docthumb library.
#[derive(Debug, Error)]
pub enum ThumbError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("input file does not exist: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file extension is not one of .pdf/.tif/.tiff/.jpg/.jpeg/.png.
    ///
    /// Carries the raw (lowercased) extension for diagnostics.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The source is malformed or unreadable. Not recoverable locally.
    #[error("failed to decode '{path}': {detail}")]
    DecodeFailure { path: PathBuf, detail: String },

    /// The document decoded cleanly but yielded zero pages.
    ///
    /// Distinct from [`ThumbError::DecodeFailure`]: the file is structurally
    /// valid, just empty. An empty page set is a terminal failure, never a
    /// zero-length success.
    #[error("document '{path}' contains no pages")]
    NoPages { path: PathBuf },

    /// The document is encrypted and the supplied password (or the lack of
    /// one) was rejected.
    #[error("cannot open '{path}': invalid password or password required")]
    PasswordProtected { path: PathBuf },

    // ── Render errors ─────────────────────────────────────────────────────
    /// A specific page failed during rasterisation.
    ///
    /// Aborts the whole document; a partial thumbnail is worse than none.
    #[error("rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to a pdfium library: {0}\n\
         Set PDFIUM_DYNAMIC_LIB_PATH=/path/to/libpdfium to use an existing copy."
    )]
    RendererUnavailable(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output thumbnail file.
    #[error("failed to write thumbnail '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // The placeholder classifier matches on these substrings; the tests pin
    // the wording so a rename shows up as a failure, not a silent grey box.

    #[test]
    fn file_not_found_mentions_not_exist() {
        let e = ThumbError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("not exist"), "got: {e}");
    }

    #[test]
    fn unsupported_format_wording() {
        let e = ThumbError::UnsupportedFormat {
            extension: "xyz".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("unsupported file format"), "got: {msg}");
        assert!(msg.contains("xyz"));
    }

    #[test]
    fn password_protected_mentions_invalid_password() {
        let e = ThumbError::PasswordProtected {
            path: PathBuf::from("locked.pdf"),
        };
        assert!(e.to_string().contains("invalid password"), "got: {e}");
    }

    #[test]
    fn render_failed_carries_page_number() {
        let e = ThumbError::RenderFailed {
            page: 3,
            detail: "bitmap allocation failed".into(),
        };
        assert!(e.to_string().contains("page 3"));
    }
}
