//! Pipeline stages for thumbnail generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the PDF rasterisation backend)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! source ──▶ corrupt ──▶ fit ──▶ layout ──▶ caller
//! (decode)   (detect)   (scale/  (composite
//!                        crop)    or uniform)
//!            placeholder ◀── any failure (opt-in wrapper)
//! ```
//!
//! 1. [`source`] — dispatch on file extension and decode an ordered page
//!    set; `pdf` and `raster` hold the per-format implementations
//! 2. [`corrupt`] — statistical alpha-channel check for rasteriser
//!    artefacts; logged, never fatal
//! 3. [`fit`] — scale one page to the target width and crop/pad it onto
//!    the canonical canvas
//! 4. `layout` — arrange fitted pages into the final thumbnail
//! 5. [`placeholder`] — classify a failure and render a labelled
//!    stand-in of the same canonical dimensions
//!
//! `glyph` is the shared fixed-cell bitmap face used by the badge and
//! placeholder label drawing.

pub mod corrupt;
pub mod fit;
pub(crate) mod glyph;
pub(crate) mod layout;
pub(crate) mod pdf;
pub mod placeholder;
pub(crate) mod raster;
pub mod source;
