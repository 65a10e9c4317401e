//! Statistical detection of rasteriser corruption in rendered pages.
//!
//! Some pdfium builds are observed to emit RGBA buffers where isolated
//! rows contain garbage bytes with alpha ≠ 255, even though legitimate
//! rendered document content is always fully opaque. Sampling the alpha
//! channel is a cheap proxy for "did the rasteriser corrupt this buffer"
//! without any ground truth to compare against.
//!
//! The check is a pure function of the pixel buffer and is reused
//! unmodified on the final composited thumbnail — corruption that
//! survives resize and crop is still corruption.

use image::{DynamicImage, GenericImageView, RgbaImage};
use serde::Serialize;

/// Fraction of non-opaque sampled pixels above which a row counts as
/// alpha-corrupt.
const ROW_ALPHA_THRESHOLD: f64 = 0.10;

/// Fraction of alpha-corrupt sampled rows above which the whole bitmap is
/// flagged.
const BITMAP_THRESHOLD: f64 = 0.05;

/// Cap on sampled rows; taller bitmaps are strided.
const MAX_SAMPLED_ROWS: u32 = 500;

/// Cap on sampled pixels per row; wider bitmaps are strided.
const MAX_SAMPLED_PIXELS: u32 = 100;

pub(crate) const REASON_ZERO_DIMENSIONS: &str = "zero dimensions";
pub(crate) const REASON_NON_OPAQUE_ROWS: &str =
    "non-opaque alpha rows indicating corrupt pixel buffer";

/// Verdict of a corruption check.
///
/// Both fractions are returned regardless of the verdict so callers can
/// log near-miss cases. In this alpha-only implementation the two are
/// identical; they are kept separate because they answer different
/// questions ("how much of the image is damaged" vs. "how much of the
/// image is non-opaque") and report consumers treat them as such.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorruptionResult {
    /// True if the bitmap appears corrupted.
    pub corrupt: bool,
    /// Human-readable reason when `corrupt` is true, empty otherwise.
    pub reason: &'static str,
    /// Fraction of sampled rows classified alpha-corrupt (0.0–1.0).
    pub corrupt_row_fraction: f64,
    /// Fraction of sampled rows containing non-opaque pixels (0.0–1.0).
    pub non_opaque_row_fraction: f64,
}

impl CorruptionResult {
    fn clean(corrupt_rows: f64) -> Self {
        Self {
            corrupt: false,
            reason: "",
            corrupt_row_fraction: corrupt_rows,
            non_opaque_row_fraction: corrupt_rows,
        }
    }

    fn corrupt(reason: &'static str, corrupt_rows: f64) -> Self {
        Self {
            corrupt: true,
            reason,
            corrupt_row_fraction: corrupt_rows,
            non_opaque_row_fraction: corrupt_rows,
        }
    }
}

/// Check any raster for rasteriser corruption.
///
/// Deterministic and side-effect-free. Packed 8-bit RGBA images take a
/// fast path over the raw buffer; any other colour model falls back to a
/// generic per-pixel accessor applying identical sampling and thresholds.
pub fn check_corruption(image: &DynamicImage) -> CorruptionResult {
    match image.as_rgba8() {
        Some(rgba) => check_rgba(rgba),
        None => check_generic(image),
    }
}

/// Fast path: sample the packed RGBA buffer row-wise.
pub(crate) fn check_rgba(bitmap: &RgbaImage) -> CorruptionResult {
    let (w, h) = bitmap.dimensions();
    if w == 0 || h == 0 {
        return CorruptionResult::corrupt(REASON_ZERO_DIMENSIONS, 0.0);
    }

    let row_step = sample_step(h, MAX_SAMPLED_ROWS);
    let x_step = sample_step(w, MAX_SAMPLED_PIXELS);
    let stride = w as usize * 4;
    let pix = bitmap.as_raw();

    let mut rows_sampled = 0u32;
    let mut corrupt_rows = 0u32;

    let mut y = 0usize;
    while y < h as usize {
        rows_sampled += 1;
        let row = &pix[y * stride..(y + 1) * stride];

        let mut non_opaque = 0u32;
        let mut sampled = 0u32;
        let mut x = 0usize;
        while x < w as usize {
            if row[x * 4 + 3] != 255 {
                non_opaque += 1;
            }
            sampled += 1;
            x += x_step;
        }

        if sampled > 0 && f64::from(non_opaque) / f64::from(sampled) > ROW_ALPHA_THRESHOLD {
            corrupt_rows += 1;
        }
        y += row_step;
    }

    verdict(corrupt_rows, rows_sampled)
}

/// Fallback for non-packed-RGBA layouts: identical sampling via the
/// colour-model-agnostic alpha query on [`GenericImageView`].
fn check_generic(image: &DynamicImage) -> CorruptionResult {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return CorruptionResult::corrupt(REASON_ZERO_DIMENSIONS, 0.0);
    }

    let row_step = sample_step(h, MAX_SAMPLED_ROWS) as u32;
    let x_step = sample_step(w, MAX_SAMPLED_PIXELS) as u32;

    let mut rows_sampled = 0u32;
    let mut corrupt_rows = 0u32;

    let mut y = 0u32;
    while y < h {
        rows_sampled += 1;

        let mut non_opaque = 0u32;
        let mut sampled = 0u32;
        let mut x = 0u32;
        while x < w {
            if image.get_pixel(x, y).0[3] != 255 {
                non_opaque += 1;
            }
            sampled += 1;
            x += x_step;
        }

        if sampled > 0 && f64::from(non_opaque) / f64::from(sampled) > ROW_ALPHA_THRESHOLD {
            corrupt_rows += 1;
        }
        y += row_step;
    }

    verdict(corrupt_rows, rows_sampled)
}

/// Stride that caps the number of samples along one axis at `max`.
fn sample_step(extent: u32, max: u32) -> usize {
    if extent > max {
        (extent / max) as usize
    } else {
        1
    }
}

fn verdict(corrupt_rows: u32, rows_sampled: u32) -> CorruptionResult {
    let frac = f64::from(corrupt_rows) / f64::from(rows_sampled);
    if frac > BITMAP_THRESHOLD {
        CorruptionResult::corrupt(REASON_NON_OPAQUE_ROWS, frac)
    } else {
        CorruptionResult::clean(frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{LumaA, Rgba};

    #[test]
    fn clean_opaque_image_passes() {
        let img = RgbaImage::from_pixel(100, 100, Rgba([50, 50, 50, 255]));
        let result = check_rgba(&img);
        assert!(!result.corrupt, "clean image flagged: {}", result.reason);
        assert_eq!(result.corrupt_row_fraction, 0.0);
    }

    #[test]
    fn garbage_alpha_rows_are_flagged() {
        // The observed pdfium failure mode: 20% of rows hold pixels with
        // random non-255 alpha.
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        for y in 0..20 {
            for x in 0..100 {
                img.put_pixel(x, y, Rgba([0x26, 0xa0, 0x3a, 0x07]));
            }
        }
        let result = check_rgba(&img);
        assert!(result.corrupt);
        assert_eq!(result.reason, REASON_NON_OPAQUE_ROWS);
        assert!(
            result.corrupt_row_fraction >= 0.10,
            "got {}",
            result.corrupt_row_fraction
        );
        assert_eq!(result.corrupt_row_fraction, result.non_opaque_row_fraction);
    }

    #[test]
    fn sparse_non_opaque_pixels_pass() {
        // One translucent pixel per row is below the 10% row threshold.
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        for y in 0..100 {
            img.put_pixel(50, y, Rgba([0, 0, 0, 128]));
        }
        let result = check_rgba(&img);
        assert!(!result.corrupt);
    }

    #[test]
    fn zero_dimensions_are_corrupt() {
        let result = check_rgba(&RgbaImage::new(0, 0));
        assert!(result.corrupt);
        assert_eq!(result.reason, REASON_ZERO_DIMENSIONS);
    }

    #[test]
    fn large_image_sampling_still_detects() {
        // 1000 rows → every 2nd row sampled; corruption spans rows evenly.
        let mut img = RgbaImage::from_pixel(400, 1000, Rgba([10, 10, 10, 255]));
        for y in (0..1000).step_by(4) {
            for x in 0..400 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 3]));
            }
        }
        let result = check_rgba(&img);
        assert!(result.corrupt);
    }

    #[test]
    fn generic_path_handles_rgb_without_alpha() {
        // RGB has no alpha channel; the accessor reports it fully opaque.
        let rgb = image::RgbImage::from_pixel(60, 60, image::Rgb([9, 9, 9]));
        let result = check_corruption(&DynamicImage::ImageRgb8(rgb));
        assert!(!result.corrupt);
    }

    #[test]
    fn generic_path_flags_translucent_luma() {
        let la = image::GrayAlphaImage::from_pixel(60, 60, LumaA([128, 10]));
        let result = check_corruption(&DynamicImage::ImageLumaA8(la));
        assert!(result.corrupt);
        assert_eq!(result.corrupt_row_fraction, 1.0);
    }

    #[test]
    fn fast_path_matches_generic_path() {
        let mut img = RgbaImage::from_pixel(120, 120, Rgba([0, 0, 0, 255]));
        for y in 0..30 {
            for x in 0..120 {
                img.put_pixel(x, y, Rgba([1, 2, 3, 9]));
            }
        }
        let fast = check_rgba(&img);
        let generic = check_generic(&DynamicImage::ImageRgba8(img));
        assert_eq!(fast, generic);
    }
}
