//! Page fitting: scale a decoded page onto the canonical thumbnail canvas.
//!
//! ## Why crop from the top and pad at the bottom?
//!
//! Documents are read top-down, so the top of a page is its most
//! informative region — a too-tall page keeps its top rows. A too-short
//! page sits flush at the top with light grey below; the grey is
//! deliberately not pure white so padding stays visually distinguishable
//! from page content. Both policies are part of the visual contract, not
//! incidental choices.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Fill colour for padded canvas rows and indicator-tile backgrounds.
pub(crate) const CANVAS_GREY: Rgba<u8> = Rgba([240, 240, 240, 255]);

/// Height of a composite-style page tile: the A4 / ISO 216 aspect ratio
/// (1 : √2).
pub fn page_height(width: u32) -> u32 {
    (f64::from(width) * std::f64::consts::SQRT_2).round() as u32
}

/// Height of a uniform-style thumbnail: `round(1.42 × width)`.
///
/// Deliberately a decimal approximation rather than √2 — the uniform mode
/// rounds differently from the composite tiles for some widths (e.g. 100),
/// and existing consumers depend on these exact dimensions.
pub fn uniform_height(width: u32) -> u32 {
    (f64::from(width) * 1.42).round() as u32
}

/// Fit a page onto a `width × page_height(width)` composite tile.
pub(crate) fn fit_page(page: &RgbaImage, width: u32) -> RgbaImage {
    fit_to_canvas(page, width, page_height(width))
}

/// Fit a page onto a fixed `width × canvas_height` canvas.
///
/// The source is scaled proportionally so its width equals `width`
/// (Lanczos3). A result taller than the canvas is cropped to the top
/// `canvas_height` rows; a shorter one is placed flush at the top with
/// [`CANVAS_GREY`] filling the rows below. Degenerate source dimensions
/// yield a blank grey canvas of the same fixed size; this function never
/// fails.
pub(crate) fn fit_to_canvas(page: &RgbaImage, width: u32, canvas_height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, canvas_height, CANVAS_GREY);

    let (src_w, src_h) = page.dimensions();
    if src_w == 0 || src_h == 0 {
        return canvas;
    }

    let scaled_h = (f64::from(src_h) * f64::from(width) / f64::from(src_w)).round() as u32;
    if scaled_h == 0 {
        return canvas;
    }

    let scaled = imageops::resize(page, width, scaled_h, FilterType::Lanczos3);

    if scaled_h >= canvas_height {
        // Keep the top rows.
        return imageops::crop_imm(&scaled, 0, 0, width, canvas_height).to_image();
    }

    imageops::replace(&mut canvas, &scaled, 0, 0);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn canonical_heights() {
        assert_eq!(page_height(50), 71);
        assert_eq!(page_height(64), 91);
        assert_eq!(uniform_height(64), 91);
        // The two constants genuinely diverge.
        assert_eq!(page_height(100), 141);
        assert_eq!(uniform_height(100), 142);
    }

    #[test]
    fn heights_are_monotonic() {
        for w in 1..500u32 {
            assert!(page_height(w + 1) >= page_height(w));
            assert!(uniform_height(w + 1) >= uniform_height(w));
        }
    }

    #[test]
    fn short_page_is_padded_below() {
        // 100×80 source at width 50 → 50×40 scaled image on a 50×71 canvas.
        let fitted = fit_page(&solid(100, 80, [200, 30, 30]), 50);
        assert_eq!(fitted.dimensions(), (50, 71));
        // Top region is page content.
        let top = fitted.get_pixel(25, 10);
        assert!(top.0[0] > 150 && top.0[2] < 80, "top not page content: {top:?}");
        // Bottom 31 rows are untouched canvas grey.
        for y in 41..71 {
            assert_eq!(*fitted.get_pixel(25, y), CANVAS_GREY, "row {y}");
        }
    }

    #[test]
    fn tall_page_keeps_top_rows() {
        // Top half white, bottom half black; the crop must keep the top.
        let mut page = solid(100, 400, [255, 255, 255]);
        for y in 200..400 {
            for x in 0..100 {
                page.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let fitted = fit_page(&page, 50);
        assert_eq!(fitted.dimensions(), (50, 71));
        let top = fitted.get_pixel(25, 2);
        assert!(top.0[0] > 200, "expected white top rows, got {top:?}");
    }

    #[test]
    fn canonical_aspect_source_needs_no_padding() {
        // 500×707 is already at the canonical ratio: scaling to width 50
        // gives round(707·50/500) = 71 = page_height(50), so no grey rows.
        let fitted = fit_page(&solid(500, 707, [40, 40, 200]), 50);
        assert_eq!(fitted.dimensions(), (50, 71));
        let bottom = fitted.get_pixel(25, 70);
        assert!(bottom.0[2] > 150, "bottom row padded, not content: {bottom:?}");
    }

    #[test]
    fn degenerate_source_yields_blank_canvas() {
        let fitted = fit_page(&RgbaImage::new(0, 0), 64);
        assert_eq!(fitted.dimensions(), (64, 91));
        assert_eq!(*fitted.get_pixel(32, 45), CANVAS_GREY);
    }
}
