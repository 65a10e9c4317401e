//! Layout composition: arrange fitted pages into the final thumbnail.
//!
//! Two mutually exclusive algorithms, selected by [`crate::Style`]:
//!
//! * **Composite** — up to 4 pages side by side as fixed-geometry tiles,
//!   with a "+" overflow tile for longer documents. Canvas width grows
//!   with the shown page count; height is always `page_height(width)`.
//! * **Uniform** — the first page only, on a canvas whose size is
//!   independent of the page count, with a page-count badge in the
//!   bottom-right corner for multi-page documents.
//!
//! Neither algorithm can fail for a non-empty page set; emptiness is
//! rejected upstream by the source adapter.

use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::fit::{self, page_height, uniform_height, CANVAS_GREY};
use super::glyph;
use super::source::PageSet;

/// Most pages ever shown in a composite thumbnail.
const MAX_COMPOSITE_PAGES: usize = 4;

const PLUS_GREY: Rgba<u8> = Rgba([100, 100, 100, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Badge geometry, in pixels.
const BADGE_PADDING: u32 = 3;
const BADGE_MARGIN: u32 = 2;

/// Compose a composite-style thumbnail: up to 4 fitted page tiles side by
/// side, plus a `width`-wide "+" indicator tile when the document has
/// more pages than are shown.
pub(crate) fn composite_pages(pages: &PageSet, width: u32) -> RgbaImage {
    let shown = pages.len().min(MAX_COMPOSITE_PAGES);
    let overflow = pages.len() > MAX_COMPOSITE_PAGES;

    let height = page_height(width);
    let tiles = shown as u32 + u32::from(overflow);
    let mut canvas = RgbaImage::from_pixel(tiles * width, height, WHITE);

    for (i, page) in pages.pages().iter().take(shown).enumerate() {
        let tile = fit::fit_page(page, width);
        imageops::replace(&mut canvas, &tile, i as i64 * i64::from(width), 0);
    }

    if overflow {
        draw_plus_indicator(&mut canvas, shown as u32 * width, width, height);
    }

    canvas
}

/// Draw the overflow tile: a light grey region with a centred "+" built
/// from two overlapping bars, each spanning the middle half of the tile,
/// with thickness `max(2, tile/8)`.
fn draw_plus_indicator(canvas: &mut RgbaImage, x0: u32, tile_w: u32, tile_h: u32) {
    draw_filled_rect_mut(
        canvas,
        Rect::at(x0 as i32, 0).of_size(tile_w, tile_h),
        CANVAS_GREY,
    );

    let size = tile_w.min(tile_h);
    let thickness = (size / 8).max(2);
    let centre_x = x0 + tile_w / 2;
    let centre_y = tile_h / 2;

    // Tiles too small to hold a glyph stay plain grey.
    if tile_w / 2 < thickness || tile_h / 2 < thickness {
        return;
    }

    // Vertical bar: middle half of the tile height.
    draw_filled_rect_mut(
        canvas,
        Rect::at((centre_x - thickness / 2) as i32, (tile_h / 4) as i32)
            .of_size(thickness, tile_h / 2),
        PLUS_GREY,
    );
    // Horizontal bar: middle half of the tile width.
    draw_filled_rect_mut(
        canvas,
        Rect::at((x0 + tile_w / 4) as i32, (centre_y - thickness / 2) as i32)
            .of_size(tile_w / 2, thickness),
        PLUS_GREY,
    );
}

/// Compose a uniform-style thumbnail: the first page fitted to
/// `width × uniform_height(width)`, with a page-count badge in the
/// bottom-right corner when the document has more than one page.
///
/// Canvas dimensions never depend on the page count.
pub(crate) fn uniform_page(first_page: &RgbaImage, page_count: usize, width: u32) -> RgbaImage {
    let mut canvas = fit::fit_to_canvas(first_page, width, uniform_height(width));
    if page_count > 1 {
        draw_page_count_badge(&mut canvas, page_count);
    }
    canvas
}

/// Draw the page-count badge: "2"–"9", or "9+" for counts above 9.
///
/// The badge background is the existing pixels darkened to 30% of their
/// RGB value — a translucency effect without true alpha blending — and
/// the label is drawn in white on top.
fn draw_page_count_badge(canvas: &mut RgbaImage, page_count: usize) {
    let label = if page_count > 9 {
        "9+".to_string()
    } else {
        page_count.to_string()
    };

    let badge_w = glyph::text_width(&label) + BADGE_PADDING * 2;
    let badge_h = glyph::GLYPH_HEIGHT + BADGE_PADDING * 2;

    let (img_w, img_h) = canvas.dimensions();
    let badge_x = img_w as i64 - i64::from(badge_w) - i64::from(BADGE_MARGIN);
    let badge_y = img_h as i64 - i64::from(badge_h) - i64::from(BADGE_MARGIN);

    for y in badge_y..badge_y + i64::from(badge_h) {
        for x in badge_x..badge_x + i64::from(badge_w) {
            if x < 0 || y < 0 || x as u32 >= img_w || y as u32 >= img_h {
                continue;
            }
            let Rgba([r, g, b, _]) = *canvas.get_pixel(x as u32, y as u32);
            canvas.put_pixel(
                x as u32,
                y as u32,
                Rgba([
                    (f32::from(r) * 0.3) as u8,
                    (f32::from(g) * 0.3) as u8,
                    (f32::from(b) * 0.3) as u8,
                    255,
                ]),
            );
        }
    }

    glyph::draw_text(
        canvas,
        &label,
        badge_x + i64::from(BADGE_PADDING),
        badge_y + i64::from(BADGE_PADDING),
        WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn page_set(count: usize) -> PageSet {
        let pages = (0..count)
            .map(|_| RgbaImage::from_pixel(100, 141, Rgba([30, 60, 200, 255])))
            .collect();
        PageSet::new(pages, Path::new("test.pdf")).unwrap()
    }

    #[test]
    fn composite_width_tracks_page_count() {
        for n in 1..=4usize {
            let thumb = composite_pages(&page_set(n), 64);
            assert_eq!(thumb.dimensions(), (n as u32 * 64, 91), "n={n}");
        }
    }

    #[test]
    fn composite_overflow_adds_indicator_tile() {
        // 5 pages at width 64 → 4 tiles + indicator = 320×91.
        let thumb = composite_pages(&page_set(5), 64);
        assert_eq!(thumb.dimensions(), (320, 91));

        // Indicator tile background is grey, not page content.
        assert_eq!(*thumb.get_pixel(4 * 64 + 2, 2), CANVAS_GREY);
        // Centre of the tile lands on the "+" glyph.
        assert_eq!(*thumb.get_pixel(4 * 64 + 32, 45), PLUS_GREY);
        // Bar extents: just outside the vertical bar is background again.
        assert_eq!(*thumb.get_pixel(4 * 64 + 32, 10), CANVAS_GREY);
    }

    #[test]
    fn composite_width_caps_at_five_tiles() {
        let thumb = composite_pages(&page_set(40), 64);
        assert_eq!(thumb.dimensions(), (320, 91));
    }

    #[test]
    fn composite_tiles_sit_at_fixed_offsets() {
        // Pages are blue; every tile's top-left pixel must be page content.
        let thumb = composite_pages(&page_set(3), 50);
        for i in 0..3u32 {
            let p = thumb.get_pixel(i * 50 + 25, 10);
            assert!(p.0[2] > 100, "tile {i} missing content: {p:?}");
        }
    }

    #[test]
    fn uniform_dimensions_ignore_page_count() {
        let first = RgbaImage::from_pixel(100, 141, Rgba([30, 60, 200, 255]));
        for count in [1usize, 2, 9, 40] {
            let thumb = uniform_page(&first, count, 64);
            assert_eq!(thumb.dimensions(), (64, 91), "count={count}");
        }
    }

    #[test]
    fn uniform_single_page_has_no_badge() {
        // A short page leaves grey padding in the badge corner; with one
        // page it must stay untouched.
        let first = RgbaImage::from_pixel(100, 60, Rgba([200, 30, 30, 255]));
        let thumb = uniform_page(&first, 1, 64);
        let (w, h) = thumb.dimensions();
        assert_eq!(*thumb.get_pixel(w - 3, h - 3), CANVAS_GREY);
    }

    #[test]
    fn uniform_badge_darkens_corner() {
        let first = RgbaImage::from_pixel(100, 60, Rgba([200, 30, 30, 255]));
        let thumb = uniform_page(&first, 3, 64);
        let (w, h) = thumb.dimensions();
        // 30% of the grey padding value 240 is 72.
        assert_eq!(*thumb.get_pixel(w - 3, h - 3), Rgba([72, 72, 72, 255]));
        // White label pixels exist inside the badge region.
        let badge_has_white = (h - 13 - 2..h - 2)
            .flat_map(|y| (w - 20..w).map(move |x| (x, y)))
            .any(|(x, y)| *thumb.get_pixel(x, y) == WHITE);
        assert!(badge_has_white, "badge label not drawn");
    }

    #[test]
    fn uniform_badge_caps_label_at_nine_plus() {
        let first = RgbaImage::from_pixel(100, 60, Rgba([200, 30, 30, 255]));
        let capped = uniform_page(&first, 12, 64);
        let nine = uniform_page(&first, 40, 64);
        // Both counts above 9 render the identical "9+" badge.
        assert_eq!(capped.as_raw(), nine.as_raw());
    }
}
