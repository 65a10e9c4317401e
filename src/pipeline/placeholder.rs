//! Failure classification and placeholder rendering.
//!
//! Callers that must always render *something* (a thumbnail grid, a file
//! browser) cannot surface an error value — they need an image of the
//! same canonical dimensions a successful call would have produced.
//!
//! Classification is substring matching against the error's rendered
//! text, in priority order. This is a best-effort heuristic over opaque
//! error descriptions, not typed inspection: the decoding collaborators
//! only expose free text for several failure modes, and the string set
//! is kept as-is for compatibility with consumers that key on the
//! resulting labels. The coupling is brittle by construction — a wording
//! change in a collaborator silently reclassifies — and is deliberately
//! not deepened here.

use image::{Rgba, RgbaImage};

use super::fit::{page_height, uniform_height};
use super::glyph;
use crate::config::Style;
use crate::error::ThumbError;

const AMBER: Rgba<u8> = Rgba([200, 150, 0, 255]);
const GREY: Rgba<u8> = Rgba([130, 130, 130, 255]);
const DARK_GREY: Rgba<u8> = Rgba([80, 80, 80, 255]);
const RED: Rgba<u8> = Rgba([180, 40, 40, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Display label and background colour for a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSpec {
    pub label: &'static str,
    pub background: Rgba<u8>,
}

/// Classify a pipeline failure into a placeholder spec.
pub fn classify(error: &ThumbError) -> PlaceholderSpec {
    let text = error.to_string();

    if text.contains("invalid password") {
        PlaceholderSpec {
            label: "Password Protected",
            background: AMBER,
        }
    } else if text.contains("unsupported file format") {
        PlaceholderSpec {
            label: "Unsupported Format",
            background: GREY,
        }
    } else if text.contains("no such file") || text.contains("not exist") {
        PlaceholderSpec {
            label: "File Not Found",
            background: DARK_GREY,
        }
    } else {
        PlaceholderSpec {
            label: "Error",
            background: RED,
        }
    }
}

/// Render a labelled placeholder with the canonical dimensions of the
/// style in force, so success and failure are interchangeable to the
/// caller.
///
/// The label is drawn horizontally centred and vertically centred offset
/// by half the face ascent, clipping silently when the canvas is too
/// narrow for the full text — acceptable at thumbnail sizes.
pub fn render_placeholder(spec: &PlaceholderSpec, width: u32, style: Style) -> RgbaImage {
    let width = width.max(1);
    let height = match style {
        Style::Composite => page_height(width),
        Style::Uniform => uniform_height(width),
    };
    let mut canvas = RgbaImage::from_pixel(width, height, spec.background);

    let text_w = glyph::text_width(spec.label);
    let x = ((i64::from(width) - i64::from(text_w)) / 2).max(2);
    let y = i64::from(height) / 2 - i64::from(glyph::GLYPH_HEIGHT) / 2;
    glyph::draw_text(&mut canvas, spec.label, x, y, WHITE);

    canvas
}
