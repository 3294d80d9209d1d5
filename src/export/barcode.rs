//! CODE128 barcode rendering.
//!
//! Uses the barcoders crate for encoding and draws the bars plus a
//! human-readable caption into a standalone RGBA bitmap. Invalid codes
//! produce no image; callers carry on without one.

use barcoders::sym::code128::Code128;
use image::{Rgba, RgbaImage};

use super::text;

/// Module width in pixels.
const MODULE_SCALE: u32 = 2;
/// Quiet zone on each side, in pixels (10 modules).
const QUIET_ZONE: u32 = 20;
const BAR_HEIGHT: u32 = 60;
/// Gap between the bars and the caption.
const CAPTION_GAP: u32 = 4;

/// Render `code` as a CODE128 bitmap with the code printed under the bars.
///
/// Returns `None` when the code cannot be encoded (empty string, characters
/// outside the symbology). Never panics on bad input.
pub fn render_barcode(code: &str) -> Option<RgbaImage> {
    if code.is_empty() {
        return None;
    }
    // Character Set B covers digits, letters and the usual punctuation.
    let prefixed = format!("\u{0181}{code}");
    let modules = match Code128::new(&prefixed) {
        Ok(barcode) => barcode.encode(),
        Err(_) => return None,
    };
    if modules.is_empty() {
        return None;
    }

    let bars_width = modules.len() as u32 * MODULE_SCALE;
    let caption_width = code.chars().count() as u32 * text::GLYPH_WIDTH as u32;
    let width = (bars_width.max(caption_width)) + QUIET_ZONE * 2;
    let height = BAR_HEIGHT + CAPTION_GAP + text::GLYPH_HEIGHT as u32;

    let black = Rgba([0, 0, 0, 0xff]);
    let mut image = RgbaImage::from_pixel(width, height, Rgba([0xff, 0xff, 0xff, 0xff]));

    let bars_x = (width - bars_width) / 2;
    for (i, &module) in modules.iter().enumerate() {
        if module != 1 {
            continue;
        }
        for sx in 0..MODULE_SCALE {
            let x = bars_x + i as u32 * MODULE_SCALE + sx;
            for y in 0..BAR_HEIGHT {
                image.put_pixel(x, y, black);
            }
        }
    }

    draw_caption(&mut image, code, BAR_HEIGHT + CAPTION_GAP);

    Some(image)
}

/// Centered human-readable line under the bars, in the base glyph size.
fn draw_caption(image: &mut RgbaImage, code: &str, top: u32) {
    let caption_width = code.chars().count() as u32 * text::GLYPH_WIDTH as u32;
    let start_x = (image.width().saturating_sub(caption_width)) / 2;
    let black = Rgba([0, 0, 0, 0xff]);

    for (i, ch) in code.chars().enumerate() {
        let glyph = text::base_glyph(ch);
        let base_x = start_x + i as u32 * text::GLYPH_WIDTH as u32;
        for gy in 0..text::GLYPH_HEIGHT {
            for gx in 0..text::GLYPH_WIDTH {
                if glyph[gy * text::GLYPH_WIDTH + gx] != 0 {
                    let x = base_x + gx as u32;
                    let y = top + gy as u32;
                    if x < image.width() && y < image.height() {
                        image.put_pixel(x, y, black);
                    }
                }
            }
        }
    }
}
