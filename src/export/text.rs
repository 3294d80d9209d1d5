//! Bitmap text rendering with the Spleen font family.
//!
//! Glyphs come from the 12x24 Spleen face and are scaled with nearest
//! neighbor to the element's font size, so text stays crisp at label
//! resolutions without a rasterizer dependency. Characters missing from the
//! face fall back to a box outline.

use std::collections::HashMap;

use spleen_font::{FONT_12X24, PSF2Font};

use crate::document::{DesignElement, FontWeight};

use super::raster::Surface;

pub(super) const GLYPH_WIDTH: usize = 12;
pub(super) const GLYPH_HEIGHT: usize = 24;

/// Base 12x24 glyph bitmap for a character, one byte per pixel (1 = on).
pub(super) fn base_glyph(ch: char) -> Vec<u8> {
    let mut glyph = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
    let mut spleen = PSF2Font::new(FONT_12X24).unwrap();

    if let Some(rows) = spleen.glyph_for_utf8(ch.to_string().as_bytes()) {
        for (row_y, row) in rows.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * GLYPH_WIDTH + col_x;
                if idx < glyph.len() {
                    glyph[idx] = u8::from(on);
                }
            }
        }
    } else {
        draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT);
    }

    glyph
}

/// Nearest-neighbor scale from src dimensions to dst dimensions.
fn scale_bitmap(src: &[u8], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<u8> {
    let mut dst = vec![0u8; dst_w * dst_h];
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            dst[dy * dst_w + dx] = src[sy * src_w + sx];
        }
    }
    dst
}

/// Box outline for characters the face does not cover.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Paint a text element onto the surface.
///
/// The font size sets the cell height; cell width keeps the face's 1:2
/// aspect. Only `\n` starts a new line; a line longer than the element's
/// declared width runs past it and clips at the canvas edge like any other
/// overflowing geometry. Bold is a double-strike with a one-pixel
/// horizontal offset.
pub(super) fn draw_text(surface: &mut Surface, element: &DesignElement) {
    if element.text.is_empty() {
        return;
    }

    let cell_h = (element.font_size.round() as usize).max(4);
    let cell_w = (cell_h / 2).max(2);

    let mut cache: HashMap<char, Vec<u8>> = HashMap::new();
    let mut col = 0usize;
    let mut row = 0usize;

    for ch in element.text.chars() {
        if ch == '\n' {
            col = 0;
            row += 1;
            continue;
        }

        let scaled = cache
            .entry(ch)
            .or_insert_with(|| {
                scale_bitmap(&base_glyph(ch), GLYPH_WIDTH, GLYPH_HEIGHT, cell_w, cell_h)
            })
            .clone();

        let base_x = element.x as i64 + (col * cell_w) as i64;
        let base_y = element.y as i64 + (row * cell_h) as i64;

        for gy in 0..cell_h {
            for gx in 0..cell_w {
                if scaled[gy * cell_w + gx] != 0 {
                    let px = base_x + gx as i64;
                    let py = base_y + gy as i64;
                    surface.blend_pixel(px, py, element.fill);
                    if element.font_weight == FontWeight::Bold {
                        surface.blend_pixel(px + 1, py, element.fill);
                    }
                }
            }
        }

        col += 1;
    }
}
