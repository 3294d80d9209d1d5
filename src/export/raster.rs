//! Fixed-size RGBA compositing surface.
//!
//! All drawing clips at the canvas edges; element coordinates may be
//! negative or past the edge and only the visible portion is painted. The
//! surface is allocated per render call, so concurrent renders never share
//! pixels.

use image::{Rgba, RgbaImage, imageops};

use crate::document::Color;

pub(super) struct Surface {
    width: u32,
    height: u32,
    pixels: RgbaImage,
}

impl Surface {
    /// Fresh surface filled with the background color.
    pub(super) fn new(width: u32, height: u32, background: Color) -> Self {
        let bg = Rgba([background.r, background.g, background.b, 0xff]);
        Self {
            width,
            height,
            pixels: RgbaImage::from_pixel(width, height, bg),
        }
    }

    pub(super) fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Source-over blend of one pixel. Out-of-bounds coordinates are dropped.
    pub(super) fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        let a = u32::from(color.a);
        let src = [color.r, color.g, color.b];
        for i in 0..3 {
            let blended = u32::from(src[i]) * a + u32::from(dst[i]) * (255 - a);
            dst[i] = (blended / 255) as u8;
        }
        // The canvas itself stays opaque.
        dst[3] = 0xff;
    }

    /// Integer pixel span covered by an element edge pair.
    fn span(start: f32, extent: f32) -> (i64, i64) {
        (start.floor() as i64, (start + extent).ceil() as i64)
    }

    pub(super) fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, x1) = Self::span(x, w);
        let (y0, y1) = Self::span(y, h);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub(super) fn fill_ellipse(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (rx, ry) = (w / 2.0, h / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (cx, cy) = (x + rx, y + ry);
        let (x0, x1) = Self::span(x, w);
        let (y0, y1) = Self::span(y, h);
        for py in y0..y1 {
            for px in x0..x1 {
                // Sample at the pixel center against the implicit equation.
                let nx = (px as f32 + 0.5 - cx) / rx;
                let ny = (py as f32 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// Stretch an image to exactly `w` x `h` and composite it at (`x`, `y`).
    ///
    /// No aspect-ratio preservation: the declared element box wins.
    pub(super) fn blit_stretched(&mut self, source: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
        let dst_w = w.round().max(1.0) as u32;
        let dst_h = h.round().max(1.0) as u32;
        let scaled = if source.dimensions() == (dst_w, dst_h) {
            source.clone()
        } else {
            imageops::resize(source, dst_w, dst_h, imageops::FilterType::Triangle)
        };

        let (bx, by) = (x.round() as i64, y.round() as i64);
        for (sx, sy, pixel) in scaled.enumerate_pixels() {
            let color = Color::rgba(pixel[0], pixel[1], pixel[2], pixel[3]);
            self.blend_pixel(bx + i64::from(sx), by + i64::from(sy), color);
        }
    }

    /// Crossed-out outline box standing in for an image that failed to load.
    pub(super) fn draw_placeholder(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, x1) = Self::span(x, w);
        let (y0, y1) = Self::span(y, h);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        for px in x0..x1 {
            self.blend_pixel(px, y0, color);
            self.blend_pixel(px, y1 - 1, color);
        }
        for py in y0..y1 {
            self.blend_pixel(x0, py, color);
            self.blend_pixel(x1 - 1, py, color);
        }
        let (dw, dh) = ((x1 - x0) as f32, (y1 - y0) as f32);
        let steps = (x1 - x0).max(y1 - y0);
        for i in 0..steps {
            let t = i as f32 / steps.max(1) as f32;
            let px = x0 + (t * dw) as i64;
            let py = y0 + (t * dh) as i64;
            self.blend_pixel(px, py, color);
            self.blend_pixel(x1 - 1 - (t * dw) as i64, py, color);
        }
    }
}
