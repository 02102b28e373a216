// src/certificate/raster.rs

use std::io::Cursor;

use image::{ImageEncoder, Rgb, RgbImage, codecs::png::PngEncoder};

use crate::{
    certificate::{
        font,
        layout::{CertificateLayout, Color, Element},
    },
    error::ExportError,
};

/// Upscale factor applied when rasterizing, for print quality.
pub const RASTER_SCALE: u32 = 3;

/// Turns a layout into pixels.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, layout: &CertificateLayout, scale: u32) -> Result<RgbImage, ExportError>;
}

/// Software rasterizer drawing the layout with the built-in bitmap font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRasterizer;

impl Rasterizer for BitmapRasterizer {
    fn rasterize(&self, layout: &CertificateLayout, scale: u32) -> Result<RgbImage, ExportError> {
        let scale = scale.max(1);
        let mut canvas = Canvas {
            image: RgbImage::from_pixel(
                layout.width * scale,
                layout.height * scale,
                rgb(layout.background),
            ),
        };

        for element in &layout.elements {
            match element {
                Element::Frame {
                    inset,
                    thickness,
                    color,
                } => canvas.frame(inset * scale, thickness * scale, *color),
                Element::Rule {
                    y,
                    width,
                    thickness,
                    color,
                } => {
                    let w = width * scale;
                    let x = canvas.width().saturating_sub(w) / 2;
                    canvas.fill(x, y * scale, w, (thickness * scale).max(1), *color);
                }
                Element::Text {
                    content,
                    y,
                    size,
                    color,
                } => canvas.text(content, y * scale, size * scale, *color),
            }
        }

        Ok(canvas.image)
    }
}

struct Canvas {
    image: RgbImage,
}

impl Canvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    /// Fills a rectangle, clipped to the canvas.
    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let x_end = x.saturating_add(w).min(self.image.width());
        let y_end = y.saturating_add(h).min(self.image.height());
        let pixel = rgb(color);
        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, pixel);
            }
        }
    }

    fn frame(&mut self, inset: u32, thickness: u32, color: Color) {
        let (w, h) = self.image.dimensions();
        if inset * 2 >= w || inset * 2 >= h {
            return;
        }
        let inner_w = w - inset * 2;
        let inner_h = h - inset * 2;
        self.fill(inset, inset, inner_w, thickness, color);
        self.fill(inset, h - inset - thickness.min(inner_h), inner_w, thickness, color);
        self.fill(inset, inset, thickness, inner_h, color);
        self.fill(w - inset - thickness.min(inner_w), inset, thickness, inner_h, color);
    }

    /// Draws centered text whose glyph rows span `height` pixels.
    fn text(&mut self, content: &str, top: u32, height: u32, color: Color) {
        let dot = (height / font::GLYPH_HEIGHT).max(1);
        let text_width = font::text_dots(content) * dot;
        let mut x = self.width().saturating_sub(text_width) / 2;

        for c in content.chars() {
            for col in 0..font::GLYPH_WIDTH {
                for row in 0..font::GLYPH_HEIGHT {
                    if font::is_set(c, col, row) {
                        self.fill(x + col * dot, top + row * dot, dot, dot, color);
                    }
                }
            }
            x += font::GLYPH_ADVANCE * dot;
        }
    }
}

fn rgb(color: Color) -> Rgb<u8> {
    Rgb(color.0)
}

/// Encodes the raster as an 8-bit RGB, non-interlaced PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(buffer.into_inner())
}
