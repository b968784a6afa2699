//! Off-screen RGBA raster surface with canvas-style clipping.
//!
//! A surface is created per composition and dropped afterwards. Pixel
//! coverage is sampled at pixel centers, with a one-pixel linear ramp at
//! circle edges for antialiasing.

use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, Blend};
use imageproc::rect::Rect;
use ticketshare_banner_model::geometry::{Circle, PixelRect, Rgba8};

/// Clip region applied to subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clip {
    None,
    Circle(Circle),
}

impl Clip {
    fn coverage(&self, px: f32, py: f32) -> f32 {
        match self {
            Self::None => 1.0,
            Self::Circle(circle) => (0.5 - circle.edge_distance(px, py)).clamp(0.0, 1.0),
        }
    }
}

pub struct RasterSurface {
    pixels: RgbaImage,
    clip: Clip,
    saved: Vec<Clip>,
}

impl RasterSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            clip: Clip::None,
            saved: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels.get_pixel(x, y).0
    }

    /// Push the current clip so a later [`restore`](Self::restore) brings it back.
    pub fn save(&mut self) {
        self.saved.push(self.clip);
    }

    /// Pop the last saved clip. Unbalanced calls reset to no clip.
    pub fn restore(&mut self) {
        self.clip = self.saved.pop().unwrap_or(Clip::None);
    }

    /// Restrict subsequent draws to the inside of `circle`.
    pub fn clip_circle(&mut self, circle: Circle) {
        self.clip = Clip::Circle(circle);
    }

    /// Draw `image` resized to exactly `rect`, ignoring its aspect ratio.
    pub fn draw_stretched(&mut self, image: &DynamicImage, rect: PixelRect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let scaled = image::imageops::resize(
            &image.to_rgba8(),
            rect.width,
            rect.height,
            FilterType::Triangle,
        );

        for (sx, sy, src) in scaled.enumerate_pixels() {
            let x = rect.x + sx as i64;
            let y = rect.y + sy as i64;
            self.blend(x, y, src.0, 1.0);
        }
    }

    /// Draw `image` stretched over the whole surface.
    pub fn draw_fill(&mut self, image: &DynamicImage) {
        let rect = PixelRect {
            x: 0,
            y: 0,
            width: self.width(),
            height: self.height(),
        };
        self.draw_stretched(image, rect);
    }

    /// Fill a rectangle with a (possibly translucent) color.
    ///
    /// Unclipped fills go through imageproc's blending canvas; clipped ones
    /// are blended per pixel so the circle edge stays antialiased.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba8) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        if self.clip == Clip::None {
            if let (Ok(x), Ok(y)) = (i32::try_from(rect.x), i32::try_from(rect.y)) {
                let pixels = std::mem::replace(&mut self.pixels, RgbaImage::new(0, 0));
                let mut canvas = Blend(pixels);
                draw_filled_rect_mut(
                    &mut canvas,
                    Rect::at(x, y).of_size(rect.width, rect.height),
                    Rgba(color),
                );
                self.pixels = canvas.0;
                return;
            }
        }
        for y in rect.y..rect.y + rect.height as i64 {
            for x in rect.x..rect.x + rect.width as i64 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    /// Stroke the outline of `circle`, centered on the path.
    pub fn stroke_circle(&mut self, circle: Circle, line_width: f32, color: Rgba8) {
        let half = line_width / 2.0;
        let reach = circle.radius + half + 1.0;
        let x0 = (circle.cx - reach).floor() as i64;
        let x1 = (circle.cx + reach).ceil() as i64;
        let y0 = (circle.cy - reach).floor() as i64;
        let y1 = (circle.cy + reach).ceil() as i64;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = circle.edge_distance(x as f32 + 0.5, y as f32 + 0.5).abs();
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Blend `color` onto one pixel with extra `coverage`, honoring the clip.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgba8, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let coverage = coverage * self.clip.coverage(x as f32 + 0.5, y as f32 + 0.5);
        let src_a = color[3] as f32 / 255.0 * coverage;
        if src_a <= 0.0 {
            return;
        }

        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        let dst_a = dst.0[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        for c in 0..3 {
            let blended = (color[c] as f32 * src_a + dst.0[c] as f32 * dst_a * (1.0 - src_a))
                / out_a.max(f32::EPSILON);
            dst.0[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Encode the surface as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out).write_image(
            self.pixels.as_raw(),
            self.width(),
            self.height(),
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(out)
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}
