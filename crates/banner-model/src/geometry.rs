//! Fixed banner layout.
//!
//! All values are absolute canvas pixels with `(0, 0)` at the top-left.

use serde::{Deserialize, Serialize};

/// An 8-bit straight-alpha RGBA color.
pub type Rgba8 = [u8; 4];

pub const WHITE: Rgba8 = [255, 255, 255, 255];

/// Layout of the whole banner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositionSpec {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Distance of the circle center from the right and bottom edges.
    pub circle_offset: u32,
    /// Attendee circle radius.
    pub circle_radius: f32,
    /// Stroke width of the ring drawn over the circle edge.
    pub border_width: f32,
    /// Ring color.
    pub border_color: Rgba8,
    /// Name band layout.
    pub band: NameBand,
}

/// The translucent strip along the bottom edge carrying the attendee name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NameBand {
    /// Band height, measured up from the bottom edge.
    pub height: u32,
    /// Band fill color.
    pub fill: Rgba8,
    /// Text color.
    pub text_color: Rgba8,
    /// Text size in pixels.
    pub font_px: f32,
    /// Left inset of the text.
    pub inset: u32,
}

/// Circle position and size on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl CompositionSpec {
    pub const BANNER: CompositionSpec = CompositionSpec {
        width: 1200,
        height: 630,
        circle_offset: 150,
        circle_radius: 80.0,
        border_width: 6.0,
        border_color: WHITE,
        band: NameBand {
            height: 80,
            fill: [0, 0, 0, 179], // 0.7 opacity
            text_color: WHITE,
            font_px: 36.0,
            inset: 40,
        },
    };

    /// The attendee circle. Depends only on canvas size.
    pub fn circle(&self) -> Circle {
        Circle {
            cx: self.width as f32 - self.circle_offset as f32,
            cy: self.height as f32 - self.circle_offset as f32,
            radius: self.circle_radius,
        }
    }

    /// Rectangle covered by the name band.
    pub fn band_rect(&self) -> PixelRect {
        let height = self.band.height.min(self.height);
        PixelRect {
            x: 0,
            y: (self.height - height) as i64,
            width: self.width,
            height,
        }
    }

    /// Vertical center line of the band, where text is centered.
    pub fn band_center_y(&self) -> f32 {
        let rect = self.band_rect();
        rect.y as f32 + rect.height as f32 / 2.0
    }
}

impl Default for CompositionSpec {
    fn default() -> Self {
        Self::BANNER
    }
}

impl Circle {
    /// Distance of a point from the circle outline (negative inside).
    pub fn edge_distance(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.cx;
        let dy = y - self.cy;
        (dx * dx + dy * dy).sqrt() - self.radius
    }

    /// Bounding square the photo is stretched into.
    pub fn bounding_square(&self) -> PixelRect {
        let side = (self.radius * 2.0).round() as u32;
        PixelRect {
            x: (self.cx - self.radius).round() as i64,
            y: (self.cy - self.radius).round() as i64,
            width: side,
            height: side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn banner_circle_sits_at_bottom_right() {
        let circle = CompositionSpec::BANNER.circle();
        assert_eq!((circle.cx, circle.cy), (1050.0, 480.0));
        assert_eq!(circle.radius, 80.0);

        let square = circle.bounding_square();
        assert_eq!(
            square,
            PixelRect {
                x: 970,
                y: 400,
                width: 160,
                height: 160
            }
        );
    }

    #[test]
    fn band_covers_bottom_eighty_pixels() {
        let rect = CompositionSpec::BANNER.band_rect();
        assert_eq!(rect.y, 550);
        assert_eq!(rect.height, 80);
        assert_eq!(rect.width, 1200);
        assert_eq!(CompositionSpec::BANNER.band_center_y(), 590.0);
    }

    #[test]
    fn edge_distance_is_signed() {
        let circle = CompositionSpec::BANNER.circle();
        assert_eq!(circle.edge_distance(1050.0, 480.0), -80.0);
        assert_eq!(circle.edge_distance(1130.0, 480.0), 0.0);
        assert_eq!(circle.edge_distance(1131.0, 480.0), 1.0);
    }

    proptest! {
        #[test]
        fn circle_tracks_canvas_corner(w in 400u32..4000, h in 400u32..4000) {
            let spec = CompositionSpec { width: w, height: h, ..CompositionSpec::BANNER };
            let circle = spec.circle();
            prop_assert_eq!(circle.cx, w as f32 - 150.0);
            prop_assert_eq!(circle.cy, h as f32 - 150.0);
            prop_assert_eq!(circle.radius, 80.0);
        }
    }
}
