//! Caption rendering for the name band.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusttype::{point, Font, Scale};
use ticketshare_banner_model::geometry::Rgba8;

use crate::surface::RasterSurface;

/// Bold sans-serif fonts tried in order when no font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Single-line text placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    /// Left edge of the first glyph.
    pub x: f32,
    /// Line vertical center.
    pub center_y: f32,
    /// Font size in pixels.
    pub px: f32,
    pub color: Rgba8,
}

/// Draws left-aligned, vertically centered single-line text.
pub trait TextPainter: Send + Sync {
    fn draw_text(&self, surface: &mut RasterSurface, text: &str, placement: TextPlacement);

    /// Whether text will actually show up.
    fn is_available(&self) -> bool {
        true
    }
}

/// TrueType painter backed by rusttype.
pub struct FontTextPainter {
    font: Font<'static>,
    source: PathBuf,
}

impl FontTextPainter {
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|e| FontError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| FontError::Parse {
            path: path.to_path_buf(),
        })?;
        Ok(Self {
            font,
            source: path.to_path_buf(),
        })
    }

    /// Use `configured` if given, otherwise the first system font that parses.
    pub fn discover(configured: Option<&Path>) -> Result<Self, FontError> {
        if let Some(path) = configured {
            return Self::from_file(path);
        }
        SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .filter(|p| p.exists())
            .find_map(|p| Self::from_file(p).ok())
            .ok_or(FontError::NotFound)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

}

impl TextPainter for FontTextPainter {
    fn draw_text(&self, surface: &mut RasterSurface, text: &str, placement: TextPlacement) {
        let scale = Scale::uniform(placement.px);
        let v_metrics = self.font.v_metrics(scale);
        // Middle baseline: center the ascent..descent span on center_y.
        let baseline = placement.center_y + (v_metrics.ascent + v_metrics.descent) / 2.0;

        for glyph in self
            .font
            .layout(text, scale, point(placement.x, baseline))
        {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let x = bb.min.x as i64 + gx as i64;
                let y = bb.min.y as i64 + gy as i64;
                surface.blend(x, y, placement.color, v);
            });
        }
    }
}

/// Painter used when no font is available: text is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextPainter;

impl TextPainter for NoTextPainter {
    fn draw_text(&self, _surface: &mut RasterSurface, text: &str, _placement: TextPlacement) {
        tracing::warn!(text, "No font available; skipping band caption");
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Best painter for the configured font, falling back to [`NoTextPainter`].
pub fn default_painter(configured: Option<&Path>) -> Arc<dyn TextPainter> {
    match FontTextPainter::discover(configured) {
        Ok(painter) => {
            tracing::debug!(font = %painter.source().display(), "Loaded caption font");
            Arc::new(painter)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Caption font unavailable");
            Arc::new(NoTextPainter)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a usable TrueType font")]
    Parse { path: PathBuf },

    #[error("no usable system font found")]
    NotFound,
}
