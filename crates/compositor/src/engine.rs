//! Banner composition.
//!
//! [`CompositionEngine::generate`] runs the whole pipeline for one banner:
//! background, attendee circle, name band, PNG encode. Steps run strictly
//! in that order, each awaited before the next starts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use ticketshare_banner_model::geometry::CompositionSpec;
use ticketshare_banner_model::props::attendance_caption;
use ticketshare_common::config::AppConfig;

use crate::error::{ComposeError, ImageRole};
use crate::loader::{truncate_uri, ImageLoader, LoadError, UriImageLoader};
use crate::surface::RasterSurface;
use crate::text::{default_painter, TextPainter, TextPlacement};

/// Inputs for one banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    /// Event background, stretched over the whole canvas.
    pub background_uri: String,
    /// Attendee photo shown in the circle.
    pub attendee_uri: Option<String>,
    /// Name printed on the band.
    pub display_name: Option<String>,
}

/// An encoded banner.
#[derive(Clone, PartialEq, Eq)]
pub struct CompositeImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for CompositeImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png", &format_args!("<{} bytes>", self.png.len()))
            .finish()
    }
}

/// Held while a composition runs; clears the in-flight flag when dropped,
/// whether the composition finished, failed or was cancelled.
#[derive(Debug)]
pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct CompositionEngine {
    loader: Arc<dyn ImageLoader>,
    painter: Arc<dyn TextPainter>,
    spec: CompositionSpec,
    load_timeout: Duration,
    in_flight: Arc<AtomicBool>,
}

impl CompositionEngine {
    pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(loader: Arc<dyn ImageLoader>, painter: Arc<dyn TextPainter>) -> Self {
        Self {
            loader,
            painter,
            spec: CompositionSpec::BANNER,
            load_timeout: Self::DEFAULT_LOAD_TIMEOUT,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Engine wired to the URI loader and the configured font.
    pub fn from_config(config: &AppConfig) -> Result<Self, LoadError> {
        let loader = UriImageLoader::new(&config.loader)?;
        let painter = default_painter(config.text.font_path.as_deref());
        Ok(Self::new(Arc::new(loader), painter).with_load_timeout(config.loader.timeout()))
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn spec(&self) -> &CompositionSpec {
        &self.spec
    }

    /// Whether a composition is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Claim the engine. Returns `None` if a composition is already running.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightGuard {
                flag: self.in_flight.clone(),
            })
    }

    /// Render one banner.
    ///
    /// Returns `Ok(None)` without doing any work when another composition
    /// is in flight on this engine.
    pub async fn generate(
        &self,
        request: &ComposeRequest,
    ) -> Result<Option<CompositeImage>, ComposeError> {
        let Some(_guard) = self.try_begin() else {
            tracing::debug!("Composition already in flight; ignoring request");
            return Ok(None);
        };

        let started = std::time::Instant::now();
        let result = self.compose(request).await;
        match &result {
            Ok(image) => tracing::info!(
                width = image.width,
                height = image.height,
                bytes = image.png.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Banner composed"
            ),
            Err(e) => tracing::warn!(error = %e, "Banner composition failed"),
        }
        result.map(Some)
    }

    async fn compose(&self, request: &ComposeRequest) -> Result<CompositeImage, ComposeError> {
        let spec = self.spec;
        let mut surface = RasterSurface::new(spec.width, spec.height);

        let background = self
            .load(ImageRole::Background, &request.background_uri)
            .await?;
        surface.draw_fill(&background);
        drop(background);

        if let Some(uri) = request.attendee_uri.as_deref() {
            let photo = self.load(ImageRole::Attendee, uri).await?;
            let circle = spec.circle();
            surface.save();
            surface.clip_circle(circle);
            surface.draw_stretched(&photo, circle.bounding_square());
            surface.restore();
            surface.stroke_circle(circle, spec.border_width, spec.border_color);
        }

        if let Some(name) = request
            .display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
        {
            surface.fill_rect(spec.band_rect(), spec.band.fill);
            self.painter.draw_text(
                &mut surface,
                &attendance_caption(name),
                TextPlacement {
                    x: spec.band.inset as f32,
                    center_y: spec.band_center_y(),
                    px: spec.band.font_px,
                    color: spec.band.text_color,
                },
            );
        }

        let (width, height) = (surface.width(), surface.height());
        let png = tokio::task::spawn_blocking(move || surface.encode_png())
            .await
            .map_err(|e| ComposeError::Encode {
                message: e.to_string(),
            })?
            .map_err(|e| ComposeError::Encode {
                message: e.to_string(),
            })?;

        Ok(CompositeImage { png, width, height })
    }

    async fn load(&self, role: ImageRole, uri: &str) -> Result<DynamicImage, ComposeError> {
        tracing::debug!(%role, uri = %truncate_uri(uri), "Loading banner input");
        match tokio::time::timeout(self.load_timeout, self.loader.load(uri)).await {
            Ok(Ok(image)) => Ok(image),
            Ok(Err(source)) => Err(ComposeError::ImageLoad { role, source }),
            Err(_) => Err(ComposeError::ImageLoadTimeout {
                role,
                timeout_ms: self.load_timeout.as_millis() as u64,
            }),
        }
    }
}
