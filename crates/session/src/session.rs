//! The banner view session.
//!
//! ```text
//!             generate()               ok
//!   Idle ──────────────────► Generating ────► Ready ◄──┐
//!    ▲                           │             │ │     │
//!    │          failure          │   download()│ │share()
//!    ├───────────────────────────┘             ▼ ▼     │
//!    │                              Downloading / Sharing
//!    │        create_another()                 │
//!    └─────────────────────────── Ready        └───────┘
//! ```
//!
//! State lives behind a plain mutex that is never held across an await.
//! Each transition out of `Idle` or `Ready` bumps an epoch; async work
//! captures the epoch when it starts and only writes back if it still
//! matches, so completions that arrive after `close()` or
//! `create_another()` change nothing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ticketshare_banner_model::props::BannerProps;
use ticketshare_banner_model::source::{SourceKind, UploadedFile, ValidationError};
use ticketshare_common::config::AppConfig;
use ticketshare_common::error::{TicketshareError, TicketshareResult};
use ticketshare_compositor::{ComposeError, ComposeRequest, CompositionEngine};
use ticketshare_share::{
    ArtifactExporter, Clipboard, ExportError, NativeShare, ObjectUrl, ObjectUrlRegistry,
    ShareDispatcher, ShareOutcome,
};

use crate::resolver::ImageSourceResolver;

/// Where a session is in the generate/download/share cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerState {
    Idle,
    Generating,
    Ready,
    Downloading,
    Sharing,
}

/// Why `generate()` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event has no social banner.
    Inert,
    Closed,
    /// A generation is already running.
    InFlight,
    /// A banner already exists; call `create_another()` first.
    AlreadyGenerated,
    /// No photo to put in the circle.
    NoPreview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Ready(ObjectUrl),
    Skipped(SkipReason),
}

/// Snapshot of what the view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    pub event_title: String,
    pub state: BannerState,
    pub source: SourceKind,
    pub preview: Option<String>,
    pub artifact_url: Option<ObjectUrl>,
    pub message: Option<String>,
}

/// The collaborators a session drives.
#[derive(Clone)]
pub struct BannerServices {
    pub engine: Arc<CompositionEngine>,
    pub exporter: ArtifactExporter,
    pub dispatcher: Arc<ShareDispatcher>,
}

impl BannerServices {
    pub fn new(
        engine: Arc<CompositionEngine>,
        exporter: ArtifactExporter,
        dispatcher: Arc<ShareDispatcher>,
    ) -> Self {
        Self {
            engine,
            exporter,
            dispatcher,
        }
    }

    /// Wire the default loader, font, downloads directory and page URL from
    /// `config`. Exporter and dispatcher share one object URL registry.
    pub fn from_config(
        config: &AppConfig,
        native: Arc<dyn NativeShare>,
        clipboard: Arc<dyn Clipboard>,
    ) -> TicketshareResult<Self> {
        let engine = CompositionEngine::from_config(config)
            .map_err(|e| TicketshareError::platform(format!("image loader: {e}")))?;
        let registry = ObjectUrlRegistry::new();
        let exporter =
            ArtifactExporter::new(registry.clone(), config.export.downloads_dir.clone());
        let dispatcher =
            ShareDispatcher::new(registry, native, clipboard, config.share.page_url.clone());
        Ok(Self::new(Arc::new(engine), exporter, Arc::new(dispatcher)))
    }
}

#[derive(Debug)]
struct Inner {
    open: bool,
    state: BannerState,
    resolver: ImageSourceResolver,
    artifact: Option<ObjectUrl>,
    message: Option<String>,
    epoch: u64,
}

type CloseHook = Box<dyn Fn() + Send + Sync>;

/// One open banner view.
pub struct BannerSession {
    props: BannerProps,
    services: BannerServices,
    on_close: Option<CloseHook>,
    inner: Mutex<Inner>,
}

/// Moves the session from `from` back to `to` when dropped, unless the
/// state or epoch moved on in the meantime. Covers failure and
/// cancellation of the awaited step.
struct Revert<'a> {
    session: &'a BannerSession,
    from: BannerState,
    to: BannerState,
    epoch: u64,
}

impl Drop for Revert<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        if inner.epoch == self.epoch && inner.state == self.from {
            inner.state = self.to;
        }
    }
}

impl BannerSession {
    pub const DOWNLOAD_FAILED_MESSAGE: &'static str =
        "Failed to download banner. Please try again.";

    /// Open a view for `props`. Without a social banner the session is
    /// inert: it renders nothing and every operation is a no-op.
    pub fn open(props: BannerProps, services: BannerServices) -> Self {
        let resolver = ImageSourceResolver::new(props.profile_picture().map(str::to_string));
        if props.social_banner().is_none() {
            tracing::debug!(event = %props.event.title, "No social banner; banner view is inert");
        }
        Self {
            props,
            services,
            on_close: None,
            inner: Mutex::new(Inner {
                open: true,
                state: BannerState::Idle,
                resolver,
                artifact: None,
                message: None,
                epoch: 0,
            }),
        }
    }

    /// Run `hook` once when the session closes.
    pub fn with_on_close(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn props(&self) -> &BannerProps {
        &self.props
    }

    pub fn is_inert(&self) -> bool {
        self.props.social_banner().is_none()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn state(&self) -> BannerState {
        self.lock().state
    }

    pub fn artifact_url(&self) -> Option<ObjectUrl> {
        self.lock().artifact.clone()
    }

    /// Latest user-facing message: validation, failure or share result.
    pub fn last_message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    pub fn preview(&self) -> Option<String> {
        self.lock().resolver.preview().map(str::to_string)
    }

    pub fn active_source(&self) -> SourceKind {
        self.lock().resolver.active_source().kind()
    }

    /// What to render, or `None` when the view renders nothing.
    pub fn view(&self) -> Option<BannerView> {
        if self.is_inert() {
            return None;
        }
        let inner = self.lock();
        if !inner.open {
            return None;
        }
        Some(BannerView {
            event_title: self.props.event.title.clone(),
            state: inner.state,
            source: inner.resolver.active_source().kind(),
            preview: inner.resolver.preview().map(str::to_string),
            artifact_url: inner.artifact.clone(),
            message: inner.message.clone(),
        })
    }

    fn live(&self) -> Option<MutexGuard<'_, Inner>> {
        if self.is_inert() {
            return None;
        }
        let inner = self.lock();
        if inner.open {
            Some(inner)
        } else {
            None
        }
    }

    pub fn select_profile_picture(&self) {
        if let Some(mut inner) = self.live() {
            inner.resolver.select_profile_picture();
            inner.message = None;
        }
    }

    /// Stage a picked file as the attendee photo.
    ///
    /// An invalid file leaves the current selection in place and sets the
    /// inline validation message.
    pub async fn handle_file_selected(&self, file: UploadedFile) -> Result<(), ValidationError> {
        let pending = {
            let Some(mut inner) = self.live() else {
                return Ok(());
            };
            match inner.resolver.begin_upload(file) {
                Ok(pending) => {
                    inner.message = None;
                    pending
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected upload");
                    inner.message = Some(e.user_message().to_string());
                    return Err(e);
                }
            }
        };

        let encoded = pending.encode().await;
        if let Some(mut inner) = self.live() {
            inner.resolver.finish_upload(encoded);
        }
        Ok(())
    }

    /// Compose the banner from the current preview.
    ///
    /// Only starts from `Idle` with a preview present. On failure the
    /// session returns to `Idle` with the generic failure message.
    pub async fn generate(&self) -> Result<GenerateOutcome, ComposeError> {
        let Some(background) = self.props.social_banner() else {
            return Ok(GenerateOutcome::Skipped(SkipReason::Inert));
        };

        let (request, epoch) = {
            let mut inner = self.lock();
            if !inner.open {
                return Ok(GenerateOutcome::Skipped(SkipReason::Closed));
            }
            match inner.state {
                BannerState::Idle => {}
                BannerState::Generating => {
                    tracing::debug!("Generation already in flight");
                    return Ok(GenerateOutcome::Skipped(SkipReason::InFlight));
                }
                _ => return Ok(GenerateOutcome::Skipped(SkipReason::AlreadyGenerated)),
            }
            let Some(preview) = inner.resolver.preview().map(str::to_string) else {
                return Ok(GenerateOutcome::Skipped(SkipReason::NoPreview));
            };

            inner.epoch += 1;
            inner.state = BannerState::Generating;
            inner.message = None;
            let request = ComposeRequest {
                background_uri: background.to_string(),
                attendee_uri: Some(preview),
                display_name: self.props.display_name().map(str::to_string),
            };
            (request, inner.epoch)
        };

        let _revert = Revert {
            session: self,
            from: BannerState::Generating,
            to: BannerState::Idle,
            epoch,
        };
        let result = self.services.engine.generate(&request).await;

        let mut inner = self.lock();
        if !inner.open || inner.epoch != epoch {
            tracing::debug!("Session moved on; discarding generation result");
            return Ok(GenerateOutcome::Skipped(SkipReason::Closed));
        }

        match result {
            Ok(Some(image)) => {
                if let Some(old) = inner.artifact.take() {
                    self.services.exporter.revoke(&old);
                }
                let url = self.services.exporter.export_blob(image.png);
                tracing::info!(url = %url, "Banner ready");
                inner.artifact = Some(url.clone());
                inner.state = BannerState::Ready;
                Ok(GenerateOutcome::Ready(url))
            }
            Ok(None) => {
                inner.state = BannerState::Idle;
                Ok(GenerateOutcome::Skipped(SkipReason::InFlight))
            }
            Err(e) => {
                inner.state = BannerState::Idle;
                inner.message = Some(ComposeError::USER_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Claim the artifact for a `Ready -> busy` transition.
    fn begin_artifact_step(&self, busy: BannerState) -> Option<(ObjectUrl, u64)> {
        let mut inner = self.live()?;
        if inner.state != BannerState::Ready {
            return None;
        }
        let url = inner.artifact.clone()?;
        inner.state = busy;
        inner.message = None;
        Some((url, inner.epoch))
    }

    /// Save the banner to the downloads directory. `Ok(None)` when there
    /// is nothing to download.
    pub async fn download(&self) -> Result<Option<PathBuf>, ExportError> {
        let Some((url, epoch)) = self.begin_artifact_step(BannerState::Downloading) else {
            return Ok(None);
        };
        let _revert = Revert {
            session: self,
            from: BannerState::Downloading,
            to: BannerState::Ready,
            epoch,
        };

        match self.services.exporter.download(&url, &self.props.event.title).await {
            Ok(path) => Ok(Some(path)),
            Err(e) => {
                tracing::warn!(error = %e, "Banner download failed");
                let mut inner = self.lock();
                if inner.epoch == epoch {
                    inner.message = Some(Self::DOWNLOAD_FAILED_MESSAGE.to_string());
                }
                Err(e)
            }
        }
    }

    /// Share the banner. Never fails; the outcome's message becomes the
    /// session message. `None` when there is nothing to share.
    pub async fn share(&self) -> Option<ShareOutcome> {
        let (url, epoch) = self.begin_artifact_step(BannerState::Sharing)?;
        let _revert = Revert {
            session: self,
            from: BannerState::Sharing,
            to: BannerState::Ready,
            epoch,
        };

        let outcome = self
            .services
            .dispatcher
            .share(&url, &self.props.event.title)
            .await;
        {
            let mut inner = self.lock();
            if inner.open && inner.epoch == epoch {
                inner.message = outcome.message().map(str::to_string);
            }
        }
        Some(outcome)
    }

    /// Drop the current banner and go back to picking a photo.
    pub fn create_another(&self) -> bool {
        let Some(mut inner) = self.live() else {
            return false;
        };
        if inner.state != BannerState::Ready {
            return false;
        }
        if let Some(url) = inner.artifact.take() {
            self.services.exporter.revoke(&url);
        }
        inner.epoch += 1;
        inner.state = BannerState::Idle;
        inner.message = None;
        true
    }

    /// Close the view, revoking the current banner. Idempotent.
    pub fn close(&self) {
        {
            let mut inner = self.lock();
            if !inner.open {
                return;
            }
            inner.open = false;
            inner.epoch += 1;
            inner.state = BannerState::Idle;
            inner.message = None;
            if let Some(url) = inner.artifact.take() {
                self.services.exporter.revoke(&url);
            }
        }
        tracing::debug!(event = %self.props.event.title, "Banner view closed");
        if let Some(hook) = &self.on_close {
            hook();
        }
    }
}

impl Drop for BannerSession {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(url) = inner.artifact.take() {
            self.services.exporter.revoke(&url);
        }
    }
}
