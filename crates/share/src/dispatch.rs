//! Sharing a banner through the platform share surface.

use std::sync::Arc;

use ticketshare_banner_model::share::{ShareFile, ShareStatement, ShareSummary};

use crate::clipboard::{Clipboard, ClipboardError};
use crate::object_url::{ObjectUrl, ObjectUrlRegistry};

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("object URL is not live: {url}")]
    UnknownUrl { url: String },

    #[error("share was cancelled")]
    Cancelled,

    #[error("share permission denied")]
    PermissionDenied,

    #[error("share failed: {message}")]
    Failed { message: String },

    #[error("no page URL to copy")]
    NoPageUrl,

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// A platform share sheet.
#[async_trait::async_trait]
pub trait NativeShare: Send + Sync {
    /// Whether any share surface exists at all.
    fn is_available(&self) -> bool;

    /// Whether this particular file set can be shared.
    fn can_share(&self, files: &[ShareFile]) -> bool;

    async fn share(&self, statement: &ShareStatement) -> Result<(), ShareError>;
}

/// Share surface for platforms without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNativeShare;

#[async_trait::async_trait]
impl NativeShare for NoNativeShare {
    fn is_available(&self) -> bool {
        false
    }

    fn can_share(&self, _files: &[ShareFile]) -> bool {
        false
    }

    async fn share(&self, _statement: &ShareStatement) -> Result<(), ShareError> {
        Err(ShareError::Failed {
            message: "native sharing is not supported on this platform".to_string(),
        })
    }
}

/// How a share attempt ended. Share attempts never fail outward; failures
/// come back as [`ShareOutcome::Failed`] with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The native share sheet accepted the banner.
    Shared,
    /// No usable share sheet; the page URL went to the clipboard.
    LinkCopied,
    /// Nothing worked; the user should share manually.
    Failed,
}

impl ShareOutcome {
    pub const LINK_COPIED_MESSAGE: &'static str = "Link copied to clipboard!";
    pub const SHARE_MANUALLY_MESSAGE: &'static str =
        "Unable to share. Please try sharing manually.";

    /// Message to show the user, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Shared => None,
            Self::LinkCopied => Some(Self::LINK_COPIED_MESSAGE),
            Self::Failed => Some(Self::SHARE_MANUALLY_MESSAGE),
        }
    }
}

pub struct ShareDispatcher {
    registry: ObjectUrlRegistry,
    native: Arc<dyn NativeShare>,
    clipboard: Arc<dyn Clipboard>,
    page_url: Option<String>,
}

impl ShareDispatcher {
    pub fn new(
        registry: ObjectUrlRegistry,
        native: Arc<dyn NativeShare>,
        clipboard: Arc<dyn Clipboard>,
        page_url: Option<String>,
    ) -> Self {
        Self {
            registry,
            native,
            clipboard,
            page_url,
        }
    }

    /// Share the banner behind `url` for `event_title`.
    ///
    /// Uses the native share sheet when it can take the PNG; otherwise
    /// copies the page URL to the clipboard.
    pub async fn share(&self, url: &ObjectUrl, event_title: &str) -> ShareOutcome {
        match self.try_share(url, event_title).await {
            Ok(outcome) => {
                tracing::info!(?outcome, "Share finished");
                outcome
            }
            Err(ShareError::Cancelled) => {
                tracing::debug!("Share cancelled by user");
                ShareOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Share failed");
                ShareOutcome::Failed
            }
        }
    }

    async fn try_share(
        &self,
        url: &ObjectUrl,
        event_title: &str,
    ) -> Result<ShareOutcome, ShareError> {
        // The blob is looked up again; callers only hold the URL.
        let blob = self
            .registry
            .resolve(url)
            .ok_or_else(|| ShareError::UnknownUrl {
                url: url.to_string(),
            })?;
        let file = ShareFile::banner(blob.bytes.to_vec());

        if self.native.is_available() && self.native.can_share(std::slice::from_ref(&file)) {
            let statement = ShareStatement::for_event(event_title, file);
            tracing::debug!(summary = ?ShareSummary::from(&statement), "Invoking native share");
            self.native.share(&statement).await?;
            return Ok(ShareOutcome::Shared);
        }

        let page_url = self.page_url.as_deref().ok_or(ShareError::NoPageUrl)?;
        tracing::debug!(
            clipboard = self.clipboard.name(),
            "Native share unavailable; copying link"
        );
        self.clipboard.write_text(page_url).await?;
        Ok(ShareOutcome::LinkCopied)
    }
}
