//! Composition failures.

use std::fmt;

use ticketshare_common::error::TicketshareError;

use crate::loader::LoadError;

/// Which of the two inputs an image error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Background,
    Attendee,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => f.write_str("background"),
            Self::Attendee => f.write_str("attendee"),
        }
    }
}

/// Anything that stops a banner from being produced.
///
/// Every variant aborts the whole composition; no partial banner is ever
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Failed to load {role} image: {source}")]
    ImageLoad {
        role: ImageRole,
        #[source]
        source: LoadError,
    },

    #[error("Timed out loading {role} image after {timeout_ms}ms")]
    ImageLoadTimeout { role: ImageRole, timeout_ms: u64 },

    #[error("Failed to encode banner: {message}")]
    Encode { message: String },
}

impl ComposeError {
    /// The single message shown to users for any composition failure.
    pub const USER_MESSAGE: &'static str = "Failed to generate banner. Please try again.";

    /// Which input failed, if the failure came from loading.
    pub fn role(&self) -> Option<ImageRole> {
        match self {
            Self::ImageLoad { role, .. } | Self::ImageLoadTimeout { role, .. } => Some(*role),
            Self::Encode { .. } => None,
        }
    }
}

impl From<ComposeError> for TicketshareError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::ImageLoad { .. } | ComposeError::ImageLoadTimeout { .. } => {
                TicketshareError::image_load(err.to_string())
            }
            ComposeError::Encode { .. } => TicketshareError::compose(err.to_string()),
        }
    }
}
