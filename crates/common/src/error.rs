//! Error types shared across TicketShare crates.

/// Top-level error type for TicketShare operations.
///
/// Leaf crates keep their own precise error enums and convert into this
/// one at crate boundaries (CLI, session orchestration).
#[derive(Debug, thiserror::Error)]
pub enum TicketshareError {
    #[error("Image load error: {message}")]
    ImageLoad { message: String },

    #[error("Composition error: {message}")]
    Compose { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TicketshareError.
pub type TicketshareResult<T> = Result<T, TicketshareError>;

impl TicketshareError {
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad {
            message: msg.into(),
        }
    }

    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }
}
