//! System clipboard access through `arboard`.

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no system clipboard available")]
    Unavailable,

    #[error("clipboard write failed: {message}")]
    Failed { message: String },
}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        match err {
            arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable,
            other => ClipboardError::Failed {
                message: other.to_string(),
            },
        }
    }
}

/// Writes text to a clipboard.
#[async_trait::async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// The desktop clipboard (X11, Wayland, macOS or Windows).
///
/// Each write opens a fresh handle on a blocking thread, since the X11 and
/// Wayland backends block while the selection is handed over.
#[derive(Debug, Clone, Copy)]
pub struct ArboardClipboard {
    _private: (),
}

impl ArboardClipboard {
    /// Connect once to confirm a clipboard exists in this session.
    pub fn new() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new()?;
        Ok(Self { _private: () })
    }
}

#[async_trait::async_trait]
impl Clipboard for ArboardClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), ClipboardError> {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.set_text(text)?;
            Ok(())
        })
        .await
        .map_err(|e| ClipboardError::Failed {
            message: e.to_string(),
        })??;

        tracing::debug!("Wrote text to clipboard");
        Ok(())
    }

    fn name(&self) -> &str {
        "system"
    }
}

/// Clipboard used when the session has none; every write fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

#[async_trait::async_trait]
impl Clipboard for UnavailableClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// The system clipboard, or [`UnavailableClipboard`] when there is none.
pub fn default_clipboard() -> Arc<dyn Clipboard> {
    match ArboardClipboard::new() {
        Ok(clipboard) => Arc::new(clipboard),
        Err(e) => {
            tracing::debug!(error = %e, "System clipboard unavailable");
            Arc::new(UnavailableClipboard)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_clipboard_errors() {
        let err = UnavailableClipboard.write_text("x").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable));
    }

    #[test]
    fn unsupported_platform_maps_to_unavailable() {
        let err = ClipboardError::from(arboard::Error::ClipboardNotSupported);
        assert!(matches!(err, ClipboardError::Unavailable));
    }

    #[test]
    fn other_backend_errors_keep_their_message() {
        let err = ClipboardError::from(arboard::Error::ClipboardOccupied);
        match err {
            ClipboardError::Failed { message } => assert!(!message.is_empty()),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn default_clipboard_matches_session() {
        // Headless CI has no display, so either backend is acceptable here.
        let clipboard = default_clipboard();
        let expected = if ArboardClipboard::new().is_ok() {
            "system"
        } else {
            "unavailable"
        };
        assert_eq!(clipboard.name(), expected);
    }

    #[tokio::test]
    async fn default_clipboard_without_session_refuses_writes() {
        if ArboardClipboard::new().is_ok() {
            return;
        }
        let err = default_clipboard().write_text("https://tickets.example/e/42").await;
        assert!(matches!(err, Err(ClipboardError::Unavailable)));
    }
}
