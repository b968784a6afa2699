//! Share payloads and download naming.

use serde::{Deserialize, Serialize};

/// File name used when the banner is attached to a share.
pub const SHARE_FILE_NAME: &str = "event-ticket.png";

/// MIME type of every generated banner.
pub const PNG_MIME: &str = "image/png";

/// A file attached to a share.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ShareFile {
    /// Wrap banner PNG bytes as `event-ticket.png`.
    pub fn banner(bytes: Vec<u8>) -> Self {
        Self {
            name: SHARE_FILE_NAME.to_string(),
            mime_type: PNG_MIME.to_string(),
            bytes,
        }
    }
}

impl std::fmt::Debug for ShareFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// What gets handed to a native share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareStatement {
    pub title: String,
    pub text: String,
    pub files: Vec<ShareFile>,
}

impl ShareStatement {
    /// Templated statement for an event.
    pub fn for_event(event_title: &str, file: ShareFile) -> Self {
        Self {
            title: format!("I'm attending {event_title}!"),
            text: format!("Join me at {event_title}! Get your tickets now."),
            files: vec![file],
        }
    }
}

/// Summary of a share statement without the file payloads, for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSummary {
    pub title: String,
    pub text: String,
    pub file_names: Vec<String>,
}

impl From<&ShareStatement> for ShareSummary {
    fn from(statement: &ShareStatement) -> Self {
        Self {
            title: statement.title.clone(),
            text: statement.text.clone(),
            file_names: statement.files.iter().map(|f| f.name.clone()).collect(),
        }
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `-`.
///
/// Works per `char`, so multi-byte characters become a single hyphen.
/// Runs of hyphens are kept as-is.
pub fn slugify_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Download file name for an event banner: `<slug>-ticket.png`.
pub fn download_filename(event_title: &str) -> String {
    format!("{}-ticket.png", slugify_title(event_title))
}
