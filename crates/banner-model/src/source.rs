//! Attendee photo sources and the upload validation policy.

use serde::{Deserialize, Serialize};

/// Which photo the attendee overlay should show.
///
/// Exactly one source is active at a time. Banner views start out on
/// [`ImageSource::ProfilePicture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// The user's existing profile picture, if they have one.
    ProfilePicture(Option<String>),
    /// A file the user picked during this view.
    UploadedFile(UploadedFile),
}

/// Which kind of source is active, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    ProfilePicture,
    UploadedFile,
}

impl ImageSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::ProfilePicture(_) => SourceKind::ProfilePicture,
            Self::UploadedFile(_) => SourceKind::UploadedFile,
        }
    }
}

/// A user-selected file, as handed over by the file picker.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original file name.
    pub name: String,
    /// Declared MIME type (e.g. `image/png`).
    pub mime_type: String,
    /// Declared size in bytes.
    pub size: u64,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Build a file whose declared size matches its contents.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Size used for policy checks: the larger of declared and actual.
    pub fn effective_size(&self) -> u64 {
        self.size.max(self.bytes.len() as u64)
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Rules an uploaded photo must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Required MIME prefix.
    pub mime_prefix: String,
    /// Maximum size in bytes (inclusive).
    pub max_bytes: u64,
}

impl ValidationPolicy {
    /// 5 MiB.
    pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

    /// Check a file against the policy.
    pub fn validate(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        if !file.mime_type.starts_with(&self.mime_prefix) {
            return Err(ValidationError::InvalidType {
                mime_type: file.mime_type.clone(),
            });
        }

        let size = file.effective_size();
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        Ok(())
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            mime_prefix: "image/".to_string(),
            max_bytes: Self::MAX_UPLOAD_BYTES,
        }
    }
}

/// Why an upload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select an image file (got {mime_type:?})")]
    InvalidType { mime_type: String },

    #[error("Image must be smaller than 5MB ({size} bytes > {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

impl ValidationError {
    /// Short message suitable for inline display next to the picker.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidType { .. } => "Please select an image file",
            Self::TooLarge { .. } => "Image must be smaller than 5MB",
        }
    }
}
