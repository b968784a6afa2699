//! Attendee photo selection.
//!
//! Uploads are validated synchronously, then encoded to a `data:` URI. A
//! selection made while an earlier upload is still encoding supersedes it:
//! the late result is dropped.

use ticketshare_banner_model::source::{
    ImageSource, UploadedFile, ValidationError, ValidationPolicy,
};
use ticketshare_compositor::loader::to_data_uri;

#[derive(Debug, Clone)]
pub struct ImageSourceResolver {
    policy: ValidationPolicy,
    profile_picture: Option<String>,
    active: ImageSource,
    preview: Option<String>,
    selection: u64,
}

/// A validated upload waiting to be encoded.
#[derive(Debug)]
pub struct PendingUpload {
    file: UploadedFile,
    selection: u64,
}

/// An encoded upload ready to become the preview.
#[derive(Debug)]
pub struct EncodedUpload {
    file: UploadedFile,
    data_uri: String,
    selection: u64,
}

impl PendingUpload {
    /// Encode the file as a base64 `data:` URI.
    pub async fn encode(self) -> EncodedUpload {
        tokio::task::yield_now().await;
        let data_uri = to_data_uri(&self.file.mime_type, &self.file.bytes);
        EncodedUpload {
            file: self.file,
            data_uri,
            selection: self.selection,
        }
    }
}

impl ImageSourceResolver {
    /// Start on the profile picture, if the user has one.
    pub fn new(profile_picture: Option<String>) -> Self {
        Self::with_policy(profile_picture, ValidationPolicy::default())
    }

    pub fn with_policy(profile_picture: Option<String>, policy: ValidationPolicy) -> Self {
        Self {
            policy,
            preview: profile_picture.clone(),
            active: ImageSource::ProfilePicture(profile_picture.clone()),
            profile_picture,
            selection: 0,
        }
    }

    /// URI shown in the circle, if any.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn active_source(&self) -> &ImageSource {
        &self.active
    }

    /// The staged upload, when an uploaded file is active.
    pub fn pending_upload(&self) -> Option<&UploadedFile> {
        match &self.active {
            ImageSource::UploadedFile(file) => Some(file),
            ImageSource::ProfilePicture(_) => None,
        }
    }

    /// Switch back to the profile picture, dropping any staged upload.
    pub fn select_profile_picture(&mut self) {
        self.selection += 1;
        self.active = ImageSource::ProfilePicture(self.profile_picture.clone());
        self.preview = self.profile_picture.clone();
    }

    /// Validate a picked file. Nothing changes when validation fails.
    pub fn begin_upload(&mut self, file: UploadedFile) -> Result<PendingUpload, ValidationError> {
        self.policy.validate(&file)?;
        self.selection += 1;
        Ok(PendingUpload {
            file,
            selection: self.selection,
        })
    }

    /// Adopt an encoded upload. Returns `false` if a newer selection has
    /// been made since the upload began.
    pub fn finish_upload(&mut self, encoded: EncodedUpload) -> bool {
        if encoded.selection != self.selection {
            tracing::debug!(file = %encoded.file.name, "Dropping superseded upload");
            return false;
        }
        self.preview = Some(encoded.data_uri);
        self.active = ImageSource::UploadedFile(encoded.file);
        true
    }

    /// Validate, encode and adopt a picked file.
    pub async fn handle_file_selected(
        &mut self,
        file: UploadedFile,
    ) -> Result<(), ValidationError> {
        let pending = self.begin_upload(file)?;
        let encoded = pending.encode().await;
        self.finish_upload(encoded);
        Ok(())
    }
}
