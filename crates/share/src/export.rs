//! Exposing banners as object URLs and downloading them.

use std::path::{Path, PathBuf};

use ticketshare_banner_model::share::{download_filename, PNG_MIME};
use ticketshare_common::error::TicketshareError;

use crate::object_url::{ObjectUrl, ObjectUrlRegistry};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("object URL is not live: {url}")]
    UnknownUrl { url: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<ExportError> for TicketshareError {
    fn from(err: ExportError) -> Self {
        TicketshareError::export(err.to_string())
    }
}

/// Registers encoded banners and saves them as downloads.
#[derive(Debug, Clone)]
pub struct ArtifactExporter {
    registry: ObjectUrlRegistry,
    downloads_dir: PathBuf,
}

impl ArtifactExporter {
    pub fn new(registry: ObjectUrlRegistry, downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            downloads_dir: downloads_dir.into(),
        }
    }

    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Register PNG bytes under a new object URL.
    pub fn export_blob(&self, png: Vec<u8>) -> ObjectUrl {
        self.registry.register(png, PNG_MIME)
    }

    /// Release an object URL. Safe to call more than once.
    pub fn revoke(&self, url: &ObjectUrl) {
        self.registry.revoke(url);
    }

    /// Save the blob behind `url` as `<slug(title)>-ticket.png` in the
    /// downloads directory, replacing any earlier file of that name.
    pub async fn download(
        &self,
        url: &ObjectUrl,
        event_title: &str,
    ) -> Result<PathBuf, ExportError> {
        let blob = self
            .registry
            .resolve(url)
            .ok_or_else(|| ExportError::UnknownUrl {
                url: url.to_string(),
            })?;

        let io_err = |path: &Path, source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };

        tokio::fs::create_dir_all(&self.downloads_dir)
            .await
            .map_err(|e| io_err(&self.downloads_dir, e))?;

        let target = self.downloads_dir.join(download_filename(event_title));
        let partial = target.with_extension("png.part");
        tokio::fs::write(&partial, &*blob.bytes)
            .await
            .map_err(|e| io_err(&partial, e))?;
        tokio::fs::rename(&partial, &target)
            .await
            .map_err(|e| io_err(&target, e))?;

        tracing::info!(path = %target.display(), bytes = blob.bytes.len(), "Banner downloaded");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ticketshare_{name}_{}", uuid::Uuid::new_v4()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn download_writes_sanitized_filename() {
        let dir = temp_dir("download");
        let exporter = ArtifactExporter::new(ObjectUrlRegistry::new(), &dir);
        let url = exporter.export_blob(vec![0x89, b'P', b'N', b'G']);

        let path = exporter.download(&url, "My Event! 2025").await.unwrap();
        assert_eq!(path, dir.join("My-Event--2025-ticket.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);
        assert!(!dir.join("My-Event--2025-ticket.png.part").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn download_of_revoked_url_fails() {
        let dir = temp_dir("revoked");
        let exporter = ArtifactExporter::new(ObjectUrlRegistry::new(), &dir);
        let url = exporter.export_blob(vec![1]);
        exporter.revoke(&url);
        exporter.revoke(&url);

        let err = exporter.download(&url, "Gala").await.unwrap_err();
        assert!(matches!(err, ExportError::UnknownUrl { .. }));
        assert!(!dir.join("Gala-ticket.png").exists());
    }

    #[tokio::test]
    async fn repeated_download_overwrites() {
        let dir = temp_dir("overwrite");
        let exporter = ArtifactExporter::new(ObjectUrlRegistry::new(), &dir);
        let first = exporter.export_blob(vec![1]);
        let second = exporter.export_blob(vec![2]);

        exporter.download(&first, "Gala").await.unwrap();
        let path = exporter.download(&second, "Gala").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![2]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
