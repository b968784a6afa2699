//! Process-local object URLs.
//!
//! An object URL (`blob:ticketshare/<uuid>`) names an in-memory blob so it
//! can be passed around like any other URI. Entries live until revoked.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

/// Address of a registered blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub const PREFIX: &'static str = "blob:ticketshare/";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binary payload with its MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Arc<[u8]>,
    pub mime_type: String,
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("mime_type", &self.mime_type)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

#[derive(Debug)]
struct Entry {
    blob: Blob,
    created_at: DateTime<Utc>,
}

/// Shared registry of live object URLs. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrlRegistry {
    entries: Arc<Mutex<HashMap<ObjectUrl, Entry>>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and return a fresh URL for them.
    pub fn register(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> ObjectUrl {
        let url = ObjectUrl(format!("{}{}", ObjectUrl::PREFIX, uuid::Uuid::new_v4()));
        let entry = Entry {
            blob: Blob {
                bytes: bytes.into(),
                mime_type: mime_type.into(),
            },
            created_at: Utc::now(),
        };
        tracing::debug!(url = %url, bytes = entry.blob.bytes.len(), "Registered object URL");
        self.lock().insert(url.clone(), entry);
        url
    }

    /// Look up a live URL.
    pub fn resolve(&self, url: &ObjectUrl) -> Option<Blob> {
        self.lock().get(url).map(|e| e.blob.clone())
    }

    /// Release a URL. Returns whether it was still live.
    pub fn revoke(&self, url: &ObjectUrl) -> bool {
        match self.lock().remove(url) {
            Some(entry) => {
                let age_ms = (Utc::now() - entry.created_at).num_milliseconds();
                tracing::debug!(url = %url, age_ms, "Revoked object URL");
                true
            }
            None => false,
        }
    }

    /// Number of live URLs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ObjectUrl, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
