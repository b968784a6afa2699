//! Awaitable image loading from URIs.
//!
//! Supported sources:
//! - `data:<mime>;base64,<payload>` URIs (uploaded previews)
//! - `file://` URIs and bare filesystem paths
//! - `http://` / `https://` URIs, fetched without cookies or credentials

use std::path::PathBuf;

use base64::Engine as _;
use image::DynamicImage;
use ticketshare_common::config::LoaderConfig;

/// Why a single image could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported URI scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    #[error("malformed data URI: {message}")]
    InvalidDataUri { message: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("image is {size} bytes, limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("could not decode image: {message}")]
    Decode { message: String },
}

/// Source of decoded images.
///
/// Implementations must not send credentials: the banner has to stay
/// exportable whatever origin the images come from.
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fetch and decode the image at `uri`.
    async fn load(&self, uri: &str) -> Result<DynamicImage, LoadError>;
}

/// Default loader for data, file and HTTP(S) URIs.
pub struct UriImageLoader {
    http: reqwest::Client,
    max_bytes: u64,
}

impl UriImageLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, LoadError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ticketshare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadError::Http {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            max_bytes: config.max_bytes,
        })
    }

    async fn fetch_bytes(&self, uri: &str) -> Result<Vec<u8>, LoadError> {
        if uri.starts_with("data:") {
            return parse_data_uri(uri).map(|(_, bytes)| bytes);
        }

        match url::Url::parse(uri) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" => self.fetch_http(parsed).await,
                "file" => {
                    let path = parsed
                        .to_file_path()
                        .map_err(|_| LoadError::UnsupportedScheme {
                            scheme: "file (non-local)".to_string(),
                        })?;
                    self.read_file(path).await
                }
                // Windows drive letters parse as one-letter schemes.
                scheme if scheme.len() == 1 => self.read_file(PathBuf::from(uri)).await,
                scheme => Err(LoadError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                }),
            },
            Err(_) => self.read_file(PathBuf::from(uri)).await,
        }
    }

    async fn fetch_http(&self, url: url::Url) -> Result<Vec<u8>, LoadError> {
        let http_err = |e: reqwest::Error| LoadError::Http {
            message: e.to_string(),
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;

        if let Some(len) = response.content_length() {
            self.check_size(len)?;
        }

        let bytes = response.bytes().await.map_err(http_err)?;
        self.check_size(bytes.len() as u64)?;
        Ok(bytes.to_vec())
    }

    async fn read_file(&self, path: PathBuf) -> Result<Vec<u8>, LoadError> {
        let io_err = |path: &PathBuf, source| LoadError::Io {
            path: path.clone(),
            source,
        };
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| io_err(&path, e))?;
        self.check_size(meta.len())?;
        tokio::fs::read(&path).await.map_err(|e| io_err(&path, e))
    }

    fn check_size(&self, size: u64) -> Result<(), LoadError> {
        if size > self.max_bytes {
            return Err(LoadError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ImageLoader for UriImageLoader {
    async fn load(&self, uri: &str) -> Result<DynamicImage, LoadError> {
        tracing::debug!(uri = %truncate_uri(uri), "Loading image");
        let bytes = self.fetch_bytes(uri).await?;
        decode_image(bytes).await
    }
}

/// Decode encoded image bytes on the blocking pool.
pub async fn decode_image(bytes: Vec<u8>) -> Result<DynamicImage, LoadError> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| LoadError::Decode {
            message: e.to_string(),
        })?
        .map_err(|e| LoadError::Decode {
            message: e.to_string(),
        })
}

/// Split a base64 `data:` URI into its MIME type and payload.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>), LoadError> {
    let invalid = |message: &str| LoadError::InvalidDataUri {
        message: message.to_string(),
    };

    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| invalid("missing data: prefix"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid("missing ',' separator"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("only base64 payloads are supported"))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| LoadError::InvalidDataUri {
            message: e.to_string(),
        })?;

    let mime = if mime.is_empty() {
        "text/plain".to_string()
    } else {
        mime.to_string()
    };
    Ok((mime, bytes))
}

/// Encode bytes as a base64 `data:` URI.
pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime_type};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Shorten data URIs for log output.
pub fn truncate_uri(uri: &str) -> &str {
    if uri.starts_with("data:") {
        let end = uri.find(',').unwrap_or(uri.len());
        &uri[..end]
    } else {
        uri
    }
}
