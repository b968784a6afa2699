//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Image loading behaviour.
    pub loader: LoaderConfig,

    /// Where downloaded banners land.
    pub export: ExportSettings,

    /// Name-band text rendering.
    pub text: TextConfig,

    /// Share fallback settings.
    pub share: ShareSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Image loader limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Per-image load timeout in milliseconds.
    pub timeout_ms: u64,

    /// Largest encoded image accepted from any source, in bytes.
    pub max_bytes: u64,
}

/// Download destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory that receives `<slug>-ticket.png` files.
    pub downloads_dir: PathBuf,
}

/// Font selection for the name band.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Explicit TrueType font. When unset, well-known system fonts are tried in order.
    pub font_path: Option<PathBuf>,
}

/// Clipboard fallback payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
    /// Page URL copied when native sharing is unavailable.
    pub page_url: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ticketshare=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            max_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl LoaderConfig {
    /// Load timeout as a [`std::time::Duration`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms.max(1))
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("ticketshare").join("config.json")
}

/// Default downloads directory.
fn default_downloads_dir() -> PathBuf {
    std::env::var("XDG_DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("Downloads"))
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.loader.timeout_ms, 15_000);
        assert_eq!(config.loader.timeout(), std::time::Duration::from_secs(15));
        assert_eq!(config.logging.level, "info");
        assert!(config.text.font_path.is_none());
        assert!(config.share.page_url.is_none());
    }

    #[test]
    fn partial_config_fills_missing_sections() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{ "loader": { "timeout_ms": 500 } }"#).unwrap();
        assert_eq!(parsed.loader.timeout_ms, 500);
        assert_eq!(parsed.loader.max_bytes, 25 * 1024 * 1024);
        assert!(!parsed.logging.json);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let loader = LoaderConfig {
            timeout_ms: 0,
            ..LoaderConfig::default()
        };
        assert_eq!(loader.timeout(), std::time::Duration::from_millis(1));
    }
}
