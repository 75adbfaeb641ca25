use crate::error::{FsError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_PATTERN: &str = r"\.zip$";

/// The `[handlers.zip]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipHandlerConfig {
    /// Whether archives are browsed at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Regex a candidate selector must match before it is probed.
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Share built indexes between archive mounts.
    #[serde(default)]
    pub cache: bool,
}

impl Default for ZipHandlerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            pattern: default_pattern(),
            cache: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

/// The `[handlers]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlersConfig {
    #[serde(default)]
    pub zip: ZipHandlerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Document root served by the real filesystem.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub handlers: HandlersConfig,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            handlers: HandlersConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from TOML bytes.
    pub fn from_toml(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| FsError::Config(format!("Invalid UTF-8: {}", e)))?;
        toml::from_str(text).map_err(|e| FsError::Config(e.to_string()))
    }

    /// Read and parse a configuration file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_toml(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let toml_str = r#"
root = "/srv/gopher"

[handlers.zip]
enabled = false
pattern = "\\.(zip|jar)$"
cache = true
"#;
        let config = ServerConfig::from_toml(toml_str.as_bytes()).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/gopher"));
        assert!(!config.handlers.zip.enabled);
        assert_eq!(config.handlers.zip.pattern, r"\.(zip|jar)$");
        assert!(config.handlers.zip.cache);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = ServerConfig::from_toml(b"root = \"/tmp\"").unwrap();
        assert_eq!(config.handlers.zip, ZipHandlerConfig::default());
        assert!(config.handlers.zip.enabled);
        assert_eq!(config.handlers.zip.pattern, r"\.zip$");

        let config = ServerConfig::from_toml(b"[handlers.zip]\nenabled = true\n").unwrap();
        assert_eq!(config.root, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml(b"root = [").unwrap_err();
        assert!(matches!(err, FsError::Config(_)));
    }
}
