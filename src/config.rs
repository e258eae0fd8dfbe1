//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tunebot\config.toml
//! - macOS: ~/Library/Application Support/tunebot/config.toml
//! - Linux: ~/.config/tunebot/config.toml
//!
//! A different file can be passed with `--config`. Credentials given on the
//! command line or through the environment override the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog API credentials
    pub credentials: Credentials,

    /// Catalog endpoints and limits
    pub catalog: CatalogConfig,

    /// Database settings
    pub database: DatabaseConfig,
}

/// Catalog API credentials (client-credentials flow)
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    /// Replace fields with the given overrides when present.
    pub fn merge(&mut self, client_id: Option<&str>, client_secret: Option<&str>) {
        if let Some(id) = client_id {
            self.client_id = Some(id.to_string());
        }
        if let Some(secret) = client_secret {
            self.client_secret = Some(secret.to_string());
        }
    }

    /// Both halves of the credential pair, if configured and non-empty.
    pub fn pair(&self) -> Option<(&str, &str)> {
        let id = self.client_id.as_deref().filter(|s| !s.is_empty())?;
        let secret = self.client_secret.as_deref().filter(|s| !s.is_empty())?;
        Some((id, secret))
    }
}

/// Catalog endpoints and request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// OAuth token endpoint
    pub token_url: String,

    /// Base URL of the Web API (no trailing slash)
    pub api_base: String,

    /// Maximum token lifetime in seconds
    pub token_ttl_secs: u64,

    /// Results per `/search` command
    pub search_limit: u32,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            api_base: "https://api.spotify.com/v1".to_string(),
            token_ttl_secs: 3600,
            search_limit: 5,
            timeout_secs: 10,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file path
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::db::DEFAULT_DB_NAME),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunebot"))
}

/// Get the full path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from `path`, or from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load(path: Option<&Path>) -> Config {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[database]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[credentials]
client_id = "my-id"

[catalog]
search_limit = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.credentials.client_id.as_deref(), Some("my-id"));
        assert!(config.credentials.client_secret.is_none());
        assert_eq!(config.catalog.search_limit, 3);
        assert_eq!(config.catalog.token_ttl_secs, 3600);
        assert_eq!(config.database.path, PathBuf::from("tunebot.db"));
    }

    #[test]
    fn test_credentials_merge_and_pair() {
        let mut creds = Credentials {
            client_id: Some("file-id".to_string()),
            client_secret: Some(String::new()),
        };
        assert!(creds.pair().is_none());

        creds.merge(None, Some("env-secret"));
        assert_eq!(creds.pair(), Some(("file-id", "env-secret")));

        creds.merge(Some("cli-id"), None);
        assert_eq!(creds.pair(), Some(("cli-id", "env-secret")));
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = Credentials {
            client_id: Some("id".to_string()),
            client_secret: Some("hunter2".to_string()),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.catalog.search_limit = 8;
        config.database.path = PathBuf::from("/data/bot.db");
        save(&config, &path).unwrap();

        let loaded = load(Some(&path));
        assert_eq!(loaded.catalog.search_limit, 8);
        assert_eq!(loaded.database.path, PathBuf::from("/data/bot.db"));
    }

    #[test]
    fn test_load_missing_or_broken_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load(Some(&dir.path().join("nope.toml")));
        assert_eq!(missing.catalog.search_limit, 5);

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "this is = = not toml").unwrap();
        assert_eq!(load(Some(&broken)).catalog.timeout_secs, 10);
    }
}
