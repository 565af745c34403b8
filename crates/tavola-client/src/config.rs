//! # Client Configuration
//!
//! Configuration for the backend client and the local store location.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TAVOLA_API_URL=https://api.example.com                             │
//! │     TAVOLA_PER_PAGE=12                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tavola/config.toml (Linux)                               │
//! │     ~/Library/Application Support/com.tavola.client/config.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5000, 9 per page, platform data dir               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.example.com"
//! timeout_secs = 15
//! max_retries = 3
//! initial_backoff_ms = 250
//! max_backoff_secs = 5
//!
//! [listing]
//! per_page = 9
//! sort = "name-asc"
//!
//! [storage]
//! database_path = "/var/lib/tavola/tavola.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use tavola_core::{SortOption, DEFAULT_PER_PAGE, PER_PAGE_OPTIONS};

use crate::error::{ClientError, ClientResult};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "tavola";
const APPLICATION: &str = "client";

/// Platform directories for config and data.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

// =============================================================================
// API Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend root; endpoint paths (`/api/...`) are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for idempotent GETs. 0 disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_timeout() -> u64 {
    15
}
fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff() -> u64 {
    250
}
fn default_max_backoff() -> u64 {
    5
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }
}

// =============================================================================
// Listing Settings
// =============================================================================

/// Initial state of the restaurant list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSettings {
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default)]
    pub sort: SortOption,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for ListingSettings {
    fn default() -> Self {
        ListingSettings {
            per_page: default_per_page(),
            sort: SortOption::default(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file for the cart and session. Defaults to the platform
    /// data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Client Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub listing: ListingSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if !PER_PAGE_OPTIONS.contains(&self.listing.per_page) {
            return Err(ClientError::InvalidConfig(format!(
                "per_page must be one of {:?}, got {}",
                PER_PAGE_OPTIONS, self.listing.per_page
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `TAVOLA_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TAVOLA_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("TAVOLA_API_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid TAVOLA_API_TIMEOUT_SECS"),
            }
        }

        if let Some(retries) = lookup("TAVOLA_MAX_RETRIES") {
            match retries.parse() {
                Ok(r) => self.api.max_retries = r,
                Err(_) => warn!(value = %retries, "Ignoring invalid TAVOLA_MAX_RETRIES"),
            }
        }

        if let Some(per_page) = lookup("TAVOLA_PER_PAGE") {
            match per_page.parse() {
                Ok(p) => self.listing.per_page = p,
                Err(_) => warn!(value = %per_page, "Ignoring invalid TAVOLA_PER_PAGE"),
            }
        }

        if let Some(sort) = lookup("TAVOLA_SORT") {
            match sort.parse() {
                Ok(s) => self.listing.sort = s,
                Err(_) => warn!(value = %sort, "Ignoring invalid TAVOLA_SORT"),
            }
        }

        if let Some(path) = lookup("TAVOLA_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL, always ending in `/` so relative joins keep any
    /// path prefix.
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut raw = self.api.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidUrl(format!(
                "API URL must use http or https, got: {}",
                other
            ))),
        }
    }

    /// Where the local store lives.
    pub fn database_path(&self) -> ClientResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join("tavola.db"))
            .ok_or_else(|| {
                ClientError::InvalidConfig(
                    "no home directory found; set TAVOLA_DATABASE_PATH".into(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.listing.per_page, 9);
        assert_eq!(config.listing.sort, SortOption::NameAsc);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api.base_url = "https://api.example.com/v2".into();
        config.listing.per_page = 10;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));

        config.listing.per_page = 24;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let mut config = ClientConfig::default();
        config.api.base_url = "https://example.com/backend".into();

        let base = config.base_url().unwrap();
        assert_eq!(
            base.join("api/restaurants").unwrap().as_str(),
            "https://example.com/backend/api/restaurants"
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TAVOLA_API_URL", "https://staging.example.com"),
            ("TAVOLA_MAX_RETRIES", "0"),
            ("TAVOLA_PER_PAGE", "not-a-number"),
            ("TAVOLA_SORT", "rating-desc"),
            ("TAVOLA_DATABASE_PATH", "/tmp/t.db"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://staging.example.com");
        assert_eq!(config.api.max_retries, 0);
        assert_eq!(config.listing.per_page, 9);
        assert_eq!(config.listing.sort, SortOption::RatingDesc);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/t.db"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"

            [listing]
            sort = "name-desc"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.listing.per_page, 9);
        assert_eq!(config.listing.sort, SortOption::NameDesc);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("tavola-config-{}", uuid::Uuid::new_v4()))
            .join("config.toml");

        let mut config = ClientConfig::default();
        config.api.base_url = "https://api.example.com".into();
        config.listing.per_page = 12;
        config.save(Some(path.clone())).unwrap();

        let toml_str = std::fs::read_to_string(&path).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[listing]"));

        let loaded: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
