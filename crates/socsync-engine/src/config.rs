//! # Engine Configuration
//!
//! Configuration management for the sync engine and server.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SOCSYNC_BASE_URL=https://ws1.soc.com.br/WebSoc/exportadados        │
//! │     SOCSYNC_COMPANY_CODE=123456                                        │
//! │     SOCSYNC_KEY_COMPANIES=abc...                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/socsync/socsync.toml (Linux)                             │
//! │     ~/Library/Application Support/com.socsync.server/... (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Latin-1 charset, local SQLite file, 127.0.0.1:3000                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # socsync.toml
//! [remote]
//! base_url = "https://ws1.soc.com.br/WebSoc/exportadados"
//! company_code = "123456"
//! charset = "latin1"
//!
//! [remote.api_keys]
//! companies = "key-for-200267"
//! units = "key-for-200266"
//! sectors = "key-for-200268"
//! jobs = "key-for-200265"
//! hierarchy = "key-for-198531"
//!
//! [database]
//! path = "socsync.db"
//!
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::decode::Charset;
use crate::error::{EngineError, EngineResult};

// =============================================================================
// Remote API Settings
// =============================================================================

/// Per-export access keys for the remote endpoints.
///
/// Each export endpoint on the legacy system is provisioned with its own
/// access key, so one credential leaking does not expose the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    /// Key for the company export.
    #[serde(default)]
    pub companies: String,

    /// Key for the unit export.
    #[serde(default)]
    pub units: String,

    /// Key for the sector export.
    #[serde(default)]
    pub sectors: String,

    /// Key for the job export.
    #[serde(default)]
    pub jobs: String,

    /// Key for the organizational hierarchy export.
    #[serde(default)]
    pub hierarchy: String,
}

impl ApiKeys {
    /// Returns true if every endpoint has a key configured.
    pub fn is_complete(&self) -> bool {
        !self.companies.is_empty()
            && !self.units.is_empty()
            && !self.sectors.is_empty()
            && !self.jobs.is_empty()
            && !self.hierarchy.is_empty()
    }
}

/// Connection settings for the remote SOC API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of the export endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Account-level company code sent with every request.
    #[serde(default)]
    pub company_code: String,

    /// Character set of the response bodies.
    #[serde(default)]
    pub charset: Charset,

    /// Per-endpoint access keys.
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// Request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://ws1.soc.com.br/WebSoc/exportadados".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            base_url: default_base_url(),
            company_code: String::new(),
            charset: Charset::default(),
            api_keys: ApiKeys::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Database Settings
// =============================================================================

/// Local database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Maximum connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("socsync.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Server Settings
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote SOC API settings.
    #[serde(default)]
    pub remote: RemoteSettings,

    /// Local database settings.
    #[serde(default)]
    pub database: DatabaseSettings,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSettings,
}

impl SyncConfig {
    /// Creates a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (socsync.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        // Try to load from config file
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.remote.base_url.is_empty() {
            return Err(EngineError::InvalidConfig(
                "remote.base_url must not be empty".into(),
            ));
        }

        if !self.remote.base_url.starts_with("http://")
            && !self.remote.base_url.starts_with("https://")
        {
            return Err(EngineError::InvalidConfig(format!(
                "remote.base_url must start with http:// or https://, got: {}",
                self.remote.base_url
            )));
        }

        if self.remote.company_code.is_empty() {
            return Err(EngineError::InvalidConfig(
                "remote.company_code must not be empty".into(),
            ));
        }

        if !self.remote.api_keys.is_complete() {
            return Err(EngineError::InvalidConfig(
                "remote.api_keys must provide a key for every endpoint".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(EngineError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SOCSYNC_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.remote.base_url = url;
        }

        if let Ok(code) = std::env::var("SOCSYNC_COMPANY_CODE") {
            self.remote.company_code = code;
        }

        if let Ok(charset) = std::env::var("SOCSYNC_CHARSET") {
            match charset.parse() {
                Ok(parsed) => self.remote.charset = parsed,
                Err(_) => warn!(charset = %charset, "Unknown charset in environment"),
            }
        }

        if let Ok(key) = std::env::var("SOCSYNC_KEY_COMPANIES") {
            self.remote.api_keys.companies = key;
        }
        if let Ok(key) = std::env::var("SOCSYNC_KEY_UNITS") {
            self.remote.api_keys.units = key;
        }
        if let Ok(key) = std::env::var("SOCSYNC_KEY_SECTORS") {
            self.remote.api_keys.sectors = key;
        }
        if let Ok(key) = std::env::var("SOCSYNC_KEY_JOBS") {
            self.remote.api_keys.jobs = key;
        }
        if let Ok(key) = std::env::var("SOCSYNC_KEY_HIERARCHY") {
            self.remote.api_keys.hierarchy = key;
        }

        if let Ok(path) = std::env::var("SOCSYNC_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Ok(addr) = std::env::var("SOCSYNC_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Ok(port) = std::env::var("SOCSYNC_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding server port from environment");
                self.server.port = p;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "socsync", "server").map(|dirs| {
            let config_dir = dirs.config_dir();
            config_dir.join("socsync.toml")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> SyncConfig {
        let mut config = SyncConfig::default();
        config.remote.company_code = "123456".to_string();
        config.remote.api_keys = ApiKeys {
            companies: "k1".into(),
            units: "k2".into(),
            sectors: "k3".into(),
            jobs: "k4".into(),
            hierarchy: "k5".into(),
        };
        config
    }

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.remote.charset, Charset::Latin1);
        assert_eq!(config.server.port, 3000);
        assert!(config.remote.base_url.starts_with("https://"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = complete_config();
        assert!(config.validate().is_ok());

        // Missing company code should fail
        config.remote.company_code = String::new();
        assert!(config.validate().is_err());

        // Missing a single API key should fail
        let mut config = complete_config();
        config.remote.api_keys.hierarchy = String::new();
        assert!(config.validate().is_err());

        // Non-HTTP base URL should fail
        let mut config = complete_config();
        config.remote.base_url = "ftp://soc.example".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = complete_config();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[remote]"));
        assert!(toml_str.contains("[remote.api_keys]"));
        assert!(toml_str.contains("[server]"));

        let parsed: SyncConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.remote.company_code, "123456");
        assert!(parsed.remote.api_keys.is_complete());
    }
}
