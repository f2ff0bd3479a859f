//! Configuration management for the guji index client
//!
//! Settings are loaded from an optional TOML file with zero-config defaults.
//! Only transport tuning, timeouts and logging are configurable; mirror URLs
//! and repository names are fixed constants.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, FetchConfig};
use crate::constants::{config as config_files, http, limits, logging};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Per-attempt fetch timeouts
    pub fetch: FetchConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP keep-alive interval (absent = disabled)
    #[serde(with = "humantime_serde")]
    pub tcp_keepalive: Option<Duration>,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout (absent = no timeout)
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Upper bound for any single request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            tcp_keepalive: Some(Duration::from_secs(30)),
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            use_system_proxy: true,
        }
    }
}

/// TOML-friendly fetch timeouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfigToml {
    /// Timeout for every index mirror attempt
    #[serde(with = "humantime_serde")]
    pub index_timeout: Duration,
    /// Timeout for the primary content mirror
    #[serde(with = "humantime_serde")]
    pub content_primary_timeout: Duration,
    /// Timeout for the secondary content mirror
    #[serde(with = "humantime_serde")]
    pub content_fallback_timeout: Duration,
}

impl Default for FetchConfigToml {
    fn default() -> Self {
        Self {
            index_timeout: limits::INDEX_TIMEOUT,
            content_primary_timeout: limits::CONTENT_PRIMARY_TIMEOUT,
            content_fallback_timeout: limits::CONTENT_FALLBACK_TIMEOUT,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for this crate: error, warn, info, debug or trace
    pub level: String,
    /// Include the event target in log lines
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
            with_target: false,
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (ClientConfig, FetchConfig) {
        (
            self.client.to_runtime_config(),
            self.fetch.to_runtime_config(),
        )
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used if none exists.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would only fail later at client construction
    pub fn validate(&self) -> ConfigResult<()> {
        if self.client.rate_limit_rps == 0 {
            return Err(ConfigError::invalid(
                "client.rate_limit_rps",
                0,
                "Rate limit must be non-zero",
            ));
        }

        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| {
                ConfigError::invalid(
                    "logging.level",
                    &self.logging.level,
                    "Expected one of error, warn, info, debug, trace",
                )
            })?;

        let fetch = self.fetch.to_runtime_config();
        fetch.validate()?;

        // the request cap must not pre-empt the per-attempt timeouts
        let longest = fetch.longest_timeout();
        if self.client.request_timeout <= longest {
            return Err(ConfigError::invalid(
                "client.request_timeout",
                format!("{:?}", self.client.request_timeout),
                format!("Must be greater than the longest fetch timeout ({:?})", longest),
            ));
        }
        Ok(())
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config_files::LOCAL_CONFIG_FILE)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(config_files::APP_DIR).join(config_files::CONFIG_FILE))
    }

    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            tcp_keepalive: self.tcp_keepalive,
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout,
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            rate_limit_rps: self.rate_limit_rps,
            use_system_proxy: self.use_system_proxy,
        }
    }
}

impl FetchConfigToml {
    /// Convert to runtime FetchConfig
    pub fn to_runtime_config(&self) -> FetchConfig {
        FetchConfig {
            index_timeout: self.index_timeout,
            content_primary_timeout: self.content_primary_timeout,
            content_fallback_timeout: self.content_fallback_timeout,
        }
    }
}
