//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (and an optional `.env` file), with defaults for
//! everything. [`Config::validate`] must pass before the server starts.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Default STAC API base URL.
pub const DEFAULT_STAC_API_URL: &str = "http://localhost:8000";

/// Default STAC API request timeout in milliseconds.
pub const DEFAULT_STAC_API_TIMEOUT_MS: i64 = 30_000;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Upstream STAC API connection settings.
    pub stac: StacConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Deployment mode (e.g. "development", "production").
    pub environment: String,
}

/// STAC API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StacConfig {
    /// Base URL of the STAC API.
    pub api_url: String,

    /// Request timeout in milliseconds. Kept signed so that invalid
    /// values survive loading and are rejected by validation.
    pub timeout_ms: i64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,

    /// Whether to colorize log output.
    pub ansi: bool,
}

impl StacConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.timeout_ms).unwrap_or(0))
    }

    /// Check the URL and timeout.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::config("STAC_API_URL is required"));
        }

        if self.timeout_ms <= 0 {
            return Err(Error::config("STAC_API_TIMEOUT must be positive"));
        }

        let invalid = || Error::config(format!("Invalid STAC_API_URL format: {}", self.api_url));
        let url = url::Url::parse(&self.api_url).map_err(|_| invalid())?;
        // `localhost:8000` parses with `localhost` as the scheme.
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid());
        }

        Ok(())
    }
}

impl Default for StacConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_STAC_API_URL.to_string(),
            timeout_ms: DEFAULT_STAC_API_TIMEOUT_MS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "stac-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                environment: "development".to_string(),
            },
            stac: StacConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
                ansi: true,
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `STAC_API_URL`, `STAC_API_TIMEOUT` (ms),
    /// `LOG_LEVEL`, `APP_ENV`, `MCP_SERVER_NAME`, plus the transport
    /// variables read by [`TransportConfig::from_env`]. Values are not
    /// checked here; call [`Config::validate`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(environment) = std::env::var("APP_ENV") {
            config.server.environment = environment;
        }
        if config.is_production() {
            config.logging.ansi = false;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(api_url) = std::env::var("STAC_API_URL") {
            config.stac.api_url = api_url;
        }

        if let Ok(timeout) = std::env::var("STAC_API_TIMEOUT") {
            // Unparsable values become 0 so validation rejects them.
            config.stac.timeout_ms = timeout.trim().parse().unwrap_or(0);
        }

        config.transport = TransportConfig::from_env();

        config
    }

    /// Validate the configuration. Failures are fatal at startup.
    pub fn validate(&self) -> Result<()> {
        self.stac.validate()?;
        info!(
            "Configuration valid: STAC API at {} (timeout {} ms, {} mode)",
            self.stac.api_url, self.stac.timeout_ms, self.server.environment
        );
        Ok(())
    }

    /// Whether the server runs in production mode.
    pub fn is_production(&self) -> bool {
        self.server.environment.eq_ignore_ascii_case("production")
    }
}
