//! Client configuration.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when `ADEX_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://adex-trade-backend.onrender.com/api";

/// Token refresh endpoint, relative to the base URL.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";

/// Transport timeout applied when a request sets none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while building a configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("invalid base URL {value}: {message}")]
    InvalidBaseUrl {
        /// Rejected value
        value: String,
        /// Parser message
        message: String,
    },

    /// A numeric setting could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Settings for the session HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: Url,
    /// Path of the token refresh endpoint
    pub refresh_path: String,
    /// Default transport timeout
    pub timeout: Duration,
    /// `User-Agent` sent by the transport
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a configuration for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("adex-client/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Builds a configuration from `ADEX_API_URL` and `ADEX_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("ADEX_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(value) = lookup("ADEX_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    name: "ADEX_TIMEOUT_SECS",
                    value,
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Overrides the refresh endpoint path.
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Overrides the default timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!()),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("adex-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            message: "scheme must be http or https".to_string(),
        });
    }
    Ok(url)
}
