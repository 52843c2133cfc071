//! Process configuration, read once at startup.
//!
//! The resulting [`RenderConfig`] is immutable and handed to
//! [`RenderClient::new`](crate::client::RenderClient::new); tool logic never
//! reads the environment itself.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://quickchart.io";
pub const DEFAULT_TIMEOUT_SECS: f64 = 20.0;

pub const ENV_BASE_URL: &str = "QUICKCHART_BASE_URL";
pub const ENV_API_KEY: &str = "QUICKCHART_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "QUICKCHART_TIMEOUT_SECONDS";
pub const ENV_MIME_SOURCE: &str = "QUICKCHART_MIME_SOURCE";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("QUICKCHART_BASE_URL must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("QUICKCHART_TIMEOUT_SECONDS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),

    #[error("QUICKCHART_MIME_SOURCE must be \"response\" or \"format\", got {0:?}")]
    InvalidMimeSource(String),
}

/// Where the mime type of a rendered image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MimeSource {
    /// Use the response `Content-Type`, falling back to the requested format
    /// when the header is missing or generic.
    #[default]
    Response,
    /// Always derive the mime type from the requested format.
    Format,
}

impl FromStr for MimeSource {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "response" | "header" | "content-type" => Ok(Self::Response),
            "format" | "requested" => Ok(Self::Format),
            _ => Err(ConfigError::InvalidMimeSource(input.to_string())),
        }
    }
}

/// Read-only settings for the Request Adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Sent as `X-QuickChart-Api-Key` when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub mime_source: MimeSource,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            mime_source: MimeSource::default(),
        }
    }
}

impl RenderConfig {
    /// Build a config pointing at `base_url` with defaults for everything else.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        let api_key = lookup(ENV_API_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let timeout = match lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
        };

        let mime_source = match lookup(ENV_MIME_SOURCE).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.parse()?,
            None => MimeSource::default(),
        };

        Ok(Self {
            base_url,
            api_key,
            timeout,
            mime_source,
        })
    }

    /// Join the base URL and an absolute path such as `/chart`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed.split("://").nth(1).is_some_and(|rest| !rest.is_empty());
    if has_scheme && has_host {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidBaseUrl(raw.to_string()))
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidTimeout(raw.to_string()));
    }
    Ok(Duration::from_secs_f64(secs))
}
