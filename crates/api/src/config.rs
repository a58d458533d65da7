use std::time::Duration;

use chrono_tz::Tz;
use teleport_client::TeleportClient;

/// Extra time the `/video` handler allows beyond the upstream video timeout.
const VIDEO_TIMEOUT_GRACE_SECS: u64 = 5;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for serving the Verbier webcam
/// locally. Override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Image handler timeout in seconds (default: `35`). Must exceed
    /// `teleport_timeout_secs` so upstream timeouts surface as 504.
    pub request_timeout_secs: u64,
    /// Feed served by the image routes.
    pub feed_id: String,
    /// Zone in which `hour`/`minute`/`date` query parameters are interpreted.
    pub timezone: Tz,
    /// teleport.io image API base URL.
    pub teleport_api_url: String,
    /// teleport.io video base URL.
    pub teleport_video_url: String,
    /// Upstream timeout for image requests, in seconds (default: `30`).
    pub teleport_timeout_secs: u64,
    /// Upstream timeout for video requests, in seconds (default: `300`).
    pub teleport_video_timeout_secs: u64,
}

/// A configuration variable holds a value that cannot be used.
#[derive(Debug, thiserror::Error)]
#[error("{var} is invalid: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub reason: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 35,
            feed_id: "fe5nsqhtejqi".into(),
            timezone: chrono_tz::Europe::Zurich,
            teleport_api_url: teleport_client::models::DEFAULT_API_URL.into(),
            teleport_video_url: teleport_client::models::DEFAULT_VIDEO_URL.into(),
            teleport_timeout_secs: 30,
            teleport_video_timeout_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                     |
    /// |-------------------------------|-----------------------------|
    /// | `HOST`                        | `0.0.0.0`                   |
    /// | `PORT`                        | `3001`                      |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`        | `35`                        |
    /// | `FEED_ID`                     | `fe5nsqhtejqi`              |
    /// | `FEED_TIMEZONE`               | `Europe/Zurich`             |
    /// | `TELEPORT_API_URL`            | `https://www.teleport.io`   |
    /// | `TELEPORT_VIDEO_URL`          | `https://video.teleport.io` |
    /// | `TELEPORT_TIMEOUT_SECS`       | `30`                        |
    /// | `TELEPORT_VIDEO_TIMEOUT_SECS` | `300`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let timezone = match lookup("FEED_TIMEZONE") {
            Some(raw) => raw.parse::<Tz>().map_err(|e| ConfigError {
                var: "FEED_TIMEZONE",
                reason: e.to_string(),
            })?,
            None => defaults.timezone,
        };

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            cors_origins,
            request_timeout_secs: parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            feed_id: lookup("FEED_ID").unwrap_or(defaults.feed_id),
            timezone,
            teleport_api_url: lookup("TELEPORT_API_URL").unwrap_or(defaults.teleport_api_url),
            teleport_video_url: lookup("TELEPORT_VIDEO_URL")
                .unwrap_or(defaults.teleport_video_url),
            teleport_timeout_secs: parse_var(
                &lookup,
                "TELEPORT_TIMEOUT_SECS",
                defaults.teleport_timeout_secs,
            )?,
            teleport_video_timeout_secs: parse_var(
                &lookup,
                "TELEPORT_VIDEO_TIMEOUT_SECS",
                defaults.teleport_video_timeout_secs,
            )?,
        };

        if config.request_timeout_secs <= config.teleport_timeout_secs {
            return Err(ConfigError {
                var: "REQUEST_TIMEOUT_SECS",
                reason: format!(
                    "must be greater than TELEPORT_TIMEOUT_SECS ({})",
                    config.teleport_timeout_secs
                ),
            });
        }

        Ok(config)
    }

    /// Handler timeout for `/video`: the upstream video timeout plus grace.
    pub fn video_request_timeout_secs(&self) -> u64 {
        self.teleport_video_timeout_secs + VIDEO_TIMEOUT_GRACE_SECS
    }

    /// Client configuration for the upstream teleport.io hosts.
    pub fn teleport_client(&self) -> TeleportClient {
        TeleportClient::new()
            .with_api_url(&self.teleport_api_url)
            .with_video_url(&self.teleport_video_url)
            .with_timeout(Duration::from_secs(self.teleport_timeout_secs))
            .with_video_timeout(Duration::from_secs(self.teleport_video_timeout_secs))
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
