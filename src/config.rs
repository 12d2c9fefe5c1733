use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// The API base URL used when `BAGGAGE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
/// The session file used when `BAGGAGE_SESSION_FILE` is not set.
pub const DEFAULT_SESSION_FILE: &str = ".baggage-session.json";
/// The request timeout used when `BAGGAGE_HTTP_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The client's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The base URL of the tracking API, without a trailing slash.
    pub api_url: String,
    /// Where the session tokens and cached user are persisted.
    pub session_file: PathBuf,
    /// The timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let timeout_secs: u64 = env::var("BAGGAGE_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .context("Invalid BAGGAGE_HTTP_TIMEOUT_SECS")?;

        if timeout_secs == 0 {
            anyhow::bail!("BAGGAGE_HTTP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            api_url: normalize_base_url(
                &env::var("BAGGAGE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ),
            session_file: env::var("BAGGAGE_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE)),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Overrides the API base URL.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_base_url(api_url);
        self
    }

    /// Overrides the session file location.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

/// Trims whitespace and trailing slashes so paths can be appended directly.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(
            normalize_base_url(" http://localhost:8000/api/ "),
            "http://localhost:8000/api"
        );
        let config = Config::default().with_api_url("https://bags.example.com/api//");
        assert_eq!(config.api_url, "https://bags.example.com/api");
    }

    #[test]
    fn defaults_point_at_local_server() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
