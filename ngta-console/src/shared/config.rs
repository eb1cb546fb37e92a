//! Snapshot feed configuration
//!
//! Read from NGTA_* environment variables, falling back to the defaults of a local
//! market data service.
use crate::shared::error::FeedError;
use std::time::Duration;
use url::Url;

/// Path of the scanner snapshot endpoint, relative to the service base URL.
pub const SNAPSHOT_PATH: &str = "god-mode";

/// Shortest accepted silent refresh interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot feed configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Market data service base URL
    pub base_url: String,
    /// Silent refresh interval
    pub poll_interval: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl FeedConfig {
    /// Create a new configuration with custom base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load the configuration from NGTA_API_URL, NGTA_POLL_SECS and NGTA_TIMEOUT_SECS
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from any key/value lookup
    ///
    /// Blank or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let secs = |key: &str| value(key).and_then(|value| value.parse::<u64>().ok());

        let defaults = Self::default();
        Self {
            base_url: value("NGTA_API_URL").unwrap_or(defaults.base_url),
            poll_interval: secs("NGTA_POLL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            request_timeout: secs("NGTA_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Set the silent refresh interval, clamped to [`MIN_POLL_INTERVAL`]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Set per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Absolute URL of the snapshot endpoint
    pub fn snapshot_url(&self) -> Result<Url, FeedError> {
        let mut base = Url::parse(self.base_url.trim())
            .map_err(|error| FeedError::InvalidUrl(format!("{}: {}", self.base_url, error)))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(FeedError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.base_url,
                base.scheme()
            )));
        }

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(SNAPSHOT_PATH)
            .map_err(|error| FeedError::InvalidUrl(format!("{}: {}", self.base_url, error)))
    }
}
