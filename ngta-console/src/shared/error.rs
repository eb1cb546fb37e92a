use ngta_breakout::SnapshotError;
use thiserror::Error;

/// All errors generated while fetching a snapshot from the market data service.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("market data service responded with HTTP status {0}")]
    Status(u16),

    #[error("invalid market data service URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl FeedError {
    /// Determine if the next poll may succeed without any change on the console side, eg/ the
    /// service is restarting or still warming its cache.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Http(_) => true,
            FeedError::Status(status) => *status >= 500 || *status == 429,
            FeedError::Snapshot(error) => error.is_rejection(),
            FeedError::InvalidUrl(_) => false,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}
