use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated while decoding a [`Snapshot`](crate::snapshot::Snapshot) at the
/// service boundary.
///
/// The breakout pipeline itself is total over a decoded snapshot, so these errors only ever
/// surface to the snapshot fetcher, which keeps its previous snapshot when one occurs.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot payload: {0}")]
    Json(String),

    #[error("snapshot rejected by market data service with status: {status}")]
    Rejected {
        status: String,
        message: Option<String>,
    },

    #[error("invalid instrument record at index {index}: {reason}")]
    Record { index: usize, reason: String },
}

impl SnapshotError {
    /// Determine if the error was reported by the market data service itself, rather than
    /// caused by an undecodable payload.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SnapshotError::Rejected { .. })
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value.to_string())
    }
}
