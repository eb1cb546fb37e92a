//! # NGTA Breakout
//! Breakout classification, momentum ranking and table view models for the NGTA MarketPlus
//! console.
//!
//! Data flows one way: a decoded [`Snapshot`] goes through the [`classify`] step, the
//! momentum [`Leaderboards`] and [`build_table`], producing view models the console renders.
//! Every step is a pure, synchronous function of its inputs.
//!
//! ```text
//! /god-mode payload ──► Snapshot::from_json ──► Board::view ──► BoardView
//!                                                 ├─ Leaderboards (top gainers / losers)
//!                                                 └─ TableView x 6 (1d .. 52w breakouts)
//! ```

/// Errors raised while decoding a snapshot at the service boundary.
pub mod error;

/// Static breakout timeframe configuration.
pub mod timeframe;

/// Instrument snapshot model and `/god-mode` payload decoding.
pub mod snapshot;

/// Breakout verdict decoding and classification.
pub mod breakout;

/// Pivot distance and display formatting.
pub mod calc;

/// Top gainer / top loser leaderboards.
pub mod ranker;

/// Breakout table view models and per-table UI state.
pub mod table;

/// All six breakout tables plus the leaderboards.
pub mod board;

pub use board::{Board, BoardView};
pub use breakout::{BreakoutSignal, Classification, Direction, classify};
pub use calc::{format_signed_pct, pivot_distance_pct};
pub use error::SnapshotError;
pub use ranker::{LeaderRow, Leaderboards, top_gainers, top_losers};
pub use snapshot::{Instrument, ScannerStatus, Snapshot, TimeframeStats};
pub use table::{
    BreakoutBadge, BreakoutRow, BreakoutTable, DirectionFilter, SortOrder, TableState,
    TableView, build_table,
};
pub use timeframe::{SectionGroup, TIMEFRAMES, Timeframe, TimeframeConfig};
