/// NGTA Console - Shared Library
///
/// This library provides everything the `market-plus` binary needs around the pure
/// `ngta-breakout` core:
/// - Snapshot feed configuration read from NGTA_* environment variables
/// - HTTP source polling the `/god-mode` scanner endpoint
/// - A background feed task publishing whole snapshots over a watch channel
/// - Keyboard state and ratatui rendering for the breakout console
pub mod shared;

pub use shared::app::{Action, ConsoleApp};
pub use shared::config::FeedConfig;
pub use shared::error::FeedError;
pub use shared::feed::{spawn_snapshot_feed, FeedHandle, FeedStatus, RefreshTrigger};
pub use shared::source::{HttpSnapshotSource, SnapshotSource};
pub use shared::widget::render_console;
