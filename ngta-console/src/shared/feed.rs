//! Recurring snapshot poller
//!
//! Owns one background task that fetches a fresh [`Snapshot`] on every interval tick or
//! manual refresh request, and publishes it whole over a watch channel.

use std::{fmt, sync::Arc};

use ngta_breakout::Snapshot;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::{
    config::{FeedConfig, MIN_POLL_INTERVAL},
    source::SnapshotSource,
};

/// Connection status of the snapshot feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// No fetch has completed yet.
    Connecting,
    /// The last fetch succeeded.
    Live,
    /// A manual refresh is in flight.
    Loading,
    /// The last fetch failed, the previous snapshot is still shown.
    Stale,
    /// Every fetch so far has failed.
    Offline,
}

impl FeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedStatus::Connecting => "Connecting",
            FeedStatus::Live => "Live",
            FeedStatus::Loading => "Loading",
            FeedStatus::Stale => "Stale",
            FeedStatus::Offline => "Offline",
        }
    }
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What caused a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Interval,
    Manual,
}

/// Spawn the snapshot poller on the current tokio runtime.
///
/// The first fetch happens immediately. Later fetches follow `config.poll_interval`, never
/// faster than [`MIN_POLL_INTERVAL`], and the interval restarts after every manual refresh.
pub fn spawn_snapshot_feed<Source>(source: Source, config: &FeedConfig) -> FeedHandle
where
    Source: SnapshotSource,
{
    let period = config.poll_interval.max(MIN_POLL_INTERVAL);
    let (snapshot_tx, snapshot_rx) = watch::channel(None::<Arc<Snapshot>>);
    let (status_tx, status_rx) = watch::channel(FeedStatus::Connecting);
    let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        info!(poll_interval = ?period, "starting snapshot feed");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let trigger = tokio::select! {
                _ = ticker.tick() => RefreshTrigger::Interval,
                request = refresh_rx.recv() => match request {
                    Some(()) => RefreshTrigger::Manual,
                    None => break,
                },
            };

            if trigger == RefreshTrigger::Manual {
                status_tx.send_replace(FeedStatus::Loading);
            }

            match source.fetch().await {
                Ok(snapshot) => {
                    debug!(
                        ?trigger,
                        instruments = snapshot.len(),
                        scanner_status = snapshot.scanner_status().as_str(),
                        "snapshot refreshed"
                    );
                    snapshot_tx.send_replace(Some(Arc::new(snapshot)));
                    status_tx.send_replace(FeedStatus::Live);
                }
                Err(error) => {
                    let status = if snapshot_tx.borrow().is_some() {
                        FeedStatus::Stale
                    } else {
                        FeedStatus::Offline
                    };
                    warn!(
                        ?trigger,
                        %error,
                        transient = error.is_transient(),
                        %status,
                        "snapshot refresh failed"
                    );
                    status_tx.send_replace(status);
                }
            }

            if trigger == RefreshTrigger::Manual {
                ticker.reset();
            }
        }

        info!("snapshot feed stopped");
    });

    FeedHandle {
        task: Some(task),
        refresh_tx,
        snapshot_rx,
        status_rx,
    }
}

/// Owner of a running snapshot feed.
///
/// Dropping the handle aborts the poller; [`FeedHandle::shutdown`] also waits for it to exit.
#[derive(Debug)]
pub struct FeedHandle {
    task: Option<JoinHandle<()>>,
    refresh_tx: mpsc::Sender<()>,
    snapshot_rx: watch::Receiver<Option<Arc<Snapshot>>>,
    status_rx: watch::Receiver<FeedStatus>,
}

impl FeedHandle {
    /// Latest successfully fetched snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot_rx.borrow().clone()
    }

    pub fn status(&self) -> FeedStatus {
        *self.status_rx.borrow()
    }

    /// Request an immediate fetch.
    ///
    /// Returns false if a request is already queued or the poller has stopped.
    pub fn refresh(&self) -> bool {
        self.refresh_tx.try_send(()).is_ok()
    }

    /// Receiver notified every time a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.snapshot_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the poller and wait until its task has exited.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(error) = task.await {
                if !error.is_cancelled() {
                    warn!(%error, "snapshot feed task failed");
                }
            }
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
