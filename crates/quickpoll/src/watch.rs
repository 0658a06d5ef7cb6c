//! Periodic refresh of poll results.
//!
//! [`ResultsWatcher`] runs on a tokio task, fetching results right away and
//! then once per interval. Each outcome is sent as a [`WatchEvent`]. There is
//! no backoff and no deduplication of unchanged results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::api::PollApi;
use crate::model::{PollLink, PollResults};
use crate::views::RESULTS_FAILED;

/// Outcome of one refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// Fresh results.
    Updated(PollResults),
    /// The fetch failed with a user-facing message.
    Failed(String),
}

/// Handle for stopping a running watcher.
#[derive(Debug, Clone, Default)]
pub struct WatchHandle {
    stop_signal: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl WatchHandle {
    /// Create a new handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the watcher to stop. Takes effect before the next fetch.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Check if stop has been requested.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }
}

/// Background refresher for one poll's results.
#[derive(Debug)]
pub struct ResultsWatcher;

impl ResultsWatcher {
    /// Spawn a watcher for `link` refreshing every `interval`.
    ///
    /// Must be called within a tokio runtime. The task ends when the handle
    /// is stopped or the receiver is dropped.
    pub fn spawn<A>(
        api: Arc<A>,
        link: PollLink,
        interval: Duration,
    ) -> (WatchHandle, mpsc::Receiver<WatchEvent>)
    where
        A: PollApi + ?Sized + 'static,
    {
        let handle = WatchHandle::new();
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(run(api, link, interval, handle.clone(), tx));
        (handle, rx)
    }
}

async fn run<A>(
    api: Arc<A>,
    link: PollLink,
    interval: Duration,
    handle: WatchHandle,
    tx: mpsc::Sender<WatchEvent>,
) where
    A: PollApi + ?Sized,
{
    debug!("Watching results for {} every {:?}", link, interval);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = handle.wake.notified() => {}
        }
        if handle.should_stop() {
            break;
        }

        trace!("Refreshing results for {}", link);
        let event = match api.get_poll_results(&link).await {
            Ok(results) => WatchEvent::Updated(results),
            Err(err) => {
                debug!("Refresh of {} failed: {}", link, err);
                WatchEvent::Failed(err.user_message(RESULTS_FAILED))
            }
        };

        if handle.should_stop() || tx.send(event).await.is_err() {
            break;
        }
    }
    debug!("Stopped watching results for {}", link);
}
