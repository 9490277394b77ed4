// Background stats refresh.
// Runs the startup load, the periodic re-check and manual refreshes, and reports to the UI over a channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::github::RateLimit;
use crate::stats::{ReportStatus, Snapshot, StatsCache, StatsReport, StatsSource, StatsWarning};

/// Messages sent from the refresh task to the app.
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A stats request started.
    Started,
    /// A stats request finished.
    Report {
        snapshot: Snapshot,
        warning: Option<StatsWarning>,
        status: ReportStatus,
        quota: Option<RateLimit>,
    },
    /// A background refresh finished; this is the stored snapshot afterwards.
    Updated {
        snapshot: Snapshot,
        quota: Option<RateLimit>,
    },
}

/// Handle for the background refresh task.
pub struct RefreshHandle {
    /// Channel for receiving refresh messages.
    pub receiver: mpsc::Receiver<RefreshMessage>,
    trigger_tx: mpsc::Sender<()>,
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawn the refresh task: one request immediately, then a re-check every `interval`.
    ///
    /// The re-check only calls into the cache when `needs_refresh` says so.
    pub fn spawn<S: StatsSource + 'static>(cache: Arc<StatsCache<S>>, interval: Duration) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // Skip the first tick (immediate)
            ticker.tick().await;

            request_stats(&cache, &msg_tx).await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if cache.needs_refresh() {
                            request_stats(&cache, &msg_tx).await;
                        } else {
                            debug!(repo = %cache.repo(), "periodic check: nothing to do");
                        }
                    }
                    Some(()) = trigger_rx.recv() => {
                        request_stats(&cache, &msg_tx).await;
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
                if msg_tx.is_closed() {
                    break;
                }
            }
        });

        Self {
            receiver: msg_rx,
            trigger_tx,
            shutdown_tx,
        }
    }

    /// Ask for a stats request now. Ignored if one is already queued.
    pub fn request_refresh(&self) {
        let _ = self.trigger_tx.try_send(());
    }

    /// Pending message, without blocking.
    pub fn try_recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.try_recv().ok()
    }

    /// Stop the refresh task.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn request_stats<S: StatsSource + 'static>(
    cache: &Arc<StatsCache<S>>,
    tx: &mpsc::Sender<RefreshMessage>,
) {
    let _ = tx.send(RefreshMessage::Started).await;

    let StatsReport {
        snapshot,
        warning,
        status,
        background,
    } = cache.get_stats().await;

    let _ = tx
        .send(RefreshMessage::Report {
            snapshot,
            warning,
            status,
            quota: cache.source().quota(),
        })
        .await;

    if let Some(handle) = background {
        let cache = Arc::clone(cache);
        let tx = tx.clone();
        tokio::spawn(async move {
            if handle.await.is_err() {
                return;
            }
            if let Some(snapshot) = cache.cached() {
                let _ = tx
                    .send(RefreshMessage::Updated {
                        snapshot,
                        quota: cache.source().quota(),
                    })
                    .await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::config::StatsConfig;
    use crate::stats::CacheEntry;
    use crate::stats::testing::{FakeSource, Outcome};
    use chrono::Utc;

    async fn next_message(handle: &mut RefreshHandle) -> RefreshMessage {
        tokio::time::timeout(Duration::from_secs(5), handle.receiver.recv())
            .await
            .expect("message before timeout")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_initial_request_reports_snapshot() {
        let source = FakeSource::new(Outcome::Ok);
        let cache = Arc::new(StatsCache::new(
            source.clone(),
            MemoryStore::new(),
            &StatsConfig::default(),
        ));

        let mut handle = RefreshHandle::spawn(cache, Duration::from_secs(3600));

        assert!(matches!(
            next_message(&mut handle).await,
            RefreshMessage::Started
        ));
        match next_message(&mut handle).await {
            RefreshMessage::Report {
                snapshot,
                warning,
                status,
                quota,
            } => {
                assert_eq!(snapshot.stars, 120);
                assert!(warning.is_none());
                assert_eq!(status, ReportStatus::Refreshed);
                assert!(quota.is_some());
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert_eq!(source.summary_calls(), 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_background_refresh_publishes_update() {
        // Fresh entry whose cooldown has long passed.
        let hour_ago = Utc::now() - chrono::Duration::hours(1);
        let mut snapshot = Snapshot::empty();
        snapshot.last_updated = hour_ago;
        let store = MemoryStore::with_entry(CacheEntry::fetched(snapshot));

        let source = FakeSource::new(Outcome::Ok);
        let cache = Arc::new(StatsCache::new(
            source.clone(),
            store,
            &StatsConfig::default(),
        ));

        let mut handle = RefreshHandle::spawn(cache, Duration::from_secs(3600));

        assert!(matches!(
            next_message(&mut handle).await,
            RefreshMessage::Started
        ));
        match next_message(&mut handle).await {
            RefreshMessage::Report { status, .. } => assert_eq!(status, ReportStatus::Fresh),
            other => panic!("unexpected message: {:?}", other),
        }
        match next_message(&mut handle).await {
            RefreshMessage::Updated { snapshot, .. } => assert_eq!(snapshot.stars, 120),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_manual_refresh_respects_cooldown() {
        let source = FakeSource::new(Outcome::Ok);
        let cache = Arc::new(StatsCache::new(
            source.clone(),
            MemoryStore::new(),
            &StatsConfig::default(),
        ));

        let mut handle = RefreshHandle::spawn(cache, Duration::from_secs(3600));
        next_message(&mut handle).await;
        next_message(&mut handle).await;

        handle.request_refresh();
        assert!(matches!(
            next_message(&mut handle).await,
            RefreshMessage::Started
        ));
        match next_message(&mut handle).await {
            RefreshMessage::Report { status, .. } => assert_eq!(status, ReportStatus::Fresh),
            other => panic!("unexpected message: {:?}", other),
        }
        // Just fetched, so the entry is fresh and inside the cooldown.
        assert_eq!(source.summary_calls(), 1);
    }
}
