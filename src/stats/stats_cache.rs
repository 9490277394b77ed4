// Freshness and cooldown policy for the stats snapshot.
// Serves the best data available and never lets a fetch or storage failure escape.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{RepoId, StatsConfig};

use super::snapshot::{CacheEntry, Snapshot};
use super::{Clock, EntryStore, StatsSource, SystemClock};

/// Why the returned snapshot is not a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsWarning {
    /// Source rejected the request for quota reasons; prior data returned.
    RateLimited,
    /// Any other fetch failure; prior data returned.
    FetchFailedCached,
    /// Fetch failed and there was nothing cached.
    FetchFailed,
}

impl fmt::Display for StatsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            StatsWarning::RateLimited => "rate limit exceeded, showing cached data",
            StatsWarning::FetchFailedCached => "fetch failed, showing cached data",
            StatsWarning::FetchFailed => "fetch failed",
        };
        f.write_str(message)
    }
}

/// Where the returned snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// Stored entry inside the freshness window.
    Fresh,
    /// Stored entry past the freshness window; the cooldown blocked a refresh.
    Stale,
    /// Fetched just now.
    Refreshed,
    /// Refresh failed; stored entry returned.
    Fallback,
    /// Refresh failed with nothing stored; zeroed snapshot returned.
    Unavailable,
}

/// Result of a stats request.
#[derive(Debug)]
pub struct StatsReport {
    pub snapshot: Snapshot,
    pub warning: Option<StatsWarning>,
    pub status: ReportStatus,
    /// Detached refresh started for a fresh entry whose cooldown had elapsed.
    /// Its outcome only shows up in the store; dropping the handle does not cancel it.
    pub background: Option<JoinHandle<()>>,
}

impl StatsReport {
    fn new(snapshot: Snapshot, status: ReportStatus, warning: Option<StatsWarning>) -> Self {
        Self {
            snapshot,
            warning,
            status,
            background: None,
        }
    }
}

/// Keeps one repository's stats snapshot fresh within the API rate limit.
pub struct StatsCache<S> {
    source: S,
    store: Box<dyn EntryStore>,
    clock: Box<dyn Clock>,
    repo: RepoId,
    freshness_window: Duration,
    min_call_interval: Duration,
    contributor_limit: u32,
}

impl<S: StatsSource + 'static> StatsCache<S> {
    pub fn new(source: S, store: impl EntryStore + 'static, config: &StatsConfig) -> Self {
        Self {
            source,
            store: Box::new(store),
            clock: Box::new(SystemClock),
            repo: config.repo.clone(),
            freshness_window: config.freshness_window,
            min_call_interval: config.min_call_interval,
            contributor_limit: config.contributor_limit,
        }
    }

    /// Replace the wall clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the freshest snapshot available, refreshing when policy allows.
    ///
    /// A fresh entry is returned immediately; if its cooldown has elapsed a background
    /// refresh is spawned. A missing entry, or a stale one past its cooldown, is
    /// refreshed before returning. A stale entry inside its cooldown is returned as is.
    pub async fn get_stats(self: &Arc<Self>) -> StatsReport {
        let now = self.clock.now();

        match self.load() {
            Some(entry) if self.is_fresh(&entry, now) => {
                let background = if self.cooldown_elapsed(&entry, now) {
                    debug!(repo = %self.repo, "fresh entry, refreshing in background");
                    // Recorded before spawning so calls made before the task runs see the cooldown.
                    let prior = self.record_attempt(&entry, now);
                    let cache = Arc::clone(self);
                    Some(tokio::spawn(async move {
                        cache.refresh(Some(prior), now).await;
                    }))
                } else {
                    None
                };

                StatsReport {
                    background,
                    ..StatsReport::new(entry.data, ReportStatus::Fresh, None)
                }
            }
            Some(entry) if !self.cooldown_elapsed(&entry, now) => {
                debug!(repo = %self.repo, "stale entry, cooldown active");
                StatsReport::new(entry.data, ReportStatus::Stale, None)
            }
            prior => {
                let prior = prior.map(|entry| self.record_attempt(&entry, now));
                self.refresh(prior, now).await
            }
        }
    }

    /// Whether a periodic re-check should call `get_stats`: nothing stored yet, or
    /// stale with the cooldown elapsed.
    pub fn needs_refresh(&self) -> bool {
        let now = self.clock.now();
        match self.load() {
            None => true,
            Some(entry) => !self.is_fresh(&entry, now) && self.cooldown_elapsed(&entry, now),
        }
    }

    /// Current stored snapshot, without fetching.
    pub fn cached(&self) -> Option<Snapshot> {
        self.load().map(|entry| entry.data)
    }

    /// Persist `now` as the latest attempt on `entry` and return the updated entry.
    fn record_attempt(&self, entry: &CacheEntry, now: DateTime<Utc>) -> CacheEntry {
        let attempted = entry.attempted_at(now);
        self.save(&attempted);
        attempted
    }

    /// Fetch both reads, persist on success, fall back to `prior` on failure.
    ///
    /// The caller has already recorded the attempt made at `started`.
    async fn refresh(&self, prior: Option<CacheEntry>, started: DateTime<Utc>) -> StatsReport {
        let fetched = tokio::try_join!(
            self.source.fetch_summary(&self.repo),
            self.source
                .fetch_contributors(&self.repo, self.contributor_limit),
        );

        match fetched {
            Ok((summary, contributors)) => {
                let completed = self.clock.now();
                let entry = CacheEntry::fetched(Snapshot::from_github(
                    summary,
                    contributors,
                    completed,
                ));

                // Another refresh succeeded while this one was in flight. A stored
                // timestamp past `completed` is clock skew and gets replaced.
                if let Some(current) = self.load() {
                    if current.timestamp > started && current.timestamp <= completed {
                        debug!(repo = %self.repo, "newer entry already stored, discarding refresh");
                        let status = if self.is_fresh(&current, completed) {
                            ReportStatus::Fresh
                        } else {
                            ReportStatus::Stale
                        };
                        return StatsReport::new(current.data, status, None);
                    }
                }

                self.save(&entry);
                info!(
                    repo = %self.repo,
                    stars = entry.data.stars,
                    contributors = entry.data.contributors.len(),
                    "stats refreshed"
                );
                StatsReport::new(entry.data, ReportStatus::Refreshed, None)
            }
            Err(err) => {
                warn!(repo = %self.repo, error = %err, "stats fetch failed");
                match prior {
                    Some(entry) => {
                        let warning = if err.is_rate_limited() {
                            StatsWarning::RateLimited
                        } else {
                            StatsWarning::FetchFailedCached
                        };
                        StatsReport::new(entry.data, ReportStatus::Fallback, Some(warning))
                    }
                    None => StatsReport::new(
                        Snapshot::empty(),
                        ReportStatus::Unavailable,
                        Some(StatsWarning::FetchFailed),
                    ),
                }
            }
        }
    }

    fn load(&self) -> Option<CacheEntry> {
        match self.store.read() {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "stats cache unreadable, treating as empty");
                None
            }
        }
    }

    fn save(&self, entry: &CacheEntry) {
        if let Err(err) = self.store.write(entry) {
            warn!(error = %err, "stats cache write failed");
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        elapsed_since(entry.timestamp, now) < self.freshness_window
    }

    fn cooldown_elapsed(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        elapsed_since(entry.last_api_call, now) > self.min_call_interval
    }
}

/// Time since `then`. A timestamp in the future counts as infinitely old so a
/// clock that moved backwards cannot pin a stale entry. The attempt that follows
/// rewrites `last_api_call` with the current time, which restores the cooldown.
fn elapsed_since(then: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(then)
        .to_std()
        .unwrap_or(Duration::MAX)
}
