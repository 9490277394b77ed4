// Repository statistics: the snapshot model, its persisted wrapper, and the
// freshness/cooldown cache that decides when to hit the network.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::RepoId;
use crate::error::Result;
use crate::github::{ContributorRecord, RateLimit, RepoSummary};

pub mod snapshot;
pub mod stats_cache;
#[cfg(test)]
pub(crate) mod testing;

pub use snapshot::{CacheEntry, Contributor, Snapshot};
pub use stats_cache::{ReportStatus, StatsCache, StatsReport, StatsWarning};

/// External source of repository statistics.
///
/// The two reads are issued concurrently by the cache, so both must be callable through `&self`.
pub trait StatsSource: Send + Sync {
    fn fetch_summary(&self, repo: &RepoId) -> impl Future<Output = Result<RepoSummary>> + Send;

    fn fetch_contributors(
        &self,
        repo: &RepoId,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<ContributorRecord>>> + Send;

    /// Remaining request quota, when the source tracks one.
    fn quota(&self) -> Option<RateLimit> {
        None
    }
}

/// Single-slot persisted store for the cache entry.
pub trait EntryStore: Send + Sync {
    fn read(&self) -> Result<Option<CacheEntry>>;
    fn write(&self, entry: &CacheEntry) -> Result<()>;
}

impl<T: EntryStore + ?Sized> EntryStore for Arc<T> {
    fn read(&self) -> Result<Option<CacheEntry>> {
        (**self).read()
    }

    fn write(&self, entry: &CacheEntry) -> Result<()> {
        (**self).write(entry)
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
