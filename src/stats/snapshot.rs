// Snapshot and cache entry types.
// These are what gets persisted, so field names are part of the on-disk format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::{ContributorRecord, RepoSummary};

/// A contributor as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub handle: String,
    pub avatar_url: String,
    pub profile_url: String,
    pub contribution_count: u64,
}

impl From<ContributorRecord> for Contributor {
    fn from(record: ContributorRecord) -> Self {
        Self {
            handle: record.login,
            avatar_url: record.avatar_url,
            profile_url: record.html_url,
            contribution_count: record.contributions,
        }
    }
}

/// Point-in-time statistics for the tracked repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub stars: u64,
    pub forks: u64,
    /// Repository size reported by GitHub. A placeholder metric, not a real commit count.
    pub total_commits: u64,
    /// In source order: descending contribution count.
    pub contributors: Vec<Contributor>,
    pub last_updated: DateTime<Utc>,
}

impl Snapshot {
    /// Zeroed snapshot shown when nothing has ever been fetched.
    pub fn empty() -> Self {
        Self {
            stars: 0,
            forks: 0,
            total_commits: 0,
            contributors: Vec::new(),
            last_updated: DateTime::<Utc>::default(),
        }
    }

    /// Build a snapshot from the two GitHub reads.
    pub fn from_github(
        summary: RepoSummary,
        contributors: Vec<ContributorRecord>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            stars: summary.stargazers_count,
            forks: summary.forks_count,
            total_commits: summary.size,
            contributors: contributors.into_iter().map(Contributor::from).collect(),
            last_updated: fetched_at,
        }
    }

    pub fn contributor_count(&self) -> u64 {
        self.contributors.len() as u64
    }

    /// Sum of contributions across the listed contributors.
    pub fn total_contributions(&self) -> u64 {
        self.contributors
            .iter()
            .map(|c| c.contribution_count)
            .fold(0u64, u64::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

/// Persisted wrapper pairing a snapshot with its freshness and cooldown timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Last successful refresh.
    pub timestamp: DateTime<Utc>,
    /// Last attempted fetch, successful or not.
    pub last_api_call: DateTime<Utc>,
    pub data: Snapshot,
}

impl CacheEntry {
    /// Entry for a snapshot fetched successfully at `snapshot.last_updated`.
    pub fn fetched(data: Snapshot) -> Self {
        Self {
            timestamp: data.last_updated,
            last_api_call: data.last_updated,
            data,
        }
    }

    /// Copy of this entry with the attempt time set to `at`.
    ///
    /// `at` is taken as is, even when `timestamp` is later, so the cooldown always
    /// runs from the real attempt.
    pub fn attempted_at(&self, at: DateTime<Utc>) -> Self {
        Self {
            last_api_call: at,
            ..self.clone()
        }
    }
}
