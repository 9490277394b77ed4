// Test doubles for the stats seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::config::RepoId;
use crate::error::{Result, StarboardError};
use crate::github::{ContributorRecord, RateLimit, RepoSummary};

use super::{Clock, StatsSource};

#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Ok,
    RateLimited,
    ServerError,
    /// Summary succeeds, contributor list fails.
    ContributorsError,
}

/// Source returning canned data and counting calls.
#[derive(Clone)]
pub struct FakeSource {
    outcome: Arc<Mutex<Outcome>>,
    summary_calls: Arc<AtomicUsize>,
    contributor_calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            summary_calls: Arc::new(AtomicUsize::new(0)),
            contributor_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_outcome(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn contributor_calls(&self) -> usize {
        self.contributor_calls.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> Outcome {
        *self.outcome.lock().unwrap()
    }
}

impl StatsSource for FakeSource {
    async fn fetch_summary(&self, _repo: &RepoId) -> Result<RepoSummary> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome() {
            Outcome::Ok | Outcome::ContributorsError => Ok(RepoSummary {
                stargazers_count: 120,
                forks_count: 15,
                size: 3000,
            }),
            Outcome::RateLimited => Err(StarboardError::RateLimited {
                reset_at: "unknown".to_string(),
            }),
            Outcome::ServerError => Err(StarboardError::Http {
                status: 502,
                body: "bad gateway".to_string(),
            }),
        }
    }

    async fn fetch_contributors(
        &self,
        _repo: &RepoId,
        _limit: u32,
    ) -> Result<Vec<ContributorRecord>> {
        self.contributor_calls.fetch_add(1, Ordering::SeqCst);
        if let Outcome::ContributorsError = self.outcome() {
            return Err(StarboardError::Http {
                status: 500,
                body: "server error".to_string(),
            });
        }
        Ok(vec![ContributorRecord {
            login: "alice".to_string(),
            avatar_url: "https://avatars.example/alice".to_string(),
            html_url: "https://github.com/alice".to_string(),
            contributions: 42,
        }])
    }

    fn quota(&self) -> Option<RateLimit> {
        Some(RateLimit {
            limit: 60,
            remaining: 59 - self.summary_calls().min(59) as u64,
            reset: 0,
        })
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
