// GitHub API endpoint functions.
// Typed methods for the two reads behind a stats snapshot.

use crate::config::RepoId;
use crate::error::Result;
use crate::stats::StatsSource;

use super::client::GitHubClient;
use super::types::{ContributorRecord, RateLimit, RepoSummary};

impl GitHubClient {
    /// Get the repository summary (stars, forks, size).
    pub async fn get_repo_summary(&self, owner: &str, repo: &str) -> Result<RepoSummary> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo)).await?;
        let summary: RepoSummary = response.json().await?;
        Ok(summary)
    }

    /// Get the top contributors, ordered by contribution count.
    pub async fn get_contributors(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<ContributorRecord>> {
        let params = [("per_page", per_page.to_string())];
        let response = self
            .get_with_params(&format!("/repos/{}/{}/contributors", owner, repo), &params)
            .await?;
        // An empty repository answers 204 with no body.
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let contributors: Vec<ContributorRecord> = serde_json::from_str(&body)?;
        Ok(contributors)
    }
}

impl StatsSource for GitHubClient {
    async fn fetch_summary(&self, repo: &RepoId) -> Result<RepoSummary> {
        self.get_repo_summary(&repo.owner, &repo.repo).await
    }

    async fn fetch_contributors(&self, repo: &RepoId, limit: u32) -> Result<Vec<ContributorRecord>> {
        self.get_contributors(&repo.owner, &repo.repo, limit).await
    }

    fn quota(&self) -> Option<RateLimit> {
        let rate_limit = self.rate_limit();
        rate_limit.is_known().then_some(rate_limit)
    }
}
