// GitHub API response types.
// Only the fields the stats snapshot needs are deserialized.

use serde::{Deserialize, Serialize};

/// Repository summary from `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub stargazers_count: u64,
    pub forks_count: u64,
    /// Repository size in KB. Used as a stand-in commit metric.
    #[serde(default)]
    pub size: u64,
}

/// One entry of `GET /repos/{owner}/{repo}/contributors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRecord {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    pub contributions: u64,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// Unix timestamp when the quota resets.
    pub reset: u64,
}

impl RateLimit {
    /// Whether any response has reported rate limit headers yet.
    pub fn is_known(&self) -> bool {
        self.limit > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_summary_ignores_extra_fields() {
        let json = r#"{
            "id": 1,
            "full_name": "Far-Beyond-Dev/Horizon",
            "stargazers_count": 120,
            "forks_count": 15,
            "size": 3000,
            "private": false
        }"#;
        let summary: RepoSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.stargazers_count, 120);
        assert_eq!(summary.forks_count, 15);
        assert_eq!(summary.size, 3000);
    }

    #[test]
    fn test_contributor_list() {
        let json = r#"[
            {"login": "alice", "avatar_url": "https://a/1", "html_url": "https://github.com/alice", "contributions": 42, "type": "User"},
            {"login": "bob", "contributions": 7}
        ]"#;
        let contributors: Vec<ContributorRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(contributors.len(), 2);
        assert_eq!(contributors[0].login, "alice");
        assert_eq!(contributors[0].contributions, 42);
        assert_eq!(contributors[1].avatar_url, "");
    }
}
