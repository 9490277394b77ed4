// Runtime configuration.
// Defaults mirror the community page; every knob can be overridden from the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, StarboardError};

const DEFAULT_OWNER: &str = "Far-Beyond-Dev";
const DEFAULT_REPO: &str = "Horizon";

/// Served without a refresh for this long after a successful fetch: 24 hours.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Minimum spacing between network attempts: 60 seconds.
pub const DEFAULT_MIN_CALL_INTERVAL: Duration = Duration::from_secs(60);

/// How often the dashboard re-evaluates freshness: 60 seconds.
pub const DEFAULT_RECHECK_INTERVAL: Duration = Duration::from_secs(60);

/// GitHub's default page size for the contributors endpoint.
pub const DEFAULT_CONTRIBUTOR_LIMIT: u32 = 30;

/// Owner/repository pair identifying the tracked repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = StarboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(StarboardError::InvalidConfig(format!(
                "expected owner/repo, got '{}'",
                s
            ))),
        }
    }
}

/// Settings for the stats cache and the dashboard that drives it.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub repo: RepoId,
    /// Optional bearer credential; raises the API rate limit when present.
    pub token: Option<String>,
    pub freshness_window: Duration,
    pub min_call_interval: Duration,
    pub recheck_interval: Duration,
    pub contributor_limit: u32,
    /// Overrides the platform cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            repo: RepoId::new(DEFAULT_OWNER, DEFAULT_REPO),
            token: None,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            min_call_interval: DEFAULT_MIN_CALL_INTERVAL,
            recheck_interval: DEFAULT_RECHECK_INTERVAL,
            contributor_limit: DEFAULT_CONTRIBUTOR_LIMIT,
            cache_dir: None,
        }
    }
}

impl StatsConfig {
    /// Build a config from defaults overridden by environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(repo) = lookup("STARBOARD_REPO") {
            config.repo = repo.parse()?;
        }
        config.token = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty());
        if let Some(secs) = lookup("STARBOARD_FRESHNESS_SECS") {
            config.freshness_window = parse_secs("STARBOARD_FRESHNESS_SECS", &secs)?;
        }
        if let Some(secs) = lookup("STARBOARD_COOLDOWN_SECS") {
            config.min_call_interval = parse_secs("STARBOARD_COOLDOWN_SECS", &secs)?;
        }
        if let Some(secs) = lookup("STARBOARD_RECHECK_SECS") {
            config.recheck_interval = parse_secs("STARBOARD_RECHECK_SECS", &secs)?;
        }
        if let Some(limit) = lookup("STARBOARD_CONTRIBUTORS") {
            config.contributor_limit = parse_limit(&limit)?;
        }
        if let Some(dir) = lookup("STARBOARD_CACHE_DIR") {
            config.cache_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the cache and the ticker cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.freshness_window.is_zero() {
            return Err(StarboardError::InvalidConfig(
                "freshness window must be positive".to_string(),
            ));
        }
        if self.recheck_interval.is_zero() {
            return Err(StarboardError::InvalidConfig(
                "re-check interval must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&self.contributor_limit) {
            return Err(StarboardError::InvalidConfig(format!(
                "contributor limit must be between 1 and 100, got {}",
                self.contributor_limit
            )));
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| StarboardError::InvalidConfig(format!("{} must be whole seconds", key)))
}

fn parse_limit(value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        StarboardError::InvalidConfig(format!(
            "STARBOARD_CONTRIBUTORS must be a number, got '{}'",
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StatsConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.repo, RepoId::new("Far-Beyond-Dev", "Horizon"));
        assert_eq!(config.freshness_window, Duration::from_secs(86_400));
        assert_eq!(config.min_call_interval, Duration::from_secs(60));
        assert_eq!(config.recheck_interval, Duration::from_secs(60));
        assert_eq!(config.contributor_limit, 30);
        assert!(config.token.is_none());
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = StatsConfig::from_lookup(lookup_from(&[
            ("STARBOARD_REPO", "rust-lang/cargo"),
            ("GITHUB_TOKEN", "ghp_secret"),
            ("STARBOARD_FRESHNESS_SECS", "3600"),
            ("STARBOARD_COOLDOWN_SECS", "5"),
            ("STARBOARD_RECHECK_SECS", "30"),
            ("STARBOARD_CONTRIBUTORS", "10"),
            ("STARBOARD_CACHE_DIR", "/tmp/starboard"),
        ]))
        .unwrap();

        assert_eq!(config.repo.to_string(), "rust-lang/cargo");
        assert_eq!(config.token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.freshness_window, Duration::from_secs(3600));
        assert_eq!(config.min_call_interval, Duration::from_secs(5));
        assert_eq!(config.recheck_interval, Duration::from_secs(30));
        assert_eq!(config.contributor_limit, 10);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/starboard")));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = StatsConfig::from_lookup(lookup_from(&[("GITHUB_TOKEN", "  ")])).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(StatsConfig::from_lookup(lookup_from(&[("STARBOARD_REPO", "nope")])).is_err());
        assert!(
            StatsConfig::from_lookup(lookup_from(&[("STARBOARD_COOLDOWN_SECS", "soon")])).is_err()
        );
        assert!(
            StatsConfig::from_lookup(lookup_from(&[("STARBOARD_FRESHNESS_SECS", "0")])).is_err()
        );
        assert!(
            StatsConfig::from_lookup(lookup_from(&[("STARBOARD_CONTRIBUTORS", "500")])).is_err()
        );
    }

    #[test]
    fn test_repo_id_parsing() {
        let id: RepoId = "owner/name".parse().unwrap();
        assert_eq!(id.owner, "owner");
        assert_eq!(id.repo, "name");

        assert!("owner/".parse::<RepoId>().is_err());
        assert!("/name".parse::<RepoId>().is_err());
        assert!("a/b/c".parse::<RepoId>().is_err());
    }
}
