// Command-line interface.
// Flags layered over the environment config, plus the `doc` subcommand.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::{RepoId, StatsConfig};
use crate::error::Result;

/// Community stats dashboard for a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "starboard")]
#[command(about = "GitHub repository stats with a rate-limit aware cache")]
#[command(version)]
pub struct Cli {
    /// Repository to track, as owner/repo
    #[arg(long, value_name = "OWNER/REPO", value_parser = parse_repo)]
    pub repo: Option<RepoId>,

    /// Print the stats once and exit instead of opening the dashboard
    #[arg(long)]
    pub once: bool,

    /// Directory for the stats cache and the log file
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seconds a fetched snapshot is served without refreshing
    #[arg(long, value_name = "SECS")]
    pub freshness_secs: Option<u64>,

    /// Minimum seconds between API attempts
    #[arg(long, value_name = "SECS")]
    pub cooldown_secs: Option<u64>,

    /// Seconds between dashboard freshness checks
    #[arg(long, value_name = "SECS")]
    pub recheck_secs: Option<u64>,

    /// Number of contributors to fetch (1-100)
    #[arg(long, value_name = "N")]
    pub contributors: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the frontmatter metadata of a documentation file as JSON
    Doc {
        /// Markdown or MDX file
        file: PathBuf,
    },
}

fn parse_repo(s: &str) -> Result<RepoId> {
    s.parse()
}

impl Cli {
    /// Apply command-line overrides on top of `config`, then re-validate.
    pub fn apply(&self, config: &mut StatsConfig) -> Result<()> {
        if let Some(repo) = &self.repo {
            config.repo = repo.clone();
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        if let Some(secs) = self.freshness_secs {
            config.freshness_window = Duration::from_secs(secs);
        }
        if let Some(secs) = self.cooldown_secs {
            config.min_call_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.recheck_secs {
            config.recheck_interval = Duration::from_secs(secs);
        }
        if let Some(limit) = self.contributors {
            config.contributor_limit = limit;
        }
        config.validate()
    }

    /// Resolve the final config: defaults, then environment, then flags.
    pub fn config(&self) -> Result<StatsConfig> {
        let mut config = StatsConfig::from_env()?;
        self.apply(&mut config)?;
        Ok(config)
    }
}
