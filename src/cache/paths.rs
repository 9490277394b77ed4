// Cache path utilities.
// One stats file per tracked repository, plus the log file, under the platform cache dir.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::config::RepoId;

/// Get the base cache directory (~/.cache/starboard on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "starboard").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Resolve the configured override or fall back to the platform directory.
pub fn resolve_cache_dir(configured: Option<&Path>) -> Option<PathBuf> {
    match configured {
        Some(dir) => Some(dir.to_path_buf()),
        None => cache_dir(),
    }
}

/// Path to the stats entry for a repository.
pub fn stats_path(base: &Path, repo: &RepoId) -> PathBuf {
    base.join("stats")
        .join(sanitize_name(&repo.owner))
        .join(format!("{}.json", sanitize_name(&repo.repo)))
}

/// Path to the log file.
pub fn log_path(base: &Path) -> PathBuf {
    base.join("starboard.log")
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
