// starboard entry point.
// Resolves config, sets up file logging, then runs the dashboard, a one-shot print or `doc`.

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use starboard::app::App;
use starboard::cache::{FileStore, MemoryStore, paths};
use starboard::cli::{Cli, Command};
use starboard::config::StatsConfig;
use starboard::docs::Document;
use starboard::error::Result;
use starboard::format::format_number;
use starboard::github::GitHubClient;
use starboard::refresh::RefreshHandle;
use starboard::stats::{EntryStore, StatsCache, StatsReport};
use starboard::ui::format_relative_time;

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Log to `<cache dir>/starboard.log`; stdout belongs to the TUI.
///
/// Filter comes from `STARBOARD_LOG`, defaulting to `info`. Returns `None` when
/// there is nowhere to write, in which case logging stays off.
fn init_observability(cache_dir: Option<&Path>) -> Option<WorkerGuard> {
    let base = paths::resolve_cache_dir(cache_dir)?;
    fs::create_dir_all(&base).ok()?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths::log_path(&base))
        .ok()?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let filter = EnvFilter::try_from_env("STARBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).init();

    Some(guard)
}

/// Persistent store for the repo, or an in-memory one when no cache dir exists.
fn open_store(config: &StatsConfig) -> Arc<dyn EntryStore> {
    match FileStore::for_repo(config.cache_dir.as_deref(), &config.repo) {
        Ok(store) => {
            info!(path = %store.path().display(), "using stats file");
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "stats will not persist across runs");
            Arc::new(MemoryStore::new())
        }
    }
}

fn print_document(path: &Path) -> Result<()> {
    let document = Document::load(path)?;
    println!("{}", serde_json::to_string_pretty(&document.metadata)?);
    Ok(())
}

fn print_report(config: &StatsConfig, report: &StatsReport) {
    let snapshot = &report.snapshot;
    println!("{}", config.repo);
    for (label, value) in [
        ("Stars", snapshot.stars),
        ("Forks", snapshot.forks),
        ("Commits", snapshot.total_commits),
        ("Contributors", snapshot.contributor_count()),
        ("Contributions", snapshot.total_contributions()),
    ] {
        println!("  {:<14} {}", label, format_number(value));
    }
    if !snapshot.is_empty() {
        println!(
            "  {:<14} {}",
            "Updated",
            format_relative_time(&snapshot.last_updated)
        );
    }
    if let Some(warning) = report.warning {
        println!("warning: {}", warning);
    }
    if !snapshot.contributors.is_empty() {
        println!();
        for contributor in &snapshot.contributors {
            println!(
                "  {:<24} {} commits",
                contributor.handle,
                format_number(contributor.contribution_count)
            );
        }
    }
}

async fn run_once(cache: Arc<StatsCache<GitHubClient>>, config: &StatsConfig) {
    let report = cache.get_stats().await;
    print_report(config, &report);
    // Let a background refresh finish its write before the runtime shuts down.
    if let Some(handle) = report.background {
        let _ = handle.await;
    }
}

async fn run_dashboard(cache: Arc<StatsCache<GitHubClient>>, config: &StatsConfig) -> Result<()> {
    setup_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let refresh = RefreshHandle::spawn(cache, config.recheck_interval);
    let mut app = App::new(config.repo.clone(), refresh);
    // Blocking draw/poll loop; the refresh task keeps running on the worker threads.
    let result = tokio::task::block_in_place(|| app.run(&mut terminal));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown().await;
    result?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Doc { file }) = &cli.command {
        return print_document(file);
    }

    let config = cli.config()?;
    let _guard = init_observability(config.cache_dir.as_deref());
    info!(repo = %config.repo, "starting");

    let client = GitHubClient::new(config.token.as_deref())?;
    let store = open_store(&config);
    let cache = Arc::new(StatsCache::new(client, store, &config));

    if cli.once {
        run_once(cache, &config).await;
        return Ok(());
    }

    run_dashboard(cache, &config).await
}
