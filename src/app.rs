// App state and main event loop.
// Drains refresh messages into the view state and handles keyboard input.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;

use crate::config::RepoId;
use crate::refresh::RefreshHandle;
use crate::state::StatsViewState;
use crate::ui;

/// Main application state.
pub struct App {
    /// Repository shown in the title bar.
    pub repo: RepoId,
    /// Stats dashboard state.
    pub stats: StatsViewState,
    /// Background refresh task.
    refresh: RefreshHandle,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(repo: RepoId, refresh: RefreshHandle) -> Self {
        Self {
            repo,
            stats: StatsViewState::new(),
            refresh,
            show_help: false,
            should_quit: false,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.drain_refresh_messages();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Stop the background refresh task.
    pub async fn shutdown(self) {
        self.refresh.shutdown().await;
    }

    /// Apply every pending refresh message.
    pub fn drain_refresh_messages(&mut self) {
        while let Some(message) = self.refresh.try_recv() {
            self.stats.apply(message);
        }
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => self.refresh.request_refresh(),
            KeyCode::Down | KeyCode::Char('j') => self.stats.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.stats.select_prev(),
            KeyCode::Home | KeyCode::Char('g') => self.stats.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.stats.select_last(),
            _ => {}
        }
    }
}
