// Stats view state.
// Tracks what the dashboard shows: the snapshot, its warning, quota and list selection.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

use crate::github::RateLimit;
use crate::refresh::RefreshMessage;
use crate::stats::{Contributor, ReportStatus, Snapshot, StatsWarning};

/// Loading state for async data.
#[derive(Debug, Clone)]
pub enum LoadingState<T> {
    Idle,
    Loading,
    Loaded(T),
}

impl<T> Default for LoadingState<T> {
    fn default() -> Self {
        LoadingState::Idle
    }
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Everything the stats dashboard renders.
#[derive(Debug, Default)]
pub struct StatsViewState {
    pub data: LoadingState<Snapshot>,
    pub warning: Option<StatsWarning>,
    pub status: Option<ReportStatus>,
    pub quota: Option<RateLimit>,
    /// A request is in flight while data is already on screen.
    pub refreshing: bool,
    pub last_checked: Option<DateTime<Utc>>,
    pub list_state: ListState,
}

impl StatsViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the dashboard has nothing to show yet.
    pub fn is_loading(&self) -> bool {
        !self.data.is_loaded()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.data.data()
    }

    pub fn contributors(&self) -> &[Contributor] {
        self.snapshot()
            .map(|s| s.contributors.as_slice())
            .unwrap_or(&[])
    }

    /// Fold a refresh message into the view.
    pub fn apply(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::Started => {
                if self.data.is_loaded() {
                    self.refreshing = true;
                } else {
                    self.data = LoadingState::Loading;
                }
            }
            RefreshMessage::Report {
                snapshot,
                warning,
                status,
                quota,
            } => {
                self.set_snapshot(snapshot);
                self.warning = warning;
                self.status = Some(status);
                self.update_quota(quota);
                self.last_checked = Some(Utc::now());
                self.refreshing = false;
            }
            RefreshMessage::Updated { snapshot, quota } => {
                self.set_snapshot(snapshot);
                self.update_quota(quota);
            }
        }
    }

    fn set_snapshot(&mut self, snapshot: Snapshot) {
        let len = snapshot.contributors.len();
        self.data = LoadingState::Loaded(snapshot);
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    fn update_quota(&mut self, quota: Option<RateLimit>) {
        if quota.is_some() {
            self.quota = quota;
        }
    }

    /// Select the next contributor.
    pub fn select_next(&mut self) {
        let len = self.contributors().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => i, // Stay at end
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous contributor.
    pub fn select_prev(&mut self) {
        if self.contributors().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.contributors().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.contributors().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    pub fn selected_contributor(&self) -> Option<&Contributor> {
        self.list_state
            .selected()
            .and_then(|i| self.contributors().get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(handles: &[&str]) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        snapshot.stars = 120;
        snapshot.contributors = handles
            .iter()
            .enumerate()
            .map(|(i, handle)| Contributor {
                handle: handle.to_string(),
                avatar_url: String::new(),
                profile_url: format!("https://github.com/{}", handle),
                contribution_count: 100 - i as u64,
            })
            .collect();
        snapshot
    }

    fn report(snapshot: Snapshot, warning: Option<StatsWarning>) -> RefreshMessage {
        RefreshMessage::Report {
            snapshot,
            warning,
            status: ReportStatus::Refreshed,
            quota: None,
        }
    }

    #[test]
    fn test_loading_until_first_report() {
        let mut state = StatsViewState::new();
        assert!(state.is_loading());

        state.apply(RefreshMessage::Started);
        assert!(state.data.is_loading());
        assert!(!state.refreshing);

        state.apply(report(snapshot_with(&["alice"]), None));
        assert!(!state.is_loading());
        assert_eq!(state.snapshot().unwrap().stars, 120);
        assert!(state.last_checked.is_some());
        assert_eq!(state.selected_contributor().unwrap().handle, "alice");
    }

    #[test]
    fn test_refresh_keeps_data_on_screen() {
        let mut state = StatsViewState::new();
        state.apply(report(snapshot_with(&["alice"]), None));

        state.apply(RefreshMessage::Started);
        assert!(state.refreshing);
        assert!(state.data.is_loaded());

        state.apply(report(
            snapshot_with(&["alice"]),
            Some(StatsWarning::RateLimited),
        ));
        assert!(!state.refreshing);
        assert_eq!(state.warning, Some(StatsWarning::RateLimited));
    }

    #[test]
    fn test_warning_cleared_by_clean_report() {
        let mut state = StatsViewState::new();
        state.apply(report(Snapshot::empty(), Some(StatsWarning::FetchFailed)));
        state.apply(report(snapshot_with(&["alice"]), None));
        assert!(state.warning.is_none());
    }

    #[test]
    fn test_background_update_keeps_warning_and_quota() {
        let mut state = StatsViewState::new();
        state.apply(RefreshMessage::Report {
            snapshot: snapshot_with(&["alice"]),
            warning: Some(StatsWarning::FetchFailedCached),
            status: ReportStatus::Fallback,
            quota: Some(RateLimit {
                limit: 60,
                remaining: 10,
                reset: 0,
            }),
        });
        state.apply(RefreshMessage::Updated {
            snapshot: snapshot_with(&["alice", "bob"]),
            quota: None,
        });

        assert_eq!(state.contributors().len(), 2);
        assert_eq!(state.warning, Some(StatsWarning::FetchFailedCached));
        assert_eq!(state.quota.unwrap().remaining, 10);
    }

    #[test]
    fn test_selection_bounds() {
        let mut state = StatsViewState::new();
        state.select_next();
        assert!(state.list_state.selected().is_none());

        state.apply(report(snapshot_with(&["a", "b", "c"]), None));
        assert_eq!(state.list_state.selected(), Some(0));

        state.select_prev();
        assert_eq!(state.list_state.selected(), Some(0));
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.list_state.selected(), Some(2));

        // Shrinking list clamps the selection.
        state.apply(report(snapshot_with(&["a"]), None));
        assert_eq!(state.list_state.selected(), Some(0));

        state.apply(report(snapshot_with(&[]), None));
        assert!(state.list_state.selected().is_none());
        assert!(state.selected_contributor().is_none());
    }

    #[test]
    fn test_first_and_last() {
        let mut state = StatsViewState::new();
        state.apply(report(snapshot_with(&["a", "b", "c"]), None));
        state.select_last();
        assert_eq!(state.selected_contributor().unwrap().handle, "c");
        state.select_first();
        assert_eq!(state.selected_contributor().unwrap().handle, "a");
    }
}
