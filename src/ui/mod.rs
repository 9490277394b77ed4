// UI module for rendering the TUI.
// Draws the stats dashboard: title, warning banner, tiles, contributor list and status bar.

mod list;

pub use list::format_relative_time;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::format::format_number;
use crate::stats::{ReportStatus, Snapshot};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let banner_height = if app.stats.warning.is_some() { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title
            Constraint::Length(banner_height), // Warning banner
            Constraint::Length(4),             // Stat tiles
            Constraint::Min(1),                // Contributors
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    draw_title(frame, app, chunks[0]);

    if let Some(warning) = app.stats.warning {
        let banner = Paragraph::new(format!(" ⚠ {}", warning)).style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(banner, chunks[1]);
    }

    draw_tiles(frame, app.stats.snapshot(), chunks[2]);
    list::render_contributors_list(frame, &mut app.stats, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_title(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " ★ starboard ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.repo.to_string(), Style::default().fg(Color::White)),
    ];
    if app.stats.refreshing {
        spans.push(Span::styled(
            "  refreshing...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title, area);
}

/// Tile label and value pairs, in display order.
fn tile_values(snapshot: Option<&Snapshot>) -> [(&'static str, String); 5] {
    let value = |f: fn(&Snapshot) -> u64| {
        snapshot
            .map(|s| format_number(f(s)))
            .unwrap_or_else(|| "-".to_string())
    };
    [
        ("Stars", value(|s| s.stars)),
        ("Forks", value(|s| s.forks)),
        ("Commits", value(|s| s.total_commits)),
        ("Contributors", value(|s| s.contributor_count())),
        ("Contributions", value(|s| s.total_contributions())),
    ]
}

fn draw_tiles(frame: &mut Frame, snapshot: Option<&Snapshot>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for ((label, value), column) in tile_values(snapshot).into_iter().zip(columns.iter()) {
        let tile = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", label))
                .title_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(tile, *column);
    }
}

/// Draw the status bar with last update, rate limit and keybinding hints.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let updated = match app.stats.snapshot() {
        Some(snapshot) if !snapshot.is_empty() => {
            format!(" Updated {}", format_relative_time(&snapshot.last_updated))
        }
        Some(_) => " No data yet".to_string(),
        None => " Loading".to_string(),
    };
    let stale = matches!(
        app.stats.status,
        Some(ReportStatus::Stale | ReportStatus::Fallback)
    );

    let mut hints = vec![Span::styled(
        updated,
        Style::default().fg(if stale { Color::Yellow } else { Color::DarkGray }),
    )];

    // Add rate limit info if the API reported it
    if let Some(rate) = app.stats.quota {
        let rate_color = if rate.remaining < 10 {
            Color::Red
        } else if rate.remaining < 30 {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        hints.push(Span::styled(
            format!("  API: {}/{}", rate.remaining, rate.limit),
            Style::default().fg(rate_color),
        ));
    }

    hints.extend([
        Span::raw("   ↑↓ "),
        Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ]);

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 50.min(area.width);
    let popup_height = 13.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ↑/↓ or j/k    ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate contributors"),
        ]),
        Line::from(vec![
            Span::styled("  Home/End g/G  ", Style::default().fg(Color::Cyan)),
            Span::raw("Jump to first/last"),
        ]),
        Line::from(vec![
            Span::styled("  r             ", Style::default().fg(Color::Cyan)),
            Span::raw("Refresh (respects cooldown)"),
        ]),
        Line::from(vec![
            Span::styled("  ?             ", Style::default().fg(Color::Cyan)),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![
            Span::styled("  q             ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
