// Contributor list rendering.
// Provides the styled contributor list plus loading and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::format::format_number;
use crate::state::StatsViewState;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the contributor list.
pub fn render_contributors_list(frame: &mut Frame, stats: &mut StatsViewState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Contributors ");

    if stats.is_loading() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_loading(frame, inner, "Loading contributors");
        return;
    }

    if stats.contributors().is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "No contributors to show");
        return;
    }

    let width = stats
        .contributors()
        .iter()
        .map(|c| c.handle.chars().count())
        .max()
        .unwrap_or(0);

    let items: Vec<ListItem> = stats
        .contributors()
        .iter()
        .map(|contributor| {
            let commits = if contributor.contribution_count == 1 {
                "1 commit".to_string()
            } else {
                format!("{} commits", format_number(contributor.contribution_count))
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<width$}", contributor.handle, width = width),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!("  {}", commits), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut stats.list_state);
}
