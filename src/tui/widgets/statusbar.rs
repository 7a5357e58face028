use chrono::NaiveDateTime;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::models::SnapshotSource;
use crate::sources::FetchError;
use crate::tui::theme;
use crate::widget::CachedEntry;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    entry: &CachedEntry,
    errors: &[FetchError],
    refreshing: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let mut spans = vec![
        Span::styled(" [r]", theme::gold()),
        Span::styled(" refresh  ", theme::dim()),
        Span::styled("[q]", theme::gold()),
        Span::styled(" quit  ", theme::dim()),
        Span::styled("│ ", theme::border()),
    ];

    match entry.snapshot.source {
        SnapshotSource::Remote => spans.push(Span::styled("● live", theme::emerald())),
        SnapshotSource::Seasonal => spans.push(Span::styled("◌ seasonal estimate", theme::amber())),
    }
    if entry.hijri.is_approximate {
        spans.push(Span::styled("  ~hijri", theme::approximate()));
    }

    let mut categories: Vec<&str> = errors.iter().map(FetchError::category).collect();
    categories.dedup();
    if !categories.is_empty() {
        spans.push(Span::styled("  │ ", theme::border()));
        spans.push(Span::styled(categories.join(", "), theme::red()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let right = if refreshing {
        Line::from(Span::styled("refreshing… ", theme::dim()))
    } else {
        Line::from(Span::styled(updated_label(entry.updated_at), theme::dim()))
    };
    frame.render_widget(Paragraph::new(right.right_aligned()), chunks[1]);
}

fn updated_label(at: NaiveDateTime) -> String {
    format!("updated {} ", at.format("%-d %b %H:%M"))
}
