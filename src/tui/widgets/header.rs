use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::models::HijriDate;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, hijri: &HijriDate, today: NaiveDate, city: &str) {
    let title_line = Line::from(vec![
        Span::styled("  مسجد  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled(city, theme::gold()),
    ]);

    let hijri_style = if hijri.is_approximate {
        theme::approximate()
    } else {
        theme::amber()
    };
    let gregorian = today.format("%A, %-d %B %Y").to_string();
    let date_line = Line::from(vec![
        Span::styled(hijri.to_string(), hijri_style),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(gregorian, theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, date_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
