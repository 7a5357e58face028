use chrono::NaiveTime;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_big_text::{BigText, PixelSize};

use crate::tui::theme;
use crate::utils::format::format_12h;
use crate::widget::CountdownState;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    state: CountdownState,
    maghrib: NaiveTime,
    with_seconds: bool,
) {
    let block = Block::default()
        .title(Span::styled(" Iftar ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::panel());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4), // quadrant digits are four rows tall
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let digit_style = match state {
        CountdownState::IftarTime => theme::emerald().add_modifier(Modifier::BOLD),
        CountdownState::Remaining { .. } => theme::amber().add_modifier(Modifier::BOLD),
    };
    let big = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(digit_style)
        .alignment(Alignment::Center)
        .lines(vec![Line::from(state.clock(with_seconds))])
        .build();
    frame.render_widget(big, chunks[1]);

    let caption = match state {
        CountdownState::IftarTime => Line::from(Span::styled(
            "Time for Iftar",
            theme::emerald().add_modifier(Modifier::BOLD),
        )),
        CountdownState::Remaining { .. } => Line::from(vec![
            Span::styled(state.label(with_seconds), theme::bold()),
            Span::styled(" until Maghrib at ", theme::dim()),
            Span::styled(format_12h(maghrib), theme::gold()),
        ]),
    };
    frame.render_widget(
        Paragraph::new(caption).alignment(Alignment::Center),
        chunks[2],
    );
}
