use chrono::NaiveTime;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Modifier,
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table},
};

use crate::config::settings::JamaatConfig;
use crate::models::{PrayerName, PrayerSnapshot};
use crate::tui::theme;
use crate::utils::format::format_12h;

/// The first prayer whose Azaan is still ahead of `now`, wrapping to Fajr.
pub fn upcoming(snapshot: &PrayerSnapshot, now: NaiveTime) -> PrayerName {
    snapshot
        .iter()
        .find(|(_, t)| *t > now)
        .map(|(p, _)| p)
        .unwrap_or(PrayerName::Fajr)
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &PrayerSnapshot,
    jamaat: &JamaatConfig,
    now: NaiveTime,
) {
    let title = if snapshot.is_approximate() {
        " Prayer Times (estimated) "
    } else {
        " Prayer Times "
    };
    let block = Block::default()
        .title(Span::styled(title, theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::panel());

    let next = upcoming(snapshot, now);
    let time_style = if snapshot.is_approximate() {
        theme::approximate()
    } else {
        theme::bold()
    };

    let header = Row::new(vec![
        Cell::from("Prayer"),
        Cell::from("Azaan"),
        Cell::from("Jama'at"),
    ])
    .style(theme::dim())
    .bottom_margin(1);

    let rows: Vec<Row> = snapshot
        .iter()
        .map(|(prayer, azaan)| {
            let is_next = prayer == next;
            let name_style = if is_next {
                theme::gold().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };
            let marker = if is_next { "▸ " } else { "  " };
            Row::new(vec![
                Cell::from(Span::styled(
                    format!("{}{}", marker, prayer.display_name()),
                    name_style,
                )),
                Cell::from(Span::styled(format_12h(azaan), time_style)),
                Cell::from(Span::styled(
                    format_12h(jamaat.jamaat_time(prayer, azaan)),
                    theme::emerald(),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(block);

    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnapshotSource;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn snapshot() -> PrayerSnapshot {
        PrayerSnapshot::new(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            [t(5, 5), t(11, 59), t(15, 42), t(17, 51), t(19, 8)],
            SnapshotSource::Remote,
        )
    }

    #[test]
    fn upcoming_prayer_follows_the_clock() {
        assert_eq!(upcoming(&snapshot(), t(4, 0)), PrayerName::Fajr);
        assert_eq!(upcoming(&snapshot(), t(12, 0)), PrayerName::Asr);
        assert_eq!(upcoming(&snapshot(), t(17, 51)), PrayerName::Isha);
        assert_eq!(upcoming(&snapshot(), t(22, 0)), PrayerName::Fajr);
    }
}
