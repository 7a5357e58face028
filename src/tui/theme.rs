use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(12, 20, 18);
pub const PANEL: Color = Color::Rgb(20, 31, 28);
pub const BORDER: Color = Color::Rgb(44, 66, 58);
pub const TEXT: Color = Color::Rgb(226, 232, 220);
pub const TEXT_DIM: Color = Color::Rgb(118, 136, 126);
pub const GOLD: Color = Color::Rgb(212, 175, 85);
pub const EMERALD: Color = Color::Rgb(72, 168, 120);
pub const AMBER: Color = Color::Rgb(214, 140, 62);
pub const RED: Color = Color::Rgb(190, 84, 66);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn panel() -> Style {
    Style::default().fg(TEXT).bg(PANEL)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Locally derived values are shown dimmed and italic.
pub fn approximate() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn emerald() -> Style {
    Style::default().fg(EMERALD)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}
