use ratatui::style::{Color, Modifier, Style};

use folio_core::presentation::ToastKind;

// Color palette
pub const PRIMARY: Color = Color::Rgb(88, 120, 220);
pub const SECONDARY: Color = Color::Rgb(96, 176, 120);
pub const ACCENT: Color = Color::Rgb(220, 170, 80);
pub const ERROR: Color = Color::Rgb(210, 80, 80);
pub const MUTED: Color = Color::Rgb(128, 128, 140);
pub const HIGHLIGHT: Color = Color::Rgb(44, 48, 72);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn search_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(30, 30, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn toast_style(kind: ToastKind) -> Style {
    match kind {
        ToastKind::Success => success_style().add_modifier(Modifier::BOLD),
        ToastKind::Error => error_style().add_modifier(Modifier::BOLD),
    }
}

/// Sections that have not faded in yet are drawn dimmed
pub fn reveal_style(opacity: f64) -> Style {
    if opacity >= 1.0 {
        Style::default()
    } else {
        Style::default().fg(HIGHLIGHT).add_modifier(Modifier::DIM)
    }
}
