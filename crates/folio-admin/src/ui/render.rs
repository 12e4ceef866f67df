use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, Tab};

use super::styles;
use super::tabs::{certificates, showcase};

const LOGO: [&str; 3] = [
    "       ╔═╗╔═╗╦  ╦╔═╗",
    "       ╠╣ ║ ║║  ║║ ║  admin",
    "       ╚  ╚═╝╩═╝╩╚═╝",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::EditingForm => render_form_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ReplacingFile => render_replace_file_overlay(frame, app),
        AppState::Normal | AppState::Filtering | AppState::Quitting => {}
    }
}

/// Outer rows taken by the title bar, tabs and status bar
pub const CHROME_ROWS: u16 = 6;

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let name = if app.config.profile.name.is_empty() {
        "folio"
    } else {
        app.config.profile.name.as_str()
    };
    let title = format!("  {}", name);
    let role = format!("  {}▌", app.showcase.typewriter.text());
    let help_hint = "[?] Help";

    let used = title.chars().count() + role.chars().count() + help_hint.len() + 2;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(role, styles::highlight_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(vec![Line::from(""), title_line]).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let main_tabs = [
        ("[1] Certificates", app.current_tab == Tab::Certificates),
        ("[2] Showcase", app.current_tab == Tab::Showcase),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in main_tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::tab_style(*selected)));
    }

    // Page indicator on the right of the Certificates tab
    if app.current_tab == Tab::Certificates {
        let page = format!("page {}", app.filter.page_number());
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let padding = (area.width as usize).saturating_sub(used + page.len() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(page, styles::muted_style()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Certificates => certificates::render(frame, app, area),
        Tab::Showcase => showcase::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_tab {
        Tab::Certificates => "[n]ew [e]dit [f]ile [d]elete [/]filter [r]eload | [q]uit",
        Tab::Showcase => "[m]enu [Home] top | [q]uit",
    };

    let (left_text, left_style) = if let Some(ref toast) = app.toast {
        (format!(" {} ", toast.message), styles::toast_style(toast.kind))
    } else if app.loading {
        (" Loading... ".to_string(), styles::muted_style())
    } else {
        let who = app
            .user
            .as_ref()
            .map(|u| format!(" {} @ {} ", u.username, app.client.base_url()))
            .unwrap_or_else(|| format!(" {} ", app.client.base_url()));
        (who, styles::muted_style())
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Overlays
// ============================================================================

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn overlay_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default())
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 28, frame.area());
    frame.render_widget(Clear, area);

    let mut help_text = logo_lines();
    help_text.push(Line::from(Span::styled(
        format!("            version {}", env!("CARGO_PKG_VERSION")),
        styles::muted_style(),
    )));
    help_text.extend([
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-2", "Switch tabs"),
        help_line("←/→", "Prev/next tab"),
        help_line("Tab", "Switch focus (list ↔ detail)"),
        help_line("↑/↓", "Navigate list or scroll page"),
        help_line("PgUp/PgDn", "Move a page"),
        Line::from(""),
        Line::from(Span::styled(" Certificates", styles::highlight_style())),
        help_line("n / e", "New / edit certificate"),
        help_line("f", "Replace attached file"),
        help_line("d", "Delete certificate"),
        help_line("/", "Filter (Tab cycles fields)"),
        help_line("[ / ]", "Previous / next page"),
        help_line("r", "Reload"),
        Line::from(""),
        Line::from(Span::styled(" Showcase", styles::highlight_style())),
        help_line("m", "Section menu"),
        help_line("Home", "Back to top"),
        Line::from(""),
        help_line("L", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    frame.render_widget(Paragraph::new(help_text).block(overlay_block()), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));

    let field_style = |focused: bool| {
        if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        }
    };

    let username_focused = app.login_focus == LoginFocus::Username;
    let cursor = if username_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Username: [", styles::muted_style()),
        Span::styled(
            format!("{:<16}{}", app.login_username, cursor),
            field_style(username_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    let password_focused = app.login_focus == LoginFocus::Password;
    let password_masked = "*".repeat(app.login_password.chars().count().min(16));
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(
            format!("{:<16}{}", password_masked, cursor),
            field_style(password_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    let button_focused = app.login_focus == LoginFocus::Button;
    let button_label = if button_focused { " ▶ Login ◀ " } else { "   Login   " };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(button_label, field_style(button_focused)),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

fn render_form_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let height = form.fields().len() as u16 + 6;
    let area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    for (i, (field, value)) in form.fields().iter().enumerate() {
        let focused = i == form.focus;
        let marker = if field.required(form.mode) { "*" } else { " " };
        let cursor = if focused { "▌" } else { "" };
        let value_style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {}{:<14}", marker, field.label()), styles::muted_style()),
            Span::styled(format!("{}{}", value, cursor), value_style),
        ]));
    }

    lines.push(Line::from(""));
    match form.error {
        Some(ref error) => lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        ))),
        None => lines.push(Line::from(vec![
            Span::styled(" [Enter]", styles::help_key_style()),
            Span::styled(" save  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel  ", styles::muted_style()),
            Span::styled("* required", styles::muted_style()),
        ])),
    }

    let block = overlay_block().title(Span::styled(form.title(), styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 7, frame.area());
    frame.render_widget(Clear, area);

    let title = app
        .selected_certificate()
        .map(|c| c.display_title().to_string())
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Delete this certificate?",
            styles::highlight_style(),
        )),
        Line::from(Span::styled(format!("   {}", title), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(overlay_block()), area);
}

fn render_replace_file_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Path to the new image or PDF:",
            styles::highlight_style(),
        )),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{}▌", app.file_input), styles::selected_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" [Enter]", styles::help_key_style()),
            Span::styled(" upload  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    let block = overlay_block().title(Span::styled(" Replace file ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect_fixed(46, 10, outer), Rect::new(27, 15, 46, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let outer = Rect::new(2, 1, 30, 8);
        let rect = centered_rect_fixed(46, 10, outer);
        assert_eq!(rect, Rect::new(2, 1, 30, 8));
    }
}
