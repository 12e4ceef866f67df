//! The public portfolio page, rendered as a scrollable column of rows.

use chrono::{Datelike, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
    Frame,
};

use folio_core::config::Profile;
use folio_core::models::Certificate;
use folio_core::presentation::stamp_year;
use folio_core::utils::{format_date, truncate};

use crate::app::App;
use crate::showcase::{section_heights, Showcase, CERT_ROWS, SECTIONS};
use crate::ui::render::CHROME_ROWS;
use crate::ui::styles;

/// Rows used by the nav line and the progress row
const FRAME_ROWS: u16 = 2;

const MENU_WIDTH: u16 = 20;

/// Page rows visible for a terminal of the given height
pub fn viewport_rows(terminal_height: u16) -> u32 {
    u32::from(terminal_height.saturating_sub(CHROME_ROWS + FRAME_ROWS))
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Nav
            Constraint::Min(1),    // Page
            Constraint::Length(1), // Progress
        ])
        .split(area);

    let showcase = &app.showcase;
    render_nav(frame, showcase, chunks[0]);

    let lines = page_lines(showcase, &app.config.profile, &app.certificates);
    let visible: Vec<Line> = lines
        .into_iter()
        .skip(showcase.scroll() as usize)
        .take(chunks[1].height as usize)
        .collect();
    frame.render_widget(Paragraph::new(visible), chunks[1]);

    render_progress(frame, showcase, chunks[2]);

    if showcase.menu.is_open() {
        render_menu(frame, showcase, chunks[1]);
    }
}

fn render_nav(frame: &mut Frame, showcase: &Showcase, area: Rect) {
    let active = showcase.active_section();
    let mut spans = vec![Span::raw(" ")];
    for (i, (id, label)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::tab_style(active == Some(*id))));
    }

    let hint = " [m] ☰ ";
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    spans.push(Span::raw(
        " ".repeat((area.width as usize).saturating_sub(used + hint.chars().count())),
    ));
    spans.push(Span::styled(hint, styles::muted_style()));

    let mut paragraph = Paragraph::new(Line::from(spans));
    if showcase.layout().navbar_scrolled(showcase.scroll()) {
        paragraph = paragraph.style(styles::status_bar_style());
    }
    frame.render_widget(paragraph, area);
}

fn render_progress(frame: &mut Frame, showcase: &Showcase, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(16)])
        .split(area);

    let progress = showcase.progress();
    let gauge = Gauge::default()
        .gauge_style(styles::highlight_style())
        .ratio(progress / 100.0)
        .label(format!("{:.0}%", progress));
    frame.render_widget(gauge, chunks[0]);

    if showcase.layout().back_to_top_visible(showcase.scroll()) {
        frame.render_widget(
            Paragraph::new(Span::styled(" [Home] ↑ top", styles::help_key_style())),
            chunks[1],
        );
    }
}

fn render_menu(frame: &mut Frame, showcase: &Showcase, page: Rect) {
    let height = SECTIONS.len() as u16 + 2;
    let area = Rect::new(
        page.x + page.width.saturating_sub(MENU_WIDTH + 1),
        page.y,
        MENU_WIDTH.min(page.width),
        height.min(page.height),
    );
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = SECTIONS
        .iter()
        .enumerate()
        .map(|(i, (_, label))| {
            let style = if i == showcase.menu_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(format!(" {}", label)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(true)),
    );
    frame.render_widget(list, area);
}

// ============================================================================
// Page content
// ============================================================================

/// Every row of the page, each section padded or cut to its laid out height
/// and dimmed until it has been revealed.
fn page_lines(
    showcase: &Showcase,
    profile: &Profile,
    certificates: &[Certificate],
) -> Vec<Line<'static>> {
    let heights = section_heights(profile, certificates.len());
    let sections = [
        hero_lines(showcase, profile),
        about_lines(profile),
        certificate_lines(showcase, certificates),
        contact_lines(profile),
    ];

    let mut lines = Vec::new();
    for (index, (mut section, height)) in sections.into_iter().zip(heights).enumerate() {
        section.resize(height as usize, Line::from(""));
        let opacity = showcase.opacity(index);
        if opacity < 1.0 {
            let style = styles::reveal_style(opacity);
            section = section.into_iter().map(|l| l.patch_style(style)).collect();
        }
        lines.extend(section);
    }
    lines
}

fn heading(title: &'static str) -> [Line<'static>; 2] {
    [
        Line::from(Span::styled(format!("  {}", title), styles::title_style())),
        Line::from(""),
    ]
}

fn hero_lines(showcase: &Showcase, profile: &Profile) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Hi, I'm {}", profile.name),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  I'm a ", styles::list_item_style()),
            Span::styled(
                format!("{}▌", showcase.typewriter.text()),
                styles::highlight_style(),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  ↓ scroll to see my certificates",
            styles::muted_style(),
        )),
    ]
}

fn about_lines(profile: &Profile) -> Vec<Line<'static>> {
    let mut lines = heading("About").to_vec();
    lines.extend(
        profile
            .about
            .lines()
            .map(|l| Line::from(Span::styled(format!("  {}", l), styles::list_item_style()))),
    );
    lines
}

fn certificate_lines(showcase: &Showcase, certificates: &[Certificate]) -> Vec<Line<'static>> {
    let mut lines = heading("Certificates").to_vec();
    if certificates.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No certificates yet",
            styles::muted_style(),
        )));
        return lines;
    }

    for (i, cert) in certificates.iter().enumerate() {
        let mut entry = vec![
            Line::from(vec![
                Span::styled(format!("  {}", truncate(cert.display_title(), 60)), styles::list_item_style()),
                Span::styled(format!("  {}", cert.display_issuer()), styles::muted_style()),
            ]),
            Line::from(Span::styled(
                format!(
                    "    {}  {}",
                    cert.issue_date.as_deref().map(format_date).unwrap_or_default(),
                    cert.tag_list().join(" · ")
                ),
                styles::muted_style(),
            )),
        ];

        let image = match showcase.image(i) {
            Some(image) if image.is_loaded() && !image.src().is_empty() => {
                Span::styled(format!("    ▣ {}", image.src()), styles::success_style())
            }
            Some(image) if image.is_observed() && cert.image_path.is_some() => {
                Span::styled("    ▢ loading...", styles::muted_style())
            }
            _ => Span::styled("    no file", styles::muted_style()),
        };
        entry.push(Line::from(image));

        entry.truncate(CERT_ROWS as usize);
        lines.extend(entry);
    }
    lines
}

fn contact_lines(profile: &Profile) -> Vec<Line<'static>> {
    let mut lines = heading("Contact").to_vec();
    if profile.contact.is_empty() {
        lines.push(Line::from(Span::styled("  -", styles::muted_style())));
    }
    lines.extend(
        profile
            .contact
            .iter()
            .map(|c| Line::from(Span::styled(format!("  {}", c), styles::list_item_style()))),
    );
    lines.push(Line::from(""));

    let footer = format!("© 2024 {}. All rights reserved.", profile.name);
    lines.push(Line::from(Span::styled(
        format!("  {}", stamp_year(&footer, Local::now().year())),
        styles::muted_style(),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            name: "Test".to_string(),
            roles: vec!["Engineer".to_string()],
            about: "One\nTwo".to_string(),
            contact: vec![],
        }
    }

    #[test]
    fn test_viewport_rows() {
        assert_eq!(viewport_rows(40), 32);
        assert_eq!(viewport_rows(3), 0);
    }

    #[test]
    fn test_page_lines_match_layout() {
        let profile = profile();
        let showcase = Showcase::new(&profile);
        let lines = page_lines(&showcase, &profile, &[]);
        assert_eq!(lines.len() as u32, showcase.page_height());
    }

    #[test]
    fn test_footer_carries_current_year() {
        let lines = contact_lines(&profile());
        let footer = lines.last().unwrap().to_string();
        assert!(footer.contains(&Local::now().year().to_string()));
        assert!(footer.contains("Test"));
    }
}
