use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use folio_core::models::Certificate;
use folio_core::utils::{contains_ignore_case, format_date, format_optional, truncate};

use crate::app::{App, AppState, FilterField, Focus};
use crate::ui::styles;

const TITLE_WIDTH: usize = 40;

/// Render the Certificates tab: filter line, table and detail pane
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_filter_line(frame, app, rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    render_table(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_filter_line(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.state == AppState::Filtering;
    let mut spans = vec![Span::raw(" ")];

    for (i, field) in [FilterField::Query, FilterField::Issuer, FilterField::Tag]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled("  ", styles::muted_style()));
        }
        let active = editing && app.filter_field == field;
        let cursor = if active { "▌" } else { "" };
        spans.push(Span::styled(format!("{}: ", field.label()), styles::muted_style()));
        let value_style = if active {
            styles::search_style()
        } else {
            styles::list_item_style()
        };
        spans.push(Span::styled(
            format!("{}{}", app.filter_value(field), cursor),
            value_style,
        ));
    }

    if !editing && !app.filter.has_search_terms() {
        spans.push(Span::styled("   [/] to filter", styles::muted_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);
    let today = Local::now().date_naive();

    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Issuer"),
        Cell::from("Issued"),
        Cell::from("Expires"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .certificates
        .iter()
        .enumerate()
        .map(|(i, cert)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else if cert.is_expired(today) {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(truncate(cert.display_title(), TITLE_WIDTH)),
                Cell::from(cert.display_issuer().to_string()),
                Cell::from(date_cell(cert.issue_date.as_deref())),
                Cell::from(date_cell(cert.expiry_date.as_deref())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(44),
        Constraint::Fill(2),
        Constraint::Length(13),
        Constraint::Length(13),
    ];

    let title = if app.loading {
        " Certificates (loading...) ".to_string()
    } else {
        format!(" Certificates ({}) ", app.certificates.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.certificates.is_empty() {
        state.select(Some(app.selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn date_cell(value: Option<&str>) -> String {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(date) => format_date(date),
        None => "-".to_string(),
    }
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let lines = match app.selected_certificate() {
        Some(cert) => detail_lines(app, cert),
        None if app.loading => vec![Line::from(Span::styled("Loading...", styles::muted_style()))],
        None => vec![
            Line::from(Span::styled("No certificates", styles::muted_style())),
            Line::from(""),
            Line::from(Span::styled("[n] to add one", styles::muted_style())),
        ],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn detail_lines<'a>(app: &'a App, cert: &'a Certificate) -> Vec<Line<'a>> {
    let placeholder = "-";
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<12}", label), styles::muted_style()),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(cert.display_title(), styles::title_style())),
        Line::from(Span::styled(cert.display_issuer(), styles::highlight_style())),
        Line::from(""),
        field("ID:", cert.id.to_string()),
        field("Issued:", date_cell(cert.issue_date.as_deref())),
    ];

    let expires = date_cell(cert.expiry_date.as_deref());
    if cert.is_expired(Local::now().date_naive()) {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", "Expires:"), styles::muted_style()),
            Span::raw(expires),
            Span::styled("  expired", styles::error_style()),
        ]));
    } else {
        lines.push(field("Expires:", expires));
    }

    lines.push(field(
        "Credential:",
        format_optional(cert.credential_id.as_deref(), placeholder),
    ));
    lines.push(field(
        "Verify:",
        format_optional(cert.verify_url.as_deref(), placeholder),
    ));
    lines.push(field(
        "Added:",
        cert.created_at
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| placeholder.to_string()),
    ));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Tags", styles::highlight_style())));
    let tags = cert.tag_list();
    if tags.is_empty() {
        lines.push(Line::from(Span::styled("  none", styles::muted_style())));
    } else {
        let mut spans = vec![Span::raw("  ")];
        for tag in tags {
            let matched =
                !app.filter.tag.is_empty() && contains_ignore_case(tag, &app.filter.tag);
            let style = if matched {
                styles::search_style()
            } else {
                styles::list_item_style()
            };
            spans.push(Span::styled(format!("[{}] ", tag), style));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("File", styles::highlight_style())));
    let file = cert
        .image_url(app.client.base_url())
        .unwrap_or_else(|| "no file attached".to_string());
    lines.push(Line::from(Span::styled(format!("  {}", file), styles::muted_style())));

    lines
}
