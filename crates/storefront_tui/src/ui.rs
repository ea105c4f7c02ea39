//! UI rendering for the admin client.

use crate::app::{App, AppMode, Resource};
use crate::{FormState, ListState, Record};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Tabs, Wrap},
};

/// Draw the main UI.
#[tracing::instrument(skip_all)]
pub fn draw(f: &mut Frame, app: &App) {
    if app.mode == AppMode::Forbidden {
        draw_forbidden(f, f.area());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Pagination
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    match app.resource {
        Resource::Categories => {
            draw_search(f, app, &app.categories, chunks[1]);
            draw_table(f, &app.categories, "Categories", chunks[2]);
            draw_pagination(f, &app.categories, chunks[3]);
        }
        Resource::Products => {
            draw_search(f, app, &app.products, chunks[1]);
            draw_table(f, &app.products, "Products", chunks[2]);
            draw_pagination(f, &app.products, chunks[3]);
        }
    }
    draw_status_bar(f, app, chunks[4]);

    if let Some(alert) = &app.alert {
        draw_alert(f, &alert.message, chunks[2]);
    }

    match app.mode {
        AppMode::Form => {
            if let Some(form) = &app.form {
                draw_form(f, form);
            }
        }
        AppMode::ConfirmDelete(id) => draw_confirm(f, app.resource, id),
        _ => {}
    }
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.resource {
        Resource::Categories => 0,
        Resource::Products => 1,
    };
    let tabs = Tabs::new(vec!["Categories", "Products"])
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Storefront Admin"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_search<T>(f: &mut Frame, app: &App, list: &ListState<T>, area: Rect) {
    let style = if app.mode == AppMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = if list.search_input.trim() != list.search {
        "Search (pending)"
    } else {
        "Search"
    };
    let search = Paragraph::new(list.search_input.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(search, area);
}

fn draw_table<T: Record>(f: &mut Frame, list: &ListState<T>, title: &str, area: Rect) {
    let header = Row::new(T::HEADERS.to_vec())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = list
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i == list.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(row.cells()).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = T::HEADERS
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i == 0 {
                Constraint::Length(6)
            } else {
                Constraint::Fill(1)
            }
        })
        .collect();

    let title = if list.loading {
        format!("{} (loading...)", title)
    } else {
        title.to_string()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn draw_pagination<T>(f: &mut Frame, list: &ListState<T>, area: Rect) {
    let text = format!(
        " Page {} of {} | {} rows | {} per page",
        list.page, list.last_page, list.total, list.per_page
    );
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.mode {
        AppMode::List => "Tab: Switch | /: Search | A: Add | E: Edit | D: Delete | ?: Keys | Q: Quit",
        AppMode::Search => "Type to search | Enter/Esc: Done",
        AppMode::Form => "Tab/↑↓: Field | Enter: Save | Esc: Cancel",
        AppMode::ConfirmDelete(_) => "Y: Delete | N: Cancel",
        AppMode::Forbidden => "Q: Quit",
    };
    let status = Paragraph::new(format!("{} | {}", app.status_message, help_text))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(status, area);
}

fn draw_alert(f: &mut Frame, message: &str, area: Rect) {
    let [line] = Layout::vertical([Constraint::Length(3)]).areas(area);
    f.render_widget(Clear, line);
    let alert = Paragraph::new(message)
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title("Error (x to dismiss)"));
    f.render_widget(alert, line);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vertical);
    rect
}

fn draw_form(f: &mut Frame, form: &FormState) {
    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.to_string()
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let focused = i == form.focused;
        let value_style = if focused {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        let marker = if focused { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(field.value.clone(), value_style),
        ]));
        for message in form.errors_for(field.name) {
            lines.push(Line::from(Span::styled(
                format!("  {}", message),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let title = format!(
        "{} {}",
        if form.is_editing() { "Edit" } else { "New" },
        form.resource.singular()
    );
    let height = (lines.len() as u16).saturating_add(2);
    let area = centered(f.area(), 70.min(f.area().width), height.min(f.area().height));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_confirm(f: &mut Frame, resource: Resource, id: i64) {
    let area = centered(f.area(), 50.min(f.area().width), 5.min(f.area().height));
    f.render_widget(Clear, area);
    let text = format!(
        "Delete {} #{}? This cannot be undone. (y/n)",
        resource.singular().to_lowercase(),
        id
    );
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Confirm")),
        area,
    );
}

fn draw_forbidden(f: &mut Frame, area: Rect) {
    let text = "403 Forbidden\n\nYou do not have access to this page.\n\nPress q to quit.";
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn list_view_shows_tabs_and_paging() {
        let app = App::default();
        let screen = render(&app);
        assert!(screen.contains("Categories"));
        assert!(screen.contains("Page 1 of 1"));
    }

    #[test]
    fn forbidden_view_replaces_everything() {
        let mut app = App::default();
        app.forbid();
        let screen = render(&app);
        assert!(screen.contains("403 Forbidden"));
        assert!(!screen.contains("Page 1 of 1"));
    }

    #[test]
    fn form_shows_field_errors() {
        let mut app = App::default();
        let mut form = FormState::category(None);
        form.check_required();
        app.open_form(form);
        let screen = render(&app);
        assert!(screen.contains("New Category"));
        assert!(screen.contains("The name field is required."));
    }
}
