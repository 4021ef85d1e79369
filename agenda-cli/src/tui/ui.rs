//! Rendering of the event form, the event list and dialogs.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{App, DialogKind, Focus};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Date
            Constraint::Length(3), // Time
            Constraint::Length(3), // Reminder toggle
            Constraint::Min(0),    // Event list
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_input(frame, app, "Event Title", &app.title, Focus::Title, chunks[0]);
    render_input(frame, app, "Event Date (YYYY-MM-DD)", &app.date, Focus::Date, chunks[1]);
    render_input(frame, app, "Event Time (HH:MM)", &app.time, Focus::Time, chunks[2]);
    render_toggle(frame, app, chunks[3]);
    render_events(frame, app, chunks[4]);
    render_hints(frame, chunks[5]);

    if let Some(dialog) = app.dialog() {
        let color = match dialog.kind {
            DialogKind::Info => Color::Green,
            DialogKind::Error => Color::Red,
            DialogKind::Reminder => Color::Yellow,
        };

        let area = centered(frame.area(), 50, 7);
        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(dialog.message.as_str()).alignment(Alignment::Center),
            Line::from(""),
            Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", dialog.heading)),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(body, area);
    }
}

fn focus_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus && app.dialog().is_none() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_input(frame: &mut Frame, app: &App, label: &str, value: &str, focus: Focus, area: Rect) {
    let input = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app, focus))
            .title(format!(" {} ", label)),
    );
    frame.render_widget(input, area);

    if app.focus == focus && app.dialog().is_none() {
        let typed = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(typed);
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y.saturating_add(1)));
    }
}

fn render_toggle(frame: &mut Frame, app: &App, area: Rect) {
    let mark = if app.reminder { "[x]" } else { "[ ]" };
    let toggle = Paragraph::new(format!("{} Set Reminder", mark)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app, Focus::Reminder)),
    );
    frame.render_widget(toggle, area);
}

fn render_events(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .events()
        .iter()
        .map(|event| {
            let style = if event.reminder {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(event.to_string()).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Scheduled Events "),
    );
    frame.render_widget(list, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Span::styled(
        " Tab:Next field  Space:Toggle reminder  Enter:Add event  Esc:Quit ",
        Style::default().fg(Color::DarkGray),
    );
    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::EventStore;
    use ratatui::backend::TestBackend;

    #[test]
    fn cursor_stays_inside_an_overlong_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::load(dir.path().join("events.csv")).unwrap();
        let mut app = App::new(store);
        app.title = "x".repeat(usize::from(u16::MAX));

        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (38, 1));
    }
}
