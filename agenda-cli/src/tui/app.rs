//! Terminal UI state: the event form, the dialog queue and the store.

use std::collections::VecDeque;

use agenda_core::reminder::Reminder;
use agenda_core::{AgendaError, Event, EventStore};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Date,
    Time,
    Reminder,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Title => Focus::Date,
            Focus::Date => Focus::Time,
            Focus::Time => Focus::Reminder,
            Focus::Reminder => Focus::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Title => Focus::Reminder,
            Focus::Date => Focus::Title,
            Focus::Time => Focus::Date,
            Focus::Reminder => Focus::Time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
    Reminder,
}

/// A modal message. Dialogs queue up and are dismissed one key press at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub heading: String,
    pub message: String,
}

impl Dialog {
    fn new(kind: DialogKind, heading: &str, message: impl Into<String>) -> Self {
        Dialog {
            kind,
            heading: heading.to_string(),
            message: message.into(),
        }
    }
}

pub struct App {
    store: EventStore,

    pub title: String,
    pub date: String,
    pub time: String,
    pub reminder: bool,
    pub focus: Focus,

    dialogs: VecDeque<Dialog>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: EventStore) -> Self {
        App {
            store,
            title: String::new(),
            date: String::new(),
            time: String::new(),
            reminder: false,
            focus: Focus::Title,
            dialogs: VecDeque::new(),
            should_quit: false,
        }
    }

    /// Events as shown in the list, in chronological order.
    pub fn events(&self) -> Vec<Event> {
        self.store.sorted_view()
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    /// Queue a reminder raised by the poller.
    pub fn push_reminder(&mut self, reminder: Reminder) {
        self.dialogs
            .push_back(Dialog::new(DialogKind::Reminder, "Reminder", reminder.message()));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // an open dialog swallows the key that dismisses it
        if self.dialogs.pop_front().is_some() {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                if let Some(input) = self.focused_input() {
                    input.pop();
                }
            }
            KeyCode::Char(' ') if self.focus == Focus::Reminder => {
                self.reminder = !self.reminder;
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.focused_input() {
                    input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Try to add the form contents as an event.
    pub fn submit(&mut self) {
        match self
            .store
            .append(&self.title, &self.date, &self.time, self.reminder)
        {
            Ok(_) => {
                self.clear_form();
                self.dialogs.push_back(Dialog::new(
                    DialogKind::Info,
                    "Success",
                    "Event added successfully!",
                ));
            }
            Err(AgendaError::Validation(e)) => {
                self.dialogs
                    .push_back(Dialog::new(DialogKind::Error, e.heading(), e.to_string()));
            }
            Err(e) => {
                self.dialogs
                    .push_back(Dialog::new(DialogKind::Error, "Save Error", e.to_string()));
            }
        }
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Title => Some(&mut self.title),
            Focus::Date => Some(&mut self.date),
            Focus::Time => Some(&mut self.time),
            Focus::Reminder => None,
        }
    }

    fn clear_form(&mut self) {
        self.title.clear();
        self.date.clear();
        self.time.clear();
        self.reminder = false;
        self.focus = Focus::Title;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_app() -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::load(dir.path().join("events.csv")).unwrap();
        (dir, App::new(store))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_form(app: &mut App, title: &str, date: &str, time: &str) {
        type_text(app, title);
        press(app, KeyCode::Tab);
        type_text(app, date);
        press(app, KeyCode::Tab);
        type_text(app, time);
    }

    #[test]
    fn submit_adds_event_and_clears_form() {
        let (_dir, mut app) = test_app();
        fill_form(&mut app, "Meeting", "2024-03-01", "10:00");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.reminder);

        press(&mut app, KeyCode::Enter);

        let events = app.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].reminder);
        assert_eq!(app.title, "");
        assert!(!app.reminder);
        assert_eq!(app.focus, Focus::Title);
        assert_eq!(app.dialog().unwrap().message, "Event added successfully!");
    }

    #[test]
    fn missing_field_shows_input_error_and_keeps_form() {
        let (_dir, mut app) = test_app();
        fill_form(&mut app, "Meeting", "", "10:00");

        press(&mut app, KeyCode::Enter);

        let dialog = app.dialog().unwrap();
        assert_eq!(dialog.kind, DialogKind::Error);
        assert_eq!(dialog.heading, "Input Error");
        assert_eq!(dialog.message, "All fields are required.");
        assert_eq!(app.title, "Meeting");
        assert!(app.events().is_empty());
    }

    #[test]
    fn bad_date_shows_format_error() {
        let (_dir, mut app) = test_app();
        fill_form(&mut app, "Meeting", "2024-13-01", "10:00");

        press(&mut app, KeyCode::Enter);

        let dialog = app.dialog().unwrap();
        assert_eq!(dialog.heading, "Date/Time Error");
        assert_eq!(dialog.message, "Date must be YYYY-MM-DD and time HH:MM.");
        assert!(app.events().is_empty());
    }

    #[test]
    fn any_key_dismisses_dialog_without_typing() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.dialog().is_some());

        press(&mut app, KeyCode::Char('x'));

        assert!(app.dialog().is_none());
        assert_eq!(app.title, "");
    }

    #[test]
    fn reminders_queue_behind_open_dialogs() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Enter);
        app.push_reminder(Reminder {
            title: "Meeting".to_string(),
            date: "2024-03-01".to_string(),
            time: "10:00".to_string(),
        });

        assert_eq!(app.dialog().unwrap().kind, DialogKind::Error);
        press(&mut app, KeyCode::Enter);
        let dialog = app.dialog().unwrap();
        assert_eq!(dialog.kind, DialogKind::Reminder);
        assert_eq!(dialog.message, "Event Reminder: Meeting");
    }

    #[test]
    fn space_types_into_text_fields() {
        let (_dir, mut app) = test_app();
        type_text(&mut app, "Team sync");
        assert_eq!(app.title, "Team sync");
        assert!(!app.reminder);
    }

    #[test]
    fn backspace_and_focus_wrap() {
        let (_dir, mut app) = test_app();
        type_text(&mut app, "ab");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.title, "a");

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Reminder);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.title, "a");
    }

    #[test]
    fn escape_quits_and_ctrl_c_quits_through_dialogs() {
        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);

        let (_dir, mut app) = test_app();
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
