//! Colored terminal rendering for agenda types.

use agenda_core::Event;
use agenda_core::reminder::Reminder;
use owo_colors::OwoColorize;

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    /// `<date> <time> - <title>`, with the time highlighted when a reminder
    /// is set.
    fn render(&self) -> String {
        let time = if self.reminder {
            self.time.yellow().to_string()
        } else {
            self.time.clone()
        };
        format!("{} {} - {}", self.date.dimmed(), time, self.title)
    }
}

impl Render for Reminder {
    fn render(&self) -> String {
        format!(
            "{} {}",
            self.message().bold(),
            format!("({} {})", self.date, self.time).dimmed()
        )
    }
}
