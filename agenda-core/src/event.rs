//! The event record and its input validation.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DATE_FORMAT, TIMESTAMP_FORMAT, TIME_FORMAT};

/// A user-entered calendar event.
///
/// Events carry no identifier: two events with the same fields are
/// indistinguishable. `date` and `time` are kept as the strings the user typed
/// so the table round-trips exactly; they are only guaranteed well-formed for
/// events built through [`Event::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    /// Whether the poller should raise a notification at `date time`
    pub reminder: bool,
}

/// The user-facing input fields of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Date,
    Time,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Date => "date",
            Field::Time => "time",
        };
        write!(f, "{}", name)
    }
}

/// Why an event could not be created from user input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required.")]
    MissingField(Field),

    #[error("Date must be YYYY-MM-DD and time HH:MM.")]
    BadFormat(Field),
}

impl ValidationError {
    /// The field that failed the check.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingField(field) | ValidationError::BadFormat(field) => *field,
        }
    }

    /// Short heading for dialogs reporting this error.
    pub fn heading(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "Input Error",
            ValidationError::BadFormat(_) => "Date/Time Error",
        }
    }
}

impl Event {
    /// Build an event from raw user input.
    ///
    /// Surrounding whitespace is trimmed. All three text fields are checked for
    /// emptiness before any format is checked, so a blank title with a bad
    /// date reports the missing field.
    pub fn new(title: &str, date: &str, time: &str, reminder: bool) -> Result<Self, ValidationError> {
        let title = title.trim();
        let date = date.trim();
        let time = time.trim();

        for (value, field) in [(title, Field::Title), (date, Field::Date), (time, Field::Time)] {
            if value.is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        if !is_valid_date(date) {
            return Err(ValidationError::BadFormat(Field::Date));
        }
        if !is_valid_time(time) {
            return Err(ValidationError::BadFormat(Field::Time));
        }

        Ok(Event {
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            reminder,
        })
    }

    /// `"<date> <time>"`, the key the poller compares with the clock.
    pub fn timestamp_key(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    /// Parsed scheduled time, or None if the stored strings are malformed
    /// (possible for hand-edited files).
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        if !is_valid_date(&self.date) || !is_valid_time(&self.time) {
            return None;
        }
        NaiveDateTime::parse_from_str(&self.timestamp_key(), TIMESTAMP_FORMAT).ok()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} - {}", self.date, self.time, self.title)
    }
}

/// Check a `YYYY-MM-DD` date: fixed width and a real calendar day.
pub fn is_valid_date(s: &str) -> bool {
    has_shape(s, "dddd-dd-dd") && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
}

/// Check an `HH:MM` time: fixed width and a real 24-hour clock time.
pub fn is_valid_time(s: &str) -> bool {
    has_shape(s, "dd:dd") && NaiveTime::parse_from_str(s, TIME_FORMAT).is_ok()
}

/// `d` in the pattern matches an ASCII digit, any other byte matches itself.
fn has_shape(s: &str, pattern: &str) -> bool {
    s.len() == pattern.len()
        && s.bytes().zip(pattern.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_trims_fields() {
        let event = Event::new("  Meeting ", " 2024-03-01", "10:00 ", true).unwrap();
        assert_eq!(event.title, "Meeting");
        assert_eq!(event.date, "2024-03-01");
        assert_eq!(event.time, "10:00");
        assert!(event.reminder);
    }

    #[test]
    fn missing_fields_are_reported_by_field() {
        assert_eq!(
            Event::new("", "2024-03-01", "10:00", false),
            Err(ValidationError::MissingField(Field::Title))
        );
        assert_eq!(
            Event::new("Meeting", "", "10:00", false),
            Err(ValidationError::MissingField(Field::Date))
        );
        assert_eq!(
            Event::new("Meeting", "2024-03-01", "   ", false),
            Err(ValidationError::MissingField(Field::Time))
        );
    }

    #[test]
    fn missing_field_wins_over_bad_format() {
        assert_eq!(
            Event::new("", "not a date", "10:00", false),
            Err(ValidationError::MissingField(Field::Title))
        );
    }

    #[test]
    fn bad_dates_are_rejected() {
        for date in ["2024-13-01", "2024-02-30", "2024-1-05", "24-01-05", "2024/01/05", "2024-01-05x"] {
            assert_eq!(
                Event::new("Meeting", date, "10:00", false),
                Err(ValidationError::BadFormat(Field::Date)),
                "{date} should be rejected"
            );
        }
    }

    #[test]
    fn bad_times_are_rejected() {
        for time in ["24:00", "9:30", "10:60", "10.00", "10:00:00"] {
            assert_eq!(
                Event::new("Meeting", "2024-03-01", time, false),
                Err(ValidationError::BadFormat(Field::Time)),
                "{time} should be rejected"
            );
        }
    }

    #[test]
    fn leap_day_is_accepted() {
        assert!(Event::new("Leap", "2024-02-29", "00:00", false).is_ok());
        assert!(Event::new("Leap", "2023-02-29", "00:00", false).is_err());
    }

    #[test]
    fn error_messages_match_dialogs() {
        let missing = ValidationError::MissingField(Field::Date);
        assert_eq!(missing.to_string(), "All fields are required.");
        assert_eq!(missing.heading(), "Input Error");

        let bad = ValidationError::BadFormat(Field::Time);
        assert_eq!(bad.to_string(), "Date must be YYYY-MM-DD and time HH:MM.");
        assert_eq!(bad.field(), Field::Time);
    }

    #[test]
    fn display_renders_list_row() {
        let event = Event::new("Meeting", "2024-03-01", "10:00", true).unwrap();
        assert_eq!(event.to_string(), "2024-03-01 10:00 - Meeting");
    }

    #[test]
    fn scheduled_at_is_none_for_hand_edited_values() {
        let event = Event {
            title: "Broken".to_string(),
            date: "someday".to_string(),
            time: "10:00".to_string(),
            reminder: true,
        };
        assert!(event.scheduled_at().is_none());
    }
}
