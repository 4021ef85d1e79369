//! Turning due events into reminders.
//!
//! A [`ReminderPoller`] is checked once per tick against the current wall-clock
//! minute. In [`ReminderMode::Exact`] an event fires only when a tick lands on
//! its minute, so a late tick skips it for good and a clock moved backwards can
//! fire it twice. [`ReminderMode::CatchUp`] remembers the last minute it
//! checked and fires everything scheduled since, at most once.

mod clock;
mod source;
mod task;

pub use clock::{Clock, ManualClock, SystemClock};
pub use source::{EventSource, FileSource};
pub use task::{PollerHandle, spawn_poller};

use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::TIMESTAMP_FORMAT;
use crate::event::Event;

/// Policy for reminders whose minute was not observed by any tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderMode {
    /// Fire only when a tick's minute equals the event's minute.
    #[default]
    Exact,
    /// Fire every event scheduled since the previous tick.
    CatchUp,
}

impl fmt::Display for ReminderMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReminderMode::Exact => write!(f, "exact"),
            ReminderMode::CatchUp => write!(f, "catch_up"),
        }
    }
}

/// A notification for an event whose time has come.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub date: String,
    pub time: String,
}

impl Reminder {
    /// The text shown to the user.
    pub fn message(&self) -> String {
        format!("Event Reminder: {}", self.title)
    }
}

impl From<&Event> for Reminder {
    fn from(event: &Event) -> Self {
        Reminder {
            title: event.title.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Per-tick reminder check. Holds no events, only what it needs to remember
/// between ticks.
#[derive(Debug, Clone)]
pub struct ReminderPoller {
    mode: ReminderMode,
    /// Last minute checked; only used in catch-up mode.
    watermark: Option<NaiveDateTime>,
}

impl ReminderPoller {
    pub fn new(mode: ReminderMode) -> Self {
        ReminderPoller {
            mode,
            watermark: None,
        }
    }

    /// Run one tick at `now` over `events` and return the reminders to raise,
    /// in table order.
    pub fn tick(&mut self, now: NaiveDateTime, events: &[Event]) -> Vec<Reminder> {
        let now = truncate_to_minute(now);

        match self.mode {
            ReminderMode::Exact => exact_matches(now, events),
            ReminderMode::CatchUp => self.catch_up(now, events),
        }
    }

    fn catch_up(&mut self, now: NaiveDateTime, events: &[Event]) -> Vec<Reminder> {
        let since = self.watermark;
        if since.is_some_and(|last| now <= last) {
            return Vec::new();
        }
        self.watermark = Some(now);

        events
            .iter()
            .filter(|event| event.reminder)
            .filter_map(|event| match event.scheduled_at() {
                Some(at) => Some((event, at)),
                None => {
                    warn!("Skipping reminder for unparsable event '{}'", event);
                    None
                }
            })
            .filter(|(_, at)| match since {
                Some(last) => *at > last && *at <= now,
                None => *at == now,
            })
            .map(|(event, _)| Reminder::from(event))
            .collect()
    }
}

fn exact_matches(now: NaiveDateTime, events: &[Event]) -> Vec<Reminder> {
    let key = now.format(TIMESTAMP_FORMAT).to_string();

    events
        .iter()
        .filter(|event| event.reminder && event.timestamp_key() == key)
        .map(Reminder::from)
        .collect()
}

fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}
