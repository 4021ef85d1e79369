/// Format of `Event::date`. Zero-padded, so string order is date order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of `Event::time` (24-hour clock).
pub const TIME_FORMAT: &str = "%H:%M";

/// Format of the minute-granularity key the poller compares against.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Seconds between two reminder checks unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Header row of the events file.
pub const CSV_HEADER: [&str; 4] = ["Title", "Date", "Time", "Reminder"];
