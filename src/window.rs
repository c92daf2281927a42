use std::fmt;

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Timestamp, ToSpan};

/// Number of days covered by a window that does not start on the first of a month
const DEFAULT_WINDOW_DAYS: i32 = 30;

/// Inclusive `[start, end]` range of merge times, in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime,
    pub end: DateTime,
}

impl DateWindow {
    /// Build the window from the dates given on the command line.
    ///
    /// `start` begins at midnight. An explicit `end` covers that whole day;
    /// otherwise the end is derived with [`resolve_end`].
    pub fn resolve(start: Date, end: Option<Date>) -> Self {
        let start = start_of_day(start);
        let end = match end {
            Some(end) => end_of_day(end),
            None => resolve_end(start),
        };
        Self { start, end }
    }

    /// Whether `merged_at` falls inside the window, both ends included
    pub fn contains(&self, merged_at: Timestamp) -> bool {
        let merged_at = to_utc(merged_at);
        self.start <= merged_at && merged_at <= self.end
    }

    /// Whether `merged_at` lies before the start of the window
    pub fn is_before_start(&self, merged_at: Timestamp) -> bool {
        to_utc(merged_at) < self.start
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Derive the end of a window when only its start is known.
///
/// A start on the first of a month yields the last day of that month,
/// anything else yields the day 30 days later. The end is always the last
/// microsecond of its day.
pub fn resolve_end(start: DateTime) -> DateTime {
    let date = start.date();
    if date.day() == 1 {
        end_of_day(date.last_of_month())
    } else {
        end_of_day(date.saturating_add(DEFAULT_WINDOW_DAYS.days()))
    }
}

/// Default start date: 30 days before `today`
pub fn default_start(today: Date) -> Date {
    today.saturating_sub(DEFAULT_WINDOW_DAYS.days())
}

fn start_of_day(date: Date) -> DateTime {
    date.at(0, 0, 0, 0)
}

fn end_of_day(date: Date) -> DateTime {
    date.at(23, 59, 59, 999_999_000)
}

fn to_utc(timestamp: Timestamp) -> DateTime {
    timestamp.to_zoned(TimeZone::UTC).datetime()
}
