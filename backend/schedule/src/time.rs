//! # Time Model
//!
//! Slots are stored by the backend as two strings:
//! - date: `dd-mm-yyyy`, zero padded when we generate it, but older records are not
//! - time: `h:mm AM/PM - h:mm AM/PM`
//!
//! Everything here works on absolute instants (date + minutes from midnight) so a
//! session is never compared by its date or its time alone.
//!
//! Ranges that cross midnight (`11:00 PM - 12:00 AM`) are rejected with
//! [`ParseError::InvertedRange`] rather than rolled into the next day.
use std::{fmt, sync::LazyLock};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").expect("date pattern"));

static MERIDIAN_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})\s*([AaPp][Mm])$").expect("12-hour time pattern")
});

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("24-hour time pattern"));

pub fn parse_date(input: &str) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::Date(input.to_string());

    let captures = DATE.captures(input.trim()).ok_or_else(invalid)?;
    let day: u32 = captures[1].parse().map_err(|_| invalid())?;
    let month: u32 = captures[2].parse().map_err(|_| invalid())?;
    let year: i32 = captures[3].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Parses `h:mm AM/PM` into minutes from midnight.
///
/// `12 AM` is midnight and `12 PM` is noon. An hour of `0` is accepted as
/// midnight so `00:00 AM` reads the same as `12:00 AM`.
pub fn parse_meridian_time(input: &str) -> Result<u32, ParseError> {
    let invalid = || ParseError::Time(input.to_string());

    let captures = MERIDIAN_TIME.captures(input.trim()).ok_or_else(invalid)?;
    let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minute: u32 = captures[2].parse().map_err(|_| invalid())?;
    let is_pm = captures[3].eq_ignore_ascii_case("pm");

    if hour > 12 || minute > 59 {
        return Err(invalid());
    }

    let hour = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (hour, true) => hour + 12,
        (hour, false) => hour,
    };

    Ok(hour * 60 + minute)
}

pub fn format_meridian_time(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    let hour = minutes / 60;
    let minute = minutes % 60;

    let meridian = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };

    format!("{display_hour}:{minute:02} {meridian}")
}

/// Parses a 24-hour `HH:MM` form value into minutes from midnight.
pub fn parse_clock_time(input: &str) -> Result<u32, ParseError> {
    let invalid = || ParseError::Clock(input.to_string());

    let captures = CLOCK_TIME.captures(input.trim()).ok_or_else(invalid)?;
    let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minute: u32 = captures[2].parse().map_err(|_| invalid())?;

    if hour > 23 || minute > 59 {
        return Err(invalid());
    }

    Ok(hour * 60 + minute)
}

pub fn format_clock_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parses a `datetime-local` form value, with or without seconds.
pub fn parse_local_datetime(input: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = input.trim();

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ParseError::DateTime(input.to_string()))
}

/// Start and end of a slot as minutes from midnight, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: u32,
    end: u32,
}

impl TimeRange {
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start <= end && end < MINUTES_PER_DAY).then_some(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

pub fn parse_time_range(input: &str) -> Result<TimeRange, ParseError> {
    let (start, end) = input
        .split_once('-')
        .ok_or_else(|| ParseError::TimeRange(input.to_string()))?;

    let start = parse_meridian_time(start)?;
    let end = parse_meridian_time(end)?;

    TimeRange::new(start, end).ok_or_else(|| ParseError::InvertedRange(input.to_string()))
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_meridian_time(self.start),
            format_meridian_time(self.end)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Upcoming,
    Ongoing,
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SessionWindow {
    pub fn new(date: NaiveDate, range: TimeRange) -> Self {
        let midnight = date.and_time(NaiveTime::MIN);

        Self {
            start: midnight + Duration::minutes(range.start().into()),
            end: midnight + Duration::minutes(range.end().into()),
        }
    }

    /// Builds the window straight from the stored slot strings.
    pub fn parse(date: &str, time: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse_date(date)?, parse_time_range(time)?))
    }

    pub fn classify(&self, now: NaiveDateTime) -> Window {
        if now < self.start {
            Window::Upcoming
        } else if now > self.end {
            Window::Past
        } else {
            Window::Ongoing
        }
    }
}
