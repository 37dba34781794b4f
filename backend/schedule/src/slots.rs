//! # Slots
//!
//! Helpers behind the mentor slot form and the student booking calendar.
//!
//! ## Generation
//! - Mentor picks a start and end in 24-hour `HH:MM`, a slot length and a buffer
//! - Slots are laid back to back with the buffer in between
//! - A slot that would run past the end is dropped, never shortened
//! - Length and buffer are capped at one day
//!
//! ## Calendar
//! - Dates handed back to the backend are always zero padded `dd-mm-yyyy`
//! - Students only see open slots from today up to the booking window
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    error::SlotError,
    time::{
        MINUTES_PER_DAY, TimeRange, Window, format_clock_time, format_date, parse_clock_time,
        parse_date,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSlot {
    pub display: String,
    pub start: String,
    pub end: String,
}

impl From<TimeRange> for GeneratedSlot {
    fn from(range: TimeRange) -> Self {
        Self {
            display: range.to_string(),
            start: format_clock_time(range.start()),
            end: format_clock_time(range.end()),
        }
    }
}

pub(crate) fn within_day(field: &'static str, value: u32) -> Result<u32, SlotError> {
    if value > MINUTES_PER_DAY {
        return Err(SlotError::OutOfRange { field, value });
    }

    Ok(value)
}

pub fn generate_slots(
    start: &str,
    end: &str,
    duration: u32,
    buffer: u32,
) -> Result<Vec<GeneratedSlot>, SlotError> {
    if duration == 0 {
        return Err(SlotError::ZeroDuration);
    }

    let duration = within_day("duration", duration)?;
    let buffer = within_day("buffer", buffer)?;

    let mut cursor = parse_clock_time(start)?;
    let end = parse_clock_time(end)?;
    let mut slots = Vec::new();

    while cursor + duration <= end {
        if let Some(range) = TimeRange::new(cursor, cursor + duration) {
            slots.push(range.into());
        }

        cursor += duration + buffer;
    }

    Ok(slots)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Day {
    pub weekday: String,
    pub date: String,
    pub iso: String,
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self {
            weekday: date.format("%a").to_string(),
            date: format_date(date),
            iso: date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// `n` consecutive days starting with `today`.
pub fn upcoming_days(today: NaiveDate, n: u32) -> Vec<Day> {
    (0..n)
        .map(|offset| Day::from(today + Duration::days(offset.into())))
        .collect()
}

/// Monday through Sunday of the week containing `today`.
pub fn current_week(today: NaiveDate) -> Vec<Day> {
    let monday = today - Duration::days(today.weekday().num_days_from_monday().into());

    upcoming_days(monday, 7)
}

/// Next `weekday` strictly after `today`; the same weekday rolls to next week.
pub fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = i64::from(today.weekday().num_days_from_sunday());
    let target = i64::from(weekday.num_days_from_sunday());

    let mut days = target - current;
    if days <= 0 {
        days += 7;
    }

    today + Duration::days(days)
}

pub fn within_booking_window(date: NaiveDate, today: NaiveDate, days: u32) -> bool {
    date >= today
        && today
            .checked_add_signed(Duration::days(days.into()))
            .is_none_or(|last| date <= last)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup<T> {
    pub date: String,
    pub weekday: Option<String>,
    pub items: Vec<T>,
}

/// Groups items by their stored date string, keeping first-seen order.
///
/// Groups whose date does not parse keep a `None` weekday instead of failing.
pub fn group_by_date<T, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<DateGroup<T>>
where
    F: Fn(&T) -> &str,
{
    let mut groups: Vec<DateGroup<T>> = Vec::new();

    for item in items {
        let date = key(&item).to_string();

        match groups.iter_mut().find(|group| group.date == date) {
            Some(group) => group.items.push(item),
            None => groups.push(DateGroup {
                weekday: parse_date(&date)
                    .ok()
                    .map(|parsed| parsed.format("%A").to_string()),
                date,
                items: vec![item],
            }),
        }
    }

    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Upcoming,
    Past,
}

impl Tab {
    /// Ongoing sessions belong to neither tab.
    pub fn includes(&self, window: Window) -> bool {
        matches!(
            (self, window),
            (Tab::Upcoming, Window::Upcoming) | (Tab::Past, Window::Past)
        )
    }
}
