//! Platform wide limits an admin sets for mentor availability.
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ParseError, SlotError},
    slots::within_day,
    time::parse_clock_time,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPolicy {
    pub session_duration: u32,
    pub max_slots_per_day: u32,
    pub available_days: Vec<String>,
    pub time_range: ClockWindow,
    pub buffer_time: u32,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            session_duration: 30,
            max_slots_per_day: 4,
            available_days: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .map(str::to_string)
                .to_vec(),
            time_range: ClockWindow {
                start: "09:00".to_string(),
                end: "18:00".to_string(),
            },
            buffer_time: 15,
        }
    }
}

impl SessionPolicy {
    pub fn validate(&self) -> Result<(), SlotError> {
        if self.session_duration == 0 {
            return Err(SlotError::ZeroDuration);
        }

        within_day("sessionDuration", self.session_duration)?;
        within_day("bufferTime", self.buffer_time)?;

        if self.max_slots_per_day == 0 {
            return Err(SlotError::OutOfRange {
                field: "maxSlotsPerDay",
                value: 0,
            });
        }

        self.weekdays()?;

        let start = parse_clock_time(&self.time_range.start)?;
        let end = parse_clock_time(&self.time_range.end)?;
        if start >= end {
            return Err(ParseError::InvertedRange(format!(
                "{} - {}",
                self.time_range.start, self.time_range.end
            ))
            .into());
        }

        Ok(())
    }

    pub fn weekdays(&self) -> Result<Vec<Weekday>, SlotError> {
        self.available_days
            .iter()
            .map(|day| day.parse().map_err(|_| SlotError::Weekday(day.clone())))
            .collect()
    }

    pub fn allows_day(&self, weekday: Weekday) -> bool {
        self.weekdays()
            .is_ok_and(|weekdays| weekdays.contains(&weekday))
    }
}
