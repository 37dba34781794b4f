use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Lifecycle of a booking as the backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Booked,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "Cancellation Requested")]
    CancellationRequested,
    #[serde(rename = "Reschedule Requested")]
    RescheduleRequested,
    Cancelled,
    Rescheduled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 7] = [
        BookingStatus::Booked,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::CancellationRequested,
        BookingStatus::RescheduleRequested,
        BookingStatus::Cancelled,
        BookingStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "Booked",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::CancellationRequested => "Cancellation Requested",
            BookingStatus::RescheduleRequested => "Reschedule Requested",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Rescheduled => "Rescheduled",
        }
    }

    /// A cancellation or reschedule is waiting on the mentor.
    pub fn is_pending_request(&self) -> bool {
        matches!(
            self,
            BookingStatus::CancellationRequested | BookingStatus::RescheduleRequested
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| ParseError::Status(s.to_string()))
    }
}
