use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    error::ParseError,
    status::BookingStatus,
    time::{SessionWindow, Window},
};

pub const JOIN: &str = "Join";
pub const NOT_STARTED: &str = "Not Started";
pub const SESSION_ENDED: &str = "Session Ended";
pub const AWAITING_APPROVAL: &str = "Awaiting Approval";
pub const CANCELLED: &str = "Cancelled";
pub const SESSION_COMPLETED: &str = "Session Completed";

/// Which session actions a viewer may take right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub join_enabled: bool,
    pub join_label: &'static str,
    pub cancel_allowed: bool,
    pub reschedule_allowed: bool,
}

impl UiState {
    fn disabled(join_label: &'static str) -> Self {
        Self {
            join_enabled: false,
            join_label,
            cancel_allowed: false,
            reschedule_allowed: false,
        }
    }

    pub fn derive(status: BookingStatus, window: Window) -> Self {
        use BookingStatus::*;

        match (status, window) {
            (Booked | InProgress | Rescheduled, Window::Upcoming) => Self {
                join_enabled: false,
                join_label: NOT_STARTED,
                cancel_allowed: true,
                reschedule_allowed: true,
            },
            (Booked | InProgress | Rescheduled, Window::Ongoing) => Self {
                join_enabled: true,
                ..Self::disabled(JOIN)
            },
            (Booked | InProgress | Rescheduled, Window::Past) => Self::disabled(SESSION_ENDED),
            (CancellationRequested | RescheduleRequested, _) => Self::disabled(AWAITING_APPROVAL),
            (Cancelled, _) => Self::disabled(CANCELLED),
            (Completed, _) => Self::disabled(SESSION_COMPLETED),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub window: Window,
    pub ui: UiState,
}

/// Classifies a stored booking against `now`.
///
/// Any malformed field is returned as an error; callers pick their own fallback.
pub fn session_state(
    status: &str,
    date: &str,
    time: &str,
    now: NaiveDateTime,
) -> Result<SessionState, ParseError> {
    let status: BookingStatus = status.parse()?;
    let window = SessionWindow::parse(date, time)?.classify(now);

    Ok(SessionState {
        window,
        ui: UiState::derive(status, window),
    })
}
