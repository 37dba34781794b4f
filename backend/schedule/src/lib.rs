//! # Schedule
//!
//! Pure slot/session time logic shared by every page that lists sessions.
//!
//! ## Records
//! The backend owns bookings and slots. We only read:
//! - booking `status`, one of the [`BookingStatus`] display strings
//! - `slot.date` as `dd-mm-yyyy`
//! - `slot.time` as `h:mm AM/PM - h:mm AM/PM`
//!
//! ## Flow
//! 1. Parse the slot into a [`SessionWindow`] of absolute instants
//! 2. Classify it against `now` as upcoming, ongoing or past
//! 3. Derive the join/cancel/reschedule [`UiState`] from status and window
//!
//! Nothing here reads the clock. Callers pass `now` in.
pub mod error;
pub mod policy;
pub mod slots;
pub mod state;
pub mod status;
pub mod time;

pub use error::{ParseError, SlotError};
pub use policy::{ClockWindow, SessionPolicy};
pub use slots::{
    DateGroup, Day, GeneratedSlot, Tab, current_week, generate_slots, group_by_date, next_weekday,
    upcoming_days, within_booking_window,
};
pub use state::{SessionState, UiState, session_state};
pub use status::BookingStatus;
pub use time::{
    SessionWindow, TimeRange, Window, format_clock_time, format_date, format_meridian_time,
    parse_clock_time, parse_date, parse_local_datetime, parse_meridian_time, parse_time_range,
};
