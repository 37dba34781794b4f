use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid date `{0}`, expected dd-mm-yyyy")]
    Date(String),

    #[error("Invalid time `{0}`, expected h:mm AM/PM")]
    Time(String),

    #[error("Invalid 24-hour time `{0}`, expected HH:MM")]
    Clock(String),

    #[error("Invalid time range `{0}`, expected h:mm AM/PM - h:mm AM/PM")]
    TimeRange(String),

    #[error("Invalid date and time `{0}`, expected yyyy-mm-ddThh:mm")]
    DateTime(String),

    #[error("Time range `{0}` ends before it starts")]
    InvertedRange(String),

    #[error("Unknown booking status `{0}`")]
    Status(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Slot duration must be at least one minute")]
    ZeroDuration,

    #[error("{field} of {value} is out of range")]
    OutOfRange { field: &'static str, value: u32 },

    #[error("Unknown weekday `{0}`")]
    Weekday(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
