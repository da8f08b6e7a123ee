use crate::time::{Interval, SlotTime};
use chrono::NaiveDate;
use thiserror::Error;

/// Every failure the booking core can signal to its caller.
///
/// Variants group into four recoverability classes (see [`ErrorKind`]):
/// validation failures are rejected inputs, conflicts require the user to
/// pick another time, not-found errors are terminal for that one operation,
/// and store errors mean the external collaborator failed and nothing may be
/// assumed about partial success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("end time must be after start time ({start}..{end})")]
    InvalidInterval { start: SlotTime, end: SlotTime },

    #[error("operating window must open before it closes ({open}..{close})")]
    EmptyWindow { open: SlotTime, close: SlotTime },

    #[error("{input:?} is not a valid half-hour time")]
    BadTime { input: String },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{input:?} is not a known event category")]
    UnknownCategory { input: String },

    #[error("headcount must be at least 1")]
    InvalidHeadcount,

    #[error("poll {id} is already closed")]
    PollClosed { id: String },

    #[error("time slot already booked by a conflicting event ({date} {interval}, {owner})")]
    Conflict {
        date: NaiveDate,
        interval: Interval,
        owner: String,
    },

    #[error("poll {id} not found")]
    PollNotFound { id: String },

    #[error("reservation {id} not found")]
    ReservationNotFound { id: String },

    #[error("store operation failed: {reason}")]
    Store { reason: String },
}

/// Coarse error category for dispatch at the UI boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Store,
}

impl BookingError {
    /// Which of the four recoverability classes this value belongs to.
    ///
    /// # Examples
    /// ```
    /// use bandroom::error::{BookingError, ErrorKind};
    ///
    /// let err = BookingError::EmptyField { field: "title" };
    /// assert_eq!(err.kind(), ErrorKind::Validation);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::InvalidInterval { .. }
            | BookingError::EmptyWindow { .. }
            | BookingError::BadTime { .. }
            | BookingError::EmptyField { .. }
            | BookingError::UnknownCategory { .. }
            | BookingError::InvalidHeadcount
            | BookingError::PollClosed { .. } => ErrorKind::Validation,
            BookingError::Conflict { .. } => ErrorKind::Conflict,
            BookingError::PollNotFound { .. } | BookingError::ReservationNotFound { .. } => {
                ErrorKind::NotFound
            }
            BookingError::Store { .. } => ErrorKind::Store,
        }
    }
}
