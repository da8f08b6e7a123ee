use crate::error::BookingError;
use crate::time::{Interval, OperatingWindow};
use chrono::NaiveDate;
use core::fmt;
use std::str::FromStr;

/// What a room is being used for. The store-facing string values are the
/// Korean labels the club actually uses.
///
/// Only full-band rehearsals compete for the room: two ensembles cannot share
/// it, but personal practice and breaks coexist with anything.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventCategory {
    #[cfg_attr(feature = "serde", serde(rename = "합주"))]
    Ensemble,
    #[cfg_attr(feature = "serde", serde(rename = "개인연습"))]
    SoloPractice,
    #[cfg_attr(feature = "serde", serde(rename = "휴식"))]
    Break,
}

impl EventCategory {
    /// The same-category conflict rule: true iff both sides are
    /// [`Ensemble`](EventCategory::Ensemble).
    ///
    /// # Examples
    /// ```
    /// use bandroom::reservation::EventCategory::*;
    ///
    /// assert!(Ensemble.conflicts_with(Ensemble));
    /// assert!(!Ensemble.conflicts_with(SoloPractice));
    /// assert!(!SoloPractice.conflicts_with(SoloPractice));
    /// assert!(!Break.conflicts_with(Ensemble));
    /// ```
    pub fn conflicts_with(self, other: EventCategory) -> bool {
        matches!((self, other), (EventCategory::Ensemble, EventCategory::Ensemble))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Ensemble => "합주",
            EventCategory::SoloPractice => "개인연습",
            EventCategory::Break => "휴식",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "합주" => Ok(EventCategory::Ensemble),
            "개인연습" => Ok(EventCategory::SoloPractice),
            "휴식" => Ok(EventCategory::Break),
            _ => Err(BookingError::UnknownCategory {
                input: s.to_string(),
            }),
        }
    }
}

/// Reservations are never hard-deleted; cancellation is a status change and
/// cancelled rows drop out of conflict checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

/// A rehearsal room. The operating window bounds which slots may ever be
/// offered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id: String,
    pub name: String,
    pub window: OperatingWindow,
}

/// A confirmed or cancelled booking row as the store returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reservation {
    pub id: String,
    pub room_id: String,
    pub date: NaiveDate,
    pub interval: Interval,
    pub category: EventCategory,
    pub owner: String,
    pub status: ReservationStatus,
}

/// Insert payload; the store assigns the id and the Confirmed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub room_id: String,
    pub date: NaiveDate,
    pub interval: Interval,
    pub category: EventCategory,
    pub owner: String,
}

/// Partial update for a time-range edit. `None` fields keep their current
/// value; the store re-runs the conflict check excluding the edited row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationPatch {
    pub date: Option<NaiveDate>,
    pub interval: Option<Interval>,
}

/// Query filter for reading reservations back out of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub room_id: Option<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub status: Option<ReservationStatus>,
    pub category: Option<EventCategory>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.room_id
            .as_deref()
            .map_or(true, |room| reservation.room_id == room)
            && self.date_range.map_or(true, |(from, to)| {
                from <= reservation.date && reservation.date <= to
            })
            && self.status.map_or(true, |s| reservation.status == s)
            && self.category.map_or(true, |c| reservation.category == c)
    }
}

/// Finds the first confirmed reservation the candidate would collide with,
/// or `None` if the interval is free.
///
/// Only same-room, same-date, conflicting-category rows are considered, and
/// `exclude_id` removes the reservation being edited from its own comparison
/// set. The candidate interval is well-formed by construction, so no
/// start/end validation happens here.
///
/// # Examples
/// ```
/// use bandroom::reservation::{
///     find_conflict, EventCategory, Reservation, ReservationStatus,
/// };
/// use bandroom::time::Interval;
///
/// let date = "2025-12-01".parse().unwrap();
/// let existing = vec![Reservation {
///     id: "r1".into(),
///     room_id: "1".into(),
///     date,
///     interval: Interval::new("18:00".parse().unwrap(), "19:00".parse().unwrap()).unwrap(),
///     category: EventCategory::Ensemble,
///     owner: "정기합주".into(),
///     status: ReservationStatus::Confirmed,
/// }];
///
/// let candidate = Interval::new("18:30".parse().unwrap(), "19:30".parse().unwrap()).unwrap();
///
/// // Another ensemble collides; personal practice never does.
/// assert!(find_conflict(&existing, "1", date, candidate, EventCategory::Ensemble, None).is_some());
/// assert!(find_conflict(&existing, "1", date, candidate, EventCategory::SoloPractice, None).is_none());
/// ```
pub fn find_conflict<'a>(
    existing: &'a [Reservation],
    room_id: &str,
    date: NaiveDate,
    interval: Interval,
    category: EventCategory,
    exclude_id: Option<&str>,
) -> Option<&'a Reservation> {
    existing.iter().find(|r| {
        r.status == ReservationStatus::Confirmed
            && r.room_id == room_id
            && r.date == date
            && r.category.conflicts_with(category)
            && exclude_id.map_or(true, |id| r.id != id)
            && r.interval.overlaps(interval)
    })
}

/// Whether [`find_conflict`] would reject the candidate.
pub fn has_conflict(
    existing: &[Reservation],
    room_id: &str,
    date: NaiveDate,
    interval: Interval,
    category: EventCategory,
    exclude_id: Option<&str>,
) -> bool {
    find_conflict(existing, room_id, date, interval, category, exclude_id).is_some()
}
