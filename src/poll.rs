use crate::error::BookingError;
use crate::reservation::{EventCategory, NewReservation, Reservation};
use crate::selection::AvailabilitySelection;
use crate::store::ScheduleStore;
use crate::time::Interval;
use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info};

/// A poll is open for voting until its time is confirmed; there is no way
/// back out of `Closed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PollState {
    Open,
    Closed,
}

/// A shareable scheduling request collecting availability before a final
/// time is confirmed.
///
/// The room is a first-class field here rather than being smuggled through
/// the category string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Poll {
    pub id: String,
    pub room_id: String,
    pub title: String,
    pub category: EventCategory,
    pub headcount: u32,
    pub dates: Vec<NaiveDate>,
    pub state: PollState,
}

impl Poll {
    pub fn is_open(&self) -> bool {
        self.state == PollState::Open
    }
}

/// Validated creation payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPoll {
    pub room_id: String,
    pub title: String,
    pub category: EventCategory,
    pub headcount: u32,
    pub dates: Vec<NaiveDate>,
}

impl NewPoll {
    /// Validates organizer input: non-empty title, positive headcount,
    /// at least one candidate date. Duplicate dates are collapsed, keeping
    /// first-seen order.
    pub fn new(
        room_id: &str,
        title: &str,
        category: EventCategory,
        headcount: u32,
        dates: Vec<NaiveDate>,
    ) -> Result<NewPoll, BookingError> {
        if title.trim().is_empty() {
            return Err(BookingError::EmptyField { field: "title" });
        }
        if headcount == 0 {
            return Err(BookingError::InvalidHeadcount);
        }
        let dates = dates.into_iter().unique().collect_vec();
        if dates.is_empty() {
            return Err(BookingError::EmptyField { field: "dates" });
        }
        Ok(NewPoll {
            room_id: room_id.to_string(),
            title: title.to_string(),
            category,
            headcount,
            dates,
        })
    }
}

/// One submitted availability ballot. Participant names are free-text
/// labels: nothing stops the same name voting twice, and the core does not
/// try to dedupe.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vote {
    pub poll_id: String,
    pub participant: String,
    pub selection: AvailabilitySelection,
}

/// Records a participant's ballot on an open poll (`OPEN -> OPEN`).
///
/// Rejects a blank name or an empty selection before anything reaches the
/// store.
pub fn submit_vote<S: ScheduleStore>(
    store: &mut S,
    poll_id: &str,
    participant: &str,
    selection: AvailabilitySelection,
) -> Result<(), BookingError> {
    if participant.trim().is_empty() {
        return Err(BookingError::EmptyField {
            field: "participant",
        });
    }
    if selection.is_empty() {
        return Err(BookingError::EmptyField { field: "selection" });
    }

    let poll = store.get_poll(poll_id)?;
    if !poll.is_open() {
        return Err(BookingError::PollClosed {
            id: poll_id.to_string(),
        });
    }

    debug!(
        "vote by {:?} on poll {} ({} slots)",
        participant,
        poll_id,
        selection.slot_count()
    );
    store.submit_vote(Vote {
        poll_id: poll_id.to_string(),
        participant: participant.to_string(),
        selection,
    })
}

/// Confirms an organizer-chosen final time (`OPEN -> CLOSED`).
///
/// The reservation insert is the store's atomic insert-if-no-conflict; on a
/// [`BookingError::Conflict`] the poll stays open, no reservation exists,
/// and the error carries the colliding interval so another time can be
/// chosen. The reservation is booked under the poll's title, in the poll's
/// room and category.
pub fn confirm_poll<S: ScheduleStore>(
    store: &mut S,
    poll_id: &str,
    date: NaiveDate,
    interval: Interval,
) -> Result<Reservation, BookingError> {
    let poll = store.get_poll(poll_id)?;
    if !poll.is_open() {
        return Err(BookingError::PollClosed {
            id: poll_id.to_string(),
        });
    }

    let reservation = store.insert_reservation(NewReservation {
        room_id: poll.room_id.clone(),
        date,
        interval,
        category: poll.category,
        owner: poll.title.clone(),
    })?;
    store.close_poll(poll_id)?;

    info!(
        "poll {} confirmed: {} {} in room {}",
        poll_id, date, interval, poll.room_id
    );
    Ok(reservation)
}

/// The single-participant path: when the organizer is the whole headcount,
/// each voted date becomes one reservation spanning from its earliest pick
/// to 30 minutes past its latest, gaps absorbed.
///
/// The dates go to the store as one all-or-nothing batch: a conflict on any
/// date books nothing, so the caller never ends up partially booked.
pub fn book_instant<S: ScheduleStore>(
    store: &mut S,
    poll: &Poll,
    selection: &AvailabilitySelection,
) -> Result<Vec<Reservation>, BookingError> {
    let batch = selection
        .dates()
        .filter_map(|date| {
            selection.spanning_interval(date).map(|interval| NewReservation {
                room_id: poll.room_id.clone(),
                date,
                interval,
                category: poll.category,
                owner: poll.title.clone(),
            })
        })
        .collect_vec();

    let booked = store.insert_reservations(batch)?;
    debug!("instant booking for poll {}: {} rows", poll.id, booked.len());
    Ok(booked)
}
