use crate::error::BookingError;
use crate::poll::{NewPoll, Poll, PollState, Vote};
use crate::reservation::{
    find_conflict, NewReservation, Reservation, ReservationFilter, ReservationPatch,
    ReservationStatus,
};
use log::trace;
use std::collections::HashMap;

/// The external data-access collaborator.
///
/// `insert_reservation` and `update_reservation` are required to run the
/// conflict check and the write as one atomic operation; a separate
/// caller-side check-then-insert would race against concurrent
/// confirmations. A relational backend would realize this with an exclusion
/// constraint or per-room serialization; how is its business.
pub trait ScheduleStore {
    fn list_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, BookingError>;

    /// Atomic insert-if-no-conflict. Fails with [`BookingError::Conflict`]
    /// carrying the colliding interval, leaving the store unchanged.
    fn insert_reservation(&mut self, new: NewReservation) -> Result<Reservation, BookingError>;

    /// All-or-nothing variant for multi-row bookings: either every row is
    /// inserted or, on the first conflict, none are and the store is
    /// unchanged.
    fn insert_reservations(
        &mut self,
        batch: Vec<NewReservation>,
    ) -> Result<Vec<Reservation>, BookingError>;

    /// Time-range edit, re-checking conflicts with the edited row excluded
    /// from its own comparison set.
    fn update_reservation(
        &mut self,
        id: &str,
        patch: ReservationPatch,
    ) -> Result<Reservation, BookingError>;

    /// Cancellation is a status flip, never a delete.
    fn cancel_reservation(&mut self, id: &str) -> Result<(), BookingError>;

    fn create_poll(&mut self, new: NewPoll) -> Result<Poll, BookingError>;

    fn get_poll(&self, id: &str) -> Result<Poll, BookingError>;

    fn close_poll(&mut self, id: &str) -> Result<(), BookingError>;

    fn submit_vote(&mut self, vote: Vote) -> Result<(), BookingError>;

    fn list_votes(&self, poll_id: &str) -> Result<Vec<Vote>, BookingError>;
}

/// In-memory store: the reference semantics for the trait and the test
/// double. Single-threaded, so the insert-if-no-conflict atomicity demand
/// holds trivially.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reservations: Vec<Reservation>,
    polls: HashMap<String, Poll>,
    votes: Vec<Vote>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

impl ScheduleStore for MemoryStore {
    fn list_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, BookingError> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    fn insert_reservation(&mut self, new: NewReservation) -> Result<Reservation, BookingError> {
        if let Some(taken) = find_conflict(
            &self.reservations,
            &new.room_id,
            new.date,
            new.interval,
            new.category,
            None,
        ) {
            return Err(BookingError::Conflict {
                date: taken.date,
                interval: taken.interval,
                owner: taken.owner.clone(),
            });
        }

        let reservation = Reservation {
            id: self.next_id("res"),
            room_id: new.room_id,
            date: new.date,
            interval: new.interval,
            category: new.category,
            owner: new.owner,
            status: ReservationStatus::Confirmed,
        };
        trace!("insert reservation {}", reservation.id);
        self.reservations.push(reservation.clone());
        Ok(reservation)
    }

    fn insert_reservations(
        &mut self,
        batch: Vec<NewReservation>,
    ) -> Result<Vec<Reservation>, BookingError> {
        let mut staged: Vec<Reservation> = Vec::with_capacity(batch.len());
        for new in batch {
            let clash = find_conflict(
                &self.reservations,
                &new.room_id,
                new.date,
                new.interval,
                new.category,
                None,
            )
            .or_else(|| {
                find_conflict(&staged, &new.room_id, new.date, new.interval, new.category, None)
            });
            if let Some(taken) = clash {
                return Err(BookingError::Conflict {
                    date: taken.date,
                    interval: taken.interval,
                    owner: taken.owner.clone(),
                });
            }

            staged.push(Reservation {
                id: self.next_id("res"),
                room_id: new.room_id,
                date: new.date,
                interval: new.interval,
                category: new.category,
                owner: new.owner,
                status: ReservationStatus::Confirmed,
            });
        }
        trace!("insert batch of {} reservations", staged.len());
        self.reservations.extend(staged.iter().cloned());
        Ok(staged)
    }

    fn update_reservation(
        &mut self,
        id: &str,
        patch: ReservationPatch,
    ) -> Result<Reservation, BookingError> {
        let pos = self
            .reservations
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| BookingError::ReservationNotFound { id: id.to_string() })?;

        let date = patch.date.unwrap_or(self.reservations[pos].date);
        let interval = patch.interval.unwrap_or(self.reservations[pos].interval);
        let (room_id, category) = (
            self.reservations[pos].room_id.clone(),
            self.reservations[pos].category,
        );

        if let Some(taken) = find_conflict(
            &self.reservations,
            &room_id,
            date,
            interval,
            category,
            Some(id),
        ) {
            return Err(BookingError::Conflict {
                date: taken.date,
                interval: taken.interval,
                owner: taken.owner.clone(),
            });
        }

        let reservation = &mut self.reservations[pos];
        reservation.date = date;
        reservation.interval = interval;
        Ok(reservation.clone())
    }

    fn cancel_reservation(&mut self, id: &str) -> Result<(), BookingError> {
        let reservation = self
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| BookingError::ReservationNotFound { id: id.to_string() })?;
        reservation.status = ReservationStatus::Cancelled;
        Ok(())
    }

    fn create_poll(&mut self, new: NewPoll) -> Result<Poll, BookingError> {
        let poll = Poll {
            id: self.next_id("poll"),
            room_id: new.room_id,
            title: new.title,
            category: new.category,
            headcount: new.headcount,
            dates: new.dates,
            state: PollState::Open,
        };
        self.polls.insert(poll.id.clone(), poll.clone());
        Ok(poll)
    }

    fn get_poll(&self, id: &str) -> Result<Poll, BookingError> {
        self.polls
            .get(id)
            .cloned()
            .ok_or_else(|| BookingError::PollNotFound { id: id.to_string() })
    }

    fn close_poll(&mut self, id: &str) -> Result<(), BookingError> {
        let poll = self
            .polls
            .get_mut(id)
            .ok_or_else(|| BookingError::PollNotFound { id: id.to_string() })?;
        poll.state = PollState::Closed;
        Ok(())
    }

    fn submit_vote(&mut self, vote: Vote) -> Result<(), BookingError> {
        if !self.polls.contains_key(&vote.poll_id) {
            return Err(BookingError::PollNotFound {
                id: vote.poll_id.clone(),
            });
        }
        self.votes.push(vote);
        Ok(())
    }

    fn list_votes(&self, poll_id: &str) -> Result<Vec<Vote>, BookingError> {
        Ok(self
            .votes
            .iter()
            .filter(|vote| vote.poll_id == poll_id)
            .cloned()
            .collect())
    }
}
