//! Group availability aggregation and slot-conflict resolution for a band
//! club's rehearsal-room booking.
//!
//! The crate is the pure core behind a scheduling-poll UI: a half-hour
//! [`time`] grid and per-participant [`selection`]s, a vote [`tally`] that
//! ranks candidate slots, the same-category conflict rule over
//! [`reservation`]s, and the [`poll`] lifecycle from creation through voting
//! to confirmation. Everything operates on in-memory snapshots handed in by
//! the caller; persistence sits behind the [`store::ScheduleStore`] trait.

pub mod error;
pub mod poll;
pub mod reservation;
pub mod selection;
pub mod store;
pub mod tally;
pub mod time;
pub mod wizard;
