use crate::time::{Interval, OperatingWindow, SlotTime};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of a single grid interaction.
///
/// Occupied and out-of-window slots are soft rejections: the selection is
/// left untouched and the caller decides how to surface it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Cleared,
    Blocked,
    OutOfRange,
}

/// How a drag run applies to each slot it crosses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DragMode {
    Select,
    Deselect,
    Toggle,
}

/// One participant's self-reported availability: per date, the set of
/// half-hour slot starts they can make.
///
/// Set semantics per date; an empty selection is valid and distinct from not
/// having voted at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AvailabilitySelection(BTreeMap<NaiveDate, BTreeSet<SlotTime>>);

impl AvailabilitySelection {
    pub fn new() -> AvailabilitySelection {
        AvailabilitySelection::default()
    }

    pub fn contains(&self, date: NaiveDate, time: SlotTime) -> bool {
        self.0.get(&date).is_some_and(|times| times.contains(&time))
    }

    /// Dates that currently hold at least one selected slot, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0
            .iter()
            .filter(|(_, times)| !times.is_empty())
            .map(|(&date, _)| date)
    }

    /// Selected slot starts for one date, ascending.
    pub fn times(&self, date: NaiveDate) -> impl Iterator<Item = SlotTime> + '_ {
        self.0.get(&date).into_iter().flatten().copied()
    }

    /// Total selected slots across all dates.
    pub fn slot_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Flips one slot. Occupancy is caller-supplied (slots already booked
    /// elsewhere), not stored in the grid.
    ///
    /// Toggling the same slot twice restores the original selection.
    ///
    /// # Examples
    /// ```
    /// use bandroom::selection::{AvailabilitySelection, Toggle};
    /// use bandroom::time::OperatingWindow;
    ///
    /// let window = OperatingWindow::new(
    ///     "09:00".parse().unwrap(),
    ///     "23:00".parse().unwrap(),
    /// )
    /// .unwrap();
    /// let date = "2025-12-01".parse().unwrap();
    /// let occupied = AvailabilitySelection::new();
    ///
    /// let mut mine = AvailabilitySelection::new();
    /// let t = "14:00".parse().unwrap();
    ///
    /// assert_eq!(mine.toggle(date, t, window, &occupied), Toggle::Selected);
    /// assert_eq!(mine.toggle(date, t, window, &occupied), Toggle::Cleared);
    /// assert!(mine.is_empty());
    ///
    /// // Outside the operating window: soft rejection, no change.
    /// let early = "08:00".parse().unwrap();
    /// assert_eq!(mine.toggle(date, early, window, &occupied), Toggle::OutOfRange);
    /// ```
    pub fn toggle(
        &mut self,
        date: NaiveDate,
        time: SlotTime,
        window: OperatingWindow,
        occupied: &AvailabilitySelection,
    ) -> Toggle {
        if !window.contains(time) {
            return Toggle::OutOfRange;
        }
        if occupied.contains(date, time) {
            return Toggle::Blocked;
        }
        let times = self.0.entry(date).or_default();
        if times.remove(&time) {
            if times.is_empty() {
                self.0.remove(&date);
            }
            Toggle::Cleared
        } else {
            times.insert(time);
            Toggle::Selected
        }
    }

    /// Forced select/deselect of one slot, idempotent. Same guards as
    /// [`toggle`](Self::toggle).
    pub fn set(
        &mut self,
        date: NaiveDate,
        time: SlotTime,
        on: bool,
        window: OperatingWindow,
        occupied: &AvailabilitySelection,
    ) -> Toggle {
        if !window.contains(time) {
            return Toggle::OutOfRange;
        }
        if occupied.contains(date, time) {
            return Toggle::Blocked;
        }
        if on {
            self.0.entry(date).or_default().insert(time);
            Toggle::Selected
        } else {
            if let Some(times) = self.0.get_mut(&date) {
                times.remove(&time);
                if times.is_empty() {
                    self.0.remove(&date);
                }
            }
            Toggle::Cleared
        }
    }

    /// Applies a drag run across `times`. Slots are deduplicated first so
    /// the result does not depend on the order the run was traced in.
    pub fn drag(
        &mut self,
        date: NaiveDate,
        times: &[SlotTime],
        mode: DragMode,
        window: OperatingWindow,
        occupied: &AvailabilitySelection,
    ) {
        let run: BTreeSet<SlotTime> = times.iter().copied().collect();
        for time in run {
            match mode {
                DragMode::Select => {
                    self.set(date, time, true, window, occupied);
                }
                DragMode::Deselect => {
                    self.set(date, time, false, window, occupied);
                }
                DragMode::Toggle => {
                    self.toggle(date, time, window, occupied);
                }
            }
        }
    }

    /// Collapses one date's picks into the single spanning interval used by
    /// the instant-booking path: earliest pick to 30 minutes past the latest
    /// pick. Gaps between non-contiguous picks are absorbed.
    ///
    /// `None` when the date has no picks. A latest pick of `23:30` yields an
    /// end of `24:00`.
    ///
    /// # Examples
    /// ```
    /// use bandroom::selection::{AvailabilitySelection, DragMode};
    /// use bandroom::time::OperatingWindow;
    ///
    /// let window = OperatingWindow::new(
    ///     "09:00".parse().unwrap(),
    ///     "22:00".parse().unwrap(),
    /// )
    /// .unwrap();
    /// let date = "2025-12-05".parse().unwrap();
    /// let none = AvailabilitySelection::new();
    ///
    /// let mut picks = AvailabilitySelection::new();
    /// picks.drag(
    ///     date,
    ///     &[
    ///         "13:00".parse().unwrap(),
    ///         "13:30".parse().unwrap(),
    ///         "14:00".parse().unwrap(),
    ///     ],
    ///     DragMode::Select,
    ///     window,
    ///     &none,
    /// );
    ///
    /// let span = picks.spanning_interval(date).unwrap();
    /// assert_eq!(span.to_string(), "13:00-14:30");
    /// ```
    pub fn spanning_interval(&self, date: NaiveDate) -> Option<Interval> {
        let times = self.0.get(&date)?;
        let first = *times.iter().next()?;
        let last = *times.iter().next_back()?;
        // Slot starts are < 24:00, so last.next() cannot fail.
        let end = last.next().ok()?;
        Interval::new(first, end).ok()
    }
}
