use crate::poll::Vote;
use crate::time::{OperatingWindow, SlotTime};
use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;

/// Vote count for one (date, slot) pair, ready for heatmap rendering or
/// recommendation display.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotTally {
    pub date: NaiveDate,
    pub time: SlotTime,
    pub count: usize,
}

/// Number of votes whose selection for `date` includes `time`.
pub fn vote_count(votes: &[Vote], date: NaiveDate, time: SlotTime) -> usize {
    votes
        .iter()
        .filter(|vote| vote.selection.contains(date, time))
        .count()
}

/// Display names of everyone available at the slot, in submission order.
pub fn voters<'a>(votes: &'a [Vote], date: NaiveDate, time: SlotTime) -> Vec<&'a str> {
    votes
        .iter()
        .filter(|vote| vote.selection.contains(date, time))
        .map(|vote| vote.participant.as_str())
        .collect()
}

/// Heatmap intensity in `0.0..=1.0`: vote count over total votes, guarded
/// against division by zero while the poll is still empty.
pub fn heat(votes: &[Vote], date: NaiveDate, time: SlotTime) -> f32 {
    vote_count(votes, date, time) as f32 / votes.len().max(1) as f32
}

/// Ranks every candidate (date, slot) pair by popularity.
///
/// Pairs with zero votes are dropped. Order is count descending, then date
/// ascending, then time ascending, so ties always resolve the same way no
/// matter the input order. The ranking is advisory: it does not consult the
/// conflict checker, and a top slot may still fail confirmation.
///
/// # Examples
/// ```
/// use bandroom::tally::rank_slots;
/// use bandroom::time::OperatingWindow;
///
/// let window = OperatingWindow::new(
///     "09:00".parse().unwrap(),
///     "23:00".parse().unwrap(),
/// )
/// .unwrap();
/// let date = "2025-12-01".parse().unwrap();
///
/// // No votes yet: an empty ranking, not an error.
/// assert!(rank_slots(&[], &[date], window).is_empty());
/// ```
pub fn rank_slots(votes: &[Vote], dates: &[NaiveDate], window: OperatingWindow) -> Vec<SlotTally> {
    let mut tallies = dates
        .iter()
        .flat_map(|&date| window.slots().map(move |time| (date, time)))
        .map(|(date, time)| SlotTally {
            date,
            time,
            count: vote_count(votes, date, time),
        })
        .filter(|tally| tally.count > 0)
        .collect_vec();

    tallies.sort_unstable_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.date.cmp(&b.date))
            .then(a.time.cmp(&b.time))
    });

    debug!(
        "ranked {} candidate slots across {} dates from {} votes",
        tallies.len(),
        dates.len(),
        votes.len()
    );

    tallies
}

/// The `n` most popular slots; the voting page shows the top 3.
pub fn best_slots(
    votes: &[Vote],
    dates: &[NaiveDate],
    window: OperatingWindow,
    n: usize,
) -> Vec<SlotTally> {
    let mut tallies = rank_slots(votes, dates, window);
    tallies.truncate(n);
    tallies
}
