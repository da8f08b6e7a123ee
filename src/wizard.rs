use crate::error::BookingError;
use crate::poll::NewPoll;
use crate::reservation::EventCategory;
use crate::selection::AvailabilitySelection;
use chrono::NaiveDate;
use itertools::Itertools;

/// The four screens of the reservation wizard.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    EventInfo,
    Dates,
    Slots,
    Confirm,
}

/// What-are-we-booking answers from the first step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInfo {
    pub title: String,
    pub category: EventCategory,
    pub headcount: u32,
}

/// Immutable wizard snapshot plus pure step transitions. The host UI owns
/// nothing but the current value; every `apply_*` validates its step's input
/// and returns the next snapshot, and `back` retreats one step with all
/// entered data retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    step: Step,
    event: EventInfo,
    dates: Vec<NaiveDate>,
    slots: AvailabilitySelection,
}

impl Default for WizardState {
    fn default() -> WizardState {
        WizardState::new()
    }
}

impl WizardState {
    /// Fresh wizard: first step, ensemble with a headcount of 4 prefilled,
    /// nothing chosen yet.
    pub fn new() -> WizardState {
        WizardState {
            step: Step::EventInfo,
            event: EventInfo {
                title: String::new(),
                category: EventCategory::Ensemble,
                headcount: 4,
            },
            dates: Vec::new(),
            slots: AvailabilitySelection::new(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn event(&self) -> &EventInfo {
        &self.event
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn slots(&self) -> &AvailabilitySelection {
        &self.slots
    }

    /// Step 1: title, category, headcount.
    pub fn apply_event_info(self, event: EventInfo) -> Result<WizardState, BookingError> {
        if event.title.trim().is_empty() {
            return Err(BookingError::EmptyField { field: "title" });
        }
        if event.headcount == 0 {
            return Err(BookingError::InvalidHeadcount);
        }
        Ok(WizardState {
            step: Step::Dates,
            event,
            ..self
        })
    }

    /// Step 2: candidate dates, deduplicated in first-seen order.
    pub fn apply_dates(self, dates: Vec<NaiveDate>) -> Result<WizardState, BookingError> {
        let dates = dates.into_iter().unique().collect_vec();
        if dates.is_empty() {
            return Err(BookingError::EmptyField { field: "dates" });
        }
        Ok(WizardState {
            step: Step::Slots,
            dates,
            ..self
        })
    }

    /// Step 3: the organizer's own availability; at least one slot.
    pub fn apply_slots(self, slots: AvailabilitySelection) -> Result<WizardState, BookingError> {
        if slots.is_empty() {
            return Err(BookingError::EmptyField { field: "selection" });
        }
        Ok(WizardState {
            step: Step::Confirm,
            slots,
            ..self
        })
    }

    /// Retreats one screen; entered data survives the round trip.
    pub fn back(self) -> WizardState {
        let step = match self.step {
            Step::EventInfo | Step::Dates => Step::EventInfo,
            Step::Slots => Step::Dates,
            Step::Confirm => Step::Slots,
        };
        WizardState { step, ..self }
    }

    /// Final step: the creation payload for the store. The organizer's slot
    /// picks stay behind on the state (via [`slots`](Self::slots)) to be
    /// submitted as the creator's first vote.
    pub fn into_new_poll(self, room_id: &str) -> Result<NewPoll, BookingError> {
        NewPoll::new(
            room_id,
            &self.event.title,
            self.event.category,
            self.event.headcount,
            self.dates,
        )
    }
}
