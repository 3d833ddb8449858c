//! Fight card (event) model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Bout, BoutId, EventId};

/// A fight card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub event_id: EventId,

    /// Event name (e.g. "UFC 300: Pereira vs. Hill")
    pub name: String,

    /// Date of the card
    pub date: NaiveDate,

    /// Venue location (city, state, country)
    #[serde(default)]
    pub location: String,

    /// Bout IDs as listed on the card: main event first, earliest prelim last
    #[serde(default)]
    pub bout_order: Vec<BoutId>,
}

impl Event {
    pub fn new(event_id: EventId, name: String, date: NaiveDate) -> Self {
        Self {
            event_id,
            name,
            date,
            location: String::new(),
            bout_order: Vec::new(),
        }
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: String) -> Self {
        self.location = location;
        self
    }

    /// Builder method to set the card order.
    pub fn with_bout_order(mut self, bout_order: Vec<BoutId>) -> Self {
        self.bout_order = bout_order;
        self
    }

    /// Bout IDs in the order they were fought (earliest prelim first).
    pub fn bouts_in_fight_order(&self) -> impl Iterator<Item = &BoutId> {
        self.bout_order.iter().rev()
    }

    /// Arrange bouts in fight order. Bouts not on the card are dropped, and
    /// card entries without a matching bout are skipped.
    pub fn order_bouts<'a>(&self, bouts: &'a [Bout]) -> Vec<&'a Bout> {
        self.bouts_in_fight_order()
            .filter_map(|id| bouts.iter().find(|b| &b.bout_id == id))
            .collect()
    }
}
