//! Read access to the stored fighters, events and bouts.

use tracing::debug;

use super::{JsonlReader, StorageConfig, StorageError};
use crate::models::{Bout, Event, EventId, Fighter, FighterId};

/// Lookups over one data directory. Files are re-read on every call, so the
/// store never serves stale data after a refresh on disk.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    config: StorageConfig,
}

impl SnapshotStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn fighters_reader(&self) -> JsonlReader<Fighter> {
        JsonlReader::new(self.config.fighters_path())
    }

    /// Fighter by ID.
    pub fn fighter(&self, id: &FighterId) -> Result<Option<Fighter>, StorageError> {
        debug!("Looking up fighter {}", id);
        self.fighters_reader().find(|f| &f.fighter_id == id)
    }

    /// All fighters ordered by ID.
    pub fn fighters(&self) -> Result<Vec<Fighter>, StorageError> {
        let mut fighters = self.fighters_reader().read_all()?;
        fighters.sort_by(|a, b| a.fighter_id.cmp(&b.fighter_id));
        Ok(fighters)
    }

    /// Fighters whose name or nickname contains `query`, ignoring case.
    pub fn search_fighters(&self, query: &str) -> Result<Vec<Fighter>, StorageError> {
        let needle = query.trim().to_lowercase();
        let matches = |f: &Fighter| {
            f.name.to_lowercase().contains(&needle)
                || f.nickname
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
        };
        Ok(self.fighters()?.into_iter().filter(|f| matches(f)).collect())
    }

    /// Event by ID.
    pub fn event(&self, id: &EventId) -> Result<Option<Event>, StorageError> {
        JsonlReader::<Event>::new(self.config.events_path()).find(|e| &e.event_id == id)
    }

    /// All events, newest first.
    pub fn events(&self) -> Result<Vec<Event>, StorageError> {
        let mut events = JsonlReader::<Event>::new(self.config.events_path()).read_all()?;
        events.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(events)
    }

    /// Bouts of an event, in the order they were fought.
    pub fn bouts_for_event(&self, event: &Event) -> Result<Vec<Bout>, StorageError> {
        let bouts: Vec<Bout> = JsonlReader::<Bout>::new(self.config.bouts_path())
            .read_all()?
            .into_iter()
            .filter(|b| b.event.event_id == event.event_id)
            .collect();

        Ok(event.order_bouts(&bouts).into_iter().cloned().collect())
    }
}
