//! Habit store
//!
//! [`HabitStore`] is the only writer of the tracker state. Every successful
//! command is saved right away. When a save fails the in-memory state is
//! kept and marked dirty, and the next successful command (or
//! [`HabitStore::flush`]) saves it again.

use anyhow::Result;
use chrono::NaiveDate;

use super::StateFile;
use crate::domain::{Completion, Habit, HabitName, Snapshot, TrackerError, TrackerState};

/// Result of a command that changed state
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    /// Why the change could not be saved, if it could not
    pub save_error: Option<anyhow::Error>,
}

impl<T> Applied<T> {
    /// Returns true if the change reached disk
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Owns the tracker state and persists it after every change
pub struct HabitStore {
    state: TrackerState,
    file: StateFile,
    dirty: bool,
}

impl HabitStore {
    /// Loads the store from its state file; a missing file starts fresh
    pub fn open(file: StateFile) -> Result<Self> {
        let state = file.load()?;
        Ok(Self {
            state,
            file,
            dirty: false,
        })
    }

    /// Current tracker state (read-only)
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Ordered read-only view for display
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn file(&self) -> &StateFile {
        &self.file
    }

    /// Returns true if the last save failed and state is ahead of disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Adds a habit with the given display name (trimmed)
    pub fn add_habit(&mut self, name: &str) -> Result<Applied<HabitName>, TrackerError> {
        let name = HabitName::new(name)?;
        self.state.add_habit(name.clone())?;
        Ok(self.persist(name))
    }

    /// Deletes a habit, returning its final state
    pub fn delete_habit(&mut self, name: &str) -> Result<Applied<Habit>, TrackerError> {
        let removed = self.state.delete_habit(name)?;
        Ok(self.persist(removed))
    }

    /// Marks a habit done on `today`
    ///
    /// `AlreadyCompletedToday` leaves state untouched and does not save.
    pub fn mark_done(
        &mut self,
        name: &str,
        today: NaiveDate,
    ) -> Result<Applied<Completion>, TrackerError> {
        let completion = self.state.mark_done(name, today)?;
        Ok(self.persist(completion))
    }

    /// Saves the current state if a previous save failed
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.file.save(&self.state)?;
            self.dirty = false;
        }
        Ok(())
    }

    fn persist<T>(&mut self, value: T) -> Applied<T> {
        let save_error = self.file.save(&self.state).err();
        self.dirty = save_error.is_some();
        Applied { value, save_error }
    }
}
