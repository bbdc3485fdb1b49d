//! Tracker state and the streak/lifeline state machine
//!
//! `TrackerState` holds every habit plus three counters shared by all of
//! them:
//!
//! - `lifelines`: reward currency, earned whenever a streak lands on a
//!   multiple of `lifeline_interval`
//! - `fails`: number of broken streaks, all habits, all time
//! - `lifeline_interval`: streak length needed per lifeline; starts at 30
//!   and grows by 5 on every break
//!
//! ## Marking a habit done
//!
//! | Last completion | Outcome |
//! |-----------------|---------|
//! | today | rejected, [`TrackerError::AlreadyCompletedToday`] |
//! | never, or two or more days before today | streak continues |
//! | anything else (yesterday, or a future date) | streak breaks |
//!
//! Completing on consecutive calendar days counts as a break; skipping at
//! least one full day continues the streak.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use super::habit::{Habit, HabitName, StateError};

/// Streak length required per lifeline on a fresh tracker
pub const DEFAULT_LIFELINE_INTERVAL: u32 = 30;

/// Amount the lifeline interval grows by on every broken streak
pub const INTERVAL_PENALTY: u32 = 5;

/// Command errors; none of them change state
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Habit already exists: {0}")]
    DuplicateHabit(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("'{name}' has already been marked as done on {date}")]
    AlreadyCompletedToday { name: String, date: NaiveDate },

    #[error("Habit name cannot be empty")]
    EmptyName,
}

/// How a completion affected the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    /// Streak grew by one
    Continued,
    /// Streak reset to 1; fails and the lifeline interval went up
    Broken,
}

/// Result of a successful `mark_done`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub name: String,
    pub kind: CompletionKind,
    pub streak: u32,
    pub lifelines_earned: u32,
    pub lifeline_interval: u32,
}

/// One row of a [`Snapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitView {
    pub name: String,
    pub streak: u32,
    pub last_completed: Option<NaiveDate>,
}

/// Read-only view of the whole tracker, habits in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub habits: Vec<HabitView>,
    pub lifelines: u32,
    pub fails: u32,
    pub lifeline_interval: u32,
}

/// All habits and the shared reward counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    habits: IndexMap<HabitName, Habit>,
    lifelines: u32,
    fails: u32,
    lifeline_interval: u32,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            habits: IndexMap::new(),
            lifelines: 0,
            fails: 0,
            lifeline_interval: DEFAULT_LIFELINE_INTERVAL,
        }
    }
}

impl TrackerState {
    /// Creates an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a tracker from stored values
    pub fn restore(
        habits: IndexMap<HabitName, Habit>,
        lifelines: u32,
        fails: u32,
        lifeline_interval: u32,
    ) -> Result<Self, StateError> {
        if lifeline_interval == 0 {
            return Err(StateError::ZeroInterval);
        }
        Ok(Self {
            habits,
            lifelines,
            fails,
            lifeline_interval,
        })
    }

    pub fn habits(&self) -> impl Iterator<Item = (&HabitName, &Habit)> {
        self.habits.iter()
    }

    pub fn habit(&self, name: &str) -> Option<&Habit> {
        self.habits.get(name)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn lifelines(&self) -> u32 {
        self.lifelines
    }

    pub fn fails(&self) -> u32 {
        self.fails
    }

    pub fn lifeline_interval(&self) -> u32 {
        self.lifeline_interval
    }

    /// Adds a never-completed habit at the end of the list
    pub fn add_habit(&mut self, name: HabitName) -> Result<(), TrackerError> {
        if self.habits.contains_key(&name) {
            return Err(TrackerError::DuplicateHabit(name.into()));
        }
        self.habits.insert(name, Habit::new());
        Ok(())
    }

    /// Removes a habit and its streak; the order of the rest is kept
    pub fn delete_habit(&mut self, name: &str) -> Result<Habit, TrackerError> {
        self.habits
            .shift_remove(name)
            .ok_or_else(|| TrackerError::HabitNotFound(name.to_string()))
    }

    /// Marks a habit done on `today`
    pub fn mark_done(&mut self, name: &str, today: NaiveDate) -> Result<Completion, TrackerError> {
        let habit = self
            .habits
            .get_mut(name)
            .ok_or_else(|| TrackerError::HabitNotFound(name.to_string()))?;

        let kind = match habit.last_completed() {
            Some(last) if last == today => {
                return Err(TrackerError::AlreadyCompletedToday {
                    name: name.to_string(),
                    date: today,
                });
            }
            None => CompletionKind::Continued,
            // `pred_opt` is only None at the minimum date, where nothing is earlier.
            Some(last) if today.pred_opt().is_some_and(|yesterday| last < yesterday) => {
                CompletionKind::Continued
            }
            Some(_) => CompletionKind::Broken,
        };

        let mut lifelines_earned = 0;
        match kind {
            CompletionKind::Continued => {
                habit.extend(today);
                if habit.streak() % self.lifeline_interval == 0 {
                    lifelines_earned = 1;
                    self.lifelines = self.lifelines.saturating_add(1);
                }
            }
            CompletionKind::Broken => {
                habit.restart(today);
                self.fails = self.fails.saturating_add(1);
                self.lifeline_interval = self.lifeline_interval.saturating_add(INTERVAL_PENALTY);
            }
        }

        Ok(Completion {
            name: name.to_string(),
            kind,
            streak: habit.streak(),
            lifelines_earned,
            lifeline_interval: self.lifeline_interval,
        })
    }

    /// Read-only copy of the tracker for display
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            habits: self
                .habits
                .iter()
                .map(|(name, habit)| HabitView {
                    name: name.to_string(),
                    streak: habit.streak(),
                    last_completed: habit.last_completed(),
                })
                .collect(),
            lifelines: self.lifelines,
            fails: self.fails,
            lifeline_interval: self.lifeline_interval,
        }
    }
}
