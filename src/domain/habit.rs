//! Habit domain model
//!
//! A habit is identified by its name alone. Its state is the current streak
//! and the calendar date it was last completed.
//!
//! Invariant: `streak == 0` exactly when `last_completed` is absent. A habit
//! that was completed at least once always has `streak >= 1`.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tracker::TrackerError;

/// Errors raised when restoring state that breaks a model invariant
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Habit '{name}' has streak {streak} but a last completion of {last_completed:?}")]
    InconsistentHabit {
        name: String,
        streak: u32,
        last_completed: Option<NaiveDate>,
    },

    #[error("Lifeline interval must be at least 1")]
    ZeroInterval,

    #[error(transparent)]
    InvalidName(#[from] TrackerError),
}

/// Display name of a habit, trimmed and non-empty
///
/// Names are case-sensitive: `Run` and `run` are different habits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HabitName(String);

impl HabitName {
    /// Creates a name from user input, trimming surrounding whitespace
    pub fn new(raw: &str) -> Result<Self, TrackerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TrackerError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HabitName {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for HabitName {
    type Error = TrackerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<HabitName> for String {
    fn from(name: HabitName) -> Self {
        name.0
    }
}

// Lets the habit map be queried with a plain `&str`.
impl Borrow<str> for HabitName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Streak state of a single habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Habit {
    streak: u32,
    last_completed: Option<NaiveDate>,
}

impl Habit {
    /// A habit that has never been completed
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a habit from stored values, checking the streak/date invariant
    pub fn restore(
        name: &str,
        streak: u32,
        last_completed: Option<NaiveDate>,
    ) -> Result<Self, StateError> {
        if (streak == 0) != last_completed.is_none() {
            return Err(StateError::InconsistentHabit {
                name: name.to_string(),
                streak,
                last_completed,
            });
        }
        Ok(Self {
            streak,
            last_completed,
        })
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.last_completed
    }

    /// Returns true if the habit has never been marked done
    pub fn is_new(&self) -> bool {
        self.last_completed.is_none()
    }

    /// Completions left until the streak next lands on a multiple of `interval`
    pub fn next_reward_in(&self, interval: u32) -> u32 {
        let interval = interval.max(1);
        interval - self.streak % interval
    }

    /// Records a completion that extends the streak
    pub(crate) fn extend(&mut self, today: NaiveDate) {
        self.streak = self.streak.saturating_add(1);
        self.last_completed = Some(today);
    }

    /// Records a completion that broke the streak; today counts as the first day
    pub(crate) fn restart(&mut self, today: NaiveDate) {
        self.streak = 1;
        self.last_completed = Some(today);
    }
}
