//! hbit - A local-first habit tracker
//!
//! Habits build streaks one completion at a time. Streaks convert into
//! "lifelines" every `lifeline_interval` completions, and every broken
//! streak raises that interval for all habits.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Completion, CompletionKind, Habit, HabitName, Snapshot, TrackerError, TrackerState};
pub use storage::{Applied, HabitStore, StateFile};
