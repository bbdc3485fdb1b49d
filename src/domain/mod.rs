//! Domain models for hbit
//!
//! Contains the core business logic without any I/O concerns.

mod habit;
mod tracker;

pub use habit::{Habit, HabitName, StateError};
pub use tracker::{
    Completion, CompletionKind, HabitView, Snapshot, TrackerError, TrackerState,
    DEFAULT_LIFELINE_INTERVAL, INTERVAL_PENALTY,
};
