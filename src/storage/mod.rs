//! # Storage Layer
//!
//! Persistence and configuration for hbit.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tracker state | JSON | `<data dir>/habits.json` |
//! | Config | TOML | `<config dir>/config.toml` |
//!
//! ## Write Safety
//!
//! - [`StateFile`] writes to `habits.json.tmp` under an exclusive `fs2`
//!   lock, syncs, then renames over the real file
//! - Reads take a shared lock
//! - [`HabitStore`] saves after every change and retries failed saves
//!
//! ## Key Types
//!
//! - [`HabitStore`] - Sole writer of the tracker state
//! - [`StateFile`] - Load/save the tracker as JSON
//! - [`Config`] - User configuration

mod config;
mod state_file;
mod store;

pub use config::{Config, ConfigError, DisplayConfig, DATA_FILE_NAME};
pub use state_file::{StateFile, FORMAT_VERSION};
pub use store::{Applied, HabitStore};
