//! # Command-Line Interface
//!
//! The presentation shell: every command forwards to [`HabitStore`] and
//! renders the result.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `add <name>` | Start tracking a habit |
//! | `delete <name>` | Stop tracking a habit (asks first unless `--yes`) |
//! | `done <name>` | Mark a habit done today (or `--date`) |
//! | `list` | Habits in the order they were added |
//! | `status` | Lifelines, fails and the lifeline interval |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - One JSON object per command
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! hbit --verbose done Run
//! ```
//!
//! [`HabitStore`]: crate::storage::HabitStore

mod app;
mod habit;
mod output;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
