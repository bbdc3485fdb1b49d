//! JSON storage for the tracker state
//!
//! The whole tracker lives in one JSON document (`habits.json` by default):
//!
//! ```json
//! {
//!   "version": 1,
//!   "habits": {
//!     "Run": { "streak": 3, "last_completed": "2024-01-05" },
//!     "Read": { "streak": 0, "last_completed": null }
//!   },
//!   "lifelines": 0,
//!   "fails": 1,
//!   "lifeline_interval": 35
//! }
//! ```
//!
//! Habit order in the object is display order. Saves go through a temp file
//! and an atomic rename, so a crash mid-write leaves the previous save intact.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitName, StateError, TrackerState, DEFAULT_LIFELINE_INTERVAL};

/// Newest document version this build reads and the one it writes
pub const FORMAT_VERSION: u32 = 1;

/// On-disk shape of a habit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct HabitRecord {
    streak: u32,
    last_completed: Option<NaiveDate>,
}

/// On-disk shape of the tracker; every field falls back to a fresh value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct StateDocument {
    version: u32,
    habits: IndexMap<String, HabitRecord>,
    lifelines: u32,
    fails: u32,
    lifeline_interval: u32,
}

impl Default for StateDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            habits: IndexMap::new(),
            lifelines: 0,
            fails: 0,
            lifeline_interval: DEFAULT_LIFELINE_INTERVAL,
        }
    }
}

impl From<&TrackerState> for StateDocument {
    fn from(state: &TrackerState) -> Self {
        Self {
            version: FORMAT_VERSION,
            habits: state
                .habits()
                .map(|(name, habit)| {
                    let record = HabitRecord {
                        streak: habit.streak(),
                        last_completed: habit.last_completed(),
                    };
                    (name.to_string(), record)
                })
                .collect(),
            lifelines: state.lifelines(),
            fails: state.fails(),
            lifeline_interval: state.lifeline_interval(),
        }
    }
}

impl StateDocument {
    /// Validates the document and turns it into a tracker
    fn into_state(self) -> Result<TrackerState, StateError> {
        let mut habits = IndexMap::with_capacity(self.habits.len());
        for (raw_name, record) in self.habits {
            let habit = Habit::restore(&raw_name, record.streak, record.last_completed)?;
            habits.insert(HabitName::new(&raw_name)?, habit);
        }
        TrackerState::restore(habits, self.lifelines, self.fails, self.lifeline_interval)
    }
}

/// Store for the tracker state in a single JSON file
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Creates a store backed by the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a state has been saved before
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Path of the scratch file used while saving
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "habits.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Loads the tracker; a missing file is a fresh tracker
    pub fn load(&self) -> Result<TrackerState> {
        if !self.path.exists() {
            return Ok(TrackerState::new());
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open state file: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on state file")?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        let doc: StateDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        if doc.version > FORMAT_VERSION {
            anyhow::bail!(
                "State file {} has version {}, this build reads up to version {}",
                self.path.display(),
                doc.version,
                FORMAT_VERSION
            );
        }

        doc.into_state()
            .with_context(|| format!("Invalid state in {}", self.path.display()))
    }

    /// Saves the full tracker (temp file + atomic rename)
    pub fn save(&self, state: &TrackerState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.temp_path();
        let doc = StateDocument::from(state);

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on state file")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, &doc).context("Failed to serialize state")?;
            writeln!(writer).context("Failed to write state")?;
            writer.flush().context("Failed to flush state file")?;
            drop(writer);

            file.sync_all().context("Failed to sync state file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_state() -> TrackerState {
        let mut state = TrackerState::new();
        for name in ["Run", "Read", "Meditate"] {
            state.add_habit(HabitName::new(name).unwrap()).unwrap();
        }
        let d = date(2024, 1, 1);
        state.mark_done("Run", d).unwrap();
        state.mark_done("Run", d + Days::new(1)).unwrap();
        state.mark_done("Meditate", d + Days::new(5)).unwrap();
        state
    }

    #[test]
    fn missing_file_is_fresh_state() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("habits.json"));

        let state = file.load().unwrap();
        assert_eq!(state, TrackerState::new());
        assert_eq!(state.lifeline_interval(), 30);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("habits.json"));
        let state = sample_state();

        file.save(&state).unwrap();
        let loaded = file.load().unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.fails(), 1);
        assert_eq!(loaded.lifeline_interval(), 35);
        assert!(loaded.habit("Read").unwrap().last_completed().is_none());
    }

    #[test]
    fn empty_state_roundtrip() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("habits.json"));

        file.save(&TrackerState::new()).unwrap();
        assert_eq!(file.load().unwrap(), TrackerState::new());
    }

    #[test]
    fn habit_order_survives_roundtrip() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("habits.json"));

        let mut state = TrackerState::new();
        for name in ["zeta", "alpha", "mid"] {
            state.add_habit(HabitName::new(name).unwrap()).unwrap();
        }
        file.save(&state).unwrap();

        let loaded = file.load().unwrap();
        let names: Vec<_> = loaded.habits().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn null_date_is_written_explicitly() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("habits.json"));

        let mut state = TrackerState::new();
        state.add_habit(HabitName::new("Read").unwrap()).unwrap();
        file.save(&state).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["habits"]["Read"]["streak"], 0);
        assert!(raw["habits"]["Read"]["last_completed"].is_null());
        assert_eq!(raw["lifeline_interval"], 30);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(&path, r#"{"habits": {"Run": {"streak": 2, "last_completed": "2024-01-03"}, "Read": {}}}"#)
            .unwrap();

        let state = StateFile::new(&path).load().unwrap();
        assert_eq!(state.len(), 2);
        assert_eq!(state.lifelines(), 0);
        assert_eq!(state.fails(), 0);
        assert_eq!(state.lifeline_interval(), 30);
        assert!(state.habit("Read").unwrap().is_new());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(&path, "not json").unwrap();

        let err = StateFile::new(&path).load().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse state file"));
    }

    #[test]
    fn inconsistent_habit_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(&path, r#"{"habits": {"Run": {"streak": 4, "last_completed": null}}}"#).unwrap();

        let err = StateFile::new(&path).load().unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid state"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(&path, r#"{"lifeline_interval": 0}"#).unwrap();

        assert!(StateFile::new(&path).load().is_err());
    }

    #[test]
    fn newer_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("habits.json");
        fs::write(&path, r#"{"version": 2}"#).unwrap();

        let err = StateFile::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("nested").join("dir").join("habits.json"));

        file.save(&TrackerState::new()).unwrap();
        assert!(file.exists());
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("habits.json"));

        file.save(&sample_state()).unwrap();
        assert!(!file.temp_path().exists());
        assert_eq!(file.temp_path(), dir.path().join("habits.json.tmp"));
    }

    #[test]
    fn failed_save_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("habits.json"));
        let state = sample_state();
        file.save(&state).unwrap();

        // A directory squatting on the temp path makes the next save fail early.
        fs::create_dir(file.temp_path()).unwrap();
        assert!(file.save(&TrackerState::new()).is_err());

        assert_eq!(file.load().unwrap(), state);
    }
}
