//! Per-weekday workout completion log.
//!
//! Each weekday holds at most one completion record. Completing a day
//! again replaces its record; un-completing removes it. The log lives
//! next to the stored plan and is independent of it, so regenerating the
//! plan keeps the week's progress.

use crate::types::{Weekday, WorkoutFocus};
use crate::{storage, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// File name of the workout log under `<data_dir>/state/`
pub const WORKOUT_LOG_FILE_NAME: &str = "workout_log.json";

/// What was actually performed for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseLog {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

impl FromStr for ExerciseLog {
    type Err = Error;

    /// Parse `NAME:SETS:REPS` or `NAME:SETS:REPS:KG`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Other(format!("invalid exercise '{}', expected NAME:SETS:REPS[:KG]", s));

        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let (name, sets, reps, weight) = match parts.as_slice() {
            [name, sets, reps] => (*name, *sets, *reps, None),
            [name, sets, reps, weight] => (*name, *sets, *reps, Some(*weight)),
            _ => return Err(invalid()),
        };
        if name.is_empty() {
            return Err(invalid());
        }

        let weight_kg = match weight {
            Some(w) => Some(
                w.parse::<f64>()
                    .ok()
                    .filter(|kg| kg.is_finite() && *kg >= 0.0)
                    .ok_or_else(invalid)?,
            ),
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            sets: sets.parse().map_err(|_| invalid())?,
            reps: reps.parse().map_err(|_| invalid())?,
            weight_kg,
        })
    }
}

/// A completed workout for one weekday
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLogEntry {
    pub id: Uuid,
    pub day: Weekday,
    pub focus: WorkoutFocus,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
}

/// Completion records keyed by weekday
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    #[serde(default)]
    pub completed: BTreeMap<Weekday, WorkoutLogEntry>,
}

impl WorkoutLog {
    /// Location of the workout log for a data directory
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join("state").join(WORKOUT_LOG_FILE_NAME)
    }

    pub fn is_completed(&self, day: Weekday) -> bool {
        self.completed.contains_key(&day)
    }

    pub fn get(&self, day: Weekday) -> Option<&WorkoutLogEntry> {
        self.completed.get(&day)
    }

    /// Number of days marked done
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Mark `day` done, replacing any earlier record for it
    pub fn complete_workout(
        &mut self,
        day: Weekday,
        focus: WorkoutFocus,
        exercises: Vec<ExerciseLog>,
    ) -> &WorkoutLogEntry {
        let entry = WorkoutLogEntry {
            id: Uuid::new_v4(),
            day,
            focus,
            completed_at: Utc::now(),
            exercises,
        };
        tracing::debug!("Completed {} ({:?})", day, focus);

        self.completed.insert(day, entry);
        &self.completed[&day]
    }

    /// Remove the record for `day`, returning it if there was one
    pub fn uncomplete_workout(&mut self, day: Weekday) -> Option<WorkoutLogEntry> {
        self.completed.remove(&day)
    }

    /// Load the log with shared locking
    ///
    /// Returns an empty log if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty log.
    pub fn load(path: &Path) -> Result<Self> {
        let log = storage::load_json::<WorkoutLog>(path, "workout log")?.unwrap_or_default();
        tracing::debug!("Loaded {} completed workouts from {:?}", log.completed_count(), path);
        Ok(log)
    }

    /// Save the log atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        storage::save_json(path, self)?;
        tracing::debug!("Saved workout log to {:?}", path);
        Ok(())
    }

    /// Load the log, modify it, and save it back
    ///
    /// Concurrent updates of the same file run one after another.
    pub fn update<F, R>(path: &Path, f: F) -> Result<R>
    where
        F: FnOnce(&mut WorkoutLog) -> Result<R>,
    {
        storage::with_update_lock(path, || {
            let mut log = Self::load(path)?;
            let result = f(&mut log)?;
            log.save(path)?;
            Ok(result)
        })
    }

    /// Remove the log file if present
    pub fn clear(path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("Cleared workout log {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
