//! Current-plan persistence with file locking.
//!
//! The stored plan is the owned counterpart of a generated `CoachPlan`,
//! plus the profile it came from. Schedules are never stored; they are
//! rebuilt from the diet and workout plans on load.

use crate::schedule::{build_schedule, CoachPlan, DailySchedule};
use crate::types::*;
use crate::{storage, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File name of the stored plan under `<data_dir>/state/`
pub const STATE_FILE_NAME: &str = "coach_plan.json";

/// The persisted "current plan"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredCoachState {
    pub plan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub summary: NutritionTargets,
    pub diet_plan: WeeklyDietPlan,
    pub workout_plan: WeeklyWorkoutPlan,

    /// Opaque richer plan attached by an external generator, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_plan: Option<serde_json::Value>,
}

impl StoredCoachState {
    /// Wrap a freshly generated plan with a new id and timestamp
    pub fn new(profile: UserProfile, plan: CoachPlan) -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile,
            summary: plan.summary,
            diet_plan: plan.diet_plan,
            workout_plan: plan.workout_plan,
            ai_plan: None,
        }
    }

    /// Location of the stored plan for a data directory
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join("state").join(STATE_FILE_NAME)
    }

    /// Rebuild the weekly schedule from the stored plans
    pub fn schedule(&self) -> Vec<DailySchedule<'_>> {
        build_schedule(Some(&self.diet_plan), &self.workout_plan)
    }

    /// Advance one day's workout to the next focus in the cycle
    ///
    /// Returns the new focus.
    pub fn cycle_focus(&mut self, day: Weekday) -> WorkoutFocus {
        let focus = self.workout_plan.get(day).focus.cycle();
        self.workout_plan =
            crate::workouts::with_focus(&self.workout_plan, day, focus, self.profile.goal);
        focus
    }

    /// Load the stored plan with shared locking
    ///
    /// Returns `None` if the file doesn't exist. If the file is unreadable
    /// or corrupted, logs a warning and returns `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let state = storage::load_json::<StoredCoachState>(path, "stored plan")?;
        if let Some(ref state) = state {
            tracing::debug!("Loaded plan {} from {:?}", state.plan_id, path);
        }
        Ok(state)
    }

    /// Save the plan atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        storage::save_json(path, self)?;
        tracing::debug!("Saved plan {} to {:?}", self.plan_id, path);
        Ok(())
    }

    /// Load the stored plan, modify it, and save it back
    ///
    /// Concurrent updates of the same file run one after another, so none
    /// is lost. Fails if there is no stored plan.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut StoredCoachState) -> Result<()>,
    {
        storage::with_update_lock(path, || {
            let mut state = Self::load(path)?.ok_or_else(|| {
                Error::State("no stored plan, run `coach plan --profile <file>` first".into())
            })?;
            f(&mut state)?;
            state.save(path)?;
            Ok(state)
        })
    }

    /// Remove the stored plan if present
    ///
    /// Returns whether a file was removed.
    pub fn clear(path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("Cleared stored plan {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_plan;
    use crate::nutrition::tests::example_profile;

    fn stored_example() -> StoredCoachState {
        let profile = example_profile();
        let plan = generate_plan(&profile);
        StoredCoachState::new(profile, plan)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = StoredCoachState::default_path(temp_dir.path());

        let state = stored_example();
        state.save(&path).unwrap();

        let loaded = StoredCoachState::load(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.summary.target_calories, 2290.0);
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        assert!(StoredCoachState::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_corrupted_state_returns_none() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.json");

        std::fs::write(&path, "{ invalid json }").unwrap();

        let result = StoredCoachState::load(&path);
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_incomplete_week_is_treated_as_corrupt() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("coach_plan.json");

        let mut value = serde_json::to_value(stored_example()).unwrap();
        value["workout_plan"]
            .as_object_mut()
            .unwrap()
            .remove("sunday");
        std::fs::write(&path, value.to_string()).unwrap();

        assert!(StoredCoachState::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("coach_plan.json");

        stored_example().save(&path).unwrap();
        stored_example().save(&path).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "coach_plan.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only coach_plan.json, found extras: {:?}",
            extras
        );
    }

    #[test]
    fn test_ai_plan_preserved_verbatim() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("coach_plan.json");

        let mut state = stored_example();
        state.ai_plan = Some(serde_json::json!({
            "headline": "Steady cut",
            "weeks": [{"focus": "volume", "notes": null}]
        }));
        state.save(&path).unwrap();

        let loaded = StoredCoachState::load(&path).unwrap().unwrap();
        assert_eq!(loaded.ai_plan, state.ai_plan);
    }

    #[test]
    fn test_schedule_rehydrates_from_plans() {
        let state = stored_example();
        let schedule = state.schedule();

        assert_eq!(schedule.len(), 7);
        assert_eq!(schedule[0].day, Weekday::Monday);
        assert_eq!(schedule[6].workout.focus, WorkoutFocus::Rest);
        assert!(schedule.iter().all(|entry| entry.diet.is_some()));
    }

    #[test]
    fn test_cycle_focus_rebuilds_day_only() {
        let mut state = stored_example();
        let before = state.workout_plan.clone();

        let focus = state.cycle_focus(Weekday::Wednesday);

        assert_eq!(focus, WorkoutFocus::Rest.cycle());
        let session = state.workout_plan.get(Weekday::Wednesday);
        assert_eq!(session.focus, focus);
        assert!(!session.is_rest_day);
        for day in Weekday::ALL.into_iter().filter(|d| *d != Weekday::Wednesday) {
            assert_eq!(state.workout_plan.get(day), before.get(day));
        }
    }

    #[test]
    fn test_update_persists_change() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("coach_plan.json");
        stored_example().save(&path).unwrap();

        let updated = StoredCoachState::update(&path, |state| {
            state.cycle_focus(Weekday::Sunday);
            Ok(())
        })
        .unwrap();

        let loaded = StoredCoachState::load(&path).unwrap().unwrap();
        assert_eq!(loaded, updated);
        assert_eq!(loaded.workout_plan.get(Weekday::Sunday).focus, WorkoutFocus::FullBody);
    }

    #[test]
    fn test_update_without_plan_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("coach_plan.json");

        let err = StoredCoachState::update(&path, |_| Ok(())).unwrap_err();
        assert!(matches!(err, Error::State(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = std::sync::Arc::new(temp_dir.path().join("coach_plan.json"));
        stored_example().save(&path).unwrap();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let path = std::sync::Arc::clone(&path);
                std::thread::spawn(move || {
                    StoredCoachState::update(&path, |state| {
                        state.cycle_focus(Weekday::Sunday);
                        Ok(())
                    })
                    .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // rest -> full_body -> upper_push -> upper_pull
        let loaded = StoredCoachState::load(&path).unwrap().unwrap();
        assert_eq!(loaded.workout_plan.get(Weekday::Sunday).focus, WorkoutFocus::UpperPull);
    }

    #[test]
    fn test_clear() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("coach_plan.json");

        stored_example().save(&path).unwrap();
        assert!(StoredCoachState::clear(&path).unwrap());
        assert!(!path.exists());
        assert!(!StoredCoachState::clear(&path).unwrap());
    }
}
