//! Profile files and input validation.
//!
//! The planning engine trusts its input. This module is the gate in front
//! of it: profiles read from disk are range-checked here before use.

use crate::{Error, Result, UserProfile};
use std::path::Path;

pub const MIN_AGE: u32 = 16;
pub const MAX_AGE: u32 = 80;

const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);
const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 300.0);

fn check_range(errors: &mut Vec<String>, field: &str, value: f64, (min, max): (f64, f64)) {
    if !value.is_finite() || value < min || value > max {
        errors.push(format!("{} must be between {} and {}, got {}", field, min, max, value));
    }
}

impl UserProfile {
    /// Load a profile from a TOML file (or JSON when the extension is `.json`)
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;

        let profile = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            _ => toml::from_str(&contents)?,
        };

        tracing::debug!("Loaded profile from {:?}", path);
        Ok(profile)
    }

    /// Check the profile against the supported input ranges
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.age < MIN_AGE || self.age > MAX_AGE {
            errors.push(format!(
                "age must be between {} and {}, got {}",
                MIN_AGE, MAX_AGE, self.age
            ));
        }
        check_range(&mut errors, "height_cm", self.height_cm, HEIGHT_RANGE_CM);
        check_range(&mut errors, "weight_kg", self.weight_kg, WEIGHT_RANGE_KG);
        check_range(&mut errors, "target_weight_kg", self.target_weight_kg, WEIGHT_RANGE_KG);

        if !(crate::workouts::MIN_SESSIONS_PER_WEEK..=crate::workouts::MAX_SESSIONS_PER_WEEK)
            .contains(&self.workouts_per_week)
        {
            errors.push(format!(
                "workouts_per_week must be between {} and {}, got {}",
                crate::workouts::MIN_SESSIONS_PER_WEEK,
                crate::workouts::MAX_SESSIONS_PER_WEEK,
                self.workouts_per_week
            ));
        }

        errors
    }

    /// Load and validate in one step
    pub fn load_validated(path: &Path) -> Result<Self> {
        let profile = Self::load_from(path)?;
        let errors = profile.validate();
        if errors.is_empty() {
            Ok(profile)
        } else {
            Err(Error::Profile(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::tests::example_profile;
    use crate::Goal;

    const PROFILE_TOML: &str = r#"
sex = "male"
age = 30
height_cm = 178.0
weight_kg = 80.0
target_weight_kg = 75.0
goal = "lose_weight"
activity_level = "moderate"
workouts_per_week = 4
equipment = "full_gym"
"#;

    #[test]
    fn test_example_profile_is_valid() {
        assert!(example_profile().validate().is_empty());
    }

    #[test]
    fn test_out_of_range_fields_reported() {
        let profile = UserProfile {
            age: 12,
            height_cm: 90.0,
            weight_kg: f64::NAN,
            workouts_per_week: 9,
            ..example_profile()
        };

        let errors = profile.validate();
        assert_eq!(errors.len(), 4, "{:?}", errors);
        assert!(errors[0].starts_with("age"));
        assert!(errors.iter().any(|e| e.starts_with("workouts_per_week")));
    }

    #[test]
    fn test_load_toml_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.toml");
        std::fs::write(&path, PROFILE_TOML).unwrap();

        let profile = UserProfile::load_validated(&path).unwrap();
        assert_eq!(profile.goal, Goal::LoseWeight);
        assert_eq!(profile.workouts_per_week, 4);
    }

    #[test]
    fn test_load_json_profile() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");
        std::fs::write(&path, serde_json::to_string(&example_profile()).unwrap()).unwrap();

        let profile = UserProfile::load_from(&path).unwrap();
        assert_eq!(profile, example_profile());
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.toml");
        std::fs::write(&path, PROFILE_TOML.replace("age = 30", "age = 95")).unwrap();

        let err = UserProfile::load_validated(&path).unwrap_err();
        assert!(matches!(err, Error::Profile(_)));
    }

    #[test]
    fn test_malformed_profile_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.toml");
        std::fs::write(&path, "sex = \"unknown\"").unwrap();

        assert!(UserProfile::load_from(&path).is_err());
    }
}
