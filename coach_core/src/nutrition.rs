//! Nutrition target calculator.
//!
//! Maps a profile to energy and macronutrient targets:
//! - BMR via Mifflin-St Jeor
//! - Maintenance calories from a fixed activity factor table
//! - Goal-dependent calorie delta, clamped to a safe range
//! - Protein/fat from goal tables, carbs fill the remainder

use crate::{ActivityLevel, Goal, MacroTargets, NutritionTargets, Sex, UserProfile};

/// Lowest daily calorie target ever prescribed
pub const MIN_TARGET_CALORIES: f64 = 1500.0;

/// Highest daily calorie target ever prescribed
pub const MAX_TARGET_CALORIES: f64 = 4200.0;

const MIN_CARBS_GRAMS: f64 = 80.0;
const MIN_FIBER_GRAMS: f64 = 20.0;
const MAX_FIBER_GRAMS: f64 = 40.0;
const MIN_HYDRATION_LITERS: f64 = 2.5;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Multiplier applied to BMR for a given activity level
pub fn activity_factor(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::Athlete => 1.9,
    }
}

/// Calories added to maintenance for a goal
pub fn goal_delta(goal: Goal) -> i32 {
    match goal {
        Goal::LoseWeight => -450,
        Goal::GainWeight => 350,
        Goal::BuildMuscle => 250,
    }
}

/// Grams of protein per kg of reference weight
fn protein_multiplier(goal: Goal) -> f64 {
    match goal {
        Goal::LoseWeight => 1.8,
        Goal::GainWeight => 1.6,
        Goal::BuildMuscle => 2.0,
    }
}

/// Share of target calories that comes from fat
fn fat_ratio(goal: Goal) -> f64 {
    match goal {
        Goal::LoseWeight => 0.25,
        Goal::GainWeight => 0.30,
        Goal::BuildMuscle => 0.27,
    }
}

/// Round half away from zero to `precision` decimal places
pub(crate) fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

/// Basal metabolic rate (Mifflin-St Jeor)
pub fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    let sex_adjustment = match profile.sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };

    10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age)
        + sex_adjustment
}

/// Compute energy, macro and hydration targets for a profile
///
/// The profile is assumed to be validated already; out-of-range input
/// yields mathematically defined output. Intermediate values stay
/// unrounded and only the returned fields are rounded.
pub fn calculate_summary(profile: &UserProfile) -> NutritionTargets {
    let bmr = basal_metabolic_rate(profile);
    let activity_factor = activity_factor(profile.activity_level);
    let maintenance_calories = bmr * activity_factor;

    let delta = goal_delta(profile.goal);
    let target_calories = (maintenance_calories + f64::from(delta))
        .clamp(MIN_TARGET_CALORIES, MAX_TARGET_CALORIES);

    let reference_weight = match profile.goal {
        Goal::GainWeight => profile.target_weight_kg,
        Goal::LoseWeight | Goal::BuildMuscle => profile.weight_kg,
    };
    let protein_grams = reference_weight * protein_multiplier(profile.goal);

    let fat_calories = target_calories * fat_ratio(profile.goal);
    let fat_grams = fat_calories / KCAL_PER_GRAM_FAT;

    let remaining_calories =
        target_calories - protein_grams * KCAL_PER_GRAM_PROTEIN - fat_calories;
    // Upper bound keeps carbs at or below half of the target energy
    let carbs_grams = (remaining_calories / KCAL_PER_GRAM_CARBS)
        .max(MIN_CARBS_GRAMS)
        .min(target_calories / 2.0 / KCAL_PER_GRAM_CARBS);

    let fiber_grams = (target_calories / 1000.0 * 14.0)
        .round()
        .clamp(MIN_FIBER_GRAMS, MAX_FIBER_GRAMS);

    let hydration_liters = round_to(
        (profile.weight_kg * 0.035 + f64::from(profile.workouts_per_week) * 0.25)
            .max(MIN_HYDRATION_LITERS),
        1,
    );

    tracing::debug!(
        bmr,
        maintenance_calories,
        target_calories,
        "Calculated nutrition targets for {:?}",
        profile.goal
    );

    NutritionTargets {
        maintenance_calories: round_to(maintenance_calories, 0),
        target_calories: round_to(target_calories, 0),
        calorie_delta: delta,
        activity_factor,
        macro_targets: MacroTargets {
            protein_grams: round_to(protein_grams, 1),
            carbs_grams: round_to(carbs_grams, 1),
            fat_grams: round_to(fat_grams, 1),
            fiber_grams,
        },
        hydration_liters,
    }
}
