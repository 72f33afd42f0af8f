//! Schedule composition.
//!
//! Pairs each weekday's meals with its workout session. Also hosts the
//! full pipeline entry point used on fresh generation.

use crate::types::*;
use crate::{calculate_summary, generate_diet_plan_with, generate_workout_plan, FoodTable};
use serde::Serialize;

/// Read-only view of one day of the plan
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct DailySchedule<'a> {
    pub day: Weekday,
    pub diet: Option<&'a DailyDietPlan>,
    pub workout: &'a WorkoutSession,
}

/// Pair diet and workout plans day by day, monday first
///
/// Used both right after generation and when rehydrating a stored plan.
/// A missing diet plan yields `diet: None` on every day.
pub fn build_schedule<'a>(
    diet_plan: Option<&'a WeeklyDietPlan>,
    workout_plan: &'a WeeklyWorkoutPlan,
) -> Vec<DailySchedule<'a>> {
    Weekday::ALL
        .into_iter()
        .map(|day| DailySchedule {
            day,
            diet: diet_plan.map(|plan| plan.get(day)),
            workout: workout_plan.get(day),
        })
        .collect()
}

/// Everything produced by one run of the planning pipeline
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CoachPlan {
    pub summary: NutritionTargets,
    pub diet_plan: WeeklyDietPlan,
    pub workout_plan: WeeklyWorkoutPlan,
}

impl CoachPlan {
    pub fn schedule(&self) -> Vec<DailySchedule<'_>> {
        build_schedule(Some(&self.diet_plan), &self.workout_plan)
    }
}

/// Run the full pipeline against the built-in food table
pub fn generate_plan(profile: &UserProfile) -> CoachPlan {
    generate_plan_with(crate::get_default_food_table(), profile)
}

/// Run the full pipeline: targets, then meals and workouts
pub fn generate_plan_with(table: &FoodTable, profile: &UserProfile) -> CoachPlan {
    let summary = calculate_summary(profile);
    let diet_plan = generate_diet_plan_with(table, profile, &summary);
    let workout_plan = generate_workout_plan(profile);

    CoachPlan {
        summary,
        diet_plan,
        workout_plan,
    }
}
