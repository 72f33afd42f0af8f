#![forbid(unsafe_code)]

//! Core domain model and planning engine for the Coach system.
//!
//! This crate provides:
//! - Domain types (profiles, targets, meals, workout sessions, weekly plans)
//! - Profile loading and validation
//! - Food composition table
//! - Nutrition target calculator
//! - Meal and workout plan builders
//! - Schedule composition
//! - Persistence of the current plan and the workout completion log
//! - CSV export

pub mod types;
pub mod error;
pub mod profile;
pub mod foods;
pub mod config;
pub mod logging;
pub mod nutrition;
pub mod meals;
pub mod workouts;
pub mod schedule;
mod storage;
pub mod state;
pub mod workout_log;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use foods::{get_default_food_table, FoodTable};
pub use config::Config;
pub use nutrition::calculate_summary;
pub use meals::{generate_diet_plan, generate_diet_plan_with};
pub use workouts::generate_workout_plan;
pub use schedule::{build_schedule, generate_plan, CoachPlan};
pub use state::StoredCoachState;
pub use workout_log::{ExerciseLog, WorkoutLog, WorkoutLogEntry};
pub use export::write_schedule_csv;
