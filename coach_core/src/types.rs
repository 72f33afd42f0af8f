//! Core domain types for the Coach system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User profile and its closed enumerations (sex, goal, activity level)
//! - Nutrition targets and food composition entries
//! - Diet and workout plan structures
//! - The fixed seven-day `Week` container

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

// ============================================================================
// Weekdays
// ============================================================================

/// Fixed identifier for one day of the planning week
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in plan order (monday first)
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position in the week (monday = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Capitalized display label
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = crate::Error;

    /// Accepts full names or three-letter abbreviations, case-insensitive
    fn from_str(s: &str) -> crate::Result<Self> {
        let needle = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == needle || (needle.len() == 3 && day.as_str().starts_with(&needle)))
            .ok_or_else(|| crate::Error::Other(format!("Unknown weekday: {}", s)))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// A value for each of the seven weekdays
///
/// Every weekday is present exactly once by construction. Serializes as a
/// map keyed by weekday name and refuses to deserialize a partial week.
#[derive(Clone, Debug, PartialEq)]
pub struct Week<T> {
    days: [T; 7],
}

impl<T> Week<T> {
    /// Build a week by evaluating `f` for each day, monday first
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(Weekday) -> T,
    {
        Self {
            days: Weekday::ALL.map(f),
        }
    }

    pub fn get(&self, day: Weekday) -> &T {
        &self.days[day.index()]
    }

    /// Iterate days in order, monday first
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &T)> {
        Weekday::ALL.into_iter().zip(self.days.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.days.iter()
    }

    /// Return a copy of this week with one day's value replaced
    pub fn with_day(&self, day: Weekday, value: T) -> Self
    where
        T: Clone,
    {
        let mut days = self.days.clone();
        days[day.index()] = value;
        Self { days }
    }
}

impl<T: Serialize> Serialize for Week<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, value) in self.iter() {
            map.serialize_entry(&day, value)?;
        }
        map.end()
    }
}

struct WeekVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for WeekVisitor<T> {
    type Value = Week<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map with each weekday exactly once")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut slots: [Option<T>; 7] = Default::default();
        while let Some((day, value)) = access.next_entry::<Weekday, T>()? {
            let slot = &mut slots[day.index()];
            if slot.is_some() {
                return Err(de::Error::custom(format!("duplicate weekday '{}'", day)));
            }
            *slot = Some(value);
        }

        let mut days = Vec::with_capacity(Weekday::ALL.len());
        for (day, slot) in Weekday::ALL.into_iter().zip(slots) {
            let value =
                slot.ok_or_else(|| de::Error::custom(format!("missing weekday '{}'", day)))?;
            days.push(value);
        }
        let days: [T; 7] = days
            .try_into()
            .map_err(|_| de::Error::custom("expected exactly seven weekdays"))?;
        Ok(Week { days })
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Week<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(WeekVisitor {
            marker: PhantomData,
        })
    }
}

// ============================================================================
// User Profile
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// What the user is training towards
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    GainWeight,
    BuildMuscle,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::GainWeight, Goal::BuildMuscle];
}

/// Day-to-day activity outside of planned training
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Athlete,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DietPreference {
    #[default]
    Omnivore,
    Vegetarian,
    Vegan,
    Pescatarian,
    Keto,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    FullGym,
    #[default]
    BasicGym,
    HomeDumbbells,
    Bodyweight,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Physical profile and objective of a user
///
/// Diet preference, equipment, experience and injuries are informational
/// and not consumed by the planning engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub sex: Sex,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub target_weight_kg: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub workouts_per_week: u32,
    #[serde(default)]
    pub diet_preference: DietPreference,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub experience: Experience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injuries: Option<String>,
}

// ============================================================================
// Nutrition Targets
// ============================================================================

/// Daily macronutrient targets in grams
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct MacroTargets {
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: f64,
}

/// Energy and macro targets derived from a profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NutritionTargets {
    pub maintenance_calories: f64,
    pub target_calories: f64,
    pub calorie_delta: i32,
    pub activity_factor: f64,
    pub macro_targets: MacroTargets,
    pub hydration_liters: f64,
}

// ============================================================================
// Food Composition
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Protein,
    Carb,
    Fat,
    Produce,
    Supplement,
}

/// A food entry with nutrient values for one reference portion
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub category: FoodCategory,
    pub portion: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ============================================================================
// Diet Plan Types
// ============================================================================

/// One food in a meal, scaled to its effective portion
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DietMealItem {
    pub food_id: String,
    pub food_name: String,
    pub portion_text: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DietMeal {
    pub name: String,
    pub calories: f64,
    pub macro_summary: MacroTargets,
    pub items: Vec<DietMealItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyDietPlan {
    pub day: Weekday,
    pub total_calories: f64,
    pub meals: Vec<DietMeal>,
}

pub type WeeklyDietPlan = Week<DailyDietPlan>;

// ============================================================================
// Workout Plan Types
// ============================================================================

/// Training emphasis of a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutFocus {
    Rest,
    FullBody,
    UpperPush,
    UpperPull,
    LowerBody,
    Conditioning,
    Mobility,
    Core,
}

impl WorkoutFocus {
    /// Order used when manually stepping through foci
    pub const CYCLE_ORDER: [WorkoutFocus; 8] = [
        WorkoutFocus::FullBody,
        WorkoutFocus::UpperPush,
        WorkoutFocus::UpperPull,
        WorkoutFocus::LowerBody,
        WorkoutFocus::Conditioning,
        WorkoutFocus::Mobility,
        WorkoutFocus::Core,
        WorkoutFocus::Rest,
    ];

    /// The focus after this one in `CYCLE_ORDER`, wrapping around
    pub fn cycle(self) -> WorkoutFocus {
        let idx = Self::CYCLE_ORDER
            .iter()
            .position(|f| *f == self)
            .unwrap_or(Self::CYCLE_ORDER.len() - 1);
        Self::CYCLE_ORDER[(idx + 1) % Self::CYCLE_ORDER.len()]
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Mobility,
    Core,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub category: ExerciseCategory,
}

/// A single day of training (or rest)
///
/// Rest days always have zero duration and no exercises.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub day: Weekday,
    pub focus: WorkoutFocus,
    pub label: String,
    pub description: String,
    pub duration_minutes: u32,
    pub intensity: Intensity,
    pub is_rest_day: bool,
    pub exercises: Vec<Exercise>,
}

pub type WeeklyWorkoutPlan = Week<WorkoutSession>;
