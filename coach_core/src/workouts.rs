//! Workout plan builder.
//!
//! Training days come from a fixed weekday pattern per weekly session
//! count; each training day takes the next focus from the goal's sequence.
//! Everything else is a rest day.

use crate::types::*;
use crate::types::ExerciseCategory::{Cardio, Core, Mobility, Strength};

/// Fewest training sessions a week can hold
pub const MIN_SESSIONS_PER_WEEK: u32 = 1;

/// Most training sessions a week can hold
pub const MAX_SESSIONS_PER_WEEK: u32 = 6;

/// Static exercise definition in the workout library
struct ExerciseTemplate {
    name: &'static str,
    sets: u32,
    reps: &'static str,
    category: ExerciseCategory,
}

const fn ex(name: &'static str, sets: u32, reps: &'static str, category: ExerciseCategory) -> ExerciseTemplate {
    ExerciseTemplate {
        name,
        sets,
        reps,
        category,
    }
}

static FULL_BODY: &[ExerciseTemplate] = &[
    ex("Goblet squat", 3, "10-12", Strength),
    ex("Romanian deadlift", 3, "10", Strength),
    ex("Push-up", 3, "12-15", Strength),
    ex("Dumbbell row", 3, "12", Strength),
    ex("Plank", 3, "45 s", Core),
];

static UPPER_PUSH: &[ExerciseTemplate] = &[
    ex("Incline dumbbell press", 4, "8-10", Strength),
    ex("Overhead press", 3, "8-10", Strength),
    ex("Cable fly", 3, "12", Strength),
    ex("Triceps rope pushdown", 3, "12", Strength),
    ex("Side plank", 3, "30 s", Core),
];

static UPPER_PULL: &[ExerciseTemplate] = &[
    ex("Pull-up / assisted pull-up", 3, "6-8", Strength),
    ex("Bent-over row", 3, "10", Strength),
    ex("Face pull", 3, "12", Strength),
    ex("Biceps curl", 3, "12", Strength),
    ex("Hollow body hold", 3, "40 s", Core),
];

static LOWER_BODY: &[ExerciseTemplate] = &[
    ex("Back squat", 4, "6-8", Strength),
    ex("Walking lunge", 3, "12 steps", Strength),
    ex("Hip thrust", 3, "10-12", Strength),
    ex("Leg curl", 3, "12", Strength),
    ex("Hanging knee raise", 3, "12", Core),
];

static CONDITIONING: &[ExerciseTemplate] = &[
    ex("Interval run (1 min fast / 1 min easy)", 8, "same", Cardio),
    ex("Kettlebell swing", 3, "15", Cardio),
    ex("Battle rope", 3, "30 s", Cardio),
    ex("Mountain climber", 3, "45 s", Cardio),
];

static MOBILITY: &[ExerciseTemplate] = &[
    ex("Dynamic stretching flow", 1, "10-12 reps", Mobility),
    ex("Deep squat hold", 3, "45 s", Mobility),
    ex("Banded shoulder mobility", 3, "12", Mobility),
    ex("Cat-cow", 3, "12", Mobility),
];

static CORE: &[ExerciseTemplate] = &[
    ex("Dead bug", 3, "12", Core),
    ex("Cable woodchopper", 3, "12", Core),
    ex("Side plank reach", 3, "12", Core),
    ex("Farmer carry", 3, "40 s", Core),
];

fn library(focus: WorkoutFocus) -> &'static [ExerciseTemplate] {
    match focus {
        WorkoutFocus::Rest => &[],
        WorkoutFocus::FullBody => FULL_BODY,
        WorkoutFocus::UpperPush => UPPER_PUSH,
        WorkoutFocus::UpperPull => UPPER_PULL,
        WorkoutFocus::LowerBody => LOWER_BODY,
        WorkoutFocus::Conditioning => CONDITIONING,
        WorkoutFocus::Mobility => MOBILITY,
        WorkoutFocus::Core => CORE,
    }
}

fn label(focus: WorkoutFocus) -> &'static str {
    match focus {
        WorkoutFocus::Rest => "Rest",
        WorkoutFocus::FullBody => "Full body strength",
        WorkoutFocus::UpperPush => "Upper body - push",
        WorkoutFocus::UpperPull => "Upper body - pull",
        WorkoutFocus::LowerBody => "Lower body",
        WorkoutFocus::Conditioning => "Cardio / HIIT",
        WorkoutFocus::Mobility => "Mobility and stretching",
        WorkoutFocus::Core => "Core stability",
    }
}

fn duration_minutes(focus: WorkoutFocus) -> u32 {
    match focus {
        WorkoutFocus::Rest => 0,
        WorkoutFocus::FullBody => 50,
        WorkoutFocus::UpperPush | WorkoutFocus::UpperPull => 55,
        WorkoutFocus::LowerBody => 60,
        WorkoutFocus::Conditioning => 35,
        WorkoutFocus::Mobility => 25,
        WorkoutFocus::Core => 30,
    }
}

fn intensity(focus: WorkoutFocus, goal: Goal) -> Intensity {
    match focus {
        WorkoutFocus::Rest | WorkoutFocus::Mobility => Intensity::Low,
        WorkoutFocus::FullBody | WorkoutFocus::Core => Intensity::Medium,
        WorkoutFocus::UpperPush | WorkoutFocus::UpperPull | WorkoutFocus::LowerBody => {
            Intensity::High
        }
        WorkoutFocus::Conditioning => match goal {
            Goal::LoseWeight => Intensity::High,
            Goal::GainWeight | Goal::BuildMuscle => Intensity::Medium,
        },
    }
}

fn description(focus: WorkoutFocus) -> &'static str {
    match focus {
        WorkoutFocus::Rest => "Active recovery day so muscles can rebuild.",
        WorkoutFocus::Conditioning => "Metabolic work that keeps the heart rate high.",
        _ => "Targeted training for muscle development.",
    }
}

/// Training days for a weekly session count (already clamped to 1..=6)
pub fn active_days(sessions: u32) -> &'static [Weekday] {
    use Weekday::*;

    match sessions {
        1 => &[Wednesday],
        2 => &[Tuesday, Friday],
        3 => &[Monday, Wednesday, Friday],
        4 => &[Monday, Tuesday, Thursday, Saturday],
        5 => &[Monday, Tuesday, Thursday, Friday, Saturday],
        6 => &[Monday, Tuesday, Wednesday, Thursday, Friday, Saturday],
        other => {
            tracing::warn!("No weekday pattern for {} sessions, using 3", other);
            &[Monday, Wednesday, Friday]
        }
    }
}

/// Ordered training foci for a goal
pub fn focus_sequence(goal: Goal) -> &'static [WorkoutFocus] {
    use WorkoutFocus as F;

    match goal {
        Goal::LoseWeight => &[
            F::Conditioning,
            F::FullBody,
            F::LowerBody,
            F::Conditioning,
            F::FullBody,
            F::Mobility,
        ],
        Goal::GainWeight => &[
            F::FullBody,
            F::UpperPush,
            F::LowerBody,
            F::UpperPull,
            F::Conditioning,
            F::Mobility,
        ],
        Goal::BuildMuscle => &[
            F::UpperPush,
            F::LowerBody,
            F::UpperPull,
            F::FullBody,
            F::Conditioning,
            F::Core,
        ],
    }
}

/// Clamp a requested weekly session count into the supported range
pub fn clamp_sessions(workouts_per_week: u32) -> u32 {
    workouts_per_week.clamp(MIN_SESSIONS_PER_WEEK, MAX_SESSIONS_PER_WEEK)
}

/// Resolve a single day's session for a focus
pub fn build_session(day: Weekday, focus: WorkoutFocus, goal: Goal) -> WorkoutSession {
    WorkoutSession {
        day,
        focus,
        label: label(focus).to_string(),
        description: description(focus).to_string(),
        duration_minutes: duration_minutes(focus),
        intensity: intensity(focus, goal),
        is_rest_day: focus == WorkoutFocus::Rest,
        exercises: library(focus)
            .iter()
            .map(|t| Exercise {
                name: t.name.to_string(),
                sets: t.sets,
                reps: t.reps.to_string(),
                category: t.category,
            })
            .collect(),
    }
}

/// Generate a week of training sessions for a profile
///
/// Walks monday to sunday; each active day takes
/// `sequence[index mod sequence length]` and advances the index.
pub fn generate_workout_plan(profile: &UserProfile) -> WeeklyWorkoutPlan {
    let sessions = clamp_sessions(profile.workouts_per_week);
    if sessions != profile.workouts_per_week {
        tracing::debug!(
            "Clamped workouts per week from {} to {}",
            profile.workouts_per_week,
            sessions
        );
    }

    let pattern = active_days(sessions);
    let sequence = focus_sequence(profile.goal);
    let mut sequence_index = 0;

    let plan = Week::from_fn(|day| {
        let focus = if pattern.contains(&day) {
            let focus = sequence[sequence_index % sequence.len()];
            sequence_index += 1;
            focus
        } else {
            WorkoutFocus::Rest
        };
        build_session(day, focus, profile.goal)
    });

    tracing::info!(
        "Generated workout plan for {:?} with {} training days",
        profile.goal,
        sessions
    );

    plan
}

/// Return a new plan with `day` rebuilt around `focus`
///
/// The input plan is not modified.
pub fn with_focus(
    plan: &WeeklyWorkoutPlan,
    day: Weekday,
    focus: WorkoutFocus,
    goal: Goal,
) -> WeeklyWorkoutPlan {
    plan.with_day(day, build_session(day, focus, goal))
}
