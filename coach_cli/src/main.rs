use chrono::Datelike;
use coach_core::meals::missing_food_references;
use coach_core::schedule::{generate_plan_with, DailySchedule};
use coach_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "Weekly nutrition and training plan generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a weekly plan and store it as the current plan
    Plan {
        /// Profile file (TOML, or JSON with a .json extension).
        /// Defaults to the profile of the stored plan.
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Dry run - print the plan without storing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print nutrition targets for a profile
    Summary {
        #[arg(long)]
        profile: PathBuf,
    },

    /// Print the stored plan
    Show {
        /// Only this weekday (monday, tue, ...)
        #[arg(long)]
        day: Option<Weekday>,
    },

    /// Print today's part of the stored plan
    Today,

    /// Step a day's workout to the next focus and store the result
    Cycle {
        #[arg(long)]
        day: Weekday,
    },

    /// Mark a day's workout as done (defaults to today)
    Done {
        #[arg(long)]
        day: Option<Weekday>,

        /// Performed exercise as NAME:SETS:REPS[:KG] (repeatable)
        #[arg(long = "exercise")]
        exercises: Vec<ExerciseLog>,
    },

    /// Remove the done mark from a day's workout (defaults to today)
    Undo {
        #[arg(long)]
        day: Option<Weekday>,
    },

    /// Search the food table by name or tag
    Foods {
        /// Case-insensitive keyword; omit to list everything
        query: Option<String>,

        /// Maximum number of results (defaults to [search] limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export the stored schedule as CSV
    Export {
        #[arg(long)]
        output: PathBuf,
    },

    /// Delete the stored plan and workout log
    Reset,
}

fn main() -> Result<()> {
    // Initialize logging
    coach_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let state_path = StoredCoachState::default_path(&data_dir);
    let log_path = WorkoutLog::default_path(&data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Plan { profile, dry_run } => {
            cmd_plan(&state_path, profile.as_deref(), dry_run, &config)
        }
        Commands::Summary { profile } => cmd_summary(&profile),
        Commands::Show { day } => cmd_show(&state_path, &log_path, day),
        Commands::Today => cmd_show(&state_path, &log_path, Some(today())),
        Commands::Cycle { day } => cmd_cycle(&state_path, day),
        Commands::Done { day, exercises } => {
            cmd_done(&state_path, &log_path, day.unwrap_or_else(today), exercises)
        }
        Commands::Undo { day } => cmd_undo(&log_path, day.unwrap_or_else(today)),
        Commands::Foods { query, limit } => cmd_foods(query.as_deref(), limit, &config),
        Commands::Export { output } => cmd_export(&state_path, &output),
        Commands::Reset => cmd_reset(&state_path, &log_path),
    }
}

fn today() -> Weekday {
    Weekday::from(chrono::Local::now().weekday())
}

fn load_profile(path: &Path) -> Result<UserProfile> {
    let profile = UserProfile::load_from(path)?;
    check_profile(&profile)?;
    Ok(profile)
}

fn check_profile(profile: &UserProfile) -> Result<()> {
    let errors = profile.validate();
    if !errors.is_empty() {
        eprintln!("Profile validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Profile(errors.join("; ")));
    }
    Ok(())
}

fn require_stored(state_path: &Path) -> Result<StoredCoachState> {
    StoredCoachState::load(state_path)?.ok_or_else(|| {
        Error::State("no stored plan, run `coach plan --profile <file>` first".into())
    })
}

fn cmd_plan(
    state_path: &Path,
    profile_path: Option<&Path>,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let profile = match profile_path {
        Some(path) => load_profile(path)?,
        None => {
            let stored = require_stored(state_path)?;
            check_profile(&stored.profile)?;
            stored.profile
        }
    };

    let table = config.food_table()?;
    let missing: Vec<_> = missing_food_references(&table)
        .into_iter()
        .filter(|(goal, _)| *goal == profile.goal)
        .collect();
    if !missing.is_empty() {
        eprintln!("Food table is missing foods used by the meal plan:");
        for (_, food_id) in &missing {
            eprintln!("  - {}", food_id);
        }
        return Err(Error::FoodTable(format!(
            "{} missing food references",
            missing.len()
        )));
    }

    let plan = generate_plan_with(&table, &profile);
    display_summary(&plan.summary);
    display_schedule(&plan.schedule(), None);

    if dry_run {
        println!("\n[Dry run - plan not stored]");
        return Ok(());
    }

    let stored = StoredCoachState::new(profile, plan);
    stored.save(state_path)?;

    println!("\n✓ Plan stored ({})", stored.plan_id);
    Ok(())
}

fn cmd_summary(profile_path: &Path) -> Result<()> {
    let profile = load_profile(profile_path)?;
    display_summary(&calculate_summary(&profile));
    Ok(())
}

fn cmd_show(state_path: &Path, log_path: &Path, day: Option<Weekday>) -> Result<()> {
    let Some(stored) = StoredCoachState::load(state_path)? else {
        println!("No stored plan. Run `coach plan --profile <file>` to create one.");
        return Ok(());
    };

    println!(
        "Plan {} generated {}",
        stored.plan_id,
        stored.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let log = WorkoutLog::load(log_path)?;
    let schedule = stored.schedule();
    match day {
        Some(day) => display_day(&schedule[day.index()], log.get(day)),
        None => {
            display_summary(&stored.summary);
            display_schedule(&schedule, Some(&log));

            let training_days = schedule.iter().filter(|e| !e.workout.is_rest_day).count();
            let done = schedule
                .iter()
                .filter(|e| !e.workout.is_rest_day && log.is_completed(e.day))
                .count();
            println!("\nCompleted {}/{} training days", done, training_days);
        }
    }

    Ok(())
}

fn cmd_cycle(state_path: &Path, day: Weekday) -> Result<()> {
    let mut previous = String::new();
    let stored = StoredCoachState::update(state_path, |stored| {
        previous = stored.workout_plan.get(day).label.clone();
        stored.cycle_focus(day);
        Ok(())
    })?;

    let session = stored.workout_plan.get(day);
    println!("✓ {}: {} → {}", day.label(), previous, session.label);
    Ok(())
}

fn cmd_done(
    state_path: &Path,
    log_path: &Path,
    day: Weekday,
    exercises: Vec<ExerciseLog>,
) -> Result<()> {
    let stored = require_stored(state_path)?;
    let session = stored.workout_plan.get(day);
    if session.is_rest_day {
        println!("Note: {} is a rest day in the current plan.", day.label());
    }

    let count = exercises.len();
    WorkoutLog::update(log_path, |log| {
        log.complete_workout(day, session.focus, exercises);
        Ok(())
    })?;

    println!("✓ {}: {} marked done", day.label(), session.label);
    if count > 0 {
        println!("  Logged {} exercises", count);
    }
    Ok(())
}

fn cmd_undo(log_path: &Path, day: Weekday) -> Result<()> {
    let removed = WorkoutLog::update(log_path, |log| Ok(log.uncomplete_workout(day)))?;

    match removed {
        Some(_) => println!("✓ {}: done mark removed", day.label()),
        None => println!("{} was not marked done - nothing to undo.", day.label()),
    }
    Ok(())
}

fn cmd_foods(query: Option<&str>, limit: Option<usize>, config: &Config) -> Result<()> {
    let table = config.food_table()?;
    let results = table.search(query.unwrap_or(""), limit.unwrap_or(config.search.limit));

    if results.is_empty() {
        println!("No foods found.");
        return Ok(());
    }

    for food in results {
        println!(
            "{:<16} {:<28} {:>10}  {:>5} kcal  P {:>5.1}  C {:>5.1}  F {:>5.1}",
            food.id, food.name, food.portion, food.calories, food.protein, food.carbs, food.fat
        );
    }
    Ok(())
}

fn cmd_export(state_path: &Path, output: &Path) -> Result<()> {
    let stored = require_stored(state_path)?;
    let count = write_schedule_csv(&stored.schedule(), output)?;

    println!("✓ Exported {} days to CSV", count);
    println!("  CSV: {}", output.display());
    Ok(())
}

fn cmd_reset(state_path: &Path, log_path: &Path) -> Result<()> {
    if StoredCoachState::clear(state_path)? {
        println!("✓ Stored plan removed");
    } else {
        println!("No stored plan - nothing to reset.");
    }
    if WorkoutLog::clear(log_path)? {
        println!("✓ Workout log cleared");
    }
    Ok(())
}

fn display_summary(summary: &NutritionTargets) {
    let macros = &summary.macro_targets;
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  DAILY TARGETS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Calories: {} kcal (maintenance {}, {:+})",
        summary.target_calories, summary.maintenance_calories, summary.calorie_delta
    );
    println!(
        "  Protein {} g · Carbs {} g · Fat {} g · Fiber {} g",
        macros.protein_grams, macros.carbs_grams, macros.fat_grams, macros.fiber_grams
    );
    println!("  Water: {} L", summary.hydration_liters);
}

fn display_schedule(schedule: &[DailySchedule<'_>], log: Option<&WorkoutLog>) {
    for entry in schedule {
        display_day(entry, log.and_then(|log| log.get(entry.day)));
    }
}

fn display_day(entry: &DailySchedule<'_>, done: Option<&WorkoutLogEntry>) {
    let workout = entry.workout;
    println!();
    println!("── {} ──", entry.day.label());

    if let Some(done) = done {
        println!(
            "  ✓ Done {}",
            done.completed_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        );
        for exercise in &done.exercises {
            match exercise.weight_kg {
                Some(kg) => println!(
                    "    ✓ {} {}x{} @ {} kg",
                    exercise.name, exercise.sets, exercise.reps, kg
                ),
                None => println!("    ✓ {} {}x{}", exercise.name, exercise.sets, exercise.reps),
            }
        }
    }

    if workout.is_rest_day {
        println!("  Workout: {}", workout.label);
    } else {
        println!(
            "  Workout: {} ({} min, {:?} intensity)",
            workout.label, workout.duration_minutes, workout.intensity
        );
        for exercise in &workout.exercises {
            println!("    → {} {}x{}", exercise.name, exercise.sets, exercise.reps);
        }
    }

    if let Some(diet) = entry.diet {
        println!("  Meals: {} kcal", diet.total_calories);
        for meal in &diet.meals {
            let foods: Vec<_> = meal
                .items
                .iter()
                .map(|item| format!("{} {}", item.portion_text, item.food_name))
                .collect();
            println!("    {} ({} kcal): {}", meal.name, meal.calories, foods.join(", "));
        }
    }
}
