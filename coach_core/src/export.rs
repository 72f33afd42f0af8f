//! CSV export of a weekly schedule.
//!
//! One row per weekday, monday first. The file is replaced on every
//! export and fsynced before returning.

use crate::schedule::DailySchedule;
use crate::{Intensity, Result, Weekday, WorkoutFocus};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    day: Weekday,
    focus: WorkoutFocus,
    label: &'a str,
    duration_minutes: u32,
    intensity: Intensity,
    is_rest_day: bool,
    exercise_count: usize,
    total_calories: Option<f64>,
    meal_count: usize,
}

impl<'a> From<&DailySchedule<'a>> for CsvRow<'a> {
    fn from(entry: &DailySchedule<'a>) -> Self {
        CsvRow {
            day: entry.day,
            focus: entry.workout.focus,
            label: &entry.workout.label,
            duration_minutes: entry.workout.duration_minutes,
            intensity: entry.workout.intensity,
            is_rest_day: entry.workout.is_rest_day,
            exercise_count: entry.workout.exercises.len(),
            total_calories: entry.diet.map(|d| d.total_calories),
            meal_count: entry.diet.map_or(0, |d| d.meals.len()),
        }
    }
}

/// Write the schedule to `csv_path`, replacing any existing file
///
/// Returns the number of rows written.
pub fn write_schedule_csv(schedule: &[DailySchedule<'_>], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    for entry in schedule {
        writer.serialize(CsvRow::from(entry))?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} schedule rows to {:?}", schedule.len(), csv_path);
    Ok(schedule.len())
}
