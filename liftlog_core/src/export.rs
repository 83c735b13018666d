//! CSV export of logged sets and projected working weights.
//!
//! Both exports create the parent directory if needed and fsync the file
//! before returning, so a finished export is complete on disk.

use crate::progression::ProgressionRow;
use crate::{CompletedWorkout, MainLift, Result};
use std::fs::File;
use std::path::Path;

/// A row of the logged-sets export
#[derive(Debug, serde::Serialize)]
struct SetRow<'a> {
    workout_id: &'a str,
    week: u32,
    day: &'a str,
    completed_at: String,
    exercise_id: &'a str,
    exercise: &'a str,
    set: usize,
    reps: u32,
    weight: f64,
    completed: bool,
}

/// Write one CSV row per logged set, ordered by week then day
pub fn export_sets(workouts: &[CompletedWorkout], path: &Path) -> Result<usize> {
    let mut ordered: Vec<&CompletedWorkout> = workouts.iter().collect();
    ordered.sort_by(|a, b| {
        a.week_number
            .cmp(&b.week_number)
            .then_with(|| a.day_label.cmp(&b.day_label))
    });

    let mut writer = csv::Writer::from_writer(create_file(path)?);
    let mut count = 0;

    for workout in ordered {
        let completed_at = workout.completed_at.to_rfc3339();
        for log in &workout.exercise_logs {
            for (i, set) in log.sets.iter().enumerate() {
                writer.serialize(SetRow {
                    workout_id: &workout.id,
                    week: workout.week_number,
                    day: &workout.day_label,
                    completed_at: completed_at.clone(),
                    exercise_id: &log.exercise_id,
                    exercise: &log.exercise_name,
                    set: i + 1,
                    reps: set.reps,
                    weight: set.weight,
                    completed: set.completed,
                })?;
                count += 1;
            }
        }
    }

    finish(writer)?;
    tracing::info!("Exported {} sets to {:?}", count, path);
    Ok(count)
}

/// Write one CSV row per week with every lift's working weight
pub fn export_progression(rows: &[ProgressionRow], path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(create_file(path)?);

    let mut header = vec!["week".to_string(), "deload".to_string()];
    header.extend(MainLift::ALL.iter().map(|lift| lift.to_string()));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.week.to_string(), row.deload.to_string()];
        record.extend(MainLift::ALL.iter().map(|lift| {
            row.weights
                .get(lift)
                .map(|w| w.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }

    finish(writer)?;
    tracing::info!("Exported {} weeks of progression to {:?}", rows.len(), path);
    Ok(rows.len())
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Flush and sync to disk
fn finish(mut writer: csv::Writer<File>) -> Result<()> {
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;
    Ok(())
}
