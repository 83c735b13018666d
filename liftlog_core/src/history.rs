//! Queries over completed workouts.
//!
//! Everything here is derived from the stored logs, never from the
//! calculator: personal records, last used weights for pre-filling forms,
//! and the completion-driven current week.

use crate::{Catalog, CompletedWorkout, Result};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Heaviest completed set per exercise name, ignoring unweighted sets
pub fn personal_records(workouts: &[CompletedWorkout]) -> BTreeMap<String, f64> {
    let mut records: BTreeMap<String, f64> = BTreeMap::new();

    for workout in workouts {
        for log in &workout.exercise_logs {
            for set in log.sets.iter().filter(|s| s.completed && s.weight > 0.0) {
                records
                    .entry(log.exercise_name.clone())
                    .and_modify(|best| *best = best.max(set.weight))
                    .or_insert(set.weight);
            }
        }
    }

    records
}

/// Weight of the most recent completed set per exercise id
///
/// Workouts are scanned newest week first (ties broken by completion time);
/// within a workout the first completed set of each exercise is taken.
pub fn last_used_weights(workouts: &[CompletedWorkout]) -> HashMap<String, f64> {
    let mut ordered: Vec<&CompletedWorkout> = workouts.iter().collect();
    ordered.sort_by(|a, b| {
        b.week_number
            .cmp(&a.week_number)
            .then_with(|| b.completed_at.cmp(&a.completed_at))
    });

    let mut weights = HashMap::new();
    for workout in ordered {
        for log in &workout.exercise_logs {
            if weights.contains_key(&log.exercise_id) {
                continue;
            }
            if let Some(set) = log.sets.iter().find(|s| s.completed) {
                weights.insert(log.exercise_id.clone(), set.weight);
            }
        }
    }

    weights
}

/// Ids of every stored completed workout
pub fn completed_ids(workouts: &[CompletedWorkout]) -> HashSet<String> {
    workouts.iter().map(|w| w.id.clone()).collect()
}

/// First week, scanning up from 1, whose scheduled days are not all logged
///
/// Returns `cap` when every week up to it is complete.
pub fn completion_current_week(
    catalog: &Catalog,
    workouts: &[CompletedWorkout],
    cap: u32,
) -> Result<u32> {
    let done = completed_ids(workouts);

    for week in 1..=cap {
        let labels = catalog.workouts_for_week(week)?;
        let complete = labels
            .iter()
            .all(|label| done.contains(&crate::WorkoutKey::new(week, label.as_str()).id()));
        if !complete {
            tracing::debug!("Week {} has unlogged days", week);
            return Ok(week);
        }
    }

    Ok(cap.max(1))
}
