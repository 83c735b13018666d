//! Prescribed-vs-lifted reconciliation.
//!
//! After a workout is saved, each main-lift exercise's heaviest completed
//! weighted set is compared against what was prescribed. Differences of at least 2.5 kg
//! are folded back into the program config so later weeks follow what was
//! actually lifted:
//! - Linear policy: the starting weight is back-solved from the lifted weight
//! - Training-max and deload policies: the lift's additive adjustment grows

use crate::progression::{round_to_increment, Calculator};
use crate::{CalculationPolicy, ExerciseLog, MainLift, ProgramConfig, WorkoutTemplate};
use serde::Serialize;
use std::collections::HashSet;

/// Differences smaller than this are rounding noise
pub const ADJUSTMENT_TOLERANCE: f64 = 2.5;

/// Config change produced for one lift
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdjustmentChange {
    /// Replace the lift's additive adjustment
    Additive { adjustment: f64 },
    /// Replace the lift's starting weight
    StartingWeight { starting_weight: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LiftAdjustment {
    pub lift: MainLift,
    pub exercise_id: String,
    pub prescribed: f64,
    pub lifted: f64,
    pub change: AdjustmentChange,
}

/// Compute the config changes implied by a logged workout
///
/// `config` must be the config the workout was prescribed from, i.e. before
/// any of these adjustments are applied. Only the first qualifying exercise
/// of each lift is considered; exercises without a completed weighted set
/// are skipped.
pub fn reconcile(
    calculator: &Calculator<'_>,
    template: &WorkoutTemplate,
    logs: &[ExerciseLog],
    week: u32,
    config: &ProgramConfig,
) -> Vec<LiftAdjustment> {
    let mut seen = HashSet::new();
    let mut adjustments = Vec::new();

    for exercise in &template.exercises {
        let Some(lift) = exercise.main_lift else {
            continue;
        };
        // Variations (pause work, close-grip) never move the main lift
        if exercise.is_rpe || exercise.percentage_of_main.is_some() {
            continue;
        }
        if seen.contains(&lift) {
            continue;
        }
        let Some(modifier) = calculator.resolved_modifier(exercise, week) else {
            continue;
        };
        if modifier <= 0.0 {
            continue;
        }

        let Some(log) = logs.iter().find(|l| l.exercise_id == exercise.id) else {
            continue;
        };
        let Some(lifted) = log.max_lifted_weight() else {
            tracing::debug!("No completed weighted sets for {}, skipping", exercise.id);
            continue;
        };
        seen.insert(lift);

        let prescribed = calculator.calculate_weight(lift, week, config, modifier);
        let difference = lifted - prescribed;
        if difference.abs() < ADJUSTMENT_TOLERANCE {
            tracing::debug!(
                "{}: lifted {} vs prescribed {}, within tolerance",
                exercise.id,
                lifted,
                prescribed
            );
            continue;
        }

        let change = match calculator.policy {
            CalculationPolicy::Linear => {
                let elapsed = f64::from(week.saturating_sub(1));
                let starting_weight =
                    round_to_increment(lifted / modifier - elapsed * config.increment(lift));
                // Starting weights stay positive
                if starting_weight <= 0.0 {
                    tracing::warn!(
                        "{}: lifted {} in week {} implies starting weight {}, ignoring",
                        exercise.id,
                        lifted,
                        week,
                        starting_weight
                    );
                    continue;
                }
                AdjustmentChange::StartingWeight { starting_weight }
            }
            CalculationPolicy::TrainingMax | CalculationPolicy::LinearDeload => {
                AdjustmentChange::Additive {
                    adjustment: config.adjustment(lift) + difference,
                }
            }
        };

        tracing::info!(
            "{} ({}): lifted {} vs prescribed {}, {:?}",
            lift,
            exercise.id,
            lifted,
            prescribed,
            change
        );

        adjustments.push(LiftAdjustment {
            lift,
            exercise_id: exercise.id.clone(),
            prescribed,
            lifted,
            change,
        });
    }

    adjustments
}

/// Apply reconciled changes to a config; untouched lifts stay as they were
pub fn apply_adjustments(config: &mut ProgramConfig, adjustments: &[LiftAdjustment]) {
    for adjustment in adjustments {
        let settings = config.lift_mut(adjustment.lift);
        match adjustment.change {
            AdjustmentChange::Additive { adjustment } => settings.adjustment = adjustment,
            AdjustmentChange::StartingWeight { starting_weight } => {
                settings.starting_weight = starting_weight
            }
        }
    }
}
