//! Weight prescription for a given week.
//!
//! This module turns a template exercise, a week number and the program
//! config into prescribed sets, reps and weight:
//! - Week-range variations override base sets/reps and intensity
//! - One of three weight policies (see [`CalculationPolicy`])
//! - Every weight is rounded to the nearest 2.5 kg, ties rounding up

use crate::{CalculationPolicy, Catalog, MainLift, ProgramConfig, SetsReps, TemplateExercise, WeekVariation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Smallest plate jump; prescriptions are multiples of this
pub const WEIGHT_STEP: f64 = 2.5;

static SETS_REPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)x(.+)$").expect("sets x reps pattern is valid"));

/// Round to the nearest multiple of 2.5, with exact midpoints rounding up
///
/// `1.25 -> 2.5`, `48.75 -> 50.0`, `-1.25 -> 0.0`.
pub fn round_to_increment(weight: f64) -> f64 {
    (weight / WEIGHT_STEP + 0.5).floor() * WEIGHT_STEP
}

/// First week-range variation containing `week`
pub fn week_variation(exercise: &TemplateExercise, week: u32) -> Option<&WeekVariation> {
    exercise.week_variations.iter().find(|v| v.contains(week))
}

/// Sets x reps for the week, preferring a matching variation
pub fn sets_reps_for_week(exercise: &TemplateExercise, week: u32) -> &str {
    match week_variation(exercise, week) {
        Some(v) if !v.sets_reps.is_empty() => &v.sets_reps,
        _ => &exercise.sets_reps,
    }
}

/// Intensity for the week: a variation's intensity wins over the static percentage
pub fn intensity_for_week(exercise: &TemplateExercise, week: u32) -> Option<f64> {
    week_variation(exercise, week)
        .and_then(|v| v.intensity)
        .or(exercise.percentage_of_main)
}

/// Parse "5x5" into 5 sets of "5"; anything else is one set of the whole text
pub fn parse_sets_reps(text: &str) -> SetsReps {
    if let Some(caps) = SETS_REPS_RE.captures(text) {
        if let Ok(sets) = caps[1].parse::<u32>() {
            return SetsReps {
                sets,
                reps: caps[2].to_string(),
            };
        }
    }
    SetsReps {
        sets: 1,
        reps: text.to_string(),
    }
}

/// One week's worth of working weights, as exported for progress charts
#[derive(Clone, Debug, Serialize)]
pub struct ProgressionRow {
    pub week: u32,
    pub deload: bool,
    pub weights: BTreeMap<MainLift, f64>,
}

/// Prescription calculator bound to a policy and a program
#[derive(Clone, Copy, Debug)]
pub struct Calculator<'a> {
    pub policy: CalculationPolicy,
    pub catalog: &'a Catalog,
}

impl<'a> Calculator<'a> {
    pub fn new(policy: CalculationPolicy, catalog: &'a Catalog) -> Self {
        Self { policy, catalog }
    }

    /// Whether the exercise shows up in `week`
    ///
    /// Under linear progression every exercise is always shown; otherwise an
    /// exercise with variations only appears in weeks one of them covers.
    pub fn is_exercise_active_for_week(&self, exercise: &TemplateExercise, week: u32) -> bool {
        match self.policy {
            CalculationPolicy::Linear => true,
            _ => exercise.week_variations.is_empty() || week_variation(exercise, week).is_some(),
        }
    }

    /// Prescribed weight for a lift in a week, rounded to 2.5
    pub fn calculate_weight(
        &self,
        lift: MainLift,
        week: u32,
        config: &ProgramConfig,
        modifier: f64,
    ) -> f64 {
        let elapsed_weeks = f64::from(week.saturating_sub(1));

        let weight = match self.policy {
            CalculationPolicy::Linear => {
                let base = config.starting_weight(lift) + elapsed_weeks * config.increment(lift);
                base * modifier
            }
            CalculationPolicy::TrainingMax => {
                config.training_max(lift) * modifier + config.adjustment(lift)
            }
            CalculationPolicy::LinearDeload => {
                let deloads_before = self.catalog.deload_weeks_before(week);
                let progression_weeks = f64::from(week.saturating_sub(1).saturating_sub(deloads_before));
                let mut base = config.starting_weight(lift)
                    + progression_weeks * config.increment(lift)
                    + config.adjustment(lift);
                if self.catalog.is_deload_week(week) {
                    base *= config.deload_percentage;
                }
                base * modifier
            }
        };

        let rounded = round_to_increment(weight);
        tracing::debug!(
            "{} week {} ({:?}, x{}): {} -> {}",
            lift,
            week,
            self.policy,
            modifier,
            weight,
            rounded
        );
        rounded
    }

    /// Prescribed weight for a template exercise, if it has one
    ///
    /// Effort-based exercises and exercises without a main lift get none, as
    /// do training-max exercises with no intensity for the week.
    pub fn exercise_weight(
        &self,
        exercise: &TemplateExercise,
        week: u32,
        config: &ProgramConfig,
    ) -> Option<f64> {
        if exercise.is_rpe {
            return None;
        }
        let lift = exercise.main_lift?;
        let modifier = self.resolved_modifier(exercise, week)?;
        Some(self.calculate_weight(lift, week, config, modifier))
    }

    /// Modifier applied to the lift's weight, `None` if it cannot be resolved
    pub fn resolved_modifier(&self, exercise: &TemplateExercise, week: u32) -> Option<f64> {
        let intensity = intensity_for_week(exercise, week);
        match self.policy {
            CalculationPolicy::TrainingMax => intensity,
            _ => Some(intensity.unwrap_or(1.0)),
        }
    }

    /// Working weight of every main lift for the week
    ///
    /// Under the training-max policy this is each lift's training max.
    pub fn all_weights_for_week(&self, week: u32, config: &ProgramConfig) -> BTreeMap<MainLift, f64> {
        MainLift::ALL
            .iter()
            .map(|&lift| {
                let weight = match self.policy {
                    CalculationPolicy::TrainingMax => config.training_max(lift),
                    _ => self.calculate_weight(lift, week, config, 1.0),
                };
                (lift, weight)
            })
            .collect()
    }

    /// Week-by-week working weights for weeks `1..=weeks`
    pub fn progression_table(&self, weeks: u32, config: &ProgramConfig) -> Vec<ProgressionRow> {
        (1..=weeks)
            .map(|week| ProgressionRow {
                week,
                deload: self.catalog.is_deload_week(week),
                weights: self.all_weights_for_week(week, config),
            })
            .collect()
    }
}
