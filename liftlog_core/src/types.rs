//! Core domain types for the liftlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Main lifts and calculation policies
//! - Program structure (phases, templates, week-range variations)
//! - Logged sets and completed workouts
//!
//! Exercise lists and logs serialize with camelCase keys so the JSON columns
//! written by the store stay readable by older data files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Lifts and Policies
// ============================================================================

/// A core compound lift with a trackable working weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MainLift {
    Squat,
    Bench,
    Deadlift,
    Ohp,
    Row,
    Lunges,
    Goodmornings,
    Rdl,
}

impl MainLift {
    pub const ALL: [MainLift; 8] = [
        MainLift::Squat,
        MainLift::Bench,
        MainLift::Deadlift,
        MainLift::Ohp,
        MainLift::Row,
        MainLift::Lunges,
        MainLift::Goodmornings,
        MainLift::Rdl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MainLift::Squat => "squat",
            MainLift::Bench => "bench",
            MainLift::Deadlift => "deadlift",
            MainLift::Ohp => "ohp",
            MainLift::Row => "row",
            MainLift::Lunges => "lunges",
            MainLift::Goodmornings => "goodmornings",
            MainLift::Rdl => "rdl",
        }
    }
}

impl fmt::Display for MainLift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MainLift {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        MainLift::ALL
            .iter()
            .copied()
            .find(|lift| lift.as_str() == s.to_lowercase())
            .ok_or_else(|| crate::Error::Other(format!("Unknown lift: {}", s)))
    }
}

/// How prescribed weights are derived from the program config.
///
/// The three policies are not interchangeable; a deployment runs exactly one.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalculationPolicy {
    /// `start + (week - 1) * increment`, scaled by the exercise modifier
    Linear,
    /// `training_max * intensity + adjustment`
    TrainingMax,
    /// Linear progression that pauses on deload weeks, plus the additive adjustment
    LinearDeload,
}

// ============================================================================
// Program Structure
// ============================================================================

/// A contiguous block of weeks sharing the same day layout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    pub number: u32,
    pub name: String,
    pub start_week: u32,
    pub end_week: u32,
    pub days_per_week: u32,
    pub labels: Vec<String>,
}

impl Phase {
    pub fn contains(&self, week: u32) -> bool {
        week >= self.start_week && week <= self.end_week
    }
}

/// Override of sets/reps and intensity for an inclusive range of weeks
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekVariation {
    pub week_range: (u32, u32),
    pub sets_reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
}

impl WeekVariation {
    pub fn contains(&self, week: u32) -> bool {
        week >= self.week_range.0 && week <= self.week_range.1
    }
}

/// One exercise slot inside a workout template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub id: String,
    pub name: String,
    pub sets_reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_lift: Option<MainLift>,
    /// Static fraction of the main lift, for variations such as a pause squat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_of_main: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub week_variations: Vec<WeekVariation>,
    /// Effort-based exercise with no prescribed weight
    #[serde(default, rename = "isRPE")]
    pub is_rpe: bool,
}

impl TemplateExercise {
    pub fn new(id: &str, name: &str, sets_reps: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sets_reps: sets_reps.into(),
            main_lift: None,
            percentage_of_main: None,
            week_variations: Vec::new(),
            is_rpe: false,
        }
    }

    pub fn lift(mut self, lift: MainLift) -> Self {
        self.main_lift = Some(lift);
        self
    }

    pub fn percentage(mut self, fraction: f64) -> Self {
        self.percentage_of_main = Some(fraction);
        self
    }

    pub fn vary(mut self, first: u32, last: u32, sets_reps: &str, intensity: Option<f64>) -> Self {
        self.week_variations.push(WeekVariation {
            week_range: (first, last),
            sets_reps: sets_reps.into(),
            intensity,
        });
        self
    }

    pub fn rpe(mut self) -> Self {
        self.is_rpe = true;
        self
    }
}

/// A day of training within a phase
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTemplate {
    pub id: String,
    pub phase_number: u32,
    pub day_label: String,
    pub name: String,
    pub exercises: Vec<TemplateExercise>,
}

/// Parsed form of a "5x5" style prescription
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetsReps {
    pub sets: u32,
    /// Kept as text since it may be a duration or "AMRAP"
    pub reps: String,
}

// ============================================================================
// Logged Workouts
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedSet {
    pub reps: u32,
    pub weight: f64,
    pub completed: bool,
}

/// Sets actually performed for one exercise of a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: Vec<CompletedSet>,
}

impl ExerciseLog {
    /// Heaviest completed set carrying weight. Bodyweight sets (weight 0)
    /// say nothing about the bar and are ignored.
    pub fn max_lifted_weight(&self) -> Option<f64> {
        self.sets
            .iter()
            .filter(|s| s.completed && s.weight > 0.0)
            .map(|s| s.weight)
            .fold(None, |acc, w| Some(acc.map_or(w, |m: f64| m.max(w))))
    }
}

/// Identity of a completed workout: at most one per week/day pair
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkoutKey {
    pub week: u32,
    pub day_label: String,
}

impl WorkoutKey {
    pub fn new(week: u32, day_label: impl Into<String>) -> Self {
        Self {
            week,
            day_label: day_label.into(),
        }
    }

    /// Durable-store id, `week-<week>-day-<label>`
    pub fn id(&self) -> String {
        format!("week-{}-day-{}", self.week, self.day_label)
    }
}

impl fmt::Display for WorkoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// A logged workout, with its own snapshot of exercise logs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedWorkout {
    pub id: String,
    pub week_number: u32,
    pub phase_number: u32,
    pub day_label: String,
    pub template_id: String,
    pub completed_at: DateTime<Utc>,
    pub exercise_logs: Vec<ExerciseLog>,
    pub notes: Option<String>,
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The complete declarative program: phases, deloads and day templates
#[derive(Clone, Debug)]
pub struct Catalog {
    pub name: String,
    pub phases: Vec<Phase>,
    pub deload_weeks: Vec<u32>,
    pub test_week: Option<u32>,
    pub templates: Vec<WorkoutTemplate>,
    /// Templates apply to every phase; only the day label is matched
    pub shared_templates: bool,
}
