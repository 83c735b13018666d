//! Built-in training programs.
//!
//! This module provides the declarative program data: phases, deload weeks
//! and the per-day exercise templates, plus lookups over them.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Cached built-in programs - built once and reused across all operations
static LINEAR_CATALOG: Lazy<Catalog> = Lazy::new(build_linear_catalog);
static PERIODIZED_CATALOG: Lazy<Catalog> = Lazy::new(build_periodized_catalog);

/// Which built-in program a deployment runs
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgramKind {
    /// Open-ended three-day linear progression
    #[default]
    Linear,
    /// 16-week block with phases, deloads and percentage work
    Periodized,
}

impl ProgramKind {
    /// Get a reference to the cached catalog for this program
    pub fn catalog(&self) -> &'static Catalog {
        match self {
            ProgramKind::Linear => &LINEAR_CATALOG,
            ProgramKind::Periodized => &PERIODIZED_CATALOG,
        }
    }

    /// Weight policy the program's data was written for
    pub fn default_policy(&self) -> CalculationPolicy {
        match self {
            ProgramKind::Linear => CalculationPolicy::Linear,
            ProgramKind::Periodized => CalculationPolicy::TrainingMax,
        }
    }
}

impl Catalog {
    /// Phase whose inclusive week range contains `week`
    pub fn phase_for_week(&self, week: u32) -> Result<&Phase> {
        self.phases
            .iter()
            .find(|p| p.contains(week))
            .ok_or(Error::PhaseNotFound { week })
    }

    /// Day labels scheduled for a week, in order
    pub fn workouts_for_week(&self, week: u32) -> Result<Vec<String>> {
        Ok(self.phase_for_week(week)?.labels.clone())
    }

    pub fn is_deload_week(&self, week: u32) -> bool {
        self.deload_weeks.contains(&week)
    }

    /// Number of deload weeks strictly before `week`
    pub fn deload_weeks_before(&self, week: u32) -> u32 {
        self.deload_weeks.iter().filter(|&&w| w < week).count() as u32
    }

    /// Template for a phase/day pair; the phase is ignored for shared templates
    pub fn template(&self, phase_number: u32, day_label: &str) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| {
            t.day_label == day_label && (self.shared_templates || t.phase_number == phase_number)
        })
    }

    pub fn template_by_id(&self, id: &str) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Last week covered by any phase
    pub fn total_weeks(&self) -> u32 {
        self.phases.iter().map(|p| p.end_week).max().unwrap_or(0)
    }

    /// Number of scheduled workouts in weeks `1..=up_to_week`
    pub fn total_workouts(&self, up_to_week: u32) -> u32 {
        self.phases
            .iter()
            .filter(|p| p.start_week <= up_to_week)
            .map(|p| {
                let last = p.end_week.min(up_to_week);
                (last - p.start_week + 1) * p.labels.len() as u32
            })
            .sum()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.phases.is_empty() {
            errors.push("Catalog has no phases".to_string());
        }

        let mut phases: Vec<&Phase> = self.phases.iter().collect();
        phases.sort_by_key(|p| p.start_week);
        if let Some(first) = phases.first() {
            if first.start_week != 1 {
                errors.push(format!("First phase starts at week {}, not 1", first.start_week));
            }
        }
        for pair in phases.windows(2) {
            if pair[1].start_week != pair[0].end_week + 1 {
                errors.push(format!(
                    "Phases {} and {} are not contiguous (weeks {}-{} then {}-{})",
                    pair[0].number,
                    pair[1].number,
                    pair[0].start_week,
                    pair[0].end_week,
                    pair[1].start_week,
                    pair[1].end_week
                ));
            }
        }

        for phase in &self.phases {
            if phase.start_week > phase.end_week {
                errors.push(format!(
                    "Phase {} ends before it starts ({} > {})",
                    phase.number, phase.start_week, phase.end_week
                ));
            }
            if phase.labels.len() as u32 != phase.days_per_week {
                errors.push(format!(
                    "Phase {} declares {} days but has {} labels",
                    phase.number,
                    phase.days_per_week,
                    phase.labels.len()
                ));
            }
            for label in &phase.labels {
                if self.template(phase.number, label).is_none() {
                    errors.push(format!(
                        "Phase {} day '{}' has no template",
                        phase.number, label
                    ));
                }
            }
        }

        for week in &self.deload_weeks {
            if self.phase_for_week(*week).is_err() {
                errors.push(format!("Deload week {} is outside every phase", week));
            }
        }

        for template in &self.templates {
            if template.id.is_empty() {
                errors.push("Template has empty ID".to_string());
            }
            if template.exercises.is_empty() {
                errors.push(format!("Template '{}' has no exercises", template.id));
            }
            if self.templates.iter().filter(|t| t.id == template.id).count() > 1 {
                errors.push(format!("Duplicate template ID '{}'", template.id));
            }

            for exercise in &template.exercises {
                if exercise.id.is_empty() || exercise.name.is_empty() {
                    errors.push(format!(
                        "Template '{}' has an exercise with empty id or name",
                        template.id
                    ));
                }
                if let Some(pct) = exercise.percentage_of_main {
                    if pct <= 0.0 || pct > 2.0 {
                        errors.push(format!(
                            "Exercise '{}': percentage of main {} out of range",
                            exercise.id, pct
                        ));
                    }
                    if exercise.main_lift.is_none() {
                        errors.push(format!(
                            "Exercise '{}' has a percentage but no main lift",
                            exercise.id
                        ));
                    }
                }

                for (i, variation) in exercise.week_variations.iter().enumerate() {
                    let (first, last) = variation.week_range;
                    if first > last {
                        errors.push(format!(
                            "Exercise '{}': week range {}-{} is reversed",
                            exercise.id, first, last
                        ));
                    }
                    if let Some(intensity) = variation.intensity {
                        if intensity <= 0.0 || intensity > 2.0 {
                            errors.push(format!(
                                "Exercise '{}': intensity {} out of range",
                                exercise.id, intensity
                            ));
                        }
                    }
                    for other in &exercise.week_variations[i + 1..] {
                        if first <= other.week_range.1 && other.week_range.0 <= last {
                            errors.push(format!(
                                "Exercise '{}': week ranges {}-{} and {}-{} overlap",
                                exercise.id, first, last, other.week_range.0, other.week_range.1
                            ));
                        }
                    }
                }
            }
        }

        errors
    }
}

fn phase(number: u32, name: &str, start_week: u32, end_week: u32, labels: &[&str]) -> Phase {
    Phase {
        number,
        name: name.into(),
        start_week,
        end_week,
        days_per_week: labels.len() as u32,
        labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}

fn template(
    id: &str,
    phase_number: u32,
    day_label: &str,
    name: &str,
    exercises: Vec<TemplateExercise>,
) -> WorkoutTemplate {
    WorkoutTemplate {
        id: id.into(),
        phase_number,
        day_label: day_label.into(),
        name: name.into(),
        exercises,
    }
}

/// Builds the open-ended three-day linear program
///
/// **Note**: For production use, prefer `ProgramKind::Linear.catalog()` which
/// returns a cached reference.
pub fn build_linear_catalog() -> Catalog {
    use MainLift::*;

    let templates = vec![
        // Day 1: Squat + Bench focus
        template(
            "day-1",
            1,
            "1",
            "SQUAT & BENCH",
            vec![
                TemplateExercise::new("back-squat", "Back Squat", "4x5").lift(Squat),
                TemplateExercise::new("bench-press", "Bench Press", "4x5").lift(Bench),
                TemplateExercise::new("pendlay-row", "Pendlay Row", "3x8").lift(Row),
                TemplateExercise::new("plank-day1", "Plank (seconds)", "3x60").rpe(),
            ],
        ),
        // Day 2: Deadlift + OHP focus
        template(
            "day-2",
            1,
            "2",
            "DEADLIFT & OHP",
            vec![
                TemplateExercise::new("deadlift", "Deadlift", "4x5").lift(Deadlift),
                TemplateExercise::new("overhead-press", "Overhead Press", "3x8").lift(Ohp),
                TemplateExercise::new("back-lunges", "Back Lunges (per leg)", "3x8").lift(Lunges),
                TemplateExercise::new("good-mornings", "Good Mornings", "3x8").lift(Goodmornings),
            ],
        ),
        // Day 3: Variations
        template(
            "day-3",
            1,
            "3",
            "VARIATIONS",
            vec![
                TemplateExercise::new("pause-squat", "Pause Squat", "3x6")
                    .lift(Squat)
                    .percentage(0.96),
                TemplateExercise::new("pause-bench", "Pause Bench", "3x6").lift(Bench),
                TemplateExercise::new("romanian-deadlift", "Romanian Deadlift", "3x8").lift(Rdl),
                TemplateExercise::new("plank-day3", "Plank (seconds)", "3x60").rpe(),
            ],
        ),
    ];

    Catalog {
        name: "Linear Progression".into(),
        phases: vec![phase(1, "Linear Progression", 1, 999, &["1", "2", "3"])],
        deload_weeks: Vec::new(),
        test_week: None,
        templates,
        shared_templates: true,
    }
}

/// Builds the 16-week periodized block
///
/// **Note**: For production use, prefer `ProgramKind::Periodized.catalog()`.
pub fn build_periodized_catalog() -> Catalog {
    use MainLift::*;

    // Main lift waves: accumulate over weeks 1-5, deload in 6
    let hypertrophy_main = |id: &str, name: &str, lift: MainLift| {
        TemplateExercise::new(id, name, "4x8")
            .lift(lift)
            .vary(1, 2, "4x8", Some(0.65))
            .vary(3, 4, "4x8", Some(0.70))
            .vary(5, 5, "4x6", Some(0.75))
            .vary(6, 6, "3x5", Some(0.55))
    };
    // Strength waves: heavier triples and fives, deload in 12
    let strength_main = |id: &str, name: &str, lift: MainLift| {
        TemplateExercise::new(id, name, "5x5")
            .lift(lift)
            .vary(7, 8, "5x5", Some(0.75))
            .vary(9, 10, "5x3", Some(0.82))
            .vary(11, 11, "4x2", Some(0.88))
            .vary(12, 12, "3x3", Some(0.60))
    };
    // Peaking singles into the test week
    let peaking_main = |id: &str, name: &str, lift: MainLift| {
        TemplateExercise::new(id, name, "3x3")
            .lift(lift)
            .vary(13, 13, "3x3", Some(0.87))
            .vary(14, 14, "3x2", Some(0.92))
            .vary(15, 15, "2x1", Some(0.95))
            .vary(16, 16, "1x1", Some(1.0))
    };

    let templates = vec![
        // Phase 1: Hypertrophy
        template(
            "p1-a",
            1,
            "A",
            "SQUAT VOLUME",
            vec![
                hypertrophy_main("back-squat", "Back Squat", Squat),
                TemplateExercise::new("pause-squat", "Pause Squat", "3x6")
                    .lift(Squat)
                    .percentage(0.60)
                    .vary(1, 5, "3x6", None),
                TemplateExercise::new("walking-lunges", "Walking Lunges (per leg)", "3x10")
                    .lift(Lunges)
                    .vary(1, 5, "3x10", Some(0.70)),
                TemplateExercise::new("plank-a", "Plank (seconds)", "3x45").rpe(),
            ],
        ),
        template(
            "p1-b",
            1,
            "B",
            "BENCH VOLUME",
            vec![
                hypertrophy_main("bench-press", "Bench Press", Bench),
                TemplateExercise::new("pendlay-row", "Pendlay Row", "4x10")
                    .lift(Row)
                    .vary(1, 5, "4x10", Some(0.70))
                    .vary(6, 6, "3x8", Some(0.55)),
                TemplateExercise::new("close-grip-bench", "Close-Grip Bench", "3x10")
                    .lift(Bench)
                    .percentage(0.60)
                    .vary(1, 5, "3x10", None),
                TemplateExercise::new("face-pulls", "Face Pulls", "3x15").rpe(),
            ],
        ),
        template(
            "p1-c",
            1,
            "C",
            "DEADLIFT VOLUME",
            vec![
                hypertrophy_main("deadlift", "Deadlift", Deadlift),
                TemplateExercise::new("good-mornings", "Good Mornings", "3x10")
                    .lift(Goodmornings)
                    .vary(1, 5, "3x10", Some(0.70)),
                TemplateExercise::new("romanian-deadlift", "Romanian Deadlift", "3x10")
                    .lift(Rdl)
                    .vary(1, 5, "3x10", Some(0.70))
                    .vary(6, 6, "2x8", Some(0.55)),
                TemplateExercise::new("hanging-leg-raise", "Hanging Leg Raise", "3x12").rpe(),
            ],
        ),
        template(
            "p1-d",
            1,
            "D",
            "PRESS VOLUME",
            vec![
                hypertrophy_main("overhead-press", "Overhead Press", Ohp),
                TemplateExercise::new("incline-bench", "Incline Bench", "3x10")
                    .lift(Bench)
                    .percentage(0.65),
                TemplateExercise::new("chin-ups", "Chin-ups", "3xAMRAP").rpe(),
            ],
        ),
        // Phase 2: Strength
        template(
            "p2-a",
            2,
            "A",
            "SQUAT STRENGTH",
            vec![
                strength_main("back-squat", "Back Squat", Squat),
                TemplateExercise::new("pause-squat", "Pause Squat", "3x3")
                    .lift(Squat)
                    .vary(7, 11, "3x3", Some(0.70)),
                TemplateExercise::new("plank-a", "Plank (seconds)", "3x60").rpe(),
            ],
        ),
        template(
            "p2-b",
            2,
            "B",
            "BENCH STRENGTH",
            vec![
                strength_main("bench-press", "Bench Press", Bench),
                TemplateExercise::new("pendlay-row", "Pendlay Row", "4x6")
                    .lift(Row)
                    .vary(7, 11, "4x6", Some(0.80))
                    .vary(12, 12, "3x6", Some(0.60)),
                TemplateExercise::new("face-pulls", "Face Pulls", "3x15").rpe(),
            ],
        ),
        template(
            "p2-c",
            2,
            "C",
            "DEADLIFT STRENGTH",
            vec![
                strength_main("deadlift", "Deadlift", Deadlift),
                TemplateExercise::new("romanian-deadlift", "Romanian Deadlift", "3x6")
                    .lift(Rdl)
                    .vary(7, 11, "3x6", Some(0.80)),
                TemplateExercise::new("back-lunges", "Back Lunges (per leg)", "3x8")
                    .lift(Lunges)
                    .vary(7, 11, "3x8", Some(0.75)),
            ],
        ),
        template(
            "p2-d",
            2,
            "D",
            "PRESS STRENGTH",
            vec![
                strength_main("overhead-press", "Overhead Press", Ohp),
                TemplateExercise::new("pause-bench", "Pause Bench", "3x5")
                    .lift(Bench)
                    .vary(7, 11, "3x5", Some(0.72)),
                TemplateExercise::new("chin-ups", "Chin-ups", "4xAMRAP").rpe(),
            ],
        ),
        // Phase 3: Peaking
        template(
            "p3-a",
            3,
            "A",
            "SQUAT & BENCH PEAK",
            vec![
                peaking_main("back-squat", "Back Squat", Squat),
                peaking_main("bench-press", "Bench Press", Bench),
            ],
        ),
        template(
            "p3-b",
            3,
            "B",
            "DEADLIFT PEAK",
            vec![
                peaking_main("deadlift", "Deadlift", Deadlift),
                TemplateExercise::new("overhead-press", "Overhead Press", "3x3")
                    .lift(Ohp)
                    .vary(13, 15, "3x3", Some(0.85)),
            ],
        ),
        template(
            "p3-c",
            3,
            "C",
            "TECHNIQUE",
            vec![
                TemplateExercise::new("pause-squat", "Pause Squat", "3x2")
                    .lift(Squat)
                    .vary(13, 15, "3x2", Some(0.75)),
                TemplateExercise::new("pause-bench", "Pause Bench", "3x2")
                    .lift(Bench)
                    .vary(13, 15, "3x2", Some(0.75)),
                TemplateExercise::new("plank-c", "Plank (seconds)", "2x45").rpe(),
            ],
        ),
    ];

    Catalog {
        name: "16-Week Strength Block".into(),
        phases: vec![
            phase(1, "Hypertrophy", 1, 6, &["A", "B", "C", "D"]),
            phase(2, "Strength", 7, 12, &["A", "B", "C", "D"]),
            phase(3, "Peaking", 13, 16, &["A", "B", "C"]),
        ],
        deload_weeks: vec![6, 12],
        test_week: Some(16),
        templates,
        shared_templates: false,
    }
}
