//! Tracker service tying the program, the calculator and the store together.
//!
//! Every operation is a short unit of work against the injected [`Store`]:
//! - Prescribing a day's workout (sets, reps, weight, active flag)
//! - Saving a completed workout, then reconciling prescribed vs. lifted
//! - Week derivation by date or by completion
//! - History queries (records, last used weights, progress)
//!
//! Saving is two writes: the workout upsert, then one config write holding
//! every changed lift. If the second fails the workout stays saved and the
//! error is returned.

use crate::config::ProgramSettings;
use crate::history;
use crate::progression::{parse_sets_reps, sets_reps_for_week, Calculator, ProgressionRow};
use crate::reconcile::{apply_adjustments, reconcile, LiftAdjustment};
use crate::store::Store;
use crate::week::{self, WeekMode};
use crate::{
    Catalog, CompletedWorkout, Error, ExerciseLog, MainLift, ProgramConfig, Result,
    TemplateExercise, WorkoutKey, WorkoutTemplate,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One exercise of a prescribed workout, ready for display
#[derive(Clone, Debug, Serialize)]
pub struct PrescribedExercise {
    pub exercise_id: String,
    pub name: String,
    pub main_lift: Option<MainLift>,
    pub sets_reps: String,
    pub sets: u32,
    pub reps: String,
    /// Prescribed weight; `None` for effort-based or unweighted work
    pub weight: Option<f64>,
    pub is_rpe: bool,
    /// False when the exercise is not programmed this week
    pub active: bool,
    /// Prescribed weight, else the weight last logged for this exercise
    pub suggested_weight: Option<f64>,
}

/// A template resolved for a specific week
#[derive(Clone, Debug, Serialize)]
pub struct PrescribedWorkout {
    pub id: String,
    pub week: u32,
    pub phase_number: u32,
    pub phase_name: String,
    pub day_label: String,
    pub template_id: String,
    pub name: String,
    pub deload: bool,
    pub completed: bool,
    pub exercises: Vec<PrescribedExercise>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DayStatus {
    pub day_label: String,
    pub template_name: Option<String>,
    pub completed: bool,
}

/// Summary of a week: phase, days and working weights
#[derive(Clone, Debug, Serialize)]
pub struct WeekOverview {
    pub week: u32,
    pub phase_number: u32,
    pub phase_name: String,
    pub deload: bool,
    pub test_week: bool,
    pub days: Vec<DayStatus>,
    pub weights: BTreeMap<MainLift, f64>,
}

/// Payload for logging a workout
#[derive(Clone, Debug)]
pub struct SaveWorkout {
    pub week: u32,
    pub day_label: String,
    pub exercise_logs: Vec<ExerciseLog>,
    pub notes: Option<String>,
    /// Defaults to now
    pub completed_at: Option<DateTime<Utc>>,
}

impl SaveWorkout {
    pub fn new(week: u32, day_label: impl Into<String>, exercise_logs: Vec<ExerciseLog>) -> Self {
        Self {
            week,
            day_label: day_label.into(),
            exercise_logs,
            notes: None,
            completed_at: None,
        }
    }
}

/// Result of a save: the stored workout and any config changes it caused
#[derive(Clone, Debug, Serialize)]
pub struct SaveOutcome {
    pub workout: CompletedWorkout,
    pub adjustments: Vec<LiftAdjustment>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProgressSummary {
    pub current_week: u32,
    pub completed_workouts: u32,
    pub total_workouts: u32,
    pub percent_complete: f64,
}

/// Program tracker over a store
pub struct Tracker<S: Store> {
    store: S,
    settings: ProgramSettings,
    catalog: &'static Catalog,
}

impl<S: Store> Tracker<S> {
    pub fn new(store: S, settings: ProgramSettings) -> Self {
        let catalog = settings.kind.catalog();
        Self {
            store,
            settings,
            catalog,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ProgramSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn calculator(&self) -> Calculator<'static> {
        Calculator::new(self.settings.policy(), self.catalog)
    }

    /// Highest reachable week: the configured cap, limited by the program length
    pub fn week_cap(&self) -> u32 {
        self.settings.week_cap.min(self.catalog.total_weeks()).max(1)
    }

    /// Stored config, inserting the default row if there is none
    fn stored_config(&mut self) -> Result<ProgramConfig> {
        match self.store.load_config()? {
            Some(config) => Ok(config),
            None => {
                tracing::info!("No program config stored, inserting defaults");
                let config = ProgramConfig::default();
                self.store.save_config(&config)?;
                Ok(config)
            }
        }
    }

    /// Config with `current_week` derived as of `today`
    pub fn config_on(&mut self, today: NaiveDate) -> Result<ProgramConfig> {
        let mut config = self.stored_config()?;
        let cap = self.week_cap();

        config.current_week = match self.settings.week_mode {
            WeekMode::Date => match config.program_start_date {
                Some(start) => week::date_current_week(start, today, cap),
                None => config.current_week.clamp(1, cap),
            },
            WeekMode::Completion => {
                let workouts = self.store.list_workouts()?;
                history::completion_current_week(self.catalog, &workouts, cap)?
            }
        };

        Ok(config)
    }

    pub fn config(&mut self) -> Result<ProgramConfig> {
        self.config_on(Local::now().date_naive())
    }

    /// Load, modify and save the config row
    pub fn update_config(&mut self, f: impl FnOnce(&mut ProgramConfig)) -> Result<ProgramConfig> {
        let mut config = self.stored_config()?;
        f(&mut config);
        self.store.save_config(&config)?;
        Ok(config)
    }

    /// Make `week` the current week as of `today`
    pub fn set_current_week(&mut self, week: u32, today: NaiveDate) -> Result<ProgramConfig> {
        let max = self.week_cap();
        if week < 1 || week > max {
            return Err(Error::InvalidWeek { week, max });
        }

        let start = week::start_date_for_week(week, today, self.settings.week_starts_on);
        tracing::info!("Setting current week to {} (program start {})", week, start);
        self.update_config(|config| {
            config.program_start_date = Some(start);
            config.current_week = week;
        })
    }

    /// Insert the default config if absent and store every program template
    pub fn seed(&mut self) -> Result<usize> {
        self.stored_config()?;
        for template in &self.catalog.templates {
            self.store.upsert_template(template)?;
        }
        tracing::info!(
            "Seeded {} templates for '{}'",
            self.catalog.templates.len(),
            self.catalog.name
        );
        Ok(self.catalog.templates.len())
    }

    /// Template for a phase/day: the stored copy if any, else the built-in one
    pub fn template(&self, phase_number: u32, day_label: &str) -> Result<Option<WorkoutTemplate>> {
        if let Some(builtin) = self.catalog.template(phase_number, day_label) {
            return Ok(Some(
                self.store
                    .get_template(&builtin.id)?
                    .unwrap_or_else(|| builtin.clone()),
            ));
        }

        let shared = self.catalog.shared_templates;
        Ok(self
            .store
            .list_templates()?
            .into_iter()
            .find(|t| t.day_label == day_label && (shared || t.phase_number == phase_number)))
    }

    /// Replace a template's exercise list
    pub fn update_template(
        &mut self,
        id: &str,
        exercises: Vec<TemplateExercise>,
    ) -> Result<WorkoutTemplate> {
        let mut template = match self.store.get_template(id)? {
            Some(template) => template,
            None => self
                .catalog
                .template_by_id(id)
                .cloned()
                .ok_or_else(|| Error::TemplateNotFound(id.to_string()))?,
        };

        template.exercises = exercises;
        self.store.upsert_template(&template)?;
        tracing::info!("Updated template '{}'", id);
        Ok(template)
    }

    /// Prescription for one day of a week
    ///
    /// A week outside the program is an error; a day without a template is
    /// `None`.
    pub fn prescribe(&mut self, week: u32, day_label: &str) -> Result<Option<PrescribedWorkout>> {
        let phase = self.catalog.phase_for_week(week)?;
        let Some(template) = self.template(phase.number, day_label)? else {
            tracing::debug!("No template for phase {} day '{}'", phase.number, day_label);
            return Ok(None);
        };

        let config = self.stored_config()?;
        let workouts = self.store.list_workouts()?;
        let last_used = history::last_used_weights(&workouts);
        let key = WorkoutKey::new(week, day_label);
        let id = key.id();
        let completed = workouts.iter().any(|w| w.id == id);
        let calc = self.calculator();

        let exercises = template
            .exercises
            .iter()
            .map(|exercise| {
                let sets_reps = sets_reps_for_week(exercise, week).to_string();
                let parsed = parse_sets_reps(&sets_reps);
                let weight = calc.exercise_weight(exercise, week, &config);
                PrescribedExercise {
                    exercise_id: exercise.id.clone(),
                    name: exercise.name.clone(),
                    main_lift: exercise.main_lift,
                    sets: parsed.sets,
                    reps: parsed.reps,
                    sets_reps,
                    weight,
                    is_rpe: exercise.is_rpe,
                    active: calc.is_exercise_active_for_week(exercise, week),
                    suggested_weight: weight.or_else(|| last_used.get(&exercise.id).copied()),
                }
            })
            .collect();

        Ok(Some(PrescribedWorkout {
            id,
            week,
            phase_number: phase.number,
            phase_name: phase.name.clone(),
            day_label: day_label.to_string(),
            template_id: template.id,
            name: template.name,
            deload: self.catalog.is_deload_week(week),
            completed,
            exercises,
        }))
    }

    pub fn week_overview(&mut self, week: u32) -> Result<WeekOverview> {
        let phase = self.catalog.phase_for_week(week)?;
        let config = self.stored_config()?;
        let done = history::completed_ids(&self.store.list_workouts()?);

        let mut days = Vec::with_capacity(phase.labels.len());
        for label in &phase.labels {
            days.push(DayStatus {
                day_label: label.clone(),
                template_name: self.template(phase.number, label)?.map(|t| t.name),
                completed: done.contains(&WorkoutKey::new(week, label.as_str()).id()),
            });
        }

        Ok(WeekOverview {
            week,
            phase_number: phase.number,
            phase_name: phase.name.clone(),
            deload: self.catalog.is_deload_week(week),
            test_week: self.catalog.test_week == Some(week),
            days,
            weights: self.calculator().all_weights_for_week(week, &config),
        })
    }

    /// Store a completed workout and fold its main lifts back into the config
    pub fn save_workout(&mut self, save: SaveWorkout) -> Result<SaveOutcome> {
        validate_save(&save)?;

        let phase = self.catalog.phase_for_week(save.week)?;
        let template = self.template(phase.number, &save.day_label)?;
        let config = self.stored_config()?;

        let key = WorkoutKey::new(save.week, save.day_label.as_str());
        let workout = CompletedWorkout {
            id: key.id(),
            week_number: save.week,
            phase_number: phase.number,
            day_label: save.day_label,
            template_id: template.as_ref().map(|t| t.id.clone()).unwrap_or_default(),
            completed_at: save.completed_at.unwrap_or_else(Utc::now),
            exercise_logs: save.exercise_logs,
            notes: save.notes,
        };
        self.store.upsert_workout(&workout)?;
        tracing::info!("Saved workout {}", workout.id);

        let Some(template) = template else {
            tracing::warn!("No template for {}, skipping reconciliation", workout.id);
            return Ok(SaveOutcome {
                workout,
                adjustments: Vec::new(),
            });
        };

        let adjustments = reconcile(
            &self.calculator(),
            &template,
            &workout.exercise_logs,
            workout.week_number,
            &config,
        );
        if !adjustments.is_empty() {
            let mut updated = config;
            apply_adjustments(&mut updated, &adjustments);
            self.store.save_config(&updated)?;
            tracing::info!(
                "Applied {} lift adjustment(s) from {}",
                adjustments.len(),
                workout.id
            );
        }

        Ok(SaveOutcome {
            workout,
            adjustments,
        })
    }

    pub fn delete_workout(&mut self, week: u32, day_label: &str) -> Result<bool> {
        let removed = self.store.delete_workout(&WorkoutKey::new(week, day_label))?;
        if removed {
            tracing::info!("Deleted workout week {} day {}", week, day_label);
        }
        Ok(removed)
    }

    pub fn completed_workout(&self, week: u32, day_label: &str) -> Result<Option<CompletedWorkout>> {
        self.store.get_workout(&WorkoutKey::new(week, day_label))
    }

    /// Every completed workout, ordered by week then day
    pub fn completed_workouts(&self) -> Result<Vec<CompletedWorkout>> {
        let mut workouts = self.store.list_workouts()?;
        workouts.sort_by(|a, b| {
            a.week_number
                .cmp(&b.week_number)
                .then_with(|| a.day_label.cmp(&b.day_label))
        });
        Ok(workouts)
    }

    pub fn personal_records(&self) -> Result<BTreeMap<String, f64>> {
        Ok(history::personal_records(&self.store.list_workouts()?))
    }

    pub fn last_used_weights(&self) -> Result<HashMap<String, f64>> {
        Ok(history::last_used_weights(&self.store.list_workouts()?))
    }

    /// Completed vs. scheduled workouts up to the week cap
    pub fn progress_summary(&mut self, today: NaiveDate) -> Result<ProgressSummary> {
        let current_week = self.config_on(today)?.current_week;
        let cap = self.week_cap();
        let total = self.catalog.total_workouts(cap);
        let completed = self
            .store
            .list_workouts()?
            .iter()
            .filter(|w| w.week_number >= 1 && w.week_number <= cap)
            .count() as u32;

        let percent = if total == 0 {
            0.0
        } else {
            f64::from(completed) / f64::from(total) * 100.0
        };

        Ok(ProgressSummary {
            current_week,
            completed_workouts: completed,
            total_workouts: total,
            percent_complete: percent,
        })
    }

    /// Working weights for weeks `1..=weeks`
    pub fn progression_table(&mut self, weeks: u32) -> Result<Vec<ProgressionRow>> {
        let config = self.stored_config()?;
        Ok(self.calculator().progression_table(weeks, &config))
    }
}

fn validate_save(save: &SaveWorkout) -> Result<()> {
    if save.day_label.trim().is_empty() {
        return Err(Error::InvalidLog("day label is empty".into()));
    }
    for log in &save.exercise_logs {
        if log.exercise_id.trim().is_empty() {
            return Err(Error::InvalidLog("exercise id is empty".into()));
        }
        if let Some(set) = log
            .sets
            .iter()
            .find(|s| !s.weight.is_finite() || s.weight < 0.0)
        {
            return Err(Error::InvalidLog(format!(
                "{}: invalid weight {}",
                log.exercise_id, set.weight
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProgramKind;
    use crate::store::{JsonStore, MemoryStore};
    use crate::{CalculationPolicy, CompletedSet};

    fn today() -> NaiveDate {
        // A Wednesday
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn linear() -> Tracker<MemoryStore> {
        Tracker::new(MemoryStore::new(), ProgramSettings::default())
    }

    fn tracker(kind: ProgramKind, policy: Option<CalculationPolicy>) -> Tracker<MemoryStore> {
        let settings = ProgramSettings {
            kind,
            policy,
            ..ProgramSettings::default()
        };
        Tracker::new(MemoryStore::new(), settings)
    }

    fn log(exercise_id: &str, sets: &[(f64, bool)]) -> ExerciseLog {
        ExerciseLog {
            exercise_id: exercise_id.into(),
            exercise_name: exercise_id.into(),
            sets: sets
                .iter()
                .map(|&(weight, completed)| CompletedSet {
                    reps: 5,
                    weight,
                    completed,
                })
                .collect(),
        }
    }

    fn weight_of(workout: &PrescribedWorkout, exercise_id: &str) -> Option<f64> {
        workout
            .exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .and_then(|e| e.weight)
    }

    #[test]
    fn test_saving_twice_keeps_one_workout() {
        crate::logging::init_test();
        let mut tracker = linear();
        let save = SaveWorkout::new(1, "1", vec![log("back-squat", &[(62.5, true)])]);

        tracker.save_workout(save.clone()).unwrap();
        tracker.save_workout(save).unwrap();

        let workouts = tracker.completed_workouts().unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].id, "week-1-day-1");
        assert_eq!(workouts[0].template_id, "day-1");
    }

    #[test]
    fn test_within_tolerance_leaves_config_unchanged() {
        let mut tracker = linear();
        let before = tracker.config_on(today()).unwrap();

        let outcome = tracker
            .save_workout(SaveWorkout::new(1, "1", vec![log("back-squat", &[(64.99, true)])]))
            .unwrap();

        assert!(outcome.adjustments.is_empty());
        assert_eq!(tracker.config_on(today()).unwrap(), before);
    }

    #[test]
    fn test_bodyweight_log_leaves_starting_weight() {
        let mut tracker = linear();

        let outcome = tracker
            .save_workout(SaveWorkout::new(3, "1", vec![log("back-squat", &[(0.0, true)])]))
            .unwrap();

        assert!(outcome.adjustments.is_empty());
        let config = tracker.config_on(today()).unwrap();
        assert_eq!(config.starting_weight(MainLift::Squat), 62.5);
        assert_eq!(tracker.completed_workouts().unwrap().len(), 1);
    }

    #[test]
    fn test_five_over_rewrites_starting_weight() {
        let mut tracker = linear();
        let before = tracker.prescribe(1, "1").unwrap().unwrap();
        assert_eq!(weight_of(&before, "back-squat"), Some(62.5));

        let outcome = tracker
            .save_workout(SaveWorkout::new(1, "1", vec![log("back-squat", &[(67.5, true)])]))
            .unwrap();
        assert_eq!(outcome.adjustments.len(), 1);

        let config = tracker.config_on(today()).unwrap();
        assert_eq!(config.starting_weight(MainLift::Squat), 67.5);
        let after = tracker.prescribe(1, "1").unwrap().unwrap();
        assert_eq!(weight_of(&after, "back-squat"), Some(67.5));
        // Other lifts are untouched
        assert_eq!(weight_of(&after, "bench-press"), Some(45.0));
    }

    #[test]
    fn test_five_over_grows_additive_adjustment() {
        let mut tracker = tracker(ProgramKind::Linear, Some(CalculationPolicy::LinearDeload));
        // Week 2 bench: 45 + 2.5
        let before = tracker.prescribe(2, "1").unwrap().unwrap();
        assert_eq!(weight_of(&before, "bench-press"), Some(47.5));

        tracker
            .save_workout(SaveWorkout::new(2, "1", vec![log("bench-press", &[(52.5, true)])]))
            .unwrap();

        let config = tracker.config_on(today()).unwrap();
        assert_eq!(config.adjustment(MainLift::Bench), 5.0);
        let after = tracker.prescribe(2, "1").unwrap().unwrap();
        assert_eq!(weight_of(&after, "bench-press"), Some(52.5));
    }

    #[test]
    fn test_resaving_after_adjustment_is_stable() {
        let mut tracker = linear();
        let save = SaveWorkout::new(3, "2", vec![log("deadlift", &[(80.0, true)])]);

        let first = tracker.save_workout(save.clone()).unwrap();
        assert_eq!(first.adjustments.len(), 1);
        let config = tracker.config_on(today()).unwrap();

        let second = tracker.save_workout(save).unwrap();
        assert!(second.adjustments.is_empty());
        assert_eq!(tracker.config_on(today()).unwrap(), config);
    }

    #[test]
    fn test_deload_week_weights() {
        let mut tracker = tracker(ProgramKind::Periodized, Some(CalculationPolicy::LinearDeload));

        let week5 = tracker.week_overview(5).unwrap();
        let week6 = tracker.week_overview(6).unwrap();
        assert!(!week5.deload);
        assert!(week6.deload);
        // (62.5 + 5 * 2.5) * 0.9 = 67.5
        assert_eq!(week5.weights[&MainLift::Squat], 72.5);
        assert_eq!(week6.weights[&MainLift::Squat], 67.5);
    }

    #[test]
    fn test_periodized_prescription() {
        let mut tracker = tracker(ProgramKind::Periodized, None);
        tracker
            .update_config(|c| c.lift_mut(MainLift::Squat).training_max = 100.0)
            .unwrap();

        let week1 = tracker.prescribe(1, "A").unwrap().unwrap();
        assert_eq!(week1.phase_name, "Hypertrophy");
        assert_eq!(week1.template_id, "p1-a");
        let squat = &week1.exercises[0];
        assert_eq!((squat.sets, squat.reps.as_str()), (4, "8"));
        assert_eq!(squat.weight, Some(65.0));
        assert_eq!(weight_of(&week1, "pause-squat"), Some(60.0));

        let week6 = tracker.prescribe(6, "A").unwrap().unwrap();
        assert!(week6.deload);
        let pause = week6
            .exercises
            .iter()
            .find(|e| e.exercise_id == "pause-squat")
            .unwrap();
        assert!(!pause.active);
    }

    #[test]
    fn test_missing_template_is_none_missing_phase_is_error() {
        let mut tracker = tracker(ProgramKind::Periodized, None);
        assert!(tracker.prescribe(14, "D").unwrap().is_none());
        assert!(matches!(
            tracker.prescribe(17, "A"),
            Err(Error::PhaseNotFound { week: 17 })
        ));
        assert!(matches!(
            tracker.week_overview(0),
            Err(Error::PhaseNotFound { week: 0 })
        ));
    }

    #[test]
    fn test_suggested_weight_falls_back_to_last_used() {
        let mut tracker = linear();
        tracker
            .save_workout(SaveWorkout::new(1, "1", vec![log("plank-day1", &[(10.0, true)])]))
            .unwrap();

        let week2 = tracker.prescribe(2, "1").unwrap().unwrap();
        let plank = week2
            .exercises
            .iter()
            .find(|e| e.exercise_id == "plank-day1")
            .unwrap();
        assert_eq!(plank.weight, None);
        assert_eq!(plank.suggested_weight, Some(10.0));
        assert_eq!(plank.sets_reps, "3x60");
    }

    #[test]
    fn test_set_current_week() {
        let mut tracker = linear();
        let config = tracker.set_current_week(3, today()).unwrap();
        assert_eq!(
            config.program_start_date,
            NaiveDate::from_ymd_opt(2024, 3, 3)
        );
        assert_eq!(tracker.config_on(today()).unwrap().current_week, 3);

        // Four days later the week has flipped
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 24).unwrap();
        assert_eq!(tracker.config_on(sunday).unwrap().current_week, 4);

        assert!(matches!(
            tracker.set_current_week(0, today()),
            Err(Error::InvalidWeek { week: 0, max: 16 })
        ));
        assert!(matches!(
            tracker.set_current_week(17, today()),
            Err(Error::InvalidWeek { week: 17, max: 16 })
        ));
    }

    #[test]
    fn test_completion_week_mode() {
        let settings = ProgramSettings {
            week_mode: WeekMode::Completion,
            ..ProgramSettings::default()
        };
        let mut tracker = Tracker::new(MemoryStore::new(), settings);
        assert_eq!(tracker.config_on(today()).unwrap().current_week, 1);

        for day in ["1", "2", "3"] {
            tracker.save_workout(SaveWorkout::new(1, day, vec![])).unwrap();
        }
        tracker.save_workout(SaveWorkout::new(2, "1", vec![])).unwrap();

        assert_eq!(tracker.config_on(today()).unwrap().current_week, 2);
    }

    #[test]
    fn test_seed_and_update_template() {
        let mut tracker = linear();
        assert_eq!(tracker.seed().unwrap(), 3);
        assert_eq!(tracker.store().list_templates().unwrap().len(), 3);
        assert!(tracker.store().load_config().unwrap().is_some());

        let exercises = vec![TemplateExercise::new("front-squat", "Front Squat", "5x3")
            .lift(MainLift::Squat)];
        tracker.update_template("day-1", exercises).unwrap();

        let template = tracker.template(1, "1").unwrap().unwrap();
        assert_eq!(template.exercises.len(), 1);
        assert_eq!(template.exercises[0].id, "front-squat");

        assert!(matches!(
            tracker.update_template("day-9", vec![]),
            Err(Error::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_log_rejected() {
        let mut tracker = linear();
        let result = tracker.save_workout(SaveWorkout::new(
            1,
            "1",
            vec![log("back-squat", &[(f64::NAN, true)])],
        ));
        assert!(matches!(result, Err(Error::InvalidLog(_))));
        assert!(tracker.completed_workouts().unwrap().is_empty());
    }

    #[test]
    fn test_delete_and_history() {
        let mut tracker = linear();
        tracker
            .save_workout(SaveWorkout::new(1, "1", vec![log("back-squat", &[(62.5, true)])]))
            .unwrap();
        tracker
            .save_workout(SaveWorkout::new(2, "1", vec![log("back-squat", &[(65.0, true)])]))
            .unwrap();

        assert_eq!(tracker.personal_records().unwrap()["back-squat"], 65.0);
        assert_eq!(tracker.last_used_weights().unwrap()["back-squat"], 65.0);

        assert!(tracker.delete_workout(2, "1").unwrap());
        assert!(!tracker.delete_workout(2, "1").unwrap());
        assert!(tracker.completed_workout(2, "1").unwrap().is_none());
        assert_eq!(tracker.last_used_weights().unwrap()["back-squat"], 62.5);
    }

    #[test]
    fn test_progress_summary() {
        let mut tracker = tracker(ProgramKind::Periodized, None);
        for day in ["A", "B"] {
            tracker.save_workout(SaveWorkout::new(1, day, vec![])).unwrap();
        }

        let summary = tracker.progress_summary(today()).unwrap();
        assert_eq!(summary.total_workouts, 60);
        assert_eq!(summary.completed_workouts, 2);
        assert!((summary.percent_complete - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_week_overview_marks_completed_days() {
        let mut tracker = linear();
        tracker.save_workout(SaveWorkout::new(4, "2", vec![])).unwrap();

        let overview = tracker.week_overview(4).unwrap();
        assert_eq!(overview.days.len(), 3);
        assert!(!overview.days[0].completed);
        assert!(overview.days[1].completed);
        assert_eq!(overview.days[1].template_name.as_deref(), Some("DEADLIFT & OHP"));
    }

    #[test]
    fn test_json_store_backed_tracker() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::new(JsonStore::new(temp_dir.path()), ProgramSettings::default());

        tracker
            .save_workout(SaveWorkout::new(1, "2", vec![log("deadlift", &[(70.0, true)])]))
            .unwrap();

        let mut reopened = Tracker::new(JsonStore::new(temp_dir.path()), ProgramSettings::default());
        assert_eq!(reopened.completed_workouts().unwrap().len(), 1);
        assert_eq!(
            reopened.config_on(today()).unwrap().starting_weight(MainLift::Deadlift),
            70.0
        );
    }
}
