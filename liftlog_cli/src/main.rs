use liftlog_core::export::{export_progression, export_sets};
use liftlog_core::week::next_week_boundary;
use liftlog_core::*;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Strength program tracker with auto-adjusting weights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Overview of a week (default: current week)
    Week {
        week: Option<u32>,
    },

    /// Show the prescribed workout for a day
    Show {
        /// Day label, e.g. "1" or "A"
        day: String,

        /// Week number (default: current week)
        #[arg(long)]
        week: Option<u32>,
    },

    /// Log a completed workout
    Log {
        /// Day label, e.g. "1" or "A"
        day: String,

        /// Completed sets as EXERCISE:REPS@WEIGHT
        sets: Vec<String>,

        /// Sets that were attempted but not completed, same format
        #[arg(long = "missed")]
        missed: Vec<String>,

        /// Week number (default: current week)
        #[arg(long)]
        week: Option<u32>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a logged workout
    Reset {
        day: String,

        #[arg(long)]
        week: Option<u32>,
    },

    /// Personal records per exercise
    Records,

    /// Make the given week the current one
    SetWeek {
        week: u32,
    },

    /// Change a lift's stored settings
    SetLift {
        /// squat, bench, deadlift, ohp, row, lunges, goodmornings or rdl
        lift: String,

        #[arg(long)]
        starting: Option<f64>,

        #[arg(long)]
        training_max: Option<f64>,

        #[arg(long)]
        adjustment: Option<f64>,

        #[arg(long)]
        increment: Option<f64>,
    },

    /// Store the default config and program templates
    Seed,

    /// Export logged sets and projected weights to CSV
    Export {
        /// Logged sets CSV (default: <data-dir>/exports/sets.csv)
        #[arg(long)]
        sets: Option<PathBuf>,

        /// Weekly progression CSV (default: <data-dir>/exports/progression.csv)
        #[arg(long)]
        progression: Option<PathBuf>,

        /// Weeks to project (default: the week cap)
        #[arg(long)]
        weeks: Option<u32>,
    },

    /// Current week and overall progress (default)
    Status,
}

fn main() -> Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Using data directory {:?}", data_dir);

    let catalog = config.program.kind.catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let mut tracker = Tracker::new(JsonStore::new(data_dir.clone()), config.program.clone());
    let json = cli.json;

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Week { week } => cmd_week(&mut tracker, week, json),
        Commands::Show { day, week } => cmd_show(&mut tracker, week, &day, json),
        Commands::Log {
            day,
            sets,
            missed,
            week,
            notes,
        } => cmd_log(&mut tracker, week, &day, &sets, &missed, notes, json),
        Commands::Reset { day, week } => cmd_reset(&mut tracker, week, &day),
        Commands::Records => cmd_records(&tracker, json),
        Commands::SetWeek { week } => cmd_set_week(&mut tracker, week),
        Commands::SetLift {
            lift,
            starting,
            training_max,
            adjustment,
            increment,
        } => cmd_set_lift(&mut tracker, &lift, starting, training_max, adjustment, increment),
        Commands::Seed => cmd_seed(&mut tracker),
        Commands::Export {
            sets,
            progression,
            weeks,
        } => cmd_export(&mut tracker, &data_dir, sets, progression, weeks),
        Commands::Status => cmd_status(&mut tracker, json),
    }
}

fn current_week(tracker: &mut Tracker<JsonStore>, week: Option<u32>) -> Result<u32> {
    match week {
        Some(week) => Ok(week),
        None => Ok(tracker.config()?.current_week),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_week(tracker: &mut Tracker<JsonStore>, week: Option<u32>, json: bool) -> Result<()> {
    let week = current_week(tracker, week)?;
    let overview = tracker.week_overview(week)?;
    if json {
        return print_json(&overview);
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WEEK {} - {}", overview.week, overview.phase_name);
    println!("╰─────────────────────────────────────────╯");
    if overview.deload {
        println!("  Deload week");
    }
    if overview.test_week {
        println!("  Test week");
    }
    println!();

    for day in &overview.days {
        let mark = if day.completed { "✓" } else { " " };
        println!(
            "  [{}] Day {}: {}",
            mark,
            day.day_label,
            day.template_name.as_deref().unwrap_or("(no template)")
        );
    }

    println!();
    println!("  Working weights:");
    for (lift, weight) in &overview.weights {
        println!("    {:<13} {:>6.1}", lift, weight);
    }
    println!();
    Ok(())
}

fn cmd_show(tracker: &mut Tracker<JsonStore>, week: Option<u32>, day: &str, json: bool) -> Result<()> {
    let week = current_week(tracker, week)?;
    let Some(workout) = tracker.prescribe(week, day)? else {
        println!("No workout scheduled for week {} day {}.", week, day);
        return Ok(());
    };
    if json {
        return print_json(&workout);
    }

    display_workout(&workout);
    Ok(())
}

fn display_workout(workout: &PrescribedWorkout) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WEEK {} DAY {}: {}", workout.week, workout.day_label, workout.name);
    println!("╰─────────────────────────────────────────╯");
    println!("  Phase {}: {}", workout.phase_number, workout.phase_name);
    if workout.deload {
        println!("  Deload week");
    }
    if workout.completed {
        println!("  ✓ Logged");
    }
    println!();

    for exercise in workout.exercises.iter().filter(|e| e.active) {
        let load = match (exercise.weight, exercise.suggested_weight) {
            (Some(weight), _) => format!("{:.1} kg", weight),
            (None, Some(last)) => format!("last {:.1} kg", last),
            (None, None) if exercise.is_rpe => "RPE".to_string(),
            (None, None) => "-".to_string(),
        };
        println!(
            "  {:<26} {:>3} x {:<6} {}",
            exercise.name, exercise.sets, exercise.reps, load
        );
        println!("    id: {}", exercise.exercise_id);
    }
    println!();
}

/// Parse `EXERCISE:REPS@WEIGHT`; the weight may be omitted for bodyweight work
fn parse_set(text: &str, completed: bool) -> Result<(String, CompletedSet)> {
    let (exercise_id, rest) = text
        .split_once(':')
        .ok_or_else(|| Error::InvalidLog(format!("expected EXERCISE:REPS@WEIGHT, got '{}'", text)))?;
    let (reps, weight) = match rest.rsplit_once('@') {
        Some((reps, weight)) => (reps, weight),
        None => (rest, "0"),
    };

    let reps = reps
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidLog(format!("invalid reps in '{}'", text)))?;
    let weight = weight
        .trim()
        .trim_end_matches("kg")
        .parse::<f64>()
        .map_err(|_| Error::InvalidLog(format!("invalid weight in '{}'", text)))?;

    if exercise_id.trim().is_empty() {
        return Err(Error::InvalidLog(format!("missing exercise in '{}'", text)));
    }

    Ok((
        exercise_id.trim().to_string(),
        CompletedSet {
            reps,
            weight,
            completed,
        },
    ))
}

/// Group parsed sets into one log per exercise, in the order first seen
fn build_logs(
    sets: &[String],
    missed: &[String],
    names: &[(String, String)],
) -> Result<Vec<ExerciseLog>> {
    let mut logs: Vec<ExerciseLog> = Vec::new();

    let parsed = sets
        .iter()
        .map(|s| parse_set(s, true))
        .chain(missed.iter().map(|s| parse_set(s, false)));
    for entry in parsed {
        let (exercise_id, set) = entry?;
        match logs.iter_mut().find(|l| l.exercise_id == exercise_id) {
            Some(log) => log.sets.push(set),
            None => {
                let exercise_name = names
                    .iter()
                    .find(|(id, _)| *id == exercise_id)
                    .map(|(_, name)| name.clone())
                    .unwrap_or_else(|| exercise_id.clone());
                logs.push(ExerciseLog {
                    exercise_id,
                    exercise_name,
                    sets: vec![set],
                });
            }
        }
    }

    Ok(logs)
}

fn cmd_log(
    tracker: &mut Tracker<JsonStore>,
    week: Option<u32>,
    day: &str,
    sets: &[String],
    missed: &[String],
    notes: Option<String>,
    json: bool,
) -> Result<()> {
    let week = current_week(tracker, week)?;
    let names: Vec<(String, String)> = tracker
        .prescribe(week, day)?
        .map(|w| {
            w.exercises
                .into_iter()
                .map(|e| (e.exercise_id, e.name))
                .collect()
        })
        .unwrap_or_default();

    let logs = build_logs(sets, missed, &names)?;
    let mut save = SaveWorkout::new(week, day, logs);
    save.notes = notes;

    let outcome = tracker.save_workout(save)?;
    if json {
        return print_json(&outcome);
    }

    println!("\n✓ Logged week {} day {}", week, day);
    for adjustment in &outcome.adjustments {
        let change = match adjustment.change {
            AdjustmentChange::Additive { adjustment } => {
                format!("adjustment now {:+.1} kg", adjustment)
            }
            AdjustmentChange::StartingWeight { starting_weight } => {
                format!("starting weight now {:.1} kg", starting_weight)
            }
        };
        println!(
            "  {}: lifted {:.1} vs prescribed {:.1}, {}",
            adjustment.lift, adjustment.lifted, adjustment.prescribed, change
        );
    }
    Ok(())
}

fn cmd_reset(tracker: &mut Tracker<JsonStore>, week: Option<u32>, day: &str) -> Result<()> {
    let week = current_week(tracker, week)?;
    if tracker.delete_workout(week, day)? {
        println!("✓ Deleted week {} day {}", week, day);
    } else {
        println!("Nothing logged for week {} day {}.", week, day);
    }
    Ok(())
}

fn cmd_records(tracker: &Tracker<JsonStore>, json: bool) -> Result<()> {
    let records = tracker.personal_records()?;
    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No completed sets logged yet.");
        return Ok(());
    }
    println!("\nPersonal records:");
    for (exercise, weight) in &records {
        println!("  {:<28} {:>6.1} kg", exercise, weight);
    }
    Ok(())
}

fn cmd_set_week(tracker: &mut Tracker<JsonStore>, week: u32) -> Result<()> {
    let config = tracker.set_current_week(week, Local::now().date_naive())?;
    println!("✓ Current week set to {}", config.current_week);
    if let Some(start) = config.program_start_date {
        println!("  Program start: {}", start);
    }
    Ok(())
}

fn cmd_set_lift(
    tracker: &mut Tracker<JsonStore>,
    lift: &str,
    starting: Option<f64>,
    training_max: Option<f64>,
    adjustment: Option<f64>,
    increment: Option<f64>,
) -> Result<()> {
    let lift: MainLift = lift.parse()?;
    if let Some(value) = [starting, training_max, increment]
        .into_iter()
        .flatten()
        .find(|v| !v.is_finite() || *v <= 0.0)
    {
        return Err(Error::Other(format!("{} must be a positive weight", value)));
    }

    let config = tracker.update_config(|config| {
        let settings = config.lift_mut(lift);
        if let Some(value) = starting {
            settings.starting_weight = value;
        }
        if let Some(value) = training_max {
            settings.training_max = value;
        }
        if let Some(value) = adjustment {
            settings.adjustment = value;
        }
        if let Some(value) = increment {
            settings.increment = Some(value);
        }
    })?;

    let settings = config.lift(lift);
    println!("✓ Updated {}", lift);
    println!("  Starting weight: {:.1} kg", settings.starting_weight);
    println!("  Training max:    {:.1} kg", settings.training_max);
    println!("  Adjustment:      {:+.1} kg", settings.adjustment);
    println!("  Increment:       {:.2} kg/week", config.increment(lift));
    Ok(())
}

fn cmd_seed(tracker: &mut Tracker<JsonStore>) -> Result<()> {
    let count = tracker.seed()?;
    println!("✓ Stored {} templates for {}", count, tracker.catalog().name);
    Ok(())
}

fn cmd_export(
    tracker: &mut Tracker<JsonStore>,
    data_dir: &std::path::Path,
    sets: Option<PathBuf>,
    progression: Option<PathBuf>,
    weeks: Option<u32>,
) -> Result<()> {
    let exports = data_dir.join("exports");
    let sets_path = sets.unwrap_or_else(|| exports.join("sets.csv"));
    let progression_path = progression.unwrap_or_else(|| exports.join("progression.csv"));
    let weeks = weeks.unwrap_or_else(|| tracker.week_cap());

    let workouts = tracker.completed_workouts()?;
    let set_count = export_sets(&workouts, &sets_path)?;
    let rows = tracker.progression_table(weeks)?;
    let week_count = export_progression(&rows, &progression_path)?;

    println!("✓ Exported {} sets", set_count);
    println!("  CSV: {}", sets_path.display());
    println!("✓ Exported {} weeks of progression", week_count);
    println!("  CSV: {}", progression_path.display());
    Ok(())
}

fn cmd_status(tracker: &mut Tracker<JsonStore>, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let summary = tracker.progress_summary(today)?;
    if json {
        return print_json(&summary);
    }

    println!("\n{}", tracker.catalog().name);
    println!(
        "  Week {} of {} ({:?} policy)",
        summary.current_week,
        tracker.week_cap(),
        tracker.settings().policy()
    );
    println!(
        "  Completed {}/{} workouts ({:.0}%)",
        summary.completed_workouts, summary.total_workouts, summary.percent_complete
    );
    if tracker.settings().week_mode == WeekMode::Date {
        let next = next_week_boundary(today, tracker.settings().week_starts_on);
        println!("  Next week starts {}", next);
    }
    println!();
    Ok(())
}
