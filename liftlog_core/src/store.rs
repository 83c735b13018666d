//! Durable storage for the config row, completed workouts and templates.
//!
//! [`Store`] is the only contract the rest of the crate relies on. Two
//! implementations ship here:
//! - [`MemoryStore`] keeps typed values in maps
//! - [`JsonStore`] keeps one JSON file per table in a data directory, with
//!   exercise lists held as JSON text columns and decoded only at this
//!   boundary
//!
//! Upserts are keyed by explicit ids and are last-write-wins.

use crate::{
    CompletedWorkout, Error, ExerciseLog, ProgramConfig, Result, TemplateExercise, WorkoutKey,
    WorkoutTemplate,
};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistence collaborator consumed by the tracker
pub trait Store {
    fn load_config(&self) -> Result<Option<ProgramConfig>>;
    fn save_config(&mut self, config: &ProgramConfig) -> Result<()>;

    fn get_workout(&self, key: &WorkoutKey) -> Result<Option<CompletedWorkout>>;
    /// Insert, or replace the stored workout with the same id
    fn upsert_workout(&mut self, workout: &CompletedWorkout) -> Result<()>;
    /// Returns whether a workout was removed
    fn delete_workout(&mut self, key: &WorkoutKey) -> Result<bool>;
    fn list_workouts(&self) -> Result<Vec<CompletedWorkout>>;

    fn get_template(&self, id: &str) -> Result<Option<WorkoutTemplate>>;
    fn upsert_template(&mut self, template: &WorkoutTemplate) -> Result<()>;
    fn list_templates(&self) -> Result<Vec<WorkoutTemplate>>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Map-backed store, used in tests and when embedding the tracker
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    config: Option<ProgramConfig>,
    workouts: BTreeMap<String, CompletedWorkout>,
    templates: BTreeMap<String, WorkoutTemplate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load_config(&self) -> Result<Option<ProgramConfig>> {
        Ok(self.config.clone())
    }

    fn save_config(&mut self, config: &ProgramConfig) -> Result<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn get_workout(&self, key: &WorkoutKey) -> Result<Option<CompletedWorkout>> {
        Ok(self.workouts.get(&key.id()).cloned())
    }

    fn upsert_workout(&mut self, workout: &CompletedWorkout) -> Result<()> {
        self.workouts.insert(workout.id.clone(), workout.clone());
        Ok(())
    }

    fn delete_workout(&mut self, key: &WorkoutKey) -> Result<bool> {
        Ok(self.workouts.remove(&key.id()).is_some())
    }

    fn list_workouts(&self) -> Result<Vec<CompletedWorkout>> {
        Ok(self.workouts.values().cloned().collect())
    }

    fn get_template(&self, id: &str) -> Result<Option<WorkoutTemplate>> {
        Ok(self.templates.get(id).cloned())
    }

    fn upsert_template(&mut self, template: &WorkoutTemplate) -> Result<()> {
        self.templates.insert(template.id.clone(), template.clone());
        Ok(())
    }

    fn list_templates(&self) -> Result<Vec<WorkoutTemplate>> {
        Ok(self.templates.values().cloned().collect())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

const CONFIG_FILE: &str = "config.json";
const WORKOUTS_FILE: &str = "completed_workouts.json";
const TEMPLATES_FILE: &str = "workout_templates.json";

/// Stored row of the completed workouts table
#[derive(Debug, Serialize, Deserialize)]
struct WorkoutRow {
    id: String,
    week_number: u32,
    phase_number: u32,
    day_label: String,
    template_id: String,
    completed_at: String,
    exercise_logs_json: String,
    notes: Option<String>,
}

impl TryFrom<&CompletedWorkout> for WorkoutRow {
    type Error = Error;

    fn try_from(workout: &CompletedWorkout) -> Result<Self> {
        Ok(WorkoutRow {
            id: workout.id.clone(),
            week_number: workout.week_number,
            phase_number: workout.phase_number,
            day_label: workout.day_label.clone(),
            template_id: workout.template_id.clone(),
            completed_at: workout.completed_at.to_rfc3339(),
            exercise_logs_json: serde_json::to_string(&workout.exercise_logs)?,
            notes: workout.notes.clone(),
        })
    }
}

impl TryFrom<WorkoutRow> for CompletedWorkout {
    type Error = Error;

    fn try_from(row: WorkoutRow) -> Result<Self> {
        let completed_at = DateTime::parse_from_rfc3339(&row.completed_at)
            .map_err(|e| Error::Store(format!("Invalid date in {}: {}", row.id, e)))?
            .with_timezone(&Utc);
        let exercise_logs: Vec<ExerciseLog> = serde_json::from_str(&row.exercise_logs_json)?;

        Ok(CompletedWorkout {
            id: row.id,
            week_number: row.week_number,
            phase_number: row.phase_number,
            day_label: row.day_label,
            template_id: row.template_id,
            completed_at,
            exercise_logs,
            notes: row.notes,
        })
    }
}

/// Stored row of the workout templates table
#[derive(Debug, Serialize, Deserialize)]
struct TemplateRow {
    id: String,
    phase_number: u32,
    day_label: String,
    name: String,
    exercises_json: String,
}

impl TryFrom<&WorkoutTemplate> for TemplateRow {
    type Error = Error;

    fn try_from(template: &WorkoutTemplate) -> Result<Self> {
        Ok(TemplateRow {
            id: template.id.clone(),
            phase_number: template.phase_number,
            day_label: template.day_label.clone(),
            name: template.name.clone(),
            exercises_json: serde_json::to_string(&template.exercises)?,
        })
    }
}

impl TryFrom<TemplateRow> for WorkoutTemplate {
    type Error = Error;

    fn try_from(row: TemplateRow) -> Result<Self> {
        let exercises: Vec<TemplateExercise> = serde_json::from_str(&row.exercises_json)?;
        Ok(WorkoutTemplate {
            id: row.id,
            phase_number: row.phase_number,
            day_label: row.day_label,
            name: row.name,
            exercises,
        })
    }
}

/// Directory-backed store with file locking and atomic replacement
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Decode every row of a table, skipping rows that fail to decode
    fn read_table<R, T>(&self, file: &str) -> Result<Vec<T>>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = Error>,
    {
        let Some(contents) = read_locked(&self.path(file))? else {
            return Ok(Vec::new());
        };
        let rows: Vec<R> = serde_json::from_str(&contents)?;

        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            match T::try_from(row) {
                Ok(value) => values.push(value),
                Err(e) => tracing::warn!("Skipping unreadable row in {}: {}", file, e),
            }
        }
        Ok(values)
    }

    /// Run a read-modify-write of one table while holding its lock file.
    ///
    /// The data file itself is replaced by rename, so the exclusive lock
    /// lives on a stable `<table>.lock` sibling instead.
    fn with_table_lock<T>(&self, file: &str, update: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
        std::fs::create_dir_all(&self.dir)?;
        let lock = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(&format!("{}.lock", file)))?;
        lock.lock_exclusive()?;

        let result = update(&self.path(file));
        lock.unlock()?;
        result
    }

    /// Replace the row with the same id, or append it
    fn upsert_row<R>(&self, file: &str, id: &str, row: R, row_id: impl Fn(&R) -> &str) -> Result<()>
    where
        R: Serialize + DeserializeOwned,
    {
        self.with_table_lock(file, |path| {
            let mut rows: Vec<R> = match read_locked(path)? {
                Some(contents) => serde_json::from_str(&contents)?,
                None => Vec::new(),
            };

            match rows.iter().position(|r| row_id(r) == id) {
                Some(idx) => rows[idx] = row,
                None => rows.push(row),
            }

            write_atomic(path, &serde_json::to_string_pretty(&rows)?)
        })
    }
}

impl Store for JsonStore {
    fn load_config(&self) -> Result<Option<ProgramConfig>> {
        let path = self.path(CONFIG_FILE);
        let Some(contents) = read_locked(&path)? else {
            return Ok(None);
        };

        match serde_json::from_str::<ProgramConfig>(&contents) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(None)
            }
        }
    }

    fn save_config(&mut self, config: &ProgramConfig) -> Result<()> {
        let contents = serde_json::to_string_pretty(config)?;
        self.with_table_lock(CONFIG_FILE, |path| write_atomic(path, &contents))?;
        tracing::debug!("Saved program config to {:?}", self.dir);
        Ok(())
    }

    fn get_workout(&self, key: &WorkoutKey) -> Result<Option<CompletedWorkout>> {
        let id = key.id();
        Ok(self
            .list_workouts()?
            .into_iter()
            .find(|w| w.id == id))
    }

    fn upsert_workout(&mut self, workout: &CompletedWorkout) -> Result<()> {
        let row = WorkoutRow::try_from(workout)?;
        self.upsert_row(WORKOUTS_FILE, &workout.id, row, |r: &WorkoutRow| r.id.as_str())?;
        tracing::debug!("Upserted workout {}", workout.id);
        Ok(())
    }

    fn delete_workout(&mut self, key: &WorkoutKey) -> Result<bool> {
        let id = key.id();
        let deleted = self.with_table_lock(WORKOUTS_FILE, |path| {
            let Some(contents) = read_locked(path)? else {
                return Ok(false);
            };
            let mut rows: Vec<WorkoutRow> = serde_json::from_str(&contents)?;

            let before = rows.len();
            rows.retain(|r| r.id != id);
            if rows.len() == before {
                return Ok(false);
            }

            write_atomic(path, &serde_json::to_string_pretty(&rows)?)?;
            Ok(true)
        })?;

        if deleted {
            tracing::debug!("Deleted workout {}", id);
        }
        Ok(deleted)
    }

    fn list_workouts(&self) -> Result<Vec<CompletedWorkout>> {
        self.read_table::<WorkoutRow, CompletedWorkout>(WORKOUTS_FILE)
    }

    fn get_template(&self, id: &str) -> Result<Option<WorkoutTemplate>> {
        Ok(self
            .list_templates()?
            .into_iter()
            .find(|t| t.id == id))
    }

    fn upsert_template(&mut self, template: &WorkoutTemplate) -> Result<()> {
        let row = TemplateRow::try_from(template)?;
        self.upsert_row(TEMPLATES_FILE, &template.id, row, |r: &TemplateRow| r.id.as_str())
    }

    fn list_templates(&self) -> Result<Vec<WorkoutTemplate>> {
        self.read_table::<TemplateRow, WorkoutTemplate>(TEMPLATES_FILE)
    }
}

/// Read a whole file under a shared lock; `None` if it does not exist
fn read_locked(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(Some(contents))
}

/// Atomically replace a file by writing a synced sibling and renaming it.
/// Callers hold the table lock.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("{:?} has no parent directory", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
