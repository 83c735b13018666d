#![forbid(unsafe_code)]

//! Core domain model and business logic for the liftlog strength tracker.
//!
//! This crate provides:
//! - Domain types (lifts, phases, templates, logged workouts)
//! - Built-in programs and the progression calculator
//! - Prescribed-vs-lifted reconciliation
//! - Persistence behind the [`Store`] trait
//! - The [`Tracker`] service and CSV export

pub mod types;
pub mod error;
pub mod program;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod progression;
pub mod reconcile;
pub mod history;
pub mod week;
pub mod store;
pub mod tracker;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use program::{LiftSettings, ProgramConfig};
pub use catalog::ProgramKind;
pub use config::{Config, ProgramSettings};
pub use progression::{round_to_increment, Calculator, ProgressionRow};
pub use reconcile::{AdjustmentChange, LiftAdjustment};
pub use week::WeekMode;
pub use store::{JsonStore, MemoryStore, Store};
pub use tracker::{PrescribedExercise, PrescribedWorkout, SaveOutcome, SaveWorkout, Tracker, WeekOverview};
