//! The singleton program configuration row.
//!
//! Every stored form goes through [`RawProgramConfig`], so missing or
//! nonsensical fields are resolved to defaults in exactly one place and the
//! rest of the crate always sees a fully populated [`ProgramConfig`].

use crate::MainLift;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_WEEKLY_INCREMENT: f64 = 2.5;
pub const DEFAULT_GOODMORNINGS_INCREMENT: f64 = 1.25;
pub const DEFAULT_DELOAD_PERCENTAGE: f64 = 0.9;

/// Per-lift weights and corrections
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LiftSettings {
    pub starting_weight: f64,
    pub training_max: f64,
    /// Additive correction accumulated by the reconciler
    pub adjustment: f64,
    /// Lift-specific weekly increment; `None` uses the program-wide one
    pub increment: Option<f64>,
}

impl LiftSettings {
    fn defaults_for(lift: MainLift) -> Self {
        let starting_weight = default_starting_weight(lift);
        Self {
            starting_weight,
            training_max: starting_weight,
            adjustment: 0.0,
            increment: default_lift_increment(lift),
        }
    }
}

/// Program state shared by every prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawProgramConfig")]
pub struct ProgramConfig {
    pub program_start_date: Option<NaiveDate>,
    pub current_week: u32,
    pub weekly_increment: f64,
    pub deload_percentage: f64,
    pub lifts: BTreeMap<MainLift, LiftSettings>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        RawProgramConfig::default().into()
    }
}

impl ProgramConfig {
    pub fn lift(&self, lift: MainLift) -> LiftSettings {
        self.lifts
            .get(&lift)
            .cloned()
            .unwrap_or_else(|| LiftSettings::defaults_for(lift))
    }

    /// Mutable access; inserts defaults for a lift that is somehow missing
    pub fn lift_mut(&mut self, lift: MainLift) -> &mut LiftSettings {
        self.lifts
            .entry(lift)
            .or_insert_with(|| LiftSettings::defaults_for(lift))
    }

    pub fn starting_weight(&self, lift: MainLift) -> f64 {
        self.lift(lift).starting_weight
    }

    pub fn training_max(&self, lift: MainLift) -> f64 {
        self.lift(lift).training_max
    }

    pub fn adjustment(&self, lift: MainLift) -> f64 {
        self.lift(lift).adjustment
    }

    /// Weekly increment for a lift, falling back to the program-wide increment
    pub fn increment(&self, lift: MainLift) -> f64 {
        self.lift(lift).increment.unwrap_or(self.weekly_increment)
    }
}

/// Stored shape of the config row; every field may be absent
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProgramConfig {
    pub program_start_date: Option<NaiveDate>,
    pub current_week: Option<u32>,
    pub weekly_increment: Option<f64>,
    pub deload_percentage: Option<f64>,
    pub lifts: BTreeMap<MainLift, RawLiftSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLiftSettings {
    pub starting_weight: Option<f64>,
    pub training_max: Option<f64>,
    pub adjustment: Option<f64>,
    pub increment: Option<f64>,
}

impl From<RawProgramConfig> for ProgramConfig {
    fn from(raw: RawProgramConfig) -> Self {
        let weekly_increment = raw
            .weekly_increment
            .filter(|inc| *inc > 0.0)
            .unwrap_or(DEFAULT_WEEKLY_INCREMENT);

        let deload_percentage = raw
            .deload_percentage
            .filter(|pct| *pct > 0.0)
            .unwrap_or(DEFAULT_DELOAD_PERCENTAGE);

        let mut stored = raw.lifts;
        let lifts = MainLift::ALL
            .iter()
            .map(|&lift| {
                let defaults = LiftSettings::defaults_for(lift);
                let settings = match stored.remove(&lift) {
                    Some(raw_lift) => {
                        let starting_weight =
                            raw_lift.starting_weight.unwrap_or(defaults.starting_weight);
                        LiftSettings {
                            starting_weight,
                            training_max: raw_lift.training_max.unwrap_or(starting_weight),
                            adjustment: raw_lift.adjustment.unwrap_or(0.0),
                            increment: raw_lift
                                .increment
                                .filter(|inc| *inc > 0.0)
                                .or(defaults.increment),
                        }
                    }
                    None => defaults,
                };
                (lift, settings)
            })
            .collect();

        ProgramConfig {
            program_start_date: raw.program_start_date,
            current_week: raw.current_week.unwrap_or(1).max(1),
            weekly_increment,
            deload_percentage,
            lifts,
        }
    }
}

fn default_starting_weight(lift: MainLift) -> f64 {
    match lift {
        MainLift::Squat => 62.5,
        MainLift::Bench => 45.0,
        MainLift::Deadlift => 65.0,
        MainLift::Ohp => 32.5,
        MainLift::Row => 45.0,
        MainLift::Lunges => 40.0,
        MainLift::Goodmornings => 30.0,
        MainLift::Rdl => 60.0,
    }
}

fn default_lift_increment(lift: MainLift) -> Option<f64> {
    match lift {
        MainLift::Goodmornings => Some(DEFAULT_GOODMORNINGS_INCREMENT),
        _ => None,
    }
}
