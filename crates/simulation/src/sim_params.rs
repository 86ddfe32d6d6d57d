//! Data-driven simulation parameters.
//!
//! Collects the economic rates, passenger behaviour and train defaults into a
//! single [`SimParams`] resource so hosts can tune them without
//! recompilation. Parameters can be loaded from JSON; any field left out
//! keeps its default.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::error::ParamsError;

/// Fare and operating-cost rates for the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyParams {
    pub starting_balance: f64,
    pub base_fare: f64,
    /// Added to the base fare per kilometre of straight-line trip distance.
    pub fare_per_km: f64,
    /// Charged per running train per simulated second.
    pub train_operating_cost_per_sec: f64,
    /// Charged per line per simulated second.
    pub line_maintenance_cost_per_sec: f64,
}

impl Default for EconomyParams {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
            base_fare: DEFAULT_BASE_FARE,
            fare_per_km: DEFAULT_FARE_PER_KM,
            train_operating_cost_per_sec: DEFAULT_TRAIN_OPERATING_COST_PER_SEC,
            line_maintenance_cost_per_sec: DEFAULT_LINE_MAINTENANCE_COST_PER_SEC,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    pub economy: EconomyParams,
    pub passenger_spawn_interval_secs: f64,
    pub boarding_radius_m: f64,
    pub train_speed: f64,
    pub train_capacity: usize,
    pub rng_seed: u64,
    pub line_colors: Vec<String>,
    /// When set, trains only serve stops listed in their schedule. Otherwise
    /// any stop the train passes is served.
    pub scheduled_stops_only: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            economy: EconomyParams::default(),
            passenger_spawn_interval_secs: DEFAULT_PASSENGER_SPAWN_INTERVAL_SECS,
            boarding_radius_m: DEFAULT_BOARDING_RADIUS_M,
            train_speed: DEFAULT_TRAIN_SPEED,
            train_capacity: DEFAULT_TRAIN_CAPACITY,
            rng_seed: DEFAULT_RNG_SEED,
            line_colors: DEFAULT_LINE_COLORS.iter().map(|c| c.to_string()).collect(),
            scheduled_stops_only: false,
        }
    }
}

impl SimParams {
    /// Parse and validate parameters from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let params: SimParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        positive("passenger_spawn_interval_secs", self.passenger_spawn_interval_secs)?;
        positive("boarding_radius_m", self.boarding_radius_m)?;
        positive("train_speed", self.train_speed)?;
        if self.train_capacity == 0 {
            return Err(ParamsError::Invalid {
                field: "train_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.line_colors.is_empty() {
            return Err(ParamsError::Invalid {
                field: "line_colors",
                reason: "palette must not be empty".to_string(),
            });
        }

        let economy = &self.economy;
        finite("economy.starting_balance", economy.starting_balance)?;
        non_negative("economy.base_fare", economy.base_fare)?;
        non_negative("economy.fare_per_km", economy.fare_per_km)?;
        non_negative(
            "economy.train_operating_cost_per_sec",
            economy.train_operating_cost_per_sec,
        )?;
        non_negative(
            "economy.line_maintenance_cost_per_sec",
            economy.line_maintenance_cost_per_sec,
        )?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamsError::Invalid {
            field,
            reason: format!("{value} is not finite"),
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ParamsError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParamsError::Invalid {
            field,
            reason: format!("{value} must be greater than 0"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ParamsError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ParamsError::Invalid {
            field,
            reason: format!("{value} must not be negative"),
        })
    }
}
