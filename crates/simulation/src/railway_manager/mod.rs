//! Railway manager: owns the network and implements the per-tick hooks.
//!
//! ## Data model
//! - `Line`: a drawn polyline trains run along
//! - `Stop`: a point where passengers spawn and wait
//! - `Train`: shuttles along its line, carrying passengers between stops
//! - `EconomicSystem`: fares in, operating costs out
//!
//! Entities reference each other by id only; the manager's registries are
//! the single owner of every line, stop and train. Passengers are owned by
//! whichever stop queue or train currently holds them.
//!
//! ## Per-tick hooks
//! - movement: every train advances along its resolved line
//! - economics: running trains and lines are charged per simulated second
//! - generation: each stop spawns a passenger every spawn interval
//! - boarding: running scheduled trains near a stop alight, then board
//! - UI: the engine status is recorded and a refresh is counted
//!
//! Editing operations (add/remove/rename lines, stops, trains) live in
//! `editing.rs` and queue a [`NetworkChange`] for the host to drain.

mod editing;
mod passengers;
mod snapshot;

#[cfg(test)]
mod tests;

use bevy::log::debug;
use serde::{Deserialize, Serialize};

pub use snapshot::{LineSummary, NetworkSnapshot, StopSummary, TrainSummary};

use crate::economy::EconomicSystem;
use crate::engine::{EngineStatus, TickHooks};
use crate::ids::{IdCounter, LineId, StopId, TrainId};
use crate::network::{Line, Stop};
use crate::sim_params::SimParams;
use crate::sim_rng::SimRng;
use crate::train::{Train, TrainStatus};

/// Notification for the editing/rendering layer that part of the network
/// was created, edited or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkChange {
    LineAdded(LineId),
    LineEdited(LineId),
    LineRemoved(LineId),
    StopAdded(StopId),
    StopEdited(StopId),
    StopRemoved(StopId),
    TrainAdded(TrainId),
    TrainScheduled(TrainId),
    TrainRemoved(TrainId),
    Cleared,
}

/// Cumulative passenger counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RidershipStats {
    pub passengers_spawned: u64,
    pub passengers_boarded: u64,
    pub passengers_delivered: u64,
    /// Passengers dropped because their stop or train was removed.
    pub passengers_stranded: u64,
    pub fare_revenue: f64,
}

pub struct RailwayManager {
    params: SimParams,
    lines: Vec<Line>,
    stops: Vec<Stop>,
    trains: Vec<Train>,
    economy: EconomicSystem,
    rng: SimRng,
    stats: RidershipStats,
    line_ids: IdCounter,
    stop_ids: IdCounter,
    train_ids: IdCounter,
    passenger_ids: IdCounter,
    color_index: usize,
    simulation_time_secs: f64,
    last_status: EngineStatus,
    refresh_count: u64,
    changes: Vec<NetworkChange>,
}

impl Default for RailwayManager {
    fn default() -> Self {
        Self::new(SimParams::default())
    }
}

impl RailwayManager {
    pub fn new(params: SimParams) -> Self {
        Self {
            economy: EconomicSystem::new(&params.economy),
            rng: SimRng::from_seed_u64(params.rng_seed),
            params,
            lines: Vec::new(),
            stops: Vec::new(),
            trains: Vec::new(),
            stats: RidershipStats::default(),
            line_ids: IdCounter::default(),
            stop_ids: IdCounter::default(),
            train_ids: IdCounter::default(),
            passenger_ids: IdCounter::default(),
            color_index: 0,
            simulation_time_secs: 0.0,
            last_status: EngineStatus::default(),
            refresh_count: 0,
            changes: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    pub fn economy(&self) -> &EconomicSystem {
        &self.economy
    }

    pub fn stats(&self) -> &RidershipStats {
        &self.stats
    }

    /// Engine status as of the most recent UI refresh.
    pub fn last_status(&self) -> EngineStatus {
        self.last_status
    }

    /// Number of UI refreshes requested by the engine so far.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn running_train_count(&self) -> usize {
        self.trains.iter().filter(|t| t.is_running()).count()
    }

    /// Passengers currently waiting at stops or riding trains.
    pub fn passengers_in_system(&self) -> usize {
        let waiting: usize = self.stops.iter().map(Stop::waiting_count).sum();
        let riding: usize = self.trains.iter().map(Train::occupancy).sum();
        waiting + riding
    }

    pub fn pending_changes(&self) -> &[NetworkChange] {
        &self.changes
    }

    /// Take every change notification recorded since the last drain.
    pub fn drain_changes(&mut self) -> Vec<NetworkChange> {
        std::mem::take(&mut self.changes)
    }

    // -------------------------------------------------------------------------
    // Train control
    // -------------------------------------------------------------------------

    /// Start every train that has a line. Unscheduled trains stay put.
    pub fn start_scheduled_trains(&mut self) {
        for train in &mut self.trains {
            if train.line.is_some() && train.status != TrainStatus::Unscheduled {
                train.start();
            }
        }
    }

    /// Stop every train that is not unscheduled.
    pub fn stop_scheduled_trains(&mut self) {
        for train in &mut self.trains {
            if train.status != TrainStatus::Unscheduled {
                train.stop();
            }
        }
    }

    fn record(&mut self, change: NetworkChange) {
        self.changes.push(change);
    }
}

impl TickHooks for RailwayManager {
    fn begin_tick(&mut self, simulation_time_secs: f64) {
        self.simulation_time_secs = simulation_time_secs;
    }

    fn advance_trains(&mut self, delta_secs: f64, speed_multiplier: f64) {
        let Self { trains, lines, .. } = self;
        for train in trains.iter_mut() {
            let line = train
                .line
                .and_then(|id| lines.iter().find(|l| l.id == id));
            train.advance(delta_secs, speed_multiplier, line);
        }
    }

    fn update_economics(&mut self, elapsed_sim_secs: f64) {
        let running = self.running_train_count();
        let cost = self
            .economy
            .operating_cost(running, self.lines.len(), elapsed_sim_secs);
        self.economy.spend_money(cost);
        debug!(
            "Charged {:.3} for {} running trains and {} lines over {:.2}s",
            cost,
            running,
            self.lines.len(),
            elapsed_sim_secs
        );
    }

    fn update_passenger_generation(&mut self, delta_secs: f64) {
        self.generate_passengers(delta_secs);
    }

    fn update_passenger_boarding(&mut self) {
        self.exchange_passengers();
    }

    fn update_simulation_ui(&mut self, status: &EngineStatus) {
        self.last_status = *status;
        self.refresh_count += 1;
    }
}
