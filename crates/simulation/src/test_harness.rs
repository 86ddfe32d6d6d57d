//! # TestRailway: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `RailwaySimPlugin`
//! for running the simulation without a window or renderer. Time is driven
//! by `TimeUpdateStrategy::ManualDuration`, so every `tick()` advances the
//! app clock by exactly one step.

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::engine::EngineStatus;
use crate::geo::Point;
use crate::ids::{LineId, StopId, TrainId};
use crate::invariant_checks::InvariantViolations;
use crate::plugin::{NetworkChanged, RailwaySimPlugin, RailwaySimulation, SimulationRefreshed};
use crate::railway_manager::{NetworkChange, RailwayManager};
use crate::sim_params::SimParams;
use crate::train::Train;

/// Wall time per app update. Kept under `Time<Virtual>`'s 250ms clamp.
pub const STEP: Duration = Duration::from_millis(100);

/// A headless Bevy App wrapping `RailwaySimPlugin`.
///
/// Use builder methods to lay out the network, call `start()`, then
/// `tick()` to advance and query the resulting state.
pub struct TestRailway {
    app: App,
    // Collected after every update; Bevy drops unread events after two.
    refreshes: Vec<SimulationRefreshed>,
    changes: Vec<NetworkChange>,
}

impl Default for TestRailway {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRailway {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// An empty network with default parameters.
    pub fn new() -> Self {
        Self::with_params(SimParams::default())
    }

    pub fn with_params(params: SimParams) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(STEP));
        // Insert BEFORE the plugin so it builds the session from these.
        app.insert_resource(params);
        app.add_plugins(RailwaySimPlugin);

        // The first update only primes the clock (zero delta).
        app.update();
        Self {
            app,
            refreshes: Vec::new(),
            changes: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Network setup (builder pattern: consumes and returns Self)
    // -----------------------------------------------------------------------

    pub fn with_line(mut self, coordinates: &[Point]) -> Self {
        if let Err(err) = self.manager_mut().add_line(coordinates.to_vec(), None) {
            panic!("with_line: {err}");
        }
        self
    }

    pub fn with_stop(mut self, at: Point) -> Self {
        self.manager_mut().add_stop(at, None);
        self
    }

    /// Add a train on the `line_index`-th line serving every stop.
    pub fn with_train_on_line(mut self, line_index: usize) -> Self {
        let line = self.line_id(line_index);
        let stops: Vec<StopId> = self.manager().stops().iter().map(|s| s.id).collect();
        let train = self.manager_mut().add_train(None);
        if let Err(err) = self.session_schedule(train, line, stops) {
            panic!("with_train_on_line: {err}");
        }
        self
    }

    // -----------------------------------------------------------------------
    // Control
    // -----------------------------------------------------------------------

    pub fn start(&mut self) {
        self.sim_mut().session_mut().start();
    }

    pub fn pause(&mut self) {
        self.sim_mut().session_mut().pause();
    }

    pub fn set_speed(&mut self, multiplier: f64) -> bool {
        self.sim_mut().session_mut().set_speed(multiplier)
    }

    /// Run `n` app updates, one `STEP` of wall time each.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
            self.collect_events();
        }
    }

    /// Tick until `secs` of wall time have passed.
    pub fn run_for_secs(&mut self, secs: f64) {
        let steps = (secs / STEP.as_secs_f64()).round() as u32;
        self.tick(steps);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn manager(&self) -> &RailwayManager {
        self.app.world().resource::<RailwaySimulation>().session().manager()
    }

    pub fn manager_mut(&mut self) -> &mut RailwayManager {
        self.sim_mut().session_mut().manager_mut()
    }

    pub fn status(&self) -> EngineStatus {
        self.app.world().resource::<RailwaySimulation>().session().status()
    }

    pub fn train(&self, index: usize) -> &Train {
        &self.manager().trains()[index]
    }

    pub fn line_id(&self, index: usize) -> LineId {
        self.manager().lines()[index].id
    }

    pub fn violations(&self) -> &InvariantViolations {
        self.app.world().resource::<InvariantViolations>()
    }

    /// Refresh events sent since the last call.
    pub fn drain_refreshes(&mut self) -> Vec<SimulationRefreshed> {
        std::mem::take(&mut self.refreshes)
    }

    /// Network change events sent since the last call.
    pub fn drain_network_changes(&mut self) -> Vec<NetworkChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    fn collect_events(&mut self) {
        let world = self.app.world_mut();
        self.refreshes.extend(
            world
                .resource_mut::<Events<SimulationRefreshed>>()
                .drain(),
        );
        self.changes.extend(
            world
                .resource_mut::<Events<NetworkChanged>>()
                .drain()
                .map(|e| e.0),
        );
    }

    fn sim_mut(&mut self) -> &mut RailwaySimulation {
        self.app
            .world_mut()
            .resource_mut::<RailwaySimulation>()
            .into_inner()
    }

    fn session_schedule(
        &mut self,
        train: TrainId,
        line: LineId,
        stops: Vec<StopId>,
    ) -> Result<(), crate::error::NetworkError> {
        self.sim_mut().session_mut().schedule_train(train, line, stops)
    }
}
