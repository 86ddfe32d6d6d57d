//! Real-time simulation clock and frame-driven tick loop.
//!
//! The engine measures wall time between frames through an injected
//! [`Clock`], scales it by the speed multiplier into simulated time, and runs
//! one tick per frame against a [`TickHooks`] implementation. Frames are
//! requested from an injected [`FrameScheduler`]; pausing cancels the pending
//! frame so no tick runs after a pause.
//!
//! ## Tick order
//! 1. advance every train by (wall delta, speed multiplier)
//! 2. apply operating costs, at most once per simulated second
//! 3. spawn passengers
//! 4. board and alight passengers
//! 5. refresh the UI
//!
//! Trains move before boarding is evaluated in the same tick.

mod clock;
mod scheduler;


use bevy::log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};

use crate::config::COST_APPLICATION_INTERVAL_SECS;

/// Per-tick collaborators the engine drives, in the order listed.
pub trait TickHooks {
    /// Called first in every tick with the already-advanced simulated time.
    fn begin_tick(&mut self, _simulation_time_secs: f64) {}

    fn advance_trains(&mut self, delta_secs: f64, speed_multiplier: f64);

    /// `elapsed_sim_secs` is the simulated time since costs were last applied.
    fn update_economics(&mut self, elapsed_sim_secs: f64);

    fn update_passenger_generation(&mut self, delta_secs: f64);

    fn update_passenger_boarding(&mut self);

    fn update_simulation_ui(&mut self, status: &EngineStatus);
}

/// Read-only view of the engine handed to the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub is_running: bool,
    pub speed_multiplier: f64,
    pub simulation_time_secs: f64,
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self {
            is_running: false,
            speed_multiplier: 1.0,
            simulation_time_secs: 0.0,
        }
    }
}

impl EngineStatus {
    /// Simulated time of day as `HH:MM`. Hours keep counting past 24.
    pub fn clock_label(&self) -> String {
        let total = self.simulation_time_secs.max(0.0) as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        format!("{hours:02}:{minutes:02}")
    }
}

pub struct SimulationEngine<C, S> {
    clock: C,
    scheduler: S,
    is_running: bool,
    speed_multiplier: f64,
    simulation_time_secs: f64,
    last_update_secs: f64,
    last_cost_application_secs: f64,
    pending_frame: Option<FrameHandle>,
}

impl<C: Clock, S: FrameScheduler> SimulationEngine<C, S> {
    pub fn new(clock: C, scheduler: S) -> Self {
        Self {
            clock,
            scheduler,
            is_running: false,
            speed_multiplier: 1.0,
            simulation_time_secs: 0.0,
            last_update_secs: 0.0,
            last_cost_application_secs: 0.0,
            pending_frame: None,
        }
    }

    /// Begin running and tick once immediately. No-op while already running.
    pub fn start(&mut self, hooks: &mut impl TickHooks) {
        if self.is_running {
            return;
        }
        self.is_running = true;
        self.last_update_secs = self.clock.now_secs();
        self.last_cost_application_secs = self.simulation_time_secs;
        info!(
            "Simulation started at t={:.1}s (x{})",
            self.simulation_time_secs, self.speed_multiplier
        );
        self.tick(hooks);
    }

    /// Stop running and cancel the pending frame, if any.
    pub fn pause(&mut self) {
        if self.is_running {
            info!("Simulation paused at t={:.1}s", self.simulation_time_secs);
        }
        self.is_running = false;
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Host callback for a fired frame. Frames other than the one currently
    /// pending (cancelled or superseded) are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, hooks: &mut impl TickHooks) -> bool {
        if self.pending_frame != Some(handle) {
            debug!("Ignoring stale frame {:?}", handle);
            return false;
        }
        self.pending_frame = None;
        self.tick(hooks);
        true
    }

    /// One synchronous update step. No-op while not running.
    pub fn tick(&mut self, hooks: &mut impl TickHooks) {
        if !self.is_running {
            return;
        }

        let now = self.clock.now_secs();
        // A clock that steps backwards yields an empty frame.
        let delta_secs = (now - self.last_update_secs).max(0.0);
        self.last_update_secs = now;

        self.simulation_time_secs += delta_secs * self.speed_multiplier;

        hooks.begin_tick(self.simulation_time_secs);
        hooks.advance_trains(delta_secs, self.speed_multiplier);

        let since_costs = self.simulation_time_secs - self.last_cost_application_secs;
        if since_costs >= COST_APPLICATION_INTERVAL_SECS {
            hooks.update_economics(since_costs);
            self.last_cost_application_secs = self.simulation_time_secs;
        }

        hooks.update_passenger_generation(delta_secs);
        hooks.update_passenger_boarding();
        hooks.update_simulation_ui(&self.status());

        // A direct tick while a frame is pending supersedes that frame.
        if let Some(stale) = self.pending_frame.take() {
            self.scheduler.cancel_frame(stale);
        }
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Set the speed multiplier. Non-finite or non-positive values are
    /// ignored and reported with `false`.
    pub fn set_speed(&mut self, multiplier: f64) -> bool {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            warn!("Ignoring invalid speed multiplier {}", multiplier);
            return false;
        }
        debug!("Speed multiplier {} -> {}", self.speed_multiplier, multiplier);
        self.speed_multiplier = multiplier;
        true
    }

    /// Pause, rewind simulated time to zero, and refresh the UI.
    pub fn reset(&mut self, hooks: &mut impl TickHooks) {
        self.pause();
        self.simulation_time_secs = 0.0;
        self.last_cost_application_secs = 0.0;
        info!("Simulation reset");
        hooks.update_simulation_ui(&self.status());
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            is_running: self.is_running,
            speed_multiplier: self.speed_multiplier,
            simulation_time_secs: self.simulation_time_secs,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn simulation_time_secs(&self) -> f64 {
        self.simulation_time_secs
    }

    pub fn last_update_secs(&self) -> f64 {
        self.last_update_secs
    }

    pub fn last_cost_application_secs(&self) -> f64 {
        self.last_cost_application_secs
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
