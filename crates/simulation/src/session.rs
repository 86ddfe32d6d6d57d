//! One simulation: an engine driving one railway manager.
//!
//! The session owns both halves, so there is no shared global state and a
//! host can run several independent simulations side by side.

use bevy::log::info;

use crate::engine::{Clock, EngineStatus, FrameQueue, FrameScheduler, SimulationEngine};
use crate::error::NetworkError;
use crate::ids::{LineId, StopId, TrainId};
use crate::railway_manager::RailwayManager;
use crate::sim_params::SimParams;

pub struct SimulationSession<C, S> {
    engine: SimulationEngine<C, S>,
    manager: RailwayManager,
}

impl<C: Clock, S: FrameScheduler> SimulationSession<C, S> {
    pub fn new(clock: C, scheduler: S, params: SimParams) -> Self {
        Self {
            engine: SimulationEngine::new(clock, scheduler),
            manager: RailwayManager::new(params),
        }
    }

    /// Start every scheduled train, then the engine.
    pub fn start(&mut self) {
        self.manager.start_scheduled_trains();
        self.engine.start(&mut self.manager);
    }

    /// Pause the engine and stop every scheduled train.
    pub fn pause(&mut self) {
        self.engine.pause();
        self.manager.stop_scheduled_trains();
    }

    /// Flip between running and paused. Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        if self.engine.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.engine.is_running()
    }

    pub fn set_speed(&mut self, multiplier: f64) -> bool {
        self.engine.set_speed(multiplier)
    }

    pub fn reset(&mut self) {
        self.manager.stop_scheduled_trains();
        self.engine.reset(&mut self.manager);
    }

    /// Schedule a train; while the simulation runs it departs immediately.
    pub fn schedule_train(
        &mut self,
        train: TrainId,
        line: LineId,
        stops: Vec<StopId>,
    ) -> Result<(), NetworkError> {
        self.manager.schedule_train(train, line, stops)?;
        if self.engine.is_running() {
            self.manager.start_train(train)?;
        }
        Ok(())
    }

    /// Pause, empty the network and rewind the clock.
    pub fn clear_all(&mut self) {
        info!("Clearing simulation");
        self.engine.pause();
        self.manager.clear_all();
        self.engine.reset(&mut self.manager);
    }

    /// Synchronous tick, outside the frame loop.
    pub fn tick(&mut self) {
        self.engine.tick(&mut self.manager);
    }

    pub fn status(&self) -> EngineStatus {
        self.engine.status()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn engine(&self) -> &SimulationEngine<C, S> {
        &self.engine
    }

    pub fn manager(&self) -> &RailwayManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut RailwayManager {
        &mut self.manager
    }
}

impl<C: Clock> SimulationSession<C, FrameQueue> {
    /// Fire the oldest due frame, if any. Returns whether a tick ran.
    pub fn run_pending_frame(&mut self) -> bool {
        let Some(handle) = self.engine.scheduler_mut().take_due() else {
            return false;
        };
        self.engine.on_frame(handle, &mut self.manager)
    }
}
