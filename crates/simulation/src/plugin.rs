//! Bevy adapter: runs a [`SimulationSession`] inside an `App`.
//!
//! The session's wall clock is a [`ManualClock`] synced from `Time` at the
//! start of every `Update`, and its frames come from a [`FrameQueue`] that is
//! drained one frame per app update.

use bevy::prelude::*;

use crate::engine::{EngineStatus, FrameQueue, ManualClock};
use crate::invariant_checks::{validate_railway, InvariantViolations};
use crate::railway_manager::NetworkChange;
use crate::session::SimulationSession;
use crate::sim_params::SimParams;

/// Ordered phases of the railway systems within `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RailwaySet {
    /// Clock sync and frame dispatch.
    Tick,
    /// Forwarding notifications to the rest of the app.
    Notify,
    /// Read-only validation.
    Validate,
}

#[derive(Resource)]
pub struct RailwaySimulation {
    clock: ManualClock,
    session: SimulationSession<ManualClock, FrameQueue>,
}

impl RailwaySimulation {
    pub fn new(params: SimParams) -> Self {
        let clock = ManualClock::default();
        Self {
            session: SimulationSession::new(clock.clone(), FrameQueue::default(), params),
            clock,
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn session(&self) -> &SimulationSession<ManualClock, FrameQueue> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SimulationSession<ManualClock, FrameQueue> {
        &mut self.session
    }
}

/// Sent after every tick the engine ran this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SimulationRefreshed {
    pub status: EngineStatus,
}

/// One network edit, forwarded from the manager's change queue.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkChanged(pub NetworkChange);

pub fn sync_simulation_clock(time: Res<Time>, sim: Res<RailwaySimulation>) {
    sim.clock.set_secs(time.elapsed_secs_f64());
}

pub fn run_simulation_frame(
    mut sim: ResMut<RailwaySimulation>,
    mut refreshed: EventWriter<SimulationRefreshed>,
) {
    if sim.session.run_pending_frame() {
        refreshed.send(SimulationRefreshed {
            status: sim.session.status(),
        });
    }
}

pub fn forward_network_changes(
    mut sim: ResMut<RailwaySimulation>,
    mut changed: EventWriter<NetworkChanged>,
) {
    for change in sim.session.manager_mut().drain_changes() {
        changed.send(NetworkChanged(change));
    }
}

pub struct RailwaySimPlugin;

impl Plugin for RailwaySimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimParams>();
        if !app.world().contains_resource::<RailwaySimulation>() {
            let mut params = app.world().resource::<SimParams>().clone();
            if let Err(err) = params.validate() {
                warn!("Railway parameters failed validation ({}), using defaults", err);
                params = SimParams::default();
                app.insert_resource(params.clone());
            }
            app.insert_resource(RailwaySimulation::new(params));
        }

        app.init_resource::<InvariantViolations>()
            .add_event::<SimulationRefreshed>()
            .add_event::<NetworkChanged>()
            .configure_sets(
                Update,
                (RailwaySet::Tick, RailwaySet::Notify, RailwaySet::Validate).chain(),
            )
            .add_systems(
                Update,
                (
                    (sync_simulation_clock, run_simulation_frame)
                        .chain()
                        .in_set(RailwaySet::Tick),
                    forward_network_changes.in_set(RailwaySet::Notify),
                    validate_railway.in_set(RailwaySet::Validate),
                ),
            );
    }
}
