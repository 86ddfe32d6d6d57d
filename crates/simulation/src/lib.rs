pub mod config;
pub mod economy;
pub mod engine;
pub mod error;
pub mod geo;
pub mod ids;
pub mod invariant_checks;
pub mod network;
pub mod passenger;
pub mod plugin;
pub mod railway_manager;
pub mod schedule;
pub mod session;
pub mod sim_params;
pub mod sim_rng;
pub mod train;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use engine::{
    Clock, EngineStatus, FrameHandle, FrameQueue, FrameScheduler, ManualClock, SimulationEngine,
    SystemClock, TickHooks,
};
pub use error::{NetworkError, ParamsError};
pub use geo::Point;
pub use ids::{LineId, PassengerId, StopId, TrainId};
pub use plugin::{NetworkChanged, RailwaySimPlugin, RailwaySimulation, SimulationRefreshed};
pub use railway_manager::{NetworkChange, NetworkSnapshot, RailwayManager, RidershipStats};
pub use session::SimulationSession;
pub use sim_params::{EconomyParams, SimParams};
