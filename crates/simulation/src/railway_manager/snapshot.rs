use serde::{Deserialize, Serialize};

use crate::engine::EngineStatus;
use crate::geo::Point;
use crate::ids::{LineId, StopId, TrainId};
use crate::train::{Direction, TrainStatus};

use super::{RailwayManager, RidershipStats};

/// Serialisable picture of the network for the redraw layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub status: EngineStatus,
    pub clock_label: String,
    pub balance: f64,
    pub total_revenue: f64,
    pub total_costs: f64,
    pub stats: RidershipStats,
    pub lines: Vec<LineSummary>,
    pub stops: Vec<StopSummary>,
    pub trains: Vec<TrainSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSummary {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub coordinates: Vec<Point>,
    pub length_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSummary {
    pub id: StopId,
    pub name: String,
    pub coordinates: Point,
    pub waiting: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSummary {
    pub id: TrainId,
    pub name: String,
    pub line: Option<LineId>,
    pub status: TrainStatus,
    pub direction: Direction,
    pub progress: f64,
    pub position: Option<Point>,
    pub occupancy: usize,
    pub capacity: usize,
    pub occupancy_percent: f64,
}

impl RailwayManager {
    pub fn snapshot(&self) -> NetworkSnapshot {
        let economy = self.economy();
        NetworkSnapshot {
            status: self.last_status,
            clock_label: self.last_status.clock_label(),
            balance: economy.balance(),
            total_revenue: economy.total_revenue,
            total_costs: economy.total_costs,
            stats: self.stats.clone(),
            lines: self
                .lines
                .iter()
                .map(|l| LineSummary {
                    id: l.id,
                    name: l.name.clone(),
                    color: l.color.clone(),
                    coordinates: l.coordinates.clone(),
                    length_m: l.length_meters(),
                })
                .collect(),
            stops: self
                .stops
                .iter()
                .map(|s| StopSummary {
                    id: s.id,
                    name: s.name.clone(),
                    coordinates: s.coordinates,
                    waiting: s.waiting_count(),
                })
                .collect(),
            trains: self
                .trains
                .iter()
                .map(|t| TrainSummary {
                    id: t.id,
                    name: t.name.clone(),
                    line: t.line,
                    status: t.status,
                    direction: t.direction,
                    progress: t.progress,
                    position: t.current_position,
                    occupancy: t.occupancy(),
                    capacity: t.capacity,
                    occupancy_percent: t.occupancy_percent(),
                })
                .collect(),
        }
    }
}
