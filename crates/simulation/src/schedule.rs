use serde::{Deserialize, Serialize};

use crate::ids::{LineId, StopId};

/// Associates a train with the line it runs on and the stops it serves.
///
/// Stop ids are expected to exist in the orchestrator's registry; the
/// schedule itself does not check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub line: LineId,
    pub stops: Vec<StopId>,
    /// Simulated time of first departure, if fixed.
    pub departure_time_secs: Option<f64>,
    /// Minutes between departures, if running to a headway.
    pub frequency_minutes: Option<f64>,
}

impl Schedule {
    pub fn new(line: LineId, stops: Vec<StopId>) -> Self {
        Self {
            line,
            stops,
            departure_time_secs: None,
            frequency_minutes: None,
        }
    }

    pub fn has_stop(&self, stop: StopId) -> bool {
        self.stops.contains(&stop)
    }

    pub(crate) fn forget_stop(&mut self, stop: StopId) {
        self.stops.retain(|&s| s != stop);
    }
}
