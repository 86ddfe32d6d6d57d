//! Lines and stops: the static geometry of the railway network.

use serde::{Deserialize, Serialize};

use crate::geo::{path_length_meters, Point};
use crate::passenger::Passenger;

pub use crate::ids::{LineId, StopId};

/// A drawn rail line. Coordinates always hold at least two points once the
/// line is registered with the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    /// CSS-style hex colour, e.g. `#FF0000`.
    pub color: String,
    pub coordinates: Vec<Point>,
}

impl Line {
    pub fn length_meters(&self) -> f64 {
        path_length_meters(&self.coordinates)
    }
}

/// A stop where passengers spawn and wait for trains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub coordinates: Point,
    /// Boarding order is queue order.
    pub waiting_passengers: Vec<Passenger>,
    /// Seconds accumulated since the last passenger spawned here.
    pub spawn_elapsed_secs: f64,
}

impl Stop {
    pub fn new(id: StopId, name: String, coordinates: Point) -> Self {
        Self {
            id,
            name,
            coordinates,
            waiting_passengers: Vec::new(),
            spawn_elapsed_secs: 0.0,
        }
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting_passengers.len()
    }
}
