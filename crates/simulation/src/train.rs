//! Trains: a positional state machine shuttling back and forth along a line.
//!
//! Progress is a normalized arc-length in `[0, 1]` along the assigned line's
//! coordinates. A running train moves by `speed * dt * multiplier` per update
//! and reverses at either end, so it ping-pongs forever.
//!
//! ## Status transitions
//! - `start()`: stopped / unscheduled -> running
//! - `stop()`: running / unscheduled -> stopped
//! - `assign_schedule()`: any -> stopped, with line and schedule set
//! - `unschedule()`: any -> unscheduled, with line and schedule cleared

use serde::{Deserialize, Serialize};

use crate::geo::{position_along, Point};
use crate::ids::{LineId, StopId};
use crate::network::Line;
use crate::passenger::Passenger;
use crate::schedule::Schedule;

pub use crate::ids::TrainId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainStatus {
    Stopped,
    Running,
    /// Not yet assigned to a line.
    Unscheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    pub line: Option<LineId>,
    pub schedule: Option<Schedule>,
    /// Normalized position along the line, always within `[0, 1]`.
    pub progress: f64,
    /// Progress units per simulated second.
    pub speed: f64,
    pub direction: Direction,
    pub status: TrainStatus,
    pub current_position: Option<Point>,
    pub capacity: usize,
    pub passengers: Vec<Passenger>,
    pub total_delivered: u64,
}

impl Train {
    /// A fresh, stopped train with no line.
    pub fn new(id: TrainId, name: String, speed: f64, capacity: usize) -> Self {
        Self {
            id,
            name,
            line: None,
            schedule: None,
            progress: 0.0,
            speed,
            direction: Direction::Forward,
            status: TrainStatus::Stopped,
            current_position: None,
            capacity,
            passengers: Vec::new(),
            total_delivered: 0,
        }
    }

    pub fn start(&mut self) {
        self.status = TrainStatus::Running;
    }

    pub fn stop(&mut self) {
        self.status = TrainStatus::Stopped;
    }

    pub fn is_running(&self) -> bool {
        self.status == TrainStatus::Running
    }

    /// Put the train on `line` with `schedule`, stopped, positioned at its
    /// current progress.
    pub fn assign_schedule(&mut self, schedule: Schedule, line: &Line) {
        self.line = Some(line.id);
        self.schedule = Some(schedule);
        self.status = TrainStatus::Stopped;
        self.refresh_position(line);
    }

    /// Take the train off its line. Passengers stay aboard.
    pub fn unschedule(&mut self) {
        self.line = None;
        self.schedule = None;
        self.status = TrainStatus::Unscheduled;
        self.current_position = None;
    }

    /// Move along `line` by `delta_secs` of wall time scaled by
    /// `speed_multiplier`.
    ///
    /// No-op unless the train is running and `line` is its assigned line.
    pub fn advance(&mut self, delta_secs: f64, speed_multiplier: f64, line: Option<&Line>) {
        if self.status != TrainStatus::Running {
            return;
        }
        let Some(line) = line.filter(|l| Some(l.id) == self.line) else {
            return;
        };

        self.progress += self.speed * delta_secs * speed_multiplier * self.direction.sign();

        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.direction = Direction::Backward;
        } else if self.progress <= 0.0 {
            self.progress = 0.0;
            self.direction = Direction::Forward;
        }

        self.refresh_position(line);
    }

    /// Recompute `current_position` from progress. Lines with fewer than two
    /// coordinates leave the position untouched.
    pub fn refresh_position(&mut self, line: &Line) {
        if let Some(position) = position_along(&line.coordinates, self.progress) {
            self.current_position = Some(position);
        }
    }

    /// Board a prefix of `waiting` up to the remaining capacity, moving those
    /// passengers out of the queue. Returns the newly boarded passengers in
    /// queue order.
    pub fn board_passengers(&mut self, waiting: &mut Vec<Passenger>, at_secs: f64) -> &[Passenger] {
        let first_new = self.passengers.len();
        let room = self.capacity.saturating_sub(self.passengers.len());
        let take = room.min(waiting.len());

        let mut refused = Vec::new();
        for mut passenger in waiting.drain(..take) {
            if passenger.board(self.id, at_secs) {
                self.passengers.push(passenger);
            } else {
                refused.push(passenger);
            }
        }
        // Refused passengers keep their place at the head of the queue.
        if !refused.is_empty() {
            refused.append(waiting);
            *waiting = refused;
        }

        &self.passengers[first_new..]
    }

    /// Remove and deliver every passenger destined for `stop`.
    pub fn alight_passengers(&mut self, stop: StopId) -> Vec<Passenger> {
        let (mut alighting, staying): (Vec<_>, Vec<_>) = std::mem::take(&mut self.passengers)
            .into_iter()
            .partition(|p| p.destination == stop);
        self.passengers = staying;

        for passenger in &mut alighting {
            passenger.alight();
        }
        self.total_delivered += alighting.len() as u64;
        alighting
    }

    /// Drop every passenger bound for `stop` without delivering them.
    /// Returns how many were removed.
    pub(crate) fn discard_passengers_for(&mut self, stop: StopId) -> usize {
        let before = self.passengers.len();
        self.passengers.retain(|p| p.destination != stop);
        before - self.passengers.len()
    }

    pub fn occupancy(&self) -> usize {
        self.passengers.len()
    }

    pub fn occupancy_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.passengers.len() as f64 / self.capacity as f64 * 100.0
    }
}
