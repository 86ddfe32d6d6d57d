//! Passenger trip requests and their lifecycle.
//!
//! A passenger is created waiting at its origin stop, travels aboard exactly
//! one train, and is delivered at its destination. Ownership follows the
//! passenger: the stop's queue owns it while waiting, the train while
//! travelling. A delivered passenger never re-enters the waiting state.

use bevy::log::warn;
use serde::{Deserialize, Serialize};

use crate::ids::{PassengerId, StopId, TrainId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassengerStatus {
    Waiting,
    Traveling,
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: PassengerId,
    pub origin: StopId,
    pub destination: StopId,
    pub status: PassengerStatus,
    pub boarded_train: Option<TrainId>,
    /// Simulated time the passenger was created at their origin.
    pub spawned_at_secs: f64,
    /// Simulated time of boarding, once aboard.
    pub boarded_at_secs: Option<f64>,
}

impl Passenger {
    pub fn new(id: PassengerId, origin: StopId, destination: StopId, spawned_at_secs: f64) -> Self {
        Self {
            id,
            origin,
            destination,
            status: PassengerStatus::Waiting,
            boarded_train: None,
            spawned_at_secs,
            boarded_at_secs: None,
        }
    }

    /// Waiting -> traveling aboard `train`.
    ///
    /// Refuses (returns `false`) for a passenger that is not waiting, so a
    /// passenger already in transit can never be boarded a second time.
    pub fn board(&mut self, train: TrainId, at_secs: f64) -> bool {
        if self.status != PassengerStatus::Waiting {
            warn!(
                "{} refused boarding {}: status is {:?}",
                self.id, train, self.status
            );
            return false;
        }
        self.status = PassengerStatus::Traveling;
        self.boarded_train = Some(train);
        self.boarded_at_secs = Some(at_secs);
        true
    }

    /// Traveling -> delivered. Clears the boarded train.
    pub fn alight(&mut self) {
        self.status = PassengerStatus::Delivered;
        self.boarded_train = None;
    }

    /// Simulated seconds spent waiting before boarding, if boarded.
    pub fn wait_secs(&self) -> Option<f64> {
        self.boarded_at_secs
            .map(|boarded| (boarded - self.spawned_at_secs).max(0.0))
    }
}
