//! Opaque identifiers for network entities.
//!
//! Trains, schedules and passengers refer to lines and stops by id; the
//! orchestrator resolves ids through its registries.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Line`](crate::network::Line).
    LineId,
    "line"
);
entity_id!(
    /// Identifies a [`Stop`](crate::network::Stop).
    StopId,
    "stop"
);
entity_id!(
    /// Identifies a [`Train`](crate::train::Train).
    TrainId,
    "train"
);
entity_id!(
    /// Identifies a [`Passenger`](crate::passenger::Passenger).
    PassengerId,
    "passenger"
);

/// Monotonic id allocator. Ids are never reused.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdCounter(u32);

impl IdCounter {
    pub(crate) fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}
