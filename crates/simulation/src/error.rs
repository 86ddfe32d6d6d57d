//! Error types for the editing and configuration surfaces.
//!
//! The per-tick simulation never fails; these only cover operations driven
//! by the host (network edits, parameter loading).

use thiserror::Error;

use crate::ids::{LineId, StopId, TrainId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("unknown line {0}")]
    UnknownLine(LineId),
    #[error("unknown stop {0}")]
    UnknownStop(StopId),
    #[error("unknown train {0}")]
    UnknownTrain(TrainId),
    #[error("a line needs at least 2 coordinates, got {got}")]
    TooFewCoordinates { got: usize },
}

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("failed to parse simulation parameters: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid parameter `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
