//! Create, edit and delete lines, stops and trains.

use bevy::log::{info, warn};

use crate::economy::EconomicSystem;
use crate::error::NetworkError;
use crate::geo::Point;
use crate::ids::{LineId, StopId, TrainId};
use crate::network::{Line, Stop};
use crate::schedule::Schedule;
use crate::train::{Train, TrainStatus};

use super::{NetworkChange, RailwayManager, RidershipStats};

impl RailwayManager {
    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    /// Add a line through `coordinates`. The colour comes from the palette
    /// in rotation; the name defaults to `Line N`.
    pub fn add_line(
        &mut self,
        coordinates: Vec<Point>,
        name: Option<String>,
    ) -> Result<LineId, NetworkError> {
        require_polyline(&coordinates)?;

        let id = LineId(self.line_ids.next());
        let name = name.unwrap_or_else(|| format!("Line {}", self.lines.len() + 1));
        let color = self.next_color();
        info!("Added {} '{}' ({} points, {})", id, name, coordinates.len(), color);

        self.lines.push(Line {
            id,
            name,
            color,
            coordinates,
        });
        self.record(NetworkChange::LineAdded(id));
        Ok(id)
    }

    pub fn rename_line(&mut self, id: LineId, name: String) -> Result<(), NetworkError> {
        let line = self.line_mut(id)?;
        line.name = name;
        self.record(NetworkChange::LineEdited(id));
        Ok(())
    }

    /// Replace a line's geometry. Trains on the line keep their progress and
    /// get their position recomputed.
    pub fn edit_line_coordinates(
        &mut self,
        id: LineId,
        coordinates: Vec<Point>,
    ) -> Result<(), NetworkError> {
        require_polyline(&coordinates)?;
        let Self { lines, trains, .. } = self;
        let line = lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(NetworkError::UnknownLine(id))?;
        line.coordinates = coordinates;

        for train in trains.iter_mut().filter(|t| t.line == Some(id)) {
            train.refresh_position(line);
        }
        self.record(NetworkChange::LineEdited(id));
        Ok(())
    }

    /// Remove a line. Its trains become unscheduled.
    pub fn remove_line(&mut self, id: LineId) -> Result<(), NetworkError> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(NetworkError::UnknownLine(id))?;
        let line = self.lines.remove(idx);

        let mut unscheduled = 0;
        for train in self.trains.iter_mut().filter(|t| t.line == Some(id)) {
            train.unschedule();
            unscheduled += 1;
        }
        info!("Removed {} '{}', {} trains unscheduled", id, line.name, unscheduled);
        self.record(NetworkChange::LineRemoved(id));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Stops
    // -------------------------------------------------------------------------

    /// Add a stop at `coordinates`. The name defaults to `Stop N`.
    pub fn add_stop(&mut self, coordinates: Point, name: Option<String>) -> StopId {
        let id = StopId(self.stop_ids.next());
        let name = name.unwrap_or_else(|| format!("Stop {}", self.stops.len() + 1));
        info!("Added {} '{}' at ({:.5}, {:.5})", id, name, coordinates.lat, coordinates.lng);
        self.stops.push(Stop::new(id, name, coordinates));
        self.record(NetworkChange::StopAdded(id));
        id
    }

    pub fn rename_stop(&mut self, id: StopId, name: String) -> Result<(), NetworkError> {
        let stop = self.stop_mut(id)?;
        stop.name = name;
        self.record(NetworkChange::StopEdited(id));
        Ok(())
    }

    pub fn move_stop(&mut self, id: StopId, coordinates: Point) -> Result<(), NetworkError> {
        let stop = self.stop_mut(id)?;
        stop.coordinates = coordinates;
        self.record(NetworkChange::StopEdited(id));
        Ok(())
    }

    /// Remove a stop. Passengers waiting there, and riders bound for it, are
    /// stranded; the stop drops out of every schedule.
    pub fn remove_stop(&mut self, id: StopId) -> Result<(), NetworkError> {
        let idx = self
            .stops
            .iter()
            .position(|s| s.id == id)
            .ok_or(NetworkError::UnknownStop(id))?;
        let stop = self.stops.remove(idx);

        let mut stranded = stop.waiting_passengers.len();
        for train in &mut self.trains {
            stranded += train.discard_passengers_for(id);
            if let Some(schedule) = train.schedule.as_mut() {
                schedule.forget_stop(id);
            }
        }
        // Waiting passengers elsewhere can no longer reach it either.
        for other in &mut self.stops {
            let before = other.waiting_passengers.len();
            other.waiting_passengers.retain(|p| p.destination != id);
            stranded += before - other.waiting_passengers.len();
        }

        if stranded > 0 {
            warn!("Removing {} '{}' stranded {} passengers", id, stop.name, stranded);
        } else {
            info!("Removed {} '{}'", id, stop.name);
        }
        self.stats.passengers_stranded += stranded as u64;
        self.record(NetworkChange::StopRemoved(id));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Trains
    // -------------------------------------------------------------------------

    /// Add an unscheduled train with the configured speed and capacity. The
    /// name defaults to `Train N`.
    pub fn add_train(&mut self, name: Option<String>) -> TrainId {
        let id = TrainId(self.train_ids.next());
        let name = name.unwrap_or_else(|| format!("Train {}", self.trains.len() + 1));
        let mut train = Train::new(id, name, self.params.train_speed, self.params.train_capacity);
        train.status = TrainStatus::Unscheduled;
        info!("Added {} '{}'", id, train.name);

        self.trains.push(train);
        self.record(NetworkChange::TrainAdded(id));
        id
    }

    /// Put a train on `line` serving `stops`. Unknown stop ids are dropped.
    /// The train ends up stopped at its current progress.
    pub fn schedule_train(
        &mut self,
        train_id: TrainId,
        line_id: LineId,
        stops: Vec<StopId>,
    ) -> Result<(), NetworkError> {
        let Self {
            lines,
            stops: registry,
            trains,
            ..
        } = self;
        let line = lines
            .iter()
            .find(|l| l.id == line_id)
            .ok_or(NetworkError::UnknownLine(line_id))?;
        let train = trains
            .iter_mut()
            .find(|t| t.id == train_id)
            .ok_or(NetworkError::UnknownTrain(train_id))?;

        let requested = stops.len();
        let known: Vec<StopId> = stops
            .into_iter()
            .filter(|id| registry.iter().any(|s| s.id == *id))
            .collect();
        if known.len() < requested {
            warn!(
                "Scheduling {}: dropped {} unknown stops",
                train_id,
                requested - known.len()
            );
        }

        info!("Scheduled {} on {} with {} stops", train_id, line_id, known.len());
        train.assign_schedule(Schedule::new(line_id, known), line);
        self.record(NetworkChange::TrainScheduled(train_id));
        Ok(())
    }

    /// Start a single train. Trains without a line stay where they are.
    pub fn start_train(&mut self, id: TrainId) -> Result<bool, NetworkError> {
        let train = self.train_mut(id)?;
        if train.line.is_none() {
            return Ok(false);
        }
        train.start();
        Ok(true)
    }

    /// Remove a train. Its riders are stranded.
    pub fn remove_train(&mut self, id: TrainId) -> Result<(), NetworkError> {
        let idx = self
            .trains
            .iter()
            .position(|t| t.id == id)
            .ok_or(NetworkError::UnknownTrain(id))?;
        let train = self.trains.remove(idx);

        let stranded = train.occupancy();
        if stranded > 0 {
            warn!("Removing {} '{}' stranded {} passengers", id, train.name, stranded);
        } else {
            info!("Removed {} '{}'", id, train.name);
        }
        self.stats.passengers_stranded += stranded as u64;
        self.record(NetworkChange::TrainRemoved(id));
        Ok(())
    }

    /// Empty the network and reset the ledger, ridership counters and colour
    /// rotation. Ids keep counting up.
    pub fn clear_all(&mut self) {
        info!(
            "Clearing network: {} lines, {} stops, {} trains",
            self.lines.len(),
            self.stops.len(),
            self.trains.len()
        );
        self.lines.clear();
        self.stops.clear();
        self.trains.clear();
        self.economy = EconomicSystem::new(&self.params.economy);
        self.stats = RidershipStats::default();
        self.color_index = 0;
        self.record(NetworkChange::Cleared);
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn next_color(&mut self) -> String {
        let palette = &self.params.line_colors;
        if palette.is_empty() {
            return String::from("#888888");
        }
        let color = palette[self.color_index % palette.len()].clone();
        self.color_index += 1;
        color
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut Line, NetworkError> {
        self.lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(NetworkError::UnknownLine(id))
    }

    fn stop_mut(&mut self, id: StopId) -> Result<&mut Stop, NetworkError> {
        self.stops
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(NetworkError::UnknownStop(id))
    }

    fn train_mut(&mut self, id: TrainId) -> Result<&mut Train, NetworkError> {
        self.trains
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(NetworkError::UnknownTrain(id))
    }
}

fn require_polyline(coordinates: &[Point]) -> Result<(), NetworkError> {
    if coordinates.len() < 2 {
        return Err(NetworkError::TooFewCoordinates {
            got: coordinates.len(),
        });
    }
    Ok(())
}
