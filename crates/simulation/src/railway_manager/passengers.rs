//! Passenger generation and the boarding / alighting exchange.

use bevy::log::{debug, warn};

use crate::geo::distance_meters;
use crate::ids::{PassengerId, StopId};
use crate::network::Stop;
use crate::passenger::Passenger;

use super::RailwayManager;

impl RailwayManager {
    /// Accumulate `delta_secs` at every stop and spawn one passenger at each
    /// stop whose accumulator reached the spawn interval.
    ///
    /// Needs at least two stops; with fewer, nothing accumulates.
    pub(super) fn generate_passengers(&mut self, delta_secs: f64) {
        if self.stops.len() < 2 {
            return;
        }
        let interval = self.params.passenger_spawn_interval_secs;
        let others = self.stops.len() - 1;

        for origin_idx in 0..self.stops.len() {
            self.stops[origin_idx].spawn_elapsed_secs += delta_secs;
            if self.stops[origin_idx].spawn_elapsed_secs < interval {
                continue;
            }

            // Uniform over every stop except the origin.
            if let Some(pick) = self.rng.pick_index(others) {
                let dest_idx = if pick >= origin_idx { pick + 1 } else { pick };
                let passenger = Passenger::new(
                    PassengerId(self.passenger_ids.next()),
                    self.stops[origin_idx].id,
                    self.stops[dest_idx].id,
                    self.simulation_time_secs,
                );
                self.stops[origin_idx].waiting_passengers.push(passenger);
                self.stats.passengers_spawned += 1;
            }
            self.stops[origin_idx].spawn_elapsed_secs = 0.0;
        }
    }

    /// For every running, scheduled train at a stop: alight passengers bound
    /// there (crediting their fares), then board from the stop's queue.
    ///
    /// A train serves at most one stop per tick: the nearest one within the
    /// boarding radius.
    pub(super) fn exchange_passengers(&mut self) {
        let radius = self.params.boarding_radius_m;
        let scheduled_only = self.params.scheduled_stops_only;
        let now = self.simulation_time_secs;

        let Self {
            trains,
            stops,
            economy,
            stats,
            ..
        } = self;

        for train in trains.iter_mut() {
            if !train.is_running() {
                continue;
            }
            let Some(schedule) = train.schedule.as_ref() else {
                continue;
            };
            let Some(position) = train.current_position else {
                continue;
            };

            let nearest = stops
                .iter()
                .enumerate()
                .filter(|(_, stop)| !scheduled_only || schedule.has_stop(stop.id))
                .map(|(idx, stop)| (idx, distance_meters(position, stop.coordinates)))
                .filter(|&(_, d)| d < radius)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let Some((stop_idx, _)) = nearest else {
                continue;
            };

            let stop_id = stops[stop_idx].id;
            let alighted = train.alight_passengers(stop_id);
            for passenger in &alighted {
                let fare = economy.calculate_fare(trip_distance(stops, passenger));
                economy.earn_revenue(fare);
                stats.fare_revenue += fare;
            }
            stats.passengers_delivered += alighted.len() as u64;

            let boarded = train
                .board_passengers(&mut stops[stop_idx].waiting_passengers, now)
                .len();
            stats.passengers_boarded += boarded as u64;

            if !alighted.is_empty() || boarded > 0 {
                debug!(
                    "{} at {}: {} alighted, {} boarded",
                    train.id,
                    stop_id,
                    alighted.len(),
                    boarded
                );
            }
        }
    }
}

/// Straight-line distance between a passenger's origin and destination
/// stops. A stop that no longer exists counts as zero distance.
fn trip_distance(stops: &[Stop], passenger: &Passenger) -> f64 {
    let find = |id: StopId| stops.iter().find(|s| s.id == id).map(|s| s.coordinates);
    match (find(passenger.origin), find(passenger.destination)) {
        (Some(origin), Some(destination)) => distance_meters(origin, destination),
        _ => {
            warn!(
                "{}: origin {} or destination {} missing, charging base fare",
                passenger.id, passenger.origin, passenger.destination
            );
            0.0
        }
    }
}
