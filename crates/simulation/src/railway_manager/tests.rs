use crate::engine::{EngineStatus, TickHooks};
use crate::error::NetworkError;
use crate::geo::{distance_meters, Point};
use crate::passenger::PassengerStatus;
use crate::sim_params::SimParams;
use crate::train::{Direction, TrainStatus};

use super::{NetworkChange, RailwayManager, RidershipStats};

const A: Point = Point::new(0.0, 0.0);
const B: Point = Point::new(0.0, 0.01);

/// One line from A to B with a stop at each end and one train scheduled
/// over both stops, already running.
fn two_stop_railway(params: SimParams) -> RailwayManager {
    let mut manager = RailwayManager::new(params);
    let line = manager.add_line(vec![A, B], None).unwrap();
    let a = manager.add_stop(A, None);
    let b = manager.add_stop(B, None);
    let train = manager.add_train(None);
    manager.schedule_train(train, line, vec![a, b]).unwrap();
    manager.start_train(train).unwrap();
    manager.drain_changes();
    manager
}

fn park_train_at_end(manager: &mut RailwayManager, progress: f64) {
    let line = manager.lines[0].clone();
    manager.trains[0].progress = progress;
    manager.trains[0].refresh_position(&line);
}

// -------------------------------------------------------------------------
// Editing
// -------------------------------------------------------------------------

#[test]
fn test_add_line_rejects_single_point() {
    let mut manager = RailwayManager::default();
    let err = manager.add_line(vec![A], None).unwrap_err();
    assert_eq!(err, NetworkError::TooFewCoordinates { got: 1 });
    assert!(manager.lines().is_empty());
    assert!(manager.pending_changes().is_empty());
}

#[test]
fn test_default_names_and_color_rotation() {
    let params = SimParams {
        line_colors: vec!["#111111".into(), "#222222".into()],
        ..Default::default()
    };
    let mut manager = RailwayManager::new(params);
    for _ in 0..3 {
        manager.add_line(vec![A, B], None).unwrap();
    }
    let names: Vec<_> = manager.lines().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Line 1", "Line 2", "Line 3"]);
    let colors: Vec<_> = manager.lines().iter().map(|l| l.color.as_str()).collect();
    assert_eq!(colors, ["#111111", "#222222", "#111111"]);

    let stop = manager.add_stop(A, None);
    assert_eq!(manager.stop(stop).unwrap().name, "Stop 1");
    let named = manager.add_stop(B, Some("Central".into()));
    assert_eq!(manager.stop(named).unwrap().name, "Central");
}

#[test]
fn test_new_train_is_unscheduled_with_configured_stats() {
    let params = SimParams {
        train_speed: 0.2,
        train_capacity: 7,
        ..Default::default()
    };
    let mut manager = RailwayManager::new(params);
    let id = manager.add_train(None);
    let train = manager.train(id).unwrap();
    assert_eq!(train.name, "Train 1");
    assert_eq!(train.status, TrainStatus::Unscheduled);
    assert_eq!(train.speed, 0.2);
    assert_eq!(train.capacity, 7);
    assert_eq!(manager.start_train(id), Ok(false));
    assert_eq!(manager.train(id).unwrap().status, TrainStatus::Unscheduled);
}

#[test]
fn test_schedule_train_filters_unknown_stops() {
    let mut manager = RailwayManager::default();
    let line = manager.add_line(vec![A, B], None).unwrap();
    let a = manager.add_stop(A, None);
    let train = manager.add_train(None);
    let ghost = crate::ids::StopId(999);

    manager.schedule_train(train, line, vec![a, ghost]).unwrap();

    let train = manager.train(train).unwrap();
    assert_eq!(train.status, TrainStatus::Stopped);
    assert_eq!(train.line, Some(line));
    assert_eq!(train.schedule.as_ref().unwrap().stops, vec![a]);
    assert_eq!(train.current_position, Some(A));
}

#[test]
fn test_schedule_train_unknown_ids() {
    let mut manager = RailwayManager::default();
    let line = manager.add_line(vec![A, B], None).unwrap();
    let train = manager.add_train(None);
    let bad_line = crate::ids::LineId(42);
    let bad_train = crate::ids::TrainId(42);
    assert_eq!(
        manager.schedule_train(train, bad_line, vec![]),
        Err(NetworkError::UnknownLine(bad_line))
    );
    assert_eq!(
        manager.schedule_train(bad_train, line, vec![]),
        Err(NetworkError::UnknownTrain(bad_train))
    );
}

#[test]
fn test_edit_line_coordinates_moves_trains() {
    let mut manager = two_stop_railway(SimParams::default());
    let line = manager.lines()[0].id;
    park_train_at_end(&mut manager, 1.0);
    assert_eq!(manager.trains()[0].current_position, Some(B));

    let c = Point::new(0.02, 0.0);
    manager.edit_line_coordinates(line, vec![A, c]).unwrap();
    assert_eq!(manager.trains()[0].current_position, Some(c));
    assert_eq!(manager.drain_changes(), vec![NetworkChange::LineEdited(line)]);

    assert!(manager.edit_line_coordinates(line, vec![]).is_err());
}

#[test]
fn test_remove_line_unschedules_its_trains() {
    let mut manager = two_stop_railway(SimParams::default());
    let line = manager.lines()[0].id;
    manager.remove_line(line).unwrap();

    let train = &manager.trains()[0];
    assert_eq!(train.status, TrainStatus::Unscheduled);
    assert!(train.line.is_none());
    assert!(train.schedule.is_none());
    assert!(train.current_position.is_none());
    assert_eq!(manager.remove_line(line), Err(NetworkError::UnknownLine(line)));
}

#[test]
fn test_remove_stop_strands_passengers_and_updates_schedules() {
    let mut manager = two_stop_railway(SimParams::default());
    let (a, b) = (manager.stops()[0].id, manager.stops()[1].id);

    // One passenger A -> B rides the train, one more waits at A.
    manager.generate_passengers(2.0);
    manager.exchange_passengers();
    assert_eq!(manager.trains()[0].occupancy(), 1);
    manager.generate_passengers(2.0);
    assert_eq!(manager.stops()[0].waiting_count(), 1);
    assert_eq!(manager.stops()[1].waiting_count(), 2);

    manager.remove_stop(b).unwrap();

    // B's two waiting, the rider bound for B, and A's passenger bound for B.
    assert_eq!(manager.stats().passengers_stranded, 4);
    assert_eq!(manager.passengers_in_system(), 0);
    assert_eq!(manager.trains()[0].schedule.as_ref().unwrap().stops, vec![a]);
}

#[test]
fn test_remove_train_strands_riders() {
    let mut manager = two_stop_railway(SimParams::default());
    manager.generate_passengers(2.0);
    manager.exchange_passengers();
    let id = manager.trains()[0].id;

    manager.remove_train(id).unwrap();
    assert_eq!(manager.stats().passengers_stranded, 1);
    assert!(manager.trains().is_empty());
    assert_eq!(manager.drain_changes(), vec![NetworkChange::TrainRemoved(id)]);
}

#[test]
fn test_clear_all_resets_ledger_and_palette_but_not_ids() {
    let mut manager = two_stop_railway(SimParams::default());
    manager.update_economics(100.0);
    assert!(manager.economy().balance() < 50_000.0);

    manager.clear_all();
    assert!(manager.lines().is_empty());
    assert!(manager.stops().is_empty());
    assert!(manager.trains().is_empty());
    assert_eq!(manager.economy().balance(), 50_000.0);

    let line = manager.add_line(vec![A, B], None).unwrap();
    assert_eq!(line.0, 2);
    assert_eq!(manager.line(line).unwrap().color, manager.params().line_colors[0]);
    assert_eq!(manager.line(line).unwrap().name, "Line 1");
}

#[test]
fn test_clear_all_keeps_ridership_balanced() {
    let mut manager = two_stop_railway(SimParams::default());
    manager.generate_passengers(2.0);
    manager.exchange_passengers();
    manager.generate_passengers(2.0);
    assert!(manager.passengers_in_system() > 0);

    manager.clear_all();
    let stats = manager.stats();
    assert_eq!(*stats, RidershipStats::default());
    assert_eq!(
        stats.passengers_spawned,
        stats.passengers_delivered
            + stats.passengers_stranded
            + manager.passengers_in_system() as u64
    );
    assert_eq!(stats.fare_revenue, manager.economy().total_revenue);
}

#[test]
fn test_change_notifications_in_order() {
    let mut manager = RailwayManager::default();
    let line = manager.add_line(vec![A, B], None).unwrap();
    let stop = manager.add_stop(A, None);
    manager.rename_stop(stop, "North".into()).unwrap();
    manager.move_stop(stop, B).unwrap();
    manager.rename_line(line, "Red".into()).unwrap();

    assert_eq!(
        manager.drain_changes(),
        vec![
            NetworkChange::LineAdded(line),
            NetworkChange::StopAdded(stop),
            NetworkChange::StopEdited(stop),
            NetworkChange::StopEdited(stop),
            NetworkChange::LineEdited(line),
        ]
    );
    assert!(manager.pending_changes().is_empty());
    assert_eq!(manager.stop(stop).unwrap().coordinates, B);
    assert_eq!(manager.line(line).unwrap().name, "Red");
}

// -------------------------------------------------------------------------
// Tick hooks
// -------------------------------------------------------------------------

#[test]
fn test_generation_needs_two_stops() {
    let mut manager = RailwayManager::default();
    manager.add_stop(A, None);
    manager.generate_passengers(10.0);
    assert_eq!(manager.stops()[0].spawn_elapsed_secs, 0.0);
    assert_eq!(manager.stats().passengers_spawned, 0);
}

#[test]
fn test_generation_spawns_on_interval() {
    let mut manager = RailwayManager::default();
    let a = manager.add_stop(A, None);
    let b = manager.add_stop(B, None);
    manager.begin_tick(12.5);

    manager.generate_passengers(1.5);
    assert_eq!(manager.passengers_in_system(), 0);
    manager.generate_passengers(0.5);

    let at_a = &manager.stops()[0].waiting_passengers;
    assert_eq!(at_a.len(), 1);
    assert_eq!(at_a[0].origin, a);
    assert_eq!(at_a[0].destination, b);
    assert_eq!(at_a[0].status, PassengerStatus::Waiting);
    assert_eq!(at_a[0].spawned_at_secs, 12.5);
    assert_eq!(manager.stops()[1].waiting_passengers[0].destination, a);
    assert_eq!(manager.stops()[0].spawn_elapsed_secs, 0.0);
    assert_eq!(manager.stats().passengers_spawned, 2);
}

#[test]
fn test_generated_destinations_never_equal_origin() {
    let mut manager = RailwayManager::default();
    for i in 0..5 {
        manager.add_stop(Point::new(0.0, i as f64 * 0.01), None);
    }
    for _ in 0..50 {
        manager.generate_passengers(2.0);
    }
    for stop in manager.stops() {
        assert_eq!(stop.waiting_count(), 50);
        assert!(stop.waiting_passengers.iter().all(|p| p.destination != stop.id));
    }
}

#[test]
fn test_round_trip_delivers_and_charges_fare() {
    let mut manager = two_stop_railway(SimParams::default());
    manager.generate_passengers(2.0);
    manager.exchange_passengers();
    // Train sits on A: A's passenger boards, B's keeps waiting.
    assert_eq!(manager.trains()[0].occupancy(), 1);
    assert_eq!(manager.stats().passengers_boarded, 1);
    assert_eq!(manager.stops()[0].waiting_count(), 0);

    park_train_at_end(&mut manager, 1.0);
    manager.exchange_passengers();

    let expected_fare = 5.0 + distance_meters(A, B) / 1000.0 * 0.10;
    assert_eq!(manager.stats().passengers_delivered, 1);
    assert!((manager.stats().fare_revenue - expected_fare).abs() < 1e-9);
    assert!((manager.economy().balance() - (50_000.0 + expected_fare)).abs() < 1e-6);
    // B's passenger (bound for A) boarded after the delivery.
    let riders = &manager.trains()[0].passengers;
    assert_eq!(riders.len(), 1);
    assert_eq!(riders[0].destination, manager.stops()[0].id);
    assert_eq!(manager.trains()[0].total_delivered, 1);
}

#[test]
fn test_boarding_respects_capacity() {
    let params = SimParams {
        train_capacity: 2,
        ..Default::default()
    };
    let mut manager = two_stop_railway(params);
    for _ in 0..3 {
        manager.generate_passengers(2.0);
    }
    manager.exchange_passengers();
    assert_eq!(manager.trains()[0].occupancy(), 2);
    assert_eq!(manager.stops()[0].waiting_count(), 1);
}

#[test]
fn test_stopped_train_does_not_board() {
    let mut manager = two_stop_railway(SimParams::default());
    manager.stop_scheduled_trains();
    manager.generate_passengers(2.0);
    manager.exchange_passengers();
    assert_eq!(manager.trains()[0].occupancy(), 0);

    manager.start_scheduled_trains();
    manager.exchange_passengers();
    assert_eq!(manager.trains()[0].occupancy(), 1);
}

#[test]
fn test_nearest_stop_within_radius_wins() {
    let mut manager = RailwayManager::default();
    let line = manager.add_line(vec![A, B], None).unwrap();
    // Roughly 22m and 11m from A.
    let far = manager.add_stop(Point::new(0.0002, 0.0), None);
    let near = manager.add_stop(Point::new(0.0001, 0.0), None);
    let train = manager.add_train(None);
    manager.schedule_train(train, line, vec![far, near]).unwrap();
    manager.start_train(train).unwrap();

    manager.generate_passengers(2.0);
    manager.exchange_passengers();
    let riders = &manager.trains()[0].passengers;
    assert_eq!(riders.len(), 1);
    assert_eq!(riders[0].origin, near);
}

#[test]
fn test_scheduled_stops_only() {
    let params = SimParams {
        scheduled_stops_only: true,
        ..Default::default()
    };
    let mut manager = RailwayManager::new(params);
    let line = manager.add_line(vec![A, B], None).unwrap();
    manager.add_stop(A, None);
    let b = manager.add_stop(B, None);
    let train = manager.add_train(None);
    manager.schedule_train(train, line, vec![b]).unwrap();
    manager.start_train(train).unwrap();

    manager.generate_passengers(2.0);
    manager.exchange_passengers();
    assert_eq!(manager.trains()[0].occupancy(), 0);
}

#[test]
fn test_advance_trains_moves_only_running_trains() {
    let mut manager = two_stop_railway(SimParams {
        train_speed: 0.25,
        ..Default::default()
    });
    let idle = manager.add_train(None);

    manager.advance_trains(1.0, 2.0);
    let train = &manager.trains()[0];
    assert!((train.progress - 0.5).abs() < 1e-12);
    assert_eq!(train.direction, Direction::Forward);
    assert_eq!(manager.train(idle).unwrap().progress, 0.0);

    manager.advance_trains(1.0, 2.0);
    assert_eq!(manager.trains()[0].progress, 1.0);
    assert_eq!(manager.trains()[0].direction, Direction::Backward);
}

#[test]
fn test_update_economics_charges_running_trains_and_lines() {
    let mut manager = two_stop_railway(SimParams::default());
    manager.update_economics(10.0);
    // 1 train * 0.05 * 10 + 1 line * 0.02 * 10
    assert!((manager.economy().total_costs - 0.7).abs() < 1e-12);

    manager.stop_scheduled_trains();
    manager.update_economics(10.0);
    assert!((manager.economy().total_costs - 0.9).abs() < 1e-12);
}

#[test]
fn test_ui_refresh_records_status_and_snapshot() {
    let mut manager = two_stop_railway(SimParams::default());
    let status = EngineStatus {
        is_running: true,
        speed_multiplier: 4.0,
        simulation_time_secs: 3_725.0,
    };
    manager.update_simulation_ui(&status);
    assert_eq!(manager.refresh_count(), 1);
    assert_eq!(manager.last_status(), status);

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.clock_label, "01:02");
    assert_eq!(snapshot.lines.len(), 1);
    assert_eq!(snapshot.stops.len(), 2);
    assert_eq!(snapshot.trains[0].status, TrainStatus::Running);
    assert_eq!(snapshot.trains[0].position, Some(A));
    assert_eq!(snapshot.balance, 50_000.0);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"clock_label\":\"01:02\""));
}
