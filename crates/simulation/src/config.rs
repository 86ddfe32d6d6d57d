/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Operating costs are applied at most once per this many simulated seconds.
pub const COST_APPLICATION_INTERVAL_SECS: f64 = 1.0;

/// Colours assigned to new lines in rotation.
pub const DEFAULT_LINE_COLORS: [&str; 6] = [
    "#FF0000", "#0000FF", "#00FF00", "#FF00FF", "#FFA500", "#00FFFF",
];

pub const DEFAULT_STARTING_BALANCE: f64 = 50_000.0;
pub const DEFAULT_BASE_FARE: f64 = 5.0;
pub const DEFAULT_FARE_PER_KM: f64 = 0.10;
pub const DEFAULT_TRAIN_OPERATING_COST_PER_SEC: f64 = 0.05;
pub const DEFAULT_LINE_MAINTENANCE_COST_PER_SEC: f64 = 0.02;

/// Seconds between passenger spawns at each stop.
pub const DEFAULT_PASSENGER_SPAWN_INTERVAL_SECS: f64 = 2.0;

/// A train within this distance of a stop may board and alight there.
pub const DEFAULT_BOARDING_RADIUS_M: f64 = 50.0;

/// Progress units per simulated second.
pub const DEFAULT_TRAIN_SPEED: f64 = 0.01;
pub const DEFAULT_TRAIN_CAPACITY: usize = 100;

pub const DEFAULT_RNG_SEED: u64 = 42;
