//! Great-circle distance and polyline interpolation over latitude/longitude.
//!
//! Distances use the haversine formula on a spherical Earth. Interpolation is
//! a plain linear blend of latitude and longitude, which is not geodesic but
//! is deterministic and cheap. `position_along` combines the two: segments are
//! weighted by their haversine length, then the point is blended linearly
//! inside the segment that contains the target arc length.

use serde::{Deserialize, Serialize};

use crate::config::EARTH_RADIUS_M;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine great-circle distance between two points, in meters.
///
/// Symmetric, and exactly 0 for identical points.
pub fn distance_meters(a: Point, b: Point) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Linear interpolation of latitude and longitude independently.
/// `t = 0` yields `a`, `t = 1` yields `b`.
pub fn interpolate(a: Point, b: Point, t: f64) -> Point {
    // Weighted form so both endpoints are reproduced exactly.
    Point {
        lat: a.lat * (1.0 - t) + b.lat * t,
        lng: a.lng * (1.0 - t) + b.lng * t,
    }
}

/// Total haversine length of a polyline in meters.
pub fn path_length_meters(coords: &[Point]) -> f64 {
    coords
        .windows(2)
        .map(|pair| distance_meters(pair[0], pair[1]))
        .sum()
}

/// Point at normalized arc-length `t` along `coords`.
///
/// Returns `None` for fewer than two coordinates. A zero-length path, or a
/// target that no segment claims due to rounding, resolves to the last
/// coordinate.
pub fn position_along(coords: &[Point], t: f64) -> Option<Point> {
    if coords.len() < 2 {
        return None;
    }
    let last = coords[coords.len() - 1];
    if t <= 0.0 {
        return Some(coords[0]);
    }
    if t >= 1.0 {
        return Some(last);
    }

    let segments: Vec<(Point, Point, f64)> = coords
        .windows(2)
        .map(|pair| (pair[0], pair[1], distance_meters(pair[0], pair[1])))
        .collect();
    let total: f64 = segments.iter().map(|&(_, _, len)| len).sum();
    if total <= 0.0 {
        return Some(last);
    }

    let target = total * t;
    let mut accumulated = 0.0;
    for &(from, to, len) in &segments {
        if accumulated + len >= target {
            // Zero-length segments only match when the target sits exactly on
            // their start, which is `from` itself.
            if len <= 0.0 {
                return Some(from);
            }
            return Some(interpolate(from, to, (target - accumulated) / len));
        }
        accumulated += len;
    }

    Some(last)
}
