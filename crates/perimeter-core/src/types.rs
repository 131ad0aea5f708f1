//! Fundamental positional and timing types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
///
/// Perimeter rings and threat motion operate on raw degree differences,
/// not on geodesic distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance in degrees (Euclidean over lat/lng).
    pub fn planar_distance_to(&self, other: &GeoPoint) -> f64 {
        crate::geometry::planar_distance(self.as_vec(), other.as_vec())
    }

    /// Great-circle distance in kilometres. Display only.
    pub fn haversine_km_to(&self, other: &GeoPoint) -> f64 {
        crate::geometry::haversine_km(*self, *other)
    }

    /// Displacement from `self` to `other`, as a lat/lng delta.
    pub fn delta_to(&self, other: &GeoPoint) -> GeoPoint {
        GeoPoint::new(other.lat - self.lat, other.lng - self.lng)
    }

    /// Component-wise translation.
    pub fn offset(&self, delta: &GeoPoint) -> GeoPoint {
        GeoPoint::new(self.lat + delta.lat, self.lng + delta.lng)
    }

    pub fn scaled(&self, factor: f64) -> GeoPoint {
        GeoPoint::new(self.lat * factor, self.lng * factor)
    }

    /// (lat, lng) as a glam vector, x = lat, y = lng.
    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.lat, self.lng)
    }
}

/// Simulation time tracking. Integer milliseconds so interval timers
/// never drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl SimTime {
    /// Advance by one base tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += crate::constants::TICK_MS;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}
