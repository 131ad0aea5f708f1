//! Simulation configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use perimeter_core::constants::*;
use perimeter_core::environment::Environment;
use perimeter_core::types::GeoPoint;

/// Configuration for a simulation session. Every field has a default, so a
/// partial TOML/JSON table is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Real-time multiplier used by the loop driver (1.0 = normal).
    pub time_scale: f64,
    /// Wall-clock origin for log timestamps.
    pub epoch: DateTime<Utc>,

    pub base_position: GeoPoint,
    /// Reference radius for spawning and site arrival (degrees).
    pub perimeter_radius: f64,
    pub laser_ring_radius: f64,
    pub fiber_ring_radius: f64,
    pub radar_ring_radius: f64,
    /// Per-motion-tick approach fraction band `[min, max)`.
    pub approach_fraction_min: f64,
    pub approach_fraction_max: f64,

    pub motion_interval_ms: u64,
    pub spawn_interval_ms: u64,
    pub cleanup_interval_ms: u64,
    pub threat_ttl_ms: u64,
    pub alarm_dwell_ms: u64,
    pub max_active_threats: usize,

    /// Retained log entries, clamped to 8..=100.
    pub log_capacity: usize,

    /// Conditions at session start.
    pub environment: Environment,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            epoch: DateTime::<Utc>::default(),
            base_position: BASE_POSITION,
            perimeter_radius: LASER_RING_RADIUS,
            laser_ring_radius: LASER_RING_RADIUS,
            fiber_ring_radius: FIBER_RING_RADIUS,
            radar_ring_radius: RADAR_RING_RADIUS,
            approach_fraction_min: APPROACH_FRACTION_MIN,
            approach_fraction_max: APPROACH_FRACTION_MAX,
            motion_interval_ms: MOTION_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            cleanup_interval_ms: CLEANUP_INTERVAL_MS,
            threat_ttl_ms: THREAT_TTL_MS,
            alarm_dwell_ms: ALARM_DWELL_MS,
            max_active_threats: MAX_ACTIVE_THREATS,
            log_capacity: DEFAULT_LOG_CAPACITY,
            environment: Environment::default(),
        }
    }
}

impl SimConfig {
    pub fn approach_fraction(&self) -> (f64, f64) {
        (self.approach_fraction_min, self.approach_fraction_max)
    }
}
