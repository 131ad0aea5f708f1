//! Simulation constants and tuning parameters.
//!
//! These are the defaults; `SimConfig` in `perimeter-sim` can override the
//! timing and capacity values per session.

use crate::types::GeoPoint;

/// Base tick rate (Hz).
pub const TICK_RATE: u32 = 10;

/// Milliseconds per base tick.
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

// --- Timers ---

/// Interval between threat motion/detection steps.
pub const MOTION_INTERVAL_MS: u64 = 500;

/// Interval between spawn attempts.
pub const SPAWN_INTERVAL_MS: u64 = 30_000;

/// Interval between expiry sweeps.
pub const CLEANUP_INTERVAL_MS: u64 = 60_000;

/// Threat lifetime.
pub const THREAT_TTL_MS: u64 = 120_000;

/// How long the alarm latch stays set after the last trigger.
pub const ALARM_DWELL_MS: u64 = 5_000;

// --- Population ---

/// Maximum concurrently active (non-assessed, non-expired) threats.
pub const MAX_ACTIVE_THREATS: usize = 5;

// --- Site geometry (degrees) ---

/// Protected site.
pub const BASE_POSITION: GeoPoint = GeoPoint {
    lat: 34.0522,
    lng: -118.2437,
};

/// Outer laser ring half-extent. Also the spawn reference radius.
pub const LASER_RING_RADIUS: f64 = 0.003;

/// Middle fiber ring half-extent.
pub const FIBER_RING_RADIUS: f64 = 0.002;

/// Inner radar zone half-extent.
pub const RADAR_RING_RADIUS: f64 = 0.001;

/// Spawn distance band, as multiples of the perimeter radius.
pub const SPAWN_DISTANCE_MIN_FACTOR: f64 = 1.5;
pub const SPAWN_DISTANCE_MAX_FACTOR: f64 = 3.0;

/// A threat closer than this multiple of the radius has reached the site.
pub const ASSESSED_DISTANCE_FACTOR: f64 = 0.3;

/// Per-motion-tick approach fraction band for spawned threats.
pub const APPROACH_FRACTION_MIN: f64 = 0.004;
pub const APPROACH_FRACTION_MAX: f64 = 0.012;

/// Cumulative severity thresholds: below LOW is low, below MEDIUM is medium.
pub const SEVERITY_LOW_THRESHOLD: f64 = 0.7;
pub const SEVERITY_MEDIUM_THRESHOLD: f64 = 0.9;

// --- Beam grid (planar pixels) ---

/// x position of the beam grid line.
pub const BEAM_LINE_X: f64 = 400.0;

/// y positions of the beams, top to bottom.
pub const BEAM_POSITIONS: [f64; 6] = [100.0, 160.0, 220.0, 280.0, 340.0, 400.0];

/// Divisor applied to |dx| * speed factor for the displayed speed.
pub const BEAM_SPEED_NORMALIZATION: f64 = 10.0;

// --- Logs ---

/// Default number of retained log entries.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Accepted log capacity range.
pub const MIN_LOG_CAPACITY: usize = 8;
pub const MAX_LOG_CAPACITY: usize = 100;

// --- Environment bounds ---

pub const TEMPERATURE_MIN_C: f64 = -40.0;
pub const TEMPERATURE_MAX_C: f64 = 50.0;
pub const VISIBILITY_MAX_KM: f64 = 25.0;
pub const WIND_SPEED_MAX_KMH: f64 = 120.0;

// --- Sensors ---

pub const CAMERA_BASE_RANGE_M: f64 = 100.0;
pub const LASER_BASE_RANGE_M: f64 = 50.0;
pub const FIBER_BASE_RANGE_M: f64 = 200.0;
pub const RADAR_BASE_RANGE_M: f64 = 300.0;

pub const SENSOR_RANGE_MIN_M: f64 = 10.0;
pub const SENSOR_RANGE_MAX_M: f64 = 500.0;

/// Camera range multiplier at night.
pub const CAMERA_NIGHT_RANGE_FACTOR: f64 = 0.6;

/// Laser range multiplier in rain or fog.
pub const LASER_OBSCURED_RANGE_FACTOR: f64 = 0.7;

// --- Misc ---

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
