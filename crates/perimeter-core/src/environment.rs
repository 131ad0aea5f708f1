//! Environmental conditions and per-sensor configuration records.
//!
//! Derivations (priorities, warnings, effectiveness) live in
//! `perimeter-environment`; this module only holds the data.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;

/// Current environmental conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub weather: Weather,
    pub time_of_day: TimeOfDay,
    /// Degrees Celsius.
    pub temperature: f64,
    pub terrain: Terrain,
    /// Kilometres.
    pub visibility: f64,
    /// km/h.
    pub wind_speed: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            weather: Weather::Clear,
            time_of_day: TimeOfDay::Day,
            temperature: 25.0,
            terrain: Terrain::Urban,
            visibility: 10.0,
            wind_speed: 0.0,
        }
    }
}

/// Partial environment update. Absent fields keep their previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terrain: Option<Terrain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
}

impl EnvironmentPatch {
    pub fn is_empty(&self) -> bool {
        self.weather.is_none()
            && self.time_of_day.is_none()
            && self.temperature.is_none()
            && self.terrain.is_none()
            && self.visibility.is_none()
            && self.wind_speed.is_none()
    }
}

/// One value per sensor family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorTable<T> {
    pub camera: T,
    pub laser: T,
    pub fiber: T,
    pub radar: T,
}

impl<T: Copy> SensorTable<T> {
    pub fn splat(value: T) -> Self {
        Self {
            camera: value,
            laser: value,
            fiber: value,
            radar: value,
        }
    }

    pub fn from_fn(mut f: impl FnMut(SensorKind) -> T) -> Self {
        Self {
            camera: f(SensorKind::Camera),
            laser: f(SensorKind::Laser),
            fiber: f(SensorKind::Fiber),
            radar: f(SensorKind::Radar),
        }
    }

    pub fn get(&self, kind: SensorKind) -> T {
        match kind {
            SensorKind::Camera => self.camera,
            SensorKind::Laser => self.laser,
            SensorKind::Fiber => self.fiber,
            SensorKind::Radar => self.radar,
        }
    }

    pub fn get_mut(&mut self, kind: SensorKind) -> &mut T {
        match kind {
            SensorKind::Camera => &mut self.camera,
            SensorKind::Laser => &mut self.laser,
            SensorKind::Fiber => &mut self.fiber,
            SensorKind::Radar => &mut self.radar,
        }
    }

    /// (kind, value) pairs in `SensorKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorKind, T)> + '_ {
        SensorKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// Operator-facing configuration of one sensor family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub status: SensorStatus,
    pub sensitivity: Sensitivity,
    /// Configured base range in metres, before environmental derating.
    pub range_m: f64,
}

impl SensorConfig {
    pub fn default_for(kind: SensorKind) -> Self {
        let (sensitivity, range_m) = match kind {
            SensorKind::Camera => (Sensitivity::Medium, CAMERA_BASE_RANGE_M),
            SensorKind::Laser => (Sensitivity::High, LASER_BASE_RANGE_M),
            SensorKind::Fiber => (Sensitivity::Medium, FIBER_BASE_RANGE_M),
            SensorKind::Radar => (Sensitivity::Medium, RADAR_BASE_RANGE_M),
        };
        Self {
            status: SensorStatus::Active,
            sensitivity,
            range_m,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SensorStatus::Active
    }
}

pub type SensorSuite = SensorTable<SensorConfig>;

impl SensorSuite {
    pub fn with_defaults() -> Self {
        SensorTable::from_fn(SensorConfig::default_for)
    }
}

/// Partial sensor update. Absent fields keep their previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SensorStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<Sensitivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_m: Option<f64>,
}

impl SensorPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.sensitivity.is_none() && self.range_m.is_none()
    }
}
