//! Environment state with cached derivations.

use serde::{Deserialize, Serialize};

use perimeter_core::constants::*;
use perimeter_core::enums::SensorKind;
use perimeter_core::environment::*;

use crate::effectiveness::{compute_effective_ranges, compute_effectiveness};
use crate::rules::{compute_sensor_priorities, SensorPriorities};
use crate::warnings::compute_warnings;

/// Clamp a patch's numeric fields to their accepted ranges. Non-finite
/// values are dropped as if absent.
pub fn clamp_patch(patch: &EnvironmentPatch) -> EnvironmentPatch {
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    EnvironmentPatch {
        temperature: finite(patch.temperature).map(|t| t.clamp(TEMPERATURE_MIN_C, TEMPERATURE_MAX_C)),
        visibility: finite(patch.visibility).map(|v| v.clamp(0.0, VISIBILITY_MAX_KM)),
        wind_speed: finite(patch.wind_speed).map(|w| w.clamp(0.0, WIND_SPEED_MAX_KMH)),
        ..*patch
    }
}

/// Merge the clamped patch into `env` and return what was applied.
pub fn apply_patch(env: &mut Environment, patch: &EnvironmentPatch) -> EnvironmentPatch {
    let applied = clamp_patch(patch);
    if let Some(weather) = applied.weather {
        env.weather = weather;
    }
    if let Some(time_of_day) = applied.time_of_day {
        env.time_of_day = time_of_day;
    }
    if let Some(temperature) = applied.temperature {
        env.temperature = temperature;
    }
    if let Some(terrain) = applied.terrain {
        env.terrain = terrain;
    }
    if let Some(visibility) = applied.visibility {
        env.visibility = visibility;
    }
    if let Some(wind_speed) = applied.wind_speed {
        env.wind_speed = wind_speed;
    }
    applied
}

/// Merge a sensor patch, clamping the range. Returns what was applied.
pub fn apply_sensor_patch(config: &mut SensorConfig, patch: &SensorPatch) -> SensorPatch {
    let applied = SensorPatch {
        range_m: patch
            .range_m
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(SENSOR_RANGE_MIN_M, SENSOR_RANGE_MAX_M)),
        ..*patch
    };
    if let Some(status) = applied.status {
        config.status = status;
    }
    if let Some(sensitivity) = applied.sensitivity {
        config.sensitivity = sensitivity;
    }
    if let Some(range_m) = applied.range_m {
        config.range_m = range_m;
    }
    applied
}

/// Conditions, sensor configuration, and everything derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentModel {
    environment: Environment,
    sensors: SensorSuite,
    priorities: SensorPriorities,
    warnings: Vec<String>,
    effectiveness: SensorTable<f64>,
    ranges: SensorTable<f64>,
}

impl Default for EnvironmentModel {
    fn default() -> Self {
        Self::new(Environment::default(), SensorSuite::with_defaults())
    }
}

impl EnvironmentModel {
    pub fn new(environment: Environment, sensors: SensorSuite) -> Self {
        let mut model = Self {
            environment,
            sensors,
            priorities: SensorPriorities::default(),
            warnings: Vec::new(),
            effectiveness: SensorTable::splat(1.0),
            ranges: SensorTable::splat(0.0),
        };
        model.recompute();
        model
    }

    fn recompute(&mut self) {
        self.priorities = compute_sensor_priorities(&self.environment);
        self.warnings = compute_warnings(&self.environment);
        self.effectiveness = compute_effectiveness(&self.environment, &self.priorities);
        self.ranges = compute_effective_ranges(&self.environment, &self.sensors);
    }

    /// Apply a partial update. Returns the clamped patch that was applied,
    /// or `None` when the patch carried no usable field.
    pub fn update_environment(&mut self, patch: &EnvironmentPatch) -> Option<EnvironmentPatch> {
        let applied = apply_patch(&mut self.environment, patch);
        if applied.is_empty() {
            return None;
        }
        self.recompute();
        Some(applied)
    }

    /// Apply a sensor update. Returns the applied patch, or `None` when empty.
    pub fn update_sensor(&mut self, sensor: SensorKind, patch: &SensorPatch) -> Option<SensorPatch> {
        let applied = apply_sensor_patch(self.sensors.get_mut(sensor), patch);
        if applied.is_empty() {
            return None;
        }
        self.recompute();
        Some(applied)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn sensors(&self) -> &SensorSuite {
        &self.sensors
    }

    pub fn sensor(&self, sensor: SensorKind) -> SensorConfig {
        self.sensors.get(sensor)
    }

    pub fn priorities(&self) -> &SensorPriorities {
        &self.priorities
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn effectiveness(&self) -> &SensorTable<f64> {
        &self.effectiveness
    }

    pub fn effective_ranges(&self) -> &SensorTable<f64> {
        &self.ranges
    }
}
