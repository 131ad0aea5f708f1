//! Effectiveness multipliers and effective detection ranges.

use perimeter_core::constants::{CAMERA_NIGHT_RANGE_FACTOR, LASER_OBSCURED_RANGE_FACTOR};
use perimeter_core::enums::{Priority, SensorKind, TimeOfDay, Weather};
use perimeter_core::environment::{Environment, SensorSuite, SensorTable};

use crate::rules::SensorPriorities;

/// Upper bound of an effectiveness multiplier.
pub const MAX_EFFECTIVENESS: f64 = 1.5;

fn condition_factor(sensor: SensorKind, env: &Environment) -> f64 {
    let rain = env.weather == Weather::Rain;
    let fog = env.weather == Weather::Fog;
    let night = env.time_of_day == TimeOfDay::Night;

    let mut factor = 1.0;
    match sensor {
        SensorKind::Camera => {
            if fog {
                factor *= 0.5;
            }
            if night {
                factor *= 0.7;
            }
        }
        SensorKind::Laser => {
            if rain {
                factor *= 0.7;
            }
            if fog {
                factor *= 0.6;
            }
        }
        SensorKind::Fiber => {
            if rain || fog {
                factor *= 1.1;
            }
        }
        SensorKind::Radar => {
            if rain {
                factor *= 0.9;
            }
            if fog {
                factor *= 0.8;
            }
        }
    }
    factor
}

fn priority_factor(priority: Priority) -> f64 {
    match priority {
        Priority::High => 1.2,
        Priority::Medium => 1.0,
        Priority::Low => 0.8,
    }
}

/// Per-sensor effectiveness in `[0, 1.5]`.
pub fn compute_effectiveness(env: &Environment, priorities: &SensorPriorities) -> SensorTable<f64> {
    SensorTable::from_fn(|sensor| {
        let value = condition_factor(sensor, env) * priority_factor(priorities.get(sensor));
        value.clamp(0.0, MAX_EFFECTIVENESS)
    })
}

/// Effective range in metres from each sensor's configured base range.
pub fn compute_effective_ranges(env: &Environment, sensors: &SensorSuite) -> SensorTable<f64> {
    SensorTable::from_fn(|sensor| {
        let base = sensors.get(sensor).range_m;
        match sensor {
            SensorKind::Camera if env.time_of_day == TimeOfDay::Night => base * CAMERA_NIGHT_RANGE_FACTOR,
            SensorKind::Laser if matches!(env.weather, Weather::Rain | Weather::Fog) => {
                base * LASER_OBSCURED_RANGE_FACTOR
            }
            _ => base,
        }
    })
}
