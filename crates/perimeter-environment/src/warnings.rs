//! Operator warnings for adverse conditions.

use perimeter_core::constants::{CAMERA_NIGHT_RANGE_FACTOR, LASER_OBSCURED_RANGE_FACTOR};
use perimeter_core::enums::{TimeOfDay, Weather};
use perimeter_core::environment::Environment;

pub const OPTIMAL_CONDITIONS: &str = "Optimal conditions: all sensors operating normally";

/// Independent threshold checks in a fixed order. Returns a single
/// affirmation line when nothing triggers.
pub fn compute_warnings(env: &Environment) -> Vec<String> {
    let mut warnings = Vec::new();

    match env.weather {
        Weather::Fog => warnings.push(format!(
            "Fog: camera visibility reduced, laser range derated to {:.0}%",
            LASER_OBSCURED_RANGE_FACTOR * 100.0
        )),
        Weather::Rain => warnings.push(format!(
            "Rain: laser range derated to {:.0}%, expect fiber noise",
            LASER_OBSCURED_RANGE_FACTOR * 100.0
        )),
        Weather::Snow => warnings.push("Snow: optical sensors degraded, rely on radar and fiber".into()),
        Weather::Sandstorm => {
            warnings.push("Sandstorm: camera and laser obscured, rely on radar and fiber".into())
        }
        Weather::Hail => warnings.push("Hail: risk of sensor damage, check housings".into()),
        Weather::Thunderstorm => {
            warnings.push("Thunderstorm: electrical interference likely on radar".into())
        }
        Weather::Hurricane => {
            warnings.push("Hurricane: extreme conditions, fiber is the primary sensor".into())
        }
        Weather::Clear => {}
    }

    if env.time_of_day == TimeOfDay::Night {
        warnings.push(format!(
            "Night: camera range reduced to {:.0}%",
            CAMERA_NIGHT_RANGE_FACTOR * 100.0
        ));
    }
    if env.temperature < -20.0 {
        warnings.push(format!(
            "Extreme cold ({:.0}°C): check battery and laser alignment",
            env.temperature
        ));
    }
    if env.temperature > 45.0 {
        warnings.push(format!(
            "Extreme heat ({:.0}°C): thermal shimmer affects camera and laser",
            env.temperature
        ));
    }
    if env.visibility < 2.0 {
        warnings.push(format!("Low visibility ({:.1} km)", env.visibility));
    }
    if env.wind_speed > 60.0 {
        warnings.push(format!(
            "High wind ({:.0} km/h): expect fiber false alarms",
            env.wind_speed
        ));
    }

    if warnings.is_empty() {
        warnings.push(OPTIMAL_CONDITIONS.to_string());
    }
    warnings
}
