//! Environment model for PERIMETER.
//!
//! Pure derivations from environmental conditions: sensor priorities,
//! operator warnings, effectiveness multipliers and effective ranges.
//! `EnvironmentModel` caches them and recomputes on every change.

pub mod effectiveness;
pub mod model;
pub mod rules;
pub mod warnings;

pub use perimeter_core as core;

pub use effectiveness::{compute_effective_ranges, compute_effectiveness};
pub use model::EnvironmentModel;
pub use rules::{compute_sensor_priorities, SensorPriorities};
pub use warnings::compute_warnings;
