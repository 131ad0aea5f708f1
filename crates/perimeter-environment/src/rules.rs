//! Sensor priority derivation.
//!
//! Rules are keyed on weather, then time of day, then temperature, then
//! terrain. Each matching rule assigns priorities to some sensors; a sensor
//! keeps the highest value assigned to it and defaults to Medium when no
//! rule mentions it.

use perimeter_core::enums::{Priority, SensorKind, Terrain, TimeOfDay, Weather};
use perimeter_core::environment::{Environment, SensorTable};

use Priority::{High, Low, Medium};
use SensorKind::{Camera, Fiber, Laser, Radar};

pub type SensorPriorities = SensorTable<Priority>;

struct PriorityRule {
    applies: fn(&Environment) -> bool,
    assignments: &'static [(SensorKind, Priority)],
}

const RULES: &[PriorityRule] = &[
    // --- Weather ---
    PriorityRule {
        applies: |e| matches!(e.weather, Weather::Fog | Weather::Sandstorm),
        assignments: &[(Radar, High), (Fiber, High), (Laser, Medium), (Camera, Low)],
    },
    PriorityRule {
        applies: |e| matches!(e.weather, Weather::Rain | Weather::Snow | Weather::Hail),
        assignments: &[(Radar, High), (Fiber, High), (Camera, Medium), (Laser, Low)],
    },
    PriorityRule {
        applies: |e| matches!(e.weather, Weather::Thunderstorm | Weather::Hurricane),
        assignments: &[(Fiber, High), (Radar, Medium), (Camera, Low), (Laser, Low)],
    },
    PriorityRule {
        applies: |e| e.weather == Weather::Clear,
        assignments: &[(Camera, High), (Laser, High)],
    },
    // --- Time of day ---
    PriorityRule {
        applies: |e| e.time_of_day == TimeOfDay::Night,
        assignments: &[(Radar, High), (Fiber, High), (Laser, Medium), (Camera, Low)],
    },
    PriorityRule {
        applies: |e| matches!(e.time_of_day, TimeOfDay::Dusk | TimeOfDay::Dawn),
        assignments: &[(Camera, Medium), (Radar, Medium)],
    },
    // --- Temperature ---
    PriorityRule {
        applies: |e| e.temperature < -10.0,
        assignments: &[(Fiber, Medium), (Laser, Low)],
    },
    PriorityRule {
        applies: |e| e.temperature > 40.0,
        assignments: &[(Camera, Low), (Radar, Medium)],
    },
    // --- Terrain ---
    PriorityRule {
        applies: |e| e.terrain == Terrain::Forest,
        assignments: &[(Radar, High), (Camera, Low)],
    },
    PriorityRule {
        applies: |e| e.terrain == Terrain::Desert,
        assignments: &[(Camera, Medium), (Laser, Medium)],
    },
    PriorityRule {
        applies: |e| e.terrain == Terrain::Mountain,
        assignments: &[(Radar, Medium), (Fiber, Low)],
    },
    PriorityRule {
        applies: |e| e.terrain == Terrain::Coastal,
        assignments: &[(Radar, High)],
    },
    PriorityRule {
        applies: |e| e.terrain == Terrain::Urban,
        assignments: &[(Fiber, Medium)],
    },
];

/// Priority table for the given conditions.
pub fn compute_sensor_priorities(env: &Environment) -> SensorPriorities {
    let assignments: Vec<(SensorKind, Priority)> = RULES
        .iter()
        .filter(|rule| (rule.applies)(env))
        .flat_map(|rule| rule.assignments.iter().copied())
        .collect();
    resolve_priorities(&assignments)
}

/// Resolve raw assignments: highest wins, unassigned sensors are Medium.
/// The result does not depend on assignment order.
pub fn resolve_priorities(assignments: &[(SensorKind, Priority)]) -> SensorPriorities {
    let mut assigned: SensorTable<Option<Priority>> = SensorTable::splat(None);
    for &(sensor, priority) in assignments {
        let slot = assigned.get_mut(sensor);
        *slot = Some(slot.map_or(priority, |current| current.max(priority)));
    }
    SensorTable::from_fn(|sensor| assigned.get(sensor).unwrap_or_default())
}
