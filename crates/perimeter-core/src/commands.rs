//! Operator commands sent from collaborators to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::environment::{EnvironmentPatch, SensorPatch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperatorCommand {
    // --- Simulation control ---
    Start,
    Pause,
    Resume,
    /// Disarm timers and clear all entities, logs and the alarm.
    ResetAll,

    // --- Entities ---
    SpawnThreat,
    PlaceEntity { kind: FigureKind, x: f64, y: f64 },
    /// For geographic threats `x` is latitude and `y` longitude.
    MoveEntity { id: u32, x: f64, y: f64 },
    RemoveEntity { id: u32 },
    AssessThreat { id: u32, resolution: Resolution },

    // --- Environment and sensors ---
    UpdateEnvironment { patch: EnvironmentPatch },
    UpdateSensor { sensor: SensorKind, patch: SensorPatch },

    // --- Log ---
    ClearLogs,
}
