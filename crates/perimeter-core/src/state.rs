//! Simulation snapshot: the visible state handed to collaborators each tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::environment::{Environment, SensorConfig};
use crate::events::{CueEvent, LogEntry};
use crate::types::{GeoPoint, SimTime};

/// Complete state broadcast after each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub entities: Vec<EntityView>,
    pub environment: Environment,
    pub sensors: Vec<SensorView>,
    pub warnings: Vec<String>,
    pub alarm_active: bool,
    /// Log entries appended during this tick, newest first.
    pub new_logs: Vec<LogEntry>,
    pub cues: Vec<CueEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityView {
    Threat(ThreatView),
    Figure(FigureView),
}

impl EntityView {
    pub fn id(&self) -> u32 {
        match self {
            Self::Threat(t) => t.id,
            Self::Figure(f) => f.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatView {
    pub id: u32,
    pub kind: ThreatKind,
    pub severity: Severity,
    pub phase: ThreatPhase,
    pub resolution: Option<Resolution>,
    pub position: GeoPoint,
    pub velocity: GeoPoint,
    pub detected: bool,
    pub detected_by: Option<SensorKind>,
    /// Planar distance to the base in degrees.
    pub distance_deg: f64,
    /// Great-circle distance to the base, for display.
    pub distance_km: f64,
    pub age_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureView {
    pub id: u32,
    pub kind: FigureKind,
    pub class: FigureClass,
    pub severity: Severity,
    pub position: DVec2,
    pub width: f64,
    pub height: f64,
}

/// Per-sensor status for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorView {
    pub kind: SensorKind,
    pub config: SensorConfig,
    pub priority: Priority,
    pub effectiveness: f64,
    pub effective_range_m: f64,
}
