//! Events emitted by the simulation: crossings, log entries and cues for
//! the audible/visual collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::GeoPoint;

/// A boundary crossing raised by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub entity_id: u32,
    pub sensor: SensorKind,
    pub severity: Severity,
    pub detail: CrossingDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CrossingDetail {
    /// A figure passed the beam grid line.
    Beams {
        figure: FigureKind,
        /// 1-based beam indices, top to bottom.
        beams: Vec<u8>,
        speed: f64,
    },
    /// A threat entered a perimeter ring.
    Ring {
        threat: ThreatKind,
        position: GeoPoint,
    },
}

/// One entry in the alert/event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub source_entity_id: Option<u32>,
    pub sensor_kind: Option<SensorKind>,
    pub severity: LogSeverity,
    pub message: String,
}

/// Cues for audio and UI collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CueEvent {
    /// Beam grid tripped.
    LaserTone { entity_id: u32, beams: Vec<u8> },
    /// Alarm latch raised or re-armed.
    Alarm { entity_id: u32, severity: Severity },
    /// Alarm dwell elapsed.
    AlarmCleared,
}
