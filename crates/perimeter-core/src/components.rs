//! ECS components for hecs entities.
//!
//! Components are plain data. Behaviour lives in the systems of
//! `perimeter-sim`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::GeoPoint;

/// Marker for geographic threats.
#[derive(Debug, Clone, Copy, Default)]
pub struct Threat;

/// Marker for planar figures on the beam grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Figure;

/// Identity shared by threats and figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTag {
    /// Unique for the session, drawn from one counter for all entity types.
    pub id: u32,
    /// Simulation time of creation.
    pub spawned_at_ms: u64,
}

/// Classification and lifecycle state of a threat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThreatProfile {
    pub kind: ThreatKind,
    pub severity: Severity,
    pub phase: ThreatPhase,
    /// Set together with `ThreatPhase::Assessed`.
    pub resolution: Option<Resolution>,
}

impl ThreatProfile {
    /// Assessed and expired threats are frozen.
    pub fn is_live(&self) -> bool {
        matches!(self.phase, ThreatPhase::Spawned | ThreatPhase::Moving)
    }

    pub fn is_assessed(&self) -> bool {
        self.phase == ThreatPhase::Assessed
    }
}

/// Geographic position and per-motion-tick displacement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoTrack {
    pub position: GeoPoint,
    pub velocity: GeoPoint,
}

/// Containment recorded at the previous evaluation of one boundary.
/// `None` until the first evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingState {
    pub inside: Option<bool>,
}

/// Ring crossing state and detection attribution for a threat.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RingStates {
    /// Indexed by ring, outermost first: laser, fiber, radar.
    pub rings: [CrossingState; 3],
    pub detected: bool,
    pub detected_by: Option<SensorKind>,
}

/// Planar figure placed on the beam grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FigureBody {
    pub kind: FigureKind,
    /// Reference point: left edge x, top edge y.
    pub position: DVec2,
}
