//! Entity spawn factories.
//!
//! `generate_threat` is pure over its random source; the `spawn_*`
//! functions attach the resulting component bundles to the world.

use std::f64::consts::TAU;

use glam::DVec2;
use hecs::{Entity, World};

use perimeter_core::components::*;
use perimeter_core::constants::*;
use perimeter_core::enums::*;
use perimeter_core::geometry::polar_offset;
use perimeter_core::types::GeoPoint;

use crate::random::RandomSource;

/// Everything drawn for a new threat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatSeed {
    pub kind: ThreatKind,
    pub severity: Severity,
    pub position: GeoPoint,
    pub velocity: GeoPoint,
}

/// Map a uniform draw to the 70/20/10 severity split.
pub fn severity_from_draw(u: f64) -> Severity {
    if u < SEVERITY_LOW_THRESHOLD {
        Severity::Low
    } else if u < SEVERITY_MEDIUM_THRESHOLD {
        Severity::Medium
    } else {
        Severity::High
    }
}

/// Draw a threat on the spawn band around `base`, heading straight at it.
///
/// Draw order: distance, angle, kind, severity, approach fraction.
pub fn generate_threat(
    base: GeoPoint,
    radius: f64,
    rng: &mut dyn RandomSource,
    fraction_range: (f64, f64),
) -> ThreatSeed {
    let distance = radius * rng.range(SPAWN_DISTANCE_MIN_FACTOR, SPAWN_DISTANCE_MAX_FACTOR);
    let angle = rng.next_f64() * TAU;
    let position = polar_offset(base, distance, angle);

    let kind = ThreatKind::ALL[rng.index(ThreatKind::ALL.len())];
    let severity = severity_from_draw(rng.next_f64());

    // One fraction for both axes keeps the path a straight line to the base.
    let (low, high) = fraction_range;
    let fraction = rng.range(low, high);
    let velocity = position.delta_to(&base).scaled(fraction);

    ThreatSeed {
        kind,
        severity,
        position,
        velocity,
    }
}

/// Spawn a threat entity from a seed.
pub fn spawn_threat(world: &mut World, id: u32, now_ms: u64, seed: ThreatSeed) -> Entity {
    world.spawn((
        Threat,
        EntityTag {
            id,
            spawned_at_ms: now_ms,
        },
        ThreatProfile {
            kind: seed.kind,
            severity: seed.severity,
            phase: ThreatPhase::Spawned,
            resolution: None,
        },
        GeoTrack {
            position: seed.position,
            velocity: seed.velocity,
        },
        RingStates::default(),
    ))
}

/// Place a planar figure with its reference point at `position`.
pub fn place_figure(world: &mut World, id: u32, now_ms: u64, kind: FigureKind, position: DVec2) -> Entity {
    world.spawn((
        Figure,
        EntityTag {
            id,
            spawned_at_ms: now_ms,
        },
        FigureBody { kind, position },
        CrossingState::default(),
    ))
}

/// Find an entity by its public id.
pub fn find_entity(world: &World, id: u32) -> Option<Entity> {
    world
        .query::<&EntityTag>()
        .iter()
        .find(|(_, tag)| tag.id == id)
        .map(|(entity, _)| entity)
}

/// Count threats that are neither assessed nor expired.
pub fn active_threat_count(world: &World) -> usize {
    world
        .query::<(&Threat, &ThreatProfile)>()
        .iter()
        .filter(|(_, (_, profile))| profile.is_live())
        .count()
}
