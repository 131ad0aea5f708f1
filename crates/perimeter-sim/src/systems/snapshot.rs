//! Snapshot system: reads the world and builds a `SimSnapshot`.
//!
//! Read-only; it never modifies the world.

use hecs::World;

use perimeter_core::components::*;
use perimeter_core::enums::SimPhase;
use perimeter_core::events::{CueEvent, LogEntry};
use perimeter_core::state::*;
use perimeter_core::types::{GeoPoint, SimTime};

use perimeter_environment::EnvironmentModel;

/// Every entity, sorted by id.
pub fn build_entities(world: &World, base: GeoPoint, now_ms: u64) -> Vec<EntityView> {
    let mut views: Vec<EntityView> = Vec::new();

    for (_entity, (tag, profile, track, rings)) in world
        .query::<(&EntityTag, &ThreatProfile, &GeoTrack, &RingStates)>()
        .iter()
    {
        views.push(EntityView::Threat(ThreatView {
            id: tag.id,
            kind: profile.kind,
            severity: profile.severity,
            phase: profile.phase,
            resolution: profile.resolution,
            position: track.position,
            velocity: track.velocity,
            detected: rings.detected,
            detected_by: rings.detected_by,
            distance_deg: track.position.planar_distance_to(&base),
            distance_km: track.position.haversine_km_to(&base),
            age_ms: now_ms.saturating_sub(tag.spawned_at_ms),
        }));
    }

    for (_entity, (tag, body)) in world.query::<(&EntityTag, &FigureBody)>().iter() {
        let spec = body.kind.spec();
        views.push(EntityView::Figure(FigureView {
            id: tag.id,
            kind: body.kind,
            class: spec.class,
            severity: spec.severity,
            position: body.position,
            width: spec.width,
            height: spec.height,
        }));
    }

    views.sort_by_key(|v| v.id());
    views
}

/// Sensor table for display.
pub fn build_sensors(model: &EnvironmentModel) -> Vec<SensorView> {
    let priorities = model.priorities();
    let effectiveness = model.effectiveness();
    let ranges = model.effective_ranges();
    model
        .sensors()
        .iter()
        .map(|(kind, config)| SensorView {
            kind,
            config,
            priority: priorities.get(kind),
            effectiveness: effectiveness.get(kind),
            effective_range_m: ranges.get(kind),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: SimPhase,
    base: GeoPoint,
    model: &EnvironmentModel,
    alarm_active: bool,
    new_logs: Vec<LogEntry>,
    cues: Vec<CueEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        entities: build_entities(world, base, time.elapsed_ms),
        environment: *model.environment(),
        sensors: build_sensors(model),
        warnings: model.warnings().to_vec(),
        alarm_active,
        new_logs,
        cues,
    }
}
