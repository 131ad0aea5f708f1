//! Perimeter detection over the motion produced this tick.
//!
//! Ring transitions are evaluated for every threat that moved, including
//! one that became assessed on the same step. A sensor that is not active
//! still records containment but raises nothing.

use glam::DVec2;
use hecs::{Entity, World};
use tracing::info;

use perimeter_core::components::{CrossingState, EntityTag, FigureBody, RingStates, ThreatProfile};
use perimeter_core::environment::SensorSuite;
use perimeter_core::events::{CrossingDetail, CrossingEvent};

use crate::detector::{BeamGrid, Crossing, CrossingDetector, MotionSample, RingPerimeter};
use crate::systems::movement::Moved;

/// Evaluate the site rings for each moved threat.
pub fn run(world: &mut World, rings: &[RingPerimeter; 3], sensors: &SensorSuite, moved: &[Moved]) -> Vec<CrossingEvent> {
    let mut events = Vec::new();

    for step in moved {
        let Ok((tag, profile, states)) =
            world.query_one_mut::<(&EntityTag, &ThreatProfile, &mut RingStates)>(step.entity)
        else {
            continue;
        };

        let sample = MotionSample::geo(step.previous, step.current);
        for (ring, state) in rings.iter().zip(states.rings.iter_mut()) {
            if ring.evaluate(&sample, state).is_none() {
                continue;
            }
            if !sensors.get(ring.sensor()).is_active() {
                continue;
            }
            if !states.detected {
                states.detected = true;
                states.detected_by = Some(ring.sensor());
            }
            info!(id = tag.id, sensor = %ring.sensor(), "perimeter breach");
            events.push(CrossingEvent {
                entity_id: tag.id,
                sensor: ring.sensor(),
                severity: profile.severity,
                detail: CrossingDetail::Ring {
                    threat: profile.kind,
                    position: step.current,
                },
            });
        }
    }

    events
}

/// Move a figure and check the beam grid on the before/after pair.
/// Returns `None` when `entity` is not a figure.
pub fn move_figure(
    world: &mut World,
    grid: &BeamGrid,
    sensors: &SensorSuite,
    entity: Entity,
    to: DVec2,
) -> Option<Option<CrossingEvent>> {
    let (tag, body, state) = world
        .query_one_mut::<(&EntityTag, &mut FigureBody, &mut CrossingState)>(entity)
        .ok()?;

    let spec = body.kind.spec();
    let sample = MotionSample {
        previous: body.position,
        current: to,
        extent: DVec2::new(spec.width, spec.height),
        speed_factor: spec.speed_factor,
    };
    body.position = to;

    let crossing = grid.evaluate(&sample, state);
    let event = match crossing {
        Some(Crossing::Beams { beams, speed }) if sensors.get(grid.sensor()).is_active() => {
            info!(id = tag.id, ?beams, speed, "laser beams crossed");
            Some(CrossingEvent {
                entity_id: tag.id,
                sensor: grid.sensor(),
                severity: spec.severity,
                detail: CrossingDetail::Beams {
                    figure: body.kind,
                    beams,
                    speed,
                },
            })
        }
        _ => None,
    };
    Some(event)
}
