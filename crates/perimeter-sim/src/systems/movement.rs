//! Threat motion step.
//!
//! Adds each live threat's velocity to its position, marks threats that
//! reached the inner zone as assessed, and expires threats past their TTL.

use hecs::{Entity, World};

use perimeter_core::components::{EntityTag, GeoTrack, Threat, ThreatProfile};
use perimeter_core::constants::ASSESSED_DISTANCE_FACTOR;
use perimeter_core::enums::{Resolution, ThreatPhase};
use perimeter_core::types::GeoPoint;

use crate::config::SimConfig;

/// A threat that moved during this step.
#[derive(Debug, Clone, Copy)]
pub struct Moved {
    pub entity: Entity,
    pub previous: GeoPoint,
    pub current: GeoPoint,
    /// True when this step brought it inside the assessment distance.
    pub reached_site: bool,
}

/// Advance all live threats by one motion step.
pub fn run(world: &mut World, config: &SimConfig, now_ms: u64) -> Vec<Moved> {
    let threshold = ASSESSED_DISTANCE_FACTOR * config.perimeter_radius;
    let mut moved = Vec::new();

    for (entity, (_threat, tag, profile, track)) in
        world.query_mut::<(&Threat, &EntityTag, &mut ThreatProfile, &mut GeoTrack)>()
    {
        if !profile.is_live() {
            continue;
        }
        if now_ms.saturating_sub(tag.spawned_at_ms) >= config.threat_ttl_ms {
            profile.phase = ThreatPhase::Expired;
            continue;
        }

        let previous = track.position;
        track.position = previous.offset(&track.velocity);
        profile.phase = ThreatPhase::Moving;

        let reached_site = track.position.planar_distance_to(&config.base_position) < threshold;
        if reached_site {
            profile.phase = ThreatPhase::Assessed;
            profile.resolution = Some(Resolution::ReachedSite);
        }

        moved.push(Moved {
            entity,
            previous,
            current: track.position,
            reached_site,
        });
    }

    moved
}
