//! Threat spawning, bounded by the active-threat cap.

use hecs::World;
use tracing::debug;

use crate::config::SimConfig;
use crate::random::RandomSource;
use crate::world_setup::{self, active_threat_count};

/// Spawn one threat unless the cap is reached. Returns the new id.
pub fn run(
    world: &mut World,
    rng: &mut dyn RandomSource,
    config: &SimConfig,
    next_id: &mut u32,
    now_ms: u64,
) -> Option<u32> {
    let active = active_threat_count(world);
    if active >= config.max_active_threats {
        debug!(active, cap = config.max_active_threats, "spawn skipped at capacity");
        return None;
    }

    let seed = world_setup::generate_threat(
        config.base_position,
        config.perimeter_radius,
        rng,
        config.approach_fraction(),
    );
    let id = *next_id;
    *next_id += 1;
    world_setup::spawn_threat(world, id, now_ms, seed);
    debug!(id, kind = ?seed.kind, severity = ?seed.severity, "threat spawned");
    Some(id)
}
