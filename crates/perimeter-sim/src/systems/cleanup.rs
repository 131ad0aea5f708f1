//! Cleanup system: drops threats past their TTL.

use hecs::{Entity, World};

use perimeter_core::components::{EntityTag, Threat};

/// Despawn every threat whose age has reached `ttl_ms`, assessed or not.
/// Returns the ids removed.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, ttl_ms: u64, now_ms: u64) -> Vec<u32> {
    despawn_buffer.clear();
    let mut removed = Vec::new();

    for (entity, (_threat, tag)) in world.query_mut::<(&Threat, &EntityTag)>() {
        if now_ms.saturating_sub(tag.spawned_at_ms) >= ttl_ms {
            despawn_buffer.push(entity);
            removed.push(tag.id);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    removed
}
