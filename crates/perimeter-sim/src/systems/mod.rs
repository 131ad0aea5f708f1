//! ECS systems that operate on the simulation world.
//!
//! Systems are free functions over `&mut World` (or `&World` for
//! read-only). They hold no state of their own.

pub mod cleanup;
pub mod movement;
pub mod perimeter;
pub mod snapshot;
pub mod spawner;
