//! Simulation engine for PERIMETER.
//!
//! Owns the hecs ECS world, spawns and advances threats on simulation-clock
//! timers, detects boundary crossings, and aggregates them into a capped
//! log with a timed alarm.

pub mod alerts;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod export;
pub mod random;
pub mod schedule;
pub mod systems;
pub mod world_setup;

pub use perimeter_core as core;
pub use config::SimConfig;
pub use engine::SimulationEngine;
pub use error::{SimError, SimResult};

#[cfg(test)]
mod tests;
