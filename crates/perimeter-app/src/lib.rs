//! PERIMETER real-time driver.
//!
//! Runs the simulation engine on a dedicated loop thread, forwards operator
//! commands to it over a channel, and hands snapshots and cues to
//! collaborator sinks. The `perimeter-demo` binary wires this to a TOML
//! configuration and a log export.

pub mod config;
pub mod game_loop;
pub mod sink;
pub mod state;

pub use perimeter_core as core;
