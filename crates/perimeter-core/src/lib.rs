//! Core types and definitions for the PERIMETER simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry helpers, components, commands, environment records, log
//! entries, snapshots, and constants. It has no dependency on the ECS
//! or any runtime driver.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod environment;
pub mod events;
pub mod geometry;
pub mod state;
pub mod types;
