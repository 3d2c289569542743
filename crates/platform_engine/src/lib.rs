//! # Platform Engine
//!
//! Collision core for a side-scrolling platformer built from instanced
//! boxes.
//!
//! ## Features
//!
//! - **Collision Registry**: One authority for axis-aligned collision boxes,
//!   keyed by stable identifiers and kept in step with render transforms
//! - **Pluggable Broad Phase**: Exhaustive scan or uniform hash grid behind
//!   one trait, with identical query answers
//! - **Platformer Movement**: Axis-separated player resolution, patrolling
//!   enemies, powerup and fireball triggers
//! - **Seeded Worlds**: Reproducible world generation from configuration
//! - **Config Files**: TOML or RON, validated on load
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platform_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let mut simulation = Simulation::new(&config)?;
//!
//!     for _ in 0..60 {
//!         for event in simulation.advance(PlayerInput::walk(1.0), 1.0 / 60.0)? {
//!             println!("{event:?}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod foundation;
pub mod config;

// Collision and gameplay
pub mod physics;
pub mod game;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{ApplicationConfig, BroadPhaseKind, MovementConfig, RegistryConfig, SimulationConfig, WorldConfig},
        foundation::{
            math::{Mat4, Quat, Transform, Vec3},
            time::{FixedStep, Stopwatch},
        },
        game::{
            Enemy, Fireball, OverlapHandler, OverlapResponse, PlayerController, PlayerInput, Powerup, PowerupKind,
            Simulation, SimulationError, SimulationEvent, WorldGenerator,
        },
        physics::{BoundingVolume, BroadPhase, ColliderId, CollisionRegistry, RegistryError},
    };
}
