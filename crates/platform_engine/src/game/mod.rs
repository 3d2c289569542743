//! # Gameplay
//!
//! The entities that drive the collision registry: the player controller,
//! patrolling enemies, powerup and fireball triggers, the world initializer and the
//! single-threaded step loop that ties them together.

pub mod enemy;
pub mod fireball;
pub mod player;
pub mod powerup;
pub mod simulation;
pub mod world_gen;

use crate::physics::ColliderId;

pub use enemy::{Enemy, PatrolReport};
pub use fireball::Fireball;
pub use player::{MoveReport, PlayerController, PlayerInput, VerticalOutcome};
pub use powerup::{Powerup, PowerupKind};
pub use simulation::{Simulation, SimulationError, SimulationEvent};
pub use world_gen::{GeneratedWorld, WorldGenerator};

/// What the owner of an overlap wants done with itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapResponse {
    /// Stay in the world
    Keep,
    /// Remove this entity (and release its collider, if it has one)
    Despawn,
}

/// Receives overlap notifications from the step loop
///
/// Dispatch is explicit: the step loop finds overlapping pairs and calls the
/// owning entity. Nothing is invoked from inside the registry.
pub trait OverlapHandler {
    /// Called once per step for each collider `other` overlapping this entity
    fn on_overlap(&mut self, other: ColliderId) -> OverlapResponse;
}
