//! Powerups
//!
//! Trigger volumes: they are not registered with the collision registry, so
//! they never block movement. The step loop tests them against the player's
//! box after the player has moved.

use std::fmt;

use rand::Rng;

use crate::foundation::math::Vec3;
use crate::game::{OverlapHandler, OverlapResponse};
use crate::physics::{BoundingVolume, ColliderId};

/// Effect granted on pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    /// One more life
    ExtraLife,
    /// Temporary immunity to damage
    Invincibility,
    /// Temporary ranged attack
    Fireball,
}

impl PowerupKind {
    /// Pick a kind uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Self::ExtraLife,
            1 => Self::Invincibility,
            _ => Self::Fireball,
        }
    }
}

impl fmt::Display for PowerupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExtraLife => "extra life",
            Self::Invincibility => "invincibility",
            Self::Fireball => "fireball",
        };
        f.write_str(name)
    }
}

/// Trigger volume waiting to be collected
#[derive(Debug, Clone)]
pub struct Powerup {
    kind: PowerupKind,
    volume: BoundingVolume,
    collected_by: Option<ColliderId>,
}

impl Powerup {
    /// Create a powerup of `size` centered at `center`
    pub fn new(kind: PowerupKind, center: Vec3, size: Vec3) -> Self {
        Self {
            kind,
            volume: BoundingVolume::from_size(center, size),
            collected_by: None,
        }
    }

    /// Effect granted on pickup
    pub fn kind(&self) -> PowerupKind {
        self.kind
    }

    /// Trigger volume
    pub fn volume(&self) -> &BoundingVolume {
        &self.volume
    }

    /// Who picked it up, once collected
    pub fn collected_by(&self) -> Option<ColliderId> {
        self.collected_by
    }
}

impl OverlapHandler for Powerup {
    fn on_overlap(&mut self, other: ColliderId) -> OverlapResponse {
        if self.collected_by.is_some() {
            return OverlapResponse::Keep;
        }
        self.collected_by = Some(other);
        log::info!("Powerup collected: {}", self.kind);
        OverlapResponse::Despawn
    }
}
