//! Fireball projectiles
//!
//! Spawned at the player when a fireball powerup is picked up. Like
//! powerups they are trigger volumes outside the registry: they fly through
//! terrain and only react to enemies.

use crate::foundation::math::Vec3;
use crate::game::{OverlapHandler, OverlapResponse};
use crate::physics::{BoundingVolume, ColliderId};

/// Travel speed in units per second
pub const FIREBALL_SPEED: f32 = 10.0;

/// Seconds before an unspent fireball burns out
pub const FIREBALL_LIFETIME: f32 = 5.0;

/// Projectile in flight
#[derive(Debug, Clone)]
pub struct Fireball {
    volume: BoundingVolume,
    velocity: Vec3,
    remaining: f32,
}

impl Fireball {
    /// Launch a fireball of `size` from `origin` along `direction`
    ///
    /// A zero direction is replaced by +X.
    pub fn new(origin: Vec3, size: Vec3, direction: Vec3) -> Self {
        let direction = direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x);
        Self {
            volume: BoundingVolume::from_size(origin, size),
            velocity: direction * FIREBALL_SPEED,
            remaining: FIREBALL_LIFETIME,
        }
    }

    /// Current trigger volume
    pub fn volume(&self) -> &BoundingVolume {
        &self.volume
    }

    /// Whether the fireball has burned out
    pub fn is_spent(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Move along the flight path
    pub fn advance(&mut self, dt: f32) {
        self.volume = self.volume.at(self.volume.center + self.velocity * dt);
        self.remaining -= dt;
    }
}

impl OverlapHandler for Fireball {
    fn on_overlap(&mut self, other: ColliderId) -> OverlapResponse {
        log::debug!("Fireball hit {}", other);
        self.remaining = 0.0;
        OverlapResponse::Despawn
    }
}
